//! Integration tests for message classification and batch triage.

#![allow(clippy::unwrap_used)]

use mailtriage_core::{
    Action, ActionDispatcher, Message, Rule, RuleEngine, RuleSet, TriageRunner, classify,
};
use proptest::prelude::*;

/// Dispatcher that records every call.
#[derive(Default)]
struct MockMailbox {
    important: Vec<String>,
    read: Vec<String>,
    moved: Vec<(String, String)>,
}

impl ActionDispatcher for MockMailbox {
    type Error = std::convert::Infallible;

    fn mark_important(&mut self, id: &str) -> Result<(), Self::Error> {
        self.important.push(id.to_string());
        Ok(())
    }

    fn mark_read(&mut self, id: &str, is_read: bool) -> Result<(), Self::Error> {
        if is_read {
            self.read.push(id.to_string());
        }
        Ok(())
    }

    fn move_to_folder(&mut self, id: &str, folder: &str) -> Result<(), Self::Error> {
        self.moved.push((id.to_string(), folder.to_string()));
        Ok(())
    }
}

fn team_rules() -> RuleSet {
    RuleSet::from_json(
        r#"{
            "vip_senders": ["ceo@example.com", "cfo@example.com"],
            "auto_archive_domains": ["headhunter.io", "talent-hub"],
            "auto_archive_keywords": ["opportunity", "recruiting", "job offer"],
            "partner_whitelist": ["@partner.com", "consulting-group"],
            "auto_archive_subjects": ["canceled:", "declined:", "annulé:"],
            "system_emails": ["noreply@workflow.example.com"],
            "internal_domain": "@example.com"
        }"#,
    )
    .unwrap()
}

#[test]
fn test_vip_scenario() {
    let rules = RuleSet {
        vip_senders: vec!["ceo@example.com".to_string()],
        ..RuleSet::default()
    };
    let d = classify(&Message::new("m1", "ceo@example.com", "Budget"), &rules);

    assert_eq!(d.action, Action::MarkImportant);
    assert_eq!(d.priority, 1);
}

#[test]
fn test_recruitment_domain_scenario() {
    let rules = RuleSet {
        auto_archive_domains: vec!["headhunter.io".to_string()],
        internal_domain: Some("@example.com".to_string()),
        ..RuleSet::default()
    };
    let d = classify(
        &Message::new("m1", "jobs@headhunter.io", "Exciting opportunity"),
        &rules,
    );

    assert_eq!(d.action, Action::Archive);
    assert_eq!(d.priority, 5);
}

#[test]
fn test_full_inbox_run() {
    let messages = Message::parse_batch(
        r#"[
            {"id": "1", "from": "CEO@example.com", "from_name": "Dana", "subject": "Q3 numbers", "is_read": false},
            {"id": "2", "from": "bot@talent-hub.net", "from_name": "Talent", "subject": "Hello", "is_read": false},
            {"id": "3", "from": "amy@partner.com", "subject": "Job offer for a colleague", "is_read": false},
            {"id": "4", "from": "cal@example.com", "subject": "Canceled: 1:1", "is_read": false},
            {"id": "5", "from": "noreply@workflow.example.com", "subject": "Invoice to approve", "is_read": false},
            {"id": "6", "from": "noreply@workflow.example.com", "subject": "Invoice approved", "is_read": true},
            {"id": "7", "from": "someone@else.org", "subject": "Recruiting event", "is_read": false}
        ]"#,
    )
    .unwrap();

    let mut mailbox = MockMailbox::default();
    let summary = TriageRunner::new(&team_rules())
        .run(&messages, &mut mailbox, false)
        .unwrap();

    assert_eq!(mailbox.important, ["1"]);
    assert_eq!(mailbox.read, ["1"]);
    let moved: Vec<_> = mailbox.moved.iter().map(|(id, _)| id.as_str()).collect();
    assert_eq!(moved, ["2", "4", "7"]);
    assert!(mailbox.moved.iter().all(|(_, folder)| folder == "archive"));

    assert_eq!(summary.mark_important[0].reason, "VIP sender: Dana");
    let archived: Vec<_> = summary
        .archive
        .iter()
        .map(|e| (e.id.as_str(), e.priority))
        .collect();
    assert_eq!(archived, [("4", 4), ("2", 5), ("7", 5)]);
    assert_eq!(summary.flag.len(), 1);
    assert_eq!(summary.flag[0].id, "5");
    assert_eq!(summary.keep.len(), 1);
    assert_eq!(summary.keep[0].reason, "Whitelisted partner: @partner.com");
    assert_eq!(summary.total(), 6);
}

#[test]
fn test_dry_run_reports_read_messages() {
    let messages = vec![
        Message::new("1", "noreply@workflow.example.com", "Approve leave").read(true),
        Message::new("2", "x@y.z", "hi").read(true),
    ];

    let mut mailbox = MockMailbox::default();
    let summary = TriageRunner::new(&team_rules())
        .run(&messages, &mut mailbox, true)
        .unwrap();

    assert_eq!(summary.total(), 2);
    assert_eq!(summary.entries(Action::Flag)[0].id, "1");
    assert!(mailbox.important.is_empty() && mailbox.moved.is_empty());

    let skipped = TriageRunner::new(&team_rules())
        .run(&messages, &mut mailbox, false)
        .unwrap();
    assert!(skipped.is_empty());
}

fn address() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("ceo@example.com".to_string()),
        Just("jobs@headhunter.io".to_string()),
        Just("amy@partner.com".to_string()),
        Just("noreply@workflow.example.com".to_string()),
        Just("hr@example.com".to_string()),
        "[a-z]{1,8}@[a-z]{1,8}\\.(com|io|org)",
    ]
}

fn subject() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("Great OPPORTUNITY".to_string()),
        Just("Canceled: sync".to_string()),
        Just("Please approve".to_string()),
        "[A-Za-z :]{0,24}",
    ]
}

proptest! {
    #[test]
    fn test_vip_always_wins(subject in subject()) {
        let d = classify(&Message::new("1", "ceo@example.com", subject), &team_rules());
        prop_assert_eq!(d.rule, Rule::VipSender);
        prop_assert_eq!(d.priority, 1);
    }

    #[test]
    fn test_partners_never_archived_by_keyword(
        local in "[a-z]{1,8}",
        subject in subject(),
    ) {
        let message = Message::new("1", format!("{local}@partner.com"), subject);
        let d = classify(&message, &team_rules());
        prop_assert_ne!(d.rule, Rule::ArchiveKeyword);
    }

    #[test]
    fn test_priority_matches_rule(from in address(), subject in subject()) {
        let engine = RuleEngine::new(&team_rules());
        let d = engine.classify(&Message::new("1", from, subject));

        prop_assert_eq!(d.action, d.rule.action());
        let expected = match d.rule {
            Rule::VipSender => 1,
            Rule::ApprovalRequest => 2,
            Rule::Partner | Rule::Default => 3,
            Rule::CancelledMeeting => 4,
            Rule::ArchiveDomain | Rule::ArchiveKeyword => 5,
        };
        prop_assert_eq!(d.priority, expected);
    }

    #[test]
    fn test_groups_are_sorted_and_complete(
        batch in prop::collection::vec((address(), subject(), any::<bool>()), 0..30),
    ) {
        let messages: Vec<Message> = batch
            .into_iter()
            .enumerate()
            .map(|(i, (from, subject, read))| Message::new(i.to_string(), from, subject).read(read))
            .collect();

        let summary = TriageRunner::new(&team_rules())
            .run(&messages, MockMailbox::default(), true)
            .unwrap();

        prop_assert_eq!(summary.total(), messages.len());
        for action in Action::ALL {
            let entries = summary.entries(action);
            prop_assert!(entries.windows(2).all(|w| w[0].priority <= w[1].priority));
        }
    }
}
