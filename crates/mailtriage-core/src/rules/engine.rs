//! First-match-wins rule evaluation.

use serde::{Deserialize, Serialize};

use super::model::RuleSet;
use crate::triage::Message;

/// Subject tokens that mark a system email as an approval request.
const APPROVAL_TOKENS: [&str; 2] = ["approu", "approve"];

/// What to do with a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    /// Mark as important (and read).
    MarkImportant,
    /// Move to the archive folder.
    Archive,
    /// Record for follow-up; the mailbox is left untouched.
    Flag,
    /// Leave in the inbox.
    Keep,
}

impl Action {
    /// All actions, in summary order.
    pub const ALL: [Self; 4] = [Self::MarkImportant, Self::Archive, Self::Flag, Self::Keep];

    /// Parse from string representation.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "mark_important" => Some(Self::MarkImportant),
            "archive" => Some(Self::Archive),
            "flag" => Some(Self::Flag),
            "keep" => Some(Self::Keep),
            _ => None,
        }
    }

    /// Convert to string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::MarkImportant => "mark_important",
            Self::Archive => "archive",
            Self::Flag => "flag",
            Self::Keep => "keep",
        }
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The rule that produced a disposition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rule {
    /// Sender is a VIP.
    VipSender,
    /// External sender matches an archive domain.
    ArchiveDomain,
    /// External, non-partner subject matches an archive keyword.
    ArchiveKeyword,
    /// Subject starts with a cancelled/declined meeting prefix.
    CancelledMeeting,
    /// System sender asking for an approval.
    ApprovalRequest,
    /// Sender is a whitelisted partner.
    Partner,
    /// Nothing matched.
    Default,
}

impl Rule {
    /// The action this rule assigns.
    #[must_use]
    pub const fn action(&self) -> Action {
        match self {
            Self::VipSender => Action::MarkImportant,
            Self::ArchiveDomain | Self::ArchiveKeyword | Self::CancelledMeeting => Action::Archive,
            Self::ApprovalRequest => Action::Flag,
            Self::Partner | Self::Default => Action::Keep,
        }
    }

    /// Display priority; lower sorts first.
    #[must_use]
    pub const fn priority(&self) -> u8 {
        match self {
            Self::VipSender => 1,
            Self::ApprovalRequest => 2,
            Self::Partner | Self::Default => 3,
            Self::CancelledMeeting => 4,
            Self::ArchiveDomain | Self::ArchiveKeyword => 5,
        }
    }
}

/// Result of classifying one message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Disposition {
    /// Action to take.
    pub action: Action,
    /// Human-readable explanation.
    pub reason: String,
    /// Display priority; lower sorts first.
    pub priority: u8,
    /// Rule that matched.
    pub rule: Rule,
}

impl Disposition {
    fn new(rule: Rule, reason: impl Into<String>) -> Self {
        Self {
            action: rule.action(),
            reason: reason.into(),
            priority: rule.priority(),
            rule,
        }
    }
}

/// A [`RuleSet`] normalized to lowercase for matching.
#[derive(Debug, Clone, Default)]
pub struct RuleEngine {
    vip_senders: Vec<String>,
    archive_domains: Vec<String>,
    archive_keywords: Vec<String>,
    partners: Vec<String>,
    archive_subjects: Vec<String>,
    system_emails: Vec<String>,
    internal_domain: Option<String>,
}

fn lowercase_all(values: &[String]) -> Vec<String> {
    values.iter().map(|v| v.to_lowercase()).collect()
}

impl RuleEngine {
    /// Build an engine from a rule set.
    #[must_use]
    pub fn new(rules: &RuleSet) -> Self {
        Self {
            vip_senders: lowercase_all(&rules.vip_senders),
            archive_domains: lowercase_all(&rules.auto_archive_domains),
            archive_keywords: lowercase_all(&rules.auto_archive_keywords),
            partners: lowercase_all(&rules.partner_whitelist),
            archive_subjects: lowercase_all(&rules.auto_archive_subjects),
            system_emails: lowercase_all(&rules.system_emails),
            internal_domain: rules
                .internal_domain
                .as_deref()
                .filter(|d| !d.is_empty())
                .map(str::to_lowercase),
        }
    }

    /// Classify a message. Exactly one disposition is returned.
    #[must_use]
    pub fn classify(&self, message: &Message) -> Disposition {
        let sender = message.from.to_lowercase();
        let subject = message.subject.to_lowercase();

        if self.vip_senders.contains(&sender) {
            let name = message.from_name.as_deref().unwrap_or(&sender);
            return Disposition::new(Rule::VipSender, format!("VIP sender: {name}"));
        }

        if !self.is_internal(&sender) {
            if let Some(domain) = self.archive_domains.iter().find(|d| sender.contains(d.as_str())) {
                return Disposition::new(
                    Rule::ArchiveDomain,
                    format!("Recruitment/spam from {domain}"),
                );
            }

            if let Some(keyword) = self
                .archive_keywords
                .iter()
                .find(|k| subject.contains(k.as_str()))
                && self.partner_of(&sender).is_none()
            {
                return Disposition::new(
                    Rule::ArchiveKeyword,
                    format!("External recruitment email: \"{keyword}\""),
                );
            }
        }

        if self
            .archive_subjects
            .iter()
            .any(|p| subject.starts_with(p.as_str()))
        {
            return Disposition::new(Rule::CancelledMeeting, "Cancelled/declined meeting");
        }

        if self.system_emails.contains(&sender) && APPROVAL_TOKENS.iter().any(|t| subject.contains(t))
        {
            return Disposition::new(Rule::ApprovalRequest, "Action required: Approval needed");
        }

        if let Some(partner) = self.partner_of(&sender) {
            return Disposition::new(Rule::Partner, format!("Whitelisted partner: {partner}"));
        }

        Disposition::new(Rule::Default, "No matching rule")
    }

    fn is_internal(&self, sender: &str) -> bool {
        self.internal_domain
            .as_deref()
            .is_some_and(|domain| sender.ends_with(domain))
    }

    fn partner_of(&self, sender: &str) -> Option<&str> {
        self.partners
            .iter()
            .map(String::as_str)
            .find(|p| sender.contains(p))
    }
}

/// Classify a message against a rule set.
///
/// Builds a [`RuleEngine`] per call; prefer [`RuleEngine::classify`] for batches.
#[must_use]
pub fn classify(message: &Message, rules: &RuleSet) -> Disposition {
    RuleEngine::new(rules).classify(message)
}
