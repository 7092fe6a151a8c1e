//! `mailtriage` - Inbox triage and meeting collision reports
//!
//! Reads messages and events already exported from the mail service as JSON
//! and prints what the triage rules would do and which meetings overlap.

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

mod settings;

use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use mailtriage_core::{Event, EventFilter, Message, RuleSet, TimeNormalizer, TriageRunner};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use settings::Settings;

/// Mailbox triage and calendar collision reports.
#[derive(Debug, Parser)]
#[command(name = "mailtriage", version, about)]
struct Cli {
    /// Settings file (defaults to the user config directory).
    #[arg(long, global = true, env = "MAILTRIAGE_SETTINGS")]
    settings: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Classify messages and print the triage summary (dry run).
    Triage {
        /// JSON array of messages, or `-` for stdin.
        #[arg(long)]
        messages: PathBuf,
        /// Rules file (overrides settings).
        #[arg(long)]
        rules: Option<PathBuf>,
        /// Organization domain suffix, e.g. `@example.com`.
        #[arg(long)]
        internal_domain: Option<String>,
    },
    /// Annotate events with the meetings they overlap.
    Collisions {
        /// JSON array of events, or `-` for stdin.
        #[arg(long)]
        events: PathBuf,
        /// Keep cancelled and declined events in the listing.
        #[arg(long)]
        include_cancelled: bool,
        /// Only list events whose subject matches this regex.
        #[arg(long)]
        subject: Option<String>,
        /// Keep times in UTC instead of converting to local time.
        #[arg(long)]
        utc: bool,
    },
}

fn main() -> anyhow::Result<()> {
    // Initialize logging; stdout carries the JSON report.
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "mailtriage=info,mailtriage_core=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let settings = match cli.settings.or_else(Settings::default_path) {
        Some(path) => Settings::load(&path)?,
        None => Settings::default(),
    };

    let output = match cli.command {
        Command::Triage {
            messages,
            rules,
            internal_domain,
        } => triage(&settings, &messages, rules, internal_domain)?,
        Command::Collisions {
            events,
            include_cancelled,
            subject,
            utc,
        } => collisions(&settings, &events, include_cancelled, subject.as_deref(), utc)?,
    };

    println!("{output}");
    Ok(())
}

fn triage(
    settings: &Settings,
    messages: &Path,
    rules: Option<PathBuf>,
    internal_domain: Option<String>,
) -> anyhow::Result<String> {
    let rules_path = rules.unwrap_or_else(|| settings.rules_path());
    let mut rules = RuleSet::load(&rules_path)
        .with_context(|| format!("Failed to load rules from {}", rules_path.display()))?;
    if let Some(domain) = internal_domain.or_else(|| settings.internal_domain.clone()) {
        rules.internal_domain = Some(domain);
    }

    let messages = Message::parse_batch(&read_input(messages)?)?;
    info!(count = messages.len(), "Triaging messages");

    let summary = TriageRunner::new(&rules).run(&messages, NoMailbox, true)?;

    Ok(serde_json::to_string_pretty(&summary)?)
}

fn collisions(
    settings: &Settings,
    events: &Path,
    include_cancelled: bool,
    subject: Option<&str>,
    utc: bool,
) -> anyhow::Result<String> {
    let normalizer = if utc {
        TimeNormalizer::utc()
    } else {
        settings.time_normalizer()?
    };

    let mut filter = EventFilter::new().include_cancelled(include_cancelled);
    if let Some(pattern) = subject {
        filter = filter.subject_pattern(pattern)?;
    }

    let events: Vec<Event> = Event::parse_batch(&read_input(events)?)?
        .into_iter()
        .map(|event| normalizer.localize_event(event))
        .collect();
    let events = filter.apply(events);
    info!(count = events.len(), zone = normalizer.zone(), "Checking meeting collisions");

    let annotated = mailtriage_core::find_collisions(&events);
    Ok(serde_json::to_string_pretty(&annotated)?)
}

/// Read a file, or stdin for `-`.
fn read_input(path: &Path) -> anyhow::Result<String> {
    if path == Path::new("-") {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .context("Failed to read stdin")?;
        return Ok(text);
    }
    std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

/// Stand-in dispatcher for dry runs, which never dispatch.
struct NoMailbox;

impl mailtriage_core::ActionDispatcher for NoMailbox {
    type Error = std::convert::Infallible;

    fn mark_important(&mut self, _id: &str) -> Result<(), Self::Error> {
        Ok(())
    }

    fn mark_read(&mut self, _id: &str, _is_read: bool) -> Result<(), Self::Error> {
        Ok(())
    }

    fn move_to_folder(&mut self, _id: &str, _folder: &str) -> Result<(), Self::Error> {
        Ok(())
    }
}
