//! Rule set configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{Error, Result};

/// Classification rules, one list per category.
///
/// Every category is optional in the serialized form; an absent category is
/// empty and never matches.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuleSet {
    /// Senders whose mail is always marked important (exact address).
    pub vip_senders: Vec<String>,
    /// Sender substrings (usually domains) archived when external.
    pub auto_archive_domains: Vec<String>,
    /// Subject substrings archived when external and not from a partner.
    pub auto_archive_keywords: Vec<String>,
    /// Partner sender substrings, never archived by keyword.
    pub partner_whitelist: Vec<String>,
    /// Subject prefixes of cancelled or declined meeting notices.
    pub auto_archive_subjects: Vec<String>,
    /// System senders whose approval requests get flagged (exact address).
    pub system_emails: Vec<String>,
    /// Organization domain suffix, e.g. `@example.com`.
    ///
    /// Senders ending with it skip the external archive rules. When unset
    /// every sender counts as external.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub internal_domain: Option<String>,
}

impl RuleSet {
    /// Parse a rule set from JSON text.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidRules`] if the text is not JSON or a category
    /// has the wrong type.
    pub fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str(text).map_err(Error::InvalidRules)
    }

    /// Load a rule set from a JSON file.
    ///
    /// A missing file yields the empty rule set, which keeps every message.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            debug!(path = %path.display(), "Rules file not found, using empty rule set");
            return Ok(Self::default());
        }

        let text = std::fs::read_to_string(path)?;
        let rules = Self::from_json(&text)?;
        debug!(
            path = %path.display(),
            vip = rules.vip_senders.len(),
            archive_domains = rules.auto_archive_domains.len(),
            archive_keywords = rules.auto_archive_keywords.len(),
            "Loaded rule set"
        );
        Ok(rules)
    }

    /// Returns true if no category has any entry.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.vip_senders.is_empty()
            && self.auto_archive_domains.is_empty()
            && self.auto_archive_keywords.is_empty()
            && self.partner_whitelist.is_empty()
            && self.auto_archive_subjects.is_empty()
            && self.system_emails.is_empty()
    }
}
