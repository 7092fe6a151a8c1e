//! Persistent command-line settings.

use std::path::{Path, PathBuf};

use anyhow::Context;
use mailtriage_core::{DateCommandOffsetProvider, FixedOffsetProvider, TimeNormalizer};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Name of the rules file looked up next to the settings.
const RULES_FILE: &str = "email_rules.json";

/// Settings that persist across runs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Rules file; defaults to `email_rules.json` in the config directory.
    pub rules_path: Option<PathBuf>,
    /// Organization domain suffix, overriding the rules file.
    pub internal_domain: Option<String>,
    /// Fixed UTC offset (`+0100`) used instead of detecting the host's.
    pub utc_offset: Option<String>,
    /// Zone label shown with a fixed `utc_offset`.
    pub timezone_name: Option<String>,
}

impl Settings {
    /// Directory holding settings and rules.
    pub fn config_dir() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("mailtriage"))
    }

    /// Default settings file location.
    pub fn default_path() -> Option<PathBuf> {
        Self::config_dir().map(|dir| dir.join("settings.json"))
    }

    /// Load settings, or defaults if the file does not exist.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            debug!(path = %path.display(), "No settings file, using defaults");
            return Ok(Self::default());
        }

        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings {}", path.display()))?;
        serde_json::from_str(&text)
            .with_context(|| format!("Failed to parse settings {}", path.display()))
    }

    /// Rules file to use.
    pub fn rules_path(&self) -> PathBuf {
        self.rules_path.clone().unwrap_or_else(|| {
            Self::config_dir().map_or_else(|| PathBuf::from(RULES_FILE), |dir| dir.join(RULES_FILE))
        })
    }

    /// Build the time normalizer from the configured or detected offset.
    pub fn time_normalizer(&self) -> anyhow::Result<TimeNormalizer> {
        let normalizer = match &self.utc_offset {
            Some(offset) => {
                let zone = self.timezone_name.clone().unwrap_or_else(|| offset.clone());
                let provider = FixedOffsetProvider::parse(offset, zone)
                    .with_context(|| format!("Invalid utc_offset setting {offset:?}"))?;
                TimeNormalizer::detect(&provider)
            }
            None => TimeNormalizer::detect(&DateCommandOffsetProvider),
        };
        Ok(normalizer)
    }
}
