use bracket_engine::dealer::DEFAULT_DEAL_DELAY;
use log::{LevelFilter, warn};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

pub const BRACKET_JSON_VAR: &str = "DEALTUI_BRACKET_JSON";
pub const DEAL_MS_VAR: &str = "DEALTUI_DEAL_MS";
pub const LOG_VAR: &str = "DEALTUI_LOG";

#[derive(Debug, Clone)]
pub struct AppSettings {
    pub full_screen: bool,
    pub log_level: Option<LevelFilter>,
    /// Bracket document to load; the embedded sample when unset.
    pub bracket_path: Option<PathBuf>,
    pub deal_delay: Duration,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            full_screen: false,
            log_level: None,
            bracket_path: None,
            deal_delay: DEFAULT_DEAL_DELAY,
        }
    }
}

impl AppSettings {
    pub fn load() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build settings from any key lookup. Blank values count as unset;
    /// unparsable ones fall back to the default with a warning.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let mut settings = Self::default();

        settings.bracket_path = get(BRACKET_JSON_VAR).map(PathBuf::from);

        if let Some(raw) = get(DEAL_MS_VAR) {
            match raw.parse::<u64>() {
                Ok(ms) => settings.deal_delay = Duration::from_millis(ms),
                Err(e) => warn!("ignoring {DEAL_MS_VAR}={raw}: {e}"),
            }
        }

        if let Some(raw) = get(LOG_VAR) {
            match LevelFilter::from_str(&raw) {
                Ok(level) => settings.log_level = Some(level),
                Err(e) => warn!("ignoring {LOG_VAR}={raw}: {e}"),
            }
        }

        settings
    }
}
