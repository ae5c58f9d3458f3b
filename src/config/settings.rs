//! Configuration settings for Symposium.

use crate::error::{Result, SymposiumError};
use crate::sync::{
    PhraseConfig, SyncOptions, DEFAULT_HEADING_MAX_WORDS, DEFAULT_ORPHAN_MAX_WORDS,
    DEFAULT_PHRASE_GAP_MS,
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Root configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct Settings {
    pub general: GeneralSettings,
    pub api: ApiSettings,
    pub sync: SyncSettings,
    pub player: PlayerSettings,
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct GeneralSettings {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            log_level: "warn".to_string(),
        }
    }
}

/// Backend connection settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ApiSettings {
    /// Base URL of the Symposium backend (without the `/api` prefix).
    pub base_url: String,
    /// Request timeout in seconds.
    pub timeout_seconds: u64,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            timeout_seconds: 30,
        }
    }
}

impl ApiSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

/// Transcript synchronization settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SyncSettings {
    /// Silence gap (ms) that separates one phrase from the next.
    pub phrase_gap_ms: f64,
    /// Groups with at most this many words are merged into their predecessor.
    pub orphan_max_words: usize,
    /// Paragraphs with fewer words than this (and no trailing period) are headings.
    pub heading_max_words: usize,
    /// Offset (ms) between the audio clock and the timing data.
    pub sync_offset_ms: f64,
}

impl Default for SyncSettings {
    fn default() -> Self {
        Self {
            phrase_gap_ms: DEFAULT_PHRASE_GAP_MS,
            orphan_max_words: DEFAULT_ORPHAN_MAX_WORDS,
            heading_max_words: DEFAULT_HEADING_MAX_WORDS,
            sync_offset_ms: 0.0,
        }
    }
}

impl SyncSettings {
    /// Phrase grouping parameters derived from these settings.
    pub fn phrase_config(&self) -> PhraseConfig {
        PhraseConfig {
            gap_ms: self.phrase_gap_ms,
            orphan_max_words: self.orphan_max_words,
        }
    }

    pub fn sync_options(&self) -> SyncOptions {
        SyncOptions {
            phrase: self.phrase_config(),
            offset_ms: self.sync_offset_ms,
        }
    }
}

/// Terminal player settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PlayerSettings {
    /// Skip distance for the back/forward buttons, in seconds.
    pub skip_seconds: f64,
    /// Interval between frame ticks in milliseconds.
    pub frame_interval_ms: u64,
}

impl Default for PlayerSettings {
    fn default() -> Self {
        Self {
            skip_seconds: 15.0,
            frame_interval_ms: 16,
        }
    }
}

impl PlayerSettings {
    pub fn frame_interval(&self) -> Duration {
        Duration::from_millis(self.frame_interval_ms.max(1))
    }
}

impl Settings {
    /// Load settings from a specific path, or default location if None.
    pub fn load_from(path: Option<&PathBuf>) -> Result<Self> {
        let config_path = match path {
            Some(p) => p.clone(),
            None => Self::default_config_path(),
        };

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let settings: Settings = toml::from_str(&content)?;
            Ok(settings)
        } else {
            Ok(Settings::default())
        }
    }

    /// Save settings to a specific path.
    pub fn save_to(&self, path: &PathBuf) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content =
            toml::to_string_pretty(self).map_err(|e| SymposiumError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Get the default configuration file path.
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("symposium")
            .join("config.toml")
    }

    /// Expand shell variables in paths (e.g., ~).
    pub fn expand_path(path: &str) -> PathBuf {
        PathBuf::from(shellexpand::tilde(path).to_string())
    }

    /// Set a value by dotted key (e.g. `sync.phrase_gap_ms`).
    ///
    /// The new value is parsed against the type of the existing entry, so
    /// `player.skip_seconds = "abc"` is rejected rather than stored as text.
    pub fn set_value(&mut self, key: &str, value: &str) -> Result<()> {
        let (section, field) = key
            .split_once('.')
            .ok_or_else(|| {
                SymposiumError::Config(format!("Expected <section>.<key>, got '{}'", key))
            })?;

        let mut root = toml::Value::try_from(&*self)
            .map_err(|e| SymposiumError::Config(e.to_string()))?;

        let entry = root
            .get_mut(section)
            .and_then(|s| s.get_mut(field))
            .ok_or_else(|| SymposiumError::Config(format!("Unknown configuration key: {}", key)))?;

        *entry = parse_like(entry, value)
            .ok_or_else(|| {
                SymposiumError::Config(format!("Invalid value for {}: {}", key, value))
            })?;

        *self = root
            .try_into()
            .map_err(|e: toml::de::Error| SymposiumError::Config(e.to_string()))?;
        Ok(())
    }
}

/// Parse `raw` into a TOML value of the same kind as `existing`.
fn parse_like(existing: &toml::Value, raw: &str) -> Option<toml::Value> {
    match existing {
        toml::Value::String(_) => Some(toml::Value::String(raw.to_string())),
        toml::Value::Integer(_) => raw.parse().ok().map(toml::Value::Integer),
        toml::Value::Float(_) => raw.parse().ok().map(toml::Value::Float),
        toml::Value::Boolean(_) => raw.parse().ok().map(toml::Value::Boolean),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_sync_constants() {
        let settings = Settings::default();
        assert_eq!(settings.sync.phrase_gap_ms, 80.0);
        assert_eq!(settings.sync.orphan_max_words, 2);
        assert_eq!(settings.sync.heading_max_words, 10);
        assert_eq!(settings.sync.phrase_config(), PhraseConfig::default());
        assert_eq!(settings.sync.sync_options(), SyncOptions::default());
        assert_eq!(settings.player.skip_seconds, 15.0);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let settings: Settings = toml::from_str("[sync]\nphrase_gap_ms = 120.0\n").unwrap();
        assert_eq!(settings.sync.phrase_gap_ms, 120.0);
        assert_eq!(settings.sync.orphan_max_words, 2);
        assert_eq!(settings.api, ApiSettings::default());
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut settings = Settings::default();
        settings.api.base_url = "http://symposium.test".to_string();
        settings.save_to(&path).unwrap();

        let loaded = Settings::load_from(Some(&path)).unwrap();
        assert_eq!(loaded, settings);
    }

    #[test]
    fn test_missing_file_is_default() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.toml");
        assert_eq!(Settings::load_from(Some(&path)).unwrap(), Settings::default());
    }

    #[test]
    fn test_set_value() {
        let mut settings = Settings::default();
        settings.set_value("sync.orphan_max_words", "3").unwrap();
        settings.set_value("api.base_url", "http://example.org").unwrap();
        settings.set_value("player.skip_seconds", "10").unwrap();

        assert_eq!(settings.sync.orphan_max_words, 3);
        assert_eq!(settings.api.base_url, "http://example.org");
        assert_eq!(settings.player.skip_seconds, 10.0);
    }

    #[test]
    fn test_set_value_rejects_bad_input() {
        let mut settings = Settings::default();
        assert!(settings.set_value("sync", "1").is_err());
        assert!(settings.set_value("sync.nope", "1").is_err());
        assert!(settings.set_value("sync.orphan_max_words", "many").is_err());
        assert_eq!(settings, Settings::default());
    }
}
