use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{PayrunError, Result};
use crate::resolver::MatchConfig;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Acceptable debit/credit drift from independent per-line rounding.
    #[serde(default = "default_balance_tolerance")]
    pub balance_tolerance: f64,
    #[serde(default = "default_word_match_min_len")]
    pub word_match_min_len: usize,
    #[serde(default = "default_loose_match_min_len")]
    pub loose_match_min_len: usize,
    /// Ledger entity stamped into SOURCEENTITY on every line.
    #[serde(default = "default_source_entity")]
    pub source_entity: String,
    /// Optional overrides file with manual code corrections.
    #[serde(default)]
    pub overrides_path: Option<String>,
}

fn default_balance_tolerance() -> f64 {
    0.02
}

fn default_word_match_min_len() -> usize {
    3
}

fn default_loose_match_min_len() -> usize {
    5
}

fn default_source_entity() -> String {
    "100".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            balance_tolerance: default_balance_tolerance(),
            word_match_min_len: default_word_match_min_len(),
            loose_match_min_len: default_loose_match_min_len(),
            source_entity: default_source_entity(),
            overrides_path: None,
        }
    }
}

impl Settings {
    pub fn match_config(&self) -> MatchConfig {
        MatchConfig {
            word_match_min_len: self.word_match_min_len,
            loose_match_min_len: self.loose_match_min_len,
        }
    }
}

fn config_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config")
        .join("payrun")
}

fn settings_path() -> PathBuf {
    config_dir().join("settings.json")
}

pub fn load_settings() -> Settings {
    let path = settings_path();
    if path.exists() {
        let content = std::fs::read_to_string(&path).unwrap_or_default();
        serde_json::from_str(&content).unwrap_or_default()
    } else {
        Settings::default()
    }
}

/// Manual corrections for known-bad source labels, layered on top of the
/// loaded reference table. Always win.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Overrides {
    #[serde(default)]
    pub locations: HashMap<String, String>,
    #[serde(default)]
    pub departments: HashMap<String, String>,
}

pub fn load_overrides(path: &Path) -> Result<Overrides> {
    let content = std::fs::read_to_string(path)?;
    serde_json::from_str(&content).map_err(|e| PayrunError::Settings(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_preserve_production_thresholds() {
        let s = Settings::default();
        assert_eq!(s.balance_tolerance, 0.02);
        assert_eq!(s.word_match_min_len, 3);
        assert_eq!(s.loose_match_min_len, 5);
        assert_eq!(s.source_entity, "100");
    }

    #[test]
    fn test_partial_settings_merge_with_defaults() {
        let json = r#"{"balance_tolerance": 0.05}"#;
        let s: Settings = serde_json::from_str(json).unwrap();
        assert_eq!(s.balance_tolerance, 0.05);
        assert_eq!(s.word_match_min_len, 3);
    }

    #[test]
    fn test_settings_roundtrip() {
        let s = Settings {
            balance_tolerance: 0.03,
            overrides_path: Some("/tmp/overrides.json".to_string()),
            ..Settings::default()
        };
        let json = serde_json::to_string_pretty(&s).unwrap();
        let loaded: Settings = serde_json::from_str(&json).unwrap();
        assert_eq!(loaded.balance_tolerance, 0.03);
        assert_eq!(loaded.overrides_path.as_deref(), Some("/tmp/overrides.json"));
    }

    #[test]
    fn test_load_overrides() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("overrides.json");
        std::fs::write(
            &path,
            r#"{"locations": {"Leasure Ops": "501"}, "departments": {}}"#,
        )
        .unwrap();
        let o = load_overrides(&path).unwrap();
        assert_eq!(o.locations.get("Leasure Ops").map(String::as_str), Some("501"));
        assert!(o.departments.is_empty());
    }

    #[test]
    fn test_load_overrides_rejects_bad_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("overrides.json");
        std::fs::write(&path, "not json").unwrap();
        assert!(load_overrides(&path).is_err());
    }
}
