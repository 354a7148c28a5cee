//! User settings stored as settings.json in the app data directory

use crate::constants::{DEFAULT_EG_MODS_DIR, DEFAULT_MODS_DIR, DEFAULT_WORKSHOP_DIR};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info, warn};

const SETTINGS_FILE: &str = "settings.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // Window geometry
    pub window_x: Option<f32>,
    pub window_y: Option<f32>,
    pub window_w: Option<f32>,
    pub window_h: Option<f32>,

    // Paths
    pub workshop_dir: String,
    pub mods_dir: String,
    /// Mods folder used while Epic Games mode is on
    pub eg_mods_dir: String,

    // Options
    pub eg_mode: bool,
    pub use_symlinks: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            window_x: None,
            window_y: None,
            window_w: None,
            window_h: None,
            workshop_dir: DEFAULT_WORKSHOP_DIR.to_string(),
            mods_dir: DEFAULT_MODS_DIR.to_string(),
            eg_mods_dir: DEFAULT_EG_MODS_DIR.to_string(),
            eg_mode: false,
            use_symlinks: false,
        }
    }
}

impl Settings {
    /// Load settings, writing a fresh defaults file when none exists or it can't be parsed.
    pub fn load(data_dir: &Path) -> Self {
        let path = data_dir.join(SETTINGS_FILE);
        match std::fs::read_to_string(&path) {
            Ok(s) => match Self::parse(&s) {
                Ok(settings) => {
                    debug!(path = %path.display(), "Settings loaded");
                    settings
                }
                Err(e) => {
                    warn!(error = %e, "Failed to parse settings, using defaults");
                    let settings = Self::default();
                    settings.save(data_dir);
                    settings
                }
            },
            Err(_) => {
                info!(path = %path.display(), "No settings file found, creating defaults");
                let settings = Self::default();
                settings.save(data_dir);
                settings
            }
        }
    }

    /// Only a JSON object counts; serde would otherwise accept an array filled by position.
    fn parse(s: &str) -> Result<Self, serde_json::Error> {
        match serde_json::from_str::<serde_json::Value>(s)? {
            value @ serde_json::Value::Object(_) => serde_json::from_value(value),
            _ => Err(serde::de::Error::custom("settings file is not a JSON object")),
        }
    }

    pub fn save(&self, data_dir: &Path) {
        let path = data_dir.join(SETTINGS_FILE);
        match serde_json::to_string_pretty(self) {
            Ok(json) => {
                if let Err(e) = std::fs::write(&path, json) {
                    warn!(error = %e, "Failed to save settings");
                }
            }
            Err(e) => warn!(error = %e, "Failed to serialize settings"),
        }
    }

    /// Mods folder for the current loader mode
    pub fn active_mods_dir(&self) -> &str {
        if self.eg_mode {
            &self.eg_mods_dir
        } else {
            &self.mods_dir
        }
    }

    pub fn active_mods_dir_mut(&mut self) -> &mut String {
        if self.eg_mode {
            &mut self.eg_mods_dir
        } else {
            &mut self.mods_dir
        }
    }

    pub fn set_active_mods_dir(&mut self, path: impl Into<String>) {
        *self.active_mods_dir_mut() = path.into();
    }

    /// Built-in mods folder for the current loader mode
    pub fn default_mods_dir(&self) -> &'static str {
        if self.eg_mode {
            DEFAULT_EG_MODS_DIR
        } else {
            DEFAULT_MODS_DIR
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn missing_file_creates_defaults() {
        let tmp = tempdir().unwrap();
        let settings = Settings::load(tmp.path());
        assert_eq!(settings, Settings::default());
        assert!(tmp.path().join(SETTINGS_FILE).is_file());
    }

    #[test]
    fn garbage_file_is_replaced_with_defaults() {
        let tmp = tempdir().unwrap();
        std::fs::write(tmp.path().join(SETTINGS_FILE), "[1, 2, 3]").unwrap();
        let settings = Settings::load(tmp.path());
        assert_eq!(settings, Settings::default());

        let reloaded = Settings::load(tmp.path());
        assert_eq!(reloaded, Settings::default());
    }

    #[test]
    fn non_object_json_is_rejected() {
        for text in ["[1, 2, 3]", "42", "\"mods\"", "null", "{ not json"] {
            assert!(Settings::parse(text).is_err(), "{text} should not parse");
        }
        assert!(Settings::parse("{}").is_ok());
    }

    #[test]
    fn array_file_is_rewritten_as_object() {
        let tmp = tempdir().unwrap();
        let path = tmp.path().join(SETTINGS_FILE);
        std::fs::write(&path, "[1, 2, 3]").unwrap();
        Settings::load(tmp.path());

        let written: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert!(written.is_object());
        assert_eq!(written["window_x"], serde_json::Value::Null);
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let tmp = tempdir().unwrap();
        std::fs::write(
            tmp.path().join(SETTINGS_FILE),
            r#"{ "workshop_dir": "/games/workshop", "use_symlinks": true }"#,
        )
        .unwrap();
        let settings = Settings::load(tmp.path());
        assert_eq!(settings.workshop_dir, "/games/workshop");
        assert!(settings.use_symlinks);
        assert_eq!(settings.mods_dir, DEFAULT_MODS_DIR);
        assert!(!settings.eg_mode);
    }

    #[test]
    fn save_then_load_keeps_user_edits() {
        let tmp = tempdir().unwrap();
        let mut settings = Settings::default();
        settings.eg_mode = true;
        settings.set_active_mods_dir("/epic/mods");
        settings.save(tmp.path());

        let loaded = Settings::load(tmp.path());
        assert_eq!(loaded.eg_mods_dir, "/epic/mods");
        assert_eq!(loaded.mods_dir, DEFAULT_MODS_DIR);
        assert_eq!(loaded.active_mods_dir(), "/epic/mods");
    }

    #[test]
    fn active_mods_dir_follows_mode() {
        let mut settings = Settings::default();
        assert_eq!(settings.active_mods_dir(), DEFAULT_MODS_DIR);
        settings.eg_mode = true;
        assert_eq!(settings.active_mods_dir(), DEFAULT_EG_MODS_DIR);
        assert_eq!(settings.default_mods_dir(), DEFAULT_EG_MODS_DIR);
    }
}
