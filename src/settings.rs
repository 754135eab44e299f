use log::{LevelFilter, debug, error, info, warn};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::geometry::ScreenSize;

pub const CURRENT_VERSION: u32 = 1;
const SETTINGS_FILENAME: &str = "config.yaml";
const APP_NAME: &str = "pageport";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default = "default_version")]
    pub version: u32,

    #[serde(default = "default_screen_width")]
    pub screen_width: u32,

    #[serde(default = "default_screen_height")]
    pub screen_height: u32,

    /// Load and store `<document>.ini` view settings
    #[serde(default = "default_true")]
    pub remember_view: bool,

    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_true() -> bool {
    true
}

fn default_version() -> u32 {
    CURRENT_VERSION
}

fn default_screen_width() -> u32 {
    600
}

fn default_screen_height() -> u32 {
    800
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            version: CURRENT_VERSION,
            screen_width: default_screen_width(),
            screen_height: default_screen_height(),
            remember_view: true,
            log_level: default_log_level(),
        }
    }
}

impl Settings {
    pub fn screen(&self) -> ScreenSize {
        ScreenSize::new(self.screen_width.max(1), self.screen_height.max(1))
    }

    pub fn log_level_filter(&self) -> LevelFilter {
        self.log_level.parse().unwrap_or_else(|_| {
            warn!("Unknown log level {:?}, using info", self.log_level);
            LevelFilter::Info
        })
    }
}

pub fn preferred_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|config| config.join(APP_NAME).join(SETTINGS_FILENAME))
}

/// Read settings from `path`, writing the defaults there if it does not exist
/// yet. An unreadable file is logged and the defaults are used.
pub fn load_settings(path: &Path) -> Settings {
    if !path.exists() {
        info!("Settings file not found, creating with defaults at {path:?}");
        let settings = Settings::default();
        save_settings_to_file(&settings, path);
        return settings;
    }
    load_settings_from_path(path).unwrap_or_default()
}

fn load_settings_from_path(path: &Path) -> Option<Settings> {
    match fs::read_to_string(path) {
        Ok(content) => match serde_yaml::from_str::<Settings>(&content) {
            Ok(mut settings) => {
                debug!("Loaded settings from {path:?}");

                if settings.version < CURRENT_VERSION {
                    migrate_settings(&mut settings);
                    save_settings_to_file(&settings, path);
                }
                Some(settings)
            }
            Err(e) => {
                error!("Failed to parse settings file {path:?}: {e}");
                None
            }
        },
        Err(e) => {
            error!("Failed to read settings file {path:?}: {e}");
            None
        }
    }
}

fn migrate_settings(settings: &mut Settings) {
    info!(
        "Migrating settings from v{} to v{}",
        settings.version, CURRENT_VERSION
    );
    settings.version = CURRENT_VERSION;
}

pub fn save_settings_to_file(settings: &Settings, path: &Path) {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            if let Err(e) = fs::create_dir_all(parent) {
                error!("Failed to create config directory {parent:?}: {e}");
                return;
            }
        }
    }

    let content = generate_settings_yaml(settings);

    match fs::write(path, content) {
        Ok(()) => debug!("Saved settings to {path:?}"),
        Err(e) => error!("Failed to save settings to {path:?}: {e}"),
    }
}

fn generate_settings_yaml(settings: &Settings) -> String {
    let mut content = String::new();

    content.push_str(&format!("version: {}\n", settings.version));
    content.push_str("# Device screen in pixels\n");
    content.push_str(&format!("screen_width: {}\n", settings.screen_width));
    content.push_str(&format!("screen_height: {}\n", settings.screen_height));
    content.push_str("# Keep zoom, shifts and position per document in <document>.ini\n");
    content.push_str(&format!("remember_view: {}\n", settings.remember_view));
    content.push_str("# off, error, warn, info, debug or trace\n");
    content.push_str(&format!("log_level: \"{}\"\n", settings.log_level));

    content
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_file_is_created_with_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join(SETTINGS_FILENAME);

        let settings = load_settings(&path);
        assert_eq!(settings, Settings::default());
        assert!(path.exists());
        assert_eq!(load_settings(&path), Settings::default());
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(SETTINGS_FILENAME);
        fs::write(&path, "version: 1\nscreen_width: 758\nlog_level: debug\n").unwrap();

        let settings = load_settings(&path);
        assert_eq!(settings.screen(), ScreenSize::new(758, 800));
        assert!(settings.remember_view);
        assert_eq!(settings.log_level_filter(), LevelFilter::Debug);
    }

    #[test]
    fn old_version_is_migrated_and_rewritten() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(SETTINGS_FILENAME);
        fs::write(&path, "version: 0\nremember_view: false\n").unwrap();

        let settings = load_settings(&path);
        assert_eq!(settings.version, CURRENT_VERSION);
        assert!(!settings.remember_view);

        let rewritten = fs::read_to_string(&path).unwrap();
        assert!(rewritten.starts_with(&format!("version: {CURRENT_VERSION}\n")));
    }

    #[test]
    fn unparsable_file_falls_back_to_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(SETTINGS_FILENAME);
        fs::write(&path, "screen_width: [not a number\n").unwrap();

        assert_eq!(load_settings(&path), Settings::default());
    }

    #[test]
    fn generated_yaml_parses_back() {
        let settings = Settings {
            screen_width: 1072,
            screen_height: 1448,
            remember_view: false,
            log_level: "trace".to_string(),
            ..Settings::default()
        };
        let parsed: Settings = serde_yaml::from_str(&generate_settings_yaml(&settings)).unwrap();
        assert_eq!(parsed, settings);
    }

    #[test]
    fn bad_log_level_means_info() {
        let settings = Settings {
            log_level: "loud".to_string(),
            ..Settings::default()
        };
        assert_eq!(settings.log_level_filter(), LevelFilter::Info);
    }
}
