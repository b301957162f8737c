use log::{debug, error, info, warn};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::viewer::{
    DEFAULT_MIN_WIDTH, DEFAULT_PADDING, DEFAULT_RESIZE_QUIET_PERIOD, DEFAULT_SOURCE_KEY,
    SourceCatalog, ViewerConfig, ViewportSizing, default_sources,
};

pub const CURRENT_VERSION: u32 = 1;
const SETTINGS_FILENAME: &str = "config.yaml";
const APP_NAME: &str = "pageturn";

const SETTINGS_HEADER: &str = "\
# pageturn settings
#
# sources maps a logical key to a document path; default_source picks the
# document shown on startup. padding/min_width control how pages are fitted
# to the window width, resize_quiet_period_ms how long resizing must settle
# before the page is redrawn.
";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default = "default_version")]
    pub version: u32,

    #[serde(default = "default_source")]
    pub default_source: String,

    #[serde(default = "default_sources")]
    pub sources: BTreeMap<String, String>,

    #[serde(default = "default_padding")]
    pub padding: f32,

    #[serde(default = "default_min_width")]
    pub min_width: f32,

    #[serde(default = "default_resize_quiet_period_ms")]
    pub resize_quiet_period_ms: u64,
}

fn default_version() -> u32 {
    CURRENT_VERSION
}

fn default_source() -> String {
    DEFAULT_SOURCE_KEY.to_string()
}

fn default_padding() -> f32 {
    DEFAULT_PADDING
}

fn default_min_width() -> f32 {
    DEFAULT_MIN_WIDTH
}

fn default_resize_quiet_period_ms() -> u64 {
    DEFAULT_RESIZE_QUIET_PERIOD.as_millis() as u64
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            version: CURRENT_VERSION,
            default_source: default_source(),
            sources: default_sources(),
            padding: default_padding(),
            min_width: default_min_width(),
            resize_quiet_period_ms: default_resize_quiet_period_ms(),
        }
    }
}

impl Settings {
    /// Build the viewer configuration these settings describe
    #[must_use]
    pub fn viewer_config(&self) -> ViewerConfig {
        if !self.sources.contains_key(&self.default_source) {
            warn!(
                "Default source {:?} is not among the configured sources",
                self.default_source
            );
        }

        ViewerConfig {
            sizing: ViewportSizing {
                padding: self.padding.max(0.0),
                min_width: self.min_width.max(1.0),
            },
            resize_quiet_period: Duration::from_millis(self.resize_quiet_period_ms),
            catalog: SourceCatalog::new(self.sources.clone(), self.default_source.clone()),
        }
    }
}

pub fn preferred_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|config| config.join(APP_NAME).join(SETTINGS_FILENAME))
}

/// Load settings from `explicit` or the preferred config path.
///
/// A missing file is created with defaults; unreadable or invalid files are
/// logged and replaced by defaults in memory.
pub fn load_settings(explicit: Option<&Path>) -> Settings {
    let Some(path) = explicit.map(Path::to_path_buf).or_else(preferred_config_path) else {
        warn!("Could not determine config directory, using default settings");
        return Settings::default();
    };

    if !path.exists() {
        info!("Settings file not found, creating with defaults at {path:?}");
        let settings = Settings::default();
        save_settings_to_file(&settings, &path);
        return settings;
    }

    load_settings_from_path(&path)
}

pub fn load_settings_from_path(path: &Path) -> Settings {
    match fs::read_to_string(path) {
        Ok(content) => match serde_yaml::from_str::<Settings>(&content) {
            Ok(mut settings) => {
                debug!("Loaded settings from {path:?}");

                if settings.version < CURRENT_VERSION {
                    migrate_settings(&mut settings);
                    save_settings_to_file(&settings, path);
                }
                settings
            }
            Err(e) => {
                error!("Failed to parse settings file {path:?}: {e}");
                Settings::default()
            }
        },
        Err(e) => {
            error!("Failed to read settings file {path:?}: {e}");
            Settings::default()
        }
    }
}

fn migrate_settings(settings: &mut Settings) {
    info!(
        "Migrating settings from v{} to v{}",
        settings.version, CURRENT_VERSION
    );

    // Future migrations go here:
    // if settings.version < 2 {
    //     migrate_v1_to_v2(settings);
    // }

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

    let body = match serde_yaml::to_string(settings) {
        Ok(body) => body,
        Err(e) => {
            error!("Failed to serialize settings: {e}");
            return;
        }
    };

    match fs::write(path, format!("{SETTINGS_HEADER}{body}")) {
        Ok(()) => debug!("Saved settings to {path:?}"),
        Err(e) => error!("Failed to save settings to {path:?}: {e}"),
    }
}
