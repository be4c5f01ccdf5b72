//! Domain entities and business rules

pub mod config;
pub mod paths;
pub mod plugin;
pub mod settings;

// Re-export specific items to avoid ambiguous glob imports
pub use config::{ConfigError, ConfigManager, DirWatcher, MinstrelConfig, RECENT_PROJECTS_CAP};
pub use paths::{
    PathsConfig, DEFAULT_THEME_PATH, LOCALE_PATH, PRESETS_PATH, PROJECTS_PATH, SAMPLES_PATH,
    TRACK_ICON_PATH,
};
pub use plugin::{
    PluginDescriptor, PluginError, PluginFormat, PluginKind, SubPluginDescription,
    SubPluginFeatures, SubPluginKey,
};
pub use settings::{SettingsClass, SettingsStore};
