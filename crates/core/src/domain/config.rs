//! Configuration management for Minstrel
//!
//! This module provides:
//! - The main configuration document (paths, settings store, recent projects)
//! - TOML persistence with factory-default and corrupt-file fallback
//! - A directory watcher for reload/rescan notifications

use crate::domain::paths::PathsConfig;
use crate::domain::settings::SettingsStore;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::fs;
use tokio::sync::broadcast;
use tracing::{debug, error, info, instrument};

pub type Result<T> = std::result::Result<T, ConfigError>;

/// Upper bound on the recently-opened-projects history
pub const RECENT_PROJECTS_CAP: usize = 30;

/// Errors that can occur during configuration operations
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML serialization error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    #[error("File watch error: {0}")]
    WatchError(#[from] notify::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Complete Minstrel configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MinstrelConfig {
    /// Recently opened project files, most recent first
    ///
    /// Kept before the sub-tables so the TOML document serializes with
    /// top-level values first.
    pub recent_projects: Vec<PathBuf>,

    pub paths: PathsConfig,

    pub settings: SettingsStore,
}

impl MinstrelConfig {
    /// Load configuration from TOML file
    #[instrument(skip(path))]
    pub async fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        info!(path = %path.display(), "Loading configuration");

        let contents = fs::read_to_string(path).await?;
        let config: Self = toml::from_str(&contents)?;

        debug!("Configuration loaded successfully");
        Ok(config)
    }

    /// Save configuration to TOML file
    #[instrument(skip(self, path))]
    pub async fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        info!(path = %path.display(), "Saving configuration");

        // Create parent directory if it doesn't exist
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }

        let toml_str = toml::to_string_pretty(self)?;
        fs::write(path, toml_str).await?;

        debug!("Configuration saved successfully");
        Ok(())
    }

    /// Create factory default configuration
    pub fn factory_default() -> Self {
        let mut config = Self::default();
        config.settings.set_value("app", "language", "en");
        config.settings.set_value("app", "theme", "default");
        config
    }

    /// Recently opened project files, most recent first
    pub fn recent_projects(&self) -> &[PathBuf] {
        &self.recent_projects
    }

    /// Record a project file as most recently opened
    ///
    /// An already listed file moves to the front instead of duplicating;
    /// the history is truncated to [`RECENT_PROJECTS_CAP`] entries.
    pub fn add_recent_project(&mut self, file: impl Into<PathBuf>) {
        let file = file.into();
        self.recent_projects.retain(|entry| entry != &file);
        self.recent_projects.insert(0, file);
        self.recent_projects.truncate(RECENT_PROJECTS_CAP);
    }
}

/// Configuration manager for the main Minstrel config
///
/// Manages the configuration file at `~/.config/minstrel/minstrel.toml`,
/// explicitly constructed and passed by reference to the components that
/// need it.
pub struct ConfigManager {
    config_dir: PathBuf,
    config_path: PathBuf,
}

impl ConfigManager {
    /// Create a new ConfigManager rooted at the given configuration directory
    pub fn new(config_dir: PathBuf) -> Self {
        let config_path = config_dir.join("minstrel.toml");

        Self {
            config_dir,
            config_path,
        }
    }

    /// Get the default config directory path
    ///
    /// Returns `~/.config/minstrel` on Linux/Mac
    /// Returns `%APPDATA%\minstrel` on Windows
    pub fn default_config_dir() -> Result<PathBuf> {
        dirs::config_dir()
            .map(|p| p.join("minstrel"))
            .ok_or_else(|| ConfigError::Invalid("Could not determine config directory".to_string()))
    }

    /// Get the config file path
    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    /// Load configuration from file
    ///
    /// If the config file doesn't exist, returns factory default and
    /// persists it. If the config file is corrupt, backs up the broken
    /// file and returns factory default.
    #[instrument(skip(self))]
    pub async fn load(&self) -> MinstrelConfig {
        if !self.config_path.exists() {
            info!(
                path = %self.config_path.display(),
                "Config file not found, creating factory default"
            );

            let config = MinstrelConfig::factory_default();

            // Save the factory default for next time
            if let Err(e) = config.save_to_file(&self.config_path).await {
                error!(
                    path = %self.config_path.display(),
                    error = %e,
                    "Failed to save factory default config"
                );
            }

            return config;
        }

        match MinstrelConfig::load_from_file(&self.config_path).await {
            Ok(config) => {
                info!(
                    path = %self.config_path.display(),
                    "Configuration loaded successfully"
                );
                config
            }
            Err(e) => {
                error!(
                    path = %self.config_path.display(),
                    error = %e,
                    "Failed to load config, using factory default"
                );

                // Backup the corrupt config
                let backup_path = self.config_path.with_extension("toml.corrupt");
                if let Err(copy_err) = fs::copy(&self.config_path, &backup_path).await {
                    error!(
                        path = %backup_path.display(),
                        error = %copy_err,
                        "Failed to backup corrupt config"
                    );
                }

                MinstrelConfig::factory_default()
            }
        }
    }

    /// Save configuration to file
    #[instrument(skip(self, config))]
    pub async fn save(&self, config: &MinstrelConfig) -> Result<()> {
        // Create config directory if it doesn't exist
        fs::create_dir_all(&self.config_dir).await?;

        config.save_to_file(&self.config_path).await
    }

    /// Clear configuration (delete config file)
    #[instrument(skip(self))]
    pub async fn clear(&self) -> Result<()> {
        if self.config_path.exists() {
            fs::remove_file(&self.config_path).await?;
            info!(
                path = %self.config_path.display(),
                "Configuration cleared"
            );
        }

        Ok(())
    }

    /// Check if config file exists
    pub fn exists(&self) -> bool {
        self.config_path.exists()
    }
}

/// File system watcher for reload/rescan notifications
///
/// Watches a set of directories (the config directory, plugin directories)
/// and broadcasts the paths of created or modified files whose extension
/// is in the watched set.
pub struct DirWatcher {
    _watcher: notify::RecommendedWatcher,
    change_tx: broadcast::Sender<PathBuf>,
}

impl DirWatcher {
    /// Create a new watcher over the given directories
    ///
    /// Directories that don't exist yet are created. An empty extension
    /// list forwards every created/modified file.
    pub async fn new(dirs: Vec<PathBuf>, extensions: Vec<String>) -> Result<Self> {
        use notify::Watcher;

        let (change_tx, _change_rx) = broadcast::channel(32);

        for dir in &dirs {
            fs::create_dir_all(dir).await?;
        }

        let tx_clone = change_tx.clone();
        let mut watcher = notify::recommended_watcher(move |res: notify::Result<notify::Event>| {
            if let Ok(event) = res {
                if matches!(
                    event.kind,
                    notify::EventKind::Create(_) | notify::EventKind::Modify(_)
                ) {
                    for path in event.paths {
                        let matches_ext = extensions.is_empty()
                            || path
                                .extension()
                                .and_then(|e| e.to_str())
                                .map(|e| extensions.iter().any(|want| want == e))
                                .unwrap_or(false);
                        if matches_ext {
                            if let Err(e) = tx_clone.send(path) {
                                error!("Failed to send change event: {}", e);
                            }
                        }
                    }
                }
            }
        })?;

        for dir in &dirs {
            watcher.watch(dir, notify::RecursiveMode::Recursive)?;
            info!(path = %dir.display(), "Watching directory");
        }

        Ok(Self {
            _watcher: watcher,
            change_tx,
        })
    }

    /// Subscribe to change events
    pub fn subscribe(&self) -> broadcast::Receiver<PathBuf> {
        self.change_tx.subscribe()
    }
}
