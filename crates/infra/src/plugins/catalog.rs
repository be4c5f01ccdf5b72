//! Persistent catalog of discovered plugin modules

use std::fs;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use minstrel_core::domain::plugin::PluginDescriptor;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read plugin catalog: {0}")]
    Read(#[from] std::io::Error),
    #[error("failed to parse plugin catalog: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("failed to create catalog directory: {0}")]
    CreateDir(std::io::Error),
    #[error("no config directory available")]
    NoConfigDir,
}

/// One catalogued plugin module
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub descriptor: PluginDescriptor,
    /// Set when probing the module failed; kept listed but flagged
    pub quarantined: bool,
    pub last_seen: DateTime<Utc>,
}

impl CatalogEntry {
    pub fn new(descriptor: PluginDescriptor) -> Self {
        Self {
            descriptor,
            quarantined: false,
            last_seen: Utc::now(),
        }
    }

    pub fn mark_quarantined(&mut self) {
        self.quarantined = true;
    }

    // identity is the module location; metadata (including the id) may
    // improve between sightings of the same file
    fn same_module(&self, other: &CatalogEntry) -> bool {
        self.descriptor.module_path == other.descriptor.module_path
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct CatalogData {
    plugins: Vec<CatalogEntry>,
}

/// JSON-backed plugin catalog
#[derive(Debug)]
pub struct PluginCatalog {
    path: PathBuf,
    data: Mutex<CatalogData>,
}

impl PluginCatalog {
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, CatalogError> {
        let path = path.into();
        let data = if path.exists() {
            let raw = fs::read_to_string(&path)?;
            serde_json::from_str(&raw)?
        } else {
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent).map_err(CatalogError::CreateDir)?;
            }
            CatalogData::default()
        };
        Ok(Self {
            path,
            data: Mutex::new(data),
        })
    }

    /// Default catalog location under the platform config directory
    ///
    /// Pure path computation; `open` creates the directory when needed.
    pub fn default_path() -> Result<PathBuf, CatalogError> {
        dirs::config_dir()
            .map(|dir| dir.join("minstrel").join("plugins.json"))
            .ok_or(CatalogError::NoConfigDir)
    }

    /// Insert or replace the entry for one module
    pub fn upsert(&self, entry: CatalogEntry) -> Result<(), CatalogError> {
        let mut data = self.data.lock();
        if let Some(existing) = data
            .plugins
            .iter_mut()
            .find(|plugin| plugin.same_module(&entry))
        {
            *existing = entry;
        } else {
            data.plugins.push(entry);
        }
        self.persist_locked(&data)
    }

    /// Merge a scan result into the catalog
    ///
    /// The newest sighting wins per module; the catalog ends up sorted
    /// newest-first, ties broken by display name.
    pub fn merge(&self, entries: Vec<CatalogEntry>) -> Result<(), CatalogError> {
        let mut data = self.data.lock();
        for entry in entries {
            if let Some(existing) = data
                .plugins
                .iter_mut()
                .find(|plugin| plugin.same_module(&entry))
            {
                if entry.last_seen > existing.last_seen {
                    *existing = entry;
                }
            } else {
                data.plugins.push(entry);
            }
        }
        data.plugins.sort_by(|a, b| {
            b.last_seen
                .cmp(&a.last_seen)
                .then_with(|| a.descriptor.display_name.cmp(&b.descriptor.display_name))
        });
        self.persist_locked(&data)
    }

    pub fn entries(&self) -> Vec<CatalogEntry> {
        self.data.lock().plugins.clone()
    }

    fn persist_locked(&self, data: &CatalogData) -> Result<(), CatalogError> {
        let json = serde_json::to_string_pretty(data)?;
        fs::write(&self.path, json)?;
        Ok(())
    }
}
