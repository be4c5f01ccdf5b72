//! Plugin directory scanner
//!
//! Walks the configured plugin directories with bounded depth, classifies
//! candidate modules by format, and probes each candidate. A failed probe
//! quarantines the module instead of aborting the scan.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use chrono::Utc;
use minstrel_core::domain::paths::PathsConfig;
use minstrel_core::domain::plugin::PluginFormat;
use tracing::{debug, info};
use walkdir::WalkDir;

use crate::plugins::catalog::CatalogEntry;
use crate::plugins::probe::{stub_metadata, ModuleProber};

/// Directories to scan, one root per plugin format
#[derive(Debug, Clone)]
pub struct ScanConfig {
    pub roots: Vec<(PluginFormat, PathBuf)>,
    pub max_depth: usize,
}

impl ScanConfig {
    /// Build the scan roots from the configured directory layout
    pub fn from_paths(paths: &PathsConfig) -> Self {
        Self {
            roots: vec![
                (PluginFormat::Native, paths.plugin_dir.clone()),
                (PluginFormat::Vst, paths.vst_dir.clone()),
                (PluginFormat::Clap, paths.clap_dir.clone()),
                (PluginFormat::Ladspa, paths.ladspa_dir.clone()),
            ],
            max_depth: 4,
        }
    }
}

#[derive(Debug)]
pub struct ScanReport {
    pub entries: Vec<CatalogEntry>,
}

impl ScanReport {
    pub fn into_entries(self) -> Vec<CatalogEntry> {
        self.entries
    }
}

/// Scan all configured roots and probe every candidate module
pub fn scan_modules<P: ModuleProber>(config: &ScanConfig, prober: &P) -> ScanReport {
    let mut found: BTreeMap<PathBuf, CatalogEntry> = BTreeMap::new();

    for (format, root) in &config.roots {
        if !root.exists() {
            debug!(root = %root.display(), "Skipping missing plugin root");
            continue;
        }
        let walker = WalkDir::new(root).max_depth(config.max_depth).into_iter();
        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    if let Some(io) = err.io_error() {
                        debug!(root = %root.display(), error = %io, "Skipping unreadable entry");
                    }
                    continue;
                }
            };
            let Some(candidate) = classify_candidate(*format, entry.path()) else {
                continue;
            };
            if found.contains_key(&candidate) {
                continue;
            }
            let mut catalog_entry = match prober.probe(*format, &candidate) {
                Ok(metadata) => {
                    CatalogEntry::new(metadata.into_descriptor(*format, candidate.clone()))
                }
                Err(err) => {
                    debug!(
                        module = %candidate.display(),
                        error = %err,
                        "Probe failed, quarantining module"
                    );
                    let mut entry = CatalogEntry::new(
                        stub_metadata(*format, &candidate)
                            .into_descriptor(*format, candidate.clone()),
                    );
                    entry.mark_quarantined();
                    entry
                }
            };
            catalog_entry.last_seen = Utc::now();
            found.insert(candidate, catalog_entry);
        }
    }

    info!(count = found.len(), "Plugin scan finished");
    ScanReport {
        entries: found.into_values().collect(),
    }
}

/// Decide whether a path is a plugin module of the given format
///
/// Shared-library extensions classify through the root they were found
/// under; CLAP bundles may be directories.
fn classify_candidate(format: PluginFormat, path: &Path) -> Option<PathBuf> {
    let ext = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase());

    if path.is_file() {
        let ext = ext?;
        let matches = match format {
            PluginFormat::Native => ext == "mplug",
            PluginFormat::Vst => matches!(ext.as_str(), "vst" | "dll" | "so"),
            PluginFormat::Clap => ext == "clap",
            PluginFormat::Ladspa => matches!(ext.as_str(), "ladspa" | "dll" | "so"),
            PluginFormat::Stk => false,
        };
        return matches.then(|| path.to_path_buf());
    }

    if path.is_dir() && format == PluginFormat::Clap {
        let name = path.file_name().and_then(|name| name.to_str())?;
        if name.ends_with(".clap") {
            return Some(path.to_path_buf());
        }
    }
    None
}
