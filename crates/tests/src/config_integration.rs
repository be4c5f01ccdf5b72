//! Integration tests for the configuration and plugin catalog layers
//!
//! These tests exercise the full flow a running application goes through:
//! load configuration, point the plugin directories at real filesystem
//! locations, scan them, persist the catalog, and enumerate sub-plugins.

use std::fs::{create_dir_all, File};
use std::io::Write;
use std::path::Path;

use minstrel_core::domain::config::{ConfigManager, MinstrelConfig};
use minstrel_core::domain::plugin::{PluginFormat, SubPluginFeatures};
use minstrel_infra::plugins::{
    scan_modules, CatalogEntry, ManifestProber, PluginCatalog, ScanConfig, VstModuleFeatures,
};
use tempfile::TempDir;

fn write_manifest(path: &Path, json: serde_json::Value) {
    let mut file = File::create(path).unwrap();
    write!(file, "{}", json).unwrap();
}

/// Set up a fake plugin installation: one multi-instrument VST module,
/// one plain module, one broken manifest.
fn populate_vst_dir(vst_dir: &Path) {
    create_dir_all(vst_dir).unwrap();

    File::create(vst_dir.join("Orchestra.vst")).unwrap();
    write_manifest(
        &vst_dir.join("Orchestra.manifest.json"),
        serde_json::json!({
            "id": "acme.orchestra",
            "name": "Acme Orchestra",
            "vendor": "Acme",
            "kind": "instrument",
            "subplugins": [
                { "id": "violin", "name": "Violin" },
                { "id": "cello", "name": "Cello" },
                { "id": "flute", "name": "Flute" }
            ]
        }),
    );

    File::create(vst_dir.join("Chorus.vst")).unwrap();

    File::create(vst_dir.join("Corrupt.vst")).unwrap();
    std::fs::write(vst_dir.join("Corrupt.manifest.json"), "{ broken").unwrap();
}

#[tokio::test]
async fn full_config_and_scan_flow() {
    let root = TempDir::new().unwrap();
    let vst_dir = root.path().join("plugins/vst");
    populate_vst_dir(&vst_dir);

    // configure and persist
    let manager = ConfigManager::new(root.path().join("config"));
    let mut config = manager.load().await;
    config.paths.set_working_dir(root.path().join("work"));
    config.paths.set_vst_dir(&vst_dir);
    config.settings.set_value("browser", "show_quarantined", "yes");
    config.add_recent_project(root.path().join("work/projects/demo.mmp"));
    manager.save(&config).await.unwrap();

    // a reload sees the same state
    let config = manager.load().await;
    assert_eq!(config.paths.vst_dir, vst_dir);
    assert_eq!(config.settings.value("browser", "show_quarantined"), "yes");
    assert_eq!(config.recent_projects().len(), 1);

    // scan only the configured vst dir (the other roots don't exist here)
    let mut scan_config = ScanConfig::from_paths(&config.paths);
    scan_config.roots.retain(|(format, _)| *format == PluginFormat::Vst);
    let report = scan_modules(&scan_config, &ManifestProber);
    assert_eq!(report.entries.len(), 3);

    // persist the scan and reopen the catalog
    let catalog_path = root.path().join("config/plugins.json");
    let catalog = PluginCatalog::open(&catalog_path).unwrap();
    catalog.merge(report.into_entries()).unwrap();

    let reopened = PluginCatalog::open(&catalog_path).unwrap();
    let entries = reopened.entries();
    assert_eq!(entries.len(), 3);
    assert_eq!(
        entries.iter().filter(|entry| entry.quarantined).count(),
        1,
        "exactly the corrupt module is quarantined"
    );

    // enumerate sub-plugins of the multi-instrument module
    let orchestra = entries
        .iter()
        .find(|entry| entry.descriptor.id == "acme.orchestra")
        .unwrap();
    let features = VstModuleFeatures::new();
    let keys = features
        .list_sub_plugin_keys(&orchestra.descriptor)
        .unwrap();
    assert_eq!(keys.len(), 3);

    for key in &keys {
        let description = features.describe(key).unwrap();
        assert_eq!(description.vendor.as_deref(), Some("Acme"));
    }
}

#[tokio::test]
async fn rescan_updates_catalog_instead_of_duplicating() {
    let root = TempDir::new().unwrap();
    let vst_dir = root.path().join("vst");
    create_dir_all(&vst_dir).unwrap();
    File::create(vst_dir.join("Synth.vst")).unwrap();

    let scan_config = ScanConfig {
        roots: vec![(PluginFormat::Vst, vst_dir.clone())],
        max_depth: 4,
    };
    let catalog = PluginCatalog::open(root.path().join("plugins.json")).unwrap();

    let first: Vec<CatalogEntry> = scan_modules(&scan_config, &ManifestProber).into_entries();
    catalog.merge(first).unwrap();
    assert_eq!(catalog.entries().len(), 1);

    // a manifest appears between scans; the rescan refreshes, not duplicates
    write_manifest(
        &vst_dir.join("Synth.manifest.json"),
        serde_json::json!({ "id": "Synth.vst", "name": "Named Synth" }),
    );
    let second: Vec<CatalogEntry> = scan_modules(&scan_config, &ManifestProber).into_entries();
    catalog.merge(second).unwrap();

    let entries = catalog.entries();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].descriptor.display_name, "Named Synth");
}

#[tokio::test]
async fn recent_projects_survive_reload_in_order() {
    let root = TempDir::new().unwrap();
    let manager = ConfigManager::new(root.path().to_path_buf());

    let mut config = MinstrelConfig::factory_default();
    config.add_recent_project("/songs/first.mmp");
    config.add_recent_project("/songs/second.mmp");
    config.add_recent_project("/songs/first.mmp");
    manager.save(&config).await.unwrap();

    let loaded = manager.load().await;
    let recent: Vec<_> = loaded
        .recent_projects()
        .iter()
        .map(|p| p.display().to_string())
        .collect();
    assert_eq!(recent, vec!["/songs/first.mmp", "/songs/second.mmp"]);
}
