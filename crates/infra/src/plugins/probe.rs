//! Module metadata probing
//!
//! Modules are described by a `manifest.json` placed beside or inside the
//! binary. Probing never loads the module itself; a missing manifest
//! yields stub metadata derived from the file name.

use std::fs;
use std::path::{Path, PathBuf};

use minstrel_core::domain::plugin::{PluginDescriptor, PluginFormat, PluginKind};
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid manifest: {0}")]
    Manifest(#[from] serde_json::Error),
}

/// Metadata for one sub-plugin listed in a module manifest
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubPluginMeta {
    pub id: String,
    pub name: String,
    pub vendor: Option<String>,
    pub version: Option<String>,
    pub description: Option<String>,
    pub kind: PluginKind,
    pub num_inputs: u32,
    pub num_outputs: u32,
}

/// Metadata probed from one plugin module
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleMetadata {
    pub id: String,
    pub name: String,
    pub vendor: Option<String>,
    pub version: Option<String>,
    pub description: Option<String>,
    pub kind: PluginKind,
    pub num_inputs: u32,
    pub num_outputs: u32,
    /// Sub-plugins embedded in the module, in manifest order
    pub subplugins: Vec<SubPluginMeta>,
}

impl ModuleMetadata {
    pub fn into_descriptor(self, format: PluginFormat, path: impl Into<PathBuf>) -> PluginDescriptor {
        PluginDescriptor {
            id: self.id,
            display_name: self.name,
            description: self.description,
            author: self.vendor,
            version: self.version,
            format,
            kind: self.kind,
            module_path: path.into(),
        }
    }
}

/// Reads module metadata without loading the binary
pub trait ModuleProber: Send + Sync {
    fn probe(&self, format: PluginFormat, path: &Path) -> Result<ModuleMetadata, ProbeError>;
}

#[derive(Debug, Default)]
pub struct ManifestProber;

#[derive(Debug, Deserialize)]
struct ManifestFile {
    id: Option<String>,
    name: Option<String>,
    vendor: Option<String>,
    version: Option<String>,
    description: Option<String>,
    kind: Option<PluginKind>,
    num_inputs: Option<u32>,
    num_outputs: Option<u32>,
    #[serde(default)]
    subplugins: Vec<ManifestSubPlugin>,
}

#[derive(Debug, Deserialize)]
struct ManifestSubPlugin {
    id: Option<String>,
    name: String,
    vendor: Option<String>,
    version: Option<String>,
    description: Option<String>,
    kind: Option<PluginKind>,
    num_inputs: Option<u32>,
    num_outputs: Option<u32>,
}

impl ModuleProber for ManifestProber {
    fn probe(&self, format: PluginFormat, path: &Path) -> Result<ModuleMetadata, ProbeError> {
        let manifest = find_manifest(path)?;
        let Some(manifest) = manifest else {
            return Ok(stub_metadata(format, path));
        };

        let id = manifest
            .id
            .or_else(|| default_id(path))
            .unwrap_or_else(|| path.display().to_string());
        let name = manifest.name.unwrap_or_else(|| {
            path.file_stem()
                .unwrap_or_default()
                .to_string_lossy()
                .into()
        });
        let kind = manifest.kind.unwrap_or_default();

        let subplugins = manifest
            .subplugins
            .into_iter()
            .map(|sub| SubPluginMeta {
                id: sub.id.unwrap_or_else(|| sub.name.clone()),
                kind: sub.kind.unwrap_or(kind),
                num_inputs: sub.num_inputs.unwrap_or(0),
                num_outputs: sub.num_outputs.unwrap_or(2),
                name: sub.name,
                vendor: sub.vendor,
                version: sub.version,
                description: sub.description,
            })
            .collect();

        Ok(ModuleMetadata {
            id,
            name,
            vendor: manifest.vendor,
            version: manifest.version,
            description: manifest.description,
            kind,
            num_inputs: manifest.num_inputs.unwrap_or(0),
            num_outputs: manifest.num_outputs.unwrap_or(2),
            subplugins,
        })
    }
}

fn find_manifest(path: &Path) -> Result<Option<ManifestFile>, ProbeError> {
    let mut candidates = Vec::new();
    if path.is_dir() {
        candidates.push(path.join("manifest.json"));
        candidates.push(path.join("Contents/manifest.json"));
    } else {
        // Synth.vst -> Synth.manifest.json
        candidates.push(path.with_extension("manifest.json"));
        if let Some(parent) = path.parent() {
            candidates.push(parent.join("manifest.json"));
        }
    }
    for candidate in candidates {
        if candidate.exists() {
            let raw = fs::read_to_string(candidate)?;
            let manifest: ManifestFile = serde_json::from_str(&raw)?;
            return Ok(Some(manifest));
        }
    }
    Ok(None)
}

fn default_id(path: &Path) -> Option<String> {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
}

/// Fallback metadata for a module without a manifest
pub(crate) fn stub_metadata(format: PluginFormat, path: &Path) -> ModuleMetadata {
    let name = path
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    let mut id = name.clone();
    id.push('#');
    id.push_str(format.as_str());
    ModuleMetadata {
        id,
        name,
        vendor: None,
        version: None,
        description: None,
        kind: PluginKind::Effect,
        num_inputs: 0,
        num_outputs: 2,
        subplugins: Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use std::fs::{create_dir_all, File};
    use std::io::Write;

    use tempfile::tempdir;

    use super::*;

    fn write_manifest(path: &Path, json: serde_json::Value) {
        let mut file = File::create(path).unwrap();
        write!(file, "{}", json).unwrap();
    }

    #[test]
    fn probe_reads_sibling_manifest_for_files() {
        let dir = tempdir().unwrap();
        let module = dir.path().join("Piano.vst");
        File::create(&module).unwrap();
        write_manifest(
            &dir.path().join("Piano.manifest.json"),
            serde_json::json!({
                "id": "acme.piano",
                "name": "Acme Piano",
                "vendor": "Acme",
                "kind": "instrument",
                "num_outputs": 2,
                "subplugins": [
                    { "name": "Bright" },
                    { "name": "Mellow", "kind": "instrument" }
                ]
            }),
        );

        let metadata = ManifestProber.probe(PluginFormat::Vst, &module).unwrap();
        assert_eq!(metadata.id, "acme.piano");
        assert_eq!(metadata.name, "Acme Piano");
        assert_eq!(metadata.kind, PluginKind::Instrument);
        assert_eq!(metadata.subplugins.len(), 2);
        // sub-plugins inherit the module kind unless they override it
        assert_eq!(metadata.subplugins[0].kind, PluginKind::Instrument);
        assert_eq!(metadata.subplugins[0].id, "Bright");
    }

    #[test]
    fn probe_reads_bundle_manifest_for_dirs() {
        let dir = tempdir().unwrap();
        let bundle = dir.path().join("Verb.clap");
        create_dir_all(bundle.join("Contents")).unwrap();
        write_manifest(
            &bundle.join("Contents/manifest.json"),
            serde_json::json!({ "name": "Verb", "kind": "effect" }),
        );

        let metadata = ManifestProber.probe(PluginFormat::Clap, &bundle).unwrap();
        assert_eq!(metadata.name, "Verb");
        assert_eq!(metadata.kind, PluginKind::Effect);
        assert!(metadata.subplugins.is_empty());
    }

    #[test]
    fn probe_without_manifest_yields_stub() {
        let dir = tempdir().unwrap();
        let module = dir.path().join("mystery.ladspa");
        File::create(&module).unwrap();

        let metadata = ManifestProber.probe(PluginFormat::Ladspa, &module).unwrap();
        assert_eq!(metadata.name, "mystery");
        assert_eq!(metadata.id, "mystery#ladspa");
        assert_eq!(metadata.num_outputs, 2);
    }

    #[test]
    fn probe_rejects_broken_manifest() {
        let dir = tempdir().unwrap();
        let module = dir.path().join("Broken.vst");
        File::create(&module).unwrap();
        std::fs::write(dir.path().join("Broken.manifest.json"), "{ nope").unwrap();

        let err = ManifestProber.probe(PluginFormat::Vst, &module).unwrap_err();
        assert!(matches!(err, ProbeError::Manifest(_)));
    }
}
