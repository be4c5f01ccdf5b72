//! Sub-plugin enumeration for binary plugin modules
//!
//! Implements the core [`SubPluginFeatures`] seam on top of the manifest
//! prober: the sub-plugins a module embeds are the ones its manifest
//! lists, and a module without a sub-plugin list is its own single entry.

use std::path::{Path, PathBuf};

use minstrel_core::domain::plugin::{
    PluginDescriptor, PluginError, PluginFormat, Result, SubPluginDescription, SubPluginFeatures,
    SubPluginKey,
};
use tracing::debug;

use crate::plugins::probe::{ManifestProber, ModuleMetadata, ModuleProber};

/// Key attribute holding the module file path
pub const KEY_ATTR_FILE: &str = "file";
/// Key attribute holding the embedded sub-plugin id
pub const KEY_ATTR_PLUGIN: &str = "plugin";
/// Key attribute holding the module format name
pub const KEY_ATTR_FORMAT: &str = "format";

/// [`SubPluginFeatures`] for VST-style binary modules
///
/// Generic over the prober so tests can substitute their own metadata
/// source.
#[derive(Debug, Default)]
pub struct VstModuleFeatures<P = ManifestProber> {
    prober: P,
}

impl VstModuleFeatures<ManifestProber> {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<P: ModuleProber> VstModuleFeatures<P> {
    pub fn with_prober(prober: P) -> Self {
        Self { prober }
    }

    fn probe_module(&self, format: PluginFormat, path: &Path) -> Result<ModuleMetadata> {
        if !path.exists() {
            return Err(PluginError::ModuleNotFound(path.to_path_buf()));
        }
        self.prober
            .probe(format, path)
            .map_err(|err| PluginError::Probe(err.to_string()))
    }
}

impl<P: ModuleProber> SubPluginFeatures for VstModuleFeatures<P> {
    fn list_sub_plugin_keys(&self, descriptor: &PluginDescriptor) -> Result<Vec<SubPluginKey>> {
        let metadata = self.probe_module(descriptor.format, &descriptor.module_path)?;
        let file = descriptor.module_path.display().to_string();

        if metadata.subplugins.is_empty() {
            // the module itself is the only addressable entry
            let key = SubPluginKey::new(&descriptor.id, &metadata.name)
                .with_attribute(KEY_ATTR_FILE, &file)
                .with_attribute(KEY_ATTR_FORMAT, descriptor.format.as_str());
            return Ok(vec![key]);
        }

        debug!(
            module = %descriptor.module_path.display(),
            count = metadata.subplugins.len(),
            "Listing embedded sub-plugins"
        );
        Ok(metadata
            .subplugins
            .into_iter()
            .map(|sub| {
                SubPluginKey::new(&descriptor.id, &sub.name)
                    .with_attribute(KEY_ATTR_FILE, &file)
                    .with_attribute(KEY_ATTR_PLUGIN, &sub.id)
                    .with_attribute(KEY_ATTR_FORMAT, descriptor.format.as_str())
            })
            .collect())
    }

    fn describe(&self, key: &SubPluginKey) -> Result<SubPluginDescription> {
        let file = key
            .attribute(KEY_ATTR_FILE)
            .ok_or_else(|| PluginError::KeyNotFound(key.name.clone()))?;
        let format = key
            .attribute(KEY_ATTR_FORMAT)
            .and_then(PluginFormat::parse)
            .unwrap_or(PluginFormat::Vst);
        let metadata = self.probe_module(format, &PathBuf::from(file))?;

        match key.attribute(KEY_ATTR_PLUGIN) {
            Some(plugin_id) => metadata
                .subplugins
                .into_iter()
                .find(|sub| sub.id == plugin_id)
                .map(|sub| SubPluginDescription {
                    name: sub.name,
                    vendor: sub.vendor.or(metadata.vendor.clone()),
                    version: sub.version.or(metadata.version.clone()),
                    description: sub.description,
                    kind: sub.kind,
                    num_inputs: sub.num_inputs,
                    num_outputs: sub.num_outputs,
                })
                .ok_or_else(|| PluginError::KeyNotFound(key.name.clone())),
            None => Ok(SubPluginDescription {
                name: metadata.name,
                vendor: metadata.vendor,
                version: metadata.version,
                description: metadata.description,
                kind: metadata.kind,
                num_inputs: metadata.num_inputs,
                num_outputs: metadata.num_outputs,
            }),
        }
    }
}
