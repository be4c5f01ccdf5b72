//! Plugin descriptors and the sub-plugin enumeration seam
//!
//! A single binary module may embed several individually addressable
//! instruments or effects ("sub-plugins"). This module defines the
//! format-agnostic metadata types and the [`SubPluginFeatures`] trait;
//! format-specific implementations live in the `infra` crate.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, PluginError>;

/// Errors produced while resolving plugin modules and sub-plugin keys
#[derive(Debug, Error)]
pub enum PluginError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("plugin module not found: {0}")]
    ModuleNotFound(PathBuf),

    #[error("unknown sub-plugin key: {0}")]
    KeyNotFound(String),

    #[error("failed to probe module: {0}")]
    Probe(String),
}

/// Binary plugin formats known to the application
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PluginFormat {
    Native,
    Vst,
    Clap,
    Ladspa,
    Stk,
}

impl PluginFormat {
    /// Classify a file extension where it is unambiguous
    ///
    /// Shared-library extensions (`so`, `dll`) are claimed by more than one
    /// format and classify only through the directory they were found in.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "mplug" => Some(Self::Native),
            "vst" => Some(Self::Vst),
            "clap" => Some(Self::Clap),
            "ladspa" => Some(Self::Ladspa),
            _ => None,
        }
    }

    /// Inverse of [`PluginFormat::as_str`]
    pub fn parse(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "native" => Some(Self::Native),
            "vst" => Some(Self::Vst),
            "clap" => Some(Self::Clap),
            "ladspa" => Some(Self::Ladspa),
            "stk" => Some(Self::Stk),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Native => "native",
            Self::Vst => "vst",
            Self::Clap => "clap",
            Self::Ladspa => "ladspa",
            Self::Stk => "stk",
        }
    }
}

impl fmt::Display for PluginFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a plugin contributes to a project
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PluginKind {
    Instrument,
    #[default]
    Effect,
    Tool,
}

/// Metadata describing one loadable plugin module
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PluginDescriptor {
    /// Stable identifier, unique within the catalog
    pub id: String,
    pub display_name: String,
    pub description: Option<String>,
    pub author: Option<String>,
    pub version: Option<String>,
    pub format: PluginFormat,
    pub kind: PluginKind,
    /// Location of the binary module on disk
    pub module_path: PathBuf,
}

/// Identifies one sub-plugin embedded in a loaded module
///
/// The attribute pairs carry whatever a host implementation needs to
/// reopen the right entry later (module file, embedded plugin id, ...).
/// They are ordered and looked up linearly, like the settings store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SubPluginKey {
    /// Id of the descriptor this key belongs to
    pub descriptor_id: String,
    /// Name of the embedded sub-plugin
    pub name: String,
    pub attributes: Vec<(String, String)>,
}

impl SubPluginKey {
    pub fn new(descriptor_id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            descriptor_id: descriptor_id.into(),
            name: name.into(),
            attributes: Vec::new(),
        }
    }

    pub fn with_attribute(
        mut self,
        attribute: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        self.attributes.push((attribute.into(), value.into()));
        self
    }

    /// First value stored under the given attribute name, if any
    pub fn attribute(&self, attribute: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(attr, _)| attr == attribute)
            .map(|(_, value)| value.as_str())
    }
}

/// Human-readable metadata for one sub-plugin key
///
/// Structured data instead of a populated widget; presentation is up to
/// the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubPluginDescription {
    pub name: String,
    pub vendor: Option<String>,
    pub version: Option<String>,
    pub description: Option<String>,
    pub kind: PluginKind,
    pub num_inputs: u32,
    pub num_outputs: u32,
}

/// Enumeration of sub-plugins inside a binary module
///
/// Implementations must return the same set of keys for an unchanged
/// module on disk, and `describe` must succeed for every key they listed.
pub trait SubPluginFeatures: Send + Sync {
    /// List the sub-plugins embedded in the module the descriptor refers to
    fn list_sub_plugin_keys(&self, descriptor: &PluginDescriptor) -> Result<Vec<SubPluginKey>>;

    /// Structured description for one previously listed key
    fn describe(&self, key: &SubPluginKey) -> Result<SubPluginDescription>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extension_classification() {
        assert_eq!(PluginFormat::from_extension("clap"), Some(PluginFormat::Clap));
        assert_eq!(PluginFormat::from_extension("VST"), Some(PluginFormat::Vst));
        assert_eq!(PluginFormat::from_extension("mplug"), Some(PluginFormat::Native));
        // shared-library extensions are ambiguous
        assert_eq!(PluginFormat::from_extension("so"), None);
        assert_eq!(PluginFormat::from_extension("dll"), None);
    }

    #[test]
    fn key_attribute_lookup_is_linear_first_match() {
        let key = SubPluginKey::new("desc", "Bright Piano")
            .with_attribute("file", "/opt/vst/piano.vst")
            .with_attribute("plugin", "bright")
            .with_attribute("plugin", "shadowed");

        assert_eq!(key.attribute("file"), Some("/opt/vst/piano.vst"));
        assert_eq!(key.attribute("plugin"), Some("bright"));
        assert_eq!(key.attribute("missing"), None);
    }

    #[test]
    fn key_serde_round_trip() {
        let key = SubPluginKey::new("desc", "Organ").with_attribute("plugin", "organ");
        let json = serde_json::to_string(&key).unwrap();
        let parsed: SubPluginKey = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, key);
    }
}
