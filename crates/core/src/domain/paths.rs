//! Directory layout for user and factory content
//!
//! Two base directories anchor everything: the user-writable working
//! directory and the read-only installation data directory. Content
//! subdirectories hang off those bases at fixed relative suffixes; plugin
//! directories are configured independently per format.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Fixed suffix under a base directory for project files
pub const PROJECTS_PATH: &str = "projects";
/// Fixed suffix under a base directory for instrument/effect presets
pub const PRESETS_PATH: &str = "presets";
/// Fixed suffix under a base directory for audio samples
pub const SAMPLES_PATH: &str = "samples";
/// Fixed suffix under the data directory for the default theme artwork
pub const DEFAULT_THEME_PATH: &str = "themes/default";
/// Fixed suffix under the data directory for track icons
pub const TRACK_ICON_PATH: &str = "track_icons";
/// Fixed suffix under the data directory for translations
pub const LOCALE_PATH: &str = "locale";

/// Base and plugin directory configuration
///
/// A plain value, constructed explicitly and passed by reference to the
/// components that need it. All fields are independently settable; the
/// derived accessors below are pure joins of a base with a fixed suffix.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    /// User-writable root for projects, presets, and samples
    pub working_dir: PathBuf,

    /// Read-only installation root with factory content
    pub data_dir: PathBuf,

    /// Theme/artwork directory, defaults to the default theme in `data_dir`
    pub artwork_dir: PathBuf,

    /// Native plugin modules
    pub plugin_dir: PathBuf,

    /// VST plugin modules
    pub vst_dir: PathBuf,

    /// CLAP plugin bundles
    pub clap_dir: PathBuf,

    /// LADSPA plugin libraries
    pub ladspa_dir: PathBuf,

    /// Sound-synthesis toolkit raw wave data, if installed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stk_dir: Option<PathBuf>,
}

impl Default for PathsConfig {
    fn default() -> Self {
        let working_dir = dirs::home_dir()
            .map(|home| home.join("minstrel"))
            .unwrap_or_else(|| PathBuf::from("minstrel"));
        let data_dir = dirs::data_dir()
            .map(|data| data.join("minstrel"))
            .unwrap_or_else(|| PathBuf::from("/usr/share/minstrel"));
        let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));

        Self {
            artwork_dir: data_dir.join(DEFAULT_THEME_PATH),
            plugin_dir: data_dir.join("plugins"),
            vst_dir: home.join(".vst"),
            clap_dir: home.join(".clap"),
            ladspa_dir: PathBuf::from("/usr/lib/ladspa"),
            stk_dir: None,
            working_dir,
            data_dir,
        }
    }
}

impl PathsConfig {
    pub fn working_dir(&self) -> &Path {
        &self.working_dir
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn artwork_dir(&self) -> &Path {
        &self.artwork_dir
    }

    /// User projects under the working directory
    pub fn user_projects_dir(&self) -> PathBuf {
        self.working_dir.join(PROJECTS_PATH)
    }

    /// User presets under the working directory
    pub fn user_presets_dir(&self) -> PathBuf {
        self.working_dir.join(PRESETS_PATH)
    }

    /// User samples under the working directory
    pub fn user_samples_dir(&self) -> PathBuf {
        self.working_dir.join(SAMPLES_PATH)
    }

    /// Factory projects shipped in the data directory
    pub fn factory_projects_dir(&self) -> PathBuf {
        self.data_dir.join(PROJECTS_PATH)
    }

    /// Factory presets shipped in the data directory
    pub fn factory_presets_dir(&self) -> PathBuf {
        self.data_dir.join(PRESETS_PATH)
    }

    /// Factory samples shipped in the data directory
    pub fn factory_samples_dir(&self) -> PathBuf {
        self.data_dir.join(SAMPLES_PATH)
    }

    /// Artwork of the default theme, regardless of the configured theme
    pub fn default_artwork_dir(&self) -> PathBuf {
        self.data_dir.join(DEFAULT_THEME_PATH)
    }

    pub fn track_icons_dir(&self) -> PathBuf {
        self.data_dir.join(TRACK_ICON_PATH)
    }

    pub fn locale_dir(&self) -> PathBuf {
        self.data_dir.join(LOCALE_PATH)
    }

    pub fn set_working_dir(&mut self, dir: impl Into<PathBuf>) {
        self.working_dir = dir.into();
    }

    pub fn set_artwork_dir(&mut self, dir: impl Into<PathBuf>) {
        self.artwork_dir = dir.into();
    }

    pub fn set_vst_dir(&mut self, dir: impl Into<PathBuf>) {
        self.vst_dir = dir.into();
    }

    pub fn set_clap_dir(&mut self, dir: impl Into<PathBuf>) {
        self.clap_dir = dir.into();
    }

    pub fn set_ladspa_dir(&mut self, dir: impl Into<PathBuf>) {
        self.ladspa_dir = dir.into();
    }

    pub fn set_stk_dir(&mut self, dir: impl Into<PathBuf>) {
        self.stk_dir = Some(dir.into());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixed_paths() -> PathsConfig {
        PathsConfig {
            working_dir: PathBuf::from("/home/user/minstrel"),
            data_dir: PathBuf::from("/usr/share/minstrel"),
            ..PathsConfig::default()
        }
    }

    #[test]
    fn derived_dirs_join_base_with_fixed_suffix() {
        let paths = fixed_paths();
        assert_eq!(
            paths.user_projects_dir(),
            PathBuf::from("/home/user/minstrel/projects")
        );
        assert_eq!(
            paths.user_presets_dir(),
            PathBuf::from("/home/user/minstrel/presets")
        );
        assert_eq!(
            paths.user_samples_dir(),
            PathBuf::from("/home/user/minstrel/samples")
        );
        assert_eq!(
            paths.factory_projects_dir(),
            PathBuf::from("/usr/share/minstrel/projects")
        );
        assert_eq!(
            paths.factory_presets_dir(),
            PathBuf::from("/usr/share/minstrel/presets")
        );
        assert_eq!(
            paths.factory_samples_dir(),
            PathBuf::from("/usr/share/minstrel/samples")
        );
        assert_eq!(
            paths.default_artwork_dir(),
            PathBuf::from("/usr/share/minstrel/themes/default")
        );
        assert_eq!(
            paths.track_icons_dir(),
            PathBuf::from("/usr/share/minstrel/track_icons")
        );
        assert_eq!(
            paths.locale_dir(),
            PathBuf::from("/usr/share/minstrel/locale")
        );
    }

    #[test]
    fn setters_only_touch_their_field() {
        let mut paths = fixed_paths();
        paths.set_vst_dir("/opt/vst");
        assert_eq!(paths.vst_dir, PathBuf::from("/opt/vst"));
        assert_eq!(paths.working_dir, PathBuf::from("/home/user/minstrel"));

        paths.set_working_dir("/tmp/studio");
        assert_eq!(
            paths.user_projects_dir(),
            PathBuf::from("/tmp/studio/projects")
        );
    }

    #[test]
    fn artwork_dir_is_independent_of_default_theme() {
        let mut paths = fixed_paths();
        paths.set_artwork_dir("/themes/dark");
        assert_eq!(paths.artwork_dir(), Path::new("/themes/dark"));
        assert_eq!(
            paths.default_artwork_dir(),
            PathBuf::from("/usr/share/minstrel/themes/default")
        );
    }

    #[test]
    fn toml_round_trip() {
        let paths = fixed_paths();
        let toml_str = toml::to_string_pretty(&paths).unwrap();
        let parsed: PathsConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed, paths);
    }

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let parsed: PathsConfig = toml::from_str("working_dir = \"/tmp/w\"").unwrap();
        assert_eq!(parsed.working_dir, PathBuf::from("/tmp/w"));
        assert_eq!(parsed.ladspa_dir, PathsConfig::default().ladspa_dir);
    }
}
