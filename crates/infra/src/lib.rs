//! Filesystem-facing infrastructure for Minstrel
//!
//! Plugin directory scanning, manifest probing, the persistent plugin
//! catalog, and sub-plugin enumeration over binary modules.

pub mod plugins;
