//! Core domain layer for Minstrel
//!
//! Platform-agnostic configuration, directory layout, and plugin metadata
//! types. Filesystem-heavy implementations (plugin scanning, catalog
//! persistence) live in the `infra` crate.

pub mod domain;
