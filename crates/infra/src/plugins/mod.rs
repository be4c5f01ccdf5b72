//! Plugin discovery and catalog persistence
//!
//! The scanner walks the configured plugin directories and classifies
//! candidate modules by format; the prober reads module metadata from a
//! manifest beside the binary (no ABI loading happens here); the catalog
//! persists what was found.

pub mod catalog;
pub mod probe;
pub mod scanner;
pub mod subplugins;

pub use catalog::*;
pub use probe::*;
pub use scanner::*;
pub use subplugins::*;
