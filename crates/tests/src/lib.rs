//! Cross-crate integration tests for Minstrel

#[cfg(test)]
mod config_integration;
