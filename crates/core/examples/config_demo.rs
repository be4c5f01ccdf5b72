//! Example demonstrating the configuration management system
//!
//! Run with: cargo run --package minstrel-core --example config_demo

use minstrel_core::domain::config::{ConfigManager, MinstrelConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter("minstrel_core=debug,info")
        .init();

    println!("=== Minstrel Configuration Demo ===\n");

    // 1. Create factory default configuration
    println!("1. Creating factory default configuration...");
    let mut config = MinstrelConfig::factory_default();
    println!(
        "   ✓ Default language: {}",
        config.settings.value("app", "language")
    );

    // 2. Tweak some settings and record a recent project
    println!("\n2. Updating settings...");
    config.settings.set_value("mixer", "channels", "16");
    config.add_recent_project("demo_song.mmp");
    println!("   ✓ mixer/channels = {}", config.settings.value("mixer", "channels"));

    // 3. Show the derived directory layout
    println!("\n3. Directory layout:");
    println!("   working dir:      {}", config.paths.working_dir().display());
    println!("   user projects:    {}", config.paths.user_projects_dir().display());
    println!("   user presets:     {}", config.paths.user_presets_dir().display());
    println!("   factory samples:  {}", config.paths.factory_samples_dir().display());
    println!("   default artwork:  {}", config.paths.default_artwork_dir().display());

    // 4. Save and reload through the manager
    println!("\n4. Saving and reloading through ConfigManager...");
    let config_dir = std::path::PathBuf::from("demo_config");
    let manager = ConfigManager::new(config_dir.clone());
    manager.save(&config).await?;
    println!("   ✓ Saved to {}", manager.config_path().display());

    let loaded = manager.load().await;
    println!(
        "   ✓ Reloaded, {} recent project(s), mixer/channels = {}",
        loaded.recent_projects().len(),
        loaded.settings.value("mixer", "channels")
    );

    println!("\n=== Demo Complete ===");

    // Cleanup
    std::fs::remove_dir_all(config_dir)?;

    Ok(())
}
