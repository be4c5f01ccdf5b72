//! Minstrel CLI Application

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use minstrel_core::domain::config::{ConfigManager, DirWatcher};
use minstrel_core::domain::plugin::{
    PluginDescriptor, PluginFormat, PluginKind, SubPluginFeatures,
};
use minstrel_infra::plugins::{
    scan_modules, ManifestProber, PluginCatalog, ScanConfig, VstModuleFeatures,
};

#[derive(Parser)]
#[command(name = "minstrel")]
#[command(about = "Configuration and plugin catalog for the Minstrel studio", long_about = None)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Override the configuration directory
    #[arg(long)]
    config_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Inspect and edit the settings store
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
    /// Print the resolved directory layout
    Paths,
    /// Recently opened projects
    Recent {
        #[command(subcommand)]
        action: RecentAction,
    },
    /// Plugin catalog operations
    Plugins {
        #[command(subcommand)]
        action: PluginsAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the whole configuration document
    Show,
    /// Print one attribute value
    Get { class: String, attribute: String },
    /// Set one attribute value and save
    Set {
        class: String,
        attribute: String,
        value: String,
    },
    /// Delete the configuration file
    Clear,
}

#[derive(Subcommand)]
enum RecentAction {
    /// List recently opened projects, most recent first
    List,
    /// Record a project file as most recently opened
    Add { file: PathBuf },
}

#[derive(Subcommand)]
enum PluginsAction {
    /// Scan the configured plugin directories into the catalog
    Scan,
    /// List catalogued plugins
    List,
    /// Watch the plugin directories and report changed modules
    Watch,
    /// List the sub-plugins embedded in one module
    Subplugins {
        module: PathBuf,
        /// Module format; inferred from the extension when omitted
        #[arg(long)]
        format: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if cli.verbose {
        tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_max_level(tracing::Level::INFO)
            .init();
    }

    let config_dir = match cli.config_dir {
        Some(dir) => dir,
        None => ConfigManager::default_config_dir()?,
    };
    let manager = ConfigManager::new(config_dir);

    match cli.command {
        Commands::Config { action } => run_config(&manager, action).await,
        Commands::Paths => run_paths(&manager).await,
        Commands::Recent { action } => run_recent(&manager, action).await,
        Commands::Plugins { action } => run_plugins(&manager, action).await,
    }
}

async fn run_config(manager: &ConfigManager, action: ConfigAction) -> anyhow::Result<()> {
    match action {
        ConfigAction::Show => {
            let config = manager.load().await;
            print!("{}", toml::to_string_pretty(&config)?);
        }
        ConfigAction::Get { class, attribute } => {
            let config = manager.load().await;
            println!("{}", config.settings.value(&class, &attribute));
        }
        ConfigAction::Set {
            class,
            attribute,
            value,
        } => {
            let mut config = manager.load().await;
            config.settings.set_value(class, &attribute, value);
            manager.save(&config).await?;
        }
        ConfigAction::Clear => {
            manager.clear().await?;
        }
    }
    Ok(())
}

async fn run_paths(manager: &ConfigManager) -> anyhow::Result<()> {
    let config = manager.load().await;
    let paths = &config.paths;
    println!("working dir:       {}", paths.working_dir().display());
    println!("data dir:          {}", paths.data_dir().display());
    println!("artwork dir:       {}", paths.artwork_dir().display());
    println!("user projects:     {}", paths.user_projects_dir().display());
    println!("user presets:      {}", paths.user_presets_dir().display());
    println!("user samples:      {}", paths.user_samples_dir().display());
    println!("factory projects:  {}", paths.factory_projects_dir().display());
    println!("factory presets:   {}", paths.factory_presets_dir().display());
    println!("factory samples:   {}", paths.factory_samples_dir().display());
    println!("track icons:       {}", paths.track_icons_dir().display());
    println!("locale:            {}", paths.locale_dir().display());
    println!("native plugins:    {}", paths.plugin_dir.display());
    println!("vst plugins:       {}", paths.vst_dir.display());
    println!("clap plugins:      {}", paths.clap_dir.display());
    println!("ladspa plugins:    {}", paths.ladspa_dir.display());
    if let Some(stk) = &paths.stk_dir {
        println!("stk data:          {}", stk.display());
    }
    Ok(())
}

async fn run_recent(manager: &ConfigManager, action: RecentAction) -> anyhow::Result<()> {
    match action {
        RecentAction::List => {
            let config = manager.load().await;
            for project in config.recent_projects() {
                println!("{}", project.display());
            }
        }
        RecentAction::Add { file } => {
            let mut config = manager.load().await;
            config.add_recent_project(file);
            manager.save(&config).await?;
        }
    }
    Ok(())
}

async fn run_plugins(manager: &ConfigManager, action: PluginsAction) -> anyhow::Result<()> {
    match action {
        PluginsAction::Scan => {
            let config = manager.load().await;
            let scan_config = ScanConfig::from_paths(&config.paths);
            let report = scan_modules(&scan_config, &ManifestProber);
            let count = report.entries.len();

            let catalog = PluginCatalog::open(PluginCatalog::default_path()?)?;
            catalog.merge(report.into_entries())?;
            println!("catalogued {count} plugin module(s)");
        }
        PluginsAction::List => {
            let catalog = PluginCatalog::open(PluginCatalog::default_path()?)?;
            for entry in catalog.entries() {
                let flag = if entry.quarantined { " [quarantined]" } else { "" };
                println!(
                    "{:<10} {:<28} {}{}",
                    entry.descriptor.format,
                    entry.descriptor.display_name,
                    entry.descriptor.module_path.display(),
                    flag
                );
            }
        }
        PluginsAction::Watch => {
            let config = manager.load().await;
            let roots: Vec<PathBuf> = ScanConfig::from_paths(&config.paths)
                .roots
                .into_iter()
                .map(|(_, dir)| dir)
                .filter(|dir| dir.exists())
                .collect();
            anyhow::ensure!(!roots.is_empty(), "no plugin directory exists yet");

            let extensions = ["mplug", "vst", "clap", "ladspa", "so", "dll", "json"]
                .map(String::from)
                .to_vec();
            let watcher = DirWatcher::new(roots, extensions).await?;
            let mut changes = watcher.subscribe();
            println!("watching plugin directories, Ctrl-C to stop");
            while let Ok(path) = changes.recv().await {
                println!("changed: {}", path.display());
            }
        }
        PluginsAction::Subplugins { module, format } => {
            let format = match format {
                Some(name) => PluginFormat::parse(&name)
                    .with_context(|| format!("unknown plugin format: {name}"))?,
                None => module
                    .extension()
                    .and_then(|ext| ext.to_str())
                    .and_then(PluginFormat::from_extension)
                    .unwrap_or(PluginFormat::Vst),
            };

            let descriptor = module_descriptor(&module, format);
            let features = VstModuleFeatures::new();
            let keys = features.list_sub_plugin_keys(&descriptor)?;
            for key in &keys {
                let description = features.describe(key)?;
                println!(
                    "{:<24} {:<12} in:{} out:{} {}",
                    description.name,
                    format_kind(description.kind),
                    description.num_inputs,
                    description.num_outputs,
                    description.vendor.unwrap_or_default()
                );
            }
        }
    }
    Ok(())
}

/// Minimal descriptor for a module addressed directly on the command line
fn module_descriptor(module: &std::path::Path, format: PluginFormat) -> PluginDescriptor {
    let name = module
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| module.display().to_string());
    PluginDescriptor {
        id: name.clone(),
        display_name: name,
        description: None,
        author: None,
        version: None,
        format,
        kind: PluginKind::Effect,
        module_path: module.to_path_buf(),
    }
}

fn format_kind(kind: PluginKind) -> &'static str {
    match kind {
        PluginKind::Instrument => "instrument",
        PluginKind::Effect => "effect",
        PluginKind::Tool => "tool",
    }
}
