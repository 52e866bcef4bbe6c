use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::warn;

use cocos_console_gui::settings::{self, FileSettings, MemorySettings, SharedSettings};
use cocos_console_gui::Tool;

mod cli;

#[derive(Parser)]
#[command(name = "cocos-console-gui")]
#[command(about = "Desktop front-end for the cocos2d-x console and SDKBOX")]
#[command(version)]
struct Cli {
    /// Path to the settings file (defaults to the per-user config directory)
    #[arg(short, long, global = true)]
    settings: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Open the main window
    Gui,

    /// Find where cocos / sdkbox are installed and remember the result
    Resolve {
        /// Only resolve this tool
        #[arg(value_enum)]
        tool: Option<Tool>,

        /// Accept <Applications>/Cocos/bin/cocos without checking it exists
        #[arg(long)]
        legacy_applications: bool,
    },

    /// Show the stored tool paths
    Settings,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .init();

    let settings_path = cli.settings.unwrap_or_else(FileSettings::default_path);
    let settings = open_settings(&settings_path)?;

    match cli.command {
        Some(Commands::Resolve {
            tool,
            legacy_applications,
        }) => {
            cli::resolve::resolve_command(settings, tool, legacy_applications).await?;
        }
        Some(Commands::Settings) => {
            cli::settings::settings_command(&settings, &settings_path)?;
        }
        Some(Commands::Gui) | None => {
            let runtime = tokio::runtime::Handle::current();
            tokio::task::block_in_place(|| cocos_console_gui::gui::run_gui(settings, runtime))?;
        }
    }

    Ok(())
}

/// Open the settings file, falling back to an in-memory store when it is unreadable
fn open_settings(path: &Path) -> Result<SharedSettings> {
    match FileSettings::open(path) {
        Ok(store) => Ok(settings::shared(store)),
        Err(settings::SettingsError::Parse { path, source }) => {
            warn!(
                "[cocos-gui] Ignoring corrupt settings file {}: {}",
                path.display(),
                source
            );
            Ok(settings::shared(MemorySettings::new()))
        }
        Err(e) => Err(e).with_context(|| format!("Failed to open settings {}", path.display())),
    }
}
