//! Resolve command implementation

use std::sync::Arc;

use anyhow::Result;

use cocos_console_gui::resolver::{ApplicationsFallback, PathResolver};
use cocos_console_gui::{SharedSettings, Tool};

/// Resolve tool paths without opening the GUI
pub async fn resolve_command(
    settings: SharedSettings,
    tool: Option<Tool>,
    legacy_applications: bool,
) -> Result<()> {
    let fallback = if legacy_applications {
        ApplicationsFallback::Legacy
    } else {
        ApplicationsFallback::Verified
    };
    let resolver = PathResolver::new(Arc::clone(&settings)).with_applications_fallback(fallback);

    let entries = match tool {
        Some(tool) => vec![resolver.resolve(tool).await],
        None => resolver.resolve_all().await,
    };

    for entry in entries {
        match entry.source {
            Some(source) if entry.is_found() => {
                println!("{}\t{}\t({})", entry.tool, entry.path.display(), source);
            }
            _ => println!("{}\t(not found)", entry.tool),
        }
    }

    Ok(())
}
