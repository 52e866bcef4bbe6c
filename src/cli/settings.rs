//! Settings command implementation

use std::path::Path;

use anyhow::Result;

use cocos_console_gui::settings::{self, SharedSettings, COCOS_PATH_KEY};
use cocos_console_gui::Tool;

/// Print the stored tool paths
pub fn settings_command(settings: &SharedSettings, file: &Path) -> Result<()> {
    println!("Settings file: {}\n", file.display());

    let store = settings::lock(settings);
    let keys = Tool::ALL
        .iter()
        .map(|tool| tool.settings_key())
        .chain(std::iter::once(COCOS_PATH_KEY));

    for key in keys {
        match store.value(key) {
            Some(value) if !value.is_empty() => println!("  {} = {}", key, value),
            _ => println!("  {} (not set)", key),
        }
    }

    Ok(())
}
