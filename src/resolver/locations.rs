//! Fixed install locations probed after the working directory

use std::path::{Path, PathBuf};

/// Console locations relative to the home directory, in probe order
const WELL_KNOWN_CONSOLE_DIRS: &[&str] = &[
    "cocos2d-x/tools/cocos2d-console/bin",
    "progs/cocos2d-x/tools/cocos2d-console/bin",
];

/// Where the Cocos app bundle keeps its tools inside an Applications directory
pub const APPLICATIONS_BIN_SUFFIX: &str = "Cocos/bin";

/// Well-known console directories under `home`
pub fn well_known_dirs(home: &Path) -> Vec<PathBuf> {
    WELL_KNOWN_CONSOLE_DIRS
        .iter()
        .map(|relative| home.join(relative))
        .collect()
}

/// The platform's standard "Applications" directories, most specific first
pub fn applications_dirs() -> Vec<PathBuf> {
    let mut dirs_out = Vec::new();

    #[cfg(target_os = "macos")]
    {
        dirs_out.push(PathBuf::from("/Applications"));
        if let Some(home) = dirs::home_dir() {
            dirs_out.push(home.join("Applications"));
        }
    }

    #[cfg(target_os = "windows")]
    {
        if let Some(data) = dirs::data_dir() {
            dirs_out.push(
                data.join("Microsoft")
                    .join("Windows")
                    .join("Start Menu")
                    .join("Programs"),
            );
        }
    }

    #[cfg(not(any(target_os = "macos", target_os = "windows")))]
    {
        if let Some(data) = dirs::data_dir() {
            dirs_out.push(data.join("applications"));
        }
        dirs_out.push(PathBuf::from("/usr/local/share/applications"));
        dirs_out.push(PathBuf::from("/usr/share/applications"));
    }

    dirs_out
}
