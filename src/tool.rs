//! External tools managed by the GUI

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::settings::{COCOS_CONSOLE_PATH_KEY, SDKBOX_PATH_KEY};

/// An external command-line executable the GUI locates and launches
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum Tool {
    /// The cocos2d-x console (`cocos new`, `cocos run`, ...)
    Cocos,
    /// The SDKBOX plugin installer
    Sdkbox,
}

impl Tool {
    pub const ALL: [Tool; 2] = [Tool::Cocos, Tool::Sdkbox];

    /// File name of the executable
    pub fn executable(self) -> &'static str {
        match self {
            Tool::Cocos => "cocos",
            Tool::Sdkbox => "sdkbox",
        }
    }

    /// Settings key holding the directory that contains the executable
    pub fn settings_key(self) -> &'static str {
        match self {
            Tool::Cocos => COCOS_CONSOLE_PATH_KEY,
            Tool::Sdkbox => SDKBOX_PATH_KEY,
        }
    }

    /// Human readable name for dialogs
    pub fn display_name(self) -> &'static str {
        match self {
            Tool::Cocos => "Cocos2D Console",
            Tool::Sdkbox => "SDKBOX",
        }
    }

    /// Full path of the executable inside `dir`
    pub fn executable_in(self, dir: &Path) -> PathBuf {
        dir.join(self.executable())
    }

    /// True if `dir` contains this tool as a regular file
    pub fn is_installed_in(self, dir: &Path) -> bool {
        !dir.as_os_str().is_empty() && self.executable_in(dir).is_file()
    }
}

impl fmt::Display for Tool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.executable())
    }
}

/// Engine root for a console directory laid out as `<root>/tools/cocos2d-console/bin`
pub fn engine_root(console_dir: &Path) -> Option<PathBuf> {
    if console_dir.ends_with("tools/cocos2d-console/bin") {
        console_dir.ancestors().nth(3).map(Path::to_path_buf)
    } else {
        None
    }
}
