//! Tool path auto-discovery
//!
//! For each tool the resolver walks a fixed fallback chain and returns the
//! first directory that contains the executable:
//!
//! 1. The directory stored in the settings (returned verbatim)
//! 2. A PATH lookup through the login shell
//! 3. The current working directory
//! 4. Two levels above the working directory
//! 5. Well-known checkouts under the home directory
//! 6. The first standard "Applications" directory
//!
//! Anything found by steps 2-6 is canonicalized and written back to the
//! settings store. A tool that cannot be found resolves to an empty path;
//! resolution itself never fails.

mod locations;
mod lookup;
mod task;

pub use locations::{applications_dirs, well_known_dirs, APPLICATIONS_BIN_SUFFIX};
pub use lookup::{ExecutableLookup, NoLookup, ShellLookup, LOOKUP_TIMEOUT};
pub use task::ResolutionTask;

use std::fmt;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::settings::{self, SharedSettings};
use crate::tool::Tool;

/// Where a resolved tool path came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolveSource {
    /// Previously stored in the settings
    Stored,
    /// Found by the login-shell PATH lookup
    PathLookup,
    /// Current working directory
    WorkingDir,
    /// Two levels above the working directory
    WorkingDirGrandparent,
    /// Well-known checkout under the home directory
    WellKnown,
    /// Standard Applications directory
    Applications,
}

impl fmt::Display for ResolveSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ResolveSource::Stored => "stored setting",
            ResolveSource::PathLookup => "PATH",
            ResolveSource::WorkingDir => "working directory",
            ResolveSource::WorkingDirGrandparent => "working directory/../..",
            ResolveSource::WellKnown => "well-known location",
            ResolveSource::Applications => "Applications",
        };
        f.write_str(label)
    }
}

/// Result of resolving one tool
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolPathEntry {
    pub tool: Tool,
    /// Directory containing the executable, or empty if not found
    pub path: PathBuf,
    pub source: Option<ResolveSource>,
}

impl ToolPathEntry {
    pub fn found(tool: Tool, path: PathBuf, source: ResolveSource) -> Self {
        Self {
            tool,
            path,
            source: Some(source),
        }
    }

    pub fn not_found(tool: Tool) -> Self {
        Self {
            tool,
            path: PathBuf::new(),
            source: None,
        }
    }

    pub fn is_found(&self) -> bool {
        !self.path.as_os_str().is_empty()
    }

    /// The path as the string shown in (and saved from) the preferences fields
    pub fn display_path(&self) -> String {
        self.path.display().to_string()
    }
}

/// How the last fallback treats the Applications directory
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ApplicationsFallback {
    /// Accept `<apps>/Cocos/bin` only if the tool is actually there
    #[default]
    Verified,
    /// Pick `<apps>/Cocos/bin/cocos` for every tool without checking it exists.
    /// This is what older releases did.
    Legacy,
}

/// Walks the fallback chain for a tool
pub struct PathResolver {
    settings: SharedSettings,
    cwd: PathBuf,
    home: Option<PathBuf>,
    applications: Vec<PathBuf>,
    lookup: Box<dyn ExecutableLookup>,
    applications_fallback: ApplicationsFallback,
}

impl PathResolver {
    /// Resolver for the running process: real working directory, home,
    /// Applications directories and login-shell lookup
    pub fn new(settings: SharedSettings) -> Self {
        let cwd = std::env::current_dir().unwrap_or_else(|e| {
            warn!("[cocos-gui] Cannot read current directory: {}", e);
            PathBuf::new()
        });

        Self {
            settings,
            cwd,
            home: dirs::home_dir(),
            applications: applications_dirs(),
            lookup: Box::new(ShellLookup::default()),
            applications_fallback: ApplicationsFallback::default(),
        }
    }

    pub fn with_cwd(mut self, cwd: impl Into<PathBuf>) -> Self {
        self.cwd = cwd.into();
        self
    }

    pub fn with_home(mut self, home: Option<PathBuf>) -> Self {
        self.home = home;
        self
    }

    pub fn with_applications(mut self, applications: Vec<PathBuf>) -> Self {
        self.applications = applications;
        self
    }

    pub fn with_lookup(mut self, lookup: impl ExecutableLookup + 'static) -> Self {
        self.lookup = Box::new(lookup);
        self
    }

    pub fn with_applications_fallback(mut self, fallback: ApplicationsFallback) -> Self {
        self.applications_fallback = fallback;
        self
    }

    /// The settings store this resolver reads and writes
    pub fn settings(&self) -> &SharedSettings {
        &self.settings
    }

    /// Produce a best-guess directory for `tool`
    pub async fn resolve(&self, tool: Tool) -> ToolPathEntry {
        self.resolve_unless_cancelled(tool, || false).await
    }

    /// Like [`PathResolver::resolve`], but nothing is written once
    /// `cancelled` returns true. The check runs under the settings lock, so a
    /// caller that cancels before taking the lock always has the last word.
    pub async fn resolve_unless_cancelled(
        &self,
        tool: Tool,
        cancelled: impl Fn() -> bool + Send,
    ) -> ToolPathEntry {
        let stored = settings::lock(&self.settings).non_empty_value(tool.settings_key());
        if let Some(stored) = stored {
            let stored_path = PathBuf::from(&stored);
            if tool.is_installed_in(&stored_path) {
                debug!("[cocos-gui] Using stored path for {}: {}", tool, stored);
                return ToolPathEntry::found(tool, stored_path, ResolveSource::Stored);
            }
        }

        let Some((path, source)) = self.search(tool).await else {
            info!("[cocos-gui] Could not find '{}'", tool);
            return ToolPathEntry::not_found(tool);
        };

        let path = canonicalize_or_keep(path);
        info!("[cocos-gui] Found '{}' via {}: {}", tool, source, path.display());
        self.persist(tool, &path, cancelled);

        ToolPathEntry::found(tool, path, source)
    }

    /// Resolve every known tool in order
    pub async fn resolve_all(&self) -> Vec<ToolPathEntry> {
        let mut entries = Vec::with_capacity(Tool::ALL.len());
        for tool in Tool::ALL {
            entries.push(self.resolve(tool).await);
        }
        entries
    }

    /// Fallback steps after the stored setting
    async fn search(&self, tool: Tool) -> Option<(PathBuf, ResolveSource)> {
        if let Some(executable) = self.lookup.locate(tool.executable()).await {
            if executable.is_file() {
                if let Some(dir) = executable.parent() {
                    return Some((dir.to_path_buf(), ResolveSource::PathLookup));
                }
            }
        }

        if !self.cwd.as_os_str().is_empty() {
            if tool.is_installed_in(&self.cwd) {
                return Some((self.cwd.clone(), ResolveSource::WorkingDir));
            }

            let grandparent = self.cwd.join("..").join("..");
            if tool.is_installed_in(&grandparent) {
                return Some((grandparent, ResolveSource::WorkingDirGrandparent));
            }
        }

        if let Some(home) = &self.home {
            if let Some(dir) = well_known_dirs(home)
                .into_iter()
                .find(|dir| tool.is_installed_in(dir))
            {
                return Some((dir, ResolveSource::WellKnown));
            }
        }

        self.applications_candidate(tool)
    }

    /// Only the first Applications directory is consulted
    fn applications_candidate(&self, tool: Tool) -> Option<(PathBuf, ResolveSource)> {
        let first = self.applications.first()?;
        let bin = first.join(APPLICATIONS_BIN_SUFFIX);

        match self.applications_fallback {
            ApplicationsFallback::Verified => tool
                .is_installed_in(&bin)
                .then_some((bin, ResolveSource::Applications)),
            ApplicationsFallback::Legacy => Some((
                Tool::Cocos.executable_in(&bin),
                ResolveSource::Applications,
            )),
        }
    }

    fn persist(&self, tool: Tool, path: &Path, cancelled: impl Fn() -> bool) {
        let mut store = settings::lock(&self.settings);
        if cancelled() {
            debug!("[cocos-gui] Resolution of '{}' cancelled, not saving", tool);
            return;
        }
        store.set_value(tool.settings_key(), &path.display().to_string());
        if let Err(e) = store.sync() {
            warn!("[cocos-gui] Failed to save path for '{}': {}", tool, e);
        }
    }
}

/// Resolve symlinks and `..` segments, keeping the path as-is if that fails
fn canonicalize_or_keep(path: PathBuf) -> PathBuf {
    match std::fs::canonicalize(&path) {
        Ok(canonical) => canonical,
        Err(e) => {
            debug!("[cocos-gui] Cannot canonicalize {}: {}", path.display(), e);
            path
        }
    }
}
