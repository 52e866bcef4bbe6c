//! PATH lookup through the user's login shell

use std::path::PathBuf;
#[cfg(unix)]
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
#[cfg(unix)]
use tokio::process::Command;
#[cfg(unix)]
use tracing::debug;

/// How long the login shell gets to answer
pub const LOOKUP_TIMEOUT: Duration = Duration::from_millis(5000);

/// Finds an executable by name outside the fixed search locations
#[async_trait]
pub trait ExecutableLookup: Send + Sync {
    /// Full path of the executable, or `None` if it could not be found
    async fn locate(&self, executable: &str) -> Option<PathBuf>;
}

/// Runs `which <tool>` in a login shell so the user's profile PATH applies
///
/// GUI apps launched from a desktop session often miss PATH entries that the
/// user's shell profile adds, which is where tool installers usually put them.
#[derive(Debug, Clone)]
pub struct ShellLookup {
    shell: String,
    timeout: Duration,
}

impl ShellLookup {
    pub fn new(timeout: Duration) -> Self {
        Self {
            shell: "sh".to_string(),
            timeout,
        }
    }

    /// Use a different POSIX shell binary
    pub fn with_shell(mut self, shell: impl Into<String>) -> Self {
        self.shell = shell.into();
        self
    }
}

impl Default for ShellLookup {
    fn default() -> Self {
        Self::new(LOOKUP_TIMEOUT)
    }
}

#[async_trait]
impl ExecutableLookup for ShellLookup {
    #[cfg(unix)]
    async fn locate(&self, executable: &str) -> Option<PathBuf> {
        let child = Command::new(&self.shell)
            .arg("-l")
            .arg("-c")
            .arg(format!("which {}", executable))
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .output();

        let output = match tokio::time::timeout(self.timeout, child).await {
            Ok(Ok(output)) => output,
            Ok(Err(e)) => {
                debug!("[cocos-gui] Failed to run {} for '{}': {}", self.shell, executable, e);
                return None;
            }
            Err(_) => {
                debug!(
                    "[cocos-gui] PATH lookup for '{}' timed out after {:?}",
                    executable, self.timeout
                );
                return None;
            }
        };

        if !output.status.success() {
            debug!("[cocos-gui] '{}' not on PATH ({})", executable, output.status);
            return None;
        }

        let mut merged = output.stdout;
        merged.extend_from_slice(&output.stderr);
        parse_lookup_output(&merged)
    }

    #[cfg(not(unix))]
    async fn locate(&self, _executable: &str) -> Option<PathBuf> {
        None
    }
}

/// Lookup that never finds anything
#[derive(Debug, Clone, Copy, Default)]
pub struct NoLookup;

#[async_trait]
impl ExecutableLookup for NoLookup {
    async fn locate(&self, _executable: &str) -> Option<PathBuf> {
        None
    }
}

/// Pick the last output line that names an existing regular file
///
/// Login shells may print profile banners before the `which` answer.
pub(crate) fn parse_lookup_output(output: &[u8]) -> Option<PathBuf> {
    let text = String::from_utf8_lossy(output);
    text.lines()
        .rev()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(PathBuf::from)
        .find(|path| path.is_file())
}
