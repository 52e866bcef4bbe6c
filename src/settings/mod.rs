//! Persistent key-value settings
//!
//! Tool paths are stored under an organization/application scope, the same
//! way the original desktop app kept them. The store is injected into the
//! resolver and the dialogs instead of living in a process-wide global, so
//! tests can swap in [`MemorySettings`] without touching real user state.

mod file;

pub use file::FileSettings;

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard};

/// Organization scope of the settings file
pub const ORGANIZATION: &str = "org.cocos2d-x";

/// Application scope of the settings file
pub const APPLICATION: &str = "Cocos2d Console GUI";

/// Directory containing the `cocos` console executable
pub const COCOS_CONSOLE_PATH_KEY: &str = "cocos_console_path";

/// Directory containing the `sdkbox` executable
pub const SDKBOX_PATH_KEY: &str = "sdkbox_path";

/// Root of the cocos2d-x engine checkout
pub const COCOS_PATH_KEY: &str = "cocos_path";

/// Errors raised while loading or flushing settings
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("Failed to access settings file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse settings file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Failed to serialize settings: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// String-to-string settings storage. Last write wins.
pub trait SettingsStore: Send {
    /// Stored value for `key`, if any
    fn value(&self, key: &str) -> Option<String>;

    /// Set `key` to `value` in memory. Call [`SettingsStore::sync`] to persist.
    fn set_value(&mut self, key: &str, value: &str);

    /// Flush pending changes to the backing storage
    fn sync(&mut self) -> Result<(), SettingsError>;

    /// Stored value, treating empty strings as absent
    fn non_empty_value(&self, key: &str) -> Option<String> {
        self.value(key).filter(|v| !v.is_empty())
    }
}

/// Settings store shared between the UI thread and background tasks
pub type SharedSettings = Arc<Mutex<dyn SettingsStore>>;

/// Wrap a store so it can be shared with the resolver and the dialogs
pub fn shared<S: SettingsStore + 'static>(store: S) -> SharedSettings {
    Arc::new(Mutex::new(store))
}

/// Lock a shared store, recovering the data if a previous holder panicked
pub fn lock(settings: &SharedSettings) -> MutexGuard<'_, dyn SettingsStore + 'static> {
    settings.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// In-memory store. Nothing survives the process.
#[derive(Debug, Clone, Default)]
pub struct MemorySettings {
    values: BTreeMap<String, String>,
}

impl MemorySettings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store pre-populated with `pairs`
    pub fn with_values<'a>(pairs: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        Self {
            values: pairs
                .into_iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }
}

impl SettingsStore for MemorySettings {
    fn value(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set_value(&mut self, key: &str, value: &str) {
        self.values.insert(key.to_string(), value.to_string());
    }

    fn sync(&mut self) -> Result<(), SettingsError> {
        Ok(())
    }
}
