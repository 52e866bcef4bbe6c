//! Settings file I/O

use std::collections::BTreeMap;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use fs2::FileExt;
use tracing::debug;

use super::{SettingsError, SettingsStore, APPLICATION, ORGANIZATION};

/// Settings persisted as a flat TOML table
///
/// Lives at `<config dir>/org.cocos2d-x/Cocos2d Console GUI.toml` unless a
/// path is given explicitly.
#[derive(Debug)]
pub struct FileSettings {
    path: PathBuf,
    values: BTreeMap<String, String>,
    dirty: bool,
}

impl FileSettings {
    /// Default location of the settings file for this user
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .or_else(dirs::home_dir)
            .unwrap_or_else(|| PathBuf::from("."))
            .join(ORGANIZATION)
            .join(format!("{}.toml", APPLICATION))
    }

    /// Open the settings file at the default location
    pub fn open_default() -> Result<Self, SettingsError> {
        Self::open(Self::default_path())
    }

    /// Open the settings file at `path`. A missing file is an empty store.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, SettingsError> {
        let path = path.into();

        let values = if path.exists() {
            let content = std::fs::read_to_string(&path).map_err(|source| SettingsError::Io {
                path: path.clone(),
                source,
            })?;
            toml::from_str(&content).map_err(|source| SettingsError::Parse {
                path: path.clone(),
                source,
            })?
        } else {
            BTreeMap::new()
        };

        debug!("[cocos-gui] Loaded {} settings from {}", values.len(), path.display());

        Ok(Self {
            path,
            values,
            dirty: false,
        })
    }

    /// Path of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write the table with an exclusive lock and a temp-file rename
    fn write_atomic(&self) -> Result<(), SettingsError> {
        let io_err = |path: &Path| {
            let path = path.to_path_buf();
            move |source| SettingsError::Io { path, source }
        };

        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(io_err(parent))?;
        }

        let content = toml::to_string_pretty(&self.values)?;

        // Lock a sibling file; the settings file itself is replaced by rename
        let lock_path = self.path.with_extension("toml.lock");
        let lock_file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&lock_path)
            .map_err(io_err(&lock_path))?;
        lock_file.lock_exclusive().map_err(io_err(&lock_path))?;

        let temp_path = self.path.with_extension("toml.tmp");
        let mut temp_file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&temp_path)
            .map_err(io_err(&temp_path))?;
        temp_file
            .write_all(content.as_bytes())
            .map_err(io_err(&temp_path))?;
        temp_file.sync_all().map_err(io_err(&temp_path))?;

        std::fs::rename(&temp_path, &self.path).map_err(io_err(&self.path))?;

        Ok(())
    }
}

impl SettingsStore for FileSettings {
    fn value(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set_value(&mut self, key: &str, value: &str) {
        if self.values.get(key).map(String::as_str) != Some(value) {
            self.values.insert(key.to_string(), value.to_string());
            self.dirty = true;
        }
    }

    fn sync(&mut self) -> Result<(), SettingsError> {
        if !self.dirty {
            return Ok(());
        }
        self.write_atomic()?;
        self.dirty = false;
        debug!("[cocos-gui] Settings written to {}", self.path.display());
        Ok(())
    }
}
