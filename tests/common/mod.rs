//! Shared test utilities for tool discovery tests

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use tempfile::TempDir;

use cocos_console_gui::resolver::{ExecutableLookup, NoLookup, PathResolver};
use cocos_console_gui::settings::{self, FileSettings, SharedSettings};
use cocos_console_gui::Tool;

/// Creates `dir` (and parents) with an empty executable for `tool` inside
pub fn install_tool(dir: &Path, tool: Tool) -> PathBuf {
    fs::create_dir_all(dir).expect("Failed to create tool dir");
    let exe = tool.executable_in(dir);
    fs::write(&exe, "#!/bin/sh\n").expect("Failed to write tool executable");
    exe
}

/// A file-backed settings store inside `dir`
pub fn file_settings(dir: &Path) -> (SharedSettings, PathBuf) {
    let path = dir.join("settings.toml");
    let store = FileSettings::open(&path).expect("Failed to open settings");
    (settings::shared(store), path)
}

/// Resolver that only sees what the test puts in `cwd`
pub fn isolated_resolver(settings: SharedSettings, cwd: &Path) -> PathResolver {
    PathResolver::new(settings)
        .with_cwd(cwd)
        .with_home(None)
        .with_applications(Vec::new())
        .with_lookup(NoLookup)
}

pub fn canonical(path: &Path) -> PathBuf {
    fs::canonicalize(path).expect("Failed to canonicalize")
}

pub fn temp_dir() -> TempDir {
    TempDir::new().expect("Failed to create temp dir")
}

/// Lookup that records how often it was asked
#[derive(Clone, Default)]
pub struct CountingLookup {
    pub calls: Arc<AtomicUsize>,
    pub result: Option<PathBuf>,
}

impl CountingLookup {
    pub fn returning(result: impl Into<PathBuf>) -> Self {
        Self {
            calls: Arc::default(),
            result: Some(result.into()),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ExecutableLookup for CountingLookup {
    async fn locate(&self, _executable: &str) -> Option<PathBuf> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.result.clone()
    }
}
