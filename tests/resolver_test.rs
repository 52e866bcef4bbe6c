//! Integration tests for tool path discovery

mod common;

use std::path::PathBuf;

use cocos_console_gui::resolver::{ApplicationsFallback, ResolveSource};
use cocos_console_gui::settings::{self, FileSettings, MemorySettings, SettingsStore};
use cocos_console_gui::Tool;

use common::*;

#[tokio::test]
async fn test_valid_stored_path_skips_every_other_step() {
    let tools = temp_dir();
    install_tool(tools.path(), Tool::Cocos);
    let stored = tools.path().display().to_string();

    let settings = settings::shared(MemorySettings::with_values([(
        "cocos_console_path",
        stored.as_str(),
    )]));
    let cwd = temp_dir();
    install_tool(cwd.path(), Tool::Cocos);

    let lookup = CountingLookup::returning("/usr/bin/cocos");
    let resolver = isolated_resolver(settings, cwd.path()).with_lookup(lookup.clone());

    let entry = resolver.resolve(Tool::Cocos).await;
    assert_eq!(entry.path, PathBuf::from(&stored));
    assert_eq!(entry.source, Some(ResolveSource::Stored));
    assert_eq!(lookup.calls(), 0, "PATH lookup must not run for a valid stored path");
}

#[tokio::test]
async fn test_working_directory_is_found_and_persisted() {
    let dir = temp_dir();
    let cwd = dir.path().join("project");
    install_tool(&cwd, Tool::Cocos);
    let (settings, path) = file_settings(dir.path());

    let resolver = isolated_resolver(settings, &cwd);
    let entry = resolver.resolve(Tool::Cocos).await;

    assert_eq!(entry.source, Some(ResolveSource::WorkingDir));
    assert_eq!(entry.path, canonical(&cwd));

    let reopened = FileSettings::open(&path).unwrap();
    assert_eq!(
        reopened.value("cocos_console_path"),
        Some(canonical(&cwd).display().to_string())
    );
}

#[tokio::test]
async fn test_grandparent_of_working_directory_is_canonicalized() {
    let dir = temp_dir();
    let root = dir.path().join("tools");
    install_tool(&root, Tool::Sdkbox);
    let cwd = root.join("a").join("b");
    std::fs::create_dir_all(&cwd).unwrap();

    let settings = settings::shared(MemorySettings::new());
    let resolver = isolated_resolver(settings, &cwd);
    let entry = resolver.resolve(Tool::Sdkbox).await;

    assert_eq!(entry.source, Some(ResolveSource::WorkingDirGrandparent));
    assert_eq!(entry.path, canonical(&root));
    assert!(!entry.display_path().contains(".."));
}

#[tokio::test]
async fn test_well_known_checkout_under_home() {
    let home = temp_dir();
    let bin = home.path().join("cocos2d-x/tools/cocos2d-console/bin");
    install_tool(&bin, Tool::Cocos);
    let cwd = temp_dir();

    let settings = settings::shared(MemorySettings::new());
    let resolver =
        isolated_resolver(settings, cwd.path()).with_home(Some(home.path().to_path_buf()));
    let entry = resolver.resolve(Tool::Cocos).await;

    assert_eq!(entry.source, Some(ResolveSource::WellKnown));
    assert_eq!(entry.path, canonical(&bin));
}

#[tokio::test]
async fn test_progs_checkout_is_second_choice() {
    let home = temp_dir();
    let progs = home.path().join("progs/cocos2d-x/tools/cocos2d-console/bin");
    install_tool(&progs, Tool::Cocos);
    let cwd = temp_dir();

    let settings = settings::shared(MemorySettings::new());
    let resolver =
        isolated_resolver(settings, cwd.path()).with_home(Some(home.path().to_path_buf()));
    let entry = resolver.resolve(Tool::Cocos).await;

    assert_eq!(entry.path, canonical(&progs));
}

#[tokio::test]
async fn test_nothing_found_leaves_settings_untouched() {
    let dir = temp_dir();
    let (settings, path) = file_settings(dir.path());
    let cwd = temp_dir();

    let resolver = isolated_resolver(settings.clone(), cwd.path());
    let entries = resolver.resolve_all().await;

    assert_eq!(entries.len(), 2);
    assert!(entries.iter().all(|e| !e.is_found() && e.display_path().is_empty()));
    assert!(!path.exists(), "nothing should have been written");
    assert_eq!(settings::lock(&settings).value("sdkbox_path"), None);
}

#[tokio::test]
async fn test_applications_fallback_verified_requires_the_tool() {
    let apps = temp_dir();
    let cwd = temp_dir();
    let settings = settings::shared(MemorySettings::new());

    let resolver = isolated_resolver(settings.clone(), cwd.path())
        .with_applications(vec![apps.path().to_path_buf()]);
    assert!(!resolver.resolve(Tool::Sdkbox).await.is_found());

    let bin = apps.path().join("Cocos/bin");
    install_tool(&bin, Tool::Sdkbox);
    let entry = resolver.resolve(Tool::Sdkbox).await;
    assert_eq!(entry.source, Some(ResolveSource::Applications));
    assert_eq!(entry.path, canonical(&bin));
}

#[tokio::test]
async fn test_applications_fallback_legacy_returns_unverified_cocos_path() {
    let apps = temp_dir();
    let cwd = temp_dir();
    let settings = settings::shared(MemorySettings::new());

    let resolver = isolated_resolver(settings.clone(), cwd.path())
        .with_applications(vec![apps.path().to_path_buf()])
        .with_applications_fallback(ApplicationsFallback::Legacy);

    // Older releases returned this path for sdkbox too, installed or not
    let entry = resolver.resolve(Tool::Sdkbox).await;
    let expected = apps.path().join("Cocos/bin/cocos");
    assert_eq!(entry.path, expected);
    assert!(!expected.exists());
    assert_eq!(
        settings::lock(&settings).value("sdkbox_path"),
        Some(expected.display().to_string())
    );
}

#[tokio::test]
async fn test_second_resolution_uses_persisted_path() {
    let dir = temp_dir();
    let bin = dir.path().join("bin");
    let exe = install_tool(&bin, Tool::Sdkbox);
    let (settings, _) = file_settings(dir.path());
    let cwd = temp_dir();

    let first = CountingLookup::returning(exe);
    let resolver = isolated_resolver(settings.clone(), cwd.path()).with_lookup(first.clone());
    let entry = resolver.resolve(Tool::Sdkbox).await;
    assert_eq!(entry.source, Some(ResolveSource::PathLookup));
    assert_eq!(first.calls(), 1);

    let second = CountingLookup::default();
    let resolver = isolated_resolver(settings, cwd.path()).with_lookup(second.clone());
    let entry = resolver.resolve(Tool::Sdkbox).await;
    assert_eq!(entry.source, Some(ResolveSource::Stored));
    assert_eq!(entry.path, canonical(&bin));
    assert_eq!(second.calls(), 0);
}

#[tokio::test]
async fn test_cancelled_resolution_does_not_persist() {
    let cwd = temp_dir();
    install_tool(cwd.path(), Tool::Cocos);
    let settings = settings::shared(MemorySettings::new());

    let resolver = isolated_resolver(settings.clone(), cwd.path());
    let entry = resolver.resolve_unless_cancelled(Tool::Cocos, || true).await;

    assert_eq!(entry.source, Some(ResolveSource::WorkingDir));
    assert_eq!(settings::lock(&settings).value("cocos_console_path"), None);
}
