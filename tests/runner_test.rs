//! Integration tests for launching tools and streaming their output

#![cfg(unix)]

mod common;

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::Path;
use std::time::Duration;

use tokio::sync::{mpsc, watch};

use cocos_console_gui::gui::{ProgressDialog, RunStatus};
use cocos_console_gui::runner::{run_tool, RunEvent, RunHandle, ToolCommand, COCOS_ROOT_ENV};
use cocos_console_gui::Tool;

use common::temp_dir;

/// Writes an executable shell script named after `tool` into `dir`
fn write_script(dir: &Path, tool: Tool, body: &str) {
    let exe = tool.executable_in(dir);
    fs::write(&exe, format!("#!/bin/sh\n{}\n", body)).expect("Failed to write script");
    fs::set_permissions(&exe, fs::Permissions::from_mode(0o755))
        .expect("Failed to make script executable");
}

fn collect_output(events: &[RunEvent]) -> String {
    let bytes: Vec<u8> = events
        .iter()
        .filter_map(|e| match e {
            RunEvent::Output(chunk) => Some(chunk.as_slice()),
            _ => None,
        })
        .flatten()
        .copied()
        .collect();
    String::from_utf8_lossy(&bytes).into_owned()
}

#[tokio::test]
async fn test_run_tool_streams_output_and_exit_code() {
    let dir = temp_dir();
    write_script(dir.path(), Tool::Cocos, "echo \"args: $*\"\nexit 3");

    let (tx, mut rx) = mpsc::unbounded_channel();
    let (_cancel_tx, cancel_rx) = watch::channel(false);
    let cmd = ToolCommand::new(Tool::Cocos, dir.path()).args(["new", "MyGame"]);

    let code = run_tool(&cmd, &tx, cancel_rx).await.unwrap();
    assert_eq!(code, Some(3));

    drop(tx);
    let mut events = Vec::new();
    while let Some(event) = rx.recv().await {
        events.push(event);
    }
    assert!(matches!(events.first(), Some(RunEvent::Started { .. })));
    assert_eq!(collect_output(&events), "args: new MyGame\n");
}

#[tokio::test]
async fn test_run_tool_passes_engine_root_and_cwd() {
    let dir = temp_dir();
    let project = temp_dir();
    write_script(dir.path(), Tool::Sdkbox, &format!("echo \"$PWD|${}\"", COCOS_ROOT_ENV));

    let (tx, mut rx) = mpsc::unbounded_channel();
    let (_cancel_tx, cancel_rx) = watch::channel(false);
    let cmd = ToolCommand::new(Tool::Sdkbox, dir.path())
        .current_dir(project.path())
        .env(COCOS_ROOT_ENV, "/opt/cocos2d-x");

    assert_eq!(run_tool(&cmd, &tx, cancel_rx).await.unwrap(), Some(0));

    drop(tx);
    let mut events = Vec::new();
    while let Some(event) = rx.recv().await {
        events.push(event);
    }
    let output = collect_output(&events);
    let pwd = fs::canonicalize(project.path()).unwrap();
    assert!(output.starts_with(&pwd.display().to_string()), "got {:?}", output);
    assert!(output.trim_end().ends_with("|/opt/cocos2d-x"));
}

#[tokio::test]
async fn test_cancel_stops_a_long_running_tool() {
    let dir = temp_dir();
    write_script(dir.path(), Tool::Cocos, "echo started\nsleep 30");

    let (tx, _rx) = mpsc::unbounded_channel();
    let (cancel_tx, cancel_rx) = watch::channel(false);
    let cmd = ToolCommand::new(Tool::Cocos, dir.path());

    let run = tokio::spawn(async move { run_tool(&cmd, &tx, cancel_rx).await });
    tokio::time::sleep(Duration::from_millis(200)).await;
    cancel_tx.send(true).unwrap();

    let code = tokio::time::timeout(Duration::from_secs(5), run)
        .await
        .expect("cancel did not stop the tool")
        .unwrap()
        .unwrap();
    assert_eq!(code, None);
}

#[tokio::test]
async fn test_tool_that_leaves_background_process_still_finishes() {
    let dir = temp_dir();
    write_script(dir.path(), Tool::Cocos, "echo launching\nsleep 20 &\nexit 0");

    let (tx, mut rx) = mpsc::unbounded_channel();
    let (_cancel_tx, cancel_rx) = watch::channel(false);
    let cmd = ToolCommand::new(Tool::Cocos, dir.path()).args(["run"]);

    let code = tokio::time::timeout(Duration::from_secs(5), run_tool(&cmd, &tx, cancel_rx))
        .await
        .expect("run_tool waited for the background process")
        .unwrap();
    assert_eq!(code, Some(0));

    drop(tx);
    let mut events = Vec::new();
    while let Some(event) = rx.recv().await {
        events.push(event);
    }
    assert_eq!(collect_output(&events), "launching\n");
}

#[tokio::test]
async fn test_stdout_and_stderr_keep_terminal_order() {
    let dir = temp_dir();
    write_script(
        dir.path(),
        Tool::Sdkbox,
        "echo out1\necho err1 >&2\necho out2\necho err2 >&2",
    );

    let (tx, mut rx) = mpsc::unbounded_channel();
    let (_cancel_tx, cancel_rx) = watch::channel(false);
    let cmd = ToolCommand::new(Tool::Sdkbox, dir.path());

    assert_eq!(run_tool(&cmd, &tx, cancel_rx).await.unwrap(), Some(0));

    drop(tx);
    let mut events = Vec::new();
    while let Some(event) = rx.recv().await {
        events.push(event);
    }
    assert_eq!(collect_output(&events), "out1\nerr1\nout2\nerr2\n");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_progress_dialog_collects_run_output() {
    let dir = temp_dir();
    write_script(dir.path(), Tool::Cocos, "printf 'one '\nprintf 'two' >&2\nsleep 0.1\necho ' three'");

    let cmd = ToolCommand::new(Tool::Cocos, dir.path());
    let mut dialog = ProgressDialog::for_run(RunHandle::spawn(
        &tokio::runtime::Handle::current(),
        cmd,
    ));
    assert!(dialog.is_running());

    for _ in 0..500 {
        dialog.poll();
        if !dialog.is_running() {
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }

    assert_eq!(dialog.status(), &RunStatus::Finished(Some(0)));
    let text = dialog.text();
    assert_eq!(text, "one two three\n");
}
