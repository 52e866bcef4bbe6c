//! Launching a resolved tool and streaming its output
//!
//! The child's output is read as raw byte chunks and forwarded in arrival
//! order; nothing is parsed. The GUI feeds these chunks straight into the
//! progress dialog.
//!
//! On unix stdout and stderr share one pipe, so lines from both streams keep
//! the order a terminal would show. Elsewhere they are read separately and
//! only the order within each stream is kept.

use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;

use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::Command;
use tokio::runtime::Handle;
use tokio::sync::{mpsc, watch};
use tracing::{debug, info, warn};

use crate::tool::Tool;

const READ_CHUNK: usize = 4096;

/// How long output is still collected after the tool itself has exited.
/// Background processes it started may keep the pipe open indefinitely.
const DRAIN_GRACE: Duration = Duration::from_millis(500);

/// Environment variable the cocos console reads to find the engine
pub const COCOS_ROOT_ENV: &str = "COCOS_X_ROOT";

/// Errors raised while starting or waiting for a tool
#[derive(Debug, thiserror::Error)]
pub enum RunnerError {
    #[error("{tool} is not configured")]
    NotConfigured { tool: Tool },

    #[error("Failed to start {program}: {source}")]
    Spawn {
        program: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed while waiting for {tool}: {source}")]
    Wait {
        tool: Tool,
        #[source]
        source: std::io::Error,
    },
}

/// Progress of a running tool
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunEvent {
    /// Process started
    Started { pid: Option<u32> },
    /// A chunk of stdout or stderr
    Output(Vec<u8>),
    /// Process exited; `None` when killed by a signal or cancelled
    Finished { code: Option<i32> },
    /// Process could not be started or waited on
    Failed(String),
}

/// One invocation of a tool
#[derive(Debug, Clone)]
pub struct ToolCommand {
    pub tool: Tool,
    /// Directory containing the executable
    pub tool_dir: PathBuf,
    pub args: Vec<String>,
    pub cwd: Option<PathBuf>,
    pub env: Vec<(String, String)>,
}

impl ToolCommand {
    pub fn new(tool: Tool, tool_dir: impl Into<PathBuf>) -> Self {
        Self {
            tool,
            tool_dir: tool_dir.into(),
            args: Vec::new(),
            cwd: None,
            env: Vec::new(),
        }
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn current_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cwd = Some(dir.into());
        self
    }

    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.push((key.into(), value.into()));
        self
    }

    /// Full path of the executable to launch
    pub fn program(&self) -> PathBuf {
        self.tool.executable_in(&self.tool_dir)
    }

    /// Command line as shown to the user
    pub fn display(&self) -> String {
        let mut line = self.program().display().to_string();
        for arg in &self.args {
            line.push(' ');
            line.push_str(arg);
        }
        line
    }
}

/// Run `command` to completion, forwarding output through `events`
///
/// Returns the exit code. When `cancel` flips to true the child is killed and
/// `Ok(None)` is returned.
pub async fn run_tool(
    command: &ToolCommand,
    events: &mpsc::UnboundedSender<RunEvent>,
    mut cancel: watch::Receiver<bool>,
) -> Result<Option<i32>, RunnerError> {
    if command.tool_dir.as_os_str().is_empty() {
        return Err(RunnerError::NotConfigured { tool: command.tool });
    }

    let program = command.program();
    let spawn_err = |source: std::io::Error| RunnerError::Spawn {
        program: program.clone(),
        source,
    };

    let mut cmd = Command::new(&program);
    cmd.args(&command.args)
        .stdin(Stdio::null())
        .kill_on_drop(true);
    if let Some(cwd) = &command.cwd {
        cmd.current_dir(cwd);
    }
    for (key, value) in &command.env {
        cmd.env(key, value);
    }

    #[cfg(unix)]
    let output = merge_output(&mut cmd).map_err(spawn_err)?;
    #[cfg(not(unix))]
    cmd.stdout(Stdio::piped()).stderr(Stdio::piped());

    let mut child = cmd.spawn().map_err(spawn_err)?;
    // The command holds the write end of the merged pipe until dropped
    drop(cmd);

    info!("[cocos-gui] Started {}", command.display());
    let _ = events.send(RunEvent::Started { pid: child.id() });

    #[cfg(unix)]
    let pumps = pump_output(Some(output), events);
    #[cfg(not(unix))]
    let pumps = {
        let stdout = child.stdout.take();
        let stderr = child.stderr.take();
        async move {
            tokio::join!(pump_output(stdout, events), pump_output(stderr, events));
        }
    };

    let run = async {
        let mut pumps = std::pin::pin!(pumps);
        let exited = tokio::select! {
            status = child.wait() => Some(status),
            () = &mut pumps => None,
        };
        match exited {
            Some(status) => {
                if tokio::time::timeout(DRAIN_GRACE, &mut pumps).await.is_err() {
                    debug!(
                        "[cocos-gui] {} exited but its output is still open, detaching",
                        command.tool
                    );
                }
                status
            }
            None => child.wait().await,
        }
    };

    tokio::select! {
        status = run => {
            let status = status.map_err(|source| RunnerError::Wait { tool: command.tool, source })?;
            info!("[cocos-gui] {} exited with {}", command.tool, status);
            Ok(status.code())
        }
        Ok(()) = cancel.changed() => {
            warn!("[cocos-gui] Cancelled {}", command.display());
            Ok(None)
        }
    }
}

/// Point the child's stdout and stderr at one pipe and return its read end
#[cfg(unix)]
fn merge_output(cmd: &mut Command) -> std::io::Result<tokio::net::unix::pipe::Receiver> {
    let (writer, reader) = tokio::net::unix::pipe::pipe()?;
    let writer = writer.into_blocking_fd()?;
    cmd.stdout(writer.try_clone()?).stderr(writer);
    Ok(reader)
}

async fn pump_output<R: AsyncRead + Unpin>(
    reader: Option<R>,
    events: &mpsc::UnboundedSender<RunEvent>,
) {
    let Some(mut reader) = reader else {
        return;
    };
    let mut buf = vec![0u8; READ_CHUNK];
    loop {
        match reader.read(&mut buf).await {
            Ok(0) => break,
            Ok(n) => {
                if events.send(RunEvent::Output(buf[..n].to_vec())).is_err() {
                    break;
                }
            }
            Err(e) => {
                warn!("[cocos-gui] Error reading tool output: {}", e);
                break;
            }
        }
    }
}

/// A tool running on the tokio runtime
pub struct RunHandle {
    rx: mpsc::UnboundedReceiver<RunEvent>,
    cancel_tx: watch::Sender<bool>,
    command: ToolCommand,
}

impl RunHandle {
    /// Spawn `command` on `handle`. Always ends with `Finished` or `Failed`.
    pub fn spawn(handle: &Handle, command: ToolCommand) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let (cancel_tx, cancel_rx) = watch::channel(false);
        let task_command = command.clone();

        handle.spawn(async move {
            match run_tool(&task_command, &tx, cancel_rx).await {
                Ok(code) => {
                    let _ = tx.send(RunEvent::Finished { code });
                }
                Err(e) => {
                    warn!("[cocos-gui] {}", e);
                    let _ = tx.send(RunEvent::Failed(e.to_string()));
                }
            }
        });

        Self {
            rx,
            cancel_tx,
            command,
        }
    }

    /// Drain queued events (non-blocking)
    pub fn poll(&mut self) -> Vec<RunEvent> {
        let mut events = Vec::new();
        while let Ok(event) = self.rx.try_recv() {
            events.push(event);
        }
        events
    }

    pub fn command(&self) -> &ToolCommand {
        &self.command
    }

    /// Kill the child process
    pub fn cancel(&self) {
        let _ = self.cancel_tx.send(true);
    }
}

impl Drop for RunHandle {
    fn drop(&mut self) {
        self.cancel();
    }
}
