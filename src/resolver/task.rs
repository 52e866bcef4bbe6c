//! Background resolution for the UI thread

use std::sync::mpsc::{channel, Receiver, TryRecvError};
use std::sync::Arc;

use tokio::runtime::Handle;
use tokio::sync::watch;
use tracing::debug;

use super::{PathResolver, ToolPathEntry};
use crate::tool::Tool;

/// Resolves a set of tools on the tokio runtime and hands results back
/// without blocking the caller
///
/// Cancelling drops the in-flight lookup, which kills the shell it spawned.
pub struct ResolutionTask {
    rx: Receiver<ToolPathEntry>,
    cancel_tx: watch::Sender<bool>,
    pending: Vec<Tool>,
}

impl ResolutionTask {
    /// Start resolving `tools` one after another
    pub fn spawn(handle: &Handle, resolver: Arc<PathResolver>, tools: Vec<Tool>) -> Self {
        let (tx, rx) = channel();
        let (cancel_tx, mut cancel_rx) = watch::channel(false);
        let queue = tools.clone();

        handle.spawn(async move {
            for tool in queue {
                let flag = cancel_rx.clone();
                let cancelled = move || *flag.borrow();
                tokio::select! {
                    entry = resolver.resolve_unless_cancelled(tool, cancelled) => {
                        if tx.send(entry).is_err() {
                            return;
                        }
                    }
                    Ok(()) = cancel_rx.changed() => {
                        debug!("[cocos-gui] Resolution cancelled before '{}'", tool);
                        return;
                    }
                }
            }
        });

        Self {
            rx,
            cancel_tx,
            pending: tools,
        }
    }

    /// Collect finished results (non-blocking)
    pub fn poll(&mut self) -> Vec<ToolPathEntry> {
        let mut finished = Vec::new();
        loop {
            match self.rx.try_recv() {
                Ok(entry) => {
                    self.pending.retain(|t| *t != entry.tool);
                    finished.push(entry);
                }
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    self.pending.clear();
                    break;
                }
            }
        }
        finished
    }

    /// Tools that have not been resolved yet
    pub fn pending(&self) -> &[Tool] {
        &self.pending
    }

    pub fn is_finished(&self) -> bool {
        self.pending.is_empty()
    }

    /// Stop resolving. Results already delivered stay valid.
    pub fn cancel(&mut self) {
        let _ = self.cancel_tx.send(true);
        self.pending.clear();
    }
}

impl Drop for ResolutionTask {
    fn drop(&mut self) {
        let _ = self.cancel_tx.send(true);
    }
}
