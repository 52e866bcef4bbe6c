//! Progress dialog: live output of a running tool

use std::borrow::Cow;

use eframe::egui::{self, RichText, ScrollArea, Vec2};

use crate::runner::{RunEvent, RunHandle};

use super::theme::{ACCENT_GREEN, ACCENT_RED, ACCENT_YELLOW, BG_SECONDARY, TEXT_DIM, TEXT_PRIMARY};

/// Lifecycle of the process feeding the dialog
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunStatus {
    Idle,
    Running,
    Finished(Option<i32>),
    Failed(String),
}

/// Append-only output log plus the run it belongs to
pub struct ProgressDialog {
    title: String,
    log: Vec<u8>,
    status: RunStatus,
    run: Option<RunHandle>,
}

impl ProgressDialog {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            log: Vec::new(),
            status: RunStatus::Idle,
            run: None,
        }
    }

    /// Dialog fed by a running tool
    pub fn for_run(run: RunHandle) -> Self {
        let mut dialog = Self::new(run.command().display());
        dialog.status = RunStatus::Running;
        dialog.run = Some(run);
        dialog
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// Append a chunk of raw output
    pub fn append(&mut self, bytes: &[u8]) {
        self.log.extend_from_slice(bytes);
    }

    /// The whole log as text
    ///
    /// Decoding happens over the accumulated bytes, so a UTF-8 sequence split
    /// across two chunks still renders as one character.
    pub fn text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.log)
    }

    pub fn clear(&mut self) {
        self.log.clear();
    }

    pub fn status(&self) -> &RunStatus {
        &self.status
    }

    pub fn is_running(&self) -> bool {
        self.status == RunStatus::Running
    }

    /// Pull pending events from the run. Returns true if anything changed.
    pub fn poll(&mut self) -> bool {
        let Some(run) = self.run.as_mut() else {
            return false;
        };
        let events = run.poll();
        let changed = !events.is_empty();
        for event in events {
            self.handle_event(event);
        }
        changed
    }

    pub fn handle_event(&mut self, event: RunEvent) {
        match event {
            RunEvent::Started { .. } => self.status = RunStatus::Running,
            RunEvent::Output(bytes) => self.append(&bytes),
            RunEvent::Finished { code } => {
                self.status = RunStatus::Finished(code);
                self.run = None;
            }
            RunEvent::Failed(message) => {
                self.status = RunStatus::Failed(message);
                self.run = None;
            }
        }
    }

    /// Kill the running tool, if any
    pub fn cancel(&self) {
        if let Some(run) = &self.run {
            run.cancel();
        }
    }
}

/// Render the progress window. Returns true when the user closes it.
pub fn render_progress(ctx: &egui::Context, dialog: &mut ProgressDialog) -> bool {
    let mut should_close = false;

    egui::Window::new("Progress")
        .collapsible(false)
        .resizable(true)
        .default_size(Vec2::new(640.0, 420.0))
        .show(ctx, |ui| {
            ui.label(RichText::new(dialog.title()).monospace().color(TEXT_DIM));
            ui.add_space(4.0);

            egui::Frame::NONE
                .fill(BG_SECONDARY)
                .inner_margin(8.0)
                .show(ui, |ui| {
                    ScrollArea::vertical()
                        .max_height(340.0)
                        .auto_shrink([false, false])
                        .stick_to_bottom(true)
                        .show(ui, |ui| {
                            let text = dialog.text();
                            ui.label(RichText::new(text.as_ref()).monospace().color(TEXT_PRIMARY));
                        });
                });

            ui.add_space(6.0);
            ui.horizontal(|ui| {
                match dialog.status() {
                    RunStatus::Idle => {}
                    RunStatus::Running => {
                        ui.spinner();
                        ui.label(RichText::new("Running").color(ACCENT_YELLOW));
                    }
                    RunStatus::Finished(Some(0)) => {
                        ui.label(RichText::new("Finished").color(ACCENT_GREEN));
                    }
                    RunStatus::Finished(Some(code)) => {
                        ui.label(RichText::new(format!("Exited with code {}", code)).color(ACCENT_RED));
                    }
                    RunStatus::Finished(None) => {
                        ui.label(RichText::new("Terminated").color(ACCENT_RED));
                    }
                    RunStatus::Failed(message) => {
                        ui.label(RichText::new(message.as_str()).color(ACCENT_RED));
                    }
                }

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if dialog.is_running() {
                        if ui.button("Stop").clicked() {
                            dialog.cancel();
                        }
                    } else if ui.button("Close").clicked() {
                        should_close = true;
                    }
                    if ui.button("Copy").clicked() {
                        ui.ctx().copy_text(dialog.text().into_owned());
                    }
                });
            });
        });

    should_close
}
