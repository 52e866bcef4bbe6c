//! Main window
//!
//! Toolbar on top, project and run controls in the middle, status bar at the
//! bottom. The preferences, about and progress dialogs float above.

use std::path::{Path, PathBuf};
use std::sync::mpsc::Receiver;
use std::sync::Arc;
use std::time::Duration;

use eframe::egui::{self, RichText};
use tokio::runtime::Handle;
use tracing::{info, warn};

use crate::project::{GameState, GameStateEvent};
use crate::resolver::PathResolver;
use crate::runner::{RunHandle, ToolCommand, COCOS_ROOT_ENV};
use crate::settings::{self, SharedSettings, COCOS_PATH_KEY};
use crate::tool::Tool;

use super::about::{render_about, APP_NAME, VERSION};
use super::helpers::{field_label, render_section_frame, render_status_message};
use super::preferences::{render_preferences, PreferencesAction, PreferencesState};
use super::progress::{render_progress, ProgressDialog};
use super::theme::{ACCENT_BLUE, ACCENT_GREEN, ACCENT_RED, BG_SECONDARY, TEXT_DIM, TEXT_MUTED, TEXT_PRIMARY};

/// Main application state
pub struct ConsoleApp {
    settings: SharedSettings,
    resolver: Arc<PathResolver>,
    runtime: Handle,
    /// Open preferences dialog
    preferences: Option<PreferencesState>,
    preferences_status: Option<(String, bool)>,
    show_about: bool,
    progress: Option<ProgressDialog>,
    project: Option<GameState>,
    project_events: Option<Receiver<GameStateEvent>>,
    /// Run form
    run_tool: Tool,
    run_args: String,
    status: Option<(String, bool)>,
}

impl ConsoleApp {
    pub fn new(settings: SharedSettings, resolver: Arc<PathResolver>, runtime: Handle) -> Self {
        let mut app = Self {
            settings,
            resolver,
            runtime,
            preferences: None,
            preferences_status: None,
            show_about: false,
            progress: None,
            project: None,
            project_events: None,
            run_tool: Tool::Cocos,
            run_args: String::new(),
            status: None,
        };

        // First launch: nothing stored yet, so let the user confirm what we find
        if PreferencesState::needs_setup(&app.settings) {
            info!("[cocos-gui] Tool paths not configured, opening preferences");
            app.open_preferences();
        }

        app
    }

    pub fn open_preferences(&mut self) {
        self.preferences_status = None;
        self.preferences = Some(PreferencesState::open(
            &self.settings,
            Arc::clone(&self.resolver),
            &self.runtime,
        ));
    }

    /// Stored directory for a tool, if any
    fn tool_dir(&self, tool: Tool) -> Option<PathBuf> {
        settings::lock(&self.settings)
            .non_empty_value(tool.settings_key())
            .map(PathBuf::from)
    }

    pub fn open_project(&mut self, file: &Path) {
        match GameState::open(file) {
            Ok(mut state) => {
                self.project_events = Some(state.subscribe());
                self.status = Some((format!("Opened {}", state.project_name()), false));
                info!("[cocos-gui] Opened project {}", file.display());
                self.project = Some(state);
            }
            Err(e) => {
                warn!("[cocos-gui] {:#}", e);
                self.status = Some((format!("{:#}", e), true));
            }
        }
    }

    pub fn import_libraries(&mut self, file: &Path) {
        let Some(project) = self.project.as_mut() else {
            return;
        };
        let result = std::fs::read_to_string(file)
            .map(|content| project.parse_game_libraries(&content));
        self.status = match result {
            Ok(true) => None,
            Ok(false) => Some((format!("{} is not a JSON object", file.display()), true)),
            Err(e) => Some((format!("Failed to read {}: {}", file.display(), e), true)),
        };
    }

    fn poll_project_events(&mut self) {
        let Some(rx) = &self.project_events else {
            return;
        };
        for event in rx.try_iter() {
            let message = match event {
                GameStateEvent::PropertiesUpdated => "Project properties updated",
                GameStateEvent::LibrariesUpdated => "Project libraries updated",
            };
            self.status = Some((message.to_string(), false));
        }
    }

    /// Launch the selected tool with the arguments from the run form
    pub fn start_run(&mut self) {
        if self.progress.as_ref().is_some_and(ProgressDialog::is_running) {
            self.status = Some(("A tool is already running".to_string(), true));
            return;
        }

        let Some(dir) = self.tool_dir(self.run_tool) else {
            self.status = Some((
                format!("'{}' is not configured. Open Preferences.", self.run_tool),
                true,
            ));
            return;
        };

        let mut command =
            ToolCommand::new(self.run_tool, dir).args(self.run_args.split_whitespace());
        if let Some(project) = &self.project {
            command = command.current_dir(project.path());
        }
        if let Some(root) = settings::lock(&self.settings).non_empty_value(COCOS_PATH_KEY) {
            command = command.env(COCOS_ROOT_ENV, root);
        }

        let run = RunHandle::spawn(&self.runtime, command);
        self.progress = Some(ProgressDialog::for_run(run));
        self.status = None;
    }

    fn render_toolbar(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("toolbar")
            .frame(egui::Frame::NONE.fill(BG_SECONDARY).inner_margin(6.0))
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    if ui.button("Open Project...").clicked() {
                        if let Some(file) = rfd::FileDialog::new()
                            .set_title("Open Project")
                            .add_filter("Project", &["json"])
                            .pick_file()
                        {
                            self.open_project(&file);
                        }
                    }

                    let import = ui.add_enabled(
                        self.project.is_some(),
                        egui::Button::new("Import Libraries..."),
                    );
                    if import.clicked() {
                        if let Some(file) = rfd::FileDialog::new()
                            .set_title("Import Libraries")
                            .add_filter("JSON", &["json"])
                            .pick_file()
                        {
                            self.import_libraries(&file);
                        }
                    }

                    if ui.button("Preferences").clicked() {
                        self.open_preferences();
                    }
                    if ui.button("About").clicked() {
                        self.show_about = true;
                    }
                });
            });
    }

    fn render_status_bar(&self, ctx: &egui::Context) {
        egui::TopBottomPanel::bottom("status_bar")
            .frame(egui::Frame::NONE.fill(BG_SECONDARY).inner_margin(4.0))
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    for tool in Tool::ALL {
                        let (text, color) = match self.tool_dir(tool) {
                            Some(dir) if tool.is_installed_in(&dir) => {
                                (format!("{}: {}", tool, dir.display()), ACCENT_GREEN)
                            }
                            Some(dir) => (format!("{}: {} (missing)", tool, dir.display()), ACCENT_RED),
                            None => (format!("{}: not configured", tool), TEXT_MUTED),
                        };
                        ui.label(RichText::new(text).small().monospace().color(color));
                        ui.add_space(16.0);
                    }
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        ui.label(RichText::new(format!("v{}", VERSION)).small().color(TEXT_MUTED));
                    });
                });
            });
    }

    fn render_project(&self, ui: &mut egui::Ui) {
        ui.label(RichText::new("Project").monospace().color(TEXT_PRIMARY));
        ui.add_space(4.0);

        render_section_frame(ui, |ui| {
            let Some(project) = &self.project else {
                ui.label(RichText::new("No project open").color(TEXT_MUTED));
                return;
            };

            ui.horizontal(|ui| {
                field_label(ui, "Name:");
                ui.label(RichText::new(project.project_name()).color(ACCENT_BLUE));
            });
            ui.horizontal(|ui| {
                field_label(ui, "Directory:");
                ui.label(RichText::new(project.path().display().to_string()).monospace().color(TEXT_DIM));
            });
            ui.horizontal(|ui| {
                field_label(ui, "Ready:");
                let (text, color) = if project.is_ready() {
                    ("yes", ACCENT_GREEN)
                } else {
                    ("waiting for libraries", TEXT_MUTED)
                };
                ui.label(RichText::new(text).color(color));
            });

            ui.add_space(6.0);
            egui::CollapsingHeader::new("Properties")
                .default_open(true)
                .show(ui, |ui| render_json_object(ui, project.game_properties()));
            if project.libraries_parsed() {
                egui::CollapsingHeader::new("Libraries")
                    .default_open(true)
                    .show(ui, |ui| render_json_object(ui, project.game_libraries()));
            }
        });
    }

    fn render_run_form(&mut self, ui: &mut egui::Ui) {
        ui.label(RichText::new("Run").monospace().color(TEXT_PRIMARY));
        ui.add_space(4.0);

        render_section_frame(ui, |ui| {
            ui.horizontal(|ui| {
                field_label(ui, "Tool:");
                for tool in Tool::ALL {
                    ui.radio_value(&mut self.run_tool, tool, tool.executable());
                }
            });
            ui.horizontal(|ui| {
                field_label(ui, "Arguments:");
                let response = ui.add(
                    egui::TextEdit::singleline(&mut self.run_args)
                        .font(egui::TextStyle::Monospace)
                        .hint_text("new MyGame -l cpp")
                        .desired_width(360.0),
                );
                let submitted = response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
                if ui.button(RichText::new("Run").color(ACCENT_GREEN)).clicked() || submitted {
                    self.start_run();
                }
            });
        });
    }
}

fn render_json_object(ui: &mut egui::Ui, object: &serde_json::Map<String, serde_json::Value>) {
    if object.is_empty() {
        ui.label(RichText::new("(empty)").small().color(TEXT_MUTED));
        return;
    }
    for (key, value) in object {
        ui.horizontal(|ui| {
            field_label(ui, key);
            let text = match value {
                serde_json::Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            ui.label(RichText::new(text).monospace().color(TEXT_DIM));
        });
    }
}

impl eframe::App for ConsoleApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_project_events();

        let mut busy = false;
        if let Some(prefs) = self.preferences.as_mut() {
            prefs.poll_resolution();
            busy |= prefs.is_resolving();
        }
        if let Some(progress) = self.progress.as_mut() {
            progress.poll();
            busy |= progress.is_running();
        }

        self.render_toolbar(ctx);
        self.render_status_bar(ctx);

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.label(RichText::new(APP_NAME).size(18.0).color(TEXT_PRIMARY));
            ui.add_space(12.0);
            self.render_project(ui);
            ui.add_space(12.0);
            self.render_run_form(ui);
            ui.add_space(8.0);
            render_status_message(ui, &self.status);
        });

        if let Some(prefs) = self.preferences.as_mut() {
            match render_preferences(ctx, prefs, &self.settings, &mut self.preferences_status) {
                Some(PreferencesAction::Accepted) => {
                    self.preferences = None;
                    self.status = Some(("Preferences saved".to_string(), false));
                }
                Some(PreferencesAction::Cancelled) => self.preferences = None,
                None => {}
            }
        }

        if self.show_about {
            render_about(ctx, &mut self.show_about);
        }

        if let Some(progress) = self.progress.as_mut() {
            if render_progress(ctx, progress) {
                self.progress = None;
            }
        }

        // Background work reports through channels; keep polling while it runs
        if busy {
            ctx.request_repaint_after(Duration::from_millis(100));
        }
    }
}
