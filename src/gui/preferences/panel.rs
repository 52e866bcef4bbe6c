//! Preferences window rendering

use std::path::Path;

use eframe::egui::{self, RichText, Vec2};
use tracing::warn;

use crate::gui::helpers::{field_label, render_section_frame, render_status_message};
use crate::gui::theme::{ACCENT_GREEN, ACCENT_RED, TEXT_DIM, TEXT_MUTED, TEXT_PRIMARY};
use crate::settings::SharedSettings;
use crate::tool::Tool;

use super::state::PreferencesState;

/// What the user did with the dialog this frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreferencesAction {
    Accepted,
    Cancelled,
}

/// Render the preferences window
///
/// Returns the action that closed the dialog, if any. Save failures keep the
/// dialog open and are shown in `status`.
pub fn render_preferences(
    ctx: &egui::Context,
    state: &mut PreferencesState,
    settings: &SharedSettings,
    status: &mut Option<(String, bool)>,
) -> Option<PreferencesAction> {
    let mut action = None;

    egui::Window::new("Preferences")
        .collapsible(false)
        .resizable(false)
        .default_size(Vec2::new(560.0, 220.0))
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .show(ctx, |ui| {
            render_section_frame(ui, |ui| {
                for tool in Tool::ALL {
                    render_tool_row(ui, state, tool);
                    ui.add_space(6.0);
                }

                if state.is_resolving() {
                    ui.horizontal(|ui| {
                        ui.spinner();
                        ui.label(RichText::new("Looking for tools...").small().color(TEXT_MUTED));
                    });
                }

                if let Some(error) = state.error_label() {
                    ui.label(RichText::new(error).color(ACCENT_RED));
                }
            });

            render_status_message(ui, status);
            ui.add_space(8.0);

            ui.horizontal(|ui| {
                if ui.button(RichText::new("OK").color(ACCENT_GREEN)).clicked() {
                    match state.accept(settings) {
                        Ok(()) => action = Some(PreferencesAction::Accepted),
                        Err(e) => {
                            warn!("[cocos-gui] Failed to save preferences: {}", e);
                            *status = Some((format!("Failed to save: {}", e), true));
                        }
                    }
                }
                if ui.button(RichText::new("Cancel").color(TEXT_DIM)).clicked() {
                    state.cancel();
                    action = Some(PreferencesAction::Cancelled);
                }
            });
        });

    action
}

fn render_tool_row(ui: &mut egui::Ui, state: &mut PreferencesState, tool: Tool) {
    ui.horizontal(|ui| {
        field_label(ui, &format!("{} Path:", tool.display_name()));

        let response = ui.add(
            egui::TextEdit::singleline(&mut state.field_mut(tool).text)
                .font(egui::TextStyle::Monospace)
                .text_color(TEXT_PRIMARY)
                .desired_width(300.0),
        );
        if response.changed() {
            state.mark_edited(tool);
        }
        if response.lost_focus() {
            state.finish_editing(tool);
        }

        if ui.button("Browse...").clicked() {
            let mut dialog = rfd::FileDialog::new().set_title(format!("{} Path", tool.display_name()));
            let current = state.field(tool).text.clone();
            if Path::new(&current).is_dir() {
                dialog = dialog.set_directory(&current);
            }
            state.browse_selected(tool, dialog.pick_folder());
        }
    });

    if let Some(source) = state.field(tool).source {
        ui.label(
            RichText::new(format!("detected from {}", source))
                .small()
                .color(TEXT_MUTED),
        );
    }
}
