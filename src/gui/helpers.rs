//! Small reusable widgets

use eframe::egui::{self, RichText};

use super::theme::{ACCENT_GREEN, ACCENT_RED, BG_SECONDARY, TEXT_MUTED};

/// Render a status message (success or error)
pub fn render_status_message(ui: &mut egui::Ui, status: &Option<(String, bool)>) {
    if let Some((msg, is_error)) = status {
        let color = if *is_error { ACCENT_RED } else { ACCENT_GREEN };
        ui.label(RichText::new(msg).color(color));
    }
}

/// Render a section frame with secondary background
pub fn render_section_frame<R>(
    ui: &mut egui::Ui,
    add_contents: impl FnOnce(&mut egui::Ui) -> R,
) -> R {
    egui::Frame::NONE
        .fill(BG_SECONDARY)
        .corner_radius(4.0)
        .inner_margin(12.0)
        .show(ui, add_contents)
        .inner
}

/// Muted field label of a fixed width so inputs line up
pub fn field_label(ui: &mut egui::Ui, text: &str) {
    ui.add_sized(
        [140.0, 20.0],
        egui::Label::new(RichText::new(text).color(TEXT_MUTED)),
    );
}
