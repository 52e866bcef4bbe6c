//! About dialog

use eframe::egui::{self, RichText, Vec2};

use super::theme::{TEXT_DIM, TEXT_PRIMARY};

/// Application name shown in window titles and the about box
pub const APP_NAME: &str = "Cocos2d Console GUI";

/// Version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub const PROJECT_URL: &str = "https://github.com/ricardoquesada/cocos2d-console-gui";
pub const AUTHORS_URL: &str =
    "https://github.com/ricardoquesada/cocos2d-console-gui/blob/master/AUTHORS";
pub const LICENSE_URL: &str = "http://www.apache.org/licenses/LICENSE-2.0";

/// Plain-text body of the about box
pub fn about_text() -> String {
    format!(
        "{APP_NAME}\n\
         Version {VERSION}\n\n\
         Copyright 2015 Chukong Technologies\n\
         (see the AUTHORS file for a full list of contributors)\n\n\
         You may modify and redistribute this program under the terms of the Apache License v2.0.\n\n\
         {PROJECT_URL}"
    )
}

/// Render the about window while `open` is true
pub fn render_about(ctx: &egui::Context, open: &mut bool) {
    let mut close_clicked = false;

    egui::Window::new(format!("About {}", APP_NAME))
        .open(open)
        .collapsible(false)
        .resizable(false)
        .default_size(Vec2::new(420.0, 260.0))
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .show(ctx, |ui| {
            ui.vertical_centered(|ui| {
                ui.label(RichText::new(APP_NAME).size(20.0).strong().color(TEXT_PRIMARY));
                ui.label(RichText::new(format!("Version {}", VERSION)).italics().color(TEXT_DIM));
            });
            ui.add_space(8.0);

            let text = about_text();
            ui.add(
                egui::TextEdit::multiline(&mut text.as_str())
                    .desired_rows(8)
                    .desired_width(f32::INFINITY),
            );

            ui.add_space(8.0);
            ui.horizontal(|ui| {
                ui.hyperlink_to("Project", PROJECT_URL);
                ui.hyperlink_to("Authors", AUTHORS_URL);
                ui.hyperlink_to("License", LICENSE_URL);
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui.button("Close").clicked() {
                        close_clicked = true;
                    }
                });
            });
        });

    if close_clicked {
        *open = false;
    }
}
