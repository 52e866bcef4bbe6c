//! GUI colors
//!
//! Dark panels with the cocos2d-x brand blue as the primary text accent.

use eframe::egui::{self, Color32};

// ═══════════════════════════════════════════════════════════════════════════
// BACKGROUNDS
// ═══════════════════════════════════════════════════════════════════════════

pub const BG_PRIMARY: Color32 = Color32::from_rgb(22, 24, 28);
/// Panels, dialog sections and the log area
pub const BG_SECONDARY: Color32 = Color32::from_rgb(30, 33, 39);

// ═══════════════════════════════════════════════════════════════════════════
// TEXT
// ═══════════════════════════════════════════════════════════════════════════

pub const TEXT_PRIMARY: Color32 = Color32::from_rgb(230, 232, 236);
pub const TEXT_DIM: Color32 = Color32::from_rgb(160, 166, 176);
pub const TEXT_MUTED: Color32 = Color32::from_rgb(110, 116, 126);

// ═══════════════════════════════════════════════════════════════════════════
// ACCENTS
// ═══════════════════════════════════════════════════════════════════════════

pub const ACCENT_BLUE: Color32 = Color32::from_rgb(84, 170, 255);
pub const ACCENT_GREEN: Color32 = Color32::from_rgb(90, 220, 130);
/// Inline validation errors
pub const ACCENT_RED: Color32 = Color32::from_rgb(255, 80, 80);
pub const ACCENT_YELLOW: Color32 = Color32::from_rgb(255, 200, 50);

/// Apply the dark visuals with our panel colors
pub fn apply(ctx: &egui::Context) {
    let mut visuals = egui::Visuals::dark();
    visuals.panel_fill = BG_PRIMARY;
    visuals.window_fill = BG_SECONDARY;
    visuals.hyperlink_color = ACCENT_BLUE;
    ctx.set_visuals(visuals);
}
