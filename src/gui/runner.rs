//! GUI runner - opens the main window

use std::sync::Arc;

use anyhow::Result;
use eframe::egui;
use tokio::runtime::Handle;
use tracing::info;

use super::about::APP_NAME;
use super::app::ConsoleApp;
use super::theme;
use crate::resolver::PathResolver;
use crate::settings::SharedSettings;

/// Run the GUI until the window is closed
///
/// Background work (path resolution, tool runs) is spawned on `runtime`.
pub fn run_gui(settings: SharedSettings, runtime: Handle) -> Result<()> {
    let resolver = Arc::new(PathResolver::new(Arc::clone(&settings)));

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title(APP_NAME)
            .with_inner_size([820.0, 560.0])
            .with_min_inner_size([640.0, 420.0]),
        centered: true,
        ..Default::default()
    };

    info!("[cocos-gui] Starting GUI");

    let app = ConsoleApp::new(settings, resolver, runtime);
    eframe::run_native(
        APP_NAME,
        options,
        Box::new(|cc| {
            theme::apply(&cc.egui_ctx);
            Ok(Box::new(app))
        }),
    )
    .map_err(|e| anyhow::anyhow!("Failed to run GUI: {}", e))?;

    Ok(())
}
