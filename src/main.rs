#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

use eframe::egui;
use spellcheck_pro::gui::SpellCheckApp;
use spellcheck_pro::{init_logging, Config};

fn main() -> anyhow::Result<()> {
    init_logging();

    let config = Config::load();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([720.0, 640.0])
            .with_min_inner_size([520.0, 420.0])
            .with_title("SpellCheck Pro"),
        ..Default::default()
    };

    eframe::run_native(
        "SpellCheck Pro",
        options,
        Box::new(move |cc| {
            cc.egui_ctx.set_visuals(egui::Visuals::dark());
            Box::new(SpellCheckApp::new(cc, config))
        }),
    )
    .map_err(|e| anyhow::anyhow!("GUI error: {e}"))
}
