#![warn(clippy::all, rust_2018_idioms)]

use paper_paint::PaintApp;

fn main() -> eframe::Result<()> {
    env_logger::init(); // Log to stderr (if you run with `RUST_LOG=debug`).

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1100.0, 700.0])
            .with_min_inner_size([400.0, 300.0])
            .with_title("Paint"),
        ..Default::default()
    };
    eframe::run_native(
        "paper_paint",
        native_options,
        Box::new(|cc| Ok(Box::new(PaintApp::new(cc)))),
    )
}
