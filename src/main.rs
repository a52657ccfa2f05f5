mod app;

use eframe::egui;

use digital_xmas::config::AppConfig;

fn main() -> eframe::Result {
    env_logger::init();

    let config = AppConfig::load().unwrap_or_else(|e| {
        log::error!("{}; falling back to defaults", e);
        let mut config = AppConfig::default();
        config.apply_env(|name| std::env::var(name).ok());
        config
    });

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([config.window_width, config.window_height])
            .with_title("Digital Xmas"),
        ..Default::default()
    };

    eframe::run_native(
        "Digital Xmas",
        options,
        Box::new(move |cc| {
            let app = app::XmasApp::new(cc, config)?;
            Ok(Box::new(app))
        }),
    )
}
