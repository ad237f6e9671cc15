use cryptopulse::config::Config;
use cryptopulse::infrastructure::observability::init_tracing;
use cryptopulse::interfaces::PredictorApp;
use cryptopulse::interfaces::design_system::DesignSystem;
use tracing::info;

fn main() -> anyhow::Result<()> {
    init_tracing();

    let config = Config::load()?;
    info!(
        "Starting dashboard (model: {:?})",
        config.artifacts.model_path
    );
    let app = PredictorApp::new(&config.artifacts);

    // Runs the UI on the main thread until the window closes
    let native_options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default()
            .with_inner_size([1100.0, 760.0])
            .with_title("Crypto Price Prediction Dashboard"),
        ..Default::default()
    };

    eframe::run_native(
        "CryptoPulse",
        native_options,
        Box::new(|cc| {
            cc.egui_ctx.set_visuals(DesignSystem::theme());
            Ok(Box::new(app))
        }),
    )
    .map_err(|e| anyhow::anyhow!("Eframe error: {}", e))?;

    Ok(())
}
