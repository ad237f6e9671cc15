use crate::application::analytics::{self, AnalysisReport, COLUMNS};
use crate::application::ml::{LinearPricePredictor, PricePredictor, format_currency};
use crate::config::ArtifactConfig;
use crate::domain::errors::PredictorError;
use crate::domain::types::PredictionInput;
use crate::infrastructure::csv_store;
use crate::interfaces::components::{Card, charts};
use crate::interfaces::design_system::DesignSystem;
use eframe::egui;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

pub const DEFAULT_LAST_CLOSE: f64 = 60000.0;
pub const DEFAULT_VOLUME: f64 = 1500.0;
pub const DEFAULT_POST_COUNT: u32 = 100;
pub const MAX_POST_COUNT: u32 = 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Predictor,
    Analytics,
}

/// Analysis of the processed CSV shown in the Analytics tab
enum AnalyticsState {
    NoData,
    Loaded { path: PathBuf, report: AnalysisReport },
    Failed { path: PathBuf, message: String },
}

pub struct PredictorApp {
    predictor: Result<LinearPricePredictor, PredictorError>,
    pub last_close: f64,
    pub volume: f64,
    pub post_count: u32,
    prediction: Option<Result<f64, String>>,
    tab: Tab,
    analytics: AnalyticsState,
}

impl PredictorApp {
    pub fn new(artifacts: &ArtifactConfig) -> Self {
        let predictor = LinearPricePredictor::load(&artifacts.model_path);
        if let Err(e) = &predictor {
            warn!("Predictor unavailable: {}", e);
        }

        let processed = artifacts
            .processed_data_path
            .clone()
            .or_else(|| find_processed_file(&artifacts.output_dir));

        Self {
            predictor,
            last_close: DEFAULT_LAST_CLOSE,
            volume: DEFAULT_VOLUME,
            post_count: DEFAULT_POST_COUNT,
            prediction: None,
            tab: Tab::Predictor,
            analytics: load_analytics(processed),
        }
    }

    pub fn model_error(&self) -> Option<&PredictorError> {
        self.predictor.as_ref().err()
    }

    pub fn input(&self) -> PredictionInput {
        PredictionInput {
            post_count: self.post_count as f64,
            volume: self.volume.max(0.0),
            last_hour_close: self.last_close.max(0.0),
        }
    }

    /// Runs the model on the current form values and keeps the result for display
    pub fn predict(&mut self) -> Option<&Result<f64, String>> {
        let predictor = self.predictor.as_ref().ok()?;
        let input = self.input();
        let result = predictor.predict(&input).map_err(|e| e.to_string());
        if let Ok(price) = &result {
            info!(
                "Predicted {} for posts={} volume={} last_close={}",
                format_currency(*price),
                input.post_count,
                input.volume,
                input.last_hour_close
            );
        }
        self.prediction = Some(result);
        self.prediction.as_ref()
    }

    fn render_predictor(&mut self, ui: &mut egui::Ui) {
        if let Err(e) = &self.predictor {
            Card::new()
                .title("Model file not found! Run `train` first.")
                .error(true)
                .show(ui, |ui| {
                    ui.label(e.to_string());
                    ui.label(
                        egui::RichText::new("cargo run --bin train -- processed_BTCUSDT_data.csv")
                            .monospace()
                            .color(DesignSystem::TEXT_SECONDARY),
                    );
                });
            return;
        }

        Card::new().title("Current market conditions").show(ui, |ui| {
            egui::Grid::new("prediction_inputs")
                .num_columns(2)
                .spacing([24.0, 12.0])
                .show(ui, |ui| {
                    ui.label("Last hour's closing price (USD)");
                    ui.add(
                        egui::DragValue::new(&mut self.last_close)
                            .range(0.0..=f64::MAX)
                            .speed(100.0)
                            .prefix("$"),
                    );
                    ui.end_row();

                    ui.label("Current hour's trading volume");
                    ui.add(
                        egui::DragValue::new(&mut self.volume)
                            .range(0.0..=f64::MAX)
                            .speed(50.0),
                    );
                    ui.end_row();

                    ui.label("Social media posts this hour");
                    ui.add(egui::Slider::new(&mut self.post_count, 0..=MAX_POST_COUNT));
                    ui.end_row();
                });
        });

        ui.add_space(DesignSystem::SPACING_MEDIUM);

        if ui
            .button(egui::RichText::new("Predict Next Hour's Price").size(16.0).strong())
            .clicked()
        {
            self.predict();
        }

        ui.add_space(DesignSystem::SPACING_MEDIUM);

        match &self.prediction {
            Some(Ok(price)) => {
                Card::new().title("Predicted closing price").show(ui, |ui| {
                    ui.label(
                        egui::RichText::new(format_currency(*price))
                            .size(32.0)
                            .strong()
                            .color(DesignSystem::SUCCESS),
                    );
                });
            }
            Some(Err(message)) => {
                Card::new()
                    .title("Prediction failed")
                    .error(true)
                    .show(ui, |ui| ui.label(message.as_str()));
            }
            None => {}
        }
    }

    fn render_analytics(&self, ui: &mut egui::Ui) {
        match &self.analytics {
            AnalyticsState::NoData => {
                ui.label(
                    egui::RichText::new(
                        "No processed data found. Run `process` or set PROCESSED_DATA_PATH.",
                    )
                    .italics()
                    .color(DesignSystem::TEXT_MUTED),
                );
            }
            AnalyticsState::Failed { path, message } => {
                Card::new()
                    .title(format!("Could not read {}", path.display()))
                    .error(true)
                    .show(ui, |ui| ui.label(message.as_str()));
            }
            AnalyticsState::Loaded { path, report } => {
                egui::ScrollArea::vertical()
                    .id_salt("analytics_scroll")
                    .show(ui, |ui| {
                        ui.label(
                            egui::RichText::new(path.display().to_string())
                                .color(DesignSystem::TEXT_MUTED),
                        );
                        ui.add_space(DesignSystem::SPACING_SMALL);

                        Card::new().title("Correlation matrix").show(ui, |ui| {
                            render_matrix(ui, report);
                        });
                        ui.add_space(DesignSystem::SPACING_MEDIUM);

                        Card::new()
                            .title("Price vs. social media activity")
                            .show(ui, |ui| charts::render_time_series(ui, report));
                        ui.add_space(DesignSystem::SPACING_MEDIUM);

                        Card::new()
                            .title("Post count vs. hourly price change")
                            .show(ui, |ui| charts::render_scatter(ui, report));
                    });
            }
        }
    }
}

fn render_matrix(ui: &mut egui::Ui, report: &AnalysisReport) {
    egui::Grid::new("correlation_grid")
        .striped(true)
        .spacing([20.0, 6.0])
        .show(ui, |ui| {
            ui.label("");
            for name in COLUMNS {
                ui.strong(name);
            }
            ui.end_row();

            for (name, row) in COLUMNS.iter().zip(&report.correlation) {
                ui.strong(*name);
                for value in row {
                    if value.is_nan() {
                        ui.colored_label(DesignSystem::TEXT_MUTED, "n/a");
                    } else {
                        ui.label(format!("{:+.3}", value));
                    }
                }
                ui.end_row();
            }
        });
}

/// First `processed_*_data.csv` in `dir`, by name
fn find_processed_file(dir: &Path) -> Option<PathBuf> {
    let mut candidates: Vec<PathBuf> = std::fs::read_dir(dir)
        .ok()?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| {
            path.file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.starts_with("processed_") && n.ends_with("_data.csv"))
        })
        .collect();
    candidates.sort();
    candidates.into_iter().next()
}

fn load_analytics(path: Option<PathBuf>) -> AnalyticsState {
    let Some(path) = path else {
        return AnalyticsState::NoData;
    };

    match csv_store::read_hourly_rows(&path) {
        Ok(rows) => AnalyticsState::Loaded {
            report: analytics::analyze(&rows),
            path,
        },
        Err(e) => {
            warn!("Failed to load processed data from {:?}: {:#}", path, e);
            AnalyticsState::Failed {
                message: format!("{:#}", e),
                path,
            }
        }
    }
}

impl eframe::App for PredictorApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::TopBottomPanel::top("top_panel").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.selectable_value(&mut self.tab, Tab::Predictor, "Predictor");
                ui.selectable_value(&mut self.tab, Tab::Analytics, "Analytics");
            });
        });

        egui::SidePanel::right("about_panel")
            .default_width(280.0)
            .resizable(true)
            .show(ctx, |ui| {
                ui.heading("About This Project");
                ui.separator();
                ui.label(
                    "This dashboard is the final stage of a pipeline that scrapes social \
                     media posts, joins them with hourly Binance candles and fits a linear \
                     model of the next hour's closing price.",
                );
                ui.add_space(DesignSystem::SPACING_SMALL);
                ui.label(
                    egui::RichText::new(
                        "Educational project only. Predictions are not financial advice.",
                    )
                    .italics()
                    .color(DesignSystem::TEXT_MUTED),
                );
                if let Ok(predictor) = &self.predictor {
                    let model = predictor.model();
                    ui.add_space(DesignSystem::SPACING_MEDIUM);
                    ui.label(format!("Model: {}", predictor.name()));
                    ui.label(format!(
                        "Trained: {}",
                        model.trained_at.format("%Y-%m-%d %H:%M UTC")
                    ));
                    ui.label(format!(
                        "Samples: {} train / {} test",
                        model.train_samples, model.test_samples
                    ));
                    if let Some(mae) = model.mae {
                        ui.label(format!("Test MAE: {}", format_currency(mae)));
                    }
                }
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.heading(
                egui::RichText::new("Crypto Price Prediction Dashboard")
                    .size(26.0)
                    .strong()
                    .color(DesignSystem::TEXT_PRIMARY),
            );
            ui.label(
                egui::RichText::new(
                    "Predict the next hour's closing price from the last close, the current \
                     trading volume and the number of social media posts.",
                )
                .color(DesignSystem::TEXT_SECONDARY),
            );
            ui.add_space(DesignSystem::SPACING_MEDIUM);

            match self.tab {
                Tab::Predictor => self.render_predictor(ui),
                Tab::Analytics => self.render_analytics(ui),
            }
        });
    }
}
