use crate::application::analytics::AnalysisReport;
use crate::interfaces::design_system::DesignSystem;
use chrono::DateTime;
use eframe::egui;
use egui_plot::{Legend, Line, Plot, PlotPoints, Points};

fn format_hour(seconds: f64) -> String {
    DateTime::from_timestamp(seconds as i64, 0)
        .map(|dt| dt.format("%m-%d %H:%M").to_string())
        .unwrap_or_default()
}

/// Close price and post count over time, as two plots sharing the time axis
pub fn render_time_series(ui: &mut egui::Ui, report: &AnalysisReport) {
    let close: Vec<[f64; 2]> = report
        .time_series
        .iter()
        .map(|p| [p.open_time.timestamp() as f64, p.close])
        .collect();
    let posts: Vec<[f64; 2]> = report
        .time_series
        .iter()
        .map(|p| [p.open_time.timestamp() as f64, p.post_count])
        .collect();

    let link = egui::Id::new("time_series_link");

    Plot::new("close_over_time")
        .height(220.0)
        .legend(Legend::default())
        .link_axis(link, [true, false])
        .y_axis_label("Close (USD)")
        .x_axis_formatter(|mark, _range| format_hour(mark.value))
        .show(ui, |plot_ui| {
            plot_ui.line(
                Line::new("Close", PlotPoints::from(close))
                    .color(DesignSystem::ACCENT)
                    .width(2.0),
            );
        });

    ui.add_space(DesignSystem::SPACING_SMALL);

    Plot::new("posts_over_time")
        .height(160.0)
        .legend(Legend::default())
        .link_axis(link, [true, false])
        .y_axis_label("Posts")
        .x_axis_formatter(|mark, _range| format_hour(mark.value))
        .show(ui, |plot_ui| {
            plot_ui.line(
                Line::new("Post count", PlotPoints::from(posts))
                    .color(DesignSystem::ACCENT_SECONDARY)
                    .width(1.5),
            );
        });
}

/// Hourly post count against the price change of the same hour
pub fn render_scatter(ui: &mut egui::Ui, report: &AnalysisReport) {
    let points: Vec<[f64; 2]> = report
        .scatter
        .iter()
        .map(|p| [p.post_count, p.price_change])
        .collect();

    Plot::new("posts_vs_price_change")
        .height(260.0)
        .x_axis_label("Posts per hour")
        .y_axis_label("Price change (USD)")
        .show(ui, |plot_ui| {
            plot_ui.points(
                Points::new("Hours", points)
                    .radius(3.0)
                    .color(DesignSystem::ACCENT_SECONDARY),
            );
        });
}
