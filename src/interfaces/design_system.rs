use eframe::egui;

/// Dark palette and frames shared by the dashboard widgets
pub struct DesignSystem;

impl DesignSystem {
    // Backgrounds
    pub const BG_WINDOW: egui::Color32 = egui::Color32::from_rgb(13, 15, 20);
    pub const BG_CARD: egui::Color32 = egui::Color32::from_rgb(24, 28, 36);
    pub const BG_INPUT: egui::Color32 = egui::Color32::from_rgb(16, 19, 25);

    pub const ACCENT: egui::Color32 = egui::Color32::from_rgb(247, 147, 26); // bitcoin orange
    pub const ACCENT_SECONDARY: egui::Color32 = egui::Color32::from_rgb(66, 165, 245);

    pub const SUCCESS: egui::Color32 = egui::Color32::from_rgb(0, 200, 120);
    pub const DANGER: egui::Color32 = egui::Color32::from_rgb(235, 64, 80);

    pub const TEXT_PRIMARY: egui::Color32 = egui::Color32::from_rgb(236, 240, 245);
    pub const TEXT_SECONDARY: egui::Color32 = egui::Color32::from_gray(160);
    pub const TEXT_MUTED: egui::Color32 = egui::Color32::from_gray(105);

    pub const BORDER_SUBTLE: egui::Color32 = egui::Color32::from_rgb(48, 54, 61);

    pub const ROUNDING: f32 = 8.0;
    pub const SPACING_SMALL: f32 = 8.0;
    pub const SPACING_MEDIUM: f32 = 16.0;

    pub fn theme() -> egui::Visuals {
        let mut visuals = egui::Visuals::dark();

        visuals.window_fill = Self::BG_WINDOW;
        visuals.panel_fill = Self::BG_WINDOW;
        visuals.extreme_bg_color = Self::BG_INPUT;

        visuals.widgets.noninteractive.bg_stroke = egui::Stroke::new(1.0, Self::BORDER_SUBTLE);
        visuals.widgets.inactive.weak_bg_fill = Self::BG_CARD;
        visuals.widgets.inactive.bg_fill = Self::BG_CARD;
        visuals.widgets.active.bg_fill = Self::ACCENT;

        visuals.selection.bg_fill = Self::ACCENT.linear_multiply(0.35);
        visuals.selection.stroke = egui::Stroke::new(1.0, Self::ACCENT);

        visuals
    }

    pub fn card_frame() -> egui::Frame {
        egui::Frame::NONE
            .fill(Self::BG_CARD)
            .corner_radius(Self::ROUNDING)
            .stroke(egui::Stroke::new(1.0, Self::BORDER_SUBTLE))
            .inner_margin(Self::SPACING_MEDIUM as i8)
    }
}
