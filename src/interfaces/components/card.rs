use crate::interfaces::design_system::DesignSystem;
use eframe::egui;

/// Card container; `error` switches to a red outline for failure banners
pub struct Card {
    title: Option<String>,
    error: bool,
}

impl Default for Card {
    fn default() -> Self {
        Self::new()
    }
}

impl Card {
    pub fn new() -> Self {
        Self {
            title: None,
            error: false,
        }
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn error(mut self, error: bool) -> Self {
        self.error = error;
        self
    }

    pub fn show<R>(
        self,
        ui: &mut egui::Ui,
        add_contents: impl FnOnce(&mut egui::Ui) -> R,
    ) -> egui::InnerResponse<R> {
        let mut frame = DesignSystem::card_frame();
        let title_color = if self.error {
            frame = frame
                .fill(DesignSystem::DANGER.linear_multiply(0.12))
                .stroke(egui::Stroke::new(1.5, DesignSystem::DANGER));
            DesignSystem::DANGER
        } else {
            DesignSystem::TEXT_SECONDARY
        };

        frame.show(ui, |ui| {
            ui.set_width(ui.available_width());
            if let Some(title) = self.title {
                ui.label(
                    egui::RichText::new(title)
                        .size(14.0)
                        .color(title_color)
                        .strong(),
                );
                ui.add_space(DesignSystem::SPACING_SMALL);
            }

            add_contents(ui)
        })
    }
}
