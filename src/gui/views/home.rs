//! Home view implementation
//!
//! Hero text, a live default widget and the feature list.

use crate::gui::app::{DemoApp, DemoSection};
use eframe::egui::{self, RichText};

const FEATURES: &[(&str, &str, &str)] = &[
    ("🔌", "Plug and Play", "Drop the widget into any egui layout with a few lines of code"),
    ("🎨", "Fully Customizable", "Style tokens, custom triggers and your own donation tiers"),
    ("🔗", "Multi-Chain Support", "Works with Base by default, configurable for other EVM chains"),
    ("👛", "Wallet Integration", "Any wallet behind the Wallet trait; a local-key signer ships with the demo"),
    ("💰", "Stablecoin or Native", "Presets settle in USDC, the custom tier can send the chain's native token"),
    ("🚀", "Fully Onchain", "No servers, no fees: the transfer goes straight to the recipient"),
];

impl DemoApp {
    pub(crate) fn view_home(&mut self, ui: &mut egui::Ui) {
        ui.vertical_centered(|ui| {
            ui.add_space(self.theme.spacing_lg);
            ui.label(
                RichText::new("0% fees. Fully onchain. Open source.")
                    .small()
                    .color(self.theme.accent_blue),
            );
            ui.add_space(self.theme.spacing_sm);
            ui.label(RichText::new("Accept Crypto Donations").size(36.0).strong());
            ui.add_space(self.theme.spacing_sm);
            ui.label(
                RichText::new(
                    "An egui widget that lets developers and content creators receive crypto donations with a clean, professional UI.",
                )
                .color(self.theme.text_secondary),
            );
            ui.add_space(self.theme.spacing_md);
            if ui.add(self.theme.button_primary("View Examples")).clicked() {
                self.section = DemoSection::Examples;
            }
        });

        ui.add_space(self.theme.spacing_xl);

        self.theme.frame_panel().show(ui, |ui| {
            ui.set_min_width(ui.available_width());
            ui.vertical_centered(|ui| {
                ui.label(RichText::new("Try PayMyGas Now").size(20.0).strong());
                ui.label(RichText::new("Click the button to see it in action").color(self.theme.text_secondary));
                ui.add_space(self.theme.spacing_md);
                let theme = self.theme;
                self.home_widget.show(ui, &theme);
                ui.add_space(self.theme.spacing_md);
            });
        });

        ui.add_space(self.theme.spacing_xl);

        ui.label(RichText::new("Why Use PayMyGas?").size(22.0).strong());
        ui.label(RichText::new("The easiest way to accept crypto donations in your app").color(self.theme.text_secondary));
        ui.add_space(self.theme.spacing_md);

        egui::Grid::new("features_grid")
            .num_columns(3)
            .spacing([self.theme.spacing_md, self.theme.spacing_md])
            .show(ui, |ui| {
                for (i, (icon, title, description)) in FEATURES.iter().enumerate() {
                    self.theme.frame_surface().show(ui, |ui| {
                        ui.set_width(240.0);
                        ui.label(RichText::new(*icon).size(28.0));
                        ui.label(RichText::new(*title).strong());
                        ui.label(RichText::new(*description).small().color(self.theme.text_secondary));
                    });
                    if i % 3 == 2 {
                        ui.end_row();
                    }
                }
            });
    }
}
