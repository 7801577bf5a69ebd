//! Examples view implementation
//!
//! One tab per preset configuration, each with a live widget and the JSON
//! that produces it.

use crate::gui::app::{DemoApp, ExampleTab};
use eframe::egui::{self, RichText};

impl DemoApp {
    pub(crate) fn view_examples(&mut self, ui: &mut egui::Ui) {
        self.render_section_header(ui, "🧪", "Examples");
        ui.label(
            RichText::new("Different ways to configure the widget. Every button below is live.")
                .color(self.theme.text_secondary),
        );
        ui.add_space(self.theme.spacing_md);

        ui.horizontal_wrapped(|ui| {
            for tab in ExampleTab::ALL {
                if ui.selectable_label(self.example_tab == tab, tab.label()).clicked() {
                    self.example_tab = tab;
                }
            }
        });
        ui.add_space(self.theme.spacing_md);

        let tab = self.example_tab;
        let theme = self.theme;
        let json = self
            .example_widget_mut(tab)
            .map(|w| serde_json::to_string_pretty(w.config()).unwrap_or_else(|e| format!("<{}>", e)))
            .unwrap_or_default();

        ui.columns(2, |columns| {
            theme.frame_panel().show(&mut columns[0], |ui| {
                ui.set_min_height(220.0);
                ui.label(RichText::new(tab.label()).size(18.0).strong());
                ui.label(RichText::new(example_blurb(tab)).small().color(theme.text_secondary));
                ui.add_space(theme.spacing_lg);
                ui.vertical_centered(|ui| {
                    if let Some(widget) = self.example_widget_mut(tab) {
                        widget.show(ui, &theme);
                    }
                });
            });

            theme.frame_panel().show(&mut columns[1], |ui| {
                ui.label(RichText::new("Configuration").strong());
                ui.add_space(theme.spacing_xs);
                let mut text = json.as_str();
                ui.add(
                    egui::TextEdit::multiline(&mut text)
                        .code_editor()
                        .desired_width(f32::INFINITY),
                );
                if ui.add(theme.button_small("📋 Copy")).clicked() {
                    ui.output_mut(|o| o.copied_text = json.clone());
                }
            });
        });

        ui.add_space(self.theme.spacing_lg);
        self.theme.frame_surface().show(ui, |ui| {
            ui.label(RichText::new("Transaction events").strong());
            ui.label(
                RichText::new(
                    "Each widget reports submitted, confirmed and failed donations to a DonationListener. \
                     The demo routes them to the notification panel in the bottom-right corner.",
                )
                .small()
                .color(self.theme.text_secondary),
            );
        });
    }
}

fn example_blurb(tab: ExampleTab) -> &'static str {
    match tab {
        ExampleTab::Default => "The stock widget: Spare Change, Half Tank, Full Tank and a custom amount.",
        ExampleTab::Coffee => "Coffee and lunch tiers on an amber, pill-shaped trigger.",
        ExampleTab::Membership => "Bronze, silver and gold supporter tiers.",
        ExampleTab::Creator => "Likes and superfans for content creators.",
        ExampleTab::Custom => "A hand-drawn trigger passed in as a render closure.",
    }
}
