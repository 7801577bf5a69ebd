//! Docs view implementation
//!
//! Usage snippet plus reference tables for configuration options, default
//! tiers, supported chains and listener hooks.

use crate::config::{DEFAULT_BUTTON_TEXT, DEFAULT_CHAIN_ID, DEFAULT_MODAL_DESCRIPTION, DEFAULT_MODAL_TITLE};
use crate::gui::app::DemoApp;
use crate::gui::helpers::{format_tier_value, short_address};
use crate::tiers::TierTable;
use eframe::egui::{self, RichText};
use egui_extras::{Column, TableBuilder};

const USAGE: &str = r#"use paymygas::{gui::widgets::PayMyGas, registry::TokenRegistry, EthersWallet, PayMyGasConfig};

let config = PayMyGasConfig::new("0xYourAddress")
    .button_text("⛽️ Pay My Gas")
    .modal_title("Support My Work");
let mut widget = PayMyGas::new("donate", config, wallet.clone(), Arc::new(TokenRegistry::builtin()));

// inside your egui update:
widget.show(ui, &theme);"#;

const ROW_HEIGHT: f32 = 22.0;

impl DemoApp {
    pub(crate) fn view_docs(&mut self, ui: &mut egui::Ui) {
        self.render_section_header(ui, "📖", "Documentation");

        ui.label(RichText::new("Usage").size(18.0).strong());
        ui.add_space(self.theme.spacing_xs);
        let mut usage = USAGE;
        ui.add(egui::TextEdit::multiline(&mut usage).code_editor().desired_width(f32::INFINITY));
        ui.add_space(self.theme.spacing_lg);

        ui.label(RichText::new("Configuration").size(18.0).strong());
        ui.add_space(self.theme.spacing_xs);
        self.render_props_table(ui);
        ui.add_space(self.theme.spacing_lg);

        ui.label(RichText::new("Default donation options").size(18.0).strong());
        ui.label(
            RichText::new("Override any key through donation_options; an override replaces the whole entry.")
                .small()
                .color(self.theme.text_secondary),
        );
        ui.add_space(self.theme.spacing_xs);
        self.render_tier_table(ui);
        ui.add_space(self.theme.spacing_lg);

        ui.label(RichText::new("Supported chains").size(18.0).strong());
        ui.label(
            RichText::new(format!(
                "Unregistered chain IDs settle with the chain {} entry.",
                self.registry.default_chain_id()
            ))
            .small()
            .color(self.theme.text_secondary),
        );
        ui.add_space(self.theme.spacing_xs);
        self.render_registry_table(ui);
        ui.add_space(self.theme.spacing_lg);

        ui.label(RichText::new("Transaction events").size(18.0).strong());
        ui.add_space(self.theme.spacing_xs);
        render_table(
            ui,
            "events_table",
            &["Hook", "Called when"],
            &[
                vec!["on_submitted(request, tx_hash)".to_string(), "The wallet broadcast the transfer".to_string()],
                vec!["on_success(request, receipt)".to_string(), "The transfer was mined".to_string()],
                vec!["on_error(request, reason)".to_string(), "The wallet or RPC rejected the transfer".to_string()],
            ],
        );
    }

    fn render_props_table(&self, ui: &mut egui::Ui) {
        let rows = vec![
            vec!["recipient_address".into(), "String".into(), "required".into(), "Address that receives donations; 0x is added when missing".into()],
            vec!["chain_id".into(), "u64".into(), DEFAULT_CHAIN_ID.to_string(), "Chain the donation settles on".into()],
            vec!["button_text".into(), "String".into(), format!("\"{}\"", DEFAULT_BUTTON_TEXT), "Text on the trigger button".into()],
            vec!["button_class".into(), "String".into(), "\"\"".into(), "Trigger style token: amber, purple, pink, gradient".into()],
            vec!["modal_title".into(), "String".into(), format!("\"{}\"", DEFAULT_MODAL_TITLE), "Title of the modal".into()],
            vec!["modal_description".into(), "String".into(), format!("\"{}\"", DEFAULT_MODAL_DESCRIPTION), "Text under the title".into()],
            vec!["donation_options".into(), "map".into(), "{}".into(), "Per-tier overrides keyed by spare_change, half_tank, full_tank, custom".into()],
            vec!["custom_button".into(), "closure".into(), "none".into(), "Render your own trigger with PayMyGas::with_custom_button".into()],
        ];
        render_table(ui, "props_table", &["Option", "Type", "Default", "Description"], &rows);
    }

    fn render_tier_table(&self, ui: &mut egui::Ui) {
        let stable = self.registry.lookup(self.registry.default_chain_id()).token_symbol;
        let rows: Vec<Vec<String>> = TierTable::defaults()
            .iter()
            .map(|(key, option)| {
                let value = if key.is_custom() {
                    "user entered".to_string()
                } else {
                    format_tier_value(option, stable)
                };
                vec![
                    key.as_str().to_string(),
                    format!("{} {}", option.icon, option.label),
                    value,
                    option.description.clone(),
                ]
            })
            .collect();
        render_table(ui, "tier_table", &["Key", "Label", "Value", "Description"], &rows);
    }

    fn render_registry_table(&self, ui: &mut egui::Ui) {
        let rows: Vec<Vec<String>> = self
            .registry
            .entries()
            .iter()
            .map(|entry| {
                vec![
                    entry.chain_id.to_string(),
                    entry.network.to_string(),
                    format!("{} ({} dp)", entry.token_symbol, entry.decimals),
                    short_address(entry.token_contract),
                    entry.native_symbol.to_string(),
                ]
            })
            .collect();
        render_table(ui, "registry_table", &["Chain ID", "Network", "Token", "Contract", "Native"], &rows);
    }
}

/// Striped table with a fixed header; the last column takes the remaining width.
fn render_table(ui: &mut egui::Ui, id: &str, headers: &[&str], rows: &[Vec<String>]) {
    ui.push_id(id, |ui| {
        let mut builder = TableBuilder::new(ui).striped(true).vscroll(false);
        for _ in 1..headers.len() {
            builder = builder.column(Column::auto().at_least(90.0));
        }
        builder
            .column(Column::remainder())
            .header(ROW_HEIGHT, |mut header| {
                for title in headers {
                    header.col(|ui| {
                        ui.strong(*title);
                    });
                }
            })
            .body(|mut body| {
                for row in rows {
                    body.row(ROW_HEIGHT, |mut table_row| {
                        for (i, cell) in row.iter().enumerate() {
                            table_row.col(|ui| {
                                if i == 0 {
                                    ui.monospace(cell.as_str());
                                } else {
                                    ui.label(cell.as_str());
                                }
                            });
                        }
                    });
                }
            });
    });
}
