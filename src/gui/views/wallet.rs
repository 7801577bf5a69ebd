//! Wallet view implementation
//!
//! Contains the wallet panel rendering including:
//! - Connect / disconnect with a private key
//! - Network & RPC selection
//! - Demo recipient address
//!
//! Network and recipient changes are persisted to the showcase settings file.

use crate::config::{find_network_by_chain_id, NETWORKS};
use crate::gui::app::DemoApp;
use crate::gui::helpers::network_label;
use crate::user_settings::ShowcaseSettings;
use crate::wallet::{Endpoint, Wallet};
use eframe::egui::{self, RichText};

impl DemoApp {
    /// Render the wallet view
    pub(crate) fn view_wallet(&mut self, ui: &mut egui::Ui) {
        self.render_section_header(ui, "👛", "Wallet");
        ui.add_space(self.theme.spacing_md);

        self.render_connection_panel(ui);
        ui.add_space(self.theme.spacing_lg);
        self.render_network_panel(ui);
        ui.add_space(self.theme.spacing_lg);
        self.render_recipient_panel(ui);

        if let Some(error) = &self.wallet_form.error {
            ui.add_space(self.theme.spacing_md);
            self.theme.frame_error().show(ui, |ui| {
                ui.label(RichText::new(error).color(self.theme.error));
            });
        }

        ui.add_space(self.theme.spacing_lg);
        ui.label(
            RichText::new(format!("Settings file: {}", ShowcaseSettings::settings_path_display()))
                .small()
                .color(self.theme.text_secondary),
        );
    }

    fn render_connection_panel(&mut self, ui: &mut egui::Ui) {
        self.theme.frame_panel().show(ui, |ui| {
            ui.set_min_width(ui.available_width());
            ui.label(RichText::new("Connection").size(18.0).strong());
            ui.add_space(self.theme.spacing_sm);

            match self.wallet.account() {
                Some(account) => {
                    ui.horizontal(|ui| {
                        ui.label(RichText::new("●").color(self.theme.success));
                        ui.monospace(format!("{:#x}", account));
                    });
                    ui.add_space(self.theme.spacing_sm);
                    ui.horizontal(|ui| {
                        let address = format!("{:#x}", account);
                        let explorer = self.registry.address_explorer_url(self.wallet.chain_id(), &address);
                        if let Some(url) = explorer {
                            if ui.add(self.theme.button_small("🔗 Explorer")).clicked() {
                                if let Err(e) = open::that(&url) {
                                    tracing::warn!("Failed to open explorer link {}: {}", url, e);
                                }
                            }
                        }
                        if ui.add(self.theme.button_small("📋 Copy")).clicked() {
                            ui.output_mut(|o| o.copied_text = address);
                        }
                        if ui.add(self.theme.button_secondary("Disconnect")).clicked() {
                            self.wallet.disconnect();
                            self.notify("Wallet disconnected");
                        }
                    });
                }
                None => {
                    ui.label(
                        RichText::new("Paste a private key, or set PAYMYGAS_PRIVATE_KEY in your environment or .env file.")
                            .small()
                            .color(self.theme.text_secondary),
                    );
                    ui.add_space(self.theme.spacing_xs);
                    ui.horizontal(|ui| {
                        ui.add(
                            egui::TextEdit::singleline(&mut self.wallet_form.private_key)
                                .password(true)
                                .hint_text("0x...")
                                .desired_width(420.0),
                        );
                        if ui.add(self.theme.button_primary("Connect")).clicked() {
                            match self.wallet.connect(&self.wallet_form.private_key) {
                                Ok(address) => {
                                    self.wallet_form.private_key.clear();
                                    self.wallet_form.error = None;
                                    self.notify(format!("Wallet connected: {:#x}", address));
                                }
                                Err(e) => {
                                    self.wallet_form.error = Some(e.to_string());
                                }
                            }
                        }
                    });
                }
            }
        });
    }

    fn render_network_panel(&mut self, ui: &mut egui::Ui) {
        self.theme.frame_panel().show(ui, |ui| {
            ui.set_min_width(ui.available_width());
            ui.label(RichText::new("Network & RPC").size(18.0).strong());
            ui.add_space(self.theme.spacing_sm);

            let endpoint = self.wallet.endpoint();
            egui::Grid::new("rpc_grid")
                .num_columns(2)
                .spacing([self.theme.spacing_md, self.theme.spacing_sm])
                .show(ui, |ui| {
                    ui.label("Active:");
                    ui.label(format!("{} (#{})", network_label(endpoint.chain_id), endpoint.chain_id));
                    ui.end_row();

                    ui.label("RPC:");
                    ui.monospace(&endpoint.rpc_url);
                    ui.end_row();

                    ui.label("Switch to:");
                    egui::ComboBox::from_id_source("wallet_network")
                        .selected_text(network_label(self.wallet_form.pending_chain_id))
                        .width(240.0)
                        .show_ui(ui, |ui| {
                            for network in NETWORKS.iter() {
                                let label = format!("{} · {} · #{}", network.label, network.native_token, network.chain_id);
                                let selected = network.chain_id == self.wallet_form.pending_chain_id;
                                if ui.selectable_label(selected, label).clicked() {
                                    self.wallet_form.pending_chain_id = network.chain_id;
                                    self.wallet_form.custom_rpc = self
                                        .settings
                                        .get_custom_rpc(network.chain_id)
                                        .cloned()
                                        .unwrap_or_default();
                                    self.wallet_form.use_custom_rpc = !self.wallet_form.custom_rpc.is_empty();
                                }
                            }
                        });
                    ui.end_row();

                    ui.checkbox(&mut self.wallet_form.use_custom_rpc, "Custom RPC");
                    ui.add_enabled(
                        self.wallet_form.use_custom_rpc,
                        egui::TextEdit::singleline(&mut self.wallet_form.custom_rpc)
                            .hint_text("https://...")
                            .desired_width(360.0),
                    );
                    ui.end_row();
                });

            ui.add_space(self.theme.spacing_sm);
            if ui.add(self.theme.button_primary("Apply Network")).clicked() {
                self.apply_network();
            }
        });
    }

    fn apply_network(&mut self) {
        if self.has_pending_donations() {
            self.wallet_form.error = Some("Wait for the pending donation to finish before switching networks".to_string());
            return;
        }
        let chain_id = self.wallet_form.pending_chain_id;
        let custom = self.wallet_form.custom_rpc.trim().to_string();
        let rpc_url = if self.wallet_form.use_custom_rpc && !custom.is_empty() {
            custom.clone()
        } else {
            match find_network_by_chain_id(chain_id) {
                Some(network) => network.default_rpc.to_string(),
                None => {
                    self.wallet_form.error = Some(format!("No default RPC for chain {}", chain_id));
                    return;
                }
            }
        };

        if let Err(e) = self.wallet.switch_network(Endpoint { chain_id, rpc_url }) {
            self.wallet_form.error = Some(format!("Failed to switch network: {}", e));
            return;
        }
        self.wallet_form.error = None;

        self.settings.selected_chain_id = chain_id;
        let saved_rpc = if self.wallet_form.use_custom_rpc { custom } else { String::new() };
        self.settings.set_custom_rpc(chain_id, saved_rpc);
        if let Err(e) = self.settings.save() {
            self.notify(format!("Failed to save settings: {}", e));
        }

        let recipient = self.wallet_form.recipient.clone();
        if let Err(e) = self.rebuild_widgets(&recipient) {
            self.wallet_form.error = Some(e.to_string());
            return;
        }
        self.notify(format!("Switched to {}", network_label(chain_id)));
    }

    fn render_recipient_panel(&mut self, ui: &mut egui::Ui) {
        self.theme.frame_panel().show(ui, |ui| {
            ui.set_min_width(ui.available_width());
            ui.label(RichText::new("Demo recipient").size(18.0).strong());
            ui.label(
                RichText::new("Donations made from the demo widgets go to this address.")
                    .small()
                    .color(self.theme.text_secondary),
            );
            ui.add_space(self.theme.spacing_xs);
            ui.horizontal(|ui| {
                ui.add(
                    egui::TextEdit::singleline(&mut self.wallet_form.recipient)
                        .hint_text("0x...")
                        .desired_width(420.0),
                );
                let changed = self.wallet_form.recipient.trim() != self.settings.recipient_address;
                if ui.add_enabled(changed, self.theme.button_primary("Save")).clicked() {
                    let recipient = self.wallet_form.recipient.trim().to_string();
                    match self.rebuild_widgets(&recipient) {
                        Ok(()) => {
                            self.settings.recipient_address = recipient.clone();
                            if let Err(e) = self.settings.save() {
                                self.notify(format!("Failed to save settings: {}", e));
                            }
                            self.wallet_form.error = None;
                            self.notify(format!("Demo recipient set to {}", recipient));
                        }
                        Err(e) => self.wallet_form.error = Some(e.to_string()),
                    }
                }
            });
        });
    }
}
