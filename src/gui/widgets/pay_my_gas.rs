//! The PayMyGas donation widget
//!
//! A trigger button plus a modal window. All state lives in the widget's
//! [`DonationController`]; rendering only reads the flow and turns clicks into
//! controller calls, so any number of widgets can sit on one page.

use eframe::egui::{self, RichText};
use std::hash::Hash;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::config::PayMyGasConfig;
use crate::controller::{DonationController, DonationListener};
use crate::flow::{FlowState, SettlementAsset};
use crate::gui::helpers::{asset_symbol, format_tier_value, network_label, short_address};
use crate::gui::theme::AppTheme;
use crate::registry::{ChainTokenEntry, TokenRegistry};
use crate::tiers::TierKey;
use crate::wallet::Wallet;

/// Replacement trigger; receives the configured button text.
pub type TriggerRenderer = Box<dyn FnMut(&mut egui::Ui, &str) -> egui::Response>;

/// How often to repaint while a transfer is in flight.
const JOB_POLL_INTERVAL: Duration = Duration::from_millis(100);

pub struct PayMyGas<W: Wallet> {
    id: egui::Id,
    config: PayMyGasConfig,
    controller: DonationController<W>,
    custom_button: Option<TriggerRenderer>,
}

impl<W: Wallet> PayMyGas<W> {
    pub fn new(id_source: impl Hash, config: PayMyGasConfig, wallet: Arc<W>, registry: Arc<TokenRegistry>) -> Self {
        let controller = DonationController::new(&config, wallet, registry);
        Self {
            id: egui::Id::new(id_source),
            config,
            controller,
            custom_button: None,
        }
    }

    /// Render the trigger with `render` instead of the themed button.
    pub fn with_custom_button(
        mut self,
        render: impl FnMut(&mut egui::Ui, &str) -> egui::Response + 'static,
    ) -> Self {
        self.custom_button = Some(Box::new(render));
        self
    }

    pub fn with_listener(mut self, listener: Box<dyn DonationListener>) -> Self {
        self.controller.set_listener(listener);
        self
    }

    pub fn config(&self) -> &PayMyGasConfig {
        &self.config
    }

    pub fn controller(&self) -> &DonationController<W> {
        &self.controller
    }

    pub fn controller_mut(&mut self) -> &mut DonationController<W> {
        &mut self.controller
    }

    /// A transfer from this widget has not reported back yet.
    pub fn is_busy(&self) -> bool {
        self.controller.has_pending_job()
    }

    /// The flow would accept a submit and no earlier transfer is still running.
    fn submit_enabled(&self) -> bool {
        self.controller.flow().can_submit() && !self.is_busy()
    }

    /// Advance the controller without rendering.
    ///
    /// Hosts call this every frame for widgets that are not on screen so their
    /// transfers still complete and their listeners still fire.
    pub fn tick(&mut self, ctx: &egui::Context) {
        let now = Instant::now();
        self.controller.poll(now);
        if self.controller.has_pending_job() {
            ctx.request_repaint_after(JOB_POLL_INTERVAL);
        }
        if let Some(deadline) = self.controller.next_deadline() {
            ctx.request_repaint_after(deadline.saturating_duration_since(now));
        }
    }

    /// Render the trigger and, when open, the modal. Returns the trigger response.
    pub fn show(&mut self, ui: &mut egui::Ui, theme: &AppTheme) -> egui::Response {
        self.tick(ui.ctx());

        let response = match self.custom_button.as_mut() {
            Some(render) => render(ui, &self.config.button_text),
            None => ui
                .add(theme.button_for_class(&self.config.button_class, &self.config.button_text))
                .on_hover_text(&self.config.button_text),
        };
        if response.clicked() {
            self.controller.open();
        }

        if self.controller.flow().open {
            self.show_modal(ui.ctx(), theme);
        }

        response
    }

    fn show_modal(&mut self, ctx: &egui::Context, theme: &AppTheme) {
        // Dim everything below the window layer.
        ctx.layer_painter(egui::LayerId::new(egui::Order::PanelResizeLine, self.id.with("backdrop")))
            .rect_filled(ctx.screen_rect(), 0.0, egui::Color32::from_black_alpha(128));

        let mut open = true;
        egui::Window::new(RichText::new(&self.config.modal_title).strong().size(20.0))
            .id(self.id.with("modal"))
            .open(&mut open)
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .default_width(theme.modal_width)
            .show(ctx, |ui| {
                ui.set_width(theme.modal_width);
                ui.label(RichText::new(&self.config.modal_description).color(theme.text_secondary));
                ui.add_space(theme.spacing_md);

                if self.controller.flow().state == FlowState::Succeeded {
                    self.render_success(ui, theme);
                } else {
                    self.render_form(ui, theme);
                }
            });

        if !open {
            self.controller.close();
        }
    }

    fn render_success(&self, ui: &mut egui::Ui, theme: &AppTheme) {
        ui.vertical_centered(|ui| {
            ui.add_space(theme.spacing_lg);
            ui.label(RichText::new("⛽").size(40.0));
            ui.label(RichText::new("✔").size(32.0).color(theme.success));
            ui.add_space(theme.spacing_sm);
            ui.heading("Thank You!");
            ui.label("Your donation has been processed successfully.");

            if let Some(receipt) = &self.controller.flow().last_receipt {
                let hash = receipt.tx_hash_hex();
                ui.add_space(theme.spacing_sm);
                ui.label(RichText::new(short_address(&hash)).monospace().color(theme.text_secondary));
                if let Some(url) = self.controller.registry().tx_explorer_url(self.controller.chain_id(), &hash) {
                    if ui
                        .add(theme.button_small("🔗 Explorer"))
                        .on_hover_text("View on block explorer")
                        .clicked()
                    {
                        if let Err(e) = open::that(&url) {
                            tracing::warn!("Failed to open explorer URL: {}", e);
                        }
                    }
                }
            }
            ui.add_space(theme.spacing_lg);
        });
    }

    fn render_form(&mut self, ui: &mut egui::Ui, theme: &AppTheme) {
        let tiers = self.controller.tiers().clone();
        let entry = self.controller.registry().lookup(self.controller.chain_id()).clone();
        // A transfer started before the modal was last closed still counts.
        let processing = self.controller.flow().state.is_processing() || self.controller.has_pending_job();
        let selected = self.controller.flow().selected;

        // Tier cards, two per row
        let mut clicked = None;
        egui::Grid::new(self.id.with("tiers"))
            .num_columns(2)
            .spacing([theme.spacing_sm, theme.spacing_sm])
            .show(ui, |ui| {
                for (i, (key, option)) in tiers.iter().enumerate() {
                    let card = theme.frame_tier_card(selected == Some(key)).show(ui, |ui| {
                        ui.set_min_size(theme.card_size - egui::vec2(2.0 * theme.spacing_sm, 2.0 * theme.spacing_sm));
                        ui.vertical_centered(|ui| {
                            ui.label(RichText::new(format!("{} {}", option.icon, option.label)).strong().size(16.0));
                            ui.label(RichText::new(&option.description).small().color(theme.text_secondary));
                            if !key.is_custom() {
                                ui.label(RichText::new(format_tier_value(option, entry.token_symbol)).strong());
                            }
                        });
                    });
                    let response = card.response.interact(egui::Sense::click());
                    if response.clicked() && !processing {
                        clicked = Some(key);
                    }
                    if i % 2 == 1 {
                        ui.end_row();
                    }
                }
            });
        if let Some(key) = clicked {
            self.controller.select_tier(key);
        }

        if self.controller.flow().selected == Some(TierKey::Custom) {
            ui.add_space(theme.spacing_md);
            self.render_custom_amount(ui, theme, &entry);
        }

        ui.add_space(theme.spacing_md);
        self.render_wallet_status(ui, theme);

        if let Some(message) = self.controller.flow().error_message() {
            ui.add_space(theme.spacing_sm);
            theme.frame_error().show(ui, |ui| {
                ui.set_min_width(ui.available_width());
                ui.label(RichText::new(message).color(theme.error).small());
            });
        }

        ui.add_space(theme.spacing_md);
        let can_submit = self.submit_enabled();
        let label = if processing { "Processing..." } else { "Send Donation" };
        if ui.add_enabled(can_submit, theme.button_large(label, can_submit)).clicked() {
            self.controller.submit();
        }
    }

    fn render_custom_amount(&mut self, ui: &mut egui::Ui, theme: &AppTheme, entry: &ChainTokenEntry) {
        let flow = self.controller.flow();
        let mut text = flow.amount_text.clone();
        let asset = flow.asset;

        let mut picked = None;
        ui.horizontal(|ui| {
            let edit = ui.add(
                egui::TextEdit::singleline(&mut text)
                    .hint_text("Enter amount")
                    .desired_width(theme.modal_width - 160.0),
            );
            if edit.changed() {
                self.controller.edit_amount(text.clone());
            }
            for choice in [SettlementAsset::Stable, SettlementAsset::Native] {
                if ui.selectable_label(asset == choice, asset_symbol(entry, choice)).clicked() {
                    picked = Some(choice);
                }
            }
        });
        if let Some(choice) = picked {
            self.controller.select_asset(choice);
        }
    }

    fn render_wallet_status(&self, ui: &mut egui::Ui, theme: &AppTheme) {
        let wallet = self.controller.wallet();
        let chain_id = self.controller.chain_id();
        let registry = self.controller.registry();
        theme.frame_surface().show(ui, |ui| {
            ui.set_min_width(ui.available_width());
            if !registry.is_registered(chain_id) {
                let fallback = registry.lookup(chain_id);
                ui.label(
                    RichText::new(format!(
                        "Chain {} has no token entry; settling with {} on {}",
                        chain_id, fallback.token_symbol, fallback.network
                    ))
                    .color(theme.warning)
                    .small(),
                );
            }
            match wallet.account() {
                Some(account) => {
                    ui.horizontal(|ui| {
                        ui.label(RichText::new("●").color(theme.success));
                        ui.label(network_label(wallet.chain_id()));
                        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                            ui.monospace(short_address(&format!("{:#x}", account)));
                        });
                    });
                    if wallet.chain_id() != self.controller.chain_id() {
                        ui.label(
                            RichText::new(format!(
                                "Wrong network: this widget settles on {}",
                                network_label(self.controller.chain_id())
                            ))
                            .color(theme.warning)
                            .small(),
                        );
                    }
                }
                None => {
                    ui.horizontal(|ui| {
                        ui.label(RichText::new("●").color(theme.text_secondary));
                        ui.label(RichText::new("No wallet connected").color(theme.text_secondary));
                    });
                    ui.label(RichText::new("Connect one from the Wallet section.").small().color(theme.text_secondary));
                }
            }
        });
    }
}
