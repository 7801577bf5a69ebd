//! Main GUI application module
//!
//! Contains the DemoApp struct: navigation, the live demo widgets and the
//! notification overlay.

use crate::{
    config::{PayMyGasConfig, WalletEnv},
    registry::TokenRegistry,
    tiers::Preset,
    user_settings::ShowcaseSettings,
    wallet::{Endpoint, EthersWallet, Wallet},
};
use anyhow::{anyhow, Result};
use eframe::{egui, egui::RichText, App, Frame, NativeOptions};
use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;
use std::sync::Arc;

use super::notifications::{push_notification, NotificationListener, NotificationLog};
use super::theme::{configure_style, AppTheme};
use super::widgets::PayMyGas;

/// Recipient used by the demo widgets until one is configured.
pub const DEMO_RECIPIENT: &str = "0xc386788e19e53d7237eafa955386567d50a4dc60";

/// GUI section enum for navigation
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DemoSection {
    Home,
    Examples,
    Docs,
    Wallet,
}

/// Tabs on the examples page
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExampleTab {
    Default,
    Coffee,
    Membership,
    Creator,
    Custom,
}

impl ExampleTab {
    pub const ALL: [ExampleTab; 5] = [
        ExampleTab::Default,
        ExampleTab::Coffee,
        ExampleTab::Membership,
        ExampleTab::Creator,
        ExampleTab::Custom,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            ExampleTab::Default => "Default",
            ExampleTab::Coffee => "Coffee & Lunch",
            ExampleTab::Membership => "Membership Tiers",
            ExampleTab::Creator => "Content Creator",
            ExampleTab::Custom => "Custom Design",
        }
    }

    /// Short name used as widget id and notification source.
    pub fn key(&self) -> &'static str {
        match self {
            ExampleTab::Default => "default",
            ExampleTab::Coffee => "coffee",
            ExampleTab::Membership => "membership",
            ExampleTab::Creator => "creator",
            ExampleTab::Custom => "custom",
        }
    }

    fn index(&self) -> usize {
        match self {
            ExampleTab::Default => 0,
            ExampleTab::Coffee => 1,
            ExampleTab::Membership => 2,
            ExampleTab::Creator => 3,
            ExampleTab::Custom => 4,
        }
    }

    /// Widget configuration shown on this tab.
    pub fn config(&self, recipient: &str, chain_id: u64) -> PayMyGasConfig {
        let base = PayMyGasConfig::new(recipient).chain_id(chain_id);
        match self {
            ExampleTab::Default => base,
            ExampleTab::Coffee => base
                .button_text("☕ Buy Me a Coffee")
                .button_class("amber")
                .modal_title("Buy Me a Coffee")
                .modal_description("Your support helps me continue creating!")
                .donation_options(Preset::Coffee.overrides()),
            ExampleTab::Membership => base
                .button_text("🏆 Support My Work")
                .button_class("purple")
                .modal_title("Become a Supporter")
                .modal_description("Choose your membership tier to support my work!")
                .donation_options(Preset::Membership.overrides()),
            ExampleTab::Creator => base
                .button_text("❤️ Support My Content")
                .button_class("pink")
                .modal_title("Support My Content")
                .modal_description("Your support inspires me to create more content!")
                .donation_options(Preset::Creator.overrides()),
            ExampleTab::Custom => base
                .button_text("🎨 Custom Design")
                .button_class("gradient")
                .modal_title("Support This Project")
                .modal_description("Choose how much you'd like to contribute!"),
        }
    }
}

/// Editing state of the wallet page
#[derive(Default)]
pub(crate) struct WalletFormState {
    pub(crate) private_key: String,
    pub(crate) recipient: String,
    pub(crate) pending_chain_id: u64,
    pub(crate) custom_rpc: String,
    pub(crate) use_custom_rpc: bool,
    pub(crate) error: Option<String>,
}

pub struct DemoApp {
    pub(crate) theme: AppTheme,
    pub(crate) section: DemoSection,
    pub(crate) wallet: Arc<EthersWallet>,
    pub(crate) registry: Arc<TokenRegistry>,
    pub(crate) settings: ShowcaseSettings,
    pub(crate) notifications: NotificationLog,
    pub(crate) show_notifications_popup: bool,
    pub(crate) home_widget: PayMyGas<EthersWallet>,
    pub(crate) example_widgets: Vec<PayMyGas<EthersWallet>>,
    pub(crate) example_tab: ExampleTab,
    pub(crate) wallet_form: WalletFormState,
}

impl DemoApp {
    fn new(env: WalletEnv, settings: ShowcaseSettings, ctx: &egui::Context) -> Self {
        let theme = AppTheme::default();
        configure_style(ctx, &theme);

        let notifications: NotificationLog = Rc::new(RefCell::new(VecDeque::with_capacity(20)));
        let registry = Arc::new(TokenRegistry::builtin());

        let rpc_url = env
            .rpc_url
            .clone()
            .or_else(|| settings.effective_rpc(settings.selected_chain_id));
        let endpoint = match rpc_url {
            Some(rpc_url) => Endpoint {
                chain_id: settings.selected_chain_id,
                rpc_url,
            },
            None => Endpoint::default(),
        };
        let wallet = Arc::new(EthersWallet::new(endpoint));
        if let Some(key) = &env.private_key {
            match wallet.connect(key) {
                Ok(address) => push_notification(&notifications, format!("Wallet connected: {:#x}", address)),
                Err(e) => {
                    tracing::warn!("Failed to connect wallet from environment: {}", e);
                    push_notification(&notifications, format!("Wallet from environment rejected: {}", e));
                }
            }
        }

        let recipient = [settings.recipient_address.as_str(), env.recipient.as_deref().unwrap_or("")]
            .into_iter()
            .find(|r| !r.trim().is_empty())
            .unwrap_or(DEMO_RECIPIENT)
            .to_string();

        let wallet_form = WalletFormState {
            recipient: recipient.clone(),
            pending_chain_id: wallet.endpoint().chain_id,
            custom_rpc: settings
                .get_custom_rpc(settings.selected_chain_id)
                .cloned()
                .unwrap_or_default(),
            use_custom_rpc: settings.get_custom_rpc(settings.selected_chain_id).is_some(),
            ..Default::default()
        };

        let mut app = Self {
            home_widget: Self::build_home_widget(&recipient, &wallet, &registry, &notifications),
            example_widgets: Vec::new(),
            theme,
            section: DemoSection::Home,
            wallet,
            registry,
            settings,
            notifications,
            show_notifications_popup: false,
            example_tab: ExampleTab::Default,
            wallet_form,
        };
        app.example_widgets = app.build_example_widgets(&recipient);
        app
    }

    fn build_home_widget(
        recipient: &str,
        wallet: &Arc<EthersWallet>,
        registry: &Arc<TokenRegistry>,
        notifications: &NotificationLog,
    ) -> PayMyGas<EthersWallet> {
        let config = PayMyGasConfig::new(recipient)
            .chain_id(wallet.endpoint().chain_id)
            .modal_title("Support This Project");
        PayMyGas::new("home", config, wallet.clone(), registry.clone())
            .with_listener(Box::new(NotificationListener::new("home", notifications.clone())))
    }

    fn build_example_widgets(&self, recipient: &str) -> Vec<PayMyGas<EthersWallet>> {
        let theme = self.theme;
        ExampleTab::ALL
            .iter()
            .map(|tab| {
                let widget = PayMyGas::new(
                    tab.key(),
                    tab.config(recipient, self.wallet.endpoint().chain_id),
                    self.wallet.clone(),
                    self.registry.clone(),
                )
                .with_listener(Box::new(NotificationListener::new(tab.key(), self.notifications.clone())));
                if *tab == ExampleTab::Custom {
                    widget.with_custom_button(move |ui, text| render_custom_trigger(ui, &theme, text))
                } else {
                    widget
                }
            })
            .collect()
    }

    /// A demo widget still has a transfer that has not reported back.
    pub(crate) fn has_pending_donations(&self) -> bool {
        self.home_widget.is_busy() || self.example_widgets.iter().any(|w| w.is_busy())
    }

    /// Rebuild every demo widget for `recipient` on the wallet's current chain.
    ///
    /// Refused while a donation is in flight, since dropping its widget would
    /// lose the outcome.
    pub(crate) fn rebuild_widgets(&mut self, recipient: &str) -> Result<()> {
        if self.has_pending_donations() {
            return Err(anyhow!("Wait for the pending donation to finish first"));
        }
        self.home_widget = Self::build_home_widget(recipient, &self.wallet, &self.registry, &self.notifications);
        self.example_widgets = self.build_example_widgets(recipient);
        Ok(())
    }

    /// Advance every demo widget, including the ones not on screen.
    fn tick_widgets(&mut self, ctx: &egui::Context) {
        self.home_widget.tick(ctx);
        for widget in &mut self.example_widgets {
            widget.tick(ctx);
        }
    }

    pub(crate) fn example_widget_mut(&mut self, tab: ExampleTab) -> Option<&mut PayMyGas<EthersWallet>> {
        self.example_widgets.get_mut(tab.index())
    }

    pub(crate) fn notify(&self, message: impl Into<String>) {
        push_notification(&self.notifications, message);
    }

    pub(crate) fn render_section_header(&self, ui: &mut egui::Ui, icon: &str, title: &str) {
        ui.label(
            RichText::new(self.theme.section_header_text(icon, title))
                .size(26.0)
                .strong()
                .color(self.theme.text_primary),
        );
        ui.separator();
    }

    fn render_top_bar(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            ui.add_space(self.theme.spacing_sm);
            ui.horizontal(|ui| {
                ui.heading(RichText::new("⛽ PayMyGas").strong().color(self.theme.text_primary));
                ui.label(
                    RichText::new(format!("v{}", env!("CARGO_PKG_VERSION")))
                        .size(12.0)
                        .color(self.theme.text_secondary),
                );
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    let (dot, color, text) = match self.wallet.account() {
                        Some(account) => (
                            "●",
                            self.theme.success,
                            format!(
                                "{} · {}",
                                super::helpers::network_label(self.wallet.endpoint().chain_id),
                                super::helpers::short_address(&format!("{:#x}", account))
                            ),
                        ),
                        None => ("●", self.theme.text_secondary, "Not connected".to_string()),
                    };
                    if ui
                        .add(egui::Button::new(RichText::new(text).color(self.theme.text_primary)).fill(self.theme.surface))
                        .on_hover_text("Open wallet settings")
                        .clicked()
                    {
                        self.section = DemoSection::Wallet;
                    }
                    ui.label(RichText::new(dot).color(color));
                });
            });
            ui.add_space(self.theme.spacing_sm);
        });
    }

    fn render_notifications(&mut self, ctx: &egui::Context) {
        let count = self.notifications.borrow().len();
        let latest = self.notifications.borrow().back().cloned();

        egui::Area::new(egui::Id::new("notification_overlay"))
            .anchor(egui::Align2::RIGHT_BOTTOM, [-10.0, -10.0])
            .order(egui::Order::Foreground)
            .show(ctx, |ui| {
                self.theme.frame_surface().show(ui, |ui| {
                    ui.horizontal(|ui| {
                        let icon_color = if count > 0 { self.theme.accent_blue } else { self.theme.text_secondary };
                        if ui
                            .add(
                                egui::Button::new(RichText::new("🔔").color(icon_color))
                                    .fill(egui::Color32::TRANSPARENT)
                                    .stroke(egui::Stroke::NONE),
                            )
                            .on_hover_text("Click to view notification history")
                            .clicked()
                        {
                            self.show_notifications_popup = !self.show_notifications_popup;
                        }
                        if let Some(entry) = &latest {
                            let text: String = entry.message.chars().take(48).collect();
                            ui.label(RichText::new(text).size(12.0).color(self.theme.text_primary));
                            ui.label(RichText::new(format!("({})", count)).size(10.0).color(self.theme.warning));
                        }
                    });
                });
            });

        if self.show_notifications_popup {
            egui::Window::new("Notification History")
                .collapsible(false)
                .resizable(true)
                .default_width(450.0)
                .default_height(350.0)
                .anchor(egui::Align2::RIGHT_BOTTOM, [-10.0, -60.0])
                .show(ctx, |ui| {
                    ui.horizontal(|ui| {
                        ui.label(RichText::new(format!("{} notifications", count)).color(self.theme.text_secondary));
                        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                            if ui.add(self.theme.button_small("Close")).clicked() {
                                self.show_notifications_popup = false;
                            }
                            if ui.add(self.theme.button_small("Clear")).clicked() {
                                self.notifications.borrow_mut().clear();
                            }
                        });
                    });
                    ui.separator();
                    egui::ScrollArea::vertical()
                        .auto_shrink([false, false])
                        .max_height(280.0)
                        .show(ui, |ui| {
                            let entries = self.notifications.borrow();
                            if entries.is_empty() {
                                ui.label(RichText::new("No notifications yet.").color(self.theme.text_secondary));
                            }
                            for entry in entries.iter().rev() {
                                ui.horizontal_wrapped(|ui| {
                                    ui.label(
                                        RichText::new(format!("[{}]", entry.time_ago()))
                                            .size(11.0)
                                            .color(self.theme.text_secondary),
                                    );
                                    ui.label(RichText::new(&entry.message).size(12.0));
                                });
                            }
                        });
                });
        }
    }
}

/// Trigger for the custom-design example: a two-tone framed button.
fn render_custom_trigger(ui: &mut egui::Ui, theme: &AppTheme, text: &str) -> egui::Response {
    let inner = egui::Frame::none()
        .fill(theme.accent_indigo)
        .stroke(egui::Stroke::new(2.0, theme.accent_blue))
        .rounding(14.0)
        .inner_margin(egui::Margin::symmetric(theme.spacing_lg, theme.spacing_sm))
        .show(ui, |ui| {
            ui.label(RichText::new(text).strong().size(16.0).color(egui::Color32::WHITE));
        });
    inner
        .response
        .interact(egui::Sense::click())
        .on_hover_cursor(egui::CursorIcon::PointingHand)
}

impl App for DemoApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut Frame) {
        self.tick_widgets(ctx);
        self.render_top_bar(ctx);

        egui::SidePanel::left("nav")
            .resizable(false)
            .default_width(170.0)
            .frame(egui::Frame::none().fill(self.theme.surface).inner_margin(self.theme.spacing_sm))
            .show(ctx, |ui| {
                ui.add_space(self.theme.spacing_md);
                let nav_items = [
                    (DemoSection::Home, "🏠 Home"),
                    (DemoSection::Examples, "🧪 Examples"),
                    (DemoSection::Docs, "📖 Docs"),
                    (DemoSection::Wallet, "👛 Wallet"),
                ];
                for (section, label) in nav_items {
                    let selected = self.section == section;
                    let text_color = if selected { self.theme.text_primary } else { self.theme.text_secondary };
                    let fill = if selected { self.theme.surface_active } else { egui::Color32::TRANSPARENT };
                    let response = ui.add(
                        egui::Button::new(RichText::new(label).size(14.0).color(text_color))
                            .fill(fill)
                            .stroke(egui::Stroke::NONE)
                            .min_size(egui::vec2(150.0, 32.0)),
                    );
                    if response.clicked() {
                        self.section = section;
                    }
                    ui.add_space(self.theme.spacing_xs);
                }
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.add_space(self.theme.spacing_md);
            egui::ScrollArea::vertical().show(ui, |ui| match self.section {
                DemoSection::Home => self.view_home(ui),
                DemoSection::Examples => self.view_examples(ui),
                DemoSection::Docs => self.view_docs(ui),
                DemoSection::Wallet => self.view_wallet(ui),
            });
        });

        self.render_notifications(ctx);
    }
}

pub fn launch(env: WalletEnv, settings: ShowcaseSettings) -> Result<()> {
    let app_creator = move |cc: &eframe::CreationContext<'_>| {
        Box::new(DemoApp::new(env, settings, &cc.egui_ctx)) as Box<dyn App>
    };

    let viewport = egui::ViewportBuilder::default()
        .with_inner_size([1100.0, 760.0])
        .with_min_inner_size([720.0, 520.0]);

    let native_options = NativeOptions {
        viewport,
        ..Default::default()
    };

    eframe::run_native("PayMyGas - Crypto Donation Widget", native_options, Box::new(app_creator))
        .map_err(|e| anyhow!("Failed to start GUI: {}", e))
}
