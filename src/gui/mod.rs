//! GUI module for PayMyGas
//!
//! This module provides the donation widget and the showcase application,
//! built with egui/eframe.
//!
//! ## Module Structure
//!
//! - `app` - DemoApp struct, navigation and launch
//! - `theme` - Centralized theme and styling system (AppTheme)
//! - `helpers` - Formatting helpers for tiers, addresses and chains
//! - `notifications` - Notification log and the widget listener that feeds it
//! - `views` - Section rendering (home, examples, docs, wallet)
//! - `widgets` - The embeddable `PayMyGas` widget
//!
//! ## Usage
//!
//! ```no_run
//! use paymygas::config::WalletEnv;
//! use paymygas::gui;
//! use paymygas::user_settings::ShowcaseSettings;
//!
//! gui::launch(WalletEnv::from_env(), ShowcaseSettings::load()).expect("Failed to launch GUI");
//! ```

mod app;
pub mod helpers;
pub mod notifications;
pub mod theme;
pub mod views;
pub mod widgets;

// Re-export main public API
pub use app::{launch, DemoApp, DemoSection, ExampleTab, DEMO_RECIPIENT};
pub use widgets::PayMyGas;
