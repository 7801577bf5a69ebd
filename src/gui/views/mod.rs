//! View modules for the GUI
//!
//! This module organizes the different view implementations of the application.
//! Each submodule contains the rendering logic for a specific section.
//!
//! ## Module Structure
//!
//! - `home` - Hero text and a live default widget
//! - `examples` - Preset configurations with live widgets and their JSON
//! - `docs` - Configuration, tier, chain and listener reference tables
//! - `wallet` - Wallet connection, network selection and demo recipient
//!
//! ## Implementation Notes
//!
//! Each view module adds a `view_*` method on `DemoApp` taking `&mut egui::Ui`.
//! These are called from the main `App::update` method in `app.rs`.

pub mod docs;
pub mod examples;
pub mod home;
pub mod wallet;
