//! PayMyGas: an embeddable crypto donation widget for egui.
//!
//! The donation logic (tier tables, amount validation, the chain token
//! registry and the flow state machine) lives in plain modules with no UI
//! dependency. [`gui`] renders it as a button plus modal and hosts the
//! showcase app.

pub mod amount;
pub mod async_job;
pub mod config;
pub mod controller;
pub mod error;
pub mod flow;
pub mod gui;
pub mod registry;
pub mod tiers;
pub mod transfer;
pub mod user_settings;
pub mod wallet;

pub use config::PayMyGasConfig;
pub use controller::{DonationController, DonationListener};
pub use error::{DonationError, TransferError};
pub use tiers::{DonationAmount, TierKey, TierOverrides};
pub use wallet::{EthersWallet, Wallet};
