//! Widget components for the GUI
//!
//! This module contains reusable UI widgets that can be embedded in views.
//!
//! ## Available Widgets
//!
//! - `PayMyGas` - Donation trigger button with its modal

mod pay_my_gas;

pub use pay_my_gas::{PayMyGas, TriggerRenderer};
