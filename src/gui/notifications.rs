//! Notification system for the GUI
//!
//! Holds notification entries and the listener that feeds widget lifecycle
//! events into them.

use ethers::types::TxHash;
use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use crate::controller::DonationListener;
use crate::flow::DonationRequest;
use crate::transfer::TransferReceipt;

/// Oldest entries are dropped past this many.
pub const MAX_NOTIFICATIONS: usize = 50;

pub type NotificationLog = Rc<RefCell<VecDeque<NotificationEntry>>>;

/// A notification entry with message and timestamp
#[derive(Clone)]
pub struct NotificationEntry {
    pub message: String,
    pub timestamp: chrono::DateTime<chrono::Local>,
}

impl NotificationEntry {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            timestamp: chrono::Local::now(),
        }
    }

    pub fn time_ago(&self) -> String {
        let now = chrono::Local::now();
        let duration = now.signed_duration_since(self.timestamp);
        if duration.num_seconds() < 60 {
            "just now".to_string()
        } else if duration.num_minutes() < 60 {
            format!("{}m ago", duration.num_minutes())
        } else if duration.num_hours() < 24 {
            format!("{}h ago", duration.num_hours())
        } else {
            self.timestamp.format("%m/%d %H:%M").to_string()
        }
    }
}

/// Append a message, keeping at most [`MAX_NOTIFICATIONS`].
pub fn push_notification(log: &NotificationLog, message: impl Into<String>) {
    let mut entries = log.borrow_mut();
    entries.push_back(NotificationEntry::new(message));
    while entries.len() > MAX_NOTIFICATIONS {
        entries.pop_front();
    }
}

/// Widget listener that writes donation events to the shared notification log.
pub struct NotificationListener {
    /// Which widget the events came from, e.g. `coffee`.
    source: String,
    log: NotificationLog,
}

impl NotificationListener {
    pub fn new(source: impl Into<String>, log: NotificationLog) -> Self {
        Self {
            source: source.into(),
            log,
        }
    }
}

impl DonationListener for NotificationListener {
    fn on_submitted(&mut self, request: &DonationRequest, tx_hash: TxHash) {
        push_notification(
            &self.log,
            format!("[{}] Donation {} submitted: {:#x}", self.source, request.amount, tx_hash),
        );
    }

    fn on_success(&mut self, request: &DonationRequest, receipt: &TransferReceipt) {
        let block = receipt
            .block_number
            .map(|b| format!(" in block {}", b))
            .unwrap_or_default();
        push_notification(
            &self.log,
            format!("[{}] Donation of {} confirmed{}", self.source, request.amount, block),
        );
    }

    fn on_error(&mut self, _request: &DonationRequest, reason: &str) {
        push_notification(&self.log, format!("[{}] Donation failed: {}", self.source, reason));
    }
}
