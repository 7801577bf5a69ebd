//! Error types for the donation flow and the wallet boundary.

use thiserror::Error;

/// Failures surfaced to the donor inside the modal.
///
/// The `Display` text is exactly what the widget shows on its error line.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DonationError {
    #[error("Please select a donation option")]
    NoTierSelected,
    #[error("Please enter a valid amount")]
    InvalidAmount,
    #[error("Please connect your wallet first")]
    WalletNotConnected,
    #[error(transparent)]
    Transfer(#[from] TransferError),
}

impl DonationError {
    /// Local errors never reach the wallet; they block submission in place.
    pub fn is_local(&self) -> bool {
        matches!(self, DonationError::NoTierSelected | DonationError::InvalidAmount)
    }
}

/// Errors raised while building or dispatching a transfer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransferError {
    #[error("Wallet is not connected")]
    NotConnected,
    #[error("Invalid recipient address '{0}'")]
    InvalidAddress(String),
    #[error("Invalid amount '{amount}': {reason}")]
    Amount { amount: String, reason: String },
    #[error("RPC error: {0}")]
    Rpc(String),
    #[error("Transaction rejected: {0}")]
    Rejected(String),
}

/// Errors raised while assembling a token registry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("default chain {0} has no token entry")]
    MissingDefaultChain(u64),
    #[error("chain {0} is registered twice")]
    DuplicateChain(u64),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_local_errors() {
        assert!(DonationError::NoTierSelected.is_local());
        assert!(DonationError::InvalidAmount.is_local());
        assert!(!DonationError::WalletNotConnected.is_local());
        assert!(!DonationError::Transfer(TransferError::NotConnected).is_local());
    }

    #[test]
    fn test_display_messages() {
        assert_eq!(
            DonationError::WalletNotConnected.to_string(),
            "Please connect your wallet first"
        );
        assert_eq!(
            DonationError::from(TransferError::Rejected("user denied".into())).to_string(),
            "Transaction rejected: user denied"
        );
    }
}
