use serde::{Deserialize, Serialize};
use std::env;

use crate::tiers::TierOverrides;

/// Chain used when a widget does not name one (Base).
pub const DEFAULT_CHAIN_ID: u64 = 8453;

pub const DEFAULT_BUTTON_TEXT: &str = "⛽️ Pay My Gas";
pub const DEFAULT_MODAL_TITLE: &str = "Support My Work";
pub const DEFAULT_MODAL_DESCRIPTION: &str =
    "Choose an amount to cover some gas and support ongoing development!";

/// Environment variables read by the showcase app.
pub const ENV_PRIVATE_KEY: &str = "PAYMYGAS_PRIVATE_KEY";
pub const ENV_RPC_URL: &str = "PAYMYGAS_RPC_URL";
pub const ENV_RECIPIENT: &str = "PAYMYGAS_RECIPIENT";

/// A predefined EVM network with label, chain ID, native token, default RPC and explorer.
#[derive(Clone, Debug)]
pub struct EvmNetwork {
    pub label: &'static str,
    pub chain_id: u64,
    pub native_token: &'static str,
    pub default_rpc: &'static str,
    pub explorer: &'static str,
}

impl EvmNetwork {
    pub const fn new(
        label: &'static str,
        chain_id: u64,
        native_token: &'static str,
        default_rpc: &'static str,
        explorer: &'static str,
    ) -> Self {
        Self {
            label,
            chain_id,
            native_token,
            default_rpc,
            explorer,
        }
    }
}

/// Networks the widget knows how to settle on.
pub const NETWORKS: &[EvmNetwork] = &[
    EvmNetwork::new("Base", 8453, "ETH", "https://mainnet.base.org", "https://basescan.org"),
    EvmNetwork::new("Base Sepolia", 84532, "ETH", "https://sepolia.base.org", "https://sepolia.basescan.org"),
    EvmNetwork::new("Ethereum", 1, "ETH", "https://ethereum-rpc.publicnode.com", "https://etherscan.io"),
    EvmNetwork::new("Sepolia", 11155111, "ETH", "https://ethereum-sepolia-rpc.publicnode.com", "https://sepolia.etherscan.io"),
    EvmNetwork::new("Optimism", 10, "ETH", "https://mainnet.optimism.io", "https://optimistic.etherscan.io"),
    EvmNetwork::new("Arbitrum One", 42161, "ETH", "https://arb1.arbitrum.io/rpc", "https://arbiscan.io"),
    EvmNetwork::new("Polygon", 137, "POL", "https://polygon-rpc.com", "https://polygonscan.com"),
    EvmNetwork::new("Avalanche C-Chain", 43114, "AVAX", "https://avalanche-c-chain-rpc.publicnode.com", "https://snowtrace.io"),
];

/// Find a network by chain ID
pub fn find_network_by_chain_id(chain_id: u64) -> Option<&'static EvmNetwork> {
    NETWORKS.iter().find(|n| n.chain_id == chain_id)
}

/// Get the block explorer base URL for a given chain ID
pub fn get_block_explorer_url(chain_id: u64) -> Option<&'static str> {
    find_network_by_chain_id(chain_id).map(|n| n.explorer)
}

/// Configuration surface of one widget instance.
///
/// Everything except the recipient has a default, so a minimal JSON config is
/// `{"recipient_address": "0x..."}`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PayMyGasConfig {
    pub recipient_address: String,
    #[serde(default = "default_chain_id")]
    pub chain_id: u64,
    #[serde(default = "default_button_text")]
    pub button_text: String,
    /// Style token for the trigger button (`amber`, `purple`, `pink`, `gradient`).
    #[serde(default)]
    pub button_class: String,
    #[serde(default = "default_modal_title")]
    pub modal_title: String,
    #[serde(default = "default_modal_description")]
    pub modal_description: String,
    #[serde(default)]
    pub donation_options: TierOverrides,
}

fn default_chain_id() -> u64 {
    DEFAULT_CHAIN_ID
}

fn default_button_text() -> String {
    DEFAULT_BUTTON_TEXT.to_string()
}

fn default_modal_title() -> String {
    DEFAULT_MODAL_TITLE.to_string()
}

fn default_modal_description() -> String {
    DEFAULT_MODAL_DESCRIPTION.to_string()
}

impl PayMyGasConfig {
    pub fn new(recipient_address: impl Into<String>) -> Self {
        Self {
            recipient_address: recipient_address.into(),
            chain_id: DEFAULT_CHAIN_ID,
            button_text: default_button_text(),
            button_class: String::new(),
            modal_title: default_modal_title(),
            modal_description: default_modal_description(),
            donation_options: TierOverrides::new(),
        }
    }

    pub fn chain_id(mut self, chain_id: u64) -> Self {
        self.chain_id = chain_id;
        self
    }

    pub fn button_text(mut self, text: impl Into<String>) -> Self {
        self.button_text = text.into();
        self
    }

    pub fn button_class(mut self, class: impl Into<String>) -> Self {
        self.button_class = class.into();
        self
    }

    pub fn modal_title(mut self, title: impl Into<String>) -> Self {
        self.modal_title = title.into();
        self
    }

    pub fn modal_description(mut self, description: impl Into<String>) -> Self {
        self.modal_description = description.into();
        self
    }

    pub fn donation_options(mut self, overrides: TierOverrides) -> Self {
        self.donation_options = overrides;
        self
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}

/// Wallet settings picked up from the environment (and `.env`).
#[derive(Clone, Debug, Default)]
pub struct WalletEnv {
    pub private_key: Option<String>,
    pub rpc_url: Option<String>,
    pub recipient: Option<String>,
}

impl WalletEnv {
    pub fn from_env() -> Self {
        let read = |name: &str| env::var(name).ok().filter(|v| !v.trim().is_empty());
        Self {
            private_key: read(ENV_PRIVATE_KEY),
            rpc_url: read(ENV_RPC_URL),
            recipient: read(ENV_RECIPIENT),
        }
    }
}
