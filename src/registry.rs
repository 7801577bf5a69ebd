//! Chain token registry.
//!
//! Maps a chain ID to the stablecoin contract and decimal scales used when
//! settling a donation on that chain. Lookup is total: an unregistered chain
//! resolves to the registry's default chain.

use crate::config::{get_block_explorer_url, DEFAULT_CHAIN_ID};
use crate::error::RegistryError;

/// Token settings for one chain.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChainTokenEntry {
    pub chain_id: u64,
    pub network: &'static str,
    pub token_symbol: &'static str,
    /// Stablecoin contract, `0x` + 40 hex digits.
    pub token_contract: &'static str,
    /// Decimals of the stablecoin.
    pub decimals: u8,
    pub native_symbol: &'static str,
    pub native_decimals: u8,
}

impl ChainTokenEntry {
    pub const fn usdc(
        chain_id: u64,
        network: &'static str,
        token_contract: &'static str,
        native_symbol: &'static str,
    ) -> Self {
        Self {
            chain_id,
            network,
            token_symbol: "USDC",
            token_contract,
            decimals: 6,
            native_symbol,
            native_decimals: 18,
        }
    }
}

/// Circle USDC deployments on the supported chains.
pub const BUILTIN_TOKENS: &[ChainTokenEntry] = &[
    ChainTokenEntry::usdc(8453, "Base", "0x833589fCD6eDb6E08f4c7C32D4f71b54bdA02913", "ETH"),
    ChainTokenEntry::usdc(84532, "Base Sepolia", "0x036CbD53842c5426634e7929541eC2318f3dCF7e", "ETH"),
    ChainTokenEntry::usdc(1, "Ethereum", "0xA0b86991c6218b36c1d19D4a2e9Eb0cE3606eB48", "ETH"),
    ChainTokenEntry::usdc(11155111, "Sepolia", "0x1c7D4B196Cb0C7B01d743Fbc6116a902379C7238", "ETH"),
    ChainTokenEntry::usdc(10, "Optimism", "0x0b2C639c533813f4Aa9D7837CAf62653d097Ff85", "ETH"),
    ChainTokenEntry::usdc(42161, "Arbitrum One", "0xaf88d065e77c8cC2239327C5EDb448A569583e31", "ETH"),
    ChainTokenEntry::usdc(137, "Polygon", "0x3c499c542cEF5E3811e1192ce70d8cC03d5c3359", "POL"),
    ChainTokenEntry::usdc(43114, "Avalanche C-Chain", "0xB97EF9Ef8734C71904D8002F8b6Bc66Dd9c48a6E", "AVAX"),
];

/// Immutable chain → token table with a designated default chain.
#[derive(Clone, Debug)]
pub struct TokenRegistry {
    entries: Vec<ChainTokenEntry>,
    default_index: usize,
}

impl TokenRegistry {
    /// Build a registry; `default_chain_id` must be one of `entries`.
    pub fn new(entries: Vec<ChainTokenEntry>, default_chain_id: u64) -> Result<Self, RegistryError> {
        for (i, entry) in entries.iter().enumerate() {
            if entries[..i].iter().any(|e| e.chain_id == entry.chain_id) {
                return Err(RegistryError::DuplicateChain(entry.chain_id));
            }
        }
        let default_index = entries
            .iter()
            .position(|e| e.chain_id == default_chain_id)
            .ok_or(RegistryError::MissingDefaultChain(default_chain_id))?;
        Ok(Self {
            entries,
            default_index,
        })
    }

    /// The built-in USDC table, defaulting to Base.
    pub fn builtin() -> Self {
        Self {
            entries: BUILTIN_TOKENS.to_vec(),
            default_index: 0,
        }
    }

    pub fn default_chain_id(&self) -> u64 {
        self.entries[self.default_index].chain_id
    }

    pub fn is_registered(&self, chain_id: u64) -> bool {
        self.entries.iter().any(|e| e.chain_id == chain_id)
    }

    /// Entry for `chain_id`, or the default chain's entry when unregistered.
    pub fn lookup(&self, chain_id: u64) -> &ChainTokenEntry {
        self.entries
            .iter()
            .find(|e| e.chain_id == chain_id)
            .unwrap_or(&self.entries[self.default_index])
    }

    pub fn entries(&self) -> &[ChainTokenEntry] {
        &self.entries
    }

    /// Explorer link for a transaction on the chain `lookup(chain_id)` resolves to.
    pub fn tx_explorer_url(&self, chain_id: u64, tx_hash: &str) -> Option<String> {
        let entry = self.lookup(chain_id);
        get_block_explorer_url(entry.chain_id).map(|base| format!("{}/tx/{}", base, tx_hash))
    }

    pub fn address_explorer_url(&self, chain_id: u64, address: &str) -> Option<String> {
        let entry = self.lookup(chain_id);
        get_block_explorer_url(entry.chain_id).map(|base| format!("{}/address/{}", base, address))
    }
}

impl Default for TokenRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}
