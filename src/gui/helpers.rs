//! Helper functions for the GUI
//!
//! Formatting of tier values, addresses and chain names.

use crate::config::find_network_by_chain_id;
use crate::flow::SettlementAsset;
use crate::registry::ChainTokenEntry;
use crate::tiers::DonationAmount;

/// Price line shown on a preset tier card, e.g. `$5 USDC`.
pub fn format_tier_value(option: &DonationAmount, token_symbol: &str) -> String {
    if option.value.fract() == 0.0 {
        format!("${} {}", option.value as u64, token_symbol)
    } else {
        format!("${:.2} {}", option.value, token_symbol)
    }
}

/// Shorten a `0x` address to `0x1234...abcd`.
pub fn short_address(address: &str) -> String {
    if address.len() <= 12 || !address.is_char_boundary(6) || !address.is_char_boundary(address.len() - 4) {
        return address.to_string();
    }
    format!("{}...{}", &address[..6], &address[address.len() - 4..])
}

/// Symbol of the asset a donation settles in on this chain.
pub fn asset_symbol(entry: &ChainTokenEntry, asset: SettlementAsset) -> &'static str {
    match asset {
        SettlementAsset::Stable => entry.token_symbol,
        SettlementAsset::Native => entry.native_symbol,
    }
}

/// Human name of a chain, or `Chain <id>` when unknown.
pub fn network_label(chain_id: u64) -> String {
    find_network_by_chain_id(chain_id)
        .map(|n| n.label.to_string())
        .unwrap_or_else(|| format!("Chain {}", chain_id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::TokenRegistry;

    // ==================== format_tier_value tests ====================

    #[test]
    fn test_format_tier_value_whole() {
        let option = DonationAmount::new("Spare Change", 5.0, "Send a small tip", "🪙");
        assert_eq!(format_tier_value(&option, "USDC"), "$5 USDC");
    }

    #[test]
    fn test_format_tier_value_fractional() {
        let option = DonationAmount::new("Tip", 2.5, "", "");
        assert_eq!(format_tier_value(&option, "USDC"), "$2.50 USDC");
    }

    // ==================== short_address tests ====================

    #[test]
    fn test_short_address() {
        assert_eq!(
            short_address("0xc386788e19e53d7237eafa955386567d50a4dc60"),
            "0xc386...dc60"
        );
    }

    #[test]
    fn test_short_address_leaves_short_input() {
        assert_eq!(short_address("0x1234"), "0x1234");
        assert_eq!(short_address(""), "");
    }

    // ==================== asset / network tests ====================

    #[test]
    fn test_asset_symbol() {
        let registry = TokenRegistry::builtin();
        let polygon = registry.lookup(137);
        assert_eq!(asset_symbol(polygon, SettlementAsset::Stable), "USDC");
        assert_eq!(asset_symbol(polygon, SettlementAsset::Native), "POL");
    }

    #[test]
    fn test_network_label() {
        assert_eq!(network_label(8453), "Base");
        assert_eq!(network_label(31337), "Chain 31337");
    }
}
