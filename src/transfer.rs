//! Concrete transfers built from donation requests.

use ethers::abi::{Function, Param, ParamType, StateMutability, Token};
use ethers::prelude::*;

use crate::amount::to_base_units;
use crate::error::TransferError;
use crate::flow::{DonationRequest, SettlementAsset};
use crate::registry::TokenRegistry;

/// Function selector for transfer(address,uint256)
/// keccak256("transfer(address,uint256)") = 0xa9059cbb...
pub const ERC20_TRANSFER_SELECTOR: [u8; 4] = [0xa9, 0x05, 0x9c, 0xbb];

/// What to put on chain for one donation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Transfer {
    /// Plain value transfer in the chain's native unit.
    Native { to: Address, value: U256 },
    /// ERC-20 `transfer(to, amount)` call on `contract`.
    Token {
        contract: Address,
        to: Address,
        amount: U256,
        symbol: &'static str,
    },
}

impl Transfer {
    /// Resolve a request against the registry.
    ///
    /// Stablecoin transfers use the registry contract and decimals for the
    /// request's chain; native transfers use the chain's native decimals.
    pub fn from_request(request: &DonationRequest, registry: &TokenRegistry) -> Result<Self, TransferError> {
        let to: Address = request
            .recipient_address
            .parse()
            .map_err(|_| TransferError::InvalidAddress(request.recipient_address.clone()))?;
        let entry = registry.lookup(request.chain_id);

        let scale = |decimals: u8| {
            to_base_units(&request.amount, decimals).map_err(|e| TransferError::Amount {
                amount: request.amount.to_string(),
                reason: e.to_string(),
            })
        };

        match request.asset {
            SettlementAsset::Native => Ok(Transfer::Native {
                to,
                value: scale(entry.native_decimals)?,
            }),
            SettlementAsset::Stable => {
                let contract: Address = entry
                    .token_contract
                    .parse()
                    .map_err(|_| TransferError::InvalidAddress(entry.token_contract.to_string()))?;
                Ok(Transfer::Token {
                    contract,
                    to,
                    amount: scale(entry.decimals)?,
                    symbol: entry.token_symbol,
                })
            }
        }
    }

    /// Address the transaction is sent to.
    pub fn target(&self) -> Address {
        match self {
            Transfer::Native { to, .. } => *to,
            Transfer::Token { contract, .. } => *contract,
        }
    }

    pub fn recipient(&self) -> Address {
        match self {
            Transfer::Native { to, .. } | Transfer::Token { to, .. } => *to,
        }
    }

    /// Value attached to the transaction (zero for token transfers).
    pub fn value(&self) -> U256 {
        match self {
            Transfer::Native { value, .. } => *value,
            Transfer::Token { .. } => U256::zero(),
        }
    }

    pub fn calldata(&self) -> Result<Bytes, TransferError> {
        match self {
            Transfer::Native { .. } => Ok(Bytes::default()),
            Transfer::Token { to, amount, .. } => encode_erc20_transfer(*to, *amount),
        }
    }

    /// Unsigned transaction request for this transfer.
    pub fn to_request(&self) -> Result<TransactionRequest, TransferError> {
        let tx = TransactionRequest::new().to(self.target()).value(self.value());
        match self {
            Transfer::Native { .. } => Ok(tx),
            Transfer::Token { .. } => Ok(tx.data(self.calldata()?)),
        }
    }
}

/// Encode `transfer(address,uint256)` calldata.
#[allow(deprecated)]
pub fn encode_erc20_transfer(to: Address, amount: U256) -> Result<Bytes, TransferError> {
    let func = Function {
        name: "transfer".to_string(),
        inputs: vec![
            Param {
                name: "to".to_string(),
                kind: ParamType::Address,
                internal_type: None,
            },
            Param {
                name: "amount".to_string(),
                kind: ParamType::Uint(256),
                internal_type: None,
            },
        ],
        outputs: vec![Param {
            name: "".to_string(),
            kind: ParamType::Bool,
            internal_type: None,
        }],
        constant: None,
        state_mutability: StateMutability::NonPayable,
    };

    func.encode_input(&[Token::Address(to), Token::Uint(amount)])
        .map(Bytes::from)
        .map_err(|e| TransferError::Rejected(format!("Failed to encode transfer call: {}", e)))
}

/// Outcome of a broadcast transfer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransferReceipt {
    pub tx_hash: TxHash,
    pub block_number: Option<u64>,
}

impl TransferReceipt {
    pub fn tx_hash_hex(&self) -> String {
        format!("{:#x}", self.tx_hash)
    }
}

/// Progress reported by a wallet while a transfer is in flight.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TransferProgress {
    /// The transaction was broadcast and has this hash.
    Submitted(TxHash),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::amount::validate_amount_text;
    use crate::tiers::TierKey;

    const RECIPIENT: &str = "0xc386788e19e53d7237eafa955386567d50a4dc60";

    fn request(asset: SettlementAsset, amount: &str, chain_id: u64) -> DonationRequest {
        DonationRequest {
            id: 1,
            recipient_address: RECIPIENT.to_string(),
            tier: TierKey::Custom,
            amount: validate_amount_text(amount).unwrap(),
            asset,
            chain_id,
        }
    }

    // ==================== from_request tests ====================

    #[test]
    fn test_stable_transfer_targets_registry_contract() {
        let registry = TokenRegistry::builtin();
        let transfer = Transfer::from_request(&request(SettlementAsset::Stable, "20", 8453), &registry).unwrap();
        let usdc: Address = "0x833589fCD6eDb6E08f4c7C32D4f71b54bdA02913".parse().unwrap();
        assert_eq!(transfer.target(), usdc);
        assert_eq!(transfer.recipient(), RECIPIENT.parse::<Address>().unwrap());
        assert_eq!(transfer.value(), U256::zero());
        match transfer {
            Transfer::Token { amount, symbol, .. } => {
                assert_eq!(amount, U256::from(20_000_000u64));
                assert_eq!(symbol, "USDC");
            }
            other => panic!("expected token transfer, got {:?}", other),
        }
    }

    #[test]
    fn test_native_transfer_targets_recipient() {
        let registry = TokenRegistry::builtin();
        let transfer = Transfer::from_request(&request(SettlementAsset::Native, "0.01", 10), &registry).unwrap();
        assert_eq!(transfer.target(), RECIPIENT.parse::<Address>().unwrap());
        assert_eq!(transfer.value(), U256::from(10_000_000_000_000_000u64));
        assert!(transfer.calldata().unwrap().is_empty());
    }

    #[test]
    fn test_unknown_chain_uses_default_contract() {
        let registry = TokenRegistry::builtin();
        let transfer = Transfer::from_request(&request(SettlementAsset::Stable, "1", 31337), &registry).unwrap();
        let usdc: Address = registry.lookup(8453).token_contract.parse().unwrap();
        assert_eq!(transfer.target(), usdc);
    }

    #[test]
    fn test_malformed_address_is_rejected_at_dispatch() {
        let registry = TokenRegistry::builtin();
        let mut req = request(SettlementAsset::Stable, "1", 8453);
        req.recipient_address = "0xnot-hex".to_string();
        let err = Transfer::from_request(&req, &registry).unwrap_err();
        assert_eq!(err, TransferError::InvalidAddress("0xnot-hex".to_string()));
    }

    // ==================== calldata tests ====================

    #[test]
    fn test_erc20_calldata_layout() {
        let to: Address = RECIPIENT.parse().unwrap();
        let data = encode_erc20_transfer(to, U256::from(5_000_000u64)).unwrap();
        assert_eq!(data.len(), 68);
        assert_eq!(&data[..4], &ERC20_TRANSFER_SELECTOR);
        assert_eq!(&data[16..36], to.as_bytes());
        assert_eq!(U256::from_big_endian(&data[36..68]), U256::from(5_000_000u64));
        assert!(hex::encode(&data).starts_with("a9059cbb"));
    }

    #[test]
    fn test_to_request_token_has_data() {
        let registry = TokenRegistry::builtin();
        let transfer = Transfer::from_request(&request(SettlementAsset::Stable, "5", 8453), &registry).unwrap();
        let tx = transfer.to_request().unwrap();
        assert_eq!(tx.data.as_ref().map(|d| d.len()), Some(68));
    }
}
