//! Wallet boundary.
//!
//! The widget only needs to know whether a wallet is connected and to hand it
//! a [`Transfer`]. [`EthersWallet`] is the ethers-rs backed implementation used
//! by the showcase app: a local private-key signer over an HTTP provider.

use anyhow::{anyhow, Result};
use ethers::prelude::*;
use ethers::providers::{Http, Provider};
use std::future::Future;
use std::sync::{Arc, RwLock};
use tokio::sync::mpsc::UnboundedSender;
use tracing::{info, warn};
use url::Url;

use crate::config::{find_network_by_chain_id, DEFAULT_CHAIN_ID};
use crate::error::TransferError;
use crate::transfer::{Transfer, TransferProgress, TransferReceipt};

/// What the donation widget needs from a wallet.
pub trait Wallet: Send + Sync + 'static {
    fn is_connected(&self) -> bool;

    fn account(&self) -> Option<Address>;

    /// Chain the wallet is currently pointed at.
    fn chain_id(&self) -> u64;

    /// Sign and broadcast `transfer`, reporting the hash on `progress` once known.
    fn send_transfer(
        &self,
        transfer: Transfer,
        progress: UnboundedSender<TransferProgress>,
    ) -> impl Future<Output = Result<TransferReceipt, TransferError>> + Send;
}

type Client = SignerMiddleware<Provider<Http>, LocalWallet>;

struct Session {
    signer: LocalWallet,
    client: Arc<Client>,
}

/// RPC endpoint the wallet talks to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Endpoint {
    pub chain_id: u64,
    pub rpc_url: String,
}

impl Endpoint {
    /// Endpoint for a known network using its default RPC.
    pub fn for_chain(chain_id: u64) -> Option<Self> {
        find_network_by_chain_id(chain_id).map(|n| Self {
            chain_id,
            rpc_url: n.default_rpc.to_string(),
        })
    }
}

impl Default for Endpoint {
    fn default() -> Self {
        Self {
            chain_id: DEFAULT_CHAIN_ID,
            rpc_url: "https://mainnet.base.org".to_string(),
        }
    }
}

/// Local-key wallet over an ethers HTTP provider.
pub struct EthersWallet {
    endpoint: RwLock<Endpoint>,
    session: RwLock<Option<Session>>,
}

impl EthersWallet {
    pub fn new(endpoint: Endpoint) -> Self {
        Self {
            endpoint: RwLock::new(endpoint),
            session: RwLock::new(None),
        }
    }

    pub fn endpoint(&self) -> Endpoint {
        self.endpoint
            .read()
            .map(|e| e.clone())
            .unwrap_or_default()
    }

    fn build_client(endpoint: &Endpoint, signer: LocalWallet) -> Result<Arc<Client>> {
        let url = Url::parse(&endpoint.rpc_url)?;
        let provider = Provider::<Http>::try_from(url.as_str())?;
        let signer = signer.with_chain_id(endpoint.chain_id);
        Ok(Arc::new(SignerMiddleware::new(provider, signer)))
    }

    /// Connect with a hex private key (with or without `0x`).
    pub fn connect(&self, private_key: &str) -> Result<Address> {
        let key = private_key.trim();
        let key = key.strip_prefix("0x").unwrap_or(key);
        let signer: LocalWallet = key
            .parse()
            .map_err(|e| anyhow!("Invalid private key: {}", e))?;
        let address = signer.address();
        let client = Self::build_client(&self.endpoint(), signer.clone())?;

        let mut session = self
            .session
            .write()
            .map_err(|_| anyhow!("Wallet session lock poisoned"))?;
        *session = Some(Session { signer, client });
        info!("Wallet connected as {:?}", address);
        Ok(address)
    }

    pub fn disconnect(&self) {
        if let Ok(mut session) = self.session.write() {
            if session.take().is_some() {
                info!("Wallet disconnected");
            }
        }
    }

    /// Point the wallet at another chain, rebuilding the client if connected.
    pub fn switch_network(&self, endpoint: Endpoint) -> Result<()> {
        Url::parse(&endpoint.rpc_url)?;
        {
            let mut session = self
                .session
                .write()
                .map_err(|_| anyhow!("Wallet session lock poisoned"))?;
            if let Some(active) = session.as_mut() {
                active.client = Self::build_client(&endpoint, active.signer.clone())?;
            }
        }
        info!("Wallet switched to chain {} via {}", endpoint.chain_id, endpoint.rpc_url);
        let mut current = self
            .endpoint
            .write()
            .map_err(|_| anyhow!("Wallet endpoint lock poisoned"))?;
        *current = endpoint;
        Ok(())
    }

    fn client(&self) -> Option<Arc<Client>> {
        self.session
            .read()
            .ok()
            .and_then(|s| s.as_ref().map(|s| s.client.clone()))
    }
}

impl Default for EthersWallet {
    fn default() -> Self {
        Self::new(Endpoint::default())
    }
}

/// Map a provider error onto the donor-facing taxonomy.
fn classify_send_error(message: String) -> TransferError {
    let lower = message.to_lowercase();
    if lower.contains("rejected") || lower.contains("denied") || lower.contains("insufficient funds") {
        TransferError::Rejected(message)
    } else {
        TransferError::Rpc(message)
    }
}

/// Turn a mined receipt into a donation outcome.
///
/// A receipt with status 0 reverted on chain; a missing receipt means the
/// transaction was dropped from the mempool.
fn classify_receipt(tx_hash: TxHash, receipt: Option<TransactionReceipt>) -> Result<TransferReceipt, TransferError> {
    let receipt = receipt.ok_or_else(|| {
        TransferError::Rpc(format!("transaction {:#x} was dropped before it was mined", tx_hash))
    })?;
    if receipt.status == Some(U64::zero()) {
        warn!("Donation {:#x} reverted", tx_hash);
        return Err(TransferError::Rejected("transaction reverted".to_string()));
    }
    Ok(TransferReceipt {
        tx_hash,
        block_number: receipt.block_number.map(|b| b.as_u64()),
    })
}

impl Wallet for EthersWallet {
    fn is_connected(&self) -> bool {
        self.session.read().map(|s| s.is_some()).unwrap_or(false)
    }

    fn account(&self) -> Option<Address> {
        self.session
            .read()
            .ok()
            .and_then(|s| s.as_ref().map(|s| s.signer.address()))
    }

    fn chain_id(&self) -> u64 {
        self.endpoint().chain_id
    }

    fn send_transfer(
        &self,
        transfer: Transfer,
        progress: UnboundedSender<TransferProgress>,
    ) -> impl Future<Output = Result<TransferReceipt, TransferError>> + Send {
        let client = self.client();
        async move {
            let client = client.ok_or(TransferError::NotConnected)?;
            let tx = transfer.to_request()?;
            let calldata = transfer.calldata()?;
            info!(
                "Sending donation: to={:?} target={:?} value={} data=0x{}",
                transfer.recipient(),
                transfer.target(),
                transfer.value(),
                hex::encode(&calldata)
            );

            let pending = client.send_transaction(tx, None).await.map_err(|e| {
                warn!("Donation broadcast failed: {}", e);
                classify_send_error(e.to_string())
            })?;
            let tx_hash = pending.tx_hash();
            let _ = progress.send(TransferProgress::Submitted(tx_hash));
            info!("Donation submitted: {:?}", tx_hash);

            let receipt = pending
                .await
                .map_err(|e| TransferError::Rpc(e.to_string()))?;
            classify_receipt(tx_hash, receipt)
        }
    }
}
