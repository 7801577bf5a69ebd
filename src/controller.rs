//! Drives one [`DonationFlow`] against a wallet.
//!
//! The controller owns the flow, carries out its effects and turns job
//! completions and timers back into flow events. It has no rendering code, so
//! the whole widget lifecycle can be exercised without a UI.

use ethers::types::TxHash;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver};
use tracing::{debug, info, warn};

use crate::async_job::{spawn_job, AsyncJob};
use crate::config::PayMyGasConfig;
use crate::error::{DonationError, TransferError};
use crate::flow::{DonationFlow, DonationRequest, Effect, FlowContext, FlowEvent, SettlementAsset};
use crate::registry::TokenRegistry;
use crate::tiers::{self, TierKey, TierTable};
use crate::transfer::{Transfer, TransferProgress, TransferReceipt};
use crate::wallet::Wallet;

/// Hooks for embedders that want to react to donations.
pub trait DonationListener {
    fn on_submitted(&mut self, _request: &DonationRequest, _tx_hash: TxHash) {}
    fn on_success(&mut self, _request: &DonationRequest, _receipt: &TransferReceipt) {}
    fn on_error(&mut self, _request: &DonationRequest, _reason: &str) {}
}

struct InFlight {
    request: DonationRequest,
    job: AsyncJob<TransferReceipt>,
    progress: UnboundedReceiver<TransferProgress>,
}

pub struct DonationController<W: Wallet> {
    wallet: Arc<W>,
    registry: Arc<TokenRegistry>,
    ctx: FlowContext,
    flow: DonationFlow,
    in_flight: Option<InFlight>,
    reset_at: Option<(u64, Instant)>,
    listener: Option<Box<dyn DonationListener>>,
}

impl<W: Wallet> DonationController<W> {
    pub fn new(config: &PayMyGasConfig, wallet: Arc<W>, registry: Arc<TokenRegistry>) -> Self {
        let ctx = FlowContext {
            recipient_address: config.recipient_address.clone(),
            chain_id: config.chain_id,
            tiers: tiers::resolve(&config.donation_options),
        };
        Self {
            wallet,
            registry,
            ctx,
            flow: DonationFlow::new(),
            in_flight: None,
            reset_at: None,
            listener: None,
        }
    }

    pub fn set_listener(&mut self, listener: Box<dyn DonationListener>) {
        self.listener = Some(listener);
    }

    pub fn flow(&self) -> &DonationFlow {
        &self.flow
    }

    pub fn tiers(&self) -> &TierTable {
        &self.ctx.tiers
    }

    pub fn chain_id(&self) -> u64 {
        self.ctx.chain_id
    }

    pub fn registry(&self) -> &TokenRegistry {
        &self.registry
    }

    pub fn wallet(&self) -> &W {
        &self.wallet
    }

    /// A dispatched transfer has not reported back yet.
    pub fn has_pending_job(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn open(&mut self) {
        self.send(FlowEvent::Open);
    }

    pub fn close(&mut self) {
        self.send(FlowEvent::Close);
        self.reset_at = None;
    }

    pub fn select_tier(&mut self, key: TierKey) {
        self.send(FlowEvent::SelectTier(key));
    }

    pub fn edit_amount(&mut self, text: impl Into<String>) {
        self.send(FlowEvent::EditAmount(text.into()));
    }

    pub fn select_asset(&mut self, asset: SettlementAsset) {
        self.send(FlowEvent::SelectAsset(asset));
    }

    pub fn submit(&mut self) {
        let wallet_connected = self.wallet.is_connected();
        self.send(FlowEvent::Submit { wallet_connected });
    }

    /// Feed an event through the flow and run the resulting effects.
    ///
    /// A submit is dropped while an earlier transfer is still running, even if
    /// the modal was closed and reopened in between.
    pub fn send(&mut self, event: FlowEvent) {
        if matches!(event, FlowEvent::Submit { .. }) && self.in_flight.is_some() {
            debug!("Ignoring submit: a donation transfer is still in flight");
            return;
        }
        let flow = std::mem::take(&mut self.flow);
        let before = flow.state.clone();
        let (next, effects) = flow.step(&self.ctx, event);
        if next.state != before {
            debug!("Donation flow {:?} -> {:?}", before, next.state);
        }
        self.flow = next;
        for effect in effects {
            self.run_effect(effect);
        }
    }

    fn run_effect(&mut self, effect: Effect) {
        match effect {
            Effect::Dispatch(request) => self.dispatch(request),
            Effect::ScheduleReset { id, after } => {
                self.reset_at = Some((id, Instant::now() + after));
            }
            Effect::Succeeded { request, receipt } => {
                info!(
                    "Donation {} succeeded: {} {:?} tx={:#x}",
                    request.id, request.amount, request.asset, receipt.tx_hash
                );
                if let Some(listener) = self.listener.as_mut() {
                    listener.on_success(&request, &receipt);
                }
            }
            Effect::Failed { request, reason } => {
                warn!("Donation {} failed: {}", request.id, reason);
                if let Some(listener) = self.listener.as_mut() {
                    listener.on_error(&request, &reason);
                }
            }
        }
    }

    fn dispatch(&mut self, request: DonationRequest) {
        info!(
            "Dispatching donation {}: {} ({:?}) on chain {} to {}",
            request.id, request.amount, request.asset, request.chain_id, request.recipient_address
        );
        let (progress_sender, progress_receiver) = unbounded_channel();
        let wallet = self.wallet.clone();
        let registry = self.registry.clone();
        let job_request = request.clone();
        let job = spawn_job(move || async move {
            let transfer = Transfer::from_request(&job_request, &registry)?;
            let receipt = wallet.send_transfer(transfer, progress_sender).await?;
            Ok::<_, anyhow::Error>(receipt)
        });
        self.in_flight = Some(InFlight {
            request,
            job,
            progress: progress_receiver,
        });
    }

    /// Collect job progress, completions and elapsed timers.
    ///
    /// Call once per frame; returns true if anything changed.
    pub fn poll(&mut self, now: Instant) -> bool {
        let mut changed = false;

        if let Some(in_flight) = self.in_flight.as_mut() {
            while let Ok(TransferProgress::Submitted(tx_hash)) = in_flight.progress.try_recv() {
                if let Some(listener) = self.listener.as_mut() {
                    listener.on_submitted(&in_flight.request, tx_hash);
                }
                changed = true;
            }

            if let Some(result) = in_flight.job.poll() {
                let id = in_flight.request.id;
                self.in_flight = None;
                let event = match result {
                    Ok(receipt) => FlowEvent::TransferSucceeded { id, receipt },
                    Err(e) => FlowEvent::TransferFailed {
                        id,
                        reason: failure_reason(e),
                    },
                };
                self.send(event);
                changed = true;
            }
        }

        if let Some((id, deadline)) = self.reset_at {
            if now >= deadline {
                self.reset_at = None;
                self.send(FlowEvent::ResetElapsed { id });
                changed = true;
            }
        }

        changed
    }

    /// When the next timer fires, for scheduling a repaint.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.reset_at.map(|(_, at)| at)
    }
}

/// Donor-facing text for a failed transfer job.
fn failure_reason(error: anyhow::Error) -> String {
    match error.downcast::<TransferError>() {
        Ok(transfer) => DonationError::from(transfer).to_string(),
        Err(other) => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flow::{FlowState, SUCCESS_DISPLAY};
    use crate::wallet::testing::MockWallet;
    use std::sync::Mutex;
    use std::thread;
    use std::time::Duration;
    use tokio::sync::Notify;

    const RECIPIENT: &str = "c386788e19e53d7237eafa955386567d50a4dc60";

    #[derive(Default)]
    struct Recorded {
        submitted: Vec<TxHash>,
        succeeded: Vec<u64>,
        errors: Vec<String>,
    }

    struct RecordingListener(Arc<Mutex<Recorded>>);

    impl DonationListener for RecordingListener {
        fn on_submitted(&mut self, _request: &DonationRequest, tx_hash: TxHash) {
            self.0.lock().unwrap().submitted.push(tx_hash);
        }

        fn on_success(&mut self, request: &DonationRequest, _receipt: &TransferReceipt) {
            self.0.lock().unwrap().succeeded.push(request.id);
        }

        fn on_error(&mut self, _request: &DonationRequest, reason: &str) {
            self.0.lock().unwrap().errors.push(reason.to_string());
        }
    }

    fn controller(wallet: MockWallet) -> (DonationController<MockWallet>, Arc<Mutex<Recorded>>) {
        let config = PayMyGasConfig::new(RECIPIENT);
        let mut controller = DonationController::new(&config, Arc::new(wallet), Arc::new(TokenRegistry::builtin()));
        let recorded = Arc::new(Mutex::new(Recorded::default()));
        controller.set_listener(Box::new(RecordingListener(recorded.clone())));
        (controller, recorded)
    }

    /// Poll until the in-flight job reports back.
    fn settle(controller: &mut DonationController<MockWallet>) {
        let deadline = Instant::now() + Duration::from_secs(5);
        while controller.has_pending_job() {
            controller.poll(Instant::now());
            assert!(Instant::now() < deadline, "transfer job did not finish");
            thread::sleep(Duration::from_millis(5));
        }
    }

    #[test]
    fn test_full_tank_success_and_auto_reset() {
        let (mut controller, recorded) = controller(MockWallet::connected());
        controller.open();
        controller.select_tier(TierKey::FullTank);
        controller.submit();
        assert_eq!(controller.flow().state, FlowState::Processing);

        settle(&mut controller);
        assert_eq!(controller.flow().state, FlowState::Succeeded);
        assert_eq!(controller.wallet().call_count(), 1);
        {
            let recorded = recorded.lock().unwrap();
            assert_eq!(recorded.succeeded, vec![1]);
            assert_eq!(recorded.submitted.len(), 1);
        }

        // Before the delay nothing happens.
        controller.poll(Instant::now());
        assert_eq!(controller.flow().state, FlowState::Succeeded);

        controller.poll(Instant::now() + SUCCESS_DISPLAY + Duration::from_millis(50));
        let flow = controller.flow();
        assert_eq!(flow.state, FlowState::Idle);
        assert!(!flow.open);
        assert_eq!(flow.selected, None);
        assert_eq!(flow.amount_text, "");
        assert!(controller.next_deadline().is_none());
    }

    #[test]
    fn test_full_tank_sends_usdc_transfer() {
        let (mut controller, _) = controller(MockWallet::connected());
        controller.open();
        controller.select_tier(TierKey::FullTank);
        controller.submit();
        settle(&mut controller);

        let sent = controller.wallet().sent.lock().unwrap().clone();
        match &sent[0] {
            Transfer::Token { amount, symbol, .. } => {
                assert_eq!(*amount, ethers::types::U256::from(20_000_000u64));
                assert_eq!(*symbol, "USDC");
            }
            other => panic!("expected token transfer, got {:?}", other),
        }
    }

    #[test]
    fn test_custom_zero_is_rejected_locally() {
        let (mut controller, _) = controller(MockWallet::connected());
        controller.open();
        controller.select_tier(TierKey::Custom);
        controller.edit_amount("0");
        controller.submit();

        assert_eq!(controller.flow().state, FlowState::TierSelected);
        assert_eq!(controller.flow().error_message(), Some("Please enter a valid amount"));
        assert!(!controller.has_pending_job());
        assert_eq!(controller.wallet().call_count(), 0);
    }

    #[test]
    fn test_disconnected_wallet_fails_without_dispatch() {
        let (mut controller, _) = controller(MockWallet::disconnected());
        controller.open();
        controller.select_tier(TierKey::HalfTank);
        controller.submit();

        assert_eq!(
            controller.flow().state,
            FlowState::Failed("Please connect your wallet first".to_string())
        );
        assert!(!controller.has_pending_job());
        assert_eq!(controller.wallet().call_count(), 0);
    }

    #[test]
    fn test_second_submit_while_processing_is_noop() {
        let gate = Arc::new(Notify::new());
        let (mut controller, _) = controller(MockWallet::gated(gate.clone()));
        controller.open();
        controller.select_tier(TierKey::SpareChange);
        controller.submit();
        controller.submit();
        controller.poll(Instant::now());
        controller.submit();
        assert_eq!(controller.flow().state, FlowState::Processing);

        gate.notify_one();
        settle(&mut controller);
        assert_eq!(controller.wallet().call_count(), 1);
        assert_eq!(controller.flow().state, FlowState::Succeeded);
    }

    #[test]
    fn test_wallet_error_fails_and_resubmit_recovers() {
        let (mut controller, recorded) = controller(MockWallet::connected());
        *controller.wallet().fail_with.lock().unwrap() =
            Some(TransferError::Rejected("user rejected the request".into()));
        controller.open();
        controller.select_tier(TierKey::HalfTank);
        controller.submit();
        settle(&mut controller);

        assert_eq!(
            controller.flow().state,
            FlowState::Failed("Transaction rejected: user rejected the request".into())
        );
        assert_eq!(recorded.lock().unwrap().errors.len(), 1);

        *controller.wallet().fail_with.lock().unwrap() = None;
        controller.submit();
        assert_eq!(controller.flow().state, FlowState::Processing);
        settle(&mut controller);
        assert_eq!(controller.flow().state, FlowState::Succeeded);
        assert_eq!(controller.wallet().call_count(), 2);
    }

    #[test]
    fn test_malformed_recipient_fails_at_dispatch() {
        let config = PayMyGasConfig::new("xyz");
        let mut controller = DonationController::new(
            &config,
            Arc::new(MockWallet::connected()),
            Arc::new(TokenRegistry::builtin()),
        );
        controller.open();
        controller.select_tier(TierKey::SpareChange);
        controller.submit();
        settle(&mut controller);

        assert_eq!(
            controller.flow().state,
            FlowState::Failed("Invalid recipient address '0xxyz'".into())
        );
        assert_eq!(controller.wallet().call_count(), 0);
    }

    #[test]
    fn test_close_does_not_cancel_dispatched_call() {
        let gate = Arc::new(Notify::new());
        let (mut controller, recorded) = controller(MockWallet::gated(gate.clone()));
        controller.open();
        controller.select_tier(TierKey::SpareChange);
        controller.submit();
        controller.close();
        assert_eq!(controller.flow().state, FlowState::Idle);

        gate.notify_one();
        settle(&mut controller);
        // The call ran to completion but the closed modal ignores its outcome.
        assert_eq!(controller.wallet().call_count(), 1);
        assert_eq!(controller.flow().state, FlowState::Idle);
        assert!(recorded.lock().unwrap().succeeded.is_empty());
    }

    #[test]
    fn test_reopen_after_close_does_not_start_second_transfer() {
        let gate = Arc::new(Notify::new());
        let (mut controller, recorded) = controller(MockWallet::gated(gate.clone()));
        controller.open();
        controller.select_tier(TierKey::SpareChange);
        controller.submit();
        controller.close();

        controller.open();
        controller.select_tier(TierKey::FullTank);
        controller.submit();
        controller.poll(Instant::now());
        assert_eq!(controller.wallet().call_count(), 1);
        assert_eq!(controller.flow().state, FlowState::TierSelected);

        gate.notify_one();
        settle(&mut controller);
        assert!(recorded.lock().unwrap().succeeded.is_empty());

        // Once the first call has reported back a new donation can go out.
        controller.submit();
        assert_eq!(controller.flow().state, FlowState::Processing);
        gate.notify_one();
        settle(&mut controller);
        assert_eq!(controller.wallet().call_count(), 2);
        assert_eq!(controller.flow().state, FlowState::Succeeded);
    }

    #[test]
    fn test_failure_reason_keeps_transfer_text() {
        let transfer = anyhow::Error::from(TransferError::Rpc("connection refused".into()));
        assert_eq!(failure_reason(transfer), "RPC error: connection refused");
        assert_eq!(failure_reason(anyhow::anyhow!("Worker exited")), "Worker exited");
    }

    #[test]
    fn test_overrides_reach_effective_tiers() {
        let config = PayMyGasConfig::new(RECIPIENT).donation_options(crate::tiers::Preset::Coffee.overrides());
        let controller = DonationController::new(
            &config,
            Arc::new(MockWallet::connected()),
            Arc::new(TokenRegistry::builtin()),
        );
        assert_eq!(controller.tiers().get(TierKey::SpareChange).label, "Coffee");
        assert_eq!(controller.tiers().get(TierKey::FullTank).label, "Full Tank");
    }
}
