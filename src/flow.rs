//! Donation flow state machine.
//!
//! [`DonationFlow::step`] is a pure transition function: it takes the current
//! flow and an event and returns the next flow plus the effects the driver
//! must carry out. The only effect that touches the outside world is
//! [`Effect::Dispatch`], emitted exactly once when the flow enters
//! `Processing`.

use std::time::Duration;

use crate::amount::{apply_amount_edit, normalize_address, validate_amount_text, PositiveAmount};
use crate::error::DonationError;
use crate::tiers::{TierKey, TierTable};
use crate::transfer::TransferReceipt;

/// How long the thank-you screen stays up before the modal closes itself.
pub const SUCCESS_DISPLAY: Duration = Duration::from_secs(3);

/// Currency a donation settles in.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SettlementAsset {
    #[default]
    Stable,
    Native,
}

/// One submit action, consumed by the driver.
#[derive(Clone, Debug, PartialEq)]
pub struct DonationRequest {
    pub id: u64,
    pub recipient_address: String,
    pub tier: TierKey,
    pub amount: PositiveAmount,
    pub asset: SettlementAsset,
    pub chain_id: u64,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FlowState {
    Idle,
    TierSelected,
    Processing,
    Succeeded,
    Failed(String),
}

impl FlowState {
    pub fn is_processing(&self) -> bool {
        matches!(self, FlowState::Processing)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum FlowEvent {
    Open,
    Close,
    SelectTier(TierKey),
    EditAmount(String),
    SelectAsset(SettlementAsset),
    Submit { wallet_connected: bool },
    TransferSucceeded { id: u64, receipt: TransferReceipt },
    TransferFailed { id: u64, reason: String },
    ResetElapsed { id: u64 },
}

#[derive(Clone, Debug, PartialEq)]
pub enum Effect {
    /// Send this request to the wallet.
    Dispatch(DonationRequest),
    /// Deliver `ResetElapsed { id }` after `after`.
    ScheduleReset { id: u64, after: Duration },
    /// Inform listeners of a finished request.
    Succeeded { request: DonationRequest, receipt: TransferReceipt },
    Failed { request: DonationRequest, reason: String },
}

/// Per-widget values that do not change while the modal is open.
#[derive(Clone, Debug, PartialEq)]
pub struct FlowContext {
    pub recipient_address: String,
    pub chain_id: u64,
    pub tiers: TierTable,
}

/// The whole UI state of one widget instance.
#[derive(Clone, Debug, PartialEq)]
pub struct DonationFlow {
    pub state: FlowState,
    pub open: bool,
    pub selected: Option<TierKey>,
    pub amount_text: String,
    pub asset: SettlementAsset,
    /// Inline validation message shown under the options.
    pub notice: Option<String>,
    /// Request currently dispatched, if any.
    pub in_flight: Option<DonationRequest>,
    pub last_receipt: Option<TransferReceipt>,
    next_id: u64,
}

impl Default for DonationFlow {
    fn default() -> Self {
        Self {
            state: FlowState::Idle,
            open: false,
            selected: None,
            amount_text: String::new(),
            asset: SettlementAsset::default(),
            notice: None,
            in_flight: None,
            last_receipt: None,
            next_id: 1,
        }
    }
}

impl DonationFlow {
    pub fn new() -> Self {
        Self::default()
    }

    /// Message for the modal's error line, if any.
    pub fn error_message(&self) -> Option<&str> {
        match &self.state {
            FlowState::Failed(reason) => Some(reason.as_str()),
            _ => self.notice.as_deref(),
        }
    }

    pub fn can_submit(&self) -> bool {
        self.open && !matches!(self.state, FlowState::Processing | FlowState::Succeeded)
    }

    /// Drop all UI state except the request counter.
    fn cleared(&self) -> Self {
        Self {
            next_id: self.next_id,
            ..Self::default()
        }
    }

    /// Apply one event.
    pub fn step(mut self, ctx: &FlowContext, event: FlowEvent) -> (Self, Vec<Effect>) {
        let mut effects = Vec::new();
        match event {
            FlowEvent::Open => {
                self.open = true;
            }
            FlowEvent::Close => {
                // The external call is not cancelled; its outcome is ignored.
                self = self.cleared();
            }
            FlowEvent::SelectTier(key) => {
                if matches!(self.state, FlowState::Idle | FlowState::TierSelected | FlowState::Failed(_)) {
                    self.selected = Some(key);
                    self.notice = None;
                    self.state = FlowState::TierSelected;
                }
            }
            FlowEvent::EditAmount(proposed) => {
                if !matches!(self.state, FlowState::Processing | FlowState::Succeeded) {
                    self.amount_text = apply_amount_edit(&self.amount_text, &proposed);
                }
            }
            FlowEvent::SelectAsset(asset) => {
                if !self.state.is_processing() {
                    self.asset = asset;
                }
            }
            FlowEvent::Submit { wallet_connected } => {
                if !self.can_submit() {
                    return (self, effects);
                }
                let finalized = self.finalize(ctx).and_then(|selection| {
                    if wallet_connected {
                        Ok(selection)
                    } else {
                        Err(DonationError::WalletNotConnected)
                    }
                });
                match finalized {
                    Err(e) if e.is_local() => {
                        self.notice = Some(e.to_string());
                        if self.selected.is_some() {
                            self.state = FlowState::TierSelected;
                        }
                    }
                    Err(e) => {
                        self.notice = None;
                        self.state = FlowState::Failed(e.to_string());
                    }
                    Ok((tier, amount, asset)) => {
                        let request = DonationRequest {
                            id: self.next_id,
                            recipient_address: normalize_address(&ctx.recipient_address),
                            tier,
                            amount,
                            asset,
                            chain_id: ctx.chain_id,
                        };
                        self.next_id += 1;
                        self.notice = None;
                        self.state = FlowState::Processing;
                        self.in_flight = Some(request.clone());
                        effects.push(Effect::Dispatch(request));
                    }
                }
            }
            FlowEvent::TransferSucceeded { id, receipt } => {
                if let Some(request) = self.take_in_flight(id) {
                    self.state = FlowState::Succeeded;
                    self.last_receipt = Some(receipt.clone());
                    effects.push(Effect::Succeeded { request, receipt });
                    effects.push(Effect::ScheduleReset {
                        id,
                        after: SUCCESS_DISPLAY,
                    });
                }
            }
            FlowEvent::TransferFailed { id, reason } => {
                if let Some(request) = self.take_in_flight(id) {
                    self.state = FlowState::Failed(reason.clone());
                    effects.push(Effect::Failed { request, reason });
                }
            }
            FlowEvent::ResetElapsed { id } => {
                let current = self.next_id.checked_sub(1) == Some(id);
                if self.state == FlowState::Succeeded && current {
                    self = self.cleared();
                }
            }
        }
        (self, effects)
    }

    fn take_in_flight(&mut self, id: u64) -> Option<DonationRequest> {
        if !self.state.is_processing() {
            return None;
        }
        match &self.in_flight {
            Some(request) if request.id == id => self.in_flight.take(),
            _ => None,
        }
    }

    /// Resolve the selection into an amount and settlement asset.
    fn finalize(&self, ctx: &FlowContext) -> Result<(TierKey, PositiveAmount, SettlementAsset), DonationError> {
        let tier = self.selected.ok_or(DonationError::NoTierSelected)?;
        if tier.is_custom() {
            let amount = validate_amount_text(&self.amount_text)?;
            Ok((tier, amount, self.asset))
        } else {
            let amount = PositiveAmount::from_value(ctx.tiers.get(tier).value)?;
            Ok((tier, amount, SettlementAsset::Stable))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tiers::{DonationAmount, TierOverrides};
    use ethers::types::TxHash;

    fn ctx() -> FlowContext {
        FlowContext {
            recipient_address: "c386788e19e53d7237eafa955386567d50a4dc60".to_string(),
            chain_id: 8453,
            tiers: TierTable::defaults(),
        }
    }

    fn receipt() -> TransferReceipt {
        TransferReceipt {
            tx_hash: TxHash::repeat_byte(0xab),
            block_number: Some(7),
        }
    }

    /// Apply events in order, collecting every effect.
    fn run(flow: DonationFlow, events: Vec<FlowEvent>) -> (DonationFlow, Vec<Effect>) {
        let ctx = ctx();
        let mut all = Vec::new();
        let mut flow = flow;
        for event in events {
            let (next, effects) = flow.step(&ctx, event);
            flow = next;
            all.extend(effects);
        }
        (flow, all)
    }

    fn dispatched(effects: &[Effect]) -> Vec<&DonationRequest> {
        effects
            .iter()
            .filter_map(|e| match e {
                Effect::Dispatch(r) => Some(r),
                _ => None,
            })
            .collect()
    }

    // ==================== selection tests ====================

    #[test]
    fn test_select_tier_from_idle() {
        let (flow, effects) = run(DonationFlow::new(), vec![FlowEvent::Open, FlowEvent::SelectTier(TierKey::HalfTank)]);
        assert_eq!(flow.state, FlowState::TierSelected);
        assert_eq!(flow.selected, Some(TierKey::HalfTank));
        assert!(effects.is_empty());
    }

    #[test]
    fn test_reselect_overwrites_and_clears_error() {
        let (flow, _) = run(
            DonationFlow::new(),
            vec![
                FlowEvent::Open,
                FlowEvent::SelectTier(TierKey::Custom),
                FlowEvent::Submit { wallet_connected: true },
                FlowEvent::SelectTier(TierKey::FullTank),
            ],
        );
        assert_eq!(flow.selected, Some(TierKey::FullTank));
        assert_eq!(flow.error_message(), None);
    }

    #[test]
    fn test_amount_filter_applies_per_keystroke() {
        let (flow, _) = run(
            DonationFlow::new(),
            vec![
                FlowEvent::Open,
                FlowEvent::SelectTier(TierKey::Custom),
                FlowEvent::EditAmount("12.5".into()),
                FlowEvent::EditAmount("12.5.".into()),
                FlowEvent::EditAmount("12.5x".into()),
            ],
        );
        assert_eq!(flow.amount_text, "12.5");
    }

    // ==================== submit tests ====================

    #[test]
    fn test_submit_without_tier_stays_idle() {
        let (flow, effects) = run(
            DonationFlow::new(),
            vec![FlowEvent::Open, FlowEvent::Submit { wallet_connected: true }],
        );
        assert_eq!(flow.state, FlowState::Idle);
        assert_eq!(flow.error_message(), Some("Please select a donation option"));
        assert!(effects.is_empty());
    }

    #[test]
    fn test_custom_zero_rejected_locally() {
        let (flow, effects) = run(
            DonationFlow::new(),
            vec![
                FlowEvent::Open,
                FlowEvent::SelectTier(TierKey::Custom),
                FlowEvent::EditAmount("0".into()),
                FlowEvent::Submit { wallet_connected: true },
            ],
        );
        assert_eq!(flow.state, FlowState::TierSelected);
        assert_eq!(flow.error_message(), Some("Please enter a valid amount"));
        assert!(dispatched(&effects).is_empty());
    }

    #[test]
    fn test_custom_empty_rejected_locally() {
        let (flow, effects) = run(
            DonationFlow::new(),
            vec![
                FlowEvent::Open,
                FlowEvent::SelectTier(TierKey::Custom),
                FlowEvent::Submit { wallet_connected: false },
            ],
        );
        // Amount validation runs before the wallet check.
        assert_eq!(flow.state, FlowState::TierSelected);
        assert_eq!(flow.error_message(), Some("Please enter a valid amount"));
        assert!(effects.is_empty());
    }

    #[test]
    fn test_submit_disconnected_fails_without_dispatch() {
        let (flow, effects) = run(
            DonationFlow::new(),
            vec![
                FlowEvent::Open,
                FlowEvent::SelectTier(TierKey::SpareChange),
                FlowEvent::Submit { wallet_connected: false },
            ],
        );
        assert_eq!(flow.state, FlowState::Failed("Please connect your wallet first".into()));
        assert!(effects.is_empty());
        assert!(flow.in_flight.is_none());
    }

    #[test]
    fn test_submit_preset_dispatches_stable_request() {
        let (flow, effects) = run(
            DonationFlow::new(),
            vec![
                FlowEvent::Open,
                FlowEvent::SelectAsset(SettlementAsset::Native),
                FlowEvent::SelectTier(TierKey::FullTank),
                FlowEvent::Submit { wallet_connected: true },
            ],
        );
        assert_eq!(flow.state, FlowState::Processing);
        let requests = dispatched(&effects);
        assert_eq!(requests.len(), 1);
        let request = requests[0];
        assert_eq!(request.tier, TierKey::FullTank);
        assert_eq!(request.amount.as_str(), "20");
        assert_eq!(request.asset, SettlementAsset::Stable);
        assert_eq!(request.chain_id, 8453);
        assert_eq!(request.recipient_address, "0xc386788e19e53d7237eafa955386567d50a4dc60");
    }

    #[test]
    fn test_submit_custom_uses_selected_asset() {
        let (_, effects) = run(
            DonationFlow::new(),
            vec![
                FlowEvent::Open,
                FlowEvent::SelectTier(TierKey::Custom),
                FlowEvent::EditAmount(".25".into()),
                FlowEvent::SelectAsset(SettlementAsset::Native),
                FlowEvent::Submit { wallet_connected: true },
            ],
        );
        let request = dispatched(&effects)[0].clone();
        assert_eq!(request.amount.as_str(), "0.25");
        assert_eq!(request.asset, SettlementAsset::Native);
    }

    #[test]
    fn test_overridden_tier_value_is_used() {
        let ctx = FlowContext {
            tiers: TierTable::defaults().with_overrides(&TierOverrides::new().with(
                TierKey::HalfTank,
                DonationAmount::new("Lunch", 15.0, "Buy me lunch", "🍔"),
            )),
            ..ctx()
        };
        let flow = DonationFlow::new();
        let (flow, _) = flow.step(&ctx, FlowEvent::Open);
        let (flow, _) = flow.step(&ctx, FlowEvent::SelectTier(TierKey::HalfTank));
        let (_, effects) = flow.step(&ctx, FlowEvent::Submit { wallet_connected: true });
        assert_eq!(dispatched(&effects)[0].amount.as_str(), "15");
    }

    #[test]
    fn test_second_submit_while_processing_is_noop() {
        let (flow, effects) = run(
            DonationFlow::new(),
            vec![
                FlowEvent::Open,
                FlowEvent::SelectTier(TierKey::HalfTank),
                FlowEvent::Submit { wallet_connected: true },
                FlowEvent::Submit { wallet_connected: true },
                FlowEvent::SelectTier(TierKey::FullTank),
            ],
        );
        assert_eq!(dispatched(&effects).len(), 1);
        assert_eq!(flow.state, FlowState::Processing);
        assert_eq!(flow.selected, Some(TierKey::HalfTank));
    }

    // ==================== outcome tests ====================

    #[test]
    fn test_full_tank_success_then_reset() {
        let (flow, effects) = run(
            DonationFlow::new(),
            vec![
                FlowEvent::Open,
                FlowEvent::SelectTier(TierKey::FullTank),
                FlowEvent::Submit { wallet_connected: true },
                FlowEvent::TransferSucceeded { id: 1, receipt: receipt() },
            ],
        );
        assert_eq!(flow.state, FlowState::Succeeded);
        assert!(effects.contains(&Effect::ScheduleReset { id: 1, after: SUCCESS_DISPLAY }));

        let (flow, _) = flow.step(&ctx(), FlowEvent::ResetElapsed { id: 1 });
        assert_eq!(flow.state, FlowState::Idle);
        assert!(!flow.open);
        assert_eq!(flow.selected, None);
        assert_eq!(flow.amount_text, "");
    }

    #[test]
    fn test_failure_then_resubmit_goes_straight_to_processing() {
        let (flow, effects) = run(
            DonationFlow::new(),
            vec![
                FlowEvent::Open,
                FlowEvent::SelectTier(TierKey::SpareChange),
                FlowEvent::Submit { wallet_connected: true },
                FlowEvent::TransferFailed { id: 1, reason: "user rejected".into() },
            ],
        );
        assert_eq!(flow.state, FlowState::Failed("user rejected".into()));
        assert!(effects.iter().any(|e| matches!(e, Effect::Failed { reason, .. } if reason == "user rejected")));

        let (flow, effects) = flow.step(&ctx(), FlowEvent::Submit { wallet_connected: true });
        assert_eq!(flow.state, FlowState::Processing);
        assert_eq!(dispatched(&effects)[0].id, 2);
    }

    #[test]
    fn test_close_discards_state_and_late_outcome_is_ignored() {
        let (flow, _) = run(
            DonationFlow::new(),
            vec![
                FlowEvent::Open,
                FlowEvent::SelectTier(TierKey::SpareChange),
                FlowEvent::Submit { wallet_connected: true },
                FlowEvent::Close,
                FlowEvent::Open,
                FlowEvent::TransferSucceeded { id: 1, receipt: receipt() },
            ],
        );
        assert_eq!(flow.state, FlowState::Idle);
        assert!(flow.open);
        assert!(flow.last_receipt.is_none());
    }

    #[test]
    fn test_stale_outcome_does_not_finish_newer_request() {
        let (flow, _) = run(
            DonationFlow::new(),
            vec![
                FlowEvent::Open,
                FlowEvent::SelectTier(TierKey::SpareChange),
                FlowEvent::Submit { wallet_connected: true },
                FlowEvent::Close,
                FlowEvent::Open,
                FlowEvent::SelectTier(TierKey::HalfTank),
                FlowEvent::Submit { wallet_connected: true },
                FlowEvent::TransferFailed { id: 1, reason: "late".into() },
            ],
        );
        assert_eq!(flow.state, FlowState::Processing);
        assert_eq!(flow.in_flight.as_ref().map(|r| r.id), Some(2));
    }

    #[test]
    fn test_stale_reset_is_ignored() {
        let (flow, _) = run(
            DonationFlow::new(),
            vec![
                FlowEvent::Open,
                FlowEvent::SelectTier(TierKey::SpareChange),
                FlowEvent::Submit { wallet_connected: true },
                FlowEvent::TransferSucceeded { id: 1, receipt: receipt() },
                FlowEvent::Close,
                FlowEvent::Open,
                FlowEvent::SelectTier(TierKey::HalfTank),
                FlowEvent::ResetElapsed { id: 1 },
            ],
        );
        assert_eq!(flow.state, FlowState::TierSelected);
        assert!(flow.open);
    }

    #[test]
    fn test_close_from_any_state_is_idle() {
        let states = vec![
            vec![FlowEvent::Open],
            vec![FlowEvent::Open, FlowEvent::SelectTier(TierKey::Custom)],
            vec![
                FlowEvent::Open,
                FlowEvent::SelectTier(TierKey::HalfTank),
                FlowEvent::Submit { wallet_connected: false },
            ],
        ];
        for events in states {
            let (flow, _) = run(DonationFlow::new(), events);
            let (flow, effects) = flow.step(&ctx(), FlowEvent::Close);
            assert_eq!(flow.state, FlowState::Idle);
            assert!(!flow.open);
            assert!(effects.is_empty());
        }
    }
}
