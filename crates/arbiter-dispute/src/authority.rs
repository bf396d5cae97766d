//! # Arbitration Authority
//!
//! The public face of the dispute machinery. It composes the
//! [`FeeLedger`], the [`DisputeRegistry`] and the [`AppealScheduler`], and
//! reaches the outside world only through the [`Clock`], [`FeeSink`] and
//! [`Arbitrable`] seams.
//!
//! ## Operation Atomicity
//!
//! Every public operation validates fully before it writes. When one returns
//! an error, the registry, the scheduler, the price and the event log are
//! exactly as they were before the call.
//!
//! ## Finality
//!
//! Finalizing a dispute happens in a fixed order:
//!
//! 1. the status becomes `Solved` and a `Ruling` event is recorded;
//! 2. the escrowed fee is sent to the arbitrator; a failure is logged and
//!    recorded as `FeePayoutFailed`, never rolled back;
//! 3. the requester's [`Arbitrable::rule`] is called;
//! 4. if the dispute was spawned by an appeal and its parent is not yet
//!    final, the parent is finalized with the same ruling.

use std::collections::BTreeMap;
use std::sync::Arc;

use arbiter_core::{AccountId, Amount, Clock, Timestamp};
use chrono::Duration;

use crate::appeal::{AppealScheduler, AppealWindow};
use crate::config::AuthorityConfig;
use crate::dispute::{Dispute, DisputeId, DisputeRegistry, DisputeStatus, Ruling};
use crate::error::ArbitrationError;
use crate::events::ArbitrationEvent;
use crate::fee::FeeLedger;
use crate::seams::{Arbitrable, FeeSink};

/// Issues binding rulings with a timed appeal window.
pub struct ArbitrationAuthority {
    arbitrator: AccountId,
    time_out: Duration,
    fees: FeeLedger,
    registry: DisputeRegistry,
    scheduler: AppealScheduler,
    requesters: BTreeMap<DisputeId, Arc<dyn Arbitrable>>,
    events: Vec<ArbitrationEvent>,
    clock: Arc<dyn Clock>,
    fee_sink: Arc<dyn FeeSink>,
}

impl std::fmt::Debug for ArbitrationAuthority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArbitrationAuthority")
            .field("arbitrator", &self.arbitrator)
            .field("time_out", &self.time_out)
            .field("fees", &self.fees)
            .field("disputes", &self.registry.len())
            .field("events", &self.events.len())
            .finish_non_exhaustive()
    }
}

impl ArbitrationAuthority {
    /// Build an authority from validated configuration.
    ///
    /// # Errors
    ///
    /// [`ArbitrationError::Validation`] if the configuration is out of range.
    pub fn new(
        config: AuthorityConfig,
        clock: Arc<dyn Clock>,
        fee_sink: Arc<dyn FeeSink>,
    ) -> Result<Self, ArbitrationError> {
        config.validate()?;
        let time_out = config.time_out();
        Ok(Self {
            arbitrator: config.arbitrator,
            time_out,
            fees: FeeLedger::new(config.owner, config.arbitration_price),
            registry: DisputeRegistry::new(),
            scheduler: AppealScheduler::new(),
            requesters: BTreeMap::new(),
            events: Vec::new(),
            clock,
            fee_sink,
        })
    }

    // ── Pricing ────────────────────────────────────────────────────────

    /// Cost of creating a dispute. Flat, whatever `extra_data` holds.
    pub fn arbitration_cost(&self, extra_data: &[u8]) -> Amount {
        self.fees.arbitration_cost(extra_data)
    }

    /// Cost of appealing `dispute_id`: twice the arbitration cost.
    ///
    /// # Errors
    ///
    /// [`ArbitrationError::NotFound`] for an unknown dispute and
    /// [`ArbitrationError::AmountOverflow`] if the multiple does not fit.
    pub fn appeal_cost(
        &self,
        dispute_id: DisputeId,
        extra_data: &[u8],
    ) -> Result<Amount, ArbitrationError> {
        self.registry.get(dispute_id)?;
        self.fees.appeal_cost(extra_data)
    }

    /// Change the arbitration price. Owner only.
    ///
    /// Fees already escrowed are unaffected.
    pub fn set_arbitration_price(
        &mut self,
        actor: &AccountId,
        price: Amount,
    ) -> Result<(), ArbitrationError> {
        let old_price = self.fees.set_price(actor, price).map_err(|e| {
            tracing::debug!(actor = %actor, error = %e, "price change refused");
            e
        })?;
        tracing::info!(old_price = %old_price, new_price = %price, "arbitration price changed");
        self.events.push(ArbitrationEvent::PriceChanged {
            old_price,
            new_price: price,
        });
        Ok(())
    }

    // ── Lifecycle ──────────────────────────────────────────────────────

    /// Open a dispute with `choices` possible rulings on behalf of `requester`.
    ///
    /// The whole `payment` is escrowed as the dispute's fee.
    ///
    /// # Errors
    ///
    /// [`ArbitrationError::InsufficientFee`] if `payment` is below
    /// [`arbitration_cost`](Self::arbitration_cost). No id is consumed.
    pub fn create_dispute(
        &mut self,
        requester: Arc<dyn Arbitrable>,
        choices: u64,
        extra_data: &[u8],
        payment: Amount,
    ) -> Result<DisputeId, ArbitrationError> {
        let required = self.arbitration_cost(extra_data);
        if payment < required {
            tracing::debug!(
                requester = %requester.account(),
                required = %required,
                paid = %payment,
                "dispute creation underpaid"
            );
            return Err(ArbitrationError::InsufficientFee {
                required,
                paid: payment,
            });
        }
        Ok(self.open_dispute(requester, choices, payment))
    }

    /// Rule on a dispute, overloaded by status.
    ///
    /// - `Waiting`: records `ruling` as provisional and opens the appeal window.
    /// - `Appealable`: attempts to finalize; `ruling` is ignored, since
    ///   finality always uses the provisional ruling.
    ///
    /// [`record_provisional_ruling`](Self::record_provisional_ruling) and
    /// [`finalize`](Self::finalize) are the two halves as separate operations.
    ///
    /// # Errors
    ///
    /// [`ArbitrationError::Unauthorized`], [`ArbitrationError::NotFound`],
    /// [`ArbitrationError::AlreadySolved`], [`ArbitrationError::InvalidRuling`]
    /// on the provisional path and [`ArbitrationError::AppealPeriodActive`]
    /// on the finalize path.
    pub fn give_ruling(
        &mut self,
        actor: &AccountId,
        dispute_id: DisputeId,
        ruling: Ruling,
    ) -> Result<(), ArbitrationError> {
        self.authorize_ruling(actor)?;
        let dispute = self.registry.get(dispute_id)?;
        if dispute.status == DisputeStatus::Solved {
            return Err(ArbitrationError::AlreadySolved { dispute_id });
        }
        let status = dispute.status;
        match status {
            DisputeStatus::Waiting => self.record_provisional_ruling(actor, dispute_id, ruling),
            DisputeStatus::Appealable => self.finalize(actor, dispute_id).map(|_| ()),
            DisputeStatus::Solved => Err(ArbitrationError::AlreadySolved { dispute_id }),
        }
    }

    /// Transition `Waiting → Appealable` with `ruling` as the provisional outcome.
    ///
    /// # Errors
    ///
    /// [`ArbitrationError::Unauthorized`], [`ArbitrationError::NotFound`],
    /// [`ArbitrationError::AlreadySolved`], [`ArbitrationError::InvalidRuling`],
    /// or [`ArbitrationError::NotAppealable`] if a provisional ruling exists.
    pub fn record_provisional_ruling(
        &mut self,
        actor: &AccountId,
        dispute_id: DisputeId,
        ruling: Ruling,
    ) -> Result<(), ArbitrationError> {
        self.authorize_ruling(actor)?;
        self.registry.mark_appealable(dispute_id, ruling)?;
        let now = self.clock.now();
        self.scheduler.open(dispute_id, now);
        let requester = self.registry.get(dispute_id)?.requester.clone();
        tracing::info!(
            dispute_id = %dispute_id,
            ruling = %ruling,
            at = %now,
            "provisional ruling recorded; appeal window open"
        );
        self.events.push(ArbitrationEvent::AppealPossible {
            dispute_id,
            requester,
            at: now,
        });
        Ok(())
    }

    /// Transition `Appealable → Solved` once the appeal window has elapsed.
    ///
    /// Returns the final ruling, which is always the provisional one.
    ///
    /// # Errors
    ///
    /// [`ArbitrationError::Unauthorized`], [`ArbitrationError::NotFound`],
    /// [`ArbitrationError::AlreadySolved`],
    /// [`ArbitrationError::NotAppealable`] for a dispute still `Waiting`, and
    /// [`ArbitrationError::AppealPeriodActive`] before the window elapses.
    pub fn finalize(
        &mut self,
        actor: &AccountId,
        dispute_id: DisputeId,
    ) -> Result<Ruling, ArbitrationError> {
        self.authorize_ruling(actor)?;
        let dispute = self.registry.get(dispute_id)?;
        let ruling = dispute.ruling;
        match dispute.status {
            DisputeStatus::Solved => return Err(ArbitrationError::AlreadySolved { dispute_id }),
            DisputeStatus::Waiting => {
                return Err(ArbitrationError::NotAppealable {
                    dispute_id,
                    reason: "no provisional ruling has been recorded",
                })
            }
            DisputeStatus::Appealable => {}
        }
        let (_, ends_at) = self.scheduler.period(dispute_id, self.time_out)?;
        let now = self.clock.now();
        if !self.scheduler.has_elapsed(dispute_id, now, self.time_out) {
            tracing::debug!(dispute_id = %dispute_id, ends_at = %ends_at, "finalize attempted during appeal period");
            return Err(ArbitrationError::AppealPeriodActive {
                dispute_id,
                ends_at,
            });
        }
        self.settle(dispute_id, ruling);
        Ok(ruling)
    }

    /// Escalate an `Appealable` dispute by opening a child dispute with the
    /// same choice count. The parent's status is left as it is.
    ///
    /// The whole `payment` is escrowed as the child's fee, and `appellant`
    /// becomes the child's requester.
    ///
    /// # Errors
    ///
    /// [`ArbitrationError::NotFound`], [`ArbitrationError::AlreadySolved`],
    /// [`ArbitrationError::InsufficientFee`] below
    /// [`appeal_cost`](Self::appeal_cost), and
    /// [`ArbitrationError::NotAppealable`] when there is no open window or
    /// the parent was already appealed.
    pub fn appeal(
        &mut self,
        appellant: Arc<dyn Arbitrable>,
        dispute_id: DisputeId,
        extra_data: &[u8],
        payment: Amount,
    ) -> Result<DisputeId, ArbitrationError> {
        let parent = self.registry.get(dispute_id)?;
        if parent.status == DisputeStatus::Solved {
            return Err(ArbitrationError::AlreadySolved { dispute_id });
        }
        let choices = parent.choice_count;
        let required = self.appeal_cost(dispute_id, extra_data)?;
        if payment < required {
            tracing::debug!(
                dispute_id = %dispute_id,
                required = %required,
                paid = %payment,
                "appeal underpaid"
            );
            return Err(ArbitrationError::InsufficientFee {
                required,
                paid: payment,
            });
        }
        let now = self.clock.now();
        self.scheduler
            .check_appealable(dispute_id, now, self.time_out)?;

        let child = self.registry.next_id();
        self.scheduler.attach_child(dispute_id, child)?;
        let appellant_account = appellant.account().clone();
        let opened = self.open_dispute(appellant, choices, payment);
        debug_assert_eq!(opened, child);

        tracing::info!(
            dispute_id = %dispute_id,
            child_dispute_id = %child,
            appellant = %appellant_account,
            "appeal filed"
        );
        self.events.push(ArbitrationEvent::AppealDecision {
            dispute_id,
            child_dispute_id: child,
            appellant: appellant_account,
        });
        Ok(child)
    }

    // ── Queries ────────────────────────────────────────────────────────

    /// `(start, start + time_out)` of the appeal window.
    ///
    /// # Errors
    ///
    /// [`ArbitrationError::NotFound`] for an unknown dispute and
    /// [`ArbitrationError::NotAppealable`] before any provisional ruling.
    pub fn appeal_period(
        &self,
        dispute_id: DisputeId,
    ) -> Result<(Timestamp, Timestamp), ArbitrationError> {
        self.registry.get(dispute_id)?;
        self.scheduler.period(dispute_id, self.time_out)
    }

    /// Current status of a dispute.
    pub fn dispute_status(&self, dispute_id: DisputeId) -> Result<DisputeStatus, ArbitrationError> {
        Ok(self.registry.get(dispute_id)?.status)
    }

    /// Current (possibly provisional) ruling of a dispute.
    pub fn current_ruling(&self, dispute_id: DisputeId) -> Result<Ruling, ArbitrationError> {
        Ok(self.registry.get(dispute_id)?.ruling)
    }

    /// The full dispute record.
    pub fn dispute(&self, dispute_id: DisputeId) -> Result<&Dispute, ArbitrationError> {
        self.registry.get(dispute_id)
    }

    /// The appeal window of a dispute, if one was opened.
    pub fn appeal_window(
        &self,
        dispute_id: DisputeId,
    ) -> Result<Option<&AppealWindow>, ArbitrationError> {
        self.registry.get(dispute_id)?;
        Ok(self.scheduler.window(dispute_id))
    }

    /// The dispute whose appeal spawned `dispute_id`, if any.
    pub fn parent_of(&self, dispute_id: DisputeId) -> Option<DisputeId> {
        self.scheduler.parent_of(dispute_id)
    }

    /// Number of disputes ever created.
    pub fn dispute_count(&self) -> usize {
        self.registry.len()
    }

    /// Every event recorded so far, oldest first.
    pub fn events(&self) -> &[ArbitrationEvent] {
        &self.events
    }

    /// The identity allowed to rule.
    pub fn arbitrator(&self) -> &AccountId {
        &self.arbitrator
    }

    /// The identity allowed to change the price.
    pub fn owner(&self) -> &AccountId {
        self.fees.owner()
    }

    /// The appeal window length.
    pub fn time_out(&self) -> Duration {
        self.time_out
    }

    // ── Internals ──────────────────────────────────────────────────────

    fn authorize_ruling(&self, actor: &AccountId) -> Result<(), ArbitrationError> {
        if actor != &self.arbitrator {
            tracing::debug!(actor = %actor, "ruling refused: not the arbitrator");
            return Err(ArbitrationError::Unauthorized {
                actor: actor.clone(),
                operation: "give a ruling",
            });
        }
        Ok(())
    }

    fn open_dispute(
        &mut self,
        requester: Arc<dyn Arbitrable>,
        choices: u64,
        payment: Amount,
    ) -> DisputeId {
        let account = requester.account().clone();
        let id = self.registry.allocate(account.clone(), choices, payment);
        self.requesters.insert(id, requester);
        tracing::info!(
            dispute_id = %id,
            requester = %account,
            choices,
            fee = %payment,
            "dispute created"
        );
        self.events.push(ArbitrationEvent::DisputeCreation {
            dispute_id: id,
            requester: account,
            fee_paid: payment,
        });
        id
    }

    /// Make `dispute_id` final with `ruling`, then walk up the appeal chain.
    fn settle(&mut self, dispute_id: DisputeId, ruling: Ruling) {
        let mut next = Some(dispute_id);
        while let Some(id) = next.take() {
            let dispute = match self.registry.mark_solved(id, ruling) {
                Ok(d) => d.clone(),
                Err(e) => {
                    tracing::debug!(dispute_id = %id, error = %e, "appeal chain stops");
                    break;
                }
            };
            tracing::info!(dispute_id = %id, ruling = %ruling, "dispute solved");
            self.events.push(ArbitrationEvent::Ruling {
                dispute_id: id,
                ruling,
            });
            self.pay_out(&dispute);
            if let Some(requester) = self.requesters.get(&id) {
                requester.rule(id, ruling);
            }
            next = self.scheduler.parent_of(id);
        }
    }

    fn pay_out(&mut self, dispute: &Dispute) {
        if let Err(e) = self.fee_sink.pay(&self.arbitrator, dispute.fee_paid) {
            tracing::warn!(
                dispute_id = %dispute.id,
                payee = %self.arbitrator,
                amount = %dispute.fee_paid,
                error = %e,
                "fee payout failed; ruling stands"
            );
            self.events.push(ArbitrationEvent::FeePayoutFailed {
                dispute_id: dispute.id,
                payee: self.arbitrator.clone(),
                amount: dispute.fee_paid,
                reason: e.to_string(),
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arbiter_core::ManualClock;

    use crate::seams::{InMemoryFeeSink, RecordingArbitrable};

    const PRICE: u128 = 100;
    const TIMEOUT: i64 = 3_600;
    const START: i64 = 1_700_000_000;

    fn account(name: &str) -> AccountId {
        AccountId::new(name).unwrap()
    }

    fn at(secs: i64) -> Timestamp {
        Timestamp::from_unix_secs(secs).unwrap()
    }

    struct Fixture {
        authority: ArbitrationAuthority,
        clock: Arc<ManualClock>,
        sink: Arc<InMemoryFeeSink>,
        requester: Arc<RecordingArbitrable>,
        arbitrator: AccountId,
    }

    impl Fixture {
        fn new() -> Self {
            let clock = Arc::new(ManualClock::new(at(START)));
            let sink = Arc::new(InMemoryFeeSink::new());
            let config = AuthorityConfig {
                owner: account("owner"),
                arbitrator: account("arbitrator"),
                arbitration_price: Amount::new(PRICE),
                appeal_timeout_secs: TIMEOUT as u64,
            };
            let authority = ArbitrationAuthority::new(config, clock.clone(), sink.clone()).unwrap();
            Self {
                authority,
                clock,
                sink,
                requester: Arc::new(RecordingArbitrable::new(account("escrow"))),
                arbitrator: account("arbitrator"),
            }
        }

        fn create(&mut self, choices: u64) -> DisputeId {
            self.authority
                .create_dispute(self.requester.clone(), choices, b"", Amount::new(PRICE))
                .unwrap()
        }

        fn rule(&mut self, id: DisputeId, ruling: u64) -> Result<(), ArbitrationError> {
            let arbitrator = self.arbitrator.clone();
            self.authority.give_ruling(&arbitrator, id, Ruling::new(ruling))
        }

        fn advance(&self, secs: i64) {
            self.clock.advance(Duration::seconds(secs));
        }
    }

    #[test]
    fn create_with_exact_cost_is_waiting() {
        let mut fx = Fixture::new();
        let id = fx.create(3);
        assert_eq!(fx.authority.dispute_status(id).unwrap(), DisputeStatus::Waiting);
        assert_eq!(fx.authority.dispute(id).unwrap().fee_paid, Amount::new(PRICE));
    }

    #[test]
    fn underpayment_allocates_nothing() {
        let mut fx = Fixture::new();
        let err = fx
            .authority
            .create_dispute(fx.requester.clone(), 3, b"", Amount::new(PRICE - 1))
            .unwrap_err();
        assert_eq!(
            err,
            ArbitrationError::InsufficientFee {
                required: Amount::new(PRICE),
                paid: Amount::new(PRICE - 1)
            }
        );
        assert_eq!(fx.authority.dispute_count(), 0);
        assert!(fx.authority.events().is_empty());
        assert_eq!(fx.create(3), DisputeId::new(0));
    }

    #[test]
    fn full_round_trip() {
        let mut fx = Fixture::new();
        let id = fx.create(3);
        fx.rule(id, 2).unwrap();
        assert_eq!(fx.authority.dispute_status(id).unwrap(), DisputeStatus::Appealable);
        assert_eq!(fx.authority.current_ruling(id).unwrap(), Ruling::new(2));
        assert_eq!(
            fx.authority.appeal_period(id).unwrap(),
            (at(START), at(START + TIMEOUT))
        );

        fx.advance(TIMEOUT);
        assert!(matches!(
            fx.rule(id, 2),
            Err(ArbitrationError::AppealPeriodActive { .. })
        ));
        assert_eq!(fx.authority.dispute_status(id).unwrap(), DisputeStatus::Appealable);

        fx.advance(1);
        fx.rule(id, 2).unwrap();
        assert_eq!(fx.authority.dispute_status(id).unwrap(), DisputeStatus::Solved);
        assert_eq!(fx.requester.received(), vec![(id, Ruling::new(2))]);
        assert_eq!(fx.sink.balance(&fx.arbitrator), Amount::new(PRICE));
    }

    #[test]
    fn finalize_ignores_new_ruling_argument() {
        let mut fx = Fixture::new();
        let id = fx.create(3);
        fx.rule(id, 1).unwrap();
        fx.advance(TIMEOUT + 1);
        fx.rule(id, 3).unwrap();
        assert_eq!(fx.authority.current_ruling(id).unwrap(), Ruling::new(1));
        assert_eq!(fx.requester.received(), vec![(id, Ruling::new(1))]);
    }

    #[test]
    fn finalize_accepts_out_of_range_argument() {
        let mut fx = Fixture::new();
        let id = fx.create(3);
        fx.rule(id, 2).unwrap();
        fx.advance(TIMEOUT + 1);
        fx.rule(id, 4).unwrap();
        assert_eq!(fx.authority.dispute_status(id).unwrap(), DisputeStatus::Solved);
        assert_eq!(fx.authority.current_ruling(id).unwrap(), Ruling::new(2));
        assert_eq!(fx.requester.received(), vec![(id, Ruling::new(2))]);
    }

    #[test]
    fn out_of_range_argument_during_window_is_still_early() {
        let mut fx = Fixture::new();
        let id = fx.create(3);
        fx.rule(id, 2).unwrap();
        assert!(matches!(
            fx.rule(id, 99),
            Err(ArbitrationError::AppealPeriodActive { .. })
        ));
        assert_eq!(fx.authority.dispute_status(id).unwrap(), DisputeStatus::Appealable);
    }

    #[test]
    fn solved_rejects_further_rulings() {
        let mut fx = Fixture::new();
        let id = fx.create(3);
        fx.rule(id, 2).unwrap();
        fx.advance(TIMEOUT + 1);
        fx.rule(id, 2).unwrap();
        assert_eq!(
            fx.rule(id, 1).unwrap_err(),
            ArbitrationError::AlreadySolved { dispute_id: id }
        );
        assert_eq!(fx.authority.current_ruling(id).unwrap(), Ruling::new(2));
        assert_eq!(fx.authority.dispute_status(id).unwrap(), DisputeStatus::Solved);
        assert_eq!(fx.requester.received().len(), 1);
    }

    #[test]
    fn ruling_out_of_range_changes_nothing() {
        let mut fx = Fixture::new();
        let id = fx.create(3);
        assert!(matches!(
            fx.rule(id, 4),
            Err(ArbitrationError::InvalidRuling { .. })
        ));
        assert_eq!(fx.authority.dispute_status(id).unwrap(), DisputeStatus::Waiting);
        assert!(fx.authority.appeal_window(id).unwrap().is_none());
    }

    #[test]
    fn zero_ruling_is_distinguished_by_status() {
        let mut fx = Fixture::new();
        let id = fx.create(3);
        assert_eq!(fx.authority.current_ruling(id).unwrap(), Ruling::NO_DECISION);
        fx.rule(id, 0).unwrap();
        assert_eq!(fx.authority.current_ruling(id).unwrap(), Ruling::NO_DECISION);
        assert_eq!(fx.authority.dispute_status(id).unwrap(), DisputeStatus::Appealable);
    }

    #[test]
    fn stranger_cannot_rule() {
        let mut fx = Fixture::new();
        let id = fx.create(3);
        let err = fx
            .authority
            .give_ruling(&account("mallory"), id, Ruling::new(1))
            .unwrap_err();
        assert!(matches!(err, ArbitrationError::Unauthorized { .. }));
        assert_eq!(fx.authority.dispute_status(id).unwrap(), DisputeStatus::Waiting);
    }

    #[test]
    fn unknown_dispute_is_not_found() {
        let fx = Fixture::new();
        let ghost = DisputeId::new(9);
        assert_eq!(
            fx.authority.dispute_status(ghost).unwrap_err(),
            ArbitrationError::NotFound(ghost)
        );
        assert_eq!(
            fx.authority.current_ruling(ghost).unwrap_err(),
            ArbitrationError::NotFound(ghost)
        );
        assert_eq!(
            fx.authority.appeal_period(ghost).unwrap_err(),
            ArbitrationError::NotFound(ghost)
        );
    }

    #[test]
    fn appeal_period_before_ruling_is_not_appealable() {
        let mut fx = Fixture::new();
        let id = fx.create(3);
        assert!(matches!(
            fx.authority.appeal_period(id),
            Err(ArbitrationError::NotAppealable { .. })
        ));
    }

    #[test]
    fn appeal_spawns_child_and_leaves_parent() {
        let mut fx = Fixture::new();
        let parent = fx.create(3);
        fx.rule(parent, 2).unwrap();
        let appellant = Arc::new(RecordingArbitrable::new(account("loser")));
        let child = fx
            .authority
            .appeal(appellant.clone(), parent, b"", Amount::new(2 * PRICE))
            .unwrap();
        assert_ne!(child, parent);
        assert_eq!(fx.authority.dispute_status(parent).unwrap(), DisputeStatus::Appealable);
        assert_eq!(fx.authority.dispute_status(child).unwrap(), DisputeStatus::Waiting);
        assert_eq!(fx.authority.dispute(child).unwrap().choice_count, 3);
        assert_eq!(fx.authority.dispute(child).unwrap().fee_paid, Amount::new(2 * PRICE));
        assert_eq!(fx.authority.parent_of(child), Some(parent));
        assert_eq!(
            fx.authority.appeal_window(parent).unwrap().unwrap().child_dispute_id,
            Some(child)
        );
    }

    #[test]
    fn appeal_underpaid_is_rejected() {
        let mut fx = Fixture::new();
        let parent = fx.create(3);
        fx.rule(parent, 2).unwrap();
        let err = fx
            .authority
            .appeal(fx.requester.clone(), parent, b"", Amount::new(2 * PRICE - 1))
            .unwrap_err();
        assert!(matches!(err, ArbitrationError::InsufficientFee { .. }));
        assert_eq!(fx.authority.dispute_count(), 1);
    }

    #[test]
    fn second_appeal_on_parent_is_rejected() {
        let mut fx = Fixture::new();
        let parent = fx.create(3);
        fx.rule(parent, 2).unwrap();
        fx.authority
            .appeal(fx.requester.clone(), parent, b"", Amount::new(2 * PRICE))
            .unwrap();
        let err = fx
            .authority
            .appeal(fx.requester.clone(), parent, b"", Amount::new(2 * PRICE))
            .unwrap_err();
        assert!(matches!(err, ArbitrationError::NotAppealable { .. }));
        assert_eq!(fx.authority.dispute_count(), 2);
    }

    #[test]
    fn appeal_after_window_is_rejected() {
        let mut fx = Fixture::new();
        let parent = fx.create(3);
        fx.rule(parent, 2).unwrap();
        fx.advance(TIMEOUT + 1);
        let err = fx
            .authority
            .appeal(fx.requester.clone(), parent, b"", Amount::new(2 * PRICE))
            .unwrap_err();
        assert!(matches!(err, ArbitrationError::NotAppealable { .. }));
    }

    #[test]
    fn appeal_does_not_reset_parent_window() {
        let mut fx = Fixture::new();
        let parent = fx.create(3);
        fx.rule(parent, 2).unwrap();
        fx.advance(100);
        fx.authority
            .appeal(fx.requester.clone(), parent, b"", Amount::new(2 * PRICE))
            .unwrap();
        assert_eq!(
            fx.authority.appeal_period(parent).unwrap(),
            (at(START), at(START + TIMEOUT))
        );
    }

    #[test]
    fn child_finality_settles_parent() {
        let mut fx = Fixture::new();
        let parent = fx.create(3);
        fx.rule(parent, 2).unwrap();
        let appellant = Arc::new(RecordingArbitrable::new(account("loser")));
        let child = fx
            .authority
            .appeal(appellant.clone(), parent, b"", Amount::new(2 * PRICE))
            .unwrap();
        fx.rule(child, 1).unwrap();
        fx.advance(TIMEOUT + 1);
        fx.rule(child, 1).unwrap();

        assert_eq!(fx.authority.dispute_status(child).unwrap(), DisputeStatus::Solved);
        assert_eq!(fx.authority.dispute_status(parent).unwrap(), DisputeStatus::Solved);
        assert_eq!(fx.authority.current_ruling(parent).unwrap(), Ruling::new(1));
        assert_eq!(appellant.received(), vec![(child, Ruling::new(1))]);
        assert_eq!(fx.requester.received(), vec![(parent, Ruling::new(1))]);
        assert_eq!(fx.sink.balance(&fx.arbitrator), Amount::new(3 * PRICE));
    }

    #[test]
    fn payout_failure_does_not_block_finality() {
        let mut fx = Fixture::new();
        fx.sink.reject(fx.arbitrator.clone());
        let id = fx.create(3);
        fx.rule(id, 2).unwrap();
        fx.advance(TIMEOUT + 1);
        fx.rule(id, 2).unwrap();
        assert_eq!(fx.authority.dispute_status(id).unwrap(), DisputeStatus::Solved);
        assert_eq!(fx.requester.received(), vec![(id, Ruling::new(2))]);
        assert!(fx.authority.events().iter().any(|e| matches!(
            e,
            ArbitrationEvent::FeePayoutFailed { dispute_id, .. } if *dispute_id == id
        )));
    }

    #[test]
    fn finalize_on_waiting_is_not_appealable() {
        let mut fx = Fixture::new();
        let id = fx.create(3);
        let arbitrator = fx.arbitrator.clone();
        assert!(matches!(
            fx.authority.finalize(&arbitrator, id),
            Err(ArbitrationError::NotAppealable { .. })
        ));
    }

    #[test]
    fn price_change_is_not_retroactive() {
        let mut fx = Fixture::new();
        let old = fx.create(3);
        fx.authority
            .set_arbitration_price(&account("owner"), Amount::new(500))
            .unwrap();
        assert_eq!(fx.authority.arbitration_cost(b""), Amount::new(500));
        assert_eq!(fx.authority.dispute(old).unwrap().fee_paid, Amount::new(PRICE));
        assert!(fx
            .authority
            .create_dispute(fx.requester.clone(), 3, b"", Amount::new(PRICE))
            .is_err());
    }

    #[test]
    fn only_owner_sets_price() {
        let mut fx = Fixture::new();
        let err = fx
            .authority
            .set_arbitration_price(&account("arbitrator"), Amount::new(1))
            .unwrap_err();
        assert!(matches!(err, ArbitrationError::Unauthorized { .. }));
        assert_eq!(fx.authority.arbitration_cost(b""), Amount::new(PRICE));
    }

    #[test]
    fn appeal_cost_requires_known_dispute() {
        let mut fx = Fixture::new();
        assert!(fx.authority.appeal_cost(DisputeId::new(0), b"").is_err());
        let id = fx.create(3);
        assert_eq!(
            fx.authority.appeal_cost(id, b"").unwrap(),
            Amount::new(2 * PRICE)
        );
    }

    #[test]
    fn events_follow_lifecycle() {
        let mut fx = Fixture::new();
        let id = fx.create(3);
        fx.rule(id, 2).unwrap();
        fx.advance(TIMEOUT + 1);
        fx.rule(id, 2).unwrap();
        let kinds: Vec<_> = fx
            .authority
            .events()
            .iter()
            .map(|e| match e {
                ArbitrationEvent::DisputeCreation { .. } => "creation",
                ArbitrationEvent::AppealPossible { .. } => "appeal_possible",
                ArbitrationEvent::AppealDecision { .. } => "appeal_decision",
                ArbitrationEvent::Ruling { .. } => "ruling",
                ArbitrationEvent::FeePayoutFailed { .. } => "payout_failed",
                ArbitrationEvent::PriceChanged { .. } => "price",
            })
            .collect();
        assert_eq!(kinds, vec!["creation", "appeal_possible", "ruling"]);
    }

    #[test]
    fn invalid_config_is_rejected() {
        let config = AuthorityConfig {
            owner: account("owner"),
            arbitrator: account("arbitrator"),
            arbitration_price: Amount::new(PRICE),
            appeal_timeout_secs: 0,
        };
        let clock = Arc::new(ManualClock::new(at(START)));
        let sink = Arc::new(InMemoryFeeSink::new());
        assert!(matches!(
            ArbitrationAuthority::new(config, clock, sink),
            Err(ArbitrationError::Validation(_))
        ));
    }
}
