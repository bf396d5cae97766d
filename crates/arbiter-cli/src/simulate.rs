//! # Simulate Subcommand
//!
//! Runs one dispute through its whole lifecycle against a manual clock and
//! prints what happened as JSON:
//!
//! 1. a requester opens a dispute paying the arbitration cost;
//! 2. the arbitrator records the provisional ruling;
//! 3. with `--appeal`, an appellant pays the appeal cost, and the child
//!    dispute is ruled (`--appeal-ruling`, defaulting to the same ruling)
//!    and finalized, which settles the parent;
//! 4. otherwise the clock moves past the appeal window and the dispute is
//!    finalized.
//!
//! When the config has a `relay:` section the requester is a remote party:
//! its final ruling is forwarded through an in-memory bridge and the bridged
//! messages appear in the report.

use std::sync::Arc;

use anyhow::{bail, Context, Result};
use arbiter_core::{AccountId, Amount, ManualClock, Timestamp};
use arbiter_dispute::{
    Arbitrable, ArbitrationAuthority, ArbitrationEvent, Dispute, DisputeId, InMemoryFeeSink,
    RecordingArbitrable, Ruling,
};
use arbiter_relay::{Envelope, InMemoryBridge, MessageRelay, RulingForwarder};
use chrono::Duration;
use clap::Args;
use serde::Serialize;

use crate::config::ArbiterConfig;

/// Default simulated start time, 2023-11-14T22:13:20Z.
pub const DEFAULT_START_UNIX_SECS: i64 = 1_700_000_000;

/// Arguments for the `arbiter simulate` subcommand.
#[derive(Args, Debug)]
pub struct SimulateArgs {
    /// Number of possible rulings.
    #[arg(long, default_value_t = 2)]
    pub choices: u64,

    /// The arbitrator's ruling (0 means no decision).
    #[arg(long)]
    pub ruling: u64,

    /// Appeal the provisional ruling before it becomes final.
    #[arg(long)]
    pub appeal: bool,

    /// Ruling given on the appeal. Defaults to `--ruling`.
    #[arg(long, requires = "appeal")]
    pub appeal_ruling: Option<u64>,

    /// Simulated start time, in Unix seconds.
    #[arg(long, default_value_t = DEFAULT_START_UNIX_SECS)]
    pub start: i64,
}

/// Everything observable after a simulated lifecycle.
#[derive(Debug, Serialize)]
pub struct SimulationReport {
    /// Final state of every dispute created.
    pub disputes: Vec<Dispute>,
    /// The authority's event log.
    pub events: Vec<ArbitrationEvent>,
    /// Fees the arbitrator received.
    pub arbitrator_balance: Amount,
    /// Messages left in the bridge outbox, if a relay is configured.
    pub bridged: Vec<Envelope>,
}

/// Run the lifecycle described by `args` under `config`.
pub fn simulate(args: &SimulateArgs, config: &ArbiterConfig) -> Result<SimulationReport> {
    if args.ruling > args.choices {
        bail!(
            "ruling {} is outside 0..={} choices",
            args.ruling,
            args.choices
        );
    }
    let start = Timestamp::from_unix_secs(args.start)
        .with_context(|| format!("start time {} is out of range", args.start))?;
    let clock = Arc::new(ManualClock::new(start));
    let sink = Arc::new(InMemoryFeeSink::new());
    let mut authority =
        ArbitrationAuthority::new(config.authority.clone(), clock.clone(), sink.clone())
            .context("failed to build authority")?;
    let arbitrator = authority.arbitrator().clone();
    let past_window = authority.time_out() + Duration::seconds(1);

    let requester_id = AccountId::new("simulated-requester")?;
    let bridge = match &config.relay {
        Some(relay) => Some(Arc::new(
            InMemoryBridge::new(relay).context("invalid relay section")?,
        )),
        None => None,
    };
    let requester: Arc<dyn Arbitrable> = match &bridge {
        Some(bridge) => Arc::new(RulingForwarder::new(
            arbitrator.clone(),
            requester_id,
            Arc::new(MessageRelay::new(bridge.clone())),
        )),
        None => Arc::new(RecordingArbitrable::new(requester_id)),
    };

    let cost = authority.arbitration_cost(&[]);
    let dispute_id = authority.create_dispute(requester, args.choices, &[], cost)?;
    authority.give_ruling(&arbitrator, dispute_id, Ruling::new(args.ruling))?;

    if args.appeal {
        let appellant = Arc::new(RecordingArbitrable::new(AccountId::new(
            "simulated-appellant",
        )?));
        let appeal_cost = authority.appeal_cost(dispute_id, &[])?;
        let child = authority.appeal(appellant, dispute_id, &[], appeal_cost)?;
        let appeal_ruling = Ruling::new(args.appeal_ruling.unwrap_or(args.ruling));
        authority.give_ruling(&arbitrator, child, appeal_ruling)?;
        clock.advance(past_window);
        authority.give_ruling(&arbitrator, child, appeal_ruling)?;
    } else {
        clock.advance(past_window);
        authority.give_ruling(&arbitrator, dispute_id, Ruling::new(args.ruling))?;
    }

    let disputes = (0..authority.dispute_count() as u64)
        .map(|i| authority.dispute(DisputeId::new(i)).cloned())
        .collect::<Result<Vec<_>, _>>()?;
    Ok(SimulationReport {
        disputes,
        events: authority.events().to_vec(),
        arbitrator_balance: sink.balance(&arbitrator),
        bridged: bridge.map(|b| b.outbox()).unwrap_or_default(),
    })
}

/// Execute the simulate subcommand.
pub fn run_simulate(args: &SimulateArgs, config: &ArbiterConfig) -> Result<u8> {
    let report = simulate(args, config)?;
    println!(
        "{}",
        serde_json::to_string_pretty(&report).context("failed to render report")?
    );
    Ok(0)
}
