//! # Costs Subcommand
//!
//! Prints what creating and appealing a dispute currently costs under the
//! loaded configuration.

use anyhow::Result;
use arbiter_core::Amount;
use arbiter_dispute::FeeLedger;
use clap::Args;
use serde::Serialize;

use crate::config::ArbiterConfig;

/// Arguments for the `arbiter costs` subcommand.
#[derive(Args, Debug)]
pub struct CostsArgs {
    /// Emit JSON instead of plain text.
    #[arg(long)]
    pub json: bool,
}

/// Current prices.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CostReport {
    /// Cost of opening a dispute.
    pub arbitration_cost: Amount,
    /// Cost of appealing a provisional ruling.
    pub appeal_cost: Amount,
    /// Appeal window in seconds.
    pub appeal_timeout_secs: i64,
}

/// Compute the cost report for `config`.
pub fn cost_report(config: &ArbiterConfig) -> Result<CostReport> {
    let ledger = FeeLedger::new(
        config.authority.owner.clone(),
        config.authority.arbitration_price,
    );
    Ok(CostReport {
        arbitration_cost: ledger.arbitration_cost(&[]),
        appeal_cost: ledger.appeal_cost(&[])?,
        appeal_timeout_secs: config.authority.time_out().num_seconds(),
    })
}

/// Execute the costs subcommand.
pub fn run_costs(args: &CostsArgs, config: &ArbiterConfig) -> Result<u8> {
    let report = cost_report(config)?;
    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("arbitration cost: {}", report.arbitration_cost);
        println!("appeal cost:      {}", report.appeal_cost);
        println!("appeal window:    {}s", report.appeal_timeout_secs);
    }
    Ok(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use arbiter_core::AccountId;
    use arbiter_dispute::AuthorityConfig;

    fn config(price: u128) -> ArbiterConfig {
        ArbiterConfig {
            authority: AuthorityConfig {
                owner: AccountId::new("owner").unwrap(),
                arbitrator: AccountId::new("court").unwrap(),
                arbitration_price: Amount::new(price),
                appeal_timeout_secs: 600,
            },
            relay: None,
        }
    }

    #[test]
    fn appeal_costs_twice_arbitration() {
        let report = cost_report(&config(75)).unwrap();
        assert_eq!(report.arbitration_cost, Amount::new(75));
        assert_eq!(report.appeal_cost, Amount::new(150));
        assert_eq!(report.appeal_timeout_secs, 600);
    }

    #[test]
    fn overflowing_appeal_cost_is_an_error() {
        assert!(cost_report(&config(u128::MAX)).is_err());
    }

    #[test]
    fn run_costs_plain_and_json() {
        assert_eq!(run_costs(&CostsArgs { json: false }, &config(10)).unwrap(), 0);
        assert_eq!(run_costs(&CostsArgs { json: true }, &config(10)).unwrap(), 0);
    }
}
