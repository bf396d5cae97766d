//! # arbiter-cli — CLI Tool for the Arbiter Stack
//!
//! Provides the `arbiter` command-line interface.
//!
//! ## Subcommands
//!
//! - `arbiter check-config`: load and validate the YAML configuration.
//! - `arbiter costs`: current arbitration and appeal cost.
//! - `arbiter simulate`: run one dispute through its lifecycle against a
//!   manual clock and print the resulting records and events.
//!
//! ```bash
//! arbiter --config arbiter.yaml costs --json
//! arbiter simulate --choices 3 --ruling 2 --appeal --appeal-ruling 1
//! ```

pub mod config;
pub mod costs;
pub mod simulate;
