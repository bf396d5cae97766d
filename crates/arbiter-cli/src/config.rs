//! # Configuration Loading
//!
//! One YAML document with an `authority:` section and an optional `relay:`
//! section:
//!
//! ```yaml
//! authority:
//!   owner: fee-owner
//!   arbitrator: court
//!   arbitration_price: 100
//!   appeal_timeout_secs: 86400
//! relay:
//!   domain_id: home
//!   max_gas_per_tx: 4096
//! ```
//!
//! The `check-config` subcommand loads and validates it without running
//! anything.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use arbiter_dispute::{AuthorityConfig, FeeLedger};
use arbiter_relay::RelayConfig;
use clap::Args;
use serde::{Deserialize, Serialize};

/// Config file used when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "arbiter.yaml";

/// The whole CLI configuration document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ArbiterConfig {
    /// Authority construction parameters.
    pub authority: AuthorityConfig,
    /// Bridge endpoint parameters, when rulings are relayed.
    #[serde(default)]
    pub relay: Option<RelayConfig>,
}

/// The config path to use: the explicit one, or [`DEFAULT_CONFIG_FILE`].
pub fn config_path(explicit: Option<&Path>) -> PathBuf {
    explicit
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE))
}

/// Read, parse and validate a config file.
pub fn load_config(path: &Path) -> Result<ArbiterConfig> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config file {}", path.display()))?;
    let config: ArbiterConfig = serde_yaml::from_str(&text)
        .with_context(|| format!("failed to parse config file {}", path.display()))?;
    config
        .authority
        .validate()
        .context("invalid authority section")?;
    if let Some(relay) = &config.relay {
        relay.validate().context("invalid relay section")?;
    }
    tracing::debug!(path = %path.display(), "config loaded");
    Ok(config)
}

/// Arguments for the `arbiter check-config` subcommand.
#[derive(Args, Debug)]
pub struct CheckConfigArgs {
    /// Print the normalized config as YAML after validating it.
    #[arg(long)]
    pub print: bool,
}

/// Execute the check-config subcommand.
pub fn run_check_config(args: &CheckConfigArgs, path: &Path) -> Result<u8> {
    let config = load_config(path)?;
    let ledger = FeeLedger::new(
        config.authority.owner.clone(),
        config.authority.arbitration_price,
    );
    println!("config OK: {}", path.display());
    println!("  owner:            {}", config.authority.owner);
    println!("  arbitrator:       {}", config.authority.arbitrator);
    println!("  arbitration cost: {}", ledger.arbitration_cost(&[]));
    println!(
        "  appeal window:    {}s",
        config.authority.time_out().num_seconds()
    );
    match &config.relay {
        Some(relay) => println!(
            "  relay:            {} (max gas per tx {})",
            relay.domain_id, relay.max_gas_per_tx
        ),
        None => println!("  relay:            none"),
    }
    if args.print {
        let yaml = serde_yaml::to_string(&config).context("failed to render config")?;
        println!("{yaml}");
    }
    Ok(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    const VALID: &str = "\
authority:
  owner: fee-owner
  arbitrator: court
  arbitration_price: 100
  appeal_timeout_secs: 3600
relay:
  domain_id: home
  max_gas_per_tx: 4096
";

    fn write(dir: &tempfile::TempDir, text: &str) -> PathBuf {
        let path = dir.path().join("arbiter.yaml");
        std::fs::write(&path, text).unwrap();
        path
    }

    #[test]
    fn loads_valid_config() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_config(&write(&dir, VALID)).unwrap();
        assert_eq!(config.authority.arbitrator.as_str(), "court");
        assert_eq!(config.authority.arbitration_price.units(), 100);
        assert_eq!(config.relay.unwrap().max_gas_per_tx, 4096);
    }

    #[test]
    fn relay_section_is_optional() {
        let dir = tempfile::tempdir().unwrap();
        let text = VALID.split("relay:").next().unwrap();
        let config = load_config(&write(&dir, text)).unwrap();
        assert!(config.relay.is_none());
    }

    #[test]
    fn zero_timeout_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let text = VALID.replace("appeal_timeout_secs: 3600", "appeal_timeout_secs: 0");
        let err = load_config(&write(&dir, &text)).unwrap_err();
        assert!(format!("{err:#}").contains("appeal_timeout_secs"));
    }

    #[test]
    fn zero_gas_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let text = VALID.replace("max_gas_per_tx: 4096", "max_gas_per_tx: 0");
        let err = load_config(&write(&dir, &text)).unwrap_err();
        assert!(format!("{err:#}").contains("relay"));
    }

    #[test]
    fn bad_identity_is_a_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let text = VALID.replace("arbitrator: court", "arbitrator: \"the court\"");
        let err = load_config(&write(&dir, &text)).unwrap_err();
        assert!(format!("{err:#}").contains("failed to parse"));
    }

    #[test]
    fn missing_file_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.yaml");
        let err = load_config(&path).unwrap_err();
        assert!(format!("{err:#}").contains("absent.yaml"));
    }

    #[test]
    fn default_path_when_not_given() {
        assert_eq!(config_path(None), PathBuf::from("arbiter.yaml"));
        assert_eq!(
            config_path(Some(Path::new("/etc/arbiter.yaml"))),
            PathBuf::from("/etc/arbiter.yaml")
        );
    }

    #[test]
    fn check_config_succeeds() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(&dir, VALID);
        assert_eq!(
            run_check_config(&CheckConfigArgs { print: true }, &path).unwrap(),
            0
        );
    }
}
