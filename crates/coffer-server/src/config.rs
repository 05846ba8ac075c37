//! Configuration management for Coffer server
//!
//! Sources, lowest precedence first: built-in defaults, the YAML config file,
//! `COFFER_*` environment variables (`__` separates nested keys, e.g.
//! `COFFER_CUSTODY__HOLDING_DURATION_SECS`), then command line flags.

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use coffer_common::{Address, DEFAULT_CUSTODIAN, DEFAULT_HOLDING_DURATION_SECS};
use coffer_custody::LedgerConfig;
use config::{Config, Environment, File};
use serde::Deserialize;

use crate::startup::logging::{LogRotation, LoggingConfig};

pub const SERVER_ADDRESS: &str = "server.address";
pub const SERVER_PORT: &str = "server.port";
pub const CUSTODY_ADDRESS: &str = "custody.address";
pub const CUSTODY_HOLDING_DURATION: &str = "custody.holding_duration_secs";
pub const LOGGING_LEVEL: &str = "logging.level";
pub const LOGGING_DIR: &str = "logging.dir";
pub const LOGGING_CONSOLE: &str = "logging.console";
pub const LOGGING_ROTATION: &str = "logging.rotation";
pub const METRICS_ENABLED: &str = "metrics.enabled";
pub const REGISTRIES: &str = "registries";

pub const DEFAULT_SERVER_ADDRESS: &str = "0.0.0.0";
pub const DEFAULT_SERVER_PORT: u16 = 8848;
pub const DEFAULT_CONFIG_FILE: &str = "conf/application.yml";

/// Command line arguments for the server
#[derive(Debug, Default, Parser)]
#[command(name = "coffer-server", about = "NFT custody ledger server")]
pub struct Cli {
    /// Path to the YAML configuration file
    #[arg(short = 'c', long = "config", env = "COFFER_CONFIG")]
    pub config_file: Option<PathBuf>,
    #[arg(short = 'p', long = "port")]
    pub port: Option<u16>,
    /// Holding duration in seconds; fixed for the lifetime of the process
    #[arg(long = "holding-duration")]
    pub holding_duration_secs: Option<u64>,
    #[arg(long = "log-level", env = "COFFER_LOG_LEVEL")]
    pub log_level: Option<String>,
    #[arg(long = "log-dir", env = "COFFER_LOG_DIR")]
    pub log_dir: Option<String>,
}

/// Registry hosted by the server at startup
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RegistrySeed {
    pub address: String,
    #[serde(default)]
    pub assets: Vec<AssetSeed>,
}

/// Asset minted into a hosted registry at startup
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AssetSeed {
    pub id: u64,
    pub owner: String,
}

/// Application configuration loaded from config files, environment and CLI
#[derive(Clone, Debug)]
pub struct Configuration {
    pub config: Config,
}

impl Configuration {
    /// Load configuration using the process command line
    pub fn new() -> anyhow::Result<Self> {
        Self::load(Cli::parse())
    }

    pub fn load(cli: Cli) -> anyhow::Result<Self> {
        let config_file = cli
            .config_file
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));

        let config = Config::builder()
            .set_default(SERVER_ADDRESS, DEFAULT_SERVER_ADDRESS)?
            .set_default(SERVER_PORT, i64::from(DEFAULT_SERVER_PORT))?
            .set_default(CUSTODY_ADDRESS, DEFAULT_CUSTODIAN)?
            .set_default(CUSTODY_HOLDING_DURATION, DEFAULT_HOLDING_DURATION_SECS)?
            .set_default(LOGGING_LEVEL, "info")?
            .set_default(LOGGING_CONSOLE, true)?
            .set_default(LOGGING_ROTATION, "daily")?
            .set_default(METRICS_ENABLED, true)?
            .add_source(File::from(config_file.as_path()).required(false))
            .add_source(
                Environment::with_prefix("COFFER")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .set_override_option(SERVER_PORT, cli.port.map(i64::from))?
            .set_override_option(CUSTODY_HOLDING_DURATION, cli.holding_duration_secs)?
            .set_override_option(LOGGING_LEVEL, cli.log_level)?
            .set_override_option(LOGGING_DIR, cli.log_dir)?
            .build()
            .with_context(|| {
                format!(
                    "Failed to build configuration - check {}",
                    config_file.display()
                )
            })?;

        Ok(Configuration { config })
    }

    // ========================================================================
    // Server Configuration
    // ========================================================================

    pub fn server_address(&self) -> String {
        self.config
            .get_string(SERVER_ADDRESS)
            .unwrap_or(DEFAULT_SERVER_ADDRESS.to_string())
    }

    pub fn server_port(&self) -> u16 {
        self.config
            .get_int(SERVER_PORT)
            .ok()
            .and_then(|port| u16::try_from(port).ok())
            .unwrap_or(DEFAULT_SERVER_PORT)
    }

    // ========================================================================
    // Custody Configuration
    // ========================================================================

    pub fn custodian(&self) -> anyhow::Result<Address> {
        let raw = self
            .config
            .get_string(CUSTODY_ADDRESS)
            .unwrap_or(DEFAULT_CUSTODIAN.to_string());
        raw.parse()
            .with_context(|| format!("invalid {}: '{}'", CUSTODY_ADDRESS, raw))
    }

    pub fn ledger_config(&self) -> anyhow::Result<LedgerConfig> {
        let secs = self
            .config
            .get_int(CUSTODY_HOLDING_DURATION)
            .with_context(|| format!("{} must be an integer", CUSTODY_HOLDING_DURATION))?;
        let holding_duration_secs = u64::try_from(secs)
            .with_context(|| format!("{} must not be negative", CUSTODY_HOLDING_DURATION))?;
        Ok(LedgerConfig {
            holding_duration_secs,
        })
    }

    pub fn registries(&self) -> anyhow::Result<Vec<RegistrySeed>> {
        match self.config.get::<Vec<RegistrySeed>>(REGISTRIES) {
            Ok(seeds) => Ok(seeds),
            Err(config::ConfigError::NotFound(_)) => Ok(Vec::new()),
            Err(e) => Err(e).context("invalid registries section"),
        }
    }

    // ========================================================================
    // Observability Configuration
    // ========================================================================

    pub fn metrics_enabled(&self) -> bool {
        self.config.get_bool(METRICS_ENABLED).unwrap_or(true)
    }

    pub fn logging_config(&self) -> LoggingConfig {
        let level = self
            .config
            .get_string(LOGGING_LEVEL)
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(tracing::Level::INFO);
        let rotation = self
            .config
            .get_string(LOGGING_ROTATION)
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(LogRotation::Daily);

        LoggingConfig {
            log_dir: self.config.get_string(LOGGING_DIR).ok().map(PathBuf::from),
            console_output: self.config.get_bool(LOGGING_CONSOLE).unwrap_or(true),
            level,
            rotation,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    fn load_yaml(yaml: &str, cli: Cli) -> Configuration {
        let mut file = tempfile::Builder::new().suffix(".yml").tempfile().unwrap();
        file.write_all(yaml.as_bytes()).unwrap();
        Configuration::load(Cli {
            config_file: Some(file.path().to_path_buf()),
            ..cli
        })
        .unwrap()
    }

    #[test]
    fn test_defaults_without_file() {
        let configuration = Configuration::load(Cli {
            config_file: Some(PathBuf::from("/nonexistent/coffer.yml")),
            ..Default::default()
        })
        .unwrap();

        assert_eq!(configuration.server_port(), DEFAULT_SERVER_PORT);
        assert_eq!(configuration.custodian().unwrap(), Address::from("coffer"));
        assert_eq!(
            configuration.ledger_config().unwrap().holding_duration_secs,
            120
        );
        assert!(configuration.registries().unwrap().is_empty());
    }

    #[test]
    fn test_file_values() {
        let configuration = load_yaml(
            r#"
server:
  port: 9000
custody:
  address: vault
  holding_duration_secs: 3600
registries:
  - address: punks
    assets:
      - id: 1
        owner: alice
      - id: 2
        owner: bob
  - address: apes
"#,
            Cli::default(),
        );

        assert_eq!(configuration.server_port(), 9000);
        assert_eq!(configuration.custodian().unwrap(), Address::from("vault"));
        assert_eq!(
            configuration.ledger_config().unwrap().holding_duration_secs,
            3600
        );

        let registries = configuration.registries().unwrap();
        assert_eq!(registries.len(), 2);
        assert_eq!(registries[0].address, "punks");
        assert_eq!(
            registries[0].assets[1],
            AssetSeed {
                id: 2,
                owner: "bob".to_string()
            }
        );
        assert!(registries[1].assets.is_empty());
    }

    #[test]
    fn test_cli_overrides_file() {
        let configuration = load_yaml(
            "custody:\n  holding_duration_secs: 3600\n",
            Cli {
                port: Some(7000),
                holding_duration_secs: Some(60),
                log_level: Some("debug".to_string()),
                ..Default::default()
            },
        );

        assert_eq!(configuration.server_port(), 7000);
        assert_eq!(
            configuration.ledger_config().unwrap().holding_duration_secs,
            60
        );
        assert_eq!(configuration.logging_config().level, tracing::Level::DEBUG);
    }

    #[test]
    fn test_negative_duration_rejected() {
        let configuration = load_yaml(
            "custody:\n  holding_duration_secs: -5\n",
            Cli::default(),
        );
        assert!(configuration.ledger_config().is_err());
    }
}
