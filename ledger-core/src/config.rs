//! Configuration for the ledger

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Ledger configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Service name
    pub service_name: String,

    /// Service version
    pub service_version: String,

    /// Metrics listen address
    pub metrics_listen_addr: String,

    /// Sealing configuration
    pub mining: MiningConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            service_name: "ledger-core".to_string(),
            service_version: env!("CARGO_PKG_VERSION").to_string(),
            metrics_listen_addr: "0.0.0.0:9090".to_string(),
            mining: MiningConfig::default(),
        }
    }
}

/// Sealing (proof-of-work) configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MiningConfig {
    /// Leading-zero-hex count a sealed block hash must reach
    ///
    /// Fixed for the lifetime of the ledger; there is no difficulty
    /// retargeting. 2-4 seals near-instantly.
    pub difficulty: usize,

    /// Reward issued to the sealing recipient per block
    pub reward: Decimal,
}

impl Default for MiningConfig {
    fn default() -> Self {
        Self {
            difficulty: 2,
            reward: Decimal::from(10),
        }
    }
}

impl Config {
    /// Load from file
    pub fn from_file(path: impl AsRef<std::path::Path>) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)
            .map_err(|e| crate::Error::Config(format!("Failed to parse config: {}", e)))?;
        Ok(config)
    }

    /// Load defaults with environment variable overrides
    pub fn from_env() -> crate::Result<Self> {
        let mut config = Config::default();

        if let Ok(addr) = std::env::var("LEDGER_METRICS_ADDR") {
            config.metrics_listen_addr = addr;
        }

        if let Ok(difficulty) = std::env::var("LEDGER_DIFFICULTY") {
            config.mining.difficulty = difficulty.parse().map_err(|_| {
                crate::Error::Config(format!("Invalid LEDGER_DIFFICULTY: {}", difficulty))
            })?;
        }

        if let Ok(reward) = std::env::var("LEDGER_REWARD") {
            config.mining.reward = reward.parse().map_err(|_| {
                crate::Error::Config(format!("Invalid LEDGER_REWARD: {}", reward))
            })?;
        }

        Ok(config)
    }
}
