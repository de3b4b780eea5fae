//! Configuration loading and typed config structures for the Verdant
//! engine.
//!
//! The canonical configuration lives in `verdant-config.yaml` at the
//! project root. This module defines strongly-typed structs that mirror
//! the YAML structure and provides a loader that reads and validates the
//! file. Every field has a default carrying the canonical game values, so
//! an empty file (or a missing section) is a valid configuration.

use std::path::Path;

use rust_decimal::Decimal;
use serde::Deserialize;

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },

    /// The parsed configuration contains an invalid value.
    #[error("invalid configuration: {reason}")]
    Invalid {
        /// Explanation of what is wrong with the configuration.
        reason: String,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level game configuration.
///
/// Mirrors the structure of `verdant-config.yaml`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct GameConfig {
    /// Farm layout and session defaults.
    #[serde(default)]
    pub farm: FarmConfig,

    /// Growth scheduler settings.
    #[serde(default)]
    pub growth: GrowthConfig,

    /// Stacking (re-stake) settings.
    #[serde(default)]
    pub stacking: StackingConfig,

    /// Stake validation and contract settings.
    #[serde(default)]
    pub staking: StakingConfig,

    /// Reward, experience, and leveling settings.
    #[serde(default)]
    pub rewards: RewardConfig,

    /// Ledger refresh settings.
    #[serde(default)]
    pub ledger: LedgerConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl GameConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// The `VERDANT_ADDRESS` environment variable overrides
    /// `ledger.address`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read,
    /// [`ConfigError::Yaml`] if the content is not valid YAML, or
    /// [`ConfigError::Invalid`] if a value fails validation.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] on malformed YAML or
    /// [`ConfigError::Invalid`] on out-of-range values.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        let mut config: Self = serde_yml::from_str(yaml)?;
        config.ledger.apply_env_override();
        config.validate()?;
        Ok(config)
    }

    /// Validate cross-field constraints.
    fn validate(&self) -> Result<(), ConfigError> {
        if self.farm.plot_count == 0 {
            return Err(ConfigError::Invalid {
                reason: "farm.plot_count must be at least 1".to_owned(),
            });
        }
        if self.growth.tick_interval_ms == 0 {
            return Err(ConfigError::Invalid {
                reason: "growth.tick_interval_ms must be at least 1".to_owned(),
            });
        }
        if self.stacking.reduction_factor <= Decimal::ZERO
            || self.stacking.reduction_factor >= Decimal::ONE
        {
            return Err(ConfigError::Invalid {
                reason: "stacking.reduction_factor must be strictly between 0 and 1".to_owned(),
            });
        }
        if self.stacking.min_remaining_ms <= 0 {
            return Err(ConfigError::Invalid {
                reason: "stacking.min_remaining_ms must be positive".to_owned(),
            });
        }
        if self.staking.min_stake <= Decimal::ZERO {
            return Err(ConfigError::Invalid {
                reason: "staking.min_stake must be positive".to_owned(),
            });
        }
        if self.rewards.level_xp_step == 0 {
            return Err(ConfigError::Invalid {
                reason: "rewards.level_xp_step must be at least 1".to_owned(),
            });
        }
        Ok(())
    }
}

/// Farm layout and session defaults.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct FarmConfig {
    /// Number of local staking plots.
    pub plot_count: usize,
    /// Session-start token balance before ledger hydration.
    pub starting_tokens: Decimal,
}

impl Default for FarmConfig {
    fn default() -> Self {
        Self {
            plot_count: 12,
            starting_tokens: Decimal::new(50, 0),
        }
    }
}

/// Growth scheduler settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct GrowthConfig {
    /// Wall-clock interval between growth ticks, in milliseconds.
    pub tick_interval_ms: u64,
}

impl Default for GrowthConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: 1_000,
        }
    }
}

/// Stacking (re-stake) settings.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct StackingConfig {
    /// Fraction of the current remaining duration removed per stack.
    pub reduction_factor: Decimal,
    /// Floor on remaining duration in milliseconds; stacking never
    /// compresses growth below this.
    pub min_remaining_ms: i64,
}

impl Default for StackingConfig {
    fn default() -> Self {
        Self {
            reduction_factor: Decimal::new(20, 2),
            min_remaining_ms: 5_000,
        }
    }
}

/// Stake validation and contract settings.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct StakingConfig {
    /// Smallest stake accepted, in display precision. Defaults to one
    /// smallest unit.
    pub min_stake: Decimal,
    /// Address of the farm manager contract.
    pub contract_address: String,
}

impl Default for StakingConfig {
    fn default() -> Self {
        Self {
            min_stake: Decimal::new(1, verdant_types::TOKEN_DECIMALS),
            contract_address: "0x3654cadc3c65a6c0a47bb785eac90e9d21b194a8".to_owned(),
        }
    }
}

/// Reward, experience, and leveling settings.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct RewardConfig {
    /// Experience granted per whole reward token on harvest.
    pub xp_multiplier: u64,
    /// Experience granted for planting a seed.
    pub plant_xp: u64,
    /// Experience required per level: `level * level_xp_step`.
    pub level_xp_step: u64,
    /// Token bonus credited on each level-up.
    pub level_bonus_tokens: Decimal,
}

impl Default for RewardConfig {
    fn default() -> Self {
        Self {
            xp_multiplier: 5,
            plant_xp: 10,
            level_xp_step: 100,
            level_bonus_tokens: Decimal::new(10, 0),
        }
    }
}

/// Ledger refresh settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LedgerConfig {
    /// Interval between periodic ledger refreshes, in milliseconds.
    pub refresh_interval_ms: u64,
    /// Session address override. Normally the session provider supplies
    /// the address; this pins it for headless runs.
    pub address: Option<String>,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            refresh_interval_ms: 15_000,
            address: None,
        }
    }
}

impl LedgerConfig {
    /// Apply the `VERDANT_ADDRESS` environment override.
    pub fn apply_env_override(&mut self) {
        if let Ok(address) = std::env::var("VERDANT_ADDRESS")
            && !address.is_empty()
        {
            self.address = Some(address);
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default tracing filter when `RUST_LOG` is unset.
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_owned(),
        }
    }
}
