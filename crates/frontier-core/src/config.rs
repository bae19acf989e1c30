//! Configuration loading and typed config structures for Frontier.
//!
//! The canonical configuration lives in `frontier-config.yaml` at the
//! project root. Every section and field has a default, so an empty
//! document yields the stock game rules.

use std::path::Path;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use frontier_geo::TerritoryConfig;
use frontier_inventory::InventoryConfig;
use frontier_loot::RewardTable;
use frontier_trade::TradeConfig;
use frontier_types::RewardTier;

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

    /// A value parsed but makes no sense.
    #[error("invalid config value {field}: {reason}")]
    Invalid {
        /// Dotted path of the offending field.
        field: &'static str,
        /// What is wrong with it.
        reason: String,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level game configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GameConfig {
    /// Exploration session rules.
    #[serde(default)]
    pub exploration: ExplorationConfig,

    /// Territory claim limits.
    #[serde(default)]
    pub territory: TerritoryConfig,

    /// Reward tables per tier.
    #[serde(default)]
    pub rewards: RewardTable,

    /// Inventory capacity per subscription tier.
    #[serde(default)]
    pub inventory: InventoryConfig,

    /// Trade offer validity.
    #[serde(default)]
    pub trade: TradeConfig,

    /// Logging output.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl GameConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, or
    /// [`ConfigError::Yaml`] if the content is not valid YAML.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Self = serde_yml::from_str(yaml)?;
        Ok(config)
    }

    /// Reject values the game cannot run with.
    ///
    /// Reward probabilities summing above 1.0 are accepted (they are
    /// renormalised when rolled) but logged.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] naming the first bad field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let ex = &self.exploration;
        require_positive("exploration.max_speed_mps", ex.max_speed_mps)?;
        require_non_negative("exploration.min_fix_spacing_m", ex.min_fix_spacing_m)?;
        require_positive("exploration.poi_trigger_radius_m", ex.poi_trigger_radius_m)?;

        let territory = &self.territory;
        if territory.min_points < 3 {
            return Err(invalid(
                "territory.min_points",
                format!("must be at least 3, got {}", territory.min_points),
            ));
        }
        require_non_negative("territory.min_area_m2", territory.min_area_m2)?;
        if territory.max_area_m2.is_nan() || territory.max_area_m2 <= territory.min_area_m2 {
            return Err(invalid(
                "territory.max_area_m2",
                String::from("must exceed territory.min_area_m2"),
            ));
        }

        for tier in RewardTier::ALL {
            let rewards = self.rewards.rewards_for(tier);
            let sum = rewards.probability_sum();
            if [rewards.common, rewards.rare, rewards.epic]
                .iter()
                .any(Decimal::is_sign_negative)
            {
                return Err(invalid("rewards", format!("{tier:?} has a negative probability")));
            }
            if sum > Decimal::ONE {
                tracing::warn!(?tier, %sum, "reward probabilities exceed 1.0 and will be renormalised");
            }
        }

        let inv = &self.inventory;
        for (field, capacity) in [
            ("inventory.free_capacity", inv.free_capacity),
            ("inventory.plus_capacity", inv.plus_capacity),
            ("inventory.pro_capacity", inv.pro_capacity),
        ] {
            if capacity == 0 {
                return Err(invalid(field, String::from("must be positive")));
            }
        }

        let trade = &self.trade;
        if trade.max_expiry_hours == 0 {
            return Err(invalid("trade.max_expiry_hours", String::from("must be positive")));
        }
        if trade.default_expiry_hours == 0 || trade.default_expiry_hours > trade.max_expiry_hours {
            return Err(invalid(
                "trade.default_expiry_hours",
                format!("must be within 1..={}", trade.max_expiry_hours),
            ));
        }
        Ok(())
    }
}

fn invalid(field: &'static str, reason: String) -> ConfigError {
    ConfigError::Invalid { field, reason }
}

fn require_positive(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(invalid(field, format!("must be positive, got {value}")))
    }
}

fn require_non_negative(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(invalid(field, format!("must not be negative, got {value}")))
    }
}

/// Rules for turning location fixes into walked distance and discoveries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExplorationConfig {
    /// Fixes implying a faster speed than this are rejected as GPS jumps
    /// or vehicle travel.
    #[serde(default = "default_max_speed_mps")]
    pub max_speed_mps: f64,

    /// Fixes closer than this to the previous accepted fix are ignored.
    #[serde(default = "default_min_fix_spacing_m")]
    pub min_fix_spacing_m: f64,

    /// Distance at which a POI is discovered and can be scavenged.
    #[serde(default = "default_poi_trigger_radius_m")]
    pub poi_trigger_radius_m: f64,
}

impl Default for ExplorationConfig {
    fn default() -> Self {
        Self {
            max_speed_mps: default_max_speed_mps(),
            min_fix_spacing_m: default_min_fix_spacing_m(),
            poi_trigger_radius_m: default_poi_trigger_radius_m(),
        }
    }
}

/// Logging output settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default filter when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Emit JSON lines instead of human-readable output.
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

// ---------------------------------------------------------------------------
// Default value functions (serde default requires named functions)
// ---------------------------------------------------------------------------

const fn default_max_speed_mps() -> f64 {
    8.0
}

const fn default_min_fix_spacing_m() -> f64 {
    5.0
}

const fn default_poi_trigger_radius_m() -> f64 {
    50.0
}

fn default_log_level() -> String {
    "info".to_owned()
}
