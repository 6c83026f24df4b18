//! Configuration loading and typed config structures.
//!
//! The canonical configuration lives in `collector-config.yaml` at the
//! project root. This module defines strongly-typed structs that mirror
//! the YAML structure and provides a loader that reads the file.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use rust_decimal::Decimal;
use serde::Deserialize;

use collector_store::StorageConfig;
use collector_types::ResourceKind;

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
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// What happens to a settlement total when the owner is unreachable.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OfflineEarnings {
    /// Log the amount and move on; the money is never deposited.
    #[default]
    Forfeit,
    /// Deposit anyway.
    Credit,
}

/// Top-level service configuration.
///
/// Mirrors the structure of `collector-config.yaml`. All fields have
/// defaults, so an absent file yields a working configuration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ServiceConfig {
    /// Core behavioral settings.
    #[serde(default)]
    pub settings: SettingsConfig,

    /// Resource kind names collectors are allowed to pick up.
    #[serde(default = "default_collectible_items", rename = "collectible-items")]
    pub collectible_items: Vec<String>,

    /// Pricing parameters.
    #[serde(default)]
    pub economy: EconomyConfig,

    /// Storage backend selection and connection parameters.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl ServiceConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// Environment variables override YAML values for connection URLs:
    /// `DATABASE_URL` and `REDIS_URL`.
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
        let mut config: Self = serde_yml::from_str(yaml)?;
        config.storage.apply_env_overrides();
        Ok(config)
    }

    /// Resolve the configured item names into an allow-set of resource
    /// kinds. Unknown names are logged and skipped.
    pub fn allow_set(&self) -> BTreeSet<ResourceKind> {
        let mut set = BTreeSet::new();
        for name in &self.collectible_items {
            match name.parse::<ResourceKind>() {
                Ok(kind) => {
                    set.insert(kind);
                }
                Err(err) => {
                    tracing::warn!(name, error = %err, "Ignoring unknown collectible item");
                }
            }
        }
        set
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            settings: SettingsConfig::default(),
            collectible_items: default_collectible_items(),
            economy: EconomyConfig::default(),
            storage: StorageConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

/// Core behavioral settings.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SettingsConfig {
    /// Milliseconds between collection sweeps.
    #[serde(default = "default_collection_sweep_ms")]
    pub collection_sweep_ms: u64,

    /// Minimum milliseconds between collection effects per collector.
    #[serde(default = "default_collection_effect_cooldown_ms")]
    pub collection_effect_cooldown_ms: i64,

    /// Lowest item height eligible for collection.
    #[serde(default = "default_min_collection_height")]
    pub min_collection_height: i32,

    /// Highest item height eligible for collection.
    #[serde(default = "default_max_collection_height")]
    pub max_collection_height: i32,

    /// Default per-owner collector cap, before tiered grants.
    #[serde(default = "default_max_collectors_per_owner")]
    pub max_collectors_per_owner: u32,

    /// Minutes of charge bought per purchase, and the base headroom.
    #[serde(default = "default_charge_minutes")]
    pub default_charge_minutes: i64,

    /// Currency cost per minute of charge.
    #[serde(default = "default_recharge_cost_per_minute")]
    pub recharge_cost_per_minute: Decimal,

    /// Seconds between autosell settlements per collector.
    #[serde(default = "default_autosell_interval_secs")]
    pub autosell_interval_secs: i64,

    /// Settlement behavior when the owner is unreachable.
    #[serde(default)]
    pub offline_earnings: OfflineEarnings,
}

impl SettingsConfig {
    /// The default charge purchase expressed in seconds.
    pub const fn default_charge_secs(&self) -> i64 {
        self.default_charge_minutes.saturating_mul(60)
    }
}

impl Default for SettingsConfig {
    fn default() -> Self {
        Self {
            collection_sweep_ms: default_collection_sweep_ms(),
            collection_effect_cooldown_ms: default_collection_effect_cooldown_ms(),
            min_collection_height: default_min_collection_height(),
            max_collection_height: default_max_collection_height(),
            max_collectors_per_owner: default_max_collectors_per_owner(),
            default_charge_minutes: default_charge_minutes(),
            recharge_cost_per_minute: default_recharge_cost_per_minute(),
            autosell_interval_secs: default_autosell_interval_secs(),
            offline_earnings: OfflineEarnings::Forfeit,
        }
    }
}

/// Pricing parameters.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct EconomyConfig {
    /// Unit price used when no quote exists for a kind.
    #[serde(default = "default_fallback_price")]
    pub fallback_price: Decimal,

    /// Global multiplier applied to every unit price.
    #[serde(default = "default_price_multiplier")]
    pub price_multiplier: Decimal,

    /// Static unit prices, keyed by canonical kind name. Unknown names
    /// are logged and skipped when building the oracle.
    #[serde(default)]
    pub prices: BTreeMap<String, Decimal>,
}

impl Default for EconomyConfig {
    fn default() -> Self {
        Self {
            fallback_price: default_fallback_price(),
            price_multiplier: default_price_multiplier(),
            prices: BTreeMap::new(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

// ---------------------------------------------------------------------------
// Default value functions (serde default requires named functions)
// ---------------------------------------------------------------------------

const fn default_collection_sweep_ms() -> u64 {
    1000
}

const fn default_collection_effect_cooldown_ms() -> i64 {
    100
}

const fn default_min_collection_height() -> i32 {
    -64
}

const fn default_max_collection_height() -> i32 {
    319
}

const fn default_max_collectors_per_owner() -> u32 {
    10
}

const fn default_charge_minutes() -> i64 {
    60
}

fn default_recharge_cost_per_minute() -> Decimal {
    Decimal::from(100)
}

const fn default_autosell_interval_secs() -> i64 {
    60
}

fn default_collectible_items() -> Vec<String> {
    vec![
        "WHEAT".to_owned(),
        "CARROT".to_owned(),
        "POTATO".to_owned(),
        "SUGAR_CANE".to_owned(),
        "BONE".to_owned(),
        "ROTTEN_FLESH".to_owned(),
        "GUNPOWDER".to_owned(),
        "STRING".to_owned(),
    ]
}

fn default_fallback_price() -> Decimal {
    Decimal::ONE
}

fn default_price_multiplier() -> Decimal {
    Decimal::ONE
}

fn default_log_level() -> String {
    "info".to_owned()
}
