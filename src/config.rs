//! Application configuration
//!
//! Values come from the environment (optionally seeded from `.env`) using the
//! `CARENTOUR__SECTION__KEY` naming, e.g. `CARENTOUR__DATABASE__URL` or
//! `CARENTOUR__PRICING__B2B_MEDICAL_MARKUP_MULTIPLIER`.

use config::{Config, ConfigError, Environment};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::time::Duration;

use crate::quotation::PricingSettings;

/// Main application configuration
#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    #[serde(default)]
    pub pricing: PricingConfig,
    #[serde(default)]
    pub cache: CacheConfig,
}

impl AppConfig {
    /// Load configuration from `.env` and the process environment.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        Config::builder()
            .add_source(
                Environment::with_prefix("CARENTOUR")
                    .prefix_separator("__")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()
    }
}

/// HTTP server configuration
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl ServerConfig {
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

/// Database configuration
#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    /// PostgreSQL connection URL
    pub url: String,

    #[serde(default = "default_max_connections")]
    pub max_connections: u32,

    /// Apply bundled migrations on startup
    #[serde(default = "default_run_migrations")]
    pub run_migrations: bool,
}

fn default_max_connections() -> u32 {
    5
}

fn default_run_migrations() -> bool {
    true
}

/// Baseline markup/margin rules used when a quote carries none.
///
/// Invalid values (non-positive multipliers, negative rates) are repaired
/// against the built-in defaults by [`PricingConfig::settings`].
#[derive(Debug, Deserialize, Clone)]
pub struct PricingConfig {
    #[serde(default = "default_b2b_multiplier")]
    pub b2b_medical_markup_multiplier: Decimal,
    #[serde(default = "default_b2c_multiplier")]
    pub b2c_medical_markup_multiplier: Decimal,
    #[serde(default = "default_b2b_margin")]
    pub b2b_non_medical_margin_rate: Decimal,
    #[serde(default = "default_b2c_margin")]
    pub b2c_non_medical_margin_rate: Decimal,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            b2b_medical_markup_multiplier: default_b2b_multiplier(),
            b2c_medical_markup_multiplier: default_b2c_multiplier(),
            b2b_non_medical_margin_rate: default_b2b_margin(),
            b2c_non_medical_margin_rate: default_b2c_margin(),
        }
    }
}

impl PricingConfig {
    pub fn settings(&self) -> PricingSettings {
        let configured = PricingSettings {
            b2b_medical_markup_multiplier: self.b2b_medical_markup_multiplier,
            b2c_medical_markup_multiplier: self.b2c_medical_markup_multiplier,
            b2b_non_medical_margin_rate: self.b2b_non_medical_margin_rate,
            b2c_non_medical_margin_rate: self.b2c_non_medical_margin_rate,
            ..PricingSettings::default()
        };
        configured.normalize(&PricingSettings::default())
    }
}

fn default_b2b_multiplier() -> Decimal {
    PricingSettings::default().b2b_medical_markup_multiplier
}

fn default_b2c_multiplier() -> Decimal {
    PricingSettings::default().b2c_medical_markup_multiplier
}

fn default_b2b_margin() -> Decimal {
    PricingSettings::default().b2b_non_medical_margin_rate
}

fn default_b2c_margin() -> Decimal {
    PricingSettings::default().b2c_non_medical_margin_rate
}

/// Saved-quote cache configuration
#[derive(Debug, Deserialize, Clone)]
pub struct CacheConfig {
    #[serde(default = "default_quote_capacity")]
    pub quote_capacity: u64,

    #[serde(default = "default_quote_ttl")]
    pub quote_ttl_secs: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            quote_capacity: default_quote_capacity(),
            quote_ttl_secs: default_quote_ttl(),
        }
    }
}

impl CacheConfig {
    pub fn quote_ttl(&self) -> Duration {
        Duration::from_secs(self.quote_ttl_secs)
    }
}

fn default_quote_capacity() -> u64 {
    500
}

fn default_quote_ttl() -> u64 {
    30 * 60
}
