//! Service configuration, read from the environment.

use rust_decimal::Decimal;
use std::str::FromStr;
use std::time::Duration;
use tracing::warn;

use crate::pricing::PricingSettings;

pub struct Settings {
    /// PostgreSQL connection string; built-in reference data without it
    pub database_url: Option<String>,
    pub host: String,
    pub port: u16,
    /// Open sessions are dropped after this long without a request
    pub session_idle: Duration,
    pub max_sessions: u64,
    pub pricing: PricingOverrides,
}

/// Pricing values forced from the environment, applied over DB/built-in values
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PricingOverrides {
    pub special_shape_multiplier: Option<Decimal>,
    pub optibrush_special_shape_multiplier: Option<Decimal>,
    pub purchase_price_per_m2: Option<Decimal>,
}

impl PricingOverrides {
    pub fn apply_to(&self, base: PricingSettings) -> PricingSettings {
        let mut settings = base;
        if let Some(value) = self.special_shape_multiplier {
            settings.special_shape_multiplier = value;
        }
        if let Some(value) = self.optibrush_special_shape_multiplier {
            settings.optibrush_special_shape_multiplier = value;
        }
        if let Some(value) = self.purchase_price_per_m2 {
            settings.purchase_price_per_m2 = value;
        }
        settings
    }
}

impl Settings {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(var: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            database_url: var("DATABASE_URL").filter(|url| !url.trim().is_empty()),
            host: var("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port: parse_or(&var, "PORT", 8080),
            session_idle: Duration::from_secs(60 * parse_or(&var, "SESSION_IDLE_MINUTES", 60u64)),
            max_sessions: parse_or(&var, "MAX_SESSIONS", 10_000),
            pricing: PricingOverrides {
                special_shape_multiplier: parse_opt(&var, "SPECIAL_SHAPE_MULTIPLIER"),
                optibrush_special_shape_multiplier: parse_opt(
                    &var,
                    "OPTIBRUSH_SPECIAL_SHAPE_MULTIPLIER",
                ),
                purchase_price_per_m2: parse_opt(&var, "PURCHASE_PRICE_PER_M2"),
            },
        }
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_opt<T: FromStr>(var: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T> {
    let raw = var(key)?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!("Ignoring invalid {}={:?}", key, raw);
            None
        }
    }
}

fn parse_or<T: FromStr>(var: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> T {
    parse_opt(var, key).unwrap_or(default)
}
