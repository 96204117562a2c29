//! Offer pricing and configuration engine for mat rental and sales quotes.

use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

pub mod cache;
pub mod config;
pub mod db;
pub mod error;
pub mod offer;
pub mod pricing;
pub mod routes;

use cache::SessionCache;
use config::Settings;
use pricing::{PricingContext, PricingSettings, StaticCatalog};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<StaticCatalog>,
    pub pricing: Arc<PricingSettings>,
    pub sessions: SessionCache,
}

impl AppState {
    pub fn new(catalog: StaticCatalog, pricing: PricingSettings, sessions: SessionCache) -> Self {
        Self {
            catalog: Arc::new(catalog),
            pricing: Arc::new(pricing),
            sessions,
        }
    }

    /// Built-in catalog and settings, default session cache
    pub fn builtin() -> Self {
        Self::new(StaticCatalog::builtin(), PricingSettings::default(), SessionCache::default())
    }

    pub fn pricing_context(&self) -> PricingContext<'_> {
        PricingContext::new(self.catalog.as_ref(), self.pricing.as_ref())
    }
}

/// Catalog and pricing settings for this process.
///
/// Reads the database when one is configured, falls back to the built-in
/// data otherwise, then applies the environment overrides.
pub async fn load_reference_data(settings: &Settings) -> (StaticCatalog, PricingSettings) {
    let (catalog, pricing) = match &settings.database_url {
        Some(url) => load_from_database(url).await,
        None => {
            warn!("DATABASE_URL not set, using built-in catalog and pricing settings");
            (StaticCatalog::builtin(), PricingSettings::default())
        }
    };
    (catalog, settings.pricing.apply_to(pricing))
}

async fn load_from_database(url: &str) -> (StaticCatalog, PricingSettings) {
    let pool = match PgPoolOptions::new()
        .max_connections(2)
        .acquire_timeout(Duration::from_secs(5))
        .connect(url)
        .await
    {
        Ok(pool) => pool,
        Err(e) => {
            warn!("Failed to connect to database, using built-in reference data: {}", e);
            return (StaticCatalog::builtin(), PricingSettings::default());
        }
    };

    let catalog = match db::load_catalog(&pool).await {
        Ok(entries) if !entries.is_empty() => {
            info!("Loaded {} catalog entries from database", entries.len());
            StaticCatalog::new(entries)
        }
        Ok(_) => {
            warn!("mat_price_catalog is empty, using built-in catalog");
            StaticCatalog::builtin()
        }
        Err(e) => {
            warn!("Failed to load catalog, using built-in catalog: {}", e);
            StaticCatalog::builtin()
        }
    };

    let pricing = match db::load_pricing_settings(&pool, PricingSettings::default()).await {
        Ok(pricing) => pricing,
        Err(e) => {
            warn!("Failed to load pricing settings, using defaults: {}", e);
            PricingSettings::default()
        }
    };

    pool.close().await;
    (catalog, pricing)
}
