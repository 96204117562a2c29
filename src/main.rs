use anyhow::Result;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use mat_offer_engine::cache::{start_session_janitor, SessionCache};
use mat_offer_engine::config::Settings;
use mat_offer_engine::{load_reference_data, routes, AppState};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,mat_offer_engine=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let settings = Settings::from_env();
    let (catalog, pricing) = load_reference_data(&settings).await;
    info!(
        "Pricing ready: {} catalog entries, purchase {} EUR/m2",
        catalog.len(),
        pricing.purchase_price_per_m2
    );

    let sessions = SessionCache::new(settings.max_sessions, settings.session_idle);
    tokio::spawn(start_session_janitor(sessions.clone(), Duration::from_secs(60)));

    let state = AppState::new(catalog, pricing, sessions);
    let app = routes::router(state);

    let addr = settings.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Mat offer engine listening on {}", addr);
    axum::serve(listener, app).await?;
    Ok(())
}
