use portfolio_tracker::api::routes::{AppState, app_router};
use portfolio_tracker::config::AppConfig;
use portfolio_tracker::persistence::connect_position_store;
use portfolio_tracker::quote::AlphaVantageClient;
use portfolio_tracker::service::PortfolioService;
use portfolio_tracker::store::{MemoryPositionStore, PositionStore};
use portfolio_tracker::telemetry::init_tracing;
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::from_env()?;
    init_tracing(&config.log_format)?;

    let store: Arc<dyn PositionStore> = match &config.database_url {
        Some(url) => {
            let store = connect_position_store(url).await?;
            tracing::info!("using postgres position store");
            Arc::new(store)
        }
        None => {
            tracing::info!(initial_cash = %config.initial_cash, "using in-memory position store");
            Arc::new(MemoryPositionStore::with_cash(config.initial_cash))
        }
    };
    if config.quote_api_key.is_empty() {
        tracing::warn!("QUOTE_API_KEY is not set, price refreshes will be rejected upstream");
    }
    let quotes = Arc::new(AlphaVantageClient::new(
        config.quote_base_url.clone(),
        config.quote_api_key.clone(),
    ));

    let app_state = AppState {
        service: Arc::new(PortfolioService::new(store, quotes)),
    };

    let app = app_router(app_state);
    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    tracing::info!(addr = %config.bind_addr, "portfolio tracker listening");
    axum::serve(listener, app).await?;
    Ok(())
}
