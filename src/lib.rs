pub mod config;
pub mod db;
pub mod errors;
pub mod guestbook;
mod http;
mod middleware;
pub mod models;
pub mod state;
pub mod ws;

use axum::{Router, http::StatusCode, middleware as axum_middleware};
use config::Config;
use db::{MemoryGateway, RedisGateway, SharedGateway};
use errors::AppError;
use middleware::{cors_layer, create_global_rate_limiter, rate_limit_middleware};
use state::AppState;
use std::{net::SocketAddr, sync::Arc};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

/// Every HTTP and websocket route behind the shared middleware stack.
pub fn create_app(state: AppState, allowed_origins: &[String]) -> Router {
    let global_rate_limiter = create_global_rate_limiter();

    Router::new()
        .merge(http::create_http_routes(state.clone()))
        .merge(ws::create_ws_routes(state))
        .layer(axum_middleware::from_fn(move |req, next| {
            rate_limit_middleware(global_rate_limiter.clone(), req, next)
        }))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors_layer(allowed_origins)),
        )
        .fallback(|| async { (StatusCode::NOT_FOUND, "404 Not Found") })
}

pub async fn build_gateway(config: &Config) -> Result<SharedGateway, AppError> {
    match &config.redis_url {
        Some(url) => {
            let gateway = RedisGateway::connect(url).await?;
            tracing::info!("Using Redis feedback store");
            Ok(Arc::new(gateway))
        }
        None => {
            tracing::warn!("REDIS_URL not set, feedback is kept in memory only");
            Ok(Arc::new(MemoryGateway::new()))
        }
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down");
}

pub async fn start_server() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let config = Config::load();
    let gateway = build_gateway(&config).await?;

    tracing::info!(
        "Display: {:?} variant, {:?} theme, ordered by {} ({})",
        config.display.variant,
        config.display.theme,
        config.display.order.key,
        if config.display.order.ascending { "ascending" } else { "descending" }
    );

    let state = AppState::new(gateway, config.display.clone());
    let app = create_app(state, &config.allowed_origins);

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", config.port)).await?;
    tracing::info!("Guest book running at http://127.0.0.1:{}", config.port);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    Ok(())
}
