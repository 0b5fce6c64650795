use axum::{
    Router, middleware as axum_middleware,
    routing::{get, post},
};

use crate::{
    http::handlers::{
        cards_handler, display_config_handler, floating_handler, health_handler,
        list_feedback_handler, stats_handler, submit_feedback_handler, tree_handler,
    },
    middleware::{create_submit_rate_limiter, rate_limit_middleware},
    state::AppState,
};

pub fn create_http_routes(state: AppState) -> Router {
    let submit_rate_limiter = create_submit_rate_limiter();

    let submit = post(submit_feedback_handler).layer(axum_middleware::from_fn(move |req, next| {
        rate_limit_middleware(submit_rate_limiter.clone(), req, next)
    }));

    Router::new()
        .route("/feedback", get(list_feedback_handler).merge(submit))
        .route("/feedback/stats", get(stats_handler))
        .route("/feedback/cards", get(cards_handler))
        .route("/feedback/tree", get(tree_handler))
        .route("/feedback/floating", get(floating_handler))
        .route("/display", get(display_config_handler))
        .route("/health", get(health_handler))
        .with_state(state)
}
