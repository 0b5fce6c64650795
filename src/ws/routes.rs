use axum::{Router, routing::get};

use crate::{state::AppState, ws::handler::feedback_ws_handler};

pub fn create_ws_routes(state: AppState) -> Router {
    Router::new()
        .route("/ws/feedback", get(feedback_ws_handler))
        .with_state(state)
}
