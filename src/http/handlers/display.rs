use axum::{Json, extract::State, http::StatusCode};
use chrono::Utc;
use serde::Serialize;

use crate::{
    guestbook::{
        FeedbackStats,
        cards::{DisplayCard, display_cards},
        layout::{FloatingSnippet, LeafPlacement, floating_snippets, layout_tree, tree_capacity},
    },
    models::{DisplayConfig, FeedbackEntry},
    state::AppState,
};

async fn fetch_entries(state: &AppState) -> Result<Vec<FeedbackEntry>, (StatusCode, String)> {
    state.gateway.list(state.display.order).await.map_err(|e| {
        tracing::error!("Error fetching feedbacks: {}", e);
        e.to_response()
    })
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsResponse {
    #[serde(flatten)]
    pub stats: FeedbackStats,
    pub entries_label: String,
}

pub async fn stats_handler(
    State(state): State<AppState>,
) -> Result<Json<StatsResponse>, (StatusCode, String)> {
    let entries = fetch_entries(&state).await?;
    let stats = FeedbackStats::compute(&entries);

    Ok(Json(StatsResponse {
        entries_label: stats.entries_label(),
        stats,
    }))
}

pub async fn cards_handler(
    State(state): State<AppState>,
) -> Result<Json<Vec<DisplayCard>>, (StatusCode, String)> {
    let entries = fetch_entries(&state).await?;
    Ok(Json(display_cards(&entries, Utc::now())))
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TreeResponse {
    pub leaves: Vec<LeafPlacement>,
    pub capacity: usize,
    pub unplaced: usize,
}

pub async fn tree_handler(
    State(state): State<AppState>,
) -> Result<Json<TreeResponse>, (StatusCode, String)> {
    let entries = fetch_entries(&state).await?;

    // Sway jitter is drawn from the thread RNG here only.
    let leaves = layout_tree(&entries, &mut rand::rng());

    Ok(Json(TreeResponse {
        unplaced: entries.len() - leaves.len(),
        capacity: tree_capacity(),
        leaves,
    }))
}

pub async fn floating_handler(
    State(state): State<AppState>,
) -> Result<Json<Vec<FloatingSnippet>>, (StatusCode, String)> {
    let entries = fetch_entries(&state).await?;
    Ok(Json(floating_snippets(&entries)))
}

pub async fn display_config_handler(State(state): State<AppState>) -> Json<DisplayConfig> {
    Json(state.display.as_ref().clone())
}

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub viewers: usize,
}

pub async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    let viewers = state.viewers.lock().await.len();
    Json(HealthResponse {
        status: "ok",
        viewers,
    })
}
