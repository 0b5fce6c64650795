use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};

use crate::{
    errors::AppError,
    guestbook::{
        SubmissionForm,
        form::{Confirmation, FormError},
        pagination::{Page, paginate},
    },
    models::{FeedbackEntry, ListOrder, OrderKey},
    state::AppState,
};

#[derive(Deserialize)]
pub struct SubmitFeedbackPayload {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub comment: String,
    #[serde(default)]
    pub rating: i16,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitFeedbackResponse {
    #[serde(flatten)]
    pub confirmation: Confirmation,
    pub entry: FeedbackEntry,
}

fn form_error_response(err: FormError) -> (StatusCode, String) {
    match err {
        FormError::MissingFields => (StatusCode::BAD_REQUEST, err.to_string()),
        FormError::Backend(ref source) => {
            let (status, _) = source.to_response();
            (status, err.to_string())
        }
        FormError::Busy => (StatusCode::CONFLICT, err.to_string()),
    }
}

pub async fn submit_feedback_handler(
    State(state): State<AppState>,
    Json(payload): Json<SubmitFeedbackPayload>,
) -> Result<Json<SubmitFeedbackResponse>, (StatusCode, String)> {
    if !(0..=5).contains(&payload.rating) {
        return Err(AppError::BadRequest("Rating must be between 1 and 5".into()).to_response());
    }

    let mut form = SubmissionForm::new(state.display.confirm_delay);
    form.set_name(payload.name).map_err(form_error_response)?;
    form.set_comment(payload.comment).map_err(form_error_response)?;
    form.select_star(payload.rating as u8).map_err(form_error_response)?;

    let entry = form
        .submit(state.gateway.as_ref())
        .await
        .map_err(form_error_response)?;

    let confirmation = form
        .confirmation()
        .ok_or_else(|| AppError::InternalError.to_response())?;

    Ok(Json(SubmitFeedbackResponse {
        confirmation,
        entry,
    }))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListFeedbackQuery {
    pub order: Option<String>,
    pub ascending: Option<bool>,
    pub page: Option<usize>,
    pub per_page: Option<usize>,
}

pub async fn list_feedback_handler(
    State(state): State<AppState>,
    Query(query): Query<ListFeedbackQuery>,
) -> Result<Json<Page<FeedbackEntry>>, (StatusCode, String)> {
    let mut order = state.display.order;
    if let Some(key) = query.order {
        order = ListOrder {
            key: key.parse::<OrderKey>().map_err(|e| e.to_response())?,
            ascending: order.ascending,
        };
    }
    if let Some(ascending) = query.ascending {
        order.ascending = ascending;
    }

    let per_page = query.per_page.unwrap_or(state.display.page_size);
    if per_page == 0 {
        return Err(AppError::BadRequest("perPage must be at least 1".into()).to_response());
    }

    let entries = state.gateway.list(order).await.map_err(|e| {
        tracing::error!("Error fetching feedbacks: {}", e);
        e.to_response()
    })?;

    Ok(Json(paginate(&entries, query.page.unwrap_or(1), per_page)))
}
