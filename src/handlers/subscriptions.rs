use axum::{
    Json,
    extract::{Query, State},
    response::IntoResponse,
};
use serde::Deserialize;
use serde_json::json;

use crate::AppState;
use crate::db::queries;
use crate::error::AppError;

#[derive(Debug, Deserialize)]
pub struct CancelParams {
    pub id: Option<String>,
}

/// DELETE /subscriptions/cancel?id=
///
/// Only an active subscription can be canceled, so a second cancel for the
/// same id answers 404 rather than succeeding again.
pub async fn cancel_subscription(
    State(state): State<AppState>,
    Query(params): Query<CancelParams>,
) -> Result<impl IntoResponse, AppError> {
    let subscription_id = params
        .id
        .filter(|id| !id.trim().is_empty())
        .ok_or_else(|| AppError::BadRequest("Subscription ID is required".to_string()))?;

    let subscription = queries::find_active_subscription(&state.db, &subscription_id)
        .await?
        .ok_or_else(|| AppError::NotFound("No active subscription found".to_string()))?;

    queries::cancel_subscription(&state.db, subscription.id).await?;

    Ok(Json(json!({
        "status": "success",
        "message": "Subscription canceled",
    })))
}
