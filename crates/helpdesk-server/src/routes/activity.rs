use axum::{
    extract::{Query, State},
    Json,
};
use helpdesk_core::activity::{self, ActivityEntry};
use serde::Deserialize;

use crate::error::AppError;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct ActivityQuery {
    pub limit: Option<usize>,
}

/// GET /api/activity?limit=: newest first, 50 entries unless asked.
pub async fn list_activity(
    State(app): State<AppState>,
    Query(q): Query<ActivityQuery>,
) -> Result<Json<Vec<ActivityEntry>>, AppError> {
    let root = app.root.clone();
    let limit = q.limit.unwrap_or(50);
    let entries = tokio::task::spawn_blocking(move || activity::list(&root, Some(limit)))
        .await
        .map_err(AppError::join)??;
    Ok(Json(entries))
}
