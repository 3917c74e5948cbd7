use axum::extract::State;
use axum::Json;

use crate::error::AppError;
use crate::state::AppState;

/// GET /api/config: read-only view of `.helpdesk/config.yaml` plus any
/// validation warnings.
pub async fn get_config(State(app): State<AppState>) -> Result<Json<serde_json::Value>, AppError> {
    let root = app.root.clone();
    let result = tokio::task::spawn_blocking(move || {
        let config = helpdesk_core::config::Config::load(&root)?;
        let warnings = config.validate();
        let mut json = serde_json::to_value(&config)?;
        json["warnings"] = serde_json::to_value(&warnings)?;
        Ok::<_, helpdesk_core::HelpdeskError>(json)
    })
    .await
    .map_err(AppError::join)??;

    Ok(Json(result))
}
