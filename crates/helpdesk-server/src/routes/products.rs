use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use helpdesk_core::{activity::ActivityKind, config::Config, product, ticket, HelpdeskError};
use serde::Deserialize;

use super::{record, ActorQuery};
use crate::error::AppError;
use crate::state::AppState;

/// GET /api/products: products with their ticket counts.
pub async fn list_products(
    State(app): State<AppState>,
) -> Result<Json<serde_json::Value>, AppError> {
    let root = app.root.clone();
    let result = tokio::task::spawn_blocking(move || {
        let products = product::list(&root)?;
        let tickets = ticket::load_all(&root)?;
        let list: Vec<serde_json::Value> = products
            .iter()
            .map(|p| {
                serde_json::json!({
                    "slug": p.slug,
                    "name": p.name,
                    "description": p.description,
                    "created_at": p.created_at,
                    "tickets": tickets.iter().filter(|t| t.product == p.slug).count(),
                })
            })
            .collect();
        Ok::<_, HelpdeskError>(serde_json::json!(list))
    })
    .await
    .map_err(AppError::join)??;
    Ok(Json(result))
}

#[derive(Deserialize)]
pub struct CreateBody {
    pub slug: String,
    pub name: Option<String>,
    pub description: Option<String>,
}

/// POST /api/products
pub async fn create_product(
    State(app): State<AppState>,
    Query(q): Query<ActorQuery>,
    Json(body): Json<CreateBody>,
) -> Result<(StatusCode, Json<product::Product>), AppError> {
    let root = app.root.clone();
    let now = app.now();
    let created = tokio::task::spawn_blocking(move || {
        let config = Config::load(&root)?;
        let name = body.name.unwrap_or_else(|| body.slug.clone());
        let p = product::create(&root, body.slug, name, body.description, now)?;
        record(&root, &config, ActivityKind::ProductCreated, &p.slug, p.name.clone(), q.user, now);
        Ok::<_, HelpdeskError>(p)
    })
    .await
    .map_err(AppError::join)??;
    Ok((StatusCode::CREATED, Json(created)))
}

/// DELETE /api/products/{slug}: refused with 409 while tickets reference it.
pub async fn delete_product(
    State(app): State<AppState>,
    Path(slug): Path<String>,
    Query(q): Query<ActorQuery>,
) -> Result<StatusCode, AppError> {
    let root = app.root.clone();
    let now = app.now();
    tokio::task::spawn_blocking(move || {
        let config = Config::load(&root)?;
        let p = product::delete(&root, &slug)?;
        record(&root, &config, ActivityKind::ProductDeleted, &p.slug, p.name.clone(), q.user, now);
        Ok::<_, HelpdeskError>(())
    })
    .await
    .map_err(AppError::join)??;
    Ok(StatusCode::NO_CONTENT)
}
