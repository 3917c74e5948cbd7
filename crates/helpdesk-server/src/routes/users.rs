use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use helpdesk_core::{
    activity::ActivityKind,
    config::Config,
    user::{self, ProfilePatch, Role, User},
    HelpdeskError,
};
use serde::Deserialize;

use super::{record, ActorQuery};
use crate::error::AppError;
use crate::state::AppState;

/// GET /api/users
pub async fn list_users(State(app): State<AppState>) -> Result<Json<Vec<User>>, AppError> {
    let root = app.root.clone();
    let users = tokio::task::spawn_blocking(move || user::list(&root))
        .await
        .map_err(AppError::join)??;
    Ok(Json(users))
}

#[derive(Deserialize)]
pub struct CreateBody {
    pub username: String,
    pub display_name: Option<String>,
    /// `{"kind": "super_admin"}` or `{"kind": "product_admin", "product": "acme"}`
    pub role: Role,
}

/// POST /api/users
pub async fn create_user(
    State(app): State<AppState>,
    Json(body): Json<CreateBody>,
) -> Result<(StatusCode, Json<User>), AppError> {
    let root = app.root.clone();
    let now = app.now();
    let created = tokio::task::spawn_blocking(move || {
        let name = body.display_name.unwrap_or_else(|| body.username.clone());
        user::create(&root, body.username, name, body.role, now)
    })
    .await
    .map_err(AppError::join)??;
    Ok((StatusCode::CREATED, Json(created)))
}

/// GET /api/users/{username}
pub async fn get_user(
    State(app): State<AppState>,
    Path(username): Path<String>,
) -> Result<Json<User>, AppError> {
    let root = app.root.clone();
    let u = tokio::task::spawn_blocking(move || user::get(&root, &username))
        .await
        .map_err(AppError::join)??;
    Ok(Json(u))
}

/// PATCH /api/users/{username}: profile update. Empty `email` or `phone`
/// clears the field; an empty `display_name` is ignored.
pub async fn update_user(
    State(app): State<AppState>,
    Path(username): Path<String>,
    Query(q): Query<ActorQuery>,
    Json(patch): Json<ProfilePatch>,
) -> Result<Json<User>, AppError> {
    let root = app.root.clone();
    let now = app.now();
    let updated = tokio::task::spawn_blocking(move || {
        let config = Config::load(&root)?;
        let u = user::update_profile(&root, &username, patch, now)?;
        let actor = q.user.or_else(|| Some(u.username.clone()));
        record(&root, &config, ActivityKind::ProfileUpdated, &u.username, "profile updated", actor, now);
        Ok::<_, HelpdeskError>(u)
    })
    .await
    .map_err(AppError::join)??;
    Ok(Json(updated))
}
