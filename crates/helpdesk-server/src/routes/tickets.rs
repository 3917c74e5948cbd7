use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::Duration;
use helpdesk_core::{
    activity::ActivityKind,
    config::Config,
    presentation::TicketView,
    ticket::{self, NewTicket, Ticket, TicketFilter, TicketPatch},
    types::{Priority, TicketStatus},
    HelpdeskError,
};
use serde::Deserialize;

use super::{acting_user, record, ActorQuery};
use crate::error::AppError;
use crate::state::AppState;

fn due_soon(config: &Config) -> Duration {
    Duration::hours(i64::from(config.sla.due_soon_hours))
}

/// Load `id`, failing with not-found when `user` may not see it.
fn visible_ticket(
    root: &std::path::Path,
    id: &str,
    user: Option<&str>,
) -> helpdesk_core::Result<Ticket> {
    let t = ticket::get(root, id)?;
    if let Some(u) = acting_user(root, user)? {
        if !u.can_view(&t) {
            return Err(HelpdeskError::TicketNotFound(id.to_string()));
        }
    }
    Ok(t)
}

// ---------------------------------------------------------------------------
// List
// ---------------------------------------------------------------------------

#[derive(Deserialize, Default)]
pub struct ListQuery {
    pub product: Option<String>,
    pub status: Option<String>,
    pub priority: Option<String>,
    #[serde(default)]
    pub open: bool,
    #[serde(default)]
    pub overdue: bool,
    pub search: Option<String>,
    pub user: Option<String>,
}

/// GET /api/tickets: tickets newest first, with derived SLA fields.
pub async fn list_tickets(
    State(app): State<AppState>,
    Query(q): Query<ListQuery>,
) -> Result<Json<Vec<TicketView>>, AppError> {
    let root = app.root.clone();
    let now = app.now();
    let views = tokio::task::spawn_blocking(move || {
        let config = Config::load(&root)?;
        let filter = TicketFilter {
            product: q.product,
            status: q.status.map(|s| s.parse::<TicketStatus>()).transpose()?,
            priority: q.priority.map(|p| p.parse::<Priority>()).transpose()?,
            open_only: q.open,
            overdue_only: q.overdue,
            search: q.search,
        };
        let mut tickets = ticket::list(&root, &filter, now)?;
        if let Some(u) = acting_user(&root, q.user.as_deref())? {
            tickets = helpdesk_core::user::visible(&u, tickets);
        }
        let views: Vec<TicketView> = tickets
            .into_iter()
            .map(|t| TicketView::new(t, now, due_soon(&config)))
            .collect();
        Ok::<_, HelpdeskError>(views)
    })
    .await
    .map_err(AppError::join)??;
    Ok(Json(views))
}

// ---------------------------------------------------------------------------
// Show
// ---------------------------------------------------------------------------

/// GET /api/tickets/{id}
pub async fn get_ticket(
    State(app): State<AppState>,
    Path(id): Path<String>,
    Query(q): Query<ActorQuery>,
) -> Result<Json<TicketView>, AppError> {
    let root = app.root.clone();
    let now = app.now();
    let view = tokio::task::spawn_blocking(move || {
        let config = Config::load(&root)?;
        let t = visible_ticket(&root, &id, q.user.as_deref())?;
        Ok::<_, HelpdeskError>(TicketView::new(t, now, due_soon(&config)))
    })
    .await
    .map_err(AppError::join)??;
    Ok(Json(view))
}

// ---------------------------------------------------------------------------
// Create
// ---------------------------------------------------------------------------

/// POST /api/tickets
pub async fn create_ticket(
    State(app): State<AppState>,
    Query(q): Query<ActorQuery>,
    Json(body): Json<NewTicket>,
) -> Result<(StatusCode, Json<TicketView>), AppError> {
    let root = app.root.clone();
    let now = app.now();
    let view = tokio::task::spawn_blocking(move || {
        let config = Config::load(&root)?;
        if let Some(u) = acting_user(&root, q.user.as_deref())? {
            if u.product_scope().is_some_and(|p| p != body.product) {
                return Err(HelpdeskError::ProductNotFound(body.product));
            }
        }
        let t = ticket::create(&root, body, &config.sla, now)?;
        record(&root, &config, ActivityKind::TicketCreated, &t.id, t.title.clone(), q.user, now);
        Ok::<_, HelpdeskError>(TicketView::new(t, now, due_soon(&config)))
    })
    .await
    .map_err(AppError::join)??;
    Ok((StatusCode::CREATED, Json(view)))
}

// ---------------------------------------------------------------------------
// Update
// ---------------------------------------------------------------------------

/// PATCH /api/tickets/{id}: partial update; `status` and `priority` go
/// through the same rules as their dedicated endpoints.
pub async fn update_ticket(
    State(app): State<AppState>,
    Path(id): Path<String>,
    Query(q): Query<ActorQuery>,
    Json(patch): Json<TicketPatch>,
) -> Result<Json<TicketView>, AppError> {
    let root = app.root.clone();
    let now = app.now();
    let view = tokio::task::spawn_blocking(move || {
        let config = Config::load(&root)?;
        let before = visible_ticket(&root, &id, q.user.as_deref())?;
        let t = ticket::update(&root, &id, patch, &config.sla, now)?;

        let (kind, message) = if t.status != before.status {
            (
                ActivityKind::StatusChanged,
                format!("{} → {}", before.status, t.status),
            )
        } else if t.priority != before.priority {
            (
                ActivityKind::PriorityChanged,
                format!("{} → {}", before.priority, t.priority),
            )
        } else {
            (ActivityKind::TicketUpdated, "fields edited".to_string())
        };
        record(&root, &config, kind, &t.id, message, q.user, now);
        Ok::<_, HelpdeskError>(TicketView::new(t, now, due_soon(&config)))
    })
    .await
    .map_err(AppError::join)??;
    Ok(Json(view))
}

#[derive(Deserialize)]
pub struct StatusBody {
    pub status: String,
}

/// POST /api/tickets/{id}/status
pub async fn set_status(
    State(app): State<AppState>,
    Path(id): Path<String>,
    Query(q): Query<ActorQuery>,
    Json(body): Json<StatusBody>,
) -> Result<Json<TicketView>, AppError> {
    let root = app.root.clone();
    let now = app.now();
    let view = tokio::task::spawn_blocking(move || {
        let config = Config::load(&root)?;
        let status: TicketStatus = body.status.parse()?;
        let before = visible_ticket(&root, &id, q.user.as_deref())?;
        let t = ticket::set_status(&root, &id, status, now)?;
        if t.status != before.status {
            let message = format!("{} → {}", before.status, t.status);
            record(&root, &config, ActivityKind::StatusChanged, &t.id, message, q.user, now);
        }
        Ok::<_, HelpdeskError>(TicketView::new(t, now, due_soon(&config)))
    })
    .await
    .map_err(AppError::join)??;
    Ok(Json(view))
}

#[derive(Deserialize)]
pub struct PriorityBody {
    pub priority: String,
}

/// POST /api/tickets/{id}/priority: recomputes both deadlines.
pub async fn set_priority(
    State(app): State<AppState>,
    Path(id): Path<String>,
    Query(q): Query<ActorQuery>,
    Json(body): Json<PriorityBody>,
) -> Result<Json<TicketView>, AppError> {
    let root = app.root.clone();
    let now = app.now();
    let view = tokio::task::spawn_blocking(move || {
        let config = Config::load(&root)?;
        let priority: Priority = body.priority.parse()?;
        let before = visible_ticket(&root, &id, q.user.as_deref())?;
        let t = ticket::set_priority(&root, &id, priority, &config.sla, now)?;
        if t.priority != before.priority {
            let message = format!("{} → {}", before.priority, t.priority);
            record(&root, &config, ActivityKind::PriorityChanged, &t.id, message, q.user, now);
        }
        Ok::<_, HelpdeskError>(TicketView::new(t, now, due_soon(&config)))
    })
    .await
    .map_err(AppError::join)??;
    Ok(Json(view))
}

/// POST /api/tickets/{id}/respond: record the first agent response.
pub async fn respond(
    State(app): State<AppState>,
    Path(id): Path<String>,
    Query(q): Query<ActorQuery>,
) -> Result<Json<TicketView>, AppError> {
    let root = app.root.clone();
    let now = app.now();
    let view = tokio::task::spawn_blocking(move || {
        let config = Config::load(&root)?;
        visible_ticket(&root, &id, q.user.as_deref())?;
        let t = ticket::mark_responded(&root, &id, now)?;
        record(&root, &config, ActivityKind::TicketResponded, &t.id, "first response", q.user, now);
        Ok::<_, HelpdeskError>(TicketView::new(t, now, due_soon(&config)))
    })
    .await
    .map_err(AppError::join)??;
    Ok(Json(view))
}

// ---------------------------------------------------------------------------
// Delete
// ---------------------------------------------------------------------------

/// DELETE /api/tickets/{id}
pub async fn delete_ticket(
    State(app): State<AppState>,
    Path(id): Path<String>,
    Query(q): Query<ActorQuery>,
) -> Result<StatusCode, AppError> {
    let root = app.root.clone();
    let now = app.now();
    tokio::task::spawn_blocking(move || {
        let config = Config::load(&root)?;
        visible_ticket(&root, &id, q.user.as_deref())?;
        let t = ticket::delete(&root, &id)?;
        record(&root, &config, ActivityKind::TicketDeleted, &t.id, t.title.clone(), q.user, now);
        Ok::<_, HelpdeskError>(())
    })
    .await
    .map_err(AppError::join)??;
    Ok(StatusCode::NO_CONTENT)
}
