use axum::{
    extract::{Query, State},
    Json,
};
use helpdesk_core::{
    config::Config,
    report::{self, MonthlyStat, ReportSummary},
    ticket::{self, Ticket},
    user, HelpdeskError,
};
use serde::Deserialize;
use std::path::Path;

use super::acting_user;
use crate::error::AppError;
use crate::state::AppState;

#[derive(Deserialize, Default)]
pub struct ReportQuery {
    pub window: Option<u32>,
    pub product: Option<String>,
    pub user: Option<String>,
}

fn scoped_tickets(
    root: &Path,
    user_name: Option<&str>,
    product: Option<&str>,
) -> helpdesk_core::Result<Vec<Ticket>> {
    let mut tickets = ticket::load_all(root)?;
    if let Some(u) = acting_user(root, user_name)? {
        tickets = user::visible(&u, tickets);
    }
    if let Some(p) = product {
        tickets.retain(|t| t.product == p);
    }
    Ok(tickets)
}

/// GET /api/reports/monthly?window=&product=&user=: oldest month first.
pub async fn monthly(
    State(app): State<AppState>,
    Query(q): Query<ReportQuery>,
) -> Result<Json<Vec<MonthlyStat>>, AppError> {
    if q.window.is_some_and(|w| w > report::MAX_WINDOW) {
        return Err(AppError::bad_request(format!(
            "window must be at most {} months",
            report::MAX_WINDOW
        )));
    }
    let root = app.root.clone();
    let now = app.now();
    let stats = tokio::task::spawn_blocking(move || {
        let config = Config::load(&root)?;
        let tickets = scoped_tickets(&root, q.user.as_deref(), q.product.as_deref())?;
        let window = q.window.unwrap_or(config.report.window_months);
        Ok::<_, HelpdeskError>(report::monthly_stats(&tickets, window, now))
    })
    .await
    .map_err(AppError::join)??;
    Ok(Json(stats))
}

/// GET /api/reports/summary?product=&user=
pub async fn summary(
    State(app): State<AppState>,
    Query(q): Query<ReportQuery>,
) -> Result<Json<ReportSummary>, AppError> {
    let root = app.root.clone();
    let now = app.now();
    let summary = tokio::task::spawn_blocking(move || {
        Config::load(&root)?;
        let tickets = scoped_tickets(&root, q.user.as_deref(), q.product.as_deref())?;
        Ok::<_, HelpdeskError>(report::summarize(&tickets, now))
    })
    .await
    .map_err(AppError::join)??;
    Ok(Json(summary))
}
