pub mod embed;
pub mod error;
pub mod routes;
pub mod state;

use axum::routing::{get, post};
use axum::Router;
use std::path::PathBuf;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Build the axum Router with all API routes and middleware.
pub fn build_router(root: PathBuf) -> Router {
    router(state::AppState::new(root))
}

/// Router over an existing state, e.g. one with a fixed clock.
pub fn router(app_state: state::AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Events (SSE)
        .route("/api/events", get(routes::events::sse_events))
        // Tickets
        .route(
            "/api/tickets",
            get(routes::tickets::list_tickets).post(routes::tickets::create_ticket),
        )
        .route(
            "/api/tickets/{id}",
            get(routes::tickets::get_ticket)
                .patch(routes::tickets::update_ticket)
                .delete(routes::tickets::delete_ticket),
        )
        .route(
            "/api/tickets/{id}/status",
            post(routes::tickets::set_status),
        )
        .route(
            "/api/tickets/{id}/priority",
            post(routes::tickets::set_priority),
        )
        .route(
            "/api/tickets/{id}/respond",
            post(routes::tickets::respond),
        )
        // Products
        .route(
            "/api/products",
            get(routes::products::list_products).post(routes::products::create_product),
        )
        .route(
            "/api/products/{slug}",
            axum::routing::delete(routes::products::delete_product),
        )
        // Users
        .route(
            "/api/users",
            get(routes::users::list_users).post(routes::users::create_user),
        )
        .route(
            "/api/users/{username}",
            get(routes::users::get_user).patch(routes::users::update_user),
        )
        // Reports
        .route("/api/reports/monthly", get(routes::reports::monthly))
        .route("/api/reports/summary", get(routes::reports::summary))
        // Activity
        .route("/api/activity", get(routes::activity::list_activity))
        // Config
        .route("/api/config", get(routes::config::get_config))
        .fallback(embed::static_handler)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(app_state)
}

/// Start the dashboard server on `port`.
pub async fn serve(root: PathBuf, port: u16, open_browser: bool) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{port}")).await?;
    serve_on(state::AppState::new(root), listener, open_browser).await
}

/// Start the dashboard server on a pre-bound listener, so the caller can read
/// the actual port first (useful with `port = 0`). The caller builds the
/// state, which is where a fixed clock is set.
pub async fn serve_on(
    app_state: state::AppState,
    listener: tokio::net::TcpListener,
    open_browser: bool,
) -> anyhow::Result<()> {
    let actual_port = listener.local_addr()?.port();
    let app = router(app_state);

    tracing::info!("helpdesk server listening on http://localhost:{actual_port}");

    if open_browser {
        let url = format!("http://localhost:{actual_port}");
        if let Err(e) = open::that(&url) {
            tracing::warn!(error = %e, "could not open browser");
        }
    }

    axum::serve(listener, app).await?;
    Ok(())
}
