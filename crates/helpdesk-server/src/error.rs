use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use helpdesk_core::HelpdeskError;

// ---------------------------------------------------------------------------
// Sentinels for statuses that have no HelpdeskError variant
// ---------------------------------------------------------------------------

#[derive(Debug)]
struct BadRequestError(String);

impl std::fmt::Display for BadRequestError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for BadRequestError {}

// ---------------------------------------------------------------------------
// AppError
// ---------------------------------------------------------------------------

/// Unified error type for HTTP responses. The body is `{"error": "..."}`.
#[derive(Debug)]
pub struct AppError(pub anyhow::Error);

impl AppError {
    /// 400 Bad Request with the given message.
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self(BadRequestError(msg.into()).into())
    }

    pub(crate) fn join(e: tokio::task::JoinError) -> Self {
        Self(anyhow::anyhow!("task join error: {e}"))
    }
}

fn status_for(e: &HelpdeskError) -> StatusCode {
    match e {
        HelpdeskError::NotInitialized => StatusCode::BAD_REQUEST,
        HelpdeskError::TicketNotFound(_)
        | HelpdeskError::ProductNotFound(_)
        | HelpdeskError::UserNotFound(_) => StatusCode::NOT_FOUND,
        HelpdeskError::ProductExists(_)
        | HelpdeskError::UserExists(_)
        | HelpdeskError::ProductInUse(_) => StatusCode::CONFLICT,
        HelpdeskError::InvalidSlug(_)
        | HelpdeskError::InvalidStatus(_)
        | HelpdeskError::InvalidPriority(_)
        | HelpdeskError::InvalidSource(_)
        | HelpdeskError::InvalidRole(_)
        | HelpdeskError::InvalidTimestamp(_) => StatusCode::BAD_REQUEST,
        HelpdeskError::InvalidTransition { .. } | HelpdeskError::DeadlineOutOfRange { .. } => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
        HelpdeskError::Io(_) | HelpdeskError::Yaml(_) | HelpdeskError::Json(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = if self.0.downcast_ref::<BadRequestError>().is_some() {
            StatusCode::BAD_REQUEST
        } else if let Some(e) = self.0.downcast_ref::<HelpdeskError>() {
            status_for(e)
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        };

        if status.is_server_error() {
            tracing::error!(error = %self.0, "request failed");
        }
        let body = serde_json::json!({ "error": self.0.to_string() });
        (status, axum::Json(body)).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status(e: HelpdeskError) -> StatusCode {
        AppError(e.into()).into_response().status()
    }

    #[test]
    fn not_found_variants_map_to_404() {
        assert_eq!(status(HelpdeskError::TicketNotFound("TKT-0001".into())), StatusCode::NOT_FOUND);
        assert_eq!(status(HelpdeskError::ProductNotFound("acme".into())), StatusCode::NOT_FOUND);
        assert_eq!(status(HelpdeskError::UserNotFound("dana".into())), StatusCode::NOT_FOUND);
    }

    #[test]
    fn duplicates_and_in_use_map_to_409() {
        assert_eq!(status(HelpdeskError::ProductExists("acme".into())), StatusCode::CONFLICT);
        assert_eq!(status(HelpdeskError::UserExists("dana".into())), StatusCode::CONFLICT);
        assert_eq!(status(HelpdeskError::ProductInUse("acme".into())), StatusCode::CONFLICT);
    }

    #[test]
    fn invalid_input_maps_to_400() {
        assert_eq!(status(HelpdeskError::InvalidStatus("x".into())), StatusCode::BAD_REQUEST);
        assert_eq!(status(HelpdeskError::InvalidTimestamp("x".into())), StatusCode::BAD_REQUEST);
        assert_eq!(status(HelpdeskError::NotInitialized), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn unprocessable_variants_map_to_422() {
        let e = HelpdeskError::InvalidTransition {
            from: "closed".into(),
            to: "new".into(),
            reason: "closed tickets cannot be reopened".into(),
        };
        assert_eq!(status(e), StatusCode::UNPROCESSABLE_ENTITY);
        let e = HelpdeskError::DeadlineOutOfRange {
            priority: "high".into(),
            hours: u32::MAX,
        };
        assert_eq!(status(e), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn io_and_foreign_errors_map_to_500() {
        assert_eq!(
            status(HelpdeskError::Io(std::io::Error::other("disk full"))),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        let err = AppError(anyhow::anyhow!("something unexpected"));
        assert_eq!(err.into_response().status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn bad_request_constructor_maps_to_400() {
        let err = AppError::bad_request("window must be at most 120");
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn response_body_is_json() {
        let response = AppError(HelpdeskError::TicketNotFound("TKT-0009".into()).into()).into_response();
        let ct = response
            .headers()
            .get(axum::http::header::CONTENT_TYPE)
            .expect("should have content-type");
        assert!(ct.to_str().unwrap().contains("application/json"));
    }
}
