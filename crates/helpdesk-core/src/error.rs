use thiserror::Error;

#[derive(Debug, Error)]
pub enum HelpdeskError {
    #[error("not initialized: run 'helpdesk init'")]
    NotInitialized,

    #[error("ticket not found: {0}")]
    TicketNotFound(String),

    #[error("product not found: {0}")]
    ProductNotFound(String),

    #[error("product already exists: {0}")]
    ProductExists(String),

    #[error("product '{0}' still has tickets")]
    ProductInUse(String),

    #[error("user not found: {0}")]
    UserNotFound(String),

    #[error("user already exists: {0}")]
    UserExists(String),

    #[error("invalid slug '{0}': must be lowercase alphanumeric with hyphens")]
    InvalidSlug(String),

    #[error("invalid status: {0}")]
    InvalidStatus(String),

    #[error("invalid priority: {0}")]
    InvalidPriority(String),

    #[error("invalid source: {0}")]
    InvalidSource(String),

    #[error("invalid role: {0}")]
    InvalidRole(String),

    #[error("invalid timestamp '{0}': expected RFC 3339, YYYY-MM-DDTHH:MM or YYYY-MM-DD")]
    InvalidTimestamp(String),

    #[error("invalid transition from {from} to {to}: {reason}")]
    InvalidTransition {
        from: String,
        to: String,
        reason: String,
    },

    #[error("sla.{priority}: {hours}h deadline falls outside the supported date range")]
    DeadlineOutOfRange { priority: String, hours: u32 },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, HelpdeskError>;
