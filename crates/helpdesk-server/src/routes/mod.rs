pub mod activity;
pub mod config;
pub mod events;
pub mod products;
pub mod reports;
pub mod tickets;
pub mod users;

use chrono::{DateTime, Utc};
use helpdesk_core::activity::{self as log, ActivityEntry, ActivityKind};
use helpdesk_core::config::Config;
use helpdesk_core::user::{self, User};
use helpdesk_core::Result;
use serde::Deserialize;
use std::path::Path;

/// `?user=<username>`: scopes reads to the user's role and attributes
/// writes to them in the activity log.
#[derive(Deserialize, Default)]
pub struct ActorQuery {
    pub user: Option<String>,
}

/// The dashboard user a request acts as, from `?user=`.
pub(crate) fn acting_user(root: &Path, username: Option<&str>) -> Result<Option<User>> {
    username.map(|u| user::get(root, u)).transpose()
}

/// Append to the activity log; a failed write is logged and swallowed.
pub(crate) fn record(
    root: &Path,
    config: &Config,
    kind: ActivityKind,
    subject: &str,
    message: impl Into<String>,
    actor: Option<String>,
    now: DateTime<Utc>,
) {
    let entry = ActivityEntry::new(kind, subject, message, actor, now);
    if let Err(e) = log::record(root, entry, config.activity.max_entries) {
        tracing::warn!(error = %e, "failed to record activity");
    }
}
