//! Local activity log.
//!
//! Layout:
//!   .helpdesk/activity.yaml: oldest first, capped at `activity.max_entries`

use crate::error::Result;
use crate::io;
use crate::paths;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityKind {
    TicketCreated,
    TicketUpdated,
    StatusChanged,
    PriorityChanged,
    TicketResponded,
    TicketDeleted,
    ProductCreated,
    ProductDeleted,
    ProfileUpdated,
}

impl fmt::Display for ActivityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ActivityKind::TicketCreated => "ticket_created",
            ActivityKind::TicketUpdated => "ticket_updated",
            ActivityKind::StatusChanged => "status_changed",
            ActivityKind::PriorityChanged => "priority_changed",
            ActivityKind::TicketResponded => "ticket_responded",
            ActivityKind::TicketDeleted => "ticket_deleted",
            ActivityKind::ProductCreated => "product_created",
            ActivityKind::ProductDeleted => "product_deleted",
            ActivityKind::ProfileUpdated => "profile_updated",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivityEntry {
    pub id: String,
    pub at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actor: Option<String>,
    pub kind: ActivityKind,
    /// Ticket ID, product slug, or username the entry is about.
    pub subject: String,
    pub message: String,
}

impl ActivityEntry {
    pub fn new(
        kind: ActivityKind,
        subject: impl Into<String>,
        message: impl Into<String>,
        actor: Option<String>,
        at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            at,
            actor,
            kind,
            subject: subject.into(),
            message: message.into(),
        }
    }
}

fn load_all(root: &Path) -> Result<Vec<ActivityEntry>> {
    io::load_list(&paths::activity_path(root))
}

/// Append `entry`, dropping the oldest entries beyond `max_entries`.
pub fn record(root: &Path, entry: ActivityEntry, max_entries: usize) -> Result<()> {
    io::update_list(&paths::activity_path(root), |entries: &mut Vec<ActivityEntry>| {
        entries.push(entry);
        if entries.len() > max_entries {
            let excess = entries.len() - max_entries;
            entries.drain(..excess);
        }
        Ok(())
    })
}

/// Most recent entries first, at most `limit` of them.
pub fn list(root: &Path, limit: Option<usize>) -> Result<Vec<ActivityEntry>> {
    let mut entries = load_all(root)?;
    entries.reverse();
    if let Some(n) = limit {
        entries.truncate(n);
    }
    Ok(entries)
}

pub fn clear(root: &Path) -> Result<usize> {
    io::update_list(&paths::activity_path(root), |entries: &mut Vec<ActivityEntry>| {
        let count = entries.len();
        entries.clear();
        Ok(count)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn entry(n: i64) -> ActivityEntry {
        let base = crate::sla::parse_instant("2026-02-01").unwrap();
        ActivityEntry::new(
            ActivityKind::TicketCreated,
            format!("TKT-{n:04}"),
            format!("created #{n}"),
            Some("dana".into()),
            base + Duration::minutes(n),
        )
    }

    #[test]
    fn list_is_newest_first() {
        let dir = tempfile::TempDir::new().unwrap();
        for n in 1..=3 {
            record(dir.path(), entry(n), 10).unwrap();
        }
        let entries = list(dir.path(), None).unwrap();
        let subjects: Vec<_> = entries.iter().map(|e| e.subject.as_str()).collect();
        assert_eq!(subjects, vec!["TKT-0003", "TKT-0002", "TKT-0001"]);

        let limited = list(dir.path(), Some(1)).unwrap();
        assert_eq!(limited.len(), 1);
        assert_eq!(limited[0].subject, "TKT-0003");
    }

    #[test]
    fn record_drops_oldest_past_cap() {
        let dir = tempfile::TempDir::new().unwrap();
        for n in 1..=5 {
            record(dir.path(), entry(n), 3).unwrap();
        }
        let entries = list(dir.path(), None).unwrap();
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[2].subject, "TKT-0003");
    }

    #[test]
    fn zero_cap_keeps_nothing() {
        let dir = tempfile::TempDir::new().unwrap();
        record(dir.path(), entry(1), 0).unwrap();
        assert!(list(dir.path(), None).unwrap().is_empty());
    }

    #[test]
    fn clear_reports_count() {
        let dir = tempfile::TempDir::new().unwrap();
        record(dir.path(), entry(1), 10).unwrap();
        record(dir.path(), entry(2), 10).unwrap();
        assert_eq!(clear(dir.path()).unwrap(), 2);
        assert!(list(dir.path(), None).unwrap().is_empty());
    }

    #[test]
    fn entries_get_unique_ids() {
        assert_ne!(entry(1).id, entry(1).id);
    }
}
