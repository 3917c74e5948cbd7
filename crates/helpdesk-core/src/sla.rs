//! SLA deadlines and overdue classification.
//!
//! Every function here takes the evaluation instant `now` as an argument;
//! nothing reads the wall clock. Timestamps are `DateTime<Utc>`, so all
//! comparisons happen on a single timeline. Text is turned into an instant
//! only at the boundary, through [`parse_instant`], which rejects anything
//! it cannot read instead of guessing.

use crate::config::SlaConfig;
use crate::error::{HelpdeskError, Result};
use crate::ticket::Ticket;
use crate::types::Priority;
use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Deadlines
// ---------------------------------------------------------------------------

/// `(response_due_at, resolve_due_at)` for a ticket opened at `created_at`.
///
/// Fails with [`HelpdeskError::DeadlineOutOfRange`] when a configured target
/// pushes the deadline past what `DateTime<Utc>` can represent.
pub fn due_dates(
    priority: &Priority,
    created_at: DateTime<Utc>,
    sla: &SlaConfig,
) -> Result<(DateTime<Utc>, DateTime<Utc>)> {
    let target = sla.target_for(priority);
    let deadline = |hours: u32| {
        Duration::try_hours(i64::from(hours))
            .and_then(|d| created_at.checked_add_signed(d))
            .ok_or_else(|| HelpdeskError::DeadlineOutOfRange {
                priority: priority.to_string(),
                hours,
            })
    };
    Ok((
        deadline(target.response_hours)?,
        deadline(target.resolve_hours)?,
    ))
}

// ---------------------------------------------------------------------------
// Classification
// ---------------------------------------------------------------------------

/// A ticket is overdue when it is still open and `now` is strictly past its
/// resolve deadline. Done and Closed tickets are never overdue.
pub fn is_overdue(ticket: &Ticket, now: DateTime<Utc>) -> bool {
    if ticket.status.is_terminal() {
        return false;
    }
    now > ticket.resolve_due_at
}

/// Open, not yet answered, and past the response deadline.
pub fn is_response_overdue(ticket: &Ticket, now: DateTime<Utc>) -> bool {
    if ticket.status.is_terminal() || ticket.first_response_at.is_some() {
        return false;
    }
    now > ticket.response_due_at
}

/// Whether a resolved ticket made its deadline. `None` while unresolved.
pub fn resolved_within_sla(ticket: &Ticket) -> Option<bool> {
    ticket.resolved_at.map(|at| at <= ticket.resolve_due_at)
}

/// Time left until the resolve deadline; negative once overdue, `None` for
/// terminal tickets.
pub fn time_remaining(ticket: &Ticket, now: DateTime<Utc>) -> Option<Duration> {
    if ticket.status.is_terminal() {
        return None;
    }
    Some(ticket.resolve_due_at - now)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SlaState {
    OnTrack,
    DueSoon,
    Overdue,
    /// Terminal and resolved on or before the deadline.
    Met,
    /// Terminal but resolved after the deadline.
    Breached,
    /// Terminal with no resolution timestamp recorded.
    Unrecorded,
}

impl SlaState {
    pub fn as_str(self) -> &'static str {
        match self {
            SlaState::OnTrack => "on_track",
            SlaState::DueSoon => "due_soon",
            SlaState::Overdue => "overdue",
            SlaState::Met => "met",
            SlaState::Breached => "breached",
            SlaState::Unrecorded => "unrecorded",
        }
    }
}

impl fmt::Display for SlaState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub fn sla_state(ticket: &Ticket, now: DateTime<Utc>, due_soon: Duration) -> SlaState {
    if ticket.status.is_terminal() {
        return match resolved_within_sla(ticket) {
            Some(true) => SlaState::Met,
            Some(false) => SlaState::Breached,
            None => {
                tracing::warn!(ticket = %ticket.id, "terminal ticket has no resolved_at");
                SlaState::Unrecorded
            }
        };
    }
    if is_overdue(ticket, now) {
        SlaState::Overdue
    } else if ticket.resolve_due_at - now <= due_soon {
        SlaState::DueSoon
    } else {
        SlaState::OnTrack
    }
}

// ---------------------------------------------------------------------------
// Parsing
// ---------------------------------------------------------------------------

const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
];

/// Parse an instant from RFC 3339, `YYYY-MM-DDTHH:MM[:SS]` or `YYYY-MM-DD`.
/// Values without an offset are taken as UTC; a bare date is midnight.
pub fn parse_instant(s: &str) -> Result<DateTime<Utc>> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }
    for fmt in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
            return Ok(Utc.from_utc_datetime(&naive));
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        if let Some(naive) = date.and_hms_opt(0, 0, 0) {
            return Ok(Utc.from_utc_datetime(&naive));
        }
    }
    Err(HelpdeskError::InvalidTimestamp(s.to_string()))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
