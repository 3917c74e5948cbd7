//! Display classes for status, priority, and source badges.
//!
//! Every mapping is total: legacy values fall back to `Neutral`.

use crate::sla::{self, SlaState};
use crate::ticket::Ticket;
use crate::types::{Priority, Source, TicketStatus};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DisplayClass {
    Info,
    Warning,
    Success,
    Neutral,
    Danger,
    Accent,
}

impl DisplayClass {
    pub fn as_str(self) -> &'static str {
        match self {
            DisplayClass::Info => "info",
            DisplayClass::Warning => "warning",
            DisplayClass::Success => "success",
            DisplayClass::Neutral => "neutral",
            DisplayClass::Danger => "danger",
            DisplayClass::Accent => "accent",
        }
    }
}

impl fmt::Display for DisplayClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub fn status_color(status: &TicketStatus) -> DisplayClass {
    match status {
        TicketStatus::New => DisplayClass::Info,
        TicketStatus::InProgress => DisplayClass::Accent,
        TicketStatus::Pending => DisplayClass::Warning,
        TicketStatus::Done => DisplayClass::Success,
        TicketStatus::Closed | TicketStatus::Legacy(_) => DisplayClass::Neutral,
    }
}

pub fn priority_color(priority: &Priority) -> DisplayClass {
    match priority {
        Priority::High => DisplayClass::Danger,
        Priority::Medium => DisplayClass::Warning,
        Priority::Low => DisplayClass::Info,
        Priority::Legacy(_) => DisplayClass::Neutral,
    }
}

pub fn source_color(source: &Source) -> DisplayClass {
    match source {
        Source::Email => DisplayClass::Info,
        Source::WhatsApp => DisplayClass::Success,
        Source::Phone => DisplayClass::Accent,
        Source::Web | Source::Legacy(_) => DisplayClass::Neutral,
    }
}

pub fn sla_color(state: SlaState) -> DisplayClass {
    match state {
        SlaState::OnTrack | SlaState::Met => DisplayClass::Success,
        SlaState::DueSoon => DisplayClass::Warning,
        SlaState::Overdue | SlaState::Breached => DisplayClass::Danger,
        SlaState::Unrecorded => DisplayClass::Neutral,
    }
}

// ---------------------------------------------------------------------------
// TicketView
// ---------------------------------------------------------------------------

/// A ticket together with everything derived from it at `now`. Derived
/// fields are computed on every read and never stored.
#[derive(Debug, Clone, Serialize)]
pub struct TicketView {
    #[serde(flatten)]
    pub ticket: Ticket,
    pub is_overdue: bool,
    pub is_response_overdue: bool,
    pub sla_state: SlaState,
    pub status_class: DisplayClass,
    pub priority_class: DisplayClass,
    pub source_class: DisplayClass,
    pub sla_class: DisplayClass,
}

impl TicketView {
    pub fn new(ticket: Ticket, now: DateTime<Utc>, due_soon: Duration) -> Self {
        let sla_state = sla::sla_state(&ticket, now, due_soon);
        Self {
            is_overdue: sla::is_overdue(&ticket, now),
            is_response_overdue: sla::is_response_overdue(&ticket, now),
            sla_state,
            status_class: status_color(&ticket.status),
            priority_class: priority_color(&ticket.priority),
            source_class: source_color(&ticket.source),
            sla_class: sla_color(sla_state),
            ticket,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_statuses_have_distinct_badges() {
        let classes: std::collections::HashSet<_> =
            TicketStatus::all().iter().map(status_color).collect();
        assert_eq!(classes.len(), 5);
    }

    #[test]
    fn legacy_values_fall_back_to_neutral() {
        assert_eq!(
            status_color(&TicketStatus::Legacy("Escalated".into())),
            DisplayClass::Neutral
        );
        assert_eq!(
            priority_color(&Priority::Legacy("urgent".into())),
            DisplayClass::Neutral
        );
        assert_eq!(source_color(&Source::Legacy("fax".into())), DisplayClass::Neutral);
    }

    #[test]
    fn high_priority_is_danger() {
        assert_eq!(priority_color(&Priority::High).as_str(), "danger");
        assert_eq!(sla_color(SlaState::Overdue).to_string(), "danger");
    }

    #[test]
    fn ticket_view_flattens_ticket_and_derives_classes() {
        let created = sla::parse_instant("2026-02-01T09:00").unwrap();
        let ticket = Ticket::new(
            "TKT-0001",
            "acme",
            "Login broken",
            Priority::High,
            created,
            &crate::config::SlaConfig::default(),
        )
        .unwrap();
        let now = sla::parse_instant("2026-02-01T18:00").unwrap();
        let view = TicketView::new(ticket, now, Duration::hours(4));
        assert!(view.is_overdue);
        assert_eq!(view.sla_state, SlaState::Overdue);

        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["id"], "TKT-0001");
        assert_eq!(json["status"], "new");
        assert_eq!(json["is_overdue"], true);
        assert_eq!(json["sla_state"], "overdue");
        assert_eq!(json["status_class"], "info");
        assert_eq!(json["priority_class"], "danger");
    }
}
