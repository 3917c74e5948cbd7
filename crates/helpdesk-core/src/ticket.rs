//! Support tickets.
//!
//! Layout:
//!   .helpdesk/tickets.yaml: the whole ticket collection
//!
//! The collection is always read and written in full. IDs are `TKT-0001`,
//! `TKT-0002`, … allocated one past the highest existing number, so gaps
//! left by deletions are never filled.

use crate::config::SlaConfig;
use crate::error::{HelpdeskError, Result};
use crate::io;
use crate::paths;
use crate::product;
use crate::sla;
use crate::types::{Priority, Source, TicketStatus};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;

const ID_PREFIX: &str = "TKT-";

// ---------------------------------------------------------------------------
// Ticket
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ticket {
    pub id: String,
    pub product: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub requester: Option<String>,
    #[serde(default)]
    pub source: Source,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assignee: Option<String>,
    pub status: TicketStatus,
    pub priority: Priority,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_response_at: Option<DateTime<Utc>>,
    pub response_due_at: DateTime<Utc>,
    pub resolve_due_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolved_at: Option<DateTime<Utc>>,
}

impl Ticket {
    pub fn new(
        id: impl Into<String>,
        product: impl Into<String>,
        title: impl Into<String>,
        priority: Priority,
        created_at: DateTime<Utc>,
        sla_config: &SlaConfig,
    ) -> Result<Self> {
        let (response_due_at, resolve_due_at) = sla::due_dates(&priority, created_at, sla_config)?;
        Ok(Self {
            id: id.into(),
            product: product.into(),
            title: title.into(),
            description: None,
            requester: None,
            source: Source::default(),
            assignee: None,
            status: TicketStatus::New,
            priority,
            created_at,
            updated_at: created_at,
            first_response_at: None,
            response_due_at,
            resolve_due_at,
            resolved_at: None,
        })
    }

    /// Move to `target`, keeping `resolved_at` in step with terminal states.
    ///
    /// Entering Done or Closed stamps `resolved_at` unless it is already set
    /// (Done → Closed keeps the original resolution time). Leaving a terminal
    /// state clears it. Closed is final.
    pub fn transition(&mut self, target: TicketStatus, now: DateTime<Utc>) -> Result<()> {
        if target.is_legacy() {
            return Err(HelpdeskError::InvalidStatus(target.to_string()));
        }
        if target == self.status {
            return Ok(());
        }
        if self.status == TicketStatus::Closed {
            return Err(HelpdeskError::InvalidTransition {
                from: self.status.to_string(),
                to: target.to_string(),
                reason: "closed tickets cannot be reopened".to_string(),
            });
        }

        if target.is_terminal() {
            if self.resolved_at.is_none() {
                self.resolved_at = Some(now);
            }
        } else {
            self.resolved_at = None;
        }
        if self.first_response_at.is_none() && target != TicketStatus::New {
            self.first_response_at = Some(now);
        }
        self.status = target;
        self.updated_at = now;
        Ok(())
    }

    /// Change priority and recompute both deadlines from `created_at`.
    pub fn reprioritize(
        &mut self,
        priority: Priority,
        sla_config: &SlaConfig,
        now: DateTime<Utc>,
    ) -> Result<()> {
        let (response_due_at, resolve_due_at) =
            sla::due_dates(&priority, self.created_at, sla_config)?;
        self.priority = priority;
        self.response_due_at = response_due_at;
        self.resolve_due_at = resolve_due_at;
        self.updated_at = now;
        Ok(())
    }

    /// Record the first agent response. Later calls keep the first time.
    pub fn mark_responded(&mut self, now: DateTime<Utc>) {
        if self.first_response_at.is_none() {
            self.first_response_at = Some(now);
            self.updated_at = now;
        }
    }

    fn matches_text(&self, needle: &str) -> bool {
        let needle = needle.to_lowercase();
        self.id.to_lowercase().contains(&needle)
            || self.title.to_lowercase().contains(&needle)
            || self
                .requester
                .as_deref()
                .is_some_and(|r| r.to_lowercase().contains(&needle))
    }
}

// ---------------------------------------------------------------------------
// Inputs
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewTicket {
    pub product: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub requester: Option<String>,
    #[serde(default)]
    pub source: Option<Source>,
    #[serde(default)]
    pub assignee: Option<String>,
    #[serde(default)]
    pub priority: Option<Priority>,
}

/// Partial update. `None` leaves a field unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TicketPatch {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub requester: Option<String>,
    #[serde(default)]
    pub source: Option<Source>,
    #[serde(default)]
    pub assignee: Option<String>,
    #[serde(default)]
    pub priority: Option<Priority>,
    #[serde(default)]
    pub status: Option<TicketStatus>,
}

#[derive(Debug, Clone, Default)]
pub struct TicketFilter {
    pub product: Option<String>,
    pub status: Option<TicketStatus>,
    pub priority: Option<Priority>,
    pub open_only: bool,
    pub overdue_only: bool,
    pub search: Option<String>,
}

impl TicketFilter {
    pub fn matches(&self, ticket: &Ticket, now: DateTime<Utc>) -> bool {
        if let Some(product) = &self.product {
            if &ticket.product != product {
                return false;
            }
        }
        if let Some(status) = &self.status {
            if &ticket.status != status {
                return false;
            }
        }
        if let Some(priority) = &self.priority {
            if &ticket.priority != priority {
                return false;
            }
        }
        if self.open_only && ticket.status.is_terminal() {
            return false;
        }
        if self.overdue_only && !sla::is_overdue(ticket, now) {
            return false;
        }
        if let Some(needle) = &self.search {
            if !ticket.matches_text(needle) {
                return false;
            }
        }
        true
    }
}

// ---------------------------------------------------------------------------
// Collection I/O
// ---------------------------------------------------------------------------

pub fn load_all(root: &Path) -> Result<Vec<Ticket>> {
    io::load_list(&paths::tickets_path(root))
}

/// Run `op` against the ticket collection under the store lock and save the
/// result. Every mutating operation goes through here.
fn modify<R>(root: &Path, op: impl FnOnce(&mut Vec<Ticket>) -> Result<R>) -> Result<R> {
    io::update_list(&paths::tickets_path(root), |tickets: &mut Vec<Ticket>| {
        let result = op(tickets)?;
        tracing::debug!(count = tickets.len(), "writing ticket collection");
        Ok(result)
    })
}

fn next_id(tickets: &[Ticket]) -> String {
    let max = tickets
        .iter()
        .filter_map(|t| t.id.strip_prefix(ID_PREFIX))
        .filter_map(|n| n.parse::<u32>().ok())
        .max()
        .unwrap_or(0);
    format!("{ID_PREFIX}{:04}", max + 1)
}

fn position(tickets: &[Ticket], id: &str) -> Result<usize> {
    tickets
        .iter()
        .position(|t| t.id == id)
        .ok_or_else(|| HelpdeskError::TicketNotFound(id.to_string()))
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Open a new ticket. The product must exist.
pub fn create(
    root: &Path,
    input: NewTicket,
    sla_config: &SlaConfig,
    now: DateTime<Utc>,
) -> Result<Ticket> {
    product::get(root, &input.product)?;
    let priority = input.priority.unwrap_or(Priority::Medium);
    if priority.is_legacy() {
        return Err(HelpdeskError::InvalidPriority(priority.to_string()));
    }

    let source = input.source.unwrap_or_default();
    if source.is_legacy() {
        return Err(HelpdeskError::InvalidSource(source.to_string()));
    }

    modify(root, |tickets| {
        let mut ticket = Ticket::new(
            next_id(tickets),
            input.product,
            input.title,
            priority,
            now,
            sla_config,
        )?;
        ticket.description = input.description;
        ticket.requester = input.requester;
        ticket.source = source;
        ticket.assignee = input.assignee;

        tickets.push(ticket.clone());
        Ok(ticket)
    })
}

pub fn get(root: &Path, id: &str) -> Result<Ticket> {
    load_all(root)?
        .into_iter()
        .find(|t| t.id == id)
        .ok_or_else(|| HelpdeskError::TicketNotFound(id.to_string()))
}

/// Tickets matching `filter`, newest first.
pub fn list(root: &Path, filter: &TicketFilter, now: DateTime<Utc>) -> Result<Vec<Ticket>> {
    let mut tickets: Vec<Ticket> = load_all(root)?
        .into_iter()
        .filter(|t| filter.matches(t, now))
        .collect();
    tickets.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    Ok(tickets)
}

/// Apply a partial update. Priority changes recompute deadlines; status
/// changes go through [`Ticket::transition`].
pub fn update(
    root: &Path,
    id: &str,
    patch: TicketPatch,
    sla_config: &SlaConfig,
    now: DateTime<Utc>,
) -> Result<Ticket> {
    modify(root, |tickets| {
        let pos = position(tickets, id)?;
        apply_patch(&mut tickets[pos], patch, sla_config, now)?;
        Ok(tickets[pos].clone())
    })
}

fn apply_patch(
    ticket: &mut Ticket,
    patch: TicketPatch,
    sla_config: &SlaConfig,
    now: DateTime<Utc>,
) -> Result<()> {
    if let Some(title) = patch.title {
        ticket.title = title;
    }
    if let Some(description) = patch.description {
        ticket.description = Some(description);
    }
    if let Some(requester) = patch.requester {
        ticket.requester = Some(requester);
    }
    if let Some(source) = patch.source {
        if source.is_legacy() {
            return Err(HelpdeskError::InvalidSource(source.to_string()));
        }
        ticket.source = source;
    }
    if let Some(assignee) = patch.assignee {
        ticket.assignee = Some(assignee);
    }
    if let Some(priority) = patch.priority {
        if priority.is_legacy() {
            return Err(HelpdeskError::InvalidPriority(priority.to_string()));
        }
        if priority != ticket.priority {
            ticket.reprioritize(priority, sla_config, now)?;
        }
    }
    if let Some(status) = patch.status {
        ticket.transition(status, now)?;
    }
    ticket.updated_at = now;
    Ok(())
}

pub fn set_status(
    root: &Path,
    id: &str,
    status: TicketStatus,
    now: DateTime<Utc>,
) -> Result<Ticket> {
    modify(root, |tickets| {
        let pos = position(tickets, id)?;
        tickets[pos].transition(status, now)?;
        Ok(tickets[pos].clone())
    })
}

pub fn set_priority(
    root: &Path,
    id: &str,
    priority: Priority,
    sla_config: &SlaConfig,
    now: DateTime<Utc>,
) -> Result<Ticket> {
    update(
        root,
        id,
        TicketPatch {
            priority: Some(priority),
            ..TicketPatch::default()
        },
        sla_config,
        now,
    )
}

pub fn mark_responded(root: &Path, id: &str, now: DateTime<Utc>) -> Result<Ticket> {
    modify(root, |tickets| {
        let pos = position(tickets, id)?;
        tickets[pos].mark_responded(now);
        Ok(tickets[pos].clone())
    })
}

/// Remove a ticket and return it.
pub fn delete(root: &Path, id: &str) -> Result<Ticket> {
    modify(root, |tickets| {
        let pos = position(tickets, id)?;
        Ok(tickets.remove(pos))
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
