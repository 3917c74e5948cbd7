//! Ticket enumerants.
//!
//! Stored data may carry values written by older clients ("In Progress",
//! "WA", "done"). Reading is lenient: known spellings normalise to their
//! variant and anything else is kept verbatim in a `Legacy` variant so it
//! survives a load/save cycle. Parsing user input (`FromStr`) is strict.

use crate::error::HelpdeskError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Lowercase, trim, and fold spaces/dashes to underscores.
fn normalize(s: &str) -> String {
    s.trim()
        .to_ascii_lowercase()
        .chars()
        .map(|c| if c == ' ' || c == '-' { '_' } else { c })
        .collect()
}

// ---------------------------------------------------------------------------
// TicketStatus
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TicketStatus {
    New,
    InProgress,
    Pending,
    Done,
    Closed,
    /// A stored value this version does not recognise.
    Legacy(String),
}

impl TicketStatus {
    /// Known statuses in workflow order.
    pub fn all() -> [TicketStatus; 5] {
        [
            TicketStatus::New,
            TicketStatus::InProgress,
            TicketStatus::Pending,
            TicketStatus::Done,
            TicketStatus::Closed,
        ]
    }

    pub fn as_str(&self) -> &str {
        match self {
            TicketStatus::New => "new",
            TicketStatus::InProgress => "in_progress",
            TicketStatus::Pending => "pending",
            TicketStatus::Done => "done",
            TicketStatus::Closed => "closed",
            TicketStatus::Legacy(raw) => raw,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            TicketStatus::New => "New",
            TicketStatus::InProgress => "In Progress",
            TicketStatus::Pending => "Pending",
            TicketStatus::Done => "Done",
            TicketStatus::Closed => "Closed",
            TicketStatus::Legacy(raw) => raw,
        }
    }

    /// Done and Closed end the workflow; overdue evaluation stops there.
    pub fn is_terminal(&self) -> bool {
        matches!(self, TicketStatus::Done | TicketStatus::Closed)
    }

    pub fn is_legacy(&self) -> bool {
        matches!(self, TicketStatus::Legacy(_))
    }

    pub fn parse_lenient(s: &str) -> TicketStatus {
        match normalize(s).as_str() {
            "new" | "open" => TicketStatus::New,
            "in_progress" | "inprogress" | "progress" => TicketStatus::InProgress,
            "pending" | "on_hold" | "waiting" => TicketStatus::Pending,
            "done" | "resolved" => TicketStatus::Done,
            "closed" => TicketStatus::Closed,
            _ => TicketStatus::Legacy(s.trim().to_string()),
        }
    }
}

impl fmt::Display for TicketStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for TicketStatus {
    type Err = HelpdeskError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match TicketStatus::parse_lenient(s) {
            TicketStatus::Legacy(_) => Err(HelpdeskError::InvalidStatus(format!(
                "'{s}': must be new, in_progress, pending, done, or closed"
            ))),
            status => Ok(status),
        }
    }
}

impl From<String> for TicketStatus {
    fn from(s: String) -> Self {
        TicketStatus::parse_lenient(&s)
    }
}

impl From<TicketStatus> for String {
    fn from(s: TicketStatus) -> Self {
        match s {
            TicketStatus::Legacy(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Priority
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Priority {
    Low,
    Medium,
    High,
    Legacy(String),
}

impl Priority {
    pub fn all() -> [Priority; 3] {
        [Priority::Low, Priority::Medium, Priority::High]
    }

    pub fn as_str(&self) -> &str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
            Priority::Legacy(raw) => raw,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Priority::Low => "Low",
            Priority::Medium => "Medium",
            Priority::High => "High",
            Priority::Legacy(raw) => raw,
        }
    }

    pub fn is_legacy(&self) -> bool {
        matches!(self, Priority::Legacy(_))
    }

    pub fn parse_lenient(s: &str) -> Priority {
        match normalize(s).as_str() {
            "low" => Priority::Low,
            "medium" | "med" | "normal" => Priority::Medium,
            "high" => Priority::High,
            _ => Priority::Legacy(s.trim().to_string()),
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Priority {
    type Err = HelpdeskError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match Priority::parse_lenient(s) {
            Priority::Legacy(_) => Err(HelpdeskError::InvalidPriority(format!(
                "'{s}': must be low, medium, or high"
            ))),
            p => Ok(p),
        }
    }
}

impl From<String> for Priority {
    fn from(s: String) -> Self {
        Priority::parse_lenient(&s)
    }
}

impl From<Priority> for String {
    fn from(p: Priority) -> Self {
        match p {
            Priority::Legacy(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Source
// ---------------------------------------------------------------------------

/// Channel a ticket came in through.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Source {
    Email,
    WhatsApp,
    Phone,
    #[default]
    Web,
    Legacy(String),
}

impl Source {
    pub fn as_str(&self) -> &str {
        match self {
            Source::Email => "email",
            Source::WhatsApp => "whatsapp",
            Source::Phone => "phone",
            Source::Web => "web",
            Source::Legacy(raw) => raw,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Source::Email => "Email",
            Source::WhatsApp => "WhatsApp",
            Source::Phone => "Phone",
            Source::Web => "Web",
            Source::Legacy(raw) => raw,
        }
    }

    pub fn is_legacy(&self) -> bool {
        matches!(self, Source::Legacy(_))
    }

    pub fn parse_lenient(s: &str) -> Source {
        match normalize(s).as_str() {
            "email" | "e_mail" | "mail" => Source::Email,
            "whatsapp" | "whats_app" | "wa" => Source::WhatsApp,
            "phone" | "call" | "telephone" => Source::Phone,
            "web" | "portal" | "form" => Source::Web,
            _ => Source::Legacy(s.trim().to_string()),
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Source {
    type Err = HelpdeskError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match Source::parse_lenient(s) {
            Source::Legacy(_) => Err(HelpdeskError::InvalidSource(format!(
                "'{s}': must be email, whatsapp, phone, or web"
            ))),
            src => Ok(src),
        }
    }
}

impl From<String> for Source {
    fn from(s: String) -> Self {
        Source::parse_lenient(&s)
    }
}

impl From<Source> for String {
    fn from(s: Source) -> Self {
        match s {
            Source::Legacy(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
