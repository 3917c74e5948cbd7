pub mod activity;
pub mod config;
pub mod init;
pub mod migrate;
pub mod product;
pub mod report;
pub mod serve;
pub mod ticket;
pub mod user;

use anyhow::Context;
use chrono::{DateTime, Duration, Utc};
use helpdesk_core::{
    activity::{self as log, ActivityEntry, ActivityKind},
    config::Config,
    presentation::TicketView,
    sla,
    ticket::Ticket,
    user::{self as core_user, User},
};
use std::path::PathBuf;

/// Everything a subcommand needs from the global flags.
pub struct Ctx {
    pub root: PathBuf,
    pub json: bool,
    pub actor: Option<String>,
    pub now: DateTime<Utc>,
    /// Set when `--now` pinned the clock; `serve` hands it to the server.
    pub fixed_now: Option<DateTime<Utc>>,
}

impl Ctx {
    pub fn new(
        root: PathBuf,
        json: bool,
        actor: Option<String>,
        now: Option<&str>,
    ) -> anyhow::Result<Self> {
        let fixed_now = now
            .map(|s| sla::parse_instant(s).context("invalid --now"))
            .transpose()?;
        Ok(Self {
            root,
            json,
            actor,
            now: fixed_now.unwrap_or_else(Utc::now),
            fixed_now,
        })
    }

    pub fn config(&self) -> anyhow::Result<Config> {
        Ok(Config::load(&self.root)?)
    }

    /// The `--as` user, if one was given.
    pub fn acting_user(&self) -> anyhow::Result<Option<User>> {
        match &self.actor {
            Some(name) => Ok(Some(core_user::get(&self.root, name)?)),
            None => Ok(None),
        }
    }

    /// Narrow `tickets` to what the `--as` user may see.
    pub fn scoped(&self, tickets: Vec<Ticket>) -> anyhow::Result<Vec<Ticket>> {
        Ok(match self.acting_user()? {
            Some(u) => core_user::visible(&u, tickets),
            None => tickets,
        })
    }

    /// Fail with not-found when the `--as` user may not see `ticket`.
    pub fn check_visible(&self, ticket: &Ticket) -> anyhow::Result<()> {
        if let Some(u) = self.acting_user()? {
            if !u.can_view(ticket) {
                return Err(helpdesk_core::HelpdeskError::TicketNotFound(ticket.id.clone()).into());
            }
        }
        Ok(())
    }

    pub fn view(&self, ticket: Ticket, config: &Config) -> TicketView {
        TicketView::new(ticket, self.now, due_soon(config))
    }

    /// Append to the activity log. A failed write is logged, not fatal: the
    /// change itself has already been saved.
    pub fn record(
        &self,
        config: &Config,
        kind: ActivityKind,
        subject: &str,
        message: impl Into<String>,
    ) {
        let entry = ActivityEntry::new(kind, subject, message, self.actor.clone(), self.now);
        if let Err(e) = log::record(&self.root, entry, config.activity.max_entries) {
            tracing::warn!(error = %e, "failed to record activity");
        }
    }
}

pub fn due_soon(config: &Config) -> Duration {
    Duration::hours(i64::from(config.sla.due_soon_hours))
}
