use super::Ctx;
use crate::output::{print_json, print_table, truncate};
use clap::Subcommand;
use helpdesk_core::{
    activity::ActivityKind,
    config::Config,
    presentation::TicketView,
    sla,
    ticket::{self, NewTicket, TicketFilter, TicketPatch},
    types::{Priority, Source, TicketStatus},
};

// ---------------------------------------------------------------------------
// Subcommand tree
// ---------------------------------------------------------------------------

#[derive(Subcommand)]
pub enum TicketSubcommand {
    /// Open a new ticket
    Create {
        /// Product slug the ticket is filed against
        #[arg(long)]
        product: String,

        /// Short summary
        #[arg(long)]
        title: String,

        #[arg(long)]
        description: Option<String>,

        /// Customer name or contact
        #[arg(long)]
        requester: Option<String>,

        /// Channel: email | whatsapp | phone | web  [default: web]
        #[arg(long)]
        source: Option<String>,

        #[arg(long)]
        assignee: Option<String>,

        /// Priority: low | medium | high  [default: medium]
        #[arg(long)]
        priority: Option<String>,
    },

    /// List tickets, newest first
    List {
        #[arg(long)]
        product: Option<String>,

        /// Filter by status: new | in_progress | pending | done | closed
        #[arg(long)]
        status: Option<String>,

        #[arg(long)]
        priority: Option<String>,

        /// Only tickets that are not done or closed
        #[arg(long)]
        open: bool,

        /// Only tickets past their resolve deadline
        #[arg(long)]
        overdue: bool,

        /// Case-insensitive match on id, title, or requester
        #[arg(long)]
        search: Option<String>,
    },

    /// Show one ticket with its SLA state
    Show { id: String },

    /// Edit ticket fields
    Edit {
        id: String,

        #[arg(long)]
        title: Option<String>,

        #[arg(long)]
        description: Option<String>,

        #[arg(long)]
        requester: Option<String>,

        #[arg(long)]
        source: Option<String>,

        #[arg(long)]
        assignee: Option<String>,
    },

    /// Move a ticket to a new status
    Status {
        id: String,
        /// new | in_progress | pending | done | closed
        status: String,
    },

    /// Change priority and recompute deadlines
    Priority {
        id: String,
        /// low | medium | high
        priority: String,
    },

    /// Record the first agent response
    Respond { id: String },

    /// Delete a ticket
    Delete { id: String },

    /// Open tickets past their resolve deadline
    Overdue,
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

pub fn run(ctx: &Ctx, subcommand: TicketSubcommand) -> anyhow::Result<()> {
    let config = ctx.config()?;
    let root = &ctx.root;

    match subcommand {
        TicketSubcommand::Create {
            product,
            title,
            description,
            requester,
            source,
            assignee,
            priority,
        } => {
            if let Some(u) = ctx.acting_user()? {
                if u.product_scope().is_some_and(|p| p != product) {
                    anyhow::bail!(
                        "user '{}' cannot file tickets against product '{product}'",
                        u.username
                    );
                }
            }
            let input = NewTicket {
                product,
                title,
                description,
                requester,
                source: source.map(|s| s.parse::<Source>()).transpose()?,
                assignee,
                priority: priority.map(|p| p.parse::<Priority>()).transpose()?,
            };
            let t = ticket::create(root, input, &config.sla, ctx.now)?;
            ctx.record(&config, ActivityKind::TicketCreated, &t.id, t.title.clone());
            if ctx.json {
                print_json(&ctx.view(t, &config))?;
            } else {
                println!("created {} [{}] {}", t.id, t.priority, t.title);
                println!(
                    "  respond by {}, resolve by {}",
                    fmt_time(t.response_due_at),
                    fmt_time(t.resolve_due_at)
                );
            }
            Ok(())
        }

        TicketSubcommand::List {
            product,
            status,
            priority,
            open,
            overdue,
            search,
        } => {
            let filter = TicketFilter {
                product,
                status: status.map(|s| s.parse::<TicketStatus>()).transpose()?,
                priority: priority.map(|p| p.parse::<Priority>()).transpose()?,
                open_only: open,
                overdue_only: overdue,
                search,
            };
            let tickets = ctx.scoped(ticket::list(root, &filter, ctx.now)?)?;
            let views: Vec<TicketView> = tickets.into_iter().map(|t| ctx.view(t, &config)).collect();
            print_views(ctx, &views, "no tickets")
        }

        TicketSubcommand::Show { id } => {
            let t = ticket::get(root, &id)?;
            ctx.check_visible(&t)?;
            let view = ctx.view(t, &config);
            if ctx.json {
                return print_json(&view);
            }
            let t = &view.ticket;
            println!("ID:        {}", t.id);
            println!("Title:     {}", t.title);
            println!("Product:   {}", t.product);
            println!("Status:    {}", t.status.label());
            println!("Priority:  {}", t.priority.label());
            println!("Source:    {}", t.source.label());
            if let Some(r) = &t.requester {
                println!("Requester: {r}");
            }
            if let Some(a) = &t.assignee {
                println!("Assignee:  {a}");
            }
            println!("Created:   {}", fmt_time(t.created_at));
            println!("Respond:   {}", fmt_time(t.response_due_at));
            println!("Resolve:   {}", fmt_time(t.resolve_due_at));
            if let Some(at) = t.first_response_at {
                println!("Responded: {}", fmt_time(at));
            }
            if let Some(at) = t.resolved_at {
                println!("Resolved:  {}", fmt_time(at));
            }
            println!("SLA:       {}", sla_cell(&view, ctx));
            if let Some(d) = &t.description {
                println!("\n{d}");
            }
            Ok(())
        }

        TicketSubcommand::Edit {
            id,
            title,
            description,
            requester,
            source,
            assignee,
        } => {
            ctx.check_visible(&ticket::get(root, &id)?)?;
            let patch = TicketPatch {
                title,
                description,
                requester,
                source: source.map(|s| s.parse::<Source>()).transpose()?,
                assignee,
                ..TicketPatch::default()
            };
            let t = ticket::update(root, &id, patch, &config.sla, ctx.now)?;
            ctx.record(&config, ActivityKind::TicketUpdated, &t.id, "fields edited");
            finish(ctx, &config, t, "updated")
        }

        TicketSubcommand::Status { id, status } => {
            let status: TicketStatus = status.parse()?;
            let before = ticket::get(root, &id)?;
            ctx.check_visible(&before)?;
            let t = ticket::set_status(root, &id, status, ctx.now)?;
            if t.status != before.status {
                ctx.record(
                    &config,
                    ActivityKind::StatusChanged,
                    &t.id,
                    format!("{} → {}", before.status, t.status),
                );
            }
            finish(ctx, &config, t, "status set")
        }

        TicketSubcommand::Priority { id, priority } => {
            let priority: Priority = priority.parse()?;
            let before = ticket::get(root, &id)?;
            ctx.check_visible(&before)?;
            let t = ticket::set_priority(root, &id, priority, &config.sla, ctx.now)?;
            if t.priority != before.priority {
                ctx.record(
                    &config,
                    ActivityKind::PriorityChanged,
                    &t.id,
                    format!("{} → {}", before.priority, t.priority),
                );
            }
            finish(ctx, &config, t, "priority set")
        }

        TicketSubcommand::Respond { id } => {
            ctx.check_visible(&ticket::get(root, &id)?)?;
            let t = ticket::mark_responded(root, &id, ctx.now)?;
            ctx.record(&config, ActivityKind::TicketResponded, &t.id, "first response");
            finish(ctx, &config, t, "responded")
        }

        TicketSubcommand::Delete { id } => {
            ctx.check_visible(&ticket::get(root, &id)?)?;
            let t = ticket::delete(root, &id)?;
            ctx.record(&config, ActivityKind::TicketDeleted, &t.id, t.title.clone());
            if ctx.json {
                print_json(&t)?;
            } else {
                println!("deleted {}", t.id);
            }
            Ok(())
        }

        TicketSubcommand::Overdue => {
            let filter = TicketFilter {
                overdue_only: true,
                ..TicketFilter::default()
            };
            let mut tickets = ctx.scoped(ticket::list(root, &filter, ctx.now)?)?;
            tickets.sort_by_key(|t| t.resolve_due_at);
            let views: Vec<TicketView> = tickets.into_iter().map(|t| ctx.view(t, &config)).collect();
            print_views(ctx, &views, "no overdue tickets")
        }
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn finish(ctx: &Ctx, config: &Config, t: ticket::Ticket, verb: &str) -> anyhow::Result<()> {
    if ctx.json {
        return print_json(&ctx.view(t, config));
    }
    println!("{verb}: {} [{} / {}]", t.id, t.status, t.priority);
    Ok(())
}

fn print_views(ctx: &Ctx, views: &[TicketView], empty: &str) -> anyhow::Result<()> {
    if ctx.json {
        return print_json(&views);
    }
    if views.is_empty() {
        println!("{empty}");
        return Ok(());
    }
    print_table(
        &["ID", "PRODUCT", "STATUS", "PRIORITY", "SLA", "RESOLVE BY", "TITLE"],
        views
            .iter()
            .map(|v| {
                vec![
                    v.ticket.id.clone(),
                    v.ticket.product.clone(),
                    v.ticket.status.to_string(),
                    v.ticket.priority.to_string(),
                    sla_cell(v, ctx),
                    fmt_time(v.ticket.resolve_due_at),
                    truncate(&v.ticket.title, 50),
                ]
            })
            .collect(),
    );
    Ok(())
}

/// SLA state plus time left or overrun, e.g. `overdue (3h)`.
fn sla_cell(view: &TicketView, ctx: &Ctx) -> String {
    match sla::time_remaining(&view.ticket, ctx.now) {
        Some(left) => {
            let hours = left.num_hours().abs();
            let span = if hours >= 48 {
                format!("{}d", hours / 24)
            } else {
                format!("{hours}h")
            };
            format!("{} ({span})", view.sla_state)
        }
        None => view.sla_state.to_string(),
    }
}

fn fmt_time(at: chrono::DateTime<chrono::Utc>) -> String {
    at.format("%Y-%m-%d %H:%M").to_string()
}
