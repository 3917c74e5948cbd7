use super::Ctx;
use crate::output::{print_json, print_table};
use clap::Subcommand;
use helpdesk_core::{report, ticket};
use std::collections::BTreeMap;

#[derive(Subcommand)]
pub enum ReportSubcommand {
    /// Incoming and resolved tickets per calendar month
    Monthly {
        /// Number of months ending with the current one, at most 120 [default: from config]
        #[arg(long, value_parser = clap::value_parser!(u32).range(..=i64::from(report::MAX_WINDOW)))]
        window: Option<u32>,

        /// Restrict to one product
        #[arg(long)]
        product: Option<String>,
    },

    /// Totals, open/overdue counts, and SLA compliance
    Summary {
        #[arg(long)]
        product: Option<String>,
    },
}

pub fn run(ctx: &Ctx, subcommand: ReportSubcommand) -> anyhow::Result<()> {
    let config = ctx.config()?;

    match subcommand {
        ReportSubcommand::Monthly { window, product } => {
            let tickets = load(ctx, product.as_deref())?;
            let window = window.unwrap_or(config.report.window_months);
            let stats = report::monthly_stats(&tickets, window, ctx.now);
            if ctx.json {
                return print_json(&stats);
            }
            if stats.is_empty() {
                println!("empty window");
                return Ok(());
            }
            print_table(
                &["MONTH", "INCOMING", "RESOLVED"],
                stats
                    .iter()
                    .map(|s| vec![s.label.clone(), s.incoming.to_string(), s.resolved.to_string()])
                    .collect(),
            );
            Ok(())
        }

        ReportSubcommand::Summary { product } => {
            let tickets = load(ctx, product.as_deref())?;
            let summary = report::summarize(&tickets, ctx.now);
            if ctx.json {
                return print_json(&summary);
            }
            println!("Tickets:          {}", summary.total);
            println!("Open:             {}", summary.open);
            println!("Overdue:          {}", summary.overdue);
            println!("Awaiting reply:   {}", summary.response_overdue);
            println!("Resolved:         {}", summary.resolved);
            match summary.sla_compliance {
                Some(pct) => println!(
                    "SLA compliance:   {pct:.1}% ({} of {})",
                    summary.resolved_within_sla, summary.resolved
                ),
                None => println!("SLA compliance:   n/a"),
            }
            print_counts("By status", &summary.by_status);
            print_counts("By priority", &summary.by_priority);
            print_counts("By product", &summary.by_product);
            Ok(())
        }
    }
}

fn load(ctx: &Ctx, product: Option<&str>) -> anyhow::Result<Vec<ticket::Ticket>> {
    let mut tickets = ctx.scoped(ticket::load_all(&ctx.root)?)?;
    if let Some(p) = product {
        tickets.retain(|t| t.product == p);
    }
    Ok(tickets)
}

fn print_counts(heading: &str, counts: &BTreeMap<String, usize>) {
    if counts.is_empty() {
        return;
    }
    println!("\n{heading}:");
    for (key, n) in counts {
        println!("  {key:<14} {n}");
    }
}
