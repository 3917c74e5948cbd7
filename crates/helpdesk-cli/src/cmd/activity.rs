use super::Ctx;
use crate::output::{print_json, print_table, truncate};
use clap::Subcommand;
use helpdesk_core::activity;

#[derive(Subcommand)]
pub enum ActivitySubcommand {
    /// Recent activity, newest first
    List {
        #[arg(long, default_value = "20")]
        limit: usize,
    },

    /// Remove every entry
    Clear,
}

pub fn run(ctx: &Ctx, subcommand: ActivitySubcommand) -> anyhow::Result<()> {
    match subcommand {
        ActivitySubcommand::List { limit } => {
            let entries = activity::list(&ctx.root, Some(limit))?;
            if ctx.json {
                return print_json(&entries);
            }
            if entries.is_empty() {
                println!("no activity");
                return Ok(());
            }
            print_table(
                &["WHEN", "WHO", "KIND", "SUBJECT", "MESSAGE"],
                entries
                    .iter()
                    .map(|e| {
                        vec![
                            e.at.format("%Y-%m-%d %H:%M").to_string(),
                            e.actor.clone().unwrap_or_else(|| "-".to_string()),
                            e.kind.to_string(),
                            e.subject.clone(),
                            truncate(&e.message, 60),
                        ]
                    })
                    .collect(),
            );
            Ok(())
        }

        ActivitySubcommand::Clear => {
            let removed = activity::clear(&ctx.root)?;
            if ctx.json {
                print_json(&serde_json::json!({ "removed": removed }))?;
            } else {
                println!("cleared {removed} entries");
            }
            Ok(())
        }
    }
}
