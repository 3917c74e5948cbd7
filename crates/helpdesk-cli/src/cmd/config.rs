use super::Ctx;
use crate::output::{print_json, print_table};
use clap::Subcommand;
use helpdesk_core::config::WarnLevel;
use helpdesk_core::types::Priority;

#[derive(Subcommand)]
pub enum ConfigSubcommand {
    /// Show SLA targets and other settings
    Show,

    /// Validate the config for common mistakes
    Validate,
}

pub fn run(ctx: &Ctx, subcmd: ConfigSubcommand) -> anyhow::Result<()> {
    match subcmd {
        ConfigSubcommand::Show => show(ctx),
        ConfigSubcommand::Validate => validate(ctx),
    }
}

// ---------------------------------------------------------------------------
// show
// ---------------------------------------------------------------------------

fn show(ctx: &Ctx) -> anyhow::Result<()> {
    let config = ctx.config()?;
    if ctx.json {
        return print_json(&config);
    }

    println!("Helpdesk: {}", config.helpdesk.name);
    println!();
    print_table(
        &["PRIORITY", "RESPOND WITHIN", "RESOLVE WITHIN"],
        Priority::all()
            .iter()
            .map(|p| {
                let target = config.sla.target_for(p);
                vec![
                    p.label().to_string(),
                    format!("{}h", target.response_hours),
                    format!("{}h", target.resolve_hours),
                ]
            })
            .collect(),
    );
    println!();
    println!("Due-soon threshold: {}h", config.sla.due_soon_hours);
    println!("Report window:      {} months", config.report.window_months);
    println!("Activity log cap:   {} entries", config.activity.max_entries);
    Ok(())
}

// ---------------------------------------------------------------------------
// validate
// ---------------------------------------------------------------------------

fn validate(ctx: &Ctx) -> anyhow::Result<()> {
    let config = ctx.config()?;
    let warnings = config.validate();

    if ctx.json {
        print_json(&serde_json::json!({ "warnings": warnings }))?;
    } else if warnings.is_empty() {
        println!("Config is valid. No warnings.");
    } else {
        for w in &warnings {
            let prefix = match w.level {
                WarnLevel::Warning => "warning",
                WarnLevel::Error => "error",
            };
            println!("[{prefix}] {}", w.message);
        }
    }

    if warnings.iter().any(|w| w.level == WarnLevel::Error) {
        anyhow::bail!("config validation found errors");
    }
    Ok(())
}
