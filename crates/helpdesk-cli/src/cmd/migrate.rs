use super::Ctx;
use crate::output::{print_json, print_table};
use helpdesk_core::migrations;

pub fn run(ctx: &Ctx) -> anyhow::Result<()> {
    // Refuse to touch a directory that was never initialized.
    ctx.config()?;
    let report = migrations::migrate_tickets(&ctx.root)?;
    if ctx.json {
        return print_json(&report);
    }

    println!(
        "scanned {} tickets, normalized {} values",
        report.tickets, report.normalized
    );
    if !report.legacy.is_empty() {
        println!("\nUnrecognised values kept as-is:");
        print_table(
            &["TICKET", "FIELD", "VALUE"],
            report
                .legacy
                .iter()
                .map(|l| vec![l.ticket.clone(), l.field.clone(), l.value.clone()])
                .collect(),
        );
    }
    Ok(())
}
