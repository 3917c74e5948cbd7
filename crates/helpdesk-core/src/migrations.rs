use crate::config::Config;
use crate::error::Result;
use crate::io;
use crate::paths;
use crate::ticket::Ticket;
use crate::types::{Priority, Source, TicketStatus};
use serde::Serialize;
use std::path::Path;

/// Run any pending schema migrations on a loaded [`Config`].
///
/// Schema v1 has no migrations. When the config schema changes in ways that
/// require data transforms, add a match arm on `cfg.version` here.
pub fn migrate_config(cfg: Config) -> Result<Config> {
    Ok(cfg)
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct MigrationReport {
    pub tickets: usize,
    /// Stored spellings rewritten to their canonical form (`WA` → `whatsapp`).
    pub normalized: usize,
    /// Values with no known mapping, left as they are.
    pub legacy: Vec<LegacyValue>,
}

#[derive(Debug, Clone, Serialize)]
pub struct LegacyValue {
    pub ticket: String,
    pub field: String,
    pub value: String,
}

/// Rewrite the ticket collection with canonical enumerant spellings.
///
/// Reads the raw YAML first to see which stored strings differ from what
/// will be written back, then saves the typed collection.
pub fn migrate_tickets(root: &Path) -> Result<MigrationReport> {
    let path = paths::tickets_path(root);
    let raw: Vec<serde_yaml::Value> = io::load_list(&path)?;
    let mut report = MigrationReport {
        tickets: raw.len(),
        ..MigrationReport::default()
    };

    for entry in &raw {
        let id = entry
            .get("id")
            .and_then(|v| v.as_str())
            .unwrap_or("?")
            .to_string();
        for field in ["status", "priority", "source"] {
            let Some(stored) = entry.get(field).and_then(|v| v.as_str()) else {
                continue;
            };
            let (canonical, is_legacy) = match field {
                "status" => {
                    let s = TicketStatus::parse_lenient(stored);
                    (s.as_str().to_string(), s.is_legacy())
                }
                "priority" => {
                    let p = Priority::parse_lenient(stored);
                    (p.as_str().to_string(), p.is_legacy())
                }
                _ => {
                    let s = Source::parse_lenient(stored);
                    (s.as_str().to_string(), s.is_legacy())
                }
            };
            if is_legacy {
                tracing::warn!(ticket = %id, field, value = stored, "unrecognised legacy value");
                report.legacy.push(LegacyValue {
                    ticket: id.clone(),
                    field: field.to_string(),
                    value: stored.to_string(),
                });
            } else if canonical != stored {
                report.normalized += 1;
            }
        }
    }

    if report.normalized > 0 {
        // A typed load and save writes every enumerant back canonically.
        io::update_list(&path, |_: &mut Vec<Ticket>| Ok(()))?;
    }
    Ok(report)
}
