//! Monthly rollups and dashboard summary.

use crate::sla;
use crate::ticket::Ticket;
use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Months covered by a monthly report unless configured otherwise.
pub const DEFAULT_WINDOW: u32 = 6;

/// Longest window a monthly report will build: ten years.
pub const MAX_WINDOW: u32 = 120;

const MONTH_ABBR: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

// ---------------------------------------------------------------------------
// Monthly stats
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlyStat {
    /// `YYYY-MM`
    pub month: String,
    /// `Jan 2026`
    pub label: String,
    pub incoming: usize,
    pub resolved: usize,
}

/// Calendar month as a single ordinal: `year * 12 + (month - 1)`.
fn month_index(at: DateTime<Utc>) -> i64 {
    i64::from(at.year()) * 12 + i64::from(at.month0())
}

fn bucket(index: i64) -> MonthlyStat {
    let year = index.div_euclid(12);
    let month0 = index.rem_euclid(12) as usize;
    MonthlyStat {
        month: format!("{year:04}-{:02}", month0 + 1),
        label: format!("{} {year}", MONTH_ABBR[month0]),
        incoming: 0,
        resolved: 0,
    }
}

/// Incoming and resolved counts for the `window` calendar months ending with
/// the month containing `now`, oldest first.
///
/// A ticket counts as incoming in the month of `created_at` and as resolved
/// in the month of `resolved_at`; the two are independent. Tickets outside
/// the window, and missing resolution times, count nowhere.
///
/// `window` is capped at [`MAX_WINDOW`].
pub fn monthly_stats(tickets: &[Ticket], window: u32, now: DateTime<Utc>) -> Vec<MonthlyStat> {
    let last = month_index(now);
    let first = last - i64::from(window.min(MAX_WINDOW)) + 1;

    let mut stats: Vec<MonthlyStat> = (first..=last).map(bucket).collect();
    let slot = |at: DateTime<Utc>| -> Option<usize> {
        let idx = month_index(at);
        (first..=last).contains(&idx).then(|| (idx - first) as usize)
    };

    for ticket in tickets {
        if let Some(i) = slot(ticket.created_at) {
            stats[i].incoming += 1;
        }
        if let Some(i) = ticket.resolved_at.and_then(slot) {
            stats[i].resolved += 1;
        }
    }
    stats
}

// ---------------------------------------------------------------------------
// Summary
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportSummary {
    pub total: usize,
    pub open: usize,
    pub overdue: usize,
    pub response_overdue: usize,
    pub resolved: usize,
    pub resolved_within_sla: usize,
    /// Percentage of resolved tickets that met their deadline; `None` when
    /// nothing has been resolved yet.
    pub sla_compliance: Option<f64>,
    pub by_status: BTreeMap<String, usize>,
    pub by_priority: BTreeMap<String, usize>,
    pub by_product: BTreeMap<String, usize>,
}

pub fn summarize(tickets: &[Ticket], now: DateTime<Utc>) -> ReportSummary {
    let mut by_status: HashMap<String, usize> = HashMap::new();
    let mut by_priority: HashMap<String, usize> = HashMap::new();
    let mut by_product: HashMap<String, usize> = HashMap::new();
    let mut open = 0;
    let mut overdue = 0;
    let mut response_overdue = 0;
    let mut resolved = 0;
    let mut within = 0;

    for t in tickets {
        *by_status.entry(t.status.to_string()).or_insert(0) += 1;
        *by_priority.entry(t.priority.to_string()).or_insert(0) += 1;
        *by_product.entry(t.product.clone()).or_insert(0) += 1;

        if !t.status.is_terminal() {
            open += 1;
        }
        if sla::is_overdue(t, now) {
            overdue += 1;
        }
        if sla::is_response_overdue(t, now) {
            response_overdue += 1;
        }
        match sla::resolved_within_sla(t) {
            Some(true) => {
                resolved += 1;
                within += 1;
            }
            Some(false) => resolved += 1,
            None => {}
        }
    }

    let sla_compliance = (resolved > 0).then(|| within as f64 * 100.0 / resolved as f64);

    ReportSummary {
        total: tickets.len(),
        open,
        overdue,
        response_overdue,
        resolved,
        resolved_within_sla: within,
        sla_compliance,
        by_status: by_status.into_iter().collect(),
        by_priority: by_priority.into_iter().collect(),
        by_product: by_product.into_iter().collect(),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SlaConfig;
    use crate::sla::parse_instant;
    use crate::types::{Priority, TicketStatus};

    fn at(s: &str) -> DateTime<Utc> {
        parse_instant(s).unwrap()
    }

    fn ticket(id: &str, created: &str, resolved: Option<&str>) -> Ticket {
        let mut t = Ticket::new(id, "acme", id, Priority::Medium, at(created), &SlaConfig::default()).unwrap();
        if let Some(r) = resolved {
            t.status = TicketStatus::Done;
            t.resolved_at = Some(at(r));
        }
        t
    }

    #[test]
    fn empty_input_yields_zeroed_window() {
        let stats = monthly_stats(&[], 6, at("2026-02-15"));
        assert_eq!(stats.len(), 6);
        assert!(stats.iter().all(|s| s.incoming == 0 && s.resolved == 0));
    }

    #[test]
    fn months_ascend_and_end_at_now() {
        let stats = monthly_stats(&[], 6, at("2026-02-15T23:59"));
        let months: Vec<_> = stats.iter().map(|s| s.month.as_str()).collect();
        assert_eq!(
            months,
            vec!["2025-09", "2025-10", "2025-11", "2025-12", "2026-01", "2026-02"]
        );
        assert_eq!(stats[0].label, "Sep 2025");
        assert_eq!(stats[5].label, "Feb 2026");
        assert!(months.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn incoming_sum_counts_only_tickets_inside_window() {
        let tickets = vec![
            ticket("a", "2025-08-31T23:59", None), // just before the window
            ticket("b", "2025-09-01T00:00", None),
            ticket("c", "2025-12-25", None),
            ticket("d", "2026-02-28T12:00", None),
            ticket("e", "2026-03-01", None), // after now's month
        ];
        let stats = monthly_stats(&tickets, 6, at("2026-02-15"));
        let total: usize = stats.iter().map(|s| s.incoming).sum();
        assert_eq!(total, 3);
        assert_eq!(stats[0].incoming, 1);
        assert_eq!(stats[3].incoming, 1);
        assert_eq!(stats[5].incoming, 1);
    }

    #[test]
    fn created_and_resolved_land_in_their_own_months() {
        let tickets = vec![ticket("a", "2025-11-10", Some("2026-02-03"))];
        let stats = monthly_stats(&tickets, 6, at("2026-02-15"));
        let nov = stats.iter().find(|s| s.month == "2025-11").unwrap();
        let feb = stats.iter().find(|s| s.month == "2026-02").unwrap();
        assert_eq!((nov.incoming, nov.resolved), (1, 0));
        assert_eq!((feb.incoming, feb.resolved), (0, 1));
    }

    #[test]
    fn missing_resolved_at_never_counts_as_resolved() {
        let mut t = ticket("a", "2026-02-01", None);
        t.status = TicketStatus::Closed;
        let stats = monthly_stats(&[t], 6, at("2026-02-15"));
        assert_eq!(stats.iter().map(|s| s.resolved).sum::<usize>(), 0);
        assert_eq!(stats[5].incoming, 1);
    }

    #[test]
    fn order_of_input_does_not_matter() {
        let mut tickets = vec![
            ticket("a", "2025-10-01", Some("2025-12-01")),
            ticket("b", "2026-01-05", None),
            ticket("c", "2026-02-02", Some("2026-02-03")),
        ];
        let forward = monthly_stats(&tickets, 6, at("2026-02-15"));
        tickets.reverse();
        assert_eq!(forward, monthly_stats(&tickets, 6, at("2026-02-15")));
    }

    #[test]
    fn window_sizes() {
        assert!(monthly_stats(&[], 0, at("2026-02-15")).is_empty());
        let one = monthly_stats(&[], 1, at("2026-02-15"));
        assert_eq!(one.len(), 1);
        assert_eq!(one[0].month, "2026-02");
        let year = monthly_stats(&[], 13, at("2026-01-01"));
        assert_eq!(year[0].month, "2025-01");
    }

    #[test]
    fn oversized_window_is_capped() {
        let stats = monthly_stats(&[], u32::MAX, at("2026-02-15"));
        assert_eq!(stats.len(), MAX_WINDOW as usize);
        assert_eq!(stats[0].month, "2016-03");
        assert_eq!(stats.last().unwrap().month, "2026-02");
    }

    #[test]
    fn summary_counts() {
        let now = at("2026-02-15");
        let mut met = ticket("a", "2026-02-01T00:00", Some("2026-02-01T10:00"));
        met.product = "globex".into();
        let breached = ticket("b", "2026-02-01T00:00", Some("2026-02-05T00:00"));
        let overdue = ticket("c", "2026-02-10T00:00", None);
        let fresh = ticket("d", "2026-02-15T00:00", None);

        let summary = summarize(&[met, breached, overdue, fresh], now);
        assert_eq!(summary.total, 4);
        assert_eq!(summary.open, 2);
        assert_eq!(summary.overdue, 1);
        assert_eq!(summary.resolved, 2);
        assert_eq!(summary.resolved_within_sla, 1);
        assert_eq!(summary.sla_compliance, Some(50.0));
        assert_eq!(summary.by_status["done"], 2);
        assert_eq!(summary.by_status["new"], 2);
        assert_eq!(summary.by_product["acme"], 3);
        assert_eq!(summary.by_product["globex"], 1);
    }

    #[test]
    fn summary_without_resolutions_has_no_compliance() {
        let summary = summarize(&[], at("2026-02-15"));
        assert_eq!(summary.total, 0);
        assert!(summary.sla_compliance.is_none());
    }
}
