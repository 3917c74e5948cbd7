#![allow(deprecated)]
use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const NOW: &str = "2026-02-10T12:00:00Z";

fn helpdesk(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("helpdesk").unwrap();
    cmd.current_dir(dir.path())
        .env("HELPDESK_ROOT", dir.path())
        .env("HELPDESK_NOW", NOW)
        .env_remove("HELPDESK_USER");
    cmd
}

fn json(dir: &TempDir, args: &[&str]) -> serde_json::Value {
    let out = helpdesk(dir).arg("--json").args(args).output().unwrap();
    assert!(
        out.status.success(),
        "command {args:?} failed: {}",
        String::from_utf8_lossy(&out.stderr)
    );
    serde_json::from_slice(&out.stdout).unwrap()
}

/// Initialized desk with one product, `acme`.
fn init_desk() -> TempDir {
    let dir = TempDir::new().unwrap();
    helpdesk(&dir).arg("init").assert().success();
    helpdesk(&dir)
        .args(["product", "create", "acme", "--name", "Acme"])
        .assert()
        .success();
    dir
}

fn create_ticket(dir: &TempDir, title: &str, priority: &str) -> String {
    let v = json(
        dir,
        &[
            "ticket", "create", "--product", "acme", "--title", title, "--priority", priority,
        ],
    );
    v["id"].as_str().unwrap().to_string()
}

// ---------------------------------------------------------------------------
// init
// ---------------------------------------------------------------------------

#[test]
fn init_creates_store_files() {
    let dir = TempDir::new().unwrap();
    helpdesk(&dir).arg("init").assert().success();

    assert!(dir.path().join(".helpdesk").is_dir());
    for file in ["config.yaml", "tickets.yaml", "products.yaml", "users.yaml", "activity.yaml"] {
        assert!(dir.path().join(".helpdesk").join(file).exists(), "{file}");
    }
}

#[test]
fn init_is_idempotent() {
    let dir = TempDir::new().unwrap();
    helpdesk(&dir).arg("init").assert().success();
    helpdesk(&dir)
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("exists:"));
}

#[test]
fn commands_fail_before_init() {
    let dir = TempDir::new().unwrap();
    helpdesk(&dir)
        .args(["ticket", "list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not initialized"));
}

// ---------------------------------------------------------------------------
// tickets
// ---------------------------------------------------------------------------

#[test]
fn create_computes_deadlines_from_priority() {
    let dir = init_desk();
    let v = json(
        &dir,
        &["ticket", "create", "--product", "acme", "--title", "Outage", "--priority", "high"],
    );
    assert_eq!(v["id"], "TKT-0001");
    assert_eq!(v["status"], "new");
    assert_eq!(v["response_due_at"], "2026-02-10T13:00:00Z");
    assert_eq!(v["resolve_due_at"], "2026-02-10T20:00:00Z");
    assert_eq!(v["is_overdue"], false);
    assert_eq!(v["priority_class"], "danger");
}

#[test]
fn create_rejects_unknown_product() {
    let dir = init_desk();
    helpdesk(&dir)
        .args(["ticket", "create", "--product", "nope", "--title", "x"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("product not found"));
}

#[test]
fn create_rejects_unknown_priority() {
    let dir = init_desk();
    helpdesk(&dir)
        .args(["ticket", "create", "--product", "acme", "--title", "x", "--priority", "urgent"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid priority"));
}

#[test]
fn overdue_is_evaluated_at_now() {
    let dir = init_desk();
    let id = create_ticket(&dir, "Outage", "high");

    let later = json(&dir, &["--now", "2026-02-11T09:00", "ticket", "show", &id]);
    assert_eq!(later["is_overdue"], true);
    assert_eq!(later["sla_state"], "overdue");

    let list = json(&dir, &["--now", "2026-02-11T09:00", "ticket", "overdue"]);
    assert_eq!(list.as_array().unwrap().len(), 1);

    let boundary = json(&dir, &["--now", "2026-02-10T20:00", "ticket", "overdue"]);
    assert!(boundary.as_array().unwrap().is_empty());
}

#[test]
fn done_tickets_are_never_overdue() {
    let dir = init_desk();
    let id = create_ticket(&dir, "Outage", "high");
    let done = json(&dir, &["ticket", "status", &id, "done"]);
    assert_eq!(done["resolved_at"], "2026-02-10T12:00:00Z");

    let later = json(&dir, &["--now", "2027-01-01", "ticket", "show", &id]);
    assert_eq!(later["is_overdue"], false);
    assert_eq!(later["sla_state"], "met");
}

#[test]
fn closed_tickets_cannot_reopen() {
    let dir = init_desk();
    let id = create_ticket(&dir, "Outage", "low");
    helpdesk(&dir).args(["ticket", "status", &id, "closed"]).assert().success();
    helpdesk(&dir)
        .args(["ticket", "status", &id, "in_progress"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot be reopened"));
}

#[test]
fn priority_change_recomputes_deadline() {
    let dir = init_desk();
    let id = create_ticket(&dir, "Slow page", "low");
    let v = json(&dir, &["ticket", "priority", &id, "high"]);
    assert_eq!(v["priority"], "high");
    assert_eq!(v["resolve_due_at"], "2026-02-10T20:00:00Z");
}

#[test]
fn list_filters_and_orders_newest_first() {
    let dir = init_desk();
    create_ticket(&dir, "First", "low");
    helpdesk(&dir)
        .args(["--now", "2026-02-10T13:00", "ticket", "create", "--product", "acme", "--title", "Second"])
        .assert()
        .success();

    let all = json(&dir, &["ticket", "list"]);
    let titles: Vec<_> = all
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["title"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(titles, vec!["Second", "First"]);

    let low = json(&dir, &["ticket", "list", "--priority", "low"]);
    assert_eq!(low.as_array().unwrap().len(), 1);

    let search = json(&dir, &["ticket", "list", "--search", "sec"]);
    assert_eq!(search[0]["title"], "Second");
}

#[test]
fn delete_removes_ticket() {
    let dir = init_desk();
    let id = create_ticket(&dir, "Dup", "low");
    helpdesk(&dir).args(["ticket", "delete", &id]).assert().success();
    helpdesk(&dir)
        .args(["ticket", "show", &id])
        .assert()
        .failure()
        .stderr(predicate::str::contains("ticket not found"));
}

#[test]
fn list_table_shows_headers() {
    let dir = init_desk();
    create_ticket(&dir, "Printer jam", "medium");
    helpdesk(&dir)
        .args(["ticket", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("RESOLVE BY"))
        .stdout(predicate::str::contains("Printer jam"));
}

// ---------------------------------------------------------------------------
// products and users
// ---------------------------------------------------------------------------

#[test]
fn product_in_use_cannot_be_deleted() {
    let dir = init_desk();
    create_ticket(&dir, "x", "low");
    helpdesk(&dir)
        .args(["product", "delete", "acme"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("still has tickets"));
}

#[test]
fn product_admin_sees_only_their_product() {
    let dir = init_desk();
    helpdesk(&dir).args(["product", "create", "globex"]).assert().success();
    create_ticket(&dir, "Acme issue", "low");
    json(
        &dir,
        &["ticket", "create", "--product", "globex", "--title", "Globex issue"],
    );
    helpdesk(&dir)
        .args(["user", "create", "gina", "--role", "product_admin:globex"])
        .assert()
        .success();

    let scoped = json(&dir, &["--as", "gina", "ticket", "list"]);
    let arr = scoped.as_array().unwrap();
    assert_eq!(arr.len(), 1);
    assert_eq!(arr[0]["product"], "globex");

    helpdesk(&dir)
        .args(["--as", "gina", "ticket", "show", "TKT-0001"])
        .assert()
        .failure();

    let summary = json(&dir, &["--as", "gina", "report", "summary"]);
    assert_eq!(summary["total"], 1);
}

#[test]
fn user_profile_update() {
    let dir = init_desk();
    helpdesk(&dir).args(["user", "create", "dana"]).assert().success();
    let v = json(
        &dir,
        &["user", "update", "dana", "--name", "Dana Q", "--email", "dana@example.com"],
    );
    assert_eq!(v["display_name"], "Dana Q");
    assert_eq!(v["email"], "dana@example.com");

    let cleared = json(&dir, &["user", "update", "dana", "--email", ""]);
    assert!(cleared.get("email").is_none());
}

// ---------------------------------------------------------------------------
// reports, activity, config
// ---------------------------------------------------------------------------

#[test]
fn monthly_report_covers_window() {
    let dir = init_desk();
    create_ticket(&dir, "Feb ticket", "low");
    helpdesk(&dir)
        .args(["--now", "2025-12-05", "ticket", "create", "--product", "acme", "--title", "Dec"])
        .assert()
        .success();

    let stats = json(&dir, &["report", "monthly"]);
    let arr = stats.as_array().unwrap();
    assert_eq!(arr.len(), 6);
    assert_eq!(arr[0]["month"], "2025-09");
    assert_eq!(arr[5]["month"], "2026-02");
    assert_eq!(arr[3]["incoming"], 1);
    assert_eq!(arr[5]["incoming"], 1);

    let short = json(&dir, &["report", "monthly", "--window", "1"]);
    assert_eq!(short.as_array().unwrap().len(), 1);
}

#[test]
fn monthly_window_is_bounded() {
    let dir = init_desk();
    helpdesk(&dir)
        .args(["report", "monthly", "--window", "4000000000"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--window"));

    let config_path = dir.path().join(".helpdesk/config.yaml");
    let config = std::fs::read_to_string(&config_path).unwrap();
    assert!(config.contains("window_months: 6"));
    std::fs::write(&config_path, config.replace("window_months: 6", "window_months: 4000000000"))
        .unwrap();

    let stats = json(&dir, &["report", "monthly"]);
    assert_eq!(stats.as_array().unwrap().len(), 120);
    helpdesk(&dir)
        .args(["config", "validate"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("report.window_months"));
}

#[test]
fn oversized_sla_target_fails_cleanly() {
    let dir = init_desk();
    let config_path = dir.path().join(".helpdesk/config.yaml");
    let config = std::fs::read_to_string(&config_path).unwrap();
    assert!(config.contains("resolve_hours: 24\n"));
    std::fs::write(
        &config_path,
        config.replace("resolve_hours: 24\n", "resolve_hours: 4294967295\n"),
    )
    .unwrap();

    helpdesk(&dir)
        .args(["ticket", "create", "--product", "acme", "--title", "Printer"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("sla.medium"));
    assert!(json(&dir, &["ticket", "list"]).as_array().unwrap().is_empty());
}

#[test]
fn activity_records_ticket_changes() {
    let dir = init_desk();
    let id = create_ticket(&dir, "Logged", "low");
    helpdesk(&dir).args(["ticket", "status", &id, "pending"]).assert().success();

    let entries = json(&dir, &["activity", "list"]);
    let kinds: Vec<_> = entries
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["kind"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(kinds, vec!["status_changed", "ticket_created", "product_created"]);

    helpdesk(&dir)
        .args(["activity", "clear"])
        .assert()
        .success()
        .stdout(predicate::str::contains("cleared 3 entries"));
}

#[test]
fn config_validate_passes_defaults() {
    let dir = init_desk();
    helpdesk(&dir)
        .args(["config", "validate"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No warnings"));
}

#[test]
fn invalid_now_is_rejected() {
    let dir = init_desk();
    helpdesk(&dir)
        .args(["--now", "yesterday", "ticket", "list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid --now"));
}

#[test]
fn migrate_normalizes_legacy_spellings() {
    let dir = init_desk();
    let yaml = r#"- id: TKT-0001
  product: acme
  title: Imported
  source: WA
  status: In Progress
  priority: high
  created_at: 2026-02-01T00:00:00Z
  updated_at: 2026-02-01T00:00:00Z
  response_due_at: 2026-02-01T01:00:00Z
  resolve_due_at: 2026-02-01T08:00:00Z
"#;
    std::fs::write(dir.path().join(".helpdesk/tickets.yaml"), yaml).unwrap();

    let report = json(&dir, &["migrate"]);
    assert_eq!(report["normalized"], 2);

    let shown = json(&dir, &["ticket", "show", "TKT-0001"]);
    assert_eq!(shown["status"], "in_progress");
    assert_eq!(shown["source"], "whatsapp");
}
