use chrono::{DateTime, Utc};
use std::path::PathBuf;
use tokio::sync::broadcast;

/// Shared application state passed to all route handlers.
#[derive(Clone)]
pub struct AppState {
    pub root: PathBuf,
    pub event_tx: broadcast::Sender<()>,
    /// When set, SLA state is evaluated at this instant instead of the wall clock.
    pub fixed_now: Option<DateTime<Utc>>,
}

impl AppState {
    pub fn new(root: PathBuf) -> Self {
        let (tx, _) = broadcast::channel(64);
        let state = Self {
            root,
            event_tx: tx.clone(),
            fixed_now: None,
        };

        // Broadcast whenever tickets.yaml changes on disk, whether the write
        // came from this server or from the CLI. Only spawned inside a runtime.
        if tokio::runtime::Handle::try_current().is_ok() {
            let tickets_file = helpdesk_core::paths::tickets_path(&state.root);
            tokio::spawn(async move {
                let mut last_mtime = None::<std::time::SystemTime>;
                loop {
                    tokio::time::sleep(std::time::Duration::from_millis(800)).await;
                    if let Ok(meta) = tokio::fs::metadata(&tickets_file).await {
                        if let Ok(mtime) = meta.modified() {
                            if last_mtime != Some(mtime) {
                                last_mtime = Some(mtime);
                                let _ = tx.send(());
                            }
                        }
                    }
                }
            });
        }

        state
    }

    pub fn with_fixed_now(mut self, now: DateTime<Utc>) -> Self {
        self.fixed_now = Some(now);
        self
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.fixed_now.unwrap_or_else(Utc::now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_state_stores_root() {
        let state = AppState::new(PathBuf::from("/tmp/helpdesk-test"));
        assert_eq!(state.root, PathBuf::from("/tmp/helpdesk-test"));
        assert!(state.fixed_now.is_none());
    }

    #[test]
    fn fixed_clock_overrides_wall_clock() {
        let at = helpdesk_core::sla::parse_instant("2026-02-10T12:00").unwrap();
        let state = AppState::new(PathBuf::from("/tmp/helpdesk-test")).with_fixed_now(at);
        assert_eq!(state.now(), at);
    }
}
