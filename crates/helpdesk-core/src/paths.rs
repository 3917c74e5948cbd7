use crate::error::{HelpdeskError, Result};
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

// ---------------------------------------------------------------------------
// Directory constants
// ---------------------------------------------------------------------------

pub const HELPDESK_DIR: &str = ".helpdesk";

pub const CONFIG_FILE: &str = ".helpdesk/config.yaml";
pub const TICKETS_FILE: &str = ".helpdesk/tickets.yaml";
pub const PRODUCTS_FILE: &str = ".helpdesk/products.yaml";
pub const USERS_FILE: &str = ".helpdesk/users.yaml";
pub const ACTIVITY_FILE: &str = ".helpdesk/activity.yaml";

// ---------------------------------------------------------------------------
// Path helpers
// ---------------------------------------------------------------------------

pub fn helpdesk_dir(root: &Path) -> PathBuf {
    root.join(HELPDESK_DIR)
}

pub fn config_path(root: &Path) -> PathBuf {
    root.join(CONFIG_FILE)
}

pub fn tickets_path(root: &Path) -> PathBuf {
    root.join(TICKETS_FILE)
}

pub fn products_path(root: &Path) -> PathBuf {
    root.join(PRODUCTS_FILE)
}

pub fn users_path(root: &Path) -> PathBuf {
    root.join(USERS_FILE)
}

pub fn activity_path(root: &Path) -> PathBuf {
    root.join(ACTIVITY_FILE)
}

// ---------------------------------------------------------------------------
// Slug validation
// ---------------------------------------------------------------------------

static SLUG_RE: OnceLock<Regex> = OnceLock::new();

fn slug_re() -> &'static Regex {
    SLUG_RE.get_or_init(|| Regex::new(r"^[a-z0-9][a-z0-9\-]*[a-z0-9]$|^[a-z0-9]$").unwrap())
}

/// Product slugs and usernames share the same shape.
pub fn validate_slug(slug: &str) -> Result<()> {
    if slug.is_empty() || slug.len() > 64 || !slug_re().is_match(slug) {
        return Err(HelpdeskError::InvalidSlug(slug.to_string()));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
