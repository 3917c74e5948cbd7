//! Dashboard users and role-scoped ticket views.
//!
//! Layout:
//!   .helpdesk/users.yaml: list of all users
//!
//! A super admin sees every product; a product admin sees one. No
//! credentials are stored here.

use crate::error::{HelpdeskError, Result};
use crate::io;
use crate::paths;
use crate::product;
use crate::ticket::Ticket;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

// ---------------------------------------------------------------------------
// Role
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Role {
    SuperAdmin,
    ProductAdmin { product: String },
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::SuperAdmin => f.write_str("super_admin"),
            Role::ProductAdmin { product } => write!(f, "product_admin:{product}"),
        }
    }
}

impl std::str::FromStr for Role {
    type Err = HelpdeskError;

    /// `super_admin` or `product_admin:<product>`.
    fn from_str(s: &str) -> Result<Self> {
        match s.split_once(':') {
            None if s == "super_admin" => Ok(Role::SuperAdmin),
            Some(("product_admin", product)) if !product.is_empty() => Ok(Role::ProductAdmin {
                product: product.to_string(),
            }),
            _ => Err(HelpdeskError::InvalidRole(format!(
                "'{s}': must be super_admin or product_admin:<product>"
            ))),
        }
    }
}

// ---------------------------------------------------------------------------
// User
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub username: String,
    pub display_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    pub role: Role,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// The single product this user is limited to, if any.
    pub fn product_scope(&self) -> Option<&str> {
        match &self.role {
            Role::SuperAdmin => None,
            Role::ProductAdmin { product } => Some(product),
        }
    }

    pub fn can_view(&self, ticket: &Ticket) -> bool {
        self.product_scope().is_none_or(|p| p == ticket.product)
    }
}

/// Keep only the tickets `user` is allowed to see.
pub fn visible(user: &User, tickets: Vec<Ticket>) -> Vec<Ticket> {
    tickets.into_iter().filter(|t| user.can_view(t)).collect()
}

/// Partial profile update. `None` leaves a field unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProfilePatch {
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub role: Option<Role>,
}

// ---------------------------------------------------------------------------
// Store
// ---------------------------------------------------------------------------

fn load_all(root: &Path) -> Result<Vec<User>> {
    io::load_list(&paths::users_path(root))
}

fn modify<R>(root: &Path, op: impl FnOnce(&mut Vec<User>) -> Result<R>) -> Result<R> {
    io::update_list(&paths::users_path(root), op)
}

fn check_role(root: &Path, role: &Role) -> Result<()> {
    if let Role::ProductAdmin { product } = role {
        product::get(root, product)?;
    }
    Ok(())
}

pub fn create(
    root: &Path,
    username: impl Into<String>,
    display_name: impl Into<String>,
    role: Role,
    now: DateTime<Utc>,
) -> Result<User> {
    let username = username.into();
    paths::validate_slug(&username)?;
    check_role(root, &role)?;

    modify(root, |users| {
        if users.iter().any(|u| u.username == username) {
            return Err(HelpdeskError::UserExists(username));
        }

        let user = User {
            username,
            display_name: display_name.into(),
            email: None,
            phone: None,
            role,
            created_at: now,
            updated_at: now,
        };
        users.push(user.clone());
        Ok(user)
    })
}

pub fn list(root: &Path) -> Result<Vec<User>> {
    let mut users = load_all(root)?;
    users.sort_by(|a, b| a.username.cmp(&b.username));
    Ok(users)
}

pub fn get(root: &Path, username: &str) -> Result<User> {
    load_all(root)?
        .into_iter()
        .find(|u| u.username == username)
        .ok_or_else(|| HelpdeskError::UserNotFound(username.to_string()))
}

pub fn update_profile(
    root: &Path,
    username: &str,
    patch: ProfilePatch,
    now: DateTime<Utc>,
) -> Result<User> {
    if let Some(role) = &patch.role {
        check_role(root, role)?;
    }

    modify(root, |users| {
        let user = users
            .iter_mut()
            .find(|u| u.username == username)
            .ok_or_else(|| HelpdeskError::UserNotFound(username.to_string()))?;

        if let Some(name) = patch.display_name {
            let name = name.trim().to_string();
            if !name.is_empty() {
                user.display_name = name;
            }
        }
        if let Some(email) = patch.email {
            user.email = Some(email).filter(|e| !e.trim().is_empty());
        }
        if let Some(phone) = patch.phone {
            user.phone = Some(phone).filter(|p| !p.trim().is_empty());
        }
        if let Some(role) = patch.role {
            user.role = role;
        }
        user.updated_at = now;
        Ok(user.clone())
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
