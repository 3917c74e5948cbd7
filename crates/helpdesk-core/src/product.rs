//! Products (sub-brands) that tickets are filed against.
//!
//! Layout:
//!   .helpdesk/products.yaml: list of all products

use crate::error::{HelpdeskError, Result};
use crate::io;
use crate::paths;
use crate::ticket;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub slug: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

fn load_all(root: &Path) -> Result<Vec<Product>> {
    io::load_list(&paths::products_path(root))
}

fn modify<R>(root: &Path, op: impl FnOnce(&mut Vec<Product>) -> Result<R>) -> Result<R> {
    io::update_list(&paths::products_path(root), op)
}

pub fn create(
    root: &Path,
    slug: impl Into<String>,
    name: impl Into<String>,
    description: Option<String>,
    now: DateTime<Utc>,
) -> Result<Product> {
    let slug = slug.into();
    paths::validate_slug(&slug)?;

    modify(root, |products| {
        if products.iter().any(|p| p.slug == slug) {
            return Err(HelpdeskError::ProductExists(slug));
        }

        let product = Product {
            slug,
            name: name.into(),
            description,
            created_at: now,
        };
        products.push(product.clone());
        Ok(product)
    })
}

/// All products, sorted by slug.
pub fn list(root: &Path) -> Result<Vec<Product>> {
    let mut products = load_all(root)?;
    products.sort_by(|a, b| a.slug.cmp(&b.slug));
    Ok(products)
}

pub fn get(root: &Path, slug: &str) -> Result<Product> {
    load_all(root)?
        .into_iter()
        .find(|p| p.slug == slug)
        .ok_or_else(|| HelpdeskError::ProductNotFound(slug.to_string()))
}

/// Delete a product. Refused while any ticket still references it.
pub fn delete(root: &Path, slug: &str) -> Result<Product> {
    modify(root, |products| {
        let pos = products
            .iter()
            .position(|p| p.slug == slug)
            .ok_or_else(|| HelpdeskError::ProductNotFound(slug.to_string()))?;

        if ticket::load_all(root)?.iter().any(|t| t.product == slug) {
            return Err(HelpdeskError::ProductInUse(slug.to_string()));
        }

        Ok(products.remove(pos))
    })
}
