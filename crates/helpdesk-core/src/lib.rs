pub mod activity;
pub mod config;
pub mod error;
pub mod io;
pub mod migrations;
pub mod paths;
pub mod presentation;
pub mod product;
pub mod report;
pub mod sla;
pub mod ticket;
pub mod types;
pub mod user;

pub use error::{HelpdeskError, Result};
