//! Table registry contract and in-memory implementation.
//!
//! # Responsibility
//! - Define the single mutation primitive (`put_table`) and read APIs.
//! - Keep publication details out of service/ingestion orchestration.
//!
//! # Invariants
//! - A name maps to exactly one fully-built table or is absent.
//! - `put_table` either publishes the new table or leaves the old one visible.
//! - Listing order is registration order.

use crate::model::table::Table;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::Arc;

pub mod table_registry;

pub use table_registry::{RegistrySnapshot, TableRegistry};

pub type RegistryResult<T> = Result<T, RegistryError>;

/// Registry lookup and publication errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    NotFound(String),
    InvalidName(String),
}

impl Display for RegistryError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound(name) => write!(f, "table not found: {name}"),
            Self::InvalidName(name) => write!(f, "table name is invalid: `{name}`"),
        }
    }
}

impl Error for RegistryError {}

/// Storage contract for named tables.
pub trait TableRepository {
    /// Returns the current value for `name`.
    fn get_table(&self, name: &str) -> RegistryResult<Arc<Table>>;

    /// Returns registered names in registration order.
    fn list_tables(&self) -> Vec<String>;

    /// Installs `table` as the only value for `name`.
    ///
    /// Returns the replaced value, if any.
    fn put_table(&self, name: &str, table: Table) -> RegistryResult<Option<Arc<Table>>>;
}

impl<T: TableRepository + ?Sized> TableRepository for &T {
    fn get_table(&self, name: &str) -> RegistryResult<Arc<Table>> {
        (**self).get_table(name)
    }

    fn list_tables(&self) -> Vec<String> {
        (**self).list_tables()
    }

    fn put_table(&self, name: &str, table: Table) -> RegistryResult<Option<Arc<Table>>> {
        (**self).put_table(name, table)
    }
}

impl<T: TableRepository + ?Sized> TableRepository for Arc<T> {
    fn get_table(&self, name: &str) -> RegistryResult<Arc<Table>> {
        (**self).get_table(name)
    }

    fn list_tables(&self) -> Vec<String> {
        (**self).list_tables()
    }

    fn put_table(&self, name: &str, table: Table) -> RegistryResult<Option<Arc<Table>>> {
        (**self).put_table(name, table)
    }
}

/// Trims a caller-supplied table name and rejects blank values.
pub fn normalize_table_name(name: &str) -> RegistryResult<String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(RegistryError::InvalidName(name.to_string()));
    }
    Ok(trimmed.to_string())
}
