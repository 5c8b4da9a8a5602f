//! Deterministic demo dataset for the dashboard.
//!
//! # Responsibility
//! - Build the fixed set of demo tables from a `SeedConfig`.
//! - Commit them through the same `put_table` path that imports use.
//!
//! # Invariants
//! - Every demo table is built before the first one is committed.
//! - The same config always produces identical tables.
//! - Re-seeding replaces demo tables; it never appends.

use crate::model::table::TableValidationError;
use crate::registry::{RegistryError, TableRepository};
use chrono::NaiveDate;
use log::{error, info};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Instant;

mod demo;

pub use demo::{demo_tables, DEMO_TABLE_NAMES};

/// Upper bound on `SeedConfig::history_days`.
pub const MAX_HISTORY_DAYS: u32 = 3_650;

/// Generation parameters for demo content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedConfig {
    /// "Today" for generated history and calendar windows.
    pub anchor_date: NaiveDate,
    /// Number of daily KPI readings ending at `anchor_date`, at most
    /// `MAX_HISTORY_DAYS`.
    pub history_days: u32,
    /// Seed for the value generator.
    pub rng_seed: u64,
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            anchor_date: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap_or(NaiveDate::MIN),
            history_days: 90,
            rng_seed: 0x5EED_DA7A,
        }
    }
}

/// Seeding failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SeedError {
    Table {
        table: &'static str,
        source: TableValidationError,
    },
    Registry(RegistryError),
    DateOutOfRange(NaiveDate),
    HistoryTooLong(u32),
}

impl Display for SeedError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Table { table, source } => write!(f, "demo table `{table}` is invalid: {source}"),
            Self::Registry(err) => write!(f, "{err}"),
            Self::DateOutOfRange(anchor) => {
                write!(f, "demo calendar around {anchor} is out of range")
            }
            Self::HistoryTooLong(days) => write!(
                f,
                "history_days {days} exceeds the limit of {MAX_HISTORY_DAYS}"
            ),
        }
    }
}

impl Error for SeedError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Table { source, .. } => Some(source),
            Self::Registry(err) => Some(err),
            Self::DateOutOfRange(_) | Self::HistoryTooLong(_) => None,
        }
    }
}

impl From<RegistryError> for SeedError {
    fn from(value: RegistryError) -> Self {
        Self::Registry(value)
    }
}

/// Name and row count of one committed demo table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeededTable {
    pub name: String,
    pub rows: usize,
}

/// Builds every demo table, then commits each one with `put_table`.
///
/// # Errors
/// - Returns `SeedError::Table`, `DateOutOfRange` or `HistoryTooLong` before
///   anything is committed.
/// - Returns `SeedError::Registry` if a commit is rejected; earlier commits stay.
pub fn seed_demo_data<R: TableRepository + ?Sized>(
    repo: &R,
    config: &SeedConfig,
) -> Result<Vec<SeededTable>, SeedError> {
    let started_at = Instant::now();
    info!(
        "event=demo_seed module=seed status=start anchor={} history_days={}",
        config.anchor_date, config.history_days
    );

    let tables = match demo_tables(config) {
        Ok(tables) => tables,
        Err(err) => {
            error!(
                "event=demo_seed module=seed status=error duration_ms={} error={}",
                started_at.elapsed().as_millis(),
                err
            );
            return Err(err);
        }
    };

    let mut seeded = Vec::with_capacity(tables.len());
    for (name, table) in tables {
        let rows = table.row_count();
        if let Err(err) = repo.put_table(name, table) {
            error!(
                "event=demo_seed module=seed status=error table={} committed={} error={}",
                name,
                seeded.len(),
                err
            );
            return Err(err.into());
        }
        seeded.push(SeededTable {
            name: name.to_string(),
            rows,
        });
    }

    info!(
        "event=demo_seed module=seed status=ok tables={} duration_ms={}",
        seeded.len(),
        started_at.elapsed().as_millis()
    );
    Ok(seeded)
}
