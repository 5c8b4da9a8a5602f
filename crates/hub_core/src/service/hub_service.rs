//! Intelligence Hub use-case service.
//!
//! # Responsibility
//! - Run the CSV pipeline and commit its table in one `put_table` call.
//! - Run demo seeding through the same commit path.
//!
//! # Invariants
//! - A failed import never calls `put_table`; the prior table stays visible.
//! - The service never mutates tables in place.

use crate::ingest::{parse_table, ImportError, ImportOptions};
use crate::model::table::Table;
use crate::model::value::ColumnType;
use crate::registry::{normalize_table_name, RegistryResult, TableRepository};
use crate::seed::{seed_demo_data, SeedConfig, SeedError, SeededTable};
use log::{error, info};
use std::sync::Arc;
use std::time::Instant;

/// Shape of a committed import.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportSummary {
    pub table: String,
    pub rows: usize,
    pub columns: usize,
    pub column_types: Vec<ColumnType>,
}

/// Use-case entry points over one table repository.
pub struct HubService<R: TableRepository> {
    repo: R,
    seed_config: SeedConfig,
}

impl<R: TableRepository> HubService<R> {
    /// Creates a service with the default demo seed configuration.
    pub fn new(repo: R) -> Self {
        Self::with_seed_config(repo, SeedConfig::default())
    }

    pub fn with_seed_config(repo: R, seed_config: SeedConfig) -> Self {
        Self { repo, seed_config }
    }

    pub fn repository(&self) -> &R {
        &self.repo
    }

    /// Replaces the demo tables with a freshly generated set.
    pub fn seed_demo_data(&self) -> Result<Vec<SeededTable>, SeedError> {
        seed_demo_data(&self.repo, &self.seed_config)
    }

    /// Imports UTF-8 (or BOM-marked) CSV bytes into `table_name`.
    pub fn import_csv(&self, table_name: &str, content: &[u8]) -> Result<ImportSummary, ImportError> {
        self.import_csv_with(table_name, content, &ImportOptions::default())
    }

    /// Imports CSV bytes into `table_name`, replacing any prior table.
    ///
    /// # Contract
    /// - On success the new table is visible to subsequent `get_table` calls.
    /// - On failure the registry is untouched.
    pub fn import_csv_with(
        &self,
        table_name: &str,
        content: &[u8],
        options: &ImportOptions,
    ) -> Result<ImportSummary, ImportError> {
        let started_at = Instant::now();
        info!(
            "event=csv_import module=service status=start table={} bytes={}",
            table_name.trim(),
            content.len()
        );

        match self.replace_from_csv(table_name, content, options) {
            Ok(summary) => {
                info!(
                    "event=csv_import module=service status=ok table={} rows={} columns={} duration_ms={}",
                    summary.table,
                    summary.rows,
                    summary.columns,
                    started_at.elapsed().as_millis()
                );
                Ok(summary)
            }
            Err(err) => {
                error!(
                    "event=csv_import module=service status=error table={} error_kind={} line={} duration_ms={}",
                    table_name.trim(),
                    err.kind(),
                    err.line().map_or_else(|| "none".to_string(), |line| line.to_string()),
                    started_at.elapsed().as_millis()
                );
                Err(err)
            }
        }
    }

    /// Returns the current table for `name`.
    pub fn get_table(&self, name: &str) -> RegistryResult<Arc<Table>> {
        self.repo.get_table(name)
    }

    /// Returns table names in registration order.
    pub fn list_tables(&self) -> Vec<String> {
        self.repo.list_tables()
    }

    fn replace_from_csv(
        &self,
        table_name: &str,
        content: &[u8],
        options: &ImportOptions,
    ) -> Result<ImportSummary, ImportError> {
        let name = normalize_table_name(table_name)?;
        let table = parse_table(content, options)?;
        let summary = ImportSummary {
            table: name.clone(),
            rows: table.row_count(),
            columns: table.column_count(),
            column_types: table.columns().iter().map(|column| column.kind).collect(),
        };
        self.repo.put_table(&name, table)?;
        Ok(summary)
    }
}
