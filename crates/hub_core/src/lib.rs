//! Core table workspace for the Intelligence Hub dashboard.
//! This crate is the single source of truth for table invariants.

pub mod api;
pub mod ingest;
pub mod logging;
pub mod model;
pub mod registry;
pub mod seed;
pub mod service;

pub use api::{ImportResult, SeedResult};
pub use ingest::{parse_table, ImportError, ImportErrorKind, ImportOptions};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::table::{Column, RowView, Table, TableValidationError};
pub use model::value::{CellValue, ColumnType};
pub use registry::{
    RegistryError, RegistryResult, RegistrySnapshot, TableRegistry, TableRepository,
};
pub use seed::{
    demo_tables, SeedConfig, SeedError, SeededTable, DEMO_TABLE_NAMES, MAX_HISTORY_DAYS,
};
pub use service::hub_service::{HubService, ImportSummary};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
