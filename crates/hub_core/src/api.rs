//! Caller-facing envelopes for UI or CLI hosts.
//!
//! # Responsibility
//! - Turn typed core outcomes into flat, serializable results.
//! - Keep error semantics simple for hosts that only render messages.
//!
//! # Invariants
//! - Envelope functions never panic and never return `Err`.
//! - An `ImportResult` is either a commit or a rejection, never both.

use crate::ingest::{ImportError, ImportErrorKind, ImportOptions};
use crate::registry::TableRepository;
use crate::seed::{SeedError, SeededTable};
use crate::service::hub_service::{HubService, ImportSummary};
use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};

/// Outcome of one `import_csv` call.
///
/// Serializes as `{ok: true, rows, columns}` or
/// `{ok: false, kind, detail, line}` with `line` possibly `null`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportResult {
    Committed {
        rows: usize,
        columns: usize,
    },
    Rejected {
        kind: ImportErrorKind,
        detail: String,
        line: Option<u64>,
    },
}

impl ImportResult {
    pub fn is_ok(&self) -> bool {
        matches!(self, Self::Committed { .. })
    }
}

impl From<&ImportSummary> for ImportResult {
    fn from(value: &ImportSummary) -> Self {
        Self::Committed {
            rows: value.rows,
            columns: value.columns,
        }
    }
}

impl From<&ImportError> for ImportResult {
    fn from(value: &ImportError) -> Self {
        Self::Rejected {
            kind: value.kind(),
            detail: value.detail().to_string(),
            line: value.line(),
        }
    }
}

impl From<Result<ImportSummary, ImportError>> for ImportResult {
    fn from(value: Result<ImportSummary, ImportError>) -> Self {
        match value {
            Ok(summary) => Self::from(&summary),
            Err(err) => Self::from(&err),
        }
    }
}

impl Serialize for ImportResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Committed { rows, columns } => {
                let mut state = serializer.serialize_struct("ImportResult", 3)?;
                state.serialize_field("ok", &true)?;
                state.serialize_field("rows", rows)?;
                state.serialize_field("columns", columns)?;
                state.end()
            }
            Self::Rejected { kind, detail, line } => {
                let mut state = serializer.serialize_struct("ImportResult", 4)?;
                state.serialize_field("ok", &false)?;
                state.serialize_field("kind", kind)?;
                state.serialize_field("detail", detail)?;
                state.serialize_field("line", line)?;
                state.end()
            }
        }
    }
}

/// Outcome of one `seed_demo_data` call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SeedResult {
    pub ok: bool,
    /// `(table name, row count)` per committed demo table.
    pub tables: Vec<(String, usize)>,
    /// Empty on success.
    pub message: String,
}

impl From<Result<Vec<SeededTable>, SeedError>> for SeedResult {
    fn from(value: Result<Vec<SeededTable>, SeedError>) -> Self {
        match value {
            Ok(tables) => Self {
                ok: true,
                tables: tables
                    .into_iter()
                    .map(|table| (table.name, table.rows))
                    .collect(),
                message: String::new(),
            },
            Err(err) => Self {
                ok: false,
                tables: Vec::new(),
                message: err.to_string(),
            },
        }
    }
}

/// Imports `content` into `table_name` and returns a flat envelope.
///
/// `encoding` defaults to UTF-8 when `None`.
pub fn import_csv<R: TableRepository>(
    service: &HubService<R>,
    table_name: &str,
    content: &[u8],
    encoding: Option<&str>,
) -> ImportResult {
    let options = ImportOptions {
        encoding: encoding.map(str::to_string),
        ..ImportOptions::default()
    };
    service
        .import_csv_with(table_name, content, &options)
        .into()
}

/// Seeds demo tables and returns a flat envelope.
pub fn seed_demo_data<R: TableRepository>(service: &HubService<R>) -> SeedResult {
    service.seed_demo_data().into()
}
