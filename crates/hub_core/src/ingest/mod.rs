//! CSV ingestion pipeline: bytes to a validated `Table`.
//!
//! # Responsibility
//! - Decode, parse, validate headers, infer column types and assemble rows.
//! - Report every failure as a typed `ImportError`.
//!
//! # Invariants
//! - This module never touches the registry; committing is the caller's step.
//! - A returned `Table` always satisfies `Table::try_new` validation.

use crate::model::table::{Column, Table, TableValidationError};
use crate::registry::RegistryError;
use serde::Serialize;
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod decode;
pub mod infer;
pub mod parse;

/// Default WHATWG encoding label applied when none is declared.
pub const DEFAULT_ENCODING: &str = "utf-8";

/// Per-import tuning knobs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportOptions {
    /// WHATWG encoding label; `None` means UTF-8. A byte-order mark wins.
    pub encoding: Option<String>,
    /// Extra field values read as null. Empty fields are always null.
    pub null_tokens: Vec<String>,
    /// Upper bound on accepted input size.
    pub max_bytes: Option<usize>,
}

impl ImportOptions {
    pub fn with_encoding(encoding: impl Into<String>) -> Self {
        Self {
            encoding: Some(encoding.into()),
            ..Self::default()
        }
    }
}

/// Caller-facing failure category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ImportErrorKind {
    EncodingError,
    ParseError,
    SchemaError,
}

impl ImportErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::EncodingError => "EncodingError",
            Self::ParseError => "ParseError",
            Self::SchemaError => "SchemaError",
        }
    }
}

impl Display for ImportErrorKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Import failure. `line` values are 1-based.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportError {
    Encoding { line: Option<u64>, detail: String },
    Parse { line: Option<u64>, detail: String },
    Schema { detail: String },
}

impl ImportError {
    pub fn kind(&self) -> ImportErrorKind {
        match self {
            Self::Encoding { .. } => ImportErrorKind::EncodingError,
            Self::Parse { .. } => ImportErrorKind::ParseError,
            Self::Schema { .. } => ImportErrorKind::SchemaError,
        }
    }

    pub fn line(&self) -> Option<u64> {
        match self {
            Self::Encoding { line, .. } | Self::Parse { line, .. } => *line,
            Self::Schema { .. } => None,
        }
    }

    pub fn detail(&self) -> &str {
        match self {
            Self::Encoding { detail, .. } | Self::Parse { detail, .. } | Self::Schema { detail } => {
                detail.as_str()
            }
        }
    }

    pub(crate) fn schema(detail: impl Into<String>) -> Self {
        Self::Schema {
            detail: detail.into(),
        }
    }

    pub(crate) fn parse_at(line: u64, detail: impl Into<String>) -> Self {
        Self::Parse {
            line: Some(line),
            detail: detail.into(),
        }
    }
}

impl Display for ImportError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self.line() {
            Some(line) => write!(f, "{} at line {line}: {}", self.kind(), self.detail()),
            None => write!(f, "{}: {}", self.kind(), self.detail()),
        }
    }
}

impl Error for ImportError {}

impl From<TableValidationError> for ImportError {
    fn from(value: TableValidationError) -> Self {
        Self::schema(value.to_string())
    }
}

impl From<RegistryError> for ImportError {
    fn from(value: RegistryError) -> Self {
        Self::schema(value.to_string())
    }
}

/// Runs decode, parse, header, inference and assembly over `bytes`.
///
/// # Errors
/// - `Parse` when input exceeds `max_bytes`, quoting is malformed or a row is ragged.
/// - `Encoding` when bytes are not valid in the resolved encoding.
/// - `Schema` when the header is missing, blank or duplicated.
pub fn parse_table(bytes: &[u8], options: &ImportOptions) -> Result<Table, ImportError> {
    if let Some(limit) = options.max_bytes {
        if bytes.len() > limit {
            return Err(ImportError::Parse {
                line: None,
                detail: format!("input exceeds {limit} bytes"),
            });
        }
    }

    let text = decode::decode_text(bytes, options.encoding.as_deref())?;
    let mut records = parse::read_records(&text)?.into_iter();

    let header = records
        .next()
        .ok_or_else(|| ImportError::schema("input has no header row"))?;
    let names = header_names(header.fields)?;
    let body: Vec<parse::CsvRecord> = records.collect();

    let kinds = infer::infer_column_types(names.len(), &body, &options.null_tokens);
    let rows = body
        .iter()
        .map(|record| infer::coerce_record(record, &kinds, &options.null_tokens))
        .collect();
    let columns = names
        .into_iter()
        .zip(kinds)
        .map(|(name, kind)| Column::new(name, kind))
        .collect();

    Ok(Table::try_new(columns, rows)?)
}

fn header_names(fields: Vec<String>) -> Result<Vec<String>, ImportError> {
    let names: Vec<String> = fields
        .into_iter()
        .map(|field| field.trim().to_string())
        .collect();
    if names.is_empty() {
        return Err(ImportError::schema("header row is empty"));
    }

    let mut seen = HashSet::with_capacity(names.len());
    for (index, name) in names.iter().enumerate() {
        if name.is_empty() {
            return Err(ImportError::schema(format!(
                "header column {} has an empty name",
                index + 1
            )));
        }
        if !seen.insert(name.as_str()) {
            return Err(ImportError::schema(format!(
                "header contains duplicate column `{name}`"
            )));
        }
    }
    Ok(names)
}
