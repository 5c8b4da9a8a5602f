//! Column type inference and cell coercion.
//!
//! A column takes the narrowest type every non-null value fits, in the order
//! boolean, integer, float, text. Integer and float are told apart by the
//! presence of a fractional part or exponent; integers that overflow `i64`
//! do not fit float either, so they fall back to text instead of losing digits.

use super::parse::CsvRecord;
use crate::model::value::{CellValue, ColumnType};
use once_cell::sync::Lazy;
use regex::Regex;

static INTEGER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[+-]?[0-9]+$").expect("valid integer regex"));
static FLOAT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[+-]?([0-9]+(\.[0-9]*)?|\.[0-9]+)([eE][+-]?[0-9]+)?$")
        .expect("valid float regex")
});

#[derive(Debug, Clone, Copy)]
struct TypeCandidate {
    seen: usize,
    boolean: bool,
    integer: bool,
    float: bool,
}

impl Default for TypeCandidate {
    fn default() -> Self {
        Self {
            seen: 0,
            boolean: true,
            integer: true,
            float: true,
        }
    }
}

impl TypeCandidate {
    fn update(&mut self, raw: &str) {
        let value = raw.trim();
        self.seen += 1;
        self.boolean &= parse_bool(value).is_some();
        self.integer &= parse_integer(value).is_some();
        self.float &= parse_float(value).is_some();
    }

    fn resolve(self) -> ColumnType {
        if self.seen == 0 {
            ColumnType::Text
        } else if self.boolean {
            ColumnType::Boolean
        } else if self.integer {
            ColumnType::Integer
        } else if self.float {
            ColumnType::Float
        } else {
            ColumnType::Text
        }
    }
}

/// Infers one type per column from every non-null value in `records`.
///
/// Columns with no non-null value resolve to text.
pub fn infer_column_types(
    width: usize,
    records: &[CsvRecord],
    null_tokens: &[String],
) -> Vec<ColumnType> {
    let mut candidates = vec![TypeCandidate::default(); width];
    for record in records {
        for (candidate, field) in candidates.iter_mut().zip(&record.fields) {
            if !is_null(field, null_tokens) {
                candidate.update(field);
            }
        }
    }
    candidates.into_iter().map(TypeCandidate::resolve).collect()
}

/// Converts one record's fields into cells of the inferred column types.
pub fn coerce_record(
    record: &CsvRecord,
    kinds: &[ColumnType],
    null_tokens: &[String],
) -> Vec<CellValue> {
    record
        .fields
        .iter()
        .zip(kinds)
        .map(|(field, kind)| coerce_value(field, *kind, null_tokens))
        .collect()
}

/// Converts one raw field to `kind`.
///
/// A field that does not fit is kept as text; `Table::try_new` then rejects it.
pub fn coerce_value(raw: &str, kind: ColumnType, null_tokens: &[String]) -> CellValue {
    if is_null(raw, null_tokens) {
        return CellValue::Null;
    }
    let value = raw.trim();
    let coerced = match kind {
        ColumnType::Boolean => parse_bool(value).map(CellValue::Boolean),
        ColumnType::Integer => parse_integer(value).map(CellValue::Integer),
        ColumnType::Float => parse_float(value).map(CellValue::Float),
        ColumnType::Text => None,
    };
    coerced.unwrap_or_else(|| CellValue::Text(raw.to_string()))
}

fn is_null(raw: &str, null_tokens: &[String]) -> bool {
    raw.is_empty() || null_tokens.iter().any(|token| token == raw)
}

fn parse_bool(value: &str) -> Option<bool> {
    if value.eq_ignore_ascii_case("true") {
        Some(true)
    } else if value.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}

fn parse_integer(value: &str) -> Option<i64> {
    if !INTEGER_RE.is_match(value) {
        return None;
    }
    value.parse().ok()
}

fn parse_float(value: &str) -> Option<f64> {
    if !FLOAT_RE.is_match(value) {
        return None;
    }
    if INTEGER_RE.is_match(value) && parse_integer(value).is_none() {
        return None;
    }
    value.parse::<f64>().ok().filter(|parsed| parsed.is_finite())
}
