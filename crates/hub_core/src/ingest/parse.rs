//! CSV record splitting with source line tracking.
//!
//! Uses the `csv` reader for RFC 4180 splitting (comma separator, double-quote
//! quoting, doubled-quote escapes, quoted separators and line breaks). The
//! reader is lenient about stray quotes, so a quote audit runs first. The
//! audit rejects unterminated quoted fields and text trailing a closing quote,
//! and records the source line each record starts on.

use super::ImportError;
use csv::{ReaderBuilder, StringRecord};

/// One parsed record and the 1-based line it starts on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvRecord {
    pub line: u64,
    pub fields: Vec<String>,
}

/// Splits `text` into records; every record must match the first one's width.
///
/// Blank lines are skipped.
pub fn read_records(text: &str) -> Result<Vec<CsvRecord>, ImportError> {
    let start_lines = audit_quotes(text)?;

    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .delimiter(b',')
        .quote(b'"')
        .double_quote(true)
        .from_reader(text.as_bytes());

    let mut records = Vec::new();
    let mut expected_width = None;
    let mut record = StringRecord::new();

    loop {
        match reader.read_record(&mut record) {
            Ok(true) => {}
            Ok(false) => break,
            Err(err) => {
                return Err(ImportError::Parse {
                    line: err.position().map(|pos| pos.line()),
                    detail: err.to_string(),
                });
            }
        }

        let line = start_lines
            .get(records.len())
            .copied()
            .or_else(|| record.position().map(|pos| pos.line()))
            .unwrap_or(0);
        match expected_width {
            None => expected_width = Some(record.len()),
            Some(width) if width != record.len() => {
                return Err(ImportError::parse_at(
                    line,
                    format!(
                        "row has {} fields but the header declares {width}",
                        record.len()
                    ),
                ));
            }
            Some(_) => {}
        }

        records.push(CsvRecord {
            line,
            fields: record.iter().map(str::to_owned).collect(),
        });
    }

    Ok(records)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum QuoteState {
    FieldStart,
    Unquoted,
    Quoted,
    // Saw a quote inside a quoted field: either an escape or the closing quote.
    QuoteInQuoted,
}

/// Returns the 1-based start line of every non-blank record.
fn audit_quotes(text: &str) -> Result<Vec<u64>, ImportError> {
    let mut state = QuoteState::FieldStart;
    let mut line: u64 = 1;
    let mut opened_at: u64 = 1;
    let mut at_record_start = true;
    let mut start_lines = Vec::new();
    let mut after_cr = false;

    for ch in text.chars() {
        let terminator = matches!(ch, '\r' | '\n');
        if at_record_start && !terminator {
            start_lines.push(line);
            at_record_start = false;
        }

        state = match (state, ch) {
            (QuoteState::FieldStart, '"') => {
                opened_at = line;
                QuoteState::Quoted
            }
            (QuoteState::Quoted, '"') => QuoteState::QuoteInQuoted,
            (QuoteState::Quoted, _) => QuoteState::Quoted,
            (QuoteState::QuoteInQuoted, '"') => QuoteState::Quoted,
            (QuoteState::QuoteInQuoted, ',') => QuoteState::FieldStart,
            (_, ',') => QuoteState::FieldStart,
            (_, '\r' | '\n') => {
                at_record_start = true;
                QuoteState::FieldStart
            }
            (QuoteState::QuoteInQuoted, other) => {
                return Err(ImportError::parse_at(
                    line,
                    format!("unexpected character `{other}` after closing quote"),
                ));
            }
            _ => QuoteState::Unquoted,
        };
        // CRLF, lone CR and lone LF each end one line.
        match ch {
            '\r' => line += 1,
            '\n' if !after_cr => line += 1,
            _ => {}
        }
        after_cr = ch == '\r';
    }

    if state == QuoteState::Quoted {
        return Err(ImportError::parse_at(opened_at, "unterminated quoted field"));
    }
    Ok(start_lines)
}
