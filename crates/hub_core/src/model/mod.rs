//! Tabular domain model shared by the registry, ingestion and seeding paths.
//!
//! # Responsibility
//! - Define the closed cell value variant and column typing.
//! - Define the immutable `Table` value and its shape validation.
//!
//! # Invariants
//! - Every row carries exactly one cell per declared column, in column order.
//! - A `Table` is never mutated after construction; updates are replacements.

pub mod table;
pub mod value;
