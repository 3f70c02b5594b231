//! Row- and header-level cleaning operations.
//!
//! This module provides functionality for:
//! - Trimming whitespace around column names
//! - Removing exact-duplicate rows

mod columns;
mod duplicates;

pub use columns::ColumnNormalizer;
pub use duplicates::DuplicateRemover;
