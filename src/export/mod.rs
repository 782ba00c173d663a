//! Export Module
//!
//! Renders a `LibrarySnapshot` into external tabular artifacts. The core only
//! hands out the snapshot; all formatting lives here.

mod csv_exporter;

use std::path::PathBuf;

pub use csv_exporter::{CsvExporter, BOOKS_FILE, BORROWERS_FILE, LOANS_FILE};

use crate::error::Result;
use crate::state::LibrarySnapshot;

/// Header row of the books table
pub const BOOKS_HEADER: [&str; 5] = ["ID", "Title", "Author", "Year", "Available"];

/// Header row of the borrowers table
pub const BORROWERS_HEADER: [&str; 2] = ["ID", "Name"];

/// Header row of the loans table
pub const LOANS_HEADER: [&str; 2] = ["Borrower ID", "Book ID"];

/// Consumer of library snapshots
pub trait SnapshotExporter {
    fn export(&mut self, snapshot: &LibrarySnapshot) -> Result<ExportReport>;
}

/// What an export wrote
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportReport {
    pub files: Vec<PathBuf>,
    pub books: usize,
    pub borrowers: usize,
    pub loans: usize,
}
