//! CSV snapshot exporter

use std::fs;
use std::path::{Path, PathBuf};

use csv::Writer;

use crate::error::Result;
use crate::state::LibrarySnapshot;

use super::{ExportReport, SnapshotExporter, BOOKS_HEADER, BORROWERS_HEADER, LOANS_HEADER};

pub const BOOKS_FILE: &str = "books.csv";
pub const BORROWERS_FILE: &str = "borrowers.csv";
pub const LOANS_FILE: &str = "borrowedbooks.csv";

/// Writes `books.csv`, `borrowers.csv` and `borrowedbooks.csv` into a directory
///
/// Availability is written as `1` / `0`.
pub struct CsvExporter {
    dir: PathBuf,
}

impl CsvExporter {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn write_books(&self, snapshot: &LibrarySnapshot) -> Result<PathBuf> {
        let path = self.dir.join(BOOKS_FILE);
        let mut writer = Writer::from_path(&path)?;

        writer.write_record(BOOKS_HEADER)?;
        for book in snapshot.books() {
            writer.write_record([
                book.id.to_string().as_str(),
                book.title.as_str(),
                book.author.as_str(),
                book.year.as_str(),
                if book.available { "1" } else { "0" },
            ])?;
        }
        writer.flush()?;

        Ok(path)
    }

    fn write_borrowers(&self, snapshot: &LibrarySnapshot) -> Result<PathBuf> {
        let path = self.dir.join(BORROWERS_FILE);
        let mut writer = Writer::from_path(&path)?;

        writer.write_record(BORROWERS_HEADER)?;
        for borrower in snapshot.borrowers() {
            writer.write_record([borrower.id.to_string().as_str(), borrower.name.as_str()])?;
        }
        writer.flush()?;

        Ok(path)
    }

    fn write_loans(&self, snapshot: &LibrarySnapshot) -> Result<PathBuf> {
        let path = self.dir.join(LOANS_FILE);
        let mut writer = Writer::from_path(&path)?;

        writer.write_record(LOANS_HEADER)?;
        for loan in snapshot.loans() {
            writer.write_record([loan.borrower_id.to_string(), loan.book_id.to_string()])?;
        }
        writer.flush()?;

        Ok(path)
    }
}

impl SnapshotExporter for CsvExporter {
    fn export(&mut self, snapshot: &LibrarySnapshot) -> Result<ExportReport> {
        fs::create_dir_all(&self.dir)?;

        let files = vec![
            self.write_books(snapshot)?,
            self.write_borrowers(snapshot)?,
            self.write_loans(snapshot)?,
        ];

        let report = ExportReport {
            files,
            books: snapshot.books().len(),
            borrowers: snapshot.borrowers().len(),
            loans: snapshot.loans().len(),
        };

        tracing::info!(
            "Exported {} books, {} borrowers, {} loans to {}",
            report.books,
            report.borrowers,
            report.loans,
            self.dir.display()
        );

        Ok(report)
    }
}
