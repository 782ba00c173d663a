//! Error types for ShelfDB
//!
//! Provides a unified error type for all operations.

use thiserror::Error;

use crate::model::{BookId, BorrowerId};

/// Result type alias using ShelfError
pub type Result<T> = std::result::Result<T, ShelfError>;

/// Unified error type for ShelfDB operations
#[derive(Debug, Error)]
pub enum ShelfError {
    // -------------------------------------------------------------------------
    // Lookup Errors
    // -------------------------------------------------------------------------
    #[error("Book {0} not found")]
    BookNotFound(BookId),

    #[error("Borrower '{0}' not found")]
    BorrowerNotFound(String),

    // -------------------------------------------------------------------------
    // Ledger Errors
    // -------------------------------------------------------------------------
    #[error("Borrower id {0} is already registered")]
    DuplicateKey(BorrowerId),

    #[error("Book {0} is already borrowed")]
    AlreadyBorrowed(BookId),

    #[error("No active loan of book {book_id} for borrower {borrower_id}")]
    NoActiveLoan { book_id: BookId, borrower_id: BorrowerId },

    #[error("Book {0} is on loan and cannot be removed")]
    BookOnLoan(BookId),

    #[error("Borrower {borrower_id} still holds {count} book(s)")]
    BorrowerHasLoans { borrower_id: BorrowerId, count: usize },

    // -------------------------------------------------------------------------
    // Input Errors
    // -------------------------------------------------------------------------
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // -------------------------------------------------------------------------
    // WAL Errors
    // -------------------------------------------------------------------------
    #[error("WAL corruption detected: {0}")]
    WalCorruption(String),

    // -------------------------------------------------------------------------
    // Storage Errors
    // -------------------------------------------------------------------------
    #[error("Storage error: {0}")]
    Storage(String),

    // -------------------------------------------------------------------------
    // Serialization Errors
    // -------------------------------------------------------------------------
    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),
}

impl ShelfError {
    /// True for unresolved book or borrower references
    pub fn is_not_found(&self) -> bool {
        matches!(self, ShelfError::BookNotFound(_) | ShelfError::BorrowerNotFound(_))
    }
}

impl From<bincode::Error> for ShelfError {
    fn from(err: bincode::Error) -> Self {
        ShelfError::Serialization(err.to_string())
    }
}
