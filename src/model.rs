//! Record types
//!
//! The three persisted record shapes: books, borrowers and loans.

use serde::{Deserialize, Serialize};

/// Catalog-assigned book identifier (starts at 1)
pub type BookId = u64;

/// Caller-assigned borrower identifier
pub type BorrowerId = i64;

/// A catalog item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    pub id: BookId,
    pub title: String,
    pub author: String,
    /// Publication year, kept as given
    pub year: String,
    /// False while a loan references this book
    pub available: bool,
}

/// A registered person allowed to borrow books
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Borrower {
    pub id: BorrowerId,
    pub name: String,
}

/// "This borrower currently holds this book"
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Loan {
    pub borrower_id: BorrowerId,
    pub book_id: BookId,
}

/// Title and author of a borrowed book, as reported by loan queries
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BorrowedBook {
    pub title: String,
    pub author: String,
}
