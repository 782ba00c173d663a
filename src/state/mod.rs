//! Library State Module
//!
//! In-memory tables for the catalog, the borrower registry and the loan
//! ledger, plus the rules that keep them consistent.
//!
//! ## Responsibilities
//! - Validate a request against current state without mutating it
//! - Apply a validated `Operation` (live or replayed from the WAL)
//! - Read-only queries and export snapshots
//!
//! ## Availability Invariant
//! A book is `available` iff the ledger holds no loan for it. Only `apply`
//! mutates state, and every `Operation` flips the loan and the availability
//! bit together.

mod catalog;
mod registry;
mod ledger;
mod query;

use serde::{Deserialize, Serialize};

pub use catalog::CatalogStore;
pub use ledger::LoanLedger;
pub use query::QueryEngine;
pub use registry::BorrowerRegistry;

use crate::config::RemovalPolicy;
use crate::error::{Result, ShelfError};
use crate::model::{Book, BookId, Borrower, BorrowerId, Loan};
use crate::wal::Operation;

/// Combined catalog, registry and ledger
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LibraryState {
    catalog: CatalogStore,
    registry: BorrowerRegistry,
    ledger: LoanLedger,
}

impl LibraryState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn catalog(&self) -> &CatalogStore {
        &self.catalog
    }

    pub fn registry(&self) -> &BorrowerRegistry {
        &self.registry
    }

    pub fn ledger(&self) -> &LoanLedger {
        &self.ledger
    }

    pub fn query(&self) -> QueryEngine<'_> {
        QueryEngine::new(self)
    }

    // =========================================================================
    // Planning (validate, no mutation)
    // =========================================================================

    /// The record `add_book` would insert
    pub fn plan_add_book(&self, title: &str, author: &str, year: &str) -> Book {
        self.catalog.prepare(title, author, year)
    }

    /// The book `remove_book` would delete
    pub fn plan_remove_book(&self, book_id: BookId, policy: RemovalPolicy) -> Result<Book> {
        let book = self.catalog.get(book_id)?;

        if policy == RemovalPolicy::Reject && self.ledger.holder(book_id).is_some() {
            return Err(ShelfError::BookOnLoan(book_id));
        }

        Ok(book.clone())
    }

    /// The borrower `add_borrower` would register
    pub fn plan_add_borrower(&self, id: BorrowerId, name: &str) -> Result<Borrower> {
        self.registry.ensure_vacant(id)?;
        Ok(Borrower {
            id,
            name: name.to_string(),
        })
    }

    /// The borrower `remove_borrower` would delete
    pub fn plan_remove_borrower(
        &self,
        borrower_id: BorrowerId,
        policy: RemovalPolicy,
    ) -> Result<Borrower> {
        let borrower = self.registry.get(borrower_id)?;

        let count = self.ledger.loans_of(borrower_id).len();
        if policy == RemovalPolicy::Reject && count > 0 {
            return Err(ShelfError::BorrowerHasLoans { borrower_id, count });
        }

        Ok(borrower.clone())
    }

    /// The loan `borrow` would open
    pub fn plan_borrow(&self, book_id: BookId, borrower_name: &str) -> Result<Loan> {
        self.ledger
            .check_borrow(&self.catalog, &self.registry, book_id, borrower_name)
    }

    /// The loan `return` would close
    pub fn plan_return(&self, book_id: BookId, borrower_name: &str) -> Result<Loan> {
        self.ledger.check_return(&self.registry, book_id, borrower_name)
    }

    // =========================================================================
    // Apply
    // =========================================================================

    /// Apply one operation
    ///
    /// Never fails: live operations were planned against this state, and
    /// replayed ones were planned against the identical state before a crash.
    pub fn apply(&mut self, operation: &Operation) {
        match operation {
            Operation::AddBook { book } => {
                self.catalog.insert(Book {
                    available: true,
                    ..book.clone()
                });
            }
            Operation::RemoveBook { book_id } => {
                self.ledger.release_book(*book_id);
                let _ = self.catalog.remove(*book_id);
            }
            Operation::AddBorrower { borrower } => {
                self.registry.insert(borrower.clone());
            }
            Operation::RemoveBorrower { borrower_id } => {
                self.ledger.release_borrower(&mut self.catalog, *borrower_id);
                let _ = self.registry.remove(*borrower_id);
            }
            Operation::Borrow { loan } => {
                self.ledger.open(&mut self.catalog, *loan);
            }
            Operation::Return { loan } => {
                self.ledger.close(&mut self.catalog, *loan);
            }
        }
    }

    /// Verify referential integrity and the availability invariant
    pub fn check_invariants(&self) -> Result<()> {
        for book in self.catalog.list() {
            let on_loan = self.ledger.holder(book.id).is_some();
            if book.available == on_loan {
                return Err(ShelfError::Storage(format!(
                    "book {} has available={} but on_loan={}",
                    book.id, book.available, on_loan
                )));
            }
        }

        for loan in self.ledger.list() {
            if !self.catalog.contains(loan.book_id) {
                return Err(ShelfError::Storage(format!(
                    "loan references missing book {}",
                    loan.book_id
                )));
            }
            if self.registry.get(loan.borrower_id).is_err() {
                return Err(ShelfError::Storage(format!(
                    "loan of book {} references missing borrower {}",
                    loan.book_id, loan.borrower_id
                )));
            }
        }

        Ok(())
    }

    /// Immutable copy of all three collections for exporters
    pub fn snapshot(&self) -> LibrarySnapshot {
        LibrarySnapshot {
            books: self.catalog.list().cloned().collect(),
            borrowers: self.registry.list().cloned().collect(),
            loans: self.ledger.list().collect(),
        }
    }
}

/// Point-in-time view of the library
///
/// Each accessor returns a fresh iterator, so an exporter can walk a
/// collection as many times as it needs.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LibrarySnapshot {
    books: Vec<Book>,
    borrowers: Vec<Borrower>,
    loans: Vec<Loan>,
}

impl LibrarySnapshot {
    /// Books in insertion order
    pub fn books(&self) -> impl ExactSizeIterator<Item = &Book> + '_ {
        self.books.iter()
    }

    /// Borrowers in id order
    pub fn borrowers(&self) -> impl ExactSizeIterator<Item = &Borrower> + '_ {
        self.borrowers.iter()
    }

    /// Loans in book id order
    pub fn loans(&self) -> impl ExactSizeIterator<Item = &Loan> + '_ {
        self.loans.iter()
    }
}
