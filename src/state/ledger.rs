//! Loan ledger
//!
//! Active loans keyed by book id, so a second loan on the same book cannot
//! even be represented.
//!
//! Transitions come in two halves: `check_*` validates against the catalog
//! and registry without touching anything, `open`/`close` apply a validated
//! loan to both the ledger and the book's availability bit. Callers record
//! the change durably in between.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{Result, ShelfError};
use crate::model::{BookId, BorrowerId, Loan};

use super::{BorrowerRegistry, CatalogStore};

/// Owns the active Loan records
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LoanLedger {
    loans: BTreeMap<BookId, BorrowerId>,
}

impl LoanLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate a borrow request
    ///
    /// Order of checks: borrower, then book, then availability.
    pub fn check_borrow(
        &self,
        catalog: &CatalogStore,
        registry: &BorrowerRegistry,
        book_id: BookId,
        borrower_name: &str,
    ) -> Result<Loan> {
        let borrower_id = registry.lookup_by_name(borrower_name)?;
        let book = catalog.get(book_id)?;

        if !book.available || self.loans.contains_key(&book_id) {
            return Err(ShelfError::AlreadyBorrowed(book_id));
        }

        Ok(Loan {
            borrower_id,
            book_id,
        })
    }

    /// Validate a return request
    ///
    /// Only a loan held by exactly this borrower can be returned.
    pub fn check_return(
        &self,
        registry: &BorrowerRegistry,
        book_id: BookId,
        borrower_name: &str,
    ) -> Result<Loan> {
        let borrower_id = registry.lookup_by_name(borrower_name)?;

        match self.loans.get(&book_id) {
            Some(&holder) if holder == borrower_id => Ok(Loan {
                borrower_id,
                book_id,
            }),
            _ => Err(ShelfError::NoActiveLoan {
                book_id,
                borrower_id,
            }),
        }
    }

    /// Insert a validated loan and mark its book unavailable
    pub(crate) fn open(&mut self, catalog: &mut CatalogStore, loan: Loan) {
        if catalog.set_available(loan.book_id, false) {
            self.loans.insert(loan.book_id, loan.borrower_id);
        }
    }

    /// Delete a loan and mark its book available; false if no such loan
    pub(crate) fn close(&mut self, catalog: &mut CatalogStore, loan: Loan) -> bool {
        if self.loans.get(&loan.book_id) != Some(&loan.borrower_id) {
            return false;
        }
        self.loans.remove(&loan.book_id);
        catalog.set_available(loan.book_id, true);
        true
    }

    /// Drop the loan on a book that is being removed
    pub(crate) fn release_book(&mut self, book_id: BookId) -> Option<Loan> {
        self.loans.remove(&book_id).map(|borrower_id| Loan {
            borrower_id,
            book_id,
        })
    }

    /// Drop every loan of a borrower that is being removed, freeing the books
    pub(crate) fn release_borrower(
        &mut self,
        catalog: &mut CatalogStore,
        borrower_id: BorrowerId,
    ) -> Vec<Loan> {
        let released = self.loans_of(borrower_id);
        for loan in &released {
            self.loans.remove(&loan.book_id);
            catalog.set_available(loan.book_id, true);
        }
        released
    }

    /// Current holder of a book, if on loan
    pub fn holder(&self, book_id: BookId) -> Option<BorrowerId> {
        self.loans.get(&book_id).copied()
    }

    /// Loans held by one borrower, in book id order
    pub fn loans_of(&self, borrower_id: BorrowerId) -> Vec<Loan> {
        self.loans
            .iter()
            .filter(|(_, &holder)| holder == borrower_id)
            .map(|(&book_id, &borrower_id)| Loan {
                borrower_id,
                book_id,
            })
            .collect()
    }

    /// All loans in book id order
    pub fn list(&self) -> impl Iterator<Item = Loan> + '_ {
        self.loans.iter().map(|(&book_id, &borrower_id)| Loan {
            borrower_id,
            book_id,
        })
    }

    pub fn len(&self) -> usize {
        self.loans.len()
    }

    pub fn is_empty(&self) -> bool {
        self.loans.is_empty()
    }
}
