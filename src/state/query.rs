//! Read-only joins across catalog, registry and ledger

use crate::error::Result;
use crate::model::{Book, BorrowedBook};

use super::LibraryState;

pub struct QueryEngine<'a> {
    state: &'a LibraryState,
}

impl<'a> QueryEngine<'a> {
    pub fn new(state: &'a LibraryState) -> Self {
        Self { state }
    }

    /// Title and author of every book the named borrower holds
    pub fn borrowed_books_of(&self, borrower_name: &str) -> Result<Vec<BorrowedBook>> {
        let borrower_id = self.state.registry().lookup_by_name(borrower_name)?;

        let books = self
            .state
            .ledger()
            .loans_of(borrower_id)
            .into_iter()
            .filter_map(|loan| self.state.catalog().get(loan.book_id).ok())
            .map(|book| BorrowedBook {
                title: book.title.clone(),
                author: book.author.clone(),
            })
            .collect();

        Ok(books)
    }

    pub fn all_books(&self) -> Vec<Book> {
        self.state.catalog().list().cloned().collect()
    }
}
