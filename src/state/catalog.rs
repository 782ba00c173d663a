//! Catalog store
//!
//! BTreeMap-backed book table.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{Result, ShelfError};
use crate::model::{Book, BookId};

/// Owns every Book record
///
/// Ids are assigned as `max + 1`, so ascending id order is also insertion
/// order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CatalogStore {
    books: BTreeMap<BookId, Book>,
}

impl CatalogStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Id the next added book receives (1 for an empty catalog)
    pub fn next_id(&self) -> BookId {
        self.books.keys().next_back().map(|&id| id + 1).unwrap_or(1)
    }

    /// Build the record `add` would store, without storing it
    pub fn prepare(&self, title: &str, author: &str, year: &str) -> Book {
        Book {
            id: self.next_id(),
            title: title.to_string(),
            author: author.to_string(),
            year: year.to_string(),
            available: true,
        }
    }

    /// Add a book and return its id
    pub fn add(&mut self, title: &str, author: &str, year: &str) -> BookId {
        let book = self.prepare(title, author, year);
        let id = book.id;
        self.insert(book);
        id
    }

    pub(crate) fn insert(&mut self, book: Book) {
        self.books.insert(book.id, book);
    }

    /// Delete a book record
    pub fn remove(&mut self, id: BookId) -> Result<Book> {
        self.books.remove(&id).ok_or(ShelfError::BookNotFound(id))
    }

    pub fn get(&self, id: BookId) -> Result<&Book> {
        self.books.get(&id).ok_or(ShelfError::BookNotFound(id))
    }

    pub fn contains(&self, id: BookId) -> bool {
        self.books.contains_key(&id)
    }

    /// All books in insertion order
    pub fn list(&self) -> impl Iterator<Item = &Book> + '_ {
        self.books.values()
    }

    /// Case-insensitive substring match against title or author
    pub fn search(&self, needle: &str) -> Vec<&Book> {
        let needle = needle.to_lowercase();
        self.books
            .values()
            .filter(|book| {
                book.title.to_lowercase().contains(&needle)
                    || book.author.to_lowercase().contains(&needle)
            })
            .collect()
    }

    /// Flip the availability bit; false if the book does not exist
    pub(crate) fn set_available(&mut self, id: BookId, available: bool) -> bool {
        match self.books.get_mut(&id) {
            Some(book) => {
                book.available = available;
                true
            }
            None => false,
        }
    }

    pub fn len(&self) -> usize {
        self.books.len()
    }

    pub fn is_empty(&self) -> bool {
        self.books.is_empty()
    }
}
