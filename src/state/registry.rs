//! Borrower registry

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{Result, ShelfError};
use crate::model::{Borrower, BorrowerId};

/// Owns every Borrower record, keyed by caller-supplied id
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BorrowerRegistry {
    borrowers: BTreeMap<BorrowerId, Borrower>,
}

impl BorrowerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a borrower; fails with `DuplicateKey` if the id is taken
    pub fn add(&mut self, id: BorrowerId, name: &str) -> Result<()> {
        self.ensure_vacant(id)?;
        self.insert(Borrower {
            id,
            name: name.to_string(),
        });
        Ok(())
    }

    pub fn ensure_vacant(&self, id: BorrowerId) -> Result<()> {
        if self.borrowers.contains_key(&id) {
            return Err(ShelfError::DuplicateKey(id));
        }
        Ok(())
    }

    pub(crate) fn insert(&mut self, borrower: Borrower) {
        self.borrowers.insert(borrower.id, borrower);
    }

    pub fn remove(&mut self, id: BorrowerId) -> Result<Borrower> {
        self.borrowers
            .remove(&id)
            .ok_or_else(|| ShelfError::BorrowerNotFound(id.to_string()))
    }

    pub fn get(&self, id: BorrowerId) -> Result<&Borrower> {
        self.borrowers
            .get(&id)
            .ok_or_else(|| ShelfError::BorrowerNotFound(id.to_string()))
    }

    /// Resolve a name, ignoring case
    ///
    /// When several borrowers share the name, the lowest id wins.
    pub fn lookup_by_name(&self, name: &str) -> Result<BorrowerId> {
        let wanted = name.to_lowercase();
        self.borrowers
            .values()
            .find(|b| b.name.to_lowercase() == wanted)
            .map(|b| b.id)
            .ok_or_else(|| ShelfError::BorrowerNotFound(name.to_string()))
    }

    /// All borrowers in ascending id order
    pub fn list(&self) -> impl Iterator<Item = &Borrower> + '_ {
        self.borrowers.values()
    }

    pub fn len(&self) -> usize {
        self.borrowers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.borrowers.is_empty()
    }
}
