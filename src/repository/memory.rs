//! In-process repository
//!
//! Keeps the journal in a `Vec`. A shared fault switch makes `record` fail on
//! demand, which is how the fail-clean behaviour of the library is tested.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::error::{Result, ShelfError};
use crate::state::LibraryState;
use crate::wal::Operation;

use super::Repository;

#[derive(Debug, Default)]
pub struct MemoryRepository {
    /// State as of the last checkpoint
    base: LibraryState,
    /// Operations recorded since the last checkpoint
    journal: Vec<Operation>,
    next_seq: u64,
    checkpoints: usize,
    fail_writes: Arc<AtomicBool>,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self {
            next_seq: 1,
            ..Self::default()
        }
    }

    /// Start from an existing state, as if it had been checkpointed
    pub fn with_state(state: LibraryState) -> Self {
        Self {
            base: state,
            ..Self::new()
        }
    }

    /// Handle that makes every `record` fail while set to `true`
    pub fn fault_switch(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.fail_writes)
    }

    /// Operations recorded since the last checkpoint
    pub fn journal(&self) -> &[Operation] {
        &self.journal
    }

    pub fn checkpoint_count(&self) -> usize {
        self.checkpoints
    }
}

impl Repository for MemoryRepository {
    fn load(&mut self) -> Result<LibraryState> {
        let mut state = self.base.clone();
        for operation in &self.journal {
            state.apply(operation);
        }
        Ok(state)
    }

    fn record(&mut self, operation: &Operation) -> Result<u64> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(ShelfError::Storage(format!(
                "injected write failure for {}",
                operation.kind()
            )));
        }

        let seq = self.next_seq;
        self.journal.push(operation.clone());
        self.next_seq += 1;
        Ok(seq)
    }

    fn checkpoint(&mut self, state: &LibraryState) -> Result<()> {
        self.base = state.clone();
        self.journal.clear();
        self.checkpoints += 1;
        Ok(())
    }

    fn pending(&self) -> usize {
        self.journal.len()
    }

    fn sync(&mut self) -> Result<()> {
        Ok(())
    }
}
