//! Repository Module
//!
//! The storage seam between the library's invariant logic and whatever
//! persists it.
//!
//! ## Contract
//! - `load` rebuilds the last committed state
//! - `record` makes one `Operation` durable as a single unit; on error nothing
//!   was recorded
//! - `checkpoint` folds everything recorded so far into a full image
//!
//! The `Library` validates an operation, records it, and only then applies it
//! in memory, so a failed `record` leaves the library untouched.

mod memory;
mod wal;

pub use memory::MemoryRepository;
pub use wal::WalRepository;

use crate::error::Result;
use crate::state::LibraryState;
use crate::wal::Operation;

pub trait Repository: Send {
    /// Rebuild the last committed state
    fn load(&mut self) -> Result<LibraryState>;

    /// Durably record one operation; returns its sequence number
    fn record(&mut self, operation: &Operation) -> Result<u64>;

    /// Persist `state` in full and discard the records it covers
    fn checkpoint(&mut self, state: &LibraryState) -> Result<()>;

    /// Records written since the last checkpoint
    fn pending(&self) -> usize;

    /// Flush anything buffered to stable storage
    fn sync(&mut self) -> Result<()>;
}
