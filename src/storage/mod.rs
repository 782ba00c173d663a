//! Storage Module
//!
//! Checkpoint files: a full image of the library state that lets the WAL be
//! truncated.
//!
//! ## File Format (V1)
//! ```text
//! ┌────────────────────────────────────────────────────────┐
//! │ Header (22 bytes)                                      │
//! │ ┌──────────┬──────────┬───────────┬────────┬────────┐  │
//! │ │Magic (4) │Version(2)│LastLSN (8)│Len (4) │CRC (4) │  │
//! │ └──────────┴──────────┴───────────┴────────┴────────┘  │
//! ├────────────────────────────────────────────────────────┤
//! │ Data (bincode-encoded LibraryState)                    │
//! └────────────────────────────────────────────────────────┘
//! ```
//!
//! `LastLSN` is the last WAL record folded into the image; replay skips
//! records at or below it.

mod checkpoint;

pub use checkpoint::{Checkpoint, CheckpointStore};

/// Magic bytes identifying a ShelfDB checkpoint file
pub(crate) const MAGIC: &[u8; 4] = b"SHLF";

/// Current checkpoint format version
pub(crate) const VERSION: u16 = 1;

/// Header size: Magic (4) + Version (2) + LastLSN (8) + Len (4) + CRC (4)
pub(crate) const HEADER_SIZE: usize = 22;
