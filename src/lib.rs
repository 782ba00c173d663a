//! # ShelfDB
//!
//! A durable lending catalog:
//! - Books, borrowers and the ledger of who holds what
//! - Borrow/return as single atomic transitions
//! - Write-Ahead Logging (WAL) with crash recovery
//! - CSV snapshot export
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                 Dispatcher (shell / CLI)                     │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │ Command
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                        Library                               │
//! │              validate → record → apply                       │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//!          ┌────────────┴────────────┐
//!          │                         │
//!          ▼                         ▼
//!   ┌─────────────┐          ┌──────────────────────────────┐
//!   │ Repository  │          │        LibraryState          │
//!   │ WAL + ckpt  │          │ Catalog │ Registry │ Ledger  │
//!   └─────────────┘          └──────────────┬───────────────┘
//!                                           │ snapshot
//!                                           ▼
//!                                   ┌─────────────┐
//!                                   │  Exporter   │
//!                                   │   (CSV)     │
//!                                   └─────────────┘
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;
pub mod model;

pub mod wal;
pub mod storage;
pub mod state;
pub mod repository;
pub mod export;
pub mod protocol;
pub mod library;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{ShelfError, Result};
pub use config::{Config, RemovalPolicy};
pub use library::Library;
pub use model::{Book, BookId, BorrowedBook, Borrower, BorrowerId, Loan};

// =============================================================================
// Version Info
// =============================================================================

/// Current version of ShelfDB
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
