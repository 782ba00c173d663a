//! Library Module
//!
//! The facade the dispatcher talks to: composes catalog, registry, ledger and
//! queries over a `Repository`.
//!
//! ## Responsibilities
//! - Route commands to operations
//! - Keep the availability invariant across every mutation
//! - Record each mutation durably before it becomes visible
//! - Checkpoint when the journal grows past the configured threshold

use std::path::{Path, PathBuf};

use parking_lot::{Mutex, RwLock};

use crate::config::Config;
use crate::error::Result;
use crate::export::{CsvExporter, ExportReport, SnapshotExporter};
use crate::model::{Book, BookId, BorrowedBook, Borrower, BorrowerId, Loan};
use crate::protocol::{Command, Response};
use crate::repository::{Repository, WalRepository};
use crate::state::{LibrarySnapshot, LibraryState};
use crate::wal::Operation;

/// The lending library
///
/// ## Concurrency Model: Single Writer
///
/// - **Writes** hold the state write guard across
///   validate → record → apply. Two callers can never both observe a book as
///   available and both borrow it.
/// - **Reads** take the shared guard and see only fully applied operations.
///
/// ## Failure Model
/// An operation that returns `Err` changed nothing: validation failures stop
/// before the repository is touched, and a failed `record` stops before the
/// in-memory state is touched.
pub struct Library<R: Repository = WalRepository> {
    config: Config,

    /// Catalog, registry and ledger
    state: RwLock<LibraryState>,

    /// Durable journal of operations
    repository: Mutex<R>,
}

impl Library<WalRepository> {
    /// Open or create a durable library with the given config
    ///
    /// On startup:
    /// 1. Open/create the data directory and recover the WAL
    /// 2. Load the checkpoint and replay the WAL on top of it
    /// 3. Checkpoint the recovered state so the WAL starts empty
    pub fn open(config: Config) -> Result<Self> {
        config.validate()?;
        let repository = WalRepository::open(&config.data_dir, config.wal_sync_strategy)?;
        Self::with_repository(config, repository)
    }

    /// Open with a path (convenience method)
    ///
    /// Uses default config with the specified data directory
    pub fn open_path(path: &Path) -> Result<Self> {
        Self::open(Config::builder().data_dir(path).build())
    }
}

impl<R: Repository> Library<R> {
    /// Build a library over any repository
    pub fn with_repository(config: Config, mut repository: R) -> Result<Self> {
        config.validate()?;

        let state = repository.load()?;

        if repository.pending() > 0 {
            tracing::info!("Checkpointing {} replayed operations", repository.pending());
            repository.checkpoint(&state)?;
        }

        tracing::info!(
            "Library ready: {} books, {} borrowers, {} loans",
            state.catalog().len(),
            state.registry().len(),
            state.ledger().len()
        );

        Ok(Self {
            config,
            state: RwLock::new(state),
            repository: Mutex::new(repository),
        })
    }

    /// Execute a command
    ///
    /// Routes commands to appropriate handlers
    pub fn execute(&self, command: Command) -> Result<Response> {
        match command {
            Command::ShowBooks => Ok(Response::Books(self.books())),
            Command::Search { query } => Ok(Response::Books(self.search(&query))),
            Command::Borrow { book_id, borrower } => {
                let loan = self.borrow(book_id, &borrower)?;
                Ok(Response::Borrowed { loan, borrower })
            }
            Command::Return { book_id, borrower } => {
                let loan = self.return_book(book_id, &borrower)?;
                Ok(Response::Returned { loan, borrower })
            }
            Command::AddBook { title, author, year } => {
                let book = self.insert_book(&title, &author, &year)?;
                Ok(Response::BookAdded(book))
            }
            Command::RemoveBook { book_id } => {
                let book = self.remove_book(book_id)?;
                Ok(Response::BookRemoved(book))
            }
            Command::AddBorrower { id, name } => {
                self.add_borrower(id, &name)?;
                Ok(Response::BorrowerAdded(Borrower { id, name }))
            }
            Command::RemoveBorrower { id } => {
                let borrower = self.remove_borrower(id)?;
                Ok(Response::BorrowerRemoved(borrower))
            }
            Command::Loans { borrower } => {
                let books = self.borrowed_books_of(&borrower)?;
                Ok(Response::Loans { borrower, books })
            }
            Command::Export { dir } => {
                let dir = dir.unwrap_or_else(|| self.config.export_dir.clone());
                Ok(Response::Exported(self.export_csv(dir)?))
            }
            Command::Quit => Ok(Response::Quit),
        }
    }

    // =========================================================================
    // Catalog
    // =========================================================================

    /// Add a book; returns its assigned id
    pub fn add_book(&self, title: &str, author: &str, year: &str) -> Result<BookId> {
        self.insert_book(title, author, year).map(|book| book.id)
    }

    /// Add a book; returns the record as stored
    pub fn insert_book(&self, title: &str, author: &str, year: &str) -> Result<Book> {
        let mut state = self.state.write();
        let book = state.plan_add_book(title, author, year);

        self.commit(&mut state, Operation::AddBook { book: book.clone() })?;
        Ok(book)
    }

    /// Remove a book, subject to the configured removal policy
    pub fn remove_book(&self, book_id: BookId) -> Result<Book> {
        let mut state = self.state.write();
        let book = state.plan_remove_book(book_id, self.config.removal_policy)?;

        self.commit(&mut state, Operation::RemoveBook { book_id })?;
        Ok(book)
    }

    pub fn get_book(&self, book_id: BookId) -> Result<Book> {
        self.state.read().catalog().get(book_id).cloned()
    }

    /// All books in insertion order
    pub fn books(&self) -> Vec<Book> {
        self.state.read().query().all_books()
    }

    /// Case-insensitive substring search over title and author
    pub fn search(&self, query: &str) -> Vec<Book> {
        self.state
            .read()
            .catalog()
            .search(query)
            .into_iter()
            .cloned()
            .collect()
    }

    // =========================================================================
    // Borrowers
    // =========================================================================

    pub fn add_borrower(&self, id: BorrowerId, name: &str) -> Result<()> {
        let mut state = self.state.write();
        let borrower = state.plan_add_borrower(id, name)?;
        self.commit(&mut state, Operation::AddBorrower { borrower })
    }

    /// Remove a borrower, subject to the configured removal policy
    pub fn remove_borrower(&self, id: BorrowerId) -> Result<Borrower> {
        let mut state = self.state.write();
        let borrower = state.plan_remove_borrower(id, self.config.removal_policy)?;

        self.commit(&mut state, Operation::RemoveBorrower { borrower_id: id })?;
        Ok(borrower)
    }

    pub fn get_borrower(&self, id: BorrowerId) -> Result<Borrower> {
        self.state.read().registry().get(id).cloned()
    }

    /// Resolve a borrower name (case-insensitive, lowest id on ties)
    pub fn lookup_borrower(&self, name: &str) -> Result<BorrowerId> {
        self.state.read().registry().lookup_by_name(name)
    }

    pub fn borrowers(&self) -> Vec<Borrower> {
        self.state.read().registry().list().cloned().collect()
    }

    // =========================================================================
    // Loans
    // =========================================================================

    /// Lend a book to a borrower
    ///
    /// Fails with `BorrowerNotFound`, `BookNotFound` or `AlreadyBorrowed`.
    pub fn borrow(&self, book_id: BookId, borrower_name: &str) -> Result<Loan> {
        let mut state = self.state.write();
        let loan = state.plan_borrow(book_id, borrower_name)?;

        self.commit(&mut state, Operation::Borrow { loan })?;
        Ok(loan)
    }

    /// Take a book back from the borrower who holds it
    ///
    /// Fails with `BorrowerNotFound` or `NoActiveLoan`.
    pub fn return_book(&self, book_id: BookId, borrower_name: &str) -> Result<Loan> {
        let mut state = self.state.write();
        let loan = state.plan_return(book_id, borrower_name)?;

        self.commit(&mut state, Operation::Return { loan })?;
        Ok(loan)
    }

    /// Title and author of each book the named borrower holds
    pub fn borrowed_books_of(&self, borrower_name: &str) -> Result<Vec<BorrowedBook>> {
        self.state.read().query().borrowed_books_of(borrower_name)
    }

    /// All active loans in book id order
    pub fn loans(&self) -> Vec<Loan> {
        self.state.read().ledger().list().collect()
    }

    // =========================================================================
    // Snapshots & Export
    // =========================================================================

    /// Consistent copy of books, borrowers and loans
    pub fn snapshot(&self) -> LibrarySnapshot {
        self.state.read().snapshot()
    }

    /// Hand a snapshot to any exporter
    pub fn export_with<E: SnapshotExporter>(&self, exporter: &mut E) -> Result<ExportReport> {
        exporter.export(&self.snapshot())
    }

    /// Write the three CSV files into `dir`
    pub fn export_csv(&self, dir: impl Into<PathBuf>) -> Result<ExportReport> {
        self.export_with(&mut CsvExporter::new(dir))
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Fold the journal into a checkpoint now
    pub fn checkpoint(&self) -> Result<()> {
        let state = self.state.read();
        self.repository.lock().checkpoint(&state)
    }

    /// Close the library gracefully
    ///
    /// Checkpoints pending operations and syncs to disk
    pub fn close(self) -> Result<()> {
        let state = self.state.into_inner();
        let mut repository = self.repository.into_inner();

        if repository.pending() > 0 {
            repository.checkpoint(&state)?;
        }
        repository.sync()
    }

    /// Record then apply one validated operation (write guard held)
    fn commit(&self, state: &mut LibraryState, operation: Operation) -> Result<()> {
        let mut repository = self.repository.lock();

        let seq = repository.record(&operation)?;
        state.apply(&operation);
        tracing::debug!("Committed {} (seq {})", operation.kind(), seq);

        if repository.pending() >= self.config.checkpoint_threshold {
            // The operation is already durable; a failed checkpoint only
            // leaves a longer journal behind.
            if let Err(e) = repository.checkpoint(state) {
                tracing::warn!("Checkpoint failed: {}", e);
            }
        }

        Ok(())
    }

    // =========================================================================
    // Accessors (for testing and debugging)
    // =========================================================================

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Records written since the last checkpoint
    pub fn pending(&self) -> usize {
        self.repository.lock().pending()
    }

    /// Verify the availability invariant and referential integrity
    pub fn check_invariants(&self) -> Result<()> {
        self.state.read().check_invariants()
    }
}
