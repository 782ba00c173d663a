//! Tests for the repositories
//!
//! These tests verify:
//! - WalRepository replays records over the checkpoint after reopen
//! - Checkpointing truncates the WAL and keeps LSNs increasing
//! - Records already folded into a checkpoint are not applied twice
//! - MemoryRepository journal and fault switch

use std::fs;
use std::path::PathBuf;
use std::sync::atomic::Ordering;

use shelfdb::config::WalSyncStrategy;
use shelfdb::repository::{MemoryRepository, Repository, WalRepository};
use shelfdb::state::LibraryState;
use shelfdb::wal::{Operation, WalRecovery};
use tempfile::TempDir;

// =============================================================================
// Helper Functions
// =============================================================================

fn setup_temp_storage() -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().to_path_buf();
    (temp_dir, path)
}

fn open(path: &PathBuf) -> WalRepository {
    WalRepository::open(path, WalSyncStrategy::EveryWrite).unwrap()
}

/// Plan, record and apply one book addition
fn record_book(repo: &mut impl Repository, state: &mut LibraryState, title: &str) {
    let book = state.plan_add_book(title, "Author", "2001");
    let op = Operation::AddBook { book };
    repo.record(&op).unwrap();
    state.apply(&op);
}

// =============================================================================
// WalRepository Tests
// =============================================================================

#[test]
fn test_open_creates_data_dir() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("nested").join("data");

    let mut repo = open(&path);

    assert!(path.is_dir());
    assert_eq!(repo.data_dir(), path.as_path());
    assert_eq!(repo.load().unwrap(), LibraryState::new());
    assert_eq!(repo.pending(), 0);
}

#[test]
fn test_records_replayed_after_reopen() {
    let (_temp, path) = setup_temp_storage();
    let mut state = LibraryState::new();
    {
        let mut repo = open(&path);
        record_book(&mut repo, &mut state, "Dune");
        record_book(&mut repo, &mut state, "Emma");
        assert_eq!(repo.pending(), 2);
    }

    let mut repo = open(&path);

    assert_eq!(repo.recovery().entries_recovered, 2);
    assert_eq!(repo.load().unwrap(), state);
}

#[test]
fn test_checkpoint_truncates_wal() {
    let (_temp, path) = setup_temp_storage();
    let mut state = LibraryState::new();
    let mut repo = open(&path);
    record_book(&mut repo, &mut state, "Dune");

    repo.checkpoint(&state).unwrap();

    assert_eq!(repo.pending(), 0);
    assert_eq!(fs::metadata(repo.wal_path()).unwrap().len(), 0);
    assert!(repo.checkpoint_path().exists());

    record_book(&mut repo, &mut state, "Emma");
    drop(repo);

    let mut repo = open(&path);
    assert_eq!(repo.load().unwrap(), state);
}

#[test]
fn test_lsn_continues_past_checkpoint() {
    let (_temp, path) = setup_temp_storage();
    let mut state = LibraryState::new();
    {
        let mut repo = open(&path);
        record_book(&mut repo, &mut state, "Dune");
        record_book(&mut repo, &mut state, "Emma");
        repo.checkpoint(&state).unwrap();
    }

    // Empty WAL after reopen; new records must still sort after the checkpoint
    let mut repo = open(&path);
    let book = state.plan_add_book("Ulysses", "Joyce", "1922");
    let lsn = repo.record(&Operation::AddBook { book }).unwrap();

    assert_eq!(lsn, 3);
}

#[test]
fn test_records_covered_by_checkpoint_are_skipped() {
    let (_temp, path) = setup_temp_storage();
    let mut state = LibraryState::new();
    let wal_copy;
    {
        let mut repo = open(&path);
        record_book(&mut repo, &mut state, "Dune");
        record_book(&mut repo, &mut state, "Emma");
        wal_copy = fs::read(repo.wal_path()).unwrap();
        repo.checkpoint(&state).unwrap();
    }

    // Crash between the checkpoint rename and the WAL truncation
    fs::write(path.join("wal.log"), &wal_copy).unwrap();

    let mut repo = open(&path);
    let loaded = repo.load().unwrap();

    assert_eq!(loaded, state);
    assert_eq!(loaded.catalog().len(), 2);
}

#[test]
fn test_torn_tail_dropped_on_open() {
    let (_temp, path) = setup_temp_storage();
    let mut state = LibraryState::new();
    {
        let mut repo = open(&path);
        record_book(&mut repo, &mut state, "Dune");
    }

    let wal_path = path.join("wal.log");
    let mut bytes = fs::read(&wal_path).unwrap();
    bytes.extend_from_slice(&[0x01, 0x02, 0x03]);
    fs::write(&wal_path, &bytes).unwrap();

    let mut repo = open(&path);

    assert!(repo.recovery().was_truncated);
    assert_eq!(repo.load().unwrap(), state);
    let stats = WalRecovery::verify(&wal_path).unwrap();
    assert_eq!(stats.entries_corrupted, 0);
}

// =============================================================================
// MemoryRepository Tests
// =============================================================================

#[test]
fn test_memory_repository_journal() {
    let mut repo = MemoryRepository::new();
    let mut state = LibraryState::new();

    record_book(&mut repo, &mut state, "Dune");
    record_book(&mut repo, &mut state, "Emma");

    assert_eq!(repo.journal().len(), 2);
    assert_eq!(repo.load().unwrap(), state);

    repo.checkpoint(&state).unwrap();
    assert_eq!(repo.pending(), 0);
    assert_eq!(repo.checkpoint_count(), 1);
    assert_eq!(repo.load().unwrap(), state);
}

#[test]
fn test_memory_repository_fault_switch() {
    let mut repo = MemoryRepository::new();
    let state = LibraryState::new();
    let switch = repo.fault_switch();

    switch.store(true, Ordering::SeqCst);
    let book = state.plan_add_book("Dune", "Herbert", "1965");
    assert!(repo.record(&Operation::AddBook { book: book.clone() }).is_err());
    assert!(repo.journal().is_empty());

    switch.store(false, Ordering::SeqCst);
    assert_eq!(repo.record(&Operation::AddBook { book }).unwrap(), 1);
}
