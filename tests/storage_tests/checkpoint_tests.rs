//! Tests for the checkpoint file
//!
//! These tests verify:
//! - Write then read returns the same state and LSN
//! - Corruption detection (magic, version, CRC, truncation)
//! - The temporary file does not survive a successful write

use std::fs;
use std::path::PathBuf;

use shelfdb::state::LibraryState;
use shelfdb::storage::CheckpointStore;
use shelfdb::wal::Operation;
use shelfdb::ShelfError;
use tempfile::TempDir;

// =============================================================================
// Helper Functions
// =============================================================================

fn setup_temp_storage() -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().to_path_buf();
    (temp_dir, path)
}

fn sample_state() -> LibraryState {
    let mut state = LibraryState::new();
    let book = state.plan_add_book("Dune", "Frank Herbert", "1965");
    state.apply(&Operation::AddBook { book });
    let book = state.plan_add_book("Emma", "Jane Austen", "1815");
    state.apply(&Operation::AddBook { book });
    let borrower = state.plan_add_borrower(1, "Alice").unwrap();
    state.apply(&Operation::AddBorrower { borrower });
    let loan = state.plan_borrow(2, "Alice").unwrap();
    state.apply(&Operation::Borrow { loan });
    state
}

// =============================================================================
// Write / Read Tests
// =============================================================================

#[test]
fn test_read_without_checkpoint() {
    let (_temp, path) = setup_temp_storage();
    let store = CheckpointStore::new(&path);

    assert!(!store.exists());
    assert!(store.read().unwrap().is_none());
}

#[test]
fn test_write_then_read() {
    let (_temp, path) = setup_temp_storage();
    let store = CheckpointStore::new(&path);
    let state = sample_state();

    let size = store.write(&state, 42).unwrap();

    assert_eq!(fs::metadata(store.path()).unwrap().len(), size);
    let checkpoint = store.read().unwrap().unwrap();
    assert_eq!(checkpoint.last_lsn, 42);
    assert_eq!(checkpoint.state, state);
}

#[test]
fn test_rewrite_replaces_previous() {
    let (_temp, path) = setup_temp_storage();
    let store = CheckpointStore::new(&path);

    store.write(&LibraryState::new(), 1).unwrap();
    store.write(&sample_state(), 9).unwrap();

    let checkpoint = store.read().unwrap().unwrap();
    assert_eq!(checkpoint.last_lsn, 9);
    assert_eq!(checkpoint.state.catalog().len(), 2);
    assert!(!path.join("checkpoint.db.tmp").exists());
}

#[test]
fn test_file_layout() {
    let (_temp, path) = setup_temp_storage();
    let store = CheckpointStore::new(&path);
    store.write(&sample_state(), 7).unwrap();

    let bytes = fs::read(store.path()).unwrap();

    assert_eq!(&bytes[0..4], b"SHLF");
    assert_eq!(u16::from_le_bytes([bytes[4], bytes[5]]), 1);
    assert_eq!(u64::from_le_bytes(bytes[6..14].try_into().unwrap()), 7);
    let len = u32::from_le_bytes(bytes[14..18].try_into().unwrap()) as usize;
    assert_eq!(bytes.len(), 22 + len);
}

// =============================================================================
// Corruption Tests
// =============================================================================

#[test]
fn test_bad_magic_rejected() {
    let (_temp, path) = setup_temp_storage();
    let store = CheckpointStore::new(&path);
    store.write(&sample_state(), 1).unwrap();

    let mut bytes = fs::read(store.path()).unwrap();
    bytes[0] = b'X';
    fs::write(store.path(), &bytes).unwrap();

    assert!(matches!(store.read(), Err(ShelfError::Storage(_))));
}

#[test]
fn test_unknown_version_rejected() {
    let (_temp, path) = setup_temp_storage();
    let store = CheckpointStore::new(&path);
    store.write(&sample_state(), 1).unwrap();

    let mut bytes = fs::read(store.path()).unwrap();
    bytes[4] = 99;
    fs::write(store.path(), &bytes).unwrap();

    assert!(store.read().is_err());
}

#[test]
fn test_payload_corruption_detected() {
    let (_temp, path) = setup_temp_storage();
    let store = CheckpointStore::new(&path);
    store.write(&sample_state(), 1).unwrap();

    let mut bytes = fs::read(store.path()).unwrap();
    let last = bytes.len() - 1;
    bytes[last] ^= 0xFF;
    fs::write(store.path(), &bytes).unwrap();

    let err = store.read().unwrap_err();
    assert!(err.to_string().contains("CRC mismatch"));
}

#[test]
fn test_truncated_checkpoint_detected() {
    let (_temp, path) = setup_temp_storage();
    let store = CheckpointStore::new(&path);
    store.write(&sample_state(), 1).unwrap();

    let bytes = fs::read(store.path()).unwrap();
    fs::write(store.path(), &bytes[..bytes.len() - 3]).unwrap();
    assert!(store.read().is_err());

    fs::write(store.path(), &bytes[..10]).unwrap();
    assert!(store.read().is_err());
}
