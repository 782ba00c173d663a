//! Durable repository: WAL + checkpoint file in a data directory

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::WalSyncStrategy;
use crate::error::Result;
use crate::state::LibraryState;
use crate::storage::CheckpointStore;
use crate::wal::{Operation, RecoveryResult, WalReader, WalRecovery, WalWriter};

use super::Repository;

/// Persists the library as a checkpoint image plus a write-ahead log
///
/// Each `record` is one CRC-framed WAL entry. A crash mid-append leaves a torn
/// tail that `open` cuts off, so an operation is either fully replayed or
/// not at all.
pub struct WalRepository {
    data_dir: PathBuf,
    wal_path: PathBuf,
    wal: WalWriter,
    checkpoints: CheckpointStore,
    recovery: RecoveryResult,
}

impl WalRepository {
    const WAL_FILENAME: &'static str = "wal.log";

    /// Open or create a repository in `data_dir`
    ///
    /// On startup:
    /// 1. Create the data directory
    /// 2. Recover the WAL (truncating a damaged tail)
    /// 3. Open the writer, continuing after the highest known LSN
    pub fn open(data_dir: &Path, sync_strategy: WalSyncStrategy) -> Result<Self> {
        fs::create_dir_all(data_dir)?;

        let wal_path = data_dir.join(Self::WAL_FILENAME);
        let checkpoints = CheckpointStore::new(data_dir);

        let checkpoint_lsn = checkpoints.read()?.map(|c| c.last_lsn).unwrap_or(0);

        let (_, recovery) = WalRecovery::recover(&wal_path)?;
        if recovery.entries_recovered > 0 || recovery.entries_corrupted > 0 {
            tracing::info!(
                "WAL recovery: {} entries recovered, {} corrupted, last_lsn={}",
                recovery.entries_recovered,
                recovery.entries_corrupted,
                recovery.last_lsn
            );
        }

        let next_lsn = checkpoint_lsn.max(recovery.last_lsn) + 1;
        let wal = WalWriter::open_with_lsn(&wal_path, sync_strategy, next_lsn)?;

        Ok(Self {
            data_dir: data_dir.to_path_buf(),
            wal_path,
            wal,
            checkpoints,
            recovery,
        })
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn wal_path(&self) -> &Path {
        &self.wal_path
    }

    pub fn checkpoint_path(&self) -> &Path {
        self.checkpoints.path()
    }

    /// Stats from the recovery pass run by `open`
    pub fn recovery(&self) -> &RecoveryResult {
        &self.recovery
    }
}

impl Repository for WalRepository {
    fn load(&mut self) -> Result<LibraryState> {
        let (mut state, checkpoint_lsn) = match self.checkpoints.read()? {
            Some(checkpoint) => (checkpoint.state, checkpoint.last_lsn),
            None => (LibraryState::new(), 0),
        };

        let mut replayed = 0usize;
        for entry in WalReader::open(&self.wal_path)?.entries() {
            let entry = entry?;
            // Already folded into the checkpoint
            if entry.lsn <= checkpoint_lsn {
                continue;
            }
            state.apply(&entry.operation);
            replayed += 1;
        }

        state.check_invariants()?;

        tracing::debug!(
            "Loaded library: checkpoint_lsn={}, replayed {} WAL entries",
            checkpoint_lsn,
            replayed
        );

        Ok(state)
    }

    fn record(&mut self, operation: &Operation) -> Result<u64> {
        self.wal.append(operation.clone())
    }

    fn checkpoint(&mut self, state: &LibraryState) -> Result<()> {
        let last_lsn = self.wal.current_lsn() - 1;
        let size = self.checkpoints.write(state, last_lsn)?;

        // Entries are now durable in the checkpoint
        self.wal.truncate()?;

        tracing::info!(
            "Checkpoint written: last_lsn={}, {} bytes",
            last_lsn,
            size
        );
        Ok(())
    }

    fn pending(&self) -> usize {
        self.wal.entry_count()
    }

    fn sync(&mut self) -> Result<()> {
        self.wal.sync()
    }
}

impl Drop for WalRepository {
    fn drop(&mut self) {
        if let Err(e) = self.wal.sync() {
            tracing::warn!("Failed to sync WAL on drop: {}", e);
        }
    }
}
