//! WAL Writer
//!
//! Handles appending entries to the WAL file.

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::config::WalSyncStrategy;
use crate::error::Result;
use super::{Operation, WalEntry, WalReader};

/// Writes entries to the WAL file
///
/// An append either lands completely or not at all: if writing or syncing a
/// record fails, the file is cut back to its previous length.
pub struct WalWriter {
    file: File,
    path: PathBuf,
    /// LSN the next append will use
    next_lsn: u64,
    sync_strategy: WalSyncStrategy,
    /// Entries written since the last fsync
    uncommitted: usize,
    /// Entries currently in the file
    entry_count: usize,
    /// Current file length
    offset: u64,
}

impl WalWriter {
    /// Open or create a WAL file
    ///
    /// Existing entries are scanned to continue the LSN sequence. A file with
    /// a damaged tail is refused; run `WalRecovery::recover` first.
    pub fn open(path: &Path, sync_strategy: WalSyncStrategy) -> Result<Self> {
        Self::open_with_lsn(path, sync_strategy, 1)
    }

    /// Open or create a WAL file, never issuing an LSN below `min_next_lsn`
    pub fn open_with_lsn(
        path: &Path,
        sync_strategy: WalSyncStrategy,
        min_next_lsn: u64,
    ) -> Result<Self> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)?;

        let mut last_lsn = 0;
        let mut entry_count = 0;
        let mut reader = WalReader::open(path)?;
        while let Some(entry) = reader.next_entry()? {
            last_lsn = entry.lsn;
            entry_count += 1;
        }
        let offset = reader.position();

        Ok(Self {
            file,
            path: path.to_path_buf(),
            next_lsn: (last_lsn + 1).max(min_next_lsn),
            sync_strategy,
            uncommitted: 0,
            entry_count,
            offset,
        })
    }

    /// Append an operation to the WAL, returning its LSN
    pub fn append(&mut self, operation: Operation) -> Result<u64> {
        let lsn = self.next_lsn;
        let bytes = WalEntry::new(lsn, operation).serialize()?;

        let uncommitted_before = self.uncommitted;
        if let Err(e) = self.write_record(&bytes) {
            self.rollback();
            self.uncommitted = uncommitted_before;
            return Err(e);
        }

        self.next_lsn += 1;
        self.entry_count += 1;
        self.offset += bytes.len() as u64;

        Ok(lsn)
    }

    fn write_record(&mut self, bytes: &[u8]) -> Result<()> {
        self.file.write_all(bytes)?;
        self.uncommitted += 1;

        match self.sync_strategy {
            WalSyncStrategy::EveryWrite => self.sync()?,
            WalSyncStrategy::EveryNEntries { count } => {
                if self.uncommitted >= count {
                    self.sync()?;
                }
            }
        }

        Ok(())
    }

    /// Cut a partially written record back off the file
    fn rollback(&mut self) {
        if let Err(e) = self.file.set_len(self.offset) {
            tracing::warn!(
                "Failed to roll back WAL {} to {} bytes: {}",
                self.path.display(),
                self.offset,
                e
            );
        }
    }

    /// Force sync to disk
    pub fn sync(&mut self) -> Result<()> {
        self.file.sync_data()?;
        self.uncommitted = 0;
        Ok(())
    }

    /// Drop all entries (after a checkpoint made them redundant)
    ///
    /// The LSN sequence continues where it left off.
    pub fn truncate(&mut self) -> Result<()> {
        self.file.set_len(0)?;
        self.file.sync_all()?;
        self.offset = 0;
        self.entry_count = 0;
        self.uncommitted = 0;
        Ok(())
    }

    /// Get the LSN the next append will receive
    pub fn current_lsn(&self) -> u64 {
        self.next_lsn
    }

    /// Entries written but not yet fsynced
    pub fn uncommitted_count(&self) -> usize {
        self.uncommitted
    }

    /// Entries currently held in the file
    pub fn entry_count(&self) -> usize {
        self.entry_count
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}
