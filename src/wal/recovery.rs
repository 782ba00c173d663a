//! WAL Recovery
//!
//! Handles crash recovery by replaying the WAL.

use std::fs::{self, OpenOptions};
use std::path::Path;

use crate::error::{Result, ShelfError};
use super::{WalEntry, WalReader};

/// Handles WAL recovery after crash
pub struct WalRecovery;

/// Result of a recovery operation
#[derive(Debug, Default, PartialEq, Eq)]
pub struct RecoveryResult {
    /// Number of entries successfully recovered
    pub entries_recovered: u64,

    /// Number of damaged records found (recovery stops at the first one)
    pub entries_corrupted: u64,

    /// Last valid LSN
    pub last_lsn: u64,

    /// Whether the WAL was truncated (damaged tail removed)
    pub was_truncated: bool,
}

impl WalRecovery {
    /// Recover entries from a WAL file
    ///
    /// This will:
    /// 1. Read entries in order until the first torn or corrupted record
    /// 2. Truncate the file at that point (later records depend on it)
    /// 3. Return all valid entries in order
    ///
    /// A missing file recovers to nothing.
    pub fn recover(path: &Path) -> Result<(Vec<WalEntry>, RecoveryResult)> {
        if !path.exists() {
            return Ok((Vec::new(), RecoveryResult::default()));
        }

        let (entries, mut result, valid_len) = Self::scan(path)?;
        let file_len = fs::metadata(path)?.len();

        if valid_len < file_len {
            let file = OpenOptions::new().write(true).open(path)?;
            file.set_len(valid_len)?;
            file.sync_all()?;
            result.was_truncated = true;

            tracing::warn!(
                "WAL {}: discarded {} bytes after lsn {}",
                path.display(),
                file_len - valid_len,
                result.last_lsn
            );
        }

        Ok((entries, result))
    }

    /// Verify integrity of a WAL file without modifying it
    pub fn verify(path: &Path) -> Result<RecoveryResult> {
        let (_, result, _) = Self::scan(path)?;
        Ok(result)
    }

    /// Read every valid entry; returns them with the byte length they cover
    fn scan(path: &Path) -> Result<(Vec<WalEntry>, RecoveryResult, u64)> {
        let mut reader = WalReader::open(path)?;
        let mut entries = Vec::new();
        let mut result = RecoveryResult::default();

        loop {
            match reader.next_entry() {
                Ok(Some(entry)) => {
                    result.entries_recovered += 1;
                    result.last_lsn = entry.lsn;
                    entries.push(entry);
                }
                Ok(None) => break,
                Err(ShelfError::WalCorruption(reason)) | Err(ShelfError::Serialization(reason)) => {
                    tracing::debug!("WAL scan stopped: {}", reason);
                    result.entries_corrupted += 1;
                    break;
                }
                Err(e) => return Err(e),
            }
        }

        Ok((entries, result, reader.position()))
    }
}
