//! Checkpoint file reader/writer

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use bytes::{Buf, BufMut, BytesMut};

use crate::error::{Result, ShelfError};
use crate::state::LibraryState;

use super::{HEADER_SIZE, MAGIC, VERSION};

/// A decoded checkpoint
#[derive(Debug, Clone, PartialEq)]
pub struct Checkpoint {
    /// Last WAL record included in `state`
    pub last_lsn: u64,
    pub state: LibraryState,
}

/// Owns the checkpoint file inside a data directory
pub struct CheckpointStore {
    path: PathBuf,
}

impl CheckpointStore {
    pub const FILENAME: &'static str = "checkpoint.db";

    pub fn new(data_dir: &Path) -> Self {
        Self {
            path: data_dir.join(Self::FILENAME),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Write a new checkpoint, replacing the old one atomically
    ///
    /// The image goes to a temporary file that is synced and then renamed
    /// over the previous checkpoint. Returns the file size.
    pub fn write(&self, state: &LibraryState, last_lsn: u64) -> Result<u64> {
        let payload = bincode::serialize(state)?;
        let len = u32::try_from(payload.len()).map_err(|_| {
            ShelfError::Storage(format!("Checkpoint too large: {} bytes", payload.len()))
        })?;

        let mut buf = BytesMut::with_capacity(HEADER_SIZE + payload.len());
        buf.put_slice(MAGIC);
        buf.put_u16_le(VERSION);
        buf.put_u64_le(last_lsn);
        buf.put_u32_le(len);
        buf.put_u32_le(crc32fast::hash(&payload));
        buf.put_slice(&payload);

        let tmp_path = self.path.with_extension("db.tmp");
        {
            let mut file = OpenOptions::new()
                .create(true)
                .write(true)
                .truncate(true)
                .open(&tmp_path)?;
            file.write_all(&buf)?;
            file.sync_all()?;
        }

        fs::rename(&tmp_path, &self.path)?;
        self.sync_parent_dir();

        Ok(buf.len() as u64)
    }

    /// Read the checkpoint; `None` if none was ever written
    pub fn read(&self) -> Result<Option<Checkpoint>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let bytes = fs::read(&self.path)?;
        if bytes.len() < HEADER_SIZE {
            return Err(ShelfError::Storage(format!(
                "Checkpoint too short: {} bytes",
                bytes.len()
            )));
        }

        let mut header = &bytes[..HEADER_SIZE];
        let mut magic = [0u8; 4];
        header.copy_to_slice(&mut magic);
        if &magic != MAGIC {
            return Err(ShelfError::Storage("Invalid checkpoint magic".to_string()));
        }

        let version = header.get_u16_le();
        if version != VERSION {
            return Err(ShelfError::Storage(format!(
                "Unsupported checkpoint version: {}",
                version
            )));
        }

        let last_lsn = header.get_u64_le();
        let len = header.get_u32_le() as usize;
        let expected_crc = header.get_u32_le();

        let payload = bytes
            .get(HEADER_SIZE..HEADER_SIZE + len)
            .ok_or_else(|| ShelfError::Storage("Checkpoint payload truncated".to_string()))?;

        let actual_crc = crc32fast::hash(payload);
        if actual_crc != expected_crc {
            return Err(ShelfError::Storage(format!(
                "Checkpoint CRC mismatch: expected {:08x}, got {:08x}",
                expected_crc, actual_crc
            )));
        }

        let state: LibraryState = bincode::deserialize(payload)?;
        state.check_invariants()?;

        Ok(Some(Checkpoint { last_lsn, state }))
    }

    /// Make the rename durable
    fn sync_parent_dir(&self) {
        if !cfg!(unix) {
            return;
        }
        if let Some(dir) = self.path.parent() {
            if let Err(e) = fs::File::open(dir).and_then(|d| d.sync_all()) {
                tracing::debug!("Could not sync {}: {}", dir.display(), e);
            }
        }
    }
}
