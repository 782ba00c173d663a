//! WAL Entry definitions
//!
//! Defines the structure of individual WAL log entries and their framing.

use std::time::{SystemTime, UNIX_EPOCH};

use bytes::{Buf, BufMut, BytesMut};
use serde::{Deserialize, Serialize};

use crate::error::{Result, ShelfError};
use crate::model::{Book, BookId, Borrower, BorrowerId, Loan};

/// Header size: LSN (8) + CRC (4) + Len (4)
pub const HEADER_SIZE: usize = 16;

/// Largest payload accepted when decoding (16 MB)
pub const MAX_PAYLOAD_SIZE: u32 = 16 * 1024 * 1024;

/// A single entry in the WAL
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WalEntry {
    /// Log Sequence Number - monotonically increasing
    pub lsn: u64,

    /// The change to apply
    pub operation: Operation,

    /// Timestamp (unix millis) when entry was created
    pub timestamp: u64,
}

/// Changes that can be logged
///
/// Each variant is one atomic unit: replaying it applies every effect it
/// implies (a `Borrow` both inserts the loan and clears availability).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Operation {
    /// Insert a new book with its assigned id
    AddBook { book: Book },

    /// Delete a book and any loan referencing it
    RemoveBook { book_id: BookId },

    /// Register a borrower
    AddBorrower { borrower: Borrower },

    /// Delete a borrower and release every book they hold
    RemoveBorrower { borrower_id: BorrowerId },

    /// Open a loan; the book becomes unavailable
    Borrow { loan: Loan },

    /// Close a loan; the book becomes available
    Return { loan: Loan },
}

impl Operation {
    /// Short name used in logs
    pub fn kind(&self) -> &'static str {
        match self {
            Operation::AddBook { .. } => "add_book",
            Operation::RemoveBook { .. } => "remove_book",
            Operation::AddBorrower { .. } => "add_borrower",
            Operation::RemoveBorrower { .. } => "remove_borrower",
            Operation::Borrow { .. } => "borrow",
            Operation::Return { .. } => "return",
        }
    }
}

/// Decoded record header
#[derive(Debug, Clone, Copy)]
pub(crate) struct EntryHeader {
    pub lsn: u64,
    pub crc: u32,
    pub len: u32,
}

impl EntryHeader {
    pub(crate) fn decode(mut bytes: &[u8]) -> Result<Self> {
        if bytes.len() < HEADER_SIZE {
            return Err(ShelfError::WalCorruption(format!(
                "Incomplete header: expected {} bytes, got {}",
                HEADER_SIZE,
                bytes.len()
            )));
        }

        let lsn = bytes.get_u64_le();
        let crc = bytes.get_u32_le();
        let len = bytes.get_u32_le();

        if len > MAX_PAYLOAD_SIZE {
            return Err(ShelfError::WalCorruption(format!(
                "Payload too large: {} bytes (max {})",
                len, MAX_PAYLOAD_SIZE
            )));
        }

        Ok(Self { lsn, crc, len })
    }
}

impl WalEntry {
    /// Create an entry stamped with the current time
    pub fn new(lsn: u64, operation: Operation) -> Self {
        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0);

        Self {
            lsn,
            operation,
            timestamp,
        }
    }

    /// Encode as `[LSN][CRC][Len][Data]`
    ///
    /// Payloads over `MAX_PAYLOAD_SIZE` are refused here, since the reader
    /// would treat them as corruption.
    pub fn serialize(&self) -> Result<Vec<u8>> {
        let payload = bincode::serialize(self)?;

        let len = u32::try_from(payload.len())
            .ok()
            .filter(|&len| len <= MAX_PAYLOAD_SIZE)
            .ok_or_else(|| {
                ShelfError::InvalidInput(format!(
                    "{} record of {} bytes exceeds the {} byte limit",
                    self.operation.kind(),
                    payload.len(),
                    MAX_PAYLOAD_SIZE
                ))
            })?;

        let mut buf = BytesMut::with_capacity(HEADER_SIZE + payload.len());
        buf.put_u64_le(self.lsn);
        buf.put_u32_le(Self::compute_crc(&payload));
        buf.put_u32_le(len);
        buf.put_slice(&payload);

        Ok(buf.to_vec())
    }

    /// Decode one framed entry, verifying length and checksum
    pub fn deserialize(bytes: &[u8]) -> Result<Self> {
        let header = EntryHeader::decode(bytes)?;

        let total_len = HEADER_SIZE + header.len as usize;
        if bytes.len() < total_len {
            return Err(ShelfError::WalCorruption(format!(
                "Incomplete payload: expected {} bytes, got {}",
                total_len,
                bytes.len()
            )));
        }

        Self::decode_payload(&header, &bytes[HEADER_SIZE..total_len])
    }

    /// Verify and decode a payload whose header was already read
    pub(crate) fn decode_payload(header: &EntryHeader, payload: &[u8]) -> Result<Self> {
        let actual = Self::compute_crc(payload);
        if actual != header.crc {
            return Err(ShelfError::WalCorruption(format!(
                "CRC mismatch at lsn {}: expected {:08x}, got {:08x}",
                header.lsn, header.crc, actual
            )));
        }

        let entry: WalEntry = bincode::deserialize(payload)?;
        if entry.lsn != header.lsn {
            return Err(ShelfError::WalCorruption(format!(
                "LSN mismatch: header {}, payload {}",
                header.lsn, entry.lsn
            )));
        }

        Ok(entry)
    }

    /// CRC32 of the encoded payload
    pub fn compute_crc(payload: &[u8]) -> u32 {
        crc32fast::hash(payload)
    }
}
