//! WAL Reader
//!
//! Handles reading entries from the WAL file.

use std::fs::File;
use std::io::{BufReader, ErrorKind, Read};
use std::path::Path;

use crate::error::{Result, ShelfError};
use super::entry::EntryHeader;
use super::{WalEntry, HEADER_SIZE};

/// Reads entries from the WAL file
pub struct WalReader {
    reader: BufReader<File>,
    /// Byte offset just past the last entry returned
    position: u64,
}

impl WalReader {
    /// Open a WAL file for reading
    pub fn open(path: &Path) -> Result<Self> {
        let file = File::open(path)?;
        Ok(Self {
            reader: BufReader::new(file),
            position: 0,
        })
    }

    /// Read the next entry from the WAL
    ///
    /// Returns:
    /// - `Ok(Some(entry))`: a complete, checksummed entry
    /// - `Ok(None)`: clean end of file
    /// - `Err(WalCorruption)`: torn write or checksum failure at `position()`
    pub fn next_entry(&mut self) -> Result<Option<WalEntry>> {
        let mut header_buf = [0u8; HEADER_SIZE];
        let read = self.read_full(&mut header_buf)?;

        if read == 0 {
            return Ok(None);
        }
        if read < HEADER_SIZE {
            return Err(ShelfError::WalCorruption(format!(
                "Torn header at offset {}: {} of {} bytes",
                self.position, read, HEADER_SIZE
            )));
        }

        let header = EntryHeader::decode(&header_buf)?;

        let mut payload = vec![0u8; header.len as usize];
        let read = self.read_full(&mut payload)?;
        if read < payload.len() {
            return Err(ShelfError::WalCorruption(format!(
                "Torn payload at offset {}: {} of {} bytes",
                self.position,
                read,
                payload.len()
            )));
        }

        let entry = WalEntry::decode_payload(&header, &payload)?;
        self.position += (HEADER_SIZE + payload.len()) as u64;

        Ok(Some(entry))
    }

    /// Offset of the first byte not yet covered by a valid entry
    pub fn position(&self) -> u64 {
        self.position
    }

    /// Iterate over all valid entries
    ///
    /// The iterator yields the first error it meets and then stops.
    pub fn entries(self) -> WalIterator {
        WalIterator {
            reader: self,
            done: false,
        }
    }

    /// Read until `buf` is full or EOF; returns bytes read
    fn read_full(&mut self, buf: &mut [u8]) -> Result<usize> {
        let mut filled = 0;
        while filled < buf.len() {
            match self.reader.read(&mut buf[filled..]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        }
        Ok(filled)
    }
}

/// Iterator over WAL entries
pub struct WalIterator {
    reader: WalReader,
    done: bool,
}

impl Iterator for WalIterator {
    type Item = Result<WalEntry>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        match self.reader.next_entry() {
            Ok(Some(entry)) => Some(Ok(entry)),
            Ok(None) => {
                self.done = true;
                None
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}
