//! Configuration for ShelfDB
//!
//! Centralized configuration with sensible defaults.

use std::path::PathBuf;

use crate::error::{Result, ShelfError};

/// Main configuration for a ShelfDB library
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Storage Configuration
    // -------------------------------------------------------------------------
    /// Root directory for all data files
    /// Internal structure:
    ///   {data_dir}/
    ///     ├── wal.log          (write-ahead log)
    ///     └── checkpoint.db    (full library image)
    pub data_dir: PathBuf,

    // -------------------------------------------------------------------------
    // WAL Configuration
    // -------------------------------------------------------------------------
    /// Sync strategy: how often to fsync WAL
    pub wal_sync_strategy: WalSyncStrategy,

    /// Number of WAL records after which the library writes a checkpoint
    /// and truncates the log
    pub checkpoint_threshold: usize,

    // -------------------------------------------------------------------------
    // Ledger Configuration
    // -------------------------------------------------------------------------
    /// What happens to loans when their book or borrower is removed
    pub removal_policy: RemovalPolicy,

    // -------------------------------------------------------------------------
    // Export Configuration
    // -------------------------------------------------------------------------
    /// Default directory for CSV snapshot exports
    pub export_dir: PathBuf,
}

/// WAL sync strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WalSyncStrategy {
    /// fsync after every write (safest, slowest)
    EveryWrite,

    /// fsync after N uncommitted entries (balanced durability/performance)
    EveryNEntries { count: usize },
}

impl WalSyncStrategy {
    /// fsync once every `entries` records; 1 means every write
    pub fn every(entries: usize) -> Self {
        match entries {
            1 => WalSyncStrategy::EveryWrite,
            count => WalSyncStrategy::EveryNEntries { count },
        }
    }
}

/// Policy applied when removing a book or borrower that is referenced by a loan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RemovalPolicy {
    /// Refuse the removal (`BookOnLoan` / `BorrowerHasLoans`)
    #[default]
    Reject,

    /// Delete the referencing loans in the same record
    Cascade,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("./shelf_data"),
            wal_sync_strategy: WalSyncStrategy::EveryWrite,
            checkpoint_threshold: 1000,
            removal_policy: RemovalPolicy::Reject,
            export_dir: PathBuf::from("."),
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Reject settings the library cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.checkpoint_threshold == 0 {
            return Err(ShelfError::Config(
                "checkpoint_threshold must be at least 1".to_string(),
            ));
        }

        if let WalSyncStrategy::EveryNEntries { count: 0 } = self.wal_sync_strategy {
            return Err(ShelfError::Config(
                "EveryNEntries sync count must be at least 1".to_string(),
            ));
        }

        Ok(())
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the data directory (root for all storage)
    pub fn data_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.data_dir = path.into();
        self
    }

    /// Set the WAL sync strategy
    pub fn wal_sync_strategy(mut self, strategy: WalSyncStrategy) -> Self {
        self.config.wal_sync_strategy = strategy;
        self
    }

    /// Set the number of WAL records between checkpoints
    pub fn checkpoint_threshold(mut self, records: usize) -> Self {
        self.config.checkpoint_threshold = records;
        self
    }

    /// Set the removal policy for referenced books and borrowers
    pub fn removal_policy(mut self, policy: RemovalPolicy) -> Self {
        self.config.removal_policy = policy;
        self
    }

    /// Set the default export directory
    pub fn export_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.export_dir = path.into();
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
