//! Fixed-slot single-file address record store.
//!
//! A cardfile is one binary file holding a table of exactly
//! [`SLOT_COUNT`] fixed-size records, addressed by their position
//! (which doubles as the record id). The whole table is read and
//! written as a single block; there is no paging, no journal, and no
//! support for concurrent writers.
//!
//! # Example
//!
//! ```rust,no_run
//! use cardfile_store::{OpenMode, RecordStore};
//!
//! # fn example() -> cardfile_store::Result<()> {
//! let mut store = RecordStore::open("addresses.db", OpenMode::Create)?;
//! store.set(0, "Alice", "a@x.com")?;
//! store.persist()?;
//! store.close()?;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![allow(clippy::must_use_candidate)]

use std::path::PathBuf;

use thiserror::Error;

// Record encoding
pub mod record;

// Table layout and block codec
pub mod table;

// Store handle and operations
pub mod store;

pub use record::Record;
pub use store::{OpenMode, RecordStore};
pub use table::{Table, TableHeader};

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;

/// Errors that can occur during store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The database file could not be opened.
    #[error("failed to open {path}: {source}")]
    Open {
        /// Path that was being opened.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The file ended before a complete table could be read.
    #[error("truncated table: read {got} of {expected} bytes")]
    TruncatedTable {
        /// Bytes actually available.
        got: usize,
        /// Bytes a full table occupies.
        expected: usize,
    },

    /// The file does not start with the cardfile magic.
    #[error("not a cardfile (bad magic {found:02x?})")]
    BadMagic {
        /// First four bytes of the file.
        found: [u8; 4],
    },

    /// The file was written by an incompatible format version.
    #[error("unsupported format version {found} (max {max})", max = table::FORMAT_VERSION)]
    UnsupportedVersion {
        /// Version found in the header.
        found: u16,
    },

    /// The header geometry does not match this build's fixed layout.
    #[error("incompatible table geometry: {slots} slots x {field}-byte fields")]
    BadGeometry {
        /// Slot count found in the header.
        slots: u16,
        /// String field width found in the header.
        field: u16,
    },

    /// Writing the table block failed.
    #[error("failed to write table: {source}")]
    Write {
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// Flushing the table block to durable storage failed.
    #[error("failed to flush table: {source}")]
    Flush {
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// `set` on a slot that already holds a record.
    #[error("slot {id} is already set, delete it first")]
    AlreadySet {
        /// The occupied slot id.
        id: u32,
    },

    /// `get` on a slot that holds no record.
    #[error("slot {id} is not set")]
    NotSet {
        /// The empty slot id.
        id: u32,
    },

    /// A slot id outside `0..SLOT_COUNT`.
    #[error("slot id {id} out of range (0..{max})", max = SLOT_COUNT)]
    OutOfRange {
        /// The rejected id.
        id: u32,
    },
}

/// Number of record slots in every cardfile.
pub const SLOT_COUNT: usize = 100;

/// Width of the name and email fields in bytes, terminator included.
///
/// Content is capped at `FIELD_SIZE - 1` bytes so the stored copy is
/// always NUL-terminated, even after truncation.
pub const FIELD_SIZE: usize = 512;

/// Version information for the store.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
