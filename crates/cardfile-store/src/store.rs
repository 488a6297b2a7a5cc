//! Store handle and record operations.
//!
//! [`RecordStore`] owns exactly one open file and the in-memory
//! [`Table`] mirroring it. Mutations touch only the mirror; nothing
//! reaches the file until [`RecordStore::persist`] rewrites the whole
//! block. Dropping the handle releases both resources on every exit
//! path; [`RecordStore::close`] consumes it after an explicit sync so
//! close-time errors are observable.

use std::fs::{File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::record::Record;
use crate::table::{TABLE_BLOCK_SIZE, Table};
use crate::{Result, StoreError};

/// How to open a cardfile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenMode {
    /// Start from an all-unoccupied table, truncating any existing
    /// file content. The new table is not durable until `persist`.
    Create,
    /// Load the table from existing file bytes and open read/write
    /// without truncation.
    Update,
}

/// Handle to one cardfile: an open file plus its in-memory table.
#[derive(Debug)]
pub struct RecordStore {
    path: PathBuf,
    file: File,
    table: Table,
}

impl RecordStore {
    /// Open a cardfile at `path`.
    ///
    /// In [`OpenMode::Update`] the file must hold one complete table
    /// block; a shorter file fails with `TruncatedTable` and a foreign
    /// or incompatible file fails with `BadMagic`, `UnsupportedVersion`
    /// or `BadGeometry`.
    pub fn open(path: impl AsRef<Path>, mode: OpenMode) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        match mode {
            OpenMode::Create => {
                let file = OpenOptions::new()
                    .write(true)
                    .create(true)
                    .truncate(true)
                    .open(&path)
                    .map_err(|source| StoreError::Open {
                        path: path.clone(),
                        source,
                    })?;

                info!(path = %path.display(), "created cardfile");
                Ok(Self {
                    path,
                    file,
                    table: Table::new(),
                })
            }
            OpenMode::Update => {
                let mut file = OpenOptions::new()
                    .read(true)
                    .write(true)
                    .open(&path)
                    .map_err(|source| StoreError::Open {
                        path: path.clone(),
                        source,
                    })?;

                let mut block = Vec::with_capacity(TABLE_BLOCK_SIZE);
                std::io::Read::by_ref(&mut file)
                    .take(TABLE_BLOCK_SIZE as u64)
                    .read_to_end(&mut block)
                    .map_err(|source| StoreError::Open {
                        path: path.clone(),
                        source,
                    })?;

                let table = Table::from_block(&block)?;
                debug!(path = %path.display(), "loaded table block");
                Ok(Self { path, file, table })
            }
        }
    }

    /// Path of the underlying file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reset every slot to its unoccupied state.
    ///
    /// Touches only the in-memory table; call [`Self::persist`] to
    /// make the reset durable.
    pub fn initialize(&mut self) {
        self.table.reset();
    }

    /// Serialize the table and overwrite the file in one write,
    /// syncing it to durable storage before returning.
    pub fn persist(&mut self) -> Result<()> {
        let block = self.table.to_block();

        self.file
            .seek(SeekFrom::Start(0))
            .and_then(|_| self.file.write_all(&block))
            .map_err(|source| StoreError::Write { source })?;
        self.file
            .sync_data()
            .map_err(|source| StoreError::Flush { source })?;

        debug!(path = %self.path.display(), bytes = block.len(), "persisted table");
        Ok(())
    }

    /// Place a record in slot `id`.
    ///
    /// Fails with `AlreadySet` if the slot holds a record; delete it
    /// first, there is no overwrite-in-place. Overlong `name` or
    /// `email` is silently truncated to the field capacity (a known
    /// sharp edge, see [`Record::with_fields`]). Not durable until
    /// [`Self::persist`].
    pub fn set(&mut self, id: u32, name: &str, email: &str) -> Result<()> {
        let slot = self
            .table
            .slot_mut(id)
            .ok_or(StoreError::OutOfRange { id })?;
        if slot.occupied {
            return Err(StoreError::AlreadySet { id });
        }

        *slot = Record::with_fields(id, name, email);
        debug!(id, "set record");
        Ok(())
    }

    /// Fetch the record in slot `id`.
    ///
    /// Fails with `NotSet` if the slot is unoccupied.
    pub fn get(&self, id: u32) -> Result<&Record> {
        let slot = self.table.slot(id).ok_or(StoreError::OutOfRange { id })?;
        if !slot.occupied {
            return Err(StoreError::NotSet { id });
        }
        Ok(slot)
    }

    /// Clear slot `id` unconditionally; clearing an empty slot is a
    /// no-op. Not durable until [`Self::persist`].
    pub fn delete(&mut self, id: u32) -> Result<()> {
        let slot = self
            .table
            .slot_mut(id)
            .ok_or(StoreError::OutOfRange { id })?;
        *slot = Record::empty(id);
        debug!(id, "deleted record");
        Ok(())
    }

    /// Iterate over all occupied slots in ascending id order.
    pub fn records(&self) -> impl Iterator<Item = &Record> {
        self.table.occupied()
    }

    /// Sync the file and release the handle.
    ///
    /// Dropping the handle also releases both resources; `close` only
    /// adds the explicit sync so errors surface instead of being
    /// swallowed by drop.
    pub fn close(self) -> Result<()> {
        self.file
            .sync_all()
            .map_err(|source| StoreError::Flush { source })?;
        debug!(path = %self.path.display(), "closed cardfile");
        Ok(())
    }
}
