//! Table layout and whole-block codec.
//!
//! A cardfile is exactly one serialized [`Table`]: a 16-byte header
//! followed by [`SLOT_COUNT`] fixed-size records in ascending slot
//! order. The block is the unit of file I/O; it is always read and
//! written in one piece.
//!
//! Header layout (16 bytes, integers little-endian):
//!
//! | Offset | Size | Field |
//! |--------|------|-------|
//! | 0x00   | 4    | Magic `"CARD"` |
//! | 0x04   | 2    | Format version (currently 1) |
//! | 0x06   | 2    | Slot count (always 100) |
//! | 0x08   | 2    | String field width (always 512) |
//! | 0x0A   | 6    | Reserved (zero) |

use crate::record::{RECORD_SIZE, Record};
use crate::{FIELD_SIZE, Result, SLOT_COUNT, StoreError};

/// Magic bytes at the start of every cardfile.
pub const MAGIC: [u8; 4] = *b"CARD";

/// Current on-disk format version.
pub const FORMAT_VERSION: u16 = 1;

/// Table header size in bytes.
pub const HEADER_SIZE: usize = 16;

/// Size of the full serialized table block in bytes.
pub const TABLE_BLOCK_SIZE: usize = HEADER_SIZE + SLOT_COUNT * RECORD_SIZE;

/// Fixed 16-byte header preceding the record slots.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableHeader {
    /// On-disk format version.
    pub version: u16,
    /// Number of record slots in the file.
    pub slot_count: u16,
    /// Width of each string field in bytes.
    pub field_size: u16,
}

impl Default for TableHeader {
    fn default() -> Self {
        Self {
            version: FORMAT_VERSION,
            slot_count: SLOT_COUNT as u16,
            field_size: FIELD_SIZE as u16,
        }
    }
}

impl TableHeader {
    /// Serialize the header to bytes.
    pub fn to_bytes(&self) -> [u8; HEADER_SIZE] {
        let mut buf = [0u8; HEADER_SIZE];
        buf[0..4].copy_from_slice(&MAGIC);
        buf[4..6].copy_from_slice(&self.version.to_le_bytes());
        buf[6..8].copy_from_slice(&self.slot_count.to_le_bytes());
        buf[8..10].copy_from_slice(&self.field_size.to_le_bytes());
        // bytes 10..16 reserved (zero)
        buf
    }

    /// Parse and validate a header.
    ///
    /// Rejects foreign files (bad magic), files written by a newer
    /// format version, and files whose geometry does not match this
    /// build's fixed layout.
    pub fn from_bytes(data: &[u8; HEADER_SIZE]) -> Result<Self> {
        let found: [u8; 4] = [data[0], data[1], data[2], data[3]];
        if found != MAGIC {
            return Err(StoreError::BadMagic { found });
        }

        let version = u16::from_le_bytes([data[4], data[5]]);
        if version > FORMAT_VERSION {
            return Err(StoreError::UnsupportedVersion { found: version });
        }

        let slot_count = u16::from_le_bytes([data[6], data[7]]);
        let field_size = u16::from_le_bytes([data[8], data[9]]);
        if slot_count as usize != SLOT_COUNT || field_size as usize != FIELD_SIZE {
            return Err(StoreError::BadGeometry {
                slots: slot_count,
                field: field_size,
            });
        }

        Ok(Self {
            version,
            slot_count,
            field_size,
        })
    }
}

/// The in-memory mirror of one cardfile: a fixed sequence of
/// [`SLOT_COUNT`] record slots indexed by position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    slots: Vec<Record>,
}

impl Default for Table {
    fn default() -> Self {
        Self::new()
    }
}

impl Table {
    /// Create a table with every slot unoccupied.
    pub fn new() -> Self {
        Self {
            slots: (0..SLOT_COUNT as u32).map(Record::empty).collect(),
        }
    }

    /// Reset every slot to its unoccupied state.
    pub fn reset(&mut self) {
        for (id, slot) in self.slots.iter_mut().enumerate() {
            *slot = Record::empty(id as u32);
        }
    }

    /// Borrow the slot at `id`.
    ///
    /// Returns `None` when `id` is outside `0..SLOT_COUNT`.
    pub fn slot(&self, id: u32) -> Option<&Record> {
        self.slots.get(id as usize)
    }

    /// Mutably borrow the slot at `id`.
    pub fn slot_mut(&mut self, id: u32) -> Option<&mut Record> {
        self.slots.get_mut(id as usize)
    }

    /// Iterate over all occupied slots in ascending id order.
    pub fn occupied(&self) -> impl Iterator<Item = &Record> {
        self.slots.iter().filter(|slot| slot.occupied)
    }

    /// Serialize the full table block (header + all slots).
    pub fn to_block(&self) -> Vec<u8> {
        let mut data = Vec::with_capacity(TABLE_BLOCK_SIZE);
        data.extend_from_slice(&TableHeader::default().to_bytes());
        for slot in &self.slots {
            data.extend_from_slice(&slot.to_bytes());
        }
        data
    }

    /// Deserialize a table from a full block.
    ///
    /// `data` must hold at least [`TABLE_BLOCK_SIZE`] bytes; anything
    /// shorter is a truncated or foreign file. The slot position is
    /// authoritative for each record's id.
    pub fn from_block(data: &[u8]) -> Result<Self> {
        if data.len() < TABLE_BLOCK_SIZE {
            return Err(StoreError::TruncatedTable {
                got: data.len(),
                expected: TABLE_BLOCK_SIZE,
            });
        }

        let header_bytes: [u8; HEADER_SIZE] = data[..HEADER_SIZE]
            .try_into()
            .map_err(|_| StoreError::TruncatedTable {
                got: data.len(),
                expected: TABLE_BLOCK_SIZE,
            })?;
        TableHeader::from_bytes(&header_bytes)?;

        let mut slots = Vec::with_capacity(SLOT_COUNT);
        for id in 0..SLOT_COUNT {
            let offset = HEADER_SIZE + id * RECORD_SIZE;
            let record_bytes: &[u8; RECORD_SIZE] = data[offset..offset + RECORD_SIZE]
                .try_into()
                .map_err(|_| StoreError::TruncatedTable {
                    got: data.len(),
                    expected: TABLE_BLOCK_SIZE,
                })?;
            let mut record = Record::from_bytes(record_bytes);
            record.id = id as u32;
            slots.push(record);
        }

        Ok(Self { slots })
    }
}
