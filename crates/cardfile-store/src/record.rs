//! Fixed-width record encoding.
//!
//! Every slot in a cardfile serializes to the same 1032-byte layout,
//! so record `N` always lives at the same file offset. String fields
//! are fixed-width, zero-padded, and always NUL-terminated; overlong
//! input is silently truncated (see [`Record::with_fields`]).
//!
//! Layout (1032 bytes total, all integers little-endian):
//!
//! | Offset | Size | Field |
//! |--------|------|-------|
//! | 0x000  | 4    | Slot id (equals position in the table) |
//! | 0x004  | 1    | Occupied flag (0 or 1) |
//! | 0x005  | 3    | Reserved (zero) |
//! | 0x008  | 512  | Name, zero-padded, NUL-terminated |
//! | 0x208  | 512  | Email, zero-padded, NUL-terminated |

use std::fmt;

use crate::FIELD_SIZE;

/// Size of one serialized record in bytes.
pub const RECORD_SIZE: usize = 8 + 2 * FIELD_SIZE;

/// Maximum content bytes stored per string field.
///
/// One byte of each field is reserved for the terminator.
pub const MAX_FIELD_CONTENT: usize = FIELD_SIZE - 1;

const NAME_RANGE: std::ops::Range<usize> = 8..8 + FIELD_SIZE;
const EMAIL_RANGE: std::ops::Range<usize> = 8 + FIELD_SIZE..RECORD_SIZE;

/// One address record, occupying a fixed slot in the table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    /// Slot id, equal to the record's position in the table.
    pub id: u32,
    /// Whether the slot currently holds a live record.
    pub occupied: bool,
    /// Contact name. Empty when the slot is unoccupied.
    pub name: String,
    /// Contact email. Empty when the slot is unoccupied.
    pub email: String,
}

impl Record {
    /// Create an unoccupied record for the given slot.
    pub const fn empty(id: u32) -> Self {
        Self {
            id,
            occupied: false,
            name: String::new(),
            email: String::new(),
        }
    }

    /// Create an occupied record, clamping `name` and `email` to the
    /// field capacity.
    ///
    /// Input longer than [`MAX_FIELD_CONTENT`] bytes is silently cut
    /// at the largest UTF-8 boundary that fits. The stored copy is
    /// always NUL-terminated. This mirrors the historical flat-file
    /// behavior and is a known sharp edge: callers get no signal that
    /// truncation happened.
    pub fn with_fields(id: u32, name: &str, email: &str) -> Self {
        Self {
            id,
            occupied: true,
            name: clamp_field(name).to_owned(),
            email: clamp_field(email).to_owned(),
        }
    }

    /// Serialize the record to its fixed 1032-byte layout.
    pub fn to_bytes(&self) -> [u8; RECORD_SIZE] {
        let mut buf = [0u8; RECORD_SIZE];

        buf[0..4].copy_from_slice(&self.id.to_le_bytes());
        buf[4] = u8::from(self.occupied);
        // bytes 5..8 reserved (zero)

        write_field(&mut buf[NAME_RANGE], &self.name);
        write_field(&mut buf[EMAIL_RANGE], &self.email);

        buf
    }

    /// Parse a record from its fixed 1032-byte layout.
    ///
    /// Unoccupied slots decode with empty string fields regardless of
    /// what the padding bytes contain.
    pub fn from_bytes(data: &[u8; RECORD_SIZE]) -> Self {
        let id = u32::from_le_bytes([data[0], data[1], data[2], data[3]]);
        let occupied = data[4] != 0;

        let (name, email) = if occupied {
            (read_field(&data[NAME_RANGE]), read_field(&data[EMAIL_RANGE]))
        } else {
            (String::new(), String::new())
        };

        Self {
            id,
            occupied,
            name,
            email,
        }
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.id, self.name, self.email)
    }
}

/// Cut `value` at the largest char boundary that fits the field.
fn clamp_field(value: &str) -> &str {
    if value.len() <= MAX_FIELD_CONTENT {
        return value;
    }
    let mut end = MAX_FIELD_CONTENT;
    while !value.is_char_boundary(end) {
        end -= 1;
    }
    &value[..end]
}

fn write_field(field: &mut [u8], value: &str) {
    // Callers clamp on construction, but re-clamp so a Record built
    // by hand still serializes within bounds.
    let value = clamp_field(value);
    field[..value.len()].copy_from_slice(value.as_bytes());
    // Remaining bytes stay zero, terminator included.
}

fn read_field(field: &[u8]) -> String {
    let len = field.iter().position(|&b| b == 0).unwrap_or(field.len());
    String::from_utf8_lossy(&field[..len]).into_owned()
}

#[cfg(test)]
#[allow(clippy::expect_used)]
mod tests {
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn record_round_trip() {
        let record = Record::with_fields(7, "Alice", "a@x.com");
        let bytes = record.to_bytes();

        assert_eq!(bytes.len(), RECORD_SIZE);
        assert_eq!(Record::from_bytes(&bytes), record);
    }

    #[test]
    fn empty_record_has_blank_fields() {
        let record = Record::empty(3);
        let parsed = Record::from_bytes(&record.to_bytes());

        assert_eq!(parsed.id, 3);
        assert!(!parsed.occupied);
        assert_eq!(parsed.name, "");
        assert_eq!(parsed.email, "");
    }

    #[test]
    fn overlong_field_is_truncated_and_terminated() {
        let long = "x".repeat(FIELD_SIZE * 2);
        let record = Record::with_fields(0, &long, "a@x.com");

        assert_eq!(record.name.len(), MAX_FIELD_CONTENT);

        let bytes = record.to_bytes();
        // Last byte of the name field is the terminator.
        assert_eq!(bytes[8 + FIELD_SIZE - 1], 0);
        assert_eq!(Record::from_bytes(&bytes).name, record.name);
    }

    #[test]
    fn truncation_respects_char_boundaries() {
        // 'é' is two bytes; 256 of them land a boundary in the middle
        // of the 511-byte budget.
        let long = "é".repeat(FIELD_SIZE);
        let record = Record::with_fields(0, &long, "");

        assert!(record.name.len() <= MAX_FIELD_CONTENT);
        assert!(record.name.is_char_boundary(record.name.len()));
        assert_eq!(Record::from_bytes(&record.to_bytes()).name, record.name);
    }

    #[test]
    fn exact_capacity_field_fits() {
        let name = "n".repeat(MAX_FIELD_CONTENT);
        let record = Record::with_fields(0, &name, "");

        assert_eq!(record.name, name);
        assert_eq!(Record::from_bytes(&record.to_bytes()).name, name);
    }

    #[test]
    fn unoccupied_slot_ignores_field_bytes() {
        let mut bytes = Record::with_fields(5, "Bob", "b@x.com").to_bytes();
        bytes[4] = 0; // clear occupied flag, leave field bytes behind

        let parsed = Record::from_bytes(&bytes);
        assert!(!parsed.occupied);
        assert_eq!(parsed.name, "");
        assert_eq!(parsed.email, "");
    }

    proptest! {
        #[test]
        // NUL is excluded: embedded NULs terminate the stored copy
        // early, same as the flat C-string format this replaces.
        fn any_input_round_trips_within_bounds(name in "[^\\x00]{0,600}", email in "[^\\x00]{0,600}") {
            let record = Record::with_fields(42, &name, &email);
            prop_assert!(record.name.len() <= MAX_FIELD_CONTENT);
            prop_assert!(record.email.len() <= MAX_FIELD_CONTENT);

            let parsed = Record::from_bytes(&record.to_bytes());
            prop_assert_eq!(parsed, record);
        }
    }
}
