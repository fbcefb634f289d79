//! Mapping from key-matrix positions to printable symbols.
//!
//! The MAX7360 numbers keys column-major: `KEY0`–`KEY7` are the eight rows
//! of COL0, `KEY8`–`KEY15` are COL1, and so on up to `KEY63`.
//!
//! ```text
//! Row   COL0  COL1  COL2  COL3  COL4  COL5  COL6  COL7
//! ROW0  0     8     16    24    32    40    48    56
//! ROW1  1     9     17    25    33    41    49    57
//!  ...
//! ROW7  7     15    23    31    39    47    55    63
//! ```
//!
//! A table only has to cover the columns actually wired; a 4×3 keypad on
//! COL0–COL2 needs 24 slots.

use crate::key::MAX_KEYS;

/// Translation between key indices and symbols.
pub trait KeyMapping {
    /// Symbol for a key index, or `None` if the slot is unassigned or
    /// outside the table.
    fn symbol_for(&self, index: u8) -> Option<char>;

    /// Lowest key index carrying `symbol`, if any.
    fn index_for(&self, symbol: char) -> Option<u8>;
}

/// Fixed-size table indexed by key number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyMappingTable<const N: usize> {
    slots: [Option<char>; N],
}

impl<const N: usize> KeyMappingTable<N> {
    const FITS: () = assert!(N <= MAX_KEYS, "a key table holds at most 64 slots");

    /// Build a table from explicit slots.
    pub const fn new(slots: [Option<char>; N]) -> Self {
        let () = Self::FITS;
        Self { slots }
    }

    /// Build a table from ASCII bytes, where `0` marks an unassigned slot.
    pub const fn from_ascii(table: &[u8; N]) -> Self {
        let () = Self::FITS;
        let mut slots = [None; N];
        let mut i = 0;
        while i < N {
            if table[i] != 0 {
                slots[i] = Some(table[i] as char);
            }
            i += 1;
        }
        Self { slots }
    }

    /// Number of slots.
    pub const fn len(&self) -> usize {
        N
    }

    pub const fn is_empty(&self) -> bool {
        N == 0
    }
}

impl<const N: usize> KeyMapping for KeyMappingTable<N> {
    fn symbol_for(&self, index: u8) -> Option<char> {
        self.slots.get(index as usize).copied().flatten()
    }

    fn index_for(&self, symbol: char) -> Option<u8> {
        self.slots
            .iter()
            .position(|slot| *slot == Some(symbol))
            .map(|i| i as u8)
    }
}

/// 4×3 phone keypad on COL0–COL2, rows 0–3.
///
/// Layout (e.g. Adafruit #1824):
///
/// ```text
/// 1 2 3
/// 4 5 6
/// 7 8 9
/// * 0 #
/// ```
pub const PHONE_KEYPAD: KeyMappingTable<24> = KeyMappingTable::from_ascii(&[
    b'1', b'4', b'7', b'*', 0, 0, 0, 0, //
    b'2', b'5', b'8', b'0', 0, 0, 0, 0, //
    b'3', b'6', b'9', b'#', 0, 0, 0, 0, //
]);
