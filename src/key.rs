//! Key-switch FIFO decoding.
//!
//! Every read of register `0x00` pops one byte from the chip's event FIFO.
//! The byte is either one of a handful of reserved codes or a key event
//! laid out as:
//!
//! ```text
//!  D7     D6        D5..D0
//!  last   released  key index
//! ```
//!
//! `D7` clear means more events are queued behind this one. Indices 62 and
//! 63 collide with the reserved codes (`0x3E`/`0x3F` and their `D6`
//! variants), so the chip reports those two keys only with `D7` set.

use core::fmt;

use crate::mapping::KeyMapping;

/// Number of addressable keys in the 8×8 matrix.
pub const MAX_KEYS: usize = 64;

pub const FIFO_EMPTY: u8 = 0b0011_1111;
pub const FIFO_OVERFLOW: u8 = 0b0111_1111;
pub const FIFO_KEY63_PRESSED: u8 = 0b1011_1111;
pub const FIFO_KEY63_RELEASED: u8 = 0b1111_1111;
pub const FIFO_KEY_REPEAT_MORE: u8 = 0b0011_1110;
pub const FIFO_KEY_REPEAT_DONE: u8 = 0b0111_1110;
pub const FIFO_KEY62_PRESSED: u8 = 0b1011_1110;
pub const FIFO_KEY62_RELEASED: u8 = 0b1111_1110;

const FIFO_LAST_MASK: u8 = 0b1000_0000;
const FIFO_RELEASED_MASK: u8 = 0b0100_0000;
const FIFO_KEY_MASK: u8 = 0b0011_1111;

/// What a single FIFO byte reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Key {
    /// The FIFO has nothing queued.
    Empty,
    /// More events occurred than the FIFO could hold.
    Overflow,
    /// Key `index` (0–63) went down.
    Pressed(u8),
    /// Key `index` (0–63) came up.
    Released(u8),
    /// Auto-repeat of the last key; more repeats follow.
    RepeatMore,
    /// Auto-repeat of the last key; last one.
    RepeatDone,
}

impl Key {
    /// Classify a raw FIFO byte.
    ///
    /// Returns the event and whether more events remain queued. Total over
    /// all 256 inputs.
    pub const fn decode(raw: u8) -> (Key, bool) {
        match raw {
            FIFO_EMPTY => (Key::Empty, false),
            FIFO_OVERFLOW => (Key::Overflow, true),
            FIFO_KEY63_PRESSED => (Key::Pressed(63), true),
            FIFO_KEY63_RELEASED => (Key::Released(63), true),
            FIFO_KEY_REPEAT_MORE => (Key::RepeatMore, true),
            FIFO_KEY_REPEAT_DONE => (Key::RepeatDone, false),
            FIFO_KEY62_PRESSED => (Key::Pressed(62), true),
            FIFO_KEY62_RELEASED => (Key::Released(62), true),
            _ => {
                let more = raw & FIFO_LAST_MASK == 0;
                let index = raw & FIFO_KEY_MASK;
                if raw & FIFO_RELEASED_MASK != 0 {
                    (Key::Released(index), more)
                } else {
                    (Key::Pressed(index), more)
                }
            }
        }
    }

    /// Key index for press/release events.
    pub const fn index(&self) -> Option<u8> {
        match *self {
            Key::Pressed(index) | Key::Released(index) => Some(index),
            _ => None,
        }
    }
}

/// One decoded FIFO read.
///
/// Borrows the key mapping it was read with; the mapping is only consulted
/// by [`mapped_key`](Self::mapped_key).
#[derive(Clone, Copy)]
pub struct KeyEvent<'m> {
    raw: u8,
    key: Key,
    more: bool,
    mapping: Option<&'m dyn KeyMapping>,
}

impl<'m> KeyEvent<'m> {
    /// Decode `raw` with an optional symbol mapping attached.
    pub fn new(raw: u8, mapping: Option<&'m dyn KeyMapping>) -> Self {
        let (key, more) = Key::decode(raw);
        Self {
            raw,
            key,
            more,
            mapping,
        }
    }

    /// Decode `raw` without a mapping.
    pub fn from_raw(raw: u8) -> KeyEvent<'static> {
        KeyEvent::new(raw, None)
    }

    /// The byte as read from the FIFO.
    pub fn raw_value(&self) -> u8 {
        self.raw
    }

    /// Decoded event.
    pub fn key(&self) -> Key {
        self.key
    }

    /// `true` while further events remain queued in the FIFO.
    pub fn has_more(&self) -> bool {
        self.more
    }

    /// `true` if the FIFO had nothing queued.
    pub fn is_empty(&self) -> bool {
        self.key == Key::Empty
    }

    /// `true` if events were lost because the FIFO was full.
    pub fn is_overflow(&self) -> bool {
        self.key == Key::Overflow
    }

    /// `true` for key-up events.
    pub fn is_released(&self) -> bool {
        matches!(self.key, Key::Released(_))
    }

    /// `true` for auto-repeat events of the last pressed key.
    pub fn is_key_repeat(&self) -> bool {
        matches!(self.key, Key::RepeatMore | Key::RepeatDone)
    }

    /// Key index, if this event carries one.
    pub fn key_index(&self) -> Option<u8> {
        self.key.index()
    }

    /// Printable symbol for this event.
    ///
    /// With a mapping attached this is the mapping's entry for the key
    /// index (`None` for unassigned slots). Without one, the index is
    /// rendered as `'0' + index`. Events without a key index have no
    /// symbol.
    pub fn mapped_key(&self) -> Option<char> {
        let index = self.key.index()?;
        match self.mapping {
            Some(mapping) => mapping.symbol_for(index),
            None => Some(char::from(b'0' + index)),
        }
    }
}

impl fmt::Debug for KeyEvent<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyEvent")
            .field("raw", &self.raw)
            .field("key", &self.key)
            .field("more", &self.more)
            .field("symbol", &self.mapped_key())
            .finish()
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for KeyEvent<'_> {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(
            f,
            "KeyEvent {{ raw: {=u8:#04x}, key: {}, more: {}, symbol: {} }}",
            self.raw,
            self.key,
            self.more,
            self.mapped_key()
        )
    }
}
