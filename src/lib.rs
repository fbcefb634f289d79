//! Blocking I2C driver for the MAX7360 key-switch controller, LED driver
//! and GPIO expander.
//!
//! The MAX7360 scans an 8×8 key matrix into a 16-entry event FIFO and
//! drives eight GPIO ports with constant-current sinks, per-port PWM,
//! hardware blinking, common-PWM fading and an optional rotary encoder on
//! PORT6/PORT7.
//!
//! # Architecture
//!
//! - [`registers`]: register addresses, bitmasks and power-on defaults
//! - `driver` (private): single-byte register reads/writes and masked
//!   read-modify-write over any [`embedded_hal::i2c::I2c`]
//! - [`key`]: decoding of raw FIFO bytes into [`KeyEvent`]s
//! - [`mapping`]: translation from key indices to printable symbols
//! - [`config`]: typed field values and the [`Max7360Config`] bring-up
//!   settings
//! - [`max7360`]: the [`Max7360`] facade
//! - [`sequence`]: the RGB LED animation used by the hardware test
//!
//! # Quick Start
//!
//! ```ignore
//! use max7360_driver::{Max7360, Max7360Config, DEFAULT_ADDRESS, PHONE_KEYPAD};
//!
//! let mut keypad = Max7360::new(i2c, DEFAULT_ADDRESS).with_key_mapping(&PHONE_KEYPAD);
//! keypad.reset_register_defaults()?;
//! keypad.configure(&Max7360Config::default())?;
//!
//! for event in keypad.drain_key_fifo()? {
//!     if let Some(symbol) = event.mapped_key() {
//!         // ...
//!     }
//! }
//! ```
//!
//! # Crate Features
//!
//! - **`defmt`** — structured logging of register traffic and `defmt::Format`
//!   impls for the public types.

#![no_std]

#[cfg(test)]
#[macro_use]
extern crate std;

pub mod config;
mod driver;
pub mod error;
pub mod key;
pub mod mapping;
pub mod max7360;
pub mod registers;
pub mod sequence;

#[cfg(test)]
mod testing;

// ── Re-exports for convenience ───────────────────────────────────────────

pub use config::{BlinkOnTime, BlinkPeriod, FadeTime, GpoMode, Max7360Config};
pub use error::Max7360Error;
pub use key::{Key, KeyEvent};
pub use mapping::{KeyMapping, KeyMappingTable, PHONE_KEYPAD};
pub use max7360::Max7360;
pub use registers::{
    ADDRESS_AD0_SCL, ADDRESS_AD0_SDA, ADDRESS_AD0_VCC, DEFAULT_ADDRESS, FIFO_DEPTH, PORT_COUNT,
};
pub use sequence::{LedSequence, LedState};
