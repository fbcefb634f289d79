//! Typed values for the enumerated register fields, and the bring-up
//! settings applied by [`Max7360::configure`](crate::Max7360::configure).

use crate::registers::{
    DEBOUNCE_MASK, DEBOUNCE_MS_MAX, DEBOUNCE_MS_OFFSET, GPIO_CONFIG_FADE_TIME_MASK,
    GPO_ENABLE_MASK, GPO_ENABLE_SHIFT, PORT_BLINK_ON_TIME_MASK, PORT_BLINK_PERIOD_MASK,
    PORT_BLINK_PERIOD_SHIFT,
};

// ---------------------------------------------------------------------------
// Debounce
// ---------------------------------------------------------------------------

/// Encode a debounce time for the D4–D0 field of register `0x02`.
///
/// The field stores `ms - 9`; values outside 9–40 ms are clamped.
pub const fn debounce_to_field(ms: u8) -> u8 {
    let ms = if ms < DEBOUNCE_MS_OFFSET {
        DEBOUNCE_MS_OFFSET
    } else if ms > DEBOUNCE_MS_MAX {
        DEBOUNCE_MS_MAX
    } else {
        ms
    };
    ms - DEBOUNCE_MS_OFFSET
}

/// Decode the debounce time in milliseconds from a raw register `0x02`.
pub const fn debounce_from_register(raw: u8) -> u8 {
    (raw & DEBOUNCE_MASK) + DEBOUNCE_MS_OFFSET
}

// ---------------------------------------------------------------------------
// GPO enable
// ---------------------------------------------------------------------------

/// Which COL pins are taken away from the key matrix and used as GPO.
///
/// The power-on value is [`GpoMode::Col7To2`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum GpoMode {
    /// All eight columns scan keys.
    #[default]
    Disabled = 0,
    Col7 = 1,
    Col7To6 = 2,
    Col7To5 = 3,
    Col7To4 = 4,
    Col7To3 = 5,
    Col7To2 = 6,
}

impl GpoMode {
    /// Value shifted into the D7–D5 field of register `0x02`.
    pub const fn field(self) -> u8 {
        (self as u8) << GPO_ENABLE_SHIFT
    }

    /// Decode from a raw register `0x02`.
    ///
    /// The encoding `7` is not defined by the chip; it is reported as
    /// `None`.
    pub const fn from_register(raw: u8) -> Option<Self> {
        match (raw & GPO_ENABLE_MASK) >> GPO_ENABLE_SHIFT {
            0 => Some(GpoMode::Disabled),
            1 => Some(GpoMode::Col7),
            2 => Some(GpoMode::Col7To6),
            3 => Some(GpoMode::Col7To5),
            4 => Some(GpoMode::Col7To4),
            5 => Some(GpoMode::Col7To3),
            6 => Some(GpoMode::Col7To2),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Port blink
// ---------------------------------------------------------------------------

/// Blink period of a port (D4–D2 of its config register).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum BlinkPeriod {
    /// Blinking disabled.
    #[default]
    Off = 0,
    Ms256 = 1,
    Ms512 = 2,
    Ms1024 = 3,
    Ms2048 = 4,
    Ms4096 = 5,
}

impl BlinkPeriod {
    pub const fn field(self) -> u8 {
        ((self as u8) << PORT_BLINK_PERIOD_SHIFT) & PORT_BLINK_PERIOD_MASK
    }
}

/// Fraction of the blink period a port is lit (D1–D0 of its config register).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum BlinkOnTime {
    #[default]
    Percent50 = 0,
    Percent25 = 1,
    Percent12_5 = 2,
    Percent6_25 = 3,
}

impl BlinkOnTime {
    pub const fn field(self) -> u8 {
        (self as u8) & PORT_BLINK_ON_TIME_MASK
    }
}

// ---------------------------------------------------------------------------
// Fade
// ---------------------------------------------------------------------------

/// Ramp time of the common PWM ratio (D2–D0 of register `0x40`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum FadeTime {
    #[default]
    Disabled = 0,
    Ms256 = 1,
    Ms512 = 2,
    Ms1024 = 3,
    Ms2048 = 4,
    Ms4096 = 5,
}

impl FadeTime {
    pub const fn field(self) -> u8 {
        (self as u8) & GPIO_CONFIG_FADE_TIME_MASK
    }

    /// Ramp duration in milliseconds; zero when disabled.
    pub const fn millis(self) -> u64 {
        match self {
            FadeTime::Disabled => 0,
            _ => 128 << (self as u64),
        }
    }
}

// ---------------------------------------------------------------------------
// Bring-up settings
// ---------------------------------------------------------------------------

/// Settings applied once after reset.
///
/// `Default` leaves the chip at its power-on values except for
/// [`gpo_mode`](Self::gpo_mode), which is [`GpoMode::Disabled`] so that
/// every column scans keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Max7360Config {
    /// Debounce time, 9–40 ms.
    pub debounce_ms: u8,
    pub gpo_mode: GpoMode,
    /// Report key releases in the FIFO.
    pub key_release: bool,
    /// Wake from sleep on key press.
    pub auto_wakeup: bool,
    /// Clear /INTK on host read instead of on FIFO empty.
    pub clear_interrupt_on_read: bool,
    pub disable_i2c_timeouts: bool,
    /// Enable the GPIO, constant-current and PWM blocks.
    pub gpio_enabled: bool,
    /// Use PORT6/PORT7 as a quadrature rotary encoder.
    pub rotary_encoder: bool,
    /// Output ports, one bit per port.
    pub gpio_direction: u8,
    pub fade_time: FadeTime,
}

impl Default for Max7360Config {
    fn default() -> Self {
        Self {
            debounce_ms: 40,
            gpo_mode: GpoMode::Disabled,
            key_release: true,
            auto_wakeup: true,
            clear_interrupt_on_read: false,
            disable_i2c_timeouts: false,
            gpio_enabled: false,
            rotary_encoder: false,
            gpio_direction: 0x00,
            fade_time: FadeTime::Disabled,
        }
    }
}
