//! MAX7360 register map.
//!
//! The chip exposes two blocks of 8-bit registers:
//! - `0x00`–`0x06`: key-switch FIFO, keypad configuration and GPO control
//! - `0x40`–`0x5F`: GPIO, PWM, fade and rotary-encoder configuration
//!
//! Per-port registers are addressed as `BASE + port` for ports 0–7.

// ---------------------------------------------------------------------------
// Device addressing
// ---------------------------------------------------------------------------

/// Default 7-bit I2C address (AD0 tied to GND).
pub const DEFAULT_ADDRESS: u8 = 0x38;

/// I2C address with AD0 tied to VCC.
pub const ADDRESS_AD0_VCC: u8 = 0x3A;

/// I2C address with AD0 tied to SDA.
pub const ADDRESS_AD0_SDA: u8 = 0x3C;

/// I2C address with AD0 tied to SCL.
pub const ADDRESS_AD0_SCL: u8 = 0x3E;

/// Addresses below this value are shorthand and get [`SHORT_ADDRESS_BASE`]
/// OR'd in.
pub const SHORT_ADDRESS_LIMIT: u8 = 0x04;

/// Base OR'd into shorthand addresses.
pub const SHORT_ADDRESS_BASE: u8 = 0x30;

/// Number of GPIO/LED ports (PORT0–PORT7).
pub const PORT_COUNT: u8 = 8;

/// Depth of the key-event FIFO.
pub const FIFO_DEPTH: usize = 16;

// ---------------------------------------------------------------------------
// Keypad block
// ---------------------------------------------------------------------------

/// Key event FIFO. Each read pops one event.
pub const REG_KEYS_FIFO: u8 = 0x00;

/// Global configuration register.
pub const REG_CONFIG: u8 = 0x01;
/// Sleep mode (D7).
pub const CONFIG_SLEEP_MASK: u8 = 0x80;
/// Clear /INTK on host read instead of on FIFO empty (D5).
pub const CONFIG_INTERRUPT_MASK: u8 = 0x20;
/// Report key releases in the FIFO (D3).
pub const CONFIG_KEY_RELEASE_MASK: u8 = 0x08;
/// Wake up from sleep on key press (D1).
pub const CONFIG_AUTO_WAKEUP_MASK: u8 = 0x02;
/// Disable I2C bus timeouts (D0).
pub const CONFIG_TIMEOUT_DISABLE_MASK: u8 = 0x01;

/// Debounce time and GPO enable.
pub const REG_DEBOUNCE: u8 = 0x02;
/// Debounce field, D4–D0.
pub const DEBOUNCE_MASK: u8 = 0x1F;
/// Millisecond value encoded by a debounce field of zero.
pub const DEBOUNCE_MS_OFFSET: u8 = 9;
/// Largest encodable debounce time.
pub const DEBOUNCE_MS_MAX: u8 = DEBOUNCE_MS_OFFSET + DEBOUNCE_MASK;
/// GPO enable field, D7–D5.
pub const GPO_ENABLE_MASK: u8 = 0xE0;
/// Bit offset of the GPO enable field.
pub const GPO_ENABLE_SHIFT: u8 = 5;

/// /INTK key-switch interrupt control.
pub const REG_KEY_SWITCH_INTERRUPT: u8 = 0x03;
/// COL pins and /INTK used as GPO.
pub const REG_GPO_CONTROL: u8 = 0x04;
/// Auto-repeat settings.
pub const REG_AUTO_REPEAT: u8 = 0x05;
/// Auto-sleep settings.
pub const REG_AUTO_SLEEP: u8 = 0x06;

// ---------------------------------------------------------------------------
// GPIO block
// ---------------------------------------------------------------------------

/// Global GPIO configuration.
pub const REG_GPIO_CONFIG: u8 = 0x40;
/// Rotary encoder on PORT6/PORT7 (D7).
pub const GPIO_CONFIG_ROTARY_MASK: u8 = 0x80;
/// /INTI signals I2C timeouts (D5).
pub const GPIO_CONFIG_I2C_TIMEOUT_MASK: u8 = 0x20;
/// GPIO, constant-current and PWM blocks enabled (D4).
pub const GPIO_CONFIG_ENABLE_MASK: u8 = 0x10;
/// Reset 0x40–0x5F to power-on values; self-clearing (D3).
pub const GPIO_CONFIG_RESET_MASK: u8 = 0x08;
/// Common-PWM fade time, D2–D0.
pub const GPIO_CONFIG_FADE_TIME_MASK: u8 = 0x07;

/// GPIO direction, one bit per port (1 = output).
pub const REG_GPIO_CONTROL: u8 = 0x41;

/// GPIO output mode, one bit per port (1 = non-constant-current).
pub const REG_GPIO_OUTPUT_MODE: u8 = 0x44;

/// Common PWM ratio.
pub const REG_COMMON_PWM_RATIO: u8 = 0x45;

/// Rotary switch configuration.
pub const REG_ROTARY_SWITCH_CONFIG: u8 = 0x46;

/// I2C timeout flag, cleared on read.
pub const REG_I2C_TIMEOUT_FLAG: u8 = 0x48;
/// Set when a bus timeout occurred (D0).
pub const I2C_TIMEOUT_FLAG_MASK: u8 = 0x01;

/// GPIO input levels (read-only).
pub const REG_GPIO_INPUT: u8 = 0x49;

/// Rotary switch counter, signed, cleared on read.
pub const REG_GPIO_ROTARY_SWITCH_COUNT: u8 = 0x4A;

/// Base of the per-port PWM ratio registers (0x50–0x57).
pub const REG_PORT_PWM_RATIO: u8 = 0x50;

/// Base of the per-port configuration registers (0x58–0x5F).
pub const REG_PORT_CONFIG: u8 = 0x58;
/// Port interrupt enable (D7).
pub const PORT_INTERRUPT_MASK: u8 = 0x80;
/// Interrupt on both edges instead of rising only (D6).
pub const PORT_EDGE_MASK: u8 = 0x40;
/// Use the common PWM ratio instead of the port's own (D5).
pub const PORT_COMMON_PWM_MASK: u8 = 0x20;
/// Blink period field, D4–D2.
pub const PORT_BLINK_PERIOD_MASK: u8 = 0x1C;
/// Bit offset of the blink period field.
pub const PORT_BLINK_PERIOD_SHIFT: u8 = 2;
/// Blink on-time field, D1–D0.
pub const PORT_BLINK_ON_TIME_MASK: u8 = 0x03;

// ---------------------------------------------------------------------------
// GPIO port masks
// ---------------------------------------------------------------------------

// Bit of each port in the one-bit-per-port registers (direction, output
// mode, input levels).

/// PORT0.
pub const PORT0_MASK: u8 = 0b0000_0001;
/// PORT1.
pub const PORT1_MASK: u8 = 0b0000_0010;
/// PORT2.
pub const PORT2_MASK: u8 = 0b0000_0100;
/// PORT3.
pub const PORT3_MASK: u8 = 0b0000_1000;
/// PORT4.
pub const PORT4_MASK: u8 = 0b0001_0000;
/// PORT5.
pub const PORT5_MASK: u8 = 0b0010_0000;
/// PORT6.
pub const PORT6_MASK: u8 = 0b0100_0000;
/// PORT7.
pub const PORT7_MASK: u8 = 0b1000_0000;

// ---------------------------------------------------------------------------
// Power-on defaults
// ---------------------------------------------------------------------------

/// Power-on values of registers 0x01–0x06, in address order.
pub const KEYPAD_DEFAULTS: [(u8, u8); 6] = [
    (REG_CONFIG, 0b0000_1010),
    (REG_DEBOUNCE, 0xFF),
    (REG_KEY_SWITCH_INTERRUPT, 0x00),
    (REG_GPO_CONTROL, 0b1111_1110),
    (REG_AUTO_REPEAT, 0x00),
    (REG_AUTO_SLEEP, 0b0000_0111),
];
