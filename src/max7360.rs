//! High-level interface for the MAX7360.
//!
//! [`Max7360`] wraps the register driver with port validation, typed
//! field values and key-FIFO polling. Every bitfield setter is a single
//! masked read-modify-write, so settings that share a register never
//! disturb each other.

use embedded_hal::i2c::I2c;
use heapless::Vec;

use crate::config::{
    debounce_from_register, debounce_to_field, BlinkOnTime, BlinkPeriod, FadeTime, GpoMode,
    Max7360Config,
};
use crate::driver::RegisterDriver;
use crate::error::Max7360Error;
use crate::key::{KeyEvent, FIFO_EMPTY};
use crate::mapping::KeyMapping;
use crate::registers::*;

/// Resolve the constructor address shorthand: `0`–`3` become
/// `0x30 | address`, anything else is used as given.
pub const fn resolve_address(address: u8) -> u8 {
    if address < SHORT_ADDRESS_LIMIT {
        address | SHORT_ADDRESS_BASE
    } else {
        address
    }
}

/// High-level interface for the MAX7360 key-switch controller, LED driver
/// and GPIO expander.
///
/// Holds no copy of the chip's configuration: every getter reads the
/// hardware and every setter writes it immediately.
///
/// # Example
///
/// ```no_run
/// use max7360_driver::{GpoMode, Max7360, DEFAULT_ADDRESS, PHONE_KEYPAD};
///
/// # fn example(i2c: impl embedded_hal::i2c::I2c) -> Result<(), ()> {
/// let mut keypad = Max7360::new(i2c, DEFAULT_ADDRESS).with_key_mapping(&PHONE_KEYPAD);
///
/// keypad.reset_register_defaults().map_err(|_| ())?;
/// keypad.set_gpo_enable(GpoMode::Disabled).map_err(|_| ())?;
///
/// let event = keypad.read_key_fifo().map_err(|_| ())?;
/// if let Some(symbol) = event.mapped_key() {
///     // ...
/// }
/// # Ok(())
/// # }
/// ```
pub struct Max7360<'m, I2C> {
    driver: RegisterDriver<I2C>,
    key_mapping: Option<&'m dyn KeyMapping>,
}

impl<'m, I2C> Max7360<'m, I2C>
where
    I2C: I2c,
{
    /// Create a new MAX7360 interface.
    ///
    /// No bus traffic is generated.
    ///
    /// # Arguments
    /// * `i2c` — I2C peripheral (takes ownership for exclusive access)
    /// * `address` — 7-bit I2C address (typically [`DEFAULT_ADDRESS`]);
    ///   `0`–`3` are shorthand for `0x30`–`0x33`
    pub fn new(i2c: I2C, address: u8) -> Self {
        Self {
            driver: RegisterDriver::new(i2c, resolve_address(address)),
            key_mapping: None,
        }
    }

    /// Attach the mapping used to render key symbols.
    pub fn with_key_mapping(mut self, mapping: &'m dyn KeyMapping) -> Self {
        self.key_mapping = Some(mapping);
        self
    }

    /// The attached key mapping, if any.
    pub fn key_mapping(&self) -> Option<&'m dyn KeyMapping> {
        self.key_mapping
    }

    /// The 7-bit bus address in use.
    pub fn address(&self) -> u8 {
        self.driver.address()
    }

    /// Consume the driver and return the I2C peripheral.
    pub fn release(self) -> I2C {
        self.driver.release()
    }

    // -----------------------------------------------------------------------
    // Raw register access
    // -----------------------------------------------------------------------

    /// Read any register.
    pub fn read_register(&mut self, reg: u8) -> Result<u8, Max7360Error<I2C::Error>> {
        self.driver.read_register(reg)
    }

    /// Write any register.
    pub fn write_register(&mut self, reg: u8, value: u8) -> Result<(), Max7360Error<I2C::Error>> {
        self.driver.write_register(reg, value)
    }

    /// Update a register to `(current & and_mask) | or_mask`.
    pub fn set_register_mask(
        &mut self,
        reg: u8,
        and_mask: u8,
        or_mask: u8,
    ) -> Result<(), Max7360Error<I2C::Error>> {
        self.driver.set_register_mask(reg, and_mask, or_mask)
    }

    /// Set or clear the bits of `bit_mask` in a register.
    pub fn set_register_bitmask(
        &mut self,
        reg: u8,
        bit_mask: u8,
        set: bool,
    ) -> Result<(), Max7360Error<I2C::Error>> {
        self.driver.set_register_bitmask(reg, bit_mask, set)
    }

    // -----------------------------------------------------------------------
    // Bring-up
    // -----------------------------------------------------------------------

    /// Restore the power-on values of every register.
    ///
    /// Drains the key FIFO, rewrites registers `0x01`–`0x06` and then sets
    /// the self-clearing GPIO reset bit, which restores `0x40`–`0x5F`.
    pub fn reset_register_defaults(&mut self) -> Result<(), Max7360Error<I2C::Error>> {
        // The FIFO holds 16 events plus an overflow marker.
        for _ in 0..=FIFO_DEPTH + 1 {
            if self.driver.read_register(REG_KEYS_FIFO)? == FIFO_EMPTY {
                break;
            }
        }

        for (reg, value) in KEYPAD_DEFAULTS {
            self.driver.write_register(reg, value)?;
        }

        self.reset_gpio()
    }

    /// Apply a full set of bring-up settings.
    ///
    /// Keypad settings are written first, then GPIO enable, direction,
    /// rotary mode and fade time.
    pub fn configure(&mut self, config: &Max7360Config) -> Result<(), Max7360Error<I2C::Error>> {
        #[cfg(feature = "defmt")]
        defmt::debug!("configuring MAX7360 at {=u8:#04x}: {}", self.address(), config);

        self.set_debounce_time_ms(config.debounce_ms)?;
        self.set_gpo_enable(config.gpo_mode)?;
        self.set_key_release_enabled(config.key_release)?;
        self.set_auto_wakeup(config.auto_wakeup)?;
        self.set_clear_interrupt_on_read(config.clear_interrupt_on_read)?;
        self.set_i2c_timeouts_disabled(config.disable_i2c_timeouts)?;

        self.set_gpio_enabled(config.gpio_enabled)?;
        self.set_gpio_direction(config.gpio_direction)?;
        self.set_rotary_encoder_enabled(config.rotary_encoder)?;
        self.set_fade_time(config.fade_time)
    }

    // -----------------------------------------------------------------------
    // Key FIFO
    // -----------------------------------------------------------------------

    /// Pop one event from the key FIFO.
    ///
    /// Returns an [`Empty`](crate::Key::Empty) event when nothing is
    /// queued.
    pub fn read_key_fifo(&mut self) -> Result<KeyEvent<'m>, Max7360Error<I2C::Error>> {
        let raw = self.driver.read_register(REG_KEYS_FIFO)?;
        Ok(KeyEvent::new(raw, self.key_mapping))
    }

    /// Read every queued event.
    ///
    /// Stops at the first `Empty` read, after an event that reports no
    /// further queued events, or once [`FIFO_DEPTH`] events were
    /// collected. Empty reads are not included.
    pub fn drain_key_fifo(
        &mut self,
    ) -> Result<Vec<KeyEvent<'m>, FIFO_DEPTH>, Max7360Error<I2C::Error>> {
        let mut events = Vec::new();
        while !events.is_full() {
            let event = self.read_key_fifo()?;
            if event.is_empty() {
                break;
            }
            let more = event.has_more();
            // Capacity checked by the loop condition.
            let _ = events.push(event);
            if !more {
                break;
            }
        }
        Ok(events)
    }

    // -----------------------------------------------------------------------
    // Configuration register (0x01)
    // -----------------------------------------------------------------------

    /// Raw value of the configuration register.
    pub fn configuration(&mut self) -> Result<u8, Max7360Error<I2C::Error>> {
        self.driver.read_register(REG_CONFIG)
    }

    /// Overwrite the whole configuration register.
    ///
    /// Prefer the single-bit setters below; this replaces every bit.
    pub fn set_configuration(&mut self, raw: u8) -> Result<(), Max7360Error<I2C::Error>> {
        self.driver.write_register(REG_CONFIG, raw)
    }

    /// Enter (`true`) or leave sleep mode.
    pub fn set_sleep(&mut self, sleep: bool) -> Result<(), Max7360Error<I2C::Error>> {
        self.driver
            .set_register_bitmask(REG_CONFIG, CONFIG_SLEEP_MASK, sleep)
    }

    /// Clear /INTK on host read instead of when the FIFO empties
    /// (power-on: `false`).
    pub fn set_clear_interrupt_on_read(
        &mut self,
        enable: bool,
    ) -> Result<(), Max7360Error<I2C::Error>> {
        self.driver
            .set_register_bitmask(REG_CONFIG, CONFIG_INTERRUPT_MASK, enable)
    }

    /// Report key releases in the FIFO (power-on: `true`).
    pub fn set_key_release_enabled(
        &mut self,
        enable: bool,
    ) -> Result<(), Max7360Error<I2C::Error>> {
        self.driver
            .set_register_bitmask(REG_CONFIG, CONFIG_KEY_RELEASE_MASK, enable)
    }

    /// Wake from sleep on a key press (power-on: `true`).
    pub fn set_auto_wakeup(&mut self, enable: bool) -> Result<(), Max7360Error<I2C::Error>> {
        self.driver
            .set_register_bitmask(REG_CONFIG, CONFIG_AUTO_WAKEUP_MASK, enable)
    }

    /// Disable I2C bus timeouts (power-on: `false`).
    pub fn set_i2c_timeouts_disabled(
        &mut self,
        disable: bool,
    ) -> Result<(), Max7360Error<I2C::Error>> {
        self.driver
            .set_register_bitmask(REG_CONFIG, CONFIG_TIMEOUT_DISABLE_MASK, disable)
    }

    // -----------------------------------------------------------------------
    // Debounce / GPO enable (0x02)
    // -----------------------------------------------------------------------

    /// Key debounce time in milliseconds (9–40; power-on: 40).
    pub fn debounce_time_ms(&mut self) -> Result<u8, Max7360Error<I2C::Error>> {
        Ok(debounce_from_register(
            self.driver.read_register(REG_DEBOUNCE)?,
        ))
    }

    /// Set the key debounce time. Values outside 9–40 ms are clamped.
    pub fn set_debounce_time_ms(&mut self, ms: u8) -> Result<(), Max7360Error<I2C::Error>> {
        self.driver
            .set_register_field(REG_DEBOUNCE, DEBOUNCE_MASK, debounce_to_field(ms))
    }

    /// Current GPO mode; `None` if the chip reports the undefined encoding.
    pub fn gpo_enable(&mut self) -> Result<Option<GpoMode>, Max7360Error<I2C::Error>> {
        Ok(GpoMode::from_register(
            self.driver.read_register(REG_DEBOUNCE)?,
        ))
    }

    /// Choose which COL pins act as GPO.
    ///
    /// The power-on value takes COL2–COL7, which leaves only two columns
    /// for the key matrix.
    pub fn set_gpo_enable(&mut self, mode: GpoMode) -> Result<(), Max7360Error<I2C::Error>> {
        self.driver
            .set_register_field(REG_DEBOUNCE, GPO_ENABLE_MASK, mode.field())
    }

    // -----------------------------------------------------------------------
    // Keypad pass-through registers (0x03–0x06)
    // -----------------------------------------------------------------------

    /// Raw /INTK key-switch interrupt register.
    pub fn key_switch_interrupt(&mut self) -> Result<u8, Max7360Error<I2C::Error>> {
        self.driver.read_register(REG_KEY_SWITCH_INTERRUPT)
    }

    /// Write the /INTK key-switch interrupt register (power-on: `0x00`).
    pub fn set_key_switch_interrupt(&mut self, raw: u8) -> Result<(), Max7360Error<I2C::Error>> {
        self.driver.write_register(REG_KEY_SWITCH_INTERRUPT, raw)
    }

    /// Raw GPO control register: output levels of COL pins used as GPO.
    pub fn gpo_control(&mut self) -> Result<u8, Max7360Error<I2C::Error>> {
        self.driver.read_register(REG_GPO_CONTROL)
    }

    /// Write the GPO control register (power-on: `0xFE`).
    pub fn set_gpo_control(&mut self, raw: u8) -> Result<(), Max7360Error<I2C::Error>> {
        self.driver.write_register(REG_GPO_CONTROL, raw)
    }

    /// Raw auto-repeat register.
    pub fn auto_repeat(&mut self) -> Result<u8, Max7360Error<I2C::Error>> {
        self.driver.read_register(REG_AUTO_REPEAT)
    }

    /// Write the auto-repeat register (power-on: `0x00`, repeat off).
    pub fn set_auto_repeat(&mut self, raw: u8) -> Result<(), Max7360Error<I2C::Error>> {
        self.driver.write_register(REG_AUTO_REPEAT, raw)
    }

    /// Raw auto-sleep register.
    pub fn auto_sleep(&mut self) -> Result<u8, Max7360Error<I2C::Error>> {
        self.driver.read_register(REG_AUTO_SLEEP)
    }

    /// Write the auto-sleep register (power-on: `0x07`).
    pub fn set_auto_sleep(&mut self, raw: u8) -> Result<(), Max7360Error<I2C::Error>> {
        self.driver.write_register(REG_AUTO_SLEEP, raw)
    }

    // -----------------------------------------------------------------------
    // GPIO global configuration (0x40)
    // -----------------------------------------------------------------------

    /// Use PORT6/PORT7 as a quadrature rotary encoder (power-on: off).
    pub fn set_rotary_encoder_enabled(
        &mut self,
        enable: bool,
    ) -> Result<(), Max7360Error<I2C::Error>> {
        self.driver
            .set_register_bitmask(REG_GPIO_CONFIG, GPIO_CONFIG_ROTARY_MASK, enable)
    }

    /// Signal I2C bus timeouts on /INTI (power-on: off).
    pub fn set_inti_i2c_timeouts(&mut self, enable: bool) -> Result<(), Max7360Error<I2C::Error>> {
        self.driver
            .set_register_bitmask(REG_GPIO_CONFIG, GPIO_CONFIG_I2C_TIMEOUT_MASK, enable)
    }

    /// Enable the GPIO, constant-current and PWM blocks (power-on: off).
    pub fn set_gpio_enabled(&mut self, enable: bool) -> Result<(), Max7360Error<I2C::Error>> {
        self.driver
            .set_register_bitmask(REG_GPIO_CONFIG, GPIO_CONFIG_ENABLE_MASK, enable)
    }

    /// Restore registers `0x40`–`0x5F` to their power-on values.
    pub fn reset_gpio(&mut self) -> Result<(), Max7360Error<I2C::Error>> {
        self.driver
            .set_register_bitmask(REG_GPIO_CONFIG, GPIO_CONFIG_RESET_MASK, true)
    }

    /// Ramp time applied when the common PWM ratio changes.
    pub fn set_fade_time(&mut self, fade: FadeTime) -> Result<(), Max7360Error<I2C::Error>> {
        self.driver
            .set_register_field(REG_GPIO_CONFIG, GPIO_CONFIG_FADE_TIME_MASK, fade.field())
    }

    // -----------------------------------------------------------------------
    // GPIO direction, output mode and common PWM
    // -----------------------------------------------------------------------

    /// Set every port direction at once, one bit per port (`1` = output).
    pub fn set_gpio_direction(&mut self, outputs: u8) -> Result<(), Max7360Error<I2C::Error>> {
        self.driver.write_register(REG_GPIO_CONTROL, outputs)
    }

    /// Make the ports in `ports` outputs (`true`) or inputs, leaving the
    /// direction of every other port unchanged.
    ///
    /// # Arguments
    /// * `ports` — one bit per port (see [`PORT0_MASK`]…)
    /// * `output` — `true` for output, `false` for input
    pub fn set_gpio_outputs(
        &mut self,
        ports: u8,
        output: bool,
    ) -> Result<(), Max7360Error<I2C::Error>> {
        self.driver
            .set_register_bitmask(REG_GPIO_CONTROL, ports, output)
    }

    /// Set port output drive, one bit per port (`1` = non-constant-current
    /// open drain, `0` = constant-current open drain).
    pub fn set_gpio_output_current_mode(
        &mut self,
        mode: u8,
    ) -> Result<(), Max7360Error<I2C::Error>> {
        self.driver.write_register(REG_GPIO_OUTPUT_MODE, mode)
    }

    /// Current common PWM ratio.
    pub fn common_pwm_ratio(&mut self) -> Result<u8, Max7360Error<I2C::Error>> {
        self.driver.read_register(REG_COMMON_PWM_RATIO)
    }

    /// Set the common PWM ratio (0 = off, 255 = fully on).
    pub fn set_common_pwm_ratio(&mut self, ratio: u8) -> Result<(), Max7360Error<I2C::Error>> {
        self.driver.write_register(REG_COMMON_PWM_RATIO, ratio)
    }

    /// Raw rotary switch configuration register.
    pub fn rotary_switch_config(&mut self) -> Result<u8, Max7360Error<I2C::Error>> {
        self.driver.read_register(REG_ROTARY_SWITCH_CONFIG)
    }

    /// Write the rotary switch configuration register.
    pub fn set_rotary_switch_config(&mut self, raw: u8) -> Result<(), Max7360Error<I2C::Error>> {
        self.driver.write_register(REG_ROTARY_SWITCH_CONFIG, raw)
    }

    // -----------------------------------------------------------------------
    // Inputs
    // -----------------------------------------------------------------------

    /// `true` if an I2C timeout occurred since the last call. Reading
    /// clears the flag.
    pub fn i2c_timeout_flag(&mut self) -> Result<bool, Max7360Error<I2C::Error>> {
        Ok(self.driver.read_register(REG_I2C_TIMEOUT_FLAG)? & I2C_TIMEOUT_FLAG_MASK != 0)
    }

    /// Input levels of all ports, one bit per port (see [`PORT0_MASK`]…).
    pub fn read_gpio_inputs(&mut self) -> Result<u8, Max7360Error<I2C::Error>> {
        self.driver.read_register(REG_GPIO_INPUT)
    }

    /// Rotary encoder clicks since the previous read. Reading clears the
    /// counter.
    pub fn read_rotary_count(&mut self) -> Result<i8, Max7360Error<I2C::Error>> {
        Ok(self.driver.read_register(REG_GPIO_ROTARY_SWITCH_COUNT)? as i8)
    }

    // -----------------------------------------------------------------------
    // Per-port settings (0x50–0x5F)
    // -----------------------------------------------------------------------

    /// PWM ratio of a single port.
    ///
    /// # Errors
    /// * [`Max7360Error::InvalidPort`] if `port >= 8`
    /// * [`Max7360Error::I2c`] on communication failure
    pub fn port_pwm_ratio(&mut self, port: u8) -> Result<u8, Max7360Error<I2C::Error>> {
        let reg = port_register(REG_PORT_PWM_RATIO, port)?;
        self.driver.read_register(reg)
    }

    /// Set the PWM ratio of a single port (0 = off, 255 = fully on).
    ///
    /// # Errors
    /// * [`Max7360Error::InvalidPort`] if `port >= 8`
    /// * [`Max7360Error::I2c`] on communication failure
    pub fn set_port_pwm_ratio(
        &mut self,
        port: u8,
        ratio: u8,
    ) -> Result<(), Max7360Error<I2C::Error>> {
        let reg = port_register(REG_PORT_PWM_RATIO, port)?;
        self.driver.write_register(reg, ratio)
    }

    /// Configure a port's input interrupt.
    ///
    /// # Arguments
    /// * `enabled` — generate interrupts for this port
    /// * `rising_and_falling` — fire on both edges instead of rising only
    ///
    /// # Errors
    /// * [`Max7360Error::InvalidPort`] if `port >= 8`
    /// * [`Max7360Error::I2c`] on communication failure
    pub fn set_port_interrupt(
        &mut self,
        port: u8,
        enabled: bool,
        rising_and_falling: bool,
    ) -> Result<(), Max7360Error<I2C::Error>> {
        let reg = port_register(REG_PORT_CONFIG, port)?;
        let mut value = 0;
        if enabled {
            value |= PORT_INTERRUPT_MASK;
        }
        if rising_and_falling {
            value |= PORT_EDGE_MASK;
        }
        self.driver
            .set_register_field(reg, PORT_INTERRUPT_MASK | PORT_EDGE_MASK, value)
    }

    /// Drive a port from the common PWM ratio (`true`) or its own.
    ///
    /// # Errors
    /// * [`Max7360Error::InvalidPort`] if `port >= 8`
    /// * [`Max7360Error::I2c`] on communication failure
    pub fn set_common_pwm_mode(
        &mut self,
        port: u8,
        common: bool,
    ) -> Result<(), Max7360Error<I2C::Error>> {
        let reg = port_register(REG_PORT_CONFIG, port)?;
        self.driver
            .set_register_bitmask(reg, PORT_COMMON_PWM_MASK, common)
    }

    /// Set the hardware blink period of a port. [`BlinkPeriod::Off`]
    /// stops blinking.
    ///
    /// # Errors
    /// * [`Max7360Error::InvalidPort`] if `port >= 8`
    /// * [`Max7360Error::I2c`] on communication failure
    pub fn set_blink_period(
        &mut self,
        port: u8,
        period: BlinkPeriod,
    ) -> Result<(), Max7360Error<I2C::Error>> {
        let reg = port_register(REG_PORT_CONFIG, port)?;
        self.driver
            .set_register_field(reg, PORT_BLINK_PERIOD_MASK, period.field())
    }

    /// Set the fraction of the blink period a port is lit.
    ///
    /// # Errors
    /// * [`Max7360Error::InvalidPort`] if `port >= 8`
    /// * [`Max7360Error::I2c`] on communication failure
    pub fn set_blink_on_time(
        &mut self,
        port: u8,
        on_time: BlinkOnTime,
    ) -> Result<(), Max7360Error<I2C::Error>> {
        let reg = port_register(REG_PORT_CONFIG, port)?;
        self.driver
            .set_register_field(reg, PORT_BLINK_ON_TIME_MASK, on_time.field())
    }
}

fn port_register<E>(base: u8, port: u8) -> Result<u8, Max7360Error<E>> {
    if port >= PORT_COUNT {
        return Err(Max7360Error::InvalidPort(port));
    }
    Ok(base + port)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::key::Key;
    use crate::mapping::PHONE_KEYPAD;
    use crate::testing::SimulatedChip;
    use embedded_hal::i2c::ErrorKind;
    use embedded_hal_mock::eh1::i2c::{Mock as I2cMock, Transaction as I2cTransaction};

    const ADDR: u8 = DEFAULT_ADDRESS;

    fn chip() -> Max7360<'static, SimulatedChip> {
        Max7360::new(SimulatedChip::new(), ADDR)
    }

    // ── Addressing ───────────────────────────────────────────────────

    #[test]
    fn short_addresses_get_base_or_d_in() {
        assert_eq!(resolve_address(0), 0x30);
        assert_eq!(resolve_address(1), 0x31);
        assert_eq!(resolve_address(3), 0x33);
        assert_eq!(resolve_address(4), 0x04);
        assert_eq!(resolve_address(0x38), 0x38);
        assert_eq!(resolve_address(ADDRESS_AD0_SCL), 0x3E);
    }

    #[test]
    fn transactions_target_the_resolved_address() {
        let expectations = [I2cTransaction::write(0x32, vec![REG_COMMON_PWM_RATIO, 10])];
        let mut dev = Max7360::new(I2cMock::new(&expectations), 2);
        assert_eq!(dev.address(), 0x32);

        dev.set_common_pwm_ratio(10).unwrap();

        dev.release().done();
    }

    // ── Key FIFO ─────────────────────────────────────────────────────

    #[test]
    fn read_key_fifo_attaches_mapping() {
        let mut dev = chip().with_key_mapping(&PHONE_KEYPAD);
        dev.driver_mut().fifo.push_back(0x80 | 3);

        let event = dev.read_key_fifo().unwrap();
        assert_eq!(event.key(), Key::Pressed(3));
        assert_eq!(event.mapped_key(), Some('*'));

        let empty = dev.read_key_fifo().unwrap();
        assert!(empty.is_empty());
    }

    #[test]
    fn drain_stops_after_last_event() {
        let mut dev = chip();
        let fifo = &mut dev.driver_mut().fifo;
        fifo.push_back(0x01);
        fifo.push_back(0x42);
        fifo.push_back(0x83);
        fifo.push_back(0x04);

        let events = dev.drain_key_fifo().unwrap();
        let keys: std::vec::Vec<Key> = events.iter().map(|e| e.key()).collect();
        assert_eq!(keys, [Key::Pressed(1), Key::Released(2), Key::Pressed(3)]);
        assert_eq!(dev.driver_mut().fifo.len(), 1);
        assert!(dev.driver_mut().writes.is_empty());
    }

    #[test]
    fn drain_of_empty_fifo_is_empty() {
        let mut dev = chip();
        assert!(dev.drain_key_fifo().unwrap().is_empty());
    }

    #[test]
    fn drain_is_bounded_by_fifo_depth() {
        let mut dev = chip();
        for _ in 0..40 {
            dev.driver_mut().fifo.push_back(0x05);
        }
        let events = dev.drain_key_fifo().unwrap();
        assert_eq!(events.len(), FIFO_DEPTH);
    }

    // ── Bring-up ─────────────────────────────────────────────────────

    #[test]
    fn reset_register_defaults_drains_then_rewrites() {
        let mut dev = chip();
        dev.driver_mut().fifo.extend([0x01, 0x02, 0x83]);
        dev.driver_mut().regs[0x45] = 0x99;
        dev.driver_mut().regs[0x58] = 0xFF;

        dev.reset_register_defaults().unwrap();

        let sim = dev.release();
        assert!(sim.fifo.is_empty());
        for (reg, value) in KEYPAD_DEFAULTS {
            assert_eq!(sim.regs[reg as usize], value, "register {:#04x}", reg);
        }
        assert_eq!(sim.regs[0x40], 0);
        assert_eq!(sim.regs[0x45], 0);
        assert_eq!(sim.regs[0x58], 0);
    }

    #[test]
    fn configure_applies_every_field() {
        let mut dev = chip();
        for (reg, value) in KEYPAD_DEFAULTS {
            dev.driver_mut().regs[reg as usize] = value;
        }
        let config = Max7360Config {
            debounce_ms: 20,
            key_release: false,
            gpio_enabled: true,
            rotary_encoder: true,
            gpio_direction: 0b0000_0111,
            fade_time: FadeTime::Ms512,
            ..Max7360Config::default()
        };

        dev.configure(&config).unwrap();

        assert_eq!(dev.debounce_time_ms().unwrap(), 20);
        assert_eq!(dev.gpo_enable().unwrap(), Some(GpoMode::Disabled));
        let sim = dev.release();
        assert_eq!(sim.regs[REG_CONFIG as usize], CONFIG_AUTO_WAKEUP_MASK);
        assert_eq!(sim.regs[REG_GPIO_CONFIG as usize], 0x80 | 0x10 | 0x02);
        assert_eq!(sim.regs[REG_GPIO_CONTROL as usize], 0b0000_0111);
    }

    // ── Shared-register fields ───────────────────────────────────────

    #[test]
    fn debounce_and_gpo_share_a_register_without_clobbering() {
        let mut dev = chip();
        dev.driver_mut().regs[REG_DEBOUNCE as usize] = 0xFF;

        dev.set_debounce_time_ms(20).unwrap();
        assert_eq!(dev.driver_mut().regs[REG_DEBOUNCE as usize], 0xE0 | 11);

        dev.set_gpo_enable(GpoMode::Disabled).unwrap();
        assert_eq!(dev.driver_mut().regs[REG_DEBOUNCE as usize], 11);
        assert_eq!(dev.debounce_time_ms().unwrap(), 20);
    }

    #[test]
    fn debounce_clamps_through_the_facade() {
        let mut dev = chip();
        dev.set_debounce_time_ms(5).unwrap();
        assert_eq!(dev.debounce_time_ms().unwrap(), 9);
        dev.set_debounce_time_ms(100).unwrap();
        assert_eq!(dev.debounce_time_ms().unwrap(), 40);
    }

    #[test]
    fn set_debounce_is_one_masked_write() {
        let expectations = [
            I2cTransaction::write_read(ADDR, vec![REG_DEBOUNCE], vec![0b1100_0000]),
            I2cTransaction::write(ADDR, vec![REG_DEBOUNCE, 0b1100_1011]),
        ];
        let mut dev = Max7360::new(I2cMock::new(&expectations), ADDR);

        dev.set_debounce_time_ms(20).unwrap();

        dev.release().done();
    }

    #[test]
    fn port_config_fields_are_independent() {
        let mut dev = chip();

        dev.set_blink_period(3, BlinkPeriod::Ms1024).unwrap();
        dev.set_blink_on_time(3, BlinkOnTime::Percent25).unwrap();
        dev.set_common_pwm_mode(3, true).unwrap();
        dev.set_port_interrupt(3, true, true).unwrap();
        assert_eq!(dev.driver_mut().regs[0x5B], 0b1110_1101);

        dev.set_blink_period(3, BlinkPeriod::Off).unwrap();
        assert_eq!(dev.driver_mut().regs[0x5B], 0b1110_0001);

        dev.set_port_interrupt(3, false, false).unwrap();
        dev.set_common_pwm_mode(3, false).unwrap();
        assert_eq!(dev.driver_mut().regs[0x5B], 0b0000_0001);

        // Neighbouring ports untouched.
        assert_eq!(dev.driver_mut().regs[0x5A], 0);
        assert_eq!(dev.driver_mut().regs[0x5C], 0);
    }

    #[test]
    fn gpio_config_fields_are_independent() {
        let mut dev = chip();

        dev.set_rotary_encoder_enabled(true).unwrap();
        dev.set_gpio_enabled(true).unwrap();
        dev.set_inti_i2c_timeouts(true).unwrap();
        dev.set_fade_time(FadeTime::Ms4096).unwrap();
        assert_eq!(dev.driver_mut().regs[0x40], 0b1011_0101);

        dev.set_fade_time(FadeTime::Disabled).unwrap();
        dev.set_inti_i2c_timeouts(false).unwrap();
        assert_eq!(dev.driver_mut().regs[0x40], 0b1001_0000);
    }

    #[test]
    fn configuration_bits() {
        let mut dev = chip();
        dev.set_configuration(0b0000_1010).unwrap();

        dev.set_sleep(true).unwrap();
        dev.set_clear_interrupt_on_read(true).unwrap();
        dev.set_key_release_enabled(false).unwrap();
        dev.set_i2c_timeouts_disabled(true).unwrap();
        assert_eq!(dev.configuration().unwrap(), 0b1010_0011);

        dev.set_auto_wakeup(false).unwrap();
        dev.set_sleep(false).unwrap();
        assert_eq!(dev.configuration().unwrap(), 0b0010_0001);
    }

    // ── Whole-byte registers ─────────────────────────────────────────

    #[test]
    fn pwm_and_direction_registers() {
        let mut dev = chip();
        dev.set_port_pwm_ratio(0, 255).unwrap();
        dev.set_port_pwm_ratio(7, 64).unwrap();
        dev.set_common_pwm_ratio(128).unwrap();
        dev.set_gpio_direction(0b111).unwrap();
        dev.set_gpio_output_current_mode(0b1000_0001).unwrap();

        assert_eq!(dev.port_pwm_ratio(0).unwrap(), 255);
        assert_eq!(dev.port_pwm_ratio(7).unwrap(), 64);
        assert_eq!(dev.common_pwm_ratio().unwrap(), 128);
        let sim = dev.release();
        assert_eq!(sim.regs[0x41], 0b111);
        assert_eq!(sim.regs[0x44], 0b1000_0001);
    }

    #[test]
    fn gpio_outputs_keep_other_port_directions() {
        let mut dev = chip();
        dev.driver_mut().regs[REG_GPIO_CONTROL as usize] = PORT3_MASK;

        dev.set_gpio_outputs(PORT0_MASK | PORT1_MASK | PORT2_MASK, true).unwrap();
        assert_eq!(dev.driver_mut().regs[0x41], 0b0000_1111);

        dev.set_gpio_outputs(PORT1_MASK, false).unwrap();
        assert_eq!(dev.driver_mut().regs[0x41], 0b0000_1101);
        assert_eq!(dev.release().writes, [(0x41, 0x0F), (0x41, 0x0D)]);
    }

    #[test]
    fn pass_through_registers() {
        let mut dev = chip();
        dev.set_key_switch_interrupt(0x12).unwrap();
        dev.set_gpo_control(0x34).unwrap();
        dev.set_auto_repeat(0x56).unwrap();
        dev.set_auto_sleep(0x07).unwrap();
        dev.set_rotary_switch_config(0x09).unwrap();

        assert_eq!(dev.key_switch_interrupt().unwrap(), 0x12);
        assert_eq!(dev.gpo_control().unwrap(), 0x34);
        assert_eq!(dev.auto_repeat().unwrap(), 0x56);
        assert_eq!(dev.auto_sleep().unwrap(), 0x07);
        assert_eq!(dev.rotary_switch_config().unwrap(), 0x09);
    }

    #[test]
    fn rotary_count_is_signed_and_clears() {
        let mut dev = chip();
        dev.driver_mut().regs[0x4A] = 0xFD;
        assert_eq!(dev.read_rotary_count().unwrap(), -3);
        assert_eq!(dev.read_rotary_count().unwrap(), 0);
    }

    #[test]
    fn gpio_inputs_and_timeout_flag() {
        let mut dev = chip();
        dev.driver_mut().regs[0x49] = PORT5_MASK;
        dev.driver_mut().regs[0x48] = 0x01;
        assert_eq!(dev.read_gpio_inputs().unwrap() & PORT5_MASK, PORT5_MASK);
        assert!(dev.i2c_timeout_flag().unwrap());
    }

    // ── Errors ───────────────────────────────────────────────────────

    #[test]
    fn invalid_port_is_rejected_before_bus_traffic() {
        let expectations: [I2cTransaction; 0] = [];
        let mut dev = Max7360::new(I2cMock::new(&expectations), ADDR);

        assert_eq!(dev.set_port_pwm_ratio(8, 1), Err(Max7360Error::InvalidPort(8)));
        assert_eq!(dev.port_pwm_ratio(200), Err(Max7360Error::InvalidPort(200)));
        assert_eq!(
            dev.set_blink_period(8, BlinkPeriod::Ms256),
            Err(Max7360Error::InvalidPort(8))
        );
        assert_eq!(
            dev.set_port_interrupt(9, true, false),
            Err(Max7360Error::InvalidPort(9))
        );

        dev.release().done();
    }

    #[test]
    fn invalid_port_leaves_registers_untouched() {
        let mut dev = chip();

        for port in [8, 9, 255] {
            assert!(dev.set_common_pwm_mode(port, true).is_err());
            assert!(dev.set_blink_on_time(port, BlinkOnTime::Percent25).is_err());
            assert!(dev.set_port_interrupt(port, true, true).is_err());
        }

        let sim = dev.release();
        assert!(sim.writes.is_empty());
        assert!(sim.regs.iter().all(|r| *r == 0));
    }

    #[test]
    fn failed_write_is_reported() {
        let mut sim = SimulatedChip::new();
        sim.fail_writes = true;
        let mut dev = Max7360::new(sim, ADDR);

        assert_eq!(
            dev.set_gpio_enabled(true),
            Err(Max7360Error::I2c(ErrorKind::Other))
        );
        assert_eq!(dev.release().regs[0x40], 0);
    }

    impl<'m> Max7360<'m, SimulatedChip> {
        fn driver_mut(&mut self) -> &mut SimulatedChip {
            self.driver.i2c_mut()
        }
    }
}
