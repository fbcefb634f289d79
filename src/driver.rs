//! Low-level register access.
//!
//! Implements the single-byte read/write transactions of the MAX7360 and
//! the masked read-modify-write primitive every bitfield setter is built
//! on.
//!
//! This module is crate-private; consumers interact with [`Max7360`]
//! in `max7360.rs` instead.
//!
//! [`Max7360`]: crate::Max7360

use embedded_hal::i2c::I2c;

use crate::error::Max7360Error;

/// Register-file view of the chip.
///
/// Owns an I2C peripheral and the 7-bit device address. Every call is one
/// complete bus transaction; nothing is cached and nothing is retried.
pub(crate) struct RegisterDriver<I2C> {
    i2c: I2C,
    address: u8,
}

impl<I2C> RegisterDriver<I2C>
where
    I2C: I2c,
{
    /// Create a new register driver.
    ///
    /// # Arguments
    /// * `i2c` — I2C peripheral (takes ownership for exclusive access)
    /// * `address` — 7-bit I2C device address, already resolved
    pub fn new(i2c: I2C, address: u8) -> Self {
        Self { i2c, address }
    }

    /// The resolved 7-bit bus address.
    pub fn address(&self) -> u8 {
        self.address
    }

    /// Give the I2C peripheral back to the caller.
    pub fn release(self) -> I2C {
        self.i2c
    }

    #[cfg(test)]
    pub fn i2c_mut(&mut self) -> &mut I2C {
        &mut self.i2c
    }

    // -----------------------------------------------------------------------
    // Core protocol primitives
    // -----------------------------------------------------------------------

    /// Read one register.
    ///
    /// Sends the register address and reads a single byte back using a
    /// repeated start. The value is returned uninterpreted.
    pub fn read_register(&mut self, reg: u8) -> Result<u8, Max7360Error<I2C::Error>> {
        let mut buf = [0u8; 1];
        self.i2c.write_read(self.address, &[reg], &mut buf)?;

        #[cfg(feature = "defmt")]
        defmt::trace!("read reg={=u8:#04x} value={=u8:#04x}", reg, buf[0]);

        Ok(buf[0])
    }

    /// Write one register.
    pub fn write_register(&mut self, reg: u8, value: u8) -> Result<(), Max7360Error<I2C::Error>> {
        self.i2c.write(self.address, &[reg, value])?;

        #[cfg(feature = "defmt")]
        defmt::trace!("write reg={=u8:#04x} value={=u8:#04x}", reg, value);

        Ok(())
    }

    // -----------------------------------------------------------------------
    // Read-modify-write helpers
    // -----------------------------------------------------------------------

    /// Update a register to `(current & and_mask) | or_mask`.
    ///
    /// Bits cleared in `and_mask` and not set in `or_mask` are owned by the
    /// caller; all others keep their current hardware value. If the read
    /// fails, nothing is written.
    pub fn set_register_mask(
        &mut self,
        reg: u8,
        and_mask: u8,
        or_mask: u8,
    ) -> Result<(), Max7360Error<I2C::Error>> {
        let current = self.read_register(reg)?;
        self.write_register(reg, (current & and_mask) | or_mask)
    }

    /// Set (`set == true`) or clear every bit of `bit_mask` in a register.
    pub fn set_register_bitmask(
        &mut self,
        reg: u8,
        bit_mask: u8,
        set: bool,
    ) -> Result<(), Max7360Error<I2C::Error>> {
        if set {
            self.set_register_mask(reg, 0xFF, bit_mask)
        } else {
            self.set_register_mask(reg, !bit_mask, 0)
        }
    }

    /// Replace the bits of `field_mask` with `value`, which must already be
    /// shifted into position. Bits of `value` outside the mask are dropped.
    pub fn set_register_field(
        &mut self,
        reg: u8,
        field_mask: u8,
        value: u8,
    ) -> Result<(), Max7360Error<I2C::Error>> {
        self.set_register_mask(reg, !field_mask, value & field_mask)
    }
}
