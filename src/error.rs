//! Error types for the MAX7360 driver.

use core::fmt;

/// Errors that can occur when communicating with the MAX7360.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Max7360Error<E> {
    /// Underlying I2C bus error.
    I2c(E),

    /// Port index out of valid range (must be 0–7).
    InvalidPort(u8),
}

// Allow ergonomic `?` propagation from raw I2C errors.
impl<E> From<E> for Max7360Error<E> {
    fn from(error: E) -> Self {
        Max7360Error::I2c(error)
    }
}

impl<E: fmt::Debug> fmt::Display for Max7360Error<E> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Max7360Error::I2c(e) => write!(f, "I2C error: {:?}", e),
            Max7360Error::InvalidPort(port) => {
                write!(f, "Invalid port {} (must be 0-7)", port)
            }
        }
    }
}

#[cfg(feature = "defmt")]
impl<E: defmt::Format> defmt::Format for Max7360Error<E> {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Max7360Error::I2c(e) => defmt::write!(f, "I2C error: {}", e),
            Max7360Error::InvalidPort(port) => defmt::write!(f, "Invalid port {}", port),
        }
    }
}
