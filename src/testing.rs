//! Host-side register-file model used by the unit tests.

use std::collections::VecDeque;
use std::vec::Vec;

use embedded_hal::i2c::{ErrorKind, ErrorType, I2c, Operation, SevenBitAddress};

use crate::registers::{
    GPIO_CONFIG_RESET_MASK, REG_GPIO_CONFIG, REG_GPIO_ROTARY_SWITCH_COUNT, REG_KEYS_FIFO,
};

/// FIFO value reported once the simulated queue is drained.
const FIFO_EMPTY: u8 = 0b0011_1111;

/// 128 registers behind an I2C interface.
///
/// Models the bits of chip behaviour the driver depends on: the FIFO pops
/// on read, the rotary counter clears on read, and the GPIO reset bit
/// restores 0x40–0x5F to zero and clears itself.
pub(crate) struct SimulatedChip {
    pub regs: [u8; 128],
    pub fifo: VecDeque<u8>,
    pub writes: Vec<(u8, u8)>,
    pub fail_writes: bool,
    pointer: u8,
}

impl SimulatedChip {
    pub fn new() -> Self {
        Self {
            regs: [0u8; 128],
            fifo: VecDeque::new(),
            writes: Vec::new(),
            fail_writes: false,
            pointer: 0,
        }
    }

    fn read_byte(&mut self) -> u8 {
        match self.pointer {
            REG_KEYS_FIFO => self.fifo.pop_front().unwrap_or(FIFO_EMPTY),
            REG_GPIO_ROTARY_SWITCH_COUNT => {
                let value = self.regs[self.pointer as usize];
                self.regs[self.pointer as usize] = 0;
                value
            }
            reg => self.regs[(reg & 0x7F) as usize],
        }
    }

    fn write_byte(&mut self, value: u8) {
        let reg = self.pointer & 0x7F;
        self.writes.push((reg, value));
        if reg == REG_GPIO_CONFIG && value & GPIO_CONFIG_RESET_MASK != 0 {
            for r in 0x40..0x60 {
                self.regs[r] = 0;
            }
        } else {
            self.regs[reg as usize] = value;
        }
    }
}

impl ErrorType for SimulatedChip {
    type Error = ErrorKind;
}

impl I2c<SevenBitAddress> for SimulatedChip {
    fn transaction(
        &mut self,
        _address: SevenBitAddress,
        operations: &mut [Operation<'_>],
    ) -> Result<(), Self::Error> {
        for op in operations {
            match op {
                Operation::Write(bytes) => {
                    if let Some((&reg, data)) = bytes.split_first() {
                        if !data.is_empty() && self.fail_writes {
                            return Err(ErrorKind::Other);
                        }
                        self.pointer = reg;
                        for &value in data {
                            self.write_byte(value);
                        }
                    }
                }
                Operation::Read(buf) => {
                    for slot in buf.iter_mut() {
                        *slot = self.read_byte();
                    }
                }
            }
        }
        Ok(())
    }
}
