//! I2C bus adapter
//!
//! Wraps a blocking `embedded_hal::i2c::I2c` master. The segment writes are
//! two bytes each, short enough that the multiplex tick can afford to block.

use embedded_hal::i2c::I2c;
use scoreboard_hal::I2cBus;

pub struct RpI2c<I> {
    inner: I,
}

impl<I: I2c> RpI2c<I> {
    pub fn new(inner: I) -> Self {
        Self { inner }
    }

    pub fn into_inner(self) -> I {
        self.inner
    }
}

impl<I: I2c> I2cBus for RpI2c<I> {
    type Error = I::Error;

    fn write(&mut self, address: u8, data: &[u8]) -> Result<(), Self::Error> {
        self.inner.write(address, data)
    }
}
