//! I2C binding.

use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::{Error as _, I2c};
use sfa30_proto::i2c::{command_frame, decode_words, WORD_LEN};
use sfa30_proto::{Command, DeviceInformation, Interface, DEFAULT_I2C_ADDRESS};

use crate::error::Error;
use crate::transport::Transport;

/// Largest response: the device information string.
const MAX_READ_LEN: usize = DeviceInformation::CAPACITY / 2 * WORD_LEN;

/// Sensor on an I2C bus.
pub struct I2cTransport<I2C, D> {
    i2c: I2C,
    delay: D,
    address: u8,
}

impl<I2C: I2c, D: DelayNs> I2cTransport<I2C, D> {
    /// Bind the sensor at [`DEFAULT_I2C_ADDRESS`].
    pub fn new(i2c: I2C, delay: D) -> Self {
        Self::with_address(i2c, delay, DEFAULT_I2C_ADDRESS)
    }

    /// Bind the sensor at a custom 7-bit address.
    pub fn with_address(i2c: I2C, delay: D, address: u8) -> Self {
        Self {
            i2c,
            delay,
            address,
        }
    }

    /// 7-bit bus address.
    pub fn address(&self) -> u8 {
        self.address
    }

    /// Write `register` followed by `payload` in one transaction, then wait
    /// `settle_ms`.
    ///
    /// `payload` may hold at most 14 bytes.
    pub fn write(&mut self, register: u16, payload: &[u8], settle_ms: u32) -> Result<(), Error> {
        let frame = command_frame(register, payload)?;
        self.i2c.write(self.address, &frame).map_err(|e| {
            error!("i2c write to register {} failed: {:?}", register, e.kind());
            Error::Io
        })?;
        self.delay.delay_ms(settle_ms);
        Ok(())
    }

    /// Write `register`, wait `settle_ms`, then read `buf.len()` raw bytes.
    pub fn read(&mut self, register: u16, buf: &mut [u8], settle_ms: u32) -> Result<(), Error> {
        self.i2c
            .write(self.address, &register.to_be_bytes())
            .map_err(|e| {
                error!("i2c write to register {} failed: {:?}", register, e.kind());
                Error::Io
            })?;
        self.delay.delay_ms(settle_ms);
        self.i2c.read(self.address, buf).map_err(|e| {
            error!("i2c read failed: {:?}", e.kind());
            Error::Io
        })
    }

    /// Give back the bus and delay.
    pub fn release(self) -> (I2C, D) {
        (self.i2c, self.delay)
    }
}

impl<I2C: I2c, D: DelayNs> Transport for I2cTransport<I2C, D> {
    fn interface(&self) -> Interface {
        Interface::I2c
    }

    fn settle_ms(&self, command: Command) -> u32 {
        command.i2c_settle_ms()
    }

    fn execute(
        &mut self,
        command: Command,
        settle_ms: u32,
        response: &mut [u8],
    ) -> Result<usize, Error> {
        let words = command.i2c_read_words();
        if words == 0 {
            self.write(command.i2c_code(), &[], settle_ms)?;
            return Ok(0);
        }

        let mut raw = [0u8; MAX_READ_LEN];
        let raw = raw
            .get_mut(..words * WORD_LEN)
            .ok_or(Error::Frame(sfa30_proto::FrameError::Overflow))?;
        self.read(command.i2c_code(), raw, settle_ms)?;
        decode_words(raw, response).map_err(|e| {
            error!("{:?} response rejected: {:?}", command, e);
            Error::from(e)
        })
    }
}
