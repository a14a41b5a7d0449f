//! UART (SHDLC) binding.

use embedded_hal::delay::DelayNs;
use embedded_io::{Error as _, Read, ReadReady, Write};
use sfa30_proto::shdlc::{
    build_request, parse_response, stuff, unstuff, FRAME_DELIMITER, RESPONSE_OVERHEAD,
};
use sfa30_proto::{Command, Frame, FrameError, Interface, DEFAULT_SHDLC_ADDRESS, MAX_FRAME_LEN};

use crate::error::Error;
use crate::transport::{copy_response, Transport};

/// Sensor on a serial port at [`UART_BAUDRATE`](sfa30_proto::UART_BAUDRATE) 8N1.
///
/// The port must already be configured; this type only moves frames.
pub struct UartTransport<S, D> {
    serial: S,
    delay: D,
    address: u8,
    buf: Frame,
}

impl<S, D> UartTransport<S, D>
where
    S: Read + Write + ReadReady,
    D: DelayNs,
{
    /// Bind the sensor at [`DEFAULT_SHDLC_ADDRESS`].
    pub fn new(serial: S, delay: D) -> Self {
        Self::with_address(serial, delay, DEFAULT_SHDLC_ADDRESS)
    }

    /// Bind the sensor at a custom SHDLC slave address.
    pub fn with_address(serial: S, delay: D, address: u8) -> Self {
        Self {
            serial,
            delay,
            address,
            buf: Frame::new(),
        }
    }

    /// SHDLC slave address.
    pub fn address(&self) -> u8 {
        self.address
    }

    /// Send an unstuffed request frame and return the unstuffed response.
    ///
    /// The response must unstuff to exactly `expected_len` bytes.
    pub fn write_read(
        &mut self,
        request: &[u8],
        settle_ms: u32,
        expected_len: usize,
    ) -> Result<Frame, Error> {
        self.exchange(request, settle_ms)?;
        unstuff(&self.buf, expected_len).map_err(|e| {
            warn!("bad response frame: {:?}", e);
            Error::Frame(e)
        })
    }

    /// Give back the serial port and delay.
    pub fn release(self) -> (S, D) {
        (self.serial, self.delay)
    }

    /// Stuff and send `request`, then collect the raw response in `self.buf`.
    fn exchange(&mut self, request: &[u8], settle_ms: u32) -> Result<(), Error> {
        let wire = stuff(request)?;
        self.drain()?;
        self.serial.write_all(&wire).map_err(|e| {
            error!("uart write failed: {:?}", e.kind());
            Error::Io
        })?;
        self.serial.flush().map_err(|e| {
            error!("uart flush failed: {:?}", e.kind());
            Error::Io
        })?;
        self.delay.delay_ms(settle_ms);
        self.receive()
    }

    /// Discard bytes left over from an earlier exchange.
    fn drain(&mut self) -> Result<(), Error> {
        let mut scratch = [0u8; 16];
        let mut dropped = 0usize;
        while self.ready()? {
            let n = self.serial.read(&mut scratch).map_err(|e| {
                error!("uart read failed: {:?}", e.kind());
                Error::Io
            })?;
            if n == 0 {
                break;
            }
            dropped += n;
        }
        if dropped > 0 {
            debug!("dropped {} stale bytes", dropped);
        }
        Ok(())
    }

    /// Read while data is ready, up to the closing delimiter.
    fn receive(&mut self) -> Result<(), Error> {
        self.buf.clear();
        let mut byte = [0u8; 1];
        while self.buf.len() < MAX_FRAME_LEN && self.ready()? {
            let n = self.serial.read(&mut byte).map_err(|e| {
                error!("uart read failed: {:?}", e.kind());
                Error::Io
            })?;
            if n == 0 {
                break;
            }
            self.buf
                .push(byte[0])
                .map_err(|_| Error::Frame(FrameError::Overflow))?;
            if self.buf.len() > 1 && byte[0] == FRAME_DELIMITER {
                break;
            }
        }
        trace!("received {} bytes", self.buf.len());
        Ok(())
    }

    fn ready(&mut self) -> Result<bool, Error> {
        self.serial.read_ready().map_err(|e| {
            error!("uart status failed: {:?}", e.kind());
            Error::Io
        })
    }
}

impl<S, D> Transport for UartTransport<S, D>
where
    S: Read + Write + ReadReady,
    D: DelayNs,
{
    fn interface(&self) -> Interface {
        Interface::Uart
    }

    fn close(&mut self) -> Result<(), Error> {
        self.serial.flush().map_err(|e| {
            error!("uart flush failed: {:?}", e.kind());
            Error::Io
        })
    }

    fn settle_ms(&self, command: Command) -> u32 {
        command.shdlc_settle_ms()
    }

    fn execute(
        &mut self,
        command: Command,
        settle_ms: u32,
        response: &mut [u8],
    ) -> Result<usize, Error> {
        let code = command.shdlc_code();
        let request = build_request(self.address, code, command.shdlc_payload())?;
        self.exchange(&request, settle_ms)?;

        let data_len = command.shdlc_response_len();
        let frame = match unstuff(&self.buf, RESPONSE_OVERHEAD + data_len) {
            Ok(frame) => frame,
            // Error responses carry no data
            Err(FrameError::LengthMismatch { actual, .. }) if actual == RESPONSE_OVERHEAD => {
                unstuff(&self.buf, actual)?
            }
            Err(e) => {
                warn!("{:?} response frame rejected: {:?}", command, e);
                return Err(Error::Frame(e));
            }
        };

        let parsed = parse_response(&frame, code).map_err(|e| {
            match e {
                sfa30_proto::ResponseError::Device(status) => {
                    warn!("{:?} failed: {}", command, status.description());
                }
                other => warn!("{:?} response rejected: {:?}", command, other),
            }
            Error::from(e)
        })?;
        if parsed.data.len() != data_len {
            return Err(Error::Frame(FrameError::LengthMismatch {
                expected: data_len,
                actual: parsed.data.len(),
            }));
        }
        copy_response(parsed.data, response)
    }
}
