//! SHDLC framing for the UART interface.
//!
//! # Frame Format
//!
//! Request (MOSI):
//!
//! ```text
//! 0x7E | ADR | CMD | L | DATA[L] | CHK | 0x7E
//! ```
//!
//! Response (MISO):
//!
//! ```text
//! 0x7E | ADR | CMD | STATE | L | DATA[L] | CHK | 0x7E
//! ```
//!
//! `CHK` is [`sum_checksum`] over everything between the delimiters except
//! itself. On the wire, the bytes between the delimiters are byte-stuffed:
//!
//! | Raw  | Stuffed     |
//! |------|-------------|
//! | 0x7E | 0x7D 0x5E   |
//! | 0x7D | 0x7D 0x5D   |
//! | 0x11 | 0x7D 0x31   |
//! | 0x13 | 0x7D 0x33   |
//!
//! # Example
//!
//! ```
//! use sfa30_proto::shdlc::{build_request, stuff, unstuff};
//!
//! let request = build_request(0x00, 0x03, &[0x02]).unwrap();
//! assert_eq!(request.as_slice(), &[0x7E, 0x00, 0x03, 0x01, 0x02, 0xF9, 0x7E]);
//!
//! let wire = stuff(&request).unwrap();
//! let back = unstuff(&wire, request.len()).unwrap();
//! assert_eq!(back, request);
//! ```

use heapless::Vec;

use crate::checksum::sum_checksum;
use crate::status::DeviceStatus;

/// Start and stop delimiter.
pub const FRAME_DELIMITER: u8 = 0x7E;

/// Escape marker preceding a stuffed byte.
pub const ESCAPE: u8 = 0x7D;

/// XOR mask applied to a stuffed byte.
pub const ESCAPE_XOR: u8 = 0x20;

/// Bytes that must never appear raw between the delimiters.
pub const RESERVED: [u8; 4] = [0x7E, 0x7D, 0x11, 0x13];

/// Capacity of a frame buffer, delimiters included.
pub const MAX_FRAME_LEN: usize = 256;

/// Length of a MOSI frame without data.
pub const REQUEST_OVERHEAD: usize = 6;

/// Largest request payload that still fits an unstuffed frame buffer.
pub const MAX_REQUEST_DATA_LEN: usize = MAX_FRAME_LEN - REQUEST_OVERHEAD;

/// Length of a MISO frame without data.
pub const RESPONSE_OVERHEAD: usize = 7;

/// Owned frame buffer.
pub type Frame = Vec<u8, MAX_FRAME_LEN>;

/// Errors while stuffing, unstuffing or assembling a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FrameError {
    /// The output would not fit into its buffer.
    Overflow,
    /// Fewer bytes than the two delimiters.
    TooShort,
    /// The first or last byte is not [`FRAME_DELIMITER`].
    MissingDelimiter,
    /// [`ESCAPE`] followed by a byte that is not a stuffed reserved value.
    InvalidEscape(u8),
    /// Decoded length differs from the length the command expects.
    LengthMismatch { expected: usize, actual: usize },
    /// The response echoes a different command than the one sent.
    CommandMismatch { expected: u8, actual: u8 },
}

impl core::fmt::Display for FrameError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Overflow => write!(f, "frame buffer overflow"),
            Self::TooShort => write!(f, "frame too short"),
            Self::MissingDelimiter => write!(f, "missing frame delimiter"),
            Self::InvalidEscape(b) => write!(f, "invalid escape sequence 0x7D 0x{:02X}", b),
            Self::LengthMismatch { expected, actual } => {
                write!(f, "frame length {} (expected {})", actual, expected)
            }
            Self::CommandMismatch { expected, actual } => {
                write!(f, "response to command 0x{:02X} (expected 0x{:02X})", actual, expected)
            }
        }
    }
}

/// Errors while validating a MISO frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ResponseError {
    /// Malformed frame.
    Frame(FrameError),
    /// Checksum byte does not match the frame content.
    Checksum { expected: u8, actual: u8 },
    /// The sensor reported a non-zero state.
    Device(DeviceStatus),
}

impl From<FrameError> for ResponseError {
    fn from(err: FrameError) -> Self {
        ResponseError::Frame(err)
    }
}

/// A validated MISO frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response<'a> {
    /// Slave address the response came from.
    pub address: u8,
    /// Command echoed by the sensor.
    pub command: u8,
    /// Response data.
    pub data: &'a [u8],
}

#[inline]
fn escaped(byte: u8) -> Option<u8> {
    RESERVED.contains(&byte).then_some(byte ^ ESCAPE_XOR)
}

#[inline]
fn unescaped(byte: u8) -> Option<u8> {
    let raw = byte ^ ESCAPE_XOR;
    RESERVED.contains(&raw).then_some(raw)
}

/// Byte-stuff an unstuffed frame for transmission.
///
/// The first and last bytes (the delimiters) are copied verbatim.
///
/// # Errors
///
/// [`FrameError::TooShort`] for fewer than two bytes, [`FrameError::Overflow`]
/// if the stuffed frame would exceed [`MAX_FRAME_LEN`].
pub fn stuff(frame: &[u8]) -> Result<Frame, FrameError> {
    let (&first, rest) = frame.split_first().ok_or(FrameError::TooShort)?;
    let (&last, body) = rest.split_last().ok_or(FrameError::TooShort)?;

    let mut out = Frame::new();
    push(&mut out, first)?;
    for &byte in body {
        // Keep one slot for the closing delimiter
        let needed = if escaped(byte).is_some() { 2 } else { 1 };
        if out.len() + needed >= MAX_FRAME_LEN {
            return Err(FrameError::Overflow);
        }
        match escaped(byte) {
            Some(stuffed) => {
                push(&mut out, ESCAPE)?;
                push(&mut out, stuffed)?;
            }
            None => push(&mut out, byte)?,
        }
    }
    push(&mut out, last)?;

    Ok(out)
}

/// Reverse [`stuff`] on a received frame.
///
/// `expected_len` is the unstuffed length the command's response must have.
///
/// # Errors
///
/// See [`FrameError`]. An escape marker followed by anything other than a
/// stuffed reserved byte is rejected as [`FrameError::InvalidEscape`].
pub fn unstuff(raw: &[u8], expected_len: usize) -> Result<Frame, FrameError> {
    let (&first, rest) = raw.split_first().ok_or(FrameError::TooShort)?;
    let (&last, body) = rest.split_last().ok_or(FrameError::TooShort)?;
    if first != FRAME_DELIMITER || last != FRAME_DELIMITER {
        return Err(FrameError::MissingDelimiter);
    }
    if expected_len < 2 || expected_len > MAX_FRAME_LEN {
        return Err(FrameError::Overflow);
    }

    let mut out = Frame::new();
    push(&mut out, first)?;
    let mut bytes = body.iter();
    while let Some(&byte) = bytes.next() {
        if out.len() >= expected_len - 1 {
            return Err(FrameError::Overflow);
        }
        let value = if byte == ESCAPE {
            let &next = bytes.next().ok_or(FrameError::InvalidEscape(last))?;
            unescaped(next).ok_or(FrameError::InvalidEscape(next))?
        } else {
            byte
        };
        push(&mut out, value)?;
    }
    push(&mut out, last)?;

    if out.len() != expected_len {
        return Err(FrameError::LengthMismatch {
            expected: expected_len,
            actual: out.len(),
        });
    }

    Ok(out)
}

/// Assemble an unstuffed MOSI frame.
///
/// # Errors
///
/// [`FrameError::Overflow`] if `data` is longer than [`MAX_REQUEST_DATA_LEN`].
pub fn build_request(address: u8, command: u8, data: &[u8]) -> Result<Frame, FrameError> {
    if data.len() > MAX_REQUEST_DATA_LEN {
        return Err(FrameError::Overflow);
    }
    let len = data.len() as u8;

    let mut frame = Frame::new();
    push(&mut frame, FRAME_DELIMITER)?;
    push(&mut frame, address)?;
    push(&mut frame, command)?;
    push(&mut frame, len)?;
    frame
        .extend_from_slice(data)
        .map_err(|_| FrameError::Overflow)?;
    let chk = sum_checksum(&frame[1..]);
    push(&mut frame, chk)?;
    push(&mut frame, FRAME_DELIMITER)?;

    Ok(frame)
}

/// Validate an unstuffed MISO frame and borrow its data.
///
/// Checks run in wire order: frame shape, checksum, command echo, then the
/// state byte. A checksum mismatch therefore fails before the state is read.
///
/// # Errors
///
/// See [`ResponseError`].
pub fn parse_response(frame: &[u8], command: u8) -> Result<Response<'_>, ResponseError> {
    if frame.len() < RESPONSE_OVERHEAD {
        return Err(FrameError::TooShort.into());
    }
    if frame[0] != FRAME_DELIMITER || frame[frame.len() - 1] != FRAME_DELIMITER {
        return Err(FrameError::MissingDelimiter.into());
    }

    let chk_pos = frame.len() - 2;
    let expected = sum_checksum(&frame[1..chk_pos]);
    let actual = frame[chk_pos];
    if expected != actual {
        return Err(ResponseError::Checksum { expected, actual });
    }

    let data_len = usize::from(frame[4]);
    if RESPONSE_OVERHEAD + data_len != frame.len() {
        return Err(FrameError::LengthMismatch {
            expected: RESPONSE_OVERHEAD + data_len,
            actual: frame.len(),
        }
        .into());
    }
    if frame[2] != command {
        return Err(FrameError::CommandMismatch {
            expected: command,
            actual: frame[2],
        }
        .into());
    }
    if let Some(status) = DeviceStatus::from_code(frame[3]) {
        return Err(ResponseError::Device(status));
    }

    Ok(Response {
        address: frame[1],
        command: frame[2],
        data: &frame[5..chk_pos],
    })
}

#[inline]
fn push(frame: &mut Frame, byte: u8) -> Result<(), FrameError> {
    frame.push(byte).map_err(|_| FrameError::Overflow)
}
