//! Wire protocol for the Sensirion SFA30 formaldehyde sensor.
//!
//! This crate holds everything about the sensor that does not need I/O:
//!
//! - **Checksums**: [`crc8()`] for I2C words, [`sum_checksum()`] for SHDLC
//!   frames, [`checksum()`] to select by [`Interface`]
//! - **SHDLC framing**: [`shdlc::build_request`], [`shdlc::stuff`],
//!   [`shdlc::unstuff`], [`shdlc::parse_response`]
//! - **I2C words**: [`i2c::command_frame`], [`i2c::encode_words`],
//!   [`i2c::decode_words`]
//! - **Commands**: [`Command`] with codes, payloads and settle times for
//!   both interfaces
//! - **Types**: [`Measurement`], [`DeviceInformation`], [`DeviceStatus`],
//!   [`CHIP_INFO`]
//!
//! # Example
//!
//! ```
//! use sfa30_proto::{shdlc, Command, Measurement, DEFAULT_SHDLC_ADDRESS};
//!
//! let cmd = Command::ReadMeasuredValues;
//! let request =
//!     shdlc::build_request(DEFAULT_SHDLC_ADDRESS, cmd.shdlc_code(), cmd.shdlc_payload()).unwrap();
//! assert_eq!(request.as_slice(), &[0x7E, 0x00, 0x03, 0x01, 0x02, 0xF9, 0x7E]);
//!
//! // 10 ppb, 45 %RH, 25 °C
//! let miso = [0x7E, 0x00, 0x03, 0x00, 0x06, 0x00, 0x32, 0x11, 0x94, 0x13, 0x88, 0x84, 0x7E];
//! let response = shdlc::parse_response(&miso, cmd.shdlc_code()).unwrap();
//! let m = Measurement::from_be_bytes(response.data.try_into().unwrap());
//! assert_eq!(m.temperature, 25.0);
//! ```
//!
//! # Features
//!
//! - **`std`**: Enable standard library support (for host testing)
//! - **`defmt`**: Enable defmt formatting (for embedded logging)
//!
//! # No-std Support
//!
//! This crate is `#![no_std]` by default and uses no heap allocations.
//! Frame buffers are fixed-capacity `heapless` vectors.

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(feature = "std")]
extern crate std;

pub mod checksum;
pub mod command;
pub mod i2c;
pub mod shdlc;
pub mod status;
pub mod types;

// Re-export types at crate root for convenience
pub use checksum::{checksum, crc8, sum_checksum, Crc8Digest};
pub use command::{
    Command, DEFAULT_SHDLC_ADDRESS, INIT_RESET_SETTLE_MS, RAW_SETTLE_MS, UART_BAUDRATE,
};
pub use i2c::{WordError, DEFAULT_I2C_ADDRESS};
pub use shdlc::{Frame, FrameError, Response, ResponseError, MAX_FRAME_LEN};
pub use status::DeviceStatus;
pub use types::{ChipInfo, DeviceInformation, Interface, Measurement, CHIP_INFO};
