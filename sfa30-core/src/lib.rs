//! Platform-agnostic driver for the Sensirion SFA30 formaldehyde sensor.
//!
//! The sensor speaks two interfaces. This crate binds either of them through
//! the `embedded-hal` and `embedded-io` traits and runs the same command set
//! and lifecycle on top.
//!
//! # Overview
//!
//! - [`transport`]: the [`Transport`] trait
//! - [`i2c`]: [`I2cTransport`] over any [`embedded_hal::i2c::I2c`] bus
//! - [`uart`]: [`UartTransport`] (SHDLC framing) over any
//!   [`embedded_io`] serial port
//! - [`device`]: the [`Sfa30`] handle with its [`State`] machine
//! - [`error`]: the driver [`Error`]
//!
//! # Example
//!
//! ```ignore
//! use sfa30_core::{I2cTransport, Sfa30};
//!
//! let mut sensor = Sfa30::new(I2cTransport::new(i2c, delay));
//! sensor.init()?;
//! let info = sensor.read_device_information()?;
//! sensor.start_measurement()?;
//! loop {
//!     delay.delay_ms(1000);
//!     let m = sensor.read()?;
//!     // m.formaldehyde (ppb), m.humidity (%RH), m.temperature (°C)
//! }
//! ```
//!
//! # Features
//!
//! - **`std`**: Enable standard library support (for host testing)
//! - **`defmt`**: Log through defmt and derive `defmt::Format`
//! - **`log`**: Log through the `log` facade
//!
//! `defmt` and `log` are mutually exclusive. With neither enabled the driver
//! does not log.

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(feature = "std")]
extern crate std;

// This mod MUST go first, so that the others see its macros.
pub(crate) mod fmt;

pub mod device;
pub mod error;
pub mod i2c;
pub mod transport;
pub mod uart;

// Re-export main types at crate root
pub use device::{Sfa30, State};
pub use error::Error;
pub use i2c::I2cTransport;
pub use transport::Transport;
pub use uart::UartTransport;

pub use sfa30_proto as proto;
pub use sfa30_proto::{
    ChipInfo, Command, DeviceInformation, DeviceStatus, Interface, Measurement, CHIP_INFO,
    DEFAULT_I2C_ADDRESS, DEFAULT_SHDLC_ADDRESS, MAX_FRAME_LEN, UART_BAUDRATE,
};
