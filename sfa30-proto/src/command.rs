//! Command table for both interfaces.

use crate::types::{DeviceInformation, Measurement};

/// Default SHDLC slave address.
pub const DEFAULT_SHDLC_ADDRESS: u8 = 0x00;

/// UART line speed (8N1).
pub const UART_BAUDRATE: u32 = 115_200;

/// Delay after the device reset issued by init and deinit.
pub const INIT_RESET_SETTLE_MS: u32 = 100;

/// Delay between write and read of a raw register transfer.
pub const RAW_SETTLE_MS: u32 = 20;

/// Parameter selecting the device marking in the device information request.
pub const DEVICE_MARKING: u8 = 0x06;

/// Sensor commands.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Command {
    StartMeasurement,
    StopMeasurement,
    ReadMeasuredValues,
    GetDeviceInformation,
    DeviceReset,
}

impl Command {
    /// 16-bit I2C command code.
    #[must_use]
    pub const fn i2c_code(self) -> u16 {
        match self {
            Self::StartMeasurement => 0x0006,
            Self::StopMeasurement => 0x0104,
            Self::ReadMeasuredValues => 0x0327,
            Self::GetDeviceInformation => 0xD060,
            Self::DeviceReset => 0xD304,
        }
    }

    /// SHDLC command byte.
    #[must_use]
    pub const fn shdlc_code(self) -> u8 {
        match self {
            Self::StartMeasurement => 0x00,
            Self::StopMeasurement => 0x01,
            Self::ReadMeasuredValues => 0x03,
            Self::GetDeviceInformation => 0xD0,
            Self::DeviceReset => 0xD3,
        }
    }

    /// Fixed SHDLC request payload.
    #[must_use]
    pub const fn shdlc_payload(self) -> &'static [u8] {
        match self {
            Self::StartMeasurement => &[0x00],
            // Output format: signed 16-bit integers
            Self::ReadMeasuredValues => &[0x02],
            Self::GetDeviceInformation => &[DEVICE_MARKING],
            Self::StopMeasurement | Self::DeviceReset => &[],
        }
    }

    /// Time the sensor needs between I2C write and read.
    #[must_use]
    pub const fn i2c_settle_ms(self) -> u32 {
        match self {
            Self::StartMeasurement => 1,
            Self::StopMeasurement => 50,
            Self::ReadMeasuredValues => 5,
            Self::GetDeviceInformation => 2,
            Self::DeviceReset => 100,
        }
    }

    /// Time the sensor needs before the SHDLC response is complete.
    #[must_use]
    pub const fn shdlc_settle_ms(self) -> u32 {
        match self {
            Self::ReadMeasuredValues => 100,
            Self::DeviceReset => 200,
            Self::StartMeasurement | Self::StopMeasurement | Self::GetDeviceInformation => 10,
        }
    }

    /// Number of data words in the I2C response.
    #[must_use]
    pub const fn i2c_read_words(self) -> usize {
        match self {
            Self::ReadMeasuredValues => Measurement::DATA_LEN / 2,
            Self::GetDeviceInformation => DeviceInformation::CAPACITY / 2,
            Self::StartMeasurement | Self::StopMeasurement | Self::DeviceReset => 0,
        }
    }

    /// Number of data bytes in the SHDLC response.
    #[must_use]
    pub const fn shdlc_response_len(self) -> usize {
        match self {
            Self::ReadMeasuredValues => Measurement::DATA_LEN,
            // NUL terminated device marking
            Self::GetDeviceInformation => 17,
            Self::StartMeasurement | Self::StopMeasurement | Self::DeviceReset => 0,
        }
    }
}
