//! Core SFA30 types: Interface, Measurement, DeviceInformation, ChipInfo.

/// Physical interface the sensor is wired to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Interface {
    /// Register-addressed command bus (I2C, 7-bit address 0x5D).
    I2c,
    /// SHDLC framed byte stream (UART, 115200 8N1).
    Uart,
}

impl Interface {
    /// Human readable interface name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Interface::I2c => "IIC",
            Interface::Uart => "UART",
        }
    }
}

/// Scale factor from raw formaldehyde ticks to ppb.
pub const FORMALDEHYDE_SCALE: f32 = 5.0;

/// Scale factor from raw humidity ticks to %RH.
pub const HUMIDITY_SCALE: f32 = 100.0;

/// Scale factor from raw temperature ticks to °C.
pub const TEMPERATURE_SCALE: f32 = 200.0;

/// One measurement sample.
///
/// Raw values are the signed 16-bit fixed-point readings as sent by the
/// sensor; the floating point fields are derived from them.
///
/// # Example
///
/// ```
/// use sfa30_proto::Measurement;
///
/// let m = Measurement::from_raw(50, 4500, 5000);
/// assert_eq!(m.formaldehyde, 10.0);
/// assert_eq!(m.humidity, 45.0);
/// assert_eq!(m.temperature, 25.0);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Measurement {
    pub formaldehyde_raw: i16,
    pub humidity_raw: i16,
    pub temperature_raw: i16,
    /// Formaldehyde concentration in ppb.
    pub formaldehyde: f32,
    /// Relative humidity in %.
    pub humidity: f32,
    /// Temperature in °C.
    pub temperature: f32,
}

impl Measurement {
    /// Number of data bytes in a measurement response (three big-endian words).
    pub const DATA_LEN: usize = 6;

    /// Build a sample from raw readings.
    #[must_use]
    pub fn from_raw(formaldehyde_raw: i16, humidity_raw: i16, temperature_raw: i16) -> Self {
        Self {
            formaldehyde_raw,
            humidity_raw,
            temperature_raw,
            formaldehyde: f32::from(formaldehyde_raw) / FORMALDEHYDE_SCALE,
            humidity: f32::from(humidity_raw) / HUMIDITY_SCALE,
            temperature: f32::from(temperature_raw) / TEMPERATURE_SCALE,
        }
    }

    /// Decode the 6 data bytes of a read-measured-values response.
    #[must_use]
    pub fn from_be_bytes(data: &[u8; Self::DATA_LEN]) -> Self {
        Self::from_raw(
            i16::from_be_bytes([data[0], data[1]]),
            i16::from_be_bytes([data[2], data[3]]),
            i16::from_be_bytes([data[4], data[5]]),
        )
    }
}

/// Textual device information (device marking) read from the sensor.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DeviceInformation {
    bytes: [u8; Self::CAPACITY],
    len: usize,
}

impl DeviceInformation {
    /// Size of the information buffer.
    pub const CAPACITY: usize = 32;

    /// Copy up to [`Self::CAPACITY`] bytes of `data`; the rest is zero filled.
    #[must_use]
    pub fn from_bytes(data: &[u8]) -> Self {
        let len = data.len().min(Self::CAPACITY);
        let mut bytes = [0u8; Self::CAPACITY];
        bytes[..len].copy_from_slice(&data[..len]);
        Self { bytes, len }
    }

    /// The bytes received from the sensor, including any NUL padding.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes[..self.len]
    }

    /// The information as text, cut at the first NUL.
    ///
    /// Non UTF-8 content yields the longest valid prefix.
    #[must_use]
    pub fn as_str(&self) -> &str {
        let raw = self.as_bytes();
        let end = raw.iter().position(|&b| b == 0).unwrap_or(raw.len());
        match core::str::from_utf8(&raw[..end]) {
            Ok(s) => s,
            Err(e) => core::str::from_utf8(&raw[..e.valid_up_to()]).unwrap_or_default(),
        }
    }
}

impl Default for DeviceInformation {
    fn default() -> Self {
        Self::from_bytes(&[])
    }
}

/// Static description of the chip and this driver.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ChipInfo {
    pub chip_name: &'static str,
    pub manufacturer_name: &'static str,
    pub interface: &'static str,
    pub supply_voltage_min_v: f32,
    pub supply_voltage_max_v: f32,
    pub max_current_ma: f32,
    pub temperature_min: f32,
    pub temperature_max: f32,
    /// Driver version, `major * 1000 + minor * 100`.
    pub driver_version: u32,
}

/// Chip information for the SFA30.
pub const CHIP_INFO: ChipInfo = ChipInfo {
    chip_name: "Sensirion SFA30",
    manufacturer_name: "Sensirion",
    interface: "UART IIC",
    supply_voltage_min_v: 3.15,
    supply_voltage_max_v: 5.50,
    max_current_ma: 5.0,
    temperature_min: 0.0,
    temperature_max: 40.0,
    driver_version: 1000,
};
