//! SFA30 formaldehyde sensor demo for RP2040.
//!
//! Brings the sensor up over the interface chosen at build time, prints the
//! device marking, starts continuous measurement and logs one sample per
//! second over RTT.
//!
//! # Hardware Configuration
//!
//! | Function | GPIO | Description |
//! |----------|------|-------------|
//! | I2C0 SDA | 0    | Sensor SDA (`iface-i2c`) |
//! | I2C0 SCL | 1    | Sensor SCL (`iface-i2c`) |
//! | UART1 TX | 8    | Sensor RX (`iface-uart`) |
//! | UART1 RX | 9    | Sensor TX (`iface-uart`) |
//! | LED      | 25   | On-board LED (error indicator) |
//!
//! The SFA30 selects its interface from the SEL pin at power-up: tie it to
//! GND for UART, to VDD for I2C.
//!
//! # Features
//!
//! - **`dev-panic`** (default): Use `panic-probe` for development (prints panic info via RTT)
//! - **`prod-panic`**: Use `panic-reset` for production (silent watchdog reset)
//! - **`iface-i2c`** (default): Talk to the sensor over I2C
//! - **`iface-uart`**: Talk to the sensor over UART (SHDLC)

#![no_std]

// Ensure exactly one sensor interface
#[cfg(all(feature = "iface-i2c", feature = "iface-uart"))]
compile_error!("Cannot enable both `iface-i2c` and `iface-uart` features - the sensor uses one interface");
#[cfg(not(any(feature = "iface-i2c", feature = "iface-uart")))]
compile_error!("Enable one of the `iface-i2c` or `iface-uart` features");

// Re-export core types for convenience
pub use sfa30_core::{
    DeviceInformation, Error, I2cTransport, Interface, Measurement, Sfa30, State, Transport,
    UartTransport, UART_BAUDRATE,
};

pub mod sensor;

pub use sensor::{bring_up, run, READ_INTERVAL, RETRY_INTERVAL};
