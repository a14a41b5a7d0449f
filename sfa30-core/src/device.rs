//! Sfa30: command protocol and lifecycle over any [`Transport`].

use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::I2c;
use embedded_io::{Read, ReadReady, Write};
use sfa30_proto::{
    ChipInfo, Command, DeviceInformation, Frame, Interface, Measurement, CHIP_INFO,
    INIT_RESET_SETTLE_MS, RAW_SETTLE_MS,
};

use crate::error::Error;
use crate::i2c::I2cTransport;
use crate::transport::Transport;
use crate::uart::UartTransport;

/// Lifecycle state of a [`Sfa30`] handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum State {
    /// Constructed, or after `deinit`.
    Uninitialized,
    /// Initialized, not measuring.
    Ready,
    /// Continuous measurement running.
    Measuring,
}

/// SFA30 driver handle.
///
/// Owns one transport. The interface is fixed by the transport type for the
/// life of the handle.
///
/// # Example
///
/// ```ignore
/// let mut sensor = Sfa30::new(I2cTransport::new(i2c, delay));
/// sensor.init()?;
/// sensor.start_measurement()?;
/// let m = sensor.read()?;
/// ```
pub struct Sfa30<T> {
    transport: T,
    state: State,
}

impl<T: Transport> Sfa30<T> {
    /// Wrap a transport. The handle starts [`State::Uninitialized`].
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            state: State::Uninitialized,
        }
    }

    /// Static chip and driver description.
    pub const fn info() -> ChipInfo {
        CHIP_INFO
    }

    /// Interface the handle talks over.
    pub fn interface(&self) -> Interface {
        self.transport.interface()
    }

    /// Current lifecycle state.
    pub fn state(&self) -> State {
        self.state
    }

    /// Whether `init` has succeeded and `deinit` has not run since.
    pub fn is_initialized(&self) -> bool {
        self.state != State::Uninitialized
    }

    /// Open the transport and check that the sensor answers a reset.
    ///
    /// # Errors
    ///
    /// [`Error::Unbound`] if the transport cannot be opened,
    /// [`Error::ResetFailed`] if the sensor does not answer. The transport is
    /// closed again in the latter case.
    pub fn init(&mut self) -> Result<(), Error> {
        if let Err(e) = self.transport.open() {
            error!("{} open failed: {:?}", self.interface().name(), e);
            return Err(Error::Unbound);
        }
        if let Err(e) = self
            .transport
            .execute(Command::DeviceReset, INIT_RESET_SETTLE_MS, &mut [])
        {
            error!("reset failed: {:?}", e);
            let _ = self.transport.close();
            return Err(Error::ResetFailed);
        }
        self.state = State::Ready;
        info!("sfa30 ready on {}", self.interface().name());
        Ok(())
    }

    /// Reset the sensor and close the transport.
    ///
    /// # Errors
    ///
    /// [`Error::ResetFailed`] leaves the handle initialized. A failing close
    /// is reported as [`Error::Io`].
    pub fn deinit(&mut self) -> Result<(), Error> {
        self.ensure_init()?;
        if let Err(e) = self
            .transport
            .execute(Command::DeviceReset, INIT_RESET_SETTLE_MS, &mut [])
        {
            error!("reset failed: {:?}", e);
            return Err(Error::ResetFailed);
        }
        if let Err(e) = self.transport.close() {
            error!("{} close failed: {:?}", self.interface().name(), e);
            return Err(Error::Io);
        }
        self.state = State::Uninitialized;
        Ok(())
    }

    /// Start continuous measurement.
    pub fn start_measurement(&mut self) -> Result<(), Error> {
        self.command(Command::StartMeasurement, &mut [])?;
        self.state = State::Measuring;
        Ok(())
    }

    /// Stop continuous measurement.
    pub fn stop_measurement(&mut self) -> Result<(), Error> {
        self.command(Command::StopMeasurement, &mut [])?;
        self.state = State::Ready;
        Ok(())
    }

    /// Read the latest formaldehyde, humidity and temperature sample.
    pub fn read(&mut self) -> Result<Measurement, Error> {
        let mut data = [0u8; Measurement::DATA_LEN];
        self.command(Command::ReadMeasuredValues, &mut data)?;
        Ok(Measurement::from_be_bytes(&data))
    }

    /// Read the device marking string.
    pub fn read_device_information(&mut self) -> Result<DeviceInformation, Error> {
        let mut data = [0u8; DeviceInformation::CAPACITY];
        let len = self.command(Command::GetDeviceInformation, &mut data)?;
        Ok(DeviceInformation::from_bytes(&data[..len]))
    }

    /// Soft reset. Measurement stops and the handle returns to
    /// [`State::Ready`].
    pub fn reset(&mut self) -> Result<(), Error> {
        self.command(Command::DeviceReset, &mut [])?;
        self.state = State::Ready;
        Ok(())
    }

    /// Give back the transport.
    pub fn release(self) -> T {
        self.transport
    }

    fn ensure_init(&self) -> Result<(), Error> {
        if self.is_initialized() {
            Ok(())
        } else {
            error!("handle is not initialized");
            Err(Error::NotInitialized)
        }
    }

    fn command(&mut self, command: Command, response: &mut [u8]) -> Result<usize, Error> {
        self.ensure_init()?;
        let settle_ms = self.transport.settle_ms(command);
        self.transport
            .execute(command, settle_ms, response)
            .inspect_err(|e| error!("{:?} failed: {:?}", command, e))
    }
}

impl<I2C: I2c, D: DelayNs> Sfa30<I2cTransport<I2C, D>> {
    /// Write a raw command with up to 14 payload bytes.
    ///
    /// The payload goes out as given; word CRCs are the caller's job (see
    /// [`sfa30_proto::i2c::encode_words`]).
    pub fn set_reg(&mut self, register: u16, payload: &[u8]) -> Result<(), Error> {
        self.ensure_init()?;
        self.transport.write(register, payload, RAW_SETTLE_MS)
    }

    /// Write a raw command and read `buf.len()` bytes back, CRCs included.
    pub fn get_reg(&mut self, register: u16, buf: &mut [u8]) -> Result<(), Error> {
        self.ensure_init()?;
        self.transport.read(register, buf, RAW_SETTLE_MS)
    }
}

impl<S, D> Sfa30<UartTransport<S, D>>
where
    S: Read + Write + ReadReady,
    D: DelayNs,
{
    /// Exchange a raw unstuffed SHDLC frame.
    ///
    /// The response must unstuff to exactly `expected_len` bytes. Checksum
    /// and state are left to the caller.
    pub fn set_get_reg(&mut self, request: &[u8], expected_len: usize) -> Result<Frame, Error> {
        self.ensure_init()?;
        self.transport.write_read(request, RAW_SETTLE_MS, expected_len)
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;
    use crate::i2c::tests::{MockDelay, MockI2c};
    use crate::uart::tests::{miso, MockSerial};
    use sfa30_proto::{DeviceStatus, FrameError};
    use std::sync::{Arc, Mutex};
    use std::vec;
    use std::vec::Vec;

    // Transport that replays scripted results and records lifecycle calls
    #[derive(Default)]
    struct ScriptedTransport {
        open_fails: bool,
        results: Vec<Result<usize, Error>>,
        calls: Arc<Mutex<Vec<&'static str>>>,
        executed: Vec<(Command, u32)>,
    }

    impl Transport for ScriptedTransport {
        fn interface(&self) -> Interface {
            Interface::I2c
        }

        fn open(&mut self) -> Result<(), Error> {
            self.calls.lock().unwrap().push("open");
            if self.open_fails {
                Err(Error::Io)
            } else {
                Ok(())
            }
        }

        fn close(&mut self) -> Result<(), Error> {
            self.calls.lock().unwrap().push("close");
            Ok(())
        }

        fn settle_ms(&self, command: Command) -> u32 {
            command.i2c_settle_ms()
        }

        fn execute(
            &mut self,
            command: Command,
            settle_ms: u32,
            _response: &mut [u8],
        ) -> Result<usize, Error> {
            self.executed.push((command, settle_ms));
            if self.results.is_empty() {
                Ok(0)
            } else {
                self.results.remove(0)
            }
        }
    }

    fn i2c_sensor() -> (Sfa30<I2cTransport<MockI2c, MockDelay>>, MockI2c, MockDelay) {
        let bus = MockI2c::default();
        let delay = MockDelay::default();
        let sensor = Sfa30::new(I2cTransport::new(bus.clone(), delay.clone()));
        (sensor, bus, delay)
    }

    fn uart_sensor() -> (Sfa30<UartTransport<MockSerial, MockDelay>>, MockSerial, MockDelay) {
        let port = MockSerial::default();
        let delay = MockDelay::default();
        let sensor = Sfa30::new(UartTransport::new(port.clone(), delay.clone()));
        (sensor, port, delay)
    }

    #[test]
    fn test_operations_require_init() {
        let (mut sensor, bus, delay) = i2c_sensor();

        assert_eq!(sensor.start_measurement(), Err(Error::NotInitialized));
        assert_eq!(sensor.stop_measurement(), Err(Error::NotInitialized));
        assert_eq!(sensor.read(), Err(Error::NotInitialized));
        assert_eq!(sensor.read_device_information(), Err(Error::NotInitialized));
        assert_eq!(sensor.reset(), Err(Error::NotInitialized));
        assert_eq!(sensor.deinit(), Err(Error::NotInitialized));
        assert_eq!(sensor.set_reg(0x0006, &[]), Err(Error::NotInitialized));
        assert_eq!(sensor.get_reg(0x0327, &mut [0u8; 9]), Err(Error::NotInitialized));

        // Nothing reached the bus
        assert!(bus.writes().is_empty());
        assert!(delay.waits.lock().unwrap().is_empty());
        assert_eq!(sensor.state(), State::Uninitialized);
    }

    #[test]
    fn test_raw_uart_requires_init() {
        let (mut sensor, port, _) = uart_sensor();
        assert_eq!(
            sensor.set_get_reg(&[0x7E, 0x00, 0xD3, 0x00, 0x2C, 0x7E], 7),
            Err(Error::NotInitialized)
        );
        assert!(port.tx().is_empty());
    }

    #[test]
    fn test_i2c_init_deinit() {
        let (mut sensor, bus, delay) = i2c_sensor();
        assert_eq!(sensor.interface(), Interface::I2c);

        sensor.init().unwrap();
        assert_eq!(sensor.state(), State::Ready);
        assert_eq!(bus.writes(), vec![vec![0xD3, 0x04]]);
        assert_eq!(*delay.waits.lock().unwrap(), vec![100]);

        sensor.deinit().unwrap();
        assert_eq!(sensor.state(), State::Uninitialized);
        assert_eq!(bus.writes().len(), 2);
        assert_eq!(sensor.read(), Err(Error::NotInitialized));
    }

    #[test]
    fn test_uart_init_uses_short_reset_delay() {
        let (mut sensor, port, delay) = uart_sensor();
        port.queue_response(0xD3, 0x00, &[]);

        sensor.init().unwrap();
        assert_eq!(sensor.interface(), Interface::Uart);
        assert_eq!(port.tx(), vec![0x7E, 0x00, 0xD3, 0x00, 0x2C, 0x7E]);
        assert_eq!(*delay.waits.lock().unwrap(), vec![100]);
    }

    #[test]
    fn test_standalone_reset_uses_long_delay() {
        let (mut sensor, port, delay) = uart_sensor();
        port.queue_response(0xD3, 0x00, &[]);
        port.queue_response(0xD3, 0x00, &[]);

        sensor.init().unwrap();
        sensor.reset().unwrap();
        assert_eq!(*delay.waits.lock().unwrap(), vec![100, 200]);
    }

    #[test]
    fn test_init_reset_failure_closes_transport() {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let transport = ScriptedTransport {
            results: vec![Err(Error::Io)],
            calls: calls.clone(),
            ..Default::default()
        };
        let mut sensor = Sfa30::new(transport);

        assert_eq!(sensor.init(), Err(Error::ResetFailed));
        assert_eq!(sensor.state(), State::Uninitialized);
        assert_eq!(*calls.lock().unwrap(), vec!["open", "close"]);
    }

    #[test]
    fn test_init_open_failure_is_unbound() {
        let transport = ScriptedTransport {
            open_fails: true,
            ..Default::default()
        };
        let mut sensor = Sfa30::new(transport);

        assert_eq!(sensor.init(), Err(Error::Unbound));
        assert!(sensor.release().executed.is_empty());
    }

    #[test]
    fn test_uart_init_device_error_is_reset_failure() {
        let (mut sensor, port, _) = uart_sensor();
        port.queue_response(0xD3, 0x43, &[]);

        assert_eq!(sensor.init(), Err(Error::ResetFailed));
        assert!(!sensor.is_initialized());
    }

    #[test]
    fn test_deinit_reset_failure_keeps_state() {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let transport = ScriptedTransport {
            results: vec![Ok(0), Ok(0), Err(Error::Checksum)],
            calls: calls.clone(),
            ..Default::default()
        };
        let mut sensor = Sfa30::new(transport);

        sensor.init().unwrap();
        sensor.start_measurement().unwrap();
        assert_eq!(sensor.deinit(), Err(Error::ResetFailed));
        assert_eq!(sensor.state(), State::Measuring);
        assert_eq!(*calls.lock().unwrap(), vec!["open"]);

        let transport = sensor.release();
        assert_eq!(
            transport.executed,
            vec![
                (Command::DeviceReset, 100),
                (Command::StartMeasurement, 1),
                (Command::DeviceReset, 100),
            ]
        );
    }

    #[test]
    fn test_state_transitions() {
        let transport = ScriptedTransport::default();
        let mut sensor = Sfa30::new(transport);

        sensor.init().unwrap();
        sensor.start_measurement().unwrap();
        assert_eq!(sensor.state(), State::Measuring);
        sensor.stop_measurement().unwrap();
        assert_eq!(sensor.state(), State::Ready);
        sensor.start_measurement().unwrap();
        sensor.reset().unwrap();
        assert_eq!(sensor.state(), State::Ready);
    }

    #[test]
    fn test_failed_start_keeps_state() {
        let transport = ScriptedTransport {
            results: vec![Ok(0), Err(Error::Io)],
            ..Default::default()
        };
        let mut sensor = Sfa30::new(transport);

        sensor.init().unwrap();
        assert_eq!(sensor.start_measurement(), Err(Error::Io));
        assert_eq!(sensor.state(), State::Ready);
    }

    #[test]
    fn test_i2c_read_measurement() {
        let (mut sensor, bus, delay) = i2c_sensor();
        sensor.init().unwrap();
        sensor.start_measurement().unwrap();
        bus.queue_words(&[0x00, 0x32, 0x11, 0x94, 0x13, 0x88]);

        let m = sensor.read().unwrap();
        assert_eq!(m.formaldehyde, 10.0);
        assert_eq!(m.humidity, 45.0);
        assert_eq!(m.temperature, 25.0);
        assert_eq!(
            bus.writes(),
            vec![vec![0xD3, 0x04], vec![0x00, 0x06], vec![0x03, 0x27]]
        );
        assert_eq!(*delay.waits.lock().unwrap(), vec![100, 1, 5]);
    }

    #[test]
    fn test_uart_read_measurement() {
        let (mut sensor, port, delay) = uart_sensor();
        port.queue_response(0xD3, 0x00, &[]);
        port.queue_response(0x00, 0x00, &[]);
        // -10 °C
        port.queue_response(0x03, 0x00, &[0x00, 0x32, 0x11, 0x94, 0xF8, 0x30]);

        sensor.init().unwrap();
        sensor.start_measurement().unwrap();
        let m = sensor.read().unwrap();
        assert_eq!(m.formaldehyde_raw, 50);
        assert_eq!(m.temperature, -10.0);
        assert_eq!(*delay.waits.lock().unwrap(), vec![100, 10, 100]);
    }

    #[test]
    fn test_uart_read_before_start() {
        let (mut sensor, port, _) = uart_sensor();
        port.queue_response(0xD3, 0x00, &[]);
        port.queue_response(0x03, 0x20, &[]);

        sensor.init().unwrap();
        assert_eq!(
            sensor.read(),
            Err(Error::Device(DeviceStatus::NoDataAvailable))
        );
        assert_eq!(sensor.state(), State::Ready);
    }

    #[test]
    fn test_i2c_device_information() {
        let (mut sensor, bus, _) = i2c_sensor();
        sensor.init().unwrap();
        let mut marking = [0u8; 32];
        marking[..16].copy_from_slice(b"0D1C7A2B3E4F5A6B");
        bus.queue_words(&marking);

        let info = sensor.read_device_information().unwrap();
        assert_eq!(info.as_str(), "0D1C7A2B3E4F5A6B");
        assert_eq!(info.as_bytes().len(), 32);
        assert_eq!(bus.writes()[1], vec![0xD0, 0x60]);
    }

    #[test]
    fn test_uart_device_information() {
        let (mut sensor, port, _) = uart_sensor();
        port.queue_response(0xD3, 0x00, &[]);
        port.queue_response(0xD0, 0x00, b"0D1C7A2B3E4F5A6B\0");

        sensor.init().unwrap();
        let info = sensor.read_device_information().unwrap();
        assert_eq!(info.as_str(), "0D1C7A2B3E4F5A6B");
        assert_eq!(info.as_bytes().len(), 17);

        let tx = port.tx();
        assert_eq!(&tx[6..], &[0x7E, 0x00, 0xD0, 0x01, 0x06, 0x28, 0x7E]);
    }

    #[test]
    fn test_i2c_raw_register_access() {
        let (mut sensor, bus, delay) = i2c_sensor();
        sensor.init().unwrap();

        sensor.set_reg(0x0006, &[]).unwrap();
        bus.queue_raw(&[0xBE, 0xEF, 0x92]);
        let mut buf = [0u8; 3];
        sensor.get_reg(0xD060, &mut buf).unwrap();

        assert_eq!(buf, [0xBE, 0xEF, 0x92]);
        assert_eq!(
            bus.writes(),
            vec![vec![0xD3, 0x04], vec![0x00, 0x06], vec![0xD0, 0x60]]
        );
        assert_eq!(*delay.waits.lock().unwrap(), vec![100, 20, 20]);

        // Payload limit of a single write
        assert_eq!(
            sensor.set_reg(0x0006, &[0u8; 15]),
            Err(Error::Frame(FrameError::Overflow))
        );
    }

    #[test]
    fn test_uart_raw_exchange() {
        let (mut sensor, port, delay) = uart_sensor();
        port.queue_response(0xD3, 0x00, &[]);
        port.queue_response(0x03, 0x20, &[]);

        sensor.init().unwrap();
        let frame = sensor
            .set_get_reg(&[0x7E, 0x00, 0x03, 0x01, 0x02, 0xF9, 0x7E], 7)
            .unwrap();
        assert_eq!(frame.as_slice(), miso(0x03, 0x20, &[]).as_slice());
        assert_eq!(*delay.waits.lock().unwrap(), vec![100, 20]);
    }

    #[test]
    fn test_release_returns_transport() {
        let (mut sensor, _, _) = i2c_sensor();
        sensor.init().unwrap();
        let (bus, _delay) = sensor.release().release();
        assert_eq!(bus.writes(), vec![vec![0xD3, 0x04]]);
    }

    #[test]
    fn test_chip_info() {
        let info = Sfa30::<ScriptedTransport>::info();
        assert_eq!(info.chip_name, "Sensirion SFA30");
        assert_eq!(info.interface, "UART IIC");
    }
}
