//! Measurement loop shared by both interface builds.

use defmt::{error, info, warn};
use embassy_rp::gpio::Output;
use embassy_time::{Duration, Timer};
use sfa30_core::{Error, Sfa30, Transport};

/// Time between two samples. The sensor updates its values once per second.
pub const READ_INTERVAL: Duration = Duration::from_secs(1);

/// Time before retrying a failed bring-up.
pub const RETRY_INTERVAL: Duration = Duration::from_secs(5);

/// Initialize the sensor, log its marking and start measuring.
pub fn bring_up<T: Transport>(sensor: &mut Sfa30<T>) -> Result<(), Error> {
    sensor.init()?;

    let chip = Sfa30::<T>::info();
    info!(
        "{} by {}, driver v{}",
        chip.chip_name,
        chip.manufacturer_name,
        chip.driver_version / 1000
    );

    match sensor.read_device_information() {
        Ok(marking) => info!("Device marking: {}", marking.as_str()),
        Err(e) => warn!("Device marking unavailable: {}", e),
    }

    sensor.start_measurement()
}

/// Bring the sensor up and log a sample every [`READ_INTERVAL`].
///
/// Never returns. Read errors toggle `led`. Bring-up failures are retried
/// after a full reset every [`RETRY_INTERVAL`].
pub async fn run<T: Transport>(mut sensor: Sfa30<T>, mut led: Output<'static>) -> ! {
    info!("Using {} interface", sensor.interface().name());

    while let Err(e) = bring_up(&mut sensor) {
        error!("Sensor bring-up failed: {}", e);
        led.toggle();
        if sensor.is_initialized() {
            let _ = sensor.deinit();
        }
        Timer::after(RETRY_INTERVAL).await;
    }
    led.set_low();

    // The first sample is ready about one second after start
    Timer::after(READ_INTERVAL).await;

    loop {
        match sensor.read() {
            Ok(m) => {
                info!(
                    "HCHO: {} ppb, RH: {} %, T: {} C",
                    m.formaldehyde, m.humidity, m.temperature
                );
            }
            Err(e) => {
                error!("Read error: {}", e);
                led.toggle();
            }
        }

        Timer::after(READ_INTERVAL).await;
    }
}
