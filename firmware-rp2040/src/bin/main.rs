#![no_std]
#![no_main]

use defmt::info;
use defmt_rtt as _;
use embassy_executor::Spawner;
use embassy_rp::gpio::{Level, Output};
use embassy_time::Delay;
use sfa30_rp2040::{run, Sfa30};

#[cfg(feature = "iface-i2c")]
use embassy_rp::i2c::{Config as I2cConfig, I2c};
#[cfg(feature = "iface-i2c")]
use sfa30_rp2040::I2cTransport;

#[cfg(feature = "iface-uart")]
use embassy_rp::bind_interrupts;
#[cfg(feature = "iface-uart")]
use embassy_rp::peripherals::UART1;
#[cfg(feature = "iface-uart")]
use embassy_rp::uart::{BufferedInterruptHandler, BufferedUart, Config as UartConfig};
#[cfg(feature = "iface-uart")]
use sfa30_rp2040::{UartTransport, UART_BAUDRATE};
#[cfg(feature = "iface-uart")]
use static_cell::StaticCell;

#[cfg(feature = "dev-panic")]
use panic_probe as _;
#[cfg(feature = "prod-panic")]
use panic_reset as _;

#[cfg(feature = "iface-uart")]
bind_interrupts!(struct Irqs {
    UART1_IRQ => BufferedInterruptHandler<UART1>;
});

/// UART ring buffers; one SHDLC frame fits each.
#[cfg(feature = "iface-uart")]
static TX_BUF: StaticCell<[u8; 256]> = StaticCell::new();
#[cfg(feature = "iface-uart")]
static RX_BUF: StaticCell<[u8; 256]> = StaticCell::new();

#[embassy_executor::main]
async fn main(_spawner: Spawner) -> ! {
    info!("SFA30 demo starting...");

    let p = embassy_rp::init(embassy_rp::config::Config::default());

    // On-board LED for error indication
    let led = Output::new(p.PIN_25, Level::High);

    // --- I2C Setup ---
    #[cfg(feature = "iface-i2c")]
    let sensor = {
        let mut config = I2cConfig::default();
        config.frequency = 100_000;
        let i2c = I2c::new_blocking(p.I2C0, p.PIN_1, p.PIN_0, config);
        Sfa30::new(I2cTransport::new(i2c, Delay))
    };

    // --- UART Setup ---
    #[cfg(feature = "iface-uart")]
    let sensor = {
        let mut config = UartConfig::default();
        config.baudrate = UART_BAUDRATE;
        let tx_buf = TX_BUF.init([0; 256]);
        let rx_buf = RX_BUF.init([0; 256]);
        let uart = BufferedUart::new(
            p.UART1,
            p.PIN_8, // TX
            p.PIN_9, // RX
            Irqs,
            tx_buf,
            rx_buf,
            config,
        );
        Sfa30::new(UartTransport::new(uart, Delay))
    };

    run(sensor, led).await
}
