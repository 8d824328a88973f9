// SPDX-FileCopyrightText: 2026 Sentair Labs <hello@sentair.dev>
// SPDX-License-Identifier: GPL-3.0-or-later

#![no_std]
#![no_main]

mod panel;
mod pms;
mod sampler;
mod sensor;
mod server;

use core::pin::pin;
use core::sync::atomic::AtomicBool;

#[cfg(feature = "debug")]
use defmt_rtt as _;
// global logger
use embassy_nrf as _;
// time driver
use panic_probe as _;

use defmt::{info, unwrap, warn};
use embassy_executor::Spawner;
use embassy_nrf::buffered_uarte::{self, BufferedUarte};
use embassy_nrf::gpio::{Level, Output, OutputDrive};
use embassy_nrf::interrupt::{self, InterruptExt};
use embassy_nrf::{bind_interrupts, peripherals, spim, uarte};
use embassy_sync::blocking_mutex::raw::ThreadModeRawMutex;
use embassy_sync::rwlock::RwLock;
use embassy_time::Delay;
use embedded_hal_bus::spi::ExclusiveDevice;
use mipidsi::interface::SpiInterface;
use mipidsi::models::ST7789;
use mipidsi::Builder as MipidsiBuilder;
use nrf_softdevice::ble::Connection;
use nrf_softdevice::Softdevice;
use sampling::Gateway;
use static_cell::StaticCell;

use crate::panel::Panel;
use crate::sampler::run_sampler;
use crate::sensor::Hpma115s0;
use crate::server::{initialize_sd, run_bluetooth, Server};

bind_interrupts!(struct Irqs {
    UARTE0_UART0 => buffered_uarte::InterruptHandler<peripherals::UARTE0>;
    SPIM2_SPIS2_SPI2 => spim::InterruptHandler<peripherals::SPI2>;
});

#[cfg(not(feature = "debug"))]
mod dummy_logging {
    #[defmt::global_logger]
    struct Logger;

    unsafe impl defmt::Logger for Logger {
        fn acquire() {}

        unsafe fn flush() {}

        unsafe fn release() {}

        unsafe fn write(_bytes: &[u8]) {}
    }
}

/// Set by the radio task when the peer subscribes to fine-particulate
/// notifications, cleared on unsubscribe and on disconnect. The
/// scheduler samples it exactly once per tick.
static SUBSCRIBED: AtomicBool = AtomicBool::new(false);

/// The live connection, if any. Written by the radio task, read by the
/// sampler to address its notifications.
static CONNECTION: RwLock<ThreadModeRawMutex, Option<Connection>> = RwLock::new(None);

#[embassy_executor::task]
async fn softdevice_task(sd: &'static Softdevice) -> ! {
    info!("SD is running");
    sd.run().await
}

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    let mut conf = embassy_nrf::config::Config::default();
    conf.hfclk_source = embassy_nrf::config::HfclkSource::ExternalXtal;
    conf.lfclk_source = embassy_nrf::config::LfclkSource::ExternalXtal;

    conf.gpiote_interrupt_priority = interrupt::Priority::P2;
    conf.time_interrupt_priority = interrupt::Priority::P2;

    let p = embassy_nrf::init(conf);

    // set priority to avoid collisions with softdevice
    interrupt::UARTE0_UART0.set_priority(interrupt::Priority::P3);
    interrupt::SPIM2_SPIS2_SPI2.set_priority(interrupt::Priority::P3);

    // Sensor UART, 9600 8N1 per the HPMA115S0 datasheet
    let uart = {
        let mut config = uarte::Config::default();
        config.parity = uarte::Parity::EXCLUDED;
        config.baudrate = uarte::Baudrate::BAUD9600;

        static UART_RX_BUF: StaticCell<[u8; 64]> = StaticCell::new();
        static UART_TX_BUF: StaticCell<[u8; 16]> = StaticCell::new();
        BufferedUarte::new(
            p.UARTE0,
            p.TIMER1,
            p.PPI_CH0,
            p.PPI_CH1,
            p.PPI_GROUP0,
            Irqs,
            p.P0_13,
            p.P0_15,
            config,
            UART_RX_BUF.init([0; 64]),
            UART_TX_BUF.init([0; 16]),
        )
    };

    // Display over SPI
    let mut panel = {
        let mut config = spim::Config::default();
        config.frequency = spim::Frequency::M8;
        let spi = spim::Spim::new_txonly(p.SPI2, Irqs, p.P0_26, p.P0_27, config);
        let cs = Output::new(p.P0_28, Level::High, OutputDrive::Standard);
        let spi_device = unwrap!(ExclusiveDevice::new_no_delay(spi, cs).ok());
        let dc = Output::new(p.P0_29, Level::Low, OutputDrive::Standard);
        let rst = Output::new(p.P0_30, Level::Low, OutputDrive::Standard);

        static SPI_BUF: StaticCell<[u8; 64]> = StaticCell::new();
        let di = SpiInterface::new(spi_device, dc, SPI_BUF.init([0; 64]));
        let display = unwrap!(
            MipidsiBuilder::new(ST7789, di)
                .display_size(panel::WIDTH, panel::HEIGHT)
                .reset_pin(rst)
                .init(&mut Delay)
                .ok(),
            "Initializing the display failed"
        );
        Panel::new(display)
    };

    let sd = initialize_sd();

    let server = unwrap!(Server::new(sd), "Creating the GATT server failed");
    unwrap!(spawner.spawn(softdevice_task(sd)), "Spawning the softdevice failed");

    let mut sensor = Hpma115s0::new(uart);
    if sensor.init().await.is_err() {
        // Not fatal: the first reads will carry the error marker and
        // the sensor is re-commanded on every tick anyway.
        warn!("sensor bring-up failed");
    }
    let gateway = Gateway::new(sensor);

    panel.welcome();
    info!("setup ready");

    let sampler = run_sampler(sd, &server, gateway, panel);
    let ble = run_bluetooth(sd, &server);

    futures::future::select(pin!(sampler), pin!(ble)).await;
}
