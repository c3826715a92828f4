//! Sella - Auto-leveling seating unit firmware
//!
//! Main firmware binary for RP2040-based controller boards. Two relays
//! drive the sit/lie linear actuators, two MPU6050s report backrest and
//! seat-pan orientation, a serial wireless gateway carries the remote
//! command link, and presence/gas sensors hang off the ADC.

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::adc::{Adc, Channel as AdcChannel, InterruptHandler as AdcInterruptHandler};
use embassy_rp::bind_interrupts;
use embassy_rp::gpio::{Level, Output, Pull};
use embassy_rp::i2c::{self, I2c};
use embassy_rp::peripherals::{I2C0, UART0};
use embassy_rp::uart::{BufferedInterruptHandler, Config as UartConfig, Uart};
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use sella_drivers::relay::{RelayActuator, RelayPair};
use sella_hal_rp2040::Rp2040FlashStore;

use crate::presets::PresetStore;
use crate::tasks::RelayOut;

mod channels;
mod controller;
mod presets;
mod tasks;

bind_interrupts!(struct Irqs {
    UART0_IRQ => BufferedInterruptHandler<UART0>;
    I2C0_IRQ => i2c::InterruptHandler<I2C0>;
    ADC_IRQ_FIFO => AdcInterruptHandler;
});

// Static cells for UART buffers (must live forever)
static TX_BUF: StaticCell<[u8; 256]> = StaticCell::new();
static RX_BUF: StaticCell<[u8; 256]> = StaticCell::new();

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("Sella firmware starting...");

    let p = embassy_rp::init(Default::default());
    info!("Peripherals initialized");

    // Flash-backed preset store; calibration offsets load once at boot
    let mut store = PresetStore::new(Rp2040FlashStore::new(p.FLASH, p.DMA_CH0));
    let offsets = store.calibration().await;
    info!(
        "Calibration offsets: {} / {} x10",
        offsets.back_x10, offsets.seat_x10
    );

    // Gateway UART (9600 baud serial wireless module)
    let uart_config = {
        let mut cfg = UartConfig::default();
        cfg.baudrate = 9600;
        cfg
    };

    let tx_buf = TX_BUF.init([0u8; 256]);
    let rx_buf = RX_BUF.init([0u8; 256]);

    let uart = Uart::new_blocking(p.UART0, p.PIN_0, p.PIN_1, uart_config);
    let uart = uart.into_buffered(Irqs, tx_buf, rx_buf);
    let (tx, rx) = uart.split();

    info!("UART initialized for gateway communication");

    // Actuator relays (active-high relay board)
    let relays = RelayPair::new(
        RelayActuator::new_active_high(RelayOut::new(Output::new(p.PIN_14, Level::Low))),
        RelayActuator::new_active_high(RelayOut::new(Output::new(p.PIN_15, Level::Low))),
    );

    info!("Relays initialized");

    // I2C bus shared by both orientation sensors
    let i2c = I2c::new_async(p.I2C0, p.PIN_5, p.PIN_4, Irqs, i2c::Config::default());

    // ADC with presence and gas channels
    let adc = Adc::new(p.ADC, Irqs, embassy_rp::adc::Config::default());
    let presence_ch = AdcChannel::new_pin(p.PIN_26, Pull::None);
    let gas_ch = AdcChannel::new_pin(p.PIN_27, Pull::None);

    info!("I2C and ADC initialized");

    // Spawn tasks
    spawner.spawn(tasks::tick_task()).unwrap();
    spawner.spawn(tasks::link_rx_task(rx)).unwrap();
    spawner.spawn(tasks::link_tx_task(tx)).unwrap();
    spawner.spawn(tasks::actuator_task(relays)).unwrap();
    spawner
        .spawn(tasks::orientation_task(
            i2c,
            offsets,
            tasks::SamplerConfig::default(),
        ))
        .unwrap();
    spawner
        .spawn(tasks::sensors_task(
            adc,
            presence_ch,
            gas_ch,
            tasks::SensorsConfig::default(),
        ))
        .unwrap();
    spawner.spawn(tasks::controller_task(store)).unwrap();

    info!("All tasks spawned, firmware running");

    // Main task has nothing else to do - all work happens in spawned tasks
    loop {
        embassy_time::Timer::after_secs(60).await;
        trace!("Main loop heartbeat");
    }
}
