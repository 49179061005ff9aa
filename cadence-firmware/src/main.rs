//! Cadence - periodic controller firmware
//!
//! Main firmware binary for RP2040 boards. Samples a button and an analog
//! sensor, drives two LEDs, and publishes everything to a host over a
//! serial link, all from one cooperative fixed-tick scheduler.

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::adc::{Adc, Channel, Config as AdcConfig};
use embassy_rp::bind_interrupts;
use embassy_rp::gpio::{Input, Level, Output, Pull};
use embassy_rp::peripherals::UART0;
use embassy_rp::pwm::{Config as PwmConfig, Pwm};
use embassy_rp::uart::{BufferedInterruptHandler, Uart};
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use cadence_core::tasks::{SerialInputTask, SerialOutputTask};
use cadence_core::{Scheduler, Task};
use cadence_hal::{IoStream, UartConfig};
use cadence_hal_rp2040::{Rp2040Inputs, Rp2040Outputs, Rp2040Platform};
use cadence_protocol::SerialManager;

mod board;
mod config;
mod tasks;

bind_interrupts!(struct Irqs {
    UART0_IRQ => BufferedInterruptHandler<UART0>;
});

// Static cells for UART buffers (must live forever)
static TX_BUF: StaticCell<[u8; 256]> = StaticCell::new();
static RX_BUF: StaticCell<[u8; 256]> = StaticCell::new();

/// Passes between statistics reports (one minute at the default tick)
const STATS_INTERVAL: u32 = 1200;

/// Main entry point
#[embassy_executor::main]
async fn main(_spawner: Spawner) {
    info!("Cadence firmware starting...");

    let p = embassy_rp::init(Default::default());
    info!("Peripherals initialized");

    let config = config::load();
    board::check_pins(&config);

    // Host link
    let uart_config = board::uart_config(&UartConfig::with_baudrate(config.serial.baud_rate));
    let tx_buf = TX_BUF.init([0u8; 256]);
    let rx_buf = RX_BUF.init([0u8; 256]);
    let uart = Uart::new_blocking(p.UART0, p.PIN_0, p.PIN_1, uart_config);
    let uart = uart.into_buffered(Irqs, tx_buf, rx_buf);
    info!("UART0 at {} baud", config.serial.baud_rate);

    // Inputs
    let adc = Adc::new_blocking(p.ADC, AdcConfig::default());
    let mut inputs = Rp2040Inputs::new(adc);
    if let Err(e) = inputs
        .digital
        .add(board::BUTTON_PIN, Input::new(p.PIN_2, Pull::Down))
    {
        warn!("Button not registered: {}", e);
    }
    if let Err(e) = inputs
        .analog
        .add(board::ANALOG_PIN, Channel::new_pin(p.PIN_26, Pull::None))
    {
        warn!("Analog input not registered: {}", e);
    }
    let platform = Rp2040Platform::new(inputs);

    // Outputs
    let mut outputs = Rp2040Outputs::new();
    if let Err(e) = outputs.add_digital(board::LED_PIN, Output::new(p.PIN_25, Level::Low)) {
        warn!("LED not registered: {}", e);
    }
    let (_, dimmer) = Pwm::new_output_b(p.PWM_SLICE7, p.PIN_15, PwmConfig::default()).split();
    match dimmer {
        Some(channel) => {
            if let Err(e) = outputs.add_pwm(board::DIMMER_PIN, channel) {
                warn!("Dimmer not registered: {}", e);
            }
        }
        None => warn!("PWM7 B channel unavailable, dimmer disabled"),
    }
    info!("Inputs and outputs initialized");

    // Published values
    let values = tasks::SensorValues::new();
    let manager = SerialManager::new(IoStream::new(uart));
    let ids = (
        manager.add_byte(&values.pressed),
        manager.add_int(&values.level),
        manager.add_text(&values.state),
    );
    if let (Some(pressed), Some(level), Some(state)) = ids {
        info!("Variables: pressed={} level={} state={}", pressed, level, state);
    } else {
        warn!("Variable register full");
    }

    // Tasks, registered in the order of RuntimeConfig::task_periods
    let mut output = SerialOutputTask::new(&manager);
    let mut input = SerialInputTask::new(&manager);
    let mut sensors = tasks::SensorTask::new(&platform, config.inputs, &values, &manager);
    let mut indicators = tasks::IndicatorTask::new(&outputs, config.outputs, &values, &manager);

    let [output_ms, input_ms, sample_ms, refresh_ms] = config.task_periods();
    output.init(output_ms);
    input.init(input_ms);
    sensors.init(sample_ms);
    indicators.init(refresh_ms);

    let mut scheduler = Scheduler::new(&platform);
    scheduler.init(config.scheduler.base_period_ms);
    let registry: [&mut dyn Task; 4] = [&mut output, &mut input, &mut sensors, &mut indicators];
    for task in registry {
        if !scheduler.add_task(task) {
            warn!("Task dropped, scheduler full");
        }
    }

    info!(
        "{} tasks registered, base period {} ms",
        scheduler.task_count(),
        scheduler.base_period()
    );

    loop {
        scheduler.schedule();
        if scheduler.stats().passes % STATS_INTERVAL == 0 {
            debug!("Scheduler: {}", scheduler.stats());
        }
    }
}
