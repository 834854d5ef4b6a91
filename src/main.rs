//! Firmware for a six-key USB macropad based on the Raspberry Pi Pico, using the [embassy_rp]
//! framework.
//!
//! Core 0 scans the keys and runs USB; core 1 only animates the LED strip. The two cores share
//! no state.

#![no_main]
#![no_std]

mod board;
mod led;
mod usb;

use defmt::{debug, error, info, unwrap, warn};
use embassy_executor::Executor;
use embassy_futures::select::{select, Either};
use embassy_rp::{
    gpio::{Input, Level, Output, Pin, Pull},
    multicore::{spawn_core1, Stack},
};
use embassy_time::{Instant, Timer};
use pico_macropad_lib::config::{
    LED_STRIP_PIN, NUM_INPUTS, REPORT_MODE, SCAN_INTERVAL_MS, SENSOR_PINS, STATUS_LED_PIN,
};
use pico_macropad_lib::{Emission, ScanScheduler, Scanner, Tick, MACROPAD_KEYMAP};
use static_cell::StaticCell;

use {defmt_rtt as _, panic_reset as _};

/// Yields the GPIO numbers and the configured inputs, both in the order given
macro_rules! sensor_pins {
    ($dev:ident; $($pin:ident),*) => {(
        [ $($dev.$pin.pin()),* ],
        [ $(Input::new($dev.$pin, Pull::Up)),* ],
    )}
}

static mut CORE1_STACK: Stack<4096> = Stack::new();
static EXECUTOR0: StaticCell<Executor> = StaticCell::new();
static EXECUTOR1: StaticCell<Executor> = StaticCell::new();

#[cortex_m_rt::entry]
fn main() -> ! {
    let p = embassy_rp::init(Default::default());
    let status_gpio = p.PIN_25.pin();
    let strip_gpio = p.PIN_10.pin();
    check_pin("Status LED", status_gpio, STATUS_LED_PIN);
    check_pin("LED strip", strip_gpio, LED_STRIP_PIN);

    let strips = led::StripPeripherals {
        pio: p.PIO0,
        data_pin: p.PIN_10,
        dma: p.DMA_CH0,
        #[cfg(feature = "second-strip")]
        pio2: p.PIO1,
        #[cfg(feature = "second-strip")]
        data_pin2: p.PIN_21,
        #[cfg(feature = "second-strip")]
        dma2: p.DMA_CH1,
    };
    spawn_core1(
        p.CORE1,
        unsafe { &mut *core::ptr::addr_of_mut!(CORE1_STACK) },
        move || {
            let executor1 = EXECUTOR1.init(Executor::new());
            executor1.run(|spawner| unwrap!(spawner.spawn(led::run(strips))));
        },
    );

    // Same order as SENSOR_PINS.
    let (sensor_gpio, mut sensor_pins): ([u8; NUM_INPUTS], [Input; NUM_INPUTS]) = sensor_pins!(p;
        PIN_11, PIN_20, PIN_13, PIN_19, PIN_12, PIN_18
    );
    if let Some(i) = MACROPAD_KEYMAP.pin_mismatch(&sensor_gpio) {
        error!("Sensor {} is wired to GPIO{} but configured as GPIO{}", i, sensor_gpio[i], SENSOR_PINS[i]);
    }
    info!(
        "Macropad starting, sensors on {}, status LED on GPIO{}, strip on GPIO{}",
        sensor_gpio, status_gpio, strip_gpio
    );
    for pin in &mut sensor_pins {
        pin.set_schmitt(true);
    }
    let sensors = board::SensorPins::new(sensor_pins);
    let status_led = board::StatusLed::new(Output::new(p.PIN_25, Level::Low));

    let usb_driver = embassy_rp::usb::Driver::new(p.USB, usb::Irqs);
    let (usb_device, hid) = usb::get_device(usb_driver);

    let executor0 = EXECUTOR0.init(Executor::new());
    executor0.run(|spawner| {
        unwrap!(spawner.spawn(usb::run(usb_device, hid)));
        unwrap!(spawner.spawn(run_scanner(sensors, status_led)));
    })
}

/// The typed peripheral decides the wiring; config.rs only names it
fn check_pin(what: &str, wired: u8, configured: u8) {
    if wired != configured {
        error!("{} is wired to GPIO{} but configured as GPIO{}", what, wired, configured);
    }
}

fn now_ms() -> u32 {
    Instant::now().as_millis() as u32
}

fn log_emission(emission: Emission) {
    match emission {
        Emission::Pressed(report) => debug!("Pressed {}", report.keycodes),
        Emission::Released => debug!("Released"),
        Emission::Failed(e) => warn!("Report not sent: {}", e),
        Emission::Skipped | Emission::Suppressed => {}
    }
}

#[embassy_executor::task]
async fn run_scanner(sensors: board::SensorPins<'static>, status_led: board::StatusLed<'static>) {
    let scheduler = ScanScheduler::starting_at(SCAN_INTERVAL_MS, REPORT_MODE, now_ms());
    info!("Scanning every {} ms ({})", SCAN_INTERVAL_MS, scheduler.mode());
    let mut scanner = Scanner::new(&MACROPAD_KEYMAP, sensors, usb::UsbTransport, status_led, scheduler);

    loop {
        let now = now_ms();
        match scanner.poll(now, usb::link_state()) {
            Tick::Scanned(emission) => log_emission(emission),
            Tick::RemoteWakeup => usb::request_remote_wakeup(),
            Tick::Idle => {
                let wait = Timer::after_millis(u64::from(scanner.wait_ms(now)));
                if let Either::Second(()) = select(wait, usb::report_complete().wait()).await {
                    if let Some(emission) = scanner.report_complete(usb::link_state()) {
                        log_emission(emission);
                    }
                }
            }
        }
    }
}
