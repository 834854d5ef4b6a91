//! Compile-time configuration of the macropad: pin assignments, timing, USB identity and LED
//! parameters. Everything tunable lives here.

use crate::scheduler::ReportMode;

/// How many physical key inputs there are
pub const NUM_INPUTS: usize = 6;
/// Width of the keycode array in a HID keyboard report
pub const REPORT_KEYS: usize = 6;

/// GPIO numbers of the key sensors, in binding order.
///
/// Only used for documentation and logging; the typed pins are picked in `main.rs` and must
/// be kept in the same order.
pub const SENSOR_PINS: [u8; NUM_INPUTS] = [11, 20, 13, 19, 12, 18];

/// Scan cadence of the input scanner (ms)
pub const SCAN_INTERVAL_MS: u32 = 3;

#[cfg(not(feature = "chained-reports"))]
pub const REPORT_MODE: ReportMode = ReportMode::Polled;
#[cfg(feature = "chained-reports")]
pub const REPORT_MODE: ReportMode = ReportMode::Chained;

/// Report ID of the keyboard report in [crate::report::KEYBOARD_REPORT_DESCRIPTOR]
pub const REPORT_ID_KEYBOARD: u8 = 1;

// USB

/// pid.codes test VID/PID
pub const USB_VID: u16 = 0x1209;
pub const USB_PID: u16 = 0x0001;
pub const USB_MANUFACTURER: &str = "Macropad";
pub const USB_PRODUCT: &str = "Pico Macropad";
pub const USB_SERIAL_NUMBER: &str = "001";
/// mA
pub const USB_MAX_POWER: u16 = 100;
/// HID interrupt endpoint polling interval (ms)
pub const USB_HID_POLL_MS: u8 = 1;

// LEDs

/// GPIO of the onboard status LED
pub const STATUS_LED_PIN: u8 = 25;
/// Data pin of the WS2812 strip
pub const LED_STRIP_PIN: u8 = 10;
/// Data pin of the optional second strip (`second-strip` feature)
pub const LED_STRIP2_PIN: u8 = 21;
pub const LED_LENGTH: usize = 3;
/// Global strip brightness, 0..=255
pub const LED_BRIGHTNESS: u8 = 80;
/// Delay before core 1 touches the strip (ms)
pub const LED_STARTUP_DELAY_MS: u64 = 500;
/// How long the blue frame stays up (ms)
pub const LED_BLUE_DWELL_MS: u64 = 500;
/// Delay after the red frame before the cycle repeats (ms)
pub const LED_RED_DWELL_MS: u64 = 10;
