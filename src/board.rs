//! Binds the board's GPIOs to the library's input and indicator traits.

use embassy_rp::gpio::{Input, Output};
use pico_macropad_lib::config::NUM_INPUTS;
use pico_macropad_lib::{Level, LineReader, StatusIndicator};

/// The key sensors, in binding order. Configured as inputs with pull-up.
pub struct SensorPins<'a> {
    pins: [Input<'a>; NUM_INPUTS],
}

impl<'a> SensorPins<'a> {
    pub fn new(pins: [Input<'a>; NUM_INPUTS]) -> Self {
        SensorPins { pins }
    }
}

impl LineReader for SensorPins<'_> {
    fn level(&mut self, index: usize) -> Level {
        Level::from(self.pins[index].is_high())
    }
}

/// Onboard LED, lit while any key is down
pub struct StatusLed<'a> {
    pin: Output<'a>,
}

impl<'a> StatusLed<'a> {
    pub fn new(pin: Output<'a>) -> Self {
        StatusLed { pin }
    }
}

impl StatusIndicator for StatusLed<'_> {
    fn set_active(&mut self, active: bool) {
        if active {
            self.pin.set_high()
        } else {
            self.pin.set_low()
        }
    }
}
