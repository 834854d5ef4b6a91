//! Defines the physical inputs of the macropad and the fixed binding of each input to a HID
//! keycode.
//!
//! Intimately related to [crate::scan], which uses these definitions to turn the electrical
//! state of the inputs into the set of currently pressed keys.

use crate::config::{NUM_INPUTS, SENSOR_PINS};
use crate::keycode::*;

/// Electrical level of an input line
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Level {
    Low,
    High,
}

impl From<bool> for Level {
    fn from(high: bool) -> Self {
        if high { Level::High } else { Level::Low }
    }
}

/// Which level an input line sits at while its key is pressed
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ActiveLevel {
    High,
    Low,
}

/// A physical sensor input, identified by its GPIO number.
///
/// Inputs are always configured with the internal pull-up enabled.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct InputLine {
    pub pin: u8,
    pub active: ActiveLevel,
}

impl InputLine {
    pub const fn active_high(pin: u8) -> Self {
        InputLine { pin, active: ActiveLevel::High }
    }

    pub const fn active_low(pin: u8) -> Self {
        InputLine { pin, active: ActiveLevel::Low }
    }

    /// Whether `level` means this line's key is pressed
    pub fn is_triggered(&self, level: Level) -> bool {
        match self.active {
            ActiveLevel::High => level == Level::High,
            ActiveLevel::Low => level == Level::Low,
        }
    }
}

/// Associates one input line with the keycode it produces
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct KeyBinding {
    pub line: InputLine,
    pub keycode: Keycode,
}

/// Ordered, immutable table of [KeyBinding]s. The binding order is also the order keycodes
/// appear in reports.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Keymap<const N: usize> {
    bindings: [KeyBinding; N],
}

impl<const N: usize> Keymap<N> {
    pub const fn new(bindings: [KeyBinding; N]) -> Self {
        Keymap { bindings }
    }

    pub fn bindings(&self) -> &[KeyBinding; N] {
        &self.bindings
    }

    pub const fn len(&self) -> usize {
        N
    }

    pub const fn is_empty(&self) -> bool {
        N == 0
    }

    /// GPIO numbers in binding order
    pub fn pins(&self) -> [u8; N] {
        let mut pins = [0; N];
        for (pin, binding) in pins.iter_mut().zip(self.bindings.iter()) {
            *pin = binding.line.pin;
        }
        pins
    }

    /// Index of the first binding whose GPIO differs from `gpio`, if any
    pub fn pin_mismatch(&self, gpio: &[u8; N]) -> Option<usize> {
        self.bindings.iter().zip(gpio).position(|(binding, pin)| binding.line.pin != *pin)
    }
}

/// Bind an active-high sensor pin to a keycode
const fn b(pin: u8, keycode: Keycode) -> KeyBinding {
    assert!(keycode != NO_KEY);
    KeyBinding { line: InputLine::active_high(pin), keycode }
}

/// The macropad's six sensors, left to right, typing the digits 1 to 6
pub const MACROPAD_KEYMAP: Keymap<NUM_INPUTS> = Keymap::new([
    b(SENSOR_PINS[0], KEY_1),
    b(SENSOR_PINS[1], KEY_2),
    b(SENSOR_PINS[2], KEY_3),
    b(SENSOR_PINS[3], KEY_4),
    b(SENSOR_PINS[4], KEY_5),
    b(SENSOR_PINS[5], KEY_6),
]);
