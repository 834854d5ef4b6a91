//! The HID keyboard report sent to the host, and the report descriptor announcing it.
//!
//! Layout on the wire (9 bytes):
//! ```text
//! Byte 0:   Report ID
//! Byte 1:   Modifier bits (always 0, the macropad has no modifier keys)
//! Byte 2:   Reserved
//! Byte 3-8: Up to 6 keycodes, unused slots are 0
//! ```

use crate::config::{REPORT_ID_KEYBOARD, REPORT_KEYS};
use crate::keycode::{Keycode, NO_KEY};
use crate::scan::ActiveKeySet;

use serde::ser::{Serialize, SerializeTuple, Serializer};
use usbd_hid::descriptor::{AsInputReport, SerializedDescriptor};

/// Size of a serialized [KeyReport], report ID included
pub const KEY_REPORT_SIZE: usize = 3 + REPORT_KEYS;

/// Boot-style keyboard report descriptor, with a report ID so the interface can grow more
/// report types later.
pub const KEYBOARD_REPORT_DESCRIPTOR: &[u8] = &[
    0x05, 0x01,       // Usage Page (Generic Desktop)
    0x09, 0x06,       // Usage (Keyboard)
    0xA1, 0x01,       // Collection (Application)
    0x85, REPORT_ID_KEYBOARD, // Report ID
    0x05, 0x07,       //   Usage Page (Keyboard/Keypad)
    0x19, 0xE0,       //   Usage Minimum (Left Control)
    0x29, 0xE7,       //   Usage Maximum (Right GUI)
    0x15, 0x00,       //   Logical Minimum (0)
    0x25, 0x01,       //   Logical Maximum (1)
    0x95, 0x08,       //   Report Count (8)
    0x75, 0x01,       //   Report Size (1)
    0x81, 0x02,       //   Input (Data, Variable, Absolute) - modifiers
    0x95, 0x01,       //   Report Count (1)
    0x75, 0x08,       //   Report Size (8)
    0x81, 0x01,       //   Input (Constant) - reserved
    0x05, 0x08,       //   Usage Page (LEDs)
    0x19, 0x01,       //   Usage Minimum (Num Lock)
    0x29, 0x05,       //   Usage Maximum (Kana)
    0x95, 0x05,       //   Report Count (5)
    0x75, 0x01,       //   Report Size (1)
    0x91, 0x02,       //   Output (Data, Variable, Absolute) - LEDs
    0x95, 0x01,       //   Report Count (1)
    0x75, 0x03,       //   Report Size (3)
    0x91, 0x01,       //   Output (Constant) - padding
    0x05, 0x07,       //   Usage Page (Keyboard/Keypad)
    0x19, 0x00,       //   Usage Minimum (0)
    0x2A, 0xFF, 0x00, //   Usage Maximum (255)
    0x15, 0x00,       //   Logical Minimum (0)
    0x26, 0xFF, 0x00, //   Logical Maximum (255)
    0x95, REPORT_KEYS as u8, // Report Count
    0x75, 0x08,       //   Report Size (8)
    0x81, 0x00,       //   Input (Data, Array, Absolute) - keycodes
    0xC0,             // End Collection
];

/// A keyboard input report.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct KeyReport {
    pub report_id: u8,
    pub modifier: u8,
    pub keycodes: [Keycode; REPORT_KEYS],
}

impl KeyReport {
    /// Report for the keys in `keys`, padded with [NO_KEY]
    pub fn pressed<const N: usize>(keys: &ActiveKeySet<N>) -> Self {
        KeyReport {
            report_id: REPORT_ID_KEYBOARD,
            modifier: 0,
            keycodes: keys.padded(),
        }
    }

    /// The "all keys released" report
    pub const fn released() -> Self {
        KeyReport {
            report_id: REPORT_ID_KEYBOARD,
            modifier: 0,
            keycodes: [NO_KEY; REPORT_KEYS],
        }
    }

    pub fn is_release(&self) -> bool {
        self.modifier == 0 && self.keycodes.iter().all(|&k| k == NO_KEY)
    }

    pub fn to_bytes(&self) -> [u8; KEY_REPORT_SIZE] {
        let mut buf = [0u8; KEY_REPORT_SIZE];
        buf[0] = self.report_id;
        buf[1] = self.modifier;
        buf[3..].copy_from_slice(&self.keycodes);
        buf
    }
}

impl Serialize for KeyReport {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let bytes = self.to_bytes();
        let mut tup = serializer.serialize_tuple(bytes.len())?;
        for byte in &bytes {
            tup.serialize_element(byte)?;
        }
        tup.end()
    }
}

impl AsInputReport for KeyReport {}

impl SerializedDescriptor for KeyReport {
    fn desc() -> &'static [u8] {
        KEYBOARD_REPORT_DESCRIPTOR
    }
}
