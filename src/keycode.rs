//! USB HID keyboard usage IDs (usage page 0x07) used by the macropad.
//!
//! Only the codes the keymap and its tests bind are listed.

/// A HID keyboard usage ID as sent in the keycode array of a report
pub type Keycode = u8;

/// Sentinel for an unused slot in a report
pub const NO_KEY: Keycode = 0x00;

pub const KEY_A: Keycode = 0x04;
pub const KEY_B: Keycode = 0x05;
pub const KEY_C: Keycode = 0x06;

pub const KEY_1: Keycode = 0x1E;
pub const KEY_2: Keycode = 0x1F;
pub const KEY_3: Keycode = 0x20;
pub const KEY_4: Keycode = 0x21;
pub const KEY_5: Keycode = 0x22;
pub const KEY_6: Keycode = 0x23;
