//! Reads the key inputs and maps the ones currently pressed to keycodes. Uses definitions from
//! [crate::keymap], and produces the [ActiveKeySet] consumed by [crate::emitter].
//!
//! There is deliberately no debouncing: the result is a pure function of the levels read in
//! this scan.

use crate::keycode::{Keycode, NO_KEY};
use crate::keymap::{Keymap, Level};

/// Instantaneous access to the input lines, indexed by binding position.
///
/// Reads cannot fail; a broken sensor shows up as a stuck or chattering level.
pub trait LineReader {
    fn level(&mut self, index: usize) -> Level;
}

/// Keycodes of the keys pressed in one scan, in binding order.
///
/// Invariant: `len <= N`, slots `0..len` hold keycodes, the rest hold [NO_KEY].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ActiveKeySet<const N: usize> {
    keys: [Keycode; N],
    len: usize,
}

impl<const N: usize> Default for ActiveKeySet<N> {
    fn default() -> Self {
        ActiveKeySet { keys: [NO_KEY; N], len: 0 }
    }
}

impl<const N: usize> ActiveKeySet<N> {
    pub fn new() -> Self {
        Default::default()
    }

    /// Appends `keycode`, returning `false` (and dropping it) if the set is already full.
    pub fn push(&mut self, keycode: Keycode) -> bool {
        if self.len >= N {
            return false;
        }
        self.keys[self.len] = keycode;
        self.len += 1;
        true
    }

    pub fn len(&self) -> usize {
        self.len
    }

    /// Presence is decided by how many keys were written, never by the keycode values.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn keycodes(&self) -> &[Keycode] {
        &self.keys[..self.len]
    }

    /// Copies the keycodes into a `W`-wide array, padding with [NO_KEY] and truncating to `W`.
    pub fn padded<const W: usize>(&self) -> [Keycode; W] {
        let mut out = [NO_KEY; W];
        for (slot, keycode) in out.iter_mut().zip(self.keycodes()) {
            *slot = *keycode;
        }
        out
    }

    /// Builds the set from the current level of every bound line.
    pub fn from_levels<const K: usize>(keymap: &Keymap<K>, levels: &[Level; K]) -> Self {
        let mut set = Self::new();
        for (binding, level) in keymap.bindings().iter().zip(levels) {
            if binding.line.is_triggered(*level) && !set.push(binding.keycode) {
                break;
            }
        }
        set
    }
}

/// Reads every line once, in binding order, and maps the triggered ones to their keycodes.
pub fn scan<R: LineReader, const N: usize>(keymap: &Keymap<N>, reader: &mut R) -> ActiveKeySet<N> {
    let levels: [Level; N] = core::array::from_fn(|index| reader.level(index));
    ActiveKeySet::from_levels(keymap, &levels)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::NUM_INPUTS;
    use crate::keycode::*;
    use crate::keymap::{InputLine, KeyBinding, MACROPAD_KEYMAP};

    /// Levels for the lines whose bit is set in `mask`, bit 0 being the first binding
    fn levels_for(mask: u8) -> [Level; NUM_INPUTS] {
        core::array::from_fn(|i| Level::from(mask & (1 << i) != 0))
    }

    struct FakeLines {
        levels: [Level; NUM_INPUTS],
        reads: [usize; NUM_INPUTS],
    }

    impl LineReader for FakeLines {
        fn level(&mut self, index: usize) -> Level {
            self.reads[index] += 1;
            self.levels[index]
        }
    }

    #[test]
    fn every_subset_maps_to_bound_keys_in_binding_order() {
        let bound = [KEY_1, KEY_2, KEY_3, KEY_4, KEY_5, KEY_6];
        for mask in 0u8..(1 << NUM_INPUTS) {
            let set = ActiveKeySet::<NUM_INPUTS>::from_levels(&MACROPAD_KEYMAP, &levels_for(mask));
            let expected: Vec<Keycode> = bound
                .iter()
                .enumerate()
                .filter(|(i, _)| mask & (1 << i) != 0)
                .map(|(_, k)| *k)
                .collect();
            assert_eq!(set.keycodes(), expected.as_slice(), "mask {mask:#08b}");
            assert_eq!(set.len(), mask.count_ones() as usize);
        }
    }

    #[test]
    fn nothing_pressed_is_empty() {
        let set = ActiveKeySet::<NUM_INPUTS>::from_levels(&MACROPAD_KEYMAP, &[Level::Low; NUM_INPUTS]);
        assert!(set.is_empty());
        assert_eq!(set.padded::<6>(), [NO_KEY; 6]);
    }

    #[test]
    fn first_line_only() {
        let set = ActiveKeySet::<NUM_INPUTS>::from_levels(&MACROPAD_KEYMAP, &levels_for(0b000001));
        assert_eq!(set.padded::<6>(), [KEY_1, 0, 0, 0, 0, 0]);
    }

    #[test]
    fn non_adjacent_lines_are_packed_left() {
        let set = ActiveKeySet::<NUM_INPUTS>::from_levels(&MACROPAD_KEYMAP, &levels_for(0b100100));
        assert_eq!(set.padded::<6>(), [KEY_3, KEY_6, 0, 0, 0, 0]);
    }

    #[test]
    fn push_refuses_beyond_capacity() {
        let mut set = ActiveKeySet::<2>::new();
        assert!(set.push(KEY_A));
        assert!(set.push(KEY_B));
        assert!(!set.push(KEY_C));
        assert_eq!(set.keycodes(), &[KEY_A, KEY_B]);
    }

    #[test]
    fn more_triggered_lines_than_capacity_are_truncated() {
        let keymap = Keymap::new([
            KeyBinding { line: InputLine::active_high(1), keycode: KEY_A },
            KeyBinding { line: InputLine::active_high(2), keycode: KEY_B },
            KeyBinding { line: InputLine::active_high(3), keycode: KEY_C },
        ]);
        let set = ActiveKeySet::<2>::from_levels(&keymap, &[Level::High; 3]);
        assert_eq!(set.len(), 2);
        assert_eq!(set.keycodes(), &[KEY_A, KEY_B]);
    }

    #[test]
    fn padded_truncates_to_narrower_width() {
        let set = ActiveKeySet::<NUM_INPUTS>::from_levels(&MACROPAD_KEYMAP, &levels_for(0b111111));
        assert_eq!(set.padded::<4>(), [KEY_1, KEY_2, KEY_3, KEY_4]);
    }

    #[test]
    fn active_low_lines_trigger_on_low() {
        let keymap = Keymap::new([
            KeyBinding { line: InputLine::active_low(4), keycode: KEY_A },
            KeyBinding { line: InputLine::active_low(5), keycode: KEY_B },
        ]);
        let set = ActiveKeySet::<2>::from_levels(&keymap, &[Level::High, Level::Low]);
        assert_eq!(set.keycodes(), &[KEY_B]);
    }

    #[test]
    fn scan_reads_each_line_once() {
        let mut lines = FakeLines { levels: levels_for(0b010010), reads: [0; NUM_INPUTS] };
        let set = scan(&MACROPAD_KEYMAP, &mut lines);
        assert_eq!(lines.reads, [1; NUM_INPUTS]);
        assert_eq!(set.keycodes(), &[KEY_2, KEY_5]);
    }

    #[test]
    fn scan_has_no_history() {
        let mut lines = FakeLines { levels: levels_for(0b111111), reads: [0; NUM_INPUTS] };
        assert_eq!(scan(&MACROPAD_KEYMAP, &mut lines).len(), 6);
        lines.levels = levels_for(0);
        assert!(scan(&MACROPAD_KEYMAP, &mut lines).is_empty());
    }

    /// OR-ing the keycode slots together only agrees with the written-key count because no
    /// bound keycode is zero. Bind a zero and the two disagree.
    #[test]
    fn or_reduction_is_not_a_presence_test() {
        fn or_reduced(keys: &[Keycode]) -> bool {
            keys.iter().fold(0, |acc, k| acc | k) != 0
        }

        for mask in 0u8..(1 << NUM_INPUTS) {
            let set = ActiveKeySet::<NUM_INPUTS>::from_levels(&MACROPAD_KEYMAP, &levels_for(mask));
            assert_eq!(or_reduced(&set.padded::<6>()), !set.is_empty());
        }

        let keymap = Keymap::new([
            KeyBinding { line: InputLine::active_high(1), keycode: NO_KEY },
            KeyBinding { line: InputLine::active_high(2), keycode: KEY_A },
        ]);
        let set = ActiveKeySet::<2>::from_levels(&keymap, &[Level::High, Level::Low]);
        assert!(!set.is_empty());
        assert!(!or_reduced(&set.padded::<2>()));
    }
}
