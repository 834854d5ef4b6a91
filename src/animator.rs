//! Free-running colour cycle for the WS2812 strip driven by the second core.
//!
//! Alternates a blue frame and a red frame, each followed by its own dwell time. Nothing here
//! touches the keyboard side.

use smart_leds::{brightness, RGB8};

use crate::config::{LED_BLUE_DWELL_MS, LED_RED_DWELL_MS};

pub const BLUE: RGB8 = RGB8 { r: 0, g: 0, b: 255 };
pub const RED: RGB8 = RGB8 { r: 255, g: 0, b: 0 };

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Phase {
    Blue,
    Red,
}

impl Phase {
    fn color(self) -> RGB8 {
        match self {
            Phase::Blue => BLUE,
            Phase::Red => RED,
        }
    }

    fn dwell_ms(self) -> u64 {
        match self {
            Phase::Blue => LED_BLUE_DWELL_MS,
            Phase::Red => LED_RED_DWELL_MS,
        }
    }

    fn next(self) -> Phase {
        match self {
            Phase::Blue => Phase::Red,
            Phase::Red => Phase::Blue,
        }
    }
}

/// One frame to push to the strip, and how long to leave it up
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Frame<const N: usize> {
    pub pixels: [RGB8; N],
    pub dwell_ms: u64,
}

pub struct LedAnimator<const N: usize> {
    phase: Phase,
    brightness: u8,
}

impl<const N: usize> LedAnimator<N> {
    pub const fn new(brightness: u8) -> Self {
        LedAnimator { phase: Phase::Blue, brightness }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Fills the strip with the current phase's colour and moves to the other phase.
    pub fn next_frame(&mut self) -> Frame<N> {
        let mut pixels = [RGB8::default(); N];
        let scaled = brightness(core::iter::repeat(self.phase.color()).take(N), self.brightness);
        for (pixel, color) in pixels.iter_mut().zip(scaled) {
            *pixel = color;
        }

        let frame = Frame { pixels, dwell_ms: self.phase.dwell_ms() };
        self.phase = self.phase.next();
        frame
    }
}
