//! Decides, once per scan, whether a report goes to the host.
//!
//! A pressed report is sent on every ready tick while keys are down; when the last key goes up
//! exactly one release report follows, and after that the emitter stays quiet until something
//! is pressed again.

use crate::error::Error;
use crate::report::KeyReport;
use crate::scan::ActiveKeySet;

/// Where the HID reports go. Implemented over embassy-usb in the firmware and by mocks in tests.
pub trait ReportTransport {
    /// Whether a report handed over now would be accepted
    fn is_ready(&self) -> bool;
    fn send_keyboard_report(&mut self, report: &KeyReport) -> Result<(), Error>;
}

/// Binary "a key is down" indicator, the onboard LED on the real board.
pub trait StatusIndicator {
    fn set_active(&mut self, active: bool);
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EmitterState {
    #[default]
    IdleNoKeys,
    /// The last report sent had at least one key in it
    KeysActive,
}

/// What [ReportEmitter::emit] did on one tick
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Emission {
    /// Transport not ready; the scan was dropped and nothing changed
    Skipped,
    Pressed(KeyReport),
    Released,
    /// Nothing pressed and the release was already sent
    Suppressed,
    /// The transport refused the report; state unchanged so the next tick retries
    Failed(Error),
}

#[derive(Debug, Default)]
pub struct ReportEmitter {
    state: EmitterState,
}

impl ReportEmitter {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn state(&self) -> EmitterState {
        self.state
    }

    pub fn emit<T, S, const N: usize>(
        &mut self,
        keys: &ActiveKeySet<N>,
        transport: &mut T,
        indicator: &mut S,
    ) -> Emission
    where
        T: ReportTransport,
        S: StatusIndicator,
    {
        if !transport.is_ready() {
            return Emission::Skipped;
        }

        if !keys.is_empty() {
            let report = KeyReport::pressed(keys);
            if let Err(e) = transport.send_keyboard_report(&report) {
                return Emission::Failed(e);
            }
            self.state = EmitterState::KeysActive;
            indicator.set_active(true);
            return Emission::Pressed(report);
        }

        let emission = match self.state {
            EmitterState::KeysActive => {
                if let Err(e) = transport.send_keyboard_report(&KeyReport::released()) {
                    return Emission::Failed(e);
                }
                Emission::Released
            }
            EmitterState::IdleNoKeys => Emission::Suppressed,
        };
        self.state = EmitterState::IdleNoKeys;
        indicator.set_active(false);
        emission
    }
}
