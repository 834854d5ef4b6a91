//! The primary core's scan loop, minus the waiting.
//!
//! [Scanner] owns the input lines, the transport and the status indicator together with the
//! emitter and the scheduler. The firmware task only supplies the clock, the link state and the
//! sleeps between calls.

use crate::emitter::{Emission, EmitterState, ReportEmitter, ReportTransport, StatusIndicator};
use crate::keymap::Keymap;
use crate::scan::{scan, LineReader};
use crate::scheduler::{LinkState, ScanScheduler, SchedulerAction};

/// Outcome of one [Scanner::poll]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Tick {
    Idle,
    Scanned(Emission),
    /// The caller should ask the host to resume the bus
    RemoteWakeup,
}

pub struct Scanner<'k, R, T, S, const N: usize> {
    keymap: &'k Keymap<N>,
    lines: R,
    transport: T,
    indicator: S,
    emitter: ReportEmitter,
    scheduler: ScanScheduler,
}

impl<'k, R, T, S, const N: usize> Scanner<'k, R, T, S, N>
where
    R: LineReader,
    T: ReportTransport,
    S: StatusIndicator,
{
    pub fn new(keymap: &'k Keymap<N>, lines: R, transport: T, indicator: S, scheduler: ScanScheduler) -> Self {
        Scanner { keymap, lines, transport, indicator, emitter: ReportEmitter::new(), scheduler }
    }

    pub fn poll(&mut self, now_ms: u32, link: LinkState) -> Tick {
        match self.scheduler.poll(now_ms, link) {
            SchedulerAction::Idle => Tick::Idle,
            SchedulerAction::Scan => Tick::Scanned(self.scan_and_emit()),
            SchedulerAction::RemoteWakeup => Tick::RemoteWakeup,
        }
    }

    /// Called when the host has taken a report. In chained mode this scans straight away,
    /// independent of the periodic cadence.
    pub fn report_complete(&mut self, link: LinkState) -> Option<Emission> {
        if self.scheduler.on_report_complete() && link == LinkState::Active {
            Some(self.scan_and_emit())
        } else {
            None
        }
    }

    /// See [ScanScheduler::wait_ms]
    pub fn wait_ms(&self, now_ms: u32) -> u32 {
        self.scheduler.wait_ms(now_ms)
    }

    pub fn scheduler(&self) -> &ScanScheduler {
        &self.scheduler
    }

    pub fn emitter_state(&self) -> EmitterState {
        self.emitter.state()
    }

    pub fn lines_mut(&mut self) -> &mut R {
        &mut self.lines
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    pub fn indicator(&self) -> &S {
        &self.indicator
    }

    fn scan_and_emit(&mut self) -> Emission {
        let keys = scan(self.keymap, &mut self.lines);
        self.emitter.emit(&keys, &mut self.transport, &mut self.indicator)
    }
}
