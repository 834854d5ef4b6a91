//! Rate-limits scanning to a fixed cadence against a free-running millisecond clock.
//!
//! The threshold advances by exactly one interval per scan instead of being reset to "now", so
//! loop overhead never accumulates into drift. Clock arithmetic wraps like the hardware timer.

/// When a scan is triggered besides the periodic tick
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ReportMode {
    /// Only the periodic tick scans
    Polled,
    /// A completed report transfer also triggers an immediate scan
    Chained,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LinkState {
    Active,
    /// Bus suspended by the host. `remote_wakeup` is whether the host allowed us to wake it.
    Suspended { remote_wakeup: bool },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SchedulerAction {
    /// Interval not elapsed yet, or suspended without permission to wake the host
    Idle,
    Scan,
    /// The host suspended the bus; ask it to resume instead of scanning
    RemoteWakeup,
}

#[derive(Clone, Debug)]
pub struct ScanScheduler {
    interval_ms: u32,
    threshold_ms: u32,
    mode: ReportMode,
}

impl ScanScheduler {
    pub const fn new(interval_ms: u32, mode: ReportMode) -> Self {
        ScanScheduler { interval_ms, threshold_ms: 0, mode }
    }

    /// Starts counting intervals from `now_ms` rather than from clock zero
    pub const fn starting_at(interval_ms: u32, mode: ReportMode, now_ms: u32) -> Self {
        ScanScheduler { interval_ms, threshold_ms: now_ms, mode }
    }

    pub fn mode(&self) -> ReportMode {
        self.mode
    }

    pub fn poll(&mut self, now_ms: u32, link: LinkState) -> SchedulerAction {
        if now_ms.wrapping_sub(self.threshold_ms) < self.interval_ms {
            return SchedulerAction::Idle;
        }
        self.threshold_ms = self.threshold_ms.wrapping_add(self.interval_ms);

        match link {
            LinkState::Suspended { remote_wakeup: true } => SchedulerAction::RemoteWakeup,
            LinkState::Suspended { remote_wakeup: false } => SchedulerAction::Idle,
            LinkState::Active => SchedulerAction::Scan,
        }
    }

    /// Earliest time at which [ScanScheduler::poll] can return something other than `Idle`
    pub fn next_deadline_ms(&self) -> u32 {
        self.threshold_ms.wrapping_add(self.interval_ms)
    }

    /// How long to sleep from `now_ms` until the next deadline; 0 when it has already passed
    pub fn wait_ms(&self, now_ms: u32) -> u32 {
        let wait = self.next_deadline_ms().wrapping_sub(now_ms);
        if wait > self.interval_ms {
            0
        } else {
            wait
        }
    }

    /// Whether a finished report transfer should trigger a scan right away
    pub fn on_report_complete(&self) -> bool {
        self.mode == ReportMode::Chained
    }
}
