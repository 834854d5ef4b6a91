//! End-to-end checks of the scan -> emit -> transport path, driven by a simulated clock and
//! simulated input lines. Runs on the host.

use pico_macropad_lib::config::{NUM_INPUTS, REPORT_ID_KEYBOARD, SCAN_INTERVAL_MS};
use pico_macropad_lib::keycode::*;
use pico_macropad_lib::{
    Emission, EmitterState, Error, KeyReport, Level, LineReader, LinkState, ReportMode, ReportTransport,
    ScanScheduler, Scanner, StatusIndicator, Tick, MACROPAD_KEYMAP,
};

// ============================================================================
// Simulated board
// ============================================================================

#[derive(Default)]
struct Lines([bool; NUM_INPUTS]);

impl Lines {
    fn press(&mut self, index: usize) {
        self.0[index] = true;
    }

    fn release_all(&mut self) {
        self.0 = [false; NUM_INPUTS];
    }
}

impl LineReader for Lines {
    fn level(&mut self, index: usize) -> Level {
        Level::from(self.0[index])
    }
}

#[derive(Default)]
struct Host {
    busy: bool,
    reports: Vec<KeyReport>,
}

impl ReportTransport for Host {
    fn is_ready(&self) -> bool {
        !self.busy
    }

    fn send_keyboard_report(&mut self, report: &KeyReport) -> Result<(), Error> {
        self.reports.push(*report);
        Ok(())
    }
}

#[derive(Default)]
struct Led(bool);

impl StatusIndicator for Led {
    fn set_active(&mut self, active: bool) {
        self.0 = active;
    }
}

/// The primary core's loop with the clock advanced by hand
struct Board {
    scanner: Scanner<'static, Lines, Host, Led, NUM_INPUTS>,
    link: LinkState,
    now: u32,
    scans: usize,
    wakeups: usize,
}

impl Board {
    fn new() -> Self {
        Board::with_mode(ReportMode::Polled)
    }

    fn with_mode(mode: ReportMode) -> Self {
        Board {
            scanner: Scanner::new(
                &MACROPAD_KEYMAP,
                Lines::default(),
                Host::default(),
                Led::default(),
                ScanScheduler::new(SCAN_INTERVAL_MS, mode),
            ),
            link: LinkState::Active,
            now: 0,
            scans: 0,
            wakeups: 0,
        }
    }

    fn lines(&mut self) -> &mut Lines {
        self.scanner.lines_mut()
    }

    fn host(&self) -> &Host {
        self.scanner.transport()
    }

    fn led_on(&self) -> bool {
        self.scanner.indicator().0
    }

    /// Advance the clock by `ms`, polling every millisecond
    fn run_for(&mut self, ms: u32) {
        for _ in 0..ms {
            self.now += 1;
            match self.scanner.poll(self.now, self.link) {
                Tick::Scanned(_) => self.scans += 1,
                Tick::RemoteWakeup => self.wakeups += 1,
                Tick::Idle => {}
            }
        }
    }

    /// Run exactly up to the next scan
    fn tick(&mut self) {
        let scans = self.scans;
        while self.scans == scans {
            self.run_for(1);
        }
    }
}

// ============================================================================
// Scenarios
// ============================================================================

#[test]
fn single_key_press_release_then_silence() {
    let mut board = Board::new();

    board.lines().press(0); // pin 11
    board.tick();
    assert_eq!(
        board.host().reports,
        vec![KeyReport { report_id: REPORT_ID_KEYBOARD, modifier: 0, keycodes: [KEY_1, 0, 0, 0, 0, 0] }]
    );
    assert!(board.led_on());

    board.lines().release_all();
    board.tick();
    assert_eq!(
        board.host().reports.last(),
        Some(&KeyReport { report_id: REPORT_ID_KEYBOARD, modifier: 0, keycodes: [0; 6] })
    );
    assert!(!board.led_on());

    let sent = board.host().reports.len();
    board.run_for(1_000);
    assert_eq!(board.host().reports.len(), sent);
}

#[test]
fn all_keys_pressed_reported_in_binding_order() {
    let mut board = Board::new();
    for index in 0..NUM_INPUTS {
        board.lines().press(index);
    }
    board.tick();

    let report = board.host().reports[0];
    assert_eq!(report.keycodes, [KEY_1, KEY_2, KEY_3, KEY_4, KEY_5, KEY_6]);
    assert_eq!(report.to_bytes(), [1, 0, 0, 0x1E, 0x1F, 0x20, 0x21, 0x22, 0x23]);
    assert!(board.led_on());
}

#[test]
fn release_is_delivered_once_transport_is_ready_again() {
    let mut board = Board::new();
    board.lines().press(3);
    board.tick();

    board.scanner.transport_mut().busy = true;
    board.lines().release_all();
    for _ in 0..4 {
        board.tick();
        assert_eq!(board.scanner.emitter_state(), EmitterState::KeysActive);
    }
    assert_eq!(board.host().reports.len(), 1);

    board.scanner.transport_mut().busy = false;
    board.tick();
    assert_eq!(board.scanner.emitter_state(), EmitterState::IdleNoKeys);
    assert_eq!(board.host().reports.iter().filter(|r| r.is_release()).count(), 1);

    board.run_for(300);
    assert_eq!(board.host().reports.iter().filter(|r| r.is_release()).count(), 1);
}

#[test]
fn busy_transport_drops_scans_without_backlog() {
    let mut board = Board::new();
    board.scanner.transport_mut().busy = true;
    board.lines().press(1);
    board.run_for(30);
    board.lines().release_all();
    board.scanner.transport_mut().busy = false;
    board.run_for(30);

    // The press was never seen by the host, so there is nothing to release either.
    assert!(board.host().reports.is_empty());
}

#[test]
fn scan_count_tracks_elapsed_time() {
    let mut board = Board::new();
    board.run_for(10_000);
    let expected = 10_000 / SCAN_INTERVAL_MS as usize;
    assert!(board.scans.abs_diff(expected) <= 1);
}

#[test]
fn suspended_link_wakes_host_instead_of_scanning() {
    let mut board = Board::new();
    board.link = LinkState::Suspended { remote_wakeup: true };
    board.lines().press(2);
    board.run_for(30);

    assert_eq!(board.scans, 0);
    assert_eq!(board.wakeups, 10);
    assert!(board.host().reports.is_empty());

    board.link = LinkState::Active;
    board.tick();
    assert_eq!(board.host().reports[0].keycodes[0], KEY_3);
}

#[test]
fn suspended_link_without_wakeup_permission_stays_quiet() {
    let mut board = Board::new();
    board.link = LinkState::Suspended { remote_wakeup: false };
    board.lines().press(0);
    board.run_for(3_000);

    assert_eq!(board.wakeups, 0);
    assert_eq!(board.scans, 0);
    assert!(board.host().reports.is_empty());
}

#[test]
fn chained_mode_scans_again_as_soon_as_the_report_is_taken() {
    let mut board = Board::with_mode(ReportMode::Chained);
    board.lines().press(4);
    board.tick();
    assert_eq!(board.host().reports.len(), 1);

    let now = board.now;
    let emission = board.scanner.report_complete(board.link);
    assert!(matches!(emission, Some(Emission::Pressed(_))));
    assert_eq!(board.host().reports.len(), 2);
    assert_eq!(board.host().reports[1].keycodes[0], KEY_5);

    board.lines().release_all();
    assert_eq!(board.scanner.report_complete(board.link), Some(Emission::Released));
    assert_eq!(board.now, now);
    assert!(!board.led_on());
}

#[test]
fn polled_mode_ignores_report_completion() {
    let mut board = Board::new();
    board.lines().press(4);
    board.tick();

    assert_eq!(board.scanner.report_complete(board.link), None);
    assert_eq!(board.host().reports.len(), 1);
}
