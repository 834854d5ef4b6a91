//! Implements the USB device and the task transporting HID [KeyReport]s to the host.
//! Mostly lifted from [embassy_usb] examples.
//!
//! The scan task talks to this module only through [UsbTransport] and the signals below; the
//! USB stack itself runs in [run].

use core::sync::atomic::{AtomicBool, Ordering};

use defmt::{debug, info, warn};
use embassy_futures::join::join;
use embassy_futures::select::{select, Either};
use embassy_rp::{
    bind_interrupts,
    peripherals::USB,
    usb::{Driver, InterruptHandler},
};
use embassy_sync::{channel::Channel, signal::Signal};
use embassy_usb::{
    class::hid::{HidReaderWriter, ReportId, RequestHandler, State as HidState},
    control::OutResponse,
    Builder, Handler, UsbDevice,
};
use pico_macropad_lib::config::{
    USB_HID_POLL_MS, USB_MANUFACTURER, USB_MAX_POWER, USB_PID, USB_PRODUCT, USB_SERIAL_NUMBER,
    USB_VID,
};
use pico_macropad_lib::report::KEY_REPORT_SIZE;
use pico_macropad_lib::{Error, KeyReport, LinkState, ReportTransport};
use usbd_hid::descriptor::SerializedDescriptor;

use static_cell::StaticCell;

type MyDriver = Driver<'static, USB>;
type MyUsbDevice = UsbDevice<'static, MyDriver>;
type MyHidReaderWriter = HidReaderWriter<'static, MyDriver, 8, KEY_REPORT_SIZE>;

/// Everything here is touched from core 0 only.
type RawMutex = embassy_sync::blocking_mutex::raw::ThreadModeRawMutex;

bind_interrupts!(pub(crate) struct Irqs {
    USBCTRL_IRQ => InterruptHandler<USB>;
});

/// Single slot between the scan task and the HID writer; a full slot means "not ready".
static REPORTS: Channel<RawMutex, KeyReport, 1> = Channel::new();
/// Set while the HID writer waits for the host to take a report.
static IN_FLIGHT: AtomicBool = AtomicBool::new(false);
static CONFIGURED: AtomicBool = AtomicBool::new(false);
static SUSPENDED: AtomicBool = AtomicBool::new(false);
/// Whether the host has armed remote wakeup (SET_FEATURE DEVICE_REMOTE_WAKEUP)
static REMOTE_WAKEUP_ENABLED: AtomicBool = AtomicBool::new(false);
static REMOTE_WAKEUP: Signal<RawMutex, ()> = Signal::new();
static REPORT_COMPLETE: Signal<RawMutex, ()> = Signal::new();

pub fn get_device(driver: MyDriver) -> (MyUsbDevice, MyHidReaderWriter) {
    let mut config = embassy_usb::Config::new(USB_VID, USB_PID);
    config.manufacturer = Some(USB_MANUFACTURER);
    config.product = Some(USB_PRODUCT);
    config.serial_number = Some(USB_SERIAL_NUMBER);
    config.max_power = USB_MAX_POWER;
    config.max_packet_size_0 = 64;
    config.supports_remote_wakeup = true;

    static DEVICE_HANDLER: StaticCell<MacropadDeviceHandler> = StaticCell::new();

    static CONFIG_DESC: StaticCell<[u8; 256]> = StaticCell::new();
    static BOS_DESC: StaticCell<[u8; 256]> = StaticCell::new();
    static CONTROL_BUF: StaticCell<[u8; 128]> = StaticCell::new();
    let mut builder = Builder::new(
        driver,
        config,
        &mut CONFIG_DESC.init([0; 256])[..],
        &mut BOS_DESC.init([0; 256])[..],
        &mut [], // no msos descriptors
        &mut CONTROL_BUF.init([0; 128])[..],
    );

    builder.handler(DEVICE_HANDLER.init(MacropadDeviceHandler));

    static STATE: StaticCell<HidState> = StaticCell::new();
    let config = embassy_usb::class::hid::Config {
        report_descriptor: KeyReport::desc(),
        request_handler: None,
        poll_ms: USB_HID_POLL_MS,
        max_packet_size: 64,
    };
    let hid = HidReaderWriter::<_, 8, KEY_REPORT_SIZE>::new(&mut builder, STATE.init(HidState::new()), config);

    (builder.build(), hid)
}

/// The scan task's view of the HID interface.
pub struct UsbTransport;

impl ReportTransport for UsbTransport {
    fn is_ready(&self) -> bool {
        CONFIGURED.load(Ordering::Relaxed)
            && !SUSPENDED.load(Ordering::Relaxed)
            && !IN_FLIGHT.load(Ordering::Relaxed)
            && REPORTS.is_empty()
    }

    fn send_keyboard_report(&mut self, report: &KeyReport) -> Result<(), Error> {
        if !CONFIGURED.load(Ordering::Relaxed) {
            return Err(Error::Disconnected);
        }
        REPORTS.try_send(*report).map_err(|_| Error::NotReady)
    }
}

pub fn link_state() -> LinkState {
    if SUSPENDED.load(Ordering::Relaxed) {
        LinkState::Suspended { remote_wakeup: REMOTE_WAKEUP_ENABLED.load(Ordering::Relaxed) }
    } else {
        LinkState::Active
    }
}

/// Ask the host to resume the bus. Only has an effect while suspended.
pub fn request_remote_wakeup() {
    REMOTE_WAKEUP.signal(());
}

/// Signalled each time the host has taken a report
pub fn report_complete() -> &'static Signal<RawMutex, ()> {
    &REPORT_COMPLETE
}

#[embassy_executor::task]
pub async fn run(mut usb: MyUsbDevice, hid: MyHidReaderWriter) {
    // Run the USB device, leaving suspend either on host resume or by our own wakeup request.
    let usb_fut = async {
        loop {
            usb.run_until_suspend().await;
            match select(usb.wait_resume(), REMOTE_WAKEUP.wait()).await {
                Either::First(()) => {}
                Either::Second(()) => match usb.remote_wakeup().await {
                    Ok(()) => info!("Remote wakeup sent"),
                    Err(_e) => debug!("Remote wakeup refused"),
                },
            }
        }
    };

    let (reader, mut writer) = hid.split();

    let in_fut = async {
        loop {
            let report = REPORTS.receive().await;
            IN_FLIGHT.store(true, Ordering::Relaxed);
            let result = writer.write_serialize(&report).await;
            IN_FLIGHT.store(false, Ordering::Relaxed);
            match result {
                Ok(()) => REPORT_COMPLETE.signal(()),
                Err(e) => warn!("Failed to send report: {:?}", e),
            }
        }
    };

    let out_fut = async {
        static REQUEST_HANDLER: StaticCell<MacropadRequestHandler> = StaticCell::new();
        reader.run(true, REQUEST_HANDLER.init(MacropadRequestHandler)).await;
    };

    join(usb_fut, join(in_fut, out_fut)).await;
}

/// Host-initiated report requests. The macropad has nothing to report on demand and no
/// output state, so both directions are acknowledged and otherwise ignored.
struct MacropadRequestHandler;

impl RequestHandler for MacropadRequestHandler {
    fn get_report(&mut self, _id: ReportId, _buf: &mut [u8]) -> Option<usize> {
        debug!("GET_REPORT not implemented, stalling");
        None
    }

    fn set_report(&mut self, _id: ReportId, data: &[u8]) -> OutResponse {
        debug!("SET_REPORT ignored ({} bytes)", data.len());
        OutResponse::Accepted
    }

    fn set_idle_ms(&mut self, _id: Option<ReportId>, _dur: u32) {}

    fn get_idle_ms(&mut self, _id: Option<ReportId>) -> Option<u32> {
        None
    }
}

struct MacropadDeviceHandler;

impl Handler for MacropadDeviceHandler {
    fn enabled(&mut self, enabled: bool) {
        CONFIGURED.store(false, Ordering::Relaxed);
        SUSPENDED.store(false, Ordering::Relaxed);
        if enabled {
            info!("Device enabled");
        } else {
            info!("Device disabled");
        }
    }

    fn reset(&mut self) {
        CONFIGURED.store(false, Ordering::Relaxed);
        SUSPENDED.store(false, Ordering::Relaxed);
        REMOTE_WAKEUP_ENABLED.store(false, Ordering::Relaxed);
        info!("Bus reset, the Vbus current limit is 100mA");
    }

    fn addressed(&mut self, addr: u8) {
        CONFIGURED.store(false, Ordering::Relaxed);
        info!("USB address set to: {}", addr);
    }

    fn configured(&mut self, configured: bool) {
        CONFIGURED.store(configured, Ordering::Relaxed);
        if configured {
            info!("Device configured, it may now draw up to the configured current limit from Vbus.")
        } else {
            info!("Device is no longer configured, the Vbus current limit is 100mA.");
        }
    }

    fn suspended(&mut self, suspended: bool) {
        SUSPENDED.store(suspended, Ordering::Relaxed);
        if suspended {
            info!("Device suspended");
        } else {
            info!("Device resumed");
        }
    }

    fn remote_wakeup_enabled(&mut self, enabled: bool) {
        REMOTE_WAKEUP_ENABLED.store(enabled, Ordering::Relaxed);
        debug!("Remote wakeup enabled by host: {}", enabled);
    }
}
