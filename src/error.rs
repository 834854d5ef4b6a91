//! Error type shared by the report path.
//!
//! Every variant is recoverable: the scan loop just tries again on its next tick.

/// Why a report could not be handed to the USB transport.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// The transport cannot take a report right now (not configured, suspended or busy).
    NotReady,
    /// The transport went away between the readiness check and the send.
    Disconnected,
}
