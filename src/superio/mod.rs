// src/superio/mod.rs

//! F81216 configuration engine: discovery and RS-485 control.
//!
//! The bridge exposes its configuration registers through an indexed
//! address/data port pair that is shared, lockable and keyed: a window
//! base must be known, the right vendor key written twice to enter
//! configuration mode, and the mode left again after every transaction.
//! Nothing on the bus says where the chip sits or which key a board
//! wired in, so discovery scans the small space of standard windows and
//! known keys, gated by the chip's identity registers.
//!
//! Discovery yields a [`ChipHandle`] naming (window, key, logical
//! device); the handle is the only state this module keeps and it is
//! owned by the caller, not by the crate.

pub mod backend;
pub mod constants;

mod access;
mod error;
mod rs485;
mod scan;

pub use error::ProbeError;
pub use rs485::{Rs485Config, Rs485Control};

use access::ConfigSession;
use backend::ConfigBus;
use constants::LOGICAL_DEVICE_COUNT;
use scan::{admissible_windows, Candidate, CandidateScan};

use crate::firmware::FirmwareResources;

/// The probe input: the I/O base address of an already-configured UART.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProbeTarget {
    /// Base address the serial driver already owns, e.g. `0x3F8`.
    pub io_address: u16,
}

/// One logical device on one discovered bridge instance.
///
/// Immutable once discovered and owned by the serial port session that
/// discovered it. The fields stay private: a handle that was not
/// produced by [`probe`] could point register writes at arbitrary
/// hardware.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChipHandle {
    base_port: u16,
    key: u8,
    index: u8,
}

impl ChipHandle {
    /// Configuration window this chip answers on.
    pub fn base_port(&self) -> u16 {
        self.base_port
    }

    /// Logical device number backing the probed UART.
    pub fn logical_device(&self) -> u8 {
        self.index
    }
}

/// Locate the bridge and logical device behind `target`.
///
/// Scans the cross-product of firmware-declared configuration windows
/// and known unlock keys; the first candidate whose identity matches
/// and which exposes `target.io_address` on one of its logical devices
/// wins and terminates the whole scan. Windows reserved by other agents
/// are skipped without waiting.
///
/// Failure is normal and non-fatal: the serial port keeps operating,
/// just without RS-485 control.
///
/// # Errors
///
/// - [`ProbeError::InvalidTarget`] for a zero target address, before
///   any hardware is touched.
/// - [`ProbeError::Exhausted`] when the whole window/key/device space
///   has no match. A failed scan leaves no chip-side state behind:
///   only the idempotent unlock/lock toggles and register selects were
///   issued.
pub fn probe<B: ConfigBus, R: FirmwareResources>(
    bus: &mut B,
    firmware: &R,
    target: ProbeTarget,
) -> Result<ChipHandle, ProbeError> {
    if target.io_address == 0 {
        return Err(ProbeError::InvalidTarget);
    }

    for candidate in CandidateScan::new(admissible_windows(firmware)) {
        if let Some(index) = locate_device(bus, candidate, target.io_address) {
            log::debug!(
                "found F81216 behind {:#x} (key {:#04x}), uart {} at {:#x}",
                candidate.base_port,
                candidate.key,
                index,
                target.io_address
            );
            return Ok(ChipHandle {
                base_port: candidate.base_port,
                key: candidate.key,
                index,
            });
        }
    }

    log::debug!("no F81216 exposes {:#x}", target.io_address);
    Err(ProbeError::Exhausted)
}

/// Identity-check one candidate and walk its logical devices for the
/// target address. An identity mismatch is the expected outcome for
/// most candidates and simply moves the scan along.
fn locate_device<B: ConfigBus>(bus: &mut B, candidate: Candidate, io_address: u16) -> Option<u8> {
    let mut session = ConfigSession::enter(bus, candidate.base_port, candidate.key);
    session.verify_identity().ok()?;

    (0..LOGICAL_DEVICE_COUNT).find(|&index| {
        session.select_logical_device(index);
        session.logical_device_io_base() == io_address
    })
}
