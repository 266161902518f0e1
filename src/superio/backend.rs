// src/superio/backend.rs

//! Hardware abstraction for the configuration port pair.
//!
//! The goal of this module is to hide the raw port I/O behind a
//! lightweight trait so that the probing and RS-485 logic can run
//! unchanged against simulated hardware, and on targets that do not
//! expose x86 style I/O ports at all.

#[cfg(target_arch = "x86_64")]
use x86_64::instructions::port::Port;

/// Minimal abstraction over raw 8-bit port access.
///
/// Each call is a single unbuffered hardware transaction; there is no
/// retry and no buffering. Ordering against other agents touching the
/// same ports comes from the window reservation discipline in
/// [`crate::sync::io_region`], not from this trait.
pub trait ConfigBus {
    /// Write one byte to an absolute port address.
    fn write(&mut self, port: u16, value: u8);
    /// Read one byte from an absolute port address.
    fn read(&mut self, port: u16) -> u8;
}

/// x86 specific implementation backed by port I/O instructions.
#[cfg(target_arch = "x86_64")]
#[derive(Debug, Default)]
pub struct PortIoBackend {
    _private: (),
}

#[cfg(target_arch = "x86_64")]
impl PortIoBackend {
    /// Create a new backend.
    pub const fn new() -> Self {
        Self { _private: () }
    }
}

#[cfg(target_arch = "x86_64")]
impl ConfigBus for PortIoBackend {
    #[inline]
    fn write(&mut self, port: u16, value: u8) {
        // SAFETY: callers hand this backend only ports inside an I/O
        // window they hold a reservation for; a byte-wide out to such a
        // port cannot violate memory safety.
        unsafe { Port::<u8>::new(port).write(value) }
    }

    #[inline]
    fn read(&mut self, port: u16) -> u8 {
        // SAFETY: as for `write`; a byte-wide in has no side effect on
        // memory.
        unsafe { Port::<u8>::new(port).read() }
    }
}

/// Fallback for targets without port I/O: writes are dropped, reads
/// float high like an undriven LPC bus, so every probe rejects cleanly.
#[cfg(not(target_arch = "x86_64"))]
#[derive(Debug, Default)]
pub struct StubBackend {
    _private: (),
}

#[cfg(not(target_arch = "x86_64"))]
impl StubBackend {
    /// Create a new stub backend.
    pub const fn new() -> Self {
        Self { _private: () }
    }
}

#[cfg(not(target_arch = "x86_64"))]
impl ConfigBus for StubBackend {
    #[inline]
    fn write(&mut self, _port: u16, _value: u8) {}

    #[inline]
    fn read(&mut self, _port: u16) -> u8 {
        0xFF
    }
}
