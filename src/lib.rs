// src/lib.rs
//! Configuration and probing engine for the Fintek F81216 family of
//! LPC-to-UART Super-I/O bridges.
//!
//! The F81216 multiplexes four logical UARTs behind a single indexed
//! address/data register pair reachable through one of two standard
//! configuration windows (`0x4E` or `0x2E`). This crate discovers which
//! window, unlock key and logical device back an already-configured
//! serial port, and then drives that device's RS-485 half-duplex
//! direction control through the chip's configuration registers.
//!
//! The serial data path itself (framing, FIFOs, interrupts) is out of
//! scope: the embedding serial driver keeps owning the UART's own I/O
//! range and merely hands its base address to [`probe`].
//!
//! # Discovery flow
//!
//! 1. Platform firmware is queried for the I/O windows it reserves for
//!    motherboard resources ([`firmware::FirmwareResources`]).
//! 2. Each admissible window is reserved and scanned across the four
//!    known unlock keys; chip identity is verified before any further
//!    registers are touched.
//! 3. The logical device whose programmed I/O base equals the caller's
//!    address becomes the [`ChipHandle`] used for all later RS-485
//!    reconfiguration.

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_op_in_unsafe_fn)]
#![warn(missing_docs)]

pub mod firmware;
pub mod superio;
pub mod sync;

pub use firmware::{FirmwareResources, IoResource};
#[cfg(target_arch = "x86_64")]
pub use superio::backend::PortIoBackend;
#[cfg(not(target_arch = "x86_64"))]
pub use superio::backend::StubBackend;
pub use superio::backend::ConfigBus;
pub use superio::{probe, ChipHandle, ProbeError, ProbeTarget, Rs485Config, Rs485Control};
pub use sync::io_region::{reserve, try_reserve, IoRegionGuard};
