// src/superio/access.rs

//! Entered configuration sessions over the address/data port pair.

use super::backend::ConfigBus;
use super::constants::{
    port_offset, register_index, ACCEPTED_CHIP_IDS, EXIT_KEY, VENDOR_ID_FIRST_VAL,
    VENDOR_ID_SECOND_VAL,
};
use super::error::ProbeError;

/// A chip held in configuration mode.
///
/// `enter` switches the chip into configuration mode; dropping the
/// session writes the exit sentinel, so every entry is paired with
/// exactly one exit on all return paths. Leaving a chip entered would
/// corrupt unrelated register reads long after the probe, which is why
/// the pairing is tied to scope and not to call discipline.
///
/// The caller must hold the reservation for the window's two ports for
/// the whole lifetime of the session (see [`crate::sync::io_region`]).
pub(crate) struct ConfigSession<'bus, B: ConfigBus> {
    bus: &'bus mut B,
    base_port: u16,
}

impl<'bus, B: ConfigBus> ConfigSession<'bus, B> {
    /// Switch the chip behind `base_port` into configuration mode.
    ///
    /// The key goes to the address port twice in immediate succession;
    /// the chip latches the mode change only on the second write.
    pub(crate) fn enter(bus: &'bus mut B, base_port: u16, key: u8) -> Self {
        bus.write(base_port + port_offset::ADDRESS, key);
        bus.write(base_port + port_offset::ADDRESS, key);
        Self { bus, base_port }
    }

    fn select_index(&mut self, index: u8) {
        self.bus.write(self.base_port + port_offset::ADDRESS, index);
    }

    /// Read the register at `index`.
    pub(crate) fn read_register(&mut self, index: u8) -> u8 {
        self.select_index(index);
        self.bus.read(self.base_port + port_offset::DATA)
    }

    /// Write `value` to the register at `index`.
    pub(crate) fn write_register(&mut self, index: u8, value: u8) {
        self.select_index(index);
        self.bus.write(self.base_port + port_offset::DATA, value);
    }

    /// Route the per-device register bank to logical device `index`.
    pub(crate) fn select_logical_device(&mut self, index: u8) {
        self.write_register(register_index::LOGICAL_DEVICE_SELECT, index);
    }

    /// Programmed I/O base of the currently selected logical device.
    ///
    /// The low byte lives at index 0x61 and is read first, then the
    /// high byte at 0x60; the register map predates the "low register
    /// first" convention.
    pub(crate) fn logical_device_io_base(&mut self) -> u16 {
        let low = self.read_register(register_index::IO_BASE_LOW);
        let high = self.read_register(register_index::IO_BASE_HIGH);
        u16::from(low) | (u16::from(high) << 8)
    }

    /// Confirm that an F81216 family member answers on this session.
    ///
    /// The two vendor bytes gate the chip ID read: almost every
    /// non-matching (window, key) pair is rejected after a single
    /// register probe, and the chip ID registers are only ever touched
    /// once the vendor matched.
    pub(crate) fn verify_identity(&mut self) -> Result<(), ProbeError> {
        if self.read_register(register_index::VENDOR_ID_FIRST) != VENDOR_ID_FIRST_VAL {
            return Err(ProbeError::DeviceNotFound);
        }
        if self.read_register(register_index::VENDOR_ID_SECOND) != VENDOR_ID_SECOND_VAL {
            return Err(ProbeError::DeviceNotFound);
        }

        let low = self.read_register(register_index::CHIP_ID_LOW);
        let high = self.read_register(register_index::CHIP_ID_HIGH);
        let chip_id = u16::from(low) | (u16::from(high) << 8);

        if ACCEPTED_CHIP_IDS.contains(&chip_id) {
            Ok(())
        } else {
            Err(ProbeError::DeviceNotFound)
        }
    }
}

impl<B: ConfigBus> Drop for ConfigSession<'_, B> {
    fn drop(&mut self) {
        self.bus.write(self.base_port + port_offset::ADDRESS, EXIT_KEY);
    }
}
