// src/superio/constants.rs

//! Fixed protocol constants for the F81216 configuration interface.

/// Offsets of the two configuration ports from the window base.
pub mod port_offset {
    /// Index (address) port.
    pub const ADDRESS: u16 = 0;
    /// Data port.
    pub const DATA: u16 = 1;
}

/// Indexed configuration registers.
pub mod register_index {
    /// Routes per-device registers to one logical device.
    pub const LOGICAL_DEVICE_SELECT: u8 = 0x07;
    /// Chip ID, low byte.
    pub const CHIP_ID_LOW: u8 = 0x20;
    /// Chip ID, high byte.
    pub const CHIP_ID_HIGH: u8 = 0x21;
    /// First vendor ID byte.
    pub const VENDOR_ID_FIRST: u8 = 0x23;
    /// Second vendor ID byte.
    pub const VENDOR_ID_SECOND: u8 = 0x24;
    /// Selected device's I/O base, high byte.
    pub const IO_BASE_HIGH: u8 = 0x60;
    /// Selected device's I/O base, low byte.
    pub const IO_BASE_LOW: u8 = 0x61;
    /// RS-485 transceiver direction control.
    pub const RS485_CONTROL: u8 = 0xF0;
}

/// Writing this to the address port leaves configuration mode.
pub const EXIT_KEY: u8 = 0xAA;

/// Unlock keys used across the F81216 board variants, in scan order.
pub const UNLOCK_KEYS: [u8; 4] = [0x77, 0xA0, 0x87, 0x67];

/// Standard Super-I/O configuration window bases, in scan order.
pub const CANDIDATE_WINDOWS: [u16; 2] = [0x4E, 0x2E];

/// Width of a configuration window: address port plus data port.
pub const CONFIG_WINDOW_LEN: u16 = 2;

/// Expected value of the first vendor ID byte.
pub const VENDOR_ID_FIRST_VAL: u8 = 0x19;

/// Expected value of the second vendor ID byte.
pub const VENDOR_ID_SECOND_VAL: u8 = 0x34;

/// Chip IDs accepted as F81216 family members.
pub const ACCEPTED_CHIP_IDS: [u16; 2] = [0x1602, 0x0501];

/// Number of logical UART devices behind the bridge.
pub const LOGICAL_DEVICE_COUNT: u8 = 4;

/// Device class whose firmware resources may hide a configuration window.
pub const MOTHERBOARD_RESOURCES: &str = "PNP0C02";
