// src/superio/rs485.rs

//! RS-485 transceiver-direction control.
//!
//! RS-485 is half-duplex: the transceiver direction follows the RTS
//! line, and the chip can invert that line, retime it from a dedicated
//! RS-485 source and stretch it around transmissions. All of it sits in
//! one per-device control register; this module translates the abstract
//! policy into that register's bit layout and commits it.

use bitflags::bitflags;

use super::access::ConfigSession;
use super::backend::ConfigBus;
use super::constants::{register_index, CONFIG_WINDOW_LEN};
use super::ChipHandle;
use crate::sync::io_region;

bitflags! {
    /// Bit layout of the RS-485 control register (index 0xF0).
    pub struct Rs485Control: u8 {
        /// Stretch RTS by four character times before a transmission.
        const TXW4C_IRA = 1 << 2;
        /// Hold RTS for four character times after a transmission.
        const RXW4C_IRA = 1 << 3;
        /// Drive RTS from the RS-485 direction timing source.
        const RS485_URA = 1 << 4;
        /// Invert the RTS line.
        const RTS_INVERT = 1 << 5;
    }
}

/// Abstract transceiver-direction policy for one logical UART.
///
/// This is what callers hand in; [`Rs485Config::canonicalize`] reduces
/// it to what the hardware can actually honor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Rs485Config {
    /// Half-duplex direction control is active.
    pub enabled: bool,
    /// Drive RTS active while transmitting.
    pub rts_on_send: bool,
    /// Drive RTS active after the transmission completes.
    pub rts_after_send: bool,
    /// Delay the transmitter after raising RTS. The chip knows only
    /// on/off; any requested delay means "on".
    pub delay_before_send: bool,
    /// Keep RTS asserted for a while after the last character.
    pub delay_after_send: bool,
}

impl Rs485Config {
    /// The fully-disabled policy.
    pub const DISABLED: Self = Self {
        enabled: false,
        rts_on_send: false,
        rts_after_send: false,
        delay_before_send: false,
        delay_after_send: false,
    };

    /// Reduce the request to hardware-supported terms and derive the
    /// control-register value.
    ///
    /// Pure: the caller's value is untouched. The returned config is
    /// the authoritative caller-visible state once the register value
    /// has been written.
    ///
    /// Equal RTS polarities cannot encode a direction change, so such a
    /// request comes back with `enabled` cleared and without the timing
    /// source bit — while the register value keeps the delay and invert
    /// bits accumulated up to that point. The hardware is left with a
    /// degenerate non-zero configuration that the canonical config
    /// reports as disabled; known chip behavior, kept as is.
    pub fn canonicalize(self) -> (Self, Rs485Control) {
        if !self.enabled {
            return (Self::DISABLED, Rs485Control::empty());
        }

        let mut canonical = self;
        let mut control = Rs485Control::empty();

        if canonical.delay_before_send {
            control |= Rs485Control::TXW4C_IRA;
        }
        if canonical.delay_after_send {
            control |= Rs485Control::RXW4C_IRA;
        }

        if canonical.rts_on_send == canonical.rts_after_send {
            canonical.enabled = false;
        } else {
            control |= Rs485Control::RS485_URA;
        }

        if canonical.rts_on_send {
            control |= Rs485Control::RTS_INVERT;
        }

        (canonical, control)
    }
}

impl ChipHandle {
    /// Program the RS-485 control register of this handle's device.
    ///
    /// Runs in an operational context and may therefore block until the
    /// configuration window can be reserved. The write happens inside a
    /// single unlock → select → write → lock sequence under that
    /// reservation; the session exits before the reservation is
    /// released. Returns the canonical configuration, which is the
    /// caller-visible state from here on — there is no register
    /// read-back.
    pub fn set_rs485<B: ConfigBus>(&self, bus: &mut B, request: Rs485Config) -> Rs485Config {
        let (canonical, control) = request.canonicalize();

        let _window = io_region::reserve(self.base_port, CONFIG_WINDOW_LEN);
        let mut session = ConfigSession::enter(bus, self.base_port, self.key);
        session.select_logical_device(self.index);
        session.write_register(register_index::RS485_CONTROL, control.bits());
        drop(session);

        log::debug!(
            "uart {}: rs485 control {:#04x} (enabled: {})",
            self.index,
            control.bits(),
            canonical.enabled
        );
        canonical
    }
}
