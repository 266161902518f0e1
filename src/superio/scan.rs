// src/superio/scan.rs

//! Candidate enumeration for the configuration-window scan.
//!
//! The search space is the cross-product of admissible window bases and
//! unlock keys. It is produced lazily by one generator so the consumer
//! is a plain first-match-wins loop instead of nested loops with
//! multi-level breaks.

use super::constants::{CANDIDATE_WINDOWS, CONFIG_WINDOW_LEN, MOTHERBOARD_RESOURCES, UNLOCK_KEYS};
use crate::firmware::FirmwareResources;
use crate::sync::io_region::{self, IoRegionGuard};

/// One (window, key) probe candidate.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Candidate {
    pub(crate) base_port: u16,
    pub(crate) key: u8,
}

/// Window bases worth probing: firmware-declared I/O resources of
/// motherboard devices, wide enough for an address/data pair and sitting
/// at one of the standard Super-I/O locations.
pub(crate) fn admissible_windows<R: FirmwareResources>(
    firmware: &R,
) -> impl Iterator<Item = u16> {
    firmware
        .io_windows(MOTHERBOARD_RESOURCES)
        .filter(|resource| resource.len >= CONFIG_WINDOW_LEN)
        .map(|resource| resource.base)
        .filter(|base| CANDIDATE_WINDOWS.contains(base))
}

/// Lazy (window × key) candidate stream.
///
/// Each window is reserved before any of its keys is yielded, and the
/// reservation is held inside the iterator until that window's keys are
/// exhausted or the iterator is dropped by an early loop exit, so the
/// consumer always operates on a window it exclusively holds. A window
/// that cannot be reserved belongs to somebody else right now and is
/// skipped without waiting: the scan may run from contexts that must
/// not block.
pub(crate) struct CandidateScan<I> {
    windows: I,
    active: Option<ActiveWindow>,
}

struct ActiveWindow {
    base_port: u16,
    next_key: usize,
    _reservation: IoRegionGuard,
}

impl<I: Iterator<Item = u16>> CandidateScan<I> {
    pub(crate) fn new(windows: I) -> Self {
        Self {
            windows,
            active: None,
        }
    }
}

impl<I: Iterator<Item = u16>> Iterator for CandidateScan<I> {
    type Item = Candidate;

    fn next(&mut self) -> Option<Candidate> {
        loop {
            if let Some(active) = self.active.as_mut() {
                if let Some(&key) = UNLOCK_KEYS.get(active.next_key) {
                    active.next_key += 1;
                    return Some(Candidate {
                        base_port: active.base_port,
                        key,
                    });
                }
                // keys exhausted; drops the reservation
                self.active = None;
            }

            let base_port = self.windows.next()?;
            match io_region::try_reserve(base_port, CONFIG_WINDOW_LEN) {
                Some(reservation) => {
                    self.active = Some(ActiveWindow {
                        base_port,
                        next_key: 0,
                        _reservation: reservation,
                    });
                }
                None => {
                    log::debug!("config window {base_port:#x} is busy, skipping");
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::firmware::IoResource;
    use std::sync::{Mutex, MutexGuard, OnceLock};

    /// The candidate windows are fixed addresses, so scan tests share
    /// reservation state and must not run concurrently.
    fn scan_lock() -> MutexGuard<'static, ()> {
        static LOCK: OnceLock<Mutex<()>> = OnceLock::new();
        LOCK.get_or_init(|| Mutex::new(()))
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    struct StaticFirmware(Vec<(&'static str, IoResource)>);

    impl FirmwareResources for StaticFirmware {
        fn io_windows(&self, device_class: &str) -> impl Iterator<Item = IoResource> {
            self.0
                .iter()
                .filter(move |(class, _)| *class == device_class)
                .map(|(_, resource)| *resource)
        }
    }

    fn resource(base: u16, len: u16) -> (&'static str, IoResource) {
        ("PNP0C02", IoResource { base, len })
    }

    #[test]
    fn admissible_windows_filters_class_length_and_base() {
        let firmware = StaticFirmware(vec![
            ("PNP0501", IoResource { base: 0x4E, len: 8 }), // wrong class
            resource(0x4E, 1),                              // too narrow
            resource(0x3F8, 8),                             // not a config window
            resource(0x4E, 2),
            resource(0x2E, 2),
        ]);
        let windows: Vec<u16> = admissible_windows(&firmware).collect();
        assert_eq!(windows, vec![0x4E, 0x2E]);
    }

    #[test]
    fn candidates_cross_windows_with_keys_in_order() {
        let _serial = scan_lock();
        let scan = CandidateScan::new([0x4E_u16, 0x2E].into_iter());
        let candidates: Vec<(u16, u8)> = scan.map(|c| (c.base_port, c.key)).collect();
        assert_eq!(
            candidates,
            vec![
                (0x4E, 0x77),
                (0x4E, 0xA0),
                (0x4E, 0x87),
                (0x4E, 0x67),
                (0x2E, 0x77),
                (0x2E, 0xA0),
                (0x2E, 0x87),
                (0x2E, 0x67),
            ]
        );
    }

    #[test]
    fn busy_window_is_skipped_without_blocking() {
        let _serial = scan_lock();
        let _held = io_region::try_reserve(0x4E, 2).expect("window should be free");
        let scan = CandidateScan::new([0x4E_u16, 0x2E].into_iter());
        let candidates: Vec<u16> = scan.map(|c| c.base_port).collect();
        assert_eq!(candidates, vec![0x2E; 4]);
    }

    #[test]
    fn reservation_is_released_when_scan_advances() {
        let _serial = scan_lock();
        let mut scan = CandidateScan::new([0x4E_u16].into_iter());
        let first = scan.next().expect("one candidate expected");
        assert_eq!(first.base_port, 0x4E);
        assert!(
            io_region::try_reserve(0x4E, 2).is_none(),
            "window must stay reserved while its keys are pending"
        );
        while scan.next().is_some() {}
        assert!(
            io_region::try_reserve(0x4E, 2).is_some(),
            "window must be released once the scan moves on"
        );
    }
}
