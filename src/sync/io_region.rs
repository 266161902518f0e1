// src/sync/io_region.rs

//! Advisory reservation of I/O port windows.
//!
//! The table is process-wide and advisory: it orders the agents that go
//! through it, it cannot stop code that bypasses it. Reservations are
//! whole-transaction, never per byte.
//!
//! Scanning contexts must not wait on a contended window (they may run
//! where blocking is not allowed), so [`try_reserve`] fails fast and the
//! scanner moves on. Operational contexts such as an RS-485
//! reconfiguration use [`reserve`] and spin until the window frees up.

use spin::Mutex;

#[derive(Debug, Clone, Copy)]
struct Region {
    base: u16,
    len: u16,
}

const MAX_RESERVATIONS: usize = 8;

/// Currently reserved windows. A handful of slots is plenty: at most the
/// two configuration windows plus a few UART ranges are ever held at once.
static RESERVATIONS: Mutex<[Option<Region>; MAX_RESERVATIONS]> =
    Mutex::new([None; MAX_RESERVATIONS]);

/// Exclusive hold on an I/O port window, released on drop.
#[derive(Debug)]
pub struct IoRegionGuard {
    base: u16,
    len: u16,
}

impl IoRegionGuard {
    /// First port of the reserved window.
    pub fn base(&self) -> u16 {
        self.base
    }

    /// Number of ports reserved.
    pub fn len(&self) -> u16 {
        self.len
    }
}

fn overlaps(a: Region, base: u16, len: u16) -> bool {
    let a_end = u32::from(a.base) + u32::from(a.len);
    let b_end = u32::from(base) + u32::from(len);
    u32::from(a.base) < b_end && u32::from(base) < a_end
}

/// Try to reserve `[base, base + len)` without waiting.
///
/// Returns `None` when any part of the window is already held. A full
/// table counts as contention too; the caller cannot tell the
/// difference and is not meant to.
pub fn try_reserve(base: u16, len: u16) -> Option<IoRegionGuard> {
    debug_assert!(len > 0, "zero-length window reservation");

    let mut table = RESERVATIONS.lock();
    if table.iter().flatten().any(|&held| overlaps(held, base, len)) {
        return None;
    }
    let slot = table.iter_mut().find(|slot| slot.is_none())?;
    *slot = Some(Region { base, len });
    Some(IoRegionGuard { base, len })
}

/// Reserve `[base, base + len)`, spinning until the window frees up.
///
/// Only for contexts that are allowed to block. There is no timeout:
/// holders release within a handful of port transactions.
pub fn reserve(base: u16, len: u16) -> IoRegionGuard {
    loop {
        if let Some(guard) = try_reserve(base, len) {
            return guard;
        }
        core::hint::spin_loop();
    }
}

impl Drop for IoRegionGuard {
    fn drop(&mut self) {
        let mut table = RESERVATIONS.lock();
        let held = table
            .iter_mut()
            .find(|slot| matches!(slot, Some(r) if r.base == self.base && r.len == self.len));
        if let Some(slot) = held {
            *slot = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Each test uses its own port range; the table is process-global and
    // the test harness runs tests concurrently.

    #[test]
    fn test_reserve_and_release() {
        let guard = try_reserve(0x1000, 2).expect("window should be free");
        assert_eq!(guard.base(), 0x1000);
        assert_eq!(guard.len(), 2);
        drop(guard);
        let again = try_reserve(0x1000, 2);
        assert!(again.is_some(), "release should free the window");
    }

    #[test]
    fn test_overlapping_windows_conflict() {
        let _held = try_reserve(0x1010, 4).expect("window should be free");
        assert!(try_reserve(0x1010, 2).is_none());
        assert!(try_reserve(0x1012, 2).is_none());
        assert!(try_reserve(0x1013, 4).is_none());
        assert!(try_reserve(0x1014, 2).is_some(), "adjacent window is free");
    }

    #[test]
    fn test_disjoint_windows_coexist() {
        let a = try_reserve(0x1020, 2).expect("window should be free");
        let b = try_reserve(0x1030, 2).expect("disjoint window should be free");
        assert_ne!(a.base(), b.base());
    }

    #[test]
    fn test_blocking_reserve_returns_once_free() {
        let held = try_reserve(0x1040, 2).expect("window should be free");
        assert!(try_reserve(0x1040, 2).is_none());
        drop(held);
        // would spin forever if the release above were not observed
        let guard = reserve(0x1040, 2);
        assert_eq!(guard.base(), 0x1040);
    }
}
