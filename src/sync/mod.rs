// src/sync/mod.rs

//! Synchronization primitives for hardware resource ownership.
//!
//! Port I/O has no hardware arbitration: two agents interleaving
//! address/data transactions on the same window corrupt each other's
//! register accesses. Every unlock → operate → lock transaction in this
//! crate therefore runs under an advisory reservation of the window,
//! acquired through [`io_region`] and released by guard drop.

pub mod io_region;

// Re-export commonly used items
pub use io_region::{reserve, try_reserve, IoRegionGuard};
