//! Host-side stand-in for a hardware tick source, used by tests.

use core::sync::atomic::{AtomicU64, Ordering};

static TICKS: AtomicU64 = AtomicU64::new(0);

/// Mok hardware timer setup.
pub fn setup_hardware_timer() {
    TICKS.store(0, Ordering::Relaxed);
}

/// Mok getting counter value of hardware timer.
pub fn get_tick_counter() -> u64 {
    TICKS.load(Ordering::Relaxed)
}

/// Advances the mock timer by one tick. Test-only: a real port's tick count
/// comes from the hardware instead.
pub fn advance() {
    TICKS.fetch_add(1, Ordering::Relaxed);
}
