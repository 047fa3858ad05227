//! §4.1 critical section: the kernel's only lock is disabling interrupts.

use crate::ports::{ActivePort, Port};

/// Disables interrupts, returning whether they were enabled beforehand.
/// Every kernel entry point calls this first and restores the result with
/// [`exit`] on every exit path, including error paths.
pub fn enter() -> bool {
    ActivePort::enter_critical()
}

/// Restores the interrupt-enable state returned by a matching [`enter`].
pub fn exit(was_enabled: bool) {
    ActivePort::exit_critical(was_enabled)
}
