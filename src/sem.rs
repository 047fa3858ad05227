//! Counting semaphores.
//!
//! A semaphore's value is (resources available) minus (tasks waiting); see
//! the kernel's internal accounting in [`crate::kernel::sem`]. `sem_post` is
//! safe to call from an ISR, `sem_pend` is not.

use crate::kernel::{enter_mutex, exit_mutex, kernel_mut};

/// Handle to a semaphore allocated from the static pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SemId(usize);

/// Creates a counting semaphore with `initial` resources available.
///
/// # Panics
///
/// Panics if `initial` is negative or the semaphore pool is exhausted.
pub fn sem_create(initial: i32) -> SemId {
    let prev = enter_mutex();
    let id = kernel_mut().sem_create(initial);
    exit_mutex(prev);
    SemId(id)
}

/// Takes one resource, blocking the current task if none is available.
/// Task context only.
pub fn sem_pend(sem: SemId) {
    let prev = enter_mutex();
    kernel_mut().sem_pend(sem.0);
    exit_mutex(prev);
}

/// Releases one resource, waking the highest-priority waiter if any.
/// Callable from task or ISR context.
pub fn sem_post(sem: SemId) {
    let prev = enter_mutex();
    kernel_mut().sem_post(sem.0);
    exit_mutex(prev);
}
