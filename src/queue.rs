//! Fixed-capacity message queues.
//!
//! Each queue owns its own backing buffer, sized at creation time up to
//! [`crate::config::MAX_QUEUE_CAPACITY`]; see [`crate::kernel::queue`] for the
//! accounting. `q_post` is safe to call from an ISR, `q_pend` is not.

use crate::kernel::{enter_mutex, exit_mutex, kernel_mut};

/// Handle to a queue allocated from the static pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueueId(usize);

/// Creates a queue that can hold up to `capacity` messages.
///
/// # Panics
///
/// Panics if `capacity` is zero, exceeds
/// [`crate::config::MAX_QUEUE_CAPACITY`], or the queue pool is exhausted.
pub fn q_create(capacity: usize) -> QueueId {
    let prev = enter_mutex();
    let id = kernel_mut().q_create(capacity);
    exit_mutex(prev);
    QueueId(id)
}

/// Removes and returns the oldest message, blocking the current task if the
/// queue is empty. Task context only.
pub fn q_pend(queue: QueueId) -> usize {
    let prev = enter_mutex();
    let msg = kernel_mut().q_pend(queue.0);
    exit_mutex(prev);
    msg
}

/// Appends `msg`, waking the highest-priority waiter if any. Never blocks;
/// returns `false` if the queue is full. Callable from task or ISR context.
pub fn q_post(queue: QueueId, msg: usize) -> bool {
    let prev = enter_mutex();
    let ok = kernel_mut().q_post(queue.0, msg);
    exit_mutex(prev);
    ok
}
