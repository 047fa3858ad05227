//! The kernel: task pool, ready/delayed lists, the scheduler, interrupt
//! bookkeeping, and the one-shot lifecycle (`initialize` / `run`).
//!
//! All kernel state lives in a single static [`Kernel`] instance, the same
//! way the reference scheduler keeps one `static mut TASK_MANAGER`. Every
//! public entry point here enters a critical section before touching it and
//! leaves it on every return path, so the "lock" is just "interrupts off".
//!
//! Semaphores and message queues are pool-allocated inside this same
//! struct (see [`sem`] and [`queue`]) because they share the ready/pending
//! list machinery with tasks; [`crate::sem`] and [`crate::queue`] are the
//! public-facing modules that wrap the calls below.

mod critical_section;
mod isr;
mod lifecycle;
mod list;
pub(crate) mod queue;
mod scheduler;
pub(crate) mod sem;
pub mod snapshot;
mod tick;

pub use critical_section::{enter as enter_mutex, exit as exit_mutex};
pub use isr::{enter_isr, exit_isr};
pub use lifecycle::{delay_task, initialize, new_task, run};

pub(crate) use tick::tick_isr;

use crate::config::{MAX_QUEUES, MAX_SEMAPHORES, MAX_TASKS, TASK_STACK_SIZE};
use crate::task::{empty_pool, TaskId, TaskPool};

#[derive(Clone, Copy)]
pub(crate) struct Semaphore {
    pub(crate) value: i32,
    pub(crate) pend_head: Option<TaskId>,
    pub(crate) pend_tail: Option<TaskId>,
    pub(crate) created: bool,
}

impl Semaphore {
    const fn empty() -> Self {
        Semaphore {
            value: 0,
            pend_head: None,
            pend_tail: None,
            created: false,
        }
    }
}

#[derive(Clone, Copy)]
pub(crate) struct Queue {
    pub(crate) buffer: [usize; crate::config::MAX_QUEUE_CAPACITY],
    pub(crate) capacity: usize,
    pub(crate) head: usize,
    pub(crate) tail: usize,
    pub(crate) occupancy: usize,
    pub(crate) pend_head: Option<TaskId>,
    pub(crate) pend_tail: Option<TaskId>,
    pub(crate) created: bool,
}

impl Queue {
    const fn empty() -> Self {
        Queue {
            buffer: [0; crate::config::MAX_QUEUE_CAPACITY],
            capacity: 0,
            head: 0,
            tail: 0,
            occupancy: 0,
            pend_head: None,
            pend_tail: None,
            created: false,
        }
    }
}

/// All kernel state. One instance, [`KERNEL`], owns every task, semaphore
/// and queue in the system; nothing here is heap-allocated.
pub(crate) struct Kernel {
    pub(crate) tasks: TaskPool,
    pub(crate) stacks: [[u8; TASK_STACK_SIZE]; MAX_TASKS],
    pub(crate) next_task_id: usize,

    pub(crate) ready_head: Option<TaskId>,
    pub(crate) ready_tail: Option<TaskId>,
    pub(crate) delayed_head: Option<TaskId>,
    pub(crate) delayed_tail: Option<TaskId>,
    pub(crate) current: Option<TaskId>,

    pub(crate) started: bool,
    pub(crate) initialized: bool,
    pub(crate) isr_nesting: u32,

    pub(crate) tick_count: u64,
    pub(crate) ctx_switch_count: u64,
    pub(crate) idle_count: u64,

    pub(crate) semaphores: [Semaphore; MAX_SEMAPHORES],
    pub(crate) next_sem_id: usize,

    pub(crate) queues: [Queue; MAX_QUEUES],
    pub(crate) next_queue_id: usize,
}

impl Kernel {
    const fn new() -> Self {
        Kernel {
            tasks: empty_pool(),
            stacks: [[0; TASK_STACK_SIZE]; MAX_TASKS],
            next_task_id: 0,
            ready_head: None,
            ready_tail: None,
            delayed_head: None,
            delayed_tail: None,
            current: None,
            started: false,
            initialized: false,
            isr_nesting: 0,
            tick_count: 0,
            ctx_switch_count: 0,
            idle_count: 0,
            semaphores: [Semaphore::empty(); MAX_SEMAPHORES],
            next_sem_id: 0,
            queues: [Queue::empty(); MAX_QUEUES],
            next_queue_id: 0,
        }
    }
}

static mut KERNEL: Kernel = Kernel::new();

/// The one place in the crate that names `KERNEL` directly. Every caller
/// must already hold the critical section; nothing here re-enters one.
#[allow(clippy::mut_from_ref)]
pub(crate) fn kernel_mut() -> &'static mut Kernel {
    unsafe { &mut *core::ptr::addr_of_mut!(KERNEL) }
}

/// Tick counter (§6 observable external), incremented once per tick service
/// invocation. Wraps silently, matching the unsigned counter in the source
/// design.
pub fn tick_count() -> u64 {
    let prev = critical_section::enter();
    let value = kernel_mut().tick_count;
    critical_section::exit(prev);
    value
}

/// Context-switch counter (§6 observable external), a pure diagnostic.
pub fn context_switch_count() -> u64 {
    let prev = critical_section::enter();
    let value = kernel_mut().ctx_switch_count;
    critical_section::exit(prev);
    value
}

/// Idle counter (§6 observable external): how many iterations the idle task
/// has completed, used externally to estimate CPU utilization.
pub fn idle_count() -> u64 {
    let prev = critical_section::enter();
    let value = kernel_mut().idle_count;
    critical_section::exit(prev);
    value
}

/// Puts the one global [`Kernel`] back to its freshly-linked state, mirroring
/// the reference scheduler's own `reset_task_manager` test helper.
/// Test-only: production code has exactly one kernel for the lifetime of the
/// program and never needs this.
#[cfg(test)]
pub(crate) fn reset_for_test() {
    let prev = critical_section::enter();
    *kernel_mut() = Kernel::new();
    critical_section::exit(prev);
}
