//! §4.9 kernel lifecycle: one-shot `initialize`/`run`, the idle task, and
//! §4.7 `delay_task`.

use super::{critical_section, kernel_mut};
use crate::config::{IDLE_STACK_SIZE, IDLE_TASK_ID, LOWEST_TASK_PRIORITY, MAX_TASKS, TASK_STACK_SIZE};
use crate::error::kernel_panic;
use crate::ports::{ActivePort, Port};
use crate::task::{Priority, TaskEntry, TaskId, TaskState, Tcb};

/// Creates the idle task and readies it. Must be called exactly once,
/// before [`run`], with interrupts disabled for its whole duration.
///
/// There is deliberately no separate "dummy current task" placeholder: the
/// scheduler treats `current == None` as "nothing to save", so the very
/// first [`super::Kernel::schedule`] simply loads the idle task's context
/// without attempting to save one that was never set up.
pub fn initialize() {
    let prev = critical_section::enter();
    let k = kernel_mut();
    if k.initialized {
        critical_section::exit(prev);
        kernel_panic!("initialize", "kernel already initialized");
    }
    k.initialized = true;

    ActivePort::setup_hardware_timer();

    let stack = &mut k.stacks[IDLE_TASK_ID][..IDLE_STACK_SIZE];
    let sp = ActivePort::setup_stack(stack, idle_task_entry);
    let stack_base = stack.as_ptr() as usize + stack.len();

    k.tasks[IDLE_TASK_ID] = Tcb {
        id: IDLE_TASK_ID,
        priority: LOWEST_TASK_PRIORITY,
        state: TaskState::New,
        delay_count: 0,
        sp,
        stack_base,
        next: None,
        prev: None,
        in_use: true,
    };
    k.next_task_id = IDLE_TASK_ID + 1;
    k.ready_insert(IDLE_TASK_ID);

    critical_section::exit(prev);
}

/// Creates a new task at `priority` (1..=[`LOWEST_TASK_PRIORITY`], unique
/// among live tasks) and readies it. May be called before [`run`] or from
/// task code afterwards, in which case the new task may preempt its creator
/// immediately.
pub fn new_task(entry: TaskEntry, priority: Priority) -> TaskId {
    let prev = critical_section::enter();
    let k = kernel_mut();

    if priority == 0 || priority > LOWEST_TASK_PRIORITY {
        critical_section::exit(prev);
        kernel_panic!(
            "new_task",
            "priority {} out of range 1..={}",
            priority,
            LOWEST_TASK_PRIORITY
        );
    }
    if k.next_task_id >= MAX_TASKS {
        critical_section::exit(prev);
        kernel_panic!("new_task", "task pool exhausted ({} tasks)", MAX_TASKS);
    }

    let id = k.next_task_id;
    k.next_task_id += 1;

    let stack = &mut k.stacks[id][..TASK_STACK_SIZE];
    let sp = ActivePort::setup_stack(stack, entry);
    let stack_base = stack.as_ptr() as usize + stack.len();

    k.tasks[id] = Tcb {
        id,
        priority,
        state: TaskState::New,
        delay_count: 0,
        sp,
        stack_base,
        next: None,
        prev: None,
        in_use: true,
    };
    k.ready_insert(id);
    if k.started {
        k.schedule();
    }

    critical_section::exit(prev);
    id
}

/// Enables interrupts and starts the scheduler. Never returns; if control
/// somehow falls back to this stack frame, that is a fatal condition on
/// real hardware (the dispatcher transferred control away for good).
pub fn run() -> ! {
    let prev = critical_section::enter();
    let k = kernel_mut();
    if !k.initialized {
        critical_section::exit(prev);
        kernel_panic!("run", "initialize() must be called before run()");
    }
    k.started = true;
    k.schedule();
    critical_section::exit(true);

    loop {
        kernel_panic!("run", "scheduler returned control to run()");
    }
}

/// Delays the current task by `n` ticks. `n == 0` is a no-op, reported but
/// not fatal, matching §4.7; the idle task can never be delayed (enforced
/// by [`super::Kernel::delayed_insert`]).
pub fn delay_task(n: u32) {
    let prev = critical_section::enter();
    let k = kernel_mut();

    if n == 0 {
        critical_section::exit(prev);
        log::warn!("delay_task: ignoring non-positive delay");
        return;
    }

    let Some(cur) = k.current else {
        critical_section::exit(prev);
        kernel_panic!("delay_task", "no task is currently running");
    };
    k.ready_remove(cur);
    k.delayed_insert(cur, n);
    k.schedule();

    critical_section::exit(prev);
}

/// Idle task body: spins incrementing the idle counter so an external
/// monitor can estimate CPU utilization from its growth rate.
extern "C" fn idle_task_entry() -> ! {
    loop {
        let prev = critical_section::enter();
        let k = kernel_mut();
        k.idle_count = k.idle_count.wrapping_add(1);
        critical_section::exit(prev);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sequential_test::sequential;

    extern "C" fn dummy_entry() -> ! {
        loop {}
    }

    #[test]
    #[sequential]
    fn initialize_creates_the_idle_task() {
        super::super::reset_for_test();
        initialize();
        let k = kernel_mut();
        assert_eq!(k.ready_head, Some(IDLE_TASK_ID));
        assert_eq!(k.tasks[IDLE_TASK_ID].priority, LOWEST_TASK_PRIORITY);
    }

    #[test]
    #[sequential]
    #[should_panic(expected = "kernel already initialized")]
    fn initialize_twice_panics() {
        super::super::reset_for_test();
        initialize();
        initialize();
    }

    #[test]
    #[sequential]
    #[should_panic(expected = "priority 0 out of range")]
    fn new_task_rejects_priority_zero() {
        super::super::reset_for_test();
        initialize();
        new_task(dummy_entry, 0);
    }

    #[test]
    #[sequential]
    #[should_panic(expected = "out of range")]
    fn new_task_rejects_priority_above_the_lowest() {
        super::super::reset_for_test();
        initialize();
        new_task(dummy_entry, LOWEST_TASK_PRIORITY + 1);
    }

    #[test]
    #[sequential]
    fn new_task_assigns_unique_ids_in_creation_order() {
        super::super::reset_for_test();
        initialize();
        let a = new_task(dummy_entry, 10);
        let b = new_task(dummy_entry, 20);
        assert_eq!(b, a + 1);
    }

    #[test]
    #[sequential]
    #[should_panic(expected = "initialize() must be called before run()")]
    fn run_before_initialize_panics() {
        super::super::reset_for_test();
        run();
    }

    /// The mock port never really switches stacks, so once `run` dispatches
    /// the first task, falling back into this frame is exactly the
    /// unreachable condition `run` is documented to treat as fatal.
    #[test]
    #[sequential]
    #[should_panic(expected = "scheduler returned control to run()")]
    fn run_detects_the_dispatcher_never_returning() {
        super::super::reset_for_test();
        initialize();
        new_task(dummy_entry, 10);
        run();
    }

    #[test]
    #[sequential]
    fn delay_task_zero_is_a_non_fatal_no_op() {
        let _ = env_logger::try_init();
        super::super::reset_for_test();
        initialize();
        delay_task(0);
    }
}
