//! §10.5 read-only introspection.
//!
//! Data-only equivalents of the original's `DCMD`/`printTask` debug
//! facilities, minus the actual printing: callers decide how (or whether) to
//! render this. Every function here copies state out under the critical
//! section and returns plain values, so none of it holds a lock past its own
//! call.

use super::{critical_section, kernel_mut};
use crate::task::{Priority, TaskId, TaskState};

/// A copy of one task's scheduling-relevant state at the moment it was read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaskSnapshot {
    pub id: TaskId,
    pub priority: Priority,
    pub state: TaskState,
    /// Ticks remaining before this task leaves the delayed list. Zero for
    /// tasks not currently delayed.
    pub delay_ticks: u32,
}

/// Kernel-wide counters, gathered atomically under one critical section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct KernelCounters {
    pub tick_count: u64,
    pub ctx_switch_count: u64,
    pub idle_count: u64,
}

/// The task currently running, if the scheduler has dispatched one yet.
pub fn current_task() -> Option<TaskSnapshot> {
    let prev = critical_section::enter();
    let k = kernel_mut();
    let snapshot = k.current.map(|id| {
        let t = &k.tasks[id];
        TaskSnapshot {
            id: t.id(),
            priority: t.priority(),
            state: t.state(),
            delay_ticks: 0,
        }
    });
    critical_section::exit(prev);
    snapshot
}

/// Copies the ready list, head to tail, into `buf`. Returns the number of
/// entries written; a ready list longer than `buf` is silently truncated, so
/// callers sizing `buf` to `MAX_TASKS` always see everything.
pub fn ready_list(buf: &mut [TaskSnapshot]) -> usize {
    let prev = critical_section::enter();
    let k = kernel_mut();
    let mut count = 0;
    let mut cursor = k.ready_head;
    while let Some(id) = cursor {
        if count >= buf.len() {
            break;
        }
        let t = &k.tasks[id];
        buf[count] = TaskSnapshot {
            id: t.id(),
            priority: t.priority(),
            state: t.state(),
            delay_ticks: 0,
        };
        count += 1;
        cursor = t.next;
    }
    critical_section::exit(prev);
    count
}

/// Copies the delayed list, head to tail, into `buf`, with `delay_ticks`
/// reconstructed as the cumulative wait (the list itself stores only the
/// delta against its predecessor). Returns the number of entries written.
pub fn delayed_list(buf: &mut [TaskSnapshot]) -> usize {
    let prev = critical_section::enter();
    let k = kernel_mut();
    let mut count = 0;
    let mut cursor = k.delayed_head;
    let mut cumulative: u32 = 0;
    while let Some(id) = cursor {
        if count >= buf.len() {
            break;
        }
        let t = &k.tasks[id];
        cumulative = cumulative.saturating_add(t.delay_count);
        buf[count] = TaskSnapshot {
            id: t.id(),
            priority: t.priority(),
            state: t.state(),
            delay_ticks: cumulative,
        };
        count += 1;
        cursor = t.next;
    }
    critical_section::exit(prev);
    count
}

/// The kernel's diagnostic counters as of this call.
pub fn counters() -> KernelCounters {
    let prev = critical_section::enter();
    let k = kernel_mut();
    let snapshot = KernelCounters {
        tick_count: k.tick_count,
        ctx_switch_count: k.ctx_switch_count,
        idle_count: k.idle_count,
    };
    critical_section::exit(prev);
    snapshot
}

#[cfg(test)]
mod tests {
    use super::*;
    use sequential_test::sequential;

    #[test]
    #[sequential]
    fn current_task_is_none_before_anything_is_dispatched() {
        super::super::reset_for_test();
        assert_eq!(current_task(), None);
    }

    #[test]
    #[sequential]
    fn ready_list_reflects_priority_order() {
        super::super::reset_for_test();
        let k = kernel_mut();
        k.tasks[1].id = 1;
        k.tasks[1].priority = 20;
        k.tasks[1].in_use = true;
        k.tasks[2].id = 2;
        k.tasks[2].priority = 5;
        k.tasks[2].in_use = true;
        k.ready_insert(1);
        k.ready_insert(2);

        let mut buf = [TaskSnapshot {
            id: 0,
            priority: 0,
            state: crate::task::TaskState::New,
            delay_ticks: 0,
        }; 4];
        let count = ready_list(&mut buf);
        assert_eq!(count, 2);
        assert_eq!(buf[0].id, 2);
        assert_eq!(buf[1].id, 1);
    }

    #[test]
    #[sequential]
    fn delayed_list_reconstructs_cumulative_delay_from_deltas() {
        super::super::reset_for_test();
        let k = kernel_mut();
        k.tasks[1].id = 1;
        k.tasks[1].priority = 5;
        k.tasks[1].in_use = true;
        k.tasks[2].id = 2;
        k.tasks[2].priority = 10;
        k.tasks[2].in_use = true;
        k.delayed_insert(1, 10);
        k.delayed_insert(2, 7);

        let mut buf = [TaskSnapshot {
            id: 0,
            priority: 0,
            state: crate::task::TaskState::New,
            delay_ticks: 0,
        }; 4];
        let count = delayed_list(&mut buf);
        assert_eq!(count, 2);
        assert_eq!(buf[0].id, 2);
        assert_eq!(buf[0].delay_ticks, 7);
        assert_eq!(buf[1].id, 1);
        assert_eq!(buf[1].delay_ticks, 10);
    }

    #[test]
    #[sequential]
    fn counters_start_at_zero() {
        super::super::reset_for_test();
        assert_eq!(counters(), KernelCounters::default());
    }
}
