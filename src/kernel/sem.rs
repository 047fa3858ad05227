//! §4.5 counting semaphores.
//!
//! Implements the semaphore half of the kernel API against the shared
//! pending-list machinery in [`super::list`]; [`crate::sem`] is the public
//! surface that wraps these methods with the critical section and a typed
//! handle.

use super::Kernel;
use crate::config::MAX_SEMAPHORES;
use crate::error::kernel_panic;
use crate::task::TaskState;

impl Kernel {
    /// Allocates a semaphore with `initial` resources (must be >= 0).
    pub(crate) fn sem_create(&mut self, initial: i32) -> usize {
        if initial < 0 {
            kernel_panic!("sem_create", "initial value must be >= 0, got {}", initial);
        }
        if self.next_sem_id >= MAX_SEMAPHORES {
            kernel_panic!(
                "sem_create",
                "semaphore pool exhausted ({} semaphores)",
                MAX_SEMAPHORES
            );
        }
        let id = self.next_sem_id;
        self.next_sem_id += 1;
        self.semaphores[id] = super::Semaphore {
            value: initial,
            pend_head: None,
            pend_tail: None,
            created: true,
        };
        id
    }

    /// Blocks the current task until a resource is available. Task context
    /// only.
    pub(crate) fn sem_pend(&mut self, id: usize) {
        self.assert_sem_created("sem_pend", id);
        let Some(cur) = self.current else {
            kernel_panic!("sem_pend", "no task is currently running");
        };

        let old = self.semaphores[id].value;
        self.semaphores[id].value = old - 1;
        if old <= 0 {
            self.ready_remove(cur);
            self.tasks[cur].state = TaskState::PendingSem;
            let (head, tail) = self.pend_insert(
                self.semaphores[id].pend_head,
                self.semaphores[id].pend_tail,
                cur,
            );
            self.semaphores[id].pend_head = head;
            self.semaphores[id].pend_tail = tail;
            self.schedule();
        }
    }

    /// Releases one resource, waking the highest-priority waiter if any.
    /// Callable from task or ISR context; only reschedules immediately when
    /// called from a task (an ISR's own exit does that instead, §4.8).
    pub(crate) fn sem_post(&mut self, id: usize) {
        self.assert_sem_created("sem_post", id);

        let old = self.semaphores[id].value;
        self.semaphores[id].value = old + 1;
        if old < 0 {
            let (head, tail, woken) = self.pend_pop(
                self.semaphores[id].pend_head,
                self.semaphores[id].pend_tail,
            );
            self.semaphores[id].pend_head = head;
            self.semaphores[id].pend_tail = tail;
            if let Some(task) = woken {
                self.ready_insert(task);
            }
            if self.isr_nesting == 0 {
                self.schedule();
            }
        }
    }

    fn assert_sem_created(&self, function: &str, id: usize) {
        if id >= MAX_SEMAPHORES || !self.semaphores[id].created {
            kernel_panic!(function, "semaphore {} was never created", id);
        }
    }
}
