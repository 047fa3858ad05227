//! §4.6 fixed-capacity message queues.
//!
//! Queues own their backing buffer (size bounded by
//! [`crate::config::MAX_QUEUE_CAPACITY`]) rather than referencing a
//! caller-supplied array, since there is no dynamic allocation anywhere in
//! this crate and every other pool here is likewise embedded in [`Kernel`].

use super::Kernel;
use crate::config::{MAX_QUEUES, MAX_QUEUE_CAPACITY};
use crate::error::kernel_panic;
use crate::task::TaskState;

impl Kernel {
    /// Allocates a queue that can hold up to `capacity` messages
    /// (1..=[`MAX_QUEUE_CAPACITY`]).
    pub(crate) fn q_create(&mut self, capacity: usize) -> usize {
        if capacity == 0 || capacity > MAX_QUEUE_CAPACITY {
            kernel_panic!(
                "q_create",
                "capacity must be in 1..={}, got {}",
                MAX_QUEUE_CAPACITY,
                capacity
            );
        }
        if self.next_queue_id >= MAX_QUEUES {
            kernel_panic!("q_create", "queue pool exhausted ({} queues)", MAX_QUEUES);
        }
        let id = self.next_queue_id;
        self.next_queue_id += 1;
        self.queues[id] = super::Queue {
            buffer: [0; MAX_QUEUE_CAPACITY],
            capacity,
            head: 0,
            tail: 0,
            occupancy: 0,
            pend_head: None,
            pend_tail: None,
            created: true,
        };
        id
    }

    /// Blocks the current task until a message is available, then removes
    /// and returns it. Task context only.
    pub(crate) fn q_pend(&mut self, id: usize) -> usize {
        self.assert_queue_created("q_pend", id);
        let Some(cur) = self.current else {
            kernel_panic!("q_pend", "no task is currently running");
        };

        if self.queues[id].occupancy == 0 {
            self.ready_remove(cur);
            self.tasks[cur].state = TaskState::PendingQueue;
            let (head, tail) =
                self.pend_insert(self.queues[id].pend_head, self.queues[id].pend_tail, cur);
            self.queues[id].pend_head = head;
            self.queues[id].pend_tail = tail;
            self.schedule();
            // On real hardware, execution only resumes here once a poster
            // has readied this task, at which point occupancy is > 0.
        }

        let q = &mut self.queues[id];
        let msg = q.buffer[q.head];
        q.head = (q.head + 1) % q.capacity;
        q.occupancy -= 1;
        msg
    }

    /// Posts `msg` if there is room, waking the highest-priority waiter if
    /// any. Never blocks; returns `false` if the queue is full. Callable
    /// from task or ISR context.
    pub(crate) fn q_post(&mut self, id: usize, msg: usize) -> bool {
        self.assert_queue_created("q_post", id);

        let q = &mut self.queues[id];
        if q.occupancy == q.capacity {
            return false;
        }
        q.buffer[q.tail] = msg;
        q.tail = (q.tail + 1) % q.capacity;
        q.occupancy += 1;

        let (head, tail, woken) =
            self.pend_pop(self.queues[id].pend_head, self.queues[id].pend_tail);
        self.queues[id].pend_head = head;
        self.queues[id].pend_tail = tail;
        if let Some(task) = woken {
            self.ready_insert(task);
            if self.isr_nesting == 0 {
                self.schedule();
            }
        }
        true
    }

    fn assert_queue_created(&self, function: &str, id: usize) {
        if id >= MAX_QUEUES || !self.queues[id].created {
            kernel_panic!(function, "queue {} was never created", id);
        }
    }
}
