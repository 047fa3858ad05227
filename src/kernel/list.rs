//! §4.2 list machinery: the ready list, the delta-encoded delayed list, and
//! the priority-ordered pending lists shared by semaphores and queues.
//!
//! Every operation here assumes the caller already holds the critical
//! section (§4.1); none of them re-enter one.

use super::Kernel;
use crate::config::IDLE_TASK_ID;
use crate::error::kernel_panic;
use crate::task::{TaskId, TaskState};

impl Kernel {
    /// Inserts `id` into the ready list at the position keeping priorities
    /// strictly increasing head to tail. Panics on a duplicate priority.
    pub(crate) fn ready_insert(&mut self, id: TaskId) {
        let priority = self.tasks[id].priority;
        self.tasks[id].state = TaskState::Ready;

        let mut prev: Option<TaskId> = None;
        let mut cursor = self.ready_head;
        loop {
            match cursor {
                None => {
                    self.tasks[id].prev = prev;
                    self.tasks[id].next = None;
                    match prev {
                        Some(p) => self.tasks[p].next = Some(id),
                        None => self.ready_head = Some(id),
                    }
                    self.ready_tail = Some(id);
                    return;
                }
                Some(cur) => {
                    let cur_priority = self.tasks[cur].priority;
                    if cur_priority == priority {
                        kernel_panic!("ready_insert", "duplicate priority {}", priority);
                    }
                    if cur_priority > priority {
                        self.tasks[id].prev = prev;
                        self.tasks[id].next = Some(cur);
                        self.tasks[cur].prev = Some(id);
                        match prev {
                            Some(p) => self.tasks[p].next = Some(id),
                            None => self.ready_head = Some(id),
                        }
                        return;
                    }
                    prev = Some(cur);
                    cursor = self.tasks[cur].next;
                }
            }
        }
    }

    /// Unlinks `id` from the ready list. Rejects the idle task: the ready
    /// list must never become empty.
    pub(crate) fn ready_remove(&mut self, id: TaskId) {
        if id == IDLE_TASK_ID {
            kernel_panic!("ready_remove", "cannot remove the idle task");
        }
        let prev = self.tasks[id].prev;
        let next = self.tasks[id].next;
        match prev {
            Some(p) => self.tasks[p].next = next,
            None => self.ready_head = next,
        }
        match next {
            Some(n) => self.tasks[n].prev = prev,
            None => self.ready_tail = prev,
        }
        self.tasks[id].prev = None;
        self.tasks[id].next = None;
    }

    /// Inserts `id` into the delayed list with `absolute_delay` ticks to
    /// wait, delta-encoding it against its predecessors so only the head's
    /// delta needs to change on each tick.
    pub(crate) fn delayed_insert(&mut self, id: TaskId, absolute_delay: u32) {
        if id == IDLE_TASK_ID {
            kernel_panic!("delayed_insert", "cannot delay the idle task");
        }

        let mut remaining = absolute_delay;
        let mut prev: Option<TaskId> = None;
        let mut cursor = self.delayed_head;
        loop {
            match cursor {
                None => {
                    self.tasks[id].delay_count = remaining;
                    self.tasks[id].prev = prev;
                    self.tasks[id].next = None;
                    match prev {
                        Some(p) => self.tasks[p].next = Some(id),
                        None => self.delayed_head = Some(id),
                    }
                    self.delayed_tail = Some(id);
                    break;
                }
                Some(cur) => {
                    let cur_delta = self.tasks[cur].delay_count;
                    if remaining >= cur_delta {
                        remaining -= cur_delta;
                        prev = Some(cur);
                        cursor = self.tasks[cur].next;
                    } else {
                        self.tasks[id].delay_count = remaining;
                        self.tasks[cur].delay_count = cur_delta - remaining;
                        self.tasks[id].prev = prev;
                        self.tasks[id].next = Some(cur);
                        self.tasks[cur].prev = Some(id);
                        match prev {
                            Some(p) => self.tasks[p].next = Some(id),
                            None => self.delayed_head = Some(id),
                        }
                        break;
                    }
                }
            }
        }
        self.tasks[id].state = TaskState::Delayed;
    }

    /// Pops the delayed-list head if its delta has reached zero. Guards the
    /// case where popping the last entry would otherwise leave a dangling
    /// reference to "the new head" with no null check.
    pub(crate) fn delayed_pop_expired(&mut self) -> Option<TaskId> {
        let head = self.delayed_head?;
        if self.tasks[head].delay_count != 0 {
            return None;
        }
        let next = self.tasks[head].next;
        self.delayed_head = next;
        match next {
            Some(n) => self.tasks[n].prev = None,
            None => self.delayed_tail = None,
        }
        self.tasks[head].next = None;
        self.tasks[head].prev = None;
        Some(head)
    }

    /// Priority-ordered insert into a pending list identified by its
    /// `(head, tail)` pair; shared by semaphores and queues. Returns the
    /// updated pair for the caller to store back.
    pub(crate) fn pend_insert(
        &mut self,
        head: Option<TaskId>,
        tail: Option<TaskId>,
        id: TaskId,
    ) -> (Option<TaskId>, Option<TaskId>) {
        let priority = self.tasks[id].priority;
        let mut new_head = head;
        let mut prev: Option<TaskId> = None;
        let mut cursor = head;
        loop {
            match cursor {
                None => {
                    self.tasks[id].prev = prev;
                    self.tasks[id].next = None;
                    match prev {
                        Some(p) => self.tasks[p].next = Some(id),
                        None => new_head = Some(id),
                    }
                    return (new_head, Some(id));
                }
                Some(cur) => {
                    if self.tasks[cur].priority > priority {
                        self.tasks[id].prev = prev;
                        self.tasks[id].next = Some(cur);
                        self.tasks[cur].prev = Some(id);
                        match prev {
                            Some(p) => self.tasks[p].next = Some(id),
                            None => new_head = Some(id),
                        }
                        return (new_head, tail);
                    }
                    prev = Some(cur);
                    cursor = self.tasks[cur].next;
                }
            }
        }
    }

    /// Pops the highest-priority (head) task from a pending list. Returns
    /// the updated `(head, tail)` pair plus the popped task, if any.
    pub(crate) fn pend_pop(
        &mut self,
        head: Option<TaskId>,
        tail: Option<TaskId>,
    ) -> (Option<TaskId>, Option<TaskId>, Option<TaskId>) {
        let Some(h) = head else {
            return (head, tail, None);
        };
        let next = self.tasks[h].next;
        let new_tail = if next.is_none() { None } else { tail };
        if let Some(n) = next {
            self.tasks[n].prev = None;
        }
        self.tasks[h].next = None;
        self.tasks[h].prev = None;
        (next, new_tail, Some(h))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn live(k: &mut Kernel, id: TaskId, priority: usize) {
        k.tasks[id].id = id;
        k.tasks[id].priority = priority;
        k.tasks[id].in_use = true;
    }

    #[test]
    fn ready_insert_keeps_strictly_increasing_priority() {
        let mut k = Kernel::new();
        live(&mut k, 1, 10);
        live(&mut k, 2, 5);
        live(&mut k, 3, 20);
        k.ready_insert(1);
        k.ready_insert(2);
        k.ready_insert(3);

        let mut order = vec![];
        let mut cursor = k.ready_head;
        while let Some(id) = cursor {
            order.push(id);
            cursor = k.tasks[id].next;
        }
        assert_eq!(order, vec![2, 1, 3]);
        assert_eq!(k.ready_tail, Some(3));
    }

    #[test]
    #[should_panic(expected = "duplicate priority")]
    fn ready_insert_rejects_duplicate_priority() {
        let mut k = Kernel::new();
        live(&mut k, 1, 10);
        live(&mut k, 2, 10);
        k.ready_insert(1);
        k.ready_insert(2);
    }

    #[test]
    #[should_panic(expected = "cannot remove the idle task")]
    fn ready_remove_rejects_idle_task() {
        let mut k = Kernel::new();
        live(&mut k, IDLE_TASK_ID, 100);
        k.ready_insert(IDLE_TASK_ID);
        k.ready_remove(IDLE_TASK_ID);
    }

    #[test]
    fn ready_remove_unlinks_middle_task() {
        let mut k = Kernel::new();
        live(&mut k, 1, 5);
        live(&mut k, 2, 10);
        live(&mut k, 3, 15);
        k.ready_insert(1);
        k.ready_insert(2);
        k.ready_insert(3);

        k.ready_remove(2);

        assert_eq!(k.ready_head, Some(1));
        assert_eq!(k.tasks[1].next, Some(3));
        assert_eq!(k.tasks[3].prev, Some(1));
        assert_eq!(k.ready_tail, Some(3));
    }

    /// Matches scenario 6: delay_task(10), delay_task(7), delay_task(15)
    /// from highest priority down produces deltas (7, 3, 5) in list order.
    #[test]
    fn delayed_insert_delta_encodes_against_predecessors() {
        let mut k = Kernel::new();
        live(&mut k, 1, 5);
        live(&mut k, 2, 10);
        live(&mut k, 3, 15);
        k.delayed_insert(1, 10);
        k.delayed_insert(2, 7);
        k.delayed_insert(3, 15);

        let mut deltas = vec![];
        let mut cursor = k.delayed_head;
        while let Some(id) = cursor {
            deltas.push(k.tasks[id].delay_count);
            cursor = k.tasks[id].next;
        }
        assert_eq!(deltas, vec![7, 3, 5]);
        assert_eq!(
            [k.delayed_head, k.tasks[2].next, k.tasks[3].next],
            [Some(2), Some(1), None]
        );
    }

    /// Equal-delta ties keep the existing node first: a new arrival with the
    /// same delay as the current tail lands after it, not before it.
    #[test]
    fn delayed_insert_breaks_ties_in_favor_of_the_existing_node() {
        let mut k = Kernel::new();
        live(&mut k, 1, 5);
        live(&mut k, 2, 10);
        k.delayed_insert(1, 5);
        k.delayed_insert(2, 5);

        assert_eq!(k.delayed_head, Some(1));
        assert_eq!(k.tasks[1].delay_count, 5);
        assert_eq!(k.tasks[1].next, Some(2));
        assert_eq!(k.tasks[2].delay_count, 0);
    }

    #[test]
    #[should_panic(expected = "cannot delay the idle task")]
    fn delayed_insert_rejects_idle_task() {
        let mut k = Kernel::new();
        live(&mut k, IDLE_TASK_ID, 100);
        k.delayed_insert(IDLE_TASK_ID, 5);
    }

    #[test]
    fn delayed_pop_expired_guards_last_element() {
        let mut k = Kernel::new();
        live(&mut k, 1, 5);
        k.delayed_insert(1, 3);

        assert_eq!(k.delayed_pop_expired(), None);
        k.tasks[1].delay_count = 0;
        assert_eq!(k.delayed_pop_expired(), Some(1));
        assert_eq!(k.delayed_head, None);
        assert_eq!(k.delayed_tail, None);
        // A second pop on the now-empty list must not panic.
        assert_eq!(k.delayed_pop_expired(), None);
    }

    #[test]
    fn pend_insert_and_pop_are_priority_ordered() {
        let mut k = Kernel::new();
        live(&mut k, 1, 20);
        live(&mut k, 2, 5);
        live(&mut k, 3, 10);

        let (mut head, mut tail) = (None, None);
        (head, tail) = k.pend_insert(head, tail, 1);
        (head, tail) = k.pend_insert(head, tail, 2);
        (head, tail) = k.pend_insert(head, tail, 3);

        let (head, tail, popped) = k.pend_pop(head, tail);
        assert_eq!(popped, Some(2));
        let (_head, _tail, popped) = k.pend_pop(head, tail);
        assert_eq!(popped, Some(3));
    }
}
