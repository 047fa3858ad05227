//! §4.3 scheduler and dispatcher contract.
//!
//! `schedule` decides whether the ready-list head differs from the running
//! task and, if so, invokes the dispatcher (via [`Port::save_ctx`] /
//! [`Port::load_ctx`]). Two entry points exist because a real dispatch needs
//! somewhere to save the outgoing context into: `schedule` is called from
//! task context and uses a scratch frame (there is no live interrupt frame
//! to reuse); `schedule_from_isr` is called from the tick interrupt handler
//! and threads the real trap frame through, which is the path an actual
//! preemption takes. Both keep `ctx_switch_count` and task states
//! consistent the same way.

use super::Kernel;
use crate::ports::{ActivePort, Port};
use crate::task::TaskState;

impl Kernel {
    /// Reschedules from task context. Used by `delay_task`, `sem_pend`,
    /// `q_pend`, and any `sem_post`/`q_post` called outside an ISR.
    pub(crate) fn schedule(&mut self) {
        if self.ready_head == self.current {
            return;
        }
        self.ctx_switch_count += 1;

        let mut scratch = ActivePort::scratch_trap_frame();
        if let Some(cur) = self.current {
            if self.tasks[cur].state == TaskState::Running {
                self.tasks[cur].state = TaskState::Ready;
            }
            ActivePort::save_ctx(&mut self.tasks[cur].sp, &scratch);
        }
        self.current = self.ready_head;
        if let Some(next) = self.current {
            self.tasks[next].state = TaskState::Running;
            ActivePort::load_ctx(self.tasks[next].sp, &mut scratch);
        }
    }

    /// Reschedules at the tail of the tick ISR, dispatching directly against
    /// the interrupted task's trap frame so that preemption takes effect the
    /// moment the ISR returns (§4.8).
    pub(crate) fn schedule_from_isr(&mut self, ctx: &mut <ActivePort as Port>::TrapFrame) {
        if self.ready_head == self.current {
            return;
        }
        self.ctx_switch_count += 1;

        if let Some(cur) = self.current {
            if self.tasks[cur].state == TaskState::Running {
                self.tasks[cur].state = TaskState::Ready;
            }
            ActivePort::save_ctx(&mut self.tasks[cur].sp, ctx);
        }
        self.current = self.ready_head;
        if let Some(next) = self.current {
            self.tasks[next].state = TaskState::Running;
            ActivePort::load_ctx(self.tasks[next].sp, ctx);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn live(k: &mut Kernel, id: crate::task::TaskId, priority: usize) {
        k.tasks[id].id = id;
        k.tasks[id].priority = priority;
        k.tasks[id].in_use = true;
    }

    #[test]
    fn schedule_is_a_no_op_when_current_already_leads_ready() {
        let mut k = Kernel::new();
        live(&mut k, 1, 5);
        k.ready_insert(1);
        k.current = Some(1);
        k.tasks[1].state = TaskState::Running;

        k.schedule();
        assert_eq!(k.ctx_switch_count, 0);
    }

    #[test]
    fn schedule_dispatches_the_first_task_from_none() {
        let mut k = Kernel::new();
        live(&mut k, 1, 5);
        k.ready_insert(1);

        k.schedule();
        assert_eq!(k.current, Some(1));
        assert_eq!(k.tasks[1].state, TaskState::Running);
        assert_eq!(k.ctx_switch_count, 1);
    }

    #[test]
    fn schedule_switches_to_the_new_highest_priority_task() {
        let mut k = Kernel::new();
        live(&mut k, 1, 10);
        live(&mut k, 2, 5);
        k.ready_insert(1);
        k.current = Some(1);
        k.tasks[1].state = TaskState::Running;

        k.ready_insert(2);
        k.schedule();

        assert_eq!(k.current, Some(2));
        assert_eq!(k.tasks[1].state, TaskState::Ready);
        assert_eq!(k.tasks[2].state, TaskState::Running);
        assert_eq!(k.ctx_switch_count, 1);
    }
}
