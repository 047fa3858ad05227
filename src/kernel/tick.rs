//! §4.4 tick service: advance time, expire delays, wake tasks.
//!
//! The application-level "post a message to a well-known queue" step some
//! tick handlers also perform is out of scope here — see §1 Non-goals; a
//! caller wanting that behaviour can call [`crate::queue::q_post`] itself
//! from its own timer hook.

use super::{critical_section, kernel_mut, Kernel};
use crate::ports::ActivePort;

impl Kernel {
    /// Advances the tick counter, decrements the delayed-list head's delta,
    /// and moves every task whose delta has reached zero into the ready
    /// list, in delayed-list order.
    pub(crate) fn tick(&mut self) {
        self.tick_count = self.tick_count.wrapping_add(1);
        if let Some(head) = self.delayed_head {
            self.tasks[head].delay_count = self.tasks[head].delay_count.saturating_sub(1);
        }
        while let Some(id) = self.delayed_pop_expired() {
            self.ready_insert(id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::task::TaskState;

    fn live(k: &mut Kernel, id: crate::task::TaskId, priority: usize) {
        k.tasks[id].id = id;
        k.tasks[id].priority = priority;
        k.tasks[id].in_use = true;
    }

    #[test]
    fn tick_advances_the_counter_with_nothing_delayed() {
        let mut k = Kernel::new();
        k.tick();
        k.tick();
        assert_eq!(k.tick_count, 2);
        assert_eq!(k.delayed_head, None);
    }

    /// Scenario 6 continued: with deltas (7, 3, 5) queued, the three tasks
    /// leave the delayed list on ticks 7, 10 and 15 respectively.
    #[test]
    fn tick_wakes_tasks_in_delayed_order() {
        let mut k = Kernel::new();
        live(&mut k, 1, 5);
        live(&mut k, 2, 10);
        live(&mut k, 3, 15);
        k.delayed_insert(1, 10);
        k.delayed_insert(2, 7);
        k.delayed_insert(3, 15);

        for _ in 0..6 {
            k.tick();
        }
        assert_eq!(k.ready_head, None);

        k.tick(); // tick 7
        assert_eq!(k.ready_head, Some(2));
        assert_eq!(k.delayed_head, Some(1));

        for _ in 0..3 {
            k.tick();
        }
        // tick 10
        assert_eq!(k.tasks[1].state, TaskState::Ready);
        assert_eq!(k.delayed_head, Some(3));

        for _ in 0..5 {
            k.tick();
        }
        // tick 15
        assert_eq!(k.tasks[3].state, TaskState::Ready);
        assert_eq!(k.delayed_head, None);
        assert_eq!(k.tick_count, 15);
    }
}

/// Entry point for the real tick interrupt handler (see
/// `ports::xtensa_esp32::preempt::handler`). Brackets the tick service with
/// the same nesting discipline as [`crate::kernel::enter_isr`] /
/// [`crate::kernel::exit_isr`], but reschedules directly against `ctx` so
/// preemption takes effect as the ISR returns.
pub(crate) fn tick_isr(ctx: &mut <ActivePort as crate::ports::Port>::TrapFrame) {
    let prev = critical_section::enter();
    let k = kernel_mut();
    k.isr_nesting += 1;
    k.tick();
    k.isr_nesting -= 1;
    if k.isr_nesting == 0 {
        k.schedule_from_isr(ctx);
    }
    critical_section::exit(prev);
}
