//! §4.8 ISR entry/exit discipline.

use super::{critical_section, kernel_mut};
use crate::error::kernel_panic;

/// Call once, after the assembly preamble has saved context, at the start
/// of every interrupt service routine. Increments the nesting counter so
/// kernel primitives called from ISR context know to suppress rescheduling
/// until the outermost ISR returns.
pub fn enter_isr() {
    let prev = critical_section::enter();
    kernel_mut().isr_nesting += 1;
    critical_section::exit(prev);
}

/// Call at the end of every ISR, with interrupts disabled. Decrements the
/// nesting counter and, once it reaches zero, reschedules so a task made
/// ready by this ISR can preempt the interrupted one.
pub fn exit_isr() {
    let prev = critical_section::enter();
    let k = kernel_mut();
    if k.isr_nesting == 0 {
        critical_section::exit(prev);
        kernel_panic!("exit_isr", "not currently inside an ISR");
    }
    k.isr_nesting -= 1;
    if k.isr_nesting == 0 {
        k.schedule();
    }
    critical_section::exit(prev);
}

#[cfg(test)]
mod tests {
    use super::*;
    use sequential_test::sequential;

    #[test]
    #[sequential]
    #[should_panic(expected = "not currently inside an ISR")]
    fn exit_isr_without_a_matching_enter_panics() {
        super::super::reset_for_test();
        exit_isr();
    }

    #[test]
    #[sequential]
    fn nesting_only_reschedules_once_the_outermost_isr_exits() {
        super::super::reset_for_test();
        enter_isr();
        enter_isr();
        assert_eq!(kernel_mut().isr_nesting, 2);

        exit_isr();
        assert_eq!(kernel_mut().isr_nesting, 1);
        assert_eq!(kernel_mut().ctx_switch_count, 0);

        exit_isr();
        assert_eq!(kernel_mut().isr_nesting, 0);
    }
}
