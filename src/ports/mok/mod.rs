//! Host/testing port: no real interrupts or context switching, just enough
//! bookkeeping for the kernel's list and counter logic to be exercised by
//! `cargo test` on a development machine.

pub mod hardware_timer;

use crate::ports::Port;
use crate::task::TaskEntry;
use core::sync::atomic::{AtomicBool, Ordering};

/// Pseudo interrupt-enable flag; this port has no real interrupts to mask,
/// but still tracks the "previously enabled" state so critical sections
/// nest correctly in tests.
static INTERRUPTS_ENABLED: AtomicBool = AtomicBool::new(true);

/// `Port` implementation for the host/testing target.
pub struct Mok;

impl Port for Mok {
    type TrapFrame = ();

    fn setup_hardware_timer() {
        hardware_timer::setup_hardware_timer();
    }

    fn get_tick_counter() -> u64 {
        hardware_timer::get_tick_counter()
    }

    fn setup_interrupt() {}

    fn setup_stack(stack: &mut [u8], _entry: TaskEntry) -> usize {
        // Nothing to execute on this port; the "stack pointer" is just the
        // top of the provided buffer, matching the direction a real port's
        // stack grows from.
        stack.as_ptr() as usize + stack.len()
    }

    fn save_ctx(_out_sp: &mut usize, _isr_ctx: &Self::TrapFrame) {}

    fn load_ctx(_sp: usize, _isr_ctx: &mut Self::TrapFrame) {}

    fn enter_critical() -> bool {
        INTERRUPTS_ENABLED.swap(false, Ordering::AcqRel)
    }

    fn exit_critical(was_enabled: bool) {
        INTERRUPTS_ENABLED.store(was_enabled, Ordering::Release);
    }
}
