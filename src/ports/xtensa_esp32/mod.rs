pub mod hardware_timer;
mod preempt;

use crate::ports::Port;
use crate::task::TaskEntry;

/// `Port` implementation for Xtensa ESP32 targets.
pub struct XtensaEsp32;

impl Port for XtensaEsp32 {
    type TrapFrame = esp_hal::trapframe::TrapFrame;

    fn setup_hardware_timer() {
        hardware_timer::setup_hardware_timer();
    }

    fn get_tick_counter() -> u64 {
        hardware_timer::get_tick_counter()
    }

    fn setup_interrupt() {
        preempt::setup_interrupt();
    }

    fn setup_stack(stack: &mut [u8], entry: TaskEntry) -> usize {
        preempt::setup_stack(stack, entry)
    }

    fn save_ctx(out_sp: &mut usize, isr_ctx: &Self::TrapFrame) {
        preempt::save_ctx(out_sp, isr_ctx)
    }

    fn load_ctx(sp: usize, isr_ctx: &mut Self::TrapFrame) {
        preempt::load_ctx(sp, isr_ctx)
    }

    fn enter_critical() -> bool {
        preempt::enter_critical()
    }

    fn exit_critical(was_enabled: bool) {
        preempt::exit_critical(was_enabled)
    }
}
