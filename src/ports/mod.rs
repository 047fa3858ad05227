//! Hardware abstraction for the dispatcher contract.
//!
//! Everything architecture-specific about context switching — the initial
//! stack layout, and the save/restore of the machine's register file — is
//! confined to an implementation of [`Port`]. The kernel proper only ever
//! calls through the trait, the way the reference crate's task managers only
//! ever call through its own per-architecture port module.

use crate::task::TaskEntry;

/// Per-architecture dispatcher primitives.
///
/// `TrapFrame` is whatever the interrupt entry/exit assembly on that
/// architecture already saves; `save_ctx`/`load_ctx` copy between a task's
/// saved stack pointer and that trap frame. A port that cannot express real
/// context switching (the host/testing port) is free to make `TrapFrame`
/// a zero-sized placeholder, as the reference crate's mock port does.
pub trait Port {
    /// Saved machine context for one interrupt/dispatch. A plain register
    /// file, so an all-zero bit pattern is always a valid (if meaningless)
    /// instance — see [`Self::scratch_trap_frame`].
    type TrapFrame: Copy;

    /// A throwaway `TrapFrame` for the scheduler's task-context dispatch
    /// path, which has no live interrupt frame to reuse (see
    /// `kernel::scheduler::Kernel::schedule`). Its contents are written by
    /// [`Self::load_ctx`] and then discarded; nothing ever reads them back
    /// as a real machine state. Zeroing avoids requiring every port's
    /// `TrapFrame` (including foreign types like `esp_hal`'s) to implement
    /// `Default` just for this one scratch use.
    fn scratch_trap_frame() -> Self::TrapFrame {
        unsafe { core::mem::MaybeUninit::zeroed().assume_init() }
    }

    /// One-time setup of the periodic tick source.
    fn setup_hardware_timer();

    /// Ticks elapsed since [`Self::setup_hardware_timer`], as seen by the
    /// hardware timer directly (used for diagnostics, not scheduling).
    fn get_tick_counter() -> u64;

    /// Wires the tick source to the kernel's interrupt entry point. Only
    /// meaningful on targets that actually take interrupts.
    fn setup_interrupt();

    /// Lays out `stack` so that the first dispatch to this task performs an
    /// ordinary register-pop and resumes at `entry` with interrupts enabled.
    /// Returns the initial stack pointer to store in the new task's TCB.
    ///
    /// Layout (high to low address): flags with interrupts enabled, code
    /// segment, `entry`, general-purpose registers, frame pointer equal to
    /// the stack top, remaining segment/index registers — see
    /// [`crate::config::CONTEXT_SIZE`].
    fn setup_stack(stack: &mut [u8], entry: TaskEntry) -> usize;

    /// Saves the outgoing task's context from `isr_ctx` and records its new
    /// stack pointer in `*out_sp`.
    fn save_ctx(out_sp: &mut usize, isr_ctx: &Self::TrapFrame);

    /// Loads the incoming task's context (identified by `sp`) into
    /// `isr_ctx`, so that returning from the interrupt resumes that task.
    fn load_ctx(sp: usize, isr_ctx: &mut Self::TrapFrame);

    /// Disables interrupts and returns whether they were previously enabled.
    /// Pairs with [`Self::exit_critical`]; this is the kernel's only lock.
    fn enter_critical() -> bool;

    /// Restores the interrupt-enable state returned by a matching
    /// [`Self::enter_critical`].
    fn exit_critical(was_enabled: bool);
}

cfg_if::cfg_if! {
    if #[cfg(any(target_arch = "riscv32", target_arch = "xtensa"))] {
        pub mod xtensa_esp32;
        pub use xtensa_esp32::XtensaEsp32 as ActivePort;
    } else {
        pub mod mok;
        pub use mok::Mok as ActivePort;
    }
}
