#![cfg_attr(target_os = "none", no_std)]
//! tinykernel is a small preemptive, fixed-priority real-time kernel.
//!
//! It targets a bare-metal single-core processor and provides:
//!
//! - static task control blocks scheduled by unique, fixed priority,
//! - timed delays (`delay_task`),
//! - counting semaphores (`sem_create` / `sem_pend` / `sem_post`),
//! - fixed-capacity message queues (`q_create` / `q_pend` / `q_post`).
//!
//! There is no dynamic memory allocation anywhere in this crate: tasks,
//! semaphores and queues are all carved out of static pools sized by
//! [`config`]. The kernel is its own scheduler; the only lock it needs is
//! disabling interrupts, which [`kernel::enter_mutex`]/[`kernel::exit_mutex`]
//! wrap.
//!
//! # Example
//!
//! ```rust,no_run
//! use tinykernel::kernel;
//!
//! extern "C" fn producer() -> ! {
//!     loop {
//!         kernel::delay_task(10);
//!     }
//! }
//!
//! kernel::initialize();
//! kernel::new_task(producer, 5);
//! kernel::run();
//! ```

pub mod config;
pub mod error;
pub mod kernel;
pub mod ports;
pub mod queue;
pub mod sem;
pub mod task;
