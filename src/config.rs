//! Compile-time tunables for the kernel's static pools.
//!
//! Nothing here is a runtime config file: since the kernel never allocates,
//! every pool is an array whose size must be known at compile time, the way
//! the reference scheduler keeps `NUM_PRIORITIES`/`THREAD_STACK_SIZE` next to
//! the code that uses them instead of behind a config crate.

/// Maximum number of tasks (including the idle task) the kernel can hold.
pub const MAX_TASKS: usize = 64;

/// Maximum number of semaphores.
pub const MAX_SEMAPHORES: usize = 64;

/// Maximum number of message queues.
pub const MAX_QUEUES: usize = 64;

/// Per-queue capacity ceiling. `q_create` may request any capacity up to
/// this value; the backing buffer is still a fixed-size array.
pub const MAX_QUEUE_CAPACITY: usize = 16;

/// Lowest (numerically largest) priority a task may be created with.
/// The idle task itself runs at this priority, below every task `new_task`
/// can create (`new_task` rejects 0 and anything above this value).
pub const LOWEST_TASK_PRIORITY: usize = 100;

/// Id always assigned to the idle task. Unrelated to its priority; see
/// [`LOWEST_TASK_PRIORITY`].
pub const IDLE_TASK_ID: usize = 0;

/// Stack size, in bytes, for ordinary tasks.
pub const TASK_STACK_SIZE: usize = 1024;

/// Stack size, in bytes, for the idle task.
pub const IDLE_STACK_SIZE: usize = 256;

/// Number of machine words saved/restored per context switch. Architecture
/// ports document their own layout against this constant; see
/// [`crate::ports::Port::setup_stack`].
pub const CONTEXT_SIZE: usize = 13;
