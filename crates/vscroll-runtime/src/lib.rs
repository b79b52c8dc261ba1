#![forbid(unsafe_code)]

//! Runtime: cooperative scheduling, clocks, and reactive values.
//!
//! The engine never waits. Everything that happens "later" (a height flush
//! on the next microtask, a wheel flush on the next animation frame, an
//! inertia tick after 16 ms) is a task queued on a [`Scheduler`] that the
//! host drives from its event loop. Tests drive the same scheduler with a
//! manual clock, which makes every timing-dependent behaviour deterministic.
//!
//! # Invariants
//!
//! 1. Microtasks run before any frame or timer task queued after them.
//! 2. A cancelled task never runs.
//! 3. Timer tasks fire in deadline order; ties fire in queue order.

pub mod clock;
pub mod reactive;
pub mod scheduler;

pub use clock::{Clock, ManualClock, MonotonicClock};
pub use reactive::{Observable, Subscription};
pub use scheduler::{Scheduler, TaskId};
