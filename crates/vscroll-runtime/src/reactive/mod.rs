#![forbid(unsafe_code)]

//! Change-tracked values.
//!
//! - [`Observable`]: a shared, version-tracked value that notifies its
//!   subscribers only when the value actually changes.
//! - [`Subscription`]: RAII guard that unsubscribes on drop.
//!
//! The engine publishes its scroll offset through an `Observable`, which is
//! what gives `on_virtual_scroll` its "only when the value changed"
//! contract.
//!
//! # Invariants
//!
//! 1. Version increments exactly once per value-changing `set`.
//! 2. Subscribers are notified in registration order.
//! 3. Setting an equal value is a no-op.

pub mod observable;

pub use observable::{Observable, Subscription};
