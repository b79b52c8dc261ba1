#![forbid(unsafe_code)]

//! Scroll input unification.
//!
//! Wheel, touch, and drag-select each turn device events into offset deltas.
//! None of them touches the offset directly: they return deltas (or
//! schedule a task that later yields one) and the list routes every delta
//! through the offset controller.
//!
//! - [`origin`]: edge pass-through decision shared by wheel and touch
//! - [`wheel`]: frame-coalesced wheel deltas
//! - [`touch`]: single-finger drag with inertia
//! - [`drag`]: auto-scroll while drag-selecting past the container

pub mod drag;
pub mod origin;
pub mod touch;
pub mod wheel;

pub use drag::DragAutoScroll;
pub use origin::OriginScroll;
pub use touch::{TouchDelta, TouchMove};
pub use wheel::{FrameWheel, WheelAction};
