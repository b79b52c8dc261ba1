#![forbid(unsafe_code)]

//! Core: input events, item keys, geometry, and logging bootstrap.
//!
//! # Role in vscroll
//! `vscroll-core` is the vocabulary layer. It owns the device-neutral event
//! types the host translates its native input into, the opaque [`ItemKey`]
//! that identifies list rows, and the small geometry types shared by the
//! scrollbar and drag handling.
//!
//! # How it fits in the system
//! The engine (`vscroll-widgets`) consumes these types; the scheduler and
//! reactive primitives live in `vscroll-runtime`. Nothing here performs I/O
//! or keeps global state.

pub mod event;
pub mod geometry;
pub mod key;
pub mod logging;

pub use event::{
    Axis, DeltaMode, MouseButton, MouseEvent, MouseEventKind, TouchEvent, TouchPoint, WheelEvent,
};
pub use geometry::{Bounds, ScrollInfo};
pub use key::{ItemKey, KeyExtractor, Keyed};
