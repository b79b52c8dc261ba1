#![forbid(unsafe_code)]

//! Windowing engine for long lists of variable-height rows.
//!
//! # Role
//!
//! The host renders rows and measures them; this crate decides which rows
//! to render, where the first one sits, how tall the whole list is, and how
//! wheel, touch, drag, and scrollbar input move the offset. It owns no
//! drawing surface and never blocks: deferred work goes through a
//! [`vscroll_runtime::Scheduler`] the host pumps.
//!
//! # Core Types
//!
//! - [`VirtualList`] - the engine facade the host talks to
//! - [`VirtualListConfig`] - sizing and behaviour knobs, env-overridable
//! - [`RenderWindow`] - rows to render and their placement
//! - [`HeightCache`] - measured heights keyed by [`vscroll_core::ItemKey`]
//! - [`ScrollOffsetController`] - the single clamped vertical offset
//! - [`ConvergentScrollTo`] - scroll-to-row that re-aims as heights arrive
//!
//! # Invariants
//!
//! 1. `scroll_top` stays in `[0, max(0, total - viewport)]`.
//! 2. Rows `start..=end` of the window cover the viewport whenever the
//!    offset is in range.
//! 3. Every offset change flows through [`ScrollOffsetController`].

pub mod config;
pub mod controller;
pub mod height_cache;
pub mod input;
pub mod list_diff;
pub mod measure;
pub mod outcome;
pub mod range;
pub mod scroll_to;
pub mod scrollbar;
pub mod task;
pub mod virtual_list;

pub use config::{ConfigError, ConfigParse, ContainerSizing, VirtualListConfig};
pub use controller::{NoopHost, ScrollEdges, ScrollHost, ScrollOffsetController, ScrollUpdate};
pub use height_cache::HeightCache;
pub use list_diff::{ListDiff, find_list_diff};
pub use measure::{HeightCollector, HeightObserver};
pub use outcome::{InputOutcome, MouseResult};
pub use range::{RangeCalculator, RangeInput, RangeMemo, RenderWindow, Virtualization};
pub use scroll_to::{
    ConvergentScrollTo, ScrollAlign, ScrollTarget, ScrollToError, ScrollToItem, StepStatus,
};
pub use scrollbar::{ScrollbarState, ThumbGeometry};
pub use task::EngineTask;
pub use virtual_list::VirtualList;
