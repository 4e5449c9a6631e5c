//! Core runtime for the swipe deck widget.
//!
//! The runtime is a single-threaded event loop companion: animations register
//! frame callbacks, work that must happen "on a later turn" is posted as a
//! task, and the host drains both once per frame.

mod frame_clock;
mod geometry;
pub mod platform;
mod runtime;

pub use frame_clock::{FrameCallbackRegistration, FrameClock};
pub use geometry::{Point, Size};
pub use platform::{Clock, RuntimeScheduler};
pub use runtime::{DefaultScheduler, Runtime, RuntimeHandle};

pub type FrameCallbackId = u64;
