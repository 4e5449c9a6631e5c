//! Platform abstraction traits for runtime services.
//!
//! These traits allow the deck runtime to delegate frame scheduling and
//! clock responsibilities to the host, so the same widget can run under a
//! desktop event loop, a browser animation frame or a test harness.

/// Schedules frames for the runtime.
///
/// Implementations only need to make sure the host will eventually call
/// [`crate::RuntimeHandle::drain_frame_callbacks`]. They must be safe to use
/// from multiple threads.
pub trait RuntimeScheduler: Send + Sync {
    /// Request that the host schedule a new frame.
    fn schedule_frame(&self);
}

/// Provides timing information for the runtime.
pub trait Clock: Send + Sync {
    /// Instant type produced by this clock implementation.
    type Instant: Copy + Send + Sync;

    /// Returns the current instant.
    fn now(&self) -> Self::Instant;

    /// Returns the number of milliseconds elapsed since `since`.
    fn elapsed_millis(&self, since: Self::Instant) -> u64;
}
