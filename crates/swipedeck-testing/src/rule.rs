//! Virtual-time runtime driver.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use swipedeck_core::{Runtime, RuntimeHandle, RuntimeScheduler};

/// One frame at 60 Hz.
pub const FRAME_NANOS: u64 = 16_666_667;

/// Frames [`DeckTestRule::pump_until_idle`] runs before giving up.
const MAX_IDLE_FRAMES: usize = 600;

#[derive(Default)]
struct CountingScheduler {
    requests: AtomicUsize,
}

impl RuntimeScheduler for CountingScheduler {
    fn schedule_frame(&self) {
        self.requests.fetch_add(1, Ordering::SeqCst);
    }
}

/// Test rule that drives a [`Runtime`] with a virtual clock.
///
/// Similar in spirit to a compose test rule: nothing happens until the test
/// advances time, and every frame is delivered at an exact timestamp.
pub struct DeckTestRule {
    runtime: Runtime,
    scheduler: Arc<CountingScheduler>,
    frame_time_nanos: u64,
    frames: usize,
}

impl DeckTestRule {
    pub fn new() -> Self {
        let scheduler = Arc::new(CountingScheduler::default());
        let runtime = Runtime::new(scheduler.clone());
        Self {
            runtime,
            scheduler,
            frame_time_nanos: 0,
            frames: 0,
        }
    }

    pub fn runtime(&self) -> &Runtime {
        &self.runtime
    }

    pub fn runtime_handle(&self) -> RuntimeHandle {
        self.runtime.handle()
    }

    /// Virtual time of the most recent frame.
    pub fn frame_time_nanos(&self) -> u64 {
        self.frame_time_nanos
    }

    pub fn frame_time_millis(&self) -> u64 {
        self.frame_time_nanos / 1_000_000
    }

    /// Frames delivered so far.
    pub fn frames(&self) -> usize {
        self.frames
    }

    /// How many times the runtime asked the host for a frame.
    pub fn frame_requests(&self) -> usize {
        self.scheduler.requests.load(Ordering::SeqCst)
    }

    pub fn is_idle(&self) -> bool {
        !self.runtime.handle().has_pending_work()
    }

    /// Deliver one frame, one frame interval after the previous one.
    pub fn advance_frame(&mut self) {
        self.advance_time_by_nanos(FRAME_NANOS);
    }

    /// Move the clock forward and deliver a single frame at the new time.
    pub fn advance_time_by_nanos(&mut self, nanos: u64) {
        self.frame_time_nanos = self.frame_time_nanos.saturating_add(nanos);
        self.frames += 1;
        self.runtime
            .handle()
            .drain_frame_callbacks(self.frame_time_nanos);
    }

    /// Step through `millis` of virtual time in whole frames, plus one
    /// shorter frame for any remainder.
    pub fn advance_time_by_millis(&mut self, millis: u64) {
        let mut remaining = millis.saturating_mul(1_000_000);
        while remaining > 0 {
            let step = remaining.min(FRAME_NANOS);
            self.advance_time_by_nanos(step);
            remaining -= step;
        }
    }

    /// Run frames until no callbacks or tasks remain. Returns the number of
    /// frames delivered.
    ///
    /// # Panics
    ///
    /// Panics if the runtime is still busy after a generous frame budget,
    /// which means an animation never settles.
    pub fn pump_until_idle(&mut self) -> usize {
        let start = self.frames;
        while !self.is_idle() {
            assert!(
                self.frames - start < MAX_IDLE_FRAMES,
                "runtime still busy after {MAX_IDLE_FRAMES} frames"
            );
            self.advance_frame();
        }
        let delivered = self.frames - start;
        log::trace!("idle after {delivered} frames at {}ms", self.frame_time_millis());
        delivered
    }
}

impl Default for DeckTestRule {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for DeckTestRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeckTestRule")
            .field("frame_time_nanos", &self.frame_time_nanos)
            .field("frames", &self.frames)
            .field("idle", &self.is_idle())
            .finish()
    }
}
