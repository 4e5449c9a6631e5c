//! Standard library backed implementations of the runtime platform traits.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use swipedeck_core::{Clock, Runtime, RuntimeScheduler};
use web_time::{Duration, Instant};

/// Scheduler that records frame requests in an atomic flag.
///
/// The host loop calls [`StdScheduler::take_frame_request`] once per turn to
/// decide whether to render.
#[derive(Debug, Default)]
pub struct StdScheduler {
    frame_requested: AtomicBool,
}

impl StdScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn take_frame_request(&self) -> bool {
        self.frame_requested.swap(false, Ordering::SeqCst)
    }

    pub fn has_frame_request(&self) -> bool {
        self.frame_requested.load(Ordering::SeqCst)
    }
}

impl RuntimeScheduler for StdScheduler {
    fn schedule_frame(&self) {
        if !self.frame_requested.swap(true, Ordering::SeqCst) {
            log::trace!("frame requested");
        }
    }
}

/// Monotonic wall clock.
#[derive(Debug, Clone, Copy)]
pub struct StdClock {
    origin: Instant,
}

impl StdClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }

    /// Nanoseconds since the clock was created; the value handed to
    /// `drain_frame_callbacks`.
    pub fn frame_time_nanos(&self) -> u64 {
        let elapsed: Duration = self.origin.elapsed();
        elapsed.as_nanos().min(u64::MAX as u128) as u64
    }
}

impl Default for StdClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for StdClock {
    type Instant = Instant;

    fn now(&self) -> Self::Instant {
        Instant::now()
    }

    fn elapsed_millis(&self, since: Self::Instant) -> u64 {
        let elapsed = Instant::now().saturating_duration_since(since);
        elapsed.as_millis().min(u64::MAX as u128) as u64
    }
}

/// Runtime wired to a [`StdScheduler`] and [`StdClock`].
pub struct StdRuntime {
    runtime: Runtime,
    scheduler: Arc<StdScheduler>,
    clock: StdClock,
}

impl StdRuntime {
    pub fn new() -> Self {
        let scheduler = Arc::new(StdScheduler::new());
        let runtime = Runtime::new(scheduler.clone());
        Self {
            runtime,
            scheduler,
            clock: StdClock::new(),
        }
    }

    pub fn runtime(&self) -> &Runtime {
        &self.runtime
    }

    pub fn scheduler(&self) -> &Arc<StdScheduler> {
        &self.scheduler
    }

    pub fn clock(&self) -> &StdClock {
        &self.clock
    }

    /// Drain one frame at the current wall-clock time. Returns whether a
    /// frame had been requested.
    pub fn pump_frame(&self) -> bool {
        let requested = self.scheduler.take_frame_request();
        let handle = self.runtime.handle();
        handle.drain_frame_callbacks(self.clock.frame_time_nanos());
        if handle.needs_frame() {
            // Work queued during this frame still needs another one.
            self.scheduler.schedule_frame();
        }
        requested
    }

    pub fn is_idle(&self) -> bool {
        !self.runtime.handle().has_pending_work() && !self.scheduler.has_frame_request()
    }
}

impl Default for StdRuntime {
    fn default() -> Self {
        Self::new()
    }
}
