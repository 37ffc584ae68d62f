//! Frame scheduling and timing utilities.
//!
//! Paces `StripController::service` without async/await or
//! platform-specific timers. The caller is responsible for
//! sleeping/waiting between frames.

use embassy_time::{Duration, Instant};

use crate::OutputDriver;
use crate::controller::StripController;

/// Result of a frame tick operation.
#[derive(Debug, Clone, Copy)]
pub struct FrameResult {
    /// The deadline for the next frame.
    pub next_deadline: Instant,
    /// How long to wait until the next frame (may be zero if behind schedule).
    pub sleep_duration: Duration,
}

/// Portable frame pacer around the controller.
///
/// Tracks frame timing with drift correction, runs one service step per
/// tick and returns timing info so the caller can sleep appropriately.
///
/// # Usage
///
/// ```ignore
/// let mut scheduler = FrameScheduler::new(controller);
///
/// loop {
///     let result = scheduler.tick(Instant::now());
///     // Platform-specific sleep
///     sleep_ms(result.sleep_duration.as_millis() as u64);
/// }
/// ```
pub struct FrameScheduler<O: OutputDriver> {
    controller: StripController<O>,
    next_frame: Instant,
}

impl<O: OutputDriver> FrameScheduler<O> {
    pub fn new(controller: StripController<O>) -> Self {
        Self {
            controller,
            next_frame: Instant::from_millis(0),
        }
    }

    fn frame_duration(&self) -> Duration {
        Duration::from_millis(u64::from(self.controller.strip().min_delay()))
    }

    /// Run one service step and return timing information.
    ///
    /// Applies drift correction first: after a long stall the schedule is
    /// reset to `now` instead of replaying the backlog in a burst.
    pub fn tick(&mut self, now: Instant) -> FrameResult {
        let frame_duration = self.frame_duration();
        let max_drift_ms = frame_duration.as_millis() * 2;
        if now.as_millis() > self.next_frame.as_millis() + max_drift_ms {
            self.next_frame = now;
        }

        self.controller.service(now);

        self.next_frame += frame_duration;

        let sleep_duration = if self.next_frame.as_millis() > now.as_millis() {
            Duration::from_millis(self.next_frame.as_millis() - now.as_millis())
        } else {
            Duration::from_millis(0)
        };

        FrameResult {
            next_deadline: self.next_frame,
            sleep_duration,
        }
    }

    pub fn controller(&self) -> &StripController<O> {
        &self.controller
    }

    pub fn controller_mut(&mut self) -> &mut StripController<O> {
        &mut self.controller
    }
}
