//! Deterministic frame pump.
//!
//! Owns a [`Scheduler`] and advances its frame time in fixed 60fps steps, so
//! animation tests produce the same values on every run regardless of wall
//! clock or machine speed.

use std::sync::Arc;

use swiper_runtime::platform::DefaultScheduler;
use swiper_runtime::scheduler::{Scheduler, SchedulerHandle};

/// Nanoseconds per simulated frame, the 60fps cadence hosts actually run at.
pub const FRAME_NANOS: u64 = 16_666_667;

/// Frame cap for [`FrameDriver::run_until_idle`]: ten simulated seconds.
const MAX_IDLE_FRAMES: usize = 600;

/// A scheduler plus a monotonically advancing fake frame clock.
pub struct FrameDriver {
    scheduler: Scheduler,
    frame_time_nanos: u64,
}

impl FrameDriver {
    pub fn new() -> Self {
        Self {
            scheduler: Scheduler::new(Arc::new(DefaultScheduler)),
            frame_time_nanos: 0,
        }
    }

    /// Handle to hand to the code under test.
    pub fn handle(&self) -> SchedulerHandle {
        self.scheduler.handle()
    }

    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    /// The timestamp the most recent frame ran at.
    pub fn frame_time_nanos(&self) -> u64 {
        self.frame_time_nanos
    }

    /// Advances one frame and drains the callbacks registered for it.
    pub fn advance_frame(&mut self) {
        self.frame_time_nanos += FRAME_NANOS;
        self.scheduler.drain_frame_callbacks(self.frame_time_nanos);
    }

    pub fn advance_frames(&mut self, frames: usize) {
        for _ in 0..frames {
            self.advance_frame();
        }
    }

    /// Advances whole frames until at least `millis` of frame time has
    /// elapsed. Useful for stepping past a tween's configured duration.
    pub fn advance_millis(&mut self, millis: u64) {
        let target = self.frame_time_nanos + millis * 1_000_000;
        while self.frame_time_nanos < target {
            self.advance_frame();
        }
    }

    /// Pumps frames until nothing is scheduled and returns how many frames
    /// that took. Panics past [`MAX_IDLE_FRAMES`] so a runaway animation
    /// fails the test instead of spinning it forever.
    pub fn run_until_idle(&mut self) -> usize {
        let mut frames = 0;
        while self.scheduler.has_frame_callbacks() {
            assert!(
                frames < MAX_IDLE_FRAMES,
                "animation still running after {MAX_IDLE_FRAMES} frames"
            );
            self.advance_frame();
            frames += 1;
        }
        frames
    }
}

impl Default for FrameDriver {
    fn default() -> Self {
        Self::new()
    }
}
