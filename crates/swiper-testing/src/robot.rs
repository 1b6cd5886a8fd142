//! Gesture-level driving of a swiper state.
//!
//! Mirrors what a host's pointer loop does: a press, a run of move deltas,
//! and a release with tracked velocity, followed by pumping frames until the
//! offset settles.

use swiper::{SwiperCallbacks, SwiperConfig, SwiperState};

use crate::driver::FrameDriver;

/// Owns a [`FrameDriver`] and one [`SwiperState`] wired to it.
pub struct SwipeRobot {
    driver: FrameDriver,
    state: SwiperState,
}

impl SwipeRobot {
    pub fn new(config: SwiperConfig, callbacks: SwiperCallbacks) -> Self {
        let driver = FrameDriver::new();
        let state = SwiperState::new(driver.handle(), config, callbacks);
        Self { driver, state }
    }

    /// Restores a robot from a persisted offset, as a host recreating state
    /// after process death would.
    pub fn with_saved_offset(
        config: SwiperConfig,
        callbacks: SwiperCallbacks,
        saved_offset: f32,
    ) -> Self {
        let driver = FrameDriver::new();
        let state =
            SwiperState::with_initial_offset(driver.handle(), config, callbacks, saved_offset);
        Self { driver, state }
    }

    pub fn state(&self) -> &SwiperState {
        &self.state
    }

    pub fn driver_mut(&mut self) -> &mut FrameDriver {
        &mut self.driver
    }

    /// Starts a drag and feeds `total` as a run of equal move deltas,
    /// without releasing.
    pub fn drag_by(&mut self, total: f32, steps: usize) {
        let steps = steps.max(1);
        self.state.on_drag_start();
        let step = total / steps as f32;
        for _ in 0..steps {
            self.state.on_drag_delta(step);
        }
    }

    /// Releases the drag in flight with the given velocity.
    pub fn release(&mut self, velocity: f32) {
        self.state.on_drag_end(velocity);
    }

    /// A complete gesture: drag by `total`, then release with `velocity`.
    pub fn fling(&mut self, total: f32, velocity: f32) {
        self.drag_by(total, 8);
        self.release(velocity);
    }

    /// Pumps frames until every animation settles; returns the frame count.
    pub fn settle(&mut self) -> usize {
        self.driver.run_until_idle()
    }

    pub fn offset(&self) -> f32 {
        self.state.offset()
    }

    pub fn is_dismissed(&self) -> bool {
        self.state.is_dismissed()
    }
}

#[cfg(test)]
mod tests {
    use swiper::Direction;

    use super::*;
    use crate::recorder::{CallbackEvent, CallbackRecorder};

    fn config(extent: f32) -> SwiperConfig {
        SwiperConfig {
            direction: Direction::Up,
            bound_extent: extent,
            ..SwiperConfig::default()
        }
    }

    #[test]
    fn fling_past_threshold_dismisses_and_restores() {
        let recorder = CallbackRecorder::new();
        let mut robot = SwipeRobot::new(config(600.0), recorder.callbacks());

        robot.fling(-400.0, -900.0);
        robot.settle();

        assert_eq!(robot.offset(), 0.0);
        assert!(!robot.is_dismissed());
        assert_eq!(recorder.count(CallbackEvent::Dismiss), 1);
    }

    #[test]
    fn short_drag_restores_without_dismissing() {
        let recorder = CallbackRecorder::new();
        let mut robot = SwipeRobot::new(config(600.0), recorder.callbacks());

        robot.fling(-100.0, 0.0);
        robot.settle();

        assert_eq!(robot.offset(), 0.0);
        assert_eq!(recorder.count(CallbackEvent::Dismiss), 0);
        assert_eq!(recorder.count(CallbackEvent::End), 1);
    }

    #[test]
    fn saved_offset_round_trips() {
        let recorder = CallbackRecorder::new();
        let mut robot = SwipeRobot::new(config(600.0), recorder.callbacks());
        robot.drag_by(-250.0, 5);
        let saved = robot.state().save();

        let restored =
            SwipeRobot::with_saved_offset(config(600.0), CallbackRecorder::new().callbacks(), saved);
        assert_eq!(restored.offset(), saved);
    }
}
