//! Release-velocity estimation for hosts without a gesture stack of their own.
//!
//! Implements the impulse strategy: velocity is recovered from the kinetic
//! energy the pointer imparted over the recent samples, which is robust
//! against jittery timestamps compared to a least-squares fit.

/// Ring buffer capacity for position samples.
const HISTORY_SIZE: usize = 20;

/// Samples older than this never contribute to the estimate.
const HORIZON_MILLIS: i64 = 100;

/// A gap this long between samples means the pointer stopped moving.
pub const ASSUME_STOPPED_MILLIS: i64 = 40;

#[derive(Clone, Copy)]
struct Sample {
    time_millis: i64,
    position: f32,
}

/// One-dimensional pointer velocity tracker.
///
/// Feed it absolute positions along the drag axis via [`add_sample`] while a
/// drag is in progress, then read the release velocity with [`velocity`] or
/// [`velocity_capped`]. Reuse across gestures by calling [`reset`] on press.
///
/// [`add_sample`]: VelocityTracker::add_sample
/// [`velocity`]: VelocityTracker::velocity
/// [`velocity_capped`]: VelocityTracker::velocity_capped
/// [`reset`]: VelocityTracker::reset
#[derive(Clone)]
pub struct VelocityTracker {
    samples: [Option<Sample>; HISTORY_SIZE],
    index: usize,
}

impl Default for VelocityTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl VelocityTracker {
    pub fn new() -> Self {
        Self {
            samples: [None; HISTORY_SIZE],
            index: 0,
        }
    }

    /// Records the pointer position at `time_millis`. Older samples are
    /// overwritten once the buffer wraps.
    pub fn add_sample(&mut self, time_millis: i64, position: f32) {
        self.index = (self.index + 1) % HISTORY_SIZE;
        self.samples[self.index] = Some(Sample {
            time_millis,
            position,
        });
    }

    /// Estimated velocity in units per second.
    ///
    /// Returns 0.0 with fewer than two usable samples, when every other
    /// sample is older than the horizon, or when the pointer stalled longer
    /// than [`ASSUME_STOPPED_MILLIS`] before the newest sample.
    pub fn velocity(&self) -> f32 {
        let newest = match self.samples[self.index] {
            Some(sample) => sample,
            None => return 0.0,
        };

        let mut positions = [0.0f32; HISTORY_SIZE];
        let mut times = [0.0f32; HISTORY_SIZE];
        let mut count = 0;

        let mut index = self.index;
        let mut previous_time = newest.time_millis;
        while let Some(sample) = self.samples[index] {
            let age = (newest.time_millis - sample.time_millis) as f32;
            let gap = (previous_time - sample.time_millis).abs() as f32;
            previous_time = sample.time_millis;
            if age > HORIZON_MILLIS as f32 || gap > ASSUME_STOPPED_MILLIS as f32 {
                break;
            }

            positions[count] = sample.position;
            times[count] = -age;

            index = if index == 0 { HISTORY_SIZE - 1 } else { index - 1 };
            count += 1;
            if count >= HISTORY_SIZE {
                break;
            }
        }

        if count < 2 {
            return 0.0;
        }
        impulse_velocity(&positions, &times, count) * 1000.0
    }

    /// Estimated velocity clamped to `±max_velocity`. A non-positive or
    /// non-finite cap yields 0.0.
    pub fn velocity_capped(&self, max_velocity: f32) -> f32 {
        if !max_velocity.is_finite() || max_velocity <= 0.0 {
            return 0.0;
        }
        let velocity = self.velocity();
        if velocity == 0.0 || velocity.is_nan() {
            return 0.0;
        }
        velocity.clamp(-max_velocity, max_velocity)
    }

    /// Forgets every sample; call when a new gesture begins.
    pub fn reset(&mut self) {
        self.samples = [None; HISTORY_SIZE];
        self.index = 0;
    }
}

/// Impulse-strategy estimate over samples ordered newest (index 0) to
/// oldest, with `times` holding non-positive millisecond offsets from the
/// newest sample.
fn impulse_velocity(positions: &[f32; HISTORY_SIZE], times: &[f32; HISTORY_SIZE], count: usize) -> f32 {
    if count < 2 {
        return 0.0;
    }

    let mut work = 0.0f32;
    let oldest = count - 1;
    let mut next_time = times[oldest];

    // Walk from the oldest adjacent pair to the newest, accumulating the
    // work each segment contributes to the pointer's kinetic energy.
    for i in (1..=oldest).rev() {
        let current_time = next_time;
        next_time = times[i - 1];
        if current_time == next_time {
            continue;
        }

        let segment_velocity = (positions[i] - positions[i - 1]) / (current_time - next_time);
        let previous_velocity = kinetic_energy_to_velocity(work);
        work += (segment_velocity - previous_velocity) * segment_velocity.abs();
        if i == oldest {
            work *= 0.5;
        }
    }

    kinetic_energy_to_velocity(work)
}

/// `E = v^2 / 2` solved for `v`, keeping the sign of the energy.
#[inline]
fn kinetic_energy_to_velocity(kinetic_energy: f32) -> f32 {
    kinetic_energy.signum() * (2.0 * kinetic_energy.abs()).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::MAX_FLING_VELOCITY;

    #[test]
    fn empty_tracker_reports_zero() {
        let tracker = VelocityTracker::new();
        assert_eq!(tracker.velocity(), 0.0);
    }

    #[test]
    fn single_sample_reports_zero() {
        let mut tracker = VelocityTracker::new();
        tracker.add_sample(0, 100.0);
        assert_eq!(tracker.velocity(), 0.0);
    }

    #[test]
    fn constant_motion_recovers_rate() {
        let mut tracker = VelocityTracker::new();
        // 100 units every 10 ms = 10_000 units/s.
        for step in 0..4 {
            tracker.add_sample(step * 10, step as f32 * 100.0);
        }

        let velocity = tracker.velocity();
        assert!(
            (velocity - 10_000.0).abs() < 1_000.0,
            "expected ~10000, got {velocity}"
        );
    }

    #[test]
    fn downward_motion_is_negative() {
        let mut tracker = VelocityTracker::new();
        tracker.add_sample(0, 300.0);
        tracker.add_sample(10, 200.0);
        tracker.add_sample(20, 100.0);

        assert!(tracker.velocity() < 0.0);
    }

    #[test]
    fn reset_discards_history() {
        let mut tracker = VelocityTracker::new();
        tracker.add_sample(0, 0.0);
        tracker.add_sample(10, 100.0);

        tracker.reset();
        assert_eq!(tracker.velocity(), 0.0);
    }

    #[test]
    fn cap_applies_symmetrically() {
        let mut tracker = VelocityTracker::new();
        tracker.add_sample(0, 0.0);
        tracker.add_sample(1, 10_000.0);
        assert_eq!(tracker.velocity_capped(MAX_FLING_VELOCITY), 8_000.0);

        tracker.reset();
        tracker.add_sample(0, 10_000.0);
        tracker.add_sample(1, 0.0);
        assert_eq!(tracker.velocity_capped(MAX_FLING_VELOCITY), -8_000.0);
    }

    #[test]
    fn samples_past_horizon_are_ignored() {
        let mut tracker = VelocityTracker::new();
        tracker.add_sample(0, 500.0);
        // Recent burst, unrelated to the stale first point.
        tracker.add_sample(150, 100.0);
        tracker.add_sample(160, 200.0);
        tracker.add_sample(170, 300.0);

        let velocity = tracker.velocity();
        assert!(velocity > 0.0, "stale sample skewed estimate: {velocity}");
    }

    #[test]
    fn long_stall_before_release_reports_zero() {
        let mut tracker = VelocityTracker::new();
        tracker.add_sample(0, 0.0);
        tracker.add_sample(ASSUME_STOPPED_MILLIS + 1, 100.0);

        assert_eq!(tracker.velocity(), 0.0);
    }

    #[test]
    fn buffer_wrap_keeps_latest_window() {
        let mut tracker = VelocityTracker::new();
        for step in 0..(HISTORY_SIZE as i64 + 10) {
            tracker.add_sample(step * 5, step as f32 * 50.0);
        }

        // 50 units every 5 ms = 10_000 units/s.
        let velocity = tracker.velocity();
        assert!(
            (velocity - 10_000.0).abs() < 1_000.0,
            "expected ~10000 after wrap, got {velocity}"
        );
    }
}
