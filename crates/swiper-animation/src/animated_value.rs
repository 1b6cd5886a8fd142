use std::cell::RefCell;
use std::rc::Rc;

use swiper_runtime::frame_clock::FrameCallbackRegistration;
use swiper_runtime::scheduler::SchedulerHandle;
use swiper_runtime::subscriptions::{SubscriptionId, Subscriptions};

use crate::motion::MotionSpec;

/// Runs after an animation reaches its target. A superseded or cancelled
/// animation drops its callback without running it.
pub type OnSettled = Box<dyn FnOnce()>;

const NANOS_PER_SECOND: f32 = 1_000_000_000.0;
/// Spring integration sub-step, ~one 60 fps frame.
const SPRING_TIMESTEP: f32 = 0.016;

/// Bounded animatable scalar.
///
/// Holds a single `f32` that can be set synchronously (`snap_to`) or driven
/// toward a target by a tween or spring (`animate_to`). Every produced value
/// is clamped to the live bounds; the target itself is left unclamped so a
/// later `set_bounds` can widen the range mid-flight. Starting any new snap
/// or animation supersedes the one in flight.
///
/// Single-threaded: clones share the same value.
pub struct AnimatedValue {
    inner: Rc<RefCell<AnimatedValueInner>>,
}

struct AnimatedValueInner {
    scheduler: SchedulerHandle,
    value: f32,
    /// Units per second; integrated by springs, derived per frame by tweens.
    velocity: f32,
    lower_bound: f32,
    upper_bound: f32,
    start: f32,
    target: f32,
    motion: MotionSpec,
    start_time_nanos: Option<u64>,
    last_frame_nanos: Option<u64>,
    registration: Option<FrameCallbackRegistration>,
    on_settled: Option<OnSettled>,
    watchers: Rc<Subscriptions<f32>>,
}

impl AnimatedValue {
    pub fn new(initial: f32, scheduler: SchedulerHandle) -> Self {
        let initial = if initial.is_finite() { initial } else { 0.0 };
        let inner = AnimatedValueInner {
            scheduler,
            value: initial,
            velocity: 0.0,
            lower_bound: f32::NEG_INFINITY,
            upper_bound: f32::INFINITY,
            start: initial,
            target: initial,
            motion: MotionSpec::default(),
            start_time_nanos: None,
            last_frame_nanos: None,
            registration: None,
            on_settled: None,
            watchers: Rc::new(Subscriptions::new()),
        };
        Self {
            inner: Rc::new(RefCell::new(inner)),
        }
    }

    pub fn value(&self) -> f32 {
        self.inner.borrow().value
    }

    /// Current velocity in units per second, observable mid-animation.
    pub fn velocity(&self) -> f32 {
        self.inner.borrow().velocity
    }

    pub fn target(&self) -> f32 {
        self.inner.borrow().target
    }

    pub fn bounds(&self) -> (f32, f32) {
        let inner = self.inner.borrow();
        (inner.lower_bound, inner.upper_bound)
    }

    pub fn is_animating(&self) -> bool {
        self.inner.borrow().registration.is_some()
    }

    /// Notifies `callback` with the new value every time it actually changes,
    /// after internal state is consistent.
    pub fn subscribe(&self, callback: impl Fn(f32) + 'static) -> SubscriptionId {
        self.inner.borrow().watchers.subscribe(callback)
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.inner.borrow().watchers.unsubscribe(id)
    }

    /// Sets the value synchronously, cancelling any in-flight animation and
    /// zeroing the velocity. NaN keeps the current value; infinities clamp
    /// to the nearest bound. Never schedules a frame.
    pub fn snap_to(&self, value: f32) {
        let (watchers, changed, settled) = {
            let mut inner = self.inner.borrow_mut();
            if let Some(registration) = inner.registration.take() {
                registration.cancel();
            }
            inner.on_settled = None;
            inner.start_time_nanos = None;
            inner.last_frame_nanos = None;
            inner.velocity = 0.0;

            let mut next = if value.is_nan() {
                inner.value
            } else {
                value.clamp(inner.lower_bound, inner.upper_bound)
            };
            if !next.is_finite() {
                next = inner.value;
            }
            let changed = next != inner.value;
            inner.value = next;
            inner.start = next;
            inner.target = next;
            (inner.watchers.clone(), changed, next)
        };
        if changed {
            watchers.emit(settled);
        }
    }

    /// Animates toward `target`, inheriting the current velocity.
    pub fn animate_to(&self, target: f32, motion: MotionSpec) {
        self.animate_to_with(target, None, motion, None);
    }

    /// Full-form animate: cancels any in-flight animation (dropping its
    /// `on_settled`), then runs `motion` from the current value to `target`.
    /// `initial_velocity: None` inherits the current velocity. `on_settled`
    /// runs exactly once if the animation completes without interruption.
    pub fn animate_to_with(
        &self,
        target: f32,
        initial_velocity: Option<f32>,
        motion: MotionSpec,
        on_settled: Option<OnSettled>,
    ) {
        {
            let mut inner = self.inner.borrow_mut();
            if let Some(registration) = inner.registration.take() {
                registration.cancel();
            }
            // Non-finite targets collapse to the nearest finite bound, or to
            // the current value when that side is unbounded.
            let target = if target.is_nan() {
                inner.value
            } else if target == f32::INFINITY {
                if inner.upper_bound.is_finite() {
                    inner.upper_bound
                } else {
                    inner.value
                }
            } else if target == f32::NEG_INFINITY {
                if inner.lower_bound.is_finite() {
                    inner.lower_bound
                } else {
                    inner.value
                }
            } else {
                target
            };
            inner.start = inner.value;
            inner.target = target;
            inner.motion = motion;
            inner.start_time_nanos = None;
            inner.last_frame_nanos = None;
            if let Some(velocity) = initial_velocity {
                inner.velocity = if velocity.is_finite() { velocity } else { 0.0 };
            }
            inner.on_settled = on_settled;
        }
        Self::schedule_frame(&self.inner);
    }

    /// Replaces the bounds, clamping the current value immediately (without
    /// animation) when it falls outside. An in-flight animation keeps running
    /// and clamps its following frames against the new bounds.
    pub fn set_bounds(&self, lower: f32, upper: f32) {
        let (watchers, changed, clamped) = {
            let mut inner = self.inner.borrow_mut();
            let lower = if lower.is_nan() {
                f32::NEG_INFINITY
            } else {
                lower
            };
            let upper = if upper.is_nan() { f32::INFINITY } else { upper };
            let (lower, upper) = if lower <= upper {
                (lower, upper)
            } else {
                (upper, lower)
            };
            inner.lower_bound = lower;
            inner.upper_bound = upper;

            let clamped = inner.value.clamp(lower, upper);
            let changed = clamped != inner.value;
            inner.value = clamped;
            (inner.watchers.clone(), changed, clamped)
        };
        if changed {
            watchers.emit(clamped);
        }
    }

    fn schedule_frame(this: &Rc<RefCell<AnimatedValueInner>>) {
        let scheduler = {
            let inner = this.borrow();
            if inner.registration.is_some() {
                return;
            }
            inner.scheduler.clone()
        };
        let weak = Rc::downgrade(this);
        let registration = scheduler.frame_clock().with_frame_nanos(move |time| {
            if let Some(strong) = weak.upgrade() {
                Self::on_frame(&strong, time);
            }
        });
        if registration.is_active() {
            this.borrow_mut().registration = Some(registration);
        }
    }

    fn on_frame(this: &Rc<RefCell<AnimatedValueInner>>, frame_time_nanos: u64) {
        let mut schedule_next = false;
        let mut finished = false;
        let mut emitted = None;
        let mut settled_callback = None;
        let watchers;
        {
            let mut inner = this.borrow_mut();
            inner.registration = None;
            watchers = inner.watchers.clone();

            let previous = inner.value;
            let start_time = *inner.start_time_nanos.get_or_insert(frame_time_nanos);
            let last_frame = inner
                .last_frame_nanos
                .replace(frame_time_nanos)
                .unwrap_or(start_time);
            let frame_dt = frame_time_nanos.saturating_sub(last_frame) as f32 / NANOS_PER_SECOND;

            match inner.motion {
                MotionSpec::Tween(spec) => {
                    let elapsed = frame_time_nanos.saturating_sub(start_time);
                    let duration_nanos = (spec.duration_millis * 1_000_000).max(1);
                    let linear_progress = (elapsed as f32 / duration_nanos as f32).clamp(0.0, 1.0);
                    let eased = spec.easing.transform(linear_progress);
                    let next = lerp(inner.start, inner.target, eased)
                        .clamp(inner.lower_bound, inner.upper_bound);
                    if frame_dt > 0.0 {
                        inner.velocity = (next - previous) / frame_dt;
                    }
                    inner.value = next;
                    if linear_progress >= 1.0 {
                        finished = true;
                    } else {
                        schedule_next = true;
                    }
                }
                MotionSpec::Spring(spec) => {
                    if frame_dt <= 0.0 {
                        // First frame establishes the timebase.
                        schedule_next = true;
                    } else {
                        let target = inner.target;
                        let damping = 2.0 * spec.damping_ratio * spec.stiffness.sqrt();
                        let mut value = inner.value;
                        let mut velocity = inner.velocity;
                        // Semi-implicit Euler, sub-stepped for stability.
                        let mut remaining = frame_dt;
                        while remaining > 0.0 {
                            let step = SPRING_TIMESTEP.min(remaining);
                            let displacement = value - target;
                            let acceleration =
                                -spec.stiffness * displacement - damping * velocity;
                            velocity += acceleration * step;
                            value += velocity * step;
                            remaining -= step;
                        }
                        inner.velocity = velocity;
                        inner.value = value.clamp(inner.lower_bound, inner.upper_bound);

                        let at_rest = velocity.abs() < spec.velocity_threshold;
                        let near_target = (inner.value - target).abs() < spec.position_threshold;
                        if at_rest && near_target {
                            finished = true;
                        } else {
                            schedule_next = true;
                        }
                    }
                }
            }

            if finished {
                let resting = inner
                    .target
                    .clamp(inner.lower_bound, inner.upper_bound);
                inner.value = resting;
                inner.start = resting;
                inner.start_time_nanos = None;
                inner.last_frame_nanos = None;
                inner.velocity = 0.0;
                settled_callback = inner.on_settled.take();
            }
            if inner.value != previous {
                emitted = Some(inner.value);
            }
        }

        // Re-register before notifying so watchers observe a consistent
        // `is_animating`; a watcher that starts a new animation supersedes
        // this registration like any other caller.
        if schedule_next {
            Self::schedule_frame(this);
        }
        if let Some(value) = emitted {
            watchers.emit(value);
        }
        if let Some(callback) = settled_callback {
            callback();
        }
    }
}

impl Clone for AnimatedValue {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

fn lerp(start: f32, stop: f32, fraction: f32) -> f32 {
    start + (stop - start) * fraction
}

#[cfg(test)]
#[path = "tests/animated_value_tests.rs"]
mod animated_value_tests;
