use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

use swiper_animation::{AnimatedValue, MotionSpec};
use swiper_runtime::scheduler::SchedulerHandle;
use swiper_runtime::subscriptions::{SubscriptionId, Subscriptions};

use crate::constants::{DEFAULT_ANIM_DURATION_MILLIS, DEFAULT_DISMISS_THRESHOLD};
use crate::direction::Direction;

static NEXT_SWIPER_STATE_ID: AtomicU64 = AtomicU64::new(1);

/// Gesture configuration, reapplied by the host rather than persisted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SwiperConfig {
    /// Edge a dismissal leaves toward.
    pub direction: Direction,
    /// Fraction of `bound_extent` a drag must pass before release dismisses.
    /// Values above 1.0 make dismissal unreachable by drag.
    pub dismiss_threshold: f32,
    /// Programmatic-dismiss tween duration in milliseconds.
    pub anim_duration_millis: u64,
    /// Maximum offset magnitude; 0.0 until the host has measured.
    pub bound_extent: f32,
}

impl Default for SwiperConfig {
    fn default() -> Self {
        Self {
            direction: Direction::default(),
            dismiss_threshold: DEFAULT_DISMISS_THRESHOLD,
            anim_duration_millis: DEFAULT_ANIM_DURATION_MILLIS,
            bound_extent: 0.0,
        }
    }
}

/// Lifecycle callbacks reported by the state machine.
///
/// All callbacks run synchronously inside the state machine step that
/// produced them; a callback may call back into the state, which queues the
/// request behind the current step.
#[derive(Clone, Default)]
pub struct SwiperCallbacks {
    on_start: Option<Rc<dyn Fn()>>,
    on_dismiss: Option<Rc<dyn Fn()>>,
    on_end: Option<Rc<dyn Fn()>>,
}

impl SwiperCallbacks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fired when a drag begins.
    #[must_use]
    pub fn on_start(mut self, callback: impl Fn() + 'static) -> Self {
        self.on_start = Some(Rc::new(callback));
        self
    }

    /// Fired when a gesture or programmatic request dismisses the card.
    #[must_use]
    pub fn on_dismiss(mut self, callback: impl Fn() + 'static) -> Self {
        self.on_dismiss = Some(Rc::new(callback));
        self
    }

    /// Fired when the offset starts animating back to rest.
    #[must_use]
    pub fn on_end(mut self, callback: impl Fn() + 'static) -> Self {
        self.on_end = Some(Rc::new(callback));
        self
    }
}

/// Where the machine currently is in a gesture cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwipePhase {
    /// Offset settled at rest, nothing in flight.
    Idle,
    /// Following the pointer via synchronous snaps.
    Dragging,
    /// Animating toward a dismissal edge, `dismissed` is true.
    Dismissing,
    /// Animating back to rest.
    Restoring,
}

enum Command {
    DragStart,
    DragDelta(f32),
    DragEnd(f32),
    DismissNow,
}

/// Swipe-to-dismiss state machine for one card.
///
/// Owns a bounded [`AnimatedValue`] offset and interprets the host's drag
/// protocol: deltas snap the offset, release runs the fling decision, and
/// the dismiss/restore chains animate the offset while firing callbacks.
/// Clones share the same state; create one per swipeable item, keyed by
/// stable item identity.
#[derive(Clone)]
pub struct SwiperState {
    inner: Rc<SwiperStateInner>,
}

struct SwiperStateInner {
    id: u64,
    offset: AnimatedValue,
    dismissed: Cell<bool>,
    phase: Cell<SwipePhase>,
    direction: Cell<Direction>,
    dismiss_threshold: Cell<f32>,
    anim_duration_millis: Cell<u64>,
    bound_extent: Cell<f32>,
    callbacks: SwiperCallbacks,
    watchers: Subscriptions<()>,
    commands: RefCell<VecDeque<Command>>,
    draining: Cell<bool>,
}

impl SwiperState {
    /// Creates a state at rest with offset 0.
    pub fn new(
        scheduler: SchedulerHandle,
        config: SwiperConfig,
        callbacks: SwiperCallbacks,
    ) -> Self {
        Self::with_initial_offset(scheduler, config, callbacks, 0.0)
    }

    /// Deserializing constructor: restores an offset produced by
    /// [`SwiperState::save`]. Non-finite input falls back to the neutral 0.
    pub fn with_initial_offset(
        scheduler: SchedulerHandle,
        config: SwiperConfig,
        callbacks: SwiperCallbacks,
        initial_offset: f32,
    ) -> Self {
        let id = NEXT_SWIPER_STATE_ID.fetch_add(1, Ordering::Relaxed);
        let initial = if initial_offset.is_finite() {
            initial_offset
        } else {
            0.0
        };
        let inner = Rc::new(SwiperStateInner {
            id,
            offset: AnimatedValue::new(initial, scheduler),
            dismissed: Cell::new(false),
            phase: Cell::new(SwipePhase::Idle),
            direction: Cell::new(config.direction),
            dismiss_threshold: Cell::new(sanitize_threshold(config.dismiss_threshold)),
            anim_duration_millis: Cell::new(config.anim_duration_millis),
            bound_extent: Cell::new(0.0),
            callbacks,
            watchers: Subscriptions::new(),
            commands: RefCell::new(VecDeque::new()),
            draining: Cell::new(false),
        });
        if config.bound_extent > 0.0 && config.bound_extent.is_finite() {
            inner.apply_bound_extent(config.bound_extent);
        }

        // Offset changes surface through the same watcher hook as the
        // machine's own flag changes.
        let weak = Rc::downgrade(&inner);
        inner.offset.subscribe(move |_| {
            if let Some(inner) = weak.upgrade() {
                inner.watchers.emit(());
            }
        });
        Self { inner }
    }

    pub fn id(&self) -> u64 {
        self.inner.id
    }

    // ───────────────────────── observable state ─────────────────────────

    /// Current offset along the drag axis.
    pub fn offset(&self) -> f32 {
        self.inner.offset.value()
    }

    /// Offset velocity in units per second, observable mid-animation.
    pub fn velocity(&self) -> f32 {
        self.inner.offset.velocity()
    }

    /// Where the offset is headed: the in-flight animation target, or the
    /// current value at rest. Inside `on_dismiss` this reads the edge the
    /// card is leaving toward.
    pub fn target(&self) -> f32 {
        self.inner.offset.target()
    }

    /// True from the start of a dismissal until the following restore
    /// settles; hosts should disable interaction while set.
    pub fn is_dismissed(&self) -> bool {
        self.inner.dismissed.get()
    }

    pub fn phase(&self) -> SwipePhase {
        self.inner.phase.get()
    }

    pub fn is_animating(&self) -> bool {
        self.inner.offset.is_animating()
    }

    /// Travelled fraction of the live bound extent, in `[0, 1]`.
    /// 0.0 while the extent is unset (avoids the divide by zero).
    pub fn progress(&self) -> f32 {
        self.inner.progress()
    }

    /// The persistable scalar: everything else is reapplied by the host.
    pub fn save(&self) -> f32 {
        self.inner.offset.value()
    }

    // ───────────────────────── configuration ─────────────────────────

    pub fn direction(&self) -> Direction {
        self.inner.direction.get()
    }

    pub fn set_direction(&self, direction: Direction) {
        self.inner.direction.set(direction);
    }

    pub fn dismiss_threshold(&self) -> f32 {
        self.inner.dismiss_threshold.get()
    }

    /// Takes effect on the next release evaluation. NaN is ignored,
    /// negatives clamp to 0; values above 1.0 are legal and simply make
    /// dismissal unreachable by drag.
    pub fn set_dismiss_threshold(&self, threshold: f32) {
        if threshold.is_nan() {
            return;
        }
        self.inner.dismiss_threshold.set(sanitize_threshold(threshold));
    }

    pub fn anim_duration_millis(&self) -> u64 {
        self.inner.anim_duration_millis.get()
    }

    pub fn set_anim_duration_millis(&self, millis: u64) {
        self.inner.anim_duration_millis.set(millis);
    }

    pub fn bound_extent(&self) -> f32 {
        self.inner.bound_extent.get()
    }

    /// Re-bounds the offset to `[-extent, +extent]` immediately, clamping
    /// the current value (and any in-flight animation frames) against the
    /// new range. Negative input is treated as its magnitude; non-finite
    /// input is ignored.
    pub fn set_bound_extent(&self, extent: f32) {
        if !extent.is_finite() {
            return;
        }
        self.inner.apply_bound_extent(extent.abs());
    }

    pub fn config(&self) -> SwiperConfig {
        SwiperConfig {
            direction: self.inner.direction.get(),
            dismiss_threshold: self.inner.dismiss_threshold.get(),
            anim_duration_millis: self.inner.anim_duration_millis.get(),
            bound_extent: self.inner.bound_extent.get(),
        }
    }

    // ───────────────────────── change watching ─────────────────────────

    /// Registers a hook fired after any observable change: offset movement,
    /// `dismissed` flips, phase transitions.
    pub fn subscribe(&self, callback: impl Fn() + 'static) -> SubscriptionId {
        self.inner.watchers.subscribe(move |_| callback())
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.inner.watchers.unsubscribe(id)
    }

    // ───────────────────────── gesture protocol ─────────────────────────

    /// Host reports a drag gesture beginning. Fires `on_start`.
    pub fn on_drag_start(&self) {
        self.inner.submit(Command::DragStart);
    }

    /// Host reports pointer movement; the offset snaps by `delta`, clamped
    /// to the bound extent. Ignored while `dismissed` is set.
    pub fn on_drag_delta(&self, delta: f32) {
        self.inner.submit(Command::DragDelta(delta));
    }

    /// Host reports release with the tracked velocity; runs the fling
    /// decision and starts the dismiss or restore chain.
    pub fn on_drag_end(&self, velocity: f32) {
        self.inner.submit(Command::DragEnd(velocity));
    }

    /// Programmatic "click to dismiss": tween toward the configured
    /// direction's edge regardless of the current offset sign.
    pub fn dismiss_it(&self) {
        self.inner.submit(Command::DismissNow);
    }
}

impl SwiperStateInner {
    /// Applies `command`, or queues it when a step is already running so a
    /// reentrant call from a callback lands behind the current operation.
    fn submit(self: &Rc<Self>, command: Command) {
        self.commands.borrow_mut().push_back(command);
        if self.draining.replace(true) {
            return;
        }
        loop {
            let next = self.commands.borrow_mut().pop_front();
            match next {
                Some(command) => self.apply(command),
                None => break,
            }
        }
        self.draining.set(false);
    }

    fn apply(self: &Rc<Self>, command: Command) {
        match command {
            Command::DragStart => self.drag_start(),
            Command::DragDelta(delta) => self.drag_delta(delta),
            Command::DragEnd(velocity) => self.drag_end(velocity),
            Command::DismissNow => self.dismiss_now(),
        }
    }

    fn drag_start(self: &Rc<Self>) {
        if self.dismissed.get() {
            return;
        }
        self.set_phase(SwipePhase::Dragging);
        self.invoke(&self.callbacks.on_start);
    }

    fn drag_delta(self: &Rc<Self>, delta: f32) {
        if self.dismissed.get() {
            return;
        }
        self.set_phase(SwipePhase::Dragging);
        // NaN deltas fall out here: the controller keeps the current value.
        self.offset.snap_to(self.offset.value() + delta);
    }

    fn drag_end(self: &Rc<Self>, velocity: f32) {
        if self.dismissed.get() {
            return;
        }
        let velocity = if velocity.is_finite() { velocity } else { 0.0 };
        let offset = self.offset.value();
        let progress = self.progress();
        let dismisses =
            progress > self.dismiss_threshold.get() && self.direction.get().matches_offset(offset);
        log::trace!(
            "swiper#{}: release at offset {:.1} (progress {:.2}, velocity {:.0}) -> {}",
            self.id,
            offset,
            progress,
            velocity,
            if dismisses { "dismiss" } else { "restore" }
        );
        if dismisses {
            self.dismiss(velocity);
        } else {
            self.restore();
        }
    }

    /// Fling dismissal: edge target keeps the sign the card travelled,
    /// motion starts with the release velocity. Fire-and-continue: the
    /// restore is triggered in the same step and takes over the offset,
    /// inheriting the outward velocity.
    fn dismiss(self: &Rc<Self>, velocity: f32) {
        log::debug!("swiper#{}: dismissing with velocity {:.0}", self.id, velocity);
        self.set_dismissed(true);
        self.set_phase(SwipePhase::Dismissing);
        let target = self.bound_extent.get().copysign(self.offset.value());
        self.offset
            .animate_to_with(target, Some(velocity), MotionSpec::spring(), None);
        self.invoke(&self.callbacks.on_dismiss);
        self.restore();
    }

    fn dismiss_now(self: &Rc<Self>) {
        log::debug!("swiper#{}: programmatic dismissal", self.id);
        self.set_dismissed(true);
        self.set_phase(SwipePhase::Dismissing);
        let target = self.direction.get().dismiss_target(self.bound_extent.get());
        self.offset.animate_to_with(
            target,
            Some(0.0),
            MotionSpec::tween(self.anim_duration_millis.get()),
            None,
        );
        self.invoke(&self.callbacks.on_dismiss);
        self.restore();
    }

    /// Fires `on_end` and animates the offset back to rest; `dismissed`
    /// clears only once that animation settles, so there is no window where
    /// the card reads as interactive while still off-neutral.
    fn restore(self: &Rc<Self>) {
        self.set_phase(SwipePhase::Restoring);
        self.invoke(&self.callbacks.on_end);
        let weak = Rc::downgrade(self);
        self.offset.animate_to_with(
            0.0,
            None,
            MotionSpec::spring(),
            Some(Box::new(move || {
                if let Some(inner) = weak.upgrade() {
                    log::trace!("swiper#{}: restore settled", inner.id);
                    inner.set_dismissed(false);
                    // A drag may have re-grabbed the card while the restore
                    // was in flight; don't stomp its phase.
                    if inner.phase.get() == SwipePhase::Restoring {
                        inner.set_phase(SwipePhase::Idle);
                    }
                }
            })),
        );
    }

    fn progress(&self) -> f32 {
        let extent = self.bound_extent.get();
        if extent <= 0.0 {
            return 0.0;
        }
        (self.offset.value().abs() / extent).clamp(0.0, 1.0)
    }

    fn apply_bound_extent(&self, extent: f32) {
        self.bound_extent.set(extent);
        self.offset.set_bounds(-extent, extent);
    }

    fn set_phase(&self, phase: SwipePhase) {
        if self.phase.replace(phase) != phase {
            self.watchers.emit(());
        }
    }

    fn set_dismissed(&self, dismissed: bool) {
        if self.dismissed.replace(dismissed) != dismissed {
            self.watchers.emit(());
        }
    }

    fn invoke(&self, callback: &Option<Rc<dyn Fn()>>) {
        if let Some(callback) = callback {
            callback();
        }
    }
}

fn sanitize_threshold(threshold: f32) -> f32 {
    if threshold.is_nan() {
        DEFAULT_DISMISS_THRESHOLD
    } else {
        threshold.max(0.0)
    }
}

#[cfg(test)]
#[path = "tests/state_tests.rs"]
mod state_tests;
