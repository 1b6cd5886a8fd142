use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::{Rc, Weak};
use std::sync::Arc;

use smallvec::SmallVec;

use crate::frame_clock::FrameClock;
use crate::platform::FrameScheduler;

pub type FrameCallbackId = u64;

struct FrameCallbackEntry {
    id: FrameCallbackId,
    callback: Option<Box<dyn FnOnce(u64) + 'static>>,
}

struct SchedulerInner {
    platform: Arc<dyn FrameScheduler>,
    needs_frame: Cell<bool>,
    frame_callbacks: RefCell<VecDeque<FrameCallbackEntry>>,
    next_frame_callback_id: Cell<u64>,
}

impl SchedulerInner {
    fn new(platform: Arc<dyn FrameScheduler>) -> Self {
        Self {
            platform,
            needs_frame: Cell::new(false),
            frame_callbacks: RefCell::new(VecDeque::new()),
            next_frame_callback_id: Cell::new(1),
        }
    }

    fn schedule(&self) {
        self.needs_frame.set(true);
        self.platform.schedule_frame();
    }

    fn register_frame_callback(&self, callback: Box<dyn FnOnce(u64) + 'static>) -> FrameCallbackId {
        let id = self.next_frame_callback_id.get();
        self.next_frame_callback_id.set(id + 1);
        self.frame_callbacks
            .borrow_mut()
            .push_back(FrameCallbackEntry {
                id,
                callback: Some(callback),
            });
        self.schedule();
        id
    }

    fn cancel_frame_callback(&self, id: FrameCallbackId) {
        let mut callbacks = self.frame_callbacks.borrow_mut();
        if let Some(index) = callbacks.iter().position(|entry| entry.id == id) {
            callbacks.remove(index);
        }
        if callbacks.is_empty() {
            self.needs_frame.set(false);
        }
    }

    fn has_frame_callbacks(&self) -> bool {
        !self.frame_callbacks.borrow().is_empty()
    }

    /// Runs every callback registered before this drain with the frame time.
    ///
    /// Entries are taken out of the queue before any callback runs, so a
    /// callback that registers a successor (the usual animation step) sees it
    /// executed on the next drain, not this one.
    fn drain_frame_callbacks(&self, frame_time_nanos: u64) {
        let mut callbacks = self.frame_callbacks.borrow_mut();
        let mut pending: SmallVec<[Box<dyn FnOnce(u64) + 'static>; 4]> =
            SmallVec::with_capacity(callbacks.len());
        while let Some(mut entry) = callbacks.pop_front() {
            if let Some(callback) = entry.callback.take() {
                pending.push(callback);
            }
        }
        drop(callbacks);
        if !pending.is_empty() {
            log::trace!(
                "frame {}: running {} callback(s)",
                frame_time_nanos,
                pending.len()
            );
        }
        for callback in pending {
            callback(frame_time_nanos);
        }
        if !self.has_frame_callbacks() {
            self.needs_frame.set(false);
        }
    }
}

/// Single-threaded frame-callback owner.
///
/// The host keeps the `Scheduler` alive and pumps it; animated values hold a
/// [`SchedulerHandle`] and register one-shot callbacks through it.
#[derive(Clone)]
pub struct Scheduler {
    inner: Rc<SchedulerInner>,
}

impl Scheduler {
    pub fn new(platform: Arc<dyn FrameScheduler>) -> Self {
        Self {
            inner: Rc::new(SchedulerInner::new(platform)),
        }
    }

    pub fn handle(&self) -> SchedulerHandle {
        SchedulerHandle {
            inner: Rc::downgrade(&self.inner),
        }
    }

    pub fn frame_clock(&self) -> FrameClock {
        FrameClock::new(self.handle())
    }

    pub fn register_frame_callback(&self, callback: impl FnOnce(u64) + 'static) -> FrameCallbackId {
        self.inner.register_frame_callback(Box::new(callback))
    }

    pub fn cancel_frame_callback(&self, id: FrameCallbackId) {
        self.inner.cancel_frame_callback(id);
    }

    pub fn drain_frame_callbacks(&self, frame_time_nanos: u64) {
        self.inner.drain_frame_callbacks(frame_time_nanos);
    }

    pub fn has_frame_callbacks(&self) -> bool {
        self.inner.has_frame_callbacks()
    }

    /// True while at least one frame of work is pending.
    pub fn needs_frame(&self) -> bool {
        self.inner.needs_frame.get()
    }

    pub fn set_needs_frame(&self, value: bool) {
        self.inner.needs_frame.set(value);
    }
}

/// Weak counterpart to [`Scheduler`].
///
/// Every operation is a no-op (or `None`) once the scheduler is gone, so
/// long-lived state can hold handles without keeping the host loop alive.
#[derive(Clone)]
pub struct SchedulerHandle {
    inner: Weak<SchedulerInner>,
}

impl SchedulerHandle {
    pub fn register_frame_callback(
        &self,
        callback: impl FnOnce(u64) + 'static,
    ) -> Option<FrameCallbackId> {
        self.inner
            .upgrade()
            .map(|inner| inner.register_frame_callback(Box::new(callback)))
    }

    pub fn cancel_frame_callback(&self, id: FrameCallbackId) {
        if let Some(inner) = self.inner.upgrade() {
            inner.cancel_frame_callback(id);
        }
    }

    pub fn drain_frame_callbacks(&self, frame_time_nanos: u64) {
        if let Some(inner) = self.inner.upgrade() {
            inner.drain_frame_callbacks(frame_time_nanos);
        }
    }

    pub fn has_frame_callbacks(&self) -> bool {
        self.inner
            .upgrade()
            .map(|inner| inner.has_frame_callbacks())
            .unwrap_or(false)
    }

    pub fn needs_frame(&self) -> bool {
        self.inner
            .upgrade()
            .map(|inner| inner.needs_frame.get())
            .unwrap_or(false)
    }

    pub fn frame_clock(&self) -> FrameClock {
        FrameClock::new(self.clone())
    }
}

#[cfg(test)]
#[path = "tests/scheduler_tests.rs"]
mod scheduler_tests;
