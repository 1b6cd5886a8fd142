//! Lifecycle callback capture.

use std::cell::RefCell;
use std::rc::Rc;

use swiper::SwiperCallbacks;

/// One observed callback invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallbackEvent {
    Start,
    Dismiss,
    End,
}

/// Records every lifecycle callback in invocation order, so tests can assert
/// both counts and ordering (`Dismiss` strictly before its `End`). Clones
/// share the same log.
#[derive(Clone, Default)]
pub struct CallbackRecorder {
    events: Rc<RefCell<Vec<CallbackEvent>>>,
}

impl CallbackRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds callbacks that append each invocation to this recorder.
    pub fn callbacks(&self) -> SwiperCallbacks {
        let start = self.events.clone();
        let dismiss = self.events.clone();
        let end = self.events.clone();
        SwiperCallbacks::new()
            .on_start(move || start.borrow_mut().push(CallbackEvent::Start))
            .on_dismiss(move || dismiss.borrow_mut().push(CallbackEvent::Dismiss))
            .on_end(move || end.borrow_mut().push(CallbackEvent::End))
    }

    /// Snapshot of everything recorded so far.
    pub fn events(&self) -> Vec<CallbackEvent> {
        self.events.borrow().clone()
    }

    pub fn count(&self, event: CallbackEvent) -> usize {
        self.events.borrow().iter().filter(|e| **e == event).count()
    }

    pub fn clear(&self) {
        self.events.borrow_mut().clear();
    }
}
