use crate::scheduler::{FrameCallbackId, SchedulerHandle};

/// Hands out one-shot frame callbacks tied to a scheduler.
#[derive(Clone)]
pub struct FrameClock {
    scheduler: SchedulerHandle,
}

impl FrameClock {
    pub fn new(scheduler: SchedulerHandle) -> Self {
        Self { scheduler }
    }

    pub fn scheduler_handle(&self) -> SchedulerHandle {
        self.scheduler.clone()
    }

    /// Registers `callback` to run on the next drained frame with the frame
    /// time in nanoseconds. Dropping the returned registration cancels it.
    pub fn with_frame_nanos(
        &self,
        callback: impl FnOnce(u64) + 'static,
    ) -> FrameCallbackRegistration {
        match self.scheduler.register_frame_callback(callback) {
            Some(id) => FrameCallbackRegistration::new(self.scheduler.clone(), id),
            None => FrameCallbackRegistration::inactive(self.scheduler.clone()),
        }
    }
}

/// Owns a pending frame callback; cancels it on drop.
pub struct FrameCallbackRegistration {
    scheduler: SchedulerHandle,
    id: Option<FrameCallbackId>,
}

impl FrameCallbackRegistration {
    fn new(scheduler: SchedulerHandle, id: FrameCallbackId) -> Self {
        Self {
            scheduler,
            id: Some(id),
        }
    }

    fn inactive(scheduler: SchedulerHandle) -> Self {
        Self {
            scheduler,
            id: None,
        }
    }

    /// False when the registration was created against a dead scheduler.
    pub fn is_active(&self) -> bool {
        self.id.is_some()
    }

    pub fn cancel(mut self) {
        if let Some(id) = self.id.take() {
            self.scheduler.cancel_frame_callback(id);
        }
    }
}

impl Drop for FrameCallbackRegistration {
    fn drop(&mut self) {
        if let Some(id) = self.id.take() {
            self.scheduler.cancel_frame_callback(id);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;
    use std::sync::Arc;

    use crate::platform::DefaultScheduler;
    use crate::scheduler::Scheduler;

    #[test]
    fn registration_drop_cancels_callback() {
        let scheduler = Scheduler::new(Arc::new(DefaultScheduler));
        let fired = Rc::new(Cell::new(false));

        let registration = {
            let fired = fired.clone();
            scheduler
                .frame_clock()
                .with_frame_nanos(move |_| fired.set(true))
        };
        drop(registration);

        scheduler.drain_frame_callbacks(0);
        assert!(!fired.get());
        assert!(!scheduler.has_frame_callbacks());
    }

    #[test]
    fn explicit_cancel_matches_drop() {
        let scheduler = Scheduler::new(Arc::new(DefaultScheduler));
        let fired = Rc::new(Cell::new(false));

        let registration = {
            let fired = fired.clone();
            scheduler
                .frame_clock()
                .with_frame_nanos(move |_| fired.set(true))
        };
        registration.cancel();

        scheduler.drain_frame_callbacks(0);
        assert!(!fired.get());
    }

    #[test]
    fn clock_survives_scheduler_drop() {
        let scheduler = Scheduler::new(Arc::new(DefaultScheduler));
        let clock = scheduler.frame_clock();
        drop(scheduler);

        // Registration against a dead scheduler is inert.
        let registration = clock.with_frame_nanos(|_| panic!("must not run"));
        drop(registration);
    }
}
