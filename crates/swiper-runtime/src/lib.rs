#![doc = r"Frame-callback scheduling kernel shared by the swiper crates.

Animations never own a thread and never block: they register one-shot frame
callbacks against a [`Scheduler`] and the host pumps them by calling
[`Scheduler::drain_frame_callbacks`] with the current frame time. Everything
here is single-threaded (`Rc` ownership); hosts that drive frames from
another thread hand out a [`FrameScheduler`] to request wakeups."]

pub mod frame_clock;
pub mod platform;
pub mod scheduler;
pub mod subscriptions;

pub use frame_clock::{FrameCallbackRegistration, FrameClock};
pub use platform::{DefaultScheduler, FrameScheduler};
pub use scheduler::{FrameCallbackId, Scheduler, SchedulerHandle};
pub use subscriptions::{SubscriptionId, Subscriptions};
