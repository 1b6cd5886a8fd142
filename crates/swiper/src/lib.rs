#![doc = r"Swipe-to-dismiss gesture state machine.

A host delivers raw drag deltas and a release velocity; [`SwiperState`]
tracks the card's offset through a bounded animated value, decides on
release whether the gesture dismisses or restores, drives the resulting
animation, and reports lifecycle callbacks. Rendering, hit-testing and
event plumbing stay with the host."]

pub mod constants;
pub mod direction;
pub mod state;
pub mod velocity_tracker;

pub use direction::{Axis, Direction};
pub use state::{SwipePhase, SwiperCallbacks, SwiperConfig, SwiperState};
pub use velocity_tracker::VelocityTracker;
