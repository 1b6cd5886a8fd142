#![doc = r"Animation primitives for the swiper crates.

The centerpiece is [`AnimatedValue`], a bounded animatable scalar driven by
frame callbacks from `swiper-runtime`: it can snap synchronously, or run a
tween or spring toward a target, clamping every produced value to live
bounds and reporting changes through subscriptions."]

pub mod animated_value;
pub mod easing;
pub mod motion;

pub use animated_value::{AnimatedValue, OnSettled};
pub use easing::Easing;
pub use motion::{MotionSpec, SpringSpec, TweenSpec};
