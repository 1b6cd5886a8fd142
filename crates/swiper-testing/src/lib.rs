//! Headless test harness for the swiper crates.
//!
//! Production hosts pump [`swiper_runtime::Scheduler::drain_frame_callbacks`]
//! from a real event loop; tests want the same machinery without a clock.
//! This crate provides:
//! - [`FrameDriver`]: a deterministic 60fps frame pump
//! - [`CallbackRecorder`]: captures lifecycle callbacks for order assertions
//! - [`SwipeRobot`]: gesture-level driving of a [`swiper::SwiperState`]
//!
//! # Example
//!
//! ```
//! use swiper::{Direction, SwiperConfig};
//! use swiper_testing::{CallbackEvent, CallbackRecorder, SwipeRobot};
//!
//! let recorder = CallbackRecorder::new();
//! let config = SwiperConfig {
//!     direction: Direction::Up,
//!     bound_extent: 600.0,
//!     ..SwiperConfig::default()
//! };
//! let mut robot = SwipeRobot::new(config, recorder.callbacks());
//!
//! robot.fling(-400.0, -1000.0);
//! robot.settle();
//!
//! assert_eq!(recorder.count(CallbackEvent::Dismiss), 1);
//! assert_eq!(robot.state().offset(), 0.0);
//! ```

pub mod driver;
pub mod recorder;
pub mod robot;

pub use driver::{FrameDriver, FRAME_NANOS};
pub use recorder::{CallbackEvent, CallbackRecorder};
pub use robot::SwipeRobot;
