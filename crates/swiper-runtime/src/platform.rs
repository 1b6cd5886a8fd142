//! Host abstraction for frame scheduling.
//!
//! The scheduler delegates "please produce a frame soon" to the host so the
//! kernel can run under any loop shape (event-driven redraw, fixed tick,
//! test pump) without depending on a platform API.

/// Requests frame processing from the host.
///
/// Called whenever work becomes pending (a frame callback was registered).
/// Implementations must be safe to invoke from any thread.
pub trait FrameScheduler: Send + Sync {
    /// Request that the host schedule a new frame.
    fn schedule_frame(&self);
}

/// No-op scheduler for hosts that pump frames unconditionally.
#[derive(Default)]
pub struct DefaultScheduler;

impl FrameScheduler for DefaultScheduler {
    fn schedule_frame(&self) {}
}
