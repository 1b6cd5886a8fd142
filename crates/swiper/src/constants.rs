//! Defaults shared by the swipe state machine and its hosts.
//!
//! All distances are in logical pixels. Hosts on very high-density screens
//! may want to scale the velocity cap by the device's DPI factor.

/// Fraction of the bound extent a drag must pass for a release to dismiss.
pub const DEFAULT_DISMISS_THRESHOLD: f32 = 0.5;

/// Duration of the programmatic dismissal tween, in milliseconds.
pub const DEFAULT_ANIM_DURATION_MILLIS: u64 = 500;

/// Movement in logical pixels before a press counts as a drag.
/// 8.0 matches Android's touch slop at baseline density.
pub const DRAG_THRESHOLD: f32 = 8.0;

/// Cap for release velocities, in logical pixels per second.
/// Hosts should clamp tracker output with this before calling `on_drag_end`.
pub const MAX_FLING_VELOCITY: f32 = 8_000.0;
