use crate::easing::Easing;

/// Fixed-duration eased interpolation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TweenSpec {
    /// Duration in milliseconds.
    pub duration_millis: u64,
    /// Easing function to apply.
    pub easing: Easing,
}

impl TweenSpec {
    pub fn new(duration_millis: u64, easing: Easing) -> Self {
        Self {
            duration_millis,
            easing,
        }
    }

    pub fn linear(duration_millis: u64) -> Self {
        Self::new(duration_millis, Easing::Linear)
    }
}

impl Default for TweenSpec {
    fn default() -> Self {
        Self::new(300, Easing::FastOutSlowIn)
    }
}

/// Spring animation configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpringSpec {
    /// 1.0 = critically damped, < 1.0 = under-damped (bouncy), > 1.0 = over-damped.
    pub damping_ratio: f32,
    /// Higher values settle faster.
    pub stiffness: f32,
    /// Velocity magnitude below which the spring may stop.
    pub velocity_threshold: f32,
    /// Displacement magnitude below which the spring may stop.
    pub position_threshold: f32,
}

impl SpringSpec {
    /// Material-design default: critically damped, medium stiffness.
    pub fn default_spring() -> Self {
        Self {
            damping_ratio: 1.0,
            stiffness: 1500.0,
            velocity_threshold: 0.01,
            position_threshold: 0.001,
        }
    }

    pub fn bouncy() -> Self {
        Self {
            damping_ratio: 0.5,
            ..Self::default_spring()
        }
    }

    pub fn stiff() -> Self {
        Self {
            stiffness: 3000.0,
            ..Self::default_spring()
        }
    }
}

impl Default for SpringSpec {
    fn default() -> Self {
        Self::default_spring()
    }
}

/// How an animated value should travel to its target.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MotionSpec {
    /// Time-based tween.
    Tween(TweenSpec),
    /// Physics-based spring.
    Spring(SpringSpec),
}

impl MotionSpec {
    /// Tween over `duration_millis` with the standard curve.
    pub fn tween(duration_millis: u64) -> Self {
        MotionSpec::Tween(TweenSpec::new(duration_millis, Easing::FastOutSlowIn))
    }

    pub fn spring() -> Self {
        MotionSpec::Spring(SpringSpec::default_spring())
    }
}

/// The default motion is the default spring, matching what a bare
/// `animate_to` call on an animated value should feel like.
impl Default for MotionSpec {
    fn default() -> Self {
        MotionSpec::spring()
    }
}
