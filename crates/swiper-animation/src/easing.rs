/// Easing curves for tween animations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Easing {
    /// No easing, constant rate.
    Linear,
    /// Starts slow, accelerates.
    EaseIn,
    /// Starts fast, decelerates.
    EaseOut,
    /// Slow at both ends.
    EaseInOut,
    /// Material-design standard curve, the tween default.
    FastOutSlowIn,
}

impl Easing {
    /// Apply the easing function to a linear fraction in `[0, 1]`.
    pub fn transform(&self, fraction: f32) -> f32 {
        match self {
            Easing::Linear => fraction.clamp(0.0, 1.0),
            Easing::EaseIn => cubic_bezier(0.42, 0.0, 1.0, 1.0, fraction),
            Easing::EaseOut => cubic_bezier(0.0, 0.0, 0.58, 1.0, fraction),
            Easing::EaseInOut => cubic_bezier(0.42, 0.0, 0.58, 1.0, fraction),
            Easing::FastOutSlowIn => cubic_bezier(0.4, 0.0, 0.2, 1.0, fraction),
        }
    }
}

/// Cubic bezier curve evaluation for easing.
fn cubic_bezier(x1: f32, y1: f32, x2: f32, y2: f32, fraction: f32) -> f32 {
    if fraction <= 0.0 {
        return 0.0;
    }
    if fraction >= 1.0 {
        return 1.0;
    }

    let cx = 3.0 * x1;
    let bx = 3.0 * (x2 - x1) - cx;
    let ax = 1.0 - cx - bx;

    let cy = 3.0 * y1;
    let by = 3.0 * (y2 - y1) - cy;
    let ay = 1.0 - cy - by;

    fn sample_curve(a: f32, b: f32, c: f32, t: f32) -> f32 {
        ((a * t + b) * t + c) * t
    }

    fn sample_derivative(a: f32, b: f32, c: f32, t: f32) -> f32 {
        (3.0 * a * t + 2.0 * b) * t + c
    }

    // Newton-Raphson for the parametric `t` matching the x fraction, clamped
    // to [0, 1] to keep the solution in range.
    let mut t = fraction;
    let mut newton_success = false;
    for _ in 0..8 {
        let x = sample_curve(ax, bx, cx, t) - fraction;
        if x.abs() < 1e-6 {
            newton_success = true;
            break;
        }
        let dx = sample_derivative(ax, bx, cx, t);
        if dx.abs() < 1e-6 {
            break;
        }
        t = (t - x / dx).clamp(0.0, 1.0);
    }

    if !newton_success {
        // Binary subdivision fallback when Newton-Raphson stalls.
        let mut t0 = 0.0;
        let mut t1 = 1.0;
        t = fraction;
        for _ in 0..16 {
            let x = sample_curve(ax, bx, cx, t);
            let delta = x - fraction;
            if delta.abs() < 1e-6 {
                break;
            }
            if delta > 0.0 {
                t1 = t;
            } else {
                t0 = t;
            }
            t = 0.5 * (t0 + t1);
        }
    }

    sample_curve(ay, by, cy, t)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn linear_is_identity() {
        for fraction in [0.0, 0.25, 0.5, 0.75, 1.0] {
            assert_eq!(Easing::Linear.transform(fraction), fraction);
        }
    }

    #[test]
    fn all_curves_hit_endpoints() {
        let curves = [
            Easing::Linear,
            Easing::EaseIn,
            Easing::EaseOut,
            Easing::EaseInOut,
            Easing::FastOutSlowIn,
        ];
        for easing in curves {
            assert_eq!(easing.transform(0.0), 0.0);
            assert_eq!(easing.transform(1.0), 1.0);
            assert_eq!(easing.transform(-0.5), 0.0);
            assert_eq!(easing.transform(1.5), 1.0);
        }
    }

    #[test]
    fn curves_stay_in_unit_range_and_increase() {
        let curves = [Easing::EaseIn, Easing::EaseOut, Easing::FastOutSlowIn];
        for easing in curves {
            let mut previous = 0.0f32;
            for step in 1..=100 {
                let value = easing.transform(step as f32 / 100.0);
                assert!((0.0..=1.0).contains(&value), "{easing:?} left unit range");
                assert!(
                    value >= previous - 1e-4,
                    "{easing:?} decreased at step {step}"
                );
                previous = value;
            }
        }
    }

    #[test]
    fn ease_in_lags_ease_out_at_midpoint() {
        let ease_in = Easing::EaseIn.transform(0.5);
        let ease_out = Easing::EaseOut.transform(0.5);
        assert!(ease_in < 0.5);
        assert!(ease_out > 0.5);
    }
}
