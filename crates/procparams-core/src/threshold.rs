//! Piecewise-linear threshold curves.
//!
//! A threshold curve turns two or four control points into a ramp between
//! 0 and a caller-chosen maximum. It is used throughout the parameter model
//! wherever a tool needs a soft mask: sharpening thresholds, skin-tone hue
//! ranges, wavelet level limits, color-toning saturation ranges.
//!
//! # Point naming
//!
//! Points are named after the output level they anchor, not their x order:
//! a `bottom_*` point is where the ramp reaches 0 and a `top_*` point is where
//! it reaches the maximum.
//!
//! - `start_at_one == false`: 0 up to `bottom_left`, rising to max at
//!   `top_left`, max until `top_right`, falling to 0 at `bottom_right`.
//! - `start_at_one == true`: max up to `top_left`, falling to 0 at
//!   `bottom_left`, 0 until `bottom_right`, rising to max at `top_right`.
//!
//! Single-sided curves only have the left pair.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Tolerance used when comparing floating-point control points.
pub const FLOAT_POINT_TOLERANCE: f64 = 1e-10;

/// Numeric domain a threshold curve can be defined over.
///
/// Integers compare exactly; floating-point values compare within
/// [`FLOAT_POINT_TOLERANCE`].
pub trait CurveScalar:
    Copy + PartialEq + fmt::Debug + fmt::Display + FromStr + Into<f64>
{
    /// Equality used by [`ThresholdCurve`]'s `PartialEq`.
    fn approx_eq(self, other: Self) -> bool;
}

impl CurveScalar for i32 {
    #[inline]
    fn approx_eq(self, other: Self) -> bool {
        self == other
    }
}

impl CurveScalar for f64 {
    #[inline]
    fn approx_eq(self, other: Self) -> bool {
        (self - other).abs() < FLOAT_POINT_TOLERANCE
    }
}

/// A 2- or 4-point ramp evaluated against a maximum output value.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ThresholdCurve<T> {
    bottom_left: T,
    top_left: T,
    bottom_right: T,
    top_right: T,
    start_at_one: bool,
    double_sided: bool,
}

impl<T: CurveScalar + Default> ThresholdCurve<T> {
    /// Create a single-sided curve. The right pair is zero-width and ignored.
    pub fn single(bottom: T, top: T, start_at_one: bool) -> Self {
        Self {
            bottom_left: bottom,
            top_left: top,
            bottom_right: T::default(),
            top_right: T::default(),
            start_at_one,
            double_sided: false,
        }
    }
}

impl<T: CurveScalar> ThresholdCurve<T> {
    /// Create a double-sided curve.
    pub fn double(
        bottom_left: T,
        top_left: T,
        bottom_right: T,
        top_right: T,
        start_at_one: bool,
    ) -> Self {
        Self {
            bottom_left,
            top_left,
            bottom_right,
            top_right,
            start_at_one,
            double_sided: true,
        }
    }

    pub fn bottom_left(&self) -> T {
        self.bottom_left
    }

    pub fn top_left(&self) -> T {
        self.top_left
    }

    pub fn bottom_right(&self) -> T {
        self.bottom_right
    }

    pub fn top_right(&self) -> T {
        self.top_right
    }

    /// Whether the right pair of points is meaningful.
    pub fn is_double_sided(&self) -> bool {
        self.double_sided
    }

    /// Whether the curve starts at the maximum on the far left.
    pub fn starts_at_one(&self) -> bool {
        self.start_at_one
    }

    /// Number of active control points (2 or 4).
    pub fn point_count(&self) -> usize {
        if self.double_sided {
            4
        } else {
            2
        }
    }

    /// Active control points in left-to-right storage order.
    pub fn to_control_points(&self) -> Vec<T> {
        if self.double_sided {
            vec![
                self.bottom_left,
                self.top_left,
                self.bottom_right,
                self.top_right,
            ]
        } else {
            vec![self.bottom_left, self.top_left]
        }
    }

    /// Replace every active point at once.
    ///
    /// Returns `false` and leaves the curve untouched when `points` does not
    /// hold exactly [`point_count`](Self::point_count) values.
    pub fn set_control_points(&mut self, points: &[T]) -> bool {
        match (self.double_sided, points) {
            (false, &[bottom, top]) => {
                self.bottom_left = bottom;
                self.top_left = top;
                true
            }
            (true, &[bottom_left, top_left, bottom_right, top_right]) => {
                self.bottom_left = bottom_left;
                self.top_left = top_left;
                self.bottom_right = bottom_right;
                self.top_right = top_right;
                true
            }
            _ => false,
        }
    }

    /// Evaluate the ramp at `x`, scaled to `[0, y_max]`.
    ///
    /// Interpolation is done in `f64` whatever `T` is. When the right pair is
    /// zero-width and `x` sits exactly on it, the curve returns the level it
    /// holds between the two bands (`y_max`, or 0 when starting at one), so a
    /// caller can keep that level past the nominal right bound.
    ///
    /// A zero-width left band never divides by zero: the flat branches cover
    /// every `x` it could produce. Callers must not expect interpolation from
    /// such a band.
    pub fn evaluate(&self, x: impl Into<f64>, y_max: f64) -> f64 {
        let x = x.into();
        let bottom_left: f64 = self.bottom_left.into();
        let top_left: f64 = self.top_left.into();
        let bottom_right: f64 = self.bottom_right.into();
        let top_right: f64 = self.top_right.into();

        if self.start_at_one {
            if self.double_sided {
                if x == bottom_right && bottom_right == top_right {
                    return 0.0;
                }
                if x >= top_right {
                    return y_max;
                }
                if x > bottom_right {
                    return y_max * ((x - bottom_right) / (top_right - bottom_right));
                }
            }
            if x >= bottom_left {
                return 0.0;
            }
            if x > top_left {
                return y_max * ((bottom_left - x) / (bottom_left - top_left));
            }
            y_max
        } else {
            if self.double_sided {
                if x == bottom_right && bottom_right == top_right {
                    return y_max;
                }
                if x >= bottom_right {
                    return 0.0;
                }
                if x > top_right {
                    return y_max * ((bottom_right - x) / (bottom_right - top_right));
                }
            }
            if x >= top_left {
                return y_max;
            }
            if x > bottom_left {
                return y_max * ((x - bottom_left) / (top_left - bottom_left));
            }
            0.0
        }
    }
}

impl<T: CurveScalar> PartialEq for ThresholdCurve<T> {
    /// Compares the active points only.
    fn eq(&self, other: &Self) -> bool {
        let left = self.bottom_left.approx_eq(other.bottom_left)
            && self.top_left.approx_eq(other.top_left);
        if !self.double_sided {
            return left;
        }
        left && self.bottom_right.approx_eq(other.bottom_right)
            && self.top_right.approx_eq(other.top_right)
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    /// Four ascending x positions.
    fn ordered_points() -> impl Strategy<Value = (f64, f64, f64, f64)> {
        prop::collection::vec(-1000.0f64..1000.0, 4).prop_map(|mut v| {
            v.sort_by(|a, b| a.total_cmp(b));
            (v[0], v[1], v[2], v[3])
        })
    }

    proptest! {
        #[test]
        fn prop_output_within_range(
            (a, b, c, d) in ordered_points(),
            start_at_one in any::<bool>(),
            double_sided in any::<bool>(),
            x in -2000.0f64..2000.0,
            y_max in 0.0f64..65535.0,
        ) {
            let curve = match (double_sided, start_at_one) {
                (false, false) => ThresholdCurve::single(a, b, false),
                (false, true) => ThresholdCurve::single(b, a, true),
                (true, false) => ThresholdCurve::double(a, b, d, c, false),
                (true, true) => ThresholdCurve::double(b, a, c, d, true),
            };
            let value = curve.evaluate(x, y_max);
            prop_assert!(value >= 0.0 && value <= y_max, "value {} outside [0, {}]", value, y_max);
        }

        #[test]
        fn prop_left_band_monotone(
            (a, b, _, _) in ordered_points(),
            start_at_one in any::<bool>(),
            xs in prop::collection::vec(-1500.0f64..1500.0, 2..32),
        ) {
            let curve = if start_at_one {
                ThresholdCurve::single(b, a, true)
            } else {
                ThresholdCurve::single(a, b, false)
            };
            let mut xs = xs;
            xs.sort_by(|p, q| p.total_cmp(q));
            let values: Vec<f64> = xs.iter().map(|&x| curve.evaluate(x, 1.0)).collect();
            for pair in values.windows(2) {
                if start_at_one {
                    prop_assert!(pair[1] <= pair[0] + 1e-12);
                } else {
                    prop_assert!(pair[1] + 1e-12 >= pair[0]);
                }
            }
        }

        #[test]
        fn prop_right_band_monotone(
            (a, b, c, d) in ordered_points(),
            start_at_one in any::<bool>(),
            ts in prop::collection::vec(0.0f64..=1.0, 2..32),
        ) {
            // Right band spans [c, d]: rising when the curve starts at one, falling otherwise.
            let curve = if start_at_one {
                ThresholdCurve::double(b, a, c, d, true)
            } else {
                ThresholdCurve::double(a, b, d, c, false)
            };
            let mut ts = ts;
            ts.sort_by(|p, q| p.total_cmp(q));
            let values: Vec<f64> = ts
                .iter()
                .map(|&t| curve.evaluate(c + t * (d - c), 1.0))
                .collect();
            for pair in values.windows(2) {
                if start_at_one {
                    prop_assert!(pair[1] + 1e-12 >= pair[0], "{:?} not rising", pair);
                } else {
                    prop_assert!(pair[1] <= pair[0] + 1e-12, "{:?} not falling", pair);
                }
            }
        }

        #[test]
        fn prop_zero_width_right_band(
            left in -100i32..100,
            width in 0i32..100,
            v in 200i32..1000,
            start_at_one in any::<bool>(),
        ) {
            let curve = if start_at_one {
                ThresholdCurve::double(left + width, left, v, v, true)
            } else {
                ThresholdCurve::double(left, left + width, v, v, false)
            };
            let expected = if start_at_one { 0.0 } else { 7.0 };
            prop_assert_eq!(curve.evaluate(v, 7.0), expected);
        }

        #[test]
        fn prop_float_equality_matches_tolerance(
            base in prop::collection::vec(-1e6f64..1e6, 4),
            delta in -1e-9f64..1e-9,
            index in 0usize..4,
        ) {
            let a = ThresholdCurve::double(base[0], base[1], base[2], base[3], false);
            let mut shifted = base.clone();
            shifted[index] += delta;
            let b = ThresholdCurve::double(shifted[0], shifted[1], shifted[2], shifted[3], false);
            let diff = (shifted[index] - base[index]).abs();
            prop_assert_eq!(a == b, diff < FLOAT_POINT_TOLERANCE);
        }
    }
}
