// Copyright 2025 the Kurbo Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Fixed-epsilon comparison of real values and points.
//!
//! Every "is this zero" or "are these the same" question in the crate goes
//! through these helpers instead of exact float equality.

#[cfg(not(feature = "std"))]
use crate::common::FloatFuncs;

use crate::Point;

/// Tolerance for comparing scalar quantities such as curve parameters.
pub const EPSILON: f64 = 1e-9;

/// Tolerance for deciding that two points coincide.
pub const POINT_EPSILON: f64 = 1e-6;

/// Compare if two real values are approximately equal.
#[inline]
pub fn real_is_equal(num1: f64, num2: f64) -> bool {
    real_is_approx(num1, num2, EPSILON)
}

/// Compare two real values with an explicit tolerance.
#[inline]
pub fn real_is_approx(num1: f64, num2: f64, epsilon: f64) -> bool {
    if num1.is_infinite() || num2.is_infinite() {
        return num1 == num2;
    }
    (num1 - num2).abs() <= epsilon
}

/// Compare if a real value is approximately zero.
#[inline]
pub fn real_is_zero(num: f64) -> bool {
    real_is_equal(num, 0.)
}

/// Compare if two points are approximately equal.
#[inline]
pub fn point_is_equal(pt1: Point, pt2: Point) -> bool {
    point_is_approx(pt1, pt2, POINT_EPSILON)
}

/// Compare two points with an explicit tolerance on each axis.
#[inline]
pub fn point_is_approx(pt1: Point, pt2: Point, epsilon: f64) -> bool {
    real_is_approx(pt1.x, pt2.x, epsilon) && real_is_approx(pt1.y, pt2.y, epsilon)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_real_comparisons() {
        assert!(real_is_equal(1., 1.));
        assert!(real_is_equal(1000000., 1000000.));
        assert!(real_is_equal(f64::INFINITY, f64::INFINITY));
        assert!(!real_is_equal(f64::INFINITY, f64::NEG_INFINITY));
        assert!(real_is_equal(f64::EPSILON, 0.));
        assert!(real_is_zero(1e-12));
        assert!(!real_is_zero(1e-6));
        // Fixed, not relative: large magnitudes get no extra slack.
        assert!(!real_is_equal(1e12, 1e12 + 1.0));
    }

    #[test]
    fn test_point_comparisons() {
        assert!(point_is_equal(Point::new(0., 0.), Point::new(0., 0.)));
        assert!(point_is_equal(Point::new(0., 0.), Point::new(1e-7, -1e-7)));
        assert!(!point_is_equal(Point::new(0., 0.), Point::new(1., 1.)));
        assert!(!point_is_equal(
            Point::new(f64::INFINITY, 0.),
            Point::new(f64::NEG_INFINITY, 0.)
        ));
    }
}
