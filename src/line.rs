// Copyright 2018 the Kurbo Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Lines.

use core::ops::Range;

use arrayvec::ArrayVec;

use crate::approx::{real_is_zero, EPSILON, POINT_EPSILON};
use crate::{
    Nearest, ParamCurve, ParamCurveArclen, ParamCurveArea, ParamCurveDeriv, ParamCurveExtrema,
    ParamCurveNearest, Point, Rect, Vec2, MAX_EXTREMA,
};

/// A single line.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Line {
    /// The line's start point.
    pub p0: Point,
    /// The line's end point.
    pub p1: Point,
}

impl Line {
    /// Create a new line.
    #[inline(always)]
    pub fn new(p0: impl Into<Point>, p1: impl Into<Point>) -> Line {
        Line {
            p0: p0.into(),
            p1: p1.into(),
        }
    }

    /// Returns a copy of this `Line` with the end points swapped so that it
    /// points in the opposite direction.
    #[must_use]
    #[inline(always)]
    pub fn reversed(&self) -> Line {
        Self {
            p0: self.p1,
            p1: self.p0,
        }
    }

    /// The length of the line.
    #[inline]
    pub fn length(self) -> f64 {
        self.arclen()
    }

    /// The unit direction of the line, or zero for a degenerate line.
    #[inline]
    pub fn tangent(&self) -> Vec2 {
        (self.p1 - self.p0).normalize()
    }

    /// The unit normal, the tangent turned by 90 degrees.
    #[inline]
    pub fn normal(&self) -> Vec2 {
        self.tangent().turn_90()
    }

    /// Whether the end points coincide.
    #[inline]
    pub fn is_degenerate(&self) -> bool {
        self.p0.distance(self.p1) <= POINT_EPSILON
    }

    /// Computes the point where two infinite lines cross, if any.
    ///
    /// Returns the parameters `(t, s)` such that `self.eval(t)` and
    /// `other.eval(s)` are the crossing point. The parameters are not
    /// restricted to the unit range.
    pub fn crossing_params(&self, other: &Line) -> Option<(f64, f64)> {
        let d1 = self.p1 - self.p0;
        let d2 = other.p1 - other.p0;
        let denom = d1.cross(d2);
        if real_is_zero(denom / (d1.hypot() * d2.hypot()).max(EPSILON)) {
            return None;
        }
        let w = other.p0 - self.p0;
        Some((w.cross(d2) / denom, w.cross(d1) / denom))
    }

    /// Computes the point where two infinite lines cross, if any.
    ///
    /// Parallel and degenerate lines have no crossing point.
    pub fn crossing_point(&self, other: &Line) -> Option<Point> {
        self.crossing_params(other).map(|(t, _)| self.eval(t))
    }

    /// Intersect two line segments.
    ///
    /// Returns `(t, s)` with both parameters clamped to the unit range when
    /// they are within rounding of it.
    pub fn intersect_line(&self, other: &Line) -> Option<(f64, f64)> {
        let (t, s) = self.crossing_params(other)?;
        let t = clamp_unit(t)?;
        let s = clamp_unit(s)?;
        Some((t, s))
    }

    /// Whether two lines are collinear and share a stretch of positive length.
    pub fn overlaps(&self, other: &Line) -> bool {
        self.overlap_range(other).is_some()
    }

    /// The range of `self`'s parameter covered by a collinear `other`.
    pub(crate) fn overlap_range(&self, other: &Line) -> Option<Range<f64>> {
        if self.is_degenerate() || other.is_degenerate() {
            return None;
        }
        let d = self.p1 - self.p0;
        let len = d.hypot();
        let off0 = d.cross(other.p0 - self.p0) / len;
        let off1 = d.cross(other.p1 - self.p0) / len;
        if off0.abs() > POINT_EPSILON || off1.abs() > POINT_EPSILON {
            return None;
        }
        let len2 = d.hypot2();
        let s0 = d.dot(other.p0 - self.p0) / len2;
        let s1 = d.dot(other.p1 - self.p0) / len2;
        let lo = s0.min(s1).max(0.0);
        let hi = s0.max(s1).min(1.0);
        if (hi - lo) * len > POINT_EPSILON {
            Some(lo..hi)
        } else {
            None
        }
    }
}

/// Snap a parameter within rounding of the unit range into it.
pub(crate) fn clamp_unit(t: f64) -> Option<f64> {
    const SLOP: f64 = 1e-7;
    if !(-SLOP..=1.0 + SLOP).contains(&t) {
        None
    } else {
        Some(t.clamp(0.0, 1.0))
    }
}

impl From<(Point, Point)> for Line {
    #[inline(always)]
    fn from((from, to): (Point, Point)) -> Self {
        Line::new(from, to)
    }
}

impl ParamCurve for Line {
    #[inline]
    fn eval(&self, t: f64) -> Point {
        // Weighted form, exact at both ends.
        (self.p0.to_vec2() * (1.0 - t) + self.p1.to_vec2() * t).to_point()
    }

    #[inline]
    fn subsegment(&self, range: Range<f64>) -> Line {
        Line {
            p0: self.eval(range.start),
            p1: self.eval(range.end),
        }
    }

    #[inline(always)]
    fn start(&self) -> Point {
        self.p0
    }

    #[inline(always)]
    fn end(&self) -> Point {
        self.p1
    }
}

impl ParamCurveDeriv for Line {
    type DerivResult = ConstPoint;

    #[inline]
    fn deriv(&self) -> ConstPoint {
        ConstPoint((self.p1 - self.p0).to_point())
    }
}

impl ParamCurveArclen for Line {
    #[inline]
    fn arclen(&self) -> f64 {
        (self.p1 - self.p0).hypot()
    }

    #[inline]
    fn t_at_length(&self, length: f64) -> f64 {
        let len = self.arclen();
        if len <= 0.0 {
            0.0
        } else {
            (length / len).clamp(0.0, 1.0)
        }
    }
}

impl ParamCurveArea for Line {
    #[inline]
    fn signed_area(&self) -> f64 {
        self.p0.to_vec2().cross(self.p1.to_vec2()) * 0.5
    }
}

impl ParamCurveNearest for Line {
    fn nearest(&self, p: Point, _accuracy: f64) -> Nearest {
        let d = self.p1 - self.p0;
        let dotp = d.dot(p - self.p0);
        let d_squared = d.dot(d);
        let (t, distance_sq) = if dotp <= 0.0 {
            (0.0, (p - self.p0).hypot2())
        } else if dotp >= d_squared {
            (1.0, (p - self.p1).hypot2())
        } else {
            let t = dotp / d_squared;
            let dist = (p - self.eval(t)).hypot2();
            (t, dist)
        };
        Nearest { distance_sq, t }
    }
}

impl ParamCurveExtrema for Line {
    #[inline]
    fn extrema(&self) -> ArrayVec<f64, MAX_EXTREMA> {
        ArrayVec::new()
    }

    #[inline]
    fn bounding_box(&self) -> Rect {
        Rect::from_points(self.p0, self.p1)
    }
}

/// A trivial "curve" that is just a constant.
#[derive(Clone, Copy, Debug)]
pub struct ConstPoint(Point);

impl ConstPoint {
    /// The point value.
    #[inline(always)]
    pub fn get(self) -> Point {
        self.0
    }
}

impl ParamCurve for ConstPoint {
    #[inline(always)]
    fn eval(&self, _t: f64) -> Point {
        self.0
    }

    #[inline(always)]
    fn subsegment(&self, _range: Range<f64>) -> ConstPoint {
        *self
    }
}

#[cfg(test)]
mod tests {
    use crate::{Line, ParamCurve, ParamCurveArclen, ParamCurveNearest, Point};

    #[test]
    fn line_reversed() {
        let l = Line::new((0.0, 0.0), (1.0, 1.0));
        let f = l.reversed();

        assert_eq!(l.p0, f.p1);
        assert_eq!(l.p1, f.p0);

        // Reversing it again should result in the original line
        assert_eq!(l, f.reversed());
    }

    #[test]
    fn line_arclen() {
        let l = Line::new((0.0, 0.0), (1.0, 1.0));
        let true_len = 2.0f64.sqrt();
        assert!((l.arclen() - true_len).abs() < 1e-12);
        assert!((l.t_at_length(true_len / 3.0) - 1.0 / 3.0).abs() < 1e-12);
        assert_eq!(l.t_at_length(10.0), 1.0);
    }

    #[test]
    fn line_intersect() {
        let a = Line::new((0.0, 0.0), (10.0, 10.0));
        let b = Line::new((0.0, 10.0), (10.0, 0.0));
        let (t, s) = a.intersect_line(&b).unwrap();
        assert!((t - 0.5).abs() < 1e-12);
        assert!((s - 0.5).abs() < 1e-12);

        // Parallel lines never cross.
        let c = Line::new((0.0, 1.0), (10.0, 11.0));
        assert!(a.intersect_line(&c).is_none());

        // Crossing point outside the segments.
        let d = Line::new((20.0, 0.0), (30.0, -10.0));
        assert!(a.intersect_line(&d).is_none());
        assert!(a.crossing_point(&d).is_some());
    }

    #[test]
    fn line_intersect_at_endpoint() {
        let a = Line::new((0.0, 0.0), (100.0, 0.0));
        let b = Line::new((100.0, 0.0), (100.0, 100.0));
        let (t, s) = a.intersect_line(&b).unwrap();
        assert_eq!(t, 1.0);
        assert_eq!(s, 0.0);
    }

    #[test]
    fn line_overlaps() {
        let a = Line::new((0.0, 0.0), (10.0, 0.0));
        assert!(a.overlaps(&Line::new((5.0, 0.0), (15.0, 0.0))));
        assert!(a.overlaps(&a.reversed()));
        // Touching at a single point is not an overlap.
        assert!(!a.overlaps(&Line::new((10.0, 0.0), (20.0, 0.0))));
        assert!(!a.overlaps(&Line::new((0.0, 1.0), (10.0, 1.0))));
        let degenerate = Line::new((3.0, 0.0), (3.0, 0.0));
        assert!(!a.overlaps(&degenerate));
    }

    #[test]
    fn line_nearest() {
        let l = Line::new((0.0, 0.0), (10.0, 0.0));
        let n = l.nearest(Point::new(4.0, 3.0), 1e-3);
        assert!((n.t - 0.4).abs() < 1e-12);
        assert!((n.distance_sq - 9.0).abs() < 1e-12);
        let n = l.nearest(Point::new(-4.0, 3.0), 1e-3);
        assert_eq!(n.t, 0.0);
        assert_eq!(l.eval(n.t), l.start());
    }

    #[test]
    fn line_normal() {
        let l = Line::new((0.0, 0.0), (10.0, 0.0));
        assert_eq!(l.normal(), crate::Vec2::new(0.0, 1.0));
    }
}
