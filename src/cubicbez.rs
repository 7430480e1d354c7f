// Copyright 2018 the Kurbo Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Cubic Bézier segments.

use core::ops::Range;

use arrayvec::ArrayVec;
use smallvec::SmallVec;

use crate::approx::{point_is_equal, POINT_EPSILON};
use crate::common::{integrate_unit, solve_cubic, solve_quadratic};
use crate::param_curve::nearest_by_sampling;
use crate::{
    Line, Nearest, ParamCurve, ParamCurveArclen, ParamCurveArea, ParamCurveDeriv,
    ParamCurveExtrema, ParamCurveNearest, Point, QuadBez, Rect, Vec2, MAX_EXTREMA,
};

#[cfg(not(feature = "std"))]
use crate::common::FloatFuncs;

/// The default box size at which curve/curve subdivision stops.
pub const DEFAULT_CURVE_ACCURACY: f64 = 0.1;

/// Reports of one curve/curve intersection closer than this (squared) are merged.
const INTERSECTION_MERGE_DIST_SQ: f64 = 2.0;

/// Slack added around a line's bounding box when accepting a curve/line hit.
const LINE_BBOX_SLOP: f64 = 1e-3;

/// A single cubic Bézier segment.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CubicBez {
    /// The start point.
    pub p0: Point,
    /// The first control point.
    pub p1: Point,
    /// The second control point.
    pub p2: Point,
    /// The end point.
    pub p3: Point,
}

impl CubicBez {
    /// Create a new cubic Bézier segment.
    #[inline(always)]
    pub fn new<P: Into<Point>>(p0: P, p1: P, p2: P, p3: P) -> CubicBez {
        CubicBez {
            p0: p0.into(),
            p1: p1.into(),
            p2: p2.into(),
            p3: p3.into(),
        }
    }

    /// A cubic that traces a straight line, with control points at thirds.
    pub fn from_line(line: Line) -> CubicBez {
        CubicBez::new(
            line.p0,
            line.p0.lerp(line.p1, 1.0 / 3.0),
            line.p0.lerp(line.p1, 2.0 / 3.0),
            line.p1,
        )
    }

    /// If this cubic is an exact degree raise of a quadratic, return it.
    ///
    /// Both candidate control points `(3 p1 - p0) / 2` and `(3 p2 - p3) / 2`
    /// have to agree.
    pub fn as_quad(&self) -> Option<QuadBez> {
        let c1 = ((3.0 * self.p1.to_vec2() - self.p0.to_vec2()) * 0.5).to_point();
        let c2 = ((3.0 * self.p2.to_vec2() - self.p3.to_vec2()) * 0.5).to_point();
        if point_is_equal(c1, c2) {
            Some(QuadBez::new(self.p0, c1.midpoint(c2), self.p3))
        } else {
            None
        }
    }

    /// Returns a cubic Bézier segment that traces the same curve backwards.
    #[must_use]
    #[inline]
    pub fn reversed(&self) -> CubicBez {
        CubicBez {
            p0: self.p3,
            p1: self.p2,
            p2: self.p1,
            p3: self.p0,
        }
    }

    /// The hull of the control points.
    ///
    /// Always contains the curve; cheaper but looser than
    /// [`bounding_box`](ParamCurveExtrema::bounding_box).
    #[inline]
    pub fn control_box(&self) -> Rect {
        Rect::from_points(self.p0, self.p1)
            .union_pt(self.p2)
            .union_pt(self.p3)
    }

    /// Whether all control points coincide.
    pub fn is_degenerate(&self) -> bool {
        let bbox = self.control_box();
        bbox.width() <= POINT_EPSILON && bbox.height() <= POINT_EPSILON
    }

    /// The unit tangent at `t`.
    ///
    /// Where the derivative vanishes (a control point sitting on its end
    /// point) the direction falls back to the chord towards the next
    /// distinct control point.
    pub fn tangent(&self, t: f64) -> Vec2 {
        let d = self.deriv().eval(t).to_vec2();
        if d.hypot() > POINT_EPSILON {
            return d.normalize();
        }
        let chords = if t <= 0.5 {
            [self.p2 - self.p0, self.p3 - self.p0, self.p3 - self.p1]
        } else {
            [self.p3 - self.p1, self.p3 - self.p0, self.p2 - self.p0]
        };
        chords
            .into_iter()
            .find(|v| v.hypot() > POINT_EPSILON)
            .map_or(Vec2::ZERO, Vec2::normalize)
    }

    /// The unit normal at `t`, the tangent turned by 90 degrees.
    #[inline]
    pub fn normal(&self, t: f64) -> Vec2 {
        self.tangent(t).turn_90()
    }

    /// Intersect the curve with a line segment.
    ///
    /// The control points are projected onto the line's normal, which turns
    /// the problem into finding the roots of a single cubic. Returns the
    /// curve parameter of each hit together with its position, in no
    /// particular order.
    pub fn intersect_line(&self, line: &Line) -> ArrayVec<(f64, Point), 3> {
        let mut result = ArrayVec::new();
        let dir = line.p1 - line.p0;
        let len = dir.hypot();
        if len <= 0.0 {
            return result;
        }
        let dir = dir / len;
        let dist = |p: Point| dir.cross(p - line.p0);
        let d0 = dist(self.p0);
        let d1 = dist(self.p1);
        let d2 = dist(self.p2);
        let d3 = dist(self.p3);
        let c3 = -d0 + 3.0 * d1 - 3.0 * d2 + d3;
        let c2 = 3.0 * d0 - 6.0 * d1 + 3.0 * d2;
        let c1 = -3.0 * d0 + 3.0 * d1;
        let c0 = d0;

        let bbox = line.bounding_box().inflate(LINE_BBOX_SLOP, LINE_BBOX_SLOP);
        for t in solve_cubic(c0, c1, c2, c3) {
            let Some(t) = crate::line::clamp_unit(t) else {
                continue;
            };
            let p = self.eval(t);
            if bbox.contains(p) && !result.iter().any(|&(t1, _)| t1 == t) {
                result.push((t, p));
            }
        }
        result
    }

    /// Intersect two cubics by recursive subdivision of their control boxes.
    ///
    /// When a box pair overlaps and one of them is smaller than `accuracy`
    /// in both dimensions, its center is taken as an intersection. Reports
    /// closer together than √2 are merged. The returned pairs are the
    /// parameters `(t, s)` on `self` and `other`, recovered by projecting
    /// each report back onto the curves and polishing with Newton steps.
    pub fn intersect_cubic(&self, other: &CubicBez, accuracy: f64) -> SmallVec<[(f64, f64); 9]> {
        let mut points: SmallVec<[Point; 9]> = SmallVec::new();
        if !self.is_degenerate() && !other.is_degenerate() {
            intersect_rec(self, other, accuracy.max(POINT_EPSILON), &mut points);
        }
        let mut merged: SmallVec<[Point; 9]> = SmallVec::new();
        for p in points {
            if !merged
                .iter()
                .any(|q| q.distance_squared(p) < INTERSECTION_MERGE_DIST_SQ)
            {
                merged.push(p);
            }
        }
        merged
            .into_iter()
            .map(|p| {
                let t = self.nearest(p, 1e-9).t;
                let s = other.nearest(p, 1e-9).t;
                refine_crossing(self, other, t, s)
            })
            .collect()
    }

    /// Whether two cubics trace the same curve, in either direction.
    pub fn overlaps(&self, other: &CubicBez) -> bool {
        if self.is_degenerate() || other.is_degenerate() {
            return false;
        }
        let same = |a: &CubicBez, b: &CubicBez| {
            point_is_equal(a.p0, b.p0)
                && point_is_equal(a.p1, b.p1)
                && point_is_equal(a.p2, b.p2)
                && point_is_equal(a.p3, b.p3)
        };
        same(self, other) || same(self, &other.reversed())
    }
}

/// Newton iteration on `a(t) - b(s) = 0`.
///
/// Keeps the starting pair when the tangents are parallel or a step makes
/// things worse.
fn refine_crossing(a: &CubicBez, b: &CubicBez, mut t: f64, mut s: f64) -> (f64, f64) {
    let da = a.deriv();
    let db = b.deriv();
    let mut err = a.eval(t).distance_squared(b.eval(s));
    for _ in 0..8 {
        if err < 1e-24 {
            break;
        }
        let r = b.eval(s) - a.eval(t);
        let ta = da.eval(t).to_vec2();
        let tb = db.eval(s).to_vec2();
        let det = ta.cross(tb);
        if det.abs() <= 1e-12 * ta.hypot() * tb.hypot() {
            break;
        }
        let t_new = (t + r.cross(tb) / det).clamp(0.0, 1.0);
        let s_new = (s + r.cross(ta) / det).clamp(0.0, 1.0);
        let err_new = a.eval(t_new).distance_squared(b.eval(s_new));
        if err_new >= err {
            break;
        }
        (t, s, err) = (t_new, s_new, err_new);
    }
    (t, s)
}

fn intersect_rec(a: &CubicBez, b: &CubicBez, accuracy: f64, out: &mut SmallVec<[Point; 9]>) {
    let box_a = a.control_box();
    let box_b = b.control_box();
    if !box_a.overlaps(box_b) {
        return;
    }
    if box_a.width() < accuracy && box_a.height() < accuracy {
        out.push(box_a.center());
        return;
    }
    if box_b.width() < accuracy && box_b.height() < accuracy {
        out.push(box_b.center());
        return;
    }
    let (a0, a1) = a.subdivide();
    let (b0, b1) = b.subdivide();
    for sub_a in [&a0, &a1] {
        for sub_b in [&b0, &b1] {
            intersect_rec(sub_a, sub_b, accuracy, out);
        }
    }
}

impl ParamCurve for CubicBez {
    #[inline]
    fn eval(&self, t: f64) -> Point {
        let mt = 1.0 - t;
        let v = self.p0.to_vec2() * (mt * mt * mt)
            + (self.p1.to_vec2() * (mt * mt * 3.0)
                + (self.p2.to_vec2() * (mt * 3.0) + self.p3.to_vec2() * t) * t)
                * t;
        v.to_point()
    }

    fn subsegment(&self, range: Range<f64>) -> CubicBez {
        let (t0, t1) = (range.start, range.end);
        let p0 = if t0 == 0.0 { self.p0 } else { self.eval(t0) };
        let p3 = if t1 == 1.0 { self.p3 } else { self.eval(t1) };
        let d = self.deriv();
        let scale = (t1 - t0) * (1.0 / 3.0);
        let p1 = p0 + scale * d.eval(t0).to_vec2();
        let p2 = p3 - scale * d.eval(t1).to_vec2();
        CubicBez { p0, p1, p2, p3 }
    }

    /// Split with de Casteljau's construction.
    fn split(&self, t: f64) -> (CubicBez, CubicBez) {
        let p01 = self.p0.lerp(self.p1, t);
        let p12 = self.p1.lerp(self.p2, t);
        let p23 = self.p2.lerp(self.p3, t);
        let p012 = p01.lerp(p12, t);
        let p123 = p12.lerp(p23, t);
        let pm = self.eval(t);
        (
            CubicBez::new(self.p0, p01, p012, pm),
            CubicBez::new(pm, p123, p23, self.p3),
        )
    }

    #[inline(always)]
    fn start(&self) -> Point {
        self.p0
    }

    #[inline(always)]
    fn end(&self) -> Point {
        self.p3
    }
}

impl ParamCurveDeriv for CubicBez {
    type DerivResult = QuadBez;

    #[inline]
    fn deriv(&self) -> QuadBez {
        QuadBez::new(
            (3.0 * (self.p1 - self.p0)).to_point(),
            (3.0 * (self.p2 - self.p1)).to_point(),
            (3.0 * (self.p3 - self.p2)).to_point(),
        )
    }
}

impl ParamCurveArclen for CubicBez {
    /// Arclength by 25-point Gauss-Legendre quadrature of the speed.
    fn arclen(&self) -> f64 {
        let d = self.deriv();
        integrate_unit(|t| d.eval(t).to_vec2().hypot())
    }
}

impl ParamCurveArea for CubicBez {
    #[inline]
    fn signed_area(&self) -> f64 {
        (self.p0.x * (6.0 * self.p1.y + 3.0 * self.p2.y + self.p3.y)
            + 3.0
                * (self.p1.x * (-2.0 * self.p0.y + self.p2.y + self.p3.y)
                    - self.p2.x * (self.p0.y + self.p1.y - 2.0 * self.p3.y))
            - self.p3.x * (self.p0.y + 3.0 * self.p1.y + 6.0 * self.p2.y))
            * (1.0 / 20.0)
    }
}

impl ParamCurveNearest for CubicBez {
    /// Find the nearest point by sampling and bracket narrowing.
    fn nearest(&self, p: Point, accuracy: f64) -> Nearest {
        nearest_by_sampling(self, p, accuracy)
    }
}

impl ParamCurveExtrema for CubicBez {
    fn extrema(&self) -> ArrayVec<f64, MAX_EXTREMA> {
        fn one_coord(result: &mut ArrayVec<f64, MAX_EXTREMA>, d0: f64, d1: f64, d2: f64) {
            let a = d0 - 2.0 * d1 + d2;
            let b = 2.0 * (d1 - d0);
            let c = d0;
            let roots = solve_quadratic(c, b, a);
            for &t in &roots {
                if t > 0.0 && t < 1.0 {
                    result.push(t);
                }
            }
        }
        let mut result = ArrayVec::new();
        let d0 = self.p1 - self.p0;
        let d1 = self.p2 - self.p1;
        let d2 = self.p3 - self.p2;
        one_coord(&mut result, d0.x, d1.x, d2.x);
        one_coord(&mut result, d0.y, d1.y, d2.y);
        result.sort_by(f64::total_cmp);
        result
    }
}

impl From<QuadBez> for CubicBez {
    #[inline]
    fn from(q: QuadBez) -> CubicBez {
        q.raise()
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        CubicBez, Line, ParamCurve, ParamCurveArclen, ParamCurveArea, ParamCurveDeriv,
        ParamCurveExtrema, ParamCurveNearest, Point, QuadBez, Rect, Vec2,
    };

    fn assert_near(p0: Point, p1: Point, epsilon: f64) {
        assert!((p1 - p0).hypot() < epsilon, "{p0:?} != {p1:?}");
    }

    fn arch() -> CubicBez {
        CubicBez::new((0.0, 0.0), (0.0, 100.0), (100.0, 100.0), (100.0, 0.0))
    }

    #[test]
    fn cubicbez_deriv() {
        // y = x^2
        let c = CubicBez::new(
            (0.0, 0.0),
            (1.0 / 3.0, 0.0),
            (2.0 / 3.0, 1.0 / 3.0),
            (1.0, 1.0),
        );
        let deriv = c.deriv();

        let n = 10;
        for i in 0..=n {
            let t = (i as f64) * (n as f64).recip();
            let delta = 1e-6;
            let p = c.eval(t);
            let p1 = c.eval(t + delta);
            let d_approx = (p1 - p) * delta.recip();
            let d = deriv.eval(t).to_vec2();
            assert!((d - d_approx).hypot() < delta * 2.0);
        }
    }

    #[test]
    fn cubicbez_split_is_exact() {
        let c = CubicBez::new((3.1, 4.1), (5.9, 2.6), (5.3, 5.8), (9.7, 9.3));
        for t in [0.0, 0.1, 0.37, 0.5, 0.9, 1.0] {
            let (left, right) = c.split(t);
            assert_eq!(left.end(), right.start());
            assert_eq!(left.end(), c.eval(t));
            assert_eq!(left.start(), c.start());
            assert_eq!(right.end(), c.end());
            for i in 0..=10 {
                let u = i as f64 / 10.0;
                assert_near(left.eval(u), c.eval(u * t), 1e-9);
                assert_near(right.eval(u), c.eval(t + u * (1.0 - t)), 1e-9);
            }
        }
    }

    #[test]
    fn cubicbez_subsegment() {
        let c = CubicBez::new((3.1, 4.1), (5.9, 2.6), (5.3, 5.8), (9.7, 9.3));
        let t0 = 0.1;
        let t1 = 0.8;
        let cs = c.subsegment(t0..t1);
        for i in 0..=10 {
            let t = (i as f64) / 10.0;
            let ts = t0 + t * (t1 - t0);
            assert_near(c.eval(ts), cs.eval(t), 1e-12);
        }
        assert_eq!(c.subsegment(0.0..1.0), c);
    }

    #[test]
    fn cubicbez_arclen() {
        // y = x^2
        let c = CubicBez::new(
            (0.0, 0.0),
            (1.0 / 3.0, 0.0),
            (2.0 / 3.0, 1.0 / 3.0),
            (1.0, 1.0),
        );
        let true_arclen = 0.5 * 5.0f64.sqrt() + 0.25 * (2.0 + 5.0f64.sqrt()).ln();
        assert!((c.arclen() - true_arclen).abs() < 1e-9);

        let straight = CubicBez::from_line(Line::new((0.0, 0.0), (30.0, 40.0)));
        assert!((straight.arclen() - 50.0).abs() < 1e-9);
    }

    #[test]
    fn cubicbez_t_at_length_round_trip() {
        let c = arch();
        for t in [0.05, 0.25, 0.5, 0.6, 0.95] {
            let len = c.length_at_t(t);
            let t2 = c.t_at_length(len);
            assert!((t - t2).abs() < 1e-2, "{t} -> {len} -> {t2}");
        }
        assert_eq!(c.t_at_length(0.0), 0.0);
        assert_eq!(c.t_at_length(1e6), 1.0);
    }

    #[test]
    fn cubicbez_signed_area() {
        // y = 1 - x^3
        let c = CubicBez::new((1.0, 0.0), (2.0 / 3.0, 1.0), (1.0 / 3.0, 1.0), (0.0, 1.0));
        let epsilon = 1e-12;
        assert!((c.signed_area() - 0.75).abs() < epsilon);
        let c = CubicBez::new((0.0, 0.0), (1.0, 0.0), (2.0, 0.0), (3.0, 0.0));
        assert_eq!(c.signed_area(), 0.0);
    }

    #[test]
    fn cubicbez_nearest() {
        // y = x^2
        let c = CubicBez::new(
            (0.0, 0.0),
            (1.0 / 3.0, 0.0),
            (2.0 / 3.0, 1.0 / 3.0),
            (1.0, 1.0),
        );
        let n = c.nearest(Point::new(0.1, 0.01), 1e-6);
        assert!((n.t - 0.1).abs() < 1e-4);
        let n = c.nearest(Point::new(0.2, 0.04), 1e-6);
        assert!((n.t - 0.2).abs() < 1e-4);
        assert!(n.distance_sq < 1e-9);
        let n = c.nearest(Point::new(-0.1, 0.01), 1e-6);
        assert_eq!(n.t, 0.0);
        let n = c.nearest(Point::new(1.1, 1.21), 1e-6);
        assert_eq!(n.t, 1.0);
    }

    #[test]
    fn cubicbez_extrema() {
        // y = x^2
        let q = QuadBez::new((0.0, 0.0), (0.5, -1.0), (1.0, 0.0));
        let extrema = q.raise().extrema();
        assert_eq!(extrema.len(), 1);
        assert!((extrema[0] - 0.5).abs() < 1e-6);

        let bbox = arch().bounding_box();
        assert!((bbox.y1 - 75.0).abs() < 1e-9);
        assert_eq!(bbox.x0, 0.0);
        assert_eq!(bbox.x1, 100.0);
        assert_eq!(arch().control_box(), Rect::new(0.0, 0.0, 100.0, 100.0));
    }

    #[test]
    fn cubicbez_tangent_fallback() {
        // First control point sits on the start point.
        let c = CubicBez::new((0.0, 0.0), (0.0, 0.0), (10.0, 0.0), (10.0, 10.0));
        let t = c.tangent(0.0);
        assert_near(t.to_point(), Point::new(1.0, 0.0), 1e-12);
        let c = CubicBez::new((0.0, 0.0), (0.0, 10.0), (10.0, 10.0), (10.0, 10.0));
        assert_near(c.tangent(1.0).to_point(), Point::new(1.0, 0.0), 1e-12);
        assert_eq!(c.normal(1.0), Vec2::new(0.0, 1.0));
    }

    #[test]
    fn cubicbez_intersect_line() {
        let line = Line::new((-10.0, 50.0), (110.0, 50.0));
        let hits = arch().intersect_line(&line);
        assert_eq!(hits.len(), 2);
        for (t, p) in hits {
            assert!((p.y - 50.0).abs() < 1e-9);
            assert_near(arch().eval(t), p, 1e-12);
        }
        // A line short of the curve misses it.
        let short = Line::new((40.0, 50.0), (60.0, 50.0));
        assert!(arch().intersect_line(&short).is_empty());
    }

    #[test]
    fn cubicbez_intersect_cubic() {
        let horizontal = CubicBez::from_line(Line::new((0.0, 0.0), (100.0, 0.0)));
        let vertical = CubicBez::from_line(Line::new((50.0, -50.0), (50.0, 50.0)));
        let hits = horizontal.intersect_cubic(&vertical, 0.1);
        assert_eq!(hits.len(), 1);
        assert!((hits[0].0 - 0.5).abs() < 1e-6);
        assert!((hits[0].1 - 0.5).abs() < 1e-6);

        let across = CubicBez::from_line(Line::new((-10.0, 50.0), (110.0, 50.0)));
        let hits = arch().intersect_cubic(&across, 0.1);
        assert_eq!(hits.len(), 2);
        for (t, s) in hits {
            assert_near(arch().eval(t), across.eval(s), 1e-3);
        }

        let far = CubicBez::from_line(Line::new((0.0, 200.0), (100.0, 200.0)));
        assert!(arch().intersect_cubic(&far, 0.1).is_empty());
    }

    #[test]
    fn cubicbez_overlaps() {
        let c = arch();
        assert!(c.overlaps(&c));
        assert!(c.overlaps(&c.reversed()));
        assert!(!c.overlaps(&c.subsegment(0.0..0.5)));
        let dot = CubicBez::new((1.0, 1.0), (1.0, 1.0), (1.0, 1.0), (1.0, 1.0));
        assert!(!dot.overlaps(&dot));
    }

    #[test]
    fn cubicbez_as_quad() {
        let q = QuadBez::new((0.0, 0.0), (50.0, 100.0), (100.0, 0.0));
        let back = q.raise().as_quad().unwrap();
        assert_near(back.p1, q.p1, 1e-9);
        assert!(arch().as_quad().is_none());
    }
}
