// Copyright 2018 the Kurbo Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Path segments and the intersections between them.

use core::ops::Range;

use arrayvec::ArrayVec;
use smallvec::SmallVec;

use crate::approx::{point_is_approx, point_is_equal, POINT_EPSILON};
use crate::{
    CubicBez, Line, Nearest, ParamCurve, ParamCurveArclen, ParamCurveArea, ParamCurveExtrema,
    ParamCurveNearest, Point, QuadBez, Rect, Vec2, MAX_EXTREMA,
};

/// A segment of a path: either a line or a cubic Bézier.
///
/// Quadratic input is raised to a cubic, so two variants cover every
/// segment a [`Path`](crate::Path) can hold.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PathSeg {
    /// A line segment.
    Line(Line),
    /// A cubic Bézier segment.
    Cubic(CubicBez),
}

/// How two segments meet at an intersection.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum IntersectionKind {
    /// The segments cross (or touch) at an isolated point.
    Crossing,
    /// The point is an end of a stretch the segments share.
    Overlap,
}

/// An intersection of two segments.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SegIntersection {
    /// Where the segments meet.
    pub point: Point,
    /// The parameter on the first segment.
    pub t: f64,
    /// The parameter on the second segment.
    pub other_t: f64,
    /// Crossing or overlap.
    pub kind: IntersectionKind,
}

impl SegIntersection {
    /// The same intersection seen from the other segment.
    #[must_use]
    pub fn swapped(self) -> SegIntersection {
        SegIntersection {
            t: self.other_t,
            other_t: self.t,
            ..self
        }
    }
}

impl PathSeg {
    /// A quadratic segment, stored as its exact cubic equivalent.
    pub fn quad(p0: impl Into<Point>, p1: impl Into<Point>, p2: impl Into<Point>) -> PathSeg {
        PathSeg::Cubic(QuadBez::new(p0.into(), p1.into(), p2.into()).raise())
    }

    /// Returns a new `PathSeg` describing the same path but traversed in reverse.
    #[must_use]
    pub fn reverse(&self) -> PathSeg {
        match self {
            PathSeg::Line(line) => PathSeg::Line(line.reversed()),
            PathSeg::Cubic(cubic) => PathSeg::Cubic(cubic.reversed()),
        }
    }

    /// Convert this segment to a cubic Bézier.
    pub fn to_cubic(&self) -> CubicBez {
        match *self {
            PathSeg::Line(line) => CubicBez::from_line(line),
            PathSeg::Cubic(c) => c,
        }
    }

    /// The hull of the segment's control points.
    pub fn control_box(&self) -> Rect {
        match self {
            PathSeg::Line(line) => line.bounding_box(),
            PathSeg::Cubic(cubic) => cubic.control_box(),
        }
    }

    /// The control polygon: end points and, for cubics, the control points.
    pub fn control_points(&self) -> ArrayVec<Point, 4> {
        let mut pts = ArrayVec::new();
        match *self {
            PathSeg::Line(Line { p0, p1 }) => {
                pts.push(p0);
                pts.push(p1);
            }
            PathSeg::Cubic(CubicBez { p0, p1, p2, p3 }) => {
                pts.push(p0);
                pts.push(p1);
                pts.push(p2);
                pts.push(p3);
            }
        }
        pts
    }

    /// The same segment with its end points moved to `start` and `end`.
    ///
    /// Control points of a cubic move along with the end they hang from.
    #[must_use]
    pub fn with_endpoints(&self, start: Point, end: Point) -> PathSeg {
        match *self {
            PathSeg::Line(_) => PathSeg::Line(Line::new(start, end)),
            PathSeg::Cubic(c) => PathSeg::Cubic(CubicBez::new(
                start,
                c.p1 + (start - c.p0),
                c.p2 + (end - c.p3),
                end,
            )),
        }
    }

    /// Whether the segment has (near) zero extent.
    pub fn is_degenerate(&self) -> bool {
        match self {
            PathSeg::Line(line) => line.is_degenerate(),
            PathSeg::Cubic(cubic) => cubic.is_degenerate(),
        }
    }

    /// The unit tangent at `t`.
    pub fn tangent(&self, t: f64) -> Vec2 {
        match self {
            PathSeg::Line(line) => line.tangent(),
            PathSeg::Cubic(cubic) => cubic.tangent(t),
        }
    }

    /// The unit normal at `t`.
    pub fn normal(&self, t: f64) -> Vec2 {
        self.tangent(t).turn_90()
    }

    /// Whether two segments share a stretch of positive length.
    ///
    /// Lines overlap when collinear with a common run; cubics only when
    /// they trace the same curve, in either direction. A line and a cubic
    /// never overlap.
    pub fn overlaps(&self, other: &PathSeg) -> bool {
        match (self, other) {
            (PathSeg::Line(a), PathSeg::Line(b)) => a.overlaps(b),
            (PathSeg::Cubic(a), PathSeg::Cubic(b)) => a.overlaps(b),
            _ => false,
        }
    }

    /// Isolated crossing points of two segments.
    ///
    /// Overlapping segments are not special-cased here; use
    /// [`intersect`](Self::intersect) for that. `accuracy` is the stopping
    /// box size for curve/curve subdivision. A crossing close to an end
    /// point of either segment is reported exactly at that end point; for
    /// two curves "close" means within `accuracy`.
    pub fn crossings(&self, other: &PathSeg, accuracy: f64) -> SmallVec<[SegIntersection; 9]> {
        let snap = match (self, other) {
            (PathSeg::Cubic(_), PathSeg::Cubic(_)) => accuracy.max(POINT_EPSILON),
            _ => POINT_EPSILON,
        };
        let mut result = SmallVec::new();
        let mut push = |t: f64, other_t: f64, point: Point| {
            let t = snap_to_end(self, t, point, snap);
            let other_t = snap_to_end(other, other_t, point, snap);
            let point = end_point(self, t)
                .or_else(|| end_point(other, other_t))
                .unwrap_or(point);
            result.push(SegIntersection {
                point,
                t,
                other_t,
                kind: IntersectionKind::Crossing,
            });
        };
        match (self, other) {
            (PathSeg::Line(a), PathSeg::Line(b)) => {
                if let Some((t, s)) = a.intersect_line(b) {
                    push(t, s, a.eval(t));
                }
            }
            (PathSeg::Line(a), PathSeg::Cubic(b)) => {
                for (s, p) in b.intersect_line(a) {
                    push(a.nearest(p, 0.0).t, s, p);
                }
            }
            (PathSeg::Cubic(a), PathSeg::Line(b)) => {
                for (t, p) in a.intersect_line(b) {
                    push(t, b.nearest(p, 0.0).t, p);
                }
            }
            (PathSeg::Cubic(a), PathSeg::Cubic(b)) => {
                for (t, s) in a.intersect_cubic(b, accuracy) {
                    push(t, s, a.eval(t).midpoint(b.eval(s)));
                }
            }
        }
        result
    }

    /// End points of the stretch two overlapping segments share.
    ///
    /// Every end point of either segment that lies on the other one is
    /// reported, tagged [`IntersectionKind::Overlap`]. Returns nothing for
    /// segments that do not overlap.
    pub fn overlap_points(&self, other: &PathSeg) -> SmallVec<[SegIntersection; 4]> {
        let mut result: SmallVec<[SegIntersection; 4]> = SmallVec::new();
        if !self.overlaps(other) {
            return result;
        }
        let on = |seg: &PathSeg, p: Point| {
            let Nearest { distance_sq, t } = seg.nearest(p, 1e-9);
            (distance_sq <= POINT_EPSILON * POINT_EPSILON)
                .then(|| snap_to_end(seg, t, p, POINT_EPSILON))
        };
        let mut push = |point: Point, t: f64, other_t: f64| {
            if !result.iter().any(|x| point_is_equal(x.point, point)) {
                result.push(SegIntersection {
                    point,
                    t,
                    other_t,
                    kind: IntersectionKind::Overlap,
                });
            }
        };
        for t in [0.0, 1.0] {
            let p = self.eval(t);
            if let Some(s) = on(other, p) {
                push(p, t, s);
            }
        }
        for s in [0.0, 1.0] {
            let p = other.eval(s);
            if let Some(t) = on(self, p) {
                push(p, t, s);
            }
        }
        result
    }

    /// All intersections of two segments.
    ///
    /// Overlapping segments report the ends of their shared stretch when
    /// `include_overlaps` is set and nothing otherwise.
    pub fn intersect(
        &self,
        other: &PathSeg,
        accuracy: f64,
        include_overlaps: bool,
    ) -> SmallVec<[SegIntersection; 9]> {
        if self.overlaps(other) {
            if include_overlaps {
                self.overlap_points(other).into_iter().collect()
            } else {
                SmallVec::new()
            }
        } else {
            self.crossings(other, accuracy)
        }
    }
}

/// Snap a parameter to the segment end within `tolerance` of its point.
fn snap_to_end(seg: &PathSeg, t: f64, p: Point, tolerance: f64) -> f64 {
    if point_is_approx(p, seg.start(), tolerance) {
        0.0
    } else if point_is_approx(p, seg.end(), tolerance) {
        1.0
    } else {
        t
    }
}

/// The exact end point at a snapped parameter.
fn end_point(seg: &PathSeg, t: f64) -> Option<Point> {
    if t == 0.0 {
        Some(seg.start())
    } else if t == 1.0 {
        Some(seg.end())
    } else {
        None
    }
}

impl From<Line> for PathSeg {
    fn from(line: Line) -> PathSeg {
        PathSeg::Line(line)
    }
}

impl From<CubicBez> for PathSeg {
    fn from(cubic: CubicBez) -> PathSeg {
        PathSeg::Cubic(cubic)
    }
}

impl From<QuadBez> for PathSeg {
    fn from(quad: QuadBez) -> PathSeg {
        PathSeg::Cubic(quad.raise())
    }
}

impl ParamCurve for PathSeg {
    fn eval(&self, t: f64) -> Point {
        match self {
            PathSeg::Line(line) => line.eval(t),
            PathSeg::Cubic(cubic) => cubic.eval(t),
        }
    }

    fn subsegment(&self, range: Range<f64>) -> PathSeg {
        match self {
            PathSeg::Line(line) => PathSeg::Line(line.subsegment(range)),
            PathSeg::Cubic(cubic) => PathSeg::Cubic(cubic.subsegment(range)),
        }
    }

    fn split(&self, t: f64) -> (PathSeg, PathSeg) {
        match self {
            PathSeg::Line(line) => {
                let pm = line.eval(t);
                (
                    PathSeg::Line(Line::new(line.p0, pm)),
                    PathSeg::Line(Line::new(pm, line.p1)),
                )
            }
            PathSeg::Cubic(cubic) => {
                let (a, b) = cubic.split(t);
                (PathSeg::Cubic(a), PathSeg::Cubic(b))
            }
        }
    }

    fn start(&self) -> Point {
        match self {
            PathSeg::Line(line) => line.p0,
            PathSeg::Cubic(cubic) => cubic.p0,
        }
    }

    fn end(&self) -> Point {
        match self {
            PathSeg::Line(line) => line.p1,
            PathSeg::Cubic(cubic) => cubic.p3,
        }
    }
}

impl ParamCurveArclen for PathSeg {
    fn arclen(&self) -> f64 {
        match self {
            PathSeg::Line(line) => line.arclen(),
            PathSeg::Cubic(cubic) => cubic.arclen(),
        }
    }

    fn t_at_length(&self, length: f64) -> f64 {
        match self {
            PathSeg::Line(line) => line.t_at_length(length),
            PathSeg::Cubic(cubic) => cubic.t_at_length(length),
        }
    }
}

impl ParamCurveArea for PathSeg {
    fn signed_area(&self) -> f64 {
        match self {
            PathSeg::Line(line) => line.signed_area(),
            PathSeg::Cubic(cubic) => cubic.signed_area(),
        }
    }
}

impl ParamCurveNearest for PathSeg {
    fn nearest(&self, p: Point, accuracy: f64) -> Nearest {
        match self {
            PathSeg::Line(line) => line.nearest(p, accuracy),
            PathSeg::Cubic(cubic) => cubic.nearest(p, accuracy),
        }
    }
}

impl ParamCurveExtrema for PathSeg {
    fn extrema(&self) -> ArrayVec<f64, MAX_EXTREMA> {
        match self {
            PathSeg::Line(line) => line.extrema(),
            PathSeg::Cubic(cubic) => cubic.extrema(),
        }
    }
}
