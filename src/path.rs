// Copyright 2018 the Kurbo Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Paths: chains of segments that share their end points.

use alloc::vec::Vec;

use arrayvec::ArrayVec;
use smallvec::SmallVec;

use crate::approx::{point_is_equal, POINT_EPSILON};
use crate::{
    IntersectionKind, Line, ParamCurve, ParamCurveArclen, ParamCurveArea, ParamCurveExtrema,
    ParamCurveNearest, PathSeg, Point, Rect, Vec2, DEFAULT_CURVE_ACCURACY,
    DEFAULT_NEAREST_ACCURACY,
};

#[cfg(not(feature = "std"))]
use crate::common::FloatFuncs;

/// Longest miter, as a multiple of the offset distance, before a corner of
/// an offset path is bridged with a line instead.
const MITER_LIMIT: f64 = 4.0;

/// A chain of segments, each starting where the previous one ends.
///
/// A path may be open or closed; it is closed when its end point coincides
/// with its start point, see [`Path::is_closed`]. A path with no segments
/// is a bare point.
///
/// A path holds nothing but its geometry, so it is `Send` and `Sync` and
/// can be shared between threads.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Path {
    start: Point,
    segments: Vec<PathSeg>,
}

/// A location on a path: a segment index and a parameter on that segment.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PathPosition {
    /// Index of the segment.
    pub segment: usize,
    /// Parameter on the segment, in `0..=1`.
    pub t: f64,
}

impl PathPosition {
    /// Create a new position.
    #[inline]
    pub const fn new(segment: usize, t: f64) -> PathPosition {
        PathPosition { segment, t }
    }
}

/// The point of a path nearest to some query point.
#[derive(Clone, Copy, Debug)]
pub struct PathNearest {
    /// The nearest point on the path.
    pub point: Point,
    /// Where on the path it lies.
    pub position: PathPosition,
    /// Distance from the query point.
    pub distance: f64,
}

/// An intersection between two paths.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PathIntersection {
    /// Where the paths meet.
    pub point: Point,
    /// Location on the first path.
    pub position: PathPosition,
    /// Location on the second path.
    pub other_position: PathPosition,
    /// Crossing or overlap.
    pub kind: IntersectionKind,
}

/// How two consecutive offset segments are joined.
#[derive(Clone, Copy)]
enum Joint {
    /// Both segments are trimmed or extended to meet at this point.
    Miter(Point),
    /// The ends are connected with a line.
    Bevel,
}

impl Path {
    /// An empty path at `start`.
    pub fn new(start: impl Into<Point>) -> Path {
        Path {
            start: start.into(),
            ..Default::default()
        }
    }

    /// A path from a sequence of segments.
    ///
    /// The start point is the start of the first segment. Segment end points
    /// are expected to match; this is not checked.
    pub fn from_segments(segments: impl IntoIterator<Item = PathSeg>) -> Path {
        let segments: Vec<PathSeg> = segments.into_iter().collect();
        let start = segments.first().map_or(Point::ZERO, PathSeg::start);
        Path {
            start,
            segments,
        }
    }

    /// A closed polygon through the given points.
    pub fn polygon(points: &[Point]) -> Path {
        let Some(&first) = points.first() else {
            return Path::default();
        };
        let mut path = Path::new(first);
        for pair in points.windows(2) {
            path.push(Line::new(pair[0], pair[1]).into());
        }
        path.closed()
    }

    /// Append a segment.
    ///
    /// The segment is expected to start at the current end point.
    pub fn push(&mut self, seg: PathSeg) {
        if self.segments.is_empty() {
            self.start = seg.start();
        }
        self.segments.push(seg);
    }

    /// The start point.
    #[inline]
    pub fn start(&self) -> Point {
        self.start
    }

    /// The end point; the start point for a path without segments.
    #[inline]
    pub fn end(&self) -> Point {
        self.segments.last().map_or(self.start, PathSeg::end)
    }

    /// The segments of the path.
    #[inline]
    pub fn segments(&self) -> &[PathSeg] {
        &self.segments
    }

    /// Iterate over the segments.
    #[inline]
    pub fn iter(&self) -> core::slice::Iter<'_, PathSeg> {
        self.segments.iter()
    }

    /// The number of segments.
    #[inline]
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Whether the path has no segments.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Whether the path ends where it starts.
    pub fn is_closed(&self) -> bool {
        !self.segments.is_empty() && point_is_equal(self.end(), self.start)
    }

    /// The path with a closing line appended if it does not end at its start.
    #[must_use]
    pub fn closed(&self) -> Path {
        let mut path = self.clone();
        if !path.segments.is_empty() && !path.is_closed() {
            path.push(Line::new(path.end(), path.start).into());
        }
        path
    }

    /// The path traversed in the opposite direction.
    #[must_use]
    pub fn reverse(&self) -> Path {
        Path {
            start: self.end(),
            segments: self.segments.iter().rev().map(PathSeg::reverse).collect(),
        }
    }

    /// Drop zero-length segments and segments repeating their predecessor.
    ///
    /// Each kept segment is re-attached to the end of the one before, so
    /// the chain stays connected.
    #[must_use]
    pub fn remove_degenerate_segments(&self) -> Path {
        let mut segments: Vec<PathSeg> = Vec::with_capacity(self.segments.len());
        let mut end = self.start;
        for seg in &self.segments {
            if seg.is_degenerate() {
                continue;
            }
            let seg = seg.with_endpoints(end, seg.end());
            if segments.last() == Some(&seg) {
                continue;
            }
            end = seg.end();
            segments.push(seg);
        }
        Path {
            start: self.start,
            segments,
        }
    }

    /// Split the path at one or two positions.
    ///
    /// Cutting at one position yields two paths, at two positions three.
    /// The pieces join up to the original path. Positions are taken in
    /// path order; when both fall on the same segment, the second cut is
    /// applied to what remains of that segment after the first.
    pub fn split(&self, first: PathPosition, second: Option<PathPosition>) -> SmallVec<[Path; 3]> {
        let (first, second) = match second {
            Some(second) if position_before(second, first) => (second, Some(first)),
            _ => (first, second),
        };
        let (head, tail) = self.cut(first);
        let mut pieces = SmallVec::new();
        pieces.push(head);
        match second {
            None => pieces.push(tail),
            Some(second) => {
                let (middle, rest) = tail.cut(remap_after_cut(first, second));
                pieces.push(middle);
                pieces.push(rest);
            }
        }
        pieces
    }

    fn cut(&self, pos: PathPosition) -> (Path, Path) {
        let n = self.segments.len();
        if pos.segment >= n {
            return (self.clone(), Path::new(self.end()));
        }
        let t = pos.t.clamp(0.0, 1.0);
        let i = pos.segment;
        let (head, tail) = if t <= 0.0 {
            (self.segments[..i].to_vec(), self.segments[i..].to_vec())
        } else if t >= 1.0 {
            (self.segments[..=i].to_vec(), self.segments[i + 1..].to_vec())
        } else {
            let (a, b) = self.segments[i].split(t);
            let mut head = self.segments[..i].to_vec();
            head.push(a);
            let mut tail = Vec::with_capacity(n - i);
            tail.push(b);
            tail.extend_from_slice(&self.segments[i + 1..]);
            (head, tail)
        };
        let head = Path {
            start: self.start,
            segments: head,
        };
        let tail = Path {
            start: head.end(),
            segments: tail,
        };
        (head, tail)
    }

    /// All intersections with another path.
    ///
    /// Coincident stretches are skipped.
    pub fn intersections(&self, other: &Path) -> Vec<PathIntersection> {
        self.intersections_with(other, DEFAULT_CURVE_ACCURACY, false)
    }

    /// All intersections with another path, with explicit tolerances.
    ///
    /// `accuracy` is the curve/curve subdivision box size. With
    /// `include_overlaps`, the ends of coincident stretches are reported
    /// as [`IntersectionKind::Overlap`].
    pub fn intersections_with(
        &self,
        other: &Path,
        accuracy: f64,
        include_overlaps: bool,
    ) -> Vec<PathIntersection> {
        let mut result = Vec::new();
        for (i, a) in self.segments.iter().enumerate() {
            let box_a = a.control_box();
            for (j, b) in other.segments.iter().enumerate() {
                if !box_a.overlaps(b.control_box()) {
                    continue;
                }
                for x in a.intersect(b, accuracy, include_overlaps) {
                    result.push(PathIntersection {
                        point: x.point,
                        position: PathPosition::new(i, x.t),
                        other_position: PathPosition::new(j, x.other_t),
                        kind: x.kind,
                    });
                }
            }
        }
        result
    }

    /// Offset the path by `distance` along its normal.
    ///
    /// This is the Tiller–Hanson construction: every edge of each segment's
    /// control polygon is moved along its own normal, and the moved edges
    /// are re-intersected to give the new control points. Consecutive
    /// segments are joined the same way. Where edges are parallel the
    /// moved edge is used as is; where a corner would spike out further
    /// than a miter limit, the gap is bridged with a line.
    ///
    /// Positive distances move toward [`Vec2::turn_90`] of the direction of
    /// travel, which is the inside of a clockwise contour in a y-down space.
    #[must_use]
    pub fn offset(&self, distance: f64) -> Path {
        let segs: Vec<PathSeg> = self
            .segments
            .iter()
            .filter_map(|seg| offset_segment(seg, distance))
            .collect();
        let n = segs.len();
        if n == 0 {
            return Path::new(self.start);
        }
        let limit = MITER_LIMIT * distance.abs();
        let joints: Vec<Joint> = (0..n - 1)
            .map(|i| join(&segs[i], &segs[i + 1], limit))
            .collect();
        let wrap = self
            .is_closed()
            .then(|| join(&segs[n - 1], &segs[0], limit));

        let mut out = Vec::with_capacity(n * 2);
        for (i, seg) in segs.iter().enumerate() {
            let before = if i == 0 { wrap } else { Some(joints[i - 1]) };
            let after = if i + 1 == n { wrap } else { Some(joints[i]) };
            let start = match before {
                Some(Joint::Miter(p)) => p,
                _ => seg.start(),
            };
            let end = match after {
                Some(Joint::Miter(p)) => p,
                _ => seg.end(),
            };
            out.push(seg.with_endpoints(start, end));
            if let Some(Joint::Bevel) = after {
                let next = &segs[(i + 1) % n];
                out.push(Line::new(seg.end(), next.start()).into());
            }
        }
        Path::from_segments(out)
    }

    /// The smallest rectangle enclosing the path.
    pub fn bounding_box(&self) -> Rect {
        self.segments
            .iter()
            .fold(Rect::from_points(self.start, self.start), |r, seg| {
                r.union(seg.bounding_box())
            })
    }

    /// The arc length of the path.
    pub fn length(&self) -> f64 {
        self.segments.iter().map(PathSeg::arclen).sum()
    }

    /// The position at the given arc length from the start.
    ///
    /// Lengths outside the path clamp to its ends. Returns `None` for a
    /// path without segments.
    pub fn position_at_length(&self, length: f64) -> Option<PathPosition> {
        let last = self.segments.len().checked_sub(1)?;
        let mut remaining = length.max(0.0);
        for (i, seg) in self.segments.iter().enumerate() {
            let seg_len = seg.arclen();
            if remaining <= seg_len || i == last {
                let t = self.segments[i].t_at_length(remaining);
                return Some(PathPosition::new(i, t));
            }
            remaining -= seg_len;
        }
        None
    }

    /// The point at the given arc length from the start.
    pub fn point_at_length(&self, length: f64) -> Point {
        match self.position_at_length(length) {
            Some(pos) => self.segments[pos.segment].eval(pos.t),
            None => self.start,
        }
    }

    /// The unit tangent at the given arc length from the start.
    pub fn tangent_at_length(&self, length: f64) -> Vec2 {
        match self.position_at_length(length) {
            Some(pos) => self.segments[pos.segment].tangent(pos.t),
            None => Vec2::ZERO,
        }
    }

    /// The point of the path nearest to `p`.
    ///
    /// Returns `None` for a path without segments.
    pub fn nearest(&self, p: Point) -> Option<PathNearest> {
        let mut best: Option<(usize, f64, f64)> = None;
        for (i, seg) in self.segments.iter().enumerate() {
            let near = seg.nearest(p, DEFAULT_NEAREST_ACCURACY);
            if best.map_or(true, |(_, _, d)| near.distance_sq < d) {
                best = Some((i, near.t, near.distance_sq));
            }
        }
        let (segment, t, distance_sq) = best?;
        Some(PathNearest {
            point: self.segments[segment].eval(t),
            position: PathPosition::new(segment, t),
            distance: distance_sq.sqrt(),
        })
    }

    /// The signed area enclosed by the path.
    ///
    /// An open path is treated as closed by a straight line. The area is
    /// positive for a path that runs clockwise in a y-down space.
    pub fn signed_area(&self) -> f64 {
        let closing = Line::new(self.end(), self.start).signed_area();
        self.segments
            .iter()
            .map(ParamCurveArea::signed_area)
            .sum::<f64>()
            + closing
    }

    /// Whether the path runs clockwise in a y-down space.
    pub fn is_clockwise(&self) -> bool {
        self.signed_area() > 0.0
    }

    /// Whether every segment and the start point are finite.
    pub fn is_finite(&self) -> bool {
        self.start.is_finite()
            && self
                .segments
                .iter()
                .all(|seg| seg.control_points().iter().all(|p| p.is_finite()))
    }
}

impl<'a> IntoIterator for &'a Path {
    type Item = &'a PathSeg;
    type IntoIter = core::slice::Iter<'a, PathSeg>;

    fn into_iter(self) -> Self::IntoIter {
        self.segments.iter()
    }
}

impl FromIterator<PathSeg> for Path {
    fn from_iter<T: IntoIterator<Item = PathSeg>>(iter: T) -> Path {
        Path::from_segments(iter)
    }
}

fn position_before(a: PathPosition, b: PathPosition) -> bool {
    a.segment < b.segment || (a.segment == b.segment && a.t < b.t)
}

/// Re-express `second` in terms of the tail left after cutting at `first`.
fn remap_after_cut(first: PathPosition, second: PathPosition) -> PathPosition {
    let t1 = first.t.clamp(0.0, 1.0);
    if t1 >= 1.0 {
        if second.segment <= first.segment {
            PathPosition::new(0, 0.0)
        } else {
            PathPosition::new(second.segment - first.segment - 1, second.t)
        }
    } else if second.segment == first.segment {
        let t = if t1 > 0.0 {
            (second.t - t1) / (1.0 - t1)
        } else {
            second.t
        };
        PathPosition::new(0, t)
    } else {
        PathPosition::new(second.segment - first.segment, second.t)
    }
}

/// Offset one segment's control polygon, or `None` for a degenerate segment.
fn offset_segment(seg: &PathSeg, distance: f64) -> Option<PathSeg> {
    let pts = seg.control_points();
    let k = pts.len() - 1;
    let mut normals: ArrayVec<Option<Vec2>, 3> = pts
        .windows(2)
        .map(|w| {
            let d = w[1] - w[0];
            (d.hypot() > POINT_EPSILON).then(|| d.normalize().turn_90())
        })
        .collect();
    // Zero-length control edges borrow the direction of a neighbor.
    for j in 1..k {
        if normals[j].is_none() {
            normals[j] = normals[j - 1];
        }
    }
    for j in (0..k - 1).rev() {
        if normals[j].is_none() {
            normals[j] = normals[j + 1];
        }
    }
    let normals: ArrayVec<Vec2, 3> = normals.into_iter().collect::<Option<_>>()?;

    let shifted = |j: usize, edge: usize| pts[j] + normals[edge] * distance;
    let mut q: ArrayVec<Point, 4> = ArrayVec::new();
    q.push(shifted(0, 0));
    for j in 1..k {
        let prev = Line::new(shifted(j - 1, j - 1), shifted(j, j - 1));
        let next = Line::new(shifted(j, j), shifted(j + 1, j));
        q.push(prev.crossing_point(&next).unwrap_or(shifted(j, j)));
    }
    q.push(shifted(k, k - 1));
    Some(match seg {
        PathSeg::Line(_) => PathSeg::Line(Line::new(q[0], q[1])),
        PathSeg::Cubic(_) => PathSeg::Cubic(crate::CubicBez::new(q[0], q[1], q[2], q[3])),
    })
}

/// The outermost control edge at the end (`at_end`) or start of a segment.
fn end_edge(seg: &PathSeg, at_end: bool) -> Line {
    let pts = seg.control_points();
    if at_end {
        let end = pts[pts.len() - 1];
        let from = pts
            .iter()
            .rev()
            .copied()
            .find(|p| !point_is_equal(*p, end))
            .unwrap_or(end);
        Line::new(from, end)
    } else {
        let start = pts[0];
        let to = pts
            .iter()
            .copied()
            .find(|p| !point_is_equal(*p, start))
            .unwrap_or(start);
        Line::new(start, to)
    }
}

fn join(a: &PathSeg, b: &PathSeg, limit: f64) -> Joint {
    if point_is_equal(a.end(), b.start()) {
        return Joint::Miter(a.end());
    }
    match end_edge(a, true).crossing_point(&end_edge(b, false)) {
        Some(p) if p.distance(a.end()) <= limit && p.distance(b.start()) <= limit => Joint::Miter(p),
        _ => Joint::Bevel,
    }
}
