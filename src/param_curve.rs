// Copyright 2018 the Kurbo Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A trait for curves parametrized by a scalar.

use core::ops::Range;

use arrayvec::ArrayVec;

use crate::{Point, Rect};

#[cfg(not(feature = "std"))]
use crate::common::FloatFuncs;

/// The default accuracy for nearest-point projection.
pub const DEFAULT_NEAREST_ACCURACY: f64 = 1e-3;

/// Number of coarse samples taken before narrowing a nearest-point bracket.
const NEAREST_SAMPLES: usize = 25;

/// Upper bound on bracket-narrowing rounds in nearest-point projection.
const NEAREST_MAX_ITERATIONS: usize = 100;

/// A curve parametrized by a scalar.
///
/// If the result is interpreted as a point, this represents a curve.
/// But the result can be interpreted as a vector as well.
pub trait ParamCurve: Sized {
    /// Evaluate the curve at parameter `t`.
    ///
    /// Generally `t` is in the range [0..1].
    fn eval(&self, t: f64) -> Point;

    /// Get a subsegment of the curve for the given parameter range.
    fn subsegment(&self, range: Range<f64>) -> Self;

    /// Split the curve at `t`.
    ///
    /// The end of the first half and the start of the second are both
    /// exactly `self.eval(t)`.
    fn split(&self, t: f64) -> (Self, Self) {
        (self.subsegment(0.0..t), self.subsegment(t..1.0))
    }

    /// Subdivide into (roughly) halves.
    #[inline]
    fn subdivide(&self) -> (Self, Self) {
        self.split(0.5)
    }

    /// The start point.
    fn start(&self) -> Point {
        self.eval(0.0)
    }

    /// The end point.
    fn end(&self) -> Point {
        self.eval(1.0)
    }
}

/// A differentiable parametrized curve.
pub trait ParamCurveDeriv {
    /// The parametric curve obtained by taking the derivative of this one.
    type DerivResult: ParamCurve;

    /// The derivative of the curve.
    ///
    /// Note that the type of the return value is somewhat inaccurate, as
    /// the derivative of a curve (mapping of param to point) is a mapping
    /// of param to vector. We choose to accept this rather than have a
    /// more complex type scheme.
    fn deriv(&self) -> Self::DerivResult;
}

/// A parametrized curve that can have its arc length measured.
pub trait ParamCurveArclen: ParamCurve {
    /// The arc length of the curve.
    fn arclen(&self) -> f64;

    /// The arc length from the start of the curve to parameter `t`.
    fn length_at_t(&self, t: f64) -> f64 {
        if t <= 0.0 {
            0.0
        } else if t >= 1.0 {
            self.arclen()
        } else {
            self.subsegment(0.0..t).arclen()
        }
    }

    /// Solve for the parameter that has the given arclength from the start.
    ///
    /// This samples roughly one point every two units of length and
    /// linearly interpolates inside the bracketing sample pair. It is an
    /// approximation traded for speed, not a root-finder.
    fn t_at_length(&self, length: f64) -> f64 {
        let total = self.arclen();
        if !(total > 0.0) || length <= 0.0 {
            return 0.0;
        }
        if length >= total {
            return 1.0;
        }
        #[expect(
            clippy::cast_possible_truncation,
            reason = "the sample count is clamped to a small positive range"
        )]
        let n = (total * 0.5).ceil().clamp(4.0, 10_000.0) as usize;
        let step = (n as f64).recip();

        let mut polyline = 0.0;
        let mut last = self.start();
        for i in 1..=n {
            let p = self.eval(i as f64 * step);
            polyline += last.distance(p);
            last = p;
        }

        // Map the target onto the polyline so both ends line up.
        let target = length * polyline / total;
        let mut acc = 0.0;
        let mut last = self.start();
        for i in 1..=n {
            let p = self.eval(i as f64 * step);
            let seg = last.distance(p);
            if acc + seg >= target {
                let frac = if seg > 0.0 { (target - acc) / seg } else { 0.0 };
                return ((i - 1) as f64 + frac) * step;
            }
            acc += seg;
            last = p;
        }
        1.0
    }
}

/// A parametrized curve that can have its signed area measured.
pub trait ParamCurveArea {
    /// Compute the signed area under the curve.
    ///
    /// For a closed path, the signed area of the path is the sum of signed
    /// areas of the segments. This is a variant of the "shoelace formula."
    /// See:
    /// <https://github.com/Pomax/bezierinfo/issues/44> and
    /// <http://ich.deanmcnamee.com/graphics/2016/03/30/CurveArea.html>
    fn signed_area(&self) -> f64;
}

/// The nearest position on a curve to some point.
///
/// This is returned by [`ParamCurveNearest::nearest`].
#[derive(Debug, Clone, Copy)]
pub struct Nearest {
    /// The square of the distance from the nearest position on the curve
    /// to the given point.
    pub distance_sq: f64,
    /// The position on the curve of the nearest point, as a parameter.
    pub t: f64,
}

/// A parametrized curve that reports the nearest point.
pub trait ParamCurveNearest {
    /// Find the position on the curve that is nearest to the given point.
    ///
    /// `accuracy` bounds the width of the final parameter bracket.
    fn nearest(&self, p: Point, accuracy: f64) -> Nearest;
}

/// The maximum number of extrema that can be reported in the `ParamCurveExtrema` trait.
///
/// This is 4 to accommodate cubic Béziers.
pub const MAX_EXTREMA: usize = 4;

/// A parametrized curve that reports its extrema.
pub trait ParamCurveExtrema: ParamCurve {
    /// Compute the extrema of the curve.
    ///
    /// Only extrema within the interior of the curve count.
    /// At most four extrema can be reported, which is sufficient for
    /// cubic Béziers.
    ///
    /// The extrema should be reported in increasing parameter order.
    fn extrema(&self) -> ArrayVec<f64, MAX_EXTREMA>;

    /// The smallest rectangle that encloses the curve in the range (0..1).
    fn bounding_box(&self) -> Rect {
        let mut bbox = Rect::from_points(self.start(), self.end());
        for t in self.extrema() {
            bbox = bbox.union_pt(self.eval(t));
        }
        bbox
    }
}

/// Nearest-point projection by coarse sampling and bracket narrowing.
///
/// 25 evenly spaced samples pick the best bracket; each round then probes
/// five interior points and keeps the neighborhood of the best one, until
/// the bracket is narrower than `accuracy` or 100 rounds have run.
pub(crate) fn nearest_by_sampling<C: ParamCurve>(curve: &C, p: Point, accuracy: f64) -> Nearest {
    let last = (NEAREST_SAMPLES - 1) as f64;
    let mut best_t = 0.0;
    let mut best_d = f64::INFINITY;
    for i in 0..NEAREST_SAMPLES {
        let t = i as f64 / last;
        let d = curve.eval(t).distance_squared(p);
        if d < best_d {
            best_d = d;
            best_t = t;
        }
    }

    let mut lo = (best_t - last.recip()).max(0.0);
    let mut hi = (best_t + last.recip()).min(1.0);
    let accuracy = accuracy.max(1e-15);
    for _ in 0..NEAREST_MAX_ITERATIONS {
        if hi - lo < accuracy {
            break;
        }
        let mut probes = [0.0; 7];
        let mut best_ix = 0;
        let mut probe_best = f64::INFINITY;
        for (k, probe) in probes.iter_mut().enumerate() {
            *probe = lo + (hi - lo) * (k as f64 / 6.0);
            let d = curve.eval(*probe).distance_squared(p);
            if d < probe_best {
                probe_best = d;
                best_ix = k;
            }
        }
        if probe_best < best_d {
            best_d = probe_best;
            best_t = probes[best_ix];
        }
        lo = probes[best_ix.saturating_sub(1)];
        hi = probes[(best_ix + 1).min(6)];
    }
    Nearest {
        distance_sq: best_d,
        t: best_t,
    }
}
