// Copyright 2018 the Kurbo Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Regions bounded by one or more contours.

use alloc::vec::Vec;

use log::{debug, trace};

use crate::approx::POINT_EPSILON;
use crate::{
    BooleanError, Line, ParamCurve, Path, PathIntersection, PathNearest, PathSeg, Point, Rect,
    Vec2, DEFAULT_CURVE_ACCURACY,
};

#[cfg(not(feature = "std"))]
use crate::common::FloatFuncs;

/// Directions, in radians, tried in turn for the point-in-contour ray.
///
/// None is axis-aligned or at 45°, so rays rarely graze the vertices of
/// shapes built on a grid.
const RAY_ANGLES: [f64; 8] = [0.2913, 1.1071, 1.9634, 2.8198, 3.5871, 4.2981, 5.0323, 5.8421];

/// Maximum number of peel rounds in [`PathList::normalize`].
const MAX_PEEL_ROUNDS: usize = 100;

/// A set of closed contours describing one region.
///
/// Contours may nest; a point belongs to the region when it is enclosed by
/// an odd number of them. After [`normalize`](PathList::normalize), outer
/// contours (and islands at even depth) run clockwise in a y-down space and
/// holes run counter-clockwise.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PathList {
    contours: Vec<Path>,
}

/// An intersection between contours of two path lists.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PathListIntersection {
    /// Index of the contour in the first list.
    pub contour: usize,
    /// Index of the contour in the second list.
    pub other_contour: usize,
    /// The intersection between the two contours.
    pub intersection: PathIntersection,
}

impl PathList {
    /// An empty region.
    pub fn new() -> PathList {
        PathList::default()
    }

    /// A region from its contours.
    pub fn from_paths(contours: impl IntoIterator<Item = Path>) -> PathList {
        PathList {
            contours: contours.into_iter().collect(),
        }
    }

    /// Add a contour.
    pub fn push(&mut self, contour: Path) {
        self.contours.push(contour);
    }

    /// The contours.
    #[inline]
    pub fn contours(&self) -> &[Path] {
        &self.contours
    }

    /// Iterate over the contours.
    #[inline]
    pub fn iter(&self) -> core::slice::Iter<'_, Path> {
        self.contours.iter()
    }

    /// The number of contours.
    #[inline]
    pub fn len(&self) -> usize {
        self.contours.len()
    }

    /// Whether there are no contours.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.contours.is_empty()
    }

    /// The only contour.
    ///
    /// # Panics
    ///
    /// Panics if the list does not hold exactly one contour.
    pub fn single(&self) -> &Path {
        assert_eq!(
            self.contours.len(),
            1,
            "PathList::single called on a list of {} contours",
            self.contours.len()
        );
        &self.contours[0]
    }

    /// The number of contours enclosing `p`.
    pub fn containment_depth(&self, p: Point) -> usize {
        self.contours
            .iter()
            .filter(|c| contour_contains(c, p))
            .count()
    }

    /// Whether `p` lies in the region.
    pub fn is_inside(&self, p: Point) -> bool {
        self.containment_depth(p) % 2 == 1
    }

    /// Whether `p` lies in a hole of the region, rather than outside it.
    pub fn is_in_hole(&self, p: Point) -> bool {
        let depth = self.containment_depth(p);
        depth >= 2 && depth % 2 == 0
    }

    /// The smallest rectangle enclosing every contour.
    ///
    /// Returns `None` for an empty list.
    pub fn bounding_box(&self) -> Option<Rect> {
        self.contours
            .iter()
            .map(Path::bounding_box)
            .reduce(|a, b| a.union(b))
    }

    /// The sum of the contours' signed areas.
    ///
    /// For a normalized list this is the area of the region, holes
    /// subtracted.
    pub fn area(&self) -> f64 {
        self.contours.iter().map(Path::signed_area).sum()
    }

    /// All intersections between contours of two lists.
    pub fn intersections(&self, other: &PathList) -> Vec<PathListIntersection> {
        let mut result = Vec::new();
        for (i, a) in self.contours.iter().enumerate() {
            for (j, b) in other.contours.iter().enumerate() {
                result.extend(a.intersections(b).into_iter().map(|intersection| {
                    PathListIntersection {
                        contour: i,
                        other_contour: j,
                        intersection,
                    }
                }));
            }
        }
        result
    }

    /// The nearest point on any contour, with that contour's index.
    pub fn nearest(&self, p: Point) -> Option<(usize, PathNearest)> {
        self.contours
            .iter()
            .enumerate()
            .filter_map(|(i, c)| c.nearest(p).map(|n| (i, n)))
            .min_by(|a, b| a.1.distance.total_cmp(&b.1.distance))
    }

    /// Orient the contours by nesting depth.
    ///
    /// A contour is inside another when each of its segment start points is
    /// inside or on the other. Contours are then peeled from the outside in:
    /// each round takes every contour whose containers have all been taken
    /// already. Contours peeled in an even round run clockwise (y-down),
    /// those in an odd round counter-clockwise; contours that disagree are
    /// reversed. Contours without segments are dropped.
    ///
    /// # Errors
    ///
    /// [`BooleanError::ContainmentCycle`] if a round peels nothing, or more
    /// than 100 rounds are needed. This happens for contours that contain
    /// each other, such as duplicates.
    pub fn normalize(&self) -> Result<PathList, BooleanError> {
        let contours: Vec<&Path> = self.contours.iter().filter(|c| !c.is_empty()).collect();
        let n = contours.len();
        let bboxes: Vec<Rect> = contours.iter().map(|c| c.bounding_box()).collect();
        let containers: Vec<Vec<usize>> = (0..n)
            .map(|i| {
                (0..n)
                    .filter(|&j| j != i && contour_inside(contours[i], bboxes[i], contours[j], bboxes[j]))
                    .collect()
            })
            .collect();

        let mut depth: Vec<Option<usize>> = alloc::vec![None; n];
        let mut remaining = n;
        let mut round = 0;
        while remaining > 0 {
            if round >= MAX_PEEL_ROUNDS {
                return Err(BooleanError::ContainmentCycle);
            }
            let peel: Vec<usize> = (0..n)
                .filter(|&i| depth[i].is_none() && containers[i].iter().all(|&j| depth[j].is_some()))
                .collect();
            if peel.is_empty() {
                debug!("normalize: {remaining} contours contain each other");
                return Err(BooleanError::ContainmentCycle);
            }
            for &i in &peel {
                depth[i] = Some(round);
            }
            remaining -= peel.len();
            round += 1;
        }

        let contours = contours
            .iter()
            .zip(depth)
            .map(|(c, d)| {
                let want_clockwise = d.unwrap_or(0) % 2 == 0;
                if c.is_clockwise() == want_clockwise {
                    (*c).clone()
                } else {
                    trace!("normalize: reversing contour at depth {d:?}");
                    c.reverse()
                }
            })
            .collect();
        Ok(PathList { contours })
    }
}

impl<'a> IntoIterator for &'a PathList {
    type Item = &'a Path;
    type IntoIter = core::slice::Iter<'a, Path>;

    fn into_iter(self) -> Self::IntoIter {
        self.contours.iter()
    }
}

impl FromIterator<Path> for PathList {
    fn from_iter<T: IntoIterator<Item = Path>>(iter: T) -> PathList {
        PathList::from_paths(iter)
    }
}

impl From<Path> for PathList {
    fn from(path: Path) -> PathList {
        PathList {
            contours: alloc::vec![path],
        }
    }
}

/// Whether every segment start of `a` is inside or on `b`.
fn contour_inside(a: &Path, a_box: Rect, b: &Path, b_box: Rect) -> bool {
    if !b_box
        .inflate(POINT_EPSILON, POINT_EPSILON)
        .contains_rect(a_box)
    {
        return false;
    }
    !a.is_empty()
        && a
            .iter()
            .all(|seg| contour_contains(b, seg.start()) || is_on_contour(b, seg.start()))
}

/// Whether `p` lies within `POINT_EPSILON` of the contour.
pub(crate) fn is_on_contour(contour: &Path, p: Point) -> bool {
    contour
        .nearest(p)
        .is_some_and(|n| n.distance <= POINT_EPSILON)
}

/// Ray parity test of a single contour.
///
/// The contour is treated as closed. Rays that pass through a segment end
/// point, graze a curve, or run along an edge are ambiguous; another
/// direction is tried then, up to eight in all. If every direction is
/// ambiguous the last count is used.
pub(crate) fn contour_contains(contour: &Path, p: Point) -> bool {
    if contour.is_empty() {
        return false;
    }
    let bbox = contour.bounding_box();
    if !bbox.contains(p) {
        return false;
    }
    let reach = p.distance(bbox.center()) + bbox.width() + bbox.height() + 1.0;
    let mut last = false;
    for angle in RAY_ANGLES {
        match ray_parity(contour, p, Vec2::from_angle(angle), reach) {
            Ok(inside) => return inside,
            Err(count) => last = count % 2 == 1,
        }
    }
    trace!("contour_contains: every ray through {p:?} was ambiguous");
    last
}

/// Count crossings of a ray with the contour; `Err` carries the count of an
/// ambiguous ray.
fn ray_parity(contour: &Path, p: Point, dir: Vec2, reach: f64) -> Result<bool, usize> {
    let ray = PathSeg::Line(Line::new(p, p + dir * reach));
    let ray_box = ray.control_box();
    let closing = (!contour.is_closed())
        .then(|| PathSeg::Line(Line::new(contour.end(), contour.start())));
    let mut count = 0;
    let mut ambiguous = false;
    for seg in contour.iter().chain(closing.as_ref()) {
        if !seg.control_box().overlaps(ray_box) {
            continue;
        }
        if ray.overlaps(seg) {
            ambiguous = true;
            continue;
        }
        for x in ray.crossings(seg, DEFAULT_CURVE_ACCURACY) {
            let at_end = x.other_t == 0.0 || x.other_t == 1.0;
            let grazing = seg.tangent(x.other_t).cross(dir).abs() < 1e-6;
            if at_end || grazing {
                ambiguous = true;
            }
            count += 1;
        }
    }
    if ambiguous {
        Err(count)
    } else {
        Ok(count % 2 == 1)
    }
}
