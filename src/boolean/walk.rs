// Copyright 2018 the Kurbo Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tracing result contours through a classified graph.

use alloc::vec;
use alloc::vec::Vec;

use log::{debug, trace};

use super::graph::{Graph, Label, VertexId};
use super::ClipOptions;
use crate::{BooleanError, GraphFault, Path};

/// One kept piece leaving a vertex.
#[derive(Clone, Copy, Debug)]
struct Step {
    /// The vertex owning the piece.
    piece: VertexId,
    /// Where the piece arrives.
    to: VertexId,
    backward: bool,
}

impl Graph {
    /// Chain every kept piece into closed contours.
    ///
    /// Contours are started at intersections first, in vertex order, then
    /// at any vertex with kept pieces left. From each vertex the walk takes
    /// an unused kept piece on its own ring if there is one, then one on
    /// its neighbor's ring, then one at any other vertex at the same point.
    /// A contour is done when the walk is back at its first point.
    ///
    /// # Errors
    ///
    /// [`BooleanError::IterationLimit`] if more contours, or more steps in a
    /// single contour, are needed than `options` allow. Both limits are at
    /// least the number of vertices. A walk that cannot continue is a
    /// [`GraphFault::DeadEnd`].
    pub(crate) fn walk(&self, options: &ClipOptions) -> Result<Vec<Path>, BooleanError> {
        let contour_limit = options.max_contours.max(self.len());
        let step_limit = options.max_walk_steps.max(self.len());
        let mut used = vec![false; self.len()];
        let mut contours = Vec::new();
        let linked = self.ids().filter(|&v| self[v].neighbor.is_some());
        for start in linked.chain(self.ids()) {
            while self.step_from(start, &used, false).is_some() {
                if contours.len() >= contour_limit {
                    return Err(BooleanError::IterationLimit {
                        limit: contour_limit,
                    });
                }
                contours.push(self.walk_contour(start, &mut used, step_limit)?);
            }
        }
        debug!("walk: {} contours", contours.len());
        Ok(contours)
    }

    fn walk_contour(
        &self,
        start: VertexId,
        used: &mut [bool],
        limit: usize,
    ) -> Result<Path, BooleanError> {
        let mut path = Path::new(self[start].point);
        let mut at = start;
        for _ in 0..limit {
            let Some(step) = self.step_from(at, used, !path.is_empty()) else {
                return Err(BooleanError::BrokenGraph {
                    fault: GraphFault::DeadEnd,
                    vertex: at.0,
                });
            };
            trace!("walk: {:?} via vertex {}", self[at].point, step.piece.0);
            used[step.piece.0] = true;
            let owned = self[step.piece].owned;
            path.push(if step.backward { owned.reverse() } else { owned });
            at = step.to;
            if self.closes(at, start, path.len()) {
                return Ok(path);
            }
        }
        Err(BooleanError::IterationLimit { limit })
    }

    /// Whether arriving at `at` closes the contour begun at `start`.
    fn closes(&self, at: VertexId, start: VertexId, steps: usize) -> bool {
        at == start
            || self[at].neighbor == Some(start)
            || (steps > 1 && self[at].point.distance(self[start].point) <= self.tolerance())
    }

    /// The next unused kept piece leaving `at`.
    ///
    /// `nearby` extends the search to other vertices at the same point.
    fn step_from(&self, at: VertexId, used: &[bool], nearby: bool) -> Option<Step> {
        let own = |v: VertexId| {
            let prev = self[v].prev;
            let forward = (self[v].label == Some(Label::Forward) && !used[v.0]).then_some(Step {
                piece: v,
                to: self[v].next,
                backward: false,
            });
            let backward = (self[prev].label == Some(Label::Backward) && !used[prev.0])
                .then_some(Step {
                    piece: prev,
                    to: prev,
                    backward: true,
                });
            forward.or(backward)
        };
        own(at)
            .or_else(|| self[at].neighbor.and_then(own))
            .or_else(|| {
                if !nearby {
                    return None;
                }
                let p = self[at].point;
                self.ids()
                    .filter(|&v| v != at && self[v].point.distance(p) <= self.tolerance())
                    .find_map(own)
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ParamCurve, PathBuilder, PathList, Point, Rect};

    fn square(x0: f64, y0: f64, x1: f64, y1: f64) -> PathList {
        PathBuilder::new().rect(Rect::new(x0, y0, x1, y1)).build()
    }

    fn classified(a: &PathList, b: &PathList, invert_a: bool, invert_b: bool) -> Graph {
        let mut graph = Graph::build(a, b, 0.1, false);
        graph.classify(a, b, invert_a, invert_b);
        graph
    }

    fn walk(a: &PathList, b: &PathList, invert_a: bool, invert_b: bool) -> Vec<Path> {
        classified(a, b, invert_a, invert_b)
            .walk(&ClipOptions::default())
            .unwrap()
    }

    #[test]
    fn overlap_of_two_squares() {
        let a = square(0.0, 0.0, 10.0, 10.0);
        let b = square(5.0, 5.0, 15.0, 15.0);
        let contours = walk(&a, &b, false, false);
        assert_eq!(contours.len(), 1);
        let c = &contours[0];
        assert!(c.is_closed());
        assert!(c.start().distance(Point::new(10.0, 5.0)) < 1e-9);
        let corners = [
            Point::new(10.0, 10.0),
            Point::new(5.0, 10.0),
            Point::new(5.0, 5.0),
            Point::new(10.0, 5.0),
        ];
        assert_eq!(c.len(), corners.len());
        for (seg, corner) in c.iter().zip(corners) {
            assert!(seg.end().distance(corner) < 1e-9);
        }
        assert!((c.signed_area() - 25.0).abs() < 1e-9);
    }

    #[test]
    fn union_of_two_squares() {
        let a = square(0.0, 0.0, 10.0, 10.0);
        let b = square(5.0, 5.0, 15.0, 15.0);
        let contours = walk(&a, &b, true, true);
        assert_eq!(contours.len(), 1);
        assert!(contours[0].is_closed());
        assert!((contours[0].signed_area().abs() - 175.0).abs() < 1e-9);
    }

    #[test]
    fn cross_splits_into_two() {
        // A wide bar minus a tall bar leaves two pieces.
        let a = square(0.0, 4.0, 20.0, 6.0);
        let b = square(9.0, 0.0, 11.0, 10.0);
        let contours = walk(&a, &b, true, false);
        assert_eq!(contours.len(), 2);
        for c in &contours {
            assert!(c.is_closed());
            assert!((c.signed_area().abs() - 18.0).abs() < 1e-9);
        }
    }

    #[test]
    fn shared_edge_is_crossed_by_both_rings() {
        let a = square(0.0, 0.0, 10.0, 10.0);
        let b = square(10.0, 0.0, 20.0, 10.0);
        let union = walk(&a, &b, true, true);
        assert_eq!(union.len(), 1);
        assert_eq!(union[0].len(), 6);
        assert!((union[0].signed_area() - 200.0).abs() < 1e-9);
        assert!(walk(&a, &b, false, false).is_empty());
        let b_not_a = walk(&a, &b, false, true);
        assert_eq!(b_not_a.len(), 1);
        assert!((b_not_a[0].signed_area() - 100.0).abs() < 1e-9);
    }

    #[test]
    fn untouched_ring_is_traced_from_its_start() {
        let a = square(0.0, 0.0, 10.0, 10.0);
        let b = square(20.0, 20.0, 30.0, 30.0);
        let contours = walk(&a, &b, true, true);
        assert_eq!(contours, [a.single().clone(), b.single().clone()]);
    }

    #[test]
    fn dead_end_is_reported() {
        let a = square(0.0, 0.0, 10.0, 10.0);
        let b = square(5.0, 5.0, 15.0, 15.0);
        let mut graph = classified(&a, &b, false, false);
        // Drop the kept piece along the bottom edge of `a`.
        let corner = graph
            .ids()
            .find(|&v| graph[v].point == Point::new(10.0, 10.0))
            .unwrap();
        graph[corner].label = None;
        assert_eq!(
            graph.walk(&ClipOptions::default()),
            Err(BooleanError::BrokenGraph {
                fault: GraphFault::DeadEnd,
                vertex: corner.0,
            })
        );
    }
}
