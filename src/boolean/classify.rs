// Copyright 2018 the Kurbo Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Deciding which pieces of the graph belong to the result.

use log::{debug, trace};

use super::graph::{Graph, Label, Operand, Side};
use crate::{ParamCurve, ParamCurveNearest, PathList, PathSeg, Point, Vec2};

/// Largest sine of the angle between two directions that run along the
/// same boundary.
const PARALLEL_SINE: f64 = 1e-2;

impl Graph {
    /// Find the side of every piece and label those the result keeps.
    ///
    /// Each operand keeps its pieces inside the other one, or outside when
    /// its `invert` flag is set. A stretch the two boundaries share is kept
    /// once, through A's piece: when the boundaries run the same way it
    /// belongs to the result if both flags agree, when they run opposite
    /// ways if the flags differ. An operand that keeps its pieces inside
    /// while the other keeps its outside is traced backward.
    pub(crate) fn classify(&mut self, a: &PathList, b: &PathList, invert_a: bool, invert_b: bool) {
        let tolerance = self.tolerance();
        for id in self.ids() {
            let (other, invert, backward) = match self.operand(id) {
                Operand::A => (b, invert_a, !invert_a && invert_b),
                Operand::B => (a, invert_b, invert_a && !invert_b),
            };
            let piece = self[id].owned;
            if piece.is_degenerate() {
                continue;
            }
            let side = side_of(&piece, other, tolerance);
            let keep = match side {
                Side::Inside => !invert,
                Side::Outside => invert,
                Side::Coincident => self.operand(id) == Operand::A && invert_a == invert_b,
                Side::Opposite => self.operand(id) == Operand::A && invert_a != invert_b,
            };
            trace!("classify: vertex {} is {side:?}, kept {keep}", id.0);
            self[id].side = side;
            self[id].label = keep.then_some(if backward { Label::Backward } else { Label::Forward });
        }
        self.count_crossings();
    }

    /// Count, per ring, the intersections where the result switches between
    /// kept and dropped pieces.
    fn count_crossings(&mut self) {
        for ring in 0..self.rings().len() {
            let (head, len) = (self.rings()[ring].head, self.rings()[ring].len);
            let mut crossings = 0;
            let mut id = head;
            for _ in 0..len {
                let prev = self[id].prev;
                if self[id].neighbor.is_some()
                    && self[id].label.is_some() != self[prev].label.is_some()
                {
                    crossings += 1;
                }
                id = self[id].next;
            }
            if crossings % 2 == 1 {
                debug!("classify: ring {ring} has an odd number of crossings ({crossings})");
            }
            self.rings_mut()[ring].crossings = crossings;
        }
    }
}

/// Where `piece` lies relative to `region`.
///
/// A piece whose middle is on the region's boundary, running along it, is
/// [`Side::Coincident`] or [`Side::Opposite`]. Otherwise the first of its
/// middle and quarter points that is off the boundary decides between
/// inside and outside.
fn side_of(piece: &PathSeg, region: &PathList, tolerance: f64) -> Side {
    let mid = piece.eval(0.5);
    if let Some(along) = boundary_direction(region, mid, tolerance) {
        let dir = piece.tangent(0.5);
        if dir.cross(along).abs() <= PARALLEL_SINE {
            return if dir.dot(along) > 0.0 {
                Side::Coincident
            } else {
                Side::Opposite
            };
        }
    }
    let p = [0.5, 0.25, 0.75]
        .into_iter()
        .map(|t| piece.eval(t))
        .find(|&p| boundary_direction(region, p, tolerance).is_none())
        .unwrap_or(mid);
    if region.is_inside(p) {
        Side::Inside
    } else {
        Side::Outside
    }
}

/// The direction of `region`'s boundary at its closest point to `p`, if that
/// is within `tolerance`.
fn boundary_direction(region: &PathList, p: Point, tolerance: f64) -> Option<Vec2> {
    let mut best: Option<(f64, Vec2)> = None;
    for seg in region.iter().flat_map(|c| c.iter()) {
        if !seg.control_box().inflate(tolerance, tolerance).contains(p) {
            continue;
        }
        let nearest = seg.nearest(p, 1e-9);
        if nearest.distance_sq <= tolerance * tolerance
            && best.map_or(true, |(d, _)| nearest.distance_sq < d)
        {
            best = Some((nearest.distance_sq, seg.tangent(nearest.t)));
        }
    }
    best.map(|(_, dir)| dir)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::boolean::graph::VertexId;
    use crate::{Path, PathBuilder, Rect};
    use alloc::vec::Vec;

    /// The pieces of `operand`, in ring order.
    fn pieces(graph: &Graph, operand: Operand) -> impl Iterator<Item = VertexId> + '_ {
        graph.ids().filter(move |&v| graph.operand(v) == operand)
    }

    fn square(x0: f64, y0: f64, x1: f64, y1: f64) -> PathList {
        PathBuilder::new().rect(Rect::new(x0, y0, x1, y1)).build()
    }

    fn classified(a: &PathList, b: &PathList, invert_a: bool, invert_b: bool) -> Graph {
        let mut graph = Graph::build(a, b, 0.1, false);
        graph.classify(a, b, invert_a, invert_b);
        graph
    }

    fn sides(graph: &Graph, operand: Operand) -> Vec<Side> {
        pieces(graph, operand).map(|v| graph[v].side).collect()
    }

    fn labels(graph: &Graph, operand: Operand) -> Vec<Option<Label>> {
        pieces(graph, operand).map(|v| graph[v].label).collect()
    }

    #[test]
    fn crossing_squares() {
        use Side::{Inside, Outside};
        let a = square(0.0, 0.0, 10.0, 10.0);
        let b = square(5.0, 5.0, 15.0, 15.0);
        let graph = classified(&a, &b, false, false);
        // A enters B halfway down its right edge and leaves halfway along
        // its bottom edge.
        assert_eq!(
            sides(&graph, Operand::A),
            [Outside, Outside, Inside, Inside, Outside, Outside]
        );
        assert_eq!(
            sides(&graph, Operand::B),
            [Inside, Outside, Outside, Outside, Outside, Inside]
        );
        let f = Some(Label::Forward);
        assert_eq!(labels(&graph, Operand::A), [None, None, f, f, None, None]);
        assert!(graph.rings().iter().all(|r| r.crossings == 2));

        let graph = classified(&a, &b, true, false);
        let back = Some(Label::Backward);
        assert_eq!(labels(&graph, Operand::A), [f, f, None, None, f, f]);
        assert_eq!(
            labels(&graph, Operand::B),
            [back, None, None, None, None, back]
        );
    }

    #[test]
    fn shared_edge_running_opposite_ways() {
        let a = square(0.0, 0.0, 10.0, 10.0);
        let b = square(10.0, 0.0, 20.0, 10.0);
        let shared = |graph: &Graph, operand| {
            pieces(graph, operand)
                .find(|&v| graph[v].side == Side::Opposite)
                .unwrap()
        };
        let graph = classified(&a, &b, true, true);
        let edge = shared(&graph, Operand::A);
        assert_eq!(graph[edge].point, Point::new(10.0, 0.0));
        assert_eq!(graph[edge].label, None);
        assert_eq!(graph[shared(&graph, Operand::B)].label, None);
        assert!(graph.rings().iter().all(|r| r.crossings == 2));

        let graph = classified(&a, &b, true, false);
        assert_eq!(graph[shared(&graph, Operand::A)].label, Some(Label::Forward));
        let graph = classified(&a, &b, false, true);
        assert_eq!(graph[shared(&graph, Operand::A)].label, Some(Label::Backward));
        assert_eq!(graph[shared(&graph, Operand::B)].label, None);
    }

    #[test]
    fn shared_edge_running_the_same_way() {
        let a = square(0.0, 0.0, 10.0, 10.0);
        let b = square(5.0, 0.0, 15.0, 10.0);
        for (invert_a, invert_b, kept) in [
            (false, false, true),
            (true, true, true),
            (true, false, false),
            (false, true, false),
        ] {
            let graph = classified(&a, &b, invert_a, invert_b);
            let along: Vec<VertexId> = pieces(&graph, Operand::A)
                .filter(|&v| graph[v].side == Side::Coincident)
                .collect();
            assert_eq!(along.len(), 2);
            for v in along {
                assert_eq!(graph[v].label.is_some(), kept);
            }
            assert!(pieces(&graph, Operand::B)
                .filter(|&v| graph[v].side == Side::Coincident)
                .all(|v| graph[v].label.is_none()));
        }
    }

    #[test]
    fn ring_made_only_of_intersections() {
        let a = square(0.0, 0.0, 10.0, 10.0);
        let diamond = PathList::from(Path::polygon(&[
            Point::new(5.0, 0.0),
            Point::new(10.0, 5.0),
            Point::new(5.0, 10.0),
            Point::new(0.0, 5.0),
        ]));
        let graph = classified(&a, &diamond, false, false);
        assert!(pieces(&graph, Operand::B)
            .all(|v| graph[v].neighbor.is_some() && graph[v].side == Side::Inside));
        assert!(pieces(&graph, Operand::A).all(|v| graph[v].side == Side::Outside));
        assert!(pieces(&graph, Operand::B)
            .all(|v| graph[v].label == Some(Label::Forward)));
        assert!(graph.rings().iter().all(|r| r.crossings == 0));
    }
}
