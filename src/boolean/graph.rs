// Copyright 2018 the Kurbo Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The intersection graph.
//!
//! Every contour of both operands becomes a ring of vertices: one vertex at
//! the start of each segment, plus one per intersection with the other
//! operand, ordered along the segment. The two vertices standing for the
//! same intersection point at each other through `neighbor`. Each vertex
//! owns the piece of its segment running up to the next vertex, so a ring
//! traces its contour exactly, starting at the contour's start point.

use alloc::vec;
use alloc::vec::Vec;
use core::ops::{Index, IndexMut};

use log::{debug, trace};

use crate::approx::POINT_EPSILON;
use crate::{BooleanError, GraphFault, Line, ParamCurve, Path, PathList, PathSeg, Point};

/// Which side of the operation a ring belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Operand {
    A,
    B,
}

/// Where a vertex's piece lies relative to the other operand.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Side {
    Inside,
    Outside,
    /// Along the other operand's boundary, running the same way.
    Coincident,
    /// Along the other operand's boundary, running the opposite way.
    Opposite,
}

/// How a piece kept for the result is traversed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Label {
    Forward,
    Backward,
}

/// Index of a vertex in its graph.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub(crate) struct VertexId(pub(crate) usize);

#[derive(Clone, Debug)]
pub(crate) struct Vertex {
    pub(crate) point: Point,
    pub(crate) ring: usize,
    /// Index of the segment in the original contour.
    pub(crate) segment: usize,
    /// Parameter of `point` on that segment; never 1.
    pub(crate) alpha: f64,
    pub(crate) prev: VertexId,
    pub(crate) next: VertexId,
    /// The vertex at the same intersection in the other operand.
    pub(crate) neighbor: Option<VertexId>,
    pub(crate) side: Side,
    /// Set when the owned piece belongs to the result.
    pub(crate) label: Option<Label>,
    /// The piece of the segment from this vertex to the next one.
    pub(crate) owned: PathSeg,
}

#[derive(Clone, Debug)]
pub(crate) struct Ring {
    pub(crate) operand: Operand,
    pub(crate) contour: usize,
    /// The vertex at the contour's start point.
    pub(crate) head: VertexId,
    pub(crate) len: usize,
    /// Intersections where the result switches between this ring and the
    /// other operand, found by classification.
    pub(crate) crossings: usize,
}

/// A location on a contour.
#[derive(Clone, Copy, Debug)]
struct Location {
    contour: usize,
    segment: usize,
    alpha: f64,
}

impl Location {
    /// A location with `alpha == 1` moved to the start of the next segment.
    fn on(contour: &Path, index: usize, segment: usize, alpha: f64) -> Location {
        if alpha >= 1.0 {
            Location {
                contour: index,
                segment: (segment + 1) % contour.len(),
                alpha: 0.0,
            }
        } else {
            Location {
                contour: index,
                segment,
                alpha,
            }
        }
    }
}

/// An intersection between a contour of A and a contour of B.
#[derive(Clone, Copy, Debug)]
struct Hit {
    a: Location,
    b: Location,
    point: Point,
    /// Distance within which another hit is the same one.
    tolerance: f64,
}

impl Hit {
    fn location(&self, operand: Operand) -> Location {
        match operand {
            Operand::A => self.a,
            Operand::B => self.b,
        }
    }

    /// Hits between the same two contours at the same point are one hit,
    /// whichever segments reported them.
    fn same_place(&self, other: &Hit) -> bool {
        self.a.contour == other.a.contour
            && self.b.contour == other.b.contour
            && self.point.distance(other.point) <= self.tolerance.max(other.tolerance)
    }

    /// How many of the two locations sit exactly on a segment start.
    fn snapped(&self) -> usize {
        usize::from(self.a.alpha == 0.0) + usize::from(self.b.alpha == 0.0)
    }
}

/// Rings for both operands, cross-linked at their intersections.
#[derive(Clone, Debug, Default)]
pub(crate) struct Graph {
    vertices: Vec<Vertex>,
    rings: Vec<Ring>,
    /// Distance below which two points are the same point.
    tolerance: f64,
}

impl Graph {
    /// Find the intersections of `a` and `b` and build the rings.
    ///
    /// Contours are expected to be closed and free of degenerate segments.
    pub(crate) fn build(a: &PathList, b: &PathList, accuracy: f64, overlaps: bool) -> Graph {
        let size = match (a.bounding_box(), b.bounding_box()) {
            (Some(x), Some(y)) => Some(x.union(y)),
            (x, y) => x.or(y),
        }
        .map_or(0.0, |bbox| bbox.width().max(bbox.height()));
        let tolerance = POINT_EPSILON * (1.0 + size);
        let hits = discover(a.contours(), b.contours(), accuracy, overlaps, tolerance);
        debug!("graph: {} intersections", hits.len());
        let mut graph = Graph {
            tolerance,
            ..Graph::default()
        };
        let a_ids = graph.push_rings(Operand::A, a.contours(), &hits);
        let b_ids = graph.push_rings(Operand::B, b.contours(), &hits);
        for (va, vb) in a_ids.into_iter().zip(b_ids) {
            graph[va].neighbor = Some(vb);
            graph[vb].neighbor = Some(va);
        }
        graph.cut_segments(a.contours(), b.contours());
        graph
    }

    /// Append one ring per contour, returning the vertex made for each hit.
    fn push_rings(&mut self, operand: Operand, contours: &[Path], hits: &[Hit]) -> Vec<VertexId> {
        let mut ids = vec![VertexId(0); hits.len()];
        for (ci, contour) in contours.iter().enumerate() {
            let mut on_contour: Vec<usize> = (0..hits.len())
                .filter(|&h| hits[h].location(operand).contour == ci)
                .collect();
            on_contour.sort_by(|&x, &y| {
                let (lx, ly) = (hits[x].location(operand), hits[y].location(operand));
                lx.segment
                    .cmp(&ly.segment)
                    .then(lx.alpha.total_cmp(&ly.alpha))
            });

            let ring = self.rings.len();
            let first = self.vertices.len();
            let mut pending = on_contour.iter().peekable();
            for (si, seg) in contour.iter().enumerate() {
                let starts_with_hit = pending.peek().is_some_and(|&&h| {
                    let loc = hits[h].location(operand);
                    loc.segment == si && loc.alpha == 0.0
                });
                if !starts_with_hit {
                    self.push_vertex(ring, si, 0.0, seg.start());
                }
                while let Some(&&h) = pending.peek() {
                    let loc = hits[h].location(operand);
                    if loc.segment != si {
                        break;
                    }
                    ids[h] = VertexId(self.vertices.len());
                    self.push_vertex(ring, si, loc.alpha, hits[h].point);
                    pending.next();
                }
            }

            let len = self.vertices.len() - first;
            if len == 0 {
                continue;
            }
            for i in 0..len {
                let v = &mut self.vertices[first + i];
                v.prev = VertexId(first + (i + len - 1) % len);
                v.next = VertexId(first + (i + 1) % len);
            }
            self.rings.push(Ring {
                operand,
                contour: ci,
                head: VertexId(first),
                len,
                crossings: 0,
            });
        }
        ids
    }

    fn push_vertex(&mut self, ring: usize, segment: usize, alpha: f64, point: Point) {
        let id = VertexId(self.vertices.len());
        self.vertices.push(Vertex {
            point,
            ring,
            segment,
            alpha,
            prev: id,
            next: id,
            neighbor: None,
            side: Side::Outside,
            label: None,
            owned: PathSeg::Line(Line::new(point, point)),
        });
    }

    /// Give every vertex the piece of its segment up to the next vertex.
    fn cut_segments(&mut self, a: &[Path], b: &[Path]) {
        for id in self.ids() {
            let v = &self[id];
            let next = &self[v.next];
            let ring = &self.rings[v.ring];
            let contour = match ring.operand {
                Operand::A => &a[ring.contour],
                Operand::B => &b[ring.contour],
            };
            let seg = contour.segments()[v.segment];
            let end = if v.next != id && next.segment == v.segment && next.alpha >= v.alpha {
                next.alpha
            } else {
                1.0
            };
            let piece = if v.alpha == 0.0 && end == 1.0 {
                seg
            } else {
                seg.subsegment(v.alpha..end)
            };
            let owned = piece.with_endpoints(v.point, next.point);
            trace!("cut: vertex {} owns {:?}", id.0, v.alpha..end);
            self[id].owned = owned;
        }
    }

    /// Check the structure of the graph.
    ///
    /// Every vertex must sit in exactly one ring, rings must close, `prev`
    /// must undo `next`, neighbors must point at each other and each owned
    /// piece must end where the next vertex starts.
    pub(crate) fn verify(&self) -> Result<(), BooleanError> {
        let broken = |fault, id: VertexId| BooleanError::BrokenGraph { fault, vertex: id.0 };
        let mut seen = vec![false; self.vertices.len()];
        for (index, ring) in self.rings.iter().enumerate() {
            let mut id = ring.head;
            for _ in 0..ring.len {
                if seen[id.0] || self[id].ring != index {
                    return Err(broken(GraphFault::RingMembership, id));
                }
                seen[id.0] = true;
                let v = &self[id];
                if self[v.next].prev != id {
                    return Err(broken(GraphFault::Linkage, id));
                }
                let next = &self[v.next];
                let bbox = v.owned.control_box();
                let tolerance = POINT_EPSILON * (1.0 + bbox.width() + bbox.height());
                if v.owned.start().distance(v.point) > tolerance
                    || v.owned.end().distance(next.point) > tolerance
                {
                    return Err(broken(GraphFault::SegmentGap, id));
                }
                id = v.next;
            }
            if id != ring.head {
                return Err(broken(GraphFault::OpenRing, ring.head));
            }
        }
        if let Some(lost) = seen.iter().position(|s| !s) {
            return Err(broken(GraphFault::RingMembership, VertexId(lost)));
        }
        for id in self.ids() {
            if let Some(n) = self[id].neighbor {
                if self[n].neighbor != Some(id) {
                    return Err(broken(GraphFault::NeighborNotMutual, id));
                }
            }
        }
        Ok(())
    }

    pub(crate) fn ids(&self) -> impl Iterator<Item = VertexId> {
        (0..self.vertices.len()).map(VertexId)
    }

    pub(crate) fn len(&self) -> usize {
        self.vertices.len()
    }

    pub(crate) fn rings(&self) -> &[Ring] {
        &self.rings
    }

    pub(crate) fn rings_mut(&mut self) -> &mut [Ring] {
        &mut self.rings
    }

    pub(crate) fn tolerance(&self) -> f64 {
        self.tolerance
    }

    pub(crate) fn operand(&self, id: VertexId) -> Operand {
        self.rings[self[id].ring].operand
    }
}

impl Index<VertexId> for Graph {
    type Output = Vertex;

    fn index(&self, id: VertexId) -> &Vertex {
        &self.vertices[id.0]
    }
}

impl IndexMut<VertexId> for Graph {
    fn index_mut(&mut self, id: VertexId) -> &mut Vertex {
        &mut self.vertices[id.0]
    }
}

/// Intersect every segment of `a` with every segment of `b`.
///
/// A hit at the very end of a segment is recorded at the start of the next
/// one. Hits at a segment start take the exact start point. A point
/// reported more than once for the same pair of contours, by neighboring
/// segments or by an overlap end next to a crossing, is kept once,
/// preferring the report that sits on segment starts. Curve/curve hits are
/// only located to within `accuracy`, so that is their merge distance;
/// everything else merges within `tolerance`.
fn discover(
    a: &[Path],
    b: &[Path],
    accuracy: f64,
    overlaps: bool,
    tolerance: f64,
) -> Vec<Hit> {
    let mut hits: Vec<Hit> = Vec::new();
    for (ia, ca) in a.iter().enumerate() {
        let box_a = ca.bounding_box();
        for (ib, cb) in b.iter().enumerate() {
            if !box_a.overlaps(cb.bounding_box()) {
                continue;
            }
            for (sa, seg_a) in ca.iter().enumerate() {
                let seg_box = seg_a.control_box();
                for (sb, seg_b) in cb.iter().enumerate() {
                    if !seg_box.overlaps(seg_b.control_box()) {
                        continue;
                    }
                    let curves = matches!((seg_a, seg_b), (PathSeg::Cubic(_), PathSeg::Cubic(_)));
                    for x in seg_a.intersect(seg_b, accuracy, overlaps) {
                        let la = Location::on(ca, ia, sa, x.t);
                        let lb = Location::on(cb, ib, sb, x.other_t);
                        let point = if la.alpha == 0.0 {
                            ca.segments()[la.segment].start()
                        } else if lb.alpha == 0.0 {
                            cb.segments()[lb.segment].start()
                        } else {
                            x.point
                        };
                        let hit = Hit {
                            a: la,
                            b: lb,
                            point,
                            tolerance: if curves { accuracy.max(tolerance) } else { tolerance },
                        };
                        match hits.iter_mut().find(|h| h.same_place(&hit)) {
                            Some(seen) => {
                                if hit.snapped() > seen.snapped() {
                                    *seen = hit;
                                }
                            }
                            None => {
                                trace!("discover: {:?} between a{ia}.{sa} and b{ib}.{sb}", point);
                                hits.push(hit);
                            }
                        }
                    }
                }
            }
        }
    }
    hits
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Point, Rect};

    fn square(x0: f64, y0: f64, x1: f64, y1: f64) -> PathList {
        crate::PathBuilder::new()
            .rect(Rect::new(x0, y0, x1, y1))
            .build()
    }

    #[test]
    fn crossing_squares() {
        let a = square(0.0, 0.0, 10.0, 10.0);
        let b = square(5.0, 5.0, 15.0, 15.0);
        let graph = Graph::build(&a, &b, 0.1, false);
        assert_eq!(graph.rings().len(), 2);
        assert_eq!(graph.rings()[0].len, 6);
        assert_eq!(graph.rings()[1].len, 6);
        assert_eq!(graph.verify(), Ok(()));
        let linked: Vec<VertexId> = graph.ids().filter(|&v| graph[v].neighbor.is_some()).collect();
        assert_eq!(linked.len(), 4);
        for v in linked {
            let n = graph[v].neighbor.unwrap();
            assert_eq!(graph[v].point, graph[n].point);
            assert_ne!(graph.operand(v), graph.operand(n));
        }
        let corner = graph
            .ids()
            .find(|&v| graph[v].point.distance(Point::new(10.0, 5.0)) < 1e-9)
            .unwrap();
        assert!((graph[corner].alpha - 0.5).abs() < 1e-9);
    }

    #[test]
    fn owned_pieces_chain() {
        let a = square(0.0, 0.0, 10.0, 10.0);
        let b = square(5.0, -5.0, 15.0, 5.0);
        let graph = Graph::build(&a, &b, 0.1, false);
        for ring in graph.rings() {
            let mut id = ring.head;
            let mut area = 0.0;
            for _ in 0..ring.len {
                assert_eq!(graph[id].owned.end(), graph[graph[id].next].point);
                area += crate::ParamCurveArea::signed_area(&graph[id].owned);
                id = graph[id].next;
            }
            assert!((area - 100.0).abs() < 1e-9);
        }
    }

    #[test]
    fn vertex_on_edge_is_recorded_once() {
        let a = square(0.0, 0.0, 10.0, 10.0);
        // A triangle whose apex touches the right edge of `a`.
        let b = PathList::from(Path::polygon(&[
            Point::new(10.0, 5.0),
            Point::new(20.0, 0.0),
            Point::new(20.0, 10.0),
        ]));
        let graph = Graph::build(&a, &b, 0.1, false);
        let linked = graph.ids().filter(|&v| graph[v].neighbor.is_some()).count();
        assert_eq!(linked, 2);
        assert_eq!(graph.rings()[0].len, 5);
        // The apex takes the place of the triangle's first vertex.
        assert_eq!(graph.rings()[1].len, 3);
        let head = graph.rings()[1].head;
        assert_eq!(graph[head].point, Point::new(10.0, 5.0));
        assert!(graph[head].neighbor.is_some());
        assert_eq!(graph.verify(), Ok(()));
    }

    #[test]
    fn shared_edge_ends_are_linked_once() {
        let a = square(0.0, 0.0, 10.0, 10.0);
        let b = square(5.0, 0.0, 15.0, 10.0);
        for overlaps in [false, true] {
            let graph = Graph::build(&a, &b, 0.1, overlaps);
            let linked: Vec<Point> = graph
                .ids()
                .filter(|&v| graph.operand(v) == Operand::A && graph[v].neighbor.is_some())
                .map(|v| graph[v].point)
                .collect();
            assert_eq!(
                linked,
                [
                    Point::new(5.0, 0.0),
                    Point::new(10.0, 0.0),
                    Point::new(10.0, 10.0),
                    Point::new(5.0, 10.0),
                ]
            );
            assert_eq!(graph.verify(), Ok(()));
        }
    }

    #[test]
    fn tangent_circles_touch_once() {
        let circle = |x: f64| crate::PathBuilder::new().ellipse((x, 0.0), 50.0, 50.0).build();
        let graph = Graph::build(&circle(0.0), &circle(100.0), 0.1, false);
        let linked: Vec<VertexId> = graph.ids().filter(|&v| graph[v].neighbor.is_some()).collect();
        assert_eq!(linked.len(), 2);
        for v in linked {
            assert_eq!(graph[v].alpha, 0.0);
            assert_eq!(graph[v].point, Point::new(50.0, 0.0));
        }
        assert_eq!(graph.verify(), Ok(()));
    }

    #[test]
    fn broken_links_are_reported() {
        let a = square(0.0, 0.0, 10.0, 10.0);
        let b = square(5.0, 5.0, 15.0, 15.0);
        let mut graph = Graph::build(&a, &b, 0.1, false);
        let v = graph.ids().find(|&v| graph[v].neighbor.is_some()).unwrap();
        graph[v].neighbor = Some(VertexId(0));
        assert_eq!(
            graph.verify(),
            Err(BooleanError::BrokenGraph {
                fault: GraphFault::NeighborNotMutual,
                vertex: v.0,
            })
        );

        let mut graph = Graph::build(&a, &b, 0.1, false);
        let next = graph[VertexId(0)].next;
        graph[next].prev = next;
        assert_eq!(
            graph.verify(),
            Err(BooleanError::BrokenGraph {
                fault: GraphFault::Linkage,
                vertex: 0,
            })
        );
    }
}
