// Copyright 2018 the Kurbo Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Building path lists from drawing commands.

use alloc::vec::Vec;

use crate::arc::{Arc, SvgArc};
use crate::approx::point_is_equal;
use crate::{Affine, CubicBez, Line, Path, PathList, PathSeg, Point, QuadBez, Rect, Vec2};

/// Builds a [`PathList`] from move/line/curve/arc/close commands.
///
/// Every point passes through the builder's transform before it is stored,
/// so drawing code can work in its own coordinate space. Arcs are converted
/// in that space and the resulting cubics transformed, which is exact for
/// affine maps.
///
/// ```
/// use kurbo_boolean::{PathBuilder, Point};
///
/// let mut builder = PathBuilder::new();
/// builder
///     .move_to((0.0, 0.0))
///     .line_to((100.0, 0.0))
///     .line_to((100.0, 100.0))
///     .close();
/// let region = builder.build();
/// assert!(region.is_inside(Point::new(75.0, 25.0)));
/// ```
#[derive(Clone, Debug, Default)]
pub struct PathBuilder {
    transform: Affine,
    contours: Vec<Path>,
    current: Option<Path>,
    pen: Point,
    subpath_start: Point,
}

impl PathBuilder {
    /// A builder with the identity transform.
    pub fn new() -> PathBuilder {
        PathBuilder::default()
    }

    /// A builder that maps every point through `transform`.
    pub fn with_transform(transform: Affine) -> PathBuilder {
        PathBuilder {
            transform,
            ..Default::default()
        }
    }

    fn finish_contour(&mut self) {
        if let Some(path) = self.current.take() {
            if !path.is_empty() {
                self.contours.push(path);
            }
        }
    }

    fn push(&mut self, seg: PathSeg) {
        let pen = self.transform * self.pen;
        self.current.get_or_insert_with(|| Path::new(pen)).push(seg);
    }

    /// Start a new contour at `p`.
    pub fn move_to(&mut self, p: impl Into<Point>) -> &mut Self {
        self.finish_contour();
        let p = p.into();
        self.pen = p;
        self.subpath_start = p;
        self.current = Some(Path::new(self.transform * p));
        self
    }

    /// Add a line to `p`.
    pub fn line_to(&mut self, p: impl Into<Point>) -> &mut Self {
        let p = p.into();
        let seg = self.transform * Line::new(self.pen, p);
        self.push(seg.into());
        self.pen = p;
        self
    }

    /// Add a quadratic Bézier; it is stored raised to a cubic.
    pub fn quad_to(&mut self, p1: impl Into<Point>, p2: impl Into<Point>) -> &mut Self {
        let p2 = p2.into();
        let quad = self.transform * QuadBez::new(self.pen, p1.into(), p2);
        self.push(quad.into());
        self.pen = p2;
        self
    }

    /// Add a cubic Bézier.
    pub fn curve_to(
        &mut self,
        p1: impl Into<Point>,
        p2: impl Into<Point>,
        p3: impl Into<Point>,
    ) -> &mut Self {
        let p3 = p3.into();
        let cubic = self.transform * CubicBez::new(self.pen, p1.into(), p2.into(), p3);
        self.push(cubic.into());
        self.pen = p3;
        self
    }

    /// Add an elliptical arc to `to`, with SVG's arc parameters.
    ///
    /// The arc becomes one to three cubics, each spanning at most 120°.
    /// An arc with a zero radius, or that ends where it starts, is a line.
    pub fn arc_to(
        &mut self,
        radii: impl Into<Vec2>,
        x_rotation: f64,
        large_arc: bool,
        sweep: bool,
        to: impl Into<Point>,
    ) -> &mut Self {
        let to = to.into();
        let svg_arc = SvgArc {
            from: self.pen,
            to,
            radii: radii.into(),
            x_rotation,
            large_arc,
            sweep,
        };
        let Some(arc) = Arc::from_svg_arc(&svg_arc) else {
            return self.line_to(to);
        };
        let mut cubics = arc.to_cubics();
        if let Some(first) = cubics.first_mut() {
            first.p0 = self.pen;
        }
        if let Some(last) = cubics.last_mut() {
            last.p3 = to;
        }
        for cubic in cubics {
            self.push((self.transform * cubic).into());
        }
        self.pen = to;
        self
    }

    /// Close the current contour with a line back to its start, if needed.
    pub fn close(&mut self) -> &mut Self {
        let has_segments = self.current.as_ref().is_some_and(|path| !path.is_empty());
        if has_segments && !point_is_equal(self.pen, self.subpath_start) {
            self.line_to(self.subpath_start);
        }
        self.finish_contour();
        self.pen = self.subpath_start;
        self
    }

    /// Add a closed axis-aligned rectangle, clockwise in a y-down space.
    pub fn rect(&mut self, rect: Rect) -> &mut Self {
        self.move_to((rect.x0, rect.y0))
            .line_to((rect.x1, rect.y0))
            .line_to((rect.x1, rect.y1))
            .line_to((rect.x0, rect.y1))
            .close()
    }

    /// Add a closed ellipse of four quarter arcs, clockwise in a y-down space.
    pub fn ellipse(&mut self, center: impl Into<Point>, rx: f64, ry: f64) -> &mut Self {
        let c = center.into();
        let radii = Vec2::new(rx, ry);
        self.move_to((c.x + rx, c.y))
            .arc_to(radii, 0.0, false, true, (c.x, c.y + ry))
            .arc_to(radii, 0.0, false, true, (c.x - rx, c.y))
            .arc_to(radii, 0.0, false, true, (c.x, c.y - ry))
            .arc_to(radii, 0.0, false, true, (c.x + rx, c.y))
            .close()
    }

    /// Take the contours built so far.
    ///
    /// An unclosed contour is kept as it is. The builder is left empty,
    /// keeping its transform.
    pub fn build(&mut self) -> PathList {
        self.finish_contour();
        PathList::from_paths(core::mem::take(&mut self.contours))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ParamCurve;
    use core::f64::consts::PI;

    #[test]
    fn rect_contour() {
        let region = PathBuilder::new()
            .rect(Rect::new(0.0, 0.0, 10.0, 20.0))
            .build();
        let path = region.single();
        assert_eq!(path.len(), 4);
        assert!(path.is_closed());
        assert!(path.is_clockwise());
        assert!((path.signed_area() - 200.0).abs() < 1e-12);
    }

    #[test]
    fn ellipse_area() {
        let region = PathBuilder::new().ellipse((0.0, 0.0), 50.0, 50.0).build();
        let path = region.single();
        assert_eq!(path.len(), 4);
        assert!(path.is_closed());
        let area = path.signed_area();
        assert!((area - PI * 2500.0).abs() < 2500.0 * 1e-3, "area {area}");
    }

    #[test]
    fn transform_applies_to_all_points() {
        let mut builder = PathBuilder::with_transform(Affine::translate((10.0, 5.0)));
        builder
            .move_to((0.0, 0.0))
            .quad_to((5.0, 10.0), (10.0, 0.0))
            .curve_to((10.0, 5.0), (5.0, 10.0), (0.0, 10.0))
            .close();
        let region = builder.build();
        let path = region.single();
        assert_eq!(path.start(), Point::new(10.0, 5.0));
        assert_eq!(path.segments()[0].end(), Point::new(20.0, 5.0));
        assert_eq!(path.len(), 3);
        assert!(path.is_closed());
    }

    #[test]
    fn arc_to_ends_exactly() {
        let mut builder = PathBuilder::new();
        builder
            .move_to((0.0, 0.0))
            .arc_to((50.0, 50.0), 0.0, true, true, (100.0, 0.0));
        let region = builder.build();
        let path = region.single();
        assert_eq!(path.end(), Point::new(100.0, 0.0));
        assert_eq!(path.len(), 2);
        // Zero radius degrades to a line.
        let mut builder = PathBuilder::new();
        builder.move_to((0.0, 0.0)).arc_to((0.0, 0.0), 0.0, false, false, (5.0, 0.0));
        let region = builder.build();
        assert!(matches!(region.single().segments()[0], PathSeg::Line(_)));
    }

    #[test]
    fn several_contours() {
        let mut builder = PathBuilder::new();
        builder.rect(Rect::new(0.0, 0.0, 10.0, 10.0));
        builder.move_to((20.0, 0.0)).line_to((30.0, 0.0));
        builder.move_to((40.0, 0.0));
        let region = builder.build();
        assert_eq!(region.len(), 2);
        assert!(!region.contours()[1].is_closed());
        assert!(builder.build().is_empty());
        assert_eq!(region.contours()[1].segments()[0].start(), Point::new(20.0, 0.0));
    }
}
