// Copyright 2019 the Kurbo Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Elliptical arcs, and their conversion to cubic Béziers.

use core::f64::consts::{FRAC_PI_2, PI};

use smallvec::SmallVec;

use crate::{CubicBez, Point, Vec2};

#[cfg(not(feature = "std"))]
use crate::common::FloatFuncs;

/// The widest angle covered by a single cubic when converting an arc.
const MAX_SPAN: f64 = 2.0 * PI / 3.0;

/// A single elliptical arc segment.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Arc {
    /// The arc's centre point.
    pub center: Point,
    /// The arc's radii, where the vector's x-component is the radius in the
    /// positive x direction after applying `x_rotation`.
    pub radii: Vec2,
    /// The start angle in radians.
    pub start_angle: f64,
    /// The angle between the start and end of the arc, in radians.
    pub sweep_angle: f64,
    /// How much the arc is rotated, in radians.
    pub x_rotation: f64,
}

/// An elliptical arc in SVG's endpoint parametrization.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SvgArc {
    /// The arc's start point.
    pub from: Point,
    /// The arc's end point.
    pub to: Point,
    /// The arc's radii, where the vector's x-component is the radius in the
    /// positive x direction after applying `x_rotation`.
    pub radii: Vec2,
    /// How much the arc is rotated, in radians.
    pub x_rotation: f64,
    /// Does this arc sweep through more than π radians?
    pub large_arc: bool,
    /// Determines if the arc should begin moving at positive angles.
    pub sweep: bool,
}

impl SvgArc {
    /// Checks that arc is actually a straight line.
    ///
    /// In this case, it can be replaced with a line.
    pub fn is_straight_line(&self) -> bool {
        self.radii.x.abs() <= 1e-5 || self.radii.y.abs() <= 1e-5 || self.from == self.to
    }
}

impl Arc {
    /// Creates an `Arc` from a `SvgArc`.
    ///
    /// Radii too small to reach from one end point to the other are scaled
    /// up. Returns `None` if `arc` is actually a straight line.
    pub fn from_svg_arc(arc: &SvgArc) -> Option<Arc> {
        if arc.is_straight_line() {
            return None;
        }

        let mut rx = arc.radii.x.abs();
        let mut ry = arc.radii.y.abs();

        let xr = arc.x_rotation % (2.0 * PI);
        let (sin_phi, cos_phi) = xr.sin_cos();
        let hd_x = (arc.from.x - arc.to.x) * 0.5;
        let hd_y = (arc.from.y - arc.to.y) * 0.5;
        let hs_x = (arc.from.x + arc.to.x) * 0.5;
        let hs_y = (arc.from.y + arc.to.y) * 0.5;

        let p = Vec2::new(
            cos_phi * hd_x + sin_phi * hd_y,
            -sin_phi * hd_x + cos_phi * hd_y,
        );

        let rf = p.x * p.x / (rx * rx) + p.y * p.y / (ry * ry);
        if rf > 1.0 {
            let scale = rf.sqrt();
            rx *= scale;
            ry *= scale;
        }

        let rxry = rx * ry;
        let rxpy = rx * p.y;
        let rypx = ry * p.x;
        let sum_of_sq = rxpy * rxpy + rypx * rypx;

        let sign_coe = if arc.large_arc == arc.sweep {
            -1.0
        } else {
            1.0
        };
        let coe = sign_coe * ((rxry * rxry - sum_of_sq) / sum_of_sq).abs().sqrt();
        let transformed_cx = coe * rxpy / ry;
        let transformed_cy = -coe * rypx / rx;

        let center = Point::new(
            cos_phi * transformed_cx - sin_phi * transformed_cy + hs_x,
            sin_phi * transformed_cx + cos_phi * transformed_cy + hs_y,
        );

        let start_v = Vec2::new((p.x - transformed_cx) / rx, (p.y - transformed_cy) / ry);
        let end_v = Vec2::new((-p.x - transformed_cx) / rx, (-p.y - transformed_cy) / ry);

        let start_angle = start_v.atan2();

        let mut sweep_angle = (end_v.atan2() - start_angle) % (2.0 * PI);

        if arc.sweep && sweep_angle < 0.0 {
            sweep_angle += 2.0 * PI;
        } else if !arc.sweep && sweep_angle > 0.0 {
            sweep_angle -= 2.0 * PI;
        }

        Some(Arc {
            center,
            radii: Vec2::new(rx, ry),
            start_angle,
            sweep_angle,
            x_rotation: arc.x_rotation,
        })
    }

    /// Approximate the arc with cubic Béziers, each spanning at most 120°.
    ///
    /// Every span uses control arms of length `4/3 tan(θ/4)` of the radius.
    pub fn to_cubics(&self) -> SmallVec<[CubicBez; 4]> {
        #[expect(
            clippy::cast_possible_truncation,
            reason = "a full turn needs three spans"
        )]
        let n = (self.sweep_angle.abs() / MAX_SPAN - 1e-9).ceil().max(1.0) as usize;
        let angle_step = self.sweep_angle / n as f64;
        let arm_len = (4.0 / 3.0) * (0.25 * angle_step).tan();
        let mut angle0 = self.start_angle;
        let mut p0 = sample_ellipse(self.radii, self.x_rotation, angle0);
        let mut result = SmallVec::new();
        for _ in 0..n {
            let angle1 = angle0 + angle_step;
            let p1 = p0 + arm_len * sample_ellipse(self.radii, self.x_rotation, angle0 + FRAC_PI_2);
            let p3 = sample_ellipse(self.radii, self.x_rotation, angle1);
            let p2 = p3 - arm_len * sample_ellipse(self.radii, self.x_rotation, angle1 + FRAC_PI_2);
            result.push(CubicBez::new(
                self.center + p0,
                self.center + p1,
                self.center + p2,
                self.center + p3,
            ));
            angle0 = angle1;
            p0 = p3;
        }
        result
    }
}

fn sample_ellipse(radii: Vec2, x_rotation: f64, angle: f64) -> Vec2 {
    let (angle_sin, angle_cos) = angle.sin_cos();
    let u = radii.x * angle_cos;
    let v = radii.y * angle_sin;
    Vec2::new(u, v).rotate(x_rotation)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ParamCurve;

    #[test]
    fn svg_arc_half_circle() {
        let arc = SvgArc {
            from: Point::new(0.0, 0.0),
            to: Point::new(100.0, 0.0),
            radii: Vec2::new(50.0, 50.0),
            x_rotation: 0.0,
            large_arc: false,
            sweep: true,
        };
        let arc = Arc::from_svg_arc(&arc).unwrap();
        assert!(arc.center.distance(Point::new(50.0, 0.0)) < 1e-9);
        assert!((arc.sweep_angle.abs() - PI).abs() < 1e-9);
        let cubics = arc.to_cubics();
        assert_eq!(cubics.len(), 2);
        assert!(cubics[0].start().distance(Point::new(0.0, 0.0)) < 1e-9);
        assert!(cubics[1].end().distance(Point::new(100.0, 0.0)) < 1e-9);
        for c in &cubics {
            for i in 0..=8 {
                let r = c.eval(i as f64 / 8.0).distance(arc.center);
                assert!((r - 50.0).abs() < 0.02, "radius {r}");
            }
        }
    }

    #[test]
    fn full_turn_uses_three_spans() {
        let arc = Arc {
            center: Point::ZERO,
            radii: Vec2::new(10.0, 10.0),
            start_angle: 0.0,
            sweep_angle: 2.0 * PI,
            x_rotation: 0.0,
        };
        assert_eq!(arc.to_cubics().len(), 3);
        let quarter = Arc {
            sweep_angle: FRAC_PI_2,
            ..arc
        };
        assert_eq!(quarter.to_cubics().len(), 1);
    }

    #[test]
    fn straight_arc() {
        let arc = SvgArc {
            from: Point::new(0.0, 0.0),
            to: Point::new(10.0, 0.0),
            radii: Vec2::new(0.0, 5.0),
            x_rotation: 0.0,
            large_arc: false,
            sweep: false,
        };
        assert!(Arc::from_svg_arc(&arc).is_none());
    }
}
