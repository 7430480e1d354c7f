// Copyright 2018 the Kurbo Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Compact SVG path data for paths and path lists.

use alloc::string::String;
use core::fmt::{self, Write};

use crate::{ParamCurve, Path, PathList, PathSeg, Point};

/// Decimal digits kept for every coordinate.
const DIGITS: i32 = 3;

fn write_point<W: Write>(w: &mut W, p: Point) -> fmt::Result {
    let p = p.round_to(DIGITS);
    write!(w, "{},{}", p.x, p.y)
}

impl Path {
    /// Convert the path to SVG path data.
    ///
    /// The output starts with a single `M`, followed by one `L`, `Q` or `C`
    /// command per segment; cubics that are raised quadratics are written
    /// as `Q`. Coordinates are rounded to three decimals. No closing `Z` is
    /// written, the final segment already returns to the start of a closed
    /// path.
    ///
    /// ```
    /// use kurbo_boolean::{Path, Point};
    ///
    /// let path = Path::polygon(&[
    ///     Point::new(0.0, 0.0),
    ///     Point::new(10.0, 0.0),
    ///     Point::new(10.0, 2.5),
    /// ]);
    /// assert_eq!(path.to_svg(), "M 0,0 L 10,0 L 10,2.5 L 0,0");
    /// ```
    pub fn to_svg(&self) -> String {
        let mut result = String::new();
        // Writing into a String cannot fail.
        let _ = self.write_svg(&mut result);
        result
    }

    /// Write the path's SVG path data to `w`.
    ///
    /// See [`Path::to_svg`] for the format.
    pub fn write_svg<W: Write>(&self, w: &mut W) -> fmt::Result {
        w.write_str("M ")?;
        write_point(w, self.start())?;
        for seg in self.iter() {
            match seg {
                PathSeg::Line(line) => {
                    w.write_str(" L ")?;
                    write_point(w, line.p1)?;
                }
                PathSeg::Cubic(c) => {
                    if let Some(q) = c.as_quad() {
                        w.write_str(" Q ")?;
                        write_point(w, q.p1)?;
                        w.write_char(',')?;
                        write_point(w, seg.end())?;
                    } else {
                        w.write_str(" C ")?;
                        write_point(w, c.p1)?;
                        w.write_char(',')?;
                        write_point(w, c.p2)?;
                        w.write_char(',')?;
                        write_point(w, c.p3)?;
                    }
                }
            }
        }
        Ok(())
    }
}

impl PathList {
    /// Convert all contours to SVG path data, separated by spaces.
    pub fn to_svg(&self) -> String {
        let mut result = String::new();
        for (i, path) in self.iter().enumerate() {
            if i > 0 {
                result.push(' ');
            }
            let _ = path.write_svg(&mut result);
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use crate::{CubicBez, Path, PathBuilder, PathList, PathSeg, Point, QuadBez, Rect};

    #[test]
    fn cubic_and_quad() {
        let mut path = Path::new((0.0, 0.0));
        path.push(CubicBez::new((0.0, 0.0), (1.0, 2.0), (3.0, 2.0), (4.0, 0.0)).into());
        path.push(PathSeg::from(QuadBez::new((4.0, 0.0), (6.0, 3.0), (8.0, 0.0))));
        assert_eq!(path.to_svg(), "M 0,0 C 1,2,3,2,4,0 Q 6,3,8,0");
    }

    #[test]
    fn rounding() {
        let path = Path::polygon(&[
            Point::new(1.0 / 3.0, -0.0001),
            Point::new(2.0 / 3.0, 0.0),
            Point::new(0.5, 1.0),
        ]);
        assert_eq!(path.to_svg(), "M 0.333,0 L 0.667,0 L 0.5,1 L 0.333,0");
    }

    #[test]
    fn path_list() {
        let region = PathBuilder::new()
            .rect(Rect::new(0.0, 0.0, 2.0, 2.0))
            .rect(Rect::new(5.0, 5.0, 6.0, 6.0))
            .build();
        assert_eq!(
            region.to_svg(),
            "M 0,0 L 2,0 L 2,2 L 0,2 L 0,0 M 5,5 L 6,5 L 6,6 L 5,6 L 5,5"
        );
        assert_eq!(PathList::new().to_svg(), "");
    }
}
