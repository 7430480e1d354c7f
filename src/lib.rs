// Copyright 2018 the Kurbo Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Boolean operations on regions bounded by lines and cubic Béziers.
//!
//! A region is a [`PathList`]: a set of closed [`Path`]s, each a chain of
//! [`PathSeg`]s, where nested contours alternate between outlines and
//! holes. Two regions combine with [`apply_boolean_operation`] into their
//! union, either difference, intersection, symmetric difference, or the
//! pieces that divide them.
//!
//! The curve algebra behind the clipper is available on its own:
//! evaluation and subdivision through [`ParamCurve`], exact bounding boxes,
//! arc length and its inverse, line and curve intersection, and nearest
//! point projection.
//!
//! # Examples
//!
//! Cutting a round hole into a square:
//!
//! ```
//! use kurbo_boolean::{apply_boolean_operation, BooleanOp, PathBuilder, Point, Rect};
//!
//! let square = PathBuilder::new().rect(Rect::new(0.0, 0.0, 100.0, 100.0)).build();
//! let disk = PathBuilder::new().ellipse((50.0, 50.0), 20.0, 20.0).build();
//!
//! let result = apply_boolean_operation(&square, &disk, BooleanOp::Difference).unwrap();
//! let holed = &result[0];
//! assert_eq!(holed.len(), 2);
//! assert!(holed.is_in_hole(Point::new(50.0, 50.0)));
//! assert!(holed.is_inside(Point::new(10.0, 10.0)));
//! ```
//!
//! Curve queries:
//!
//! ```
//! use kurbo_boolean::{CubicBez, Line, ParamCurve, ParamCurveArclen, Point};
//!
//! let c = CubicBez::new((0.0, 0.0), (30.0, 60.0), (70.0, 60.0), (100.0, 0.0));
//! let hits = c.intersect_line(&Line::new((0.0, 20.0), (100.0, 20.0)));
//! assert_eq!(hits.len(), 2);
//! let t = c.t_at_length(0.5 * c.arclen());
//! assert!((c.eval(t).x - 50.0).abs() < 0.5);
//! ```
//!
//! # Features
//!
//! This crate either uses the standard library or the [`libm`] crate for
//! math functionality. The `std` feature is enabled by default, but can be
//! disabled, as long as the `libm` feature is enabled. This crate uses the
//! `alloc` crate regardless.
//!
//! Diagnostics go through the [`log`] facade; no logger is installed.
//!
//! [`libm`]: https://docs.rs/libm
//! [`log`]: https://docs.rs/log

#![forbid(unsafe_code)]
#![deny(missing_docs, clippy::trivially_copy_pass_by_ref)]
#![warn(clippy::doc_markdown, rustdoc::broken_intra_doc_links)]
#![warn(clippy::semicolon_if_nothing_returned)]
#![warn(unused_qualifications)]
#![allow(
    clippy::unreadable_literal,
    clippy::many_single_char_names,
    clippy::excessive_precision,
    reason = "numeric code"
)]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]
#![cfg_attr(all(not(feature = "std"), not(test)), no_std)]

#[cfg(not(any(feature = "std", feature = "libm")))]
compile_error!("kurbo_boolean requires either the `std` or `libm` feature");

extern crate alloc;

mod affine;
pub mod approx;
mod arc;
mod boolean;
mod builder;
pub mod common;
mod cubicbez;
mod error;
mod line;
mod param_curve;
mod path;
mod path_list;
mod point;
mod quadbez;
mod rect;
mod segment;
mod svg;
mod vec2;

pub use crate::affine::*;
pub use crate::arc::*;
pub use crate::boolean::*;
pub use crate::builder::*;
pub use crate::cubicbez::*;
pub use crate::error::*;
pub use crate::line::*;
pub use crate::param_curve::*;
pub use crate::path::*;
pub use crate::path_list::*;
pub use crate::point::*;
pub use crate::quadbez::*;
pub use crate::rect::*;
pub use crate::segment::*;
pub use crate::vec2::*;
