// Copyright 2018 the Kurbo Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Boolean operations on regions.
//!
//! The clipper builds on Greiner and Hormann: the contours of both operands
//! are cut at their intersections into rings of vertices. Each piece of a
//! ring between two vertices is then found to lie inside the other
//! operand, outside it, or along its boundary, and the pieces the
//! operation keeps are chained into the result contours, switching rings
//! where the kept pieces do. Contours that never meet the other operand
//! are single pieces per segment and come out whole or not at all.
//!
//! ```
//! use kurbo_boolean::{apply_boolean_operation, BooleanOp, PathBuilder, Rect};
//!
//! let a = PathBuilder::new().rect(Rect::new(0.0, 0.0, 10.0, 10.0)).build();
//! let b = PathBuilder::new().rect(Rect::new(5.0, 5.0, 15.0, 15.0)).build();
//! let union = apply_boolean_operation(&a, &b, BooleanOp::Union).unwrap();
//! assert_eq!(union.len(), 1);
//! assert!((union[0].area() - 175.0).abs() < 1e-9);
//! ```

mod classify;
mod graph;
mod walk;

use alloc::vec::Vec;
use core::fmt;
use core::str::FromStr;

use log::debug;

use crate::{BooleanError, ParseBooleanOpError, PathList, DEFAULT_CURVE_ACCURACY};
use graph::Graph;

/// A boolean operation on two regions, A and B.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BooleanOp {
    /// Points in A or B.
    Union,
    /// Points in A but not in B.
    Difference,
    /// Points in B but not in A.
    ReverseDifference,
    /// Points in both A and B.
    Intersection,
    /// Points in exactly one of A and B, as two regions: A not B, then
    /// B not A.
    Xor,
    /// The xor regions followed by the intersection, which together
    /// partition the union.
    Divide,
}

impl BooleanOp {
    /// All operations, in declaration order.
    pub const ALL: [BooleanOp; 6] = [
        BooleanOp::Union,
        BooleanOp::Difference,
        BooleanOp::ReverseDifference,
        BooleanOp::Intersection,
        BooleanOp::Xor,
        BooleanOp::Divide,
    ];

    /// The operation's conventional name, such as `"A union B"`.
    pub fn name(self) -> &'static str {
        match self {
            BooleanOp::Union => "A union B",
            BooleanOp::Difference => "A not B",
            BooleanOp::ReverseDifference => "B not A",
            BooleanOp::Intersection => "A intersection B",
            BooleanOp::Xor => "A xor B",
            BooleanOp::Divide => "A divide B",
        }
    }
}

impl fmt::Display for BooleanOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for BooleanOp {
    type Err = ParseBooleanOpError;

    fn from_str(s: &str) -> Result<BooleanOp, ParseBooleanOpError> {
        BooleanOp::ALL
            .into_iter()
            .find(|op| op.name() == s)
            .ok_or_else(|| ParseBooleanOpError { name: s.into() })
    }
}

/// Tuning for [`apply_boolean_operation_with_options`].
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ClipOptions {
    /// Check the intersection graph for consistency before walking it.
    ///
    /// On by default in debug builds.
    pub verify: bool,
    /// Add vertices where edges of A and B coincide.
    pub overlaps: bool,
    /// Box size at which curve/curve intersection stops subdividing.
    pub curve_accuracy: f64,
    /// Most result contours one clip may trace.
    ///
    /// This is a floor rather than a hard cap: a graph with more vertices
    /// than this uses its vertex count instead, so large inputs are never
    /// cut short.
    pub max_contours: usize,
    /// Most pieces one result contour may chain.
    ///
    /// Like `max_contours`, raised to the vertex count of the graph when
    /// that is larger.
    pub max_walk_steps: usize,
}

impl Default for ClipOptions {
    fn default() -> ClipOptions {
        ClipOptions {
            verify: cfg!(debug_assertions),
            overlaps: false,
            curve_accuracy: DEFAULT_CURVE_ACCURACY,
            max_contours: 100,
            max_walk_steps: 1000,
        }
    }
}

/// Apply `op` to the regions `a` and `b` with default options.
///
/// See [`apply_boolean_operation_with_options`].
///
/// # Errors
///
/// See [`apply_boolean_operation_with_options`].
pub fn apply_boolean_operation(
    a: &PathList,
    b: &PathList,
    op: BooleanOp,
) -> Result<Vec<PathList>, BooleanError> {
    apply_boolean_operation_with_options(a, b, op, &ClipOptions::default())
}

/// Apply `op` to the regions `a` and `b`.
///
/// Contours are treated as closed; open ones get a closing line. The
/// result holds one region per part of the operation (two for
/// [`BooleanOp::Xor`], three for [`BooleanOp::Divide`], otherwise one), in
/// the order given there, each normalized. Empty regions are left out.
///
/// # Errors
///
/// Fails when the input defeats the clipper, such as self-intersecting
/// contours or an operand whose contours cannot be nested, or when an
/// internal check fails. No partial result is returned.
pub fn apply_boolean_operation_with_options(
    a: &PathList,
    b: &PathList,
    op: BooleanOp,
    options: &ClipOptions,
) -> Result<Vec<PathList>, BooleanError> {
    let a = prepare(a)?;
    let b = prepare(b)?;
    debug!("{op}: {} contours against {} contours", a.len(), b.len());
    let parts: &[(bool, bool)] = match op {
        BooleanOp::Union => &[(true, true)],
        BooleanOp::Difference => &[(true, false)],
        BooleanOp::ReverseDifference => &[(false, true)],
        BooleanOp::Intersection => &[(false, false)],
        BooleanOp::Xor => &[(true, false), (false, true)],
        BooleanOp::Divide => &[(true, false), (false, true), (false, false)],
    };
    let mut result = Vec::with_capacity(parts.len());
    for &(invert_a, invert_b) in parts {
        let region = clip(&a, &b, invert_a, invert_b, options)?;
        if !region.is_empty() {
            result.push(region);
        }
    }
    Ok(result)
}

/// Closed contours without degenerate segments, outlines clockwise and
/// holes counterclockwise.
fn prepare(list: &PathList) -> Result<PathList, BooleanError> {
    list.iter()
        .map(|c| c.remove_degenerate_segments().closed())
        .filter(|c| !c.is_empty())
        .collect::<PathList>()
        .normalize()
}

/// One clip: each operand keeps the parts inside the other, or outside it
/// when its `invert` flag is set.
fn clip(
    a: &PathList,
    b: &PathList,
    invert_a: bool,
    invert_b: bool,
    options: &ClipOptions,
) -> Result<PathList, BooleanError> {
    let mut graph = Graph::build(a, b, options.curve_accuracy, options.overlaps);
    if options.verify {
        graph.verify()?;
    }
    graph.classify(a, b, invert_a, invert_b);
    let contours = graph.walk(options)?;
    debug!("clip: {} contours before normalizing", contours.len());
    PathList::from_paths(contours).normalize()
}
