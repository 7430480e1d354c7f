// Copyright 2018 the Kurbo Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Errors reported by normalization and boolean operations.

use alloc::string::String;
use core::fmt;

/// A boolean operation or normalization could not produce a valid result.
///
/// These all indicate input the engine cannot handle (typically
/// self-intersecting or otherwise degenerate contours) or a broken internal
/// invariant. No partial result is ever returned alongside them.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BooleanError {
    /// Contour containment could not be resolved into nesting levels.
    ContainmentCycle,
    /// Walking the intersection graph did not terminate within `limit` steps.
    IterationLimit {
        /// The cap that was exceeded.
        limit: usize,
    },
    /// The intersection graph failed a consistency check.
    BrokenGraph {
        /// What was wrong.
        fault: GraphFault,
        /// Index of the vertex where the fault was found.
        vertex: usize,
    },
}

/// The consistency check an intersection graph failed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GraphFault {
    /// A vertex is not reachable from its ring, or reachable from two.
    RingMembership,
    /// Following `next` from a ring's head does not return to it.
    OpenRing,
    /// `prev` and `next` links disagree.
    Linkage,
    /// A vertex's neighbor does not point back to it.
    NeighborNotMutual,
    /// Consecutive vertices' segments do not meet.
    SegmentGap,
    /// A result contour reached a vertex with no way to continue.
    DeadEnd,
}

impl fmt::Display for BooleanError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BooleanError::ContainmentCycle => {
                write!(f, "contour containment does not form a hierarchy")
            }
            BooleanError::IterationLimit { limit } => {
                write!(f, "clip walk exceeded its limit of {limit} steps")
            }
            BooleanError::BrokenGraph { fault, vertex } => {
                write!(f, "broken intersection graph at vertex {vertex}: {fault}")
            }
        }
    }
}

impl fmt::Display for GraphFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            GraphFault::RingMembership => "vertex is not in exactly one ring",
            GraphFault::OpenRing => "ring does not close",
            GraphFault::Linkage => "prev and next links disagree",
            GraphFault::NeighborNotMutual => "neighbor link is not mutual",
            GraphFault::SegmentGap => "consecutive segments do not meet",
            GraphFault::DeadEnd => "result contour cannot be continued",
        };
        f.write_str(msg)
    }
}

#[cfg(feature = "std")]
impl std::error::Error for BooleanError {}

/// An operator name that is not one of the supported boolean operations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParseBooleanOpError {
    pub(crate) name: String,
}

impl fmt::Display for ParseBooleanOpError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown boolean operation {:?}", self.name)
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ParseBooleanOpError {}
