// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Axis/role mapping
//!
//! Assigns each spatial axis a structural role. The baseline is purely
//! dimensional - largest extent is the length, smallest the thickness.
//! Horizontal drilling conventionally enters through the length faces, so
//! border-touching mid-thickness cylinders are counted as evidence and
//! can swap the two larger axes when the convention and the dimensions
//! disagree. The heuristic can misjudge near-square parts; the size-based
//! default wins all ties.

use crate::geometry::CylinderCandidate;
use panelcam_model::{Axis, AxisRoleMap, BoundingBox, Tolerances};

/// Size-ordered baseline: largest -> length, middle -> width,
/// smallest -> thickness. Ties keep file axis order.
fn size_ordered(extents: [f64; 3]) -> AxisRoleMap {
    let mut order = [Axis::X, Axis::Y, Axis::Z];
    order.sort_by(|a, b| {
        extents[b.index()]
            .partial_cmp(&extents[a.index()])
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    AxisRoleMap::new(order[0], order[1], order[2])
}

/// Horizontal-hole evidence for one in-plane axis
///
/// A candidate is evidence when it touches a border of `axis` and sits
/// near the half-thickness point of the smallest axis.
fn evidence_for(
    axis: Axis,
    thickness: Axis,
    bbox: &BoundingBox,
    candidates: &[CylinderCandidate],
    tol: &Tolerances,
) -> usize {
    let half = bbox.extent(thickness) / 2.0;
    candidates
        .iter()
        .filter(|c| {
            let in_plane = bbox.offset(c.center, axis);
            let through = bbox.offset(c.center, thickness);
            tol.at_border(in_plane, bbox.extent(axis)) && (through - half).abs() <= tol.border
        })
        .count()
}

/// Infer the axis-role map for one solid
///
/// Pure in (bounding box, candidates, tolerances); does not touch the
/// entity graph.
pub fn infer_roles(
    bbox: &BoundingBox,
    candidates: &[CylinderCandidate],
    tol: &Tolerances,
) -> AxisRoleMap {
    let baseline = size_ordered(bbox.extents());

    let on_length = evidence_for(baseline.length, baseline.thickness, bbox, candidates, tol);
    let on_width = evidence_for(baseline.width, baseline.thickness, bbox, candidates, tol);

    if on_width > on_length {
        baseline.swapped()
    } else {
        baseline
    }
}
