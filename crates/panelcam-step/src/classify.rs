// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Hole classification and deduplication
//!
//! Converts raw cylinder candidates into classified holes. A blind drill
//! operation leaves two circles in the source geometry - the entry face
//! and the blind bottom - sharing diameter and the two off-axis
//! coordinates. The bottom circle touches no border and must be
//! suppressed before keyed deduplication, or it survives as a spurious
//! vertical hole.
//!
//! Classification ladder, in priority order: diameter filter, vertical
//! (thickness border), horizontal (length border, then width border),
//! fallback vertical at measured offsets. The fallback indicates likely
//! mis-detected geometry and is flagged and logged, never dropped.

use crate::geometry::CylinderCandidate;
use panelcam_model::{AxisRoleMap, BoundingBox, Hole, HoleKind, HoleSide, Tolerances};
use rustc_hash::FxHashSet;
use tracing::warn;

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

/// Diameter snapped to a 0.1 grid for keying
fn snap_diameter(d: f64) -> i64 {
    (d * 10.0).round() as i64
}

/// Candidate offsets along the three role axes
#[derive(Clone, Copy)]
struct RoleOffsets {
    l: f64,
    w: f64,
    t: f64,
}

fn role_offsets(c: &CylinderCandidate, bbox: &BoundingBox, roles: &AxisRoleMap) -> RoleOffsets {
    RoleOffsets {
        l: bbox.offset(c.center, roles.length),
        w: bbox.offset(c.center, roles.width),
        t: bbox.offset(c.center, roles.thickness),
    }
}

/// Depth of a vertical hole: a measured extent that spans the panel means
/// through; with no measured extent, small diameters are assumed through
/// and the rest get the nominal blind depth.
fn vertical_depth(c: &CylinderCandidate, thickness: f64, tol: &Tolerances) -> f64 {
    match c.extent {
        Some(e) if e >= thickness - tol.border => 0.0,
        Some(e) => round2(e),
        None if c.diameter() <= tol.through_diameter => 0.0,
        None => tol.vertical_depth,
    }
}

/// Classify every candidate of one solid into holes
///
/// Output order is candidate order with duplicates removed; the codec
/// imposes its own grouping later.
pub fn classify_holes(
    candidates: &[CylinderCandidate],
    bbox: &BoundingBox,
    roles: &AxisRoleMap,
    tol: &Tolerances,
) -> Vec<Hole> {
    let length = bbox.extent(roles.length);
    let width = bbox.extent(roles.width);
    let thickness = bbox.extent(roles.thickness);

    let kept: Vec<&CylinderCandidate> = candidates
        .iter()
        .filter(|c| {
            let d = c.diameter();
            d >= tol.min_diameter && d <= tol.max_diameter
        })
        .collect();

    // First pass: remember where drill entries touch a border, keyed by
    // the coordinates an entry shares with its blind-bottom circle.
    let mut len_entries: FxHashSet<(i64, i64, i64)> = FxHashSet::default();
    let mut wid_entries: FxHashSet<(i64, i64, i64)> = FxHashSet::default();
    let mut vert_entries: FxHashSet<(i64, i64, i64)> = FxHashSet::default();

    for c in &kept {
        let o = role_offsets(c, bbox, roles);
        let d = snap_diameter(c.diameter());
        if tol.at_border(o.t, thickness) {
            vert_entries.insert((tol.snap(o.l), tol.snap(o.w), d));
        } else {
            if tol.at_border(o.l, length) {
                len_entries.insert((tol.snap(o.w), tol.snap(o.t), d));
            }
            if tol.at_border(o.w, width) {
                wid_entries.insert((tol.snap(o.l), tol.snap(o.t), d));
            }
        }
    }

    // Second pass: classify, suppressing interior bottom circles.
    let mut holes: Vec<Hole> = Vec::new();
    let mut seen: FxHashSet<(u8, HoleSide, i64, i64, i64, i64)> = FxHashSet::default();

    for c in kept {
        let o = role_offsets(c, bbox, roles);
        let diameter = round2(c.diameter());

        let hole = if tol.at_border(o.t, thickness) {
            let side = if thickness - o.t <= tol.border {
                HoleSide::Top
            } else {
                HoleSide::Bottom
            };
            Hole {
                x: round2(o.l),
                y: round2(o.w),
                z: round2(o.t),
                diameter,
                depth: vertical_depth(c, thickness, tol),
                kind: HoleKind::Vertical,
                side,
                flagged: false,
            }
        } else if tol.at_border(o.l, length) {
            let (side, x) = if o.l <= tol.border {
                (HoleSide::LengthStart, 0.0)
            } else {
                (HoleSide::LengthEnd, round2(length))
            };
            Hole {
                x,
                y: round2(o.w),
                z: round2(o.t),
                diameter,
                depth: c.extent.map(round2).unwrap_or(tol.horizontal_depth),
                kind: HoleKind::Horizontal,
                side,
                flagged: false,
            }
        } else if tol.at_border(o.w, width) {
            let (side, y) = if o.w <= tol.border {
                (HoleSide::WidthStart, 0.0)
            } else {
                (HoleSide::WidthEnd, round2(width))
            };
            Hole {
                x: round2(o.l),
                y,
                z: round2(o.t),
                diameter,
                depth: c.extent.map(round2).unwrap_or(tol.horizontal_depth),
                kind: HoleKind::Horizontal,
                side,
                flagged: false,
            }
        } else {
            // Interior circle: the blind bottom of a hole whose entry we
            // already saw on a border is geometric residue, not a hole.
            let d = snap_diameter(c.diameter());
            if len_entries.contains(&(tol.snap(o.w), tol.snap(o.t), d))
                || wid_entries.contains(&(tol.snap(o.l), tol.snap(o.t), d))
                || vert_entries.contains(&(tol.snap(o.l), tol.snap(o.w), d))
            {
                continue;
            }

            warn!(
                x = o.l,
                y = o.w,
                z = o.t,
                diameter,
                "cylinder matches no border rule; recording as vertical at measured offsets"
            );
            Hole {
                x: round2(o.l),
                y: round2(o.w),
                z: round2(o.t),
                diameter,
                depth: vertical_depth(c, thickness, tol),
                kind: HoleKind::Vertical,
                side: HoleSide::Top,
                flagged: true,
            }
        };

        let key = (
            hole.kind as u8,
            hole.side,
            tol.snap(hole.x),
            tol.snap(hole.y),
            tol.snap(hole.z),
            snap_diameter(hole.diameter),
        );
        if seen.insert(key) {
            holes.push(hole);
        } else if hole.flagged {
            // keyed duplicate of something already kept
            continue;
        } else if let Some(existing) = holes.iter_mut().find(|h| {
            h.kind == hole.kind
                && h.side == hole.side
                && tol.snap(h.x) == key.2
                && tol.snap(h.y) == key.3
                && tol.snap(h.z) == key.4
                && snap_diameter(h.diameter) == key.5
                && h.flagged
        }) {
            // an unflagged classification supersedes a flagged duplicate
            *existing = hole;
        }
    }

    holes
}
