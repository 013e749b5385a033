// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Geometry resolution: bounding boxes and cylinder candidates
//!
//! STEP geometry is a reference graph, not a spatial index. A solid's
//! extent is recovered by walking every reference from its shell down to
//! the cartesian points; circular features are discovered by scanning the
//! whole graph and filtering by containment in the solid's bounding box,
//! because the format does not scope curves to solids.

use crate::resolver::EntityGraph;
use nalgebra::Vector3;
use panelcam_model::{BoundingBox, EntityId, StepEntity, StepType, Tolerances};
use rustc_hash::{FxHashMap, FxHashSet};

/// A raw cylindrical feature before classification
///
/// Ephemeral: produced here, consumed and discarded by the classifier.
#[derive(Clone, Debug)]
pub struct CylinderCandidate {
    /// Center in STEP space (the axis placement's location)
    pub center: [f64; 3],
    /// Cylinder radius
    pub radius: f64,
    /// Unit axis direction, when the placement carries one
    pub axis: Option<Vector3<f64>>,
    /// Extent along the axis, estimated from the owning face
    pub extent: Option<f64>,
}

impl CylinderCandidate {
    /// Drill diameter of this feature
    pub fn diameter(&self) -> f64 {
        self.radius * 2.0
    }
}

/// Coordinates of a CARTESIAN_POINT entity
///
/// Returns `None` for 2D points (surface parameter space).
fn point_coords(entity: &StepEntity) -> Option<[f64; 3]> {
    if entity.step_type != StepType::CartesianPoint {
        return None;
    }
    let list = entity.attrs.iter().find_map(|v| v.as_list())?;
    if list.len() < 3 {
        return None;
    }
    Some([
        list[0].as_float()?,
        list[1].as_float()?,
        list[2].as_float()?,
    ])
}

/// Unit direction of a DIRECTION entity
fn direction_vector(entity: &StepEntity) -> Option<Vector3<f64>> {
    if entity.step_type != StepType::Direction {
        return None;
    }
    let list = entity.attrs.iter().find_map(|v| v.as_list())?;
    if list.len() < 3 {
        return None;
    }
    let v = Vector3::new(
        list[0].as_float()?,
        list[1].as_float()?,
        list[2].as_float()?,
    );
    if v.norm() < 1e-9 {
        return None;
    }
    Some(v.normalize())
}

/// Location and axis direction of an AXIS2_PLACEMENT_3D
fn placement_parts(
    graph: &mut EntityGraph,
    placement_id: EntityId,
) -> Option<([f64; 3], Option<Vector3<f64>>)> {
    let placement = graph.get(placement_id)?;
    if placement.step_type != StepType::Axis2Placement3d {
        return None;
    }

    let location = graph.get(placement.get_ref(1)?)?;
    let center = point_coords(&location)?;

    let axis = placement
        .get_ref(2)
        .and_then(|id| graph.get(id))
        .and_then(|d| direction_vector(&d));

    Some((center, axis))
}

/// Collect every cartesian point reachable from the given roots
///
/// Iterative worklist with a visited set: STEP graphs are DAGs in
/// practice, but malformed inputs can contain reference cycles and the
/// traversal must terminate on them anyway.
fn collect_points(graph: &mut EntityGraph, roots: &[EntityId]) -> Vec<[f64; 3]> {
    let mut points = Vec::new();
    let mut visited: FxHashSet<EntityId> = FxHashSet::default();
    let mut worklist: Vec<EntityId> = roots.to_vec();

    while let Some(id) = worklist.pop() {
        if !visited.insert(id) {
            continue;
        }
        let Some(entity) = graph.get(id) else {
            continue;
        };

        if entity.step_type == StepType::CartesianPoint {
            if let Some(p) = point_coords(&entity) {
                points.push(p);
            }
        } else {
            for r in entity.all_refs() {
                if !visited.contains(&r) {
                    worklist.push(r);
                }
            }
        }
    }

    points
}

/// Axis-aligned bounding box of a solid
///
/// Walks the solid's topology (shell -> face -> loop -> point) and
/// reduces all reachable points. Returns the degenerate zero box when
/// nothing is reachable; the caller decides whether that skips the solid.
pub fn bounding_box(graph: &mut EntityGraph, solid_id: EntityId) -> BoundingBox {
    let roots = match graph.get(solid_id) {
        Some(solid) => solid.all_refs(),
        None => Vec::new(),
    };

    let points = collect_points(graph, &roots);
    if points.is_empty() {
        return BoundingBox::new([0.0; 3], [0.0; 3]);
    }

    let mut bbox = BoundingBox::empty();
    for p in points {
        bbox.absorb(p);
    }
    bbox
}

/// All cylinder candidates attributable to a solid
///
/// Scans every CIRCLE and CYLINDRICAL_SURFACE in the graph and keeps the
/// ones whose center lies inside `bbox` plus the configured margin. The
/// margin must exceed unit noise but stay below the minimum realistic
/// gap between parts, or features leak across solids.
pub fn find_cylinders(
    graph: &mut EntityGraph,
    bbox: &BoundingBox,
    tol: &Tolerances,
) -> Vec<CylinderCandidate> {
    let mut candidates = Vec::new();

    for id in graph.ids_of_type(&StepType::Circle) {
        let Some(circle) = graph.get(id) else {
            continue;
        };
        let (Some(placement_id), Some(radius)) = (circle.get_ref(1), circle.get_float(2)) else {
            continue;
        };
        let Some((center, axis)) = placement_parts(graph, placement_id) else {
            continue;
        };
        if !bbox.contains_with_margin(center, tol.bbox_margin) {
            continue;
        }
        candidates.push(CylinderCandidate {
            center,
            radius,
            axis,
            extent: None,
        });
    }

    let face_of_surface = surface_face_index(graph);

    for id in graph.ids_of_type(&StepType::CylindricalSurface) {
        let Some(surface) = graph.get(id) else {
            continue;
        };
        let (Some(placement_id), Some(radius)) = (surface.get_ref(1), surface.get_float(2))
        else {
            continue;
        };
        let Some((center, axis)) = placement_parts(graph, placement_id) else {
            continue;
        };
        if !bbox.contains_with_margin(center, tol.bbox_margin) {
            continue;
        }

        let extent = match (face_of_surface.get(&id), axis) {
            (Some(&face_id), Some(dir)) => face_extent_along(graph, face_id, id, dir),
            _ => None,
        };

        candidates.push(CylinderCandidate {
            center,
            radius,
            axis,
            extent,
        });
    }

    candidates
}

/// Map each referenced surface to the first ADVANCED_FACE carrying it
fn surface_face_index(graph: &mut EntityGraph) -> FxHashMap<EntityId, EntityId> {
    let mut map = FxHashMap::default();
    for face_id in graph.ids_of_type(&StepType::AdvancedFace) {
        let Some(face) = graph.get(face_id) else {
            continue;
        };
        // ADVANCED_FACE('name', (bounds...), surface, same_sense): the
        // surface is the trailing reference.
        let surface = face.get_ref(2).or_else(|| face.all_refs().pop());
        if let Some(surface_id) = surface {
            map.entry(surface_id).or_insert(face_id);
        }
    }
    map
}

/// Span of a face's reachable points projected onto an axis direction
///
/// Estimates the drilled depth of a cylindrical face. The surface itself
/// is excluded from the walk so its placement point does not widen the
/// span.
fn face_extent_along(
    graph: &mut EntityGraph,
    face_id: EntityId,
    surface_id: EntityId,
    dir: Vector3<f64>,
) -> Option<f64> {
    let face = graph.get(face_id)?;
    let roots: Vec<EntityId> = face
        .all_refs()
        .into_iter()
        .filter(|&r| r != surface_id)
        .collect();

    let points = collect_points(graph, &roots);
    if points.is_empty() {
        return None;
    }

    let mut lo = f64::INFINITY;
    let mut hi = f64::NEG_INFINITY;
    for p in points {
        let t = Vector3::new(p[0], p[1], p[2]).dot(&dir);
        lo = lo.min(t);
        hi = hi.max(t);
    }
    Some(hi - lo)
}
