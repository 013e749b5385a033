// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Raw entity-graph types
//!
//! A STEP document is a flat soup of `#id = TYPE(params);` records whose
//! parameters reference other records by id. These types represent one
//! decoded record; the graph itself lives in `panelcam-step`.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Type-safe entity identifier
///
/// Wraps the raw STEP record id (`#123` becomes `EntityId(123)`).
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize, Default)]
pub struct EntityId(pub u32);

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl From<u32> for EntityId {
    fn from(id: u32) -> Self {
        EntityId(id)
    }
}

impl From<EntityId> for u32 {
    fn from(id: EntityId) -> Self {
        id.0
    }
}

/// STEP entity type tag
///
/// Covers the entity types the extraction pipeline dispatches on. Every
/// other tag is captured as [`StepType::Unknown`] with its original
/// spelling - the bounding-box traversal follows references through
/// unknown entities without interpreting them.
#[derive(Clone, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StepType {
    // Points and directions
    CartesianPoint,
    Direction,
    VertexPoint,

    // Placement
    Axis2Placement3d,

    // Curves and surfaces
    Circle,
    Line,
    Plane,
    CylindricalSurface,

    // Topology
    AdvancedFace,
    FaceBound,
    FaceOuterBound,
    EdgeLoop,
    OrientedEdge,
    EdgeCurve,
    ClosedShell,
    OpenShell,

    // Solids and representations
    ManifoldSolidBrep,
    AdvancedBrepShapeRepresentation,
    ShapeRepresentation,

    /// Unknown type - stores the original tag string
    Unknown(String),
}

impl StepType {
    /// Parse a type tag string into a `StepType`
    pub fn parse(s: &str) -> Self {
        match s.to_uppercase().as_str() {
            "CARTESIAN_POINT" => StepType::CartesianPoint,
            "DIRECTION" => StepType::Direction,
            "VERTEX_POINT" => StepType::VertexPoint,
            "AXIS2_PLACEMENT_3D" => StepType::Axis2Placement3d,
            "CIRCLE" => StepType::Circle,
            "LINE" => StepType::Line,
            "PLANE" => StepType::Plane,
            "CYLINDRICAL_SURFACE" => StepType::CylindricalSurface,
            "ADVANCED_FACE" => StepType::AdvancedFace,
            "FACE_BOUND" => StepType::FaceBound,
            "FACE_OUTER_BOUND" => StepType::FaceOuterBound,
            "EDGE_LOOP" => StepType::EdgeLoop,
            "ORIENTED_EDGE" => StepType::OrientedEdge,
            "EDGE_CURVE" => StepType::EdgeCurve,
            "CLOSED_SHELL" => StepType::ClosedShell,
            "OPEN_SHELL" => StepType::OpenShell,
            "MANIFOLD_SOLID_BREP" => StepType::ManifoldSolidBrep,
            "ADVANCED_BREP_SHAPE_REPRESENTATION" => StepType::AdvancedBrepShapeRepresentation,
            "SHAPE_REPRESENTATION" => StepType::ShapeRepresentation,
            _ => StepType::Unknown(s.to_string()),
        }
    }

    /// Get the type tag as it appears in a STEP file
    pub fn name(&self) -> &str {
        match self {
            StepType::CartesianPoint => "CARTESIAN_POINT",
            StepType::Direction => "DIRECTION",
            StepType::VertexPoint => "VERTEX_POINT",
            StepType::Axis2Placement3d => "AXIS2_PLACEMENT_3D",
            StepType::Circle => "CIRCLE",
            StepType::Line => "LINE",
            StepType::Plane => "PLANE",
            StepType::CylindricalSurface => "CYLINDRICAL_SURFACE",
            StepType::AdvancedFace => "ADVANCED_FACE",
            StepType::FaceBound => "FACE_BOUND",
            StepType::FaceOuterBound => "FACE_OUTER_BOUND",
            StepType::EdgeLoop => "EDGE_LOOP",
            StepType::OrientedEdge => "ORIENTED_EDGE",
            StepType::EdgeCurve => "EDGE_CURVE",
            StepType::ClosedShell => "CLOSED_SHELL",
            StepType::OpenShell => "OPEN_SHELL",
            StepType::ManifoldSolidBrep => "MANIFOLD_SOLID_BREP",
            StepType::AdvancedBrepShapeRepresentation => "ADVANCED_BREP_SHAPE_REPRESENTATION",
            StepType::ShapeRepresentation => "SHAPE_REPRESENTATION",
            StepType::Unknown(s) => s,
        }
    }

    /// Check if this type can carry a solid's geometry
    pub fn is_solid(&self) -> bool {
        matches!(self, StepType::ManifoldSolidBrep)
    }

    /// Check if this type describes a circular feature usable as a
    /// cylinder candidate
    pub fn is_circular(&self) -> bool {
        matches!(self, StepType::Circle | StepType::CylindricalSurface)
    }
}

impl FromStr for StepType {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

impl Default for StepType {
    fn default() -> Self {
        StepType::Unknown(String::new())
    }
}

impl fmt::Display for StepType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Decoded attribute value
///
/// Any value that can appear in a record's parameter list.
#[derive(Clone, Debug, PartialEq, Default)]
pub enum AttrValue {
    /// Null value (`$`)
    #[default]
    Null,
    /// Derived value (`*`)
    Derived,
    /// Entity reference (`#123`)
    EntityRef(EntityId),
    /// Integer value
    Integer(i64),
    /// Floating point value
    Float(f64),
    /// String value
    String(String),
    /// Enumeration value (`.VALUE.`)
    Enum(String),
    /// Parenthesized list of values
    List(Vec<AttrValue>),
}

impl AttrValue {
    /// Try to get as entity reference
    pub fn as_entity_ref(&self) -> Option<EntityId> {
        match self {
            AttrValue::EntityRef(id) => Some(*id),
            _ => None,
        }
    }

    /// Try to get as string
    pub fn as_string(&self) -> Option<&str> {
        match self {
            AttrValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Try to get as float (integers widen)
    pub fn as_float(&self) -> Option<f64> {
        match self {
            AttrValue::Float(f) => Some(*f),
            AttrValue::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    /// Try to get as list
    pub fn as_list(&self) -> Option<&[AttrValue]> {
        match self {
            AttrValue::List(items) => Some(items),
            _ => None,
        }
    }

    /// Check if this is a null value
    pub fn is_null(&self) -> bool {
        matches!(self, AttrValue::Null)
    }

    /// Collect every entity reference in this value, recursing into lists
    pub fn collect_refs(&self, out: &mut Vec<EntityId>) {
        match self {
            AttrValue::EntityRef(id) => out.push(*id),
            AttrValue::List(items) => {
                for item in items {
                    item.collect_refs(out);
                }
            }
            _ => {}
        }
    }
}

/// Decoded STEP entity
///
/// One record of the entity graph: id, type tag, and parameter values in
/// file order. Immutable once decoded.
#[derive(Clone, Debug)]
pub struct StepEntity {
    /// Record id
    pub id: EntityId,
    /// Type tag
    pub step_type: StepType,
    /// Parameter values in order
    pub attrs: Vec<AttrValue>,
}

impl StepEntity {
    /// Get parameter at index
    pub fn get(&self, index: usize) -> Option<&AttrValue> {
        self.attrs.get(index)
    }

    /// Get entity reference at index
    pub fn get_ref(&self, index: usize) -> Option<EntityId> {
        self.get(index).and_then(|v| v.as_entity_ref())
    }

    /// Get string at index
    pub fn get_string(&self, index: usize) -> Option<&str> {
        self.get(index).and_then(|v| v.as_string())
    }

    /// Get float at index
    pub fn get_float(&self, index: usize) -> Option<f64> {
        self.get(index).and_then(|v| v.as_float())
    }

    /// Get list at index
    pub fn get_list(&self, index: usize) -> Option<&[AttrValue]> {
        self.get(index).and_then(|v| v.as_list())
    }

    /// First string parameter, if any (STEP entities conventionally lead
    /// with a name string)
    pub fn name_attr(&self) -> Option<&str> {
        self.attrs.iter().find_map(|v| v.as_string())
    }

    /// Every entity reference in the parameter list, in order, including
    /// references nested inside lists
    pub fn all_refs(&self) -> Vec<EntityId> {
        let mut refs = Vec::new();
        for attr in &self.attrs {
            attr.collect_refs(&mut refs);
        }
        refs
    }
}
