// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Typed program records
//!
//! Each body section kind decodes into its own record type, keyed by the
//! format's own section marker, instead of flowing through the rest of
//! the codec as a raw key/value map. Coordinates inside records are file
//! coordinates (Y measured from the machine's far edge); conversion to
//! part coordinates happens when records expand into holes.

use crate::vocab::side_from_code;
use panelcam_model::{Dimensions, HoleSide};
use rustc_hash::FxHashMap;

/// Field map of one section, as scanned from `KEY="value"` lines
pub type FieldMap = FxHashMap<String, String>;

fn field_f64(fields: &FieldMap, key: &str) -> Option<f64> {
    fields.get(key).and_then(|v| v.parse().ok())
}

fn field_u32(fields: &FieldMap, key: &str) -> Option<u32> {
    fields.get(key).and_then(|v| v.parse().ok())
}

/// Replication axis of a drilling run
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RunDirection {
    AlongLength,
    AlongWidth,
}

/// Run-length grouping of evenly spaced, identical, collinear holes
///
/// `count == 1` means a single hole; the pitch is then irrelevant.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DrillRun {
    pub count: u32,
    pub pitch: f64,
    pub direction: RunDirection,
}

impl Default for DrillRun {
    fn default() -> Self {
        Self {
            count: 1,
            pitch: 0.0,
            direction: RunDirection::AlongLength,
        }
    }
}

impl DrillRun {
    fn from_fields(fields: &FieldMap, default_angle: f64) -> Self {
        let count = field_u32(fields, "AN").unwrap_or(1).max(1);
        let pitch = field_f64(fields, "AB").unwrap_or(0.0);
        let angle = field_f64(fields, "WI").unwrap_or(default_angle);
        let direction = if angle == 90.0 {
            RunDirection::AlongWidth
        } else {
            RunDirection::AlongLength
        };
        Self {
            count,
            pitch,
            direction,
        }
    }
}

/// A coordinate field: either a literal value or one of the dimension
/// variables bound by the `[001` block
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum CoordExpr {
    Value(f64),
    Length,
    Width,
    Thickness,
}

impl CoordExpr {
    /// Parse a coordinate field value
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "x" => Some(CoordExpr::Length),
            "y" => Some(CoordExpr::Width),
            "z" => Some(CoordExpr::Thickness),
            _ => s.parse().ok().map(CoordExpr::Value),
        }
    }

    /// Resolve against the part dimensions
    pub fn resolve(self, dims: &Dimensions) -> f64 {
        match self {
            CoordExpr::Value(v) => v,
            CoordExpr::Length => dims.length,
            CoordExpr::Width => dims.width,
            CoordExpr::Thickness => dims.thickness,
        }
    }
}

/// `<102 \BohrVert\` - vertical drilling
#[derive(Clone, Debug, PartialEq)]
pub struct VerticalRecord {
    pub x: f64,
    /// Y in file coordinates (flipped across the part width)
    pub y_file: f64,
    pub side: HoleSide,
    pub diameter: f64,
    /// 0 means through
    pub depth: f64,
    pub run: DrillRun,
}

impl VerticalRecord {
    /// Decode from scanned fields; `None` means the record is malformed
    /// and gets skipped
    pub fn from_fields(fields: &FieldMap) -> Option<Self> {
        let x = field_f64(fields, "XA")?;
        let y_file = field_f64(fields, "YA")?;
        let diameter = field_f64(fields, "DU")?;
        let depth = field_f64(fields, "TI").unwrap_or(0.0);
        let side = fields
            .get("BM")
            .and_then(|c| side_from_code(c))
            .filter(|s| s.is_vertical())
            .unwrap_or(HoleSide::Top);

        Some(Self {
            x,
            y_file,
            side,
            diameter,
            depth,
            run: DrillRun::from_fields(fields, 0.0),
        })
    }
}

/// `<103 \BohrHoriz\` - horizontal drilling
#[derive(Clone, Debug, PartialEq)]
pub struct HorizontalRecord {
    pub x: CoordExpr,
    /// Y in file coordinates (flipped across the part width)
    pub y_file: f64,
    pub z: f64,
    pub side: HoleSide,
    pub diameter: f64,
    pub depth: f64,
    pub run: DrillRun,
}

impl HorizontalRecord {
    /// Decode from scanned fields; `None` means the record is malformed
    /// and gets skipped
    pub fn from_fields(fields: &FieldMap) -> Option<Self> {
        let x = fields.get("XA").and_then(|v| CoordExpr::parse(v))?;
        let y_file = field_f64(fields, "YA")?;
        let z = field_f64(fields, "ZA").unwrap_or(0.0);
        let diameter = field_f64(fields, "DU")?;
        let depth = field_f64(fields, "TI").unwrap_or(0.0);
        let side = fields
            .get("BM")
            .and_then(|c| side_from_code(c))
            .filter(|s| !s.is_vertical())
            .unwrap_or(HoleSide::LengthStart);

        Some(Self {
            x,
            y_file,
            z,
            side,
            diameter,
            depth,
            run: DrillRun::from_fields(fields, 90.0),
        })
    }
}

/// One decoded body section
#[derive(Clone, Debug, PartialEq)]
pub enum BodyRecord {
    Workpiece,
    Vertical(VerticalRecord),
    Horizontal(HorizontalRecord),
    Comment(Vec<String>),
    /// Unrecognized section, carried for diagnostics and otherwise
    /// ignored
    Unknown,
}
