// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The manufacturing model: parts, holes, accessories
//!
//! Coordinates are role-mapped part coordinates, not raw STEP space:
//! `x` runs along the length, `y` along the width, `z` through the
//! thickness, all measured from the part's minimum corner.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Drilling direction of a hole
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HoleKind {
    /// Drilled perpendicular to the panel face, through the thickness axis
    Vertical,
    /// Drilled into an edge face, along the length or width axis
    Horizontal,
}

/// Entry face of a hole
///
/// Vertical holes enter through `Top` or `Bottom`; horizontal holes enter
/// through one of the four edge faces.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HoleSide {
    Top,
    Bottom,
    LengthStart,
    LengthEnd,
    WidthStart,
    WidthEnd,
}

impl HoleSide {
    /// True for the two vertical entry faces
    pub fn is_vertical(self) -> bool {
        matches!(self, HoleSide::Top | HoleSide::Bottom)
    }
}

impl fmt::Display for HoleSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            HoleSide::Top => "top",
            HoleSide::Bottom => "bottom",
            HoleSide::LengthStart => "length-start",
            HoleSide::LengthEnd => "length-end",
            HoleSide::WidthStart => "width-start",
            HoleSide::WidthEnd => "width-end",
        };
        write!(f, "{s}")
    }
}

/// One classified drill hole
///
/// `depth == 0` signals a through hole. A horizontal hole's entry-axis
/// coordinate is pinned to exactly 0 or the part extent on that axis.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Hole {
    /// Offset along the length axis
    pub x: f64,
    /// Offset along the width axis
    pub y: f64,
    /// Offset through the thickness axis
    pub z: f64,
    /// Drill diameter
    pub diameter: f64,
    /// Drilling depth; 0 means through
    pub depth: f64,
    pub kind: HoleKind,
    pub side: HoleSide,
    /// Set when no border rule matched and the classifier fell back to a
    /// vertical hole at measured offsets
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub flagged: bool,
}

impl Hole {
    /// True for through holes
    pub fn is_through(&self) -> bool {
        self.depth == 0.0
    }
}

/// Part dimensions after axis-role mapping
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Dimensions {
    pub length: f64,
    pub width: f64,
    pub thickness: f64,
}

impl Dimensions {
    pub fn new(length: f64, width: f64, thickness: f64) -> Self {
        Self {
            length,
            width,
            thickness,
        }
    }
}

/// A single machinable panel
///
/// Holes keep classification insertion order; the codec regroups them as
/// needed on emission.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Part {
    pub name: String,
    pub dimensions: Dimensions,
    pub holes: Vec<Hole>,
    /// Free-text program comments carried into the drilling program
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub comments: Vec<String>,
}

impl Part {
    /// Part with no holes
    pub fn new(name: impl Into<String>, dimensions: Dimensions) -> Self {
        Self {
            name: name.into(),
            dimensions,
            holes: Vec::new(),
            comments: Vec::new(),
        }
    }

    /// Holes of one kind, in insertion order
    pub fn holes_of_kind(&self, kind: HoleKind) -> impl Iterator<Item = &Hole> {
        self.holes.iter().filter(move |h| h.kind == kind)
    }
}

/// A named non-machined solid (hardware), counted but not processed
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Accessory {
    pub name: String,
    pub count: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_through_hole() {
        let hole = Hole {
            x: 100.0,
            y: 50.0,
            z: 9.0,
            diameter: 5.0,
            depth: 0.0,
            kind: HoleKind::Vertical,
            side: HoleSide::Top,
            flagged: false,
        };
        assert!(hole.is_through());
    }

    #[test]
    fn test_holes_of_kind() {
        let mut part = Part::new("side", Dimensions::new(800.0, 500.0, 18.0));
        part.holes.push(Hole {
            x: 0.0,
            y: 50.0,
            z: 9.0,
            diameter: 8.0,
            depth: 22.0,
            kind: HoleKind::Horizontal,
            side: HoleSide::LengthStart,
            flagged: false,
        });
        part.holes.push(Hole {
            x: 100.0,
            y: 50.0,
            z: 18.0,
            diameter: 5.0,
            depth: 0.0,
            kind: HoleKind::Vertical,
            side: HoleSide::Top,
            flagged: false,
        });
        assert_eq!(part.holes_of_kind(HoleKind::Vertical).count(), 1);
        assert_eq!(part.holes_of_kind(HoleKind::Horizontal).count(), 1);
    }
}
