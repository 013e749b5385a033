// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Resolved geometry types: bounding boxes and the axis-role mapping

use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the three spatial axes of STEP space
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    /// All three axes in file order
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    /// Index into a `[f64; 3]` coordinate triple
    pub fn index(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Axis::X => write!(f, "x"),
            Axis::Y => write!(f, "y"),
            Axis::Z => write!(f, "z"),
        }
    }
}

/// Axis-aligned bounding box over STEP space
///
/// Derived from the full point set reachable from a solid's topology.
/// `min[i] <= max[i]` holds for every axis of a valid box; a box that
/// never absorbed a point is degenerate and the owning solid is skipped.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min: [f64; 3],
    pub max: [f64; 3],
}

impl BoundingBox {
    /// An empty box ready to absorb points
    pub fn empty() -> Self {
        Self {
            min: [f64::INFINITY; 3],
            max: [f64::NEG_INFINITY; 3],
        }
    }

    /// Box from explicit corners
    pub fn new(min: [f64; 3], max: [f64; 3]) -> Self {
        Self { min, max }
    }

    /// Grow to include a point
    pub fn absorb(&mut self, p: [f64; 3]) {
        for i in 0..3 {
            self.min[i] = self.min[i].min(p[i]);
            self.max[i] = self.max[i].max(p[i]);
        }
    }

    /// True if no point was ever absorbed, or the box has zero extent on
    /// every axis
    pub fn is_degenerate(&self) -> bool {
        if self.min[0] > self.max[0] {
            return true;
        }
        Axis::ALL.iter().all(|a| self.extent(*a) == 0.0)
    }

    /// Extent along one axis
    pub fn extent(&self, axis: Axis) -> f64 {
        let i = axis.index();
        (self.max[i] - self.min[i]).abs()
    }

    /// All three extents in axis order
    pub fn extents(&self) -> [f64; 3] {
        [
            self.extent(Axis::X),
            self.extent(Axis::Y),
            self.extent(Axis::Z),
        ]
    }

    /// Point containment with a uniform margin on every side
    pub fn contains_with_margin(&self, p: [f64; 3], margin: f64) -> bool {
        (0..3).all(|i| p[i] >= self.min[i] - margin && p[i] <= self.max[i] + margin)
    }

    /// Offset of a point from the box minimum along one axis
    pub fn offset(&self, p: [f64; 3], axis: Axis) -> f64 {
        p[axis.index()] - self.min[axis.index()]
    }
}

impl Default for BoundingBox {
    fn default() -> Self {
        Self::empty()
    }
}

/// Bijection from the three spatial axes to the structural roles
/// length/width/thickness
///
/// Exactly one axis maps to each role. Produced by the axis/role mapper
/// (`panelcam-step::axes`) and consumed by the hole classifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AxisRoleMap {
    /// Axis carrying the part length (largest extent unless overridden)
    pub length: Axis,
    /// Axis carrying the part width
    pub width: Axis,
    /// Axis carrying the material thickness (smallest extent)
    pub thickness: Axis,
}

impl AxisRoleMap {
    /// Build a map, enforcing that the three axes are distinct
    pub fn new(length: Axis, width: Axis, thickness: Axis) -> Self {
        debug_assert!(length != width && width != thickness && length != thickness);
        Self {
            length,
            width,
            thickness,
        }
    }

    /// Swap the length and width roles, keeping thickness
    pub fn swapped(self) -> Self {
        Self {
            length: self.width,
            width: self.length,
            thickness: self.thickness,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bbox_absorb() {
        let mut bbox = BoundingBox::empty();
        assert!(bbox.is_degenerate());

        bbox.absorb([0.0, 0.0, 0.0]);
        bbox.absorb([500.0, 300.0, 18.0]);

        assert!(!bbox.is_degenerate());
        assert_eq!(bbox.extent(Axis::X), 500.0);
        assert_eq!(bbox.extent(Axis::Y), 300.0);
        assert_eq!(bbox.extent(Axis::Z), 18.0);
    }

    #[test]
    fn test_bbox_single_point_is_degenerate() {
        let mut bbox = BoundingBox::empty();
        bbox.absorb([1.0, 2.0, 3.0]);
        assert!(bbox.is_degenerate());
    }

    #[test]
    fn test_contains_with_margin() {
        let bbox = BoundingBox::new([0.0, 0.0, 0.0], [100.0, 50.0, 18.0]);
        assert!(bbox.contains_with_margin([102.0, 25.0, 9.0], 5.0));
        assert!(!bbox.contains_with_margin([110.0, 25.0, 9.0], 5.0));
        assert!(bbox.contains_with_margin([-4.9, 0.0, 0.0], 5.0));
    }

    #[test]
    fn test_role_map_swap() {
        let map = AxisRoleMap::new(Axis::X, Axis::Y, Axis::Z);
        let swapped = map.swapped();
        assert_eq!(swapped.length, Axis::Y);
        assert_eq!(swapped.width, Axis::X);
        assert_eq!(swapped.thickness, Axis::Z);
    }
}
