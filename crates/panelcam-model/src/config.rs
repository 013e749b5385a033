// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Classification tolerances
//!
//! All distance/size thresholds used by the geometry resolver, the hole
//! classifier, and the codec's run grouping live here, passed explicitly
//! rather than hard-coded per call site. Units are the units of the input
//! document (millimeters in practice).

use serde::{Deserialize, Serialize};

/// Immutable tolerance configuration for one extraction run
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tolerances {
    /// Distance within which a feature counts as touching a part face
    pub border: f64,
    /// Margin around a solid's bounding box when attributing cylinders
    /// found elsewhere in the document to that solid
    pub bbox_margin: f64,
    /// Cylinders below this diameter are rejected as noise
    pub min_diameter: f64,
    /// Cylinders above this diameter are rejected as counterbores/recesses
    pub max_diameter: f64,
    /// Vertical holes at or below this diameter with no measured extent
    /// are treated as through holes
    pub through_diameter: f64,
    /// Nominal depth for blind vertical holes with no measured extent
    pub vertical_depth: f64,
    /// Nominal depth for horizontal holes with no measured extent
    pub horizontal_depth: f64,
    /// Grid size for the tolerance-rounded deduplication key
    pub dedup_grid: f64,
    /// Maximum spacing error when merging evenly spaced holes into a run
    pub run_pitch: f64,
}

impl Default for Tolerances {
    fn default() -> Self {
        Self {
            border: 2.0,
            bbox_margin: 5.0,
            min_diameter: 2.0,
            max_diameter: 15.0,
            through_diameter: 6.0,
            vertical_depth: 11.0,
            horizontal_depth: 22.0,
            dedup_grid: 1.0,
            run_pitch: 0.1,
        }
    }
}

impl Tolerances {
    /// Snap a coordinate onto the deduplication grid
    pub fn snap(&self, value: f64) -> i64 {
        (value / self.dedup_grid).round() as i64
    }

    /// True if `offset` lies within border tolerance of 0 or `extent`
    pub fn at_border(&self, offset: f64, extent: f64) -> bool {
        offset <= self.border || offset >= extent - self.border
    }
}
