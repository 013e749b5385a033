// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! panelcam-step - STEP solid-model extraction for panel drilling
//!
//! This crate reads STEP neutral-format text and produces the structured
//! part/hole model consumed by the MPR codec (`panelcam-mpr`):
//!
//! - **Record scanning** with SIMD-accelerated byte search
//! - **Lazy entity decoding** into a cached graph
//! - **Geometry resolution**: bounding boxes, cylinder candidates
//! - **Axis/role mapping** and **hole classification**
//! - **Part/accessory splitting** by name keywords
//!
//! # Example
//!
//! ```ignore
//! use panelcam_step::parse_cad;
//!
//! let extraction = parse_cad(step_content)?;
//! for part in &extraction.parts {
//!     println!("{}: {} holes", part.name, part.holes.len());
//! }
//! ```
//!
//! The pipeline is single-threaded and synchronous per document; callers
//! batch-processing many documents parallelize across documents. All I/O
//! happens at the caller's edge - this crate only ever sees text.

pub mod axes;
pub mod classify;
pub mod geometry;
pub mod report;
pub mod scanner;
pub mod split;
pub mod tokenizer;

mod resolver;

pub use geometry::CylinderCandidate;
pub use resolver::EntityGraph;
pub use scanner::RecordScanner;
pub use tokenizer::parse_record;

use panelcam_model::{Accessory, Dimensions, ExtractError, Part, Result, Tolerances};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Result of extracting one document
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Extraction {
    pub parts: Vec<Part>,
    pub accessories: Vec<Accessory>,
}

/// STEP extractor with explicit tolerances
///
/// One extractor can process any number of documents; each call owns an
/// independent entity graph, so extractors are freely shared across a
/// worker pool.
#[derive(Clone, Debug, Default)]
pub struct StepExtractor {
    tolerances: Tolerances,
}

impl StepExtractor {
    /// Extractor with default tolerances
    pub fn new() -> Self {
        Self::default()
    }

    /// Extractor with explicit tolerances
    pub fn with_tolerances(tolerances: Tolerances) -> Self {
        Self { tolerances }
    }

    /// The active tolerance configuration
    pub fn tolerances(&self) -> &Tolerances {
        &self.tolerances
    }

    /// Extract parts and accessories from one STEP document
    ///
    /// A document with no recognizable records is fatal. A solid with
    /// degenerate or unreachable geometry is skipped with a warning and
    /// the rest of the document still processes.
    pub fn extract(&self, content: &str) -> Result<Extraction> {
        let mut graph = EntityGraph::new(content);
        if graph.is_empty() {
            return Err(ExtractError::NoRecords);
        }
        debug!(records = graph.record_count(), "entity graph built");

        let solids = split::named_solids(&mut graph);
        let (machinable, accessories) = split::split_accessories(solids);

        let mut parts = Vec::with_capacity(machinable.len());
        for solid in machinable {
            let bbox = geometry::bounding_box(&mut graph, solid.id);
            if bbox.is_degenerate() {
                warn!(solid = %solid.id, name = %solid.name, "degenerate geometry; skipping solid");
                continue;
            }

            let candidates = geometry::find_cylinders(&mut graph, &bbox, &self.tolerances);
            let roles = axes::infer_roles(&bbox, &candidates, &self.tolerances);
            let holes = classify::classify_holes(&candidates, &bbox, &roles, &self.tolerances);

            let dimensions = Dimensions::new(
                round2(bbox.extent(roles.length)),
                round2(bbox.extent(roles.width)),
                round2(bbox.extent(roles.thickness)),
            );

            debug!(
                name = %solid.name,
                length = dimensions.length,
                width = dimensions.width,
                thickness = dimensions.thickness,
                holes = holes.len(),
                "solid extracted"
            );

            let mut part = Part::new(solid.name, dimensions);
            part.holes = holes;
            parts.push(part);
        }

        Ok(Extraction { parts, accessories })
    }
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

/// Parse a CAD document with default tolerances
pub fn parse_cad(content: &str) -> Result<Extraction> {
    StepExtractor::new().extract(content)
}
