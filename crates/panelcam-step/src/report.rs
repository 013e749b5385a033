// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Cut-list report
//!
//! Plain-text summary of an extraction for the shop floor: one block per
//! part with ordered dimensions and holes, an accessory tally, and
//! totals. This is a human-readable companion to the machine programs,
//! not a machine format.

use panelcam_model::{Accessory, Part};
use std::fmt::Write;

const RULE: &str = "------------------------------------------------------------";
const DOUBLE_RULE: &str = "============================================================";

/// Render the cut list for one extraction
pub fn cut_list(parts: &[Part], accessories: &[Accessory], project: &str) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "{DOUBLE_RULE}");
    let _ = writeln!(out, "CUT LIST - {}", project.to_uppercase());
    let _ = writeln!(out, "{DOUBLE_RULE}");
    let _ = writeln!(out);
    let _ = writeln!(out, "{RULE}");
    let _ = writeln!(out, "PARTS");
    let _ = writeln!(out, "{RULE}");
    let _ = writeln!(out);

    for (i, part) in parts.iter().enumerate() {
        let d = part.dimensions;
        let _ = writeln!(out, "{}. {}", i + 1, part.name);
        let _ = writeln!(
            out,
            "   Dimensions: {} x {} x {} mm (L x W x T)",
            d.length, d.width, d.thickness
        );
        let _ = writeln!(out, "   Holes: {}", part.holes.len());
        for hole in &part.holes {
            let _ = writeln!(
                out,
                "      - {} hole D{} mm at X={}, Y={}",
                hole.side, hole.diameter, hole.x, hole.y
            );
        }
        let _ = writeln!(out);
    }

    if !accessories.is_empty() {
        let _ = writeln!(out, "{RULE}");
        let _ = writeln!(out, "ACCESSORIES AND HARDWARE");
        let _ = writeln!(out, "{RULE}");
        let _ = writeln!(out);
        for accessory in accessories {
            let _ = writeln!(out, "* {}: {} pcs", accessory.name, accessory.count);
        }
        let _ = writeln!(out);
    }

    let total_holes: usize = parts.iter().map(|p| p.holes.len()).sum();
    let total_accessories: u32 = accessories.iter().map(|a| a.count).sum();

    let _ = writeln!(out, "{RULE}");
    let _ = writeln!(out, "SUMMARY");
    let _ = writeln!(out, "{RULE}");
    let _ = writeln!(out, "Total parts: {}", parts.len());
    let _ = writeln!(out, "Total holes: {total_holes}");
    let _ = writeln!(out, "Total accessories: {total_accessories}");
    let _ = writeln!(out, "{DOUBLE_RULE}");

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use panelcam_model::{Dimensions, Hole, HoleKind, HoleSide};

    #[test]
    fn test_cut_list_layout() {
        let mut part = Part::new("Base", Dimensions::new(800.0, 500.0, 18.0));
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
        let accessories = vec![Accessory {
            name: "Parafuso M6".into(),
            count: 8,
        }];

        let report = cut_list(&[part], &accessories, "Kitchen");

        assert!(report.contains("CUT LIST - KITCHEN"));
        assert!(report.contains("1. Base"));
        assert!(report.contains("800 x 500 x 18 mm"));
        assert!(report.contains("Parafuso M6: 8 pcs"));
        assert!(report.contains("Total parts: 1"));
        assert!(report.contains("Total holes: 1"));
    }

    #[test]
    fn test_no_accessories_section_when_empty() {
        let report = cut_list(&[], &[], "x");
        assert!(!report.contains("ACCESSORIES"));
        assert!(report.contains("Total parts: 0"));
    }
}
