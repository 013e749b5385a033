// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Program generation
//!
//! Emits the fixed header block, the workpiece definition, one record
//! per hole or hole run, optional comments, and the terminator line.
//! Vertical holes sharing a width row, diameter, and depth that are
//! evenly spaced along the length collapse into a single replicated
//! record; everything else emits individually.

use crate::vocab::{
    format_num, side_code, SECTION_COMMENT, SECTION_HEADER, SECTION_HORIZONTAL, SECTION_VARS,
    SECTION_VERTICAL, SECTION_WORKPIECE, TERMINATOR,
};
use panelcam_model::{Hole, HoleKind, Part, Tolerances};

/// MPR program generator
#[derive(Clone, Debug)]
pub struct MprGenerator {
    version: String,
    ww: String,
    tolerances: Tolerances,
}

impl Default for MprGenerator {
    fn default() -> Self {
        Self {
            version: "4.0 Alpha".to_string(),
            ww: "6.0.18".to_string(),
            tolerances: Tolerances::default(),
        }
    }
}

/// One emitted vertical group: an anchor hole plus replication
struct VerticalGroup<'a> {
    anchor: &'a Hole,
    count: u32,
    pitch: f64,
}

impl MprGenerator {
    /// Generator with default version tags and tolerances
    pub fn new() -> Self {
        Self::default()
    }

    /// Generator with explicit tolerances (run-pitch matching)
    pub fn with_tolerances(tolerances: Tolerances) -> Self {
        Self {
            tolerances,
            ..Self::default()
        }
    }

    /// Generate the MPR program text for one part
    pub fn generate(&self, part: &Part) -> String {
        let d = part.dimensions;
        let mut mpr: Vec<String> = Vec::new();

        // ===== header =====
        mpr.push(SECTION_HEADER.to_string());
        mpr.push(format!("VERSION=\"{}\"", self.version));
        mpr.push(format!("WW=\"{}\"", self.ww));
        mpr.push("OP=\"1\"".to_string());
        mpr.push("WRK2=\"0\"".to_string());
        mpr.push("SCHN=\"0\"".to_string());
        mpr.push("HSP=\"0\"".to_string());
        mpr.push("O2=\"0\"".to_string());
        mpr.push("O4=\"0\"".to_string());
        mpr.push("O3=\"0\"".to_string());
        mpr.push("O5=\"0\"".to_string());
        mpr.push("SR=\"0\"".to_string());
        mpr.push("FM=\"1\"".to_string());
        mpr.push("ML=\"2000\"".to_string());
        mpr.push("UF=\"STANDARD\"".to_string());
        mpr.push("DN=\"STANDARD\"".to_string());
        mpr.push("GP=\"0\"".to_string());
        mpr.push("GY=\"0\"".to_string());
        mpr.push("GXY=\"0\"".to_string());
        mpr.push("NP=\"1\"".to_string());
        mpr.push("NE=\"0\"".to_string());
        mpr.push("NA=\"0\"".to_string());
        mpr.push("BFS=\"1\"".to_string());
        mpr.push("US=\"0\"".to_string());
        mpr.push("CB=\"0\"".to_string());
        mpr.push("UP=\"0\"".to_string());
        mpr.push("DW=\"0\"".to_string());
        mpr.push("MAT=\"HOMAG\"".to_string());
        mpr.push("INCH=\"0\"".to_string());
        mpr.push("VIEW=\"NOMIRROR\"".to_string());
        mpr.push("ANZ=\"1\"".to_string());
        mpr.push("BES=\"0\"".to_string());
        mpr.push("ENT=\"0\"".to_string());
        mpr.push(format!("_BSX={:.6}", d.length));
        mpr.push(format!("_BSY={:.6}", d.width));
        mpr.push(format!("_BSZ={:.6}", d.thickness));
        mpr.push("_FNX=0.000000".to_string());
        mpr.push("_FNY=0.000000".to_string());
        mpr.push("_RNX=0.000000".to_string());
        mpr.push("_RNY=0.000000".to_string());
        mpr.push("_RNZ=0.000000".to_string());
        mpr.push(format!("_RX={:.6}", d.length));
        mpr.push(format!("_RY={:.6}", d.width));

        // ===== variable block =====
        mpr.push(String::new());
        mpr.push(SECTION_VARS.to_string());
        mpr.push(format!("x=\"{}\"", d.length as i64));
        mpr.push("KM=\"\"".to_string());
        mpr.push(format!("y=\"{}\"", d.width as i64));
        mpr.push("KM=\"\"".to_string());
        mpr.push(format!("z=\"{}\"", d.thickness as i64));
        mpr.push("KM=\"\"".to_string());

        // ===== workpiece =====
        mpr.push(String::new());
        mpr.push(SECTION_WORKPIECE.to_string());
        mpr.push("LA=\"x\"".to_string());
        mpr.push("BR=\"y\"".to_string());
        mpr.push("DI=\"z\"".to_string());
        mpr.push("FNX=\"0\"".to_string());
        mpr.push("FNY=\"0\"".to_string());
        mpr.push("AX=\"0\"".to_string());
        mpr.push("AY=\"0\"".to_string());

        // ===== vertical drillings, run-grouped =====
        let verticals: Vec<&Hole> = part.holes_of_kind(HoleKind::Vertical).collect();
        for group in self.group_runs(&verticals) {
            mpr.push(String::new());
            self.emit_vertical(&mut mpr, &group, d.width);
        }

        // ===== horizontal drillings, one record each =====
        for hole in part.holes_of_kind(HoleKind::Horizontal) {
            mpr.push(String::new());
            self.emit_horizontal(&mut mpr, hole, d.width);
        }

        // ===== comments =====
        if !part.comments.is_empty() {
            mpr.push(String::new());
            mpr.push(SECTION_COMMENT.to_string());
            for comment in &part.comments {
                mpr.push(format!("KM=\"{comment}\""));
            }
            mpr.push("KAT=\"Kommentar\"".to_string());
            mpr.push("MNM=\"Comment\"".to_string());
            mpr.push("ORI=\"\"".to_string());
        }

        mpr.push(TERMINATOR.to_string());

        mpr.join("\r\n")
    }

    /// Merge consecutive collinear verticals into replicated groups
    ///
    /// Sorted by (width row, length offset); holes merge while they share
    /// the row, diameter, depth, and side and keep an even pitch.
    fn group_runs<'a>(&self, holes: &[&'a Hole]) -> Vec<VerticalGroup<'a>> {
        let eps = self.tolerances.run_pitch;
        let mut sorted: Vec<&Hole> = holes.to_vec();
        sorted.sort_by(|a, b| {
            (a.y, a.x)
                .partial_cmp(&(b.y, b.x))
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        let mut groups = Vec::new();
        let mut i = 0;
        while i < sorted.len() {
            let anchor = sorted[i];
            let mut count: u32 = 1;
            let mut pitch = 0.0;

            let mut j = i + 1;
            while j < sorted.len() {
                let prev = sorted[j - 1];
                let next = sorted[j];

                let same_row = (next.y - anchor.y).abs() <= eps
                    && (next.diameter - anchor.diameter).abs() <= eps
                    && (next.depth - anchor.depth).abs() <= eps
                    && next.side == anchor.side;
                if !same_row {
                    break;
                }

                let dist = next.x - prev.x;
                if count == 1 {
                    if dist <= eps {
                        break;
                    }
                    pitch = dist;
                    count = 2;
                } else if (dist - pitch).abs() < eps {
                    count += 1;
                } else {
                    break;
                }
                j += 1;
            }

            groups.push(VerticalGroup {
                anchor,
                count,
                pitch,
            });
            i = j.max(i + 1);
        }

        groups
    }

    fn emit_vertical(&self, mpr: &mut Vec<String>, group: &VerticalGroup, width: f64) {
        let hole = group.anchor;
        let y_file = width - hole.y;

        mpr.push(SECTION_VERTICAL.to_string());
        mpr.push(format!("XA=\"{}\"", format_num(hole.x)));
        mpr.push(format!("YA=\"{}\"", format_num(y_file)));
        mpr.push(format!("BM=\"{}\"", side_code(hole.side)));
        mpr.push(format!("DU=\"{}\"", format_num(hole.diameter)));
        if hole.depth > 0.0 {
            mpr.push(format!("TI=\"{}\"", format_num(hole.depth)));
        }
        mpr.push(format!("AN=\"{}\"", group.count));
        mpr.push("MI=\"0\"".to_string());
        mpr.push("S_=\"1\"".to_string());
        mpr.push(format!("AB=\"{}\"", format_num(group.pitch)));
        mpr.push("WI=\"0\"".to_string());
        mpr.push("ZT=\"0\"".to_string());
        mpr.push("RM=\"0\"".to_string());
        mpr.push("VW=\"0\"".to_string());
        mpr.push("HP=\"0\"".to_string());
        mpr.push("SP=\"0\"".to_string());
        mpr.push("YVE=\"0\"".to_string());
        mpr.push("WW=\"60,61,62,88,90,91,92,150\"".to_string());
        mpr.push("ASG=\"2\"".to_string());
        mpr.push("KAT=\"Bohren vertikal\"".to_string());
        mpr.push("MNM=\"Vertical drilling\"".to_string());
        mpr.push("ORI=\"\"".to_string());
        mpr.push("MX=\"0\"".to_string());
        mpr.push("MY=\"0\"".to_string());
        mpr.push("MZ=\"0\"".to_string());
        mpr.push("MXF=\"1\"".to_string());
        mpr.push("MYF=\"1\"".to_string());
        mpr.push("MZF=\"1\"".to_string());
        mpr.push("SYA=\"0\"".to_string());
        mpr.push("SYV=\"0\"".to_string());
        mpr.push("KO=\"00\"".to_string());
    }

    fn emit_horizontal(&self, mpr: &mut Vec<String>, hole: &Hole, width: f64) {
        let y_file = width - hole.y;

        mpr.push(SECTION_HORIZONTAL.to_string());
        mpr.push("MI=\"0\"".to_string());
        mpr.push(format!("XA=\"{}\"", format_num(hole.x)));
        mpr.push(format!("YA=\"{}\"", format_num(y_file)));
        mpr.push(format!("ZA=\"{}\"", format_num(hole.z)));
        mpr.push(format!("DU=\"{}\"", format_num(hole.diameter)));
        mpr.push(format!("TI=\"{}\"", format_num(hole.depth)));
        mpr.push("ANA=\"20\"".to_string());
        mpr.push(format!("BM=\"{}\"", side_code(hole.side)));
        mpr.push("AN=\"1\"".to_string());
        mpr.push("AB=\"0\"".to_string());
        mpr.push("BM2=\"STD\"".to_string());
        mpr.push("ZT=\"0\"".to_string());
        mpr.push("RM=\"0\"".to_string());
        mpr.push("VW=\"0\"".to_string());
        mpr.push("HP=\"0\"".to_string());
        mpr.push("SP=\"0\"".to_string());
        mpr.push("YVE=\"0\"".to_string());
        mpr.push("WW=\"50,51,52,53,93,94,95,56,153,151\"".to_string());
        mpr.push("ASG=\"2\"".to_string());
        mpr.push("KAT=\"Horizontalbohren\"".to_string());
        mpr.push("MNM=\"Horizontal drilling\"".to_string());
        mpr.push("ORI=\"\"".to_string());
        mpr.push("MX=\"0\"".to_string());
        mpr.push("MY=\"0\"".to_string());
        mpr.push("MZ=\"0\"".to_string());
        mpr.push("MXF=\"1\"".to_string());
        mpr.push("MYF=\"1\"".to_string());
        mpr.push("MZF=\"1\"".to_string());
        mpr.push("SYA=\"0\"".to_string());
        mpr.push("SYV=\"0\"".to_string());
        mpr.push("KO=\"00\"".to_string());
    }
}

/// Generate a program with default settings
pub fn generate_program(part: &Part) -> String {
    MprGenerator::new().generate(part)
}

#[cfg(test)]
mod tests {
    use super::*;
    use panelcam_model::{Dimensions, HoleSide};

    fn vertical(x: f64, y: f64, diameter: f64, depth: f64) -> Hole {
        Hole {
            x,
            y,
            z: 18.0,
            diameter,
            depth,
            kind: HoleKind::Vertical,
            side: HoleSide::Top,
            flagged: false,
        }
    }

    fn part_with(holes: Vec<Hole>) -> Part {
        let mut part = Part::new("Base", Dimensions::new(800.0, 500.0, 18.0));
        part.holes = holes;
        part
    }

    #[test]
    fn test_header_fields() {
        let text = generate_program(&part_with(vec![]));
        assert!(text.starts_with("[H\r\n"));
        assert!(text.contains("_BSX=800.000000"));
        assert!(text.contains("_BSY=500.000000"));
        assert!(text.contains("_BSZ=18.000000"));
        assert!(text.contains("LA=\"x\""));
        assert!(text.ends_with("!"));
        assert!(text.contains("\r\n"));
    }

    #[test]
    fn test_through_hole_omits_depth() {
        let text = generate_program(&part_with(vec![vertical(100.0, 150.0, 5.0, 0.0)]));
        let record = text.split("<102").nth(1).unwrap();
        assert!(!record.contains("TI="));
        assert!(record.contains("DU=\"5\""));
        // Y flips across the width
        assert!(record.contains("YA=\"350\""));
    }

    #[test]
    fn test_blind_hole_carries_depth() {
        let text = generate_program(&part_with(vec![vertical(100.0, 150.0, 8.0, 11.0)]));
        assert!(text.contains("TI=\"11\""));
    }

    #[test]
    fn test_even_run_collapses_to_one_record() {
        let holes = vec![
            vertical(100.0, 50.0, 5.0, 0.0),
            vertical(132.0, 50.0, 5.0, 0.0),
            vertical(164.0, 50.0, 5.0, 0.0),
        ];
        let text = generate_program(&part_with(holes));

        assert_eq!(text.matches("<102").count(), 1);
        assert!(text.contains("AN=\"3\""));
        assert!(text.contains("AB=\"32\""));
        assert!(text.contains("XA=\"100\""));
    }

    #[test]
    fn test_uneven_spacing_does_not_merge() {
        let holes = vec![
            vertical(100.0, 50.0, 5.0, 0.0),
            vertical(132.0, 50.0, 5.0, 0.0),
            vertical(180.0, 50.0, 5.0, 0.0),
        ];
        let text = generate_program(&part_with(holes));

        // 100 -> 132 merges; 180 breaks the pitch and emits alone
        assert_eq!(text.matches("<102").count(), 2);
        assert!(text.contains("AN=\"2\""));
    }

    #[test]
    fn test_different_diameters_do_not_merge() {
        let holes = vec![
            vertical(100.0, 50.0, 5.0, 0.0),
            vertical(132.0, 50.0, 8.0, 0.0),
        ];
        let text = generate_program(&part_with(holes));
        assert_eq!(text.matches("<102").count(), 2);
    }

    #[test]
    fn test_horizontal_emits_individually() {
        let mut part = part_with(vec![]);
        part.holes.push(Hole {
            x: 0.0,
            y: 150.0,
            z: 9.0,
            diameter: 8.0,
            depth: 22.0,
            kind: HoleKind::Horizontal,
            side: HoleSide::LengthStart,
            flagged: false,
        });
        let text = MprGenerator::new().generate(&part);

        let record = text.split("<103").nth(1).unwrap();
        assert!(record.contains("BM=\"XP\""));
        assert!(record.contains("ZA=\"9\""));
        assert!(record.contains("TI=\"22\""));
        assert!(record.contains("YA=\"350\""));
    }

    #[test]
    fn test_comments_block() {
        let mut part = part_with(vec![]);
        part.comments.push("edge banding on front".to_string());
        let text = generate_program(&part);
        assert!(text.contains("<101 \\Kommentar\\"));
        assert!(text.contains("KM=\"edge banding on front\""));
    }
}
