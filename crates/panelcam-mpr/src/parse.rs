// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Program parsing
//!
//! Two-state scan with no backtracking: header fields are collected by
//! key in any order until the first body section marker, then body
//! sections decode into typed records and expand into holes. Unknown or
//! malformed sections are skipped so vendor format variants still parse.

use crate::error::{CodecError, CodecResult};
use crate::record::{BodyRecord, FieldMap, HorizontalRecord, RunDirection, VerticalRecord};
use crate::vocab::{KEY_LENGTH, KEY_THICKNESS, KEY_WIDTH, TERMINATOR};
use panelcam_model::{Dimensions, Hole, HoleKind, HoleSide, Part};
use tracing::debug;

/// Parser state; transitions Header -> Body on the first section marker
/// and never backtracks
enum State {
    Header,
    Body,
}

/// Parse one MPR program into a part
///
/// The part name is not encoded in the program; callers typically rename
/// from the file name.
pub fn parse_program(content: &str) -> CodecResult<Part> {
    let lines: Vec<&str> = content.lines().collect();

    let mut state = State::Header;
    let mut length: Option<f64> = None;
    let mut width: Option<f64> = None;
    let mut thickness: Option<f64> = None;
    let mut dims: Option<Dimensions> = None;

    let mut holes: Vec<Hole> = Vec::new();
    let mut comments: Vec<String> = Vec::new();

    let mut i = 0;
    while i < lines.len() {
        let line = lines[i].trim();

        match state {
            State::Header => {
                if line.starts_with('<') {
                    // First body record marker: the header is complete
                    dims = Some(
                        build_dims(length, width, thickness)
                            .ok_or(CodecError::MissingDimensions)?,
                    );
                    state = State::Body;
                    continue;
                }
                if let Some(v) = header_dim(line, KEY_LENGTH) {
                    length = Some(v);
                } else if let Some(v) = header_dim(line, KEY_WIDTH) {
                    width = Some(v);
                } else if let Some(v) = header_dim(line, KEY_THICKNESS) {
                    thickness = Some(v);
                }
                i += 1;
            }
            State::Body => {
                if line == TERMINATOR {
                    break;
                }
                if line.starts_with('<') || line.starts_with('[') {
                    let (pairs, next) = scan_fields(&lines, i + 1);
                    let record = decode_section(line, &pairs);
                    let Some(d) = dims else { break };
                    match record {
                        BodyRecord::Vertical(rec) => expand_vertical(&rec, &d, &mut holes),
                        BodyRecord::Horizontal(rec) => expand_horizontal(&rec, &d, &mut holes),
                        BodyRecord::Comment(km) => comments.extend(km),
                        BodyRecord::Workpiece => {}
                        BodyRecord::Unknown => {
                            debug!(marker = line, "skipping unrecognized program section");
                        }
                    }
                    i = next;
                } else {
                    i += 1;
                }
            }
        }
    }

    let dims = match dims {
        Some(d) => d,
        None => build_dims(length, width, thickness).ok_or(CodecError::MissingDimensions)?,
    };

    let mut part = Part::new("Part", dims);
    part.holes = holes;
    part.comments = comments;
    Ok(part)
}

fn build_dims(length: Option<f64>, width: Option<f64>, thickness: Option<f64>) -> Option<Dimensions> {
    Some(Dimensions::new(length?, width?, thickness?))
}

/// Match a `_BSX=123.456789` style header field
fn header_dim(line: &str, key: &str) -> Option<f64> {
    let rest = line.strip_prefix(key)?.strip_prefix('=')?;
    rest.trim().trim_matches('"').parse().ok()
}

/// Collect the `KEY="value"` lines following a section marker
///
/// Stops at the next section marker, the terminator, or any line that is
/// not a field. Returns the pairs in file order plus the index of the
/// line that ended the scan.
fn scan_fields(lines: &[&str], start: usize) -> (Vec<(String, String)>, usize) {
    let mut pairs = Vec::new();
    let mut j = start;

    while j < lines.len() {
        let line = lines[j].trim();
        if line.starts_with('<') || line.starts_with('[') || line == TERMINATOR {
            break;
        }
        if line.is_empty() {
            j += 1;
            continue;
        }
        match line.split_once('=') {
            Some((key, value)) => {
                pairs.push((
                    key.trim().to_string(),
                    value.trim().trim_matches('"').to_string(),
                ));
            }
            None => break,
        }
        j += 1;
    }

    (pairs, j)
}

/// Decode one section into its typed record
///
/// Malformed drilling sections (missing mandatory fields) decode to
/// `Unknown` and are skipped, never fatal.
fn decode_section(marker: &str, pairs: &[(String, String)]) -> BodyRecord {
    let fields: FieldMap = pairs.iter().cloned().collect();

    if marker.starts_with("<102") {
        match VerticalRecord::from_fields(&fields) {
            Some(rec) => BodyRecord::Vertical(rec),
            None => BodyRecord::Unknown,
        }
    } else if marker.starts_with("<103") {
        match HorizontalRecord::from_fields(&fields) {
            Some(rec) => BodyRecord::Horizontal(rec),
            None => BodyRecord::Unknown,
        }
    } else if marker.starts_with("<101") {
        let km = pairs
            .iter()
            .filter(|(k, _)| k == "KM")
            .map(|(_, v)| v.clone())
            .filter(|v| !v.is_empty())
            .collect();
        BodyRecord::Comment(km)
    } else if marker.starts_with("<100") {
        BodyRecord::Workpiece
    } else {
        BodyRecord::Unknown
    }
}

/// Expand a vertical record into `count` holes in part coordinates
fn expand_vertical(rec: &VerticalRecord, dims: &Dimensions, holes: &mut Vec<Hole>) {
    let z = match rec.side {
        HoleSide::Bottom => 0.0,
        _ => dims.thickness,
    };

    for n in 0..rec.run.count {
        let step = n as f64 * rec.run.pitch;
        let (x, y_file) = match rec.run.direction {
            RunDirection::AlongLength => (rec.x + step, rec.y_file),
            RunDirection::AlongWidth => (rec.x, rec.y_file + step),
        };
        holes.push(Hole {
            x,
            y: dims.width - y_file,
            z,
            diameter: rec.diameter,
            depth: rec.depth,
            kind: HoleKind::Vertical,
            side: rec.side,
            flagged: false,
        });
    }
}

/// Expand a horizontal record into `count` holes in part coordinates
fn expand_horizontal(rec: &HorizontalRecord, dims: &Dimensions, holes: &mut Vec<Hole>) {
    let x0 = rec.x.resolve(dims);

    for n in 0..rec.run.count {
        let step = n as f64 * rec.run.pitch;
        let (x, y_file) = match rec.run.direction {
            RunDirection::AlongLength => (x0 + step, rec.y_file),
            RunDirection::AlongWidth => (x0, rec.y_file + step),
        };
        holes.push(Hole {
            x,
            y: dims.width - y_file,
            z: rec.z,
            diameter: rec.diameter,
            depth: rec.depth,
            kind: HoleKind::Horizontal,
            side: rec.side,
            flagged: false,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = "[H\r\n_BSX=800.000000\r\n_BSY=500.000000\r\n_BSZ=18.000000\r\n\r\n<100 \\WerkStck\\\r\nLA=\"x\"\r\nBR=\"y\"\r\nDI=\"z\"\r\n!";

    #[test]
    fn test_dimensions_from_header() {
        let part = parse_program(MINIMAL).unwrap();
        assert_eq!(part.dimensions.length, 800.0);
        assert_eq!(part.dimensions.width, 500.0);
        assert_eq!(part.dimensions.thickness, 18.0);
        assert!(part.holes.is_empty());
    }

    #[test]
    fn test_missing_dimensions_is_fatal() {
        let err = parse_program("[H\r\nVERSION=\"4.0\"\r\n!").unwrap_err();
        assert!(matches!(err, CodecError::MissingDimensions));
    }

    #[test]
    fn test_header_keys_in_any_order() {
        let text = "[H\r\n_BSZ=18.000000\r\n_BSX=800.000000\r\n_BSY=500.000000\r\n!";
        let part = parse_program(text).unwrap();
        assert_eq!(part.dimensions.length, 800.0);
        assert_eq!(part.dimensions.thickness, 18.0);
    }

    #[test]
    fn test_vertical_run_expands() {
        let text = "[H\r\n_BSX=800.000000\r\n_BSY=500.000000\r\n_BSZ=18.000000\r\n\r\n<102 \\BohrVert\\\r\nXA=\"100\"\r\nYA=\"450\"\r\nBM=\"LS\"\r\nDU=\"5\"\r\nAN=\"3\"\r\nAB=\"32\"\r\nWI=\"0\"\r\n!";
        let part = parse_program(text).unwrap();

        assert_eq!(part.holes.len(), 3);
        let xs: Vec<f64> = part.holes.iter().map(|h| h.x).collect();
        assert_eq!(xs, vec![100.0, 132.0, 164.0]);
        for h in &part.holes {
            assert!((h.y - 50.0).abs() < 1e-9, "file Y flips back across width");
            assert!(h.is_through());
            assert_eq!(h.side, HoleSide::Top);
        }
    }

    #[test]
    fn test_run_along_width() {
        let text = "[H\r\n_BSX=800.000000\r\n_BSY=500.000000\r\n_BSZ=18.000000\r\n\r\n<102 \\BohrVert\\\r\nXA=\"100\"\r\nYA=\"100\"\r\nDU=\"5\"\r\nAN=\"2\"\r\nAB=\"64\"\r\nWI=\"90\"\r\n!";
        let part = parse_program(text).unwrap();

        assert_eq!(part.holes.len(), 2);
        assert_eq!(part.holes[0].y, 400.0);
        assert_eq!(part.holes[1].y, 336.0);
        assert_eq!(part.holes[0].x, part.holes[1].x);
    }

    #[test]
    fn test_horizontal_variable_x() {
        let text = "[H\r\n_BSX=800.000000\r\n_BSY=500.000000\r\n_BSZ=18.000000\r\n\r\n<103 \\BohrHoriz\\\r\nMI=\"0\"\r\nXA=\"x\"\r\nYA=\"350\"\r\nZA=\"9\"\r\nDU=\"8\"\r\nTI=\"22\"\r\nBM=\"XM\"\r\nAN=\"1\"\r\nAB=\"0\"\r\n!";
        let part = parse_program(text).unwrap();

        assert_eq!(part.holes.len(), 1);
        let h = &part.holes[0];
        assert_eq!(h.kind, HoleKind::Horizontal);
        assert_eq!(h.x, 800.0, "the x variable resolves to the part length");
        assert_eq!(h.y, 150.0);
        assert_eq!(h.z, 9.0);
        assert_eq!(h.side, HoleSide::LengthEnd);
    }

    #[test]
    fn test_malformed_record_is_skipped() {
        // Vertical record missing DU: skipped, program still parses
        let text = "[H\r\n_BSX=800.000000\r\n_BSY=500.000000\r\n_BSZ=18.000000\r\n\r\n<102 \\BohrVert\\\r\nXA=\"100\"\r\nYA=\"450\"\r\n\r\n<102 \\BohrVert\\\r\nXA=\"200\"\r\nYA=\"450\"\r\nDU=\"5\"\r\n!";
        let part = parse_program(text).unwrap();
        assert_eq!(part.holes.len(), 1);
        assert_eq!(part.holes[0].x, 200.0);
    }

    #[test]
    fn test_unknown_section_is_skipped() {
        let text = "[H\r\n_BSX=800.000000\r\n_BSY=500.000000\r\n_BSZ=18.000000\r\n\r\n<139 \\Komponente\\\r\nIN=\"ZP500.mpr\"\r\nXA=\"0.0\"\r\n\r\n<102 \\BohrVert\\\r\nXA=\"100\"\r\nYA=\"450\"\r\nDU=\"5\"\r\n!";
        let part = parse_program(text).unwrap();
        assert_eq!(part.holes.len(), 1);
    }

    #[test]
    fn test_comments_collected() {
        let text = "[H\r\n_BSX=800.000000\r\n_BSY=500.000000\r\n_BSZ=18.000000\r\n\r\n<101 \\Kommentar\\\r\nKM=\"front panel\"\r\nKM=\"grain vertical\"\r\nKAT=\"Kommentar\"\r\n!";
        let part = parse_program(text).unwrap();
        assert_eq!(
            part.comments,
            vec!["front panel".to_string(), "grain vertical".to_string()]
        );
    }

    #[test]
    fn test_lf_only_line_endings() {
        let text = "[H\n_BSX=800.000000\n_BSY=500.000000\n_BSZ=18.000000\n!";
        let part = parse_program(text).unwrap();
        assert_eq!(part.dimensions.length, 800.0);
    }
}
