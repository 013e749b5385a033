// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Fast record scanner using SIMD-accelerated byte searching
//!
//! Locates `#<id> = TYPE(...);` records in a STEP document without fully
//! parsing them. Records may span multiple physical lines; quoted strings
//! are opaque to the terminator search, so a `;` inside a name does not
//! end a record.

use memchr::memchr;
use rustc_hash::FxHashMap;

/// Record index mapping id to byte offsets
pub type RecordIndex = FxHashMap<u32, (usize, usize)>;

/// Streaming scanner over a STEP document
///
/// No document envelope is required: when a `DATA;` section marker is
/// present the scanner starts after it, otherwise it scans from the top.
pub struct RecordScanner<'a> {
    content: &'a str,
    pos: usize,
}

impl<'a> RecordScanner<'a> {
    /// Create a new scanner for the given content
    pub fn new(content: &'a str) -> Self {
        let pos = content.find("DATA;").map(|p| p + 5).unwrap_or(0);
        Self { content, pos }
    }

    /// Scan to the next record
    ///
    /// Returns (id, type_tag, start_byte, end_byte).
    pub fn next_record(&mut self) -> Option<(u32, &'a str, usize, usize)> {
        let bytes = self.content.as_bytes();

        while self.pos < bytes.len() {
            let hash_pos = memchr(b'#', &bytes[self.pos..])?;
            self.pos += hash_pos;

            // A record definition starts a statement; a '#' in the middle
            // of a parameter list is a reference, not a definition.
            let is_record_start = self.pos == 0
                || bytes[self.pos - 1] == b'\n'
                || bytes[self.pos - 1] == b'\r'
                || bytes[self.pos - 1] == b';';

            if !is_record_start {
                self.pos += 1;
                continue;
            }

            let start = self.pos;

            self.pos += 1; // skip '#'
            let id_start = self.pos;
            while self.pos < bytes.len() && bytes[self.pos].is_ascii_digit() {
                self.pos += 1;
            }
            if self.pos == id_start {
                continue;
            }
            let id: u32 = self.content[id_start..self.pos].parse().ok()?;

            self.skip_blank();
            if self.pos >= bytes.len() || bytes[self.pos] != b'=' {
                continue;
            }
            self.pos += 1;
            self.skip_blank();

            let type_start = self.pos;
            while self.pos < bytes.len()
                && (bytes[self.pos].is_ascii_alphanumeric() || bytes[self.pos] == b'_')
            {
                self.pos += 1;
            }
            if self.pos == type_start {
                continue;
            }
            let type_tag = &self.content[type_start..self.pos];

            let end = self.find_record_end()?;
            return Some((id, type_tag, start, end));
        }

        None
    }

    fn skip_blank(&mut self) {
        let bytes = self.content.as_bytes();
        while self.pos < bytes.len()
            && (bytes[self.pos] == b' '
                || bytes[self.pos] == b'\t'
                || bytes[self.pos] == b'\r'
                || bytes[self.pos] == b'\n')
        {
            self.pos += 1;
        }
    }

    /// Find the terminating `;`, treating quoted strings as opaque
    fn find_record_end(&mut self) -> Option<usize> {
        let bytes = self.content.as_bytes();
        let mut in_string = false;

        while self.pos < bytes.len() {
            match bytes[self.pos] {
                b'\'' => {
                    // '' is an escaped quote inside a string
                    if in_string && self.pos + 1 < bytes.len() && bytes[self.pos + 1] == b'\'' {
                        self.pos += 2;
                        continue;
                    }
                    in_string = !in_string;
                }
                b';' if !in_string => {
                    self.pos += 1;
                    return Some(self.pos);
                }
                _ => {}
            }
            self.pos += 1;
        }

        None
    }

    /// Build an index of all records (id -> byte offsets)
    pub fn build_index(content: &'a str) -> RecordIndex {
        let mut scanner = Self::new(content);
        let mut index = FxHashMap::default();

        while let Some((id, _, start, end)) = scanner.next_record() {
            index.insert(id, (start, end));
        }

        index
    }

    /// Count records by type tag
    pub fn count_by_type(content: &'a str) -> FxHashMap<String, usize> {
        let mut scanner = Self::new(content);
        let mut counts: FxHashMap<String, usize> = FxHashMap::default();

        while let Some((_, type_tag, _, _)) = scanner.next_record() {
            *counts.entry(type_tag.to_uppercase()).or_insert(0) += 1;
        }

        counts
    }

    /// Find all records of a specific type
    pub fn find_by_type(content: &'a str, target_type: &str) -> Vec<(u32, usize, usize)> {
        let mut scanner = Self::new(content);
        let mut results = Vec::new();

        while let Some((id, type_tag, start, end)) = scanner.next_record() {
            if type_tag.eq_ignore_ascii_case(target_type) {
                results.push((id, start, end));
            }
        }

        results
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_STEP: &str = r#"ISO-10303-21;
HEADER;
FILE_SCHEMA(('AUTOMOTIVE_DESIGN'));
ENDSEC;
DATA;
#1 = CARTESIAN_POINT('',(0.,0.,0.));
#2 = CARTESIAN_POINT('',(500.,300.,18.));
#3 = DIRECTION('',(0.,0.,1.));
#4 = AXIS2_PLACEMENT_3D('',#1,#3,$);
#5 = CIRCLE('',#4,4.);
ENDSEC;
END-ISO-10303-21;
"#;

    #[test]
    fn test_scanner_finds_records() {
        let mut scanner = RecordScanner::new(TEST_STEP);
        let mut records = Vec::new();

        while let Some((id, type_tag, _, _)) = scanner.next_record() {
            records.push((id, type_tag.to_string()));
        }

        assert_eq!(records.len(), 5);
        assert_eq!(records[0], (1, "CARTESIAN_POINT".to_string()));
        assert_eq!(records[4], (5, "CIRCLE".to_string()));
    }

    #[test]
    fn test_scanner_without_envelope() {
        // No HEADER/DATA wrapper at all: records are still located
        let bare = "#10=CARTESIAN_POINT('',(1.,2.,3.));\n#11=DIRECTION('',(1.,0.,0.));";
        let index = RecordScanner::build_index(bare);
        assert_eq!(index.len(), 2);
        assert!(index.contains_key(&10));
        assert!(index.contains_key(&11));
    }

    #[test]
    fn test_multiline_record() {
        let content = "#7 = ADVANCED_FACE('',(#8,\n#9),\n#12,.T.);";
        let mut scanner = RecordScanner::new(content);
        let (id, tag, start, end) = scanner.next_record().unwrap();
        assert_eq!(id, 7);
        assert_eq!(tag, "ADVANCED_FACE");
        assert_eq!(&content[start..end], content);
    }

    #[test]
    fn test_semicolon_inside_string() {
        let content = "#3=MANIFOLD_SOLID_BREP('side; left',#4);\n#4=CLOSED_SHELL('',());";
        let index = RecordScanner::build_index(content);
        assert_eq!(index.len(), 2);
        let (start, end) = index[&3];
        assert!(content[start..end].contains("side; left"));
    }

    #[test]
    fn test_escaped_quote_in_string() {
        let content = "#3=MANIFOLD_SOLID_BREP('it''s a shelf',#4);";
        let index = RecordScanner::build_index(content);
        assert_eq!(index.len(), 1);
    }

    #[test]
    fn test_count_by_type() {
        let counts = RecordScanner::count_by_type(TEST_STEP);
        assert_eq!(counts.get("CARTESIAN_POINT"), Some(&2));
        assert_eq!(counts.get("CIRCLE"), Some(&1));
    }

    #[test]
    fn test_garbage_yields_empty_index() {
        let index = RecordScanner::build_index("this is not a STEP file");
        assert!(index.is_empty());
    }
}
