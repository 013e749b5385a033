// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The fixed MPR vocabulary
//!
//! Section markers, field keys, and side codes are a closed, versioned
//! contract belonging to the target machine's format. They are collected
//! here so neither codec direction invents a key ad hoc.

use panelcam_model::HoleSide;

/// Program header section
pub const SECTION_HEADER: &str = "[H";
/// Variable block binding x/y/z to the part dimensions
pub const SECTION_VARS: &str = "[001";
/// Workpiece definition
pub const SECTION_WORKPIECE: &str = "<100 \\WerkStck\\";
/// Comment block
pub const SECTION_COMMENT: &str = "<101 \\Kommentar\\";
/// Vertical drilling operation
pub const SECTION_VERTICAL: &str = "<102 \\BohrVert\\";
/// Horizontal drilling operation
pub const SECTION_HORIZONTAL: &str = "<103 \\BohrHoriz\\";
/// End-of-program line
pub const TERMINATOR: &str = "!";

/// Header dimension keys (unquoted, six decimals)
pub const KEY_LENGTH: &str = "_BSX";
pub const KEY_WIDTH: &str = "_BSY";
pub const KEY_THICKNESS: &str = "_BSZ";

/// Machine-side code for a hole's entry face
pub fn side_code(side: HoleSide) -> &'static str {
    match side {
        HoleSide::Top => "LS",
        HoleSide::Bottom => "LI",
        HoleSide::LengthStart => "XP",
        HoleSide::LengthEnd => "XM",
        HoleSide::WidthStart => "YP",
        HoleSide::WidthEnd => "YM",
    }
}

/// Entry face for a machine-side code
pub fn side_from_code(code: &str) -> Option<HoleSide> {
    match code {
        "LS" => Some(HoleSide::Top),
        "LI" => Some(HoleSide::Bottom),
        "XP" => Some(HoleSide::LengthStart),
        "XM" => Some(HoleSide::LengthEnd),
        "YP" => Some(HoleSide::WidthStart),
        "YM" => Some(HoleSide::WidthEnd),
        _ => None,
    }
}

/// Render a numeric field: bare integer when integral, one decimal
/// otherwise
pub fn format_num(v: f64) -> String {
    if v == v.trunc() {
        format!("{}", v as i64)
    } else {
        format!("{v:.1}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_num() {
        assert_eq!(format_num(0.0), "0");
        assert_eq!(format_num(11.0), "11");
        assert_eq!(format_num(7.5), "7.5");
        assert_eq!(format_num(-3.0), "-3");
        assert_eq!(format_num(150.25), "150.2");
    }

    #[test]
    fn test_side_codes_roundtrip() {
        for side in [
            HoleSide::Top,
            HoleSide::Bottom,
            HoleSide::LengthStart,
            HoleSide::LengthEnd,
            HoleSide::WidthStart,
            HoleSide::WidthEnd,
        ] {
            assert_eq!(side_from_code(side_code(side)), Some(side));
        }
        assert_eq!(side_from_code("??"), None);
    }
}
