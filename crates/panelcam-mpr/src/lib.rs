// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! panelcam-mpr - MPR drilling-program codec
//!
//! Serializes a [`Part`](panelcam_model::Part) into the line-oriented,
//! positionally-keyed MPR text format consumed by CNC panel drilling
//! centers, and parses that format back into a `Part`.
//!
//! The format is a closed vendor vocabulary: section markers (`[H`,
//! `[001`, `<100 \WerkStck\`, `<102 \BohrVert\`, ...), `KEY="value"`
//! lines, CRLF terminators, and a final `!` line. Round trips preserve
//! hole positions, diameters, and depths; comments and exact numeric
//! formatting are not guaranteed byte-identical.
//!
//! # Example
//!
//! ```ignore
//! use panelcam_mpr::{generate_program, parse_program};
//!
//! let text = generate_program(&part);
//! let back = parse_program(&text)?;
//! assert_eq!(back.holes.len(), part.holes.len());
//! ```

pub mod error;
pub mod generate;
pub mod parse;
pub mod record;
pub mod vocab;

pub use error::{CodecError, CodecResult};
pub use generate::{generate_program, MprGenerator};
pub use parse::parse_program;
pub use record::{BodyRecord, CoordExpr, DrillRun, HorizontalRecord, RunDirection, VerticalRecord};
