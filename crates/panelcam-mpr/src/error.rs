// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for the drilling-program codec

use thiserror::Error;

/// Result type alias for codec operations
pub type CodecResult<T> = std::result::Result<T, CodecError>;

/// Errors that can occur while parsing a drilling program
///
/// Malformed individual records are skipped, never fatal; only a program
/// missing its part dimensions fails as a whole.
#[derive(Error, Debug)]
pub enum CodecError {
    /// No `_BSX`/`_BSY`/`_BSZ` dimension fields before the program body
    #[error("drilling program carries no part dimensions (_BSX/_BSY/_BSZ)")]
    MissingDimensions,
}
