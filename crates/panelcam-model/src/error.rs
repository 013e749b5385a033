// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for the extraction pipeline

use crate::EntityId;
use thiserror::Error;

/// Result type alias for extraction operations
pub type Result<T> = std::result::Result<T, ExtractError>;

/// Errors that can occur while extracting parts from a CAD document
///
/// Per-solid problems (degenerate geometry, unclassifiable features) are
/// absorbed with warnings and do not surface here; only document-level
/// failures are fatal.
#[derive(Error, Debug)]
pub enum ExtractError {
    /// The document contains no recognizable STEP records at all
    #[error("no STEP records found in input")]
    NoRecords,

    /// A referenced entity is missing from the graph
    #[error("entity {0} not found")]
    EntityNotFound(EntityId),

    /// Failed to decode an entity's parameter list
    #[error("failed to decode entity {0}: {1}")]
    EntityDecode(EntityId, String),

    /// A solid's geometry could not be resolved
    #[error("geometry error for solid {entity}: {message}")]
    Geometry { entity: EntityId, message: String },

    /// IO error (file-reading callers only; the core never performs IO)
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic error with message
    #[error("{0}")]
    Other(String),
}

impl ExtractError {
    /// Create a new entity-decode error
    pub fn decode(id: EntityId, msg: impl Into<String>) -> Self {
        ExtractError::EntityDecode(id, msg.into())
    }

    /// Create a new geometry error
    pub fn geometry(entity: EntityId, msg: impl Into<String>) -> Self {
        ExtractError::Geometry {
            entity,
            message: msg.into(),
        }
    }

    /// Create a generic error
    pub fn other(msg: impl Into<String>) -> Self {
        ExtractError::Other(msg.into())
    }
}
