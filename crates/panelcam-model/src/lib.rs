// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! panelcam-model - Shared types for the panelcam pipeline
//!
//! This crate holds the data model exchanged between the STEP extraction
//! side (`panelcam-step`) and the MPR codec side (`panelcam-mpr`):
//!
//! - Raw entity-graph types ([`EntityId`], [`StepType`], [`AttrValue`],
//!   [`StepEntity`])
//! - Resolved geometry ([`BoundingBox`], [`Axis`], [`AxisRoleMap`])
//! - The manufacturing model ([`Part`], [`Hole`], [`Accessory`])
//! - Classification tolerances ([`Tolerances`])
//! - The extraction error taxonomy ([`ExtractError`])
//!
//! It contains no parsing logic and no I/O.

pub mod config;
pub mod entity;
pub mod error;
pub mod geometry;
pub mod part;

pub use config::*;
pub use entity::*;
pub use error::*;
pub use geometry::*;
pub use part::*;
