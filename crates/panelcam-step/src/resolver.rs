// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Entity graph with lazy decoding and caching
//!
//! The graph is built once per parse session from the record index and
//! never mutated afterward; decoding a record is deferred until something
//! resolves it. One session owns the graph and every entity it hands out.

use crate::scanner::{RecordIndex, RecordScanner};
use crate::tokenizer::parse_record_at;
use panelcam_model::{AttrValue, EntityId, StepEntity, StepType};
use rustc_hash::FxHashMap;
use std::sync::Arc;

/// Entity graph over one STEP document
pub struct EntityGraph<'a> {
    /// Raw document text
    content: &'a str,
    /// Record id -> (start, end) byte offsets
    index: RecordIndex,
    /// Decoded record cache
    cache: FxHashMap<u32, Arc<StepEntity>>,
    /// Type tag -> record ids
    type_index: FxHashMap<StepType, Vec<EntityId>>,
}

impl<'a> EntityGraph<'a> {
    /// Build the graph for the given document
    pub fn new(content: &'a str) -> Self {
        let index = RecordScanner::build_index(content);

        let mut type_index: FxHashMap<StepType, Vec<EntityId>> = FxHashMap::default();
        let mut scanner = RecordScanner::new(content);
        while let Some((id, type_tag, _, _)) = scanner.next_record() {
            type_index
                .entry(StepType::parse(type_tag))
                .or_default()
                .push(EntityId(id));
        }

        Self {
            content,
            index,
            cache: FxHashMap::default(),
            type_index,
        }
    }

    /// Raw document text
    pub fn content(&self) -> &'a str {
        self.content
    }

    /// Number of records in the graph
    pub fn record_count(&self) -> usize {
        self.index.len()
    }

    /// True when the document yielded no records at all
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Check if a record exists
    pub fn exists(&self, id: EntityId) -> bool {
        self.index.contains_key(&id.0)
    }

    /// Decode a record by id, caching the result
    ///
    /// Returns `None` for missing ids and for records whose parameter
    /// list does not decode; traversals simply skip those.
    pub fn get(&mut self, id: EntityId) -> Option<Arc<StepEntity>> {
        if let Some(cached) = self.cache.get(&id.0) {
            return Some(Arc::clone(cached));
        }

        let (start, end) = *self.index.get(&id.0)?;
        let entity = parse_record_at(self.content, start, end).ok()?;

        let arc = Arc::new(entity);
        self.cache.insert(id.0, Arc::clone(&arc));
        Some(arc)
    }

    /// Resolve an attribute value to the entity it references
    pub fn resolve_ref(&mut self, attr: &AttrValue) -> Option<Arc<StepEntity>> {
        match attr {
            AttrValue::EntityRef(id) => self.get(*id),
            _ => None,
        }
    }

    /// Ids of every record with the given type tag
    pub fn ids_of_type(&self, step_type: &StepType) -> Vec<EntityId> {
        self.type_index
            .get(step_type)
            .cloned()
            .unwrap_or_default()
    }

    /// Decode every record with the given type tag
    pub fn entities_of_type(&mut self, step_type: &StepType) -> Vec<Arc<StepEntity>> {
        let ids = self.ids_of_type(step_type);
        ids.into_iter().filter_map(|id| self.get(id)).collect()
    }

    /// Number of records with the given type tag
    pub fn count_of_type(&self, step_type: &StepType) -> usize {
        self.type_index.get(step_type).map(|v| v.len()).unwrap_or(0)
    }

    /// Raw record text for an id
    pub fn raw_str(&self, id: EntityId) -> Option<&'a str> {
        let (start, end) = self.index.get(&id.0)?;
        Some(&self.content[*start..*end])
    }
}
