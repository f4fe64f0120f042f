// src/matching/index.rs - Read-only lookup structures over one directory snapshot
use log::{debug, info, warn};
use serde::Serialize;
use std::collections::{HashMap, HashSet};

use crate::matching::normalize::normalize;
use crate::models::core::EntityRecord;
use crate::models::matching::MatchField;

/// An indexed entity with its name fields pre-normalized in search priority order.
#[derive(Debug, Clone)]
pub struct IndexedEntity<'a> {
    pub record: &'a EntityRecord,
    pub fields: Vec<(MatchField, String)>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct IndexStats {
    pub total: usize,
    pub with_identifier: usize,
    pub without_identifier: usize,
    pub excluded: usize,
}

/// Alias and identifier maps built once per snapshot. Holds references only, so it cannot
/// outlive the snapshot and must be rebuilt whenever the snapshot changes.
#[derive(Debug)]
pub struct EntityIndex<'a> {
    entities: Vec<IndexedEntity<'a>>,
    name_index: HashMap<String, Vec<&'a EntityRecord>>,
    identifier_index: HashMap<&'a str, &'a EntityRecord>,
    excluded: usize,
}

impl<'a> EntityIndex<'a> {
    pub fn build(records: &'a [EntityRecord]) -> Self {
        let mut entities = Vec::with_capacity(records.len());
        let mut name_index: HashMap<String, Vec<&'a EntityRecord>> = HashMap::new();
        let mut identifier_index: HashMap<&'a str, &'a EntityRecord> = HashMap::new();
        let mut seen_ids = HashSet::new();
        let mut excluded = 0usize;

        for record in records {
            if !record.has_name() {
                warn!("Excluding entity {} from index: no name field populated", record.id);
                excluded += 1;
                continue;
            }
            if !seen_ids.insert(record.id) {
                warn!("Excluding duplicate entity id {} from index", record.id);
                excluded += 1;
                continue;
            }

            let fields: Vec<(MatchField, String)> = record
                .name_fields()
                .into_iter()
                .map(|(source, value)| (MatchField::from(source), normalize(value)))
                .collect();

            for (_, normalized) in &fields {
                if normalized.is_empty() {
                    continue;
                }
                let bucket = name_index.entry(normalized.clone()).or_default();
                // One entity may normalize several aliases to the same text.
                if !bucket.iter().any(|existing| existing.id == record.id) {
                    bucket.push(record);
                }
            }

            if let Some(identifier) = record.identifier() {
                if let Some(existing) = identifier_index.get(identifier) {
                    warn!(
                        "Identifier {} already indexed for entity {}; ignoring entity {}",
                        identifier, existing.id, record.id
                    );
                } else {
                    identifier_index.insert(identifier, record);
                }
            }

            entities.push(IndexedEntity { record, fields });
        }

        info!(
            "📇 Indexed {} entities ({} distinct names, {} identifiers, {} excluded)",
            entities.len(),
            name_index.len(),
            identifier_index.len(),
            excluded
        );

        Self {
            entities,
            name_index,
            identifier_index,
            excluded,
        }
    }

    /// Indexed entities in directory iteration order.
    pub fn entities(&self) -> &[IndexedEntity<'a>] {
        &self.entities
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Identifier lookup is verbatim apart from surrounding whitespace.
    pub fn lookup_identifier(&self, identifier: &str) -> Option<&'a EntityRecord> {
        let identifier = identifier.trim();
        if identifier.is_empty() {
            return None;
        }
        let hit = self.identifier_index.get(identifier).copied();
        debug!("Identifier lookup {} -> {:?}", identifier, hit.map(|e| e.id));
        hit
    }

    /// Entities having any name field that normalizes to the same text as `name`.
    pub fn lookup_normalized(&self, name: &str) -> &[&'a EntityRecord] {
        self.name_index
            .get(&normalize(name))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn stats(&self) -> IndexStats {
        let total = self.entities.len();
        let with_identifier = self
            .entities
            .iter()
            .filter(|entity| entity.record.identifier().is_some())
            .count();
        IndexStats {
            total,
            with_identifier,
            without_identifier: total - with_identifier,
            excluded: self.excluded,
        }
    }
}
