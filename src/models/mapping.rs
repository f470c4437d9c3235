use std::collections::BTreeMap;
use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::entity::{NormalizedEntity, SourceTag};

/// A scored correspondence between one source entity and one target entity.
///
/// Invariant: `field_mappings.keys() ∪ unmapped_source_fields` is exactly the
/// source entity's field-name set, with no overlap. `confidence` is always
/// in `[0, 1]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityMapping {
    pub source_entity: String,
    pub target_entity: String,
    pub confidence: f32,
    pub field_mappings: BTreeMap<String, String>,
    pub unmapped_source_fields: Vec<String>,
    pub unmapped_target_fields: Vec<String>,
}

/// An entity that matched nothing on the other side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnmappedEntity {
    pub entity: String,
    pub fields: Vec<String>,
}

/// Per-source entity counts and leftovers for the report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceSummary {
    pub source: SourceTag,
    pub total: usize,
    pub unmapped: Vec<UnmappedEntity>,
}

/// The one shared result object both renderers consume.
///
/// Mappings are derived in a strictly later pass than extraction and are
/// never mutated — a re-run regenerates the whole report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MappingReport {
    pub sources: Vec<SourceSummary>,
    pub mappings: Vec<EntityMapping>,
}

impl MappingReport {
    /// Assemble the report from both entity collections and the mapping list.
    ///
    /// Unmapped entities are those whose qualified name appears on neither
    /// end of any mapping, in collection order.
    pub fn build(
        source_tag: SourceTag,
        source_entities: &[NormalizedEntity],
        target_tag: SourceTag,
        target_entities: &[NormalizedEntity],
        mappings: Vec<EntityMapping>,
    ) -> Self {
        let mapped_sources: BTreeSet<&str> =
            mappings.iter().map(|m| m.source_entity.as_str()).collect();
        let mapped_targets: BTreeSet<&str> =
            mappings.iter().map(|m| m.target_entity.as_str()).collect();

        let sources = vec![
            summarize(source_tag, source_entities, &mapped_sources),
            summarize(target_tag, target_entities, &mapped_targets),
        ];

        Self { sources, mappings }
    }
}

fn summarize(
    tag: SourceTag,
    entities: &[NormalizedEntity],
    mapped: &BTreeSet<&str>,
) -> SourceSummary {
    let unmapped = entities
        .iter()
        .filter(|e| !mapped.contains(e.qualified_name().as_str()))
        .map(|e| UnmappedEntity {
            entity: e.entity.clone(),
            fields: e.fields.keys().cloned().collect(),
        })
        .collect();

    SourceSummary {
        source: tag,
        total: entities.len(),
        unmapped,
    }
}
