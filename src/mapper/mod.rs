//! Entity mapper: confidence-scored correspondences between two collections.
//!
//! The pass runs once per ordered (source, target) pair, strictly after both
//! sides' extraction is complete, and borrows both collections immutably.
//! Identical inputs always produce the identical output set: entities are
//! visited in collection order and fuzzy ties break alphabetically by target
//! entity name.

use std::collections::BTreeMap;

use crate::config::MapperConfig;
use crate::models::{EntityMapping, NormalizedEntity};

/// Fixed vocabulary of common domain-noun substrings used by the fuzzy
/// similarity test.
const DOMAIN_NOUNS: &[&str] = &[
    "user",
    "course",
    "account",
    "post",
    "topic",
    "group",
    "assignment",
    "enrollment",
    "module",
    "notification",
    "message",
    "category",
];

/// Generate at most one mapping per source entity.
///
/// 1. Exact-name pass: a target sharing the identical bare name wins (first
///    encountered if duplicates exist).
/// 2. Fuzzy fallback: candidates pass a cheap similarity test, the highest
///    field-overlap score wins, and the winner is kept only above
///    `config.fuzzy_threshold`. Equal scores break alphabetically by target
///    entity name.
pub fn generate_mappings(
    sources: &[NormalizedEntity],
    targets: &[NormalizedEntity],
    config: &MapperConfig,
) -> Vec<EntityMapping> {
    let mut mappings = Vec::new();

    for source in sources {
        if let Some(target) = targets.iter().find(|t| t.entity == source.entity) {
            mappings.push(score_pair(source, target, config));
            continue;
        }

        let mut best: Option<(f32, &NormalizedEntity)> = None;
        for candidate in targets.iter().filter(|t| names_similar(&source.entity, &t.entity)) {
            let confidence = field_overlap_confidence(source, candidate, config);
            let better = match best {
                None => true,
                Some((best_score, best_entity)) => {
                    confidence > best_score
                        || (confidence == best_score && candidate.entity < best_entity.entity)
                }
            };
            if better {
                best = Some((confidence, candidate));
            }
        }

        if let Some((confidence, target)) = best {
            if confidence > config.fuzzy_threshold {
                mappings.push(score_pair(source, target, config));
            }
        }
    }

    mappings
}

/// Cheap name-similarity gate for the fuzzy pass: case-insensitive equality,
/// singular/plural equivalence via a trailing "s", or shared membership in
/// the domain-noun vocabulary.
fn names_similar(source: &str, target: &str) -> bool {
    let source = source.to_lowercase();
    let target = target.to_lowercase();

    if source == target {
        return true;
    }
    if source.strip_suffix('s') == Some(target.as_str())
        || target.strip_suffix('s') == Some(source.as_str())
    {
        return true;
    }
    DOMAIN_NOUNS
        .iter()
        .any(|noun| source.contains(noun) && target.contains(noun))
}

/// Shared confidence formula: `2 × |matched fields| / (|source| + |target|)`,
/// defaulting to `config.name_only_confidence` when both sides are
/// field-less.
fn field_overlap_confidence(
    source: &NormalizedEntity,
    target: &NormalizedEntity,
    config: &MapperConfig,
) -> f32 {
    let total = source.fields.len() + target.fields.len();
    if total == 0 {
        return config.name_only_confidence;
    }
    let matched = source
        .fields
        .keys()
        .filter(|name| target.fields.contains_key(*name))
        .count();
    (2 * matched) as f32 / total as f32
}

fn score_pair(
    source: &NormalizedEntity,
    target: &NormalizedEntity,
    config: &MapperConfig,
) -> EntityMapping {
    let mut field_mappings = BTreeMap::new();
    let mut unmapped_source_fields = Vec::new();
    for name in source.fields.keys() {
        if target.fields.contains_key(name) {
            field_mappings.insert(name.clone(), name.clone());
        } else {
            unmapped_source_fields.push(name.clone());
        }
    }
    let unmapped_target_fields = target
        .fields
        .keys()
        .filter(|name| !source.fields.contains_key(*name))
        .cloned()
        .collect();

    EntityMapping {
        source_entity: source.qualified_name(),
        target_entity: target.qualified_name(),
        confidence: field_overlap_confidence(source, target, config),
        field_mappings,
        unmapped_source_fields,
        unmapped_target_fields,
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use crate::models::SourceTag;

    use super::*;

    fn entity(tag: SourceTag, name: &str, fields: &[&str]) -> NormalizedEntity {
        let mut e = NormalizedEntity::new(tag, name, PathBuf::from("test"));
        for f in fields {
            e.fields.insert(f.to_string(), "string".to_string());
        }
        e
    }

    fn config() -> MapperConfig {
        MapperConfig::default()
    }

    #[test]
    fn exact_name_match_computes_field_overlap() {
        let sources = vec![entity(SourceTag::Rails, "Course", &["id", "title", "account_id"])];
        let targets = vec![entity(SourceTag::Rust, "Course", &["id", "title", "description"])];

        let mappings = generate_mappings(&sources, &targets, &config());
        assert_eq!(mappings.len(), 1);
        let mapping = &mappings[0];
        assert_eq!(mapping.source_entity, "rails.Course");
        assert_eq!(mapping.target_entity, "rust.Course");
        assert_eq!(mapping.field_mappings.len(), 2);
        assert_eq!(mapping.field_mappings.get("id").unwrap(), "id");
        assert_eq!(mapping.field_mappings.get("title").unwrap(), "title");
        assert_eq!(mapping.unmapped_source_fields, vec!["account_id".to_string()]);
        assert_eq!(mapping.unmapped_target_fields, vec!["description".to_string()]);
        assert!((mapping.confidence - 4.0 / 6.0).abs() < 1e-6);
    }

    #[test]
    fn field_partition_is_exact_with_no_overlap() {
        let source = entity(SourceTag::Rails, "Course", &["id", "title", "account_id"]);
        let sources = vec![source.clone()];
        let targets = vec![entity(SourceTag::Rust, "Course", &["id"])];

        let mappings = generate_mappings(&sources, &targets, &config());
        let mapping = &mappings[0];

        let mut partition: Vec<&String> = mapping
            .field_mappings
            .keys()
            .chain(mapping.unmapped_source_fields.iter())
            .collect();
        partition.sort();
        partition.dedup();
        let mut expected: Vec<&String> = source.fields.keys().collect();
        expected.sort();
        assert_eq!(partition, expected);
        assert!(mapping
            .field_mappings
            .keys()
            .all(|k| !mapping.unmapped_source_fields.contains(k)));
    }

    #[test]
    fn name_only_match_defaults_to_mid_confidence() {
        let sources = vec![entity(SourceTag::Rails, "Marker", &[])];
        let targets = vec![entity(SourceTag::Rust, "Marker", &[])];

        let mappings = generate_mappings(&sources, &targets, &config());
        assert_eq!(mappings[0].confidence, 0.5);
    }

    #[test]
    fn exact_pass_takes_first_duplicate_target() {
        let sources = vec![entity(SourceTag::Rails, "Course", &["id"])];
        let mut first = entity(SourceTag::Rust, "Course", &["id"]);
        first.source_file = PathBuf::from("first.rs");
        let mut second = entity(SourceTag::Rust, "Course", &["id", "title"]);
        second.source_file = PathBuf::from("second.rs");
        let targets = vec![first, second];

        let mappings = generate_mappings(&sources, &targets, &config());
        assert_eq!(mappings.len(), 1);
        // Both share the name; the first encountered wins even though the
        // second overlaps differently.
        assert!((mappings[0].confidence - 1.0).abs() < 1e-6);
    }

    #[test]
    fn fuzzy_match_accepts_plural_variant_above_threshold() {
        let sources = vec![entity(
            SourceTag::Rails,
            "Enrollment",
            &["id", "user_id", "course_id"],
        )];
        let targets = vec![entity(
            SourceTag::Rust,
            "Enrollments",
            &["id", "user_id", "grade"],
        )];

        let mappings = generate_mappings(&sources, &targets, &config());
        assert_eq!(mappings.len(), 1);
        assert_eq!(mappings[0].target_entity, "rust.Enrollments");
        assert!((mappings[0].confidence - 4.0 / 6.0).abs() < 1e-6);
    }

    #[test]
    fn fuzzy_match_rejects_low_overlap() {
        let sources = vec![entity(
            SourceTag::Rails,
            "Enrollment",
            &["workflow_state", "completed_at", "grade", "role", "section_id"],
        )];
        let targets = vec![entity(
            SourceTag::Rust,
            "Enrollments",
            &["id", "uuid", "created", "updated", "grade"],
        )];

        // One shared field out of ten: 0.2, below the 0.3 threshold.
        let mappings = generate_mappings(&sources, &targets, &config());
        assert!(mappings.is_empty());
    }

    #[test]
    fn no_similarity_signal_means_no_mapping() {
        let sources = vec![entity(SourceTag::Rails, "Widget", &["id"])];
        let targets = vec![entity(SourceTag::Rust, "Gadget", &["id"])];

        let mappings = generate_mappings(&sources, &targets, &config());
        assert!(mappings.is_empty());
    }

    #[test]
    fn domain_noun_vocabulary_bridges_distinct_names() {
        let sources = vec![entity(SourceTag::Rails, "CourseSection", &["id", "name"])];
        let targets = vec![entity(SourceTag::Rust, "CourseGroup", &["id", "name"])];

        let mappings = generate_mappings(&sources, &targets, &config());
        assert_eq!(mappings.len(), 1);
        assert_eq!(mappings[0].target_entity, "rust.CourseGroup");
    }

    #[test]
    fn equal_fuzzy_scores_break_alphabetically() {
        let sources = vec![entity(SourceTag::Rails, "UserProfile", &["id", "name"])];
        // Both candidates share the "user" noun and the same field overlap.
        let targets = vec![
            entity(SourceTag::Rust, "UserRecord", &["id", "name"]),
            entity(SourceTag::Rust, "UserAccount", &["id", "name"]),
        ];

        let mappings = generate_mappings(&sources, &targets, &config());
        assert_eq!(mappings.len(), 1);
        assert_eq!(mappings[0].target_entity, "rust.UserAccount");
    }

    #[test]
    fn each_source_entity_yields_at_most_one_mapping() {
        let sources = vec![entity(SourceTag::Rails, "User", &["id"])];
        let targets = vec![
            entity(SourceTag::Rust, "User", &["id"]),
            entity(SourceTag::Rust, "Users", &["id"]),
        ];

        let mappings = generate_mappings(&sources, &targets, &config());
        assert_eq!(mappings.len(), 1);
        assert_eq!(mappings[0].target_entity, "rust.User");
    }

    #[test]
    fn identical_inputs_produce_identical_output() {
        let sources = vec![
            entity(SourceTag::Rails, "Course", &["id", "title"]),
            entity(SourceTag::Rails, "User", &["id", "email"]),
            entity(SourceTag::Rails, "Orphan", &["x"]),
        ];
        let targets = vec![
            entity(SourceTag::Rust, "Course", &["id", "title"]),
            entity(SourceTag::Rust, "Users", &["id", "email"]),
        ];

        let first = generate_mappings(&sources, &targets, &config());
        let second = generate_mappings(&sources, &targets, &config());
        assert_eq!(first, second);
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }
}
