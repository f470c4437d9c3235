//! ORM-class extractor.
//!
//! Recognizes record-style class declarations (`class Course <
//! ApplicationRecord`) and harvests fields from schema-definition statements
//! (`t.string "title"`) or accessor declarations (`attr_accessor :title`).
//! When neither is present, relationship declarations become weak fields
//! typed by the relationship kind. Validation-rule names and association
//! kinds land in metadata, where the mapper ignores them.

use std::collections::BTreeSet;
use std::path::Path;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::{NormalizedEntity, SourceTag};

use super::Extractor;

/// Base classes that mark a class as a persisted record.
const RECORD_BASES: &[&str] = &["ApplicationRecord", "ActiveRecord::Base"];

static CLASS_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)^\s*class\s+([A-Z][A-Za-z0-9_]*)\s*<\s*([A-Za-z0-9_:]+)").unwrap()
});

static SCHEMA_FIELD_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?m)^\s*t\.([a-z_]+)\s+(?::([a-z0-9_]+)|["']([a-z0-9_]+)["'])"#).unwrap()
});

static ACCESSOR_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)^\s*attr_(?:accessor|reader|writer)\s+((?::[a-z0-9_]+\s*,?\s*)+)").unwrap()
});

static ASSOCIATION_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)^\s*(has_many|has_one|belongs_to|has_and_belongs_to_many)\s+:([a-z0-9_]+)")
        .unwrap()
});

static VALIDATES_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^\s*validates\s+([^\n]+)").unwrap());

static VALIDATES_OF_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^\s*validates_([a-z_]+)_of\b").unwrap());

static OPTION_KEY_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"([a-z_]+):").unwrap());

pub struct OrmExtractor;

impl Extractor for OrmExtractor {
    fn name(&self) -> &'static str {
        "orm"
    }

    fn extensions(&self) -> &'static [&'static str] {
        &["rb"]
    }

    fn extract(&self, text: &str, path: &Path, source: SourceTag) -> Vec<NormalizedEntity> {
        // First record-style class in the file; model files hold one class.
        let class = CLASS_RE
            .captures_iter(text)
            .find(|c| RECORD_BASES.contains(&&c[2]));
        let Some(class) = class else {
            return Vec::new();
        };

        let mut entity = NormalizedEntity::new(source, &class[1], path.to_path_buf());

        for captures in SCHEMA_FIELD_RE.captures_iter(text) {
            let field_type = captures[1].to_string();
            let name = captures
                .get(2)
                .or_else(|| captures.get(3))
                .map(|m| m.as_str().to_string());
            if let Some(name) = name {
                entity.fields.entry(name).or_insert(field_type);
            }
        }

        for captures in ACCESSOR_RE.captures_iter(text) {
            for attr in captures[1].split(',') {
                let name = attr.trim().trim_start_matches(':');
                if !name.is_empty() {
                    entity
                        .fields
                        .entry(name.to_string())
                        .or_insert_with(|| "accessor".to_string());
                }
            }
        }

        let associations: Vec<(String, String)> = ASSOCIATION_RE
            .captures_iter(text)
            .map(|c| (c[1].to_string(), c[2].to_string()))
            .collect();

        // Relationship fallback: a model with no harvestable fields still
        // exposes its associations as weak fields.
        if entity.fields.is_empty() {
            for (kind, name) in &associations {
                entity
                    .fields
                    .entry(name.clone())
                    .or_insert_with(|| kind.clone());
            }
        }

        if !associations.is_empty() {
            let listed: Vec<String> = associations
                .iter()
                .map(|(kind, name)| format!("{kind} {name}"))
                .collect();
            entity
                .metadata
                .insert("associations".to_string(), listed.join(", "));
        }

        let mut rules = BTreeSet::new();
        for captures in VALIDATES_OF_RE.captures_iter(text) {
            rules.insert(captures[1].to_string());
        }
        for captures in VALIDATES_RE.captures_iter(text) {
            for key in OPTION_KEY_RE.captures_iter(&captures[1]) {
                rules.insert(key[1].to_string());
            }
        }
        if !rules.is_empty() {
            let rules: Vec<String> = rules.into_iter().collect();
            entity
                .metadata
                .insert("validations".to_string(), rules.join(", "));
        }

        vec![entity]
    }
}
