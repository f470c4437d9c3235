//! Annotated-struct extractor.
//!
//! Recognizes the first struct declaration carrying a derive block and
//! harvests `name: Type` members line-by-line from the body. The derive list
//! (and a `#[table(name = "...")]`-style attribute, when present) is kept in
//! metadata. Structs without a derive block are not treated as data models.

use std::path::Path;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::{NormalizedEntity, SourceTag};

use super::Extractor;

static DERIVE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"#\[derive\(([^)]+)\)\]").unwrap());

static TABLE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"#\[table\(name\s*=\s*["']([^"']+)["']\)\]"#).unwrap());

static STRUCT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*(?:pub\s+)?struct\s+([A-Z][A-Za-z0-9_]*)").unwrap());

static FIELD_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*(?:pub(?:\([a-z:\s]+\))?\s+)?([a-z_][a-z0-9_]*)\s*:\s*(.+?),?\s*$").unwrap()
});

pub struct StructExtractor;

impl Extractor for StructExtractor {
    fn name(&self) -> &'static str {
        "structs"
    }

    fn extensions(&self) -> &'static [&'static str] {
        &["rs"]
    }

    fn extract(&self, text: &str, path: &Path, source: SourceTag) -> Vec<NormalizedEntity> {
        let mut pending_derive: Option<String> = None;
        let mut pending_table: Option<String> = None;
        let mut entity: Option<NormalizedEntity> = None;

        for line in text.lines() {
            let trimmed = line.trim();

            if let Some(current) = entity.as_mut() {
                if trimmed.starts_with('}') {
                    // One model struct per file, like the record extractor.
                    break;
                }
                if trimmed.starts_with("#[") || trimmed.starts_with("//") || trimmed.is_empty() {
                    continue;
                }
                if let Some(captures) = FIELD_RE.captures(line) {
                    current
                        .fields
                        .entry(captures[1].to_string())
                        .or_insert_with(|| captures[2].trim().to_string());
                }
                continue;
            }

            if let Some(captures) = DERIVE_RE.captures(line) {
                pending_derive = Some(captures[1].trim().to_string());
                continue;
            }
            if let Some(captures) = TABLE_RE.captures(line) {
                pending_table = Some(captures[1].to_string());
                continue;
            }
            if trimmed.starts_with("#[") || trimmed.starts_with("//") || trimmed.is_empty() {
                continue;
            }

            if let Some(captures) = STRUCT_RE.captures(line) {
                if let Some(derives) = pending_derive.take() {
                    let mut new_entity =
                        NormalizedEntity::new(source, &captures[1], path.to_path_buf());
                    new_entity.metadata.insert("derives".to_string(), derives);
                    if let Some(table) = pending_table.take() {
                        new_entity.metadata.insert("table".to_string(), table);
                    }
                    if trimmed.ends_with(';') {
                        // Unit struct: a declaration with no members.
                        return vec![new_entity];
                    }
                    entity = Some(new_entity);
                    continue;
                }
            }

            // Any other code line breaks the attribute-to-struct adjacency.
            pending_derive = None;
            pending_table = None;
        }

        entity.into_iter().collect()
    }
}
