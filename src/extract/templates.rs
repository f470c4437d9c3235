//! Template-binding extractor.
//!
//! One sub-pass per templating dialect, chosen by file extension: the
//! embedded-code dialect (`<%= ... %>`), the curly-brace dialect
//! (`{{ ... }}`), and a plain-markup fallback that treats framework-prefixed
//! attributes (`ng-*`, `v-*`) and generic `data-*` attributes as bindings and
//! a custom `<include src="...">` tag as a partial reference. Bindings become
//! fields; loops, conditionals, and partial references land in metadata.

use std::path::Path;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::{NormalizedEntity, SourceTag};

use super::Extractor;

static ERB_BINDING_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"<%=\s*([^%]+?)\s*%>").unwrap());

static ERB_PARTIAL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"<%=\s*render\s+(?:partial:\s*)?["']([^"']+)["']"#).unwrap()
});

static ERB_LOOP_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"<%\s*([^%]+?)\.each\s+do\s+\|([^|]+?)\|\s*%>").unwrap());

static ERB_CONDITIONAL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"<%\s*if\s+([^%]+?)\s*%>").unwrap());

static CURLY_BINDING_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{\{\{?([^{}]+?)\}?\}\}").unwrap());

static CURLY_PARTIAL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{\{>\s*([^{}]+?)\s*\}\}").unwrap());

static CURLY_LOOP_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{\{#each\s+(\S+)\s+as\s+\|([^|]+?)\|\s*\}\}").unwrap());

static CURLY_CONDITIONAL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{\{#if\s+([^{}]+?)\s*\}\}").unwrap());

static DATA_ATTR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"data-([\w-]+)=["']([^"']*)["']"#).unwrap());

static FRAMEWORK_ATTR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(ng-|v-)([\w-]+)=["']([^"']*)["']"#).unwrap());

static INCLUDE_TAG_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"<include\s+src=["']([^"']+)["']"#).unwrap());

pub struct TemplateExtractor;

impl Extractor for TemplateExtractor {
    fn name(&self) -> &'static str {
        "templates"
    }

    fn extensions(&self) -> &'static [&'static str] {
        &["erb", "hbs", "html"]
    }

    fn extract(&self, text: &str, path: &Path, source: SourceTag) -> Vec<NormalizedEntity> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .unwrap_or_default();

        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default();
        let mut entity = NormalizedEntity::new(source, stem, path.to_path_buf());
        entity.metadata.insert("kind".to_string(), "template".to_string());
        entity.metadata.insert("dialect".to_string(), ext.clone());

        match ext.as_str() {
            "erb" => embedded_pass(text, &mut entity),
            "hbs" => curly_pass(text, &mut entity),
            "html" => markup_pass(text, &mut entity),
            _ => return Vec::new(),
        }

        // Dialect delimiters but no constructs means there is nothing to map.
        if entity.fields.is_empty() && entity.metadata.len() == 2 {
            return Vec::new();
        }
        vec![entity]
    }
}

fn embedded_pass(text: &str, entity: &mut NormalizedEntity) {
    for captures in ERB_BINDING_RE.captures_iter(text) {
        let expr = captures[1].trim();
        // Partial includes match the interpolation grammar too; keep them out
        // of the binding set.
        if expr.starts_with("render") {
            continue;
        }
        entity
            .fields
            .entry(expr.to_string())
            .or_insert_with(|| "interpolation".to_string());
    }

    record_partials(entity, ERB_PARTIAL_RE.captures_iter(text).map(|c| c[1].to_string()));
    record_loops(
        entity,
        ERB_LOOP_RE
            .captures_iter(text)
            .map(|c| (c[2].trim().to_string(), c[1].trim().to_string())),
    );
    record_conditionals(entity, ERB_CONDITIONAL_RE.captures_iter(text).count());
}

fn curly_pass(text: &str, entity: &mut NormalizedEntity) {
    for captures in CURLY_BINDING_RE.captures_iter(text) {
        let expr = captures[1].trim();
        // Block helpers, closers, partials, and comments share the delimiter
        // grammar; only plain expressions are bindings.
        if expr.starts_with('#') || expr.starts_with('/') || expr.starts_with('>')
            || expr.starts_with('!') || expr == "else"
        {
            continue;
        }
        entity
            .fields
            .entry(expr.to_string())
            .or_insert_with(|| "interpolation".to_string());
    }

    record_partials(entity, CURLY_PARTIAL_RE.captures_iter(text).map(|c| c[1].to_string()));
    record_loops(
        entity,
        CURLY_LOOP_RE
            .captures_iter(text)
            .map(|c| (c[2].trim().to_string(), c[1].trim().to_string())),
    );
    record_conditionals(entity, CURLY_CONDITIONAL_RE.captures_iter(text).count());
}

fn markup_pass(text: &str, entity: &mut NormalizedEntity) {
    for captures in FRAMEWORK_ATTR_RE.captures_iter(text) {
        let name = format!("{}{}", &captures[1], &captures[2]);
        entity
            .fields
            .entry(name)
            .or_insert_with(|| "framework-binding".to_string());
    }
    for captures in DATA_ATTR_RE.captures_iter(text) {
        entity
            .fields
            .entry(captures[1].to_string())
            .or_insert_with(|| "data-attribute".to_string());
    }

    record_partials(entity, INCLUDE_TAG_RE.captures_iter(text).map(|c| c[1].to_string()));
}

fn record_partials(entity: &mut NormalizedEntity, partials: impl Iterator<Item = String>) {
    let listed: Vec<String> = partials.collect();
    if !listed.is_empty() {
        entity.metadata.insert("partials".to_string(), listed.join(", "));
    }
}

fn record_loops(entity: &mut NormalizedEntity, loops: impl Iterator<Item = (String, String)>) {
    let listed: Vec<String> = loops
        .map(|(iterator, collection)| format!("{iterator} in {collection}"))
        .collect();
    if !listed.is_empty() {
        entity.metadata.insert("loops".to_string(), listed.join(", "));
    }
}

fn record_conditionals(entity: &mut NormalizedEntity, count: usize) {
    if count > 0 {
        entity.metadata.insert("conditionals".to_string(), count.to_string());
    }
}
