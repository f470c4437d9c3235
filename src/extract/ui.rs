//! UI-component/hook/route/store extractor.
//!
//! Four independent sub-passes over the same file, none mutually exclusive:
//! a file can declare a component, custom hooks, a router table, and a state
//! store all at once, and each sub-pass contributes its own records. A
//! capitalized identifier is the load-bearing heuristic for components and
//! child tags; the `use` prefix marks custom hooks.

use std::collections::BTreeSet;
use std::path::Path;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::{NormalizedEntity, SourceTag};

use super::Extractor;

/// The fixed vocabulary of known hooks recorded into component metadata.
const KNOWN_HOOKS: &[&str] = &[
    "useState",
    "useEffect",
    "useContext",
    "useReducer",
    "useMemo",
    "useCallback",
    "useRef",
];

/// Markers whose presence switches on the store pass.
const STORE_MARKERS: &[&str] = &[
    "createSlice",
    "configureStore",
    "createStore",
    "combineReducers",
];

static CLASS_COMPONENT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"class\s+([A-Z][A-Za-z0-9_]*)\s+extends\s+(?:React\.)?(?:Pure)?Component").unwrap()
});

static FUNC_COMPONENT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)^\s*(?:export\s+)?(?:default\s+)?function\s+([A-Z][A-Za-z0-9_]*)\s*\(\s*(?:\{([^}]*)\})?")
        .unwrap()
});

static ARROW_COMPONENT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)^\s*(?:export\s+)?const\s+([A-Z][A-Za-z0-9_]*)\s*=\s*(?:React\.memo\(\s*|memo\(\s*)?\(\s*(?:\{([^}]*)\})?[^)]*\)\s*=>")
        .unwrap()
});

static USE_STATE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"const\s*\[\s*([A-Za-z0-9_]+)\s*,\s*set[A-Za-z0-9_]+\s*\]\s*=\s*useState(?:<[^>]*>)?\s*\(\s*([^)]*)\s*\)")
        .unwrap()
});

static CLASS_STATE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"this\.state\s*=\s*\{([^}]*)\}").unwrap());

static STATE_PAIR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([A-Za-z0-9_]+)\s*:\s*([^,]+)").unwrap());

static JSX_TAG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"<([A-Z][A-Za-z0-9_]*)").unwrap());

static HOOK_DECL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)^\s*(?:export\s+)?(?:default\s+)?(?:function\s+|const\s+)(use[A-Z][A-Za-z0-9_]*)")
        .unwrap()
});

static USE_EFFECT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"useEffect\s*\(\s*(?:async\s*)?\(\s*\)\s*=>\s*\{[\s\S]*?\}\s*,\s*\[([^\]]*)\]\s*\)")
        .unwrap()
});

static JSX_ROUTE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"<([A-Za-z0-9_]*Route)\b([^>]*)>").unwrap());

static PATH_ATTR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"path=["']([^"']+)["']"#).unwrap());

static COMPONENT_ATTR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"component=\{\s*([A-Za-z0-9_]+)\s*\}").unwrap());

static ELEMENT_ATTR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"element=\{\s*<([A-Za-z0-9_]+)").unwrap());

static OBJECT_ROUTE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"\{[^{}]*path:\s*["']?([^"',\s]+)["']?[^{}]*(?:component|element):\s*<?\s*([A-Za-z0-9_]+)[^{}]*\}"#)
        .unwrap()
});

static ACTION_CONST_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?m)^\s*(?:export\s+)?const\s+([A-Z][A-Z0-9_]+)\s*=\s*["']"#).unwrap()
});

static CREATE_ACTION_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"const\s+([A-Za-z0-9_]+)\s*=\s*createAction").unwrap()
});

static REDUCER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:function\s+|const\s+)([A-Za-z0-9_]*[Rr]educer)\b").unwrap()
});

static SELECTOR_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:export\s+)?const\s+(select[A-Z][A-Za-z0-9_]*)\s*=").unwrap()
});

/// Identifiers whose presence marks a route or file as auth-guarded.
static AUTH_CHECK_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"requireAuth|isAuthenticated|authGuard").unwrap());

pub struct UiExtractor;

impl Extractor for UiExtractor {
    fn name(&self) -> &'static str {
        "ui"
    }

    fn extensions(&self) -> &'static [&'static str] {
        &["js", "jsx", "ts", "tsx"]
    }

    fn extract(&self, text: &str, path: &Path, source: SourceTag) -> Vec<NormalizedEntity> {
        let mut entities = Vec::new();
        entities.extend(component_pass(text, path, source));
        entities.extend(hook_pass(text, path, source));
        entities.extend(route_pass(text, path, source));
        entities.extend(store_pass(text, path, source));
        entities
    }
}

fn component_pass(text: &str, path: &Path, source: SourceTag) -> Vec<NormalizedEntity> {
    let (name, props, component_type) =
        if let Some(captures) = CLASS_COMPONENT_RE.captures(text) {
            (captures[1].to_string(), None, "class")
        } else if let Some(captures) = FUNC_COMPONENT_RE.captures(text) {
            let props = captures.get(2).map(|m| m.as_str().to_string());
            (captures[1].to_string(), props, "functional")
        } else if let Some(captures) = ARROW_COMPONENT_RE.captures(text) {
            let kind = if captures[0].contains("memo(") {
                "memo"
            } else {
                "functional"
            };
            let props = captures.get(2).map(|m| m.as_str().to_string());
            (captures[1].to_string(), props, kind)
        } else {
            return Vec::new();
        };

    let mut entity = NormalizedEntity::new(source, &name, path.to_path_buf());
    entity.metadata.insert("kind".to_string(), "component".to_string());
    entity
        .metadata
        .insert("component_type".to_string(), component_type.to_string());

    if let Some(props) = props {
        for prop in props.split(',') {
            let prop = prop.trim().trim_start_matches("...");
            let name = prop
                .split(':')
                .next()
                .and_then(|p| p.split('=').next())
                .map(str::trim)
                .unwrap_or_default();
            if !name.is_empty() {
                entity
                    .fields
                    .entry(name.to_string())
                    .or_insert_with(|| "any".to_string());
            }
        }
    }

    if component_type == "class" {
        if let Some(captures) = CLASS_STATE_RE.captures(text) {
            for pair in STATE_PAIR_RE.captures_iter(&captures[1]) {
                entity
                    .fields
                    .entry(pair[1].to_string())
                    .or_insert_with(|| literal_type(&pair[2]).to_string());
            }
        }
    } else {
        for captures in USE_STATE_RE.captures_iter(text) {
            entity
                .fields
                .entry(captures[1].to_string())
                .or_insert_with(|| literal_type(&captures[2]).to_string());
        }
    }

    let used: Vec<&str> = KNOWN_HOOKS
        .iter()
        .copied()
        .filter(|hook| text.contains(&format!("{hook}(")))
        .collect();
    if !used.is_empty() {
        entity.metadata.insert("hooks".to_string(), used.join(", "));
    }

    let children: BTreeSet<String> = JSX_TAG_RE
        .captures_iter(text)
        .map(|c| c[1].to_string())
        .filter(|tag| tag != &name && tag != "Fragment" && !tag.starts_with("React"))
        .collect();
    if !children.is_empty() {
        let children: Vec<String> = children.into_iter().collect();
        entity
            .metadata
            .insert("children".to_string(), children.join(", "));
    }

    vec![entity]
}

/// Best-effort type sniff from an initial-value literal.
fn literal_type(value: &str) -> &'static str {
    let value = value.trim();
    if value == "[]" {
        "array"
    } else if value == "{}" {
        "object"
    } else if value == "true" || value == "false" {
        "boolean"
    } else if value.starts_with('"') || value.starts_with('\'') || value.starts_with('`') {
        "string"
    } else if value.parse::<f64>().is_ok() && !value.is_empty() {
        "number"
    } else {
        "any"
    }
}

fn hook_pass(text: &str, path: &Path, source: SourceTag) -> Vec<NormalizedEntity> {
    let mut entities: Vec<NormalizedEntity> = Vec::new();
    let mut seen = BTreeSet::new();

    for captures in HOOK_DECL_RE.captures_iter(text) {
        let name = captures[1].to_string();
        if KNOWN_HOOKS.contains(&name.as_str()) || !seen.insert(name.clone()) {
            continue;
        }
        let mut entity = NormalizedEntity::new(source, &name, path.to_path_buf());
        entity.metadata.insert("kind".to_string(), "hook".to_string());
        entities.push(entity);
    }

    // Declared effect dependencies attach to the file's primary hook.
    if let Some(first) = entities.first_mut() {
        for captures in USE_EFFECT_RE.captures_iter(text) {
            for dep in captures[1].split(',') {
                let dep = dep.trim();
                if !dep.is_empty() {
                    first
                        .fields
                        .entry(dep.to_string())
                        .or_insert_with(|| "dependency".to_string());
                }
            }
        }
    }

    entities
}

fn route_pass(text: &str, path: &Path, source: SourceTag) -> Vec<NormalizedEntity> {
    let mut entities = Vec::new();

    for captures in JSX_ROUTE_RE.captures_iter(text) {
        let tag = &captures[1];
        let attrs = &captures[2];
        let Some(route_path) = PATH_ATTR_RE.captures(attrs).map(|c| c[1].to_string()) else {
            continue;
        };
        let handler = COMPONENT_ATTR_RE
            .captures(attrs)
            .or_else(|| ELEMENT_ATTR_RE.captures(attrs))
            .map(|c| c[1].to_string());

        let guarded = tag.starts_with("Private")
            || tag.starts_with("Protected")
            || tag.starts_with("Auth")
            || AUTH_CHECK_RE.is_match(attrs);

        entities.push(route_entity(
            handler,
            route_path,
            attrs.contains("exact"),
            guarded,
            path,
            source,
        ));
    }

    for captures in OBJECT_ROUTE_RE.captures_iter(text) {
        let block = &captures[0];
        entities.push(route_entity(
            Some(captures[2].to_string()),
            captures[1].to_string(),
            block.contains("exact: true"),
            AUTH_CHECK_RE.is_match(block),
            path,
            source,
        ));
    }

    entities
}

fn route_entity(
    handler: Option<String>,
    route_path: String,
    exact: bool,
    guarded: bool,
    path: &Path,
    source: SourceTag,
) -> NormalizedEntity {
    let name = handler.unwrap_or_else(|| {
        let sanitized: String = route_path
            .trim_matches('/')
            .chars()
            .map(|c| if c == '/' || c == ':' { '_' } else { c })
            .collect();
        if sanitized.is_empty() {
            "Root".to_string()
        } else {
            sanitized
        }
    });

    let mut entity = NormalizedEntity::new(source, name, path.to_path_buf());
    entity.fields.insert("path".to_string(), route_path);
    entity.metadata.insert("kind".to_string(), "route".to_string());
    entity.metadata.insert("exact".to_string(), exact.to_string());
    entity
        .metadata
        .insert("auth_guard".to_string(), guarded.to_string());
    entity
}

fn store_pass(text: &str, path: &Path, source: SourceTag) -> Vec<NormalizedEntity> {
    if !STORE_MARKERS.iter().any(|marker| text.contains(marker)) {
        return Vec::new();
    }

    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default();
    let mut entity = NormalizedEntity::new(source, store_name(&stem), path.to_path_buf());
    entity.metadata.insert("kind".to_string(), "store".to_string());

    for captures in ACTION_CONST_RE
        .captures_iter(text)
        .chain(CREATE_ACTION_RE.captures_iter(text))
    {
        entity
            .fields
            .entry(captures[1].to_string())
            .or_insert_with(|| "action".to_string());
    }
    for captures in REDUCER_RE.captures_iter(text) {
        entity
            .fields
            .entry(captures[1].to_string())
            .or_insert_with(|| "reducer".to_string());
    }
    for captures in SELECTOR_RE.captures_iter(text) {
        entity
            .fields
            .entry(captures[1].to_string())
            .or_insert_with(|| "selector".to_string());
    }

    vec![entity]
}

/// Derive a store name from a file stem: `userSlice`, `user.store`, and
/// `user_store` all normalize to `User`.
fn store_name(stem: &str) -> String {
    let mut base = stem.to_string();
    for suffix in ["Slice", "Store", ".store", "_store", "-store", "slice", "store"] {
        if base.len() > suffix.len() && base.ends_with(suffix) {
            base.truncate(base.len() - suffix.len());
            break;
        }
    }
    let base = base.trim_end_matches(['.', '_', '-']);

    let mut name = String::new();
    let mut capitalize = true;
    for c in base.chars() {
        if c == '_' || c == '-' || c == '.' {
            capitalize = true;
        } else if capitalize {
            name.extend(c.to_uppercase());
            capitalize = false;
        } else {
            name.push(c);
        }
    }
    if name.is_empty() {
        "Store".to_string()
    } else {
        name
    }
}
