use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use anyhow::bail;
use serde::{Deserialize, Serialize};

/// Identifies which codebase an entity was extracted from.
///
/// The set is closed: string forms exist only at the CLI and serialization
/// edges. The tag names the *tree* being scanned, not the file format — a
/// `Rails` tree may still contain embedded-code templates, and a `Frontend`
/// tree may carry curly-brace templates alongside its components.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SourceTag {
    /// ORM model classes (record-style class declarations).
    #[serde(rename = "rails")]
    Rails,
    /// Annotated struct declarations (derive-carrying types).
    #[serde(rename = "rust")]
    Rust,
    /// UI components, hooks, routes, and state stores.
    #[serde(rename = "frontend")]
    Frontend,
    /// Standalone template trees.
    #[serde(rename = "templates")]
    Templates,
}

impl fmt::Display for SourceTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceTag::Rails => write!(f, "rails"),
            SourceTag::Rust => write!(f, "rust"),
            SourceTag::Frontend => write!(f, "frontend"),
            SourceTag::Templates => write!(f, "templates"),
        }
    }
}

impl FromStr for SourceTag {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "rails" => Ok(SourceTag::Rails),
            "rust" => Ok(SourceTag::Rust),
            "frontend" => Ok(SourceTag::Frontend),
            "templates" => Ok(SourceTag::Templates),
            other => bail!(
                "unknown source tag '{other}' (expected rails, rust, frontend, or templates)"
            ),
        }
    }
}

/// A source-agnostic record describing one extracted type/model/component.
///
/// Entities are produced once per extraction pass over a source tree and are
/// immutable afterward. `fields` maps field name to a best-effort type
/// string and is what the mapper matches on; `metadata` carries auxiliary
/// facts (validation rules, derive lists, hook usage) that never participate
/// in matching. Ordered maps keep serialized output deterministic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedEntity {
    pub source: SourceTag,
    pub entity: String,
    pub fields: BTreeMap<String, String>,
    pub source_file: PathBuf,
    #[serde(default)]
    pub metadata: BTreeMap<String, String>,
}

impl NormalizedEntity {
    pub fn new(source: SourceTag, entity: impl Into<String>, source_file: PathBuf) -> Self {
        Self {
            source,
            entity: entity.into(),
            fields: BTreeMap::new(),
            source_file,
            metadata: BTreeMap::new(),
        }
    }

    /// Qualified name used in mappings and reports: `source + "." + entity`.
    pub fn qualified_name(&self) -> String {
        format!("{}.{}", self.source, self.entity)
    }
}
