//! Per-format extraction strategies.
//!
//! Each extractor is a best-effort pattern matcher, not a full parser: a file
//! with no recognizable pattern contributes nothing, and a partially-matching
//! file still yields whatever sub-records were found. Extractors stay behind
//! the [`Extractor`] trait so a real parser can replace any of them without
//! touching the mapping or reporting layers.

pub mod orm;
pub mod structs;
pub mod templates;
pub mod ui;

use std::fs;
use std::path::Path;

use rayon::prelude::*;
use tracing::{info, warn};

use crate::config::ScanConfig;
use crate::error::Result;
use crate::models::{NormalizedEntity, SourceTag};
use crate::walker;

/// A single extraction strategy: raw file text in, zero or more normalized
/// records out.
pub trait Extractor: Sync {
    /// Name used in logs.
    fn name(&self) -> &'static str;

    /// Lowercase file extensions this extractor accepts.
    fn extensions(&self) -> &'static [&'static str];

    /// Extract normalized entities from one file's text. Pattern misses are
    /// an empty result, never an error.
    fn extract(&self, text: &str, path: &Path, source: SourceTag) -> Vec<NormalizedEntity>;
}

static EXTRACTORS: &[&(dyn Extractor)] = &[
    &orm::OrmExtractor,
    &structs::StructExtractor,
    &ui::UiExtractor,
    &templates::TemplateExtractor,
];

/// Walk one source tree and extract every normalized entity in it.
///
/// Extraction is a pure function of each file's content, so files are
/// processed on a worker pool; each worker returns its own list and the
/// lists are merged in file order afterward. Per-file read failures are
/// skipped and logged. Only a bad root is an error.
pub fn extract_source(
    root: &Path,
    source: SourceTag,
    scan: &ScanConfig,
) -> Result<Vec<NormalizedEntity>> {
    let files = walker::collect_files(root, source, scan)?;

    let per_file: Vec<Vec<NormalizedEntity>> = files
        .par_iter()
        .map(|path| extract_file(path, source))
        .collect();

    let entities: Vec<NormalizedEntity> = per_file.into_iter().flatten().collect();
    info!(
        "extracted {} entities from {} files under {}",
        entities.len(),
        files.len(),
        root.display()
    );
    Ok(entities)
}

fn extract_file(path: &Path, source: SourceTag) -> Vec<NormalizedEntity> {
    let ext = match path.extension().and_then(|e| e.to_str()) {
        Some(ext) => ext.to_lowercase(),
        None => return Vec::new(),
    };

    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) => {
            warn!("skipping {}: {err}", path.display());
            return Vec::new();
        }
    };

    let mut entities = Vec::new();
    for extractor in EXTRACTORS {
        if extractor.extensions().contains(&ext.as_str()) {
            entities.extend(extractor.extract(&text, path, source));
        }
    }
    entities
}
