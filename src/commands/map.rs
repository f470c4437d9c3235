//! Map command - scan two source trees and generate entity mappings.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use colored::Colorize;

use crate::config::AtlasConfig;
use crate::extract;
use crate::mapper;
use crate::models::{MappingReport, NormalizedEntity, SourceTag};
use crate::report;

/// Execute the map command
pub fn execute(
    source_root: PathBuf,
    target_root: PathBuf,
    source: SourceTag,
    target: SourceTag,
    out_dir: PathBuf,
    config: Option<PathBuf>,
) -> Result<()> {
    let config = AtlasConfig::load(config.as_deref())?;

    // One source failing never blocks the other: the failed side contributes
    // zero entities and the run continues with whatever succeeded.
    let source_entities = extract_side(&source_root, source, &config);
    let target_entities = extract_side(&target_root, target, &config);

    println!(
        "{} Mapping {} {} entities against {} {} entities...",
        "→".cyan().bold(),
        source_entities.len(),
        source,
        target_entities.len(),
        target
    );

    let mappings = mapper::generate_mappings(&source_entities, &target_entities, &config.mapper);
    let mapping_report = MappingReport::build(
        source,
        &source_entities,
        target,
        &target_entities,
        mappings,
    );

    fs::create_dir_all(&out_dir)
        .with_context(|| format!("Failed to create {}", out_dir.display()))?;

    let json_path = out_dir.join("mappings.json");
    let json = report::to_json(&mapping_report)?;
    fs::write(&json_path, json)
        .with_context(|| format!("Failed to write {}", json_path.display()))?;

    let md_path = out_dir.join("mappings.md");
    fs::write(&md_path, report::to_markdown(&mapping_report))
        .with_context(|| format!("Failed to write {}", md_path.display()))?;

    println!(
        "{} {} mappings generated",
        "✓".green().bold(),
        mapping_report.mappings.len()
    );
    println!("  {} {}", "→".cyan(), json_path.display());
    println!("  {} {}", "→".cyan(), md_path.display());

    Ok(())
}

fn extract_side(root: &Path, tag: SourceTag, config: &AtlasConfig) -> Vec<NormalizedEntity> {
    match extract::extract_source(root, tag, &config.scan) {
        Ok(entities) => entities,
        Err(err) => {
            eprintln!("{} {err}", "✗".red().bold());
            Vec::new()
        }
    }
}
