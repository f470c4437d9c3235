//! Extract command - scan one source tree and emit normalized entities.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use colored::Colorize;

use crate::config::AtlasConfig;
use crate::extract;
use crate::models::SourceTag;

/// Execute the extract command
pub fn execute(
    root: PathBuf,
    source: SourceTag,
    out: Option<PathBuf>,
    config: Option<PathBuf>,
) -> Result<()> {
    let config = AtlasConfig::load(config.as_deref())?;

    println!(
        "{} Extracting {} entities from {}...",
        "→".cyan().bold(),
        source,
        root.display()
    );

    let entities = extract::extract_source(&root, source, &config.scan)?;
    println!(
        "{} {} entities extracted",
        "✓".green().bold(),
        entities.len()
    );

    let json = serde_json::to_string_pretty(&entities)?;
    match out {
        Some(path) => {
            fs::write(&path, json)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            println!("  {} {}", "→".cyan(), path.display());
        }
        None => println!("{json}"),
    }

    Ok(())
}
