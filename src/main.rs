use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::str::FromStr;

use atlas::commands::{extract, map};
use atlas::logging::init_logging;
use atlas::models::SourceTag;

#[derive(Parser)]
#[command(name = "atlas")]
#[command(about = "Cross-codebase entity extraction and mapping", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scan one source tree and emit normalized entities as JSON
    Extract {
        /// Root directory of the source tree
        root: PathBuf,

        /// Source tag (rails, rust, frontend, templates)
        #[arg(short, long)]
        source: String,

        /// Write entities to this file instead of stdout
        #[arg(short, long)]
        out: Option<PathBuf>,

        /// Path to an atlas.toml configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Scan two source trees and generate confidence-scored entity mappings
    Map {
        /// Root directory of the source-side tree
        source_root: PathBuf,

        /// Root directory of the target-side tree
        target_root: PathBuf,

        /// Source-side tag (rails, rust, frontend, templates)
        #[arg(short, long)]
        source: String,

        /// Target-side tag (rails, rust, frontend, templates)
        #[arg(short, long)]
        target: String,

        /// Directory for mappings.json and mappings.md
        #[arg(short, long, default_value = "atlas-report")]
        out_dir: PathBuf,

        /// Path to an atlas.toml configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    init_logging();

    let cli = Cli::parse();

    match cli.command {
        Commands::Extract {
            root,
            source,
            out,
            config,
        } => {
            let source = SourceTag::from_str(&source)?;
            extract::execute(root, source, out, config)
        }
        Commands::Map {
            source_root,
            target_root,
            source,
            target,
            out_dir,
            config,
        } => {
            let source = SourceTag::from_str(&source)?;
            let target = SourceTag::from_str(&target)?;
            map::execute(source_root, target_root, source, target, out_dir, config)
        }
    }
}
