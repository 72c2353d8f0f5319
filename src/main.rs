//! Dungeongen - Entry Point
//!
//! Generates one dungeon layout from the command line and writes it out
//! as JSON or prints it as an ASCII map.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use dungeongen::save::save_grid;
use dungeongen::world::generation::{load_config, write_config, DungeonGenerator, GenerationConfig};

/// Seeded room-and-maze dungeon generator
#[derive(Parser, Debug)]
#[command(name = "dungeongen")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Random seed (a random one is chosen when omitted)
    #[arg(short, long)]
    seed: Option<u64>,

    /// RON configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Grid width override (odd)
    #[arg(long)]
    width: Option<i32>,

    /// Grid height override (odd)
    #[arg(long)]
    height: Option<i32>,

    /// Write the grid as JSON to this path
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Print the grid as ASCII to stdout
    #[arg(long)]
    ascii: bool,

    /// Write the default configuration to this path and exit
    #[arg(long, value_name = "PATH")]
    write_default_config: Option<PathBuf>,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    if let Some(path) = &args.write_default_config {
        write_config(path, &GenerationConfig::default())
            .with_context(|| format!("writing {}", path.display()))?;
        log::info!("Default configuration written to {}", path.display());
        return Ok(());
    }

    let mut config = match &args.config {
        Some(path) => load_config(path)?,
        None => GenerationConfig::default(),
    };
    if let Some(width) = args.width {
        config.width = width;
    }
    if let Some(height) = args.height {
        config.height = height;
    }

    let seed = args.seed.unwrap_or_else(rand::random);
    let mut generator = DungeonGenerator::new(config)?;
    let result = generator.generate(seed)?;

    log::info!(
        "Seed {}: {} rooms, {} regenerations, {} fill retries",
        result.seed,
        result.rooms.len(),
        result.regenerations,
        result.fill_retries
    );

    if let Some(path) = &args.output {
        save_grid(path, &result.grid).with_context(|| format!("saving {}", path.display()))?;
    }

    if args.ascii || args.output.is_none() {
        print!("{}", result.grid);
    }

    Ok(())
}
