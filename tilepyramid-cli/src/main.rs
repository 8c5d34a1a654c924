//! tilepyramid CLI - Command-line interface
//!
//! This binary exposes the tilepyramid library: coordinate packing, tile
//! enumeration, artifact storage and tile-of-record reformatting.

mod commands;
mod error;

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tilepyramid::config::{config_file_path, ConfigFile};
use tilepyramid::logging::{init_logging_with_level, LoggingGuard};

use commands::coord::CoordAction;
use commands::reformat::ReformatArgs;
use commands::store::StoreAction;
use commands::tiles::{SeedArgs, TilesArgs};
use error::CliError;

#[derive(Parser)]
#[command(name = "tilepyramid")]
#[command(version = tilepyramid::VERSION)]
#[command(about = "Quadtree tile addressing, storage and reformatting", long_about = None)]
struct Cli {
    /// Config file (default: ~/.tilepyramid/config.ini)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Pack, unpack and walk up packed tile coordinates
    Coord {
        #[command(subcommand)]
        action: CoordAction,
    },
    /// List every tile of the pyramid between two zoom levels
    Seed(SeedArgs),
    /// List tiles intersecting bounding boxes
    Tiles(TilesArgs),
    /// Read, write or delete stored tiles
    Store {
        #[command(subcommand)]
        action: StoreAction,
    },
    /// Reformat a tile of record
    Reformat(ReformatArgs),
}

fn load_config(path: Option<&Path>) -> Result<ConfigFile, CliError> {
    let path = path.map(Path::to_path_buf).unwrap_or_else(config_file_path);
    Ok(ConfigFile::load_from(&path)?)
}

fn init_logging(config: &ConfigFile, verbose: bool) -> Result<LoggingGuard, CliError> {
    let level = if verbose { "debug" } else { "info" };
    init_logging_with_level(&config.logging.directory, &config.logging.file, level)
        .map_err(|e| CliError::LoggingInit(e.to_string()))
}

fn run(cli: Cli) -> Result<(), CliError> {
    let config = load_config(cli.config.as_deref())?;
    let _guard = init_logging(&config, cli.verbose)?;

    match cli.command {
        Commands::Coord { action } => commands::coord::run(action),
        Commands::Seed(args) => commands::tiles::run_seed(args),
        Commands::Tiles(args) => commands::tiles::run_tiles(args),
        Commands::Store { action } => commands::store::run(action, &config),
        Commands::Reformat(args) => commands::reformat::run(args, &config),
    }
}

fn main() {
    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        e.exit();
    }
}
