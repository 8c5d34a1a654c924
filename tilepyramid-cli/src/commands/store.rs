//! Artifact store commands.

use clap::Subcommand;
use std::path::PathBuf;
use tilepyramid::config::ConfigFile;
use tilepyramid::store::{make_store, write_tile_if_changed};
use tracing::info;

use super::common::{parse_coord, parse_format, read_input, write_output};
use crate::error::CliError;

/// Store subcommands.
#[derive(Debug, Subcommand)]
pub enum StoreAction {
    /// Write a tile if it differs from the stored one
    Write {
        /// Tile as z/x/y
        #[arg(long)]
        coord: String,
        /// Format name or extension (json, zip)
        #[arg(long, default_value = "json")]
        format: String,
        #[arg(long, default_value = "all")]
        layer: String,
        /// Payload file; stdin when omitted
        #[arg(long)]
        input: Option<PathBuf>,
    },
    /// Read a tile
    Read {
        #[arg(long)]
        coord: String,
        #[arg(long, default_value = "json")]
        format: String,
        #[arg(long, default_value = "all")]
        layer: String,
        /// Output file; stdout when omitted
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Delete one or more tiles
    Delete {
        /// Tiles as z/x/y (repeatable)
        #[arg(long = "coord", required = true)]
        coords: Vec<String>,
        #[arg(long, default_value = "json")]
        format: String,
        #[arg(long, default_value = "all")]
        layer: String,
    },
}

pub fn run(action: StoreAction, config: &ConfigFile) -> Result<(), CliError> {
    let store = make_store(&config.store)?;

    match action {
        StoreAction::Write {
            coord,
            format,
            layer,
            input,
        } => {
            let coord = parse_coord(&coord)?;
            let format = parse_format(&format)?;
            let data = read_input(input.as_deref())?;

            let written = write_tile_if_changed(store.as_ref(), &data, coord, format, &layer)?;
            info!(%coord, layer = %layer, written, "Store write");
            println!("{}", if written { "written" } else { "unchanged" });
        }
        StoreAction::Read {
            coord,
            format,
            layer,
            output,
        } => {
            let coord = parse_coord(&coord)?;
            let format = parse_format(&format)?;
            let data = store
                .read_tile(coord, format, &layer)?
                .ok_or_else(|| {
                    CliError::NotFound(format!("{}/{}.{}", layer, coord, format.extension()))
                })?;
            write_output(output.as_deref(), &data)?;
        }
        StoreAction::Delete {
            coords,
            format,
            layer,
        } => {
            let coords = coords
                .iter()
                .map(|c| parse_coord(c))
                .collect::<Result<Vec<_>, _>>()?;
            let format = parse_format(&format)?;
            let deleted = store.delete_tiles(&coords, format, &layer)?;
            println!("{}", deleted);
        }
    }
    Ok(())
}
