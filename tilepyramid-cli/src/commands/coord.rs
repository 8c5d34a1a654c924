//! Coordinate packing commands.

use clap::Subcommand;
use tilepyramid::coord::{unpack, zoom_up, TileCoord};

use super::common::parse_coord;
use crate::error::CliError;

/// Coordinate subcommands.
#[derive(Debug, Subcommand)]
pub enum CoordAction {
    /// Pack a z/x/y coordinate into its integer form
    Pack {
        /// Tile as z/x/y
        coord: String,
    },
    /// Unpack an integer into z/x/y
    Unpack { packed: u64 },
    /// Print the packed parent of a packed coordinate
    Parent { packed: u64 },
}

pub fn run(action: CoordAction) -> Result<(), CliError> {
    match action {
        CoordAction::Pack { coord } => {
            println!("{}", parse_coord(&coord)?.to_packed());
        }
        CoordAction::Unpack { packed } => {
            println!("{}", unpack(packed)?);
        }
        CoordAction::Parent { packed } => {
            let coord = TileCoord::from_packed(packed)?;
            let parent = zoom_up(packed).ok_or_else(|| {
                CliError::InvalidArgument(format!("tile {} has no parent", coord))
            })?;
            println!("{}", parent);
        }
    }
    Ok(())
}
