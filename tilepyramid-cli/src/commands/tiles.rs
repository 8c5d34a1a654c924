//! Tile enumeration commands.

use clap::Args;
use tilepyramid::coord::{seed_tiles_range, MAX_ZOOM};
use tilepyramid::generator::TileRegions;
use tracing::info;

use super::common::{parse_bounds, print_coords};
use crate::error::CliError;

/// Arguments for `seed`.
#[derive(Debug, Args)]
pub struct SeedArgs {
    /// Last zoom level to print (inclusive)
    #[arg(long)]
    pub zoom_until: u8,

    /// First zoom level to print
    #[arg(long, default_value = "0")]
    pub zoom_start: u8,
}

/// Arguments for `tiles`.
#[derive(Debug, Args)]
pub struct TilesArgs {
    /// Bounding box as minlon,minlat,maxlon,maxlat (repeatable)
    #[arg(long = "bounds", required = true, allow_hyphen_values = true)]
    pub bounds: Vec<String>,

    #[arg(long, default_value = "0")]
    pub min_zoom: u8,

    #[arg(long)]
    pub max_zoom: u8,
}

fn check_zoom_range(start: u8, until: u8) -> Result<(), CliError> {
    if until > MAX_ZOOM {
        return Err(CliError::InvalidArgument(format!(
            "zoom {} exceeds maximum {}",
            until, MAX_ZOOM
        )));
    }
    if start > until {
        return Err(CliError::InvalidArgument(format!(
            "start zoom {} is above end zoom {}",
            start, until
        )));
    }
    Ok(())
}

pub fn run_seed(args: SeedArgs) -> Result<(), CliError> {
    check_zoom_range(args.zoom_start, args.zoom_until)?;
    let count = print_coords(seed_tiles_range(args.zoom_start, args.zoom_until))?;
    info!(count, zoom_start = args.zoom_start, zoom_until = args.zoom_until, "Seed tiles listed");
    Ok(())
}

pub fn run_tiles(args: TilesArgs) -> Result<(), CliError> {
    check_zoom_range(args.min_zoom, args.max_zoom)?;
    let bounds = args
        .bounds
        .iter()
        .map(|b| parse_bounds(b))
        .collect::<Result<Vec<_>, _>>()?;

    let regions = TileRegions::new(&bounds, args.min_zoom, args.max_zoom);
    let count = print_coords(&regions)?;
    info!(count, regions = bounds.len(), "Tiles listed");
    Ok(())
}
