//! Reformat a tile of record into an output format.

use clap::Args;
use std::path::PathBuf;
use tilepyramid::config::ConfigFile;
use tilepyramid::layers::parse_layer_spec;
use tilepyramid::reformat::{reformat_with_transform, ClipSimplifyTransform};

use super::common::{parse_coord, parse_format, read_input, write_output};
use crate::error::CliError;

/// Arguments for `reformat`.
#[derive(Debug, Args)]
pub struct ReformatArgs {
    /// Tile of record (JSON); stdin when omitted
    #[arg(long)]
    pub record: Option<PathBuf>,

    /// Layers to keep, comma separated, or "all"
    #[arg(long, default_value = "all")]
    pub layers: String,

    /// Tile as z/x/y
    #[arg(long)]
    pub coord: String,

    /// Output format name or extension
    #[arg(long, default_value = "json")]
    pub format: String,

    /// Simplification tolerance in pixels
    #[arg(long, default_value = "0")]
    pub simplify: f64,

    /// Output file; stdout when omitted
    #[arg(long)]
    pub output: Option<PathBuf>,
}

pub fn run(args: ReformatArgs, config: &ConfigFile) -> Result<(), CliError> {
    if !(args.simplify.is_finite() && args.simplify >= 0.0) {
        return Err(CliError::InvalidArgument(format!(
            "simplify must be a non-negative number, got {}",
            args.simplify
        )));
    }

    let layers = parse_layer_spec(&args.layers, &config.layers.layer_config())?;
    let coord = parse_coord(&args.coord)?;
    let format = parse_format(&args.format)?;
    let record = read_input(args.record.as_deref())?;

    let out = reformat_with_transform(
        &record,
        &layers,
        coord,
        format,
        &config.buffer,
        &ClipSimplifyTransform::with_simplify(args.simplify),
    )?;
    write_output(args.output.as_deref(), &out)
}
