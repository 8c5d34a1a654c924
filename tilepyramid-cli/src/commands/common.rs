//! Common helpers shared across CLI commands.

use std::fs;
use std::io::{self, Read, Write};
use std::path::Path;
use tilepyramid::coord::TileCoord;
use tilepyramid::format::{lookup_format, Format};
use tilepyramid::projection::Bounds;

use crate::error::CliError;

/// Parse a `z/x/y` tile argument.
pub fn parse_coord(value: &str) -> Result<TileCoord, CliError> {
    Ok(value.parse::<TileCoord>()?)
}

pub fn parse_format(value: &str) -> Result<&'static dyn Format, CliError> {
    Ok(lookup_format(value)?)
}

/// Parse `minlon,minlat,maxlon,maxlat`.
pub fn parse_bounds(value: &str) -> Result<Bounds, CliError> {
    let parts: Vec<f64> = value
        .split(',')
        .map(|p| p.trim().parse::<f64>())
        .collect::<Result<_, _>>()
        .map_err(|_| CliError::InvalidArgument(format!("bounds '{}' must be four numbers", value)))?;

    let [min_lon, min_lat, max_lon, max_lat] = parts[..] else {
        return Err(CliError::InvalidArgument(format!(
            "bounds '{}' must be minlon,minlat,maxlon,maxlat",
            value
        )));
    };
    if min_lon > max_lon || min_lat > max_lat {
        return Err(CliError::InvalidArgument(format!(
            "bounds '{}' has min greater than max",
            value
        )));
    }
    Ok(Bounds::new(min_lon, min_lat, max_lon, max_lat))
}

/// Read a file, or stdin when `path` is `None`.
pub fn read_input(path: Option<&Path>) -> Result<Vec<u8>, CliError> {
    match path {
        Some(path) => fs::read(path).map_err(|error| CliError::File {
            path: path.display().to_string(),
            error,
        }),
        None => {
            let mut data = Vec::new();
            io::stdin()
                .read_to_end(&mut data)
                .map_err(|error| CliError::File {
                    path: "<stdin>".to_string(),
                    error,
                })?;
            Ok(data)
        }
    }
}

/// Write to a file, or stdout when `path` is `None`.
pub fn write_output(path: Option<&Path>, data: &[u8]) -> Result<(), CliError> {
    match path {
        Some(path) => fs::write(path, data).map_err(|error| CliError::File {
            path: path.display().to_string(),
            error,
        }),
        None => {
            let mut stdout = io::stdout().lock();
            stdout
                .write_all(data)
                .and_then(|()| stdout.flush())
                .map_err(|error| CliError::File {
                    path: "<stdout>".to_string(),
                    error,
                })
        }
    }
}

/// Print one `z/x/y` line per tile to stdout.
pub fn print_coords<I>(coords: I) -> Result<usize, CliError>
where
    I: IntoIterator<Item = TileCoord>,
{
    let stdout = io::stdout();
    let mut out = io::BufWriter::new(stdout.lock());
    let mut count = 0;
    for coord in coords {
        writeln!(out, "{}", coord).map_err(stdout_error)?;
        count += 1;
    }
    out.flush().map_err(stdout_error)?;
    Ok(count)
}

fn stdout_error(error: io::Error) -> CliError {
    CliError::File {
        path: "<stdout>".to_string(),
        error,
    }
}
