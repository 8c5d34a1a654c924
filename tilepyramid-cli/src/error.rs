//! CLI error handling with user-friendly messages.
//!
//! Centralizes error handling for the CLI, providing consistent formatting
//! and appropriate exit codes.

use std::fmt;
use std::process;
use tilepyramid::config::ConfigFileError;
use tilepyramid::coord::CoordError;
use tilepyramid::format::FormatError;
use tilepyramid::layers::LayerSpecError;
use tilepyramid::reformat::ReformatError;
use tilepyramid::store::StoreError;

/// CLI-specific errors with user-friendly messages.
#[derive(Debug)]
pub enum CliError {
    /// Failed to initialize logging
    LoggingInit(String),
    /// Configuration file could not be loaded
    Config(ConfigFileError),
    /// Argument failed validation
    InvalidArgument(String),
    /// Tile coordinate error
    Coord(CoordError),
    /// Unknown or failing output format
    Format(FormatError),
    /// Unknown layer requested
    Layers(LayerSpecError),
    /// Store backend error
    Store(StoreError),
    /// Reformatting a tile of record failed
    Reformat(ReformatError),
    /// Requested tile is not in the store
    NotFound(String),
    /// Failed to read or write a local file
    File { path: String, error: std::io::Error },
}

impl CliError {
    /// Exit the process with an appropriate error message and code.
    pub fn exit(&self) -> ! {
        eprintln!("Error: {}", self);

        match self {
            CliError::Store(StoreError::Bucket(_)) | CliError::Store(StoreError::Config(_)) => {
                eprintln!();
                eprintln!("Check the [store] and [s3] sections of the config file:");
                eprintln!("  1. type = s3 requires a bucket name");
                eprintln!("  2. endpoint must be reachable from this host");
            }
            CliError::Layers(LayerSpecError::Unknown(_)) => {
                eprintln!();
                eprintln!("Known layers are listed under [layers] all = ... in the config file.");
            }
            _ => {}
        }

        process::exit(1)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::LoggingInit(msg) => write!(f, "Failed to initialize logging: {}", msg),
            CliError::Config(e) => write!(f, "Configuration error: {}", e),
            CliError::InvalidArgument(msg) => write!(f, "Invalid argument: {}", msg),
            CliError::Coord(e) => write!(f, "Invalid tile coordinate: {}", e),
            CliError::Format(e) => write!(f, "{}", e),
            CliError::Layers(e) => write!(f, "{}", e),
            CliError::Store(e) => write!(f, "Store error: {}", e),
            CliError::Reformat(e) => write!(f, "Failed to reformat tile: {}", e),
            CliError::NotFound(what) => write!(f, "Tile not found: {}", what),
            CliError::File { path, error } => write!(f, "File error '{}': {}", path, error),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Config(e) => Some(e),
            CliError::Coord(e) => Some(e),
            CliError::Format(e) => Some(e),
            CliError::Layers(e) => Some(e),
            CliError::Store(e) => Some(e),
            CliError::Reformat(e) => Some(e),
            CliError::File { error, .. } => Some(error),
            _ => None,
        }
    }
}

impl From<ConfigFileError> for CliError {
    fn from(e: ConfigFileError) -> Self {
        CliError::Config(e)
    }
}

impl From<CoordError> for CliError {
    fn from(e: CoordError) -> Self {
        CliError::Coord(e)
    }
}

impl From<FormatError> for CliError {
    fn from(e: FormatError) -> Self {
        CliError::Format(e)
    }
}

impl From<LayerSpecError> for CliError {
    fn from(e: LayerSpecError) -> Self {
        CliError::Layers(e)
    }
}

impl From<StoreError> for CliError {
    fn from(e: StoreError) -> Self {
        CliError::Store(e)
    }
}

impl From<ReformatError> for CliError {
    fn from(e: ReformatError) -> Self {
        CliError::Reformat(e)
    }
}
