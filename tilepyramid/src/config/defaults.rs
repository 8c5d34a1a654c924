//! Default values for all configuration settings, and `ConfigFile::default()`.

use std::path::PathBuf;

use super::settings::*;
use crate::reformat::BufferConfig;

/// Default file store root, relative to the working directory.
pub const DEFAULT_BASE_PATH: &str = "tiles";

pub const DEFAULT_S3_ENDPOINT: &str = "https://s3.amazonaws.com";

/// Default path segment placed after the key hash.
pub const DEFAULT_S3_PATH: &str = "osm";

/// Layers served when no `[layers]` section is present.
pub const DEFAULT_LAYERS: &[&str] = &[
    "boundaries",
    "buildings",
    "earth",
    "landuse",
    "places",
    "pois",
    "roads",
    "transit",
    "water",
];

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            kind: StoreKind::File,
            base_path: PathBuf::from(DEFAULT_BASE_PATH),
            s3: S3Settings::default(),
        }
    }
}

impl Default for S3Settings {
    fn default() -> Self {
        Self {
            bucket: None,
            endpoint: None,
            date_prefix: String::new(),
            path: DEFAULT_S3_PATH.to_string(),
            reduced_redundancy: false,
        }
    }
}

impl Default for LayerSettings {
    fn default() -> Self {
        Self {
            all: DEFAULT_LAYERS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            directory: crate::logging::default_log_dir(),
            file: crate::logging::default_log_file().to_string(),
        }
    }
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            store: StoreSettings::default(),
            layers: LayerSettings::default(),
            buffer: BufferConfig::default(),
            logging: LoggingSettings::default(),
        }
    }
}
