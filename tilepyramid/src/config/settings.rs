//! Settings structs for all configuration sections.
//!
//! Each struct represents one `[section]` of the INI config file.
//! These are pure data types with no parsing or serialization logic.

use crate::layers::LayerConfig;
use crate::reformat::BufferConfig;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Complete configuration loaded from config.ini.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigFile {
    /// Store backend (`[store]` and `[s3]`)
    pub store: StoreSettings,
    /// Known layer names
    pub layers: LayerSettings,
    /// Clipping buffers per output format
    pub buffer: BufferConfig,
    pub logging: LoggingSettings,
}

/// Artifact store backend.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StoreKind {
    #[default]
    File,
    S3,
    Memory,
}

impl StoreKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            StoreKind::File => "file",
            StoreKind::S3 => "s3",
            StoreKind::Memory => "memory",
        }
    }
}

impl fmt::Display for StoreKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StoreKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "file" | "directory" => Ok(StoreKind::File),
            "s3" => Ok(StoreKind::S3),
            "memory" => Ok(StoreKind::Memory),
            other => Err(format!("unknown store type '{}'", other)),
        }
    }
}

/// Store configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct StoreSettings {
    pub kind: StoreKind,
    /// Root directory for the file backend
    pub base_path: PathBuf,
    /// Object storage settings, used when `kind` is `S3`
    pub s3: S3Settings,
}

/// Object storage configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct S3Settings {
    pub bucket: Option<String>,
    /// Endpoint URL; defaults to the public S3 endpoint
    pub endpoint: Option<String>,
    /// First key segment, typically a build date
    pub date_prefix: String,
    /// Path segment after the hash; empty to omit
    pub path: String,
    pub reduced_redundancy: bool,
}

impl S3Settings {
    pub fn endpoint_url(&self) -> String {
        self.endpoint
            .clone()
            .unwrap_or_else(|| super::defaults::DEFAULT_S3_ENDPOINT.to_string())
    }
}

/// Layer configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayerSettings {
    /// Every layer name `all` expands to
    pub all: Vec<String>,
}

impl LayerSettings {
    pub fn layer_config(&self) -> LayerConfig {
        LayerConfig::new(self.all.iter().cloned())
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingSettings {
    pub directory: PathBuf,
    pub file: String,
}
