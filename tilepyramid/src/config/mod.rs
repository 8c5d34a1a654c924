//! User configuration loaded from `~/.tilepyramid/config.ini`.
//!
//! # Example
//!
//! ```
//! use tilepyramid::config::{ConfigFile, StoreKind};
//!
//! let config = ConfigFile::default();
//! assert_eq!(config.store.kind, StoreKind::File);
//! ```

mod defaults;
mod file;
mod parser;
mod settings;
mod writer;

pub use defaults::{DEFAULT_BASE_PATH, DEFAULT_LAYERS, DEFAULT_S3_ENDPOINT, DEFAULT_S3_PATH};
pub use file::{config_directory, config_file_path, ConfigFileError};
pub use settings::{
    ConfigFile, LayerSettings, LoggingSettings, S3Settings, StoreKind, StoreSettings,
};
