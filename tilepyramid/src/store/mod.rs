//! Artifact stores for formatted tiles.
//!
//! Every backend implements [`TileStore`], keyed by `(coord, format, layer)`:
//!
//! - [`FileStore`] writes `{base}/{layer}/{z}/{x}/{y}.{ext}` through a swap
//!   file and an atomic replace
//! - [`ObjectStore`] writes hashed keys into an [`ObjectBucket`]
//! - [`MemoryStore`] keeps only the most recent write, for tests
//!
//! Reads report absence as `Ok(None)`; only real failures are errors.

mod bucket;
mod changed;
mod file;
mod memory;
mod object;
mod replace;

pub use bucket::{BucketError, HttpBucket, MemoryBucket, ObjectBucket, PutOptions};
pub use changed::{tiles_are_equal, write_tile_if_changed};
pub use file::FileStore;
pub use memory::MemoryStore;
pub use object::{s3_tile_key, ObjectStore, PUBLIC_READ_ACL, REDUCED_REDUNDANCY_CLASS};
pub use replace::{replace_file, replace_with_retry, REPLACE_ATTEMPTS};

use crate::config::{StoreKind, StoreSettings};
use crate::coord::TileCoord;
use crate::format::Format;
use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;

/// Errors raised by tile stores.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Filesystem operation failed
    #[error("Store I/O error: {0}")]
    Io(#[from] io::Error),

    /// Swap file could not be moved over the target
    #[error("Failed to replace {dst} with {src} after {attempts} attempts")]
    ReplaceFailed {
        src: PathBuf,
        dst: PathBuf,
        attempts: u32,
        #[source]
        source: io::Error,
    },

    /// Base path exists but is not a directory
    #[error("Store base path is not a directory: {0}")]
    NotADirectory(PathBuf),

    /// Object bucket operation failed
    #[error(transparent)]
    Bucket(#[from] BucketError),

    /// Configured backend is missing a required setting
    #[error("Store misconfigured: {0}")]
    Config(String),
}

/// Capability shared by every artifact backend.
pub trait TileStore: Send + Sync {
    /// Store `data` for `(coord, format, layer)`, replacing any previous artifact.
    fn write_tile(
        &self,
        data: &[u8],
        coord: TileCoord,
        format: &dyn Format,
        layer: &str,
    ) -> Result<(), StoreError>;

    /// Fetch the artifact for `(coord, format, layer)`, or `None` if absent.
    fn read_tile(
        &self,
        coord: TileCoord,
        format: &dyn Format,
        layer: &str,
    ) -> Result<Option<Vec<u8>>, StoreError>;

    /// Remove the artifacts for `coords`, returning how many actually existed.
    fn delete_tiles(
        &self,
        coords: &[TileCoord],
        format: &dyn Format,
        layer: &str,
    ) -> Result<usize, StoreError>;
}

/// Build the backend named by `settings`.
pub fn make_store(settings: &StoreSettings) -> Result<Box<dyn TileStore>, StoreError> {
    match settings.kind {
        StoreKind::File => Ok(Box::new(FileStore::new(&settings.base_path)?)),
        StoreKind::Memory => Ok(Box::new(MemoryStore::new())),
        StoreKind::S3 => {
            let s3 = &settings.s3;
            let bucket_name = s3
                .bucket
                .as_deref()
                .ok_or_else(|| StoreError::Config("s3.bucket is required".to_string()))?;
            let bucket = HttpBucket::new(&s3.endpoint_url(), bucket_name)?;
            Ok(Box::new(ObjectStore::new(
                Arc::new(bucket),
                s3.date_prefix.clone(),
                s3.path.clone(),
                s3.reduced_redundancy,
            )))
        }
    }
}
