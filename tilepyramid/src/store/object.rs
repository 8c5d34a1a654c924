//! Object-storage tile store with hash-spread keys.

use super::bucket::{ObjectBucket, PutOptions};
use super::{StoreError, TileStore};
use crate::coord::TileCoord;
use crate::format::Format;
use md5::{Digest, Md5};
use std::fmt::Write as _;
use std::sync::Arc;
use tracing::debug;

/// Canned ACL applied to every tile object.
pub const PUBLIC_READ_ACL: &str = "public-read";

/// Storage class used when reduced redundancy is enabled.
pub const REDUCED_REDUNDANCY_CLASS: &str = "REDUCED_REDUNDANCY";

/// Hex characters of the digest placed after the date prefix.
const HASH_LEN: usize = 5;

/// Object key for a tile: `/{date}/{hash}{/path}/{layer}/{z}/{x}/{y}.{ext}`.
///
/// `hash` is the first five hex characters of the MD5 digest of everything
/// after the date, which spreads neighbouring tiles across key partitions.
/// An empty `path` drops the path segment entirely.
pub fn s3_tile_key(
    date_prefix: &str,
    path: &str,
    layer: &str,
    coord: TileCoord,
    extension: &str,
) -> String {
    let prefix = if path.is_empty() {
        String::new()
    } else {
        format!("/{}", path)
    };
    let to_hash = format!(
        "{}/{}/{}/{}/{}.{}",
        prefix,
        layer,
        coord.zoom(),
        coord.column(),
        coord.row(),
        extension
    );

    let digest = Md5::digest(to_hash.as_bytes());
    let mut hex = String::with_capacity(digest.len() * 2);
    for byte in digest.iter() {
        let _ = write!(hex, "{:02x}", byte);
    }

    format!("/{}/{}{}", date_prefix, &hex[..HASH_LEN], to_hash)
}

/// Tile store backed by an [`ObjectBucket`].
pub struct ObjectStore {
    bucket: Arc<dyn ObjectBucket>,
    date_prefix: String,
    path: String,
    reduced_redundancy: bool,
}

impl ObjectStore {
    pub fn new(
        bucket: Arc<dyn ObjectBucket>,
        date_prefix: impl Into<String>,
        path: impl Into<String>,
        reduced_redundancy: bool,
    ) -> Self {
        Self {
            bucket,
            date_prefix: date_prefix.into(),
            path: path.into(),
            reduced_redundancy,
        }
    }

    pub fn key(&self, coord: TileCoord, format: &dyn Format, layer: &str) -> String {
        s3_tile_key(&self.date_prefix, &self.path, layer, coord, format.extension())
    }

    fn put_options(&self, format: &dyn Format) -> PutOptions {
        PutOptions {
            content_type: format.mimetype().to_string(),
            acl: PUBLIC_READ_ACL.to_string(),
            storage_class: self
                .reduced_redundancy
                .then(|| REDUCED_REDUNDANCY_CLASS.to_string()),
        }
    }
}

impl TileStore for ObjectStore {
    fn write_tile(
        &self,
        data: &[u8],
        coord: TileCoord,
        format: &dyn Format,
        layer: &str,
    ) -> Result<(), StoreError> {
        let key = self.key(coord, format, layer);
        self.bucket.put_object(&key, data, &self.put_options(format))?;
        debug!(key = %key, bytes = data.len(), "Wrote tile object");
        Ok(())
    }

    fn read_tile(
        &self,
        coord: TileCoord,
        format: &dyn Format,
        layer: &str,
    ) -> Result<Option<Vec<u8>>, StoreError> {
        let key = self.key(coord, format, layer);
        Ok(self.bucket.get_object(&key)?)
    }

    fn delete_tiles(
        &self,
        coords: &[TileCoord],
        format: &dyn Format,
        layer: &str,
    ) -> Result<usize, StoreError> {
        let keys: Vec<String> = coords
            .iter()
            .map(|&coord| self.key(coord, format, layer))
            .collect();
        Ok(self.bucket.delete_objects(&keys)?)
    }
}
