//! Writes that skip unchanged tiles.

use super::{StoreError, TileStore};
use crate::coord::TileCoord;
use crate::format::Format;
use tracing::debug;

/// Whether two payloads of `format` represent the same tile.
pub fn tiles_are_equal(a: &[u8], b: &[u8], format: &dyn Format) -> bool {
    format.tiles_equal(a, b)
}

/// Write `data` only if it differs from the stored artifact.
///
/// A missing or empty artifact is always replaced. Returns `true` when a write
/// happened. The read and the write are separate operations, so two
/// concurrent callers may both write.
pub fn write_tile_if_changed(
    store: &dyn TileStore,
    data: &[u8],
    coord: TileCoord,
    format: &dyn Format,
    layer: &str,
) -> Result<bool, StoreError> {
    let existing = store.read_tile(coord, format, layer)?;
    if let Some(existing) = existing.filter(|e| !e.is_empty()) {
        if tiles_are_equal(&existing, data, format) {
            debug!(%coord, layer, format = format.name(), "Tile unchanged");
            return Ok(false);
        }
    }

    store.write_tile(data, coord, format, layer)?;
    Ok(true)
}
