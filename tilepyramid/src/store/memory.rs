//! Single-slot in-memory tile store.

use super::{StoreError, TileStore};
use crate::coord::TileCoord;
use crate::format::Format;
use std::sync::{Mutex, PoisonError};

#[derive(Debug, Clone)]
struct Slot {
    coord: TileCoord,
    extension: &'static str,
    layer: String,
    data: Vec<u8>,
}

impl Slot {
    fn matches(&self, coord: TileCoord, format: &dyn Format, layer: &str) -> bool {
        self.coord == coord && self.extension == format.extension() && self.layer == layer
    }
}

/// Keeps only the most recent write.
///
/// Reads of any other key report absence. Intended for tests; concurrent
/// writers simply overwrite each other.
#[derive(Debug, Default)]
pub struct MemoryStore {
    slot: Mutex<Option<Slot>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bytes of the most recent write, whatever its key.
    pub fn last_data(&self) -> Option<Vec<u8>> {
        self.lock().as_ref().map(|slot| slot.data.clone())
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Option<Slot>> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl TileStore for MemoryStore {
    fn write_tile(
        &self,
        data: &[u8],
        coord: TileCoord,
        format: &dyn Format,
        layer: &str,
    ) -> Result<(), StoreError> {
        *self.lock() = Some(Slot {
            coord,
            extension: format.extension(),
            layer: layer.to_string(),
            data: data.to_vec(),
        });
        Ok(())
    }

    fn read_tile(
        &self,
        coord: TileCoord,
        format: &dyn Format,
        layer: &str,
    ) -> Result<Option<Vec<u8>>, StoreError> {
        Ok(self
            .lock()
            .as_ref()
            .filter(|slot| slot.matches(coord, format, layer))
            .map(|slot| slot.data.clone()))
    }

    fn delete_tiles(
        &self,
        coords: &[TileCoord],
        format: &dyn Format,
        layer: &str,
    ) -> Result<usize, StoreError> {
        let mut slot = self.lock();
        let held = slot
            .as_ref()
            .is_some_and(|s| coords.iter().any(|&c| s.matches(c, format, layer)));
        if held {
            *slot = None;
            Ok(1)
        } else {
            Ok(0)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::{json_format, metatile_format};

    #[test]
    fn test_keeps_last_write_only() {
        let store = MemoryStore::new();
        let a = TileCoord::new(1, 0, 0).unwrap();
        let b = TileCoord::new(1, 1, 0).unwrap();

        store.write_tile(b"a", a, json_format(), "all").unwrap();
        store.write_tile(b"b", b, json_format(), "all").unwrap();

        assert_eq!(store.read_tile(a, json_format(), "all").unwrap(), None);
        assert_eq!(store.read_tile(b, json_format(), "all").unwrap(), Some(b"b".to_vec()));
        assert_eq!(store.read_tile(b, metatile_format(), "all").unwrap(), None);
        assert_eq!(store.last_data(), Some(b"b".to_vec()));
    }

    #[test]
    fn test_delete_held_key() {
        let store = MemoryStore::new();
        let c = TileCoord::ROOT;
        store.write_tile(b"x", c, json_format(), "all").unwrap();

        assert_eq!(store.delete_tiles(&[c], json_format(), "roads").unwrap(), 0);
        assert_eq!(store.delete_tiles(&[c, c], json_format(), "all").unwrap(), 1);
        assert_eq!(store.read_tile(c, json_format(), "all").unwrap(), None);
        assert_eq!(store.delete_tiles(&[c], json_format(), "all").unwrap(), 0);
    }
}
