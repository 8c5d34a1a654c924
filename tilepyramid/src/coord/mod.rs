//! Quadtree tile addressing.
//!
//! Provides the [`TileCoord`] value type, its packed integer encoding, and
//! lazy iterators over whole subtrees of the pyramid.

mod packed;
mod types;

pub use packed::{pack, packed_zoom, unpack, zoom_up, COORD_BITS, ZOOM_BITS};
pub use types::{tiles_per_side, CoordError, TileCoord, MAX_ZOOM};

/// Lazy iterator over a square block of descendants, one zoom level at a time.
///
/// At each level the block below `origin` is walked in row-major order, and
/// every tile of a level is yielded before any tile of the next level.
#[derive(Debug, Clone)]
pub struct PyramidIter {
    origin: TileCoord,
    zoom: u8,
    max_zoom: u8,
    index: u64,
}

impl PyramidIter {
    fn new(origin: TileCoord, start_zoom: u8, max_zoom: u8) -> Self {
        Self {
            origin,
            zoom: start_zoom,
            max_zoom: max_zoom.min(MAX_ZOOM),
            index: 0,
        }
    }

    fn remaining(&self) -> u64 {
        if self.zoom > self.max_zoom {
            return 0;
        }
        let mut total = 0u64;
        for zoom in self.zoom..=self.max_zoom {
            let depth = u32::from(zoom - self.origin.zoom());
            total = total.saturating_add(1u64 << (2 * depth).min(63));
        }
        total.saturating_sub(self.index)
    }
}

impl Iterator for PyramidIter {
    type Item = TileCoord;

    fn next(&mut self) -> Option<Self::Item> {
        if self.zoom > self.max_zoom {
            return None;
        }

        let depth = self.zoom - self.origin.zoom();
        let side = 1u64 << depth;
        let dx = (self.index % side) as u32;
        let dy = (self.index / side) as u32;
        let coord = TileCoord::new_unchecked(
            self.zoom,
            (self.origin.column() << depth) + dx,
            (self.origin.row() << depth) + dy,
        );

        self.index += 1;
        if self.index == side * side {
            self.index = 0;
            // Stops at max_zoom + 1, which is at most MAX_ZOOM + 1 and never overflows u8.
            self.zoom += 1;
        }

        Some(coord)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.remaining();
        match usize::try_from(remaining) {
            Ok(n) => (n, Some(n)),
            Err(_) => (usize::MAX, None),
        }
    }
}

impl TileCoord {
    /// All descendants from `zoom + 1` through `max_zoom` inclusive.
    ///
    /// Produces 4 + 16 + ... + 4^(max_zoom - zoom) tiles, each zoom level
    /// complete before the next begins.
    pub fn children_range(&self, max_zoom: u8) -> PyramidIter {
        PyramidIter::new(*self, self.zoom() + 1, max_zoom)
    }
}

/// Every tile from zoom 0 through `zoom_until` inclusive.
///
/// Zoom `z` contributes exactly `4^z` tiles, for `(4^(zoom_until+1) - 1) / 3`
/// in total.
pub fn seed_tiles(zoom_until: u8) -> PyramidIter {
    seed_tiles_range(0, zoom_until)
}

/// Every tile from `zoom_start` through `zoom_until` inclusive.
pub fn seed_tiles_range(zoom_start: u8, zoom_until: u8) -> PyramidIter {
    PyramidIter::new(TileCoord::ROOT, zoom_start, zoom_until)
}

#[cfg(test)]
mod tests;
