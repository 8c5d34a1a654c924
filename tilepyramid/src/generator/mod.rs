//! Tile enumeration for geographic regions.
//!
//! Given one or more bounding boxes in longitude/latitude and a zoom range,
//! yields every tile whose planar bounds intersect a box by descending the
//! quadtree: a tile is yielded when it intersects, and its four children are
//! only examined when it does.
//!
//! Boxes are processed one after the other. A tile covered by two boxes is
//! yielded once per box; callers that need a set must deduplicate.
//!
//! # Example
//!
//! ```
//! use tilepyramid::generator::tiles_for_bounds;
//! use tilepyramid::projection::Bounds;
//!
//! let left_half = Bounds::new(-180.0, 0.1, -0.1, 85.0);
//! let tiles: Vec<_> = tiles_for_bounds(&[left_half], 1, 2).collect();
//! assert_eq!(tiles.len(), 5);
//! ```

use crate::coord::{tiles_per_side, TileCoord, MAX_ZOOM};
use crate::projection::{coord_to_planar_bounds, Bounds, HALF_CIRCUMFERENCE};
use tracing::trace;

/// A reusable description of the regions and zooms to enumerate.
///
/// Call [`TileRegions::iter`] as often as needed; each call starts over.
#[derive(Debug, Clone)]
pub struct TileRegions {
    regions: Vec<Bounds>,
    min_zoom: u8,
    max_zoom: u8,
}

impl TileRegions {
    /// Build from geographic bounds. Zooms above `MAX_ZOOM` are capped.
    pub fn new(geographic: &[Bounds], min_zoom: u8, max_zoom: u8) -> Self {
        let regions = geographic
            .iter()
            .map(|b| b.to_planar().clamp_to_world())
            .collect();
        Self {
            regions,
            min_zoom: min_zoom.min(MAX_ZOOM),
            max_zoom: max_zoom.min(MAX_ZOOM),
        }
    }

    /// Planar regions, clamped to the world extent.
    pub fn planar_regions(&self) -> &[Bounds] {
        &self.regions
    }

    /// Start a fresh enumeration.
    pub fn iter(&self) -> TileGenerator {
        TileGenerator {
            regions: self.regions.clone(),
            min_zoom: self.min_zoom,
            max_zoom: self.max_zoom,
            next_region: 0,
            current: None,
            seeds: None,
            stack: Vec::new(),
        }
    }
}

impl<'a> IntoIterator for &'a TileRegions {
    type Item = TileCoord;
    type IntoIter = TileGenerator;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Enumerate tiles for several geographic bounding boxes.
pub fn tiles_for_bounds(geographic: &[Bounds], min_zoom: u8, max_zoom: u8) -> TileGenerator {
    TileRegions::new(geographic, min_zoom, max_zoom).iter()
}

/// Enumerate tiles for a single geographic bounding box.
pub fn tiles_for_single_bounds(geographic: Bounds, min_zoom: u8, max_zoom: u8) -> TileGenerator {
    tiles_for_bounds(&[geographic], min_zoom, max_zoom)
}

/// Lazy, depth-first quadtree walk over each region in turn.
#[derive(Debug, Clone)]
pub struct TileGenerator {
    regions: Vec<Bounds>,
    min_zoom: u8,
    max_zoom: u8,
    next_region: usize,
    current: Option<Bounds>,
    seeds: Option<SeedRange>,
    stack: Vec<TileCoord>,
}

impl TileGenerator {
    fn start_next_region(&mut self) -> bool {
        if self.min_zoom > self.max_zoom {
            return false;
        }
        let Some(region) = self.regions.get(self.next_region).copied() else {
            return false;
        };
        trace!(
            region = self.next_region,
            min_zoom = self.min_zoom,
            max_zoom = self.max_zoom,
            "enumerating tiles for region"
        );
        self.next_region += 1;
        self.current = Some(region);
        self.seeds = Some(SeedRange::covering(&region, self.min_zoom));
        true
    }
}

impl Iterator for TileGenerator {
    type Item = TileCoord;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(tile) = self.stack.pop() {
                let Some(region) = self.current else {
                    continue;
                };
                if !coord_to_planar_bounds(&tile).intersects(&region) {
                    continue;
                }
                if tile.zoom() < self.max_zoom {
                    // Reversed so children pop in their canonical order.
                    self.stack.extend(tile.children().into_iter().rev());
                }
                return Some(tile);
            }

            if let Some(seed) = self.seeds.as_mut().and_then(Iterator::next) {
                self.stack.push(seed);
                continue;
            }

            if !self.start_next_region() {
                return None;
            }
        }
    }
}

/// Row-major walk over the tiles at one zoom that could touch a region.
///
/// The range is a superset, widened by one tile on every side so values on a
/// tile edge always reach the tile that owns them. Exact intersection is
/// tested per tile.
#[derive(Debug, Clone)]
struct SeedRange {
    zoom: u8,
    col_start: u32,
    col_end: u32,
    row_end: u32,
    next_col: u32,
    next_row: u32,
}

impl SeedRange {
    fn covering(region: &Bounds, zoom: u8) -> Self {
        let dim = tiles_per_side(zoom);
        let size = 2.0 * HALF_CIRCUMFERENCE / dim as f64;
        let last = (dim - 1) as u32;
        let index = |offset: f64| (offset / size).floor().clamp(0.0, last as f64) as u32;

        let col_start = index(region.min_x + HALF_CIRCUMFERENCE).saturating_sub(1);
        let col_end = (index(region.max_x + HALF_CIRCUMFERENCE) + 1).min(last);
        let row_start = index(HALF_CIRCUMFERENCE - region.max_y).saturating_sub(1);
        let row_end = (index(HALF_CIRCUMFERENCE - region.min_y) + 1).min(last);

        Self {
            zoom,
            col_start,
            col_end,
            row_end,
            next_col: col_start,
            next_row: row_start,
        }
    }
}

impl Iterator for SeedRange {
    type Item = TileCoord;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next_row > self.row_end {
            return None;
        }
        let tile = TileCoord::new_unchecked(self.zoom, self.next_col, self.next_row);
        if self.next_col == self.col_end {
            self.next_col = self.col_start;
            self.next_row += 1;
        } else {
            self.next_col += 1;
        }
        Some(tile)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::projection::coord_to_geographic_bounds;
    use std::collections::HashSet;

    fn count_at(tiles: &[TileCoord], zoom: u8) -> usize {
        tiles.iter().filter(|t| t.zoom() == zoom).count()
    }

    const NORTH_WEST: Bounds = Bounds::new(-180.0, 0.1, -0.1, 85.0);
    const SOUTH_EAST: Bounds = Bounds::new(0.1, -85.0, 180.0, -0.1);

    #[test]
    fn test_tile_bounds_yield_only_that_tile() {
        let coord = TileCoord::new(1, 1, 1).unwrap();
        let bounds = coord_to_geographic_bounds(&coord);
        let tiles: Vec<_> = tiles_for_single_bounds(bounds, 1, 1).collect();
        assert_eq!(tiles, vec![coord]);
    }

    #[test]
    fn test_first_quadrant_two_zooms() {
        let tiles: Vec<_> = tiles_for_single_bounds(NORTH_WEST, 1, 2).collect();
        assert_eq!(tiles.len(), 5);
        assert_eq!(count_at(&tiles, 1), 1);
        assert_eq!(count_at(&tiles, 2), 4);
    }

    #[test]
    fn test_last_quadrant_two_zooms() {
        let tiles: Vec<_> = tiles_for_single_bounds(SOUTH_EAST, 1, 2).collect();
        assert_eq!(tiles.len(), 5);
        assert_eq!(count_at(&tiles, 1), 1);
        assert_eq!(count_at(&tiles, 2), 4);
        assert!(tiles.contains(&TileCoord::new(1, 1, 1).unwrap()));
    }

    #[test]
    fn test_two_bounds_are_not_deduplicated() {
        let tiles: Vec<_> = tiles_for_bounds(&[NORTH_WEST, SOUTH_EAST], 1, 2).collect();
        assert_eq!(tiles.len(), 10);
        assert_eq!(count_at(&tiles, 1), 2);
        assert_eq!(count_at(&tiles, 2), 8);
    }

    #[test]
    fn test_overlapping_bounds_yield_duplicates() {
        let tiles: Vec<_> = tiles_for_bounds(&[NORTH_WEST, NORTH_WEST], 1, 1).collect();
        assert_eq!(tiles.len(), 2);
        assert_eq!(tiles[0], tiles[1]);
    }

    #[test]
    fn test_low_zooms_from_root() {
        let bounds = Bounds::new(-1.115, 50.941, 0.895, 51.984);
        let tiles: Vec<_> = tiles_for_single_bounds(bounds, 0, 5).collect();
        assert_eq!(tiles.len(), 11);
        assert_eq!(tiles[0], TileCoord::ROOT);
        assert!(tiles.contains(&TileCoord::new(5, 15, 10).unwrap()));
        assert!(tiles.contains(&TileCoord::new(5, 16, 10).unwrap()));
    }

    #[test]
    fn test_degenerate_bounds_yield_containing_tile() {
        let point = Bounds::new(-74.0, 40.7, -74.0, 40.7);
        let tiles: Vec<_> = tiles_for_single_bounds(point, 3, 3).collect();
        assert_eq!(tiles, vec![TileCoord::new(3, 2, 3).unwrap()]);
    }

    #[test]
    fn test_origin_point_belongs_to_one_tile_per_zoom() {
        let origin = Bounds::new(0.0, 0.0, 0.0, 0.0);
        let tiles: Vec<_> = tiles_for_single_bounds(origin, 0, 2).collect();
        assert_eq!(
            tiles,
            vec![
                TileCoord::ROOT,
                TileCoord::new(1, 1, 0).unwrap(),
                TileCoord::new(2, 2, 1).unwrap(),
            ]
        );
    }

    #[test]
    fn test_point_on_tile_edge_above_root_zoom() {
        let on_equator = Bounds::new(10.0, 0.0, 10.0, 0.0);
        let from_root: Vec<_> = tiles_for_single_bounds(on_equator, 0, 1).collect();
        let from_one: Vec<_> = tiles_for_single_bounds(on_equator, 1, 1).collect();
        assert_eq!(from_one, vec![TileCoord::new(1, 1, 0).unwrap()]);
        assert_eq!(from_root[1..], from_one[..]);
    }

    #[test]
    fn test_line_on_tile_edge_above_root_zoom() {
        let equator = Bounds::new(-10.0, 0.0, 10.0, 0.0);
        let tiles: Vec<_> = tiles_for_single_bounds(equator, 1, 1).collect();
        assert_eq!(
            tiles,
            vec![TileCoord::new(1, 0, 0).unwrap(), TileCoord::new(1, 1, 0).unwrap()]
        );

        let meridian = Bounds::new(0.0, 10.0, 0.0, 20.0);
        let tiles: Vec<_> = tiles_for_single_bounds(meridian, 2, 2).collect();
        assert_eq!(tiles, vec![TileCoord::new(2, 2, 1).unwrap()]);
    }

    #[test]
    fn test_tile_corners_always_yield_a_tile() {
        for zoom in 1..=12u8 {
            let dim = tiles_per_side(zoom) as u32;
            for (x, y) in [(0, 0), (dim / 2, dim / 2), (dim - 1, dim - 1), (dim / 3, dim / 5)] {
                let coord = TileCoord::new(zoom, x, y).unwrap();
                let geographic = coord_to_geographic_bounds(&coord);
                let corner = Bounds::new(
                    geographic.min_x,
                    geographic.min_y,
                    geographic.min_x,
                    geographic.min_y,
                );
                let tiles: Vec<_> = tiles_for_single_bounds(corner, zoom, zoom).collect();
                assert_eq!(tiles.len(), 1, "corner of {} yielded {:?}", coord, tiles);
            }
        }
    }

    #[test]
    fn test_world_corners_are_covered() {
        let north_east = Bounds::new(180.0, 85.051_128_779_806_6, 180.0, 85.051_128_779_806_6);
        let tiles: Vec<_> = tiles_for_single_bounds(north_east, 1, 1).collect();
        assert_eq!(tiles, vec![TileCoord::new(1, 1, 0).unwrap()]);

        let south_west = Bounds::new(-180.0, -85.051_128_779_806_6, -180.0, -85.051_128_779_806_6);
        let tiles: Vec<_> = tiles_for_single_bounds(south_west, 1, 1).collect();
        assert_eq!(tiles, vec![TileCoord::new(1, 0, 1).unwrap()]);
    }

    #[test]
    fn test_whole_world_matches_seed_count() {
        let world = Bounds::new(-180.0, -85.051_128_779_806_6, 180.0, 85.051_128_779_806_6);
        let tiles: Vec<_> = tiles_for_single_bounds(world, 0, 3).collect();
        assert_eq!(tiles.len(), 1 + 4 + 16 + 64);
        let unique: HashSet<_> = tiles.iter().collect();
        assert_eq!(unique.len(), tiles.len());
    }

    #[test]
    fn test_starting_above_zero() {
        let world = Bounds::new(-180.0, -85.0, 180.0, 85.0);
        let tiles: Vec<_> = tiles_for_single_bounds(world, 2, 2).collect();
        assert_eq!(tiles.len(), 16);
    }

    #[test]
    fn test_zoom_range_inverted_is_empty() {
        assert_eq!(tiles_for_single_bounds(NORTH_WEST, 3, 2).count(), 0);
    }

    #[test]
    fn test_regions_are_restartable() {
        let regions = TileRegions::new(&[NORTH_WEST, SOUTH_EAST], 1, 3);
        let first: Vec<_> = regions.iter().collect();
        let second: Vec<_> = (&regions).into_iter().collect();
        assert_eq!(first, second);
        assert!(!first.is_empty());
    }

    #[test]
    fn test_every_yielded_tile_intersects() {
        let bounds = Bounds::new(-10.0, 35.0, 30.0, 60.0);
        let regions = TileRegions::new(&[bounds], 2, 6);
        let planar = regions.planar_regions()[0];
        for tile in &regions {
            assert!(coord_to_planar_bounds(&tile).intersects(&planar));
            assert!((2..=6).contains(&tile.zoom()));
        }
    }
}
