//! Tests for coordinate navigation and enumeration

use super::*;
use std::collections::{BTreeMap, HashSet};

fn coord(zoom: u8, column: u32, row: u32) -> TileCoord {
    TileCoord::new(zoom, column, row).unwrap()
}

#[test]
fn test_new_rejects_column_out_of_range() {
    let result = TileCoord::new(1, 2, 0);
    assert_eq!(
        result,
        Err(CoordError::OutOfRange {
            zoom: 1,
            column: 2,
            row: 0
        })
    );
}

#[test]
fn test_new_rejects_row_out_of_range() {
    assert!(TileCoord::new(0, 0, 1).is_err());
    assert!(TileCoord::new(10, 1023, 1024).is_err());
}

#[test]
fn test_new_rejects_zoom_above_max() {
    assert_eq!(TileCoord::new(30, 0, 0), Err(CoordError::InvalidZoom(30)));
}

#[test]
fn test_new_accepts_grid_corners() {
    assert!(TileCoord::new(10, 1023, 1023).is_ok());
    assert!(TileCoord::new(MAX_ZOOM, 0, (1 << MAX_ZOOM) - 1).is_ok());
}

#[test]
fn test_children_of_root_in_fixed_order() {
    let children = TileCoord::ROOT.children();
    assert_eq!(
        children,
        [coord(1, 0, 0), coord(1, 1, 0), coord(1, 0, 1), coord(1, 1, 1)]
    );
}

#[test]
fn test_children_of_inner_tile() {
    let children = coord(3, 4, 2).children();
    assert_eq!(
        children,
        [coord(4, 8, 4), coord(4, 9, 4), coord(4, 8, 5), coord(4, 9, 5)]
    );
}

#[test]
fn test_parent() {
    assert_eq!(coord(5, 21, 11).parent(), Some(coord(4, 10, 5)));
    assert_eq!(TileCoord::ROOT.parent(), None);
}

#[test]
fn test_zoom_to_ancestor() {
    let tile = coord(14, 4824, 6160);
    assert_eq!(tile.zoom_to(14).unwrap(), tile);
    assert_eq!(tile.zoom_to(10).unwrap(), coord(10, 301, 385));
    assert_eq!(tile.zoom_to(0).unwrap(), TileCoord::ROOT);
}

#[test]
fn test_zoom_to_deeper_is_error() {
    let result = coord(3, 1, 1).zoom_to(4);
    assert!(matches!(result, Err(CoordError::NotAnAncestor { .. })));
}

#[test]
fn test_children_range_two_levels() {
    let origin = coord(3, 4, 2);
    let actual: Vec<_> = origin.children_range(4).collect();
    assert_eq!(actual.len(), 4);

    let actual: Vec<_> = origin.children_range(5).collect();
    assert_eq!(actual.len(), 20);

    let mut expected: Vec<TileCoord> = origin.children().to_vec();
    for child in origin.children() {
        expected.extend(child.children());
    }

    let actual: HashSet<_> = actual.into_iter().collect();
    let expected: HashSet<_> = expected.into_iter().collect();
    assert_eq!(actual, expected);
}

#[test]
fn test_children_range_levels_are_ordered() {
    let zooms: Vec<u8> = coord(2, 1, 3).children_range(5).map(|c| c.zoom()).collect();
    let mut sorted = zooms.clone();
    sorted.sort();
    assert_eq!(zooms, sorted);
}

#[test]
fn test_children_range_below_own_zoom_is_empty() {
    assert_eq!(coord(4, 0, 0).children_range(4).count(), 0);
    assert_eq!(coord(4, 0, 0).children_range(2).count(), 0);
}

#[test]
fn test_children_range_at_max_zoom_is_empty() {
    assert_eq!(coord(MAX_ZOOM, 0, 0).children_range(MAX_ZOOM).count(), 0);
}

#[test]
fn test_seed_tiles_zoom_0() {
    let tiles: Vec<_> = seed_tiles(0).collect();
    assert_eq!(tiles, vec![TileCoord::ROOT]);
}

#[test]
fn test_seed_tiles_zoom_1() {
    let mut tiles: Vec<_> = seed_tiles(1).collect();
    tiles.sort();
    let mut expected = vec![
        coord(0, 0, 0),
        coord(1, 0, 0),
        coord(1, 1, 0),
        coord(1, 0, 1),
        coord(1, 1, 1),
    ];
    expected.sort();
    assert_eq!(tiles, expected);
}

#[test]
fn test_seed_tiles_counts_per_zoom() {
    let zoom_until = 5u8;
    let tiles: Vec<_> = seed_tiles(zoom_until).collect();
    assert_eq!(tiles.len() as u64, (4u64.pow(u32::from(zoom_until) + 1) - 1) / 3);

    let mut per_zoom: BTreeMap<u8, u64> = BTreeMap::new();
    for tile in &tiles {
        *per_zoom.entry(tile.zoom()).or_default() += 1;
    }
    for zoom in 0..=zoom_until {
        assert_eq!(per_zoom[&zoom], 4u64.pow(u32::from(zoom)), "zoom {}", zoom);
    }
}

#[test]
fn test_seed_tiles_are_unique() {
    let tiles: Vec<_> = seed_tiles(4).collect();
    let unique: HashSet<_> = tiles.iter().copied().collect();
    assert_eq!(unique.len(), tiles.len());
}

#[test]
fn test_seed_tiles_size_hint_is_exact() {
    let mut iter = seed_tiles(3);
    assert_eq!(iter.size_hint(), (85, Some(85)));
    iter.next();
    iter.next();
    assert_eq!(iter.size_hint(), (83, Some(83)));
}

#[test]
fn test_seed_tiles_range_skips_low_zooms() {
    let tiles: Vec<_> = seed_tiles_range(2, 3).collect();
    assert_eq!(tiles.len(), 16 + 64);
    assert!(tiles.iter().all(|t| t.zoom() >= 2));
}

#[test]
fn test_display_and_parse_roundtrip() {
    let tile = coord(14, 4824, 6160);
    assert_eq!(tile.to_string(), "14/4824/6160");
    assert_eq!("14/4824/6160".parse::<TileCoord>().unwrap(), tile);
}

#[test]
fn test_parse_rejects_malformed_paths() {
    for input in ["", "1/2", "1/2/3/4", "a/0/0", "1/-1/0"] {
        assert!(
            matches!(input.parse::<TileCoord>(), Err(CoordError::InvalidPath(_))),
            "expected InvalidPath for {:?}",
            input
        );
    }
}

#[test]
fn test_parse_rejects_out_of_range() {
    assert!(matches!(
        "1/2/0".parse::<TileCoord>(),
        Err(CoordError::OutOfRange { .. })
    ));
}

#[test]
fn test_ordering_is_zoom_major() {
    let mut tiles = vec![coord(2, 0, 0), coord(1, 1, 1), coord(1, 0, 1)];
    tiles.sort();
    assert_eq!(tiles, vec![coord(1, 0, 1), coord(1, 1, 1), coord(2, 0, 0)]);
}
