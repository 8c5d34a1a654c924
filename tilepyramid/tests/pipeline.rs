//! Full data flow: enumerate tiles, store tiles of record, rewrite only on
//! change, then derive narrower served tiles.

use std::sync::Arc;

use geo_types::{Geometry, Point};
use tempfile::TempDir;
use tilepyramid::coord::TileCoord;
use tilepyramid::format::{json_format, metatile::read_metatile, metatile_format, Format};
use tilepyramid::generator::tiles_for_bounds;
use tilepyramid::layers::{parse_layer_spec, Feature, FeatureLayer, LayerConfig, Properties};
use tilepyramid::projection::{
    coord_to_geographic_bounds, coord_to_planar_bounds, geographic_to_planar, Bounds,
};
use tilepyramid::reformat::{reformat_selected_layers, BufferConfig};
use tilepyramid::store::{
    write_tile_if_changed, FileStore, MemoryBucket, ObjectStore, TileStore,
};

/// One feature per layer at the centre of the tile.
fn tile_of_record(coord: TileCoord, names: &[&str]) -> Vec<u8> {
    let geographic = coord_to_geographic_bounds(&coord);
    let (lon, lat) = (
        (geographic.min_x + geographic.max_x) / 2.0,
        (geographic.min_y + geographic.max_y) / 2.0,
    );
    let (x, y) = geographic_to_planar(lon, lat);

    let layers: Vec<FeatureLayer> = names
        .iter()
        .map(|name| {
            let mut properties = Properties::new();
            properties.insert("tile".to_string(), coord.to_string());
            let mut layer = FeatureLayer::new(*name);
            layer.features.push(Feature {
                geometry: Geometry::Point(Point::new(x, y)),
                properties,
                id: None,
            });
            layer
        })
        .collect();

    let mut out = Vec::new();
    json_format()
        .encode(
            &mut out,
            &layers,
            coord.zoom(),
            &coord_to_planar_bounds(&coord),
            &geographic,
        )
        .unwrap();
    out
}

#[test]
fn test_enumerate_store_and_reformat() {
    let temp = TempDir::new().unwrap();
    let records = FileStore::new(temp.path().join("records")).unwrap();
    let layer_config = LayerConfig::new(["roads", "water"]);

    // Upper-left quarter of the world at zooms 1 and 2
    let region = Bounds::new(-180.0, 0.1, -0.1, 85.0);
    let coords: Vec<TileCoord> = tiles_for_bounds(&[region], 1, 2).collect();
    assert_eq!(coords.len(), 5);

    for &coord in &coords {
        let record = tile_of_record(coord, &["water", "roads"]);
        assert!(write_tile_if_changed(&records, &record, coord, json_format(), "all").unwrap());
    }

    // The same content again changes nothing
    for &coord in &coords {
        let record = tile_of_record(coord, &["water", "roads"]);
        assert!(!write_tile_if_changed(&records, &record, coord, json_format(), "all").unwrap());
    }

    let bucket = Arc::new(MemoryBucket::new());
    let served = ObjectStore::new(bucket.clone(), "20240101", "osm", false);
    let roads = parse_layer_spec("roads", &layer_config).unwrap();

    for &coord in &coords {
        let record = records.read_tile(coord, json_format(), "all").unwrap().unwrap();
        let metatile =
            reformat_selected_layers(&record, &roads, coord, metatile_format(), &BufferConfig::new())
                .unwrap();
        assert!(write_tile_if_changed(&served, &metatile, coord, metatile_format(), "roads").unwrap());

        let entries = read_metatile(&metatile).unwrap();
        let inner: serde_json::Value = serde_json::from_slice(&entries["0/0/0.json"]).unwrap();
        assert!(inner.get("water").is_none());
        assert_eq!(
            inner["roads"]["features"][0]["properties"]["tile"],
            coord.to_string()
        );
    }
    assert_eq!(bucket.len(), coords.len());

    // Regenerated metatiles compare by content, so nothing is rewritten
    for &coord in &coords {
        let record = records.read_tile(coord, json_format(), "all").unwrap().unwrap();
        let metatile =
            reformat_selected_layers(&record, &roads, coord, metatile_format(), &BufferConfig::new())
                .unwrap();
        assert!(!write_tile_if_changed(&served, &metatile, coord, metatile_format(), "roads").unwrap());
    }

    assert_eq!(records.delete_tiles(&coords, json_format(), "all").unwrap(), 5);
    assert_eq!(served.delete_tiles(&coords, metatile_format(), "roads").unwrap(), 5);
    assert!(bucket.is_empty());
}

#[test]
fn test_record_survives_reformat_to_json() {
    let coord = TileCoord::new(3, 2, 3).unwrap();
    let record = tile_of_record(coord, &["water"]);
    let all = parse_layer_spec("all", &LayerConfig::new(["water"])).unwrap();

    let out = reformat_selected_layers(&record, &all, coord, json_format(), &BufferConfig::new())
        .unwrap();
    let before: serde_json::Value = serde_json::from_slice(&record).unwrap();
    let after: serde_json::Value = serde_json::from_slice(&out).unwrap();

    let a = before["water"]["features"][0]["geometry"]["coordinates"].clone();
    let b = after["water"]["features"][0]["geometry"]["coordinates"].clone();
    for i in 0..2 {
        assert!((a[i].as_f64().unwrap() - b[i].as_f64().unwrap()).abs() < 1e-9);
    }
}
