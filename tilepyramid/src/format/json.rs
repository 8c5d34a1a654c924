//! GeoJSON tile-of-record encoder.

use super::{Format, FormatError};
use crate::layers::FeatureLayer;
use crate::projection::{planar_to_geographic, Bounds};
use geo::MapCoords;
use geo_types::Coord;
use serde_json::{json, Map, Value};
use std::io::Write;

/// Encodes every layer as a GeoJSON feature collection keyed by layer name.
///
/// Output geometry is geographic, so a payload written by this format can be
/// read back as a tile of record.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonFormat;

impl JsonFormat {
    fn feature_collection(layer: &FeatureLayer) -> Value {
        let features: Vec<Value> = layer
            .features
            .iter()
            .map(|feature| {
                let lnglat = feature.geometry.map_coords(|c| {
                    let (x, y) = planar_to_geographic(c.x, c.y);
                    Coord { x, y }
                });
                let geometry = geojson::Geometry::new(geojson::Value::from(&lnglat));
                let properties: Map<String, Value> = feature
                    .properties
                    .iter()
                    .map(|(k, v)| (k.clone(), Value::String(v.clone())))
                    .collect();
                let mut value = json!({
                    "type": "Feature",
                    "geometry": geometry,
                    "properties": properties,
                });
                if let Some(id) = feature.id {
                    value["id"] = json!(id);
                }
                value
            })
            .collect();

        json!({
            "type": "FeatureCollection",
            "features": features,
        })
    }
}

impl Format for JsonFormat {
    fn name(&self) -> &'static str {
        "json"
    }

    fn extension(&self) -> &'static str {
        "json"
    }

    fn mimetype(&self) -> &'static str {
        "application/json"
    }

    fn encode(
        &self,
        sink: &mut dyn Write,
        layers: &[FeatureLayer],
        _zoom: u8,
        _planar_bounds: &Bounds,
        _geographic_bounds: &Bounds,
    ) -> Result<(), FormatError> {
        let record: Map<String, Value> = layers
            .iter()
            .map(|layer| (layer.name.clone(), Self::feature_collection(layer)))
            .collect();
        serde_json::to_writer(&mut *sink, &record)?;
        Ok(())
    }
}
