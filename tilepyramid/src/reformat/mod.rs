//! Derive served tiles from a stored tile of record.
//!
//! A tile of record is the JSON object written by [`JsonFormat`]: layer name
//! to `{"features": [{"geometry": ..., "properties": ...}]}` in geographic
//! coordinates. Reformatting decodes the requested layers back into planar
//! feature layers, runs them through a [`ShapeTransform`] and encodes them
//! with the requested output format.
//!
//! [`JsonFormat`]: crate::format::JsonFormat

mod transform;

pub use transform::{
    clip_geometry, geometry_kind, simplify_geometry, BufferConfig, ClipSimplifyTransform,
    FormatBuffer, ShapeTransform, TransformContext,
};

use crate::coord::TileCoord;
use crate::format::{Format, FormatError};
use crate::layers::{Feature, FeatureLayer, LayerDatum, LayerSet, Properties};
use crate::projection::{
    coord_to_geographic_bounds, coord_to_planar_bounds, geographic_to_planar, meters_per_pixel,
};
use geo::MapCoords;
use geo_types::{Coord, Geometry};
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

/// Output coordinate units per tile edge.
pub const TILE_SCALE: u32 = 4096;

/// Errors raised while reformatting a tile of record.
#[derive(Debug, Error)]
pub enum ReformatError {
    /// Record is not valid JSON
    #[error("Malformed tile record: {0}")]
    Json(#[from] serde_json::Error),

    /// Record is JSON but not laid out as a tile of record
    #[error("Unexpected tile record layout: {0}")]
    Layout(String),

    /// Embedded geometry is not valid GeoJSON
    #[error("Malformed geometry in layer '{layer}': {source}")]
    Geometry {
        layer: String,
        #[source]
        source: geojson::Error,
    },

    /// Output encoding failed
    #[error(transparent)]
    Format(#[from] FormatError),
}

/// Render a property value as text, or `None` for null.
///
/// Strings pass through, scalars use their JSON spelling and nested values
/// are kept as JSON text.
pub fn normalize_property(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::Array(_) | Value::Object(_) => Some(value.to_string()),
    }
}

fn decode_feature(layer: &str, value: &Value) -> Result<Option<Feature>, ReformatError> {
    let geometry = match value.get("geometry") {
        None | Some(Value::Null) => return Ok(None),
        Some(geometry) => geometry,
    };

    let geometry = geojson::Geometry::from_json_value(geometry.clone())
        .and_then(|g| Geometry::<f64>::try_from(g.value))
        .map_err(|source| ReformatError::Geometry {
            layer: layer.to_string(),
            source,
        })?;

    let geometry = geometry.map_coords(|c| {
        let (x, y) = geographic_to_planar(c.x, c.y);
        Coord { x, y }
    });

    let properties: Properties = match value.get("properties") {
        Some(Value::Object(map)) => map
            .iter()
            .filter_map(|(k, v)| normalize_property(v).map(|v| (k.clone(), v)))
            .collect(),
        None | Some(Value::Null) => Properties::new(),
        Some(_) => {
            return Err(ReformatError::Layout(format!(
                "properties of a feature in layer '{}' is not an object",
                layer
            )))
        }
    };

    Ok(Some(Feature {
        geometry,
        properties,
        id: None,
    }))
}

/// Decode the requested layers of a tile of record into planar layers.
///
/// Layers are returned in name order and marked already clipped. Requested
/// names missing from the record are skipped. A present layer must be an
/// object with a `features` array, and feature properties must be an object
/// or null.
pub fn decode_json_tile_for_layers(
    record: &[u8],
    layers: &LayerSet,
) -> Result<Vec<FeatureLayer>, ReformatError> {
    let record: Value = serde_json::from_slice(record)?;
    let record = record
        .as_object()
        .ok_or_else(|| ReformatError::Layout("record is not an object".to_string()))?;

    let mut decoded = Vec::with_capacity(layers.len());
    for name in layers {
        let Some(layer) = record.get(name) else {
            debug!(layer = %name, "Requested layer absent from record");
            continue;
        };
        let Some(layer) = layer.as_object() else {
            return Err(ReformatError::Layout(format!(
                "layer '{}' is not an object",
                name
            )));
        };
        let features = match layer.get("features") {
            Some(Value::Array(features)) => features,
            None => {
                return Err(ReformatError::Layout(format!(
                    "layer '{}' has no features",
                    name
                )))
            }
            Some(_) => {
                return Err(ReformatError::Layout(format!(
                    "features of layer '{}' is not an array",
                    name
                )))
            }
        };

        let mut layer = FeatureLayer {
            name: name.clone(),
            features: Vec::with_capacity(features.len()),
            datum: LayerDatum {
                already_clipped: true,
            },
        };
        for feature in features {
            if let Some(feature) = decode_feature(name, feature)? {
                layer.features.push(feature);
            }
        }
        decoded.push(layer);
    }
    Ok(decoded)
}

/// Reformat a tile of record with the default clip/simplify transform.
pub fn reformat_selected_layers(
    record: &[u8],
    layers: &LayerSet,
    coord: TileCoord,
    format: &dyn Format,
    buffer_config: &BufferConfig,
) -> Result<Vec<u8>, ReformatError> {
    reformat_with_transform(
        record,
        layers,
        coord,
        format,
        buffer_config,
        &ClipSimplifyTransform::default(),
    )
}

/// Reformat a tile of record, shaping layers with `transform`.
pub fn reformat_with_transform(
    record: &[u8],
    layers: &LayerSet,
    coord: TileCoord,
    format: &dyn Format,
    buffer_config: &BufferConfig,
    transform: &dyn ShapeTransform,
) -> Result<Vec<u8>, ReformatError> {
    let decoded = decode_json_tile_for_layers(record, layers)?;

    let planar_bounds = coord_to_planar_bounds(&coord);
    let geographic_bounds = coord_to_geographic_bounds(&coord);
    let context = TransformContext {
        coord,
        planar_bounds,
        meters_per_pixel: meters_per_pixel(coord.zoom()),
        scale: TILE_SCALE,
        format,
        buffer_config,
    };
    let shaped = transform.transform(decoded, &context);

    let mut out = Vec::new();
    format.encode(
        &mut out,
        &shaped,
        coord.zoom(),
        &planar_bounds,
        &geographic_bounds,
    )?;

    debug!(
        %coord,
        format = format.name(),
        layers = shaped.len(),
        bytes = out.len(),
        "Reformatted tile"
    );
    Ok(out)
}
