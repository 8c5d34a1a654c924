//! Shape transforms applied between decoding and encoding.

use crate::coord::TileCoord;
use crate::format::Format;
use crate::layers::FeatureLayer;
use crate::projection::Bounds;
use geo::{BooleanOps, BoundingRect, HasDimensions, Intersects, Simplify};
use geo_types::{
    coord, Geometry, GeometryCollection, LineString, MultiLineString, MultiPoint, MultiPolygon,
    Polygon, Rect,
};
use std::collections::HashMap;

/// Buffers for one output format, in pixels.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormatBuffer {
    /// Buffer by layer name; wins over the geometry buffer
    pub layer: HashMap<String, f64>,
    /// Buffer by geometry kind: `point`, `line` or `polygon`
    pub geometry: HashMap<String, f64>,
}

/// Per-format clipping buffers keyed by file extension.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BufferConfig {
    formats: HashMap<String, FormatBuffer>,
}

impl BufferConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_layer_buffer(&mut self, extension: &str, layer: &str, pixels: f64) {
        self.formats
            .entry(extension.to_string())
            .or_default()
            .layer
            .insert(layer.to_string(), pixels);
    }

    pub fn set_geometry_buffer(&mut self, extension: &str, geometry_kind: &str, pixels: f64) {
        self.formats
            .entry(extension.to_string())
            .or_default()
            .geometry
            .insert(geometry_kind.to_string(), pixels);
    }

    pub fn format(&self, extension: &str) -> Option<&FormatBuffer> {
        self.formats.get(extension)
    }

    pub fn is_empty(&self) -> bool {
        self.formats.is_empty()
    }

    /// Configured formats, sorted by extension.
    pub fn formats(&self) -> Vec<(&str, &FormatBuffer)> {
        let mut formats: Vec<_> = self
            .formats
            .iter()
            .map(|(ext, buffers)| (ext.as_str(), buffers))
            .collect();
        formats.sort_by(|a, b| a.0.cmp(b.0));
        formats
    }

    /// Buffer in pixels for a feature, 0 when nothing is configured.
    pub fn buffer_pixels(&self, extension: &str, layer: &str, geometry: &Geometry<f64>) -> f64 {
        let Some(buffers) = self.formats.get(extension) else {
            return 0.0;
        };
        if let Some(&pixels) = buffers.layer.get(layer) {
            return pixels;
        }
        geometry_kind(geometry)
            .and_then(|kind| buffers.geometry.get(kind).copied())
            .unwrap_or(0.0)
    }
}

/// Coarse kind used for buffer lookup.
pub fn geometry_kind(geometry: &Geometry<f64>) -> Option<&'static str> {
    match geometry {
        Geometry::Point(_) | Geometry::MultiPoint(_) => Some("point"),
        Geometry::Line(_) | Geometry::LineString(_) | Geometry::MultiLineString(_) => Some("line"),
        Geometry::Polygon(_)
        | Geometry::MultiPolygon(_)
        | Geometry::Rect(_)
        | Geometry::Triangle(_) => Some("polygon"),
        Geometry::GeometryCollection(_) => None,
    }
}

/// Everything a transform knows about the tile being produced.
#[derive(Clone, Copy)]
pub struct TransformContext<'a> {
    pub coord: TileCoord,
    pub planar_bounds: Bounds,
    pub meters_per_pixel: f64,
    /// Coordinate units per tile edge in the output
    pub scale: u32,
    pub format: &'a dyn Format,
    pub buffer_config: &'a BufferConfig,
}

/// Step that reshapes decoded layers before they are encoded.
pub trait ShapeTransform: Send + Sync {
    fn transform(&self, layers: Vec<FeatureLayer>, context: &TransformContext<'_>) -> Vec<FeatureLayer>;
}

/// Clips layers to the buffered tile and optionally simplifies them.
///
/// Layers flagged `already_clipped` keep their geometry; only simplification
/// applies to them. Features left empty are dropped. A nonzero tolerance is
/// never finer than one output coordinate unit at the context's `scale`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ClipSimplifyTransform {
    /// Simplification tolerance in pixels; 0 disables it.
    pub simplify_pixels: f64,
}

impl ClipSimplifyTransform {
    pub fn with_simplify(simplify_pixels: f64) -> Self {
        Self { simplify_pixels }
    }
}

impl ShapeTransform for ClipSimplifyTransform {
    fn transform(&self, layers: Vec<FeatureLayer>, context: &TransformContext<'_>) -> Vec<FeatureLayer> {
        let tolerance = simplify_tolerance(self.simplify_pixels, context);
        let extension = context.format.extension();

        layers
            .into_iter()
            .map(|mut layer| {
                let clip = !layer.datum.already_clipped;
                let name = layer.name.clone();
                layer.features = layer
                    .features
                    .into_iter()
                    .filter_map(|mut feature| {
                        if clip {
                            let pad = context.buffer_config.buffer_pixels(
                                extension,
                                &name,
                                &feature.geometry,
                            ) * context.meters_per_pixel;
                            let rect = to_rect(&context.planar_bounds.buffered(pad, pad));
                            feature.geometry = clip_geometry(&feature.geometry, &rect)?;
                        }
                        if tolerance > 0.0 {
                            feature.geometry = simplify_geometry(feature.geometry, tolerance);
                        }
                        (!feature.geometry.is_empty()).then_some(feature)
                    })
                    .collect();
                layer
            })
            .collect()
    }
}

fn simplify_tolerance(simplify_pixels: f64, context: &TransformContext<'_>) -> f64 {
    if simplify_pixels <= 0.0 {
        return 0.0;
    }
    let bounds = &context.planar_bounds;
    let unit = (bounds.max_x - bounds.min_x) / context.scale.max(1) as f64;
    (simplify_pixels * context.meters_per_pixel).max(unit)
}

fn to_rect(bounds: &Bounds) -> Rect<f64> {
    Rect::new(
        coord! { x: bounds.min_x, y: bounds.min_y },
        coord! { x: bounds.max_x, y: bounds.max_y },
    )
}

fn inside(rect: &Rect<f64>, geometry: &Geometry<f64>) -> bool {
    geometry.bounding_rect().is_some_and(|b| {
        b.min().x >= rect.min().x
            && b.min().y >= rect.min().y
            && b.max().x <= rect.max().x
            && b.max().y <= rect.max().y
    })
}

fn lines_result(lines: MultiLineString<f64>) -> Option<Geometry<f64>> {
    match lines.0.len() {
        0 => None,
        1 => lines.0.into_iter().next().map(Geometry::LineString),
        _ => Some(Geometry::MultiLineString(lines)),
    }
}

fn polygons_result(polygons: MultiPolygon<f64>) -> Option<Geometry<f64>> {
    match polygons.0.len() {
        0 => None,
        1 => polygons.0.into_iter().next().map(Geometry::Polygon),
        _ => Some(Geometry::MultiPolygon(polygons)),
    }
}

/// Clip `geometry` to `rect`, or `None` when nothing remains.
pub fn clip_geometry(geometry: &Geometry<f64>, rect: &Rect<f64>) -> Option<Geometry<f64>> {
    if inside(rect, geometry) {
        return Some(geometry.clone());
    }

    let window: Polygon<f64> = rect.to_polygon();
    match geometry {
        Geometry::Point(point) => rect.intersects(point).then(|| geometry.clone()),
        Geometry::MultiPoint(points) => {
            let kept: Vec<_> = points.iter().filter(|p| rect.intersects(*p)).copied().collect();
            (!kept.is_empty()).then(|| Geometry::MultiPoint(MultiPoint::new(kept)))
        }
        Geometry::Line(line) => {
            let lines = MultiLineString::new(vec![LineString::from(*line)]);
            lines_result(window.clip(&lines, false))
        }
        Geometry::LineString(line) => {
            let lines = MultiLineString::new(vec![line.clone()]);
            lines_result(window.clip(&lines, false))
        }
        Geometry::MultiLineString(lines) => lines_result(window.clip(lines, false)),
        Geometry::Polygon(polygon) => polygons_result(window.intersection(polygon)),
        Geometry::MultiPolygon(polygons) => {
            polygons_result(MultiPolygon::new(vec![window]).intersection(polygons))
        }
        Geometry::Rect(r) => polygons_result(window.intersection(&r.to_polygon())),
        Geometry::Triangle(t) => polygons_result(window.intersection(&t.to_polygon())),
        Geometry::GeometryCollection(collection) => {
            let kept: Vec<_> = collection
                .iter()
                .filter_map(|g| clip_geometry(g, rect))
                .collect();
            (!kept.is_empty()).then(|| Geometry::GeometryCollection(GeometryCollection::new_from(kept)))
        }
    }
}

/// Ramer-Douglas-Peucker simplification for lines and polygons.
pub fn simplify_geometry(geometry: Geometry<f64>, tolerance: f64) -> Geometry<f64> {
    match geometry {
        Geometry::LineString(g) => Geometry::LineString(g.simplify(&tolerance)),
        Geometry::MultiLineString(g) => Geometry::MultiLineString(g.simplify(&tolerance)),
        Geometry::Polygon(g) => Geometry::Polygon(g.simplify(&tolerance)),
        Geometry::MultiPolygon(g) => Geometry::MultiPolygon(g.simplify(&tolerance)),
        Geometry::GeometryCollection(g) => Geometry::GeometryCollection(GeometryCollection::new_from(
            g.into_iter().map(|g| simplify_geometry(g, tolerance)).collect(),
        )),
        other => other,
    }
}
