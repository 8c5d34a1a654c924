//! Feature layer types passed between decoding, transforms and formats.

use geo_types::Geometry;
use std::collections::BTreeMap;

/// Feature properties, normalized to UTF-8 text on both sides.
pub type Properties = BTreeMap<String, String>;

/// A single map feature in planar coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct Feature {
    /// Geometry in planar Mercator meters
    pub geometry: Geometry<f64>,
    /// Property mapping
    pub properties: Properties,
    /// Optional stable feature id
    pub id: Option<u64>,
}

/// Per-layer processing flags.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LayerDatum {
    /// Geometry is already clipped to the tile; transforms must not clip again.
    pub already_clipped: bool,
}

/// A named, ordered sequence of features.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureLayer {
    pub name: String,
    pub features: Vec<Feature>,
    pub datum: LayerDatum,
}

impl FeatureLayer {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            features: Vec::new(),
            datum: LayerDatum::default(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }
}
