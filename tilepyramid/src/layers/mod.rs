//! Feature layers and layer-name resolution.

mod feature;
mod spec;

pub use feature::{Feature, FeatureLayer, LayerDatum, Properties};
pub use spec::{parse_layer_spec, LayerConfig, LayerSet, LayerSpecError, ALL_LAYERS};
