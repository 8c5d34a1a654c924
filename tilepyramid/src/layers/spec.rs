//! Layer name configuration and request parsing.

use std::collections::BTreeSet;
use thiserror::Error;

/// Keyword that expands to every configured layer.
pub const ALL_LAYERS: &str = "all";

/// Sorted, deduplicated set of layer names.
pub type LayerSet = BTreeSet<String>;

/// Errors from resolving a layer request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LayerSpecError {
    /// Layer is not configured
    #[error("Unknown layer: '{0}'")]
    Unknown(String),

    /// Request is empty or contains an empty name
    #[error("Invalid layer spec: '{0}'")]
    Invalid(String),
}

/// The full set of layer names a deployment serves.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LayerConfig {
    all_layers: LayerSet,
}

impl LayerConfig {
    pub fn new<I, S>(all_layer_names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            all_layers: all_layer_names.into_iter().map(Into::into).collect(),
        }
    }

    pub fn all_layers(&self) -> &LayerSet {
        &self.all_layers
    }

    pub fn contains(&self, name: &str) -> bool {
        self.all_layers.contains(name)
    }
}

/// Resolve a comma-separated layer request such as `"roads,water"` or `"all"`.
///
/// `all` may appear alongside other names. Every other name must be
/// configured; the first unknown name is reported.
pub fn parse_layer_spec(spec: &str, config: &LayerConfig) -> Result<LayerSet, LayerSpecError> {
    let spec = spec.trim();
    if spec.is_empty() {
        return Err(LayerSpecError::Invalid(spec.to_string()));
    }

    let mut layers = LayerSet::new();
    for name in spec.split(',').map(str::trim) {
        if name.is_empty() {
            return Err(LayerSpecError::Invalid(spec.to_string()));
        }
        if name == ALL_LAYERS {
            layers.extend(config.all_layers.iter().cloned());
            continue;
        }
        if !config.contains(name) {
            return Err(LayerSpecError::Unknown(name.to_string()));
        }
        layers.insert(name.to_string());
    }
    Ok(layers)
}
