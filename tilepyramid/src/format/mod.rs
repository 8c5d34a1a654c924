//! Output formats for tile artifacts.
//!
//! A [`Format`] names the file extension and mimetype an artifact is stored
//! under, encodes feature layers into bytes, and decides when two payloads
//! count as the same tile. Byte equality is the default; the zip metatile
//! container overrides it to compare entries instead of archive bytes.

mod json;
pub mod metatile;

pub use json::JsonFormat;
pub use metatile::MetatileFormat;

use crate::layers::FeatureLayer;
use crate::projection::Bounds;
use std::io::{self, Write};
use thiserror::Error;

/// Errors raised while encoding or inspecting formatted tiles.
#[derive(Debug, Error)]
pub enum FormatError {
    /// Writing to the output sink failed
    #[error("Format I/O error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization failed
    #[error("JSON encoding failed: {0}")]
    Json(#[from] serde_json::Error),

    /// Zip archive could not be written or read
    #[error("Metatile archive error: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// No built-in format matches the requested name
    #[error("Unknown format: '{0}'")]
    Unknown(String),
}

/// Capability every output format provides.
pub trait Format: Send + Sync {
    /// Short identifier, e.g. `"json"`.
    fn name(&self) -> &'static str;

    /// File extension without the leading dot.
    fn extension(&self) -> &'static str;

    /// MIME type sent with stored objects.
    fn mimetype(&self) -> &'static str;

    /// Encode `layers` into `sink`.
    ///
    /// Geometry in `layers` is planar; `planar_bounds` and `geographic_bounds`
    /// describe the same tile in both spaces for formats that need either.
    fn encode(
        &self,
        sink: &mut dyn Write,
        layers: &[FeatureLayer],
        zoom: u8,
        planar_bounds: &Bounds,
        geographic_bounds: &Bounds,
    ) -> Result<(), FormatError>;

    /// Whether two stored payloads of this format represent the same tile.
    fn tiles_equal(&self, a: &[u8], b: &[u8]) -> bool {
        a == b
    }
}

static JSON: JsonFormat = JsonFormat;
static METATILE: MetatileFormat = MetatileFormat;

/// Resolve a built-in format by name or extension (case-insensitive).
pub fn lookup_format(name: &str) -> Result<&'static dyn Format, FormatError> {
    match name.trim().to_ascii_lowercase().as_str() {
        "json" | "geojson" => Ok(&JSON),
        "zip" | "metatile" => Ok(&METATILE),
        _ => Err(FormatError::Unknown(name.to_string())),
    }
}

/// The canonical tile-of-record format.
pub fn json_format() -> &'static dyn Format {
    &JSON
}

/// The zip metatile container format.
pub fn metatile_format() -> &'static dyn Format {
    &METATILE
}
