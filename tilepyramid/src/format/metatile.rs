//! Zip metatile container.
//!
//! A metatile bundles several formatted tiles into one zip archive, each entry
//! named by its path relative to the metatile (for example `0/0/0.json`).
//!
//! Zip archives carry per-entry timestamps and compression settings and do not
//! fix entry order, so the same logical content can serialize to different
//! bytes. Two metatiles are therefore equal when their `(name, content)` entry
//! maps are equal.

use super::{json::JsonFormat, Format, FormatError};
use crate::layers::FeatureLayer;
use crate::projection::Bounds;
use std::collections::BTreeMap;
use std::io::{Cursor, Read, Write};
use tracing::debug;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

/// Upper bound on buffer space reserved from an entry's declared size.
const MAX_ENTRY_PREALLOC: u64 = 1 << 20;

/// Entry name used when a metatile holds a single tile.
pub const SINGLE_TILE_ENTRY: &str = "0/0/0.json";

/// Packs entries into a zip archive and compares archives by content.
#[derive(Debug, Clone, Copy, Default)]
pub struct MetatileFormat;

impl Format for MetatileFormat {
    fn name(&self) -> &'static str {
        "zip"
    }

    fn extension(&self) -> &'static str {
        "zip"
    }

    fn mimetype(&self) -> &'static str {
        "application/zip"
    }

    /// Encodes the layers as JSON and stores them as the single entry
    /// [`SINGLE_TILE_ENTRY`].
    fn encode(
        &self,
        sink: &mut dyn Write,
        layers: &[FeatureLayer],
        zoom: u8,
        planar_bounds: &Bounds,
        geographic_bounds: &Bounds,
    ) -> Result<(), FormatError> {
        let mut json = Vec::new();
        JsonFormat.encode(&mut json, layers, zoom, planar_bounds, geographic_bounds)?;
        let archive = make_metatile([(SINGLE_TILE_ENTRY.to_string(), json)])?;
        sink.write_all(&archive)?;
        Ok(())
    }

    fn tiles_equal(&self, a: &[u8], b: &[u8]) -> bool {
        metatiles_are_equal(a, b)
    }
}

/// Build a zip archive from `(entry name, bytes)` pairs, in the given order.
pub fn make_metatile<I>(entries: I) -> Result<Vec<u8>, FormatError>
where
    I: IntoIterator<Item = (String, Vec<u8>)>,
{
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
    for (name, data) in entries {
        writer.start_file(name, options)?;
        writer.write_all(&data)?;
    }
    Ok(writer.finish()?.into_inner())
}

/// Read every entry of a metatile into a name-ordered map.
pub fn read_metatile(data: &[u8]) -> Result<BTreeMap<String, Vec<u8>>, FormatError> {
    let mut archive = ZipArchive::new(Cursor::new(data))?;
    let mut entries = BTreeMap::new();
    for i in 0..archive.len() {
        let mut file = archive.by_index(i)?;
        if file.is_dir() {
            continue;
        }
        let mut content = Vec::with_capacity(file.size().min(MAX_ENTRY_PREALLOC) as usize);
        file.read_to_end(&mut content)?;
        entries.insert(file.name().to_string(), content);
    }
    Ok(entries)
}

/// Compare two metatiles by entry content.
///
/// Archives that fail to parse are never equal to anything, including
/// themselves, so a corrupt stored tile is always rewritten.
pub fn metatiles_are_equal(a: &[u8], b: &[u8]) -> bool {
    match (read_metatile(a), read_metatile(b)) {
        (Ok(a), Ok(b)) => a == b,
        (Err(e), _) | (_, Err(e)) => {
            debug!(error = %e, "metatile comparison failed to read archive");
            false
        }
    }
}
