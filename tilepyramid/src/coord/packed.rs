//! Bit-packed coordinate integers.
//!
//! Layout of the `u64` (least significant bit first):
//!
//! ```text
//! bits  0..5   zoom    (5 bits, zoom <= 31, capped at MAX_ZOOM = 29)
//! bits  5..34  column  (29 bits, right-aligned)
//! bits 34..63  row     (29 bits, right-aligned)
//! bit  63      always zero
//! ```
//!
//! Field widths do not depend on zoom, so the parent of a packed tile is
//! derived with shifts and masks alone, see [`zoom_up`].

use super::types::{CoordError, TileCoord, MAX_ZOOM};

/// Width of the zoom field.
pub const ZOOM_BITS: u32 = 5;
/// Width of each of the column and row fields.
pub const COORD_BITS: u32 = 29;

const ZOOM_MASK: u64 = (1 << ZOOM_BITS) - 1;
const COORD_MASK: u64 = (1 << COORD_BITS) - 1;
const COLUMN_SHIFT: u32 = ZOOM_BITS;
const ROW_SHIFT: u32 = ZOOM_BITS + COORD_BITS;

/// Pack a coordinate into a single integer.
#[inline]
pub fn pack(coord: &TileCoord) -> u64 {
    (u64::from(coord.row()) << ROW_SHIFT)
        | (u64::from(coord.column()) << COLUMN_SHIFT)
        | u64::from(coord.zoom())
}

/// Decode a packed integer, validating zoom and grid range.
pub fn unpack(value: u64) -> Result<TileCoord, CoordError> {
    if value >> (ROW_SHIFT + COORD_BITS) != 0 {
        return Err(CoordError::InvalidPacked(value));
    }
    let zoom = (value & ZOOM_MASK) as u8;
    if zoom > MAX_ZOOM {
        return Err(CoordError::InvalidPacked(value));
    }
    let column = ((value >> COLUMN_SHIFT) & COORD_MASK) as u32;
    let row = ((value >> ROW_SHIFT) & COORD_MASK) as u32;
    TileCoord::new(zoom, column, row).map_err(|_| CoordError::InvalidPacked(value))
}

/// Packed integer of the parent tile, computed without decoding.
///
/// Decrements the zoom field and shifts the column and row fields right by one
/// bit each. Returns `None` for a zoom 0 value.
#[inline]
pub fn zoom_up(value: u64) -> Option<u64> {
    let zoom = value & ZOOM_MASK;
    if zoom == 0 {
        return None;
    }
    let column = (value >> (COLUMN_SHIFT + 1)) & (COORD_MASK >> 1);
    let row = (value >> (ROW_SHIFT + 1)) & (COORD_MASK >> 1);
    Some((row << ROW_SHIFT) | (column << COLUMN_SHIFT) | (zoom - 1))
}

/// Zoom level stored in a packed integer.
#[inline]
pub fn packed_zoom(value: u64) -> u8 {
    (value & ZOOM_MASK) as u8
}

impl TileCoord {
    /// Shorthand for [`pack`].
    #[inline]
    pub fn to_packed(&self) -> u64 {
        pack(self)
    }

    /// Shorthand for [`unpack`].
    #[inline]
    pub fn from_packed(value: u64) -> Result<Self, CoordError> {
        unpack(value)
    }
}
