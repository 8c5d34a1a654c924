//! Coordinate type definitions

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Highest zoom level that fits the packed integer layout.
pub const MAX_ZOOM: u8 = 29;

/// Tile address in the quadtree pyramid.
///
/// Column and row are always within `[0, 2^zoom)`; the only way to build a
/// value is through [`TileCoord::new`] (or the navigation methods, which
/// preserve the invariant).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TileCoord {
    zoom: u8,
    column: u32,
    row: u32,
}

impl TileCoord {
    /// The single tile at zoom 0.
    pub const ROOT: TileCoord = TileCoord {
        zoom: 0,
        column: 0,
        row: 0,
    };

    /// Create a coordinate, rejecting column/row values outside the zoom's grid.
    pub fn new(zoom: u8, column: u32, row: u32) -> Result<Self, CoordError> {
        if zoom > MAX_ZOOM {
            return Err(CoordError::InvalidZoom(zoom));
        }
        let dim = tiles_per_side(zoom);
        if u64::from(column) >= dim || u64::from(row) >= dim {
            return Err(CoordError::OutOfRange { zoom, column, row });
        }
        Ok(Self { zoom, column, row })
    }

    /// Construct without validation. Callers guarantee the grid invariant.
    #[inline]
    pub(crate) const fn new_unchecked(zoom: u8, column: u32, row: u32) -> Self {
        Self { zoom, column, row }
    }

    #[inline]
    pub fn zoom(&self) -> u8 {
        self.zoom
    }

    #[inline]
    pub fn column(&self) -> u32 {
        self.column
    }

    #[inline]
    pub fn row(&self) -> u32 {
        self.row
    }

    /// The containing tile one zoom level up, or `None` at zoom 0.
    pub fn parent(&self) -> Option<Self> {
        if self.zoom == 0 {
            return None;
        }
        Some(Self::new_unchecked(
            self.zoom - 1,
            self.column / 2,
            self.row / 2,
        ))
    }

    /// The ancestor at `zoom`, which must not exceed this tile's zoom.
    pub fn zoom_to(&self, zoom: u8) -> Result<Self, CoordError> {
        if zoom > self.zoom {
            return Err(CoordError::NotAnAncestor {
                from: self.zoom,
                to: zoom,
            });
        }
        let shift = self.zoom - zoom;
        Ok(Self::new_unchecked(
            zoom,
            self.column >> shift,
            self.row >> shift,
        ))
    }

    /// The four tiles one zoom level down.
    ///
    /// Order is fixed: (2x, 2y), (2x+1, 2y), (2x, 2y+1), (2x+1, 2y+1).
    /// Must not be called at `MAX_ZOOM`; see [`TileCoord::has_children`].
    pub fn children(&self) -> [Self; 4] {
        debug_assert!(self.has_children());
        let zoom = self.zoom + 1;
        let x = self.column * 2;
        let y = self.row * 2;
        [
            Self::new_unchecked(zoom, x, y),
            Self::new_unchecked(zoom, x + 1, y),
            Self::new_unchecked(zoom, x, y + 1),
            Self::new_unchecked(zoom, x + 1, y + 1),
        ]
    }

    /// Whether the tile can be subdivided without exceeding `MAX_ZOOM`.
    #[inline]
    pub fn has_children(&self) -> bool {
        self.zoom < MAX_ZOOM
    }
}

impl fmt::Display for TileCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.zoom, self.column, self.row)
    }
}

impl FromStr for TileCoord {
    type Err = CoordError;

    /// Parse the `z/x/y` form used in tile URLs and paths.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || CoordError::InvalidPath(s.to_string());
        let mut parts = s.trim().split('/');
        let zoom = parts.next().ok_or_else(invalid)?;
        let column = parts.next().ok_or_else(invalid)?;
        let row = parts.next().ok_or_else(invalid)?;
        if parts.next().is_some() {
            return Err(invalid());
        }

        let zoom: u8 = zoom.parse().map_err(|_| invalid())?;
        let column: u32 = column.parse().map_err(|_| invalid())?;
        let row: u32 = row.parse().map_err(|_| invalid())?;
        Self::new(zoom, column, row)
    }
}

/// Number of tiles along one edge of the grid at `zoom`.
#[inline]
pub fn tiles_per_side(zoom: u8) -> u64 {
    1u64 << zoom
}

/// Errors produced when building or navigating coordinates.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoordError {
    /// Zoom exceeds what the packed layout can represent
    #[error("Invalid zoom level: {0} (must be between 0 and {MAX_ZOOM})")]
    InvalidZoom(u8),

    /// Column or row lies outside `[0, 2^zoom)`
    #[error("Tile {zoom}/{column}/{row} is outside the grid for zoom {zoom}")]
    OutOfRange { zoom: u8, column: u32, row: u32 },

    /// Requested ancestor zoom is deeper than the tile itself
    #[error("Cannot zoom from {from} to {to}: target must not be deeper")]
    NotAnAncestor { from: u8, to: u8 },

    /// A `z/x/y` string could not be parsed
    #[error("Invalid tile path: '{0}' (expected z/x/y)")]
    InvalidPath(String),

    /// A packed integer carries a zoom or field that cannot be decoded
    #[error("Invalid packed coordinate: {0:#x}")]
    InvalidPacked(u64),
}
