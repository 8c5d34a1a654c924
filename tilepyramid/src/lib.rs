//! tilepyramid - quadtree tile addressing and artifact storage for map tiles
//!
//! The library covers the tile side of a vector map pipeline:
//!
//! - [`coord`]: `(zoom, column, row)` addressing with a bit-packed `u64` form
//! - [`projection`]: Web Mercator conversion and tile bounds
//! - [`generator`]: lazy enumeration of the tiles covering bounding boxes
//! - [`store`]: filesystem, object storage and in-memory artifact stores
//! - [`reformat`]: narrowing a stored tile of record into served formats
//!
//! # Example
//!
//! ```
//! use tilepyramid::coord::TileCoord;
//! use tilepyramid::format::json_format;
//! use tilepyramid::store::{write_tile_if_changed, MemoryStore};
//!
//! let store = MemoryStore::new();
//! let coord = TileCoord::new(1, 0, 1).unwrap();
//! assert!(write_tile_if_changed(&store, b"{}", coord, json_format(), "all").unwrap());
//! assert!(!write_tile_if_changed(&store, b"{}", coord, json_format(), "all").unwrap());
//! ```

pub mod config;
pub mod coord;
pub mod format;
pub mod generator;
pub mod layers;
pub mod logging;
pub mod projection;
pub mod reformat;
pub mod store;

/// Version of the tilepyramid library and CLI.
///
/// The version is defined in `Cargo.toml` and injected at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
