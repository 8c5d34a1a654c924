//! Spherical Web Mercator projection math.
//!
//! Converts between geographic longitude/latitude (degrees) and planar
//! Mercator meters, and derives tile bounds in either space.

mod bounds;

pub use bounds::Bounds;

use crate::coord::{tiles_per_side, TileCoord};

/// Sphere radius used by Web Mercator, in meters.
pub const EARTH_RADIUS: f64 = 6_378_137.0;

/// Half the equatorial circumference; the world spans `[-H, H]` on both axes.
pub const HALF_CIRCUMFERENCE: f64 = 20_037_508.342_789_244;

/// Pixel edge length the meters-per-pixel scale is expressed against.
pub const TILE_PIXELS: f64 = 256.0;

/// Planar extent of the whole world.
pub const WORLD_BOUNDS: Bounds = Bounds {
    min_x: -HALF_CIRCUMFERENCE,
    min_y: -HALF_CIRCUMFERENCE,
    max_x: HALF_CIRCUMFERENCE,
    max_y: HALF_CIRCUMFERENCE,
};

/// Forward projection from longitude/latitude to planar meters.
///
/// Uses `y = R * atanh(sin(lat))`, which equals `R * ln(tan(pi/4 + lat/2))`
/// and is exactly zero on the equator.
#[inline]
pub fn geographic_to_planar(lon: f64, lat: f64) -> (f64, f64) {
    let x = lon.to_radians() * EARTH_RADIUS;
    let y = lat.to_radians().sin().atanh() * EARTH_RADIUS;
    (x, y)
}

/// Forward projection that carries a z component through unchanged.
#[inline]
pub fn geographic_to_planar_z(lon: f64, lat: f64, z: f64) -> (f64, f64, f64) {
    let (x, y) = geographic_to_planar(lon, lat);
    (x, y, z)
}

/// Inverse projection from planar meters to longitude/latitude.
#[inline]
pub fn planar_to_geographic(x: f64, y: f64) -> (f64, f64) {
    let lon = (x / EARTH_RADIUS).to_degrees();
    let lat = (y / EARTH_RADIUS).sinh().atan().to_degrees();
    (lon, lat)
}

/// Planar bounds of a tile.
///
/// Rows count down from the north edge, so row 0 has `max_y = H`. Every edge
/// is computed from its own index so the outermost tiles land exactly on the
/// world extent.
pub fn coord_to_planar_bounds(coord: &TileCoord) -> Bounds {
    let size = 2.0 * HALF_CIRCUMFERENCE / tiles_per_side(coord.zoom()) as f64;
    let column = f64::from(coord.column());
    let row = f64::from(coord.row());
    Bounds {
        min_x: -HALF_CIRCUMFERENCE + column * size,
        min_y: HALF_CIRCUMFERENCE - (row + 1.0) * size,
        max_x: -HALF_CIRCUMFERENCE + (column + 1.0) * size,
        max_y: HALF_CIRCUMFERENCE - row * size,
    }
}

/// Geographic bounds of a tile as `(min_lon, min_lat, max_lon, max_lat)`.
pub fn coord_to_geographic_bounds(coord: &TileCoord) -> Bounds {
    coord_to_planar_bounds(coord).to_geographic()
}

/// Ground meters covered by one pixel of a 256px tile at `zoom`.
#[inline]
pub fn meters_per_pixel(zoom: u8) -> f64 {
    2.0 * HALF_CIRCUMFERENCE / (TILE_PIXELS * tiles_per_side(zoom) as f64)
}
