//! Axis-aligned bounding boxes.

use super::{geographic_to_planar, planar_to_geographic, HALF_CIRCUMFERENCE};

/// Bounding box as `(min_x, min_y, max_x, max_y)`.
///
/// Units are either degrees (geographic) or meters (planar); a given value
/// never mixes the two.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl Bounds {
    pub const fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    /// Corners as a `(min_x, min_y, max_x, max_y)` tuple.
    pub fn to_tuple(&self) -> (f64, f64, f64, f64) {
        (self.min_x, self.min_y, self.max_x, self.max_y)
    }

    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    /// Project geographic bounds into planar meters.
    pub fn to_planar(&self) -> Bounds {
        let (min_x, min_y) = geographic_to_planar(self.min_x, self.min_y);
        let (max_x, max_y) = geographic_to_planar(self.max_x, self.max_y);
        Bounds::new(min_x, min_y, max_x, max_y)
    }

    /// Invert planar bounds back to geographic degrees.
    pub fn to_geographic(&self) -> Bounds {
        let (min_x, min_y) = planar_to_geographic(self.min_x, self.min_y);
        let (max_x, max_y) = planar_to_geographic(self.max_x, self.max_y);
        Bounds::new(min_x, min_y, max_x, max_y)
    }

    /// Clamp planar bounds to the world extent.
    ///
    /// Latitudes past the Mercator limit and floating-point drift at +/-180
    /// both project slightly outside `[-H, H]`.
    pub fn clamp_to_world(&self) -> Bounds {
        let clamp = |v: f64| v.clamp(-HALF_CIRCUMFERENCE, HALF_CIRCUMFERENCE);
        Bounds::new(
            clamp(self.min_x),
            clamp(self.min_y),
            clamp(self.max_x),
            clamp(self.max_y),
        )
    }

    /// Grow the box by `dx` horizontally and `dy` vertically on each side.
    pub fn buffered(&self, dx: f64, dy: f64) -> Bounds {
        Bounds::new(
            self.min_x - dx,
            self.min_y - dy,
            self.max_x + dx,
            self.max_y + dy,
        )
    }

    /// Whether `other` (a region to cover) touches this tile box.
    ///
    /// `self` is treated as a tile: half-open `[min, max)` on each axis, closed
    /// at the far world edge. Per axis, a region with positive extent must
    /// overlap with positive length, so sharing only an edge is not enough. A
    /// zero-extent region at `v` belongs to the single tile whose interval
    /// contains `v`.
    pub fn intersects(&self, other: &Bounds) -> bool {
        axis_intersects(self.min_x, self.max_x, other.min_x, other.max_x)
            && axis_intersects(self.min_y, self.max_y, other.min_y, other.max_y)
    }
}

fn axis_intersects(tile_min: f64, tile_max: f64, min: f64, max: f64) -> bool {
    if min == max {
        let on_far_edge = tile_max >= HALF_CIRCUMFERENCE && min == tile_max;
        return tile_min <= min && (min < tile_max || on_far_edge);
    }
    tile_min < max && min < tile_max
}

impl From<(f64, f64, f64, f64)> for Bounds {
    fn from((min_x, min_y, max_x, max_y): (f64, f64, f64, f64)) -> Self {
        Bounds::new(min_x, min_y, max_x, max_y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::projection::WORLD_BOUNDS;

    #[test]
    fn test_overlap_with_positive_area() {
        let tile = Bounds::new(0.0, 0.0, 10.0, 10.0);
        assert!(tile.intersects(&Bounds::new(5.0, 5.0, 15.0, 15.0)));
        assert!(tile.intersects(&Bounds::new(-5.0, -5.0, 20.0, 20.0)));
        assert!(!tile.intersects(&Bounds::new(11.0, 0.0, 20.0, 10.0)));
    }

    #[test]
    fn test_shared_edge_is_not_intersection() {
        let left = Bounds::new(0.0, 0.0, 10.0, 10.0);
        let right = Bounds::new(10.0, 0.0, 20.0, 10.0);
        let region = Bounds::new(10.0, 2.0, 15.0, 8.0);
        assert!(!left.intersects(&region));
        assert!(right.intersects(&region));
    }

    #[test]
    fn test_point_on_boundary_belongs_to_one_side() {
        let left = Bounds::new(0.0, 0.0, 10.0, 10.0);
        let right = Bounds::new(10.0, 0.0, 20.0, 10.0);
        let point = Bounds::new(10.0, 5.0, 10.0, 5.0);
        assert!(!left.intersects(&point));
        assert!(right.intersects(&point));
    }

    #[test]
    fn test_point_on_far_world_edge_belongs_to_last_tile() {
        let h = HALF_CIRCUMFERENCE;
        let east = Bounds::new(0.0, 0.0, h, h);
        let corner = Bounds::new(h, h, h, h);
        assert!(east.intersects(&corner));
    }

    #[test]
    fn test_degenerate_line_region() {
        let tile = Bounds::new(0.0, 0.0, 10.0, 10.0);
        // Zero width, positive height
        assert!(tile.intersects(&Bounds::new(0.0, 2.0, 0.0, 4.0)));
        assert!(!tile.intersects(&Bounds::new(10.0, 2.0, 10.0, 4.0)));
    }

    #[test]
    fn test_clamp_to_world() {
        let h = HALF_CIRCUMFERENCE;
        let wide = Bounds::new(-2.0 * h, -h - 1.0, 2.0 * h, h + 1.0);
        assert_eq!(wide.clamp_to_world(), WORLD_BOUNDS);
    }

    #[test]
    fn test_buffered() {
        let b = Bounds::new(0.0, 0.0, 10.0, 10.0).buffered(1.0, 2.0);
        assert_eq!(b, Bounds::new(-1.0, -2.0, 11.0, 12.0));
        assert_eq!(b.width(), 12.0);
        assert_eq!(b.height(), 14.0);
    }

    #[test]
    fn test_planar_geographic_roundtrip() {
        let geo = Bounds::new(-1.115, 50.941, 0.895, 51.984);
        let back = geo.to_planar().to_geographic();
        assert!((back.min_x - geo.min_x).abs() < 1e-10);
        assert!((back.max_y - geo.max_y).abs() < 1e-10);
    }
}
