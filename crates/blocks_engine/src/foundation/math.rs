//! Math utilities and types
//!
//! Scene space is right-handed with `z` pointing up. The ground plane sits at
//! `z = 0`; `x` and `y` span the table top.

pub use nalgebra::{Vector2, Vector3};

/// 2D vector type (horizontal plane)
pub type Vec2 = Vector2<f32>;

/// 3D vector type
pub type Vec3 = Vector3<f32>;

/// 3D point type
pub type Point3 = nalgebra::Point3<f32>;

/// Elevation of the implicit ground plane
pub const GROUND_LEVEL: f32 = 0.0;

/// Project a point onto the horizontal plane
pub fn planar(point: &Point3) -> Vec2 {
    Vec2::new(point.x, point.y)
}

/// Horizontal distance between two points, ignoring elevation
pub fn planar_distance(a: &Point3, b: &Point3) -> f32 {
    (planar(a) - planar(b)).magnitude()
}

/// Axis-aligned rectangle on the horizontal plane
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    /// Minimum corner
    pub min: Vec2,
    /// Maximum corner
    pub max: Vec2,
}

impl Rect {
    /// Create a rectangle from its corners
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    /// Create a rectangle centered on `center` with the given full extents
    pub fn from_center_size(center: Vec2, width: f32, depth: f32) -> Self {
        let half = Vec2::new(width / 2.0, depth / 2.0);
        Self::new(center - half, center + half)
    }

    /// Check if a point lies inside (or on the edge of) the rectangle
    pub fn contains_point(&self, point: Vec2, tolerance: f32) -> bool {
        point.x >= self.min.x - tolerance
            && point.x <= self.max.x + tolerance
            && point.y >= self.min.y - tolerance
            && point.y <= self.max.y + tolerance
    }

    /// Check if another rectangle lies entirely inside this one
    pub fn contains_rect(&self, other: &Rect, tolerance: f32) -> bool {
        self.contains_point(other.min, tolerance) && self.contains_point(other.max, tolerance)
    }

    /// Check if two rectangles overlap; touching edges count as overlap
    pub fn intersects(&self, other: &Rect, tolerance: f32) -> bool {
        self.min.x <= other.max.x + tolerance
            && other.min.x <= self.max.x + tolerance
            && self.min.y <= other.max.y + tolerance
            && other.min.y <= self.max.y + tolerance
    }
}
