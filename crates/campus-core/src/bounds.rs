//! Axis-aligned bounding volumes

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Axis-aligned box enclosing a model's geometry
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingVolume {
    pub min: Vec3,
    pub max: Vec3,
}

impl Default for BoundingVolume {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl BoundingVolume {
    /// Inverted box that contains nothing; the first extended point becomes both corners
    pub const EMPTY: Self = Self {
        min: Vec3::splat(f32::MAX),
        max: Vec3::splat(f32::MIN),
    };

    /// Create a volume from two corners (order of components is normalized)
    pub fn new(a: Vec3, b: Vec3) -> Self {
        Self {
            min: a.min(b),
            max: a.max(b),
        }
    }

    /// Smallest volume containing every point
    pub fn from_points(points: impl IntoIterator<Item = Vec3>) -> Self {
        let mut volume = Self::EMPTY;
        for point in points {
            volume.extend(point);
        }
        volume
    }

    /// Grow the volume to contain `point`
    pub fn extend(&mut self, point: Vec3) {
        self.min = self.min.min(point);
        self.max = self.max.max(point);
    }

    /// Smallest volume containing both volumes
    pub fn union(&self, other: &Self) -> Self {
        Self {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    /// True when no point has been added
    pub fn is_empty(&self) -> bool {
        self.min.cmpgt(self.max).any()
    }

    /// Midpoint of the volume (origin when empty)
    pub fn center(&self) -> Vec3 {
        if self.is_empty() {
            return Vec3::ZERO;
        }
        (self.min + self.max) * 0.5
    }

    /// Edge lengths along each axis (zero when empty)
    pub fn size(&self) -> Vec3 {
        if self.is_empty() {
            return Vec3::ZERO;
        }
        self.max - self.min
    }

    /// Length of the diagonal, a single scalar for overall size
    pub fn extent(&self) -> f32 {
        self.size().length()
    }

    /// The eight corners of the box
    pub fn corners(&self) -> [Vec3; 8] {
        let (a, b) = (self.min, self.max);
        [
            Vec3::new(a.x, a.y, a.z),
            Vec3::new(b.x, a.y, a.z),
            Vec3::new(a.x, b.y, a.z),
            Vec3::new(b.x, b.y, a.z),
            Vec3::new(a.x, a.y, b.z),
            Vec3::new(b.x, a.y, b.z),
            Vec3::new(a.x, b.y, b.z),
            Vec3::new(b.x, b.y, b.z),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_volume() {
        let volume = BoundingVolume::EMPTY;
        assert!(volume.is_empty());
        assert_eq!(volume.center(), Vec3::ZERO);
        assert_eq!(volume.extent(), 0.0);
    }

    #[test]
    fn test_from_points() {
        let volume = BoundingVolume::from_points([
            Vec3::new(1.0, -2.0, 3.0),
            Vec3::new(-1.0, 2.0, 0.0),
            Vec3::new(0.0, 0.0, 1.0),
        ]);
        assert!(!volume.is_empty());
        assert_eq!(volume.min, Vec3::new(-1.0, -2.0, 0.0));
        assert_eq!(volume.max, Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(volume.center(), Vec3::new(0.0, 0.0, 1.5));
    }

    #[test]
    fn test_single_point_is_degenerate() {
        let volume = BoundingVolume::from_points([Vec3::new(2.0, 0.0, -3.0)]);
        assert!(!volume.is_empty());
        assert_eq!(volume.extent(), 0.0);
        assert_eq!(volume.center(), Vec3::new(2.0, 0.0, -3.0));
    }

    #[test]
    fn test_extent_is_diagonal() {
        let volume = BoundingVolume::new(Vec3::ZERO, Vec3::new(3.0, 4.0, 12.0));
        assert_eq!(volume.extent(), 13.0);
    }

    #[test]
    fn test_union_with_empty() {
        let a = BoundingVolume::new(Vec3::ZERO, Vec3::ONE);
        assert_eq!(a.union(&BoundingVolume::EMPTY), a);
        assert_eq!(BoundingVolume::EMPTY.union(&a), a);
    }

    #[test]
    fn test_new_normalizes_corners() {
        let volume = BoundingVolume::new(Vec3::new(1.0, 0.0, 5.0), Vec3::new(0.0, 2.0, -5.0));
        assert_eq!(volume.min, Vec3::new(0.0, 0.0, -5.0));
        assert_eq!(volume.max, Vec3::new(1.0, 2.0, 5.0));
        assert!(volume.corners().iter().all(|c| c.cmpge(volume.min).all() && c.cmple(volume.max).all()));
    }
}
