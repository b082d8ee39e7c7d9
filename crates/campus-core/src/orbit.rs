//! Spherical orbit state around a pivot target (Y-up)

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::framing::CameraPose;

/// Elevation limit for user-driven orbiting, just short of straight up/down
pub const ELEVATION_LIMIT: f32 = std::f32::consts::FRAC_PI_2 - 0.01;

/// Camera placement expressed relative to an orbit pivot
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OrbitState {
    pub target: Vec3,
    pub distance: f32,
    /// Rotation around +Y, measured from +Z towards +X
    pub azimuth: f32,
    /// Angle above the horizontal plane
    pub elevation: f32,
}

impl Default for OrbitState {
    fn default() -> Self {
        Self {
            target: Vec3::ZERO,
            distance: 1.0,
            azimuth: 0.0,
            elevation: 0.0,
        }
    }
}

impl OrbitState {
    /// Decompose a camera pose into orbit parameters around its target
    pub fn from_pose(pose: &CameraPose) -> Self {
        let offset = pose.position - pose.target;
        let distance = offset.length();
        if distance <= f32::EPSILON {
            return Self {
                target: pose.target,
                distance: 0.0,
                azimuth: 0.0,
                elevation: 0.0,
            };
        }

        Self {
            target: pose.target,
            distance,
            azimuth: offset.x.atan2(offset.z),
            elevation: (offset.y / distance).clamp(-1.0, 1.0).asin(),
        }
    }

    /// Unit vector from the target towards the camera
    pub fn direction(&self) -> Vec3 {
        let (sin_az, cos_az) = self.azimuth.sin_cos();
        let (sin_el, cos_el) = self.elevation.sin_cos();
        Vec3::new(cos_el * sin_az, sin_el, cos_el * cos_az)
    }

    /// Camera position in world space
    pub fn position(&self) -> Vec3 {
        self.target + self.direction() * self.distance
    }

    pub fn pose(&self) -> CameraPose {
        CameraPose {
            position: self.position(),
            target: self.target,
        }
    }

    /// Rotate by the given deltas, keeping elevation off the poles
    pub fn rotate(&mut self, delta_azimuth: f32, delta_elevation: f32) {
        self.azimuth += delta_azimuth;
        self.elevation = (self.elevation + delta_elevation).clamp(-ELEVATION_LIMIT, ELEVATION_LIMIT);
    }
}
