//! Camera framing - fit the camera to a model's bounding volume
//!
//! The camera is placed at `center + extent * offset`, so the distance to
//! the model scales with its size and every model is seen from the same
//! oblique, downward-looking angle.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::bounds::BoundingVolume;

/// Camera position and look-at target
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CameraPose {
    pub position: Vec3,
    pub target: Vec3,
}

impl CameraPose {
    pub fn new(position: Vec3, target: Vec3) -> Self {
        Self { position, target }
    }
}

/// Camera/controls capability driven by the framer.
///
/// Implementors move the camera to `pose.position`, aim it and the orbit
/// pivot at `pose.target`, then recompute their orbit state so that later
/// user rotation pivots around the new target.
pub trait CameraRig {
    fn apply_pose(&mut self, pose: &CameraPose);
}

/// Framing parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FramingConfig {
    /// Offset from the model center, as a multiple of the model's extent
    #[serde(default = "default_offset")]
    pub offset: Vec3,
}

fn default_offset() -> Vec3 {
    Vec3::new(0.4, 0.6, 0.4)
}

impl Default for FramingConfig {
    fn default() -> Self {
        Self {
            offset: default_offset(),
        }
    }
}

/// Computes and applies framing poses
#[derive(Debug, Clone, Default)]
pub struct CameraFramer {
    config: FramingConfig,
}

impl CameraFramer {
    pub fn new(config: FramingConfig) -> Self {
        Self { config }
    }

    /// Pose that frames `volume`.
    ///
    /// A degenerate volume (empty, or a single point) has zero extent, so the
    /// camera collapses onto the center. That only happens while a model is
    /// still loading and is not treated as an error.
    pub fn pose_for(&self, volume: &BoundingVolume) -> CameraPose {
        let center = volume.center();
        let extent = volume.extent();
        CameraPose {
            position: center + self.config.offset * extent,
            target: center,
        }
    }

    /// Compute the pose for `volume` and apply it to `rig`
    pub fn frame(&self, volume: &BoundingVolume, rig: &mut impl CameraRig) -> CameraPose {
        let pose = self.pose_for(volume);
        tracing::debug!(
            center = ?pose.target,
            position = ?pose.position,
            extent = volume.extent(),
            "Framing camera"
        );
        rig.apply_pose(&pose);
        pose
    }
}
