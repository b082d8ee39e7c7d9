//! Selection coordinator - turns load and menu events into visibility and camera changes

use tracing::info;

use crate::bounds::BoundingVolume;
use crate::framing::{CameraFramer, CameraPose, CameraRig, FramingConfig};
use crate::registry::{Registration, SceneRegistry};

/// Rendering capability that measures a loaded model
pub trait BoundsProvider<H> {
    fn bounds(&self, handle: &H) -> BoundingVolume;
}

impl<H, F> BoundsProvider<H> for F
where
    F: Fn(&H) -> BoundingVolume,
{
    fn bounds(&self, handle: &H) -> BoundingVolume {
        self(handle)
    }
}

/// "Asset load completed" message
#[derive(Debug, Clone, PartialEq)]
pub struct ModelLoaded<H> {
    pub label: String,
    pub handle: H,
    /// Whether this is the home model shown before any interaction
    pub is_default: bool,
    /// Number of animation clips started for the model
    pub animation_count: usize,
}

/// Owns the scene registry and the camera framer
#[derive(Debug, Clone)]
pub struct SelectionCoordinator<H> {
    registry: SceneRegistry<H>,
    framer: CameraFramer,
}

impl<H> Default for SelectionCoordinator<H> {
    fn default() -> Self {
        Self::new(FramingConfig::default())
    }
}

impl<H> SelectionCoordinator<H> {
    pub fn new(framing: FramingConfig) -> Self {
        Self {
            registry: SceneRegistry::new(),
            framer: CameraFramer::new(framing),
        }
    }

    pub fn registry(&self) -> &SceneRegistry<H> {
        &self.registry
    }

    pub fn framer(&self) -> &CameraFramer {
        &self.framer
    }

    /// Record a completed load. Loads may arrive in any order.
    pub fn on_model_loaded(&mut self, loaded: ModelLoaded<H>) -> Registration {
        let ModelLoaded {
            label,
            handle,
            is_default,
            animation_count,
        } = loaded;

        info!(label = %label, default = is_default, animations = animation_count, "Model loaded");
        if is_default {
            self.registry.register_default(label, handle)
        } else {
            self.registry.register(label, handle)
        }
    }

    /// Show `label` and frame it.
    ///
    /// Unknown labels do nothing and return `None`. Selecting the label that
    /// is already visible frames it again.
    pub fn select(
        &mut self,
        label: &str,
        bounds: &impl BoundsProvider<H>,
        rig: &mut impl CameraRig,
    ) -> Option<CameraPose> {
        let handle = self.registry.select(label)?;
        let volume = bounds.bounds(handle);
        info!(label = %label, "Location selected");
        Some(self.framer.frame(&volume, rig))
    }

    /// Show `label` without touching the camera.
    ///
    /// For hosts whose geometry is not measurable yet; they follow up with
    /// [`SelectionCoordinator::frame_current`] once it is.
    pub fn show(&mut self, label: &str) -> Option<&H> {
        let handle = self.registry.select(label)?;
        info!(label = %label, "Location shown, framing deferred");
        Some(handle)
    }

    /// Frame whichever model is visible, if any
    pub fn frame_current(
        &self,
        bounds: &impl BoundsProvider<H>,
        rig: &mut impl CameraRig,
    ) -> Option<CameraPose> {
        let entry = self.registry.currently_visible()?;
        let volume = bounds.bounds(entry.handle);
        Some(self.framer.frame(&volume, rig))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    #[derive(Default)]
    struct RecordingRig {
        poses: Vec<CameraPose>,
    }

    impl CameraRig for RecordingRig {
        fn apply_pose(&mut self, pose: &CameraPose) {
            self.poses.push(*pose);
        }
    }

    /// Model `n` is a 6 x 8 box centered at (n * 100, 0, 0)
    fn bounds_by_index(handle: &u32) -> BoundingVolume {
        let center = Vec3::new(*handle as f32 * 100.0, 0.0, 0.0);
        BoundingVolume::new(center - Vec3::new(3.0, 4.0, 0.0), center + Vec3::new(3.0, 4.0, 0.0))
    }

    fn loaded(label: &str, handle: u32, is_default: bool) -> ModelLoaded<u32> {
        ModelLoaded {
            label: label.to_string(),
            handle,
            is_default,
            animation_count: 0,
        }
    }

    #[test]
    fn test_select_frames_selected_model() {
        let mut coordinator = SelectionCoordinator::default();
        coordinator.on_model_loaded(loaded("Home", 0, true));
        coordinator.on_model_loaded(loaded("Clinic", 1, false));
        let mut rig = RecordingRig::default();

        let pose = coordinator.select("Clinic", &bounds_by_index, &mut rig).unwrap();
        assert_eq!(pose.target, Vec3::new(100.0, 0.0, 0.0));
        assert_eq!(pose.position, Vec3::new(104.0, 6.0, 4.0));
        assert_eq!(rig.poses, vec![pose]);
        assert!(coordinator.registry().is_visible("Clinic"));
        assert!(!coordinator.registry().is_visible("Home"));
    }

    #[test]
    fn test_unknown_label_does_nothing() {
        let mut coordinator = SelectionCoordinator::default();
        coordinator.on_model_loaded(loaded("Home", 0, true));
        let mut rig = RecordingRig::default();

        assert!(coordinator.select("Gym", &bounds_by_index, &mut rig).is_none());
        assert!(rig.poses.is_empty());
        assert!(coordinator.registry().is_visible("Home"));
    }

    #[test]
    fn test_reselecting_visible_label_reframes() {
        let mut coordinator = SelectionCoordinator::default();
        coordinator.on_model_loaded(loaded("Home", 0, true));
        let mut rig = RecordingRig::default();

        coordinator.select("Home", &bounds_by_index, &mut rig);
        coordinator.select("Home", &bounds_by_index, &mut rig);
        assert_eq!(rig.poses.len(), 2);
        assert_eq!(rig.poses[0], rig.poses[1]);
    }

    #[test]
    fn test_selection_before_load_is_ignored_then_works() {
        let mut coordinator = SelectionCoordinator::default();
        let mut rig = RecordingRig::default();

        assert!(coordinator.select("Clinic", &bounds_by_index, &mut rig).is_none());
        coordinator.on_model_loaded(loaded("Clinic", 1, false));
        assert!(coordinator.select("Clinic", &bounds_by_index, &mut rig).is_some());
        assert_eq!(rig.poses.len(), 1);
    }

    #[test]
    fn test_frame_current() {
        let mut coordinator = SelectionCoordinator::default();
        let mut rig = RecordingRig::default();
        assert!(coordinator.frame_current(&bounds_by_index, &mut rig).is_none());

        let registration = coordinator.on_model_loaded(loaded("Home", 2, true));
        assert_eq!(registration, Registration::RegisteredVisible);
        let pose = coordinator.frame_current(&bounds_by_index, &mut rig).unwrap();
        assert_eq!(pose.target, Vec3::new(200.0, 0.0, 0.0));
    }

    #[test]
    fn test_show_then_frame() {
        let mut coordinator = SelectionCoordinator::default();
        coordinator.on_model_loaded(loaded("Home", 0, true));
        coordinator.on_model_loaded(loaded("Clinic", 1, false));
        let mut rig = RecordingRig::default();

        assert_eq!(coordinator.show("Clinic"), Some(&1));
        assert!(rig.poses.is_empty());
        assert!(coordinator.registry().is_visible("Clinic"));
        assert!(coordinator.show("Gym").is_none());
        assert!(coordinator.registry().is_visible("Clinic"));

        let pose = coordinator.frame_current(&bounds_by_index, &mut rig).unwrap();
        assert_eq!(pose.target, Vec3::new(100.0, 0.0, 0.0));
        assert_eq!(rig.poses.len(), 1);
    }

    #[test]
    fn test_degenerate_bounds_still_frame() {
        let mut coordinator: SelectionCoordinator<u32> = SelectionCoordinator::default();
        coordinator.on_model_loaded(loaded("Empty", 7, false));
        let mut rig = RecordingRig::default();

        let empty = |_: &u32| BoundingVolume::EMPTY;
        let pose = coordinator.select("Empty", &empty, &mut rig).unwrap();
        assert_eq!(pose.position, pose.target);
    }
}
