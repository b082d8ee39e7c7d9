//! Campus Scene - Bevy rendering and UI components for the campus map
//!
//! This crate provides the capabilities the campus-core coordinator drives:
//! glTF loading and animation playback, bounds measurement, the orbit
//! camera, visibility application, and the sidebar menu.

pub mod bounds;
pub mod camera;
pub mod models;
pub mod scene;
pub mod selection;
pub mod types;
pub mod ui;

use bevy::prelude::*;

/// Plugin that sets up the whole campus map scene
pub struct CampusScenePlugin;

impl Plugin for CampusScenePlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(camera::CameraPlugin)
            .add_plugins(scene::SceneSetupPlugin)
            .add_plugins(models::ModelsPlugin)
            .add_plugins(selection::SelectionPlugin)
            .add_plugins(ui::UiPlugin);
    }
}

// Re-export commonly used types
pub use camera::{MainCamera, OrbitCamera};
pub use types::*;
