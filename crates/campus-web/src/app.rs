//! Bevy application setup

use bevy::prelude::*;
use bevy_egui::EguiPlugin;
use bevy_picking::DefaultPickingPlugins;
use campus_scene::CampusScenePlugin;

use crate::manifest::ManifestPlugin;

pub fn run() {
    App::new()
        .add_plugins(
            DefaultPlugins
                .set(WindowPlugin {
                    primary_window: Some(Window {
                        title: "Campus Map".to_string(),
                        canvas: Some("#map3d".to_string()),
                        fit_canvas_to_parent: true,
                        prevent_default_event_handling: false,
                        ..default()
                    }),
                    ..default()
                })
                .set(AssetPlugin {
                    // Model paths in the manifest are relative to the page
                    file_path: "".to_string(),
                    // The server has no .meta files
                    meta_check: bevy::asset::AssetMetaCheck::Never,
                    ..default()
                }),
        )
        // Picking must be in place before EguiPlugin so it can detect PickingPlugin
        .add_plugins(DefaultPickingPlugins)
        .add_plugins(EguiPlugin::default())
        .add_plugins(CampusScenePlugin)
        .add_plugins(ManifestPlugin)
        .run();
}
