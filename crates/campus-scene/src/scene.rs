//! Scene setup - camera, lights, and background

use bevy::prelude::*;

use crate::camera::{MainCamera, OrbitCamera};

/// Light grey page background (#e5e5e5)
pub const BACKGROUND: Color = Color::srgb_u8(0xe5, 0xe5, 0xe5);

/// Marker component for the main directional light
#[derive(Component)]
pub struct MainDirectionalLight;

/// Plugin for scene setup
pub struct SceneSetupPlugin;

impl Plugin for SceneSetupPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(ClearColor(BACKGROUND))
            .add_systems(Startup, setup_scene);
    }
}

fn setup_scene(mut commands: Commands, orbit: Res<OrbitCamera>) {
    // Y-up, matching glTF
    commands.spawn((
        Camera3d::default(),
        Projection::Perspective(PerspectiveProjection {
            fov: 75.0_f32.to_radians(),
            near: 0.1,
            far: 1000.0,
            ..default()
        }),
        orbit.transform(),
        // Soft white fill so unlit faces stay readable
        AmbientLight {
            color: Color::WHITE,
            brightness: 300.0,
            ..default()
        },
        MainCamera,
    ));

    commands.spawn((
        DirectionalLight {
            illuminance: 4000.0,
            shadows_enabled: true,
            ..default()
        },
        Transform::from_xyz(5.0, 10.0, 5.0).looking_at(Vec3::ZERO, Vec3::Y),
        MainDirectionalLight,
    ));
}
