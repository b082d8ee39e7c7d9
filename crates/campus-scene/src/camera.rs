//! Orbit camera controls and navigation

use bevy::input::mouse::{AccumulatedMouseMotion, AccumulatedMouseScroll, MouseScrollUnit};
use bevy::math::primitives::InfinitePlane3d;
use bevy::prelude::*;
use bevy::window::PrimaryWindow;
use campus_core::orbit::ELEVATION_LIMIT;
use campus_core::{CameraPose, CameraRig, OrbitState};

/// Starting camera position before the home model is framed
pub const INITIAL_POSITION: Vec3 = Vec3::new(0.0, 15.0, 30.0);

/// Orbit controller state.
///
/// `current` is what the camera renders; `goal` is where input and framing
/// send it. Every frame `current` eases towards `goal`.
#[derive(Debug, Clone, Resource)]
pub struct OrbitCamera {
    pub current: OrbitState,
    pub goal: OrbitState,
    pub sensitivity: f32,
    pub zoom_speed: f32,
    pub smooth_factor: f32,
    /// Slowly spin around the target while idle
    pub auto_rotate: bool,
    /// Full turns per minute, as OrbitControls counts it
    pub auto_rotate_speed: f32,
    pub min_distance: f32,
    pub max_distance: f32,
    /// Ease into framing poses instead of jumping
    pub animate_framing: bool,
}

impl Default for OrbitCamera {
    fn default() -> Self {
        let start = OrbitState::from_pose(&CameraPose::new(INITIAL_POSITION, Vec3::ZERO));
        Self {
            current: start,
            goal: start,
            sensitivity: 0.005,
            zoom_speed: 0.8,
            smooth_factor: 0.05,
            auto_rotate: true,
            auto_rotate_speed: 0.2,
            min_distance: 0.5,
            max_distance: 1000.0,
            animate_framing: true,
        }
    }
}

impl CameraRig for OrbitCamera {
    fn apply_pose(&mut self, pose: &CameraPose) {
        let mut goal = OrbitState::from_pose(pose);
        // Ease along the shorter way round
        goal.azimuth = self.current.azimuth + wrap_angle(goal.azimuth - self.current.azimuth);
        self.goal = goal;
        if !self.animate_framing {
            self.current = goal;
        }
    }
}

impl OrbitCamera {
    /// Orbit by a pointer drag, in pixels
    pub fn orbit(&mut self, drag: Vec2) {
        self.goal
            .rotate(-drag.x * self.sensitivity, drag.y * self.sensitivity);
    }

    /// Move the pivot across the ground plane by a pointer drag, in pixels.
    ///
    /// Vertical drags slide along the horizontal view direction, so the
    /// pivot never changes height.
    pub fn pan(&mut self, drag: Vec2) {
        let direction = self.current.direction();
        let right = Vec3::Y.cross(direction).normalize_or_zero();
        let forward = Vec3::new(-direction.x, 0.0, -direction.z).normalize_or_zero();
        let speed = self.goal.distance.max(self.min_distance) * 0.002;
        self.goal.target += (-right * drag.x + forward * drag.y) * speed;
    }

    /// Zoom by wheel lines; positive zooms in.
    ///
    /// With a `focus` point (the world point under the cursor) the whole rig
    /// scales about it, so that point stays put on screen.
    pub fn zoom(&mut self, lines: f32, focus: Option<Vec3>) {
        let factor = (1.0 - lines * self.zoom_speed * 0.1).max(0.1);
        let old_distance = self.goal.distance;
        self.goal.distance = (old_distance * factor).clamp(self.min_distance, self.max_distance);

        if let Some(focus) = focus {
            if old_distance > f32::EPSILON {
                let scale = self.goal.distance / old_distance;
                self.goal.target = focus + (self.goal.target - focus) * scale;
            }
        }
    }

    /// Scale the distance directly (pinch gestures)
    pub fn zoom_by(&mut self, factor: f32) {
        self.goal.distance = (self.goal.distance * factor).clamp(self.min_distance, self.max_distance);
    }

    /// Advance damping and auto-rotation by `dt` seconds
    pub fn step(&mut self, dt: f32, idle: bool) {
        if self.auto_rotate && idle {
            let turn = std::f32::consts::TAU / 60.0 * self.auto_rotate_speed * dt;
            self.goal.azimuth += turn;
            self.current.azimuth += turn;
        }

        let t = 1.0 - (-self.smooth_factor * 60.0 * dt).exp();
        self.current.target = self.current.target.lerp(self.goal.target, t);
        self.current.distance += (self.goal.distance - self.current.distance) * t;
        self.current.azimuth += (self.goal.azimuth - self.current.azimuth) * t;
        self.current.elevation += (self.goal.elevation - self.current.elevation) * t;
        self.current.elevation = self.current.elevation.clamp(-ELEVATION_LIMIT, ELEVATION_LIMIT);
    }

    pub fn transform(&self) -> Transform {
        Transform::from_translation(self.current.position()).looking_at(self.current.target, Vec3::Y)
    }
}

/// Wrap an angle into (-PI, PI]
fn wrap_angle(angle: f32) -> f32 {
    let wrapped = angle.rem_euclid(std::f32::consts::TAU);
    if wrapped > std::f32::consts::PI {
        wrapped - std::f32::consts::TAU
    } else {
        wrapped
    }
}

/// World point under `cursor`, on the plane through `pivot` facing the camera
fn cursor_focus(
    camera: &Camera,
    transform: &GlobalTransform,
    cursor: Vec2,
    pivot: Vec3,
) -> Option<Vec3> {
    let ray = camera.viewport_to_world(transform, cursor).ok()?;
    let plane = InfinitePlane3d {
        normal: transform.forward(),
    };
    let distance = ray.intersect_plane(pivot, plane)?;
    Some(ray.get_point(distance))
}

/// Marker component for the main camera
#[derive(Component)]
pub struct MainCamera;

/// Plugin for camera controls
pub struct CameraPlugin;

impl Plugin for CameraPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<OrbitCamera>()
            .add_systems(Update, (handle_camera_input, update_camera).chain());
    }
}

fn handle_camera_input(
    mut orbit: ResMut<OrbitCamera>,
    mouse_motion: Res<AccumulatedMouseMotion>,
    mouse_scroll: Res<AccumulatedMouseScroll>,
    mouse_button: Res<ButtonInput<MouseButton>>,
    touch_input: Res<Touches>,
    windows: Query<&Window, With<PrimaryWindow>>,
    cameras: Query<(&Camera, &GlobalTransform), With<MainCamera>>,
    mut contexts: bevy_egui::EguiContexts,
) {
    // Leave the pointer to egui while it's over the sidebar
    let egui_wants_pointer = contexts
        .ctx_mut()
        .map(|ctx| ctx.wants_pointer_input() || ctx.is_pointer_over_area())
        .unwrap_or(false);
    if egui_wants_pointer {
        return;
    }

    let motion = mouse_motion.delta;
    if mouse_button.pressed(MouseButton::Left) {
        orbit.orbit(motion);
    }
    if mouse_button.pressed(MouseButton::Right) {
        orbit.pan(motion);
    }

    if mouse_scroll.delta.y != 0.0 {
        let lines = match mouse_scroll.unit {
            MouseScrollUnit::Line => mouse_scroll.delta.y,
            MouseScrollUnit::Pixel => mouse_scroll.delta.y / 100.0,
        };
        let focus = windows
            .single()
            .ok()
            .and_then(|window| window.cursor_position())
            .zip(cameras.single().ok())
            .and_then(|(cursor, (camera, transform))| {
                cursor_focus(camera, transform, cursor, orbit.current.target)
            });
        orbit.zoom(lines, focus);
    }

    // One finger orbits, two fingers pinch-zoom
    let touches: Vec<_> = touch_input.iter().collect();
    match touches.as_slice() {
        [touch] => {
            let delta = touch.delta();
            if delta != Vec2::ZERO {
                orbit.orbit(delta);
            }
        }
        [t1, t2] => {
            let curr_dist = t1.position().distance(t2.position());
            let prev_dist = (t1.position() - t1.delta()).distance(t2.position() - t2.delta());
            orbit.zoom_by(prev_dist / curr_dist.max(1.0));
        }
        _ => {}
    }
}

fn update_camera(
    mut orbit: ResMut<OrbitCamera>,
    mut camera_query: Query<&mut Transform, With<MainCamera>>,
    mouse_button: Res<ButtonInput<MouseButton>>,
    touch_input: Res<Touches>,
    time: Res<Time>,
) {
    let idle = !mouse_button.any_pressed([MouseButton::Left, MouseButton::Right])
        && touch_input.iter().next().is_none();
    orbit.step(time.delta_secs(), idle);

    if let Ok(mut transform) = camera_query.single_mut() {
        *transform = orbit.transform();
    }
}
