//! Applies the selection coordinator to the Bevy world
//!
//! Load reports and sidebar clicks are fed to a [`SelectionCoordinator`];
//! its registry decides which model root is visible and its framer moves
//! the orbit camera. Framing waits until the model's meshes have bounds.

use bevy::prelude::*;
use campus_core::{Registration, SelectionCoordinator};

use crate::bounds::ModelBounds;
use crate::camera::OrbitCamera;
use crate::models::{CampusModel, ModelLoadSet};
use crate::types::{CampusManifest, CampusModelLoaded, SelectLocation};

/// Frames to wait for mesh bounds before framing whatever is measurable
pub const MAX_FRAMING_ATTEMPTS: u32 = 120;

/// The coordinator driving visibility and framing
#[derive(Resource, Default)]
pub struct Coordinator(pub SelectionCoordinator<Entity>);

/// A model that has been shown but not framed yet
#[derive(Debug, Clone, Default, Resource)]
pub struct PendingFraming {
    pub entity: Option<Entity>,
    pub attempts: u32,
}

impl PendingFraming {
    pub fn request(&mut self, entity: Entity) {
        self.entity = Some(entity);
        self.attempts = 0;
    }

    pub fn clear(&mut self) {
        self.entity = None;
        self.attempts = 0;
    }
}

/// Plugin for selection handling
pub struct SelectionPlugin;

impl Plugin for SelectionPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<Coordinator>()
            .init_resource::<PendingFraming>()
            .add_message::<SelectLocation>()
            .add_systems(
                Update,
                (
                    configure_framing,
                    register_loaded_models,
                    apply_selections,
                    apply_pending_framing,
                    sync_model_visibility,
                )
                    .chain()
                    .after(ModelLoadSet),
            );
    }
}

/// Rebuild the coordinator with the manifest's framing parameters
fn configure_framing(manifest: Option<Res<CampusManifest>>, mut coordinator: ResMut<Coordinator>) {
    let Some(manifest) = manifest else {
        return;
    };
    if !manifest.is_added() {
        return;
    }
    if !coordinator.0.registry().is_empty() {
        tracing::warn!("Manifest replaced after models registered, keeping current framing");
        return;
    }
    coordinator.0 = SelectionCoordinator::new(manifest.0.framing);
}

fn register_loaded_models(
    mut loaded: MessageReader<CampusModelLoaded>,
    mut coordinator: ResMut<Coordinator>,
    mut pending: ResMut<PendingFraming>,
) {
    for CampusModelLoaded(event) in loaded.read() {
        let entity = event.handle;
        if coordinator.0.on_model_loaded(event.clone()) == Registration::RegisteredVisible {
            pending.request(entity);
        }
    }
}

fn apply_selections(
    mut selections: MessageReader<SelectLocation>,
    mut coordinator: ResMut<Coordinator>,
    mut pending: ResMut<PendingFraming>,
    mut orbit: ResMut<OrbitCamera>,
    bounds: ModelBounds,
) {
    for SelectLocation(label) in selections.read() {
        let Some(entity) = coordinator.0.registry().get(label).map(|entry| *entry.handle) else {
            tracing::debug!("Ignoring selection of unloaded location: {}", label);
            continue;
        };

        if bounds.is_measurable(entity) {
            coordinator.0.select(label, &bounds, &mut *orbit);
            pending.clear();
        } else {
            coordinator.0.show(label);
            pending.request(entity);
        }
    }
}

fn apply_pending_framing(
    mut pending: ResMut<PendingFraming>,
    coordinator: Res<Coordinator>,
    mut orbit: ResMut<OrbitCamera>,
    bounds: ModelBounds,
) {
    let Some(entity) = pending.entity else {
        return;
    };

    // Superseded by another selection
    let visible = coordinator.0.registry().currently_visible().map(|entry| *entry.handle);
    if visible != Some(entity) {
        pending.clear();
        return;
    }

    pending.attempts += 1;
    let measurable = bounds.is_measurable(entity);
    if !measurable && pending.attempts < MAX_FRAMING_ATTEMPTS {
        return;
    }
    if !measurable {
        tracing::warn!(
            "No mesh bounds after {} frames, framing an empty volume",
            pending.attempts
        );
    }

    coordinator.0.frame_current(&bounds, &mut *orbit);
    pending.clear();
}

/// Show the registry's visible model and hide the rest
fn sync_model_visibility(
    coordinator: Res<Coordinator>,
    mut models: Query<(Entity, &mut Visibility), With<CampusModel>>,
) {
    let visible = coordinator.0.registry().currently_visible().map(|entry| *entry.handle);
    for (entity, mut visibility) in &mut models {
        let wanted = if Some(entity) == visible {
            Visibility::Visible
        } else {
            Visibility::Hidden
        };
        visibility.set_if_neq(wanted);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::camera::primitives::Aabb;
    use campus_core::ModelLoaded;

    fn test_app() -> App {
        let mut app = App::new();
        app.insert_resource(OrbitCamera {
            auto_rotate: false,
            animate_framing: false,
            ..Default::default()
        })
        .add_message::<CampusModelLoaded>()
        .add_plugins(SelectionPlugin);
        app
    }

    /// Spawn a hidden model root, optionally with one measurable mesh child
    fn spawn_model(app: &mut App, label: &str, is_default: bool, mesh: Option<Aabb>) -> Entity {
        let world = app.world_mut();
        let root = world
            .spawn((
                CampusModel {
                    label: label.to_string(),
                    is_default,
                },
                Visibility::Hidden,
            ))
            .id();
        if let Some(aabb) = mesh {
            world.spawn((aabb, GlobalTransform::IDENTITY, ChildOf(root)));
        }
        root
    }

    fn report_loaded(app: &mut App, label: &str, entity: Entity, is_default: bool) {
        app.world_mut().write_message(CampusModelLoaded(ModelLoaded {
            label: label.to_string(),
            handle: entity,
            is_default,
            animation_count: 0,
        }));
    }

    fn visibility(app: &App, entity: Entity) -> Visibility {
        *app.world().get::<Visibility>(entity).unwrap()
    }

    fn field_box() -> Aabb {
        Aabb::from_min_max(Vec3::new(-3.0, -4.0, 0.0), Vec3::new(3.0, 4.0, 0.0))
    }

    #[test]
    fn test_default_model_shown_and_framed() {
        let mut app = test_app();
        let home = spawn_model(&mut app, "Campus Map", true, Some(field_box()));
        report_loaded(&mut app, "Campus Map", home, true);
        app.update();

        assert_eq!(visibility(&app, home), Visibility::Visible);
        let orbit = app.world().resource::<OrbitCamera>();
        assert!((orbit.current.position() - Vec3::new(4.0, 6.0, 4.0)).length() < 1e-3);
        assert!(orbit.current.target.length() < 1e-5);
    }

    #[test]
    fn test_selection_switches_visible_model() {
        let mut app = test_app();
        let home = spawn_model(&mut app, "Campus Map", true, Some(field_box()));
        let clinic = spawn_model(&mut app, "Clinic", false, Some(field_box()));
        report_loaded(&mut app, "Campus Map", home, true);
        report_loaded(&mut app, "Clinic", clinic, false);
        app.update();
        assert_eq!(visibility(&app, clinic), Visibility::Hidden);

        app.world_mut().write_message(SelectLocation::new("Clinic"));
        app.update();
        assert_eq!(visibility(&app, home), Visibility::Hidden);
        assert_eq!(visibility(&app, clinic), Visibility::Visible);
    }

    #[test]
    fn test_late_default_does_not_override_selection() {
        let mut app = test_app();
        let clinic = spawn_model(&mut app, "Clinic", false, Some(field_box()));
        report_loaded(&mut app, "Clinic", clinic, false);
        app.update();
        app.world_mut().write_message(SelectLocation::new("Clinic"));
        app.update();

        let home = spawn_model(&mut app, "Campus Map", true, Some(field_box()));
        report_loaded(&mut app, "Campus Map", home, true);
        app.update();

        assert_eq!(visibility(&app, clinic), Visibility::Visible);
        assert_eq!(visibility(&app, home), Visibility::Hidden);
    }

    #[test]
    fn test_unknown_selection_changes_nothing() {
        let mut app = test_app();
        let home = spawn_model(&mut app, "Campus Map", true, Some(field_box()));
        report_loaded(&mut app, "Campus Map", home, true);
        app.update();
        let before = app.world().resource::<OrbitCamera>().current;

        app.world_mut().write_message(SelectLocation::new("Library"));
        app.update();

        assert_eq!(visibility(&app, home), Visibility::Visible);
        assert_eq!(app.world().resource::<OrbitCamera>().current, before);
    }

    #[test]
    fn test_framing_waits_for_mesh_bounds() {
        let mut app = test_app();
        let home = spawn_model(&mut app, "Campus Map", true, None);
        report_loaded(&mut app, "Campus Map", home, true);
        app.update();

        assert_eq!(visibility(&app, home), Visibility::Visible);
        assert_eq!(app.world().resource::<PendingFraming>().entity, Some(home));

        app.world_mut()
            .spawn((field_box(), GlobalTransform::IDENTITY, ChildOf(home)));
        app.update();

        assert_eq!(app.world().resource::<PendingFraming>().entity, None);
        let orbit = app.world().resource::<OrbitCamera>();
        assert!((orbit.current.position() - Vec3::new(4.0, 6.0, 4.0)).length() < 1e-3);
    }

    #[test]
    fn test_framing_gives_up_after_max_attempts() {
        let mut app = test_app();
        let home = spawn_model(&mut app, "Campus Map", true, None);
        report_loaded(&mut app, "Campus Map", home, true);
        for _ in 0..MAX_FRAMING_ATTEMPTS {
            app.update();
        }

        assert_eq!(app.world().resource::<PendingFraming>().entity, None);
        // Empty volume frames the origin from zero distance
        let orbit = app.world().resource::<OrbitCamera>();
        assert_eq!(orbit.current.distance, 0.0);
    }
}
