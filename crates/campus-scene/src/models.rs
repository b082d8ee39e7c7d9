//! glTF model loading, spawning, and animation playback

use bevy::asset::LoadState;
use bevy::prelude::*;
use bevy::scene::{SceneInstance, SceneSpawner};
use campus_core::ModelLoaded;
use std::collections::HashMap;

use crate::types::{CampusManifest, CampusModelLoaded, ModelStatus, ModelStatuses};

/// Root entity of one location's scene
#[derive(Component, Debug, Clone)]
pub struct CampusModel {
    pub label: String,
    pub is_default: bool,
}

/// Marker added once the scene instance is spawned and reported
#[derive(Component)]
pub struct ModelReady;

/// Animation graph built from every clip in the glTF
#[derive(Component, Debug, Clone)]
pub struct ModelAnimations {
    pub graph: Handle<AnimationGraph>,
    pub nodes: Vec<AnimationNodeIndex>,
}

/// Systems that load models and report them ready
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub struct ModelLoadSet;

/// Plugin for model loading
pub struct ModelsPlugin;

impl Plugin for ModelsPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<ModelCache>()
            .init_resource::<ModelStatuses>()
            .add_message::<CampusModelLoaded>()
            .add_systems(
                Update,
                (request_models, load_models, detect_ready_models)
                    .chain()
                    .in_set(ModelLoadSet),
            );
    }
}

/// glTF handles still loading, keyed by location label
#[derive(Resource, Default)]
pub struct ModelCache {
    pub loading: HashMap<String, Handle<Gltf>>,
    /// Load requests have been issued for the manifest
    requested: bool,
}

/// Start loading every location once the manifest is known
fn request_models(
    manifest: Option<Res<CampusManifest>>,
    mut cache: ResMut<ModelCache>,
    mut statuses: ResMut<ModelStatuses>,
    asset_server: Res<AssetServer>,
) {
    let Some(manifest) = manifest else {
        return;
    };
    if cache.requested {
        return;
    }
    cache.requested = true;

    for location in &manifest.0.location {
        tracing::info!("Starting to load model: {} ({})", location.label, location.model);
        let handle: Handle<Gltf> = asset_server.load(location.model.clone());
        cache.loading.insert(location.label.clone(), handle);
        statuses.set(&location.label, ModelStatus::Loading);
    }
}

/// Check loading state and spawn scenes from loaded glTFs
fn load_models(
    mut commands: Commands,
    mut cache: ResMut<ModelCache>,
    mut statuses: ResMut<ModelStatuses>,
    manifest: Option<Res<CampusManifest>>,
    asset_server: Res<AssetServer>,
    gltf_assets: Res<Assets<Gltf>>,
    mut graphs: ResMut<Assets<AnimationGraph>>,
) {
    let Some(manifest) = manifest else {
        return;
    };

    let labels: Vec<String> = cache.loading.keys().cloned().collect();
    for label in labels {
        let Some(handle) = cache.loading.get(&label) else {
            continue;
        };

        match asset_server.get_load_state(handle.id()) {
            Some(LoadState::Loaded) => {
                let Some(gltf) = gltf_assets.get(handle) else {
                    continue;
                };
                let scene = gltf
                    .default_scene
                    .clone()
                    .or_else(|| gltf.scenes.first().cloned());
                let Some(scene) = scene else {
                    tracing::error!("Model for {} has no scenes", label);
                    statuses.set(&label, ModelStatus::Failed);
                    cache.loading.remove(&label);
                    continue;
                };

                let is_default = manifest
                    .0
                    .find(&label)
                    .map(|location| location.default)
                    .unwrap_or(false);

                // Hidden until the registry says otherwise
                let mut entity = commands.spawn((
                    SceneRoot(scene),
                    Transform::default(),
                    Visibility::Hidden,
                    CampusModel {
                        label: label.clone(),
                        is_default,
                    },
                ));

                if !gltf.animations.is_empty() {
                    let (graph, nodes) = AnimationGraph::from_clips(gltf.animations.iter().cloned());
                    entity.insert(ModelAnimations {
                        graph: graphs.add(graph),
                        nodes,
                    });
                }

                tracing::info!("Model loaded, spawning scene: {}", label);
                cache.loading.remove(&label);
            }
            Some(LoadState::Failed(err)) => {
                tracing::error!("Failed to load model for {}: {}", label, err);
                statuses.set(&label, ModelStatus::Failed);
                cache.loading.remove(&label);
            }
            _ => {
                // Still loading
            }
        }
    }
}

/// Play every clip at once, looping forever
fn start_clips(player: &mut AnimationPlayer, nodes: &[AnimationNodeIndex]) {
    for node in nodes {
        player.play(*node).repeat();
    }
}

/// Report models whose scene instance has spawned and start their animations
fn detect_ready_models(
    mut commands: Commands,
    scene_spawner: Res<SceneSpawner>,
    models: Query<
        (Entity, &CampusModel, &SceneInstance, Option<&ModelAnimations>),
        Without<ModelReady>,
    >,
    children: Query<&Children>,
    mut players: Query<&mut AnimationPlayer>,
    mut statuses: ResMut<ModelStatuses>,
    mut loaded: MessageWriter<CampusModelLoaded>,
) {
    for (entity, model, instance, animations) in &models {
        if !scene_spawner.instance_is_ready(**instance) {
            continue;
        }

        let mut animation_count = 0;
        if let Some(animations) = animations {
            for descendant in children.iter_descendants(entity) {
                let Ok(mut player) = players.get_mut(descendant) else {
                    continue;
                };
                start_clips(&mut player, &animations.nodes);
                commands
                    .entity(descendant)
                    .insert(AnimationGraphHandle(animations.graph.clone()));
                animation_count = animations.nodes.len();
            }
        }

        commands.entity(entity).insert(ModelReady);
        statuses.set(&model.label, ModelStatus::Ready);
        loaded.write(CampusModelLoaded(ModelLoaded {
            label: model.label.clone(),
            handle: entity,
            is_default: model.is_default,
            animation_count,
        }));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::animation::RepeatAnimation;
    use campus_core::{Location, LocationManifest};
    use std::time::Duration;

    #[test]
    fn test_clips_play_on_repeat() {
        let mut graph = AnimationGraph::new();
        let root = graph.root;
        let nodes = vec![
            graph.add_clip(Handle::default(), 1.0, root),
            graph.add_clip(Handle::default(), 1.0, root),
        ];

        let mut player = AnimationPlayer::default();
        start_clips(&mut player, &nodes);

        for node in &nodes {
            let active = player.animation(*node).unwrap();
            assert_eq!(active.repeat_mode(), RepeatAnimation::Forever);
        }
    }

    #[derive(Resource, Default)]
    struct LoadedCount(usize);

    fn count_loaded(mut loaded: MessageReader<CampusModelLoaded>, mut count: ResMut<LoadedCount>) {
        count.0 += loaded.read().count();
    }

    #[test]
    fn test_failed_load_marks_unavailable() {
        let mut app = App::new();
        app.add_plugins((MinimalPlugins, AssetPlugin::default()))
            .init_asset::<Gltf>()
            .init_asset::<AnimationGraph>()
            .init_resource::<SceneSpawner>()
            .init_resource::<LoadedCount>()
            .add_plugins(ModelsPlugin)
            .add_systems(Update, count_loaded.after(ModelLoadSet));

        let mut location = Location::new("Gym", "models/no_such_gym.glb");
        location.default = true;
        app.insert_resource(CampusManifest(LocationManifest {
            location: vec![location],
            ..Default::default()
        }));

        for _ in 0..200 {
            app.update();
            if app.world().resource::<ModelStatuses>().get("Gym") == Some(ModelStatus::Failed) {
                break;
            }
            std::thread::sleep(Duration::from_millis(1));
        }
        // A few more frames to catch any late report
        app.update();
        app.update();

        let world = app.world_mut();
        assert_eq!(
            world.resource::<ModelStatuses>().get("Gym"),
            Some(ModelStatus::Failed)
        );
        assert_eq!(world.resource::<LoadedCount>().0, 0);
        assert!(world.resource::<ModelCache>().loading.is_empty());
        let mut models = world.query::<&CampusModel>();
        assert_eq!(models.iter(world).count(), 0);
    }
}
