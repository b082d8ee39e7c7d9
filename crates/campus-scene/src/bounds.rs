//! World-space bounds of spawned models

use bevy::camera::primitives::Aabb;
use bevy::ecs::system::SystemParam;
use bevy::prelude::*;
use campus_core::{BoundingVolume, BoundsProvider};

/// Measures a model from the mesh bounds of its scene hierarchy
#[derive(SystemParam)]
pub struct ModelBounds<'w, 's> {
    children: Query<'w, 's, &'static Children>,
    meshes: Query<'w, 's, (&'static Aabb, &'static GlobalTransform)>,
}

impl ModelBounds<'_, '_> {
    /// True once at least one descendant mesh has computed bounds
    pub fn is_measurable(&self, root: Entity) -> bool {
        std::iter::once(root)
            .chain(self.children.iter_descendants(root))
            .any(|entity| self.meshes.contains(entity))
    }
}

impl BoundsProvider<Entity> for ModelBounds<'_, '_> {
    fn bounds(&self, root: &Entity) -> BoundingVolume {
        let mut volume = BoundingVolume::EMPTY;
        for entity in std::iter::once(*root).chain(self.children.iter_descendants(*root)) {
            let Ok((aabb, transform)) = self.meshes.get(entity) else {
                continue;
            };
            let local = BoundingVolume::new(Vec3::from(aabb.min()), Vec3::from(aabb.max()));
            let world = BoundingVolume::from_points(
                local.corners().map(|corner| transform.transform_point(corner)),
            );
            volume = volume.union(&world);
        }
        volume
    }
}
