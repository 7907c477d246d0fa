use glam::Mat4;
use id_arena::Arena;

use crate::scene_graph::mesh::{Mesh, MeshId};
use crate::scene_graph::object3d::{Object3D, ObjectId};

/// Relative error above which a TRS decomposition is treated as lossy.
const DECOMPOSITION_TOLERANCE: f32 = 1e-4;

#[derive(Default)]
pub struct Scene {
    pub objects: Arena<Object3D>,
    pub meshes: Arena<Mesh>,
}

impl Scene {
    pub fn new() -> Self {
        Self {
            objects: Arena::new(),
            meshes: Arena::new(),
        }
    }

    pub fn add_object(&mut self, object: Object3D) -> ObjectId {
        self.objects.alloc(object)
    }

    /// Creates an empty root-level object.
    pub fn create_object(&mut self, name: impl Into<String>) -> ObjectId {
        self.add_object(Object3D::named(name))
    }

    pub fn get_object(&self, id: ObjectId) -> Option<&Object3D> {
        self.objects.get(id)
    }

    pub fn get_object_mut(&mut self, id: ObjectId) -> Option<&mut Object3D> {
        self.objects.get_mut(id)
    }

    pub fn contains(&self, id: ObjectId) -> bool {
        self.objects.get(id).is_some()
    }

    pub fn get_object_by_name(&self, name: &str) -> Option<ObjectId> {
        self.objects
            .iter()
            .find(|(_, object)| object.name == name)
            .map(|(id, _)| id)
    }

    pub fn add_mesh(&mut self, mesh: Mesh) -> MeshId {
        self.meshes.alloc(mesh)
    }

    pub fn get_mesh(&self, id: MeshId) -> Option<&Mesh> {
        self.meshes.get(id)
    }

    pub fn parent_of(&self, id: ObjectId) -> Option<ObjectId> {
        self.objects.get(id).and_then(|object| object.parent_id)
    }

    /// Snapshot of the child list, in order.
    pub fn children_of(&self, id: ObjectId) -> Vec<ObjectId> {
        self.objects
            .get(id)
            .map(|object| object.child_ids.clone())
            .unwrap_or_default()
    }

    pub fn mesh_of(&self, id: ObjectId) -> Option<&Mesh> {
        self.objects.get(id).and_then(|object| object.mesh(self))
    }

    /// Objects without a parent, in allocation order.
    pub fn roots(&self) -> Vec<ObjectId> {
        self.objects
            .iter()
            .filter_map(|(id, object)| object.parent_id.is_none().then_some(id))
            .collect()
    }

    /// Returns true if `ancestor` is `id` itself or lies on its parent chain.
    pub fn is_ancestor_of(&self, ancestor: ObjectId, id: ObjectId) -> bool {
        let mut current = Some(id);
        while let Some(current_id) = current {
            if current_id == ancestor {
                return true;
            }
            current = self.parent_of(current_id);
        }
        false
    }

    /// World matrix of an object. Served from the transform's cache and
    /// recomputed along the parent chain when the cache is dirty.
    pub fn world_matrix(&self, id: ObjectId) -> Mat4 {
        let Some(object) = self.objects.get(id) else {
            return Mat4::IDENTITY;
        };

        if !object.transform.is_world_dirty() {
            return object.transform.get_world_matrix();
        }

        let parent_world = object
            .parent_id
            .map(|parent_id| self.world_matrix(parent_id))
            .unwrap_or(Mat4::IDENTITY);
        let world = parent_world * object.transform.get_local_matrix();
        object.transform.set_world_matrix(world);
        world
    }

    /// Invalidates world transforms for an object and all its descendants
    pub fn invalidate_object_hierarchy(&self, object_id: ObjectId) {
        if let Some(object) = self.objects.get(object_id) {
            object.transform.invalidate_world();

            for &child_id in &object.child_ids {
                self.invalidate_object_hierarchy(child_id);
            }
        }
    }

    /// Sets the parent of an object and updates child relationships. The local
    /// transform is kept as is, so the world pose follows the new parent.
    pub fn set_object_parent(&mut self, child_id: ObjectId, new_parent_id: Option<ObjectId>) {
        let Some(old_parent_id) = self.get_object(child_id).map(|child| child.parent_id) else {
            return;
        };
        if old_parent_id == new_parent_id || new_parent_id.is_some_and(|id| !self.contains(id)) {
            return;
        }

        // Remove from old parent's children list
        if let Some(old_parent) = old_parent_id.and_then(|id| self.get_object_mut(id)) {
            old_parent.child_ids.retain(|&id| id != child_id);
        }

        // Set new parent and add to new parent's children list
        if let Some(child) = self.get_object_mut(child_id) {
            child.parent_id = new_parent_id;
        }

        if let Some(new_parent) = new_parent_id.and_then(|id| self.get_object_mut(id)) {
            new_parent.child_ids.push(child_id);
        }

        // Invalidate world transforms for the moved object and its descendants
        self.invalidate_object_hierarchy(child_id);
    }

    /// Reparents an object while keeping its world-space pose by rewriting its
    /// local transform relative to the new parent. Returns whether the object
    /// is a child of `new_parent_id` afterwards.
    ///
    /// A parent with a singular world matrix (zero scale) cannot hold the pose,
    /// so the move is refused.
    pub fn set_object_parent_keep_world(
        &mut self,
        child_id: ObjectId,
        new_parent_id: Option<ObjectId>,
    ) -> bool {
        if !self.contains(child_id) || new_parent_id.is_some_and(|id| !self.contains(id)) {
            return false;
        }
        if self.parent_of(child_id) == new_parent_id {
            return true;
        }

        let world = self.world_matrix(child_id);
        let parent_world = new_parent_id
            .map(|parent_id| self.world_matrix(parent_id))
            .unwrap_or(Mat4::IDENTITY);

        let determinant = parent_world.determinant();
        if determinant == 0.0 || !determinant.is_finite() {
            log::warn!(
                "Cannot move {:?}: new parent {:?} has a degenerate world transform",
                self.get_object(child_id).map(|o| o.name.as_str()),
                new_parent_id
                    .and_then(|id| self.get_object(id))
                    .map(|o| o.name.as_str())
            );
            return false;
        }

        let local = parent_world.inverse() * world;

        if let Some(child) = self.get_object_mut(child_id) {
            child.transform.set_local_matrix(local);

            let tolerance = DECOMPOSITION_TOLERANCE
                * local
                    .to_cols_array()
                    .iter()
                    .fold(1.0_f32, |max, value| max.max(value.abs()));
            if !child.transform.get_local_matrix().abs_diff_eq(local, tolerance) {
                log::debug!("Shear dropped while reparenting {:?}", child.name);
            }
        }

        self.set_object_parent(child_id, new_parent_id);
        true
    }
}

#[cfg(test)]
mod tests {
    use glam::{Quat, Vec3};
    use log::Level;

    use super::*;
    use crate::scene_graph::transform::Transform;
    use crate::test_logger::capture_logs;

    fn set_transform(scene: &mut Scene, id: ObjectId, transform: Transform) {
        if let Some(object) = scene.get_object_mut(id) {
            object.transform = transform;
        }
        scene.invalidate_object_hierarchy(id);
    }

    fn child(scene: &mut Scene, name: &str, parent: ObjectId, transform: Transform) -> ObjectId {
        let id = scene.add_object(Object3D::named(name).with_transform(transform));
        scene.set_object_parent(id, Some(parent));
        id
    }

    #[test]
    fn set_parent_updates_both_sides() {
        let mut scene = Scene::new();
        let a = scene.create_object("A");
        let b = scene.create_object("B");
        let c = child(&mut scene, "C", a, Transform::default());

        scene.set_object_parent(c, Some(b));

        assert_eq!(scene.parent_of(c), Some(b));
        assert!(scene.children_of(a).is_empty());
        assert_eq!(scene.children_of(b), vec![c]);
    }

    #[test]
    fn reparent_to_same_parent_keeps_child_order() {
        let mut scene = Scene::new();
        let root = scene.create_object("Root");
        let first = child(&mut scene, "First", root, Transform::default());
        let second = child(&mut scene, "Second", root, Transform::default());

        scene.set_object_parent_keep_world(first, Some(root));

        assert_eq!(scene.children_of(root), vec![first, second]);
    }

    #[test]
    fn keep_world_reparent_preserves_pose() {
        let mut scene = Scene::new();
        let source = scene.add_object(Object3D::named("Source").with_transform(
            Transform::from_scale_rotation_translation(
                Vec3::splat(2.0),
                Quat::from_rotation_z(0.3),
                Vec3::new(1.0, 2.0, 3.0),
            ),
        ));
        let node = child(
            &mut scene,
            "Node",
            source,
            Transform::from_scale_rotation_translation(
                Vec3::ONE,
                Quat::from_rotation_x(0.5),
                Vec3::new(0.5, -1.0, 2.0),
            ),
        );
        let destination = scene.add_object(Object3D::named("Destination").with_transform(
            Transform::from_scale_rotation_translation(
                Vec3::splat(100.0),
                Quat::from_rotation_y(1.2),
                Vec3::new(-3.0, 0.0, 7.0),
            ),
        ));

        let before = scene.world_matrix(node);
        scene.set_object_parent_keep_world(node, Some(destination));
        let after = scene.world_matrix(node);

        assert_eq!(scene.parent_of(node), Some(destination));
        assert!(before.abs_diff_eq(after, 1e-3), "{before:?} != {after:?}");
    }

    #[test]
    fn reparent_to_none_makes_root() {
        let mut scene = Scene::new();
        let parent = scene.add_object(
            Object3D::named("Parent").with_transform(Transform::from_translation(Vec3::X)),
        );
        let node = child(&mut scene, "Node", parent, Transform::from_translation(Vec3::Y));

        scene.set_object_parent_keep_world(node, None);

        assert_eq!(scene.parent_of(node), None);
        assert!(scene.roots().contains(&node));
        assert!(scene.objects[node]
            .transform
            .translation()
            .abs_diff_eq(Vec3::new(1.0, 1.0, 0.0), 1e-6));
    }

    #[test]
    fn ancestor_check_walks_parent_chain() {
        let mut scene = Scene::new();
        let a = scene.create_object("A");
        let b = child(&mut scene, "B", a, Transform::default());
        let c = child(&mut scene, "C", b, Transform::default());
        let other = scene.create_object("Other");

        assert!(scene.is_ancestor_of(a, c));
        assert!(scene.is_ancestor_of(c, c));
        assert!(!scene.is_ancestor_of(c, a));
        assert!(!scene.is_ancestor_of(other, c));
    }

    #[test]
    fn world_matrix_is_cached_until_invalidated() {
        let mut scene = Scene::new();
        let a = scene.add_object(
            Object3D::named("A").with_transform(Transform::from_translation(Vec3::X)),
        );
        let b = child(&mut scene, "B", a, Transform::from_translation(Vec3::Y));
        assert!(scene.objects[b].transform.is_world_dirty());

        let world = scene.world_matrix(b);

        assert!(!scene.objects[a].transform.is_world_dirty());
        assert!(!scene.objects[b].transform.is_world_dirty());
        assert_eq!(scene.objects[b].transform.get_world_matrix(), world);

        set_transform(&mut scene, a, Transform::from_translation(Vec3::Z));
        assert!(scene.objects[b].transform.is_world_dirty());
        assert!(scene
            .world_matrix(b)
            .abs_diff_eq(Mat4::from_translation(Vec3::new(0.0, 1.0, 1.0)), 1e-6));
    }

    #[test]
    fn reparent_refreshes_cached_world_of_descendants() {
        let mut scene = Scene::new();
        let a = scene.add_object(
            Object3D::named("A").with_transform(Transform::from_translation(Vec3::X)),
        );
        let b = scene.add_object(
            Object3D::named("B").with_transform(Transform::from_translation(Vec3::Z)),
        );
        let node = child(&mut scene, "Node", a, Transform::default());
        let leaf = child(&mut scene, "Leaf", node, Transform::from_translation(Vec3::Y));
        scene.world_matrix(leaf);

        scene.set_object_parent(node, Some(b));

        assert!(scene
            .world_matrix(leaf)
            .abs_diff_eq(Mat4::from_translation(Vec3::new(0.0, 1.0, 1.0)), 1e-6));
    }

    #[test]
    fn zero_scale_parent_refuses_move() {
        let mut scene = Scene::new();
        let source = scene.create_object("Source");
        let node = child(
            &mut scene,
            "Node",
            source,
            Transform::from_translation(Vec3::new(1.0, 2.0, 3.0)),
        );
        let collapsed = scene.add_object(Object3D::named("Collapsed").with_transform(
            Transform::from_scale_rotation_translation(Vec3::ZERO, Quat::IDENTITY, Vec3::ZERO),
        ));

        let (moved, records) =
            capture_logs(|| scene.set_object_parent_keep_world(node, Some(collapsed)));

        assert!(!moved);
        assert_eq!(scene.parent_of(node), Some(source));
        assert_eq!(
            scene.objects[node].transform.translation(),
            Vec3::new(1.0, 2.0, 3.0)
        );
        assert_eq!(
            records.iter().filter(|(level, _)| *level == Level::Warn).count(),
            1
        );
    }

    #[test]
    fn shear_is_dropped_when_reparenting() {
        let mut scene = Scene::new();
        let stretched = scene.add_object(Object3D::named("Stretched").with_transform(
            Transform::from_scale_rotation_translation(
                Vec3::new(1.0, 3.0, 1.0),
                Quat::IDENTITY,
                Vec3::ZERO,
            ),
        ));
        let node = child(
            &mut scene,
            "Node",
            stretched,
            Transform::from_scale_rotation_translation(
                Vec3::ONE,
                Quat::from_rotation_z(std::f32::consts::FRAC_PI_4),
                Vec3::ZERO,
            ),
        );

        let before = scene.world_matrix(node);
        let (moved, records) = capture_logs(|| scene.set_object_parent_keep_world(node, None));
        let after = scene.world_matrix(node);

        // The move still happens; only the sheared part of the pose is lost.
        assert!(moved);
        assert_eq!(scene.parent_of(node), None);
        assert!(!before.abs_diff_eq(after, 1e-3));
        assert!(records.iter().any(|(level, message)| {
            *level == Level::Debug && message.contains("Shear dropped")
        }));
    }

    #[test]
    fn get_object_mut_edits_in_place() {
        let mut scene = Scene::new();
        let id = scene.create_object("Before");

        if let Some(object) = scene.get_object_mut(id) {
            object.name = "After".to_string();
        }

        assert_eq!(scene.get_object_by_name("After"), Some(id));
    }
}
