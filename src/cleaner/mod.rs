//! Moves mesh-carrying objects out of nested hierarchies.
//!
//! Step 1 collects every object with a mesh under the original hierarchy into
//! a single container. Step 2 splits objects whose mesh has no vertices off
//! into a second container. Both steps keep world-space poses intact.

pub mod commands;
pub mod error;

use glam::{Quat, Vec3};
use itertools::Itertools;

use crate::config::CleanerConfig;
use crate::scene_graph::{Mesh, Object3D, ObjectId, Scene, Transform};

pub use commands::{CleanerSlots, Command, Slot};
pub use error::CleanerError;

pub const MESHES_CONTAINER_NAME: &str = "Meshes";
pub const EMPTY_CONTAINER_NAME: &str = "0 Vertex - Delete";

/// Objects that changed parent, in visit order.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct MoveReport {
    pub moved: Vec<ObjectId>,
}

impl MoveReport {
    pub fn len(&self) -> usize {
        self.moved.len()
    }

    pub fn is_empty(&self) -> bool {
        self.moved.is_empty()
    }

    pub fn describe(&self, scene: &Scene) -> String {
        self.moved
            .iter()
            .filter_map(|&id| scene.get_object(id))
            .map(|object| object.name.as_str())
            .join(", ")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Destinations {
    pub meshes: ObjectId,
    pub empty: ObjectId,
}

/// Creates the two root-level containers used as move destinations.
pub fn create_destinations(scene: &mut Scene, config: &CleanerConfig) -> Destinations {
    let meshes = scene.add_object(
        Object3D::named(MESHES_CONTAINER_NAME).with_transform(
            Transform::from_scale_rotation_translation(
                Vec3::splat(config.meshes_container_scale),
                Quat::IDENTITY,
                Vec3::ZERO,
            ),
        ),
    );
    let empty = scene.create_object(EMPTY_CONTAINER_NAME);

    log::info!(
        "Created '{MESHES_CONTAINER_NAME}' and '{EMPTY_CONTAINER_NAME}' objects. \
         Don't forget to assign the main parent of the hierarchy to clean up as 'Original'."
    );

    Destinations { meshes, empty }
}

/// Moves every object carrying a mesh under `source` to `destination`.
///
/// Children of a moved object stay attached to it; traversal still descends
/// into them so nested meshes are collected as well.
pub fn move_renderables(
    scene: &mut Scene,
    source: Option<ObjectId>,
    destination: Option<ObjectId>,
) -> Result<MoveReport, CleanerError> {
    let (source, destination) = resolve_references(
        scene,
        "Transfer meshes",
        (Slot::Original, source),
        (Slot::NewTransform, destination),
    )?;

    let mut report = MoveReport::default();
    move_renderables_recursive(scene, source, destination, &mut report);
    Ok(report)
}

fn move_renderables_recursive(
    scene: &mut Scene,
    parent: ObjectId,
    destination: ObjectId,
    report: &mut MoveReport,
) {
    for child_id in scene.children_of(parent) {
        if scene.mesh_of(child_id).is_some() {
            relocate(scene, child_id, destination, report);
        }

        move_renderables_recursive(scene, child_id, destination, report);
    }
}

/// Moves every object under `source` whose mesh has zero vertices to
/// `destination`. A matched object takes its whole subtree along, which is
/// not inspected further.
pub fn move_empty_renderables(
    scene: &mut Scene,
    source: Option<ObjectId>,
    destination: Option<ObjectId>,
) -> Result<MoveReport, CleanerError> {
    let (source, destination) = resolve_references(
        scene,
        "Organize empty meshes",
        (Slot::NewTransform, source),
        (Slot::Empty, destination),
    )?;

    let mut report = MoveReport::default();
    move_empty_renderables_recursive(scene, source, destination, &mut report);
    Ok(report)
}

fn move_empty_renderables_recursive(
    scene: &mut Scene,
    parent: ObjectId,
    destination: ObjectId,
    report: &mut MoveReport,
) {
    for child_id in scene.children_of(parent) {
        if scene.mesh_of(child_id).is_some_and(Mesh::is_empty)
            && relocate(scene, child_id, destination, report)
        {
            continue;
        }

        move_empty_renderables_recursive(scene, child_id, destination, report);
    }
}

/// Reparents `object` under `destination` keeping its world pose. Returns
/// whether the object ends up as a child of `destination`.
fn relocate(
    scene: &mut Scene,
    object: ObjectId,
    destination: ObjectId,
    report: &mut MoveReport,
) -> bool {
    if scene.parent_of(object) == Some(destination) {
        return true;
    }

    if scene.is_ancestor_of(object, destination) {
        log::debug!(
            "Skipping {:?}: destination is inside its own subtree",
            scene.get_object(object).map(|o| o.name.as_str())
        );
        return false;
    }

    if !scene.set_object_parent_keep_world(object, Some(destination)) {
        return false;
    }
    log::debug!(
        "Moved {:?}",
        scene.get_object(object).map(|o| o.name.as_str())
    );
    report.moved.push(object);
    true
}

fn resolve_references(
    scene: &Scene,
    operation: &'static str,
    (source_slot, source): (Slot, Option<ObjectId>),
    (destination_slot, destination): (Slot, Option<ObjectId>),
) -> Result<(ObjectId, ObjectId), CleanerError> {
    let source = source.filter(|&id| scene.contains(id));
    let destination = destination.filter(|&id| scene.contains(id));

    match (source, destination) {
        (Some(source), Some(destination)) => Ok((source, destination)),
        _ => {
            let missing = [(source_slot, source), (destination_slot, destination)]
                .into_iter()
                .filter(|(_, id)| id.is_none())
                .map(|(slot, _)| slot.label())
                .collect();
            let error = CleanerError::MissingReference { operation, missing };
            log::warn!("{error}");
            Err(error)
        }
    }
}
