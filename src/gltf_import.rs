use std::collections::HashMap;
use std::path::Path;

use anyhow::Context;
use glam::{Quat, Vec3};
use gltf::mesh::Semantic;

use crate::scene_graph::{Mesh, MeshId, Object3D, ObjectId, Scene, Transform};

/// Loads the default scene of a glTF file and returns its root objects.
pub fn import_gltf(scene: &mut Scene, path: &Path) -> anyhow::Result<Vec<ObjectId>> {
    let gltf = gltf::Gltf::open(path)
        .with_context(|| format!("Failed to open glTF file {}", path.display()))?;
    let roots = import_document(scene, &gltf.document)?;

    log::info!(
        "Imported {} with {} objects and {} meshes",
        path.display(),
        scene.objects.len(),
        scene.meshes.len()
    );

    Ok(roots)
}

pub fn import_document(scene: &mut Scene, document: &gltf::Document) -> anyhow::Result<Vec<ObjectId>> {
    let gltf_scene = document
        .default_scene()
        .or_else(|| document.scenes().next())
        .context("No scenes in gltf")?;

    let mut importer = GltfImporter {
        scene,
        gltf_mesh_to_mesh: HashMap::new(),
    };

    Ok(gltf_scene
        .nodes()
        .map(|node| importer.spawn_node(&node, None))
        .collect())
}

struct GltfImporter<'a> {
    scene: &'a mut Scene,
    gltf_mesh_to_mesh: HashMap<usize, MeshId>,
}

impl GltfImporter<'_> {
    fn spawn_node(&mut self, node: &gltf::Node, parent: Option<ObjectId>) -> ObjectId {
        let node_name = node
            .name()
            .map(String::from)
            .unwrap_or_else(|| format!("Node {}", node.index()));
        let (translation, rotation, scale) = node.transform().decomposed();

        let mut object = Object3D::named(node_name).with_transform(
            Transform::from_scale_rotation_translation(
                Vec3::from(scale),
                Quat::from_array(rotation),
                Vec3::from(translation),
            ),
        );

        if let Some(mesh) = node.mesh() {
            object.mesh_id = Some(self.mesh_for(&mesh, &object.name));
        }

        let object_id = self.scene.add_object(object);

        if let Some(parent_id) = parent {
            self.scene.set_object_parent(object_id, Some(parent_id));
        }

        for child in node.children() {
            self.spawn_node(&child, Some(object_id));
        }

        object_id
    }

    fn mesh_for(&mut self, mesh: &gltf::Mesh, node_name: &str) -> MeshId {
        if let Some(&mesh_id) = self.gltf_mesh_to_mesh.get(&mesh.index()) {
            return mesh_id;
        }

        let mesh_name = mesh
            .name()
            .map(String::from)
            .unwrap_or_else(|| format!("{} (Mesh)", node_name));

        let vertex_count = mesh
            .primitives()
            .map(|primitive| {
                primitive
                    .get(&Semantic::Positions)
                    .map(|accessor| accessor.count())
                    .unwrap_or(0)
            })
            .sum();

        let mesh_id = self.scene.add_mesh(Mesh::new(
            mesh_name,
            vertex_count,
            mesh.primitives().len(),
        ));
        self.gltf_mesh_to_mesh.insert(mesh.index(), mesh_id);

        mesh_id
    }
}
