use anyhow::Context;
use glam::{Quat, Vec3};

use crate::{
    cleaner::{CleanerError, CleanerSlots, Command, MoveReport},
    config::CleanerConfig,
    gltf_import::import_gltf,
    scene_graph::{Mesh, MeshId, Object3D, ObjectId, Scene, Transform},
};

pub struct CleanerState {
    pub config: CleanerConfig,
    pub scene: Scene,
    pub slots: CleanerSlots,
    pub status: Option<String>,
}

impl CleanerState {
    pub fn new(config: CleanerConfig) -> anyhow::Result<Self> {
        let mut scene = Scene::new();

        let roots = match &config.scene_path {
            Some(path) => import_gltf(&mut scene, path)?,
            None => vec![spawn_sample_hierarchy(&mut scene)],
        };

        let original = match &config.original {
            Some(name) => Some(
                scene
                    .get_object_by_name(name)
                    .with_context(|| format!("Object '{name}' not found in scene"))?,
            ),
            None => roots.first().copied(),
        };

        Ok(Self {
            config,
            scene,
            slots: CleanerSlots {
                original,
                ..Default::default()
            },
            status: None,
        })
    }

    pub fn execute(&mut self, command: Command) -> Result<MoveReport, CleanerError> {
        let result = self.slots.execute(&mut self.scene, command, &self.config);

        self.status = Some(match &result {
            Ok(_) if command == Command::CreateDestinations => {
                "Created destination objects".to_string()
            }
            Ok(report) => format!("{}: moved {} object(s)", command.label(), report.len()),
            Err(error) => error.to_string(),
        });

        result
    }
}

/// Runs every cleanup step in order and logs the resulting hierarchy.
pub fn run_headless(config: CleanerConfig) -> anyhow::Result<()> {
    let mut state = CleanerState::new(config)?;

    for command in Command::ALL {
        let report = state.execute(command)?;
        if !report.is_empty() {
            log::debug!("{}: {}", command.label(), report.describe(&state.scene));
        }
    }

    log::info!("Resulting hierarchy:\n{}", format_hierarchy(&state.scene));

    Ok(())
}

pub fn format_hierarchy(scene: &Scene) -> String {
    let mut out = String::new();
    for root in scene.roots() {
        format_object(scene, root, 0, &mut out);
    }
    out
}

fn format_object(scene: &Scene, id: ObjectId, depth: usize, out: &mut String) {
    let Some(object) = scene.get_object(id) else {
        return;
    };

    out.push_str(&"  ".repeat(depth));
    out.push_str(&object.name);
    if let Some(mesh) = object.mesh(scene) {
        out.push_str(&format!(" [{} vertices]", mesh.vertex_count));
    }
    out.push('\n');

    for &child_id in &object.child_ids {
        format_object(scene, child_id, depth + 1, out);
    }
}

/// Builds a small imported-model style hierarchy with meshes buried under
/// empty groups.
fn spawn_sample_hierarchy(scene: &mut Scene) -> ObjectId {
    let cube = scene.add_mesh(Mesh::new("Cube", 24, 1));
    let door = scene.add_mesh(Mesh::new("Door", 128, 2));
    let collider_proxy = scene.add_mesh(Mesh::new("ColliderProxy", 0, 1));

    let root = scene.add_object(Object3D::named("Imported Model").with_transform(
        Transform::from_scale_rotation_translation(
            Vec3::splat(0.01),
            Quat::from_rotation_x(-std::f32::consts::FRAC_PI_2),
            Vec3::ZERO,
        ),
    ));

    let mut spawn = |name: &str, parent: ObjectId, translation: Vec3, mesh: Option<MeshId>| {
        let mut object =
            Object3D::named(name).with_transform(Transform::from_translation(translation));
        object.mesh_id = mesh;
        let id = scene.add_object(object);
        scene.set_object_parent(id, Some(parent));
        id
    };

    let house = spawn("House", root, Vec3::new(200.0, 0.0, 0.0), None);
    let walls = spawn("Walls", house, Vec3::ZERO, None);
    spawn("Wall_North", walls, Vec3::new(0.0, 500.0, 0.0), Some(cube));
    spawn("Wall_South", walls, Vec3::new(0.0, -500.0, 0.0), Some(cube));
    let entrance = spawn("Entrance", house, Vec3::new(0.0, -500.0, 0.0), Some(door));
    spawn("Handle_Socket", entrance, Vec3::new(40.0, 0.0, 100.0), None);
    let proxy = spawn("Door_Proxy", entrance, Vec3::ZERO, Some(collider_proxy));
    spawn("Proxy_Detail", proxy, Vec3::ZERO, None);
    let props = spawn("Props", root, Vec3::new(-300.0, 0.0, 0.0), None);
    spawn("Crate", props, Vec3::ZERO, Some(cube));
    spawn("Spawn_Marker", props, Vec3::new(0.0, 100.0, 0.0), Some(collider_proxy));

    root
}
