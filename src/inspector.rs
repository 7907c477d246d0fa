use glam::EulerRot;
use imgui::{Condition, TreeNodeFlags, Ui};

use crate::{
    app::CleanerState,
    cleaner::{Command, Slot},
    scene_graph::{ObjectId, Scene},
};

const INFO_COLOR: [f32; 4] = [0.6, 0.6, 0.6, 1.0];
const WARNING_COLOR: [f32; 4] = [1.0, 0.75, 0.2, 1.0];

pub fn draw(ui: &Ui, state: &mut CleanerState) {
    ui.window("Hierarchy Cleaner")
        .size([460.0, 680.0], Condition::FirstUseEver)
        .position([16.0, 16.0], Condition::FirstUseEver)
        .build(|| {
            draw_info(ui, state);
            draw_control_variables(ui, state);
            draw_buttons(ui, state);
            ui.separator();
            draw_hierarchy(ui, &state.scene);
        });
}

fn draw_info(ui: &Ui, state: &CleanerState) {
    ui.text_colored(
        INFO_COLOR,
        "Assign 'Original', then run the steps in order. Step 0 creates the two destinations.",
    );

    for warning in state.slots.missing_slot_warnings(&state.scene) {
        ui.text_colored(WARNING_COLOR, warning);
    }
}

fn draw_control_variables(ui: &Ui, state: &mut CleanerState) {
    if !ui.collapsing_header("Control Variables", TreeNodeFlags::DEFAULT_OPEN) {
        return;
    }

    let ids: Vec<ObjectId> = state.scene.objects.iter().map(|(id, _)| id).collect();
    let names: Vec<String> = std::iter::once("<none>".to_string())
        .chain(ids.iter().map(|&id| object_label(&state.scene, id)))
        .collect();

    for slot in Slot::ALL {
        // Index 0 is the "<none>" entry.
        let mut current = state
            .slots
            .get(slot)
            .and_then(|id| ids.iter().position(|&other| other == id))
            .map_or(0, |index| index + 1);

        if ui.combo_simple_string(slot.label(), &mut current, &names) {
            state.slots.set(slot, current.checked_sub(1).map(|index| ids[index]));
        }
        if ui.is_item_hovered() {
            ui.tooltip_text(slot.tooltip());
        }
    }
}

fn draw_buttons(ui: &Ui, state: &mut CleanerState) {
    ui.spacing();

    for command in Command::ALL {
        if ui.button(command.label()) {
            if let Err(error) = state.execute(command) {
                log::debug!("{} failed: {error}", command.label());
            }
        }
        if ui.is_item_hovered() {
            ui.tooltip_text(command.tooltip());
        }
    }

    if let Some(status) = &state.status {
        ui.text_wrapped(status);
    }
}

fn draw_hierarchy(ui: &Ui, scene: &Scene) {
    if !ui.collapsing_header("Hierarchy", TreeNodeFlags::DEFAULT_OPEN) {
        return;
    }

    for root in scene.roots() {
        draw_object(ui, scene, root);
    }
}

fn draw_object(ui: &Ui, scene: &Scene, id: ObjectId) {
    let Some(object) = scene.get_object(id) else {
        return;
    };

    let label = match object.mesh(scene) {
        Some(mesh) => format!(
            "{} [{} vertices]##{}",
            object.name,
            mesh.vertex_count,
            id.index()
        ),
        None => format!("{}##{}", object.name, id.index()),
    };

    let mut flags = TreeNodeFlags::DEFAULT_OPEN | TreeNodeFlags::SPAN_AVAIL_WIDTH;
    if object.child_ids.is_empty() {
        flags |= TreeNodeFlags::LEAF;
    }

    let node = ui.tree_node_config(&label).flags(flags).push();
    if ui.is_item_hovered() {
        draw_transform_tooltip(ui, scene, id);
    }

    if let Some(_node) = node {
        for &child_id in &object.child_ids {
            draw_object(ui, scene, child_id);
        }
    }
}

fn draw_transform_tooltip(ui: &Ui, scene: &Scene, id: ObjectId) {
    let Some(object) = scene.get_object(id) else {
        return;
    };
    let transform = &object.transform;

    let (x, y, z) = transform.rotation().to_euler(EulerRot::XYZ);
    let world_position = scene.world_matrix(id).w_axis.truncate();

    ui.tooltip(|| {
        ui.text(format!("Local position: {:.3}", transform.translation()));
        ui.text(format!(
            "Local rotation: [{:.1}, {:.1}, {:.1}]",
            x.to_degrees(),
            y.to_degrees(),
            z.to_degrees()
        ));
        ui.text(format!("Local scale: {:.3}", transform.scale()));
        ui.text(format!("World position: {:.3}", world_position));

        ui.separator();
        ui.text(format!(
            "Parent: {}",
            object.parent(scene).map_or("<root>", |parent| parent.name.as_str())
        ));
        match object.mesh(scene) {
            Some(mesh) => ui.text(mesh.summary()),
            None => ui.text_colored(INFO_COLOR, "No mesh"),
        }
    });
}

fn object_label(scene: &Scene, id: ObjectId) -> String {
    scene
        .get_object(id)
        .map(|object| format!("{} (#{})", object.name, id.index()))
        .unwrap_or_default()
}
