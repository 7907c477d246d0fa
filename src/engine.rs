use crate::{app::CleanerState, inspector};

pub fn update(state: &mut CleanerState, ui: &mut imgui::Ui) -> anyhow::Result<()> {
    inspector::draw(ui, state);

    Ok(())
}
