use crate::cleaner::{
    create_destinations, move_empty_renderables, move_renderables, CleanerError, MoveReport,
};
use crate::config::CleanerConfig;
use crate::scene_graph::{ObjectId, Scene};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    CreateDestinations,
    TransferMeshes,
    OrganizeEmptyMeshes,
}

impl Command {
    pub const ALL: [Command; 3] = [
        Command::CreateDestinations,
        Command::TransferMeshes,
        Command::OrganizeEmptyMeshes,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Command::CreateDestinations => "STEP 0. Fill in Automatically Necessary Variables",
            Command::TransferMeshes => "STEP 1. Transfer Meshes",
            Command::OrganizeEmptyMeshes => "STEP 2. Organize Empty Meshes",
        }
    }

    pub fn tooltip(self) -> &'static str {
        match self {
            Command::CreateDestinations => {
                "Creates 'Meshes' and '0 Vertex - Delete' objects and assigns them to the \
                 New Transform and Empty slots."
            }
            Command::TransferMeshes => {
                "Transfer all objects with meshes from 'Original' to 'New Transform'."
            }
            Command::OrganizeEmptyMeshes => {
                "Move all objects whose mesh has 0 vertices from 'New Transform' to 'Empty'."
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    Original,
    NewTransform,
    Empty,
}

impl Slot {
    pub const ALL: [Slot; 3] = [Slot::Original, Slot::NewTransform, Slot::Empty];

    pub fn label(self) -> &'static str {
        match self {
            Slot::Original => "Original",
            Slot::NewTransform => "New Transform",
            Slot::Empty => "Empty",
        }
    }

    pub fn tooltip(self) -> &'static str {
        match self {
            Slot::Original => "The original hierarchy where objects with meshes are nested.",
            Slot::NewTransform => "The object that objects with meshes are moved under.",
            Slot::Empty => "The object that collects objects with 0-vertex meshes.",
        }
    }

    fn unset_warning(self) -> &'static str {
        match self {
            Slot::Original => {
                "'Original' is not assigned. Assign the main parent of the hierarchy to clean up."
            }
            Slot::NewTransform => {
                "'New Transform' is not assigned. Assign an object to move meshes under."
            }
            Slot::Empty => {
                "'Empty' is not assigned. Assign an object to store 0-vertex meshes."
            }
        }
    }
}

/// The three object references the cleanup steps operate on.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CleanerSlots {
    pub original: Option<ObjectId>,
    pub new_transform: Option<ObjectId>,
    pub empty: Option<ObjectId>,
}

impl CleanerSlots {
    pub fn get(&self, slot: Slot) -> Option<ObjectId> {
        match slot {
            Slot::Original => self.original,
            Slot::NewTransform => self.new_transform,
            Slot::Empty => self.empty,
        }
    }

    pub fn set(&mut self, slot: Slot, id: Option<ObjectId>) {
        match slot {
            Slot::Original => self.original = id,
            Slot::NewTransform => self.new_transform = id,
            Slot::Empty => self.empty = id,
        }
    }

    pub fn missing_slot_warnings(&self, scene: &Scene) -> Vec<&'static str> {
        Slot::ALL
            .into_iter()
            .filter(|&slot| !self.get(slot).is_some_and(|id| scene.contains(id)))
            .map(Slot::unset_warning)
            .collect()
    }

    pub fn execute(
        &mut self,
        scene: &mut Scene,
        command: Command,
        config: &CleanerConfig,
    ) -> Result<MoveReport, CleanerError> {
        match command {
            Command::CreateDestinations => {
                let destinations = create_destinations(scene, config);
                self.new_transform = Some(destinations.meshes);
                self.empty = Some(destinations.empty);
                Ok(MoveReport::default())
            }
            Command::TransferMeshes => {
                let report = move_renderables(scene, self.original, self.new_transform)?;
                log::info!("Transferred {} object(s) with meshes", report.len());
                Ok(report)
            }
            Command::OrganizeEmptyMeshes => {
                let report = move_empty_renderables(scene, self.new_transform, self.empty)?;
                log::info!("Moved {} object(s) with 0-vertex meshes", report.len());
                Ok(report)
            }
        }
    }
}
