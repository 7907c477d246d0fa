use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CleanerError {
    /// A required object reference is unset or no longer part of the scene.
    #[error("{operation}: {} not assigned", .missing.join(" and "))]
    MissingReference {
        operation: &'static str,
        missing: Vec<&'static str>,
    },
}
