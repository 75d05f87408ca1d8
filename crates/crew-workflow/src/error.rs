//! Error types for crew construction and execution

use thiserror::Error;

/// Result type alias for crew-workflow
pub type Result<T> = std::result::Result<T, CrewError>;

/// Errors raised while building or running a crew
#[derive(Error, Debug)]
pub enum CrewError {
    /// A crew needs at least one task
    #[error("Crew has no tasks")]
    EmptyCrew,

    /// No runtime was supplied to the builder
    #[error("Crew has no agent runtime")]
    MissingRuntime,

    /// Hierarchical crews need at least one worker
    #[error("Hierarchical crew has no worker agents")]
    NoWorkers,

    /// The manager's role string also appears in the worker list
    #[error("Manager '{0}' must not be listed among the worker agents")]
    ManagerInWorkers(String),

    /// The manager is not allowed to delegate
    #[error("Manager '{0}' must allow delegation")]
    ManagerCannotDelegate(String),

    /// Two agents share a role string
    #[error("Duplicate agent role '{0}'")]
    DuplicateRole(String),

    /// A task or plan references a role nobody declared
    #[error("Task {task} references unknown agent '{role}'")]
    MissingAgent { task: usize, role: String },

    /// A sequential task has no agent assigned
    #[error("Task {0} has no agent assigned")]
    UnassignedTask(usize),

    /// An ordered delegation plan names a role that is not a worker
    #[error("Delegation plan names unknown worker '{0}'")]
    UnknownPlanRole(String),

    /// A task's context points at itself or a later task
    #[error("Task {task} cannot use task {reference} as context")]
    InvalidContext { task: usize, reference: usize },

    /// Kickoff inputs were not a JSON object
    #[error("Kickoff inputs must be a JSON object")]
    InvalidInputs,

    /// Placeholder interpolation failed
    #[error("Interpolation failed: {0}")]
    Interpolation(#[from] crew_prompt::PromptError),

    /// A task failed while running
    #[error("Task {task} ({role}) failed: {source}")]
    Execution {
        task: usize,
        role: String,
        #[source]
        source: crew_core::Error,
    },
}

impl From<CrewError> for crew_core::Error {
    fn from(err: CrewError) -> Self {
        match err {
            CrewError::Execution { source, .. } => source,
            other => crew_core::Error::ProcessingFailed(other.to_string()),
        }
    }
}
