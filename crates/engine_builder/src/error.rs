//! Builder and runtime error types.

use engine_component::{Entity, RegistryError};

/// Errors a [`Runtime`](crate::Runtime) factory can report for a submitted
/// descriptor.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RuntimeError {
    /// The name breaks the runtime's naming rules.
    #[error("invalid name '{name}': {reason}")]
    InvalidName { name: String, reason: String },

    /// Another artifact already uses this name.
    #[error("name '{0}' is already in use")]
    DuplicateName(String),

    /// The explicit identity already belongs to another artifact.
    #[error("entity {0} is already in use")]
    EntityInUse(Entity),

    /// The explicit identity can never name an artifact: it is the invalid
    /// sentinel, a builtin, or past the reservable range.
    #[error("entity {entity} cannot be used as an artifact identity: {reason}")]
    InvalidEntity { entity: Entity, reason: String },
}

/// Errors reported by builders.
///
/// Structural errors ([`EmptyTermChain`](Self::EmptyTermChain),
/// [`TermIndexOutOfRange`](Self::TermIndexOutOfRange),
/// [`DuplicateFinalize`](Self::DuplicateFinalize),
/// [`Finalized`](Self::Finalized)) are returned by the offending chain call.
/// The rest come from `build()`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BuildError {
    #[error("term operation requires at least one term")]
    EmptyTermChain,

    #[error("term index {index} out of range for {len} terms")]
    TermIndexOutOfRange { index: usize, len: usize },

    #[error("builder was already finalized")]
    DuplicateFinalize,

    /// A chain call was made on a builder that has been finalized.
    #[error("builder is finalized and can no longer be modified")]
    Finalized,

    #[error("component '{name}' is not registered and auto-registration is disabled")]
    UnregisteredComponent { name: String },

    #[error("invalid name '{name}': {reason}")]
    InvalidName { name: String, reason: String },

    #[error(transparent)]
    Runtime(RuntimeError),
}

impl From<RegistryError> for BuildError {
    fn from(err: RegistryError) -> Self {
        match err {
            RegistryError::UnregisteredComponent { name } => {
                BuildError::UnregisteredComponent { name }
            }
        }
    }
}

impl From<RuntimeError> for BuildError {
    fn from(err: RuntimeError) -> Self {
        match err {
            RuntimeError::InvalidName { name, reason } => BuildError::InvalidName { name, reason },
            other => BuildError::Runtime(other),
        }
    }
}
