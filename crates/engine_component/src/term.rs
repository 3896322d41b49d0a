//! Terms: one component reference inside a query, observer, system or
//! pipeline descriptor.

use serde::{Deserialize, Serialize};

use crate::component::{Component, ComponentMeta};
use crate::entity::Entity;
use crate::registry::{ComponentRegistry, RegistryError};

/// How a term accesses its component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum InOut {
    /// Decided at resolution: [`InOut::InOut`] for data components,
    /// [`InOut::None`] for tags.
    #[default]
    Default,
    /// Matched but never accessed (tags, filters).
    None,
    /// Read-only.
    In,
    /// Read-write.
    InOut,
    /// Write-only.
    Out,
}

impl InOut {
    #[must_use]
    pub fn is_read(self) -> bool {
        matches!(self, InOut::In | InOut::InOut)
    }

    #[must_use]
    pub fn is_write(self) -> bool {
        matches!(self, InOut::InOut | InOut::Out)
    }
}

/// How a term combines with its neighbours when matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TermOper {
    #[default]
    And,
    /// Matches if this term or the next `Or` term in the chain matches.
    Or,
    /// The entity must not have the component.
    Not,
    /// The component may be absent on matched entities.
    Optional,
}

/// Where a term looks for its component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TermSource {
    /// The matched entity itself.
    #[default]
    SelfRef,
    /// A fixed entity, e.g. a singleton.
    Entity(Entity),
    /// The first entity found by traversing `relation` upwards.
    Up(Entity),
}

/// The component a term refers to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TermId {
    /// An identity the runtime already knows.
    Entity(Entity),
    /// A Rust type that is resolved against the registry at finalize time.
    Type(ComponentMeta),
}

/// A single term.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Term {
    pub id: TermId,
    pub inout: InOut,
    pub oper: TermOper,
    pub src: TermSource,
}

impl Term {
    #[must_use]
    pub fn new(id: TermId) -> Self {
        Self {
            id,
            inout: InOut::Default,
            oper: TermOper::And,
            src: TermSource::SelfRef,
        }
    }

    /// A term over component type `T` with default access.
    #[must_use]
    pub fn of<T: Component>() -> Self {
        Self::new(TermId::Type(T::meta()))
    }

    #[must_use]
    pub fn from_entity(entity: Entity) -> Self {
        Self::new(TermId::Entity(entity))
    }

    #[must_use]
    pub fn with_inout(mut self, inout: InOut) -> Self {
        self.inout = inout;
        self
    }

    #[must_use]
    pub fn with_oper(mut self, oper: TermOper) -> Self {
        self.oper = oper;
        self
    }

    #[must_use]
    pub fn with_src(mut self, src: TermSource) -> Self {
        self.src = src;
        self
    }

    /// The resolved identity, if this term has been resolved.
    #[must_use]
    pub fn component(&self) -> Option<Entity> {
        match self.id {
            TermId::Entity(entity) => Some(entity),
            TermId::Type(_) => None,
        }
    }

    /// Name of the component type for unresolved terms.
    #[must_use]
    pub fn type_name(&self) -> Option<&'static str> {
        match &self.id {
            TermId::Type(meta) => Some(meta.name),
            TermId::Entity(_) => None,
        }
    }

    #[must_use]
    pub fn is_resolved(&self) -> bool {
        self.component().is_some() && self.inout != InOut::Default
    }

    /// Produce a copy of this term with a runtime identity and a concrete
    /// access mode.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::UnregisteredComponent`] if the component
    /// cannot be resolved: either the type is unknown and auto-registration
    /// is off, or the term names an identity that is not a registered
    /// component.
    pub fn resolved(&self, registry: &mut ComponentRegistry) -> Result<Term, RegistryError> {
        let (entity, is_tag) = match &self.id {
            TermId::Type(meta) => (registry.resolve(meta)?, meta.is_tag()),
            TermId::Entity(entity) => {
                let meta = registry.meta(*entity).ok_or_else(|| {
                    RegistryError::UnregisteredComponent {
                        name: entity.to_string(),
                    }
                })?;
                (*entity, meta.is_tag())
            }
        };
        let inout = match self.inout {
            InOut::Default if is_tag => InOut::None,
            InOut::Default => InOut::InOut,
            other => other,
        };
        Ok(Term {
            id: TermId::Entity(entity),
            inout,
            oper: self.oper,
            src: self.src,
        })
    }
}
