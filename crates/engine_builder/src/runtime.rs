//! The descriptor-submission contract between builders and a runtime.
//!
//! A runtime owns the component registry and stores finalized artifacts.
//! Builders only ever talk to it through this trait: they resolve terms via
//! [`Runtime::registry_mut`], then hand the finished descriptor to one of
//! the four factory operations and get an identity back.
//!
//! Finalizing mutates the registry, so a builder holds `&mut R` for its
//! whole life. One builder per runtime can exist at a time.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;

use engine_component::{ComponentRegistry, Entity, Signature};
use serde::{Serialize, Serializer};

use crate::builder::Builder;
use crate::error::RuntimeError;
use crate::observer::{ObserverBuilder, ObserverDesc};
use crate::phase::RegisteredSystem;
use crate::pipeline::{PipelineBuilder, PipelineDesc};
use crate::query::{QueryBuilder, QueryDesc};
use crate::system::{SystemBuilder, SystemDesc};

/// Factory interface implemented by the host runtime.
pub trait Runtime {
    fn registry(&self) -> &ComponentRegistry;

    fn registry_mut(&mut self) -> &mut ComponentRegistry;

    /// # Errors
    ///
    /// Implementations reject descriptors that break their rules, e.g.
    /// [`RuntimeError::InvalidName`].
    fn create_query(&mut self, desc: QueryDesc) -> Result<Entity, RuntimeError>;

    /// # Errors
    ///
    /// See [`Runtime::create_query`].
    fn create_observer(&mut self, desc: ObserverDesc) -> Result<Entity, RuntimeError>;

    /// Create a system. Each successful call must be assigned a sequence
    /// number greater than every earlier one, reported by
    /// [`Runtime::systems`].
    ///
    /// # Errors
    ///
    /// See [`Runtime::create_query`].
    fn create_system(&mut self, desc: SystemDesc) -> Result<Entity, RuntimeError>;

    /// # Errors
    ///
    /// See [`Runtime::create_query`].
    fn create_pipeline(&mut self, desc: PipelineDesc) -> Result<Entity, RuntimeError>;

    /// Every system created so far, with its phase and sequence number.
    fn systems(&self) -> Vec<RegisteredSystem>;

    /// Start a query builder with one term per element of `S`.
    fn query<S: Signature>(&mut self) -> QueryBuilder<'_, Self>
    where
        Self: Sized,
    {
        Builder::with_signature::<S>(self)
    }

    fn observer<S: Signature>(&mut self) -> ObserverBuilder<'_, Self>
    where
        Self: Sized,
    {
        Builder::with_signature::<S>(self)
    }

    fn system<S: Signature>(&mut self) -> SystemBuilder<'_, Self>
    where
        Self: Sized,
    {
        Builder::with_signature::<S>(self)
    }

    fn pipeline(&mut self) -> PipelineBuilder<'_, Self>
    where
        Self: Sized,
    {
        Builder::new(self)
    }
}

/// Identity of a finalized artifact of kind `K`.
///
/// Handles are only created by a successful `build()`, so holding one means
/// the runtime accepted the descriptor.
pub struct Handle<K> {
    entity: Entity,
    kind: PhantomData<fn() -> K>,
}

impl<K> Handle<K> {
    pub(crate) fn new(entity: Entity) -> Self {
        Self {
            entity,
            kind: PhantomData,
        }
    }

    /// The runtime identity behind this handle.
    #[must_use]
    pub fn entity(self) -> Entity {
        self.entity
    }
}

impl<K> Clone for Handle<K> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<K> Copy for Handle<K> {}

impl<K> PartialEq for Handle<K> {
    fn eq(&self, other: &Self) -> bool {
        self.entity == other.entity
    }
}

impl<K> Eq for Handle<K> {}

impl<K> Hash for Handle<K> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.entity.hash(state);
    }
}

impl<K> fmt::Debug for Handle<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Handle").field(&self.entity).finish()
    }
}

impl<K> Serialize for Handle<K> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.entity.serialize(serializer)
    }
}
