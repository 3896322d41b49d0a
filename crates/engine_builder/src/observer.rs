//! Observer builder.
//!
//! Observers react to events on entities that match their terms. Events are
//! either one of the builtins below or a custom event type registered like
//! a component.

use engine_component::{Component, ComponentRegistry, Entity, RegistryError, TermId};

use crate::builder::{ArtifactKind, Builder};
use crate::descriptor::Descriptor;
use crate::error::BuildError;
use crate::runtime::{Handle, Runtime};

/// Emitted when a matched component is added.
pub const ON_ADD: Entity = Entity::from_raw(1);
/// Emitted when a matched component is removed.
pub const ON_REMOVE: Entity = Entity::from_raw(2);
/// Emitted when a matched component is assigned.
pub const ON_SET: Entity = Entity::from_raw(3);

#[derive(Debug, Clone, Default)]
pub struct ObserverDesc {
    pub query: Descriptor,
    /// Events in the order they were added. Resolved to
    /// [`TermId::Entity`] by the time the runtime sees them.
    pub events: Vec<TermId>,
    /// Fire for entities that already match when the observer is created.
    pub yield_existing: bool,
}

impl ObserverDesc {
    /// Resolved event identities.
    #[must_use]
    pub fn event_ids(&self) -> Vec<Entity> {
        self.events
            .iter()
            .filter_map(|event| match event {
                TermId::Entity(entity) => Some(*entity),
                TermId::Type(_) => None,
            })
            .collect()
    }

    fn resolve_events(&mut self, registry: &mut ComponentRegistry) -> Result<(), RegistryError> {
        for event in &mut self.events {
            if let TermId::Type(meta) = event {
                let entity = registry.resolve(meta)?;
                *event = TermId::Entity(entity);
            }
        }
        Ok(())
    }
}

#[derive(Debug)]
pub enum ObserverKind {}

/// A finalized observer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Observer {
    handle: Handle<ObserverKind>,
}

impl Observer {
    /// Identity of this observer.
    #[must_use]
    pub fn handle(&self) -> Handle<ObserverKind> {
        self.handle
    }
}

impl ArtifactKind for ObserverKind {
    const NAME: &'static str = "observer";

    type Desc = ObserverDesc;
    type Artifact = Observer;

    fn descriptor(desc: &ObserverDesc) -> &Descriptor {
        &desc.query
    }

    fn descriptor_mut(desc: &mut ObserverDesc) -> &mut Descriptor {
        &mut desc.query
    }

    fn submit<R: Runtime + ?Sized>(
        runtime: &mut R,
        mut desc: ObserverDesc,
    ) -> Result<Observer, BuildError> {
        desc.resolve_events(runtime.registry_mut())?;
        let entity = runtime.create_observer(desc)?;
        Ok(Observer {
            handle: Handle::new(entity),
        })
    }
}

pub type ObserverBuilder<'w, R> = Builder<'w, R, ObserverKind>;

impl<R: Runtime + ?Sized> Builder<'_, R, ObserverKind> {
    /// Listen for `event`, e.g. [`ON_ADD`].
    pub fn event(&mut self, event: Entity) -> Result<&mut Self, BuildError> {
        self.configure()?.events.push(TermId::Entity(event));
        Ok(self)
    }

    /// Listen for a custom event type.
    pub fn event_of<E: Component>(&mut self) -> Result<&mut Self, BuildError> {
        self.configure()?.events.push(TermId::Type(E::meta()));
        Ok(self)
    }

    /// Fire for entities that already match when the observer is created.
    pub fn yield_existing(&mut self, enabled: bool) -> Result<&mut Self, BuildError> {
        self.configure()?.yield_existing = enabled;
        Ok(self)
    }
}
