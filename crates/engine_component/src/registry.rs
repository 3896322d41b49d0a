//! Component registry: the type→identity map owned by a runtime.
//!
//! Builders never look up identities on their own. They are handed a
//! `&mut ComponentRegistry` by the runtime at finalize time and resolve
//! pending terms through it, registering types on first use when
//! auto-registration is enabled.

use std::collections::HashMap;

use tracing::debug;

use crate::component::{Component, ComponentMeta, ComponentTypeId};
use crate::entity::{Entity, EntityAllocator};

/// Errors produced while resolving component identities.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    /// The type has no runtime identity and auto-registration is disabled.
    #[error("component '{name}' is not registered and auto-registration is disabled")]
    UnregisteredComponent { name: String },
}

/// Maps component types to runtime identities.
///
/// The registry also owns the [`EntityAllocator`] for its runtime, so
/// component identities and artifact handles never collide.
#[derive(Debug)]
pub struct ComponentRegistry {
    allocator: EntityAllocator,
    by_type: HashMap<ComponentTypeId, Entity>,
    by_entity: HashMap<Entity, ComponentMeta>,
    auto_register: bool,
}

impl ComponentRegistry {
    /// Create an empty registry with auto-registration enabled.
    #[must_use]
    pub fn new() -> Self {
        Self {
            allocator: EntityAllocator::new(),
            by_type: HashMap::new(),
            by_entity: HashMap::new(),
            auto_register: true,
        }
    }

    /// Turn auto-registration on or off at construction.
    #[must_use]
    pub fn with_auto_register(mut self, enabled: bool) -> Self {
        self.auto_register = enabled;
        self
    }

    /// Turn auto-registration on or off.
    pub fn set_auto_register(&mut self, enabled: bool) {
        self.auto_register = enabled;
    }

    /// Whether unknown types are registered when first resolved.
    #[must_use]
    pub fn auto_register(&self) -> bool {
        self.auto_register
    }

    /// Register a component type, returning its identity. Registering the
    /// same type twice returns the identity from the first call.
    pub fn register(&mut self, meta: &ComponentMeta) -> Entity {
        if let Some(&entity) = self.by_type.get(&meta.type_id) {
            return entity;
        }
        let entity = self.allocator.allocate();
        self.by_type.insert(meta.type_id, entity);
        self.by_entity.insert(entity, meta.clone());
        debug!(component = meta.name, %entity, "registered component");
        entity
    }

    /// Register component type `T`. See [`register`](Self::register).
    pub fn register_type<T: Component>(&mut self) -> Entity {
        self.register(&T::meta())
    }

    /// Resolve a component type to its identity.
    ///
    /// Unregistered types are registered on the spot unless
    /// auto-registration is disabled.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::UnregisteredComponent`] if the type is
    /// unknown and auto-registration is disabled.
    pub fn resolve(&mut self, meta: &ComponentMeta) -> Result<Entity, RegistryError> {
        if let Some(entity) = self.lookup(meta.type_id) {
            return Ok(entity);
        }
        if !self.auto_register {
            return Err(RegistryError::UnregisteredComponent {
                name: meta.name.to_string(),
            });
        }
        Ok(self.register(meta))
    }

    /// Identity of the type with `type_id`, if registered.
    #[must_use]
    pub fn lookup(&self, type_id: ComponentTypeId) -> Option<Entity> {
        self.by_type.get(&type_id).copied()
    }

    /// Identity of component type `T`, if registered.
    #[must_use]
    pub fn lookup_type<T: Component>(&self) -> Option<Entity> {
        self.lookup(T::component_type_id())
    }

    /// Metadata of the component registered as `entity`.
    #[must_use]
    pub fn meta(&self, entity: Entity) -> Option<&ComponentMeta> {
        self.by_entity.get(&entity)
    }

    /// Returns `true` if `entity` is a registered component.
    #[must_use]
    pub fn contains(&self, entity: Entity) -> bool {
        self.by_entity.contains_key(&entity)
    }

    /// Hand out a fresh identity from the shared allocator.
    pub fn allocate_entity(&mut self) -> Entity {
        self.allocator.allocate()
    }

    /// Keep the allocator from handing out `entity`. Returns `false` if
    /// `entity` is past [`Entity::MAX_RESERVED_ID`].
    #[must_use]
    pub fn reserve_entity(&mut self, entity: Entity) -> bool {
        self.allocator.reserve(entity)
    }

    /// Number of registered component types.
    #[must_use]
    pub fn len(&self) -> usize {
        self.by_type.len()
    }

    /// Returns `true` if no type is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_type.is_empty()
    }

    /// Forget every registered type and restart identity allocation.
    /// The auto-registration setting is kept.
    pub fn reset(&mut self) {
        self.allocator = EntityAllocator::new();
        self.by_type.clear();
        self.by_entity.clear();
    }
}

impl Default for ComponentRegistry {
    fn default() -> Self {
        Self::new()
    }
}
