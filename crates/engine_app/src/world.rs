//! Reference runtime.
//!
//! [`World`] implements the builder factory interface by validating and
//! recording descriptors. It does not store component data or match
//! entities. It owns the component registry and keeps every finalized
//! descriptor so it can be inspected again by handle.

use std::collections::HashMap;

use engine_builder::{
    Descriptor, Handle, ObserverDesc, ObserverKind, PipelineDesc, PipelineKind, QueryDesc,
    QueryKind, RegisteredSystem, Runtime, RuntimeError, SystemDesc, SystemKind,
};
use engine_component::{ComponentRegistry, Entity};
use tracing::{info, warn};

use crate::config::WorldConfig;

/// A stored artifact.
#[derive(Debug)]
enum Record {
    Query(QueryDesc),
    Observer(ObserverDesc),
    System { desc: SystemDesc, sequence: u64 },
    Pipeline(PipelineDesc),
}

/// The in-memory runtime.
#[derive(Debug)]
pub struct World {
    config: WorldConfig,
    registry: ComponentRegistry,
    /// Artifact names, unique across kinds.
    names: HashMap<String, Entity>,
    records: HashMap<Entity, Record>,
    /// System identities in registration order.
    systems: Vec<Entity>,
    next_sequence: u64,
}

impl World {
    #[must_use]
    pub fn new(config: WorldConfig) -> Self {
        let registry = ComponentRegistry::new().with_auto_register(config.auto_register);
        Self {
            config,
            registry,
            names: HashMap::new(),
            records: HashMap::new(),
            systems: Vec::new(),
            next_sequence: 0,
        }
    }

    #[must_use]
    pub fn config(&self) -> &WorldConfig {
        &self.config
    }

    /// Identity of the artifact called `name`.
    #[must_use]
    pub fn lookup(&self, name: &str) -> Option<Entity> {
        self.names.get(name).copied()
    }

    /// Number of finalized artifacts of every kind.
    #[must_use]
    pub fn artifact_count(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn query_desc(&self, handle: Handle<QueryKind>) -> Option<&QueryDesc> {
        match self.records.get(&handle.entity()) {
            Some(Record::Query(desc)) => Some(desc),
            _ => None,
        }
    }

    #[must_use]
    pub fn observer_desc(&self, handle: Handle<ObserverKind>) -> Option<&ObserverDesc> {
        match self.records.get(&handle.entity()) {
            Some(Record::Observer(desc)) => Some(desc),
            _ => None,
        }
    }

    #[must_use]
    pub fn system_desc(&self, handle: Handle<SystemKind>) -> Option<&SystemDesc> {
        match self.records.get(&handle.entity()) {
            Some(Record::System { desc, .. }) => Some(desc),
            _ => None,
        }
    }

    #[must_use]
    pub fn pipeline_desc(&self, handle: Handle<PipelineKind>) -> Option<&PipelineDesc> {
        match self.records.get(&handle.entity()) {
            Some(Record::Pipeline(desc)) => Some(desc),
            _ => None,
        }
    }

    /// Drop every artifact and registered component.
    pub fn clear(&mut self) {
        self.registry.reset();
        self.names.clear();
        self.records.clear();
        self.systems.clear();
        self.next_sequence = 0;
    }

    fn validate_name(&self, name: &str) -> Result<(), RuntimeError> {
        let invalid = |reason: String| RuntimeError::InvalidName {
            name: name.to_string(),
            reason,
        };

        if name.is_empty() {
            return Err(invalid("name is empty".to_string()));
        }
        if let Some(sep) = self
            .config
            .reserved_separators
            .iter()
            .find(|sep| name.contains(sep.as_str()))
        {
            return Err(invalid(format!("contains reserved separator '{sep}'")));
        }
        if name.starts_with(|c: char| c.is_ascii_digit()) {
            return Err(invalid("starts with a digit".to_string()));
        }
        if self.names.contains_key(name) {
            return Err(RuntimeError::DuplicateName(name.to_string()));
        }
        Ok(())
    }

    fn claim_explicit(&mut self, entity: Entity) -> Result<(), RuntimeError> {
        let invalid = |reason: &str| RuntimeError::InvalidEntity {
            entity,
            reason: reason.to_string(),
        };

        if !entity.is_valid() {
            return Err(invalid("invalid entity"));
        }
        if entity.is_builtin() {
            return Err(invalid("reserved for builtins"));
        }
        if self.records.contains_key(&entity) || self.registry.contains(entity) {
            return Err(RuntimeError::EntityInUse(entity));
        }
        if !self.registry.reserve_entity(entity) {
            return Err(invalid("past the reservable range"));
        }
        Ok(())
    }

    /// Validate the name and identity of `desc` and claim an identity.
    fn claim(&mut self, desc: &Descriptor) -> Result<Entity, RuntimeError> {
        if let Some(name) = desc.name.as_deref()
            && let Err(err) = self.validate_name(name)
        {
            warn!(artifact = name, %err, "rejected artifact name");
            return Err(err);
        }

        let entity = match desc.entity {
            Some(entity) => {
                self.claim_explicit(entity).inspect_err(|err| {
                    warn!(%entity, %err, "rejected explicit identity");
                })?;
                entity
            }
            None => self.registry.allocate_entity(),
        };

        if let Some(name) = &desc.name {
            self.names.insert(name.clone(), entity);
        }
        Ok(entity)
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new(WorldConfig::default())
    }
}

impl Runtime for World {
    fn registry(&self) -> &ComponentRegistry {
        &self.registry
    }

    fn registry_mut(&mut self) -> &mut ComponentRegistry {
        &mut self.registry
    }

    fn create_query(&mut self, desc: QueryDesc) -> Result<Entity, RuntimeError> {
        let entity = self.claim(&desc.query)?;
        info!(
            %entity,
            artifact = ?desc.query.name,
            terms = desc.query.terms.len(),
            "created query"
        );
        self.records.insert(entity, Record::Query(desc));
        Ok(entity)
    }

    fn create_observer(&mut self, desc: ObserverDesc) -> Result<Entity, RuntimeError> {
        let entity = self.claim(&desc.query)?;
        info!(
            %entity,
            artifact = ?desc.query.name,
            events = desc.events.len(),
            "created observer"
        );
        self.records.insert(entity, Record::Observer(desc));
        Ok(entity)
    }

    fn create_system(&mut self, desc: SystemDesc) -> Result<Entity, RuntimeError> {
        let entity = self.claim(&desc.query)?;
        let sequence = self.next_sequence;
        self.next_sequence += 1;
        info!(
            %entity,
            artifact = ?desc.query.name,
            phase = ?desc.phase,
            sequence,
            "created system"
        );
        self.systems.push(entity);
        self.records.insert(entity, Record::System { desc, sequence });
        Ok(entity)
    }

    fn create_pipeline(&mut self, desc: PipelineDesc) -> Result<Entity, RuntimeError> {
        let entity = self.claim(&desc.query)?;
        info!(
            %entity,
            artifact = ?desc.query.name,
            buckets = desc.plan.len(),
            "created pipeline"
        );
        self.records.insert(entity, Record::Pipeline(desc));
        Ok(entity)
    }

    fn systems(&self) -> Vec<RegisteredSystem> {
        self.systems
            .iter()
            .filter_map(|entity| match self.records.get(entity) {
                Some(Record::System { desc, sequence }) => Some(RegisteredSystem {
                    entity: *entity,
                    phase: desc.phase,
                    sequence: *sequence,
                }),
                _ => None,
            })
            .collect()
    }
}
