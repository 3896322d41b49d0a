//! In-crate runtime used by unit tests.

use engine_component::{ComponentRegistry, Entity, component};

use crate::error::RuntimeError;
use crate::observer::ObserverDesc;
use crate::phase::RegisteredSystem;
use crate::pipeline::PipelineDesc;
use crate::query::QueryDesc;
use crate::runtime::Runtime;
use crate::system::SystemDesc;

pub struct Position {
    pub _x: f32,
}
pub struct Velocity {
    pub _x: f32,
}
pub struct Mass {
    pub _kg: f32,
}
pub struct ChildOf;
pub struct Player;

component!(Position, Velocity, Mass, ChildOf, Player);

/// Records every submission. Names containing `::` are rejected.
#[derive(Default)]
pub struct TestRuntime {
    pub registry: ComponentRegistry,
    pub queries: Vec<(Entity, QueryDesc)>,
    pub observers: Vec<(Entity, ObserverDesc)>,
    pub systems: Vec<(Entity, SystemDesc)>,
    pub pipelines: Vec<(Entity, PipelineDesc)>,
}

impl TestRuntime {
    pub fn new() -> Self {
        Self::default()
    }

    fn identity(&mut self, name: Option<&str>, entity: Option<Entity>) -> Result<Entity, RuntimeError> {
        if let Some(name) = name
            && name.contains("::")
        {
            return Err(RuntimeError::InvalidName {
                name: name.to_string(),
                reason: "contains '::'".to_string(),
            });
        }
        Ok(entity.unwrap_or_else(|| self.registry.allocate_entity()))
    }
}

impl Runtime for TestRuntime {
    fn registry(&self) -> &ComponentRegistry {
        &self.registry
    }

    fn registry_mut(&mut self) -> &mut ComponentRegistry {
        &mut self.registry
    }

    fn create_query(&mut self, desc: QueryDesc) -> Result<Entity, RuntimeError> {
        let entity = self.identity(desc.query.name.as_deref(), desc.query.entity)?;
        self.queries.push((entity, desc));
        Ok(entity)
    }

    fn create_observer(&mut self, desc: ObserverDesc) -> Result<Entity, RuntimeError> {
        let entity = self.identity(desc.query.name.as_deref(), desc.query.entity)?;
        self.observers.push((entity, desc));
        Ok(entity)
    }

    fn create_system(&mut self, desc: SystemDesc) -> Result<Entity, RuntimeError> {
        let entity = self.identity(desc.query.name.as_deref(), desc.query.entity)?;
        self.systems.push((entity, desc));
        Ok(entity)
    }

    fn create_pipeline(&mut self, desc: PipelineDesc) -> Result<Entity, RuntimeError> {
        let entity = self.identity(desc.query.name.as_deref(), desc.query.entity)?;
        self.pipelines.push((entity, desc));
        Ok(entity)
    }

    fn systems(&self) -> Vec<RegisteredSystem> {
        self.systems
            .iter()
            .enumerate()
            .map(|(sequence, (entity, desc))| RegisteredSystem {
                entity: *entity,
                phase: desc.phase,
                sequence: sequence as u64,
            })
            .collect()
    }
}
