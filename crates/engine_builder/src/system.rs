//! System builder.
//!
//! A system is a query plus scheduling metadata. Systems run in
//! [`Phase::OnUpdate`] unless told otherwise; [`manual`](Builder::manual)
//! systems belong to no phase and are never picked up by a pipeline.

use std::time::Duration;

use crate::builder::{ArtifactKind, Builder};
use crate::descriptor::Descriptor;
use crate::error::BuildError;
use crate::phase::Phase;
use crate::runtime::{Handle, Runtime};

#[derive(Debug, Clone)]
pub struct SystemDesc {
    pub query: Descriptor,
    pub phase: Option<Phase>,
    /// Minimum time between runs.
    pub interval: Option<Duration>,
    /// Run once every `rate` frames.
    pub rate: Option<u32>,
    pub multi_threaded: bool,
    /// Apply structural changes immediately instead of deferring them.
    pub immediate: bool,
}

impl Default for SystemDesc {
    fn default() -> Self {
        Self {
            query: Descriptor::default(),
            phase: Some(Phase::OnUpdate),
            interval: None,
            rate: None,
            multi_threaded: false,
            immediate: false,
        }
    }
}

#[derive(Debug)]
pub enum SystemKind {}

/// A finalized system.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct System {
    handle: Handle<SystemKind>,
    phase: Option<Phase>,
}

impl System {
    /// Identity of this system.
    #[must_use]
    pub fn handle(&self) -> Handle<SystemKind> {
        self.handle
    }

    /// The phase this system runs in, `None` for manual systems.
    #[must_use]
    pub fn phase(&self) -> Option<Phase> {
        self.phase
    }
}

impl ArtifactKind for SystemKind {
    const NAME: &'static str = "system";

    type Desc = SystemDesc;
    type Artifact = System;

    fn descriptor(desc: &SystemDesc) -> &Descriptor {
        &desc.query
    }

    fn descriptor_mut(desc: &mut SystemDesc) -> &mut Descriptor {
        &mut desc.query
    }

    fn submit<R: Runtime + ?Sized>(runtime: &mut R, desc: SystemDesc) -> Result<System, BuildError> {
        let phase = desc.phase;
        let entity = runtime.create_system(desc)?;
        Ok(System {
            handle: Handle::new(entity),
            phase,
        })
    }
}

pub type SystemBuilder<'w, R> = Builder<'w, R, SystemKind>;

impl<R: Runtime + ?Sized> Builder<'_, R, SystemKind> {
    /// Run this system in `phase`.
    pub fn kind(&mut self, phase: Phase) -> Result<&mut Self, BuildError> {
        self.configure()?.phase = Some(phase);
        Ok(self)
    }

    /// Take this system out of every phase.
    pub fn manual(&mut self) -> Result<&mut Self, BuildError> {
        self.configure()?.phase = None;
        Ok(self)
    }

    /// Run at most once per `interval`.
    pub fn interval(&mut self, interval: Duration) -> Result<&mut Self, BuildError> {
        self.configure()?.interval = Some(interval);
        Ok(self)
    }

    /// Run once every `rate` frames.
    pub fn rate(&mut self, rate: u32) -> Result<&mut Self, BuildError> {
        self.configure()?.rate = Some(rate);
        Ok(self)
    }

    /// Allow the runtime to split this system across threads.
    pub fn multi_threaded(&mut self, enabled: bool) -> Result<&mut Self, BuildError> {
        self.configure()?.multi_threaded = enabled;
        Ok(self)
    }

    /// Apply structural changes as they are made.
    pub fn immediate(&mut self, enabled: bool) -> Result<&mut Self, BuildError> {
        self.configure()?.immediate = enabled;
        Ok(self)
    }
}
