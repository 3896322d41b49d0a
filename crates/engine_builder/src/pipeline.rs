//! Pipeline builder.
//!
//! A pipeline selects a set of phases. Finalizing it asks the runtime for
//! every registered system and turns them into a [`PipelinePlan`]. A
//! pipeline that names no phase selects all of them.
//!
//! Pipelines carry the shared term chain like every other builder. Those
//! terms are resolved and recorded on the descriptor for the runtime, but
//! system selection goes by phase alone.

use crate::builder::{ArtifactKind, Builder};
use crate::descriptor::Descriptor;
use crate::error::BuildError;
use crate::phase::{Phase, PipelinePlan, compute_plan};
use crate::runtime::{Handle, Runtime};

#[derive(Debug, Clone, Default)]
pub struct PipelineDesc {
    pub query: Descriptor,
    /// Phases as they were added, duplicates included.
    pub phases: Vec<Phase>,
    /// Filled in during finalize, before the runtime sees the descriptor.
    pub plan: PipelinePlan,
}

#[derive(Debug)]
pub enum PipelineKind {}

/// A finalized pipeline and the plan computed for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pipeline {
    handle: Handle<PipelineKind>,
    plan: PipelinePlan,
}

impl Pipeline {
    #[must_use]
    pub fn handle(&self) -> Handle<PipelineKind> {
        self.handle
    }

    #[must_use]
    pub fn plan(&self) -> &PipelinePlan {
        &self.plan
    }

    #[must_use]
    pub fn into_plan(self) -> PipelinePlan {
        self.plan
    }
}

impl ArtifactKind for PipelineKind {
    const NAME: &'static str = "pipeline";

    type Desc = PipelineDesc;
    type Artifact = Pipeline;

    fn descriptor(desc: &PipelineDesc) -> &Descriptor {
        &desc.query
    }

    fn descriptor_mut(desc: &mut PipelineDesc) -> &mut Descriptor {
        &mut desc.query
    }

    fn submit<R: Runtime + ?Sized>(
        runtime: &mut R,
        mut desc: PipelineDesc,
    ) -> Result<Pipeline, BuildError> {
        if desc.phases.is_empty() {
            desc.phases = Phase::ALL.to_vec();
        }
        desc.plan = compute_plan(&desc.phases, &runtime.systems());
        let plan = desc.plan.clone();
        let entity = runtime.create_pipeline(desc)?;
        Ok(Pipeline {
            handle: Handle::new(entity),
            plan,
        })
    }
}

pub type PipelineBuilder<'w, R> = Builder<'w, R, PipelineKind>;

impl<R: Runtime + ?Sized> Builder<'_, R, PipelineKind> {
    /// Select `phase`. Selecting a phase twice has no further effect.
    pub fn phase(&mut self, phase: Phase) -> Result<&mut Self, BuildError> {
        self.configure()?.phases.push(phase);
        Ok(self)
    }

    /// Select every phase in `phases`.
    pub fn phases(
        &mut self,
        phases: impl IntoIterator<Item = Phase>,
    ) -> Result<&mut Self, BuildError> {
        self.configure()?.phases.extend(phases);
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{Mass, Position, TestRuntime};

    fn add_system(rt: &mut TestRuntime, name: &str, phase: Phase) -> Handle<crate::SystemKind> {
        rt.system::<(Position,)>()
            .name(name)
            .unwrap()
            .kind(phase)
            .unwrap()
            .build()
            .unwrap()
            .handle()
    }

    #[test]
    fn test_plan_buckets_follow_phase_order() {
        let mut rt = TestRuntime::new();
        let a = add_system(&mut rt, "a", Phase::OnUpdate);
        let b = add_system(&mut rt, "b", Phase::OnUpdate);
        let c = add_system(&mut rt, "c", Phase::OnUpdate);
        let d = add_system(&mut rt, "d", Phase::OnValidate);
        let e = add_system(&mut rt, "e", Phase::OnValidate);

        let pipeline = rt
            .pipeline()
            .phase(Phase::OnValidate)
            .unwrap()
            .phase(Phase::OnUpdate)
            .unwrap()
            .build()
            .unwrap();

        let buckets = pipeline.plan().buckets();
        assert_eq!(buckets.len(), 2);
        assert_eq!(buckets[0].systems, vec![a, b, c]);
        assert_eq!(buckets[1].systems, vec![d, e]);
        assert_eq!(rt.pipelines[0].1.plan, *pipeline.plan());
    }

    #[test]
    fn test_no_phases_selects_all() {
        let mut rt = TestRuntime::new();
        let late = add_system(&mut rt, "late", Phase::PostFrame);
        let early = add_system(&mut rt, "early", Phase::OnStart);

        let pipeline = rt.pipeline().build().unwrap();
        assert_eq!(pipeline.plan().phases(), vec![Phase::OnStart, Phase::PostFrame]);
        assert_eq!(pipeline.plan().systems().collect::<Vec<_>>(), vec![early, late]);
        assert_eq!(rt.pipelines[0].1.phases, Phase::ALL.to_vec());
    }

    #[test]
    fn test_terms_are_recorded_not_used_for_selection() {
        let mut rt = TestRuntime::new();
        let only = add_system(&mut rt, "only", Phase::OnUpdate);

        let pipeline = rt.pipeline().with::<Mass>().unwrap().build().unwrap();
        assert_eq!(pipeline.plan().systems().collect::<Vec<_>>(), vec![only]);

        let mass = rt.registry.lookup_type::<Mass>().unwrap();
        assert_eq!(rt.pipelines[0].1.query.components(), vec![mass]);
    }

    #[test]
    fn test_phases_extend_keeps_declared_list() {
        let mut rt = TestRuntime::new();
        let mut builder = rt.pipeline();
        builder
            .phases([Phase::OnStore, Phase::OnLoad, Phase::OnStore])
            .unwrap();
        assert_eq!(
            builder.desc().phases,
            vec![Phase::OnStore, Phase::OnLoad, Phase::OnStore]
        );
        assert!(builder.build().unwrap().plan().is_empty());
    }
}
