//! Builtin pipeline phases and plan computation.
//!
//! Phases are a fixed, totally ordered set. A pipeline selects some of them,
//! and finalizing it groups every system into the bucket of its phase:
//!
//! ```text
//! OnStart → PreFrame → OnLoad → PostLoad → PreUpdate → OnUpdate
//!         → OnValidate → PostUpdate → PreStore → OnStore → PostFrame
//! ```
//!
//! Buckets follow phase order no matter which order the pipeline listed its
//! phases in. Systems inside a bucket follow registration order. Phases that
//! match no system are left out of the plan.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use engine_component::Entity;
use serde::{Deserialize, Serialize};

use crate::runtime::Handle;
use crate::system::SystemKind;

/// A builtin pipeline phase. The derived `Ord` is execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Phase {
    OnStart,
    PreFrame,
    OnLoad,
    PostLoad,
    PreUpdate,
    OnUpdate,
    OnValidate,
    PostUpdate,
    PreStore,
    OnStore,
    PostFrame,
}

impl Phase {
    /// Every phase, in execution order.
    pub const ALL: [Phase; 11] = [
        Phase::OnStart,
        Phase::PreFrame,
        Phase::OnLoad,
        Phase::PostLoad,
        Phase::PreUpdate,
        Phase::OnUpdate,
        Phase::OnValidate,
        Phase::PostUpdate,
        Phase::PreStore,
        Phase::OnStore,
        Phase::PostFrame,
    ];

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Phase::OnStart => "OnStart",
            Phase::PreFrame => "PreFrame",
            Phase::OnLoad => "OnLoad",
            Phase::PostLoad => "PostLoad",
            Phase::PreUpdate => "PreUpdate",
            Phase::OnUpdate => "OnUpdate",
            Phase::OnValidate => "OnValidate",
            Phase::PostUpdate => "PostUpdate",
            Phase::PreStore => "PreStore",
            Phase::OnStore => "OnStore",
            Phase::PostFrame => "PostFrame",
        }
    }

    /// Position of this phase in [`Phase::ALL`].
    #[must_use]
    pub fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown phase '{0}'")]
pub struct UnknownPhase(pub String);

impl FromStr for Phase {
    type Err = UnknownPhase;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Phase::ALL
            .into_iter()
            .find(|phase| phase.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownPhase(s.to_string()))
    }
}

/// A system as reported by [`Runtime::systems`](crate::Runtime::systems).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegisteredSystem {
    pub entity: Entity,
    /// `None` for systems that only run when invoked manually.
    pub phase: Option<Phase>,
    /// Registration order. Strictly increasing across systems.
    pub sequence: u64,
}

/// The systems of one phase, in registration order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PhaseBucket {
    pub phase: Phase,
    pub systems: Vec<Handle<SystemKind>>,
}

/// Ordered phase buckets produced by finalizing a pipeline.
///
/// Plans, and the system handles inside them, only come out of a
/// pipeline `build()`. There is no public way to compute one from
/// arbitrary entities:
///
/// ```compile_fail
/// use engine_builder::phase::compute_plan;
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PipelinePlan {
    buckets: Vec<PhaseBucket>,
}

impl PipelinePlan {
    #[must_use]
    pub fn buckets(&self) -> &[PhaseBucket] {
        &self.buckets
    }

    #[must_use]
    pub fn bucket(&self, phase: Phase) -> Option<&PhaseBucket> {
        self.buckets.iter().find(|bucket| bucket.phase == phase)
    }

    /// Phases that made it into the plan, in execution order.
    #[must_use]
    pub fn phases(&self) -> Vec<Phase> {
        self.buckets.iter().map(|bucket| bucket.phase).collect()
    }

    /// Every system in execution order.
    pub fn systems(&self) -> impl Iterator<Item = Handle<SystemKind>> + '_ {
        self.buckets
            .iter()
            .flat_map(|bucket| bucket.systems.iter().copied())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }
}

/// Group `systems` into buckets for the selected `phases`.
///
/// Duplicate phases collapse into one bucket, systems without a phase or
/// with an unselected phase are skipped, and empty buckets are omitted.
#[must_use]
pub(crate) fn compute_plan(phases: &[Phase], systems: &[RegisteredSystem]) -> PipelinePlan {
    let selected: BTreeSet<Phase> = phases.iter().copied().collect();

    let mut ordered: Vec<&RegisteredSystem> = systems.iter().collect();
    ordered.sort_by_key(|system| system.sequence);

    let buckets = selected
        .into_iter()
        .filter_map(|phase| {
            let members: Vec<Handle<SystemKind>> = ordered
                .iter()
                .filter(|system| system.phase == Some(phase))
                .map(|system| Handle::new(system.entity))
                .collect();
            if members.is_empty() {
                None
            } else {
                Some(PhaseBucket {
                    phase,
                    systems: members,
                })
            }
        })
        .collect();

    PipelinePlan { buckets }
}
