//! # engine_builder
//!
//! Chainable builders that turn a compile-time component list into a
//! descriptor and submit it to a [`Runtime`].
//!
//! - [`Builder`]: the shared, one-shot descriptor builder.
//! - [`QueryBuilder`], [`ObserverBuilder`], [`SystemBuilder`],
//!   [`PipelineBuilder`]: the per-kind chain surfaces.
//! - [`Phase`] and [`PipelinePlan`]: fixed phase order and the buckets a
//!   pipeline finalize produces.
//! - [`Runtime`]: the factory interface a host implements.
//!
//! ```rust,ignore
//! let movement = world
//!     .system::<(Position, &Velocity)>()
//!     .name("move")?
//!     .kind(Phase::OnUpdate)?
//!     .build()?;
//!
//! let pipeline = world.pipeline().phases([Phase::OnUpdate])?.build()?;
//! assert_eq!(pipeline.plan().buckets()[0].systems, vec![movement.handle()]);
//! ```

pub mod builder;
pub mod descriptor;
pub mod error;
pub mod observer;
pub mod phase;
pub mod pipeline;
pub mod query;
pub mod runtime;
pub mod system;

#[cfg(test)]
mod testing;

pub use builder::{ArtifactKind, Builder, BuilderState};
pub use descriptor::{Context, Descriptor};
pub use error::{BuildError, RuntimeError};
pub use observer::{ON_ADD, ON_REMOVE, ON_SET, Observer, ObserverBuilder, ObserverDesc, ObserverKind};
pub use phase::{Phase, PhaseBucket, PipelinePlan, RegisteredSystem, UnknownPhase};
pub use pipeline::{Pipeline, PipelineBuilder, PipelineDesc, PipelineKind};
pub use query::{CacheKind, Query, QueryBuilder, QueryDesc, QueryKind};
pub use runtime::{Handle, Runtime};
pub use system::{System, SystemBuilder, SystemDesc, SystemKind};
