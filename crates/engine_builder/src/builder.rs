//! The generic descriptor builder.
//!
//! [`Builder`] owns one pending descriptor and a borrow of the runtime it
//! will be submitted to. The artifact kind parameter `K` selects the
//! descriptor payload and the factory operation, and gates which
//! kind-specific chain calls exist: those live in `impl` blocks on
//! `Builder<'_, R, QueryKind>` and friends, while the term chain below is
//! shared by every kind.
//!
//! Every chain call returns `Result<&mut Self, BuildError>` so calls can be
//! strung together with `?`:
//!
//! ```rust,ignore
//! let query = world
//!     .query::<(Position, &Velocity)>()
//!     .name("movement")?
//!     .with::<Mass>()?
//!     .inout(InOut::In)?
//!     .build()?;
//! ```

use std::fmt;

use engine_component::{Component, Entity, InOut, Signature, Term, TermOper, TermSource};
use tracing::debug;

use crate::descriptor::{Context, Descriptor};
use crate::error::BuildError;
use crate::runtime::Runtime;

/// Lifecycle of a builder. No transition leaves `Finalized`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuilderState {
    /// No chain call has been made and the signature produced no terms.
    Empty,
    Configuring,
    Finalized,
}

/// One kind of artifact a builder can produce.
pub trait ArtifactKind {
    /// Name used in logs.
    const NAME: &'static str;

    /// Kind-specific descriptor payload, wrapping a [`Descriptor`].
    type Desc: Clone + Default + fmt::Debug;

    /// What a successful `build()` returns.
    type Artifact;

    fn descriptor(desc: &Self::Desc) -> &Descriptor;

    fn descriptor_mut(desc: &mut Self::Desc) -> &mut Descriptor;

    /// Submit a descriptor whose terms are already resolved.
    ///
    /// # Errors
    ///
    /// Returns whatever the runtime factory reports.
    fn submit<R: Runtime + ?Sized>(
        runtime: &mut R,
        desc: Self::Desc,
    ) -> Result<Self::Artifact, BuildError>;
}

/// A single-owner, one-shot builder for an artifact of kind `K`.
///
/// Builders are not `Clone`. Moving one moves its pending
/// descriptor, and only one of them can ever be finalized.
pub struct Builder<'w, R: Runtime + ?Sized, K: ArtifactKind> {
    runtime: &'w mut R,
    desc: K::Desc,
    /// Index of the term that term-level calls modify.
    current: Option<usize>,
    state: BuilderState,
}

impl<'w, R: Runtime + ?Sized, K: ArtifactKind> Builder<'w, R, K> {
    /// Create a builder with an empty descriptor.
    pub fn new(runtime: &'w mut R) -> Self {
        Self {
            runtime,
            desc: K::Desc::default(),
            current: None,
            state: BuilderState::Empty,
        }
    }

    /// Create a builder whose descriptor starts with the terms of `S`.
    pub fn with_signature<S: Signature>(runtime: &'w mut R) -> Self {
        let mut builder = Self::new(runtime);
        let terms = S::terms();
        if !terms.is_empty() {
            builder.current = Some(terms.len() - 1);
            builder.state = BuilderState::Configuring;
        }
        K::descriptor_mut(&mut builder.desc).terms = terms;
        builder
    }

    /// Where this builder is in its lifecycle.
    #[must_use]
    pub fn state(&self) -> BuilderState {
        self.state
    }

    /// Returns `true` once `build()` has succeeded.
    #[must_use]
    pub fn is_finalized(&self) -> bool {
        self.state == BuilderState::Finalized
    }

    /// The shared part of the pending descriptor.
    #[must_use]
    pub fn descriptor(&self) -> &Descriptor {
        K::descriptor(&self.desc)
    }

    /// The full kind-specific descriptor.
    #[must_use]
    pub fn desc(&self) -> &K::Desc {
        &self.desc
    }

    /// The runtime this builder submits to.
    #[must_use]
    pub fn runtime(&self) -> &R {
        &*self.runtime
    }

    fn ensure_open(&self) -> Result<(), BuildError> {
        if self.is_finalized() {
            return Err(BuildError::Finalized);
        }
        Ok(())
    }

    /// Mutable access to the kind payload for a chain call.
    pub(crate) fn configure(&mut self) -> Result<&mut K::Desc, BuildError> {
        self.ensure_open()?;
        self.state = BuilderState::Configuring;
        Ok(&mut self.desc)
    }

    // -- Descriptor fields --

    /// Name the artifact. The runtime validates it at finalize.
    pub fn name(&mut self, name: impl Into<String>) -> Result<&mut Self, BuildError> {
        K::descriptor_mut(self.configure()?).name = Some(name.into());
        Ok(self)
    }

    /// Use `entity` as the artifact's identity instead of letting the
    /// runtime allocate one.
    pub fn entity(&mut self, entity: Entity) -> Result<&mut Self, BuildError> {
        K::descriptor_mut(self.configure()?).entity = Some(entity);
        Ok(self)
    }

    /// Attach an opaque user context.
    pub fn ctx(&mut self, ctx: Context) -> Result<&mut Self, BuildError> {
        K::descriptor_mut(self.configure()?).ctx = Some(ctx);
        Ok(self)
    }

    // -- Adding terms --

    /// Append a term. It becomes the current term.
    pub fn term(&mut self, term: Term) -> Result<&mut Self, BuildError> {
        let terms = &mut K::descriptor_mut(self.configure()?).terms;
        terms.push(term);
        let index = terms.len() - 1;
        self.current = Some(index);
        Ok(self)
    }

    /// Append a term over component type `T` with default access.
    pub fn with<T: Component>(&mut self) -> Result<&mut Self, BuildError> {
        self.term(Term::of::<T>())
    }

    /// Append a term over an already registered component identity.
    pub fn with_id(&mut self, component: Entity) -> Result<&mut Self, BuildError> {
        self.term(Term::from_entity(component))
    }

    /// Append a term that excludes entities with `T`.
    pub fn without<T: Component>(&mut self) -> Result<&mut Self, BuildError> {
        self.term(
            Term::of::<T>()
                .with_oper(TermOper::Not)
                .with_inout(InOut::None),
        )
    }

    // -- Term refinement --

    /// Make the term at `index` the current term.
    ///
    /// # Errors
    ///
    /// [`BuildError::EmptyTermChain`] if there are no terms,
    /// [`BuildError::TermIndexOutOfRange`] if `index` is past the end.
    pub fn arg(&mut self, index: usize) -> Result<&mut Self, BuildError> {
        self.ensure_open()?;
        let len = self.descriptor().terms.len();
        if len == 0 {
            return Err(BuildError::EmptyTermChain);
        }
        if index >= len {
            return Err(BuildError::TermIndexOutOfRange { index, len });
        }
        self.current = Some(index);
        self.state = BuilderState::Configuring;
        Ok(self)
    }

    fn current_term(&mut self) -> Result<&mut Term, BuildError> {
        self.ensure_open()?;
        let index = self.current.ok_or(BuildError::EmptyTermChain)?;
        self.state = BuilderState::Configuring;
        K::descriptor_mut(&mut self.desc)
            .terms
            .get_mut(index)
            .ok_or(BuildError::EmptyTermChain)
    }

    /// Set the access mode of the current term.
    pub fn inout(&mut self, inout: InOut) -> Result<&mut Self, BuildError> {
        self.current_term()?.inout = inout;
        Ok(self)
    }

    /// Make the current term read-only.
    pub fn read(&mut self) -> Result<&mut Self, BuildError> {
        self.inout(InOut::In)
    }

    /// Make the current term write-only.
    pub fn write(&mut self) -> Result<&mut Self, BuildError> {
        self.inout(InOut::Out)
    }

    /// Match on the current term without accessing its data.
    pub fn filter(&mut self) -> Result<&mut Self, BuildError> {
        self.inout(InOut::None)
    }

    /// Set where the current term looks for its component.
    pub fn src(&mut self, src: TermSource) -> Result<&mut Self, BuildError> {
        self.current_term()?.src = src;
        Ok(self)
    }

    /// Look the current term up on the target of `relation`, traversing
    /// upwards.
    pub fn up(&mut self, relation: Entity) -> Result<&mut Self, BuildError> {
        self.src(TermSource::Up(relation))
    }

    /// Match the current term on the matched entity itself.
    pub fn self_(&mut self) -> Result<&mut Self, BuildError> {
        self.src(TermSource::SelfRef)
    }

    /// Match the current term against a fixed entity.
    pub fn src_entity(&mut self, entity: Entity) -> Result<&mut Self, BuildError> {
        self.src(TermSource::Entity(entity))
    }

    /// Set the operator of the current term.
    pub fn oper(&mut self, oper: TermOper) -> Result<&mut Self, BuildError> {
        self.current_term()?.oper = oper;
        Ok(self)
    }

    /// Let the current term's component be absent.
    pub fn optional(&mut self) -> Result<&mut Self, BuildError> {
        self.oper(TermOper::Optional)
    }

    /// Exclude entities that have the current term's component.
    pub fn not(&mut self) -> Result<&mut Self, BuildError> {
        self.oper(TermOper::Not)
    }

    /// Chain the current term with the next one as alternatives.
    pub fn or(&mut self) -> Result<&mut Self, BuildError> {
        self.oper(TermOper::Or)
    }

    // -- Finalize --

    /// Validate the descriptor, submit it, and return the artifact.
    ///
    /// On failure no artifact exists and the builder stays open, so the
    /// caller may fix the descriptor and try again.
    ///
    /// # Errors
    ///
    /// - [`BuildError::DuplicateFinalize`] if this builder already built.
    /// - [`BuildError::UnregisteredComponent`] if a term can't be resolved.
    /// - [`BuildError::InvalidName`] or [`BuildError::Runtime`] if the
    ///   runtime rejects the descriptor.
    pub fn build(&mut self) -> Result<K::Artifact, BuildError> {
        if self.is_finalized() {
            return Err(BuildError::DuplicateFinalize);
        }

        let mut desc = self.desc.clone();
        K::descriptor_mut(&mut desc).resolve(self.runtime.registry_mut())?;

        let artifact = K::submit(&mut *self.runtime, desc.clone())?;
        debug!(
            kind = K::NAME,
            artifact = ?K::descriptor(&desc).name,
            terms = K::descriptor(&desc).terms.len(),
            "finalized builder"
        );
        self.desc = desc;
        self.state = BuilderState::Finalized;
        Ok(artifact)
    }
}

impl<R: Runtime + ?Sized, K: ArtifactKind> fmt::Debug for Builder<'_, R, K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Builder")
            .field("kind", &K::NAME)
            .field("desc", &self.desc)
            .field("current", &self.current)
            .field("state", &self.state)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use engine_component::{TermId, TermOper};

    use super::*;
    use crate::query::QueryKind;
    use crate::testing::{ChildOf, Mass, Player, Position, TestRuntime, Velocity};

    fn type_names(desc: &Descriptor) -> Vec<&'static str> {
        desc.terms.iter().filter_map(Term::type_name).collect()
    }

    #[test]
    fn test_signature_terms_in_declaration_order() {
        let mut rt = TestRuntime::new();
        let builder = rt.query::<(Position, &Velocity)>();
        let terms = &builder.descriptor().terms;
        assert_eq!(type_names(builder.descriptor()), vec!["Position", "Velocity"]);
        assert_eq!(terms[0].inout, InOut::InOut);
        assert_eq!(terms[1].inout, InOut::In);
        assert_eq!(terms[0].src, TermSource::SelfRef);
        assert_eq!(terms[1].src, TermSource::SelfRef);
        assert_eq!(builder.state(), BuilderState::Configuring);
    }

    #[test]
    fn test_empty_signature_starts_empty() {
        let mut rt = TestRuntime::new();
        let builder = rt.query::<()>();
        assert!(builder.descriptor().terms.is_empty());
        assert_eq!(builder.state(), BuilderState::Empty);
    }

    #[test]
    fn test_refinement_without_terms_fails() {
        let mut rt = TestRuntime::new();
        let mut builder = rt.query::<()>();
        assert_eq!(builder.inout(InOut::In).unwrap_err(), BuildError::EmptyTermChain);
        assert_eq!(
            builder.src(TermSource::SelfRef).unwrap_err(),
            BuildError::EmptyTermChain
        );
        assert_eq!(builder.optional().unwrap_err(), BuildError::EmptyTermChain);
        assert_eq!(builder.arg(0).unwrap_err(), BuildError::EmptyTermChain);
        assert_eq!(builder.state(), BuilderState::Empty);
    }

    #[test]
    fn test_refinement_applies_to_last_term() {
        let mut rt = TestRuntime::new();
        let parent = rt.registry.register_type::<ChildOf>();
        let mut builder = rt.query::<(Position,)>();
        builder
            .with::<Mass>()
            .unwrap()
            .inout(InOut::In)
            .unwrap()
            .up(parent)
            .unwrap();

        let terms = &builder.descriptor().terms;
        assert_eq!(terms[0].inout, InOut::InOut);
        assert_eq!(terms[0].src, TermSource::SelfRef);
        assert_eq!(terms[1].inout, InOut::In);
        assert_eq!(terms[1].src, TermSource::Up(parent));
    }

    #[test]
    fn test_arg_moves_cursor() {
        let mut rt = TestRuntime::new();
        let mut builder = rt.query::<(Position, Velocity, Mass)>();
        builder.arg(0).unwrap().read().unwrap();
        builder.arg(2).unwrap().optional().unwrap();

        let terms = &builder.descriptor().terms;
        assert_eq!(terms[0].inout, InOut::In);
        assert_eq!(terms[1].inout, InOut::InOut);
        assert_eq!(terms[2].oper, TermOper::Optional);

        assert_eq!(
            builder.arg(3).unwrap_err(),
            BuildError::TermIndexOutOfRange { index: 3, len: 3 }
        );
    }

    #[test]
    fn test_add_term_resets_cursor_to_new_term() {
        let mut rt = TestRuntime::new();
        let mut builder = rt.query::<(Position, Velocity)>();
        builder.arg(0).unwrap();
        builder.without::<Player>().unwrap().self_().unwrap();
        builder.filter().unwrap();

        let terms = &builder.descriptor().terms;
        assert_eq!(terms.len(), 3);
        assert_eq!(terms[0].inout, InOut::InOut);
        assert_eq!(terms[2].oper, TermOper::Not);
        assert_eq!(terms[2].inout, InOut::None);
    }

    #[test]
    fn test_fields_last_write_wins() {
        let mut rt = TestRuntime::new();
        let mut builder = rt.query::<()>();
        builder.name("first").unwrap().name("second").unwrap();
        assert_eq!(builder.descriptor().name.as_deref(), Some("second"));
        assert_eq!(builder.state(), BuilderState::Configuring);
    }

    #[test]
    fn test_build_resolves_and_submits() {
        let mut rt = TestRuntime::new();
        let ctx = Context::new("movement");
        let query = {
            let mut builder = rt.query::<(Position, &Velocity)>();
            builder.name("move").unwrap().ctx(ctx.clone()).unwrap();
            let query = builder.build().unwrap();
            assert!(builder.is_finalized());
            assert!(builder.descriptor().terms.iter().all(Term::is_resolved));
            query
        };

        let (entity, desc) = &rt.queries[0];
        assert_eq!(*entity, query.handle().entity());
        assert_eq!(desc.query.name.as_deref(), Some("move"));
        assert!(desc.query.ctx.as_ref().is_some_and(|c| c.ptr_eq(&ctx)));
        assert_eq!(
            desc.query.components(),
            vec![
                rt.registry.lookup_type::<Position>().unwrap(),
                rt.registry.lookup_type::<Velocity>().unwrap(),
            ]
        );
    }

    #[test]
    fn test_second_build_fails() {
        let mut rt = TestRuntime::new();
        let mut builder = rt.query::<(Position,)>();
        builder.build().unwrap();
        assert_eq!(builder.build().unwrap_err(), BuildError::DuplicateFinalize);
        drop(builder);
        assert_eq!(rt.queries.len(), 1);
    }

    #[test]
    fn test_finalized_builder_rejects_chain_calls() {
        let mut rt = TestRuntime::new();
        let mut builder = rt.query::<(Position,)>();
        builder.build().unwrap();
        assert_eq!(builder.name("late").unwrap_err(), BuildError::Finalized);
        assert_eq!(builder.with::<Mass>().unwrap_err(), BuildError::Finalized);
        assert_eq!(builder.read().unwrap_err(), BuildError::Finalized);
        assert_eq!(builder.state(), BuilderState::Finalized);
    }

    #[test]
    fn test_unregistered_component_fails_at_build() {
        let mut rt = TestRuntime::new();
        rt.registry.set_auto_register(false);
        rt.registry.register_type::<Position>();

        let mut builder = rt.query::<(Position, &Velocity)>();
        assert_eq!(
            builder.build().unwrap_err(),
            BuildError::UnregisteredComponent {
                name: "Velocity".to_string()
            }
        );
        assert_eq!(builder.state(), BuilderState::Configuring);
        assert!(matches!(builder.descriptor().terms[1].id, TermId::Type(_)));
        drop(builder);
        assert!(rt.queries.is_empty());
    }

    #[test]
    fn test_invalid_name_fails_and_builder_can_retry() {
        let mut rt = TestRuntime::new();
        let mut builder = rt.query::<(Position,)>();
        builder.name("bad::name").unwrap();
        assert!(matches!(
            builder.build().unwrap_err(),
            BuildError::InvalidName { .. }
        ));
        builder.name("good").unwrap();
        assert!(builder.build().is_ok());
    }

    #[test]
    fn test_explicit_identity_is_used() {
        let mut rt = TestRuntime::new();
        let chosen = Entity::from_raw(9000);
        let mut builder = rt.query::<()>();
        builder.entity(chosen).unwrap();
        let query = builder.build().unwrap();
        assert_eq!(query.handle().entity(), chosen);
    }

    #[test]
    fn test_moved_builder_keeps_pending_descriptor() {
        let mut rt = TestRuntime::new();
        let mut builder = rt.query::<(Position,)>();
        builder.name("moved").unwrap();
        let mut moved: Builder<'_, TestRuntime, QueryKind> = builder;
        assert_eq!(moved.descriptor().name.as_deref(), Some("moved"));
        assert!(moved.build().is_ok());
    }

    #[test]
    fn test_with_id_requires_registered_component() {
        let mut rt = TestRuntime::new();
        let stray = rt.registry.allocate_entity();
        let mut builder = rt.query::<()>();
        builder.with_id(stray).unwrap();
        assert!(matches!(
            builder.build().unwrap_err(),
            BuildError::UnregisteredComponent { .. }
        ));
    }
}
