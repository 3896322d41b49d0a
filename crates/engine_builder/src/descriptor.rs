//! The descriptor record shared by every artifact kind.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use engine_component::{ComponentRegistry, Entity, RegistryError, Term};

/// Opaque user context attached to a descriptor.
///
/// The runtime stores it alongside the artifact and never looks inside.
#[derive(Clone)]
pub struct Context(Arc<dyn Any + Send + Sync>);

impl Context {
    /// Wrap `value`.
    pub fn new<T: Any + Send + Sync>(value: T) -> Self {
        Self(Arc::new(value))
    }

    /// The context value, if it has type `T`.
    #[must_use]
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.0.downcast_ref()
    }

    /// Returns `true` if both contexts point at the same value.
    #[must_use]
    pub fn ptr_eq(&self, other: &Context) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Context(..)")
    }
}

/// The mutable record a builder owns until it is finalized.
///
/// `terms` is kept in exactly the order terms were added. Nothing in this
/// crate sorts or deduplicates it.
#[derive(Debug, Clone, Default)]
pub struct Descriptor {
    pub name: Option<String>,
    /// Explicit identity for the artifact. When unset the runtime allocates
    /// one.
    pub entity: Option<Entity>,
    pub terms: Vec<Term>,
    pub ctx: Option<Context>,
}

impl Descriptor {
    /// An empty descriptor.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A descriptor holding `terms` and nothing else.
    #[must_use]
    pub fn with_terms(terms: Vec<Term>) -> Self {
        Self {
            terms,
            ..Self::default()
        }
    }

    /// Resolve every term against `registry`, in order.
    ///
    /// On error `self` is left untouched, although types registered before
    /// the failing term stay registered.
    ///
    /// # Errors
    ///
    /// Returns the first [`RegistryError`] hit while resolving.
    pub fn resolve(&mut self, registry: &mut ComponentRegistry) -> Result<(), RegistryError> {
        let terms = self
            .terms
            .iter()
            .map(|term| term.resolved(registry))
            .collect::<Result<Vec<_>, _>>()?;
        self.terms = terms;
        Ok(())
    }

    /// Identities of every term. Unresolved terms are skipped.
    #[must_use]
    pub fn components(&self) -> Vec<Entity> {
        self.terms.iter().filter_map(Term::component).collect()
    }
}
