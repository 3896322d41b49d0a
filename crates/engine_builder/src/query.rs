//! Query builder.

use serde::{Deserialize, Serialize};

use crate::builder::{ArtifactKind, Builder};
use crate::descriptor::Descriptor;
use crate::error::BuildError;
use crate::runtime::{Handle, Runtime};

/// Caching policy the runtime should apply to a query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CacheKind {
    /// Let the runtime decide.
    #[default]
    Default,
    /// Cache the terms that can be cached.
    Auto,
    /// Cache the whole query.
    All,
    /// Never cache.
    None,
}

#[derive(Debug, Clone, Default)]
pub struct QueryDesc {
    pub query: Descriptor,
    pub cache: CacheKind,
}

/// Marker for query artifacts.
#[derive(Debug)]
pub enum QueryKind {}

/// A finalized query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Query {
    handle: Handle<QueryKind>,
}

impl Query {
    /// Identity of this query.
    #[must_use]
    pub fn handle(&self) -> Handle<QueryKind> {
        self.handle
    }
}

impl ArtifactKind for QueryKind {
    const NAME: &'static str = "query";

    type Desc = QueryDesc;
    type Artifact = Query;

    fn descriptor(desc: &QueryDesc) -> &Descriptor {
        &desc.query
    }

    fn descriptor_mut(desc: &mut QueryDesc) -> &mut Descriptor {
        &mut desc.query
    }

    fn submit<R: Runtime + ?Sized>(runtime: &mut R, desc: QueryDesc) -> Result<Query, BuildError> {
        let entity = runtime.create_query(desc)?;
        Ok(Query {
            handle: Handle::new(entity),
        })
    }
}

pub type QueryBuilder<'w, R> = Builder<'w, R, QueryKind>;

impl<R: Runtime + ?Sized> Builder<'_, R, QueryKind> {
    /// Set the caching policy.
    pub fn cache_kind(&mut self, cache: CacheKind) -> Result<&mut Self, BuildError> {
        self.configure()?.cache = cache;
        Ok(self)
    }

    /// Cache the whole query.
    pub fn cached(&mut self) -> Result<&mut Self, BuildError> {
        self.cache_kind(CacheKind::All)
    }
}
