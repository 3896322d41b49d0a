//! Runtime identities.
//!
//! Everything the runtime hands out an identity for (registered component
//! types, queries, observers, systems, pipelines) is named by an [`Entity`].
//! The low ID range is reserved for builtins such as observer events.

use serde::{Deserialize, Serialize};

/// A runtime identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Entity(pub u64);

impl Entity {
    /// The null / invalid entity sentinel.
    pub const INVALID: Entity = Entity(0);

    /// First ID handed out by an [`EntityAllocator`]. IDs below this are
    /// reserved for builtins.
    pub const FIRST_USER_ID: u64 = 256;

    /// Highest ID a caller may reserve explicitly. Everything above stays
    /// available to the allocator.
    pub const MAX_RESERVED_ID: u64 = u64::MAX >> 1;

    /// Wrap a raw ID.
    #[must_use]
    pub const fn from_raw(id: u64) -> Self {
        Self(id)
    }

    /// The raw ID.
    #[must_use]
    pub const fn id(self) -> u64 {
        self.0
    }

    /// Returns `false` for [`Entity::INVALID`].
    #[must_use]
    pub const fn is_valid(self) -> bool {
        self.0 != 0
    }

    /// Returns `true` if this ID lies in the reserved builtin range.
    #[must_use]
    pub const fn is_builtin(self) -> bool {
        self.0 != 0 && self.0 < Self::FIRST_USER_ID
    }
}

impl std::fmt::Display for Entity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Allocates monotonically increasing identities above the builtin range.
#[derive(Debug, Clone)]
pub struct EntityAllocator {
    next_id: u64,
}

impl EntityAllocator {
    /// An allocator whose first identity is [`Entity::FIRST_USER_ID`].
    #[must_use]
    pub fn new() -> Self {
        Self {
            next_id: Entity::FIRST_USER_ID,
        }
    }

    /// Hand out the next identity.
    pub fn allocate(&mut self) -> Entity {
        let id = self.next_id;
        self.next_id += 1;
        Entity(id)
    }

    /// Make sure a later [`allocate`](Self::allocate) never returns
    /// `entity`. Used when a caller supplies an explicit identity.
    ///
    /// Returns `false` and changes nothing if `entity` lies above
    /// [`Entity::MAX_RESERVED_ID`].
    #[must_use]
    pub fn reserve(&mut self, entity: Entity) -> bool {
        if entity.0 > Entity::MAX_RESERVED_ID {
            return false;
        }
        if let Some(next) = entity.0.checked_add(1)
            && next > self.next_id
        {
            self.next_id = next;
        }
        true
    }

    /// Number of identities handed out or reserved so far.
    #[must_use]
    pub fn count(&self) -> u64 {
        self.next_id - Entity::FIRST_USER_ID
    }
}

impl Default for EntityAllocator {
    fn default() -> Self {
        Self::new()
    }
}
