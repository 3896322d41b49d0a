//! Core [`Component`] trait and the static metadata builders consume.
//!
//! A component type carries a stable [`ComponentTypeId`] derived from its
//! name. That ID is *type identity*, not runtime identity: the runtime
//! assigns each type an [`Entity`](crate::Entity) when it is registered in a
//! [`ComponentRegistry`](crate::ComponentRegistry).

use std::alloc::Layout;

use serde::{Deserialize, Serialize};

/// A unique identifier for a component type, derived from its string name
/// using the FNV-1a 64-bit hash algorithm.
///
/// The same name always hashes to the same ID, so two registries that see
/// the same types agree on which type is which even when they hand out
/// different runtime identities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
pub struct ComponentTypeId(pub u64);

impl ComponentTypeId {
    const FNV_OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
    const FNV_PRIME: u64 = 0x0100_0000_01b3;

    /// Hash a component name with FNV-1a 64-bit.
    ///
    /// ```text
    /// hash = 0xcbf29ce484222325
    /// for each byte in name.as_bytes():
    ///     hash = (hash XOR byte) * 0x00000100000001b3
    /// ```
    #[must_use]
    pub const fn from_name(name: &str) -> Self {
        let bytes = name.as_bytes();
        let mut hash = Self::FNV_OFFSET_BASIS;
        let mut i = 0;
        while i < bytes.len() {
            hash ^= bytes[i] as u64;
            hash = hash.wrapping_mul(Self::FNV_PRIME);
            i += 1;
        }
        Self(hash)
    }

    /// The type ID of component `T`.
    #[must_use]
    pub fn of<T: Component>() -> Self {
        Self::from_name(T::type_name())
    }
}

/// Static description of a component type.
///
/// Terms that have not been resolved yet carry one of these instead of a
/// runtime identity, so resolution can be deferred until a builder is
/// finalized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComponentMeta {
    pub type_id: ComponentTypeId,
    /// The human-readable name of the component (e.g. `"Position"`).
    pub name: &'static str,
    pub layout: Layout,
}

impl ComponentMeta {
    /// Returns `true` for zero-sized components.
    ///
    /// Tags carry no data, so terms over them default to no access.
    #[must_use]
    pub fn is_tag(&self) -> bool {
        self.layout.size() == 0
    }
}

/// The core component trait.
///
/// Most types should use the [`component!`](crate::component!) macro, which
/// implements this trait and makes the type usable by value in a query
/// signature.
///
/// ```rust
/// use engine_component::Component;
///
/// struct Health {
///     current: f32,
///     max: f32,
/// }
///
/// impl Component for Health {
///     fn type_name() -> &'static str { "Health" }
/// }
/// ```
pub trait Component: Send + Sync + 'static {
    /// A human-readable name for this component type.
    fn type_name() -> &'static str;

    fn component_type_id() -> ComponentTypeId {
        ComponentTypeId::from_name(Self::type_name())
    }

    fn meta() -> ComponentMeta
    where
        Self: Sized,
    {
        ComponentMeta {
            type_id: Self::component_type_id(),
            name: Self::type_name(),
            layout: Layout::new::<Self>(),
        }
    }
}

/// Implements [`Component`] and [`TermArg`](crate::signature::TermArg) for
/// one or more local types, using the type's identifier as its name.
///
/// ```rust
/// use engine_component::{component, Component};
///
/// struct Position { x: f32, y: f32 }
/// struct Player;
///
/// component!(Position, Player);
///
/// assert_eq!(Position::type_name(), "Position");
/// assert!(Player::meta().is_tag());
/// ```
#[macro_export]
macro_rules! component {
    ($($ty:ident),+ $(,)?) => {
        $(
            impl $crate::Component for $ty {
                fn type_name() -> &'static str {
                    stringify!($ty)
                }
            }

            impl $crate::signature::TermArg for $ty {
                fn term() -> $crate::Term {
                    $crate::signature::owned_term::<$ty>()
                }
            }
        )+
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Health {
        _current: f32,
        _max: f32,
    }

    impl Component for Health {
        fn type_name() -> &'static str {
            "Health"
        }
    }

    struct Frozen;

    impl Component for Frozen {
        fn type_name() -> &'static str {
            "Frozen"
        }
    }

    #[test]
    fn test_component_type_id_matches_from_name() {
        assert_eq!(
            Health::component_type_id(),
            ComponentTypeId::from_name("Health")
        );
        assert_eq!(ComponentTypeId::of::<Health>(), Health::component_type_id());
    }

    #[test]
    fn test_component_type_id_differs_between_names() {
        assert_ne!(
            ComponentTypeId::from_name("Health"),
            ComponentTypeId::from_name("Velocity")
        );
    }

    #[test]
    fn test_fnv1a_known_vector() {
        // FNV-1a of the empty string is the offset basis itself.
        assert_eq!(
            ComponentTypeId::from_name(""),
            ComponentTypeId(0xcbf2_9ce4_8422_2325)
        );
    }

    #[test]
    fn test_meta_describes_type() {
        let meta = Health::meta();
        assert_eq!(meta.name, "Health");
        assert_eq!(meta.layout, Layout::new::<Health>());
        assert!(!meta.is_tag());
    }

    #[test]
    fn test_zero_sized_component_is_tag() {
        assert!(Frozen::meta().is_tag());
    }
}
