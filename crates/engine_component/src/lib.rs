//! # engine_component
//!
//! Component identity and term extraction for the builder layer.
//!
//! This crate provides:
//!
//! - [`Component`] trait and the [`component!`] macro.
//! - [`Entity`]: runtime identities, allocated by [`EntityAllocator`].
//! - [`ComponentRegistry`]: the type→identity map a runtime owns.
//! - [`Term`]: one component reference with access mode, operator and source.
//! - [`Signature`]: maps a tuple of component types to ordered terms.

pub mod component;
pub mod entity;
pub mod registry;
pub mod signature;
pub mod term;

pub use component::{Component, ComponentMeta, ComponentTypeId};
pub use entity::{Entity, EntityAllocator};
pub use registry::{ComponentRegistry, RegistryError};
pub use signature::{Signature, TermArg};
pub use term::{InOut, Term, TermId, TermOper, TermSource};
