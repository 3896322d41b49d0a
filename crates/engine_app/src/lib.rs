//! # engine_app
//!
//! In-memory reference runtime for the builder layer.
//!
//! - [`World`]: implements [`Runtime`](engine_builder::Runtime): owns the
//!   component registry, validates names and identities, and records every
//!   finalized descriptor for later inspection.
//! - [`WorldConfig`]: registry and naming settings.

pub mod config;
pub mod world;

pub use config::{ConfigError, WorldConfig};
pub use world::World;
