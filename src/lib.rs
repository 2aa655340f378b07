//! Profile & context resolution registry for the spectro service.
//!
//! Turns a requested profile, context and optional catalog into a validated
//! [`RoutingTarget`] before any storage or catalog call is made.

pub mod config;
pub mod lifecycle;
pub mod observability;
pub mod registry;
pub mod resolver;

pub use config::{load, ConfigDocument, ConfigError};
pub use registry::{ContextError, ProfileError, ResolvedContext};
pub use resolver::{ResolveError, Resolver, RoutingTarget, SharedResolver};
