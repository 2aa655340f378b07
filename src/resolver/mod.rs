//! Resolution subsystem.
//!
//! # Data Flow
//! ```text
//! Inbound request (profile, context, catalog)
//!     → shared.rs (load current snapshot)
//!     → facade.rs (profile registry + context registry)
//!     → Return: RoutingTarget or typed ResolveError
//!
//! Reload:
//!     new ConfigDocument
//!     → build Resolver off to the side
//!     → atomic swap of the published snapshot
//! ```
//!
//! # Design Decisions
//! - Resolution is deterministic: same input and document, same output
//! - No caching beyond the in-memory document
//! - Either a complete target or a single error; nothing partial

pub mod facade;
pub mod shared;

pub use facade::{ResolveError, Resolver, RoutingTarget};
pub use shared::SharedResolver;
