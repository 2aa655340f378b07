//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! spec.conf (JSON, or TOML by extension)
//!     → loader.rs (parse & deserialize into RawDocument)
//!     → validation.rs (invariant checks, typed conversion)
//!     → ConfigDocument (validated, immutable)
//!     → shared via Arc by the registries and resolver
//!
//! On reload (file change or SIGHUP):
//!     watcher.rs detects change
//!     → loader.rs loads new document
//!     → validation.rs validates
//!     → atomic swap of the resolver snapshot
//!     → new requests observe the new document
//! ```
//!
//! # Design Decisions
//! - Document is immutable once loaded; changes require full reload
//! - Validation separates syntactic (serde) from semantic checks
//! - A failed reload never replaces a working document

pub mod loader;
pub mod schema;
pub mod validation;
pub mod watcher;

pub use loader::{load, load_config, load_with, ConfigError, ConfigFormat, LoadOptions};
pub use schema::{ConfigDocument, Context, Profile, Visibility, DEFAULT_NAME};
pub use validation::{ValidationError, Violation};
