//! Registries over a loaded configuration document.
//!
//! # Data Flow
//! ```text
//! Arc<ConfigDocument>
//!     → profile.rs  (profile name → Profile)
//!     → context.rs  (context name + catalog override → ResolvedContext)
//!     → listing.rs  (enumerations, redacted views, name checks)
//! ```
//!
//! # Design Decisions
//! - Registries hold the document by `Arc` and never mutate it
//! - Blank or absent names select `"default"`; unknown names are errors
//! - Pure lookups: no I/O, no locking, no hidden state

pub mod context;
pub mod listing;
pub mod profile;

pub use context::{ContextError, ContextRegistry, ResolvedContext};
pub use listing::{ListFormat, ListingError, NameKind, PublicProfile};
pub use profile::{ProfileError, ProfileRegistry};
