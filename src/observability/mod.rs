//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Loader, resolver and reload path produce:
//!     → logging.rs (structured log events)
//!     → metrics.rs (counters, gauges)
//!
//! Consumers:
//!     → Log aggregation (stdout, pretty or JSON)
//!     → Whatever metrics recorder the embedding service installs
//! ```
//!
//! # Design Decisions
//! - Structured logging (JSON) for machine parsing
//! - Metrics are cheap and no-ops until a recorder is installed
//! - The pure resolver emits nothing; the shared handle records outcomes

pub mod logging;
pub mod metrics;
