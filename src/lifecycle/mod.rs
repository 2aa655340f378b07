//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (main.rs):
//!     Load config → Validate → Publish resolver → Serve commands
//!
//! Signals (signals.rs):
//!     SIGINT (Ctrl-C) → Stop watching and exit
//!     SIGHUP → Trigger config reload
//! ```
//!
//! # Design Decisions
//! - Fail fast: a startup configuration error is fatal
//! - A reload failure is never fatal; the running document stays

pub mod signals;
