//! Profile lookup.
//!
//! # Responsibilities
//! - Map a requested profile name to its `Profile`
//! - Fall back to `"default"` when no name is given
//! - Report unknown names explicitly, never substitute the default
//!
//! # Design Decisions
//! - Immutable after construction (thread-safe without locks)
//! - Returns borrowed views; callers cannot edit the document

use std::sync::Arc;

use thiserror::Error;

use crate::config::schema::{ConfigDocument, Profile, DEFAULT_NAME};

/// Errors from profile resolution.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProfileError {
    /// No profile with this name exists.
    #[error("profile not found: {0}")]
    NotFound(String),
}

/// Name-indexed view over the document's profiles.
#[derive(Debug, Clone)]
pub struct ProfileRegistry {
    document: Arc<ConfigDocument>,
}

impl ProfileRegistry {
    pub fn new(document: Arc<ConfigDocument>) -> Self {
        Self { document }
    }

    /// Resolve a profile name. `None` and `""` select `"default"`.
    pub fn resolve_profile(&self, name: Option<&str>) -> Result<&Profile, ProfileError> {
        let key = effective_name(name);
        self.document
            .profiles
            .get(key)
            .ok_or_else(|| ProfileError::NotFound(key.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.document.profiles.contains_key(name)
    }

    /// Profile names in sorted order.
    pub fn names(&self) -> Vec<&str> {
        self.document.profile_names()
    }

    /// Profiles in name order.
    pub fn iter(&self) -> impl Iterator<Item = &Profile> {
        self.names()
            .into_iter()
            .filter_map(move |n| self.document.profiles.get(n))
    }
}

/// Blank or absent names select the default entry.
pub(crate) fn effective_name(name: Option<&str>) -> &str {
    match name {
        Some(n) if !n.is_empty() => n,
        _ => DEFAULT_NAME,
    }
}
