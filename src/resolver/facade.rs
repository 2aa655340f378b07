//! Single entry point for turning request parameters into a routing target.

use std::sync::Arc;

use serde::Serialize;
use thiserror::Error;

use crate::config::schema::ConfigDocument;
use crate::registry::context::{ContextError, ContextRegistry, ResolvedContext};
use crate::registry::listing::{self, NameKind};
use crate::registry::profile::{ProfileError, ProfileRegistry};

/// Errors from [`Resolver::resolve`]. Profile and context failures stay
/// separate so the request layer can name the bad parameter.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    #[error(transparent)]
    Profile(#[from] ProfileError),

    #[error(transparent)]
    Context(#[from] ContextError),
}

/// Everything the request layer needs to serve one request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoutingTarget {
    /// Profile that was selected (after default fallback).
    pub profile: String,
    /// Storage backend to talk to.
    pub endpoint: String,
    pub vos_root: String,
    pub vos_root_dir: String,
    /// Passed through from the document for the auth collaborator.
    pub auth_endpoint: String,
    pub tempfile_path: String,
    pub context: ResolvedContext,
}

/// Stateless composition of the profile and context registries.
///
/// Cheap to clone; all clones share the same document.
#[derive(Debug, Clone)]
pub struct Resolver {
    document: Arc<ConfigDocument>,
    profiles: ProfileRegistry,
    contexts: ContextRegistry,
}

impl Resolver {
    pub fn new(document: ConfigDocument) -> Self {
        Self::from_shared(Arc::new(document))
    }

    pub fn from_shared(document: Arc<ConfigDocument>) -> Self {
        Self {
            profiles: ProfileRegistry::new(document.clone()),
            contexts: ContextRegistry::new(document.clone()),
            document,
        }
    }

    pub fn document(&self) -> &ConfigDocument {
        &self.document
    }

    pub fn profiles(&self) -> &ProfileRegistry {
        &self.profiles
    }

    pub fn contexts(&self) -> &ContextRegistry {
        &self.contexts
    }

    /// Resolve request parameters into a routing target.
    ///
    /// Blank or absent names select the defaults. The profile is resolved
    /// first; when both names are bad the profile error is reported.
    pub fn resolve(
        &self,
        profile: Option<&str>,
        context: Option<&str>,
        catalog: Option<&str>,
    ) -> Result<RoutingTarget, ResolveError> {
        let profile = self.profiles.resolve_profile(profile)?;
        let context = self.contexts.resolve_context(context, catalog)?;

        let endpoint = if profile.vos_endpoint.is_empty() {
            self.document.vos_endpoint.clone()
        } else {
            profile.vos_endpoint.clone()
        };

        Ok(RoutingTarget {
            profile: profile.name.clone(),
            endpoint,
            vos_root: profile.vos_root.clone(),
            vos_root_dir: profile.vos_root_dir.clone(),
            auth_endpoint: self.document.auth_endpoint.clone(),
            tempfile_path: self.document.tempfile_path.clone(),
            context,
        })
    }

    /// Whether `value` names an existing profile or context.
    pub fn validate(&self, kind: NameKind, value: &str) -> bool {
        listing::validate_name(&self.profiles, &self.contexts, kind, value)
    }
}
