//! Process-wide resolver handle with whole-document reload.
//!
//! # Design Decisions
//! - The current `Resolver` sits behind an `ArcSwap`; readers take a
//!   lock-free snapshot, reload publishes a new one in a single store
//! - A call resolves against exactly one snapshot, so a concurrent reload is
//!   seen either fully or not at all
//! - Failed reloads leave the published snapshot untouched

use std::path::Path;
use std::sync::Arc;

use arc_swap::ArcSwap;

use crate::config::loader::{load_config, ConfigError, LoadOptions};
use crate::config::schema::ConfigDocument;
use crate::observability::metrics;
use crate::resolver::facade::{ResolveError, Resolver, RoutingTarget};

pub struct SharedResolver {
    current: ArcSwap<Resolver>,
}

impl SharedResolver {
    pub fn new(resolver: Resolver) -> Self {
        metrics::record_document(resolver.document());
        Self {
            current: ArcSwap::from_pointee(resolver),
        }
    }

    pub fn from_document(document: ConfigDocument) -> Self {
        Self::new(Resolver::new(document))
    }

    /// The resolver currently in force. Holding it pins that document.
    pub fn snapshot(&self) -> Arc<Resolver> {
        self.current.load_full()
    }

    /// Resolve against the current snapshot.
    pub fn resolve(
        &self,
        profile: Option<&str>,
        context: Option<&str>,
        catalog: Option<&str>,
    ) -> Result<RoutingTarget, ResolveError> {
        let resolver = self.current.load();
        let result = resolver.resolve(profile, context, catalog);

        match &result {
            Ok(target) => {
                metrics::record_resolution("ok");
                tracing::debug!(
                    profile = %target.profile,
                    context = %target.context.context,
                    catalog = %target.context.catalog,
                    endpoint = %target.endpoint,
                    "Resolved routing target"
                );
            }
            Err(e) => {
                metrics::record_resolution(outcome_label(e));
                tracing::debug!(error = %e, "Resolution rejected");
            }
        }

        result
    }

    /// Publish a new document, returning the resolver it replaced.
    pub fn replace(&self, document: ConfigDocument) -> Arc<Resolver> {
        let next = Resolver::new(document);
        metrics::record_document(next.document());
        metrics::record_reload(true);
        tracing::info!(
            profiles = next.document().profiles.len(),
            contexts = next.document().contexts.len(),
            "Configuration swapped"
        );
        self.current.swap(Arc::new(next))
    }

    /// Load `path` and publish it. On error the current document stays.
    pub fn reload_from_path(&self, path: &Path, options: &LoadOptions) -> Result<(), ConfigError> {
        match load_config(path, options) {
            Ok(document) => {
                self.replace(document);
                Ok(())
            }
            Err(e) => {
                metrics::record_reload(false);
                tracing::error!(path = ?path, "Reload failed: {}. Keeping current configuration.", e);
                Err(e)
            }
        }
    }
}

fn outcome_label(error: &ResolveError) -> &'static str {
    use crate::registry::{ContextError, ProfileError};

    match error {
        ResolveError::Profile(ProfileError::NotFound(_)) => "profile_not_found",
        ResolveError::Context(ContextError::NotFound(_)) => "context_not_found",
        ResolveError::Context(ContextError::UnknownCatalog { .. }) => "unknown_catalog",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::loader::load;

    fn doc(endpoint: &str) -> ConfigDocument {
        let raw = format!(
            r#"{{
                "port": 6999,
                "profiles": {{ "default": {{ "description": "", "type": "public",
                    "vosRoot": "vos://r", "vosRootDir": "/d", "vosEndpoint": "{endpoint}" }} }},
                "contexts": {{ "default": {{ "description": "", "type": "public",
                    "catalog": "a.b", "id_main": "id", "redshift": "z",
                    "rest_frame": "false", "catalogs": {{ "a.b": "t" }} }} }}
            }}"#
        );
        load(raw.as_bytes()).unwrap()
    }

    #[test]
    fn test_replace_publishes_new_document() {
        let shared = SharedResolver::from_document(doc("http://old"));
        let before = shared.snapshot();

        let replaced = shared.replace(doc("http://new"));
        assert!(Arc::ptr_eq(&before, &replaced));

        let target = shared.resolve(None, None, None).unwrap();
        assert_eq!(target.endpoint, "http://new");
        // A snapshot taken earlier keeps its document.
        assert_eq!(before.resolve(None, None, None).unwrap().endpoint, "http://old");
    }

    #[test]
    fn test_failed_reload_keeps_current() {
        let shared = SharedResolver::from_document(doc("http://old"));
        let err = shared
            .reload_from_path(Path::new("/nonexistent/spec.conf"), &LoadOptions::default())
            .unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
        assert_eq!(shared.resolve(None, None, None).unwrap().endpoint, "http://old");
    }

    #[test]
    fn test_outcome_labels() {
        assert_eq!(
            outcome_label(&ResolveError::Profile(crate::registry::ProfileError::NotFound("x".into()))),
            "profile_not_found"
        );
    }
}
