//! Context and catalog lookup.
//!
//! # Responsibilities
//! - Map a requested context name to its `Context` (default fallback as for
//!   profiles)
//! - Pick the effective catalog: explicit override or the context default
//! - Flatten the result into a `ResolvedContext` for the request layer
//!
//! # Design Decisions
//! - Catalog matching is exact and case-sensitive; no prefix or fuzzy match
//! - The default catalog comes only from the structural `catalog` field, never
//!   from `[DEFAULT]` markers in descriptions
//! - Catalogs are only accepted from the selected context's own list

use std::sync::Arc;

use serde::Serialize;
use thiserror::Error;

use crate::config::schema::{ConfigDocument, Context};
use crate::registry::profile::effective_name;

/// Errors from context resolution.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContextError {
    /// No context with this name exists.
    #[error("context not found: {0}")]
    NotFound(String),

    /// The catalog override is not listed under the selected context.
    #[error("unknown catalog {catalog:?} for context {context:?}")]
    UnknownCatalog { context: String, catalog: String },
}

/// Catalog selection and schema columns for one request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedContext {
    pub context: String,
    /// Fully qualified `<dataset>.<table>` name.
    pub catalog: String,
    pub catalog_description: String,
    pub id_main: String,
    pub redshift: String,
    pub rest_frame: bool,
}

/// Name-indexed view over the document's contexts.
#[derive(Debug, Clone)]
pub struct ContextRegistry {
    document: Arc<ConfigDocument>,
}

impl ContextRegistry {
    pub fn new(document: Arc<ConfigDocument>) -> Self {
        Self { document }
    }

    /// Look up a context by name. `None` and `""` select `"default"`.
    pub fn get(&self, name: Option<&str>) -> Result<&Context, ContextError> {
        let key = effective_name(name);
        self.document
            .contexts
            .get(key)
            .ok_or_else(|| ContextError::NotFound(key.to_string()))
    }

    /// Resolve a context and its effective catalog.
    ///
    /// An empty `catalog_override` is treated as absent.
    pub fn resolve_context(
        &self,
        context_name: Option<&str>,
        catalog_override: Option<&str>,
    ) -> Result<ResolvedContext, ContextError> {
        let context = self.get(context_name)?;

        let (catalog, description) = match catalog_override.filter(|c| !c.is_empty()) {
            Some(requested) => context.catalogs.get_key_value(requested).ok_or_else(|| {
                ContextError::UnknownCatalog {
                    context: context.name.clone(),
                    catalog: requested.to_string(),
                }
            })?,
            // Validation guarantees the default is listed; the lookup still
            // goes through the map so the description comes with it.
            None => context.catalogs.get_key_value(&context.catalog).ok_or_else(|| {
                ContextError::UnknownCatalog {
                    context: context.name.clone(),
                    catalog: context.catalog.clone(),
                }
            })?,
        };

        Ok(ResolvedContext {
            context: context.name.clone(),
            catalog: catalog.clone(),
            catalog_description: description.clone(),
            id_main: context.id_main.clone(),
            redshift: context.redshift.clone(),
            rest_frame: context.rest_frame,
        })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.document.contexts.contains_key(name)
    }

    /// Context names in sorted order.
    pub fn names(&self) -> Vec<&str> {
        self.document.context_names()
    }

    /// Contexts in name order.
    pub fn iter(&self) -> impl Iterator<Item = &Context> {
        self.names()
            .into_iter()
            .filter_map(move |n| self.document.contexts.get(n))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::{BTreeMap, HashMap};

    use crate::config::schema::Visibility;

    fn context(name: &str, default: &str, catalogs: &[(&str, &str)], rest_frame: bool) -> Context {
        Context {
            name: name.to_string(),
            description: String::new(),
            kind: Visibility::Public,
            catalog: default.to_string(),
            id_main: "specobjid".to_string(),
            redshift: "z".to_string(),
            rest_frame,
            catalogs: catalogs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect::<BTreeMap<_, _>>(),
        }
    }

    fn registry() -> ContextRegistry {
        let mut contexts = HashMap::new();
        contexts.insert(
            "default".to_string(),
            context(
                "default",
                "sdss_dr16.specobj",
                &[("sdss_dr16.specobj", "primary [DEFAULT]")],
                false,
            ),
        );
        contexts.insert(
            "sdss_dr13".to_string(),
            context(
                "sdss_dr13",
                "sdss_dr13.specobj",
                &[
                    ("sdss_dr13.specobj", "primary [DEFAULT]"),
                    ("sdss_dr13.dr12q", "quasars"),
                ],
                true,
            ),
        );
        ContextRegistry::new(Arc::new(ConfigDocument {
            port: 80,
            vos_endpoint: String::new(),
            auth_endpoint: String::new(),
            tempfile_path: String::new(),
            profiles: HashMap::new(),
            contexts,
        }))
    }

    #[test]
    fn test_default_fallback() {
        let reg = registry();
        let absent = reg.resolve_context(None, None).unwrap();
        let empty = reg.resolve_context(Some(""), Some("")).unwrap();
        let named = reg.resolve_context(Some("default"), None).unwrap();
        assert_eq!(absent, named);
        assert_eq!(empty, named);
        assert_eq!(named.catalog, "sdss_dr16.specobj");
        assert_eq!(named.catalog_description, "primary [DEFAULT]");
        assert!(!named.rest_frame);
    }

    #[test]
    fn test_catalog_override() {
        let reg = registry();
        let r = reg
            .resolve_context(Some("sdss_dr13"), Some("sdss_dr13.dr12q"))
            .unwrap();
        assert_eq!(r.context, "sdss_dr13");
        assert_eq!(r.catalog, "sdss_dr13.dr12q");
        assert_eq!(r.catalog_description, "quasars");
        assert!(r.rest_frame);
    }

    #[test]
    fn test_override_from_other_context_rejected() {
        let reg = registry();
        assert_eq!(
            reg.resolve_context(Some("sdss_dr13"), Some("sdss_dr16.specobj")),
            Err(ContextError::UnknownCatalog {
                context: "sdss_dr13".into(),
                catalog: "sdss_dr16.specobj".into(),
            })
        );
    }

    #[test]
    fn test_override_is_exact() {
        let reg = registry();
        for candidate in ["sdss_dr13.DR12Q", "sdss_dr13.dr12", "dr12q", "sdss_dr13.dr12q "] {
            assert!(matches!(
                reg.resolve_context(Some("sdss_dr13"), Some(candidate)),
                Err(ContextError::UnknownCatalog { .. })
            ));
        }
    }

    #[test]
    fn test_unknown_context() {
        let reg = registry();
        assert_eq!(
            reg.resolve_context(Some("sdss_dr99"), None),
            Err(ContextError::NotFound("sdss_dr99".into()))
        );
    }

    #[test]
    fn test_names_sorted() {
        let reg = registry();
        assert_eq!(reg.names(), vec!["default", "sdss_dr13"]);
        assert_eq!(
            reg.iter().map(|c| c.name.as_str()).collect::<Vec<_>>(),
            vec!["default", "sdss_dr13"]
        );
    }
}
