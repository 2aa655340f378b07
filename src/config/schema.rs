//! Configuration schema definitions.
//!
//! Two layers live here:
//! - `Raw*` types mirror the on-disk document and derive `Deserialize`.
//!   Entry fields are kept as loose values so a missing or mistyped field is
//!   reported by validation with its full path, not as a bare parse error.
//! - `ConfigDocument`, `Profile` and `Context` are the validated, typed tree
//!   produced by [`crate::config::validation::validate_document`]. Nothing
//!   outside this crate can build one without passing validation.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Name of the profile and context used when a request names none.
pub const DEFAULT_NAME: &str = "default";

/// Root of the configuration document as written on disk.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawDocument {
    /// Port the owning service binds to; range and type checked by validation.
    #[serde(default)]
    pub port: Option<Value>,

    /// Storage backend used when a profile does not name its own.
    #[serde(default)]
    pub vos_endpoint: Option<Value>,

    /// Authentication service location, passed through untouched.
    #[serde(default)]
    pub auth_endpoint: Option<Value>,

    /// Scratch directory of the owning service, passed through untouched.
    #[serde(default)]
    pub tempfile_path: Option<Value>,

    #[serde(default)]
    pub profiles: Option<BTreeMap<String, RawProfile>>,

    #[serde(default)]
    pub contexts: Option<BTreeMap<String, RawContext>>,
}

/// A deployment profile as written on disk.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawProfile {
    #[serde(default)]
    pub description: Option<Value>,

    #[serde(default, rename = "type")]
    pub kind: Option<Value>,

    #[serde(default)]
    pub vos_root: Option<Value>,

    #[serde(default)]
    pub vos_root_dir: Option<Value>,

    /// May be blank when the document-level endpoint is set.
    #[serde(default)]
    pub vos_endpoint: Option<Value>,
}

/// A catalog context as written on disk.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawContext {
    #[serde(default)]
    pub description: Option<Value>,

    #[serde(default, rename = "type")]
    pub kind: Option<Value>,

    /// Default catalog; must be one of `catalogs`.
    #[serde(default)]
    pub catalog: Option<Value>,

    #[serde(default)]
    pub id_main: Option<Value>,

    #[serde(default)]
    pub redshift: Option<Value>,

    /// Published documents use the strings `"true"`/`"false"`.
    #[serde(default)]
    pub rest_frame: Option<Value>,

    /// Catalog name → description.
    #[serde(default)]
    pub catalogs: Option<Value>,
}

/// Visibility of a profile or context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    Public,
    Private,
    /// Hosted elsewhere but advertised alongside public entries.
    External,
}

impl Visibility {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "public" => Some(Visibility::Public),
            "private" => Some(Visibility::Private),
            "external" => Some(Visibility::External),
            _ => None,
        }
    }

    /// Whether entries of this visibility appear in text listings.
    pub fn is_listed(self) -> bool {
        matches!(self, Visibility::Public | Visibility::External)
    }
}

/// Validated, immutable configuration document.
///
/// Built once per load and shared behind an `Arc`. A configuration change
/// produces a new document; an existing one is never edited in place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigDocument {
    pub port: u16,
    pub vos_endpoint: String,
    pub auth_endpoint: String,
    pub tempfile_path: String,
    pub profiles: HashMap<String, Profile>,
    pub contexts: HashMap<String, Context>,
}

/// A named deployment endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    #[serde(skip)]
    pub name: String,

    pub description: String,

    #[serde(rename = "type")]
    pub kind: Visibility,

    /// Opaque storage namespace identifier.
    pub vos_root: String,

    /// Absolute path prefix for user storage.
    pub vos_root_dir: String,

    /// Empty when the profile defers to the document-level endpoint.
    pub vos_endpoint: String,
}

/// A named catalog selection plus the schema columns needed to read it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Context {
    #[serde(skip)]
    pub name: String,

    pub description: String,

    #[serde(rename = "type")]
    pub kind: Visibility,

    pub catalog: String,

    pub id_main: String,

    pub redshift: String,

    pub rest_frame: bool,

    pub catalogs: BTreeMap<String, String>,
}

impl ConfigDocument {
    pub fn default_profile(&self) -> Option<&Profile> {
        self.profiles.get(DEFAULT_NAME)
    }

    pub fn default_context(&self) -> Option<&Context> {
        self.contexts.get(DEFAULT_NAME)
    }

    /// Profile names in sorted order.
    pub fn profile_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.profiles.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Context names in sorted order.
    pub fn context_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.contexts.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Replace the `"default"` profile's settings with those of the profile
    /// named `host`, if one exists.
    ///
    /// Lets one document serve several machines: a host whose short name
    /// matches a profile treats that profile as its default. Consumes and
    /// returns the document so the overlay is applied before publication.
    pub fn with_host_overlay(mut self, host: &str) -> Self {
        if host.is_empty() || host == DEFAULT_NAME {
            return self;
        }
        let Some(source) = self.profiles.get(host).cloned() else {
            return self;
        };
        if let Some(default) = self.profiles.get_mut(DEFAULT_NAME) {
            *default = Profile {
                name: DEFAULT_NAME.to_string(),
                ..source
            };
            tracing::info!(host = %host, "Default profile overlaid from host profile");
        }
        self
    }
}
