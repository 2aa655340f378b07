//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check field presence and value types, naming the offending field
//! - Check referential integrity (default profile/context exist, each
//!   context's default catalog is one of its own catalogs)
//! - Validate value ranges and encodings (port, `rest_frame`, `type`)
//! - Convert the raw document into the typed, immutable tree
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is a pure function: RawDocument → Result<ConfigDocument, Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use serde_json::Value;

use crate::config::schema::{
    ConfigDocument, Context, Profile, RawContext, RawDocument, RawProfile, Visibility,
    DEFAULT_NAME,
};

/// A single broken invariant, tied to the field that broke it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dotted path of the offending field, e.g. `contexts.sdss_dr13.catalog`.
    pub field: String,
    pub violation: Violation,
}

/// The invariant a field violates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Violation {
    /// A required field is absent.
    Missing,
    /// A field that must be a string holds something else.
    NotText(String),
    /// `port` is not an integer.
    NotInteger(String),
    /// `port` outside 1..=65535.
    PortOutOfRange(i64),
    /// A required `"default"` entry is absent.
    MissingDefault,
    /// A required string (or entry name) is blank.
    Empty,
    /// A profile has no endpoint and the document has no fallback.
    NoEndpoint,
    /// `type` is not a known visibility.
    UnknownType(String),
    /// `rest_frame` is not `"true"` or `"false"`.
    NotBoolean(String),
    /// `catalogs` is not a map of names to descriptions.
    NotCatalogMap(String),
    /// `catalogs` has no entries.
    NoCatalogs,
    /// Default catalog is not a key of the same context's `catalogs`.
    CatalogNotListed(String),
    /// Catalog name is not of the form `<dataset>.<table>`.
    UnqualifiedCatalog(String),
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Violation::Missing => write!(f, "required field is missing"),
            Violation::NotText(v) => write!(f, "expected a string, got {}", v),
            Violation::NotInteger(v) => write!(f, "expected an integer, got {}", v),
            Violation::PortOutOfRange(p) => write!(f, "port {} outside 1-65535", p),
            Violation::MissingDefault => write!(f, "missing required \"{}\" entry", DEFAULT_NAME),
            Violation::Empty => write!(f, "must not be empty"),
            Violation::NoEndpoint => {
                write!(f, "empty and no document-level vosEndpoint to fall back to")
            }
            Violation::UnknownType(t) => {
                write!(f, "unknown type {} (expected public, private or external)", t)
            }
            Violation::NotBoolean(v) => write!(f, "expected \"true\" or \"false\", got {}", v),
            Violation::NotCatalogMap(v) => {
                write!(f, "expected a map of catalog names to descriptions, got {}", v)
            }
            Violation::NoCatalogs => write!(f, "must list at least one catalog"),
            Violation::CatalogNotListed(c) => write!(f, "default catalog {:?} is not listed in catalogs", c),
            Violation::UnqualifiedCatalog(c) => {
                write!(f, "catalog {:?} is not of the form <dataset>.<table>", c)
            }
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.violation)
    }
}

impl std::error::Error for ValidationError {}

/// Validate a raw document and build the typed tree from it.
///
/// Either every invariant holds and a complete document is returned, or the
/// full list of violations is. No partially built document escapes.
pub fn validate_document(raw: RawDocument) -> Result<ConfigDocument, Vec<ValidationError>> {
    let mut errors = Vec::new();

    let port = check_port(raw.port.as_ref(), &mut errors);
    let vos_endpoint = optional_text("vosEndpoint".into(), raw.vos_endpoint.as_ref(), &mut errors);
    let auth_endpoint = optional_text("authEndpoint".into(), raw.auth_endpoint.as_ref(), &mut errors);
    let tempfile_path = optional_text("tempfilePath".into(), raw.tempfile_path.as_ref(), &mut errors);

    let has_fallback_endpoint = vos_endpoint.as_deref().is_some_and(|e| !e.trim().is_empty());

    let mut profiles = HashMap::new();
    match raw.profiles {
        None => errors.push(error("profiles", Violation::Missing)),
        Some(raw_profiles) => {
            if !raw_profiles.contains_key(DEFAULT_NAME) {
                errors.push(error(format!("profiles.{}", DEFAULT_NAME), Violation::MissingDefault));
            }
            for (name, profile) in raw_profiles {
                if let Some(p) = check_profile(&name, profile, has_fallback_endpoint, &mut errors) {
                    profiles.insert(name, p);
                }
            }
        }
    }

    let mut contexts = HashMap::new();
    match raw.contexts {
        None => errors.push(error("contexts", Violation::Missing)),
        Some(raw_contexts) => {
            if !raw_contexts.contains_key(DEFAULT_NAME) {
                errors.push(error(format!("contexts.{}", DEFAULT_NAME), Violation::MissingDefault));
            }
            for (name, context) in raw_contexts {
                if let Some(c) = check_context(&name, context, &mut errors) {
                    contexts.insert(name, c);
                }
            }
        }
    }

    match (port, vos_endpoint, auth_endpoint, tempfile_path) {
        (Some(port), Some(vos_endpoint), Some(auth_endpoint), Some(tempfile_path))
            if errors.is_empty() =>
        {
            Ok(ConfigDocument {
                port,
                vos_endpoint,
                auth_endpoint,
                tempfile_path,
                profiles,
                contexts,
            })
        }
        _ => Err(errors),
    }
}

fn error(field: impl Into<String>, violation: Violation) -> ValidationError {
    ValidationError {
        field: field.into(),
        violation,
    }
}

fn check_port(value: Option<&Value>, errors: &mut Vec<ValidationError>) -> Option<u16> {
    let Some(value) = value else {
        errors.push(error("port", Violation::Missing));
        return None;
    };
    let Some(port) = value.as_i64() else {
        errors.push(error("port", Violation::NotInteger(value.to_string())));
        return None;
    };
    match u16::try_from(port) {
        Ok(p) if p > 0 => Some(p),
        _ => {
            errors.push(error("port", Violation::PortOutOfRange(port)));
            None
        }
    }
}

/// String that may be absent or blank; absent reads as empty.
fn optional_text(field: String, value: Option<&Value>, errors: &mut Vec<ValidationError>) -> Option<String> {
    match value {
        None => Some(String::new()),
        Some(Value::String(s)) => Some(s.clone()),
        Some(other) => {
            errors.push(error(field, Violation::NotText(other.to_string())));
            None
        }
    }
}

/// String that must be present and non-blank.
fn required_text(field: String, value: Option<&Value>, errors: &mut Vec<ValidationError>) -> Option<String> {
    match value {
        None => {
            errors.push(error(field, Violation::Missing));
            None
        }
        Some(Value::String(s)) if s.trim().is_empty() => {
            errors.push(error(field, Violation::Empty));
            None
        }
        Some(Value::String(s)) => Some(s.clone()),
        Some(other) => {
            errors.push(error(field, Violation::NotText(other.to_string())));
            None
        }
    }
}

fn check_visibility(field: String, value: Option<&Value>, errors: &mut Vec<ValidationError>) -> Option<Visibility> {
    let (kind, shown) = match value {
        None => {
            errors.push(error(field, Violation::Missing));
            return None;
        }
        Some(Value::String(s)) => (Visibility::parse(s), s.clone()),
        Some(other) => (None, other.to_string()),
    };
    if kind.is_none() {
        errors.push(error(field, Violation::UnknownType(shown)));
    }
    kind
}

/// Published documents encode flags as `"true"`/`"false"`; native booleans
/// are accepted too. Anything else, including other casings, is rejected.
fn check_flag(field: String, value: Option<&Value>, errors: &mut Vec<ValidationError>) -> Option<bool> {
    let (flag, shown) = match value {
        None => {
            errors.push(error(field, Violation::Missing));
            return None;
        }
        Some(Value::Bool(b)) => return Some(*b),
        Some(Value::String(s)) => match s.as_str() {
            "true" => (Some(true), String::new()),
            "false" => (Some(false), String::new()),
            _ => (None, format!("{:?}", s)),
        },
        Some(other) => (None, other.to_string()),
    };
    if flag.is_none() {
        errors.push(error(field, Violation::NotBoolean(shown)));
    }
    flag
}

/// Entry names must be non-blank: a blank request name means `"default"`,
/// so a blank key could never be resolved.
fn check_entry_name(section: &str, name: &str, errors: &mut Vec<ValidationError>) -> bool {
    if name.trim().is_empty() {
        errors.push(error(format!("{}.{:?}", section, name), Violation::Empty));
        return false;
    }
    true
}

fn check_profile(
    name: &str,
    raw: RawProfile,
    has_fallback_endpoint: bool,
    errors: &mut Vec<ValidationError>,
) -> Option<Profile> {
    let before = errors.len();
    if !check_entry_name("profiles", name, errors) {
        return None;
    }
    let prefix = format!("profiles.{}", name);

    let description = optional_text(format!("{}.description", prefix), raw.description.as_ref(), errors);
    let kind = check_visibility(format!("{}.type", prefix), raw.kind.as_ref(), errors);
    let vos_root = required_text(format!("{}.vosRoot", prefix), raw.vos_root.as_ref(), errors);
    let vos_root_dir = required_text(format!("{}.vosRootDir", prefix), raw.vos_root_dir.as_ref(), errors);

    let endpoint_field = format!("{}.vosEndpoint", prefix);
    let vos_endpoint = optional_text(endpoint_field.clone(), raw.vos_endpoint.as_ref(), errors)
        .map(|e| e.trim().to_string());
    if vos_endpoint.as_deref() == Some("") && !has_fallback_endpoint {
        errors.push(error(endpoint_field, Violation::NoEndpoint));
    }

    if errors.len() != before {
        return None;
    }

    Some(Profile {
        name: name.to_string(),
        description: description?,
        kind: kind?,
        vos_root: vos_root?,
        vos_root_dir: vos_root_dir?,
        vos_endpoint: vos_endpoint?,
    })
}

fn check_catalogs(
    field: String,
    value: Option<&Value>,
    errors: &mut Vec<ValidationError>,
) -> Option<BTreeMap<String, String>> {
    let entries = match value {
        None => {
            errors.push(error(field, Violation::Missing));
            return None;
        }
        Some(Value::Object(entries)) => entries,
        Some(other) => {
            errors.push(error(field, Violation::NotCatalogMap(other.to_string())));
            return None;
        }
    };

    if entries.is_empty() {
        errors.push(error(field, Violation::NoCatalogs));
        return None;
    }

    let before = errors.len();
    let mut catalogs = BTreeMap::new();
    for (catalog, description) in entries {
        if !is_qualified(catalog) {
            errors.push(error(field.clone(), Violation::UnqualifiedCatalog(catalog.clone())));
        }
        match description {
            Value::String(d) => {
                catalogs.insert(catalog.clone(), d.clone());
            }
            other => errors.push(error(
                format!("{}.{}", field, catalog),
                Violation::NotText(other.to_string()),
            )),
        }
    }

    (errors.len() == before).then_some(catalogs)
}

fn check_context(name: &str, raw: RawContext, errors: &mut Vec<ValidationError>) -> Option<Context> {
    let before = errors.len();
    if !check_entry_name("contexts", name, errors) {
        return None;
    }
    let prefix = format!("contexts.{}", name);

    let description = optional_text(format!("{}.description", prefix), raw.description.as_ref(), errors);
    let kind = check_visibility(format!("{}.type", prefix), raw.kind.as_ref(), errors);
    let id_main = required_text(format!("{}.id_main", prefix), raw.id_main.as_ref(), errors);
    let redshift = required_text(format!("{}.redshift", prefix), raw.redshift.as_ref(), errors);
    let rest_frame = check_flag(format!("{}.rest_frame", prefix), raw.rest_frame.as_ref(), errors);
    let catalogs = check_catalogs(format!("{}.catalogs", prefix), raw.catalogs.as_ref(), errors);

    let catalog_field = format!("{}.catalog", prefix);
    let catalog = required_text(catalog_field.clone(), raw.catalog.as_ref(), errors);
    if let (Some(default), Some(listed)) = (&catalog, &catalogs) {
        if !listed.contains_key(default) {
            errors.push(error(catalog_field, Violation::CatalogNotListed(default.clone())));
        }
    }

    if errors.len() != before {
        return None;
    }

    Some(Context {
        name: name.to_string(),
        description: description?,
        kind: kind?,
        catalog: catalog?,
        id_main: id_main?,
        redshift: redshift?,
        rest_frame: rest_frame?,
        catalogs: catalogs?,
    })
}

/// `<dataset>.<table>` with both halves non-empty.
fn is_qualified(catalog: &str) -> bool {
    match catalog.split_once('.') {
        Some((dataset, table)) => !dataset.is_empty() && !table.is_empty(),
        None => false,
    }
}
