//! Human- and machine-readable listings of the registry contents.
//!
//! These back the discovery side of the service: which profiles and contexts
//! exist, which catalogs a context offers, and whether a client-supplied name
//! is valid. Profile output never includes `vosEndpoint` or `vosRootDir`.

use std::collections::BTreeMap;
use std::fmt::Write as _;

use serde::Serialize;
use thiserror::Error;

use crate::config::schema::{Context, Profile, Visibility};
use crate::registry::context::{ContextError, ContextRegistry};
use crate::registry::profile::{ProfileError, ProfileRegistry};

/// Output encoding for listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum ListFormat {
    Csv,
    #[default]
    Text,
    Json,
}

/// Failure to produce a listing for a named context.
#[derive(Debug, Error)]
pub enum ListingError {
    #[error(transparent)]
    Context(#[from] ContextError),

    #[error("failed to encode listing: {0}")]
    Json(#[from] serde_json::Error),
}

/// What a name should be validated against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum NameKind {
    Profile,
    Context,
}

/// Profile as shown to clients: storage location details stripped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicProfile {
    pub description: String,
    #[serde(rename = "type")]
    pub kind: Visibility,
    pub vos_root: String,
}

impl From<&Profile> for PublicProfile {
    fn from(p: &Profile) -> Self {
        Self {
            description: p.description.clone(),
            kind: p.kind,
            vos_root: p.vos_root.clone(),
        }
    }
}

/// Redacted view of one profile (`None` selects `"default"`).
pub fn public_profile(
    profiles: &ProfileRegistry,
    name: Option<&str>,
) -> Result<PublicProfile, ProfileError> {
    profiles.resolve_profile(name).map(PublicProfile::from)
}

pub fn list_profiles(profiles: &ProfileRegistry, format: ListFormat) -> serde_json::Result<String> {
    Ok(match format {
        ListFormat::Csv => profiles.names().join(","),
        ListFormat::Text => text_table(profiles.iter().map(|p| (p.name.as_str(), p.kind, p.description.as_str()))),
        ListFormat::Json => {
            let views: BTreeMap<&str, PublicProfile> = profiles
                .iter()
                .map(|p| (p.name.as_str(), PublicProfile::from(p)))
                .collect();
            to_json(&views)?
        }
    })
}

pub fn list_contexts(contexts: &ContextRegistry, format: ListFormat) -> serde_json::Result<String> {
    Ok(match format {
        ListFormat::Csv => contexts.names().join(","),
        ListFormat::Text => text_table(contexts.iter().map(|c| (c.name.as_str(), c.kind, c.description.as_str()))),
        ListFormat::Json => {
            let all: BTreeMap<&str, &Context> =
                contexts.iter().map(|c| (c.name.as_str(), c)).collect();
            to_json(&all)?
        }
    })
}

/// Full JSON description of one context (`None` selects `"default"`).
pub fn describe_context(contexts: &ContextRegistry, name: Option<&str>) -> Result<String, ListingError> {
    Ok(to_json(contexts.get(name)?)?)
}

pub fn list_catalogs(
    contexts: &ContextRegistry,
    context: Option<&str>,
    format: ListFormat,
) -> Result<String, ListingError> {
    let ctx = contexts.get(context)?;
    let out = match format {
        ListFormat::Csv => {
            let mut txt = String::from("catalog_name,description\n");
            for (name, description) in &ctx.catalogs {
                let _ = writeln!(txt, "{},{}", name, description);
            }
            txt
        }
        ListFormat::Text => {
            let mut txt = format!("Catalogs used by '{}' context:\n\n", ctx.name);
            for (name, description) in &ctx.catalogs {
                let _ = writeln!(txt, "{:>30}   {}", name, description);
            }
            txt
        }
        ListFormat::Json => to_json(&ctx.catalogs)?,
    };
    Ok(out)
}

/// Whether `value` names an existing profile or context.
pub fn validate_name(
    profiles: &ProfileRegistry,
    contexts: &ContextRegistry,
    kind: NameKind,
    value: &str,
) -> bool {
    match kind {
        NameKind::Profile => profiles.contains(value),
        NameKind::Context => contexts.contains(value),
    }
}

/// Only publicly listable entries appear in text output.
fn text_table<'a>(rows: impl Iterator<Item = (&'a str, Visibility, &'a str)>) -> String {
    let mut txt = String::new();
    for (name, kind, description) in rows {
        if kind.is_listed() {
            let _ = writeln!(txt, "{:>16}   {}", name, description);
        }
    }
    txt
}

fn to_json<T: Serialize + ?Sized>(value: &T) -> serde_json::Result<String> {
    serde_json::to_string(value)
}
