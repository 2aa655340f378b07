//! Configuration loading from bytes or disk.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::config::schema::{ConfigDocument, RawDocument};
use crate::config::validation::{validate_document, ValidationError};

/// Search order used when no config path is given.
pub const CONFIG_SEARCH_PATH: [&str; 3] = [
    "spec.conf",
    "/opt/services/lib/spec.conf",
    "/opt/services/specserver/spec.conf",
];

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("config is not valid UTF-8: {0}")]
    Utf8(#[from] std::str::Utf8Error),

    #[error("no config file found (searched {})", CONFIG_SEARCH_PATH.join(", "))]
    NotFound,

    #[error("validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Encoding of a configuration source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConfigFormat {
    #[default]
    Json,
    Toml,
}

impl ConfigFormat {
    /// `.toml` files are TOML; everything else (`.conf`, `.json`) is JSON.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("toml") => ConfigFormat::Toml,
            _ => ConfigFormat::Json,
        }
    }
}

/// Knobs applied while building a document.
#[derive(Debug, Clone, Default)]
pub struct LoadOptions {
    /// Short host name; a profile with this name becomes the default.
    pub host: Option<String>,
}

/// Parse and validate a JSON configuration document.
pub fn load(raw: &[u8]) -> Result<ConfigDocument, ConfigError> {
    load_with(raw, ConfigFormat::Json, &LoadOptions::default())
}

/// Parse and validate a configuration document in the given format.
pub fn load_with(
    raw: &[u8],
    format: ConfigFormat,
    options: &LoadOptions,
) -> Result<ConfigDocument, ConfigError> {
    let parsed: RawDocument = match format {
        ConfigFormat::Json => serde_json::from_slice(raw)?,
        ConfigFormat::Toml => toml::from_str(std::str::from_utf8(raw)?)?,
    };

    let mut document = validate_document(parsed).map_err(ConfigError::Validation)?;

    if let Some(host) = options.host.as_deref() {
        document = document.with_host_overlay(host);
    }

    tracing::debug!(
        port = document.port,
        profiles = document.profiles.len(),
        contexts = document.contexts.len(),
        "Configuration document built"
    );

    Ok(document)
}

/// Load and validate configuration from a file.
pub fn load_config(path: &Path, options: &LoadOptions) -> Result<ConfigDocument, ConfigError> {
    let content = fs::read(path)?;
    load_with(&content, ConfigFormat::from_path(path), options)
}

/// First existing entry of [`CONFIG_SEARCH_PATH`].
pub fn default_config_path() -> Option<PathBuf> {
    CONFIG_SEARCH_PATH
        .iter()
        .map(PathBuf::from)
        .find(|p| p.exists())
}

/// Explicit path if given, otherwise the search path.
pub fn resolve_config_path(explicit: Option<&Path>) -> Result<PathBuf, ConfigError> {
    match explicit {
        Some(path) => Ok(path.to_path_buf()),
        None => default_config_path().ok_or(ConfigError::NotFound),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const JSON_DOC: &str = r#"{
        "port": 7001,
        "vosEndpoint": "http://vos.example/vospace",
        "profiles": {
            "default": { "description": "", "type": "public", "vosRoot": "vos://a",
                         "vosRootDir": "/a", "vosEndpoint": "http://a" },
            "b": { "description": "", "type": "private", "vosRoot": "vos://b",
                   "vosRootDir": "/b", "vosEndpoint": "http://b" }
        },
        "contexts": {
            "default": { "description": "", "type": "public", "catalog": "ds.t",
                         "id_main": "id", "redshift": "z", "rest_frame": "true",
                         "catalogs": { "ds.t": "table" } }
        }
    }"#;

    const TOML_DOC: &str = r#"
port = 7001
vosEndpoint = "http://vos.example/vospace"

[profiles.default]
description = ""
type = "public"
vosRoot = "vos://a"
vosRootDir = "/a"
vosEndpoint = "http://a"

[contexts.default]
description = ""
type = "public"
catalog = "ds.t"
id_main = "id"
redshift = "z"
rest_frame = "true"

[contexts.default.catalogs]
"ds.t" = "table"
"#;

    #[test]
    fn test_load_json() {
        let doc = load(JSON_DOC.as_bytes()).unwrap();
        assert_eq!(doc.port, 7001);
        assert_eq!(doc.profiles.len(), 2);
        assert!(doc.default_context().unwrap().rest_frame);
    }

    #[test]
    fn test_load_toml() {
        let doc = load_with(TOML_DOC.as_bytes(), ConfigFormat::Toml, &LoadOptions::default()).unwrap();
        assert_eq!(doc.port, 7001);
        assert_eq!(doc.default_profile().unwrap().vos_endpoint, "http://a");
    }

    #[test]
    fn test_malformed_json() {
        let err = load(b"{ \"port\": ").unwrap_err();
        assert!(matches!(err, ConfigError::Json(_)));
    }

    #[test]
    fn test_missing_required_key() {
        let err = load(br#"{ "port": 1, "profiles": {} }"#).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("profiles.default: missing required"), "{message}");
        assert!(message.contains("contexts: required field is missing"), "{message}");
    }

    #[test]
    fn test_mistyped_field_names_its_path() {
        let bad = JSON_DOC.replace("\"rest_frame\": \"true\"", "\"rest_frame\": 1");
        let err = load(bad.as_bytes()).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
        assert!(
            err.to_string().contains("contexts.default.rest_frame: expected \"true\" or \"false\", got 1"),
            "{err}"
        );
    }

    #[test]
    fn test_validation_error_surfaces() {
        let bad = JSON_DOC.replace("\"rest_frame\": \"true\"", "\"rest_frame\": \"TRUE\"");
        match load(bad.as_bytes()).unwrap_err() {
            ConfigError::Validation(errors) => {
                assert_eq!(errors.len(), 1);
                assert_eq!(errors[0].field, "contexts.default.rest_frame");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_host_overlay_option() {
        let options = LoadOptions { host: Some("b".into()) };
        let doc = load_with(JSON_DOC.as_bytes(), ConfigFormat::Json, &options).unwrap();
        assert_eq!(doc.default_profile().unwrap().vos_endpoint, "http://b");
    }

    #[test]
    fn test_format_from_path() {
        assert_eq!(ConfigFormat::from_path(Path::new("spec.conf")), ConfigFormat::Json);
        assert_eq!(ConfigFormat::from_path(Path::new("spec.json")), ConfigFormat::Json);
        assert_eq!(ConfigFormat::from_path(Path::new("spec.TOML")), ConfigFormat::Toml);
    }

    #[test]
    fn test_load_config_missing_file() {
        let err = load_config(Path::new("/nonexistent/spec.conf"), &LoadOptions::default()).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }

    #[test]
    fn test_explicit_path_wins() {
        let path = resolve_config_path(Some(Path::new("/etc/x.conf"))).unwrap();
        assert_eq!(path, PathBuf::from("/etc/x.conf"));
    }
}
