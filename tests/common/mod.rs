//! Shared fixtures for integration tests.

use serde_json::{json, Value};
use spec_registry::config::{load, ConfigDocument, ConfigError};
use spec_registry::Resolver;

/// The configuration shipped with the service.
#[allow(dead_code)]
pub const BUNDLED_CONFIG: &str = include_str!("../../conf/spec.conf");

#[allow(dead_code)]
/// Resolver over the bundled configuration.
pub fn bundled_resolver() -> Resolver {
    Resolver::new(load(BUNDLED_CONFIG.as_bytes()).expect("bundled config must load"))
}

/// A small valid document, as JSON, for tests that edit one field.
#[allow(dead_code)]
pub fn fixture() -> Value {
    json!({
        "port": 7001,
        "vosEndpoint": "http://doc.example:8080/vospace-2.0/vospace",
        "authEndpoint": "https://auth.example",
        "tempfilePath": "/tmp",
        "profiles": {
            "default": {
                "description": "production", "type": "public",
                "vosRoot": "vos://example!vospace", "vosRootDir": "/net/users",
                "vosEndpoint": "http://prod.example:8080/vospace-2.0/vospace"
            },
            "bare": {
                "description": "no endpoint", "type": "private",
                "vosRoot": "vos://example!vospace", "vosRootDir": "/scratch/users",
                "vosEndpoint": ""
            }
        },
        "contexts": {
            "default": {
                "description": "default", "type": "public",
                "catalog": "survey.objects", "id_main": "objid", "redshift": "z",
                "rest_frame": "false",
                "catalogs": {
                    "survey.objects": "objects [DEFAULT]",
                    "survey.allobjects": "everything"
                }
            },
            "restframe": {
                "description": "shifted", "type": "public",
                "catalog": "shifted.spectra", "id_main": "specid", "redshift": "zbest",
                "rest_frame": "true",
                "catalogs": { "shifted.spectra": "rest-frame spectra" }
            }
        }
    })
}

#[allow(dead_code)]
pub fn load_value(value: &Value) -> Result<ConfigDocument, ConfigError> {
    load(value.to_string().as_bytes())
}
