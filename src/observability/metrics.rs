//! Metrics collection.
//!
//! # Metrics
//! - `registry_resolutions_total` (counter): resolutions by `outcome`
//! - `registry_reloads_total` (counter): reload attempts by `result`
//! - `registry_profiles` (gauge): profiles in the published document
//! - `registry_contexts` (gauge): contexts in the published document

use crate::config::schema::ConfigDocument;

pub fn record_resolution(outcome: &'static str) {
    ::metrics::counter!("registry_resolutions_total", "outcome" => outcome).increment(1);
}

pub fn record_reload(success: bool) {
    let result = if success { "ok" } else { "error" };
    ::metrics::counter!("registry_reloads_total", "result" => result).increment(1);
}

pub fn record_document(document: &ConfigDocument) {
    ::metrics::gauge!("registry_profiles").set(document.profiles.len() as f64);
    ::metrics::gauge!("registry_contexts").set(document.contexts.len() as f64);
}
