//! Resolution against the bundled service configuration.

use spec_registry::{ContextError, ProfileError, ResolveError};

mod common;

#[test]
fn test_all_defaults() {
    let resolver = common::bundled_resolver();
    let target = resolver.resolve(Some(""), Some(""), Some("")).unwrap();

    assert_eq!(target.profile, "default");
    assert_eq!(target.endpoint, "http://dldb1.sdm.noao.edu:8080/vospace-2.0/vospace");
    assert_eq!(target.context.context, "default");
    assert_eq!(target.context.catalog, "sdss_dr16.specobj");
    assert_eq!(target.context.id_main, "specobjid");
    assert_eq!(target.context.redshift, "z");
    assert!(!target.context.rest_frame);
}

#[test]
fn test_localhost_dr14() {
    let resolver = common::bundled_resolver();
    let target = resolver.resolve(Some("localhost"), Some("sdss_dr14"), Some("")).unwrap();

    assert_eq!(target.endpoint, "http://localhost:8080/vospace-2.0/vospace");
    assert_eq!(target.context.catalog, "sdss_dr14.specobjall");
    assert_eq!(target.context.id_main, "specobjid");
}

#[test]
fn test_catalog_override_accepted() {
    let resolver = common::bundled_resolver();
    let target = resolver
        .resolve(Some("dldev"), Some("sdss_dr13"), Some("sdss_dr13.dr12q"))
        .unwrap();

    assert_eq!(target.profile, "dldev");
    assert_eq!(target.context.catalog, "sdss_dr13.dr12q");
    assert_eq!(target.context.id_main, "specobjid");
    assert_eq!(target.context.redshift, "z");
}

#[test]
fn test_unknown_profile() {
    let resolver = common::bundled_resolver();
    assert_eq!(
        resolver.resolve(Some("nope"), Some("default"), Some("")),
        Err(ResolveError::Profile(ProfileError::NotFound("nope".into())))
    );
}

#[test]
fn test_catalog_from_other_context() {
    let resolver = common::bundled_resolver();
    assert_eq!(
        resolver.resolve(Some("default"), Some("sdss_dr13"), Some("sdss_dr16.specobj")),
        Err(ResolveError::Context(ContextError::UnknownCatalog {
            context: "sdss_dr13".into(),
            catalog: "sdss_dr16.specobj".into(),
        }))
    );
}

#[test]
fn test_default_and_dr16_are_independent() {
    let resolver = common::bundled_resolver();
    let default = resolver.resolve(None, Some("default"), None).unwrap();
    let dr16 = resolver.resolve(None, Some("sdss_dr16"), None).unwrap();

    assert_eq!(default.context.catalog, dr16.context.catalog);
    assert_eq!(default.context.context, "default");
    assert_eq!(dr16.context.context, "sdss_dr16");
}

#[test]
fn test_every_context_default_resolves() {
    let resolver = common::bundled_resolver();
    for name in resolver.contexts().names() {
        let target = resolver.resolve(None, Some(name), None).unwrap();
        let context = resolver.contexts().get(Some(name)).unwrap();
        assert_eq!(target.context.catalog, context.catalog);
        assert!(context.catalogs.contains_key(&target.context.catalog));
    }
}

#[test]
fn test_default_fallback_matches_named_default() {
    let resolver = common::bundled_resolver();
    assert_eq!(
        resolver.profiles().resolve_profile(None),
        resolver.profiles().resolve_profile(Some("default"))
    );
    assert_eq!(
        resolver.contexts().resolve_context(Some(""), None),
        resolver.contexts().resolve_context(Some("default"), None)
    );
}

#[test]
fn test_passthrough_fields() {
    let resolver = common::bundled_resolver();
    let target = resolver.resolve(None, None, None).unwrap();
    assert_eq!(target.auth_endpoint, "https://datalab.noao.edu/auth");
    assert_eq!(target.tempfile_path, "/tmp");
    assert_eq!(resolver.document().port, 6999);
}
