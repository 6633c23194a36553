// Key parser tests.

use super::*;
use crate::error_handling::ErrorKind;

#[test]
fn test_parse_name_only_uses_default_scope() {
    let key = ConfigKey::parse("mail").unwrap();
    assert_eq!(key.scope(), "svc");
    assert_eq!(key.name(), "mail");
}

#[test]
fn test_parse_scope_and_name() {
    let key = ConfigKey::parse("app.max_sessions").unwrap();
    assert_eq!(key.scope(), "app");
    assert_eq!(key.name(), "max_sessions");
    assert_eq!(key.to_string(), "app.max_sessions");
}

#[test]
fn test_parse_trims_whitespace() {
    let key = ConfigKey::parse("  project.smtp-host \n").unwrap();
    assert_eq!(key.scope(), "project");
    assert_eq!(key.name(), "smtp-host");
}

#[test]
fn test_parse_rejects_two_dots() {
    let err = ConfigKey::parse("a.b.c").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidKeyFormat);
}

#[test]
fn test_parse_rejects_empty_parts() {
    for raw in ["", "   ", ".name", "scope.", "."] {
        let err = ConfigKey::parse(raw).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidKeyFormat, "{raw:?} should be rejected");
    }
}

#[test]
fn test_parse_rejects_injection_characters() {
    for raw in [
        "name&env=prod",
        "name'; drop table configuration;--",
        "svc.na me",
        "sc/ope.name",
        "name?x=1",
        "naïve",
        "scope.name%20",
    ] {
        let err = ConfigKey::parse(raw).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidKeyFormat, "{raw:?} should be rejected");
    }
}

#[test]
fn test_is_valid_name() {
    assert!(is_valid_name("ABC_def-123"));
    assert!(!is_valid_name(""));
    assert!(!is_valid_name("a.b"));
    assert!(!is_valid_name("a b"));
}

#[test]
fn test_from_str() {
    let key: ConfigKey = "svc.port".parse().unwrap();
    assert_eq!(key, ConfigKey::parse("port").unwrap());
}
