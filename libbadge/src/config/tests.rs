use super::*;
use std::collections::HashMap;
use std::io::Write;

fn env_from(vars: &[(&str, &str)]) -> Environment {
    let map: HashMap<String, String> = vars
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    Config::environment().source(Some(map))
}

#[test]
fn test_default_config() {
    let config = Config::default();

    assert_eq!(config.registry.url, "https://ghcr.io");
    assert!(config.registry.token_url.is_none());
    assert_eq!(config.registry.token_scheme, TokenScheme::Fetch);

    assert_eq!(config.network.timeout, 10);
    assert_eq!(config.network.user_agent, "Docker-Client/20.10.2 (linux)");

    assert_eq!(config.resolver.max_depth, 8);

    assert_eq!(config.badge.color, "#44cc11");
    assert_eq!(config.badge.invalid_color, "#e05d44");
    assert_eq!(config.badge.size_units, SizeUnits::Binary);
    assert_eq!(config.badge.tags_count, 3);
    assert_eq!(config.badge.ignore, "latest");
    assert_eq!(config.badge.trim, "");
}

#[test]
fn test_from_str_empty_yaml() {
    let config = Config::from_yaml_str("").unwrap();
    assert_eq!(config, Config::default());
}

#[test]
fn test_from_str_partial_yaml() {
    let yaml = r#"
registry:
  token_scheme: encoded
network:
  timeout: 3
badge:
  trim: patch
"#;
    let config = Config::from_yaml_str(yaml).unwrap();

    assert_eq!(config.registry.token_scheme, TokenScheme::Encoded);
    assert_eq!(config.network.timeout, 3);
    assert_eq!(config.badge.trim, "patch");

    assert_eq!(config.registry.url, "https://ghcr.io");
    assert_eq!(config.badge.ignore, "latest");
}

#[test]
fn test_from_str_invalid_enum_value() {
    let result = Config::from_yaml_str("badge: { size_units: metric }");
    assert!(matches!(result.unwrap_err(), BadgeError::Config { .. }));
}

#[test]
fn test_from_str_unknown_field() {
    assert!(Config::from_yaml_str("unknown_field: true").is_ok());
}

#[test]
fn test_load_from_file() {
    let mut file = tempfile::NamedTempFile::with_suffix(".yaml").unwrap();
    writeln!(
        file,
        "registry:\n  url: http://localhost:5000\n  service: localhost\nresolver:\n  max_depth: 4"
    )
    .unwrap();

    let config = Config::build(Some(file.path()), env_from(&[])).unwrap();
    assert_eq!(config.registry.url, "http://localhost:5000");
    assert_eq!(config.registry.service.as_deref(), Some("localhost"));
    assert_eq!(config.resolver.max_depth, 4);
}

#[test]
fn test_load_missing_file_fails() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing.yaml");
    let err = Config::build(Some(&path), env_from(&[])).unwrap_err();
    match err {
        BadgeError::Config { path: Some(p), .. } => assert!(p.ends_with("missing.yaml")),
        other => panic!("Expected Config error with path, got {:?}", other),
    }
}

#[test]
fn test_environment_overrides_file() {
    let mut file = tempfile::NamedTempFile::with_suffix(".yaml").unwrap();
    writeln!(file, "network:\n  timeout: 30").unwrap();

    let env = env_from(&[
        ("BADGE_NETWORK__TIMEOUT", "5"),
        ("BADGE_BADGE__IGNORE", "latest,*-rc*"),
    ]);
    let config = Config::build(Some(file.path()), env).unwrap();
    assert_eq!(config.network.timeout, 5);
    assert_eq!(config.badge.ignore, "latest,*-rc*");
}

#[test]
fn test_environment_without_prefix_is_ignored() {
    let config = Config::build(None, env_from(&[("NETWORK__TIMEOUT", "99")])).unwrap();
    assert_eq!(config.network.timeout, 10);
}

#[test]
fn test_validate_rejects_zero_depth() {
    let err = Config::build(None, env_from(&[("BADGE_RESOLVER__MAX_DEPTH", "0")])).unwrap_err();
    assert!(err.to_string().contains("max_depth"));
}

#[test]
fn test_validate_rejects_zero_timeout() {
    let mut config = Config::default();
    config.network.timeout = 0;
    assert!(config.validate().is_err());
}
