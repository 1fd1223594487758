use super::*;

#[test]
fn default_points_at_local_backend() {
    let config = BackendConfig::default();
    assert_eq!(config.origin(), "http://127.0.0.1:8000");
    assert_eq!(config.endpoint(Endpoint::Generate2d), "http://127.0.0.1:8000/api/generate2d");
    assert_eq!(config.endpoint(Endpoint::Edit2d), "http://127.0.0.1:8000/api/edit2d");
    assert_eq!(config.endpoint(Endpoint::Generate3d), "http://127.0.0.1:8000/api/generate3D");
    assert_eq!(config.endpoint(Endpoint::Health), "http://127.0.0.1:8000/api/");
}

#[test]
fn default_timeouts() {
    let timeouts = BackendConfig::default().timeouts();
    assert_eq!(timeouts.request_secs, 180);
    assert_eq!(timeouts.connect_secs, 10);
}

#[test]
fn origin_trailing_slash_is_trimmed() {
    let config = BackendConfig::new("https://keychain.example.com/").unwrap();
    assert_eq!(config.origin(), "https://keychain.example.com");
}

#[test]
fn origin_requires_http_scheme() {
    for bad in ["", "localhost:8000", "ftp://host", "http://", "http://bad host"] {
        assert!(
            matches!(BackendConfig::new(bad), Err(ConfigError::InvalidOrigin(_))),
            "{bad:?} should be rejected"
        );
    }
}

#[test]
fn api_prefix_is_normalized() {
    let config = BackendConfig::default().with_api_prefix("v2/").unwrap();
    assert_eq!(config.api_prefix(), "/v2");
    assert_eq!(config.endpoint(Endpoint::Edit2d), "http://127.0.0.1:8000/v2/edit2d");

    let root = BackendConfig::default().with_api_prefix("/").unwrap();
    assert_eq!(root.endpoint(Endpoint::Generate2d), "http://127.0.0.1:8000/generate2d");
}

#[test]
fn api_prefix_rejects_urls() {
    assert!(matches!(
        BackendConfig::default().with_api_prefix("http://other/api"),
        Err(ConfigError::InvalidApiPrefix(_))
    ));
}

#[test]
fn resolve_joins_relative_paths_to_origin() {
    let config = BackendConfig::default();
    assert_eq!(config.resolve("/files/abc123/model.stl"), "http://127.0.0.1:8000/files/abc123/model.stl");
    assert_eq!(config.resolve("files/a.png"), "http://127.0.0.1:8000/files/a.png");
}

#[test]
fn resolve_passes_absolute_urls_through() {
    let config = BackendConfig::default();
    assert_eq!(config.resolve("https://cdn.example.com/a.png"), "https://cdn.example.com/a.png");
}

#[test]
fn with_timeouts_replaces_both() {
    let config = BackendConfig::default().with_timeouts(Timeouts { request_secs: 5, connect_secs: 1 });
    assert_eq!(config.timeouts(), Timeouts { request_secs: 5, connect_secs: 1 });
}
