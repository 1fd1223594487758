use super::*;

#[test]
fn success_status_reaches_parser() {
    let parsed = classify_response(200, b"abc", |body| Ok(body.len()));
    assert_eq!(parsed, Ok(3));
}

#[test]
fn error_status_uses_detail_body() {
    let parsed: Result<(), ApiError> = classify_response(404, br#"{"detail":"Session not found"}"#, |_| Ok(()));
    assert_eq!(
        parsed,
        Err(ApiError::Status { status: 404, detail: Some("Session not found".to_owned()) })
    );
}

#[test]
fn parser_is_skipped_on_server_error() {
    let parsed: Result<(), ApiError> = classify_response(500, b"Internal Server Error", |_| {
        Err(ApiError::Malformed("should not run".to_owned()))
    });
    assert_eq!(parsed, Err(ApiError::Status { status: 500, detail: None }));
}

#[test]
fn upload_body_is_parsed_through_envelope() {
    let body = br#"{"success":true,"session_id":"abc123","data":{"silhouette_2d":{"url_path":"/files/abc123/sil_v1.png"}}}"#;
    let outcome = classify_response(200, body, wizard::api::parse_upload).unwrap();
    assert_eq!(outcome.session.as_str(), "abc123");
}

#[test]
fn timeout_millis_scales_and_saturates() {
    assert_eq!(timeout_millis(180), 180_000);
    assert_eq!(timeout_millis(u64::MAX), u32::MAX);
}

#[test]
fn backend_keeps_config() {
    let backend = HttpBackend::new(BackendConfig::default());
    assert_eq!(backend.config().origin(), "http://127.0.0.1:8000");
}
