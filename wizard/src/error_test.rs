use super::*;

#[test]
fn rejected_with_message_shows_backend_text() {
    let err = ApiError::Rejected { message: Some("invalid image".to_owned()) };
    assert_eq!(err.user_message(Operation::Upload), "invalid image");
}

#[test]
fn rejected_without_message_uses_operation_fallback() {
    let err = ApiError::Rejected { message: None };
    assert_eq!(err.user_message(Operation::Upload), "2D generation failed");
    assert_eq!(err.user_message(Operation::TextEdit), "Edit failed");
    assert_eq!(err.user_message(Operation::CanvasEdit), "Edit failed");
    assert_eq!(err.user_message(Operation::Generate3d), "3D generation failed");
}

#[test]
fn rejected_with_blank_message_uses_fallback() {
    let err = ApiError::Rejected { message: Some("   ".to_owned()) };
    assert_eq!(err.user_message(Operation::Generate3d), "3D generation failed");
}

#[test]
fn status_detail_wins_over_fallback() {
    let err = ApiError::Status { status: 422, detail: Some("session not found".to_owned()) };
    assert_eq!(err.user_message(Operation::TextEdit), "session not found");
}

#[test]
fn status_without_detail_uses_request_fallback() {
    let err = ApiError::Status { status: 500, detail: None };
    assert_eq!(err.user_message(Operation::Upload), "Request error");
    assert_eq!(err.user_message(Operation::CanvasEdit), "Edit request failed");
    assert_eq!(err.user_message(Operation::Generate3d), "3D generation request failed");
}

#[test]
fn transport_and_timeout_use_request_fallback() {
    let transport = ApiError::Transport("connection refused".to_owned());
    let timeout = ApiError::Timeout { secs: 180 };
    assert_eq!(transport.user_message(Operation::Upload), "Request error");
    assert_eq!(timeout.user_message(Operation::Generate3d), "3D generation request failed");
}

#[test]
fn malformed_uses_request_fallback() {
    let err = ApiError::Malformed("missing `data`".to_owned());
    assert_eq!(err.user_message(Operation::TextEdit), "Edit request failed");
}

#[test]
fn resource_message_is_shown_verbatim() {
    let err = ApiError::Resource("unsupported image type: notes.txt".to_owned());
    assert_eq!(err.user_message(Operation::Upload), "unsupported image type: notes.txt");
}

#[test]
fn display_strings_are_readable() {
    assert_eq!(ApiError::Timeout { secs: 10 }.to_string(), "request timed out after 10s");
    assert_eq!(
        ApiError::Rejected { message: None }.to_string(),
        "backend rejected request: no message"
    );
    assert_eq!(WizardError::Busy(Operation::TextEdit).to_string(), "text edit is already in progress");
    assert_eq!(
        WizardError::WrongStage { op: Operation::Generate3d, stage: Stage::Upload }.to_string(),
        "3D generation is not available during the Upload stage"
    );
    assert_eq!(
        WizardError::Failed { op: Operation::Upload, message: "invalid image".to_owned() }.to_string(),
        "invalid image"
    );
}

#[test]
fn config_error_quotes_input() {
    assert_eq!(
        ConfigError::InvalidOrigin("ftp://x".to_owned()).to_string(),
        "invalid backend origin: \"ftp://x\""
    );
}
