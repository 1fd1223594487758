use super::*;

#[test]
fn default_has_editor_closed() {
    let state = UiState::default();
    assert!(!state.show_editor);
    assert!(state.object_url.is_none());
}

#[test]
fn editor_opens_only_during_review() {
    let mut state = UiState::default();
    assert!(!state.open_editor(Stage::Upload));
    assert!(!state.open_editor(Stage::Result));
    assert!(state.open_editor(Stage::Review));
    state.close_editor();
    assert!(!state.show_editor);
}

#[test]
fn replacing_object_url_hands_back_previous() {
    let mut state = UiState::default();
    assert_eq!(state.replace_object_url("blob:a".to_owned()), None);
    assert_eq!(state.replace_object_url("blob:b".to_owned()), Some("blob:a".to_owned()));
    assert_eq!(state.object_url.as_deref(), Some("blob:b"));
}

#[test]
fn reset_closes_editor_and_releases_url() {
    let mut state = UiState { show_editor: true, object_url: Some("blob:a".to_owned()) };
    assert_eq!(state.reset(), Some("blob:a".to_owned()));
    assert_eq!(state, UiState::default());
}
