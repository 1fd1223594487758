use super::*;
use wizard::ApiError;
use wizard::api::parse_upload;

fn reviewing() -> WizardState {
    let mut state = WizardState::new();
    let ticket = state.begin(Operation::Upload).unwrap();
    let body = br#"{"success":true,"session_id":"abc123","data":{"silhouette_2d":{"url_path":"/files/abc123_v1.png"}}}"#;
    state.finish_upload(ticket, parse_upload(body), None).unwrap();
    state
}

// =============================================================
// Operation start
// =============================================================

#[test]
fn second_trigger_while_busy_is_ignored() {
    let mut state = reviewing();
    assert!(begin_operation(&mut state, Operation::Generate3d).is_some());
    assert_eq!(begin_operation(&mut state, Operation::CanvasEdit), None);
    assert_eq!(state.in_flight(), Some(Operation::Generate3d));
}

#[test]
fn upload_is_refused_during_review() {
    let mut state = reviewing();
    assert_eq!(begin_operation(&mut state, Operation::Upload), None);
    assert!(!state.loading());
}

#[test]
fn blank_prompt_does_not_start_text_edit() {
    let mut state = reviewing();
    state.set_edit_prompt("  \t");
    assert_eq!(begin_text_edit(&mut state), None);
    assert!(!state.loading());
}

#[test]
fn text_edit_snapshot_carries_prompt_and_version() {
    let mut state = reviewing();
    state.set_edit_prompt("remove the hole");
    let (_, snapshot, prompt) = begin_text_edit(&mut state).unwrap();
    assert_eq!(prompt, "remove the hole");
    assert_eq!(snapshot.edit_version(), 2);
    assert!(state.loading());
}

#[test]
fn snapshot_is_taken_after_begin() {
    let mut state = reviewing();
    let (ticket, snapshot) = begin_with_snapshot(&mut state, Operation::Generate3d).unwrap();
    assert!(snapshot.is_current(ticket));
}

// =============================================================
// Finish
// =============================================================

#[test]
fn settle_applies_edit_result() {
    let mut state = reviewing();
    state.set_edit_prompt("remove the hole");
    let (ticket, _, _) = begin_text_edit(&mut state).unwrap();
    let wizard = RwSignal::new(state);

    assert!(settle(wizard, Operation::TextEdit, |w| w.finish_edit(ticket, Ok("/files/abc123_v2.png".to_owned()))));
    let state = wizard.get_untracked();
    assert_eq!(state.images().current_2d.as_deref(), Some("/files/abc123_v2.png"));
    assert_eq!(state.edit_version(), 3);
    assert_eq!(state.edit_prompt(), "");
}

#[test]
fn settle_after_restart_drops_result() {
    let mut state = reviewing();
    let ticket = state.begin(Operation::Generate3d).unwrap();
    state.restart();
    let wizard = RwSignal::new(state);

    assert!(!settle(wizard, Operation::Generate3d, |w| w.finish_generate(ticket, Ok(Default::default()))));
    assert_eq!(wizard.get_untracked().stage(), Stage::Upload);
}

// =============================================================
// Editor overlay
// =============================================================

#[test]
fn editor_shows_current_silhouette_only_when_open() {
    let state = reviewing();
    let mut ui = UiState::default();
    assert_eq!(editor_image(&ui, &state), None);
    assert!(ui.open_editor(state.stage()));
    assert_eq!(editor_image(&ui, &state).as_deref(), Some("/files/abc123_v1.png"));
}

#[test]
fn editor_closes_with_the_review_stage() {
    let mut state = reviewing();
    let mut ui = UiState::default();
    ui.open_editor(state.stage());
    state.restart();
    assert_eq!(editor_image(&ui, &state), None);
}

#[test]
fn rejected_canvas_edit_keeps_editor_open() {
    let mut state = reviewing();
    let mut ui = UiState::default();
    ui.open_editor(state.stage());
    let (ticket, _) = begin_with_snapshot(&mut state, Operation::CanvasEdit).unwrap();
    let wizard = RwSignal::new(state);

    let rejected = Err(ApiError::Rejected { message: Some("invalid image".to_owned()) });
    let accepted = settle(wizard, Operation::CanvasEdit, |w| w.finish_edit(ticket, rejected));
    close_editor_after_edit(&mut ui, accepted);

    assert!(!accepted);
    assert!(ui.show_editor);
    let state = wizard.get_untracked();
    assert_eq!(state.error(), Some("invalid image"));
    assert_eq!(editor_image(&ui, &state).as_deref(), Some("/files/abc123_v1.png"));
}

#[test]
fn refused_canvas_edit_keeps_editor_open() {
    let mut state = reviewing();
    let mut ui = UiState::default();
    ui.open_editor(state.stage());
    begin_operation(&mut state, Operation::Generate3d).unwrap();

    let started = begin_with_snapshot(&mut state, Operation::CanvasEdit);
    close_editor_after_edit(&mut ui, started.is_some());

    assert!(started.is_none());
    assert!(ui.show_editor);
}

#[test]
fn accepted_canvas_edit_closes_editor() {
    let mut state = reviewing();
    let mut ui = UiState::default();
    ui.open_editor(state.stage());
    let (ticket, _) = begin_with_snapshot(&mut state, Operation::CanvasEdit).unwrap();
    let wizard = RwSignal::new(state);

    let accepted = settle(wizard, Operation::CanvasEdit, |w| w.finish_edit(ticket, Ok("/files/abc123_v2.png".to_owned())));
    close_editor_after_edit(&mut ui, accepted);

    assert!(accepted);
    assert!(!ui.show_editor);
    assert_eq!(editor_image(&ui, &wizard.get_untracked()), None);
}
