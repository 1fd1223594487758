use super::*;

#[test]
fn earlier_steps_are_done_and_later_pending() {
    assert_eq!(step_class(Stage::Upload, Stage::Review), "progress__step progress__step--done");
    assert_eq!(step_class(Stage::Review, Stage::Review), "progress__step progress__step--active");
    assert_eq!(step_class(Stage::Result, Stage::Review), "progress__step");
}

#[test]
fn first_stage_is_active_on_a_fresh_run() {
    let current = WizardState::new().stage();
    assert_eq!(step_class(Stage::Upload, current), "progress__step progress__step--active");
}
