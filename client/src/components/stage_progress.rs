//! Three-step progress indicator shown above every stage.

#[cfg(test)]
#[path = "stage_progress_test.rs"]
mod stage_progress_test;

use leptos::prelude::*;
use wizard::{Stage, WizardState};

/// CSS class for `step` given the wizard's `current` stage.
fn step_class(step: Stage, current: Stage) -> &'static str {
    match step.cmp(&current) {
        std::cmp::Ordering::Less => "progress__step progress__step--done",
        std::cmp::Ordering::Equal => "progress__step progress__step--active",
        std::cmp::Ordering::Greater => "progress__step",
    }
}

#[component]
pub fn StageProgress() -> impl IntoView {
    let wizard = expect_context::<RwSignal<WizardState>>();

    view! {
        <ol class="progress">
            {Stage::ALL
                .into_iter()
                .map(|step| {
                    view! {
                        <li class=move || step_class(step, wizard.get().stage())>
                            <span class="progress__number">{step.number()}</span>
                            <span class="progress__label">{step.label()}</span>
                        </li>
                    }
                })
                .collect_view()}
        </ol>
    }
}
