//! Modal overlay covering the wizard while a backend call is outstanding.

use leptos::prelude::*;
use wizard::WizardState;

#[component]
pub fn LoadingOverlay() -> impl IntoView {
    let wizard = expect_context::<RwSignal<WizardState>>();

    view! {
        <Show when=move || wizard.get().loading()>
            <div class="loading-overlay" role="status" aria-live="polite">
                <div class="loading-overlay__spinner"></div>
                <p class="loading-overlay__title">"Processing..."</p>
                <p class="loading-overlay__hint">"This usually takes 10-30 seconds"</p>
            </div>
        </Show>
    }
}
