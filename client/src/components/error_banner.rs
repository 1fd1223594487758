//! Error banner for the last failed operation.
//!
//! The banner clears itself when the next operation begins; the close button
//! only hides it early.

use leptos::prelude::*;
use wizard::WizardState;

#[component]
pub fn ErrorBanner() -> impl IntoView {
    let wizard = expect_context::<RwSignal<WizardState>>();
    let message = move || wizard.get().error().map(str::to_owned);

    view! {
        {move || {
            message()
                .map(|text| {
                    view! {
                        <div class="error-banner" role="alert">
                            <span class="error-banner__text">{text}</span>
                            <button
                                class="error-banner__close"
                                title="Dismiss"
                                on:click=move |_| wizard.update(WizardState::dismiss_error)
                            >
                                "×"
                            </button>
                        </div>
                    }
                })
        }}
    }
}
