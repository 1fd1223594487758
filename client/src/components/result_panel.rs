//! Stage 3: render preview, STL download, and restart.

#[cfg(test)]
#[path = "result_panel_test.rs"]
mod result_panel_test;

use leptos::prelude::*;
use wizard::{BackendConfig, WizardState};

/// Absolute URL of the render preview. A missing preview is not an error.
fn preview_src(state: &WizardState, config: &BackendConfig) -> Option<String> {
    state.result().preview.as_deref().map(|path| config.resolve(path))
}

fn download_enabled(state: &WizardState) -> bool {
    state.result().model.is_some() && !state.loading()
}

#[component]
pub fn ResultPanel(on_download: Callback<()>, on_restart: Callback<()>) -> impl IntoView {
    let wizard = expect_context::<RwSignal<WizardState>>();
    let config = expect_context::<BackendConfig>();

    let preview = move || preview_src(&wizard.get(), &config);

    view! {
        <section class="panel panel--result">
            <h2 class="result__title">"3D Model Ready!"</h2>
            <p class="result__subtitle">"Your keychain model has been successfully generated."</p>

            <figure class="result__preview">
                <figcaption>"Rendering Preview"</figcaption>
                {move || match preview() {
                    Some(src) => view! { <img class="result__image" src=src alt="Rendered keychain"/> }.into_any(),
                    None => view! { <div class="result__placeholder">"No Preview"</div> }.into_any(),
                }}
            </figure>

            <div class="result__actions">
                <button
                    class="btn btn--primary"
                    disabled=move || !download_enabled(&wizard.get())
                    on:click=move |_| on_download.run(())
                >
                    "Download STL File"
                </button>
                <button class="btn" on:click=move |_| on_restart.run(())>
                    "Start New Project"
                </button>
            </div>
        </section>
    }
}
