//! Stage 2: compare the original with the silhouette and refine it.
//!
//! Refinement is either a text edit (prompt plus the current silhouette) or a
//! canvas edit through the annotation editor. Any prompt still in the box
//! when the user moves on is forwarded to 3D generation.

#[cfg(test)]
#[path = "review_panel_test.rs"]
mod review_panel_test;

use leptos::prelude::*;
use wizard::{BackendConfig, WizardState};

/// Absolute URL of the current silhouette, if one exists.
fn silhouette_src(state: &WizardState, config: &BackendConfig) -> Option<String> {
    state.images().current_2d.as_deref().map(|path| config.resolve(path))
}

/// The Edit button needs a non-blank prompt and an idle wizard.
fn can_submit_text_edit(state: &WizardState) -> bool {
    !state.loading() && !state.edit_prompt().trim().is_empty()
}

fn image_or_placeholder(src: Option<String>, alt: &'static str) -> impl IntoView {
    match src {
        Some(src) => view! { <img class="review__image" src=src alt=alt/> }.into_any(),
        None => view! { <div class="review__placeholder">"No image"</div> }.into_any(),
    }
}

#[component]
pub fn ReviewPanel(
    on_text_edit: Callback<()>,
    on_open_editor: Callback<()>,
    on_generate: Callback<()>,
) -> impl IntoView {
    let wizard = expect_context::<RwSignal<WizardState>>();
    let config = expect_context::<BackendConfig>();

    let original = move || wizard.get().images().original.clone();
    let silhouette = move || silhouette_src(&wizard.get(), &config);
    let silhouette_for_button = silhouette.clone();
    let edit_disabled = move || !can_submit_text_edit(&wizard.get());
    let busy = move || wizard.get().loading();

    view! {
        <section class="panel panel--review">
            <div class="review__images">
                <figure class="review__figure">
                    <figcaption>"Original"</figcaption>
                    {move || image_or_placeholder(original(), "Original sketch")}
                </figure>
                <figure class="review__figure">
                    <figcaption>"Generated Silhouette"</figcaption>
                    {move || image_or_placeholder(silhouette(), "Generated silhouette")}
                    <button
                        class="btn review__draw"
                        disabled=move || busy() || silhouette_for_button().is_none()
                        on:click=move |_| on_open_editor.run(())
                    >
                        "Draw on Image"
                    </button>
                </figure>
            </div>

            <label class="review__label" for="edit-prompt">
                "Edit Instructions (Optional)"
            </label>
            <div class="review__edit-row">
                <input
                    id="edit-prompt"
                    class="review__prompt"
                    type="text"
                    placeholder="e.g., Make it smoother, remove the hole..."
                    prop:value=move || wizard.get().edit_prompt().to_owned()
                    on:input=move |ev| {
                        let text = event_target_value(&ev);
                        wizard.update(|w| w.set_edit_prompt(text));
                    }
                    on:keydown=move |ev: leptos::ev::KeyboardEvent| {
                        if ev.key() == "Enter" && can_submit_text_edit(&wizard.get_untracked()) {
                            on_text_edit.run(());
                        }
                    }
                />
                <button class="btn" disabled=edit_disabled on:click=move |_| on_text_edit.run(())>
                    "Edit"
                </button>
            </div>

            <button
                class="btn btn--primary review__generate"
                disabled=busy
                on:click=move |_| on_generate.run(())
            >
                "Looks Good! Generate 3D Model"
            </button>
        </section>
    }
}
