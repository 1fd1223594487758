//! Stage 1: sketch file picker.

use leptos::prelude::*;

/// Drop-zone style file picker. `on_file` receives the input's change event.
#[component]
pub fn UploadPanel(on_file: Callback<leptos::ev::Event>) -> impl IntoView {
    let accept = wizard::backend::accept_attribute();

    view! {
        <section class="panel panel--upload">
            <label class="upload-zone">
                <input
                    class="upload-zone__input"
                    type="file"
                    accept=accept
                    on:change=move |ev| on_file.run(ev)
                />
                <span class="upload-zone__icon">"⬆"</span>
                <span class="upload-zone__title">"Upload your image"</span>
                <span class="upload-zone__hint">"Supports JPG, PNG, WEBP"</span>
            </label>
        </section>
    }
}
