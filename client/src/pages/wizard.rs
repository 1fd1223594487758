//! Wizard page: upload, review and edit, then download.
//!
//! ARCHITECTURE
//! ============
//! Signals cannot be borrowed across an await, so every backend operation
//! runs in three steps:
//!
//! 1. `begin` inside `wizard.try_update`, which claims the in-flight slot and
//!    snapshots the state the request is built from;
//! 2. a spawned task calling the `wizard::controller` runner against the
//!    snapshot through [`HttpBackend`];
//! 3. `finish_*` inside `wizard.try_update`.
//!
//! A restart while a call is outstanding moves the wizard to a new epoch, and
//! the late `finish_*` is dropped as superseded.
//!
//! ERROR HANDLING
//! ==============
//! Failures end up in the wizard's banner through `finish_*`. Refused
//! triggers (busy, wrong stage) and superseded results are only logged.

#[cfg(test)]
#[path = "wizard_test.rs"]
mod wizard_test;

use leptos::prelude::*;
use wizard::{Operation, Stage, Ticket, WizardError, WizardState};

use crate::components::error_banner::ErrorBanner;
use crate::components::image_editor::ImageEditor;
use crate::components::loading_overlay::LoadingOverlay;
use crate::components::result_panel::ResultPanel;
use crate::components::review_panel::ReviewPanel;
use crate::components::stage_progress::StageProgress;
use crate::components::upload_panel::UploadPanel;
use crate::state::ui::UiState;

#[cfg(feature = "csr")]
use wizard::{ApiError, Backend, BackendConfig, ImageFile};

#[cfg(feature = "csr")]
use crate::net::api::HttpBackend;
#[cfg(feature = "csr")]
use crate::util::files;

/// MIME type used when saving the model locally.
#[cfg(feature = "csr")]
const STL_MIME: &str = "model/stl";

/// Claim the in-flight slot for `op`. A refusal is logged, not shown.
fn begin_operation(state: &mut WizardState, op: Operation) -> Option<Ticket> {
    match state.begin(op) {
        Ok(ticket) => Some(ticket),
        Err(e) => {
            leptos::logging::warn!("ignoring {op}: {e}");
            None
        }
    }
}

/// Prompt for a text edit, or `None` when the box is blank.
fn pending_prompt(state: &WizardState) -> Option<String> {
    let prompt = state.edit_prompt();
    (!prompt.trim().is_empty()).then(|| prompt.to_owned())
}

/// Start a text edit: returns the ticket, the snapshot, and the prompt.
fn begin_text_edit(state: &mut WizardState) -> Option<(Ticket, WizardState, String)> {
    let prompt = pending_prompt(state)?;
    let ticket = begin_operation(state, Operation::TextEdit)?;
    Some((ticket, state.clone(), prompt))
}

/// Start an operation that needs a snapshot of the state it began from.
fn begin_with_snapshot(state: &mut WizardState, op: Operation) -> Option<(Ticket, WizardState)> {
    let ticket = begin_operation(state, op)?;
    Some((ticket, state.clone()))
}

fn log_outcome(op: Operation, result: &Result<(), WizardError>) {
    match result {
        Ok(()) => leptos::logging::log!("{op} finished"),
        Err(WizardError::Superseded(_)) => leptos::logging::log!("{op} result dropped after restart"),
        Err(e) => leptos::logging::warn!("{op} failed: {e}"),
    }
}

/// Close the annotation editor only once a canvas edit was accepted.
fn close_editor_after_edit(ui: &mut UiState, accepted: bool) {
    if accepted {
        ui.close_editor();
    }
}

/// Apply a `finish_*` transition; `true` when the operation succeeded.
///
/// A disposed signal counts as superseded.
fn settle(
    wizard: RwSignal<WizardState>,
    op: Operation,
    finish: impl FnOnce(&mut WizardState) -> Result<(), WizardError>,
) -> bool {
    let result = wizard.try_update(finish).unwrap_or(Err(WizardError::Superseded(op)));
    log_outcome(op, &result);
    result.is_ok()
}

#[cfg(feature = "csr")]
async fn run_upload(
    file: web_sys::File,
    backend: HttpBackend,
    wizard: RwSignal<WizardState>,
    ui: RwSignal<UiState>,
) {
    let Some(ticket) = wizard.try_update(|w| begin_operation(w, Operation::Upload)).flatten() else {
        return;
    };
    let outcome = match files::read_file(&file).await {
        Ok(bytes) => match ImageFile::from_name(file.name(), bytes) {
            Ok(image) => {
                log::info!("uploading {} ({} bytes)", image.name, image.bytes.len());
                backend.generate_2d(image).await
            }
            Err(e) => Err(e),
        },
        Err(message) => Err(ApiError::Resource(message)),
    };
    let original = if outcome.is_ok() { files::create_object_url(&file) } else { None };
    let succeeded = settle(wizard, Operation::Upload, |w| w.finish_upload(ticket, outcome, original.clone()));
    let Some(url) = original else {
        return;
    };
    if succeeded {
        if let Some(previous) = ui.try_update(|u| u.replace_object_url(url)).flatten() {
            files::revoke_object_url(&previous);
        }
    } else {
        files::revoke_object_url(&url);
    }
}

#[cfg(feature = "csr")]
async fn run_text_edit(backend: HttpBackend, wizard: RwSignal<WizardState>) {
    let Some((ticket, snapshot, prompt)) = wizard.try_update(begin_text_edit).flatten() else {
        return;
    };
    let outcome = wizard::controller::run_text_edit(&backend, &snapshot, &prompt).await;
    settle(wizard, Operation::TextEdit, |w| w.finish_edit(ticket, outcome));
}

#[cfg(feature = "csr")]
async fn run_canvas_edit(
    backend: HttpBackend,
    wizard: RwSignal<WizardState>,
    ui: RwSignal<UiState>,
    image: Vec<u8>,
    prompt: String,
) {
    let Some((ticket, snapshot)) = wizard
        .try_update(|w| begin_with_snapshot(w, Operation::CanvasEdit))
        .flatten()
    else {
        return;
    };
    let outcome = wizard::controller::run_canvas_edit(&backend, &snapshot, image, &prompt).await;
    let accepted = settle(wizard, Operation::CanvasEdit, |w| w.finish_edit(ticket, outcome));
    if ui.try_update(|u| close_editor_after_edit(u, accepted)).is_none() {
        log::debug!("wizard page gone before the canvas edit settled");
    }
}

#[cfg(feature = "csr")]
async fn run_generate(backend: HttpBackend, wizard: RwSignal<WizardState>) {
    let Some((ticket, snapshot)) = wizard
        .try_update(|w| begin_with_snapshot(w, Operation::Generate3d))
        .flatten()
    else {
        return;
    };
    let outcome = wizard::controller::run_generate_3d(&backend, &snapshot).await;
    settle(wizard, Operation::Generate3d, |w| w.finish_generate(ticket, outcome));
}

/// Fetch the model and save it under the session-derived name. If the fetch
/// fails, fall back to a plain link so the browser can try directly.
#[cfg(feature = "csr")]
async fn run_download(backend: HttpBackend, wizard: RwSignal<WizardState>) {
    let Some(target) = wizard.with_untracked(|w| wizard::controller::download_target(w, backend.config())) else {
        return;
    };
    log::info!("downloading {} as {}", target.url, target.filename);
    let saved = match backend.fetch_resource(&target.url).await {
        Ok(bytes) => files::save_bytes(&bytes, &target.filename, STL_MIME),
        Err(e) => {
            log::warn!("model fetch failed ({e}); falling back to a direct link");
            files::trigger_download(&target.url, &target.filename)
        }
    };
    if let Err(message) = saved {
        log::warn!("download failed: {message}");
    }
}

#[cfg(feature = "csr")]
fn picked_file(ev: &leptos::ev::Event) -> Option<web_sys::File> {
    let input = event_target::<web_sys::HtmlInputElement>(ev);
    let file = input.files().and_then(|list| list.get(0));
    input.set_value("");
    file
}

/// Wizard page. Renders the panel for the active stage.
#[component]
pub fn WizardPage() -> impl IntoView {
    let wizard = expect_context::<RwSignal<WizardState>>();
    let ui = expect_context::<RwSignal<UiState>>();

    #[cfg(feature = "csr")]
    let backend = HttpBackend::new(expect_context::<BackendConfig>());

    #[cfg(feature = "csr")]
    on_cleanup(move || {
        if let Some(url) = ui.try_update(UiState::reset).flatten() {
            files::revoke_object_url(&url);
        }
    });

    let on_file = {
        #[cfg(feature = "csr")]
        {
            let backend = backend.clone();
            Callback::new(move |ev: leptos::ev::Event| {
                if let Some(file) = picked_file(&ev) {
                    leptos::task::spawn_local(run_upload(file, backend.clone(), wizard, ui));
                }
            })
        }
        #[cfg(not(feature = "csr"))]
        {
            Callback::new(move |_ev: leptos::ev::Event| {})
        }
    };

    let on_text_edit = {
        #[cfg(feature = "csr")]
        {
            let backend = backend.clone();
            Callback::new(move |()| leptos::task::spawn_local(run_text_edit(backend.clone(), wizard)))
        }
        #[cfg(not(feature = "csr"))]
        {
            Callback::new(move |()| {})
        }
    };

    let on_canvas_save = {
        #[cfg(feature = "csr")]
        {
            let backend = backend.clone();
            Callback::new(move |(image, description): (Vec<u8>, String)| {
                leptos::task::spawn_local(run_canvas_edit(backend.clone(), wizard, ui, image, description));
            })
        }
        #[cfg(not(feature = "csr"))]
        {
            Callback::new(move |_: (Vec<u8>, String)| {})
        }
    };

    let on_generate = {
        #[cfg(feature = "csr")]
        {
            let backend = backend.clone();
            Callback::new(move |()| leptos::task::spawn_local(run_generate(backend.clone(), wizard)))
        }
        #[cfg(not(feature = "csr"))]
        {
            Callback::new(move |()| {})
        }
    };

    let on_download = {
        #[cfg(feature = "csr")]
        {
            let backend = backend.clone();
            Callback::new(move |()| leptos::task::spawn_local(run_download(backend.clone(), wizard)))
        }
        #[cfg(not(feature = "csr"))]
        {
            Callback::new(move |()| {})
        }
    };

    let on_open_editor = Callback::new(move |()| {
        let stage = wizard.get_untracked().stage();
        ui.update(|u| {
            u.open_editor(stage);
        });
    });
    let on_close_editor = Callback::new(move |()| ui.update(UiState::close_editor));

    let on_restart = Callback::new(move |()| {
        wizard.update(WizardState::restart);
        let stale = ui.try_update(UiState::reset).flatten();
        #[cfg(feature = "csr")]
        {
            if let Some(url) = stale {
                files::revoke_object_url(&url);
            }
        }
        #[cfg(not(feature = "csr"))]
        drop(stale);
    });

    // Memos keep the panels and the editor mounted while unrelated fields change.
    let stage = Memo::new(move |_| wizard.get().stage());
    let editor_path = Memo::new(move |_| editor_image(&ui.get(), &wizard.get()));

    view! {
        <main class="wizard">
            <header class="wizard__header">
                <h1>"3D KeyChain Maker"</h1>
                <p class="wizard__subtitle">"From Sketch to STL in seconds"</p>
            </header>

            <StageProgress/>
            <ErrorBanner/>

            {move || match stage.get() {
                Stage::Upload => view! { <UploadPanel on_file=on_file/> }.into_any(),
                Stage::Review => view! {
                    <ReviewPanel
                        on_text_edit=on_text_edit
                        on_open_editor=on_open_editor
                        on_generate=on_generate
                    />
                }
                .into_any(),
                Stage::Result => view! { <ResultPanel on_download=on_download on_restart=on_restart/> }.into_any(),
            }}

            {move || {
                editor_path
                    .get()
                    .map(|path| {
                        view! {
                            <ImageEditor image_path=path on_save=on_canvas_save on_cancel=on_close_editor/>
                        }
                    })
            }}

            <LoadingOverlay/>
        </main>
    }
}

/// Silhouette to annotate while the editor is open in the Review stage.
fn editor_image(ui: &UiState, state: &WizardState) -> Option<String> {
    if !ui.show_editor || state.stage() != Stage::Review {
        return None;
    }
    state.images().current_2d.clone()
}
