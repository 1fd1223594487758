//! Annotation editor overlay: draw on the silhouette and describe changes.
//!
//! ARCHITECTURE
//! ============
//! `canvas::engine::EditorCore` owns the strokes, mode, and background state.
//! This component only forwards DOM events to it and mirrors a small
//! [`EditorView`] snapshot into a signal so buttons and overlays re-render.
//! The editor lives in an `Rc<RefCell<Option<_>>>` because it wraps a canvas
//! element and is only created once the node is mounted.
//!
//! Unmounting the component drops the editor. A background load still in
//! flight then finishes against a detached canvas and is discarded.

#[cfg(test)]
#[path = "image_editor_test.rs"]
mod image_editor_test;

use leptos::prelude::*;

use canvas::engine::{EditorCore, LoadState};
use canvas::input::Mode;
use canvas::surface::Surface;

#[cfg(feature = "csr")]
use std::cell::RefCell;
#[cfg(feature = "csr")]
use std::rc::Rc;

#[cfg(feature = "csr")]
use canvas::engine::Action;
#[cfg(feature = "csr")]
use canvas::render::{CanvasSurface, Editor};
#[cfg(feature = "csr")]
use wizard::BackendConfig;

#[cfg(feature = "csr")]
use crate::util::canvas_input::{pointer_button, pointer_point};
use crate::util::image_load::LOAD_FAILED_MESSAGE;

/// What the toolbar and overlays need to know about the editor.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EditorView {
    pub load: LoadState,
    pub mode: Mode,
    pub strokes: usize,
}

impl Default for EditorView {
    fn default() -> Self {
        Self { load: LoadState::Loading, mode: Mode::Select, strokes: 0 }
    }
}

impl EditorView {
    pub fn of<S: Surface>(editor: &EditorCore<S>) -> Self {
        Self { load: editor.load_state().clone(), mode: editor.mode(), strokes: editor.stroke_count() }
    }

    /// Everything except Cancel waits for the background.
    pub fn controls_enabled(&self) -> bool {
        self.load == LoadState::Ready
    }

    pub fn status_text(&self) -> Option<&'static str> {
        match self.load {
            LoadState::Loading => Some("Loading image..."),
            LoadState::Failed(_) => Some(LOAD_FAILED_MESSAGE),
            LoadState::Ready => None,
        }
    }
}

#[cfg(feature = "csr")]
type SharedEditor = Rc<RefCell<Option<Editor>>>;

/// Run `f` against the mounted editor and publish the new snapshot.
#[cfg(feature = "csr")]
fn with_editor<T>(editor: &SharedEditor, view: RwSignal<EditorView>, f: impl FnOnce(&mut Editor) -> T) -> Option<T> {
    let mut slot = editor.borrow_mut();
    let core = slot.as_mut()?;
    let out = f(core);
    view.set(EditorView::of(core));
    Some(out)
}

#[cfg(feature = "csr")]
fn set_cursor(canvas_ref: NodeRef<leptos::html::Canvas>, cursor: &str) {
    let Some(canvas) = canvas_ref.get_untracked() else {
        return;
    };
    if let Err(e) = canvas.style().set_property("cursor", cursor) {
        leptos::logging::warn!("cursor update failed: {e:?}");
    }
}

/// Route an editor [`Action`] to the host callbacks or the canvas element.
#[cfg(feature = "csr")]
fn dispatch(
    action: Action,
    canvas_ref: NodeRef<leptos::html::Canvas>,
    on_save: Callback<(Vec<u8>, String)>,
    on_cancel: Callback<()>,
) {
    match action {
        Action::Save(export) => on_save.run((export.image, export.description)),
        Action::Cancel => on_cancel.run(()),
        Action::SetCursor(cursor) => set_cursor(canvas_ref, cursor),
    }
}

/// Modal annotation editor bound to `image_path` (relative or absolute).
///
/// `on_save` receives the flattened PNG and the description; `on_cancel` is
/// always available, even while the image is loading or after it failed.
#[component]
pub fn ImageEditor(
    image_path: String,
    on_save: Callback<(Vec<u8>, String)>,
    on_cancel: Callback<()>,
) -> impl IntoView {
    let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
    let view_state = RwSignal::new(EditorView::default());
    let description = RwSignal::new(String::new());

    #[cfg(feature = "csr")]
    let editor: SharedEditor = Rc::new(RefCell::new(None));

    #[cfg(feature = "csr")]
    {
        let editor = Rc::clone(&editor);
        let origin = expect_context::<BackendConfig>().origin().to_owned();
        Effect::new(move || {
            let Some(canvas) = canvas_ref.get() else {
                return;
            };
            if editor.borrow().is_some() {
                return;
            }
            let surface = match CanvasSurface::new(canvas) {
                Ok(surface) => surface,
                Err(e) => {
                    leptos::logging::warn!("annotation canvas unavailable: {e}");
                    view_state.set(EditorView { load: LoadState::Failed(e.to_string()), ..EditorView::default() });
                    return;
                }
            };
            let core = Editor::mount(surface, &image_path, &origin);
            let url = core.image_url().to_owned();
            view_state.set(EditorView::of(&core));
            *editor.borrow_mut() = Some(core);

            let editor = Rc::clone(&editor);
            leptos::task::spawn_local(async move {
                let loaded = crate::util::image_load::load_image(&url).await;
                with_editor(&editor, view_state, |core| match loaded {
                    Ok(image) => {
                        if let Err(e) = core.background_loaded(image) {
                            leptos::logging::warn!("{e}");
                        }
                    }
                    Err(reason) => core.background_failed(reason),
                });
            });
        });
    }
    #[cfg(not(feature = "csr"))]
    drop(image_path);

    let on_pointer_down = {
        #[cfg(feature = "csr")]
        {
            let editor = Rc::clone(&editor);
            move |ev: leptos::ev::PointerEvent| {
                let Some(canvas) = canvas_ref.get_untracked() else {
                    return;
                };
                let point = pointer_point(&ev, &canvas);
                let started = with_editor(&editor, view_state, |core| core.on_pointer_down(point, pointer_button(&ev)));
                if matches!(started, Some(Ok(()))) && view_state.get_untracked().mode == Mode::Draw {
                    ev.prevent_default();
                    if let Err(e) = canvas.set_pointer_capture(ev.pointer_id()) {
                        leptos::logging::warn!("pointer capture failed: {e:?}");
                    }
                }
            }
        }
        #[cfg(not(feature = "csr"))]
        {
            move |_ev: leptos::ev::PointerEvent| {}
        }
    };

    let on_pointer_move = {
        #[cfg(feature = "csr")]
        {
            let editor = Rc::clone(&editor);
            move |ev: leptos::ev::PointerEvent| {
                let Some(canvas) = canvas_ref.get_untracked() else {
                    return;
                };
                let point = pointer_point(&ev, &canvas);
                if let Some(Err(e)) = with_editor(&editor, view_state, |core| core.on_pointer_move(point)) {
                    leptos::logging::warn!("{e}");
                }
            }
        }
        #[cfg(not(feature = "csr"))]
        {
            move |_ev: leptos::ev::PointerEvent| {}
        }
    };

    let on_pointer_up = {
        #[cfg(feature = "csr")]
        {
            let editor = Rc::clone(&editor);
            move |ev: leptos::ev::PointerEvent| {
                let Some(canvas) = canvas_ref.get_untracked() else {
                    return;
                };
                let point = pointer_point(&ev, &canvas);
                if let Some(Err(e)) = with_editor(&editor, view_state, |core| core.on_pointer_up(point)) {
                    leptos::logging::warn!("{e}");
                }
            }
        }
        #[cfg(not(feature = "csr"))]
        {
            move |_ev: leptos::ev::PointerEvent| {}
        }
    };

    let on_draw = {
        #[cfg(feature = "csr")]
        {
            let editor = Rc::clone(&editor);
            move |_: leptos::ev::MouseEvent| match with_editor(&editor, view_state, Editor::enable_drawing) {
                Some(Ok(action)) => dispatch(action, canvas_ref, on_save, on_cancel),
                Some(Err(e)) => leptos::logging::warn!("{e}"),
                None => {}
            }
        }
        #[cfg(not(feature = "csr"))]
        {
            move |_: leptos::ev::MouseEvent| {}
        }
    };

    let on_select = {
        #[cfg(feature = "csr")]
        {
            let editor = Rc::clone(&editor);
            move |_: leptos::ev::MouseEvent| match with_editor(&editor, view_state, Editor::disable_drawing) {
                Some(Ok(action)) => dispatch(action, canvas_ref, on_save, on_cancel),
                Some(Err(e)) => leptos::logging::warn!("{e}"),
                None => {}
            }
        }
        #[cfg(not(feature = "csr"))]
        {
            move |_: leptos::ev::MouseEvent| {}
        }
    };

    let on_undo = {
        #[cfg(feature = "csr")]
        {
            let editor = Rc::clone(&editor);
            move |_: leptos::ev::MouseEvent| {
                if let Some(Err(e)) = with_editor(&editor, view_state, Editor::undo) {
                    leptos::logging::warn!("{e}");
                }
            }
        }
        #[cfg(not(feature = "csr"))]
        {
            move |_: leptos::ev::MouseEvent| {}
        }
    };

    let on_description = {
        #[cfg(feature = "csr")]
        {
            let editor = Rc::clone(&editor);
            move |ev: leptos::ev::Event| {
                let text = event_target_value(&ev);
                description.set(text.clone());
                with_editor(&editor, view_state, |core| core.set_description(text));
            }
        }
        #[cfg(not(feature = "csr"))]
        {
            move |ev: leptos::ev::Event| description.set(event_target_value(&ev))
        }
    };

    let on_save_click = {
        #[cfg(feature = "csr")]
        {
            let editor = Rc::clone(&editor);
            move |_: leptos::ev::MouseEvent| match with_editor(&editor, view_state, Editor::save) {
                Some(Ok(action)) => {
                    set_cursor(canvas_ref, canvas::consts::CURSOR_SELECT);
                    dispatch(action, canvas_ref, on_save, on_cancel);
                }
                Some(Err(e)) => leptos::logging::warn!("save failed: {e}"),
                None => {}
            }
        }
        #[cfg(not(feature = "csr"))]
        {
            move |_: leptos::ev::MouseEvent| {}
        }
    };

    let on_cancel_click = {
        #[cfg(feature = "csr")]
        {
            let editor = Rc::clone(&editor);
            move |_: leptos::ev::MouseEvent| {
                let action = with_editor(&editor, view_state, Editor::cancel).unwrap_or(Action::Cancel);
                dispatch(action, canvas_ref, on_save, on_cancel);
            }
        }
        #[cfg(not(feature = "csr"))]
        {
            move |_: leptos::ev::MouseEvent| on_cancel.run(())
        }
    };

    let disabled = move || !view_state.get().controls_enabled();
    let drawing = move || view_state.get().mode == Mode::Draw;

    view! {
        <div class="dialog-backdrop">
            <div class="dialog dialog--editor" role="dialog" aria-modal="true">
                <h2 class="dialog__title">"Draw on Image & Describe Changes"</h2>

                <div class="editor__toolbar">
                    <button
                        class=move || if drawing() { "btn btn--active" } else { "btn" }
                        disabled=disabled
                        on:click=on_draw
                    >
                        "Draw"
                    </button>
                    <button
                        class=move || if drawing() { "btn" } else { "btn btn--active" }
                        disabled=disabled
                        on:click=on_select
                    >
                        "Select"
                    </button>
                    <button
                        class="btn"
                        disabled=move || disabled() || view_state.get().strokes == 0
                        on:click=on_undo
                    >
                        "Undo"
                    </button>
                </div>

                <div class="editor__stage">
                    <canvas
                        class="editor__canvas"
                        node_ref=canvas_ref
                        on:pointerdown=on_pointer_down
                        on:pointermove=on_pointer_move
                        on:pointerup=on_pointer_up.clone()
                        on:pointerleave=on_pointer_up
                    >
                        "Your browser does not support canvas."
                    </canvas>
                    {move || {
                        let snapshot = view_state.get();
                        snapshot.status_text().map(|text| {
                            let class = if matches!(snapshot.load, LoadState::Failed(_)) {
                                "editor__status editor__status--error"
                            } else {
                                "editor__status"
                            };
                            view! { <div class=class>{text}</div> }
                        })
                    }}
                </div>

                <label class="dialog__label">
                    "Describe your changes (optional but recommended):"
                    <textarea
                        class="dialog__textarea"
                        rows="3"
                        placeholder="e.g., 'Remove the marked areas', 'Smooth the edges I circled', 'Fill in the hole marked in red'..."
                        prop:value=move || description.get()
                        on:input=on_description
                    ></textarea>
                </label>

                <div class="editor__hints">
                    <strong>"How to use:"</strong>
                    <ol>
                        <li>"Click \"Draw\" to mark areas in red"</li>
                        <li>"Use \"Undo\" to remove the last stroke"</li>
                        <li>"Describe what the marks mean in the text box"</li>
                        <li>"Click \"Save & Apply\" to send the edit"</li>
                    </ol>
                </div>

                <div class="dialog__actions">
                    <button class="btn" on:click=on_cancel_click>
                        "Cancel"
                    </button>
                    <button class="btn btn--primary" disabled=disabled on:click=on_save_click>
                        "Save & Apply"
                    </button>
                </div>
            </div>
        </div>
    }
}
