use super::*;
use canvas::geom::Point;
use canvas::input::Button;
use canvas::raster::{RasterSurface, decode};

fn background() -> <RasterSurface as Surface>::Image {
    let png = RasterSurface::with_size(8).flatten().unwrap();
    decode(&png).unwrap()
}

fn loading() -> EditorCore<RasterSurface> {
    EditorCore::mount(RasterSurface::new(), "/files/abc123_v1.png", "http://127.0.0.1:8000")
}

#[test]
fn loading_editor_disables_controls() {
    let view = EditorView::of(&loading());
    assert_eq!(view, EditorView::default());
    assert!(!view.controls_enabled());
    assert_eq!(view.status_text(), Some("Loading image..."));
}

#[test]
fn failed_load_shows_server_message() {
    let mut editor = loading();
    editor.background_failed("network error");
    let view = EditorView::of(&editor);
    assert!(!view.controls_enabled());
    assert_eq!(view.status_text(), Some("Failed to load image from server"));
}

#[test]
fn ready_editor_tracks_mode_and_strokes() {
    let mut editor = loading();
    editor.background_loaded(background()).unwrap();
    editor.enable_drawing().unwrap();
    editor.on_pointer_down(Point::new(10.0, 10.0), Button::Primary).unwrap();
    editor.on_pointer_move(Point::new(40.0, 40.0)).unwrap();
    editor.on_pointer_up(Point::new(40.0, 40.0)).unwrap();

    let view = EditorView::of(&editor);
    assert!(view.controls_enabled());
    assert_eq!(view.status_text(), None);
    assert_eq!(view.mode, Mode::Draw);
    assert_eq!(view.strokes, 1);
}
