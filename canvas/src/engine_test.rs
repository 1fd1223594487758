#![allow(clippy::float_cmp)]

use super::*;
use crate::geom::Placement;

/// Surface that records calls instead of painting.
#[derive(Default)]
struct FakeSurface {
    background: Option<Placement>,
    redraws: Vec<usize>,
    segments: Vec<(Point, Point)>,
    fail_background: bool,
    export: Vec<u8>,
}

impl Surface for FakeSurface {
    type Image = (u32, u32);

    fn natural_size(&self, image: &Self::Image) -> (u32, u32) {
        *image
    }

    fn set_background(&mut self, _image: Self::Image, placement: Placement) -> Result<(), SurfaceError> {
        if self.fail_background {
            return Err(SurfaceError::Draw("context lost".to_owned()));
        }
        self.background = Some(placement);
        Ok(())
    }

    fn redraw(&mut self, strokes: &[Stroke]) -> Result<(), SurfaceError> {
        self.redraws.push(strokes.len());
        Ok(())
    }

    fn draw_segment(&mut self, from: Point, to: Point) -> Result<(), SurfaceError> {
        self.segments.push((from, to));
        Ok(())
    }

    fn flatten(&self) -> Result<Vec<u8>, SurfaceError> {
        Ok(self.export.clone())
    }
}

fn surface() -> FakeSurface {
    FakeSurface { export: vec![0x89, b'P', b'N', b'G'], ..FakeSurface::default() }
}

fn ready() -> EditorCore<FakeSurface> {
    let mut editor = EditorCore::mount(surface(), "/files/abc123/sil_v1.png", "http://127.0.0.1:8000");
    editor.background_loaded((1024, 512)).unwrap();
    editor
}

fn draw(editor: &mut EditorCore<FakeSurface>, points: &[(f64, f64)]) -> Option<StrokeId> {
    let (first, rest) = points.split_first().unwrap();
    editor.on_pointer_down(Point::new(first.0, first.1), Button::Primary).unwrap();
    for &(x, y) in rest {
        editor.on_pointer_move(Point::new(x, y)).unwrap();
    }
    let last = points.last().unwrap();
    editor.on_pointer_up(Point::new(last.0, last.1)).unwrap()
}

// =============================================================
// URL resolution
// =============================================================

#[test]
fn relative_url_is_joined_to_origin() {
    assert_eq!(
        resolve_image_url("/files/a.png", "http://127.0.0.1:8000/"),
        "http://127.0.0.1:8000/files/a.png"
    );
    assert_eq!(resolve_image_url("files/a.png", "http://h"), "http://h/files/a.png");
}

#[test]
fn absolute_urls_pass_through() {
    for url in ["https://cdn/a.png", "blob:http://h/uuid", "data:image/png;base64,AA"] {
        assert_eq!(resolve_image_url(url, "http://h"), url);
    }
}

// =============================================================
// Loading
// =============================================================

#[test]
fn mount_starts_loading_with_controls_disabled() {
    let mut editor = EditorCore::mount(surface(), "/files/a.png", "http://h");
    assert_eq!(editor.image_url(), "http://h/files/a.png");
    assert_eq!(editor.load_state(), &LoadState::Loading);
    assert_eq!(editor.enable_drawing(), Err(EditorError::NotReady));
    assert_eq!(editor.undo(), Err(EditorError::NotReady));
    assert_eq!(editor.save(), Err(EditorError::NotReady));
}

#[test]
fn loaded_background_is_fit_and_centered() {
    let editor = ready();
    assert!(editor.is_ready());
    let placement = editor.surface().background.unwrap();
    assert_eq!((placement.width, placement.height), (512.0, 256.0));
    assert_eq!((placement.left, placement.top), (0.0, 128.0));
    assert_eq!(editor.surface().redraws, vec![0]);
}

#[test]
fn load_failure_is_terminal() {
    let mut editor = EditorCore::mount(surface(), "/files/a.png", "http://h");
    editor.background_failed("404 Not Found");
    assert_eq!(editor.load_state(), &LoadState::Failed("404 Not Found".to_owned()));

    editor.background_loaded((10, 10)).unwrap();
    assert!(!editor.is_ready());
    assert_eq!(editor.enable_drawing(), Err(EditorError::NotReady));
}

#[test]
fn zero_sized_image_fails_load() {
    let mut editor = EditorCore::mount(surface(), "/files/a.png", "http://h");
    assert!(matches!(editor.background_loaded((0, 0)), Err(EditorError::Load(_))));
    assert!(matches!(editor.load_state(), LoadState::Failed(_)));
}

#[test]
fn surface_failure_fails_load() {
    let failing = FakeSurface { fail_background: true, ..FakeSurface::default() };
    let mut editor = EditorCore::mount(failing, "/files/a.png", "http://h");
    assert!(matches!(editor.background_loaded((8, 8)), Err(EditorError::Load(_))));
    assert!(!editor.is_ready());
}

#[test]
fn cancel_works_while_loading() {
    let mut editor = EditorCore::mount(surface(), "/files/a.png", "http://h");
    assert_eq!(editor.cancel(), Action::Cancel);
}

// =============================================================
// Drawing
// =============================================================

#[test]
fn drags_in_select_mode_draw_nothing() {
    let mut editor = ready();
    assert_eq!(draw(&mut editor, &[(10.0, 10.0), (50.0, 50.0)]), None);
    assert_eq!(editor.stroke_count(), 0);
}

#[test]
fn drag_in_draw_mode_adds_one_stroke() {
    let mut editor = ready();
    assert_eq!(editor.enable_drawing(), Ok(Action::SetCursor(CURSOR_DRAW)));
    let id = draw(&mut editor, &[(10.0, 10.0), (20.0, 10.0), (30.0, 15.0)]).unwrap();
    assert_eq!(editor.stroke_count(), 1);
    let stroke = &editor.doc().strokes()[0];
    assert_eq!(stroke.id, id);
    assert_eq!(stroke.points.len(), 3);
    assert_eq!(editor.surface().segments.len(), 3);
}

#[test]
fn secondary_button_does_not_draw() {
    let mut editor = ready();
    editor.enable_drawing().unwrap();
    editor.on_pointer_down(Point::new(1.0, 1.0), Button::Secondary).unwrap();
    assert_eq!(editor.on_pointer_up(Point::new(9.0, 9.0)).unwrap(), None);
    assert_eq!(editor.stroke_count(), 0);
}

#[test]
fn click_without_move_leaves_a_dot() {
    let mut editor = ready();
    editor.enable_drawing().unwrap();
    draw(&mut editor, &[(40.0, 40.0)]).unwrap();
    assert_eq!(editor.doc().strokes()[0].points, vec![Point::new(40.0, 40.0)]);
}

#[test]
fn disable_drawing_commits_stroke_in_progress() {
    let mut editor = ready();
    editor.enable_drawing().unwrap();
    editor.on_pointer_down(Point::new(0.0, 0.0), Button::Primary).unwrap();
    editor.on_pointer_move(Point::new(20.0, 0.0)).unwrap();
    assert_eq!(editor.disable_drawing(), Ok(Action::SetCursor(CURSOR_SELECT)));
    assert_eq!(editor.stroke_count(), 1);
    assert_eq!(editor.mode(), Mode::Select);
}

// =============================================================
// Undo
// =============================================================

#[test]
fn undo_removes_most_recent_stroke_only() {
    let mut editor = ready();
    editor.enable_drawing().unwrap();
    let first = draw(&mut editor, &[(0.0, 0.0), (10.0, 0.0)]).unwrap();
    let second = draw(&mut editor, &[(0.0, 20.0), (10.0, 20.0)]).unwrap();
    assert_eq!(editor.undo().unwrap().map(|s| s.id), Some(second));
    assert_eq!(editor.stroke_count(), 1);
    assert_eq!(editor.doc().strokes()[0].id, first);
}

#[test]
fn undo_on_empty_is_noop() {
    let mut editor = ready();
    let redraws = editor.surface().redraws.len();
    assert_eq!(editor.undo(), Ok(None));
    assert_eq!(editor.surface().redraws.len(), redraws);
}

// =============================================================
// Save / cancel
// =============================================================

#[test]
fn save_exports_raster_and_description() {
    let mut editor = ready();
    editor.enable_drawing().unwrap();
    draw(&mut editor, &[(0.0, 0.0), (10.0, 10.0)]).unwrap();
    editor.set_description("make the ring thicker");

    let Action::Save(export) = editor.save().unwrap() else {
        panic!("expected save action");
    };
    assert_eq!(export.image, vec![0x89, b'P', b'N', b'G']);
    assert_eq!(export.description, "make the ring thicker");
    assert_eq!(editor.mode(), Mode::Select);
    assert_eq!(editor.stroke_count(), 1);
}

#[test]
fn save_with_no_strokes_still_exports_background() {
    let mut editor = ready();
    assert!(matches!(editor.save(), Ok(Action::Save(_))));
}

#[test]
fn empty_flatten_is_an_error() {
    let mut editor = EditorCore::mount(FakeSurface::default(), "/a.png", "http://h");
    editor.background_loaded((4, 4)).unwrap();
    assert_eq!(editor.save(), Err(EditorError::EmptyExport));
}

// =============================================================
// Replay
// =============================================================

#[test]
fn replay_appends_document_strokes() {
    let doc = AnnotationDoc::from_json(r#"{"strokes":[{"points":[{"x":1,"y":1}]},{"points":[{"x":2,"y":2},{"x":9,"y":9}]}]}"#)
        .unwrap();
    let mut editor = ready();
    assert_eq!(editor.replay(&doc), Ok(2));
    assert_eq!(editor.stroke_count(), 2);
    assert_eq!(editor.surface().redraws.last(), Some(&2));
}

#[test]
fn replay_before_ready_is_refused() {
    let mut editor = EditorCore::mount(surface(), "/a.png", "http://h");
    assert_eq!(editor.replay(&AnnotationDoc::new()), Err(EditorError::NotReady));
}
