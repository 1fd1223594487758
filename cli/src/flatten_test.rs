use canvas::raster::RasterSurface;
use canvas::surface::Surface;

use super::*;

fn background_png() -> Vec<u8> {
    RasterSurface::with_size(64).flatten().unwrap()
}

fn red_pixels(png: &[u8]) -> usize {
    decode(png)
        .unwrap()
        .to_rgba8()
        .pixels()
        .filter(|p| p.0 == canvas::consts::INK_COLOR)
        .count()
}

#[test]
fn strokes_are_burned_into_export() {
    let doc = AnnotationDoc::from_json(r#"{"strokes":[{"points":[{"x":100,"y":100},{"x":400,"y":100}]}]}"#).unwrap();
    let export = flatten(&background_png(), "sil_v1.png", &doc, "remove the marked area").unwrap();
    assert_eq!(export.description, "remove the marked area");
    assert!(red_pixels(&export.image) > 300);
}

#[test]
fn empty_document_exports_background_only() {
    let export = flatten(&background_png(), "sil_v1.png", &AnnotationDoc::new(), "").unwrap();
    assert!(!export.image.is_empty());
    assert_eq!(red_pixels(&export.image), 0);
}

#[test]
fn garbage_background_is_a_decode_error() {
    let err = flatten(b"not an image", "x.png", &AnnotationDoc::new(), "").unwrap_err();
    assert!(matches!(err, FlattenError::Decode(_)));
}
