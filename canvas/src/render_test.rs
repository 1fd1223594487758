use super::*;

#[test]
fn png_data_url_is_decoded() {
    let bytes = decode_png_data_url("data:image/png;base64,iVBORw0KGgo=").unwrap();
    assert_eq!(bytes, vec![0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a]);
}

#[test]
fn other_data_urls_are_rejected() {
    assert!(matches!(
        decode_png_data_url("data:image/jpeg;base64,AAAA"),
        Err(SurfaceError::Encode(_))
    ));
    assert!(matches!(decode_png_data_url("data:,"), Err(SurfaceError::Encode(_))));
}

#[test]
fn invalid_base64_is_rejected() {
    assert!(matches!(
        decode_png_data_url("data:image/png;base64,@@@"),
        Err(SurfaceError::Encode(_))
    ));
}
