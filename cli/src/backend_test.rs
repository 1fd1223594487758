use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

use super::*;

/// Serve one canned HTTP response on a loopback port and hand back the raw
/// request it received.
async fn serve_once(status: &'static str, body: &'static str) -> (BackendConfig, JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let origin = format!("http://{}", listener.local_addr().unwrap());
    let handle = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let request = read_request(&mut socket).await;
        let response = format!(
            "HTTP/1.1 {status}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
            body.len()
        );
        socket.write_all(response.as_bytes()).await.unwrap();
        socket.shutdown().await.unwrap();
        request
    });
    (BackendConfig::new(&origin).unwrap(), handle)
}

async fn read_request(socket: &mut tokio::net::TcpStream) -> String {
    let mut raw = Vec::new();
    let mut buf = [0_u8; 4096];
    loop {
        let n = socket.read(&mut buf).await.unwrap();
        raw.extend_from_slice(&buf[..n]);
        if n == 0 || request_complete(&raw) {
            break;
        }
    }
    String::from_utf8_lossy(&raw).into_owned()
}

fn request_complete(raw: &[u8]) -> bool {
    let text = String::from_utf8_lossy(raw);
    let Some((head, body)) = text.split_once("\r\n\r\n") else {
        return false;
    };
    let head = head.to_ascii_lowercase();
    if head.contains("transfer-encoding: chunked") {
        return body.ends_with("0\r\n\r\n");
    }
    let length = head
        .lines()
        .find_map(|line| line.strip_prefix("content-length:"))
        .and_then(|value| value.trim().parse::<usize>().ok())
        .unwrap_or(0);
    body.len() >= length
}

fn sketch() -> ImageFile {
    ImageFile::from_name("sample.png", vec![0x89, b'P', b'N', b'G']).unwrap()
}

// =============================================================
// Pure helpers
// =============================================================

#[test]
fn classify_routes_by_status() {
    assert_eq!(classify(204, b"", |b| Ok(b.len())), Ok(0));
    assert_eq!(
        classify::<()>(422, br#"{"detail":"bad version"}"#, |_| Ok(())),
        Err(ApiError::Status { status: 422, detail: Some("bad version".to_owned()) })
    );
}

#[test]
fn image_part_rejects_bad_mime() {
    let image = ImageFile { name: "x.png".to_owned(), mime: "not a mime".to_owned(), bytes: vec![1] };
    assert!(matches!(image_part(image), Err(ApiError::Resource(_))));
}

// =============================================================
// Over the wire
// =============================================================

#[tokio::test]
async fn upload_posts_multipart_file() {
    let (config, server) = serve_once(
        "200 OK",
        r#"{"success":true,"session_id":"abc123","data":{"silhouette_2d":{"url_path":"/files/abc123_v1.png"}}}"#,
    )
    .await;
    let backend = ReqwestBackend::new(config).unwrap();

    let outcome = backend.generate_2d(sketch()).await.unwrap();
    assert_eq!(outcome.session.as_str(), "abc123");
    assert_eq!(outcome.silhouette, "/files/abc123_v1.png");

    let request = server.await.unwrap();
    assert!(request.starts_with("POST /api/generate2d HTTP/1.1"));
    assert!(request.contains(r#"name="file"; filename="sample.png""#));
    assert!(request.contains("image/png"));
}

#[tokio::test]
async fn edit_sends_session_prompt_and_version() {
    let (config, server) =
        serve_once("200 OK", r#"{"success":true,"data":{"silhouette_url":"/files/abc123_v2.png"}}"#).await;
    let backend = ReqwestBackend::new(config).unwrap();
    let request = EditRequest {
        session_id: "abc123".to_owned(),
        prompt: "remove the hole".to_owned(),
        image: ImageFile::png("current_sketch.png", vec![1, 2, 3]),
        version: 2,
    };

    assert_eq!(backend.edit_2d(request).await.unwrap(), "/files/abc123_v2.png");

    let raw = server.await.unwrap();
    assert!(raw.starts_with("POST /api/edit2d"));
    assert!(raw.contains("remove the hole"));
    assert!(raw.contains(r#"name="image"; filename="current_sketch.png""#));
    assert!(raw.contains(r#"name="version""#));
}

#[tokio::test]
async fn rejected_envelope_keeps_backend_message() {
    let (config, _server) = serve_once("200 OK", r#"{"success":false,"error":"invalid image"}"#).await;
    let backend = ReqwestBackend::new(config).unwrap();
    assert_eq!(
        backend.generate_2d(sketch()).await,
        Err(ApiError::Rejected { message: Some("invalid image".to_owned()) })
    );
}

#[tokio::test]
async fn http_error_carries_detail() {
    let (config, _server) = serve_once("404 Not Found", r#"{"detail":"Session not found"}"#).await;
    let backend = ReqwestBackend::new(config).unwrap();
    let request = Generate3dRequest { session_id: "gone".to_owned(), prompt: None };
    assert_eq!(
        backend.generate_3d(request).await,
        Err(ApiError::Status { status: 404, detail: Some("Session not found".to_owned()) })
    );
}

#[tokio::test]
async fn fetch_resolves_relative_path() {
    let (config, server) = serve_once("200 OK", "STL").await;
    let backend = ReqwestBackend::new(config).unwrap();
    assert_eq!(backend.fetch_resource("/files/abc123.stl").await.unwrap(), b"STL");
    assert!(server.await.unwrap().starts_with("GET /files/abc123.stl HTTP/1.1"));
}

#[tokio::test]
async fn ping_reports_status() {
    let (config, server) = serve_once("200 OK", "{}").await;
    let backend = ReqwestBackend::new(config).unwrap();
    assert_eq!(backend.ping().await, Ok(200));
    assert!(server.await.unwrap().starts_with("GET /api/ HTTP/1.1"));
}

#[tokio::test]
async fn refused_connection_is_transport_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let origin = format!("http://{}", listener.local_addr().unwrap());
    drop(listener);
    let backend = ReqwestBackend::new(BackendConfig::new(&origin).unwrap()).unwrap();
    assert!(matches!(backend.fetch_resource("/x").await, Err(ApiError::Transport(_))));
}
