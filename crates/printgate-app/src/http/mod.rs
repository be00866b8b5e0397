// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// HTTP surface.
//
//   POST /print     submit a print job
//   GET  /printers  list host printers
//   POST /upload    store a document (multipart field `file`)
//   GET  /files     list stored documents
//
// Every response body is JSON, including 404 and 405.

pub mod error;
pub mod handlers;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};

use crate::state::AppState;

pub fn router(state: AppState, max_upload_bytes: usize) -> Router {
    Router::new()
        .route("/print", post(handlers::print))
        .route("/printers", get(handlers::printers))
        .route(
            "/upload",
            post(handlers::upload).layer(DefaultBodyLimit::max(max_upload_bytes)),
        )
        .route("/files", get(handlers::files))
        .fallback(handlers::not_found)
        .method_not_allowed_fallback(handlers::method_not_allowed)
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::path::{Path, PathBuf};
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{Request, StatusCode, header};
    use serde_json::{Value, json};
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tower::ServiceExt;

    use printgate_bridge::macos::MacStrategy;
    use printgate_bridge::stub::UnsupportedStrategy;
    use printgate_bridge::windows::WindowsStrategy;
    use printgate_bridge::{PlatformStrategy, StaticProbe};
    use printgate_core::AppConfig;
    use printgate_print::{PrintEngine, RecordingBackend};

    fn windows_with_edge() -> Arc<dyn PlatformStrategy> {
        let edge = ["Microsoft", "Edge", "Application", "msedge.exe"]
            .iter()
            .fold(PathBuf::from("C:\\Program Files"), |acc, p| acc.join(p));
        let probe = StaticProbe::new()
            .with_var("ProgramFiles", "C:\\Program Files")
            .with_file(edge);
        Arc::new(
            WindowsStrategy::new(Path::new("SumatraPDF.exe"), Arc::new(probe))
                .without_native_enumeration(),
        )
    }

    fn app(dir: &Path, strategy: Arc<dyn PlatformStrategy>, backend: Arc<RecordingBackend>) -> Router {
        app_with_limit(dir, strategy, backend, 1024 * 1024)
    }

    fn app_with_limit(
        dir: &Path,
        strategy: Arc<dyn PlatformStrategy>,
        backend: Arc<RecordingBackend>,
        max_upload_bytes: usize,
    ) -> Router {
        let config = AppConfig {
            upload_dir: dir.to_path_buf(),
            ..AppConfig::default()
        };
        let engine = PrintEngine::new(&config, strategy, backend).expect("engine");
        router(AppState::new(engine), max_upload_bytes)
    }

    async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.oneshot(request).await.expect("response");
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body");
        let body = serde_json::from_slice(&bytes).expect("json body");
        (status, body)
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::post(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .expect("request")
    }

    fn get(uri: &str) -> Request<Body> {
        Request::get(uri).body(Body::empty()).expect("request")
    }

    #[tokio::test]
    async fn uploaded_pdf_prints_via_browser() {
        let tmp = tempfile::tempdir().expect("tempdir");
        std::fs::write(tmp.path().join("report.pdf"), b"%PDF").expect("write");
        let backend = Arc::new(RecordingBackend::new());
        let app = app(tmp.path(), windows_with_edge(), backend.clone());

        let (status, body) = send(
            app,
            post_json("/print", json!({"fileName": "report.pdf", "printerName": "Office"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["printer"], "Office");
        let details = body["details"].as_str().expect("details");
        assert!(details.contains("browser"));
        assert!(details.contains("msedge.exe"));
        assert_eq!(backend.commands().len(), 1);
    }

    #[tokio::test]
    async fn remote_png_is_downloaded_then_printed() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let addr = listener.local_addr().expect("addr");
        tokio::spawn(async move {
            let Ok((mut socket, _)) = listener.accept().await else {
                return;
            };
            let mut buf = vec![0u8; 4096];
            let _ = socket.read(&mut buf).await;
            let body = b"\x89PNG\r\n\x1a\n";
            let head = format!(
                "HTTP/1.1 200 OK\r\nContent-Type: image/png\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                body.len()
            );
            let _ = socket.write_all(head.as_bytes()).await;
            let _ = socket.write_all(body).await;
            let _ = socket.shutdown().await;
        });

        let tmp = tempfile::tempdir().expect("tempdir");
        let backend = Arc::new(RecordingBackend::new());
        let app = app(tmp.path(), windows_with_edge(), backend.clone());

        let (status, body) = send(
            app,
            post_json("/print", json!({"url": format!("http://{addr}/pic.png"), "printerName": "HP"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK, "{body}");

        let stored: Vec<_> = std::fs::read_dir(tmp.path())
            .expect("read_dir")
            .map(|e| e.expect("entry").file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(stored.len(), 1);
        assert!(stored[0].ends_with(".png"));
        assert!(body["details"].as_str().expect("details").contains(&stored[0]));
        assert!(backend.commands()[0].arguments.iter().any(|a| a.ends_with(&stored[0])));
    }

    #[tokio::test]
    async fn empty_request_is_rejected() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let app = app(tmp.path(), windows_with_edge(), Arc::new(RecordingBackend::new()));

        let (status, body) = send(app, post_json("/print", json!({}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().expect("error").contains("mutually exclusive"));
    }

    #[tokio::test]
    async fn malformed_json_is_bad_request() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let app = app(tmp.path(), windows_with_edge(), Arc::new(RecordingBackend::new()));

        let request = Request::post("/print")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{\"fileName\":"))
            .expect("request");
        let (status, body) = send(app, request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Invalid request body");
    }

    #[tokio::test]
    async fn missing_file_is_404() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let app = app(tmp.path(), windows_with_edge(), Arc::new(RecordingBackend::new()));

        let (status, body) = send(app, post_json("/print", json!({"fileName": "missing.txt"}))).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(body["error"].as_str().expect("error").starts_with("file not found"));
    }

    #[tokio::test]
    async fn printer_failure_is_500_with_output() {
        let tmp = tempfile::tempdir().expect("tempdir");
        std::fs::write(tmp.path().join("letter.docx"), b"PK").expect("write");
        let backend = Arc::new(RecordingBackend::new().with_failure("powershell exited with 1", "no association"));
        let app = app(tmp.path(), windows_with_edge(), backend);

        let (status, body) = send(
            app,
            post_json("/print", json!({"fileName": "letter.docx", "printerName": "HP"})),
        )
        .await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body["error"].as_str().expect("error").contains("no association"));
    }

    #[tokio::test]
    async fn printer_listing_unsupported_is_501() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let app = app(
            tmp.path(),
            Arc::new(UnsupportedStrategy::new("linux")),
            Arc::new(RecordingBackend::new()),
        );

        let (status, body) = send(app, get("/printers")).await;
        assert_eq!(status, StatusCode::NOT_IMPLEMENTED);
        assert!(body["error"].is_string());
    }

    #[tokio::test]
    async fn printer_listing_on_windows() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let backend = Arc::new(
            RecordingBackend::new().with_success("Node,Name\r\nPC,HP LaserJet\r\nPC,Fax\r\n"),
        );
        let app = app(tmp.path(), windows_with_edge(), backend);

        let (status, body) = send(app, get("/printers")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!(["HP LaserJet", "Fax"]));
    }

    #[tokio::test]
    async fn upload_then_list() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let app = app(tmp.path(), Arc::new(MacStrategy), Arc::new(RecordingBackend::new()));

        let multipart = "--XBOUNDARYX\r\n\
             Content-Disposition: form-data; name=\"file\"; filename=\"scan.PDF\"\r\n\
             Content-Type: application/pdf\r\n\r\n\
             %PDF-1.4\r\n\
             --XBOUNDARYX--\r\n";
        let request = Request::post("/upload")
            .header(header::CONTENT_TYPE, "multipart/form-data; boundary=XBOUNDARYX")
            .body(Body::from(multipart))
            .expect("request");
        let (status, body) = send(app.clone(), request).await;
        assert_eq!(status, StatusCode::OK, "{body}");
        assert_eq!(body["message"], "File uploaded successfully");
        assert_eq!(body["file"]["name"], "scan.PDF");
        let stored = body["file"]["path"].as_str().expect("path").to_owned();
        assert!(stored.ends_with(".pdf"));
        assert_eq!(std::fs::read(tmp.path().join(&stored)).expect("stored"), b"%PDF-1.4");

        let (status, body) = send(app, get("/files")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!([{ "name": stored, "path": stored }]));
    }

    #[tokio::test]
    async fn upload_without_file_field_is_400() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let app = app(tmp.path(), Arc::new(MacStrategy), Arc::new(RecordingBackend::new()));

        let multipart = "--XBOUNDARYX\r\n\
             Content-Disposition: form-data; name=\"note\"\r\n\r\n\
             hello\r\n\
             --XBOUNDARYX--\r\n";
        let request = Request::post("/upload")
            .header(header::CONTENT_TYPE, "multipart/form-data; boundary=XBOUNDARYX")
            .body(Body::from(multipart))
            .expect("request");
        let (status, body) = send(app, request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Could not retrieve file from form-data");
    }

    #[tokio::test]
    async fn oversized_upload_is_413() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let app = app_with_limit(tmp.path(), Arc::new(MacStrategy), Arc::new(RecordingBackend::new()), 64);

        let multipart = format!(
            "--XBOUNDARYX\r\n\
             Content-Disposition: form-data; name=\"file\"; filename=\"big.txt\"\r\n\
             Content-Type: text/plain\r\n\r\n\
             {}\r\n\
             --XBOUNDARYX--\r\n",
            "x".repeat(500)
        );
        let request = Request::post("/upload")
            .header(header::CONTENT_TYPE, "multipart/form-data; boundary=XBOUNDARYX")
            .body(Body::from(multipart))
            .expect("request");
        let (status, body) = send(app, request).await;
        assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(body["error"], "Uploaded file exceeds the size limit");
        assert_eq!(std::fs::read_dir(tmp.path()).expect("read_dir").count(), 0);
    }

    #[tokio::test]
    async fn unknown_route_and_wrong_method_are_json() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let app = app(tmp.path(), Arc::new(MacStrategy), Arc::new(RecordingBackend::new()));

        let (status, body) = send(app.clone(), get("/nope")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Not found");

        let (status, body) = send(app, get("/print")).await;
        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(body["error"], "Method not allowed");
    }
}
