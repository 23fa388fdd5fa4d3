//! Exercises `HttpEndpoint` and `UploadController` against a local axum
//! server standing in for the processing service.

use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};
use scan_translator::app::{UploadController, UploadState};
use scan_translator::upload::{
    ContactRequest, HttpEndpoint, ProcessingEndpoint, StagedFile,
};
use scan_translator::{Config, UploadError};
use serde_json::{json, Value};
use std::io::Cursor;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tokio::net::TcpListener;

// ── Mock server ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
struct Upload {
    field: String,
    file_name: Option<String>,
    content_type: Option<String>,
    len: usize,
}

#[derive(Clone, Default)]
struct MockServer {
    uploads: Arc<Mutex<Vec<Upload>>>,
    failing: Arc<AtomicBool>,
}

fn scenario_body() -> Value {
    json!({
        "original_text": "Hola",
        "translated_text": "Hello",
        "parsed_fields": {
            "Name": "Ana",
            "Phone": "555-1234",
            "Address": "Main St",
            "Type of Information": "ID Card"
        }
    })
}

async fn process(State(server): State<MockServer>, mut multipart: Multipart) -> Response {
    while let Ok(Some(field)) = multipart.next_field().await {
        let upload = Upload {
            field: field.name().unwrap_or_default().to_string(),
            file_name: field.file_name().map(String::from),
            content_type: field.content_type().map(String::from),
            len: 0,
        };
        let len = field.bytes().await.map(|b| b.len()).unwrap_or_default();
        server.uploads.lock().unwrap().push(Upload { len, ..upload });
    }

    if server.failing.load(Ordering::SeqCst) {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": "cannot identify image file" })),
        )
            .into_response();
    }
    Json(scenario_body()).into_response()
}

async fn contact(Json(body): Json<Value>) -> Json<Value> {
    let result = format!(
        "Name: {}\nPhone: {}\nAddress: {}\nType: {}",
        body["name"].as_str().unwrap_or("Unknown"),
        body["phone"].as_str().unwrap_or("No phone number"),
        body["address"].as_str().unwrap_or("Address pending verification"),
        body["type"].as_str().unwrap_or("General Contact"),
    );
    Json(json!({
        "result": result,
        "status": "success",
        "message": "Contact information processed successfully"
    }))
}

async fn spawn_server(router: Router) -> Config {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    Config::with_server(format!("http://{addr}").parse().unwrap())
}

async fn spawn_mock(server: MockServer) -> Config {
    let router = Router::new()
        .route("/process", post(process))
        .route("/contact", post(contact))
        .with_state(server);
    spawn_server(router).await
}

// ── Helpers ──────────────────────────────────────────────────────────────────

fn photo() -> StagedFile {
    let img = DynamicImage::ImageRgba8(RgbaImage::from_pixel(6, 6, Rgba([0, 0, 0, 255])));
    let mut buf = Vec::new();
    img.write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)
        .unwrap();
    StagedFile::new("photo.png", "image/png", buf)
}

fn settle(controller: &mut UploadController) {
    let deadline = Instant::now() + Duration::from_secs(10);
    loop {
        controller.poll();
        if !controller.has_pending_work() {
            return;
        }
        assert!(Instant::now() < deadline, "controller did not settle");
        std::thread::sleep(Duration::from_millis(10));
    }
}

// ── Endpoint ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn uploads_image_as_multipart_field() {
    let server = MockServer::default();
    let config = spawn_mock(server.clone()).await;
    let endpoint = HttpEndpoint::new(&config).unwrap();

    let file = photo();
    let result = endpoint.process(&file).await.unwrap();

    assert_eq!(result.original_text, "Hola");
    assert_eq!(result.translated_text, "Hello");
    assert_eq!(result.parsed_fields.name, "Ana");
    assert_eq!(result.parsed_fields.additional_info, None);

    let uploads = server.uploads.lock().unwrap().clone();
    assert_eq!(uploads.len(), 1, "{uploads:?}");
    assert_eq!(uploads[0].field, "image");
    assert_eq!(uploads[0].file_name.as_deref(), Some("photo.png"));
    assert_eq!(uploads[0].content_type.as_deref(), Some("image/png"));
    assert_eq!(uploads[0].len, file.bytes.len());
}

#[tokio::test]
async fn error_status_carries_server_detail() {
    let server = MockServer::default();
    server.failing.store(true, Ordering::SeqCst);
    let endpoint = HttpEndpoint::new(&spawn_mock(server).await).unwrap();

    match endpoint.process(&photo()).await {
        Err(UploadError::Server { status, detail }) => {
            assert_eq!(status, 500);
            assert_eq!(detail.as_deref(), Some("cannot identify image file"));
        }
        other => panic!("expected server error, got {other:?}"),
    }
}

#[tokio::test]
async fn non_success_fails_even_with_valid_body() {
    let router = Router::new().route(
        "/process",
        post(|| async { (StatusCode::BAD_GATEWAY, Json(scenario_body())) }),
    );
    let endpoint = HttpEndpoint::new(&spawn_server(router).await).unwrap();

    let err = endpoint.process(&photo()).await.unwrap_err();
    assert!(matches!(
        err,
        UploadError::Server {
            status: 502,
            detail: None
        }
    ));
}

#[tokio::test]
async fn partial_response_is_a_parse_error() {
    let router = Router::new().route(
        "/process",
        post(|| async {
            Json(json!({
                "original_text": "Hola",
                "translated_text": "Hello",
                "parsed_fields": { "Name": "Ana" }
            }))
        }),
    );
    let endpoint = HttpEndpoint::new(&spawn_server(router).await).unwrap();

    let err = endpoint.process(&photo()).await.unwrap_err();
    assert!(matches!(err, UploadError::Parse(_)), "{err}");
}

#[tokio::test]
async fn unreachable_server_is_a_request_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let config = Config::with_server(format!("http://{addr}").parse().unwrap());
    let endpoint = HttpEndpoint::new(&config).unwrap();

    let err = endpoint.process(&photo()).await.unwrap_err();
    assert!(matches!(err, UploadError::Request(_)), "{err}");
}

#[tokio::test]
async fn slow_server_hits_configured_timeout() {
    let router = Router::new().route(
        "/process",
        post(|| async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Json(scenario_body())
        }),
    );
    let mut config = spawn_server(router).await;
    config.timeout_secs = Some(1);
    let endpoint = HttpEndpoint::new(&config).unwrap();

    match endpoint.process(&photo()).await {
        Err(UploadError::Request(e)) => assert!(e.is_timeout(), "{e}"),
        other => panic!("expected timeout, got {other:?}"),
    }
}

#[tokio::test]
async fn contact_card_round_trip() {
    let endpoint = HttpEndpoint::new(&spawn_mock(MockServer::default()).await).unwrap();
    let request = ContactRequest {
        name: "Ana".into(),
        phone: "555-1234".into(),
        address: "Main St".into(),
        info_type: "ID Card".into(),
    };

    let card = endpoint.format_contact(&request).await.unwrap();
    assert_eq!(card.status, "success");
    assert_eq!(
        card.result,
        "Name: Ana\nPhone: 555-1234\nAddress: Main St\nType: ID Card"
    );
}

#[tokio::test]
async fn contact_error_status_is_a_server_error() {
    let router = Router::new().route(
        "/contact",
        post(|| async {
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({ "error": "formatter offline" })),
            )
        }),
    );
    let endpoint = HttpEndpoint::new(&spawn_server(router).await).unwrap();
    let request = ContactRequest {
        name: "Ana".into(),
        phone: "555-1234".into(),
        address: "Main St".into(),
        info_type: "ID Card".into(),
    };

    match endpoint.format_contact(&request).await {
        Err(UploadError::Server { status, detail }) => {
            assert_eq!(status, 503);
            assert_eq!(detail.as_deref(), Some("formatter offline"));
        }
        other => panic!("expected server error, got {other:?}"),
    }
}

// ── Controller over HTTP ─────────────────────────────────────────────────────

#[test]
fn server_failure_then_recovery() {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let server = MockServer::default();
    let config = rt.block_on(spawn_mock(server.clone()));
    let endpoint = Arc::new(HttpEndpoint::new(&config).unwrap());
    let mut controller = UploadController::new(endpoint);

    controller.accept_file(photo()).unwrap();
    settle(&mut controller);
    assert!(controller.preview_visible());
    assert!(controller.process_enabled());

    server.failing.store(true, Ordering::SeqCst);
    controller.process().unwrap();
    settle(&mut controller);

    assert_eq!(controller.state(), UploadState::Previewing);
    assert!(controller.process_enabled());
    assert_eq!(
        controller.staged().map(|f| f.name.as_str()),
        Some("photo.png")
    );
    let notice = controller.notice().cloned().unwrap();
    assert!(notice.message.contains("Server error (500)"), "{notice:?}");

    controller.dismiss_notice();
    server.failing.store(false, Ordering::SeqCst);
    controller.process().unwrap();
    settle(&mut controller);

    assert_eq!(controller.state(), UploadState::ResultsShown);
    let view = controller.view().unwrap();
    assert_eq!(view.name, "Ana");
    assert_eq!(view.phone, "555-1234");
    assert_eq!(view.address, "Main St");
    assert_eq!(view.info_type, "ID Card");
    assert!(!view.additional_info_visible());

    controller.request_contact_card().unwrap();
    settle(&mut controller);
    assert!(controller
        .contact_card()
        .unwrap()
        .result
        .starts_with("Name: Ana"));

    assert_eq!(server.uploads.lock().unwrap().len(), 2);
}

#[test]
fn dropping_text_file_changes_nothing() {
    let endpoint: Arc<dyn ProcessingEndpoint> =
        Arc::new(HttpEndpoint::new(&Config::default()).unwrap());
    let mut controller = UploadController::new(endpoint);

    let err = controller
        .accept_file(StagedFile::new("notes.txt", "text/plain", b"hello".to_vec()))
        .unwrap_err();

    assert!(matches!(err, UploadError::InvalidInput { .. }));
    assert_eq!(controller.state(), UploadState::Empty);
    assert!(controller.drop_zone_visible());
    assert!(!controller.process_enabled());
    assert!(controller.notice().is_some());
}
