//! Multipart wire format against a local axum server

use adaptive_upload::file::MemoryFile;
use adaptive_upload::strategy::UploadConfig;
use adaptive_upload::transport::{FormFields, HttpTransport, HttpTransportConfig, TransportError};
use adaptive_upload::upload::{TransferError, UploadError, UploadManager, UploadRequest};
use axum::extract::{Multipart, State};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::post;
use axum::{Json, Router};
use chrono::{TimeZone, Utc};
use parking_lot::Mutex;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::Arc;
use url::Url;

#[derive(Debug, Clone, Default)]
struct ReceivedRequest {
    fields: HashMap<String, String>,
    file_field: String,
    file_name: String,
    content_type: Option<String>,
    len: usize,
    auth: Option<String>,
}

#[derive(Clone, Default)]
struct Received(Arc<Mutex<Vec<ReceivedRequest>>>);

async fn accept(
    State(state): State<Received>,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> Json<Value> {
    let mut received = ReceivedRequest {
        auth: headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .map(String::from),
        ..Default::default()
    };

    while let Ok(Some(field)) = multipart.next_field().await {
        let name = field.name().unwrap_or_default().to_string();
        match field.file_name().map(str::to_string) {
            Some(file_name) => {
                received.content_type = field.content_type().map(str::to_string);
                let data = field.bytes().await.unwrap();
                received.file_field = name;
                received.file_name = file_name;
                received.len = data.len();
            }
            None => {
                let text = field.text().await.unwrap();
                received.fields.insert(name, text);
            }
        }
    }

    let response = json!({
        "received": received.file_name,
        "bytes": received.len,
        "chunkIndex": received.fields.get("chunkIndex"),
    });
    state.0.lock().push(received);
    Json(response)
}

async fn reject() -> (StatusCode, &'static str) {
    (StatusCode::UNPROCESSABLE_ENTITY, "bad file")
}

async fn spawn_server() -> (Url, Received) {
    let state = Received::default();
    let app = Router::new()
        .route("/upload", post(accept))
        .route("/reject", post(reject))
        .with_state(state.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (Url::parse(&format!("http://{addr}/")).unwrap(), state)
}

fn transport(base_url: Url) -> Arc<HttpTransport> {
    Arc::new(
        HttpTransport::new(HttpTransportConfig {
            base_url: Some(base_url),
            bearer_token: Some("secret".into()),
            ..Default::default()
        })
        .unwrap(),
    )
}

#[tokio::test]
async fn test_small_and_chunked_files_on_the_wire() {
    let (base_url, received) = spawn_server().await;
    let manager = UploadManager::new(transport(base_url), UploadConfig::new(100, 1000, 400, 3)).unwrap();

    let submitted_at = Utc.with_ymd_and_hms(2024, 5, 6, 7, 8, 9).unwrap();
    let fields = FormFields::new()
        .with("owner", "alice")
        .with("submittedAt", submitted_at);
    let request = UploadRequest::new("upload", "files")
        .with_fields(fields)
        .with_file(MemoryFile::new("note.txt", "text/plain", &b"hello"[..]))
        .with_file(MemoryFile::zeroed("big.bin", 2500));

    let results = manager.upload(&request).await.unwrap();
    assert!(results.is_complete());

    let requests = received.0.lock().clone();
    assert_eq!(requests.len(), 8);

    let small = &requests[0];
    assert_eq!(small.file_field, "files");
    assert_eq!(small.file_name, "note.txt");
    assert_eq!(small.content_type.as_deref(), Some("text/plain"));
    assert_eq!(small.len, 5);
    assert_eq!(small.auth.as_deref(), Some("Bearer secret"));
    assert_eq!(small.fields["owner"], "alice");
    assert_eq!(small.fields["submittedAt"], "2024-05-06T07:08:09.000Z");
    assert!(!small.fields.contains_key("isChunk"));

    for (i, chunk) in requests[1..].iter().enumerate() {
        assert_eq!(chunk.file_name, "big.bin");
        assert_eq!(chunk.fields["isChunk"], "true");
        assert_eq!(chunk.fields["chunkIndex"], i.to_string());
        assert_eq!(chunk.fields["totalChunks"], "7");
        assert_eq!(chunk.fields["fileName"], "big.bin");
        assert_eq!(chunk.fields["owner"], "alice");
    }
    assert_eq!(requests[7].len, 100);

    let big = &results.outcomes()[1];
    assert_eq!(big.data().unwrap()["chunkIndex"], "6");
}

#[tokio::test]
async fn test_rejected_uploads_escalate() {
    let (base_url, _received) = spawn_server().await;
    let manager = UploadManager::new(transport(base_url), UploadConfig::default()).unwrap();

    let request = UploadRequest::new("reject", "files")
        .with_file(MemoryFile::new("a.txt", "text/plain", &b"a"[..]))
        .with_file(MemoryFile::new("b.txt", "text/plain", &b"b"[..]));

    match manager.upload(&request).await {
        Err(UploadError::AllFailed { file_name, source }) => {
            assert_eq!(file_name, "a.txt");
            assert_eq!(
                source,
                TransferError::Transport(TransportError::Status {
                    status: 422,
                    body: "bad file".into(),
                })
            );
        }
        other => panic!("expected total failure, got {other:?}"),
    }
}

#[tokio::test]
async fn test_unreachable_server_is_network_error() {
    let manager = UploadManager::with_default_config(transport(
        Url::parse("http://127.0.0.1:9/").unwrap(),
    ));

    let request = UploadRequest::new("upload", "files")
        .with_file(MemoryFile::new("a.txt", "text/plain", &b"a"[..]));

    let err = manager.upload(&request).await.unwrap_err();
    assert!(matches!(
        err.transfer_error(),
        Some(TransferError::Transport(TransportError::Network(_)))
    ));
}
