//! Shared utilities for integration tests.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::{to_bytes, Body};
use axum::http::{header, Request, Response};
use axum::Router;
use serde_json::Value;
use tokio::sync::Notify;

use ocr_gateway::admission::UploadedFile;
use ocr_gateway::config::GatewayConfig;
use ocr_gateway::http::{AppState, HttpServer};
use ocr_gateway::ocr::{OcrEngine, OcrError, Recognition};
use ocr_gateway::storage::{
    DatabaseInfo, MemoryPersistence, NewOcrLog, OcrLog, Persistence, StorageError,
};

pub const BOUNDARY: &str = "ocr-gateway-test-boundary";
pub const MIB: usize = 1024 * 1024;

/// Engine that answers with a fixed recognition and counts calls.
#[derive(Default)]
pub struct StubEngine {
    pub calls: AtomicUsize,
    pub fail: bool,
}

impl StubEngine {
    pub fn failing() -> Self {
        Self {
            calls: AtomicUsize::new(0),
            fail: true,
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl OcrEngine for StubEngine {
    fn name(&self) -> &'static str {
        "stub"
    }

    async fn recognize(&self, upload: &UploadedFile) -> Result<Recognition, OcrError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(OcrError::Output("engine exploded".into()));
        }
        Ok(Recognition {
            text: format!("text from {}", upload.original_name),
            confidence: 91.5,
        })
    }
}

/// Log store whose reads block until released, and whose close waits for
/// in-flight reads the way a connection pool waits for checked-out
/// connections. Every step is appended to `events`.
pub struct GatedPersistence {
    inner: MemoryPersistence,
    gate: Notify,
    idle: Notify,
    in_flight: AtomicUsize,
    pub events: Mutex<Vec<&'static str>>,
}

impl GatedPersistence {
    pub fn new() -> Self {
        Self {
            inner: MemoryPersistence::new(),
            gate: Notify::new(),
            idle: Notify::new(),
            in_flight: AtomicUsize::new(0),
            events: Mutex::new(Vec::new()),
        }
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::SeqCst)
    }

    pub fn release(&self) {
        self.gate.notify_waiters();
    }

    pub fn events(&self) -> Vec<&'static str> {
        self.events.lock().unwrap().clone()
    }

    fn push(&self, event: &'static str) {
        self.events.lock().unwrap().push(event);
    }
}

#[async_trait]
impl Persistence for GatedPersistence {
    async fn initialize(&self) -> Result<(), StorageError> {
        self.inner.initialize().await
    }

    fn info(&self) -> DatabaseInfo {
        DatabaseInfo {
            kind: "gated".into(),
            ..self.inner.info()
        }
    }

    async fn record(&self, entry: NewOcrLog) -> Result<OcrLog, StorageError> {
        self.inner.record(entry).await
    }

    async fn recent(&self, limit: u32) -> Result<Vec<OcrLog>, StorageError> {
        let released = self.gate.notified();
        self.in_flight.fetch_add(1, Ordering::SeqCst);
        self.push("read_started");
        released.await;

        let rows = self.inner.recent(limit).await;
        self.push("read_finished");
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        self.idle.notify_waiters();
        rows
    }

    async fn close(&self) -> Result<(), StorageError> {
        self.push("drain_started");
        while self.in_flight() > 0 {
            let idle = self.idle.notified();
            if self.in_flight() == 0 {
                break;
            }
            idle.await;
        }
        self.push("drain_finished");
        self.inner.close().await
    }
}

/// Default config with static files off.
pub fn test_config() -> GatewayConfig {
    let mut config = GatewayConfig::default();
    config.static_files.enabled = false;
    config
}

pub fn test_router(engine: Arc<dyn OcrEngine>, persistence: Arc<dyn Persistence>) -> Router {
    router_with_config(&test_config(), engine, persistence)
}

pub fn router_with_config(
    config: &GatewayConfig,
    engine: Arc<dyn OcrEngine>,
    persistence: Arc<dyn Persistence>,
) -> Router {
    let state = AppState::new(config, persistence, engine);
    HttpServer::new(config, state).router()
}

/// Engine that panics mid-request.
pub struct PanickingEngine;

#[async_trait]
impl OcrEngine for PanickingEngine {
    fn name(&self) -> &'static str {
        "panicking"
    }

    async fn recognize(&self, _upload: &UploadedFile) -> Result<Recognition, OcrError> {
        panic!("engine crashed");
    }
}

/// A multipart body with one file part.
pub fn multipart_file(
    field: &str,
    filename: &str,
    content_type: Option<&str>,
    contents: &[u8],
) -> Vec<u8> {
    let mut body = Vec::with_capacity(contents.len() + 256);
    body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
    body.extend_from_slice(
        format!("Content-Disposition: form-data; name=\"{field}\"; filename=\"{filename}\"\r\n")
            .as_bytes(),
    );
    if let Some(content_type) = content_type {
        body.extend_from_slice(format!("Content-Type: {content_type}\r\n").as_bytes());
    }
    body.extend_from_slice(b"\r\n");
    body.extend_from_slice(contents);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());
    body
}

/// A multipart body with only a text part.
pub fn multipart_text(field: &str, value: &str) -> Vec<u8> {
    format!(
        "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{field}\"\r\n\r\n{value}\r\n--{BOUNDARY}--\r\n"
    )
    .into_bytes()
}

pub fn ocr_request(body: Vec<u8>) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/ocr")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap()
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

pub async fn json_body(response: Response<Body>) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}
