//! Test doubles for the integration tests. They go through the public API
//! only; the crate's unit tests use `upload::testing` instead.

#![allow(dead_code)]

use adaptive_upload::file::{check_range, FileHandle, FileResult};
use adaptive_upload::transport::{
    FieldValue, TransferRequest, TransportAdapter, TransportError, TransportResult,
};
use async_trait::async_trait;
use bytes::Bytes;
use parking_lot::Mutex;
use serde_json::{json, Value};
use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Zero-filled file of any size, materialized one slice at a time
#[derive(Debug)]
pub struct SyntheticFile {
    pub name: String,
    pub size: u64,
}

pub fn synthetic(name: &str, size: u64) -> Arc<dyn FileHandle> {
    Arc::new(SyntheticFile {
        name: name.to_string(),
        size,
    })
}

#[async_trait]
impl FileHandle for SyntheticFile {
    fn name(&self) -> &str {
        &self.name
    }

    fn size(&self) -> u64 {
        self.size
    }

    fn mime_type(&self) -> &str {
        "application/octet-stream"
    }

    async fn slice(&self, start: u64, end: u64) -> FileResult<Bytes> {
        check_range(start, end, self.size)?;
        Ok(Bytes::from(vec![0u8; (end - start) as usize]))
    }
}

#[derive(Debug, Clone)]
pub struct Sent {
    pub file_name: String,
    pub chunk_index: Option<i64>,
    pub data: Bytes,
}

/// Records every request; fails files by name and can cancel a token
/// after a number of requests
#[derive(Default)]
pub struct RecordingTransport {
    sent: Mutex<Vec<Sent>>,
    in_flight: AtomicUsize,
    peak: AtomicUsize,
    failing: HashSet<String>,
    cancel_after: Option<(usize, CancellationToken)>,
}

impl RecordingTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing(mut self, names: &[&str]) -> Self {
        self.failing.extend(names.iter().map(|n| n.to_string()));
        self
    }

    pub fn cancel_after(mut self, requests: usize, token: CancellationToken) -> Self {
        self.cancel_after = Some((requests, token));
        self
    }

    pub fn sent(&self) -> Vec<Sent> {
        self.sent.lock().clone()
    }

    pub fn peak_in_flight(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TransportAdapter for RecordingTransport {
    async fn send(&self, request: TransferRequest) -> TransportResult<Value> {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
        tokio::time::sleep(std::time::Duration::from_millis(2)).await;
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        let chunk_index = match request.fields.get("chunkIndex") {
            Some(FieldValue::Integer(i)) => Some(*i),
            _ => None,
        };
        let count = {
            let mut sent = self.sent.lock();
            sent.push(Sent {
                file_name: request.payload.file_name.clone(),
                chunk_index,
                data: request.payload.data.clone(),
            });
            sent.len()
        };

        if let Some((after, token)) = &self.cancel_after {
            if count >= *after {
                token.cancel();
            }
        }

        if self.failing.contains(&request.payload.file_name) {
            return Err(TransportError::Status {
                status: 503,
                body: format!("unavailable: {}", request.payload.file_name),
            });
        }

        Ok(json!({
            "stored": request.payload.file_name,
            "chunkIndex": chunk_index,
        }))
    }
}
