//! Shared fixtures for executor tests

use async_trait::async_trait;
use bytes::Bytes;
use parking_lot::Mutex;
use serde_json::{json, Value};
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tokio_util::sync::CancellationToken;

use crate::file::{check_range, FileHandle, FileResult};
use crate::transport::{
    FieldValue, FormFields, TransferRequest, TransportAdapter, TransportError, TransportResult,
};

use super::types::CHUNK_INDEX_FIELD;

/// File of arbitrary size whose bytes are produced per slice
#[derive(Debug)]
pub struct LazyFile {
    name: String,
    size: u64,
}

impl LazyFile {
    pub fn new(name: &str, size: u64) -> Self {
        Self {
            name: name.to_string(),
            size,
        }
    }
}

#[async_trait]
impl FileHandle for LazyFile {
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
pub struct RecordedCall {
    pub file_name: String,
    pub fields: FormFields,
    pub payload_len: usize,
}

impl RecordedCall {
    pub fn chunk_index(&self) -> Option<i64> {
        match self.fields.get(CHUNK_INDEX_FIELD) {
            Some(FieldValue::Integer(i)) => Some(*i),
            _ => None,
        }
    }
}

/// Request boundaries as seen by the transport, in the order they happened
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallEvent {
    Started(String),
    Finished(String),
}

/// Transport that records calls, tracks concurrency and fails on demand
#[derive(Default)]
pub struct MockTransport {
    calls: Mutex<Vec<RecordedCall>>,
    events: Mutex<Vec<CallEvent>>,
    in_flight: AtomicUsize,
    peak: AtomicUsize,
    failing_files: HashSet<String>,
    failing_chunk: Option<i64>,
    delay: Duration,
    file_delays: HashMap<String, Duration>,
    cancel_after: Option<(usize, CancellationToken)>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Per-file delay overriding the default one
    pub fn with_file_delay(mut self, file_name: &str, delay: Duration) -> Self {
        self.file_delays.insert(file_name.to_string(), delay);
        self
    }

    pub fn failing(mut self, file_name: &str) -> Self {
        self.failing_files.insert(file_name.to_string());
        self
    }

    pub fn failing_at_chunk(mut self, chunk_index: i64) -> Self {
        self.failing_chunk = Some(chunk_index);
        self
    }

    /// Cancel `token` once `calls` requests have completed
    pub fn cancel_after(mut self, calls: usize, token: CancellationToken) -> Self {
        self.cancel_after = Some((calls, token));
        self
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().clone()
    }

    pub fn events(&self) -> Vec<CallEvent> {
        self.events.lock().clone()
    }

    /// Position of `event` in the event log
    pub fn event_position(&self, event: &CallEvent) -> Option<usize> {
        self.events.lock().iter().position(|e| e == event)
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }

    pub fn peak_in_flight(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TransportAdapter for MockTransport {
    async fn send(&self, request: TransferRequest) -> TransportResult<Value> {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);

        let call = RecordedCall {
            file_name: request.payload.file_name.clone(),
            fields: request.fields.clone(),
            payload_len: request.payload.data.len(),
        };
        let chunk_index = call.chunk_index();
        let file_name = request.payload.file_name.clone();
        self.events.lock().push(CallEvent::Started(file_name.clone()));
        let completed = {
            let mut calls = self.calls.lock();
            calls.push(call);
            calls.len()
        };

        let delay = self.file_delays.get(&file_name).copied().unwrap_or(self.delay);
        if delay.is_zero() {
            tokio::task::yield_now().await;
        } else {
            tokio::time::sleep(delay).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        self.events.lock().push(CallEvent::Finished(file_name.clone()));

        if let Some((after, token)) = &self.cancel_after {
            if completed >= *after {
                token.cancel();
            }
        }

        if self.failing_files.contains(&file_name) {
            return Err(TransportError::Status {
                status: 500,
                body: format!("rejected {file_name}"),
            });
        }
        if chunk_index.is_some() && chunk_index == self.failing_chunk {
            return Err(TransportError::Network("connection reset".into()));
        }

        Ok(json!({
            "file": file_name,
            "chunkIndex": chunk_index,
            "bytes": request.payload.data.len(),
        }))
    }
}
