//! Huge-file lane: ordered chunk transfer
//!
//! A file is cut into `chunk_size` pieces sent one after another, each
//! carrying the caller's fields plus the reassembly descriptor. Only one
//! chunk is held in memory at a time. The final chunk's response becomes the
//! file's result; any chunk failure abandons the rest of the file.

use serde_json::Value;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

use crate::file::FileHandle;
use crate::metrics::{record_chunk_sent, FileTimer};
use crate::strategy::Lane;
use crate::transport::{FilePayload, TransferRequest, TransportAdapter};

use super::error::TransferError;
use super::types::{ChunkDescriptor, UploadOutcome, UploadTarget};

pub struct ChunkedUploader {
    transport: Arc<dyn TransportAdapter>,
    chunk_size: u64,
}

impl ChunkedUploader {
    pub fn new(transport: Arc<dyn TransportAdapter>, chunk_size: u64) -> Self {
        Self {
            transport,
            chunk_size: chunk_size.max(1),
        }
    }

    pub fn chunk_size(&self) -> u64 {
        self.chunk_size
    }

    /// Number of chunks for `file_size`. A zero-byte file still gets one
    /// (empty) chunk so the server sees a complete upload.
    pub fn total_chunks(&self, file_size: u64) -> u64 {
        file_size.div_ceil(self.chunk_size).max(1)
    }

    pub async fn execute(
        &self,
        target: &UploadTarget<'_>,
        file: &dyn FileHandle,
        cancel: &CancellationToken,
    ) -> UploadOutcome {
        let timer = FileTimer::start(Lane::Chunked);
        let result = self.upload_chunks(target, file, cancel).await;

        match &result {
            Ok(_) => {
                tracing::info!(
                    file = file.name(),
                    size = file.size(),
                    elapsed_ms = timer.elapsed().as_millis() as u64,
                    "Chunked upload complete"
                );
                timer.success();
            }
            Err(e) => {
                tracing::warn!(file = file.name(), error = %e, "Chunked upload failed");
                timer.failure();
            }
        }

        UploadOutcome::from_result(file.name(), Lane::Chunked, result)
    }

    async fn upload_chunks(
        &self,
        target: &UploadTarget<'_>,
        file: &dyn FileHandle,
        cancel: &CancellationToken,
    ) -> Result<Value, TransferError> {
        let file_size = file.size();
        let total_chunks = self.total_chunks(file_size);
        let mut last_response = Value::Null;

        tracing::debug!(
            file = file.name(),
            size = file_size,
            chunk_size = self.chunk_size,
            total_chunks,
            "Starting chunked upload"
        );

        for chunk_index in 0..total_chunks {
            let descriptor = ChunkDescriptor::new(file.name(), chunk_index, total_chunks);

            if cancel.is_cancelled() {
                return Err(chunk_error(&descriptor, TransferError::Cancelled));
            }

            last_response = self
                .send_chunk(target, file, &descriptor)
                .await
                .map_err(|e| chunk_error(&descriptor, e))?;
        }

        Ok(last_response)
    }

    async fn send_chunk(
        &self,
        target: &UploadTarget<'_>,
        file: &dyn FileHandle,
        descriptor: &ChunkDescriptor,
    ) -> Result<Value, TransferError> {
        let (start, end) = descriptor.byte_range(file.size(), self.chunk_size);
        let data = file.slice(start, end).await?;
        let chunk_len = data.len();

        let request = TransferRequest {
            endpoint: target.endpoint.to_string(),
            fields: target.fields.merged(&descriptor.to_fields()),
            payload: FilePayload {
                file_name: file.name().to_string(),
                mime_type: file.mime_type().to_string(),
                data,
            },
            file_field_name: target.file_field_name.to_string(),
        };

        let response = self.transport.send(request).await?;
        record_chunk_sent(chunk_len);
        tracing::debug!(
            file = %descriptor.file_name,
            chunk = descriptor.chunk_index,
            total = descriptor.total_chunks,
            bytes = chunk_len,
            final_chunk = descriptor.is_final(),
            "Chunk acknowledged"
        );

        Ok(response)
    }
}

fn chunk_error(descriptor: &ChunkDescriptor, source: TransferError) -> TransferError {
    TransferError::Chunk {
        chunk_index: descriptor.chunk_index,
        total_chunks: descriptor.total_chunks,
        source: Box::new(source),
    }
}
