//! Large-file lane: one whole-payload transfer at a time

use std::sync::Arc;
use tokio_util::sync::CancellationToken;

use crate::file::FileHandle;
use crate::metrics::FileTimer;
use crate::strategy::Lane;
use crate::transport::TransportAdapter;

use super::direct::send_whole;
use super::error::TransferError;
use super::types::{UploadOutcome, UploadTarget};

pub struct SerialExecutor {
    transport: Arc<dyn TransportAdapter>,
}

impl SerialExecutor {
    pub fn new(transport: Arc<dyn TransportAdapter>) -> Self {
        Self { transport }
    }

    /// Upload `files` strictly one after another, in order
    pub async fn execute(
        &self,
        target: &UploadTarget<'_>,
        files: &[Arc<dyn FileHandle>],
        cancel: &CancellationToken,
    ) -> Vec<UploadOutcome> {
        let mut outcomes = Vec::with_capacity(files.len());
        for file in files {
            outcomes.push(self.execute_one(target, file.as_ref(), cancel).await);
        }
        outcomes
    }

    /// Upload a single large file; skipped if already cancelled
    pub async fn execute_one(
        &self,
        target: &UploadTarget<'_>,
        file: &dyn FileHandle,
        cancel: &CancellationToken,
    ) -> UploadOutcome {
        let timer = FileTimer::start(Lane::SerialLarge);

        if cancel.is_cancelled() {
            tracing::warn!(file = file.name(), "Upload cancelled before large file started");
            timer.failure();
            return UploadOutcome::failure(file.name(), Lane::SerialLarge, TransferError::Cancelled);
        }

        tracing::debug!(file = file.name(), size = file.size(), "Sending large file");
        let result = send_whole(self.transport.as_ref(), target, file).await;

        match &result {
            Ok(_) => {
                tracing::info!(
                    file = file.name(),
                    size = file.size(),
                    elapsed_ms = timer.elapsed().as_millis() as u64,
                    "Large file uploaded"
                );
                timer.success();
            }
            Err(e) => {
                tracing::warn!(file = file.name(), error = %e, "Large file upload failed");
                timer.failure();
            }
        }

        UploadOutcome::from_result(file.name(), Lane::SerialLarge, result)
    }
}
