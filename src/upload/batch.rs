//! Small-file lane: bounded-concurrency cohorts

use futures::future::join_all;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

use crate::file::FileHandle;
use crate::metrics::FileTimer;
use crate::strategy::Lane;
use crate::transport::TransportAdapter;

use super::direct::send_whole;
use super::error::TransferError;
use super::types::{UploadOutcome, UploadTarget};

/// Sends small files in cohorts of at most `concurrency`. Each cohort settles
/// completely before the next one is drawn.
pub struct BatchExecutor {
    transport: Arc<dyn TransportAdapter>,
    concurrency: usize,
}

impl BatchExecutor {
    pub fn new(transport: Arc<dyn TransportAdapter>, concurrency: usize) -> Self {
        Self {
            transport,
            concurrency: concurrency.max(1),
        }
    }

    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    /// One outcome per file, in input order. Files left when `cancel` fires
    /// between cohorts are reported as cancelled.
    pub async fn execute(
        &self,
        target: &UploadTarget<'_>,
        files: &[Arc<dyn FileHandle>],
        lane: Lane,
        cancel: &CancellationToken,
    ) -> Vec<UploadOutcome> {
        let mut outcomes = Vec::with_capacity(files.len());

        for (cohort_idx, cohort) in files.chunks(self.concurrency).enumerate() {
            if cancel.is_cancelled() {
                let done = outcomes.len();
                tracing::warn!(
                    skipped = files.len() - done,
                    "Upload cancelled, skipping remaining small files"
                );
                outcomes.extend(files[done..].iter().map(|file| {
                    FileTimer::start(lane).failure();
                    UploadOutcome::failure(file.name(), lane, TransferError::Cancelled)
                }));
                break;
            }

            tracing::debug!(cohort = cohort_idx, size = cohort.len(), "Sending cohort");
            let settled = join_all(
                cohort
                    .iter()
                    .map(|file| self.transfer_one(target, file.as_ref(), lane)),
            )
            .await;
            outcomes.extend(settled);
        }

        outcomes
    }

    async fn transfer_one(
        &self,
        target: &UploadTarget<'_>,
        file: &dyn FileHandle,
        lane: Lane,
    ) -> UploadOutcome {
        let timer = FileTimer::start(lane);
        let result = send_whole(self.transport.as_ref(), target, file).await;

        match &result {
            Ok(_) => {
                tracing::debug!(file = file.name(), size = file.size(), "File uploaded");
                timer.success();
            }
            Err(e) => {
                tracing::warn!(file = file.name(), error = %e, "File upload failed");
                timer.failure();
            }
        }

        UploadOutcome::from_result(file.name(), lane, result)
    }
}
