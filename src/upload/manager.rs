use std::sync::Arc;
use tokio_util::sync::CancellationToken;

use crate::file::FileHandle;
use crate::metrics::{record_lane_assigned, record_upload_finished};
use crate::strategy::{partition, Lane, UploadConfig};
use crate::transport::{FormFields, TransportAdapter};

use super::batch::BatchExecutor;
use super::chunked::ChunkedUploader;
use super::error::{UploadError, UploadResult};
use super::serial::SerialExecutor;
use super::types::{UploadRequest, UploadResultSet};

/// Routes each file of an upload to its lane and merges the outcomes.
///
/// The small lane drains first, then large and huge files run one at a time
/// in submission order. A call fails only when every file failed; otherwise
/// the full result set comes back for per-file inspection.
pub struct UploadManager {
    transport: Arc<dyn TransportAdapter>,
    config: UploadConfig,
    batch: BatchExecutor,
    serial: SerialExecutor,
    chunked: ChunkedUploader,
}

impl UploadManager {
    pub fn new(transport: Arc<dyn TransportAdapter>, config: UploadConfig) -> UploadResult<Self> {
        config.validate()?;
        Ok(Self::assemble(transport, config))
    }

    pub fn with_default_config(transport: Arc<dyn TransportAdapter>) -> Self {
        Self::assemble(transport, UploadConfig::default())
    }

    fn assemble(transport: Arc<dyn TransportAdapter>, config: UploadConfig) -> Self {
        Self {
            batch: BatchExecutor::new(transport.clone(), config.batch_concurrency),
            serial: SerialExecutor::new(transport.clone()),
            chunked: ChunkedUploader::new(transport.clone(), config.chunk_size),
            transport,
            config,
        }
    }

    /// Manager sharing this transport with a different config
    pub fn with_config(&self, config: UploadConfig) -> UploadResult<Self> {
        Self::new(self.transport.clone(), config)
    }

    pub fn config(&self) -> &UploadConfig {
        &self.config
    }

    pub async fn upload(&self, request: &UploadRequest) -> UploadResult<UploadResultSet> {
        self.upload_with_cancel(request, &CancellationToken::new()).await
    }

    /// Convenience wrapper building the request from its parts
    pub async fn upload_files(
        &self,
        endpoint: &str,
        fields: FormFields,
        files: Vec<Arc<dyn FileHandle>>,
        file_field_name: &str,
    ) -> UploadResult<UploadResultSet> {
        let request = UploadRequest::new(endpoint, file_field_name)
            .with_fields(fields)
            .with_files(files);
        self.upload(&request).await
    }

    /// Upload honoring `cancel` between cohorts, large files and chunks.
    /// Files not started when cancellation is seen get a cancelled outcome.
    pub async fn upload_with_cancel(
        &self,
        request: &UploadRequest,
        cancel: &CancellationToken,
    ) -> UploadResult<UploadResultSet> {
        if request.files.is_empty() {
            return Err(UploadError::NoFiles);
        }

        let upload_id = uuid::Uuid::new_v4();
        let plan = partition(request.files.iter().map(|f| f.size()), &self.config);

        if let Some(lane) = plan.small_lane {
            for &idx in &plan.small {
                record_lane_assigned(lane, request.files[idx].size());
            }
        }
        for &(idx, lane) in &plan.large {
            record_lane_assigned(lane, request.files[idx].size());
        }

        tracing::info!(
            %upload_id,
            endpoint = %request.endpoint,
            files = plan.len(),
            small = plan.small.len(),
            serial_large = plan.count(Lane::SerialLarge),
            chunked = plan.count(Lane::Chunked),
            "Starting upload"
        );

        let target = request.target();
        let mut outcomes = Vec::with_capacity(plan.len());

        if let Some(lane) = plan.small_lane {
            let small: Vec<Arc<dyn FileHandle>> = plan
                .small
                .iter()
                .map(|&idx| request.files[idx].clone())
                .collect();
            outcomes.extend(self.batch.execute(&target, &small, lane, cancel).await);
        }

        for &(idx, lane) in &plan.large {
            let file = request.files[idx].as_ref();
            let outcome = match lane {
                Lane::Chunked => self.chunked.execute(&target, file, cancel).await,
                _ => self.serial.execute_one(&target, file, cancel).await,
            };
            outcomes.push(outcome);
        }

        let results = UploadResultSet::new(outcomes);
        record_upload_finished(results.len(), results.error_count());
        tracing::info!(
            %upload_id,
            succeeded = results.success_count(),
            failed = results.error_count(),
            "Upload finished"
        );

        settle(results)
    }
}

/// Escalate only when every file failed, using the first failure
fn settle(results: UploadResultSet) -> UploadResult<UploadResultSet> {
    if results.is_success() {
        return Ok(results);
    }

    let first = results
        .first_error()
        .and_then(|outcome| outcome.error().map(|e| (outcome.file_name(), e)));

    match first {
        Some((file_name, error)) => Err(UploadError::AllFailed {
            file_name: file_name.to_string(),
            source: error.clone(),
        }),
        None => Err(UploadError::NoFiles),
    }
}
