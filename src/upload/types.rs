use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;

use crate::file::FileHandle;
use crate::strategy::Lane;
use crate::transport::{FieldValue, FormFields};

use super::error::TransferError;

/// Wire keys the reassembly endpoint expects on every chunk
pub const IS_CHUNK_FIELD: &str = "isChunk";
pub const CHUNK_INDEX_FIELD: &str = "chunkIndex";
pub const TOTAL_CHUNKS_FIELD: &str = "totalChunks";
pub const FILE_NAME_FIELD: &str = "fileName";

/// One upload call: shared fields plus any number of files
#[derive(Debug, Clone)]
pub struct UploadRequest {
    pub endpoint: String,
    pub fields: FormFields,
    pub files: Vec<Arc<dyn FileHandle>>,
    /// Form key every file and chunk is attached under
    pub file_field_name: String,
}

impl UploadRequest {
    pub fn new(endpoint: impl Into<String>, file_field_name: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            fields: FormFields::new(),
            files: Vec::new(),
            file_field_name: file_field_name.into(),
        }
    }

    pub fn with_fields(mut self, fields: FormFields) -> Self {
        self.fields = fields;
        self
    }

    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.fields.insert(key, value);
        self
    }

    pub fn with_file<F: FileHandle + 'static>(mut self, file: F) -> Self {
        self.files.push(Arc::new(file));
        self
    }

    pub fn with_files<I>(mut self, files: I) -> Self
    where
        I: IntoIterator<Item = Arc<dyn FileHandle>>,
    {
        self.files.extend(files);
        self
    }

    pub fn target(&self) -> UploadTarget<'_> {
        UploadTarget {
            endpoint: &self.endpoint,
            fields: &self.fields,
            file_field_name: &self.file_field_name,
        }
    }
}

/// Destination shared by every transfer of one call
#[derive(Debug, Clone, Copy)]
pub struct UploadTarget<'a> {
    pub endpoint: &'a str,
    pub fields: &'a FormFields,
    pub file_field_name: &'a str,
}

/// Reassembly metadata for one chunk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkDescriptor {
    pub file_name: String,
    pub chunk_index: u64,
    pub total_chunks: u64,
}

impl ChunkDescriptor {
    pub fn new(file_name: impl Into<String>, chunk_index: u64, total_chunks: u64) -> Self {
        Self {
            file_name: file_name.into(),
            chunk_index,
            total_chunks,
        }
    }

    pub fn is_final(&self) -> bool {
        self.chunk_index + 1 == self.total_chunks
    }

    /// `[start, end)` of this chunk within a file of `file_size` bytes
    pub fn byte_range(&self, file_size: u64, chunk_size: u64) -> (u64, u64) {
        let start = (self.chunk_index * chunk_size).min(file_size);
        let end = (start + chunk_size).min(file_size);
        (start, end)
    }

    pub fn to_fields(&self) -> FormFields {
        FormFields::new()
            .with(IS_CHUNK_FIELD, true)
            .with(CHUNK_INDEX_FIELD, FieldValue::Integer(self.chunk_index as i64))
            .with(TOTAL_CHUNKS_FIELD, FieldValue::Integer(self.total_chunks as i64))
            .with(FILE_NAME_FIELD, self.file_name.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OutcomeStatus {
    Success,
    Error,
}

/// Final record for one input file
#[derive(Debug, Clone, PartialEq)]
pub struct UploadOutcome {
    file_name: String,
    lane: Lane,
    status: OutcomeStatus,
    data: Option<Value>,
    error: Option<TransferError>,
}

impl UploadOutcome {
    pub fn success(file_name: impl Into<String>, lane: Lane, data: Value) -> Self {
        Self {
            file_name: file_name.into(),
            lane,
            status: OutcomeStatus::Success,
            data: Some(data),
            error: None,
        }
    }

    pub fn failure(file_name: impl Into<String>, lane: Lane, error: TransferError) -> Self {
        Self {
            file_name: file_name.into(),
            lane,
            status: OutcomeStatus::Error,
            data: None,
            error: Some(error),
        }
    }

    pub(crate) fn from_result(
        file_name: impl Into<String>,
        lane: Lane,
        result: Result<Value, TransferError>,
    ) -> Self {
        match result {
            Ok(data) => Self::success(file_name, lane, data),
            Err(error) => Self::failure(file_name, lane, error),
        }
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn lane(&self) -> Lane {
        self.lane
    }

    pub fn status(&self) -> OutcomeStatus {
        self.status
    }

    /// Server response; for chunked files, the final chunk's response
    pub fn data(&self) -> Option<&Value> {
        self.data.as_ref()
    }

    pub fn error(&self) -> Option<&TransferError> {
        self.error.as_ref()
    }

    pub fn is_success(&self) -> bool {
        self.status == OutcomeStatus::Success
    }

    pub fn is_error(&self) -> bool {
        self.status == OutcomeStatus::Error
    }

    pub fn into_data(self) -> Option<Value> {
        self.data
    }
}

/// Outcomes of one upload call: small-lane files first, then the large lane,
/// each in submission order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UploadResultSet {
    outcomes: Vec<UploadOutcome>,
}

impl UploadResultSet {
    pub fn new(outcomes: Vec<UploadOutcome>) -> Self {
        Self { outcomes }
    }

    pub fn outcomes(&self) -> &[UploadOutcome] {
        &self.outcomes
    }

    pub fn iter(&self) -> std::slice::Iter<'_, UploadOutcome> {
        self.outcomes.iter()
    }

    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    pub fn successes(&self) -> impl Iterator<Item = &UploadOutcome> {
        self.outcomes.iter().filter(|o| o.is_success())
    }

    pub fn failures(&self) -> impl Iterator<Item = &UploadOutcome> {
        self.outcomes.iter().filter(|o| o.is_error())
    }

    pub fn success_count(&self) -> usize {
        self.successes().count()
    }

    pub fn error_count(&self) -> usize {
        self.failures().count()
    }

    /// Not every file failed
    pub fn is_success(&self) -> bool {
        self.error_count() < self.len()
    }

    /// No file failed
    pub fn is_complete(&self) -> bool {
        self.error_count() == 0
    }

    pub fn first_error(&self) -> Option<&UploadOutcome> {
        self.failures().next()
    }

    pub fn into_outcomes(self) -> Vec<UploadOutcome> {
        self.outcomes
    }
}

impl IntoIterator for UploadResultSet {
    type Item = UploadOutcome;
    type IntoIter = std::vec::IntoIter<UploadOutcome>;

    fn into_iter(self) -> Self::IntoIter {
        self.outcomes.into_iter()
    }
}

impl<'a> IntoIterator for &'a UploadResultSet {
    type Item = &'a UploadOutcome;
    type IntoIter = std::slice::Iter<'a, UploadOutcome>;

    fn into_iter(self) -> Self::IntoIter {
        self.outcomes.iter()
    }
}
