use async_trait::async_trait;
use bytes::Bytes;

use super::error::FileResult;
use super::handle::{check_range, FileHandle};

/// Payload already held in memory; slices share the buffer
#[derive(Debug, Clone)]
pub struct MemoryFile {
    name: String,
    mime_type: String,
    data: Bytes,
}

impl MemoryFile {
    pub fn new(name: impl Into<String>, mime_type: impl Into<String>, data: impl Into<Bytes>) -> Self {
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
            data: data.into(),
        }
    }

    /// Zero-filled payload of `size` bytes
    pub fn zeroed(name: impl Into<String>, size: usize) -> Self {
        Self::new(name, "application/octet-stream", vec![0u8; size])
    }
}

#[async_trait]
impl FileHandle for MemoryFile {
    fn name(&self) -> &str {
        &self.name
    }

    fn size(&self) -> u64 {
        self.data.len() as u64
    }

    fn mime_type(&self) -> &str {
        &self.mime_type
    }

    async fn slice(&self, start: u64, end: u64) -> FileResult<Bytes> {
        check_range(start, end, self.size())?;
        Ok(self.data.slice(start as usize..end as usize))
    }
}
