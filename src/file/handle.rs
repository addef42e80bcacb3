use async_trait::async_trait;
use bytes::Bytes;
use std::fmt;

use super::error::{FileError, FileResult};

/// Read-only binary payload that can hand out byte ranges on demand
#[async_trait]
pub trait FileHandle: Send + Sync + fmt::Debug {
    fn name(&self) -> &str;

    /// Size in bytes
    fn size(&self) -> u64;

    fn mime_type(&self) -> &str;

    /// Bytes in `[start, end)`. Only this range is loaded.
    async fn slice(&self, start: u64, end: u64) -> FileResult<Bytes>;

    /// Whole payload as one buffer
    async fn read_all(&self) -> FileResult<Bytes> {
        self.slice(0, self.size()).await
    }
}

/// Validates a `[start, end)` request against a payload of `size` bytes.
/// Shared by every `FileHandle` implementation.
pub fn check_range(start: u64, end: u64, size: u64) -> FileResult<()> {
    if start > end || end > size {
        return Err(FileError::OutOfRange { start, end, size });
    }
    Ok(())
}
