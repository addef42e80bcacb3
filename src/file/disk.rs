use async_trait::async_trait;
use bytes::Bytes;
use std::io::SeekFrom;
use std::path::{Path, PathBuf};
use tokio::fs::File;
use tokio::io::{AsyncReadExt, AsyncSeekExt};

use super::error::{FileError, FileResult};
use super::handle::{check_range, FileHandle};

/// File on local disk. Size is probed once at open; every slice re-opens the
/// file and reads only the requested range.
#[derive(Debug, Clone)]
pub struct DiskFile {
    path: PathBuf,
    name: String,
    mime_type: String,
    size: u64,
}

impl DiskFile {
    pub async fn open(path: impl AsRef<Path>) -> FileResult<Self> {
        let path = path.as_ref().to_path_buf();
        let metadata = tokio::fs::metadata(&path).await?;
        if !metadata.is_file() {
            return Err(FileError::NotAFile(path.display().to_string()));
        }

        let name = path
            .file_name()
            .unwrap_or_default()
            .to_string_lossy()
            .to_string();
        let mime_type = mime_guess::from_path(&path)
            .first_or_octet_stream()
            .essence_str()
            .to_string();

        Ok(Self {
            path,
            name,
            mime_type,
            size: metadata.len(),
        })
    }

    /// Override the name sent to the server
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_mime_type(mut self, mime_type: impl Into<String>) -> Self {
        self.mime_type = mime_type.into();
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl FileHandle for DiskFile {
    fn name(&self) -> &str {
        &self.name
    }

    fn size(&self) -> u64 {
        self.size
    }

    fn mime_type(&self) -> &str {
        &self.mime_type
    }

    async fn slice(&self, start: u64, end: u64) -> FileResult<Bytes> {
        check_range(start, end, self.size)?;

        let mut file = File::open(&self.path).await?;
        file.seek(SeekFrom::Start(start)).await?;

        let mut buffer = vec![0u8; (end - start) as usize];
        file.read_exact(&mut buffer).await?;

        Ok(Bytes::from(buffer))
    }
}
