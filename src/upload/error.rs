use thiserror::Error;

use crate::file::FileError;
use crate::strategy::UploadConfigError;
use crate::transport::TransportError;

/// Why a single file failed. Recorded in its outcome.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TransferError {
    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error("Failed to read file: {0}")]
    File(String),

    #[error("Chunk {chunk_index} of {total_chunks} failed: {source}")]
    Chunk {
        chunk_index: u64,
        total_chunks: u64,
        #[source]
        source: Box<TransferError>,
    },

    #[error("Upload cancelled")]
    Cancelled,
}

impl From<FileError> for TransferError {
    fn from(err: FileError) -> Self {
        TransferError::File(err.to_string())
    }
}

impl TransferError {
    pub fn is_cancelled(&self) -> bool {
        match self {
            TransferError::Cancelled => true,
            TransferError::Chunk { source, .. } => source.is_cancelled(),
            _ => false,
        }
    }
}

#[derive(Error, Debug)]
pub enum UploadError {
    #[error("No files to upload")]
    NoFiles,

    #[error("Invalid upload config: {0}")]
    InvalidConfig(#[from] UploadConfigError),

    /// Every file failed; carries the first failure in result order.
    /// Small-lane files come first there, so this can differ from
    /// submission order when a request mixes lanes.
    #[error("All uploads failed, first failure on {file_name}: {source}")]
    AllFailed {
        file_name: String,
        #[source]
        source: TransferError,
    },
}

impl UploadError {
    /// The representative per-file error of a total failure
    pub fn transfer_error(&self) -> Option<&TransferError> {
        match self {
            UploadError::AllFailed { source, .. } => Some(source),
            _ => None,
        }
    }
}

pub type UploadResult<T> = Result<T, UploadError>;
