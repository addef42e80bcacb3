pub mod batch;
pub mod chunked;
mod direct;
pub mod error;
pub mod manager;
pub mod serial;
pub mod types;

#[cfg(test)]
pub(crate) mod testing;

pub use batch::BatchExecutor;
pub use chunked::ChunkedUploader;
pub use error::{TransferError, UploadError, UploadResult};
pub use manager::UploadManager;
pub use serial::SerialExecutor;
pub use types::{
    ChunkDescriptor, OutcomeStatus, UploadOutcome, UploadRequest, UploadResultSet, UploadTarget,
};
