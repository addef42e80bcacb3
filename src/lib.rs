//! Adaptive upload transfer manager
//!
//! Sends a set of files to one endpoint, choosing per file between a
//! bounded-concurrency batch, a serial whole-file transfer, or an ordered
//! chunked transfer, and merges the per-file outcomes into one result set
//! that tolerates partial failure.

pub mod file;
pub mod metrics;
pub mod strategy;
pub mod transport;
pub mod upload;

pub use file::{DiskFile, FileHandle, MemoryFile};
pub use strategy::{classify, Lane, UploadConfig};
pub use transport::{FieldValue, FormFields, HttpTransport, HttpTransportConfig, TransportAdapter};
pub use upload::{
    TransferError, UploadError, UploadManager, UploadOutcome, UploadRequest, UploadResultSet,
};
