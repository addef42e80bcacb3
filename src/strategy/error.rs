use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UploadConfigError {
    #[error("Invalid chunk size: must be greater than zero")]
    ZeroChunkSize,

    #[error("Invalid batch concurrency: must be at least 1")]
    ZeroConcurrency,

    #[error("Small-file threshold ({small}) exceeds huge-file threshold ({huge})")]
    ThresholdOrder { small: u64, huge: u64 },

    #[error("Failed to parse config: {0}")]
    Parse(String),
}

impl From<serde_json::Error> for UploadConfigError {
    fn from(err: serde_json::Error) -> Self {
        UploadConfigError::Parse(err.to_string())
    }
}

pub type ConfigResult<T> = Result<T, UploadConfigError>;
