use thiserror::Error;

#[derive(Error, Debug)]
pub enum FileError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Byte range {start}..{end} is outside file of {size} bytes")]
    OutOfRange { start: u64, end: u64, size: u64 },

    #[error("Not a regular file: {0}")]
    NotAFile(String),
}

pub type FileResult<T> = Result<T, FileError>;
