pub mod disk;
pub mod error;
pub mod handle;
pub mod memory;

pub use disk::DiskFile;
pub use error::{FileError, FileResult};
pub use handle::{check_range, FileHandle};
pub use memory::MemoryFile;
