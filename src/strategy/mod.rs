pub mod classifier;
pub mod error;
pub mod types;

pub use classifier::{classify, partition};
pub use error::{ConfigResult, UploadConfigError};
pub use types::{Lane, LanePlan, UploadConfig, MIB};
