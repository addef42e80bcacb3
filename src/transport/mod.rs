pub mod adapter;
pub mod error;
pub mod http;
pub mod types;

pub use adapter::TransportAdapter;
pub use error::{TransportError, TransportResult};
pub use http::{HttpTransport, HttpTransportConfig};
pub use types::{FieldValue, FilePayload, FormFields, TransferRequest};
