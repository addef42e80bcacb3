use async_trait::async_trait;
use serde_json::Value;

use super::error::TransportResult;
use super::types::TransferRequest;

/// Performs one request carrying structured fields and a single binary
/// payload. Retries, auth and timeouts are the implementor's business.
#[async_trait]
pub trait TransportAdapter: Send + Sync {
    async fn send(&self, request: TransferRequest) -> TransportResult<Value>;
}
