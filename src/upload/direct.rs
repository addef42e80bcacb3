use serde_json::Value;

use crate::file::FileHandle;
use crate::transport::{FilePayload, TransferRequest, TransportAdapter};

use super::error::TransferError;
use super::types::UploadTarget;

/// Send a whole file as one request with the caller's fields
pub(crate) async fn send_whole(
    transport: &dyn TransportAdapter,
    target: &UploadTarget<'_>,
    file: &dyn FileHandle,
) -> Result<Value, TransferError> {
    let data = file.read_all().await?;
    let request = TransferRequest {
        endpoint: target.endpoint.to_string(),
        fields: target.fields.clone(),
        payload: FilePayload {
            file_name: file.name().to_string(),
            mime_type: file.mime_type().to_string(),
            data,
        },
        file_field_name: target.file_field_name.to_string(),
    };

    let response = transport.send(request).await?;
    crate::metrics::record_payload_sent(file.size());
    Ok(response)
}
