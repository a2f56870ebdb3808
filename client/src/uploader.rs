use serde_json::Value;

use crate::api::{MediaApi, UploadRequest};

#[derive(Debug, Clone, PartialEq)]
pub enum UploadOutcome {
    /// No file was selected; nothing was sent
    Skipped,
    Uploaded(Value),
    /// The failure has already been logged
    Failed,
}

/// Send the selected file, if any. Errors are logged once and swallowed.
pub async fn handle_upload<A>(api: &A, request: Option<UploadRequest<A::File>>) -> UploadOutcome
where
    A: MediaApi + ?Sized,
{
    let Some(request) = request else {
        return UploadOutcome::Skipped;
    };

    log::debug!("Uploading {}", request.file_name);

    match api.upload(&request).await {
        Ok(reply) => {
            log::info!("File uploaded: {}", reply);
            UploadOutcome::Uploaded(reply)
        }
        Err(e) => {
            log::error!("Upload error for {}: {}", request.file_name, e);
            UploadOutcome::Failed
        }
    }
}
