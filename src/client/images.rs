use serde_json::json;
use tracing::{debug, info};
use uuid::Uuid;

use super::{decode_entity, LegitmarkClient};
use crate::constants::{endpoints, response_keys};
use crate::error::{ErrorKind, LegitmarkError, Result};
use crate::models::ImageData;

impl LegitmarkClient {
    /// Upload one image for one side.
    ///
    /// Two calls: obtain a signed URL from
    /// POST /api/v2/sr/{sr_uuid}/sides/{side_uuid}/upload-url, then PUT the bytes to it.
    pub async fn upload_image(&self, sr_uuid: Uuid, side_uuid: Uuid, image: ImageData) -> Result<()> {
        if image.is_empty() {
            return Err(LegitmarkError::validation(format!(
                "Image for side {side_uuid} is empty"
            ))
            .with_suggestion("Provide the image bytes or skip the side"));
        }

        let endpoint = endpoints::upload_url(sr_uuid, side_uuid);
        let body = json!({ "content_type": image.content_type });
        let response = self.transport.post(&endpoint, Some(&body)).await?;
        let signed_url: String = decode_entity(response, response_keys::UPLOAD_URL, &endpoint)?;

        debug!(
            sr_uuid = %sr_uuid,
            side_uuid = %side_uuid,
            size_bytes = image.len(),
            "Obtained signed upload URL"
        );

        self.transport
            .upload_bytes(&signed_url, image.bytes, &image.content_type)
            .await
            .map_err(|error| match error.kind() {
                // Upload failures without a more specific transport classification
                ErrorKind::UnknownError => LegitmarkError::upload(format!(
                    "Upload for side {side_uuid} failed: {}",
                    error.message()
                ))
                .with_context(error.context().clone())
                .with_cause(error),
                _ => error,
            })?;

        info!(sr_uuid = %sr_uuid, side_uuid = %side_uuid, "Uploaded side image");
        Ok(())
    }
}
