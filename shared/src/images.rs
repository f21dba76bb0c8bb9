use base64::Engine;

use crate::error::{ApiError, StoreError};
use crate::store::ObjectStore;

const IMAGE_PREFIX: &str = "images";
const IMAGE_EXTENSION: &str = "jpg";
const IMAGE_CONTENT_TYPE: &str = "image/jpeg";

/// Object key an idea's image lives at: `images/{id}.jpg`
pub fn image_key(idea_id: &str) -> String {
    format!("{}/{}.{}", IMAGE_PREFIX, idea_id, IMAGE_EXTENSION)
}

/// Decode the base64 `IdeaImage` form field
pub fn decode_image(encoded: &str) -> Result<Vec<u8>, ApiError> {
    base64::engine::general_purpose::STANDARD
        .decode(encoded.trim())
        .map_err(|e| {
            tracing::warn!("Failed to decode base64 image: {}", e);
            ApiError::bad_request("IdeaImage must be base64 encoded")
        })
}

/// Upload an idea's image. Returns the public URL, or `None` if the store did not accept it.
pub async fn upload_image(
    objects: &dyn ObjectStore,
    idea_id: &str,
    bytes: Vec<u8>,
) -> Result<Option<String>, StoreError> {
    let key = image_key(idea_id);
    let accepted = objects.put_object(&key, bytes, IMAGE_CONTENT_TYPE).await?;

    if accepted {
        Ok(Some(objects.public_url(&key)))
    } else {
        tracing::warn!(key = %key, "Object store did not accept image upload");
        Ok(None)
    }
}

pub async fn delete_image(objects: &dyn ObjectStore, idea_id: &str) -> Result<bool, StoreError> {
    objects.delete_object(&image_key(idea_id)).await
}
