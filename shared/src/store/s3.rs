use async_trait::async_trait;
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::types::ObjectCannedAcl;
use aws_sdk_s3::Client as S3Client;

use super::ObjectStore;
use crate::error::StoreError;

/// Object store backed by one S3 bucket
pub struct S3Bucket {
    client: S3Client,
    bucket: String,
}

impl S3Bucket {
    pub fn new(client: S3Client, bucket: impl Into<String>) -> Self {
        Self {
            client,
            bucket: bucket.into(),
        }
    }
}

#[async_trait]
impl ObjectStore for S3Bucket {
    async fn put_object(
        &self,
        key: &str,
        body: Vec<u8>,
        content_type: &str,
    ) -> Result<bool, StoreError> {
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .body(ByteStream::from(body))
            .content_type(content_type)
            .acl(ObjectCannedAcl::PublicRead)
            .send()
            .await
            .map_err(|e| StoreError::Object(format!("Failed to upload to S3: {}", DisplayErrorContext(e))))?;

        tracing::info!(bucket = %self.bucket, key, "Image uploaded to S3");
        Ok(true)
    }

    async fn delete_object(&self, key: &str) -> Result<bool, StoreError> {
        self.client
            .delete_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| StoreError::Object(format!("Failed to delete from S3: {}", DisplayErrorContext(e))))?;

        tracing::info!(bucket = %self.bucket, key, "Image deleted from S3");
        Ok(true)
    }

    fn public_url(&self, key: &str) -> String {
        format!("https://{}.s3.amazonaws.com/{}", self.bucket, key)
    }
}
