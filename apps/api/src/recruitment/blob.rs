//! CV storage. Uploads go to S3 / MinIO and are served from a public base URL.

use async_trait::async_trait;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client as S3Client;
use bytes::Bytes;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;

#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Stores `bytes` under `key` and returns the object's public URL.
    async fn upload(
        &self,
        key: &str,
        bytes: Bytes,
        content_type: Option<&str>,
    ) -> Result<String, AppError>;
}

pub struct S3BlobStore {
    client: S3Client,
    bucket: String,
    public_base_url: String,
}

impl S3BlobStore {
    pub fn new(client: S3Client, bucket: String, public_base_url: &str) -> Self {
        Self {
            client,
            bucket,
            public_base_url: public_base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Path-style URL: `<base>/<bucket>/<key>`.
    pub fn public_url(&self, key: &str) -> String {
        format!("{}/{}/{}", self.public_base_url, self.bucket, key)
    }
}

#[async_trait]
impl BlobStore for S3BlobStore {
    async fn upload(
        &self,
        key: &str,
        bytes: Bytes,
        content_type: Option<&str>,
    ) -> Result<String, AppError> {
        let size = bytes.len();
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .body(ByteStream::from(bytes))
            .content_type(content_type.unwrap_or("application/octet-stream"))
            .send()
            .await
            .map_err(|e| AppError::Storage(format!("S3 upload failed: {e}")))?;

        info!("Uploaded {size} bytes to s3://{}/{}", self.bucket, key);
        Ok(self.public_url(key))
    }
}

/// Keeps ASCII alphanumerics and `-`; everything else becomes `_`.
fn key_segment(value: &str) -> String {
    value
        .trim()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' { c } else { '_' })
        .collect()
}

/// Object key for a CV: `<job_post_id>/<epoch_millis>_<first>_<last>.<ext>`.
/// Files without an extension get `.bin`.
pub fn cv_object_key(
    job_post_id: Uuid,
    epoch_millis: i64,
    first_name: &str,
    last_name: &str,
    file_name: &str,
) -> String {
    let extension = file_name
        .rsplit_once('.')
        .map(|(_, ext)| key_segment(ext).to_lowercase())
        .filter(|ext| !ext.is_empty())
        .unwrap_or_else(|| "bin".to_string());

    format!(
        "{job_post_id}/{epoch_millis}_{}_{}.{extension}",
        key_segment(first_name),
        key_segment(last_name)
    )
}

#[cfg(test)]
pub(crate) mod testing {
    use std::sync::Mutex;

    use super::*;

    /// Records uploads; optionally fails every call.
    #[derive(Default)]
    pub struct RecordingBlobStore {
        pub uploads: Mutex<Vec<(String, usize)>>,
        pub fail: bool,
    }

    impl RecordingBlobStore {
        pub fn failing() -> Self {
            Self {
                fail: true,
                ..Self::default()
            }
        }
    }

    #[async_trait]
    impl BlobStore for RecordingBlobStore {
        async fn upload(
            &self,
            key: &str,
            bytes: Bytes,
            _content_type: Option<&str>,
        ) -> Result<String, AppError> {
            if self.fail {
                return Err(AppError::Storage("bucket unavailable".to_string()));
            }
            self.uploads
                .lock()
                .unwrap()
                .push((key.to_string(), bytes.len()));
            Ok(format!("http://blobs.test/cvs/{key}"))
        }
    }
}
