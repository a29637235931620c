use anyhow::Context;
use aws_config::{defaults, BehaviorVersion};
use aws_credential_types::Credentials;
use aws_sdk_s3::{
    config::{Builder as S3ConfigBuilder, Region},
    Client,
};
use async_trait::async_trait;
use aws_smithy_types::byte_stream::ByteStream;
use bytes::Bytes;

use crate::config::StorageConfig;

#[async_trait]
pub trait StorageClient: Send + Sync {
    async fn put_object(&self, key: &str, body: Bytes, content_type: &str) -> anyhow::Result<()>;
    async fn delete_object(&self, key: &str) -> anyhow::Result<()>;
    /// Public URL of an object; the bucket is publicly readable.
    fn public_url(&self, key: &str) -> String;
}

#[derive(Clone)]
pub struct Storage {
    client: Client,
    endpoint: String,
    bucket: String,
}

impl Storage {
    pub async fn new(cfg: &StorageConfig) -> anyhow::Result<Self> {
        let shared = defaults(BehaviorVersion::latest())
            .region(Region::new(cfg.region.clone()))
            .credentials_provider(Credentials::new(
                &cfg.access_key,
                &cfg.secret_key,
                None,
                None,
                "static",
            ))
            .endpoint_url(&cfg.endpoint)
            .load()
            .await;

        let conf = S3ConfigBuilder::from(&shared)
            .endpoint_url(&cfg.endpoint)
            .force_path_style(true)
            .build();

        Ok(Self {
            client: Client::from_conf(conf),
            endpoint: cfg.endpoint.trim_end_matches('/').to_string(),
            bucket: cfg.bucket.clone(),
        })
    }
}

#[async_trait]
impl StorageClient for Storage {
    async fn put_object(&self, key: &str, body: Bytes, content_type: &str) -> anyhow::Result<()> {
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .body(ByteStream::from(body))
            .content_type(content_type)
            .send()
            .await
            .context("s3 put_object")?;
        Ok(())
    }

    async fn delete_object(&self, key: &str) -> anyhow::Result<()> {
        self.client
            .delete_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .context("s3 delete_object")?;
        Ok(())
    }

    fn public_url(&self, key: &str) -> String {
        format!("{}/{}/{}", self.endpoint, self.bucket, key)
    }
}

/// Derive the storage key from a persisted public URL.
///
/// Naive path-segment split: everything after the bucket segment, falling
/// back to the last path segment. Callers treat deletion as best-effort, so
/// a wrong guess on an exotic URL costs an orphaned object, nothing more.
pub fn key_from_url(url: &str, bucket: &str) -> Option<String> {
    let path = url.split_once("://").map(|(_, rest)| rest).unwrap_or(url);
    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
    if segments.len() < 2 {
        return None;
    }
    if let Some(idx) = segments.iter().position(|s| *s == bucket) {
        let key = segments[idx + 1..].join("/");
        return if key.is_empty() { None } else { Some(key) };
    }
    segments.last().map(|s| s.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_from_bucket_relative_url() {
        let url = "https://minio.example.com/catalog/catalog-products/abc123.jpg";
        assert_eq!(
            key_from_url(url, "catalog"),
            Some("catalog-products/abc123.jpg".to_string())
        );
    }

    #[test]
    fn key_falls_back_to_last_segment() {
        let url = "https://cdn.example.com/some/other/path/abc123.jpg";
        assert_eq!(key_from_url(url, "catalog"), Some("abc123.jpg".to_string()));
    }

    #[test]
    fn key_from_garbage_is_none() {
        assert_eq!(key_from_url("not-a-url", "catalog"), None);
        assert_eq!(key_from_url("", "catalog"), None);
    }

    #[test]
    fn url_ending_at_bucket_has_no_key() {
        let url = "https://minio.example.com/catalog";
        assert_eq!(key_from_url(url, "catalog"), None);
    }
}
