//! Object bucket abstraction for the object-storage backend.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, trace};

/// Object bucket errors.
#[derive(Debug, Error)]
pub enum BucketError {
    /// HTTP client could not be built or the request failed to complete
    #[error("Bucket request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Service answered with a non-success status
    #[error("Bucket returned HTTP {status} for {key}")]
    Status { status: u16, key: String },
}

/// Metadata attached to every stored object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PutOptions {
    pub content_type: String,
    pub acl: String,
    pub storage_class: Option<String>,
}

/// Minimal key/value operations the object store needs from a bucket.
///
/// Implementations perform no retries; callers decide on a retry policy.
pub trait ObjectBucket: Send + Sync {
    fn put_object(&self, key: &str, data: &[u8], options: &PutOptions) -> Result<(), BucketError>;

    /// Fetch an object, or `None` if the key does not exist.
    fn get_object(&self, key: &str) -> Result<Option<Vec<u8>>, BucketError>;

    /// Remove `keys`, returning how many objects were actually removed.
    fn delete_objects(&self, keys: &[String]) -> Result<usize, BucketError>;
}

/// In-process bucket for tests and dry runs.
#[derive(Debug, Default)]
pub struct MemoryBucket {
    objects: Mutex<HashMap<String, (Vec<u8>, PutOptions)>>,
}

impl MemoryBucket {
    pub fn new() -> Self {
        Self::default()
    }

    /// Options the object at `key` was written with.
    pub fn put_options(&self, key: &str) -> Option<PutOptions> {
        self.lock().get(key).map(|(_, options)| options.clone())
    }

    /// Every stored key, sorted.
    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.lock().keys().cloned().collect();
        keys.sort();
        keys
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, (Vec<u8>, PutOptions)>> {
        self.objects.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl ObjectBucket for MemoryBucket {
    fn put_object(&self, key: &str, data: &[u8], options: &PutOptions) -> Result<(), BucketError> {
        self.lock()
            .insert(key.to_string(), (data.to_vec(), options.clone()));
        Ok(())
    }

    fn get_object(&self, key: &str) -> Result<Option<Vec<u8>>, BucketError> {
        Ok(self.lock().get(key).map(|(data, _)| data.clone()))
    }

    fn delete_objects(&self, keys: &[String]) -> Result<usize, BucketError> {
        let mut objects = self.lock();
        Ok(keys.iter().filter(|k| objects.remove(*k).is_some()).count())
    }
}

/// Default request timeout for bucket operations.
const BUCKET_TIMEOUT_SECS: u64 = 30;

/// S3-compatible bucket reached over plain HTTP with path-style URLs.
///
/// Request signing is left to the endpoint (for example a signing proxy or a
/// bucket policy that admits the host).
#[derive(Clone)]
pub struct HttpBucket {
    client: reqwest::blocking::Client,
    base_url: String,
}

impl HttpBucket {
    /// Create a bucket client for `{endpoint}/{bucket}`.
    pub fn new(endpoint: &str, bucket: &str) -> Result<Self, BucketError> {
        Self::with_timeout(endpoint, bucket, BUCKET_TIMEOUT_SECS)
    }

    pub fn with_timeout(endpoint: &str, bucket: &str, timeout_secs: u64) -> Result<Self, BucketError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .user_agent(concat!("tilepyramid/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            base_url: format!("{}/{}", endpoint.trim_end_matches('/'), bucket),
        })
    }

    /// Full URL for an object key; keys start with `/`.
    pub fn object_url(&self, key: &str) -> String {
        format!("{}/{}", self.base_url, key.trim_start_matches('/'))
    }

    fn check_status(response: &reqwest::blocking::Response, key: &str) -> Result<(), BucketError> {
        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(BucketError::Status {
                status: status.as_u16(),
                key: key.to_string(),
            })
        }
    }
}

impl ObjectBucket for HttpBucket {
    fn put_object(&self, key: &str, data: &[u8], options: &PutOptions) -> Result<(), BucketError> {
        let url = self.object_url(key);
        trace!(url = %url, bytes = data.len(), "PUT object");

        let mut request = self
            .client
            .put(&url)
            .header(reqwest::header::CONTENT_TYPE, &options.content_type)
            .header("x-amz-acl", &options.acl)
            .body(data.to_vec());
        if let Some(class) = &options.storage_class {
            request = request.header("x-amz-storage-class", class);
        }

        let response = request.send()?;
        Self::check_status(&response, key)
    }

    fn get_object(&self, key: &str) -> Result<Option<Vec<u8>>, BucketError> {
        let url = self.object_url(key);
        trace!(url = %url, "GET object");

        let response = self.client.get(&url).send()?;
        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        Self::check_status(&response, key)?;
        Ok(Some(response.bytes()?.to_vec()))
    }

    fn delete_objects(&self, keys: &[String]) -> Result<usize, BucketError> {
        let mut deleted = 0;
        for key in keys {
            let response = self.client.delete(self.object_url(key)).send()?;
            if response.status() == reqwest::StatusCode::NOT_FOUND {
                continue;
            }
            Self::check_status(&response, key)?;
            deleted += 1;
        }
        debug!(requested = keys.len(), deleted, "Deleted objects");
        Ok(deleted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options() -> PutOptions {
        PutOptions {
            content_type: "application/json".to_string(),
            acl: "public-read".to_string(),
            storage_class: None,
        }
    }

    #[test]
    fn test_memory_bucket_roundtrip() {
        let bucket = MemoryBucket::new();
        bucket.put_object("/a", b"1", &options()).unwrap();
        assert_eq!(bucket.get_object("/a").unwrap(), Some(b"1".to_vec()));
        assert_eq!(bucket.get_object("/b").unwrap(), None);
        assert_eq!(bucket.put_options("/a"), Some(options()));
    }

    #[test]
    fn test_memory_bucket_delete_counts_removed() {
        let bucket = MemoryBucket::new();
        bucket.put_object("/a", b"1", &options()).unwrap();
        bucket.put_object("/b", b"2", &options()).unwrap();
        let removed = bucket
            .delete_objects(&["/a".to_string(), "/missing".to_string()])
            .unwrap();
        assert_eq!(removed, 1);
        assert_eq!(bucket.keys(), vec!["/b".to_string()]);
    }

    #[test]
    fn test_http_bucket_object_url() {
        let bucket = HttpBucket::new("https://s3.example.com/", "tiles").unwrap();
        assert_eq!(
            bucket.object_url("/20240101/abcde/osm/all/0/0/0.json"),
            "https://s3.example.com/tiles/20240101/abcde/osm/all/0/0/0.json"
        );
    }
}
