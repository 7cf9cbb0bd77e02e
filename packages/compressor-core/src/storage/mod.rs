pub mod client;
#[cfg(any(test, feature = "test-util"))]
pub mod memory;

use std::fmt;

use async_trait::async_trait;
use bytes::Bytes;

pub use client::{S3ObjectStore, StaticCredentials, StorageConfig};
#[cfg(any(test, feature = "test-util"))]
pub use memory::MemoryObjectStore;
// StorageError は errors モジュールで定義済み
pub use crate::errors::StorageError;

/// バケットとキーで指定されるオブジェクトの場所
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ObjectLocation {
    pub bucket: String,
    pub key: String,
}

impl ObjectLocation {
    pub fn new(bucket: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            key: key.into(),
        }
    }
}

impl fmt::Display for ObjectLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.bucket, self.key)
    }
}

/// オブジェクトストレージの読み書き
#[async_trait]
pub trait ObjectStore: Send + Sync {
    async fn get(&self, location: &ObjectLocation) -> Result<Bytes, StorageError>;

    async fn put(
        &self,
        location: &ObjectLocation,
        data: Bytes,
        content_type: &str,
    ) -> Result<(), StorageError>;
}
