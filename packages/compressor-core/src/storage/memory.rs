use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use bytes::Bytes;

use super::{ObjectLocation, ObjectStore};
use crate::errors::StorageError;

/// プロセス内のメモリに保持するオブジェクトストア
#[derive(Debug, Default)]
pub struct MemoryObjectStore {
    objects: Mutex<HashMap<ObjectLocation, StoredObject>>,
}

#[derive(Debug, Clone)]
struct StoredObject {
    data: Bytes,
    content_type: Option<String>,
}

impl MemoryObjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, location: ObjectLocation, data: impl Into<Bytes>) {
        self.lock().insert(
            location,
            StoredObject {
                data: data.into(),
                content_type: None,
            },
        );
    }

    pub fn contains(&self, location: &ObjectLocation) -> bool {
        self.lock().contains_key(location)
    }

    pub fn content_type(&self, location: &ObjectLocation) -> Option<String> {
        self.lock()
            .get(location)
            .and_then(|object| object.content_type.clone())
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<ObjectLocation, StoredObject>> {
        // 保持しているのは値だけなので、poison されても中身はそのまま使える
        self.objects
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl ObjectStore for MemoryObjectStore {
    async fn get(&self, location: &ObjectLocation) -> Result<Bytes, StorageError> {
        self.lock()
            .get(location)
            .map(|object| object.data.clone())
            .ok_or_else(|| StorageError::NotFound {
                key: location.key.clone(),
            })
    }

    async fn put(
        &self,
        location: &ObjectLocation,
        data: Bytes,
        content_type: &str,
    ) -> Result<(), StorageError> {
        self.lock().insert(
            location.clone(),
            StoredObject {
                data,
                content_type: Some(content_type.to_string()),
            },
        );
        Ok(())
    }
}
