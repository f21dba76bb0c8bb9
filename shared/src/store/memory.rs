use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use aws_sdk_dynamodb::types::AttributeValue;

use super::{Item, Key, ObjectStore, TableStore};
use crate::error::StoreError;

/// In-process table keyed by a single string attribute.
///
/// Counts every call so callers can assert that a rejected request never
/// reached the store, and can be switched to fail every call.
pub struct MemoryTable {
    key_name: String,
    items: Mutex<BTreeMap<String, Item>>,
    calls: AtomicUsize,
    failing: AtomicBool,
}

impl MemoryTable {
    pub fn new(key_name: impl Into<String>) -> Self {
        Self {
            key_name: key_name.into(),
            items: Mutex::new(BTreeMap::new()),
            calls: AtomicUsize::new(0),
            failing: AtomicBool::new(false),
        }
    }

    /// Number of store operations issued so far
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Direct read that is not counted as a call
    pub fn snapshot(&self, key_value: &str) -> Option<Item> {
        self.lock().get(key_value).cloned()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, BTreeMap<String, Item>> {
        self.items.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn begin(&self) -> Result<(), StoreError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.failing.load(Ordering::SeqCst) {
            return Err(StoreError::Table("ServiceUnavailable: memory table is failing".to_string()));
        }
        Ok(())
    }

    fn check_key(&self, key: &Key) -> Result<(), StoreError> {
        if key.name != self.key_name {
            return Err(StoreError::Table(format!(
                "ValidationException: key {} does not match schema key {}",
                key.name, self.key_name
            )));
        }
        Ok(())
    }
}

fn string_attr<'a>(item: &'a Item, name: &str) -> Option<&'a str> {
    item.get(name).and_then(|v| v.as_s().ok()).map(String::as_str)
}

#[async_trait]
impl TableStore for MemoryTable {
    async fn get(&self, key: &Key) -> Result<Option<Item>, StoreError> {
        self.begin()?;
        self.check_key(key)?;
        Ok(self.lock().get(&key.value).cloned())
    }

    async fn query_index(
        &self,
        _index: &str,
        attribute: &str,
        value: &str,
    ) -> Result<Vec<Item>, StoreError> {
        self.begin()?;
        Ok(self
            .lock()
            .values()
            .filter(|item| string_attr(item, attribute) == Some(value))
            .cloned()
            .collect())
    }

    async fn scan(&self) -> Result<Vec<Item>, StoreError> {
        self.begin()?;
        Ok(self.lock().values().cloned().collect())
    }

    async fn put(&self, item: Item) -> Result<(), StoreError> {
        self.begin()?;
        let key_value = string_attr(&item, &self.key_name)
            .ok_or_else(|| {
                StoreError::Table(format!(
                    "ValidationException: item is missing key attribute {}",
                    self.key_name
                ))
            })?
            .to_string();
        self.lock().insert(key_value, item);
        Ok(())
    }

    async fn update(
        &self,
        key: &Key,
        changes: Vec<(String, AttributeValue)>,
    ) -> Result<Item, StoreError> {
        self.begin()?;
        self.check_key(key)?;

        let mut items = self.lock();
        let item = items.entry(key.value.clone()).or_insert_with(|| {
            Item::from([(key.name.clone(), key.attribute())])
        });

        let mut updated = Item::new();
        for (name, value) in changes {
            item.insert(name.clone(), value.clone());
            updated.insert(name, value);
        }
        Ok(updated)
    }

    async fn delete(&self, key: &Key) -> Result<(), StoreError> {
        self.begin()?;
        self.check_key(key)?;
        self.lock().remove(&key.value);
        Ok(())
    }
}

/// In-process object store; `set_rejecting` makes puts come back unacknowledged
pub struct MemoryBucket {
    bucket: String,
    objects: Mutex<BTreeMap<String, Vec<u8>>>,
    calls: AtomicUsize,
    rejecting: AtomicBool,
    failing: AtomicBool,
}

impl MemoryBucket {
    pub fn new(bucket: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            objects: Mutex::new(BTreeMap::new()),
            calls: AtomicUsize::new(0),
            rejecting: AtomicBool::new(false),
            failing: AtomicBool::new(false),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn set_rejecting(&self, rejecting: bool) {
        self.rejecting.store(rejecting, Ordering::SeqCst);
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn object(&self, key: &str) -> Option<Vec<u8>> {
        self.lock().get(key).cloned()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, BTreeMap<String, Vec<u8>>> {
        self.objects.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn begin(&self) -> Result<bool, StoreError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.failing.load(Ordering::SeqCst) {
            return Err(StoreError::Object("AccessDenied: memory bucket is failing".to_string()));
        }
        Ok(!self.rejecting.load(Ordering::SeqCst))
    }
}

#[async_trait]
impl ObjectStore for MemoryBucket {
    async fn put_object(
        &self,
        key: &str,
        body: Vec<u8>,
        _content_type: &str,
    ) -> Result<bool, StoreError> {
        if !self.begin()? {
            return Ok(false);
        }
        self.lock().insert(key.to_string(), body);
        Ok(true)
    }

    async fn delete_object(&self, key: &str) -> Result<bool, StoreError> {
        if !self.begin()? {
            return Ok(false);
        }
        Ok(self.lock().remove(key).is_some())
    }

    fn public_url(&self, key: &str) -> String {
        format!("https://{}.s3.amazonaws.com/{}", self.bucket, key)
    }
}
