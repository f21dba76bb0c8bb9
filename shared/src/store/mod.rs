//! Ports for the two backing stores and their adapters.
//!
//! Handlers only see [`TableStore`] and [`ObjectStore`]. `main` wires the
//! DynamoDB and S3 adapters; tests use the in-memory ones.

mod dynamo;
mod memory;
mod s3;

use std::collections::HashMap;

use async_trait::async_trait;
use aws_sdk_dynamodb::types::AttributeValue;
use serde::{de::DeserializeOwned, Serialize};

use crate::error::StoreError;

pub use dynamo::DynamoTable;
pub use memory::{MemoryBucket, MemoryTable};
pub use s3::S3Bucket;

/// One table record, in DynamoDB's attribute shape
pub type Item = HashMap<String, AttributeValue>;

/// Primary key of a single-attribute string key schema
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Key {
    pub name: String,
    pub value: String,
}

impl Key {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }

    pub fn attribute(&self) -> AttributeValue {
        AttributeValue::S(self.value.clone())
    }
}

pub fn to_item<T: Serialize>(record: &T) -> Result<Item, StoreError> {
    Ok(serde_dynamo::to_item(record)?)
}

pub fn from_item<T: DeserializeOwned>(item: Item) -> Result<T, StoreError> {
    Ok(serde_dynamo::from_item(item)?)
}

pub fn from_items<T: DeserializeOwned>(items: Vec<Item>) -> Result<Vec<T>, StoreError> {
    Ok(serde_dynamo::from_items(items)?)
}

pub fn to_attribute<T: Serialize>(value: &T) -> Result<AttributeValue, StoreError> {
    Ok(serde_dynamo::to_attribute_value(value)?)
}

/// Named attribute overwrites for [`TableStore::update`], skipping absent fields
#[derive(Debug, Default)]
pub struct Changes(Vec<(String, AttributeValue)>);

impl Changes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set<T: Serialize>(
        mut self,
        name: &str,
        value: Option<&T>,
    ) -> Result<Self, StoreError> {
        if let Some(value) = value {
            self.0.push((name.to_string(), to_attribute(value)?));
        }
        Ok(self)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_inner(self) -> Vec<(String, AttributeValue)> {
        self.0
    }
}

#[async_trait]
pub trait TableStore: Send + Sync {
    /// Point lookup by primary key
    async fn get(&self, key: &Key) -> Result<Option<Item>, StoreError>;

    /// Every item of `index` whose `attribute` equals `value`, across all pages
    async fn query_index(
        &self,
        index: &str,
        attribute: &str,
        value: &str,
    ) -> Result<Vec<Item>, StoreError>;

    /// Every item in the table, across all pages
    async fn scan(&self) -> Result<Vec<Item>, StoreError>;

    /// Unconditional write; replaces any item with the same key
    async fn put(&self, item: Item) -> Result<(), StoreError>;

    /// Overwrites `changes` on the item at `key`, creating it if absent.
    /// Returns the new values of the updated attributes.
    async fn update(&self, key: &Key, changes: Vec<(String, AttributeValue)>)
        -> Result<Item, StoreError>;

    async fn delete(&self, key: &Key) -> Result<(), StoreError>;
}

#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Writes a public-read object. `Ok(false)` means the store answered but did
    /// not accept it; S3 either acknowledges or errors, so only the in-memory
    /// bucket reports `Ok(false)`.
    async fn put_object(
        &self,
        key: &str,
        body: Vec<u8>,
        content_type: &str,
    ) -> Result<bool, StoreError>;

    async fn delete_object(&self, key: &str) -> Result<bool, StoreError>;

    /// Public URL an object written at `key` is served from
    fn public_url(&self, key: &str) -> String;
}
