use async_trait::async_trait;
use aws_sdk_dynamodb::error::DisplayErrorContext;
use aws_sdk_dynamodb::types::{AttributeValue, ReturnValue};
use aws_sdk_dynamodb::Client as DynamoClient;

use super::{Item, Key, TableStore};
use crate::error::StoreError;

/// Table store backed by one DynamoDB table
pub struct DynamoTable {
    client: DynamoClient,
    table_name: String,
}

impl DynamoTable {
    pub fn new(client: DynamoClient, table_name: impl Into<String>) -> Self {
        Self {
            client,
            table_name: table_name.into(),
        }
    }
}

fn table_error<E: std::error::Error>(err: E) -> StoreError {
    StoreError::Table(DisplayErrorContext(err).to_string())
}

/// `SET #f0 = :v0, #f1 = :v1, ...` for the given attribute names
fn set_expression(count: usize) -> String {
    let assignments: Vec<String> = (0..count).map(|i| format!("#f{i} = :v{i}")).collect();
    format!("SET {}", assignments.join(", "))
}

#[async_trait]
impl TableStore for DynamoTable {
    async fn get(&self, key: &Key) -> Result<Option<Item>, StoreError> {
        let result = self
            .client
            .get_item()
            .table_name(&self.table_name)
            .key(&key.name, key.attribute())
            .send()
            .await
            .map_err(table_error)?;

        Ok(result.item().cloned())
    }

    async fn query_index(
        &self,
        index: &str,
        attribute: &str,
        value: &str,
    ) -> Result<Vec<Item>, StoreError> {
        let mut items = Vec::new();
        let mut start_key: Option<Item> = None;

        loop {
            let result = self
                .client
                .query()
                .table_name(&self.table_name)
                .index_name(index)
                .key_condition_expression("#attr = :value")
                .expression_attribute_names("#attr", attribute)
                .expression_attribute_values(":value", AttributeValue::S(value.to_string()))
                .set_exclusive_start_key(start_key.take())
                .send()
                .await
                .map_err(table_error)?;

            items.extend(result.items().iter().cloned());

            match result.last_evaluated_key() {
                Some(last) if !last.is_empty() => start_key = Some(last.clone()),
                _ => break,
            }
        }

        tracing::info!(index, count = items.len(), "Index query complete");
        Ok(items)
    }

    async fn scan(&self) -> Result<Vec<Item>, StoreError> {
        let mut items = Vec::new();
        let mut start_key: Option<Item> = None;

        loop {
            let result = self
                .client
                .scan()
                .table_name(&self.table_name)
                .set_exclusive_start_key(start_key.take())
                .send()
                .await
                .map_err(table_error)?;

            items.extend(result.items().iter().cloned());

            match result.last_evaluated_key() {
                Some(last) if !last.is_empty() => start_key = Some(last.clone()),
                _ => break,
            }
        }

        Ok(items)
    }

    async fn put(&self, item: Item) -> Result<(), StoreError> {
        self.client
            .put_item()
            .table_name(&self.table_name)
            .set_item(Some(item))
            .send()
            .await
            .map_err(table_error)?;

        Ok(())
    }

    async fn update(
        &self,
        key: &Key,
        changes: Vec<(String, AttributeValue)>,
    ) -> Result<Item, StoreError> {
        let mut builder = self
            .client
            .update_item()
            .table_name(&self.table_name)
            .key(&key.name, key.attribute())
            .update_expression(set_expression(changes.len()))
            .return_values(ReturnValue::UpdatedNew);

        for (i, (name, value)) in changes.into_iter().enumerate() {
            builder = builder
                .expression_attribute_names(format!("#f{i}"), name)
                .expression_attribute_values(format!(":v{i}"), value);
        }

        let result = builder.send().await.map_err(table_error)?;
        Ok(result.attributes().cloned().unwrap_or_default())
    }

    async fn delete(&self, key: &Key) -> Result<(), StoreError> {
        self.client
            .delete_item()
            .table_name(&self.table_name)
            .key(&key.name, key.attribute())
            .send()
            .await
            .map_err(table_error)?;

        Ok(())
    }
}
