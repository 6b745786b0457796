use async_trait::async_trait;
use mongodb::bson::{self, Document};
use serde::{de::DeserializeOwned, Serialize};

use crate::errors::Result;

/// Flat key-value document collections. Every document is addressed by
/// `(collection, key)`; the key is the user's email.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn get(&self, collection: &str, key: &str) -> Result<Option<Document>>;

    /// Creates or fully replaces the document.
    async fn set(&self, collection: &str, key: &str, document: Document) -> Result<()>;

    /// Merges `fields` into an existing document. Fails with
    /// `DocumentNotFound` when there is nothing to update.
    async fn update(&self, collection: &str, key: &str, fields: Document) -> Result<()>;

    /// Deleting a missing document is not an error.
    async fn delete(&self, collection: &str, key: &str) -> Result<()>;

    async fn ping(&self) -> Result<()>;
}

pub async fn load<T: DeserializeOwned>(
    store: &dyn DocumentStore,
    collection: &str,
    key: &str,
) -> Result<Option<T>> {
    match store.get(collection, key).await? {
        Some(document) => Ok(Some(bson::from_document(document)?)),
        None => Ok(None),
    }
}

pub async fn save<T: Serialize>(
    store: &dyn DocumentStore,
    collection: &str,
    key: &str,
    value: &T,
) -> Result<()> {
    let document = bson::to_document(value)?;
    store.set(collection, key, document).await
}
