// In-memory document store for tests. Same semantics as `MongoStore`.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use mongodb::bson::Document;
use tokio::sync::RwLock;

use crate::database::store::DocumentStore;
use crate::errors::{AppError, Result};

type Collections = HashMap<String, HashMap<String, Document>>;

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    collections: Arc<RwLock<Collections>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self, collection: &str) -> usize {
        self.collections
            .read()
            .await
            .get(collection)
            .map(|documents| documents.len())
            .unwrap_or(0)
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn get(&self, collection: &str, key: &str) -> Result<Option<Document>> {
        Ok(self
            .collections
            .read()
            .await
            .get(collection)
            .and_then(|documents| documents.get(key))
            .cloned())
    }

    async fn set(&self, collection: &str, key: &str, document: Document) -> Result<()> {
        self.collections
            .write()
            .await
            .entry(collection.to_string())
            .or_default()
            .insert(key.to_string(), document);
        Ok(())
    }

    async fn update(&self, collection: &str, key: &str, fields: Document) -> Result<()> {
        let mut collections = self.collections.write().await;
        let document = collections
            .get_mut(collection)
            .and_then(|documents| documents.get_mut(key))
            .ok_or_else(|| AppError::DocumentNotFound(format!("{}/{}", collection, key)))?;

        for (field, value) in fields {
            document.insert(field, value);
        }
        Ok(())
    }

    async fn delete(&self, collection: &str, key: &str) -> Result<()> {
        if let Some(documents) = self.collections.write().await.get_mut(collection) {
            documents.remove(key);
        }
        Ok(())
    }

    async fn ping(&self) -> Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson::doc;

    #[tokio::test]
    async fn set_replaces_the_whole_document() {
        let store = MemoryStore::new();
        store.set("otps", "a@b.c", doc! { "code": "1", "extra": true }).await.unwrap();
        store.set("otps", "a@b.c", doc! { "code": "2" }).await.unwrap();

        let document = store.get("otps", "a@b.c").await.unwrap().unwrap();
        assert_eq!(document, doc! { "code": "2" });
        assert_eq!(store.len("otps").await, 1);
    }

    #[tokio::test]
    async fn update_merges_and_requires_an_existing_document() {
        let store = MemoryStore::new();
        let missing = store.update("otps", "a@b.c", doc! { "verified": true }).await;
        assert!(matches!(missing, Err(AppError::DocumentNotFound(_))));

        store
            .set("otps", "a@b.c", doc! { "code": "1", "verified": false })
            .await
            .unwrap();
        store.update("otps", "a@b.c", doc! { "verified": true }).await.unwrap();

        let document = store.get("otps", "a@b.c").await.unwrap().unwrap();
        assert_eq!(document.get_str("code").unwrap(), "1");
        assert_eq!(document.get_bool("verified").unwrap(), true);
    }

    #[tokio::test]
    async fn delete_is_idempotent() {
        let store = MemoryStore::new();
        store.delete("otps", "nobody@b.c").await.unwrap();
        store.set("otps", "a@b.c", doc! { "code": "1" }).await.unwrap();
        store.delete("otps", "a@b.c").await.unwrap();
        assert!(store.get("otps", "a@b.c").await.unwrap().is_none());
    }
}
