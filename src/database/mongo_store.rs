use async_trait::async_trait;
use mongodb::{
    bson::{doc, Document},
    Collection, Database,
};

use crate::database::store::DocumentStore;
use crate::errors::{AppError, Result};

#[derive(Clone)]
pub struct MongoStore {
    db: Database,
}

impl MongoStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    fn collection(&self, name: &str) -> Collection<Document> {
        self.db.collection(name)
    }
}

#[async_trait]
impl DocumentStore for MongoStore {
    async fn get(&self, collection: &str, key: &str) -> Result<Option<Document>> {
        let found = self
            .collection(collection)
            .find_one(doc! { "_id": key })
            .await?;
        Ok(found.map(without_key))
    }

    async fn set(&self, collection: &str, key: &str, document: Document) -> Result<()> {
        self.collection(collection)
            .replace_one(doc! { "_id": key }, with_key(key, document))
            .upsert(true)
            .await?;
        Ok(())
    }

    async fn update(&self, collection: &str, key: &str, fields: Document) -> Result<()> {
        let result = self
            .collection(collection)
            .update_one(doc! { "_id": key }, doc! { "$set": fields })
            .await?;

        require_match(result.matched_count, collection, key)
    }

    async fn delete(&self, collection: &str, key: &str) -> Result<()> {
        self.collection(collection)
            .delete_one(doc! { "_id": key })
            .await?;
        Ok(())
    }

    async fn ping(&self) -> Result<()> {
        self.db.run_command(doc! { "ping": 1 }).await?;
        Ok(())
    }
}

// Stored documents carry the email as `_id`; callers never see it.
fn with_key(key: &str, mut document: Document) -> Document {
    document.insert("_id", key);
    document
}

fn without_key(mut document: Document) -> Document {
    document.remove("_id");
    document
}

fn require_match(matched_count: u64, collection: &str, key: &str) -> Result<()> {
    if matched_count == 0 {
        return Err(AppError::DocumentNotFound(format!("{}/{}", collection, key)));
    }
    Ok(())
}
