use async_trait::async_trait;
use bcrypt::{hash, DEFAULT_COST};
use mongodb::{
    bson::{doc, oid::ObjectId, DateTime, Document},
    Collection, Database,
};

use crate::errors::{AppError, Result};
use crate::models::user::{Account, UserRecord, USERS};

#[async_trait]
pub trait AccountDirectory: Send + Sync {
    /// Fails with `AccountNotFound` when no account uses this email.
    async fn find_by_email(&self, email: &str) -> Result<Account>;

    async fn update_password(&self, account: &Account, new_password: &str) -> Result<()>;
}

/// Accounts stored in the `users` collection with bcrypt password hashes.
#[derive(Clone)]
pub struct MongoAccountDirectory {
    db: Database,
}

impl MongoAccountDirectory {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    fn users(&self) -> Collection<UserRecord> {
        self.db.collection(USERS)
    }
}

#[async_trait]
impl AccountDirectory for MongoAccountDirectory {
    async fn find_by_email(&self, email: &str) -> Result<Account> {
        self.users()
            .find_one(doc! { "email": email })
            .await?
            .map(Account::from)
            .ok_or(AppError::AccountNotFound)
    }

    async fn update_password(&self, account: &Account, new_password: &str) -> Result<()> {
        let user_id = account_object_id(account)?;
        let password_hash = hash_password(new_password).await?;

        let result = self
            .users()
            .update_one(doc! { "_id": user_id }, password_update(&password_hash))
            .await?;
        if result.matched_count == 0 {
            return Err(AppError::AccountNotFound);
        }
        Ok(())
    }
}

fn account_object_id(account: &Account) -> Result<ObjectId> {
    ObjectId::parse_str(&account.id)
        .map_err(|e| AppError::internal(format!("Invalid account id: {}", e)))
}

// bcrypt is CPU bound; keep it off the async workers.
async fn hash_password(password: &str) -> Result<String> {
    let password = password.to_string();
    tokio::task::spawn_blocking(move || hash(password, DEFAULT_COST))
        .await
        .map_err(|e| AppError::internal(format!("Password hashing task failed: {}", e)))?
        .map_err(AppError::from)
}

fn password_update(password_hash: &str) -> Document {
    doc! {
        "$set": {
            "password_hash": password_hash,
            "updated_at": DateTime::now(),
        }
    }
}
