// Fakes for the service collaborators.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use mongodb::bson::Document;
use tokio::sync::{Mutex, RwLock};

use crate::database::memory_store::MemoryStore;
use crate::database::store::DocumentStore;
use crate::errors::{AppError, Result};
use crate::models::user::Account;
use crate::services::account_directory::AccountDirectory;
use crate::services::mail_service::{MailMessage, MailSender};

#[derive(Debug, Clone, Default)]
pub struct RecordingMailer {
    sent: Arc<Mutex<Vec<MailMessage>>>,
}

impl RecordingMailer {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn sent(&self) -> Vec<MailMessage> {
        self.sent.lock().await.clone()
    }
}

#[async_trait]
impl MailSender for RecordingMailer {
    async fn send(&self, message: &MailMessage) -> Result<()> {
        self.sent.lock().await.push(message.clone());
        Ok(())
    }
}

pub struct FailingMailer;

#[async_trait]
impl MailSender for FailingMailer {
    async fn send(&self, _message: &MailMessage) -> Result<()> {
        Err(AppError::mail("connection refused"))
    }
}

/// Accounts keyed by email, holding plaintext passwords.
#[derive(Debug, Clone, Default)]
pub struct MemoryDirectory {
    passwords: Arc<RwLock<HashMap<String, String>>>,
}

impl MemoryDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn with_account(self, email: &str, password: &str) -> Self {
        self.passwords
            .write()
            .await
            .insert(email.to_string(), password.to_string());
        self
    }

    pub async fn password_of(&self, email: &str) -> Option<String> {
        self.passwords.read().await.get(email).cloned()
    }
}

#[async_trait]
impl AccountDirectory for MemoryDirectory {
    async fn find_by_email(&self, email: &str) -> Result<Account> {
        if self.passwords.read().await.contains_key(email) {
            Ok(Account {
                id: format!("uid-{}", email),
                email: email.to_string(),
            })
        } else {
            Err(AppError::AccountNotFound)
        }
    }

    async fn update_password(&self, account: &Account, new_password: &str) -> Result<()> {
        let mut passwords = self.passwords.write().await;
        match passwords.get_mut(&account.email) {
            Some(password) => {
                *password = new_password.to_string();
                Ok(())
            }
            None => Err(AppError::AccountNotFound),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreOp {
    Get,
    Set,
    Update,
    Delete,
}

/// Memory store that errors on one kind of operation.
#[derive(Debug, Clone)]
pub struct FailingStore {
    inner: MemoryStore,
    fail_on: StoreOp,
}

impl FailingStore {
    pub fn new(inner: MemoryStore, fail_on: StoreOp) -> Self {
        Self { inner, fail_on }
    }

    fn check(&self, op: StoreOp) -> Result<()> {
        if op == self.fail_on {
            return Err(AppError::internal(format!("store unavailable during {:?}", op)));
        }
        Ok(())
    }
}

#[async_trait]
impl DocumentStore for FailingStore {
    async fn get(&self, collection: &str, key: &str) -> Result<Option<Document>> {
        self.check(StoreOp::Get)?;
        self.inner.get(collection, key).await
    }

    async fn set(&self, collection: &str, key: &str, document: Document) -> Result<()> {
        self.check(StoreOp::Set)?;
        self.inner.set(collection, key, document).await
    }

    async fn update(&self, collection: &str, key: &str, fields: Document) -> Result<()> {
        self.check(StoreOp::Update)?;
        self.inner.update(collection, key, fields).await
    }

    async fn delete(&self, collection: &str, key: &str) -> Result<()> {
        self.check(StoreOp::Delete)?;
        self.inner.delete(collection, key).await
    }

    async fn ping(&self) -> Result<()> {
        self.inner.ping().await
    }
}
