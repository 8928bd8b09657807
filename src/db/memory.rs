use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use tokio::sync::RwLock;

use crate::db::models::{Account, NewAccount};
use crate::db::CredentialStore;
use crate::error::DatabaseError;

#[derive(Debug, Default)]
struct Accounts {
    by_username: HashMap<String, Account>,
    last_id: i64,
}

/// Process-local credential store. Uniqueness is checked under the write lock.
#[derive(Debug, Default)]
pub struct InMemoryCredentialStore {
    accounts: RwLock<Accounts>,
}

impl InMemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.accounts.read().await.by_username.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl CredentialStore for InMemoryCredentialStore {
    async fn create_user(&self, account: &NewAccount) -> Result<i64, DatabaseError> {
        let mut accounts = self.accounts.write().await;

        if accounts.by_username.contains_key(&account.username) {
            return Err(DatabaseError::Duplicate);
        }

        accounts.last_id += 1;
        let id = accounts.last_id;
        accounts.by_username.insert(
            account.username.clone(),
            Account {
                id,
                username: account.username.clone(),
                email: account.email.clone(),
                password_hash: account.password_hash.clone(),
                created_at: Utc::now(),
            },
        );

        Ok(id)
    }

    async fn find_by_username(&self, username: &str) -> Result<Account, DatabaseError> {
        self.accounts
            .read()
            .await
            .by_username
            .get(username)
            .cloned()
            .ok_or(DatabaseError::NotFound)
    }
}
