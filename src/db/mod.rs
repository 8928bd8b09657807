//! Credential storage for weatherman
//!
//! Accounts are persisted behind the [`CredentialStore`] trait, with a
//! Postgres implementation for deployments and an in-memory one for tests.

pub mod memory;
pub mod models;
pub mod operations;

use async_trait::async_trait;

use crate::error::DatabaseError;

pub use memory::InMemoryCredentialStore;
pub use models::{Account, NewAccount};
pub use operations::PgCredentialStore;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Inserts a new account and returns its id. A taken username yields
    /// `DatabaseError::Duplicate`.
    async fn create_user(&self, account: &NewAccount) -> Result<i64, DatabaseError>;

    /// Looks up an account, `DatabaseError::NotFound` when absent.
    async fn find_by_username(&self, username: &str) -> Result<Account, DatabaseError>;

    /// Releases any held connections. Called once at shutdown.
    async fn close(&self) {}
}
