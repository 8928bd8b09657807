use std::sync::Arc;

use tracing::{error, info, warn};

use crate::auth::password::PasswordHasher;
use crate::auth::token::TokenIssuer;
use crate::db::{CredentialStore, NewAccount};
use crate::error::{AppError, AuthError, DatabaseError};

/// Sign-up and sign-in orchestration over a credential store.
pub struct AuthService {
    store: Arc<dyn CredentialStore>,
    hasher: PasswordHasher,
    issuer: TokenIssuer,
    // Verified when the username is unknown so both failure paths do the same work.
    dummy_hash: String,
}

impl AuthService {
    pub fn new(
        store: Arc<dyn CredentialStore>,
        hasher: PasswordHasher,
        issuer: TokenIssuer,
    ) -> Result<Self, AppError> {
        let dummy_hash = hasher.hash("weatherman-dummy-password")?;

        Ok(Self {
            store,
            hasher,
            issuer,
            dummy_hash,
        })
    }

    pub fn store(&self) -> &Arc<dyn CredentialStore> {
        &self.store
    }

    pub async fn sign_up(&self, username: &str, email: &str, password: &str) -> Result<i64, AppError> {
        let username = username.trim();
        let email = email.trim();
        require("username", username)?;
        require("email", email)?;
        require("password", password)?;

        let password_hash = self.hash_password(password).await?;
        let account = NewAccount::new(username.to_string(), email.to_string(), password_hash);

        match self.store.create_user(&account).await {
            Ok(id) => {
                info!("Created account {} for username: {}", id, username);
                Ok(id)
            }
            Err(DatabaseError::Duplicate) => {
                warn!("Sign-up rejected, username already taken: {}", username);
                Err(AppError::Conflict(format!("Username '{}' is already taken", username)))
            }
            Err(e) => Err(AppError::DatabaseError(e)),
        }
    }

    pub async fn sign_in(&self, username: &str, password: &str) -> Result<String, AppError> {
        let username = username.trim();
        require("username", username)?;
        require("password", password)?;

        let account = match self.store.find_by_username(username).await {
            Ok(account) => Some(account),
            Err(DatabaseError::NotFound) => None,
            Err(e) => return Err(AppError::DatabaseError(e)),
        };

        let stored_hash = account
            .as_ref()
            .map(|a| a.password_hash.clone())
            .unwrap_or_else(|| self.dummy_hash.clone());
        let matches = self.verify_password(password, stored_hash).await?;

        match account {
            Some(account) if matches => {
                info!("Sign-in successful for username: {}", username);
                self.issuer.issue(account.id)
            }
            _ => {
                warn!("Sign-in failed for username: {}", username);
                Err(AppError::AuthError(AuthError::InvalidCredentials))
            }
        }
    }

    // Argon2 is deliberately expensive; keep it off the async workers.
    async fn hash_password(&self, password: &str) -> Result<String, AppError> {
        let hasher = self.hasher.clone();
        let password = password.to_string();
        tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(|e| {
                error!("Password hashing task failed: {}", e);
                AppError::InternalError(e.to_string())
            })?
    }

    async fn verify_password(&self, password: &str, stored_hash: String) -> Result<bool, AppError> {
        let hasher = self.hasher.clone();
        let password = password.to_string();
        tokio::task::spawn_blocking(move || hasher.verify(&password, &stored_hash))
            .await
            .map_err(|e| {
                error!("Password verification task failed: {}", e);
                AppError::InternalError(e.to_string())
            })
    }
}

fn require(field: &str, value: &str) -> Result<(), AppError> {
    if value.is_empty() {
        return Err(AppError::ValidationError(format!("{} is required", field)));
    }
    Ok(())
}
