// src/services/users.rs
//! User record persistence keyed by email

use sqlx::SqlitePool;
use thiserror::Error;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::auth::models::{GoogleLoginPayload, User};
use crate::common::safe_email_log;
use crate::services::encryption::{EncryptionError, KeyCipher};

#[derive(Debug, Error)]
pub enum UserStoreError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Encryption error: {0}")]
    Encryption(#[from] EncryptionError),
}

#[derive(Debug)]
pub struct UserService {
    db: SqlitePool,
    cipher: Option<KeyCipher>,
}

impl UserService {
    pub fn new(db: SqlitePool, cipher: Option<KeyCipher>) -> Self {
        Self { db, cipher }
    }

    /// Exact-match lookup by email
    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>, UserStoreError> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = ?")
            .bind(email)
            .fetch_optional(&self.db)
            .await?;

        Ok(user.map(|u| self.reveal(u)))
    }

    /// Resolve the user for a Google identity, creating it on first sign-in.
    ///
    /// Returns the record and whether this call created it. Concurrent first
    /// logins for one email still produce a single row.
    pub async fn find_or_create(
        &self,
        profile: &GoogleLoginPayload,
    ) -> Result<(User, bool), UserStoreError> {
        let id = Uuid::new_v4().to_string();
        let inserted = sqlx::query(
            "INSERT OR IGNORE INTO users (id, email, name, picture) VALUES (?, ?, ?, ?)",
        )
        .bind(&id)
        .bind(&profile.email)
        .bind(profile.name.as_deref())
        .bind(profile.picture.as_deref())
        .execute(&self.db)
        .await?
        .rows_affected()
            == 1;

        if inserted {
            info!(
                user_id = %id,
                email = %safe_email_log(&profile.email),
                "Created user on first Google sign-in"
            );
        } else {
            debug!(
                email = %safe_email_log(&profile.email),
                "Google sign-in matched existing user"
            );
        }

        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = ?")
            .bind(&profile.email)
            .fetch_one(&self.db)
            .await?;

        Ok((self.reveal(user), inserted))
    }

    /// Store a provider API key on the user's record (last write wins)
    pub async fn update_api_key(&self, email: &str, api_key: &str) -> Result<(), UserStoreError> {
        let stored = match &self.cipher {
            Some(cipher) => cipher.seal(api_key)?,
            None => api_key.to_string(),
        };

        let result = sqlx::query("UPDATE users SET open_ai_api_key = ? WHERE email = ?")
            .bind(&stored)
            .bind(email)
            .execute(&self.db)
            .await?;

        debug!(
            email = %safe_email_log(email),
            rows = result.rows_affected(),
            sealed = self.cipher.is_some(),
            "Updated provider API key"
        );

        Ok(())
    }

    /// Replace a sealed key column with the usable key.
    ///
    /// A key this process cannot open (master key unset or rotated) is
    /// dropped, so the account still resolves and the next save replaces it.
    fn reveal(&self, mut user: User) -> User {
        let Some(stored) = user.open_ai_api_key.take() else {
            return user;
        };

        if !KeyCipher::is_sealed(&stored) {
            user.open_ai_api_key = Some(stored);
            return user;
        }

        let opened = self
            .cipher
            .as_ref()
            .ok_or(EncryptionError::KeyNotConfigured)
            .and_then(|cipher| cipher.open(&stored));

        match opened {
            Ok(key) => user.open_ai_api_key = Some(key),
            Err(e) => warn!(
                error = %e,
                user_id = %user.id,
                email = %safe_email_log(&user.email),
                "Stored provider API key cannot be opened, treating it as unset"
            ),
        }
        user
    }
}
