//! Login and user management.
//! Passwords are stored as base64(SHA-256(password + salt)) with a random
//! 16-byte salt per user, the store's historical convention.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use chrono::Utc;
use rand::RngCore;
use sha2::{Digest, Sha256};
use tracing::info;

use tally_core::entities::User;

use crate::errors::StoreResult;
use crate::gateway::StoreGateway;
use crate::queries;

pub const MIN_PASSWORD_LEN: usize = 6;
const SALT_LEN: usize = 16;

/// An authenticated user. The id scopes every other service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub user_id: i64,
    pub username: String,
}

pub struct LoginService<'g> {
    gateway: &'g StoreGateway,
}

impl<'g> LoginService<'g> {
    pub fn new(gateway: &'g StoreGateway) -> Self {
        Self { gateway }
    }

    /// Create a user. Returns `None` when the input is rejected: blank
    /// username, password shorter than [`MIN_PASSWORD_LEN`], or a username
    /// already taken.
    pub fn create_user(&self, username: &str, password: &str) -> StoreResult<Option<User>> {
        let username = username.trim();
        if username.is_empty() || password.len() < MIN_PASSWORD_LEN {
            return Ok(None);
        }

        let conn = self.gateway.open()?;
        if queries::users::exists(&conn, username)? {
            return Ok(None);
        }

        let salt = generate_salt();
        let hash = hash_password(password, &salt);
        let user = queries::users::insert(&conn, username, &hash, &salt, Utc::now())?;
        info!(username, "user created");
        Ok(Some(user))
    }

    /// Validate credentials against an active user. On success updates the
    /// last-login time and returns a session scoped to the user.
    pub fn validate(&self, username: &str, password: &str) -> StoreResult<Option<Session>> {
        let username = username.trim();
        if username.is_empty() || password.is_empty() {
            return Ok(None);
        }

        let conn = self.gateway.open()?;
        let Some(user) = queries::users::find_by_username(&conn, username)? else {
            return Ok(None);
        };
        if !user.is_active || hash_password(password, &user.salt) != user.password_hash {
            return Ok(None);
        }

        queries::users::touch_last_login(&conn, user.id, Utc::now())?;
        Ok(Some(Session {
            user_id: user.id,
            username: user.username,
        }))
    }

    pub fn user_exists(&self, username: &str) -> StoreResult<bool> {
        let username = username.trim();
        if username.is_empty() {
            return Ok(false);
        }
        let conn = self.gateway.open()?;
        queries::users::exists(&conn, username)
    }
}

fn generate_salt() -> String {
    let mut bytes = [0u8; SALT_LEN];
    rand::thread_rng().fill_bytes(&mut bytes);
    BASE64.encode(bytes)
}

fn hash_password(password: &str, salt: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(password.as_bytes());
    hasher.update(salt.as_bytes());
    BASE64.encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_depends_on_salt() {
        let a = hash_password("secret1", "saltA");
        let b = hash_password("secret1", "saltB");
        assert_ne!(a, b);
        assert_eq!(a, hash_password("secret1", "saltA"));
    }

    #[test]
    fn salts_are_unique() {
        assert_ne!(generate_salt(), generate_salt());
    }
}
