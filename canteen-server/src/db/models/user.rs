//! User Model

use super::RoleId;
use super::serde_helpers;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

/// User ID type
pub type UserId = RecordId;

/// User model matching the user table
///
/// Users are soft-deleted only: once a user has financial history the row is
/// kept with `is_deleted = true` and a deletion timestamp.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<UserId>,
    pub username: String,
    pub display_name: String,
    #[serde(default)]
    pub email: Option<String>,
    /// Argon2 password hash, never exposed in API responses
    #[serde(skip_serializing)]
    pub hash_pass: String,
    /// Roles held by this user (a user may hold several)
    #[serde(default, with = "serde_helpers::vec_record_id")]
    pub roles: Vec<RoleId>,
    /// Whether the account email has been verified
    #[serde(default, deserialize_with = "serde_helpers::bool_false")]
    pub is_verified: bool,
    /// System users (the bootstrap super-admin) cannot be deleted
    #[serde(default, deserialize_with = "serde_helpers::bool_false")]
    pub is_system: bool,
    #[serde(
        default = "default_true",
        deserialize_with = "serde_helpers::bool_true"
    )]
    pub is_active: bool,
    #[serde(default, deserialize_with = "serde_helpers::bool_false")]
    pub is_deleted: bool,
    /// Unix millis of soft deletion
    #[serde(default)]
    pub deleted_at: Option<i64>,
}

fn default_true() -> bool {
    true
}

impl User {
    /// Verify password using argon2
    pub fn verify_password(&self, password: &str) -> Result<bool, argon2::password_hash::Error> {
        use argon2::{
            Argon2,
            password_hash::{PasswordHash, PasswordVerifier},
        };

        let parsed_hash = PasswordHash::new(&self.hash_pass)?;
        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok())
    }

    /// Hash password using argon2
    pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
        use argon2::{
            Argon2,
            password_hash::{PasswordHasher, SaltString, rand_core::OsRng},
        };

        let salt = SaltString::generate(&mut OsRng);
        let argon2 = Argon2::default();
        let password_hash = argon2.hash_password(password.as_bytes(), &salt)?;
        Ok(password_hash.to_string())
    }
}

/// Create user payload
#[derive(Debug, Clone, Deserialize)]
pub struct UserCreate {
    pub username: String,
    pub password: String,
    pub display_name: Option<String>,
    pub email: Option<String>,
    /// Role ids ("role:xxx") to assign
    #[serde(default)]
    pub roles: Vec<String>,
}

/// Update user payload
#[derive(Debug, Clone, Deserialize)]
pub struct UserUpdate {
    pub display_name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub roles: Option<Vec<String>>,
    pub is_active: Option<bool>,
}
