//! User Repository

use super::{BaseRepository, RepoError, RepoResult, parse_record_id};
use crate::db::models::{User, UserCreate, UserUpdate};
use surrealdb::RecordId;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

#[derive(Clone)]
pub struct UserRepository {
    base: BaseRepository,
}

impl UserRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find all non-deleted users
    pub async fn find_all(&self) -> RepoResult<Vec<User>> {
        let users: Vec<User> = self
            .base
            .db()
            .query("SELECT * FROM user WHERE is_deleted = false ORDER BY username")
            .await?
            .take(0)?;
        Ok(users)
    }

    /// Find user by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<User>> {
        let thing = parse_record_id(id)?;
        let user: Option<User> = self.base.db().select(thing).await?;
        Ok(user)
    }

    /// Find user by username (deleted users excluded)
    pub async fn find_by_username(&self, username: &str) -> RepoResult<Option<User>> {
        let username_owned = username.to_string();
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM user WHERE username = $username AND is_deleted = false LIMIT 1")
            .bind(("username", username_owned))
            .await?;
        let users: Vec<User> = result.take(0)?;
        Ok(users.into_iter().next())
    }

    /// Create a new user
    ///
    /// The password hash is written through a raw query because the model
    /// never serializes it.
    pub async fn create(&self, data: UserCreate) -> RepoResult<User> {
        if self.find_by_username(&data.username).await?.is_some() {
            return Err(RepoError::Duplicate(format!(
                "Username '{}' already exists",
                data.username
            )));
        }

        let hash_pass = User::hash_password(&data.password)
            .map_err(|e| RepoError::Database(format!("Failed to hash password: {}", e)))?;

        let display_name = data.display_name.unwrap_or_else(|| data.username.clone());
        let roles = data
            .roles
            .iter()
            .map(|id| parse_record_id(id))
            .collect::<RepoResult<Vec<RecordId>>>()?;

        self.create_raw(&data.username, &display_name, data.email, &hash_pass, roles, false)
            .await
    }

    /// Low-level insert shared by the API path and the bootstrap seeder
    pub async fn create_raw(
        &self,
        username: &str,
        display_name: &str,
        email: Option<String>,
        hash_pass: &str,
        roles: Vec<RecordId>,
        is_system: bool,
    ) -> RepoResult<User> {
        let mut result = self
            .base
            .db()
            .query(
                r#"
                CREATE user SET
                    username     = $username,
                    display_name = $display_name,
                    email        = $email,
                    hash_pass    = $hash_pass,
                    roles        = $roles,
                    is_verified  = false,
                    is_system    = $is_system,
                    is_active    = true,
                    is_deleted   = false,
                    deleted_at   = NONE
                "#,
            )
            .bind(("username", username.to_string()))
            .bind(("display_name", display_name.to_string()))
            .bind(("email", email))
            .bind(("hash_pass", hash_pass.to_string()))
            .bind(("roles", roles))
            .bind(("is_system", is_system))
            .await?;

        let users: Vec<User> = result.take(0)?;
        users
            .into_iter()
            .next()
            .ok_or_else(|| RepoError::Database("Failed to create user".to_string()))
    }

    /// Update a user
    pub async fn update(&self, id: &str, data: UserUpdate) -> RepoResult<User> {
        let existing = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("User {} not found", id)))?;

        if existing.is_system && data.is_active == Some(false) {
            return Err(RepoError::Validation(
                "Cannot disable system user".to_string(),
            ));
        }

        let hash_pass = match data.password.as_deref() {
            Some(password) => Some(
                User::hash_password(password)
                    .map_err(|e| RepoError::Database(format!("Failed to hash password: {}", e)))?,
            ),
            None => None,
        };

        let roles = match data.roles {
            Some(ids) => Some(
                ids.iter()
                    .map(|id| parse_record_id(id))
                    .collect::<RepoResult<Vec<RecordId>>>()?,
            ),
            None => None,
        };

        #[derive(serde::Serialize)]
        struct UserUpdateDb {
            #[serde(skip_serializing_if = "Option::is_none")]
            display_name: Option<String>,
            #[serde(skip_serializing_if = "Option::is_none")]
            email: Option<String>,
            #[serde(skip_serializing_if = "Option::is_none")]
            hash_pass: Option<String>,
            #[serde(skip_serializing_if = "Option::is_none")]
            roles: Option<Vec<RecordId>>,
            #[serde(skip_serializing_if = "Option::is_none")]
            is_active: Option<bool>,
        }

        let update_data = UserUpdateDb {
            display_name: data.display_name,
            email: data.email,
            hash_pass,
            roles,
            is_active: data.is_active,
        };

        let thing = parse_record_id(id)?;
        self.base
            .db()
            .query("UPDATE $thing MERGE $data")
            .bind(("thing", thing))
            .bind(("data", update_data))
            .await?;

        self.find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("User {} not found", id)))
    }

    /// Count orders of this user still in a pending state
    pub async fn count_pending_orders(&self, id: &RecordId) -> RepoResult<i64> {
        let mut result = self
            .base
            .db()
            .query(
                "SELECT count() FROM order WHERE customer = $user AND status IN ['CREATED', 'PROCESSING'] GROUP ALL",
            )
            .bind(("user", id.clone()))
            .await?;
        let count: Option<i64> = result.take((0, "count"))?;
        Ok(count.unwrap_or(0))
    }

    /// Count pending payments attached to this user's orders
    pub async fn count_pending_payments(&self, id: &RecordId) -> RepoResult<i64> {
        let mut result = self
            .base
            .db()
            .query(
                "SELECT count() FROM payment WHERE status = 'PENDING' AND order_id.customer = $user GROUP ALL",
            )
            .bind(("user", id.clone()))
            .await?;
        let count: Option<i64> = result.take((0, "count"))?;
        Ok(count.unwrap_or(0))
    }

    /// Soft-delete a user
    ///
    /// Users with financial history are never hard-deleted; deletion is
    /// blocked entirely while pending orders or pending payments exist.
    pub async fn soft_delete(&self, id: &str, now_millis: i64) -> RepoResult<bool> {
        let existing = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("User {} not found", id)))?;

        if existing.is_system {
            return Err(RepoError::Validation(
                "Cannot delete system user".to_string(),
            ));
        }

        let thing = existing
            .id
            .clone()
            .ok_or_else(|| RepoError::Database("User record missing id".to_string()))?;

        if self.count_pending_orders(&thing).await? > 0 {
            return Err(RepoError::Validation(
                "User still has pending orders".to_string(),
            ));
        }
        if self.count_pending_payments(&thing).await? > 0 {
            return Err(RepoError::Validation(
                "User still has pending payments".to_string(),
            ));
        }

        self.base
            .db()
            .query(
                "UPDATE $thing SET is_deleted = true, is_active = false, deleted_at = $deleted_at",
            )
            .bind(("thing", thing))
            .bind(("deleted_at", now_millis))
            .await?;

        Ok(true)
    }
}
