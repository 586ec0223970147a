//! Role Repository

use super::{BaseRepository, RepoError, RepoResult, parse_record_id};
use crate::auth::permissions::{PermissionMatrix, default_matrix};
use crate::db::models::{Role, RoleCreate, RoleUpdate};
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

const TABLE: &str = "role";

#[derive(Clone)]
pub struct RoleRepository {
    base: BaseRepository,
}

impl RoleRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find all active roles ordered by name
    pub async fn find_all(&self) -> RepoResult<Vec<Role>> {
        let roles: Vec<Role> = self
            .base
            .db()
            .query("SELECT * FROM role WHERE is_active = true ORDER BY name")
            .await?
            .take(0)?;
        Ok(roles)
    }

    /// Find all roles including inactive
    pub async fn find_all_with_inactive(&self) -> RepoResult<Vec<Role>> {
        let roles: Vec<Role> = self
            .base
            .db()
            .query("SELECT * FROM role ORDER BY name")
            .await?
            .take(0)?;
        Ok(roles)
    }

    /// Find role by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Role>> {
        let thing = parse_record_id(id)?;
        let role: Option<Role> = self.base.db().select(thing).await?;
        Ok(role)
    }

    /// Find role by name
    pub async fn find_by_name(&self, name: &str) -> RepoResult<Option<Role>> {
        let name_owned = name.to_string();
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM role WHERE name = $name LIMIT 1")
            .bind(("name", name_owned))
            .await?;
        let roles: Vec<Role> = result.take(0)?;
        Ok(roles.into_iter().next())
    }

    /// Create a new role
    pub async fn create(&self, data: RoleCreate) -> RepoResult<Role> {
        if self.find_by_name(&data.name).await?.is_some() {
            return Err(RepoError::Duplicate(format!(
                "Role '{}' already exists",
                data.name
            )));
        }

        let display_name = data.display_name.unwrap_or_else(|| data.name.clone());
        let role = Role::new(data.name, display_name, data.permissions);

        let created: Option<Role> = self.base.db().create(TABLE).content(role).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create role".to_string()))
    }

    /// Create a seeded role if it does not exist yet (bootstrap path)
    ///
    /// Idempotent: an existing role with the same name is returned untouched.
    pub async fn ensure_seeded(
        &self,
        name: &str,
        display_name: &str,
        is_system: bool,
    ) -> RepoResult<Role> {
        if let Some(existing) = self.find_by_name(name).await? {
            return Ok(existing);
        }

        let role = Role {
            id: None,
            name: name.to_string(),
            display_name: display_name.to_string(),
            permissions: default_matrix(name),
            is_system,
            is_active: true,
        };

        let created: Option<Role> = self.base.db().create(TABLE).content(role).await?;
        created.ok_or_else(|| RepoError::Database(format!("Failed to seed role '{}'", name)))
    }

    /// Update a role
    ///
    /// System roles (super-admin) are rejected here; weakening them takes a
    /// direct database operation, not an API call.
    pub async fn update(&self, id: &str, data: RoleUpdate) -> RepoResult<Role> {
        let existing = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Role {} not found", id)))?;

        if existing.is_system {
            return Err(RepoError::Validation(
                "Cannot modify system role".to_string(),
            ));
        }

        let thing = parse_record_id(id)?;
        self.base
            .db()
            .query("UPDATE $thing MERGE $data")
            .bind(("thing", thing))
            .bind(("data", data))
            .await?;

        self.find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Role {} not found", id)))
    }

    /// Count non-deleted users still holding this role
    pub async fn count_users(&self, id: &str) -> RepoResult<i64> {
        let thing = parse_record_id(id)?;
        let mut result = self
            .base
            .db()
            .query(
                "SELECT count() FROM user WHERE roles CONTAINS $role AND is_deleted = false GROUP ALL",
            )
            .bind(("role", thing))
            .await?;
        let count: Option<i64> = result.take((0, "count"))?;
        Ok(count.unwrap_or(0))
    }

    /// Delete a role
    ///
    /// Rejected for system roles and for roles still referenced by users.
    pub async fn delete(&self, id: &str) -> RepoResult<bool> {
        let existing = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Role {} not found", id)))?;

        if existing.is_system {
            return Err(RepoError::Validation(
                "Cannot delete system role".to_string(),
            ));
        }

        if self.count_users(id).await? > 0 {
            return Err(RepoError::Validation(
                "Role is still assigned to users".to_string(),
            ));
        }

        let thing = parse_record_id(id)?;
        self.base
            .db()
            .query("DELETE $thing")
            .bind(("thing", thing))
            .await?;
        Ok(true)
    }

    /// Load the name -> matrix pairs of all active roles (permission store)
    pub async fn load_permission_matrices(&self) -> RepoResult<Vec<(String, PermissionMatrix)>> {
        let roles = self.find_all().await?;
        Ok(roles
            .into_iter()
            .map(|role| (role.name, role.permissions))
            .collect())
    }
}
