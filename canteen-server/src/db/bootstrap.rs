//! Bootstrap Seeding
//!
//! Idempotent startup routine: creates the fixed role set and the initial
//! super-admin user if they do not exist yet. Guarded by existence checks so
//! it can run on every startup.

use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use crate::auth::permissions::{SEEDED_ROLES, SUPER_ADMIN};
use crate::db::models::User;
use crate::db::repository::{RepoResult, RoleRepository, UserRepository};

/// Username of the seeded super-admin account
const ADMIN_USERNAME: &str = "admin";

/// Seed roles and the initial admin user
pub async fn seed(db: &Surreal<Db>) -> RepoResult<()> {
    seed_roles(db).await?;
    seed_admin_user(db).await?;
    Ok(())
}

/// Create any missing seeded role
async fn seed_roles(db: &Surreal<Db>) -> RepoResult<()> {
    let roles = RoleRepository::new(db.clone());

    for name in SEEDED_ROLES {
        let display_name = display_name_for(name);
        let is_system = *name == SUPER_ADMIN;
        let existed = roles.find_by_name(name).await?.is_some();
        roles.ensure_seeded(name, &display_name, is_system).await?;
        if !existed {
            tracing::info!(role = %name, "Seeded role");
        }
    }

    Ok(())
}

/// Create the initial super-admin user if no admin exists yet
///
/// The initial password comes from `ADMIN_INITIAL_PASSWORD`, falling back to
/// a development default that must be rotated before production use.
async fn seed_admin_user(db: &Surreal<Db>) -> RepoResult<()> {
    let users = UserRepository::new(db.clone());
    let roles = RoleRepository::new(db.clone());

    if users.find_by_username(ADMIN_USERNAME).await?.is_some() {
        return Ok(());
    }

    let super_admin_role = roles
        .find_by_name(SUPER_ADMIN)
        .await?
        .ok_or_else(|| {
            crate::db::repository::RepoError::Database(
                "super-admin role missing after seeding".to_string(),
            )
        })?;
    let role_id = super_admin_role.id.ok_or_else(|| {
        crate::db::repository::RepoError::Database("super-admin role has no id".to_string())
    })?;

    let password = std::env::var("ADMIN_INITIAL_PASSWORD")
        .unwrap_or_else(|_| "admin-change-me".to_string());
    let hash_pass = User::hash_password(&password).map_err(|e| {
        crate::db::repository::RepoError::Database(format!("Failed to hash admin password: {}", e))
    })?;

    users
        .create_raw(
            ADMIN_USERNAME,
            "Administrator",
            None,
            &hash_pass,
            vec![role_id],
            true,
        )
        .await?;

    tracing::info!(username = %ADMIN_USERNAME, "Seeded initial super-admin user");
    Ok(())
}

/// "order-manager" -> "Order Manager"
fn display_name_for(name: &str) -> String {
    name.split('-')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_name_for() {
        assert_eq!(display_name_for("super-admin"), "Super Admin");
        assert_eq!(display_name_for("customer"), "Customer");
        assert_eq!(display_name_for("order-manager"), "Order Manager");
    }
}
