//! Role API Handlers

use axum::Json;
use axum::extract::{Extension, Path, Query, State};
use serde::{Deserialize, Serialize};

use crate::auth::CurrentUser;
use crate::auth::permissions::{ACTIONS, PermissionMatrix, RESOURCES, WILDCARD};
use crate::core::ServerState;
use crate::db::models::{Role, RoleCreate, RoleUpdate};
use crate::db::repository::RoleRepository;
use shared::{AppError, AppResult};

/// 权限天花板校验：操作者只能授予自己拥有的权限条目
fn validate_permission_ceiling(
    state: &ServerState,
    current_user: &CurrentUser,
    matrix: &PermissionMatrix,
) -> AppResult<()> {
    matrix.validate()?;

    for (res, act) in matrix.granted_pairs() {
        if !state.permissions().any_allows(&current_user.roles, res, act) {
            return Err(AppError::forbidden(format!(
                "Cannot grant '{}:{}': you do not have it yourself",
                res, act
            )));
        }
    }
    Ok(())
}

/// Query filter for role listing
#[derive(Debug, Deserialize)]
pub struct RoleQuery {
    /// If true, return all roles (including inactive)
    all: Option<bool>,
}

/// GET /api/roles - Get all roles
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<RoleQuery>,
) -> AppResult<Json<Vec<Role>>> {
    let repo = RoleRepository::new(state.get_db());
    let roles = if query.all.unwrap_or(false) {
        repo.find_all_with_inactive().await?
    } else {
        repo.find_all().await?
    };
    Ok(Json(roles))
}

/// GET /api/roles/{id} - Get role by ID
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<Role>> {
    let repo = RoleRepository::new(state.get_db());
    let role = repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Role {}", id)))?;
    Ok(Json(role))
}

/// POST /api/roles - Create a new role
pub async fn create(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Json(payload): Json<RoleCreate>,
) -> AppResult<Json<Role>> {
    tracing::info!(
        user_id = %current_user.id,
        username = %current_user.username,
        role_name = %payload.name,
        "Creating role"
    );

    // 权限天花板校验
    validate_permission_ceiling(&state, &current_user, &payload.permissions)?;

    let repo = RoleRepository::new(state.get_db());
    let role = repo.create(payload).await?;

    state
        .permissions()
        .upsert_role(role.name.clone(), role.permissions.clone());

    Ok(Json(role))
}

/// PUT /api/roles/{id} - Update a role
pub async fn update(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<String>,
    Json(payload): Json<RoleUpdate>,
) -> AppResult<Json<Role>> {
    tracing::info!(
        user_id = %current_user.id,
        username = %current_user.username,
        role_id = %id,
        "Updating role"
    );

    // 权限天花板校验（仅当 payload 包含 permissions 时）
    if let Some(ref matrix) = payload.permissions {
        validate_permission_ceiling(&state, &current_user, matrix)?;
    }

    let repo = RoleRepository::new(state.get_db());
    let role = repo.update(&id, payload).await?;

    // Deactivated roles must stop granting immediately
    if role.is_active {
        state
            .permissions()
            .upsert_role(role.name.clone(), role.permissions.clone());
    } else {
        state.permissions().remove_role(&role.name);
    }

    Ok(Json(role))
}

/// DELETE /api/roles/{id} - Delete a role
pub async fn delete(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> AppResult<Json<bool>> {
    tracing::info!(
        user_id = %current_user.id,
        username = %current_user.username,
        role_id = %id,
        "Deleting role"
    );

    let repo = RoleRepository::new(state.get_db());
    let name = repo.find_by_id(&id).await?.map(|r| r.name);
    let result = repo.delete(&id).await?;

    if let Some(name) = name {
        state.permissions().remove_role(&name);
    }

    Ok(Json(result))
}

/// Registry of resource/action names usable in permission matrices
#[derive(Debug, Serialize)]
pub struct PermissionRegistry {
    pub resources: Vec<String>,
    pub actions: Vec<String>,
    pub wildcard: String,
}

/// GET /api/permissions - Get the permission name registry
pub async fn registry() -> AppResult<Json<PermissionRegistry>> {
    Ok(Json(PermissionRegistry {
        resources: RESOURCES.iter().map(|s| s.to_string()).collect(),
        actions: ACTIONS.iter().map(|s| s.to_string()).collect(),
        wildcard: WILDCARD.to_string(),
    }))
}

/// GET /api/roles/{id}/permissions - Get role permission matrix
pub async fn get_role_permissions(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<PermissionMatrix>> {
    let repo = RoleRepository::new(state.get_db());
    let role = repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Role {}", id)))?;
    Ok(Json(role.permissions))
}

/// PUT /api/roles/{id}/permissions - Replace role permission matrix
pub async fn update_role_permissions(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<String>,
    Json(matrix): Json<PermissionMatrix>,
) -> AppResult<Json<Role>> {
    tracing::info!(
        user_id = %current_user.id,
        username = %current_user.username,
        role_id = %id,
        "Updating role permissions"
    );

    // 权限天花板校验
    validate_permission_ceiling(&state, &current_user, &matrix)?;

    let update = RoleUpdate {
        display_name: None,
        permissions: Some(matrix),
        is_active: None,
    };

    let repo = RoleRepository::new(state.get_db());
    let role = repo.update(&id, update).await?;

    state
        .permissions()
        .upsert_role(role.name.clone(), role.permissions.clone());

    Ok(Json(role))
}
