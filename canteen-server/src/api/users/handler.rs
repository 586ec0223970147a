//! User API Handlers

use axum::Json;
use axum::extract::{Extension, Path, State};

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::{User, UserCreate, UserUpdate};
use crate::db::repository::UserRepository;
use shared::util::now_millis;
use shared::{AppError, AppResult};

/// GET /api/users - 获取所有用户
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<User>>> {
    let repo = UserRepository::new(state.get_db());
    let users = repo.find_all().await?;
    Ok(Json(users))
}

/// GET /api/users/{id} - 获取单个用户
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<User>> {
    let repo = UserRepository::new(state.get_db());
    let user = repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("User {}", id)))?;
    Ok(Json(user))
}

/// POST /api/users - 创建用户
pub async fn create(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Json(payload): Json<UserCreate>,
) -> AppResult<Json<User>> {
    if payload.username.trim().is_empty() {
        return Err(AppError::validation("Username must not be empty"));
    }
    if payload.password.len() < 8 {
        return Err(AppError::validation(
            "Password must be at least 8 characters",
        ));
    }

    tracing::info!(
        user_id = %current_user.id,
        username = %current_user.username,
        new_username = %payload.username,
        "Creating user"
    );

    let repo = UserRepository::new(state.get_db());
    let user = repo.create(payload).await?;
    Ok(Json(user))
}

/// PUT /api/users/{id} - 更新用户
pub async fn update(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<String>,
    Json(payload): Json<UserUpdate>,
) -> AppResult<Json<User>> {
    if let Some(ref password) = payload.password
        && password.len() < 8
    {
        return Err(AppError::validation(
            "Password must be at least 8 characters",
        ));
    }

    tracing::info!(
        user_id = %current_user.id,
        username = %current_user.username,
        target = %id,
        "Updating user"
    );

    let repo = UserRepository::new(state.get_db());
    let user = repo.update(&id, payload).await?;
    Ok(Json(user))
}

/// DELETE /api/users/{id} - 软删除用户
///
/// 存在待处理订单或待支付记录时拒绝删除
pub async fn delete(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> AppResult<Json<bool>> {
    tracing::info!(
        user_id = %current_user.id,
        username = %current_user.username,
        target = %id,
        "Soft-deleting user"
    );

    let repo = UserRepository::new(state.get_db());
    let result = repo.soft_delete(&id, now_millis()).await?;
    Ok(Json(result))
}
