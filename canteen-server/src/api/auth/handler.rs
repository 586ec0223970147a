//! Authentication Handlers
//!
//! Handles login and current-user lookup

use std::time::Duration;

use axum::{Extension, Json, extract::State};
use serde::{Deserialize, Serialize};

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::Role;
use crate::db::repository::{RoleRepository, UserRepository};
use crate::security_log;
use shared::AppError;

/// Fixed delay for authentication to prevent timing attacks
const AUTH_FIXED_DELAY_MS: u64 = 500;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct UserInfo {
    pub id: String,
    pub username: String,
    pub display_name: String,
    pub roles: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: UserInfo,
}

/// POST /api/auth/login - 登录 (公开)
///
/// Authenticates user credentials and returns a JWT token
pub async fn login(
    State(state): State<ServerState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let users = UserRepository::new(state.get_db());
    let user = users.find_by_username(&req.username).await?;

    // Fixed delay to prevent timing attacks (before checking result)
    tokio::time::sleep(Duration::from_millis(AUTH_FIXED_DELAY_MS)).await;

    // Unified error message to prevent username enumeration
    let user = match user {
        Some(u) => {
            if !u.is_active {
                return Err(AppError::forbidden("Account has been disabled"));
            }

            let password_valid = u
                .verify_password(&req.password)
                .map_err(|e| AppError::internal(format!("Password verification failed: {}", e)))?;

            if !password_valid {
                security_log!(
                    "WARN",
                    "login_failed",
                    username = req.username.clone(),
                    reason = "invalid_credentials"
                );
                return Err(AppError::invalid_credentials());
            }

            u
        }
        None => {
            security_log!(
                "WARN",
                "login_failed",
                username = req.username.clone(),
                reason = "user_not_found"
            );
            return Err(AppError::invalid_credentials());
        }
    };

    // Resolve role names for the JWT claims
    let roles_repo = RoleRepository::new(state.get_db());
    let mut role_names = Vec::with_capacity(user.roles.len());
    for role_id in &user.roles {
        let role: Option<Role> = roles_repo.find_by_id(&role_id.to_string()).await?;
        let role =
            role.ok_or_else(|| AppError::internal(format!("Role {} not found", role_id)))?;
        if role.is_active {
            role_names.push(role.name);
        }
    }

    if role_names.is_empty() {
        return Err(AppError::forbidden("No active role assigned"));
    }

    let user_id = user.id.as_ref().map(|t| t.to_string()).unwrap_or_default();

    let token = state
        .get_jwt_service()
        .generate_token(&user_id, &user.username, &role_names)
        .map_err(|e| AppError::internal(format!("Failed to generate token: {}", e)))?;

    security_log!(
        "INFO",
        "login_success",
        user_id = user_id.clone(),
        username = user.username.clone()
    );

    Ok(Json(LoginResponse {
        token,
        user: UserInfo {
            id: user_id,
            username: user.username,
            display_name: user.display_name,
            roles: role_names,
        },
    }))
}

/// GET /api/auth/me - 当前用户信息
pub async fn me(
    Extension(current_user): Extension<CurrentUser>,
) -> Result<Json<UserInfo>, AppError> {
    Ok(Json(UserInfo {
        id: current_user.id.clone(),
        username: current_user.username.clone(),
        display_name: current_user.username,
        roles: current_user.roles,
    }))
}
