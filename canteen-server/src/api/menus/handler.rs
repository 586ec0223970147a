//! Menu API Handlers

use axum::{
    Json,
    extract::{Path, State},
};

use crate::core::ServerState;
use crate::db::models::{Menu, MenuCreate, MenuUpdate};
use crate::db::repository::MenuRepository;
use shared::{AppError, AppResult};

/// GET /api/menus - 获取所有菜单
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<Menu>>> {
    let repo = MenuRepository::new(state.get_db());
    let menus = repo.find_all().await?;
    Ok(Json(menus))
}

/// GET /api/menus/{id} - 获取单个菜单
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<Menu>> {
    let repo = MenuRepository::new(state.get_db());
    let menu = repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Menu {}", id)))?;
    Ok(Json(menu))
}

/// POST /api/menus - 创建菜单
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<MenuCreate>,
) -> AppResult<Json<Menu>> {
    if payload.name.trim().is_empty() {
        return Err(AppError::validation("Menu name must not be empty"));
    }

    let repo = MenuRepository::new(state.get_db());
    let menu = repo.create(payload).await?;
    Ok(Json(menu))
}

/// PUT /api/menus/{id} - 更新菜单
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<MenuUpdate>,
) -> AppResult<Json<Menu>> {
    let repo = MenuRepository::new(state.get_db());
    let menu = repo.update(&id, payload).await?;
    Ok(Json(menu))
}

/// DELETE /api/menus/{id} - 删除菜单
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<bool>> {
    let repo = MenuRepository::new(state.get_db());
    let result = repo.delete(&id).await?;
    Ok(Json(result))
}
