//! Category API Handlers

use axum::{
    Json,
    extract::{Path, State},
};

use crate::core::ServerState;
use crate::db::models::{Category, CategoryCreate, CategoryUpdate, FoodItem};
use crate::db::repository::{CategoryRepository, FoodItemRepository};
use shared::{AppError, AppResult};

/// GET /api/categories - 获取所有分类
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<Category>>> {
    let repo = CategoryRepository::new(state.get_db());
    let categories = repo.find_all().await?;
    Ok(Json(categories))
}

/// GET /api/categories/{id} - 获取单个分类
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<Category>> {
    let repo = CategoryRepository::new(state.get_db());
    let category = repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Category {}", id)))?;
    Ok(Json(category))
}

/// GET /api/categories/{id}/items - 分类下的单品
pub async fn list_items(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<Vec<FoodItem>>> {
    let repo = FoodItemRepository::new(state.get_db());
    let items = repo.find_by_category(&id).await?;
    Ok(Json(items))
}

/// POST /api/categories - 创建分类
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<CategoryCreate>,
) -> AppResult<Json<Category>> {
    if payload.name.trim().is_empty() {
        return Err(AppError::validation("Category name must not be empty"));
    }

    let repo = CategoryRepository::new(state.get_db());
    let category = repo.create(payload).await?;
    Ok(Json(category))
}

/// PUT /api/categories/{id} - 更新分类
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<CategoryUpdate>,
) -> AppResult<Json<Category>> {
    let repo = CategoryRepository::new(state.get_db());
    let category = repo.update(&id, payload).await?;
    Ok(Json(category))
}

/// DELETE /api/categories/{id} - 删除分类
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<bool>> {
    let repo = CategoryRepository::new(state.get_db());
    let result = repo.delete(&id).await?;
    Ok(Json(result))
}
