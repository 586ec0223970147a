//! Food Item API Handlers

use axum::{
    Json,
    extract::{Path, State},
};
use rust_decimal::Decimal;

use crate::core::ServerState;
use crate::db::models::{FoodItem, FoodItemCreate, FoodItemUpdate};
use crate::db::repository::FoodItemRepository;
use shared::{AppError, AppResult};

/// GET /api/food-items - 获取所有单品
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<FoodItem>>> {
    let repo = FoodItemRepository::new(state.get_db());
    let items = repo.find_all().await?;
    Ok(Json(items))
}

/// GET /api/food-items/{id} - 获取单个单品
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<FoodItem>> {
    let repo = FoodItemRepository::new(state.get_db());
    let item = repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Food item {}", id)))?;
    Ok(Json(item))
}

/// POST /api/food-items - 创建单品
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<FoodItemCreate>,
) -> AppResult<Json<FoodItem>> {
    if payload.name.trim().is_empty() {
        return Err(AppError::validation("Food item name must not be empty"));
    }
    if payload.price < Decimal::ZERO {
        return Err(AppError::validation("Price must not be negative"));
    }

    let repo = FoodItemRepository::new(state.get_db());
    let item = repo.create(payload).await?;
    Ok(Json(item))
}

/// PUT /api/food-items/{id} - 更新单品
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<FoodItemUpdate>,
) -> AppResult<Json<FoodItem>> {
    if let Some(price) = payload.price
        && price < Decimal::ZERO
    {
        return Err(AppError::validation("Price must not be negative"));
    }

    let repo = FoodItemRepository::new(state.get_db());
    let item = repo.update(&id, payload).await?;
    Ok(Json(item))
}

/// DELETE /api/food-items/{id} - 下架单品 (软删除)
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<bool>> {
    let repo = FoodItemRepository::new(state.get_db());
    let result = repo.delete(&id).await?;
    Ok(Json(result))
}
