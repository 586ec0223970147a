//! Ordering Timeframe API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::{Deserialize, Serialize};

use crate::core::ServerState;
use crate::db::models::{ApplicableKind, OrderTimeFrame, TimeframeCreate, TimeframeUpdate};
use crate::db::repository::{TimeframeRepository, parse_record_id};
use shared::{AppError, AppResult};

/// GET /api/timeframes - 获取所有可售窗口
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<OrderTimeFrame>>> {
    let repo = TimeframeRepository::new(state.get_db());
    let frames = repo.find_all().await?;
    Ok(Json(frames))
}

/// GET /api/timeframes/{id} - 获取单个窗口
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<OrderTimeFrame>> {
    let repo = TimeframeRepository::new(state.get_db());
    let frame = repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Timeframe {}", id)))?;
    Ok(Json(frame))
}

#[derive(Debug, Deserialize)]
pub struct CheckQuery {
    pub kind: ApplicableKind,
    /// Target record id ("category:xxx", "menu:xxx" or "food_item:xxx")
    pub id: String,
}

#[derive(Debug, Serialize)]
pub struct CheckResponse {
    pub allowed: bool,
}

/// GET /api/timeframes/check?kind=&id= - 当前是否可下单
pub async fn check(
    State(state): State<ServerState>,
    Query(query): Query<CheckQuery>,
) -> AppResult<Json<CheckResponse>> {
    let target = parse_record_id(&query.id)?;
    let allowed = state
        .availability_engine()
        .is_ordering_allowed_for(query.kind, &target)
        .await?;
    Ok(Json(CheckResponse { allowed }))
}

/// POST /api/timeframes - 创建窗口
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<TimeframeCreate>,
) -> AppResult<Json<OrderTimeFrame>> {
    let repo = TimeframeRepository::new(state.get_db());
    let frame = repo.create(payload).await?;
    Ok(Json(frame))
}

/// PUT /api/timeframes/{id} - 更新窗口
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<TimeframeUpdate>,
) -> AppResult<Json<OrderTimeFrame>> {
    let repo = TimeframeRepository::new(state.get_db());
    let frame = repo.update(&id, payload).await?;
    Ok(Json(frame))
}

/// DELETE /api/timeframes/{id} - 删除窗口
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<bool>> {
    let repo = TimeframeRepository::new(state.get_db());
    let result = repo.delete(&id).await?;
    Ok(Json(result))
}
