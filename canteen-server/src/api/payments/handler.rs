//! Payment API Handlers

use axum::{
    Json,
    extract::{Path, State},
};

use crate::core::ServerState;
use crate::db::models::Payment;
use crate::db::repository::{PaymentRepository, parse_record_id};
use shared::{AppError, AppResult};

/// GET /api/payments/{id} - 获取单个支付记录
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<Payment>> {
    let repo = PaymentRepository::new(state.get_db());
    let payment = repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Payment {}", id)))?;
    Ok(Json(payment))
}

/// GET /api/payments/by-order/{order_id} - 按订单获取支付记录
pub async fn get_by_order(
    State(state): State<ServerState>,
    Path(order_id): Path<String>,
) -> AppResult<Json<Payment>> {
    let order = parse_record_id(&order_id)?;
    let repo = PaymentRepository::new(state.get_db());
    let payment = repo
        .find_by_order(&order)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Payment for order {}", order_id)))?;
    Ok(Json(payment))
}
