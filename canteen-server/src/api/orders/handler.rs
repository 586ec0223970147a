//! Order API Handlers

use axum::{
    Json,
    extract::{Extension, Path, Query, State},
};
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

use crate::auth::CurrentUser;
use crate::auth::permissions::{action, resource};
use crate::core::ServerState;
use crate::db::models::{Order, OrderCancelRequest, OrderCreateRequest, ProcessPaymentRequest};
use crate::db::repository::{OrderRepository, parse_record_id};
use crate::ordering::{CancelOrderOutcome, CreateOrderOutcome, ProcessPaymentOutcome};
use shared::{AppError, AppResult, PaginatedResponse};

/// Whether the caller may act on any customer's orders
fn is_order_manager(state: &ServerState, user: &CurrentUser) -> bool {
    state
        .permissions()
        .any_allows(&user.roles, resource::ORDER, action::MANAGE)
}

fn current_user_record(user: &CurrentUser) -> AppResult<RecordId> {
    parse_record_id(&user.id).map_err(|_| AppError::internal("Malformed user id in token"))
}

/// Query params for listing orders
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(default = "default_per_page")]
    pub per_page: u32,
}

fn default_page() -> u32 {
    1
}

fn default_per_page() -> u32 {
    20
}

/// GET /api/orders - 订单列表
///
/// Staff with order management permission see all orders (paginated);
/// everyone else sees their own orders.
pub async fn list(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<PaginatedResponse<Order>>> {
    if query.page == 0 || query.per_page == 0 {
        return Err(AppError::validation("page and per_page must be positive"));
    }

    let repo = OrderRepository::new(state.get_db());

    if is_order_manager(&state, &current_user) {
        let orders = repo.find_page(query.page, query.per_page).await?;
        let total = repo.count_all().await?;
        Ok(Json(PaginatedResponse::new(
            orders,
            query.page,
            query.per_page,
            total as u64,
        )))
    } else {
        let customer = current_user_record(&current_user)?;
        let orders = repo.find_by_customer(&customer).await?;
        let total = orders.len() as u64;
        Ok(Json(PaginatedResponse::new(orders, 1, query.per_page, total)))
    }
}

/// GET /api/orders/{id} - 获取单个订单
pub async fn get_by_id(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> AppResult<Json<Order>> {
    let repo = OrderRepository::new(state.get_db());
    let order = repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Order {}", id)))?;

    if !is_order_manager(&state, &current_user)
        && order.customer != current_user_record(&current_user)?
    {
        return Err(AppError::forbidden("You can only view your own orders"));
    }

    Ok(Json(order))
}

/// GET /api/orders/short/{short_id} - 按取餐单号获取订单
pub async fn get_by_short_id(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(short_id): Path<String>,
) -> AppResult<Json<Order>> {
    let repo = OrderRepository::new(state.get_db());
    let order = repo
        .find_by_short_id(&short_id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Order {}", short_id)))?;

    if !is_order_manager(&state, &current_user)
        && order.customer != current_user_record(&current_user)?
    {
        return Err(AppError::forbidden("You can only view your own orders"));
    }

    Ok(Json(order))
}

/// POST /api/orders - 创建订单
///
/// Ordering on behalf of another customer requires order management
/// permission (cashier terminals pass `customer_id`).
pub async fn create(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Json(payload): Json<OrderCreateRequest>,
) -> AppResult<Json<CreateOrderOutcome>> {
    let customer = match payload.customer_id.as_deref() {
        Some(customer_id) => {
            if !is_order_manager(&state, &current_user) {
                return Err(AppError::forbidden(
                    "Only staff may order on behalf of another customer",
                ));
            }
            parse_record_id(customer_id)?
        }
        None => current_user_record(&current_user)?,
    };

    let outcome = state.order_service().create_order(customer, payload).await?;
    Ok(Json(outcome))
}

/// POST /api/orders/{id}/cancel - 取消订单
///
/// Customers may only cancel their own orders and only inside the
/// cancellation window; staff with order management permission may cancel
/// any order.
pub async fn cancel(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<String>,
    Json(payload): Json<OrderCancelRequest>,
) -> AppResult<Json<CancelOrderOutcome>> {
    let requesting_user = if is_order_manager(&state, &current_user) {
        None
    } else {
        Some(current_user_record(&current_user)?)
    };

    let outcome = state
        .order_service()
        .cancel_order(&id, requesting_user.as_ref(), payload.reason)
        .await?;
    Ok(Json(outcome))
}

#[derive(Debug, Serialize)]
pub struct CancellableResponse {
    pub cancellable: bool,
}

/// GET /api/orders/{id}/cancellable - 是否仍可取消
pub async fn cancellable(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<CancellableResponse>> {
    let cancellable = state.order_service().is_cancel_allowed(&id).await?;
    Ok(Json(CancellableResponse { cancellable }))
}

/// POST /api/orders/{id}/pay - 支付结算
pub async fn pay(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<ProcessPaymentRequest>,
) -> AppResult<Json<ProcessPaymentOutcome>> {
    let outcome = state
        .order_service()
        .process_payment(&id, payload.payment_method)
        .await?;
    Ok(Json(outcome))
}

/// GET /api/orders/missing-payment - 缺失支付记录的订单 (对账)
pub async fn missing_payment(
    State(state): State<ServerState>,
) -> AppResult<Json<Vec<Order>>> {
    let repo = OrderRepository::new(state.get_db());
    let orders = repo.find_missing_payment().await?;
    Ok(Json(orders))
}
