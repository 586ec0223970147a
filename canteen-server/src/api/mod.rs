//! API 路由模块
//!
//! # 结构
//!
//! - [`health`] - 健康检查 (公开路由)
//! - [`auth`] - 认证相关接口 (登录公开，其余需登录)
//! - [`role`] - 角色与权限矩阵管理接口
//! - [`users`] - 用户管理接口
//! - [`categories`] - 分类管理接口
//! - [`menus`] - 菜单管理接口
//! - [`food_items`] - 单品管理接口
//! - [`timeframes`] - 可售窗口管理接口
//! - [`orders`] - 订单接口
//! - [`payments`] - 支付接口

use axum::Router;
use axum::middleware as axum_middleware;
use http::{HeaderName, HeaderValue};
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{
    MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer,
};
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use crate::auth::middleware::require_auth;
use crate::core::ServerState;

pub mod auth;
pub mod health;
pub mod role;
pub mod users;

// Catalog API
pub mod categories;
pub mod food_items;
pub mod menus;
pub mod timeframes;

// Ordering API
pub mod orders;
pub mod payments;

// Re-export common types for handlers
pub use crate::utils::{AppError, AppResult};

/// Custom request ID generator
#[derive(Clone)]
struct XRequestId;

impl MakeRequestId for XRequestId {
    fn make_request_id<B>(&mut self, _request: &http::Request<B>) -> Option<RequestId> {
        let id = Uuid::new_v4().to_string();
        Some(RequestId::new(HeaderValue::from_str(&id).unwrap()))
    }
}

/// Build a router with all routes registered (no global middleware)
pub fn build_router(state: &ServerState) -> Router<ServerState> {
    Router::new()
        // Health API - public route
        .merge(health::router())
        // Auth API - login public, rest authenticated
        .merge(auth::router())
        // Admin APIs - permission gated per route group
        .merge(role::router(state))
        .merge(users::router(state))
        // Catalog APIs
        .merge(categories::router(state))
        .merge(menus::router(state))
        .merge(food_items::router(state))
        .merge(timeframes::router(state))
        // Ordering APIs
        .merge(orders::router(state))
        .merge(payments::router(state))
}

/// Build a fully configured application with all middleware
pub fn build_app(state: &ServerState) -> Router<ServerState> {
    build_router(state)
        // ========== Tower HTTP Middleware ==========
        // CORS - Handle cross-origin requests
        .layer(CorsLayer::permissive())
        // Compression - Gzip compress responses
        .layer(CompressionLayer::new())
        // Trace - Request tracing (logs at INFO level)
        .layer(TraceLayer::new_for_http())
        // ========== Application Middleware ==========
        // Request ID - Generate unique ID for each request
        .layer(SetRequestIdLayer::new(
            HeaderName::from_static("x-request-id"),
            XRequestId,
        ))
        // Propagate request ID to response
        .layer(PropagateRequestIdLayer::new(HeaderName::from_static(
            "x-request-id",
        )))
        // JWT authentication - executes before routes, injects CurrentUser
        .layer(axum_middleware::from_fn_with_state(
            state.clone(),
            require_auth,
        ))
}
