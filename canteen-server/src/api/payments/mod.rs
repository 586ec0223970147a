//! Payment API 模块

mod handler;

use axum::{Router, middleware as axum_middleware, routing::get};

use crate::auth::middleware::require_permission;
use crate::auth::permissions::{action, resource};
use crate::core::ServerState;

pub fn router(state: &ServerState) -> Router<ServerState> {
    Router::new().nest("/api/payments", routes(state))
}

fn routes(state: &ServerState) -> Router<ServerState> {
    Router::new()
        .route("/by-order/{order_id}", get(handler::get_by_order))
        .route("/{id}", get(handler::get_by_id))
        .route_layer(axum_middleware::from_fn_with_state(
            state.clone(),
            require_permission(resource::PAYMENT, action::READ),
        ))
}
