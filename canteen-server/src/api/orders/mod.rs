//! Order API 模块

mod handler;

use axum::{
    Router,
    middleware as axum_middleware,
    routing::{get, post},
};

use crate::auth::middleware::require_permission;
use crate::auth::permissions::{action, resource};
use crate::core::ServerState;

pub fn router(state: &ServerState) -> Router<ServerState> {
    Router::new().nest("/api/orders", routes(state))
}

fn routes(state: &ServerState) -> Router<ServerState> {
    let read = Router::new()
        .route("/", get(handler::list))
        .route("/short/{short_id}", get(handler::get_by_short_id))
        .route("/{id}", get(handler::get_by_id))
        .route("/{id}/cancellable", get(handler::cancellable))
        .route_layer(axum_middleware::from_fn_with_state(
            state.clone(),
            require_permission(resource::ORDER, action::READ),
        ));

    let create = Router::new()
        .route("/", post(handler::create))
        .route_layer(axum_middleware::from_fn_with_state(
            state.clone(),
            require_permission(resource::ORDER, action::CREATE),
        ));

    let cancel = Router::new()
        .route("/{id}/cancel", post(handler::cancel))
        .route_layer(axum_middleware::from_fn_with_state(
            state.clone(),
            require_permission(resource::ORDER, action::CANCEL),
        ));

    let manage = Router::new()
        .route("/missing-payment", get(handler::missing_payment))
        .route_layer(axum_middleware::from_fn_with_state(
            state.clone(),
            require_permission(resource::ORDER, action::MANAGE),
        ));

    let pay = Router::new()
        .route("/{id}/pay", post(handler::pay))
        .route_layer(axum_middleware::from_fn_with_state(
            state.clone(),
            require_permission(resource::PAYMENT, action::PROCESS),
        ));

    read.merge(create).merge(cancel).merge(manage).merge(pay)
}
