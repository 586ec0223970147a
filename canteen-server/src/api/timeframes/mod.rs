//! Ordering Timeframe API 模块

mod handler;

use axum::{
    Router,
    middleware as axum_middleware,
    routing::{delete, get, post, put},
};

use crate::auth::middleware::require_permission;
use crate::auth::permissions::{action, resource};
use crate::core::ServerState;

pub fn router(state: &ServerState) -> Router<ServerState> {
    Router::new().nest("/api/timeframes", routes(state))
}

fn routes(state: &ServerState) -> Router<ServerState> {
    let read = Router::new()
        .route("/", get(handler::list))
        // Live availability check (must be before /{id} to avoid path conflicts)
        .route("/check", get(handler::check))
        .route("/{id}", get(handler::get_by_id))
        .route_layer(axum_middleware::from_fn_with_state(
            state.clone(),
            require_permission(resource::TIMEFRAME, action::READ),
        ));

    let create = Router::new()
        .route("/", post(handler::create))
        .route_layer(axum_middleware::from_fn_with_state(
            state.clone(),
            require_permission(resource::TIMEFRAME, action::CREATE),
        ));

    let update = Router::new()
        .route("/{id}", put(handler::update))
        .route_layer(axum_middleware::from_fn_with_state(
            state.clone(),
            require_permission(resource::TIMEFRAME, action::UPDATE),
        ));

    let remove = Router::new()
        .route("/{id}", delete(handler::delete))
        .route_layer(axum_middleware::from_fn_with_state(
            state.clone(),
            require_permission(resource::TIMEFRAME, action::DELETE),
        ));

    read.merge(create).merge(update).merge(remove)
}
