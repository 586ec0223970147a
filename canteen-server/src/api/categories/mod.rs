//! Category API 模块

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
    Router::new().nest("/api/categories", routes(state))
}

fn routes(state: &ServerState) -> Router<ServerState> {
    let read = Router::new()
        .route("/", get(handler::list))
        .route("/{id}", get(handler::get_by_id))
        .route("/{id}/items", get(handler::list_items))
        .route_layer(axum_middleware::from_fn_with_state(
            state.clone(),
            require_permission(resource::CATEGORY, action::READ),
        ));

    let create = Router::new()
        .route("/", post(handler::create))
        .route_layer(axum_middleware::from_fn_with_state(
            state.clone(),
            require_permission(resource::CATEGORY, action::CREATE),
        ));

    let update = Router::new()
        .route("/{id}", put(handler::update))
        .route_layer(axum_middleware::from_fn_with_state(
            state.clone(),
            require_permission(resource::CATEGORY, action::UPDATE),
        ));

    let remove = Router::new()
        .route("/{id}", delete(handler::delete))
        .route_layer(axum_middleware::from_fn_with_state(
            state.clone(),
            require_permission(resource::CATEGORY, action::DELETE),
        ));

    read.merge(create).merge(update).merge(remove)
}
