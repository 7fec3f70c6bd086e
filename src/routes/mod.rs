pub mod actions;
pub mod action_types;

use axum::routing::{get, post};
use axum::Router;

use crate::state::SharedState;

pub fn api_routes() -> Router<SharedState> {
    Router::new()
        // Action types
        .route("/api/v1/action-types", get(action_types::list_action_types))
        // Actions
        .route("/api/v1/actions", get(actions::list).post(actions::create))
        .route(
            "/api/v1/actions/{id}",
            get(actions::get)
                .put(actions::update)
                .delete(actions::delete),
        )
        .route("/api/v1/actions/{id}/trigger", post(actions::trigger))
        .route("/api/v1/actions/{id}/messages", get(actions::messages))
}
