use axum::extract::State;
use axum::Json;
use serde_json::json;

use crate::state::SharedState;

pub async fn list_action_types(
    State(state): State<SharedState>,
) -> Json<serde_json::Value> {
    let action_types: Vec<serde_json::Value> = state
        .dispatcher
        .registry()
        .list()
        .iter()
        .map(|(action_type, handler)| {
            json!({
                "type": action_type,
                "group": handler.group(),
                "config_schema": handler.config_schema(),
                "data_schema": handler.data_schema(),
            })
        })
        .collect();

    Json(json!({ "action_types": action_types }))
}
