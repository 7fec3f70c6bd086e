use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Deserialize;
use uuid::Uuid;

use crate::db;
use crate::error::AppError;
use crate::models::{Action, ActionDraft, Detector, NotificationMessage, WorkflowJob};
use crate::state::SharedState;

#[derive(Deserialize)]
pub struct PageParams {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

impl PageParams {
    fn limit_offset(&self) -> Result<(i64, i64), AppError> {
        let page = self.page.unwrap_or(1).max(1);
        let per_page = self.per_page.unwrap_or(20).clamp(1, 100);
        let offset = (page - 1)
            .checked_mul(per_page)
            .ok_or_else(|| AppError::BadRequest(format!("Page {page} is out of range")))?;
        Ok((per_page, offset))
    }
}

#[derive(Deserialize)]
pub struct TriggerAction {
    pub job: WorkflowJob,
    pub detector: Detector,
}

pub async fn list(
    State(state): State<SharedState>,
    Query(params): Query<PageParams>,
) -> Result<Json<Vec<Action>>, AppError> {
    let (limit, offset) = params.limit_offset()?;
    let actions = db::actions::list(&state.pool, limit, offset).await?;
    Ok(Json(actions))
}

pub async fn get(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Action>, AppError> {
    let action = db::actions::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::NotFound("Action not found".to_string()))?;
    Ok(Json(action))
}

pub async fn create(
    State(state): State<SharedState>,
    Json(req): Json<ActionDraft>,
) -> Result<Json<Action>, AppError> {
    let action = db::actions::create(&state.pool, state.dispatcher.registry(), &req).await?;

    tracing::info!(action_id = %action.id, action_type = %action.action_type, "Action created");
    Ok(Json(action))
}

pub async fn update(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
    Json(req): Json<ActionDraft>,
) -> Result<Json<Action>, AppError> {
    let action = db::actions::update(&state.pool, state.dispatcher.registry(), id, &req)
        .await?
        .ok_or_else(|| AppError::NotFound("Action not found".to_string()))?;

    tracing::info!(action_id = %action.id, action_type = %action.action_type, "Action updated");
    Ok(Json(action))
}

pub async fn delete(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, AppError> {
    if !db::actions::delete(&state.pool, id).await? {
        return Err(AppError::NotFound("Action not found".to_string()));
    }

    tracing::info!(action_id = %id, "Action deleted");
    Ok(Json(serde_json::json!({ "message": "Deleted" })))
}

pub async fn trigger(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
    Json(req): Json<TriggerAction>,
) -> Result<Json<serde_json::Value>, AppError> {
    let action = db::actions::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::NotFound("Action not found".to_string()))?;

    state
        .dispatcher
        .trigger(&action, &req.job, &req.detector)
        .await?;

    Ok(Json(serde_json::json!({ "message": "Triggered" })))
}

pub async fn messages(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
    Query(params): Query<PageParams>,
) -> Result<Json<Vec<NotificationMessage>>, AppError> {
    db::actions::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::NotFound("Action not found".to_string()))?;

    let (limit, offset) = params.limit_offset()?;
    let messages =
        db::notification_messages::list_by_action(&state.pool, id, limit, offset).await?;
    Ok(Json(messages))
}
