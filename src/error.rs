use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use crate::actions::ActionError;
use crate::db::actions::WriteError;

#[derive(Debug)]
pub enum AppError {
    NotFound(String),
    BadRequest(String),
    Upstream(String),
    Database(sqlx::Error),
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AppError::NotFound(msg) => write!(f, "Not Found: {msg}"),
            AppError::BadRequest(msg) => write!(f, "Bad Request: {msg}"),
            AppError::Upstream(msg) => write!(f, "Upstream Error: {msg}"),
            AppError::Database(err) => write!(f, "Database Error: {err}"),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::Upstream(msg) => (StatusCode::BAD_GATEWAY, msg.clone()),
            AppError::Database(err) => {
                tracing::error!("Database error: {err}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        let body = json!({ "error": message });
        (status, axum::Json(body)).into_response()
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        AppError::Database(err)
    }
}

impl From<ActionError> for AppError {
    fn from(err: ActionError) -> Self {
        match err {
            ActionError::Execution(e) => AppError::Upstream(e.message),
            other => AppError::BadRequest(other.to_string()),
        }
    }
}

impl From<WriteError> for AppError {
    fn from(err: WriteError) -> Self {
        match err {
            WriteError::Invalid(e) => AppError::from(e),
            WriteError::Database(e) => AppError::Database(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::actions::HandlerError;

    #[test]
    fn action_errors_map_to_status_codes() {
        let cases = [
            (ActionError::UnknownActionType("nope".into()), StatusCode::BAD_REQUEST),
            (ActionError::ConfigValidation("Invalid config: x".into()), StatusCode::BAD_REQUEST),
            (ActionError::DataValidation("Invalid data: x".into()), StatusCode::BAD_REQUEST),
            (
                ActionError::Execution(HandlerError::from("boom")),
                StatusCode::BAD_GATEWAY,
            ),
        ];

        for (err, expected) in cases {
            let resp = AppError::from(err).into_response();
            assert_eq!(resp.status(), expected);
        }
    }

    #[test]
    fn database_errors_are_internal() {
        let resp = AppError::from(sqlx::Error::RowNotFound).into_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
