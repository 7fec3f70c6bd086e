pub mod config;
pub mod error;
pub mod state;
pub mod db;
pub mod models;
pub mod routes;
pub mod actions;

use std::sync::Arc;

use axum::http::{HeaderName, HeaderValue};
use axum::Router;
use sqlx::PgPool;
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;

use crate::actions::dispatch::ActionDispatcher;
use crate::actions::notification::{AlertInvoker, AlertKind, GroupTypeRouter, Notifier};
use crate::actions::threads::{NotificationThreads, PgNotificationMessageRepository};
use crate::actions::webhook::WebhookNotifier;
use crate::actions::default_registry;
use crate::config::Config;
use crate::models::ActionType;
use crate::state::{AppState, SharedState};

pub fn build_app(pool: PgPool, config: Config) -> Result<Router, String> {
    // Notifiers delivered by this service
    let threads = NotificationThreads::new(
        Arc::new(PgNotificationMessageRepository::new(pool.clone())),
        config.threads_enabled,
    );
    let webhook: Arc<dyn Notifier> = Arc::new(
        WebhookNotifier::new(config.webhook_timeout, threads)
            .map_err(|e| format!("Failed to build webhook client: {e}"))?,
    );

    let mut issue_alerts = AlertInvoker::new(AlertKind::IssueAlert);
    issue_alerts.register(ActionType::Webhook, webhook.clone());
    let mut metric_alerts = AlertInvoker::new(AlertKind::MetricAlert);
    metric_alerts.register(ActionType::Webhook, webhook);

    // Build handler registry
    let router = Arc::new(GroupTypeRouter::with_alert_invokers(issue_alerts, metric_alerts));
    let registry = Arc::new(default_registry(router));
    tracing::info!("Registered {} action handlers", registry.list().len());

    let state: SharedState = Arc::new(AppState {
        pool,
        dispatcher: ActionDispatcher::new(registry),
    });

    let app = Router::new()
        .merge(routes::api_routes())
        .route("/health", axum::routing::get(health))
        .layer(TraceLayer::new_for_http())
        .layer(SetResponseHeaderLayer::overriding(
            HeaderName::from_static("x-content-type-options"),
            HeaderValue::from_static("nosniff"),
        ))
        .with_state(state);

    Ok(app)
}

async fn health() -> &'static str {
    "ok"
}
