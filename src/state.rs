use std::sync::Arc;

use sqlx::PgPool;

use crate::actions::dispatch::ActionDispatcher;

pub type SharedState = Arc<AppState>;

pub struct AppState {
    pub pool: PgPool,
    pub dispatcher: ActionDispatcher,
}
