use std::sync::Arc;

use super::{ActionError, ActionHandlerRegistry};
use crate::models::{Action, Detector, WorkflowJob};

/// Runs a persisted action by handing it to the handler for its type.
///
/// Delivery guarantees belong to the handlers: the dispatcher never retries,
/// never times out a handler, and never writes to the database.
#[derive(Clone)]
pub struct ActionDispatcher {
    registry: Arc<ActionHandlerRegistry>,
}

impl ActionDispatcher {
    pub fn new(registry: Arc<ActionHandlerRegistry>) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &ActionHandlerRegistry {
        &self.registry
    }

    pub async fn trigger(
        &self,
        action: &Action,
        job: &WorkflowJob,
        detector: &Detector,
    ) -> Result<(), ActionError> {
        let handler = self.registry.get(action.action_type)?;

        tracing::debug!(
            action_id = %action.id,
            action_type = %action.action_type,
            detector_id = detector.id,
            group_id = job.event.group_id,
            "Triggering action"
        );

        handler.execute(job, action, detector).await.map_err(|e| {
            tracing::warn!(
                action_id = %action.id,
                action_type = %action.action_type,
                "Action handler failed: {e}"
            );
            ActionError::from(e)
        })
    }
}
