use regex::Regex;
use std::sync::LazyLock;

use crate::models::{Action, Detector, WorkflowJob};

static TEMPLATE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{(\w+(?:\.[\w-]+)*)\}\}").unwrap());

pub struct TemplateContext<'a> {
    pub job: &'a WorkflowJob,
    pub action: &'a Action,
    pub detector: &'a Detector,
}

/// Replace {{variable}} placeholders in a template string with values from the context.
/// Unknown variables render as the empty string.
pub fn render(template: &str, ctx: &TemplateContext<'_>) -> String {
    TEMPLATE_RE
        .replace_all(template, |caps: &regex::Captures| {
            let path = &caps[1];
            resolve(path, ctx).unwrap_or_default()
        })
        .to_string()
}

fn resolve(path: &str, ctx: &TemplateContext<'_>) -> Option<String> {
    let event = &ctx.job.event;
    let parts: Vec<&str> = path.splitn(2, '.').collect();
    match parts.as_slice() {
        ["event", "id"] => Some(event.event_id.clone()),
        ["event", "title"] => Some(event.title.clone()),
        ["event", "culprit"] => event.culprit.clone(),
        ["event", "level"] => event.level.clone(),
        ["event", "platform"] => event.platform.clone(),
        ["event", "occurred_at"] => Some(event.occurred_at.to_rfc3339()),
        ["group", "id"] => Some(event.group_id.to_string()),
        ["project", "id"] => Some(event.project_id.to_string()),
        ["tags", key] => event.tags.get(*key).cloned(),
        ["data", field] => json_string_field(&event.data, field),
        ["detector", "id"] => Some(ctx.detector.id.to_string()),
        ["detector", "name"] => Some(ctx.detector.name.clone()),
        ["detector", "type"] => Some(ctx.detector.detector_type.clone()),
        ["action", "id"] => Some(ctx.action.id.to_string()),
        ["action", "type"] => Some(ctx.action.action_type.to_string()),
        ["workflow", "id"] => ctx.job.workflow_id.map(|id| id.to_string()),
        _ => None,
    }
}

fn json_string_field(value: &serde_json::Value, field: &str) -> Option<String> {
    match value.get(field)? {
        serde_json::Value::String(s) => Some(s.clone()),
        serde_json::Value::Null => None,
        other => Some(other.to_string()),
    }
}
