pub mod action;
pub mod detector;
pub mod job;
pub mod notification_message;

pub use action::{Action, ActionDraft, ActionType};
pub use detector::Detector;
pub use job::{GroupEvent, WorkflowJob};
pub use notification_message::{NewNotificationMessage, NotificationMessage};
