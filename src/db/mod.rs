pub mod actions;
pub mod notification_messages;
