pub mod events;
pub mod scripted;
pub mod widget;
