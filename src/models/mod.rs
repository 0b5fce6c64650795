pub mod display;
pub mod feedback;
pub mod messages;
pub mod redis;

pub use display::{DisplayConfig, DisplayVariant, Theme};
pub use feedback::{ChangeEvent, ChangeKind, FeedbackEntry, FeedbackId, ListOrder, NewFeedback, OrderKey};
