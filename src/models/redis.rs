use crate::models::feedback::FeedbackId;

pub struct RedisKey;

impl RedisKey {
    pub fn feedback(id: FeedbackId) -> String {
        format!("feedback:{id}")
    }

    /// Sorted set of every stored id, scored by id.
    pub fn feedback_index() -> String {
        "feedback:index".to_string()
    }

    pub fn feedback_seq() -> String {
        "feedback:seq".to_string()
    }

    /// Pub/sub channel carrying serialized change events.
    pub fn feedback_changes() -> String {
        "feedback:changes".to_string()
    }
}
