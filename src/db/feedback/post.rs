use chrono::Utc;
use redis::AsyncCommands;

use crate::{
    db::feedback::get_conn,
    errors::AppError,
    models::{FeedbackEntry, NewFeedback, redis::RedisKey},
    state::RedisClient,
};

pub async fn create_feedback(
    record: NewFeedback,
    redis: RedisClient,
) -> Result<FeedbackEntry, AppError> {
    let mut conn = get_conn(&redis).await?;

    let id: i64 = conn
        .incr(RedisKey::feedback_seq(), 1)
        .await
        .map_err(AppError::RedisCommandError)?;

    let entry = FeedbackEntry::from_new(id, record, Utc::now());
    let fields: Vec<(String, String)> = entry.to_redis_hash().into_iter().collect();

    let _: () = redis::pipe()
        .atomic()
        .hset_multiple(RedisKey::feedback(id), &fields)
        .ignore()
        .zadd(RedisKey::feedback_index(), id, id)
        .ignore()
        .query_async(&mut *conn)
        .await
        .map_err(AppError::RedisCommandError)?;

    tracing::info!("Stored feedback {} from {}", id, entry.name);
    Ok(entry)
}
