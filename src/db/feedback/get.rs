use std::collections::HashMap;

use redis::AsyncCommands;

use crate::{
    db::feedback::get_conn,
    errors::AppError,
    models::{FeedbackEntry, FeedbackId, redis::RedisKey},
    state::RedisClient,
};

/// Every stored entry, ascending by id.
pub async fn get_all_feedback(redis: RedisClient) -> Result<Vec<FeedbackEntry>, AppError> {
    let mut conn = get_conn(&redis).await?;

    let ids: Vec<FeedbackId> = conn
        .zrange(RedisKey::feedback_index(), 0, -1)
        .await
        .map_err(AppError::RedisCommandError)?;

    if ids.is_empty() {
        return Ok(Vec::new());
    }

    let mut pipe = redis::pipe();
    for id in &ids {
        pipe.hgetall(RedisKey::feedback(*id));
    }

    let rows: Vec<HashMap<String, String>> = pipe
        .query_async(&mut *conn)
        .await
        .map_err(AppError::RedisCommandError)?;

    let mut entries = Vec::with_capacity(rows.len());
    for (id, row) in ids.iter().zip(rows) {
        if row.is_empty() {
            tracing::warn!("Feedback {} is indexed but has no data", id);
            continue;
        }
        entries.push(FeedbackEntry::from_redis_hash(&row)?);
    }

    Ok(entries)
}
