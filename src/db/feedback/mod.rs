pub mod changes;
pub mod get;
pub mod post;

use bb8::PooledConnection;
use bb8_redis::RedisConnectionManager;

use crate::{errors::AppError, state::RedisClient};

pub use changes::{publish_change, spawn_change_listener};
pub use get::get_all_feedback;
pub use post::create_feedback;

pub(crate) async fn get_conn(
    redis: &RedisClient,
) -> Result<PooledConnection<'_, RedisConnectionManager>, AppError> {
    redis.get().await.map_err(|e| match e {
        bb8::RunError::User(err) => AppError::RedisCommandError(err),
        bb8::RunError::TimedOut => AppError::RedisPoolError("Redis connection timed out".into()),
    })
}
