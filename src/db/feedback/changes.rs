use std::time::Duration;

use futures::StreamExt;
use redis::AsyncCommands;
use tokio::task::JoinHandle;

use crate::{
    db::{ChangeFeed, feedback::get_conn},
    errors::AppError,
    models::{ChangeEvent, redis::RedisKey},
    state::RedisClient,
};

const RECONNECT_DELAY: Duration = Duration::from_secs(1);

pub async fn publish_change(event: &ChangeEvent, redis: RedisClient) -> Result<(), AppError> {
    let mut conn = get_conn(&redis).await?;

    let payload =
        serde_json::to_string(event).map_err(|e| AppError::Serialization(e.to_string()))?;

    let receivers: i64 = conn
        .publish(RedisKey::feedback_changes(), payload)
        .await
        .map_err(AppError::RedisCommandError)?;

    tracing::debug!("Published {:?} to {} listeners", event, receivers);
    Ok(())
}

/// Forwards every event on the changes channel into `feed` until aborted.
/// A dropped pub/sub connection is re-established after a fixed delay.
pub fn spawn_change_listener(client: redis::Client, feed: ChangeFeed) -> JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            match listen_for_changes(&client, &feed).await {
                Ok(()) => tracing::warn!("Change stream ended, reconnecting"),
                Err(e) => tracing::error!("Change listener failed: {}", e),
            }
            tokio::time::sleep(RECONNECT_DELAY).await;
        }
    })
}

async fn listen_for_changes(client: &redis::Client, feed: &ChangeFeed) -> Result<(), AppError> {
    let mut pubsub = client
        .get_async_pubsub()
        .await
        .map_err(AppError::RedisCommandError)?;

    pubsub
        .subscribe(RedisKey::feedback_changes())
        .await
        .map_err(AppError::RedisCommandError)?;

    tracing::info!("Listening for feedback changes");

    let mut messages = pubsub.on_message();
    while let Some(msg) = messages.next().await {
        let payload: String = match msg.get_payload() {
            Ok(payload) => payload,
            Err(e) => {
                tracing::warn!("Unreadable change payload: {}", e);
                continue;
            }
        };

        match serde_json::from_str::<ChangeEvent>(&payload) {
            Ok(event) => {
                let delivered = feed.publish(&event);
                tracing::debug!("Fanned out {:?} to {} subscribers", event, delivered);
            }
            Err(e) => tracing::warn!("Malformed change event {}: {}", payload, e),
        }
    }

    Ok(())
}
