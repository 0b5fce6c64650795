use async_trait::async_trait;
use bb8::Pool;
use bb8_redis::RedisConnectionManager;
use tokio::task::JoinHandle;

use crate::{
    db::{
        ChangeFeed, FeedbackGateway, Subscription, SubscriptionId,
        feedback::{create_feedback, get_all_feedback, publish_change, spawn_change_listener},
    },
    errors::AppError,
    models::{ChangeEvent, FeedbackEntry, ListOrder, NewFeedback},
    state::RedisClient,
};

/// Redis-backed gateway. Rows live in hashes, change notifications travel
/// over pub/sub so every server instance sees every insert.
pub struct RedisGateway {
    redis: RedisClient,
    feed: ChangeFeed,
    listener: JoinHandle<()>,
}

impl RedisGateway {
    pub async fn connect(redis_url: &str) -> Result<Self, AppError> {
        let client = redis::Client::open(redis_url).map_err(AppError::RedisCommandError)?;
        let manager =
            RedisConnectionManager::new(redis_url).map_err(AppError::RedisCommandError)?;
        let redis = Pool::builder()
            .build(manager)
            .await
            .map_err(AppError::RedisCommandError)?;

        let feed = ChangeFeed::new();
        let listener = spawn_change_listener(client, feed.clone());

        Ok(Self {
            redis,
            feed,
            listener,
        })
    }
}

impl Drop for RedisGateway {
    fn drop(&mut self) {
        self.listener.abort();
    }
}

#[async_trait]
impl FeedbackGateway for RedisGateway {
    async fn create(&self, record: NewFeedback) -> Result<FeedbackEntry, AppError> {
        let entry = create_feedback(record, self.redis.clone()).await?;

        // Row is stored at this point; a failed notify is logged only.
        if let Err(e) = publish_change(&ChangeEvent::inserted(entry.id), self.redis.clone()).await
        {
            tracing::error!("Failed to publish insert of feedback {}: {}", entry.id, e);
        }

        Ok(entry)
    }

    async fn list(&self, order: ListOrder) -> Result<Vec<FeedbackEntry>, AppError> {
        let mut entries = get_all_feedback(self.redis.clone()).await?;
        order.sort(&mut entries);
        Ok(entries)
    }

    async fn subscribe(&self) -> Result<Subscription, AppError> {
        Ok(self.feed.subscribe())
    }

    fn unsubscribe(&self, handle: SubscriptionId) {
        self.feed.unsubscribe(handle);
    }
}
