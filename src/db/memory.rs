use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use crate::{
    db::{ChangeFeed, FeedbackGateway, Subscription, SubscriptionId},
    errors::AppError,
    models::{ChangeEvent, FeedbackEntry, ListOrder, NewFeedback},
};

/// In-process backend. Used when no Redis URL is configured, and by tests.
#[derive(Default)]
pub struct MemoryGateway {
    entries: RwLock<Vec<FeedbackEntry>>,
    last_id: AtomicI64,
    feed: ChangeFeed,
}

impl MemoryGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts with pre-existing rows, in insertion order. New ids continue
    /// after the largest seeded id.
    pub fn with_entries(entries: Vec<FeedbackEntry>) -> Self {
        let last_id = entries.iter().map(|e| e.id).max().unwrap_or(0);
        Self {
            entries: RwLock::new(entries),
            last_id: AtomicI64::new(last_id),
            feed: ChangeFeed::new(),
        }
    }

    pub fn feed(&self) -> &ChangeFeed {
        &self.feed
    }
}

#[async_trait]
impl FeedbackGateway for MemoryGateway {
    async fn create(&self, record: NewFeedback) -> Result<FeedbackEntry, AppError> {
        let id = self.last_id.fetch_add(1, Ordering::SeqCst) + 1;
        let entry = FeedbackEntry::from_new(id, record, Utc::now());

        self.entries.write().await.push(entry.clone());
        tracing::debug!("Stored feedback {} in memory", id);

        self.feed.publish(&ChangeEvent::inserted(id));
        Ok(entry)
    }

    async fn list(&self, order: ListOrder) -> Result<Vec<FeedbackEntry>, AppError> {
        let mut entries = self.entries.read().await.clone();
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
