pub mod feed;
pub mod feedback;
pub mod memory;
pub mod redis_gateway;

use std::{fmt, sync::Arc};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use uuid::Uuid;

use crate::{
    errors::AppError,
    models::{ChangeEvent, FeedbackEntry, ListOrder, NewFeedback},
};

pub use feed::ChangeFeed;
pub use memory::MemoryGateway;
pub use redis_gateway::RedisGateway;

/// The backend as seen by the guest book: one collection, four operations.
///
/// Implementations own storage and change notification. Consumers never look
/// at the kind of change they are told about; every event means "re-fetch".
#[async_trait]
pub trait FeedbackGateway: Send + Sync {
    /// Inserts one row. The backend assigns `id` and `created_at`.
    async fn create(&self, record: NewFeedback) -> Result<FeedbackEntry, AppError>;

    /// Reads the whole collection in the requested order.
    async fn list(&self, order: ListOrder) -> Result<Vec<FeedbackEntry>, AppError>;

    /// Starts receiving an event for every change to the collection.
    async fn subscribe(&self) -> Result<Subscription, AppError>;

    /// Releases a subscription. Releasing an unknown or already released
    /// handle is a no-op.
    fn unsubscribe(&self, handle: SubscriptionId);
}

pub type SharedGateway = Arc<dyn FeedbackGateway>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SubscriptionId(pub Uuid);

impl SubscriptionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SubscriptionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug)]
pub struct Subscription {
    pub id: SubscriptionId,
    events: mpsc::UnboundedReceiver<ChangeEvent>,
}

impl Subscription {
    pub fn new(id: SubscriptionId, events: mpsc::UnboundedReceiver<ChangeEvent>) -> Self {
        Self { id, events }
    }

    /// Waits for the next change. `None` once the gateway has released the
    /// subscription.
    pub async fn next_event(&mut self) -> Option<ChangeEvent> {
        self.events.recv().await
    }

    /// Drains every event that is already queued, returning how many there were.
    pub fn drain_pending(&mut self) -> usize {
        let mut drained = 0;
        while self.events.try_recv().is_ok() {
            drained += 1;
        }
        drained
    }
}
