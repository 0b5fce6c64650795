use std::{
    collections::HashMap,
    sync::{Arc, Mutex, MutexGuard},
};

use tokio::sync::mpsc;

use crate::{
    db::{Subscription, SubscriptionId},
    models::ChangeEvent,
};

type Subscribers = HashMap<SubscriptionId, mpsc::UnboundedSender<ChangeEvent>>;

/// Local fan-out of change events to every live subscription.
#[derive(Clone, Default)]
pub struct ChangeFeed {
    subscribers: Arc<Mutex<Subscribers>>,
}

impl ChangeFeed {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Subscribers> {
        self.subscribers
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn subscribe(&self) -> Subscription {
        let (tx, rx) = mpsc::unbounded_channel();
        let id = SubscriptionId::new();
        self.lock().insert(id, tx);
        tracing::debug!("Subscription {} opened", id);
        Subscription::new(id, rx)
    }

    /// Returns whether the handle was still registered.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let removed = self.lock().remove(&id).is_some();
        if removed {
            tracing::debug!("Subscription {} released", id);
        }
        removed
    }

    /// Delivers `event` to every subscriber, pruning the ones whose receiver
    /// is gone. Returns the number of deliveries.
    pub fn publish(&self, event: &ChangeEvent) -> usize {
        let mut subscribers = self.lock();
        subscribers.retain(|id, tx| {
            let delivered = tx.send(event.clone()).is_ok();
            if !delivered {
                tracing::debug!("Dropping closed subscription {}", id);
            }
            delivered
        });
        subscribers.len()
    }

    pub fn subscriber_count(&self) -> usize {
        self.lock().len()
    }
}
