#![allow(dead_code)]

use std::sync::{
    Arc,
    atomic::{AtomicBool, AtomicUsize, Ordering},
};

use async_trait::async_trait;
use chrono::{Duration, Utc};
use guest_book_be::{
    db::{ChangeFeed, FeedbackGateway, MemoryGateway, Subscription, SubscriptionId},
    errors::AppError,
    models::{FeedbackEntry, ListOrder, NewFeedback},
};
use tokio::sync::Notify;

pub fn entry(id: i64, rating: i16) -> FeedbackEntry {
    FeedbackEntry {
        id,
        name: format!("Guest {id}"),
        comment: format!("Comment number {id}"),
        rating,
        created_at: Utc::now() - Duration::minutes(id),
    }
}

pub fn entries_with_ratings(ratings: &[i16]) -> Vec<FeedbackEntry> {
    ratings
        .iter()
        .enumerate()
        .map(|(i, rating)| entry(i as i64 + 1, *rating))
        .collect()
}

pub fn new_feedback(name: &str, comment: &str, rating: i16) -> NewFeedback {
    NewFeedback {
        name: name.to_string(),
        comment: comment.to_string(),
        rating,
    }
}

/// Memory gateway that counts calls.
#[derive(Default)]
pub struct CountingGateway {
    pub inner: MemoryGateway,
    pub creates: AtomicUsize,
    pub lists: AtomicUsize,
    pub unsubscribes: AtomicUsize,
}

impl CountingGateway {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn creates(&self) -> usize {
        self.creates.load(Ordering::SeqCst)
    }

    pub fn lists(&self) -> usize {
        self.lists.load(Ordering::SeqCst)
    }

    pub fn unsubscribes(&self) -> usize {
        self.unsubscribes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl FeedbackGateway for CountingGateway {
    async fn create(&self, record: NewFeedback) -> Result<FeedbackEntry, AppError> {
        self.creates.fetch_add(1, Ordering::SeqCst);
        self.inner.create(record).await
    }

    async fn list(&self, order: ListOrder) -> Result<Vec<FeedbackEntry>, AppError> {
        self.lists.fetch_add(1, Ordering::SeqCst);
        self.inner.list(order).await
    }

    async fn subscribe(&self) -> Result<Subscription, AppError> {
        self.inner.subscribe().await
    }

    fn unsubscribe(&self, handle: SubscriptionId) {
        self.unsubscribes.fetch_add(1, Ordering::SeqCst);
        self.inner.unsubscribe(handle);
    }
}

/// Backend that is reachable for notifications but fails every read and write.
#[derive(Default)]
pub struct FailingGateway {
    pub feed: ChangeFeed,
    pub creates: AtomicUsize,
}

#[async_trait]
impl FeedbackGateway for FailingGateway {
    async fn create(&self, _record: NewFeedback) -> Result<FeedbackEntry, AppError> {
        self.creates.fetch_add(1, Ordering::SeqCst);
        Err(AppError::BackendUnavailable("insert rejected".into()))
    }

    async fn list(&self, _order: ListOrder) -> Result<Vec<FeedbackEntry>, AppError> {
        Err(AppError::BackendUnavailable("read rejected".into()))
    }

    async fn subscribe(&self) -> Result<Subscription, AppError> {
        Ok(self.feed.subscribe())
    }

    fn unsubscribe(&self, handle: SubscriptionId) {
        self.feed.unsubscribe(handle);
    }
}

/// Memory gateway whose list calls block until released.
#[derive(Default)]
pub struct GatedGateway {
    pub inner: MemoryGateway,
    pub list_started: Notify,
    pub release: Notify,
    pub lists: AtomicUsize,
}

impl GatedGateway {
    pub fn lists(&self) -> usize {
        self.lists.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl FeedbackGateway for GatedGateway {
    async fn create(&self, record: NewFeedback) -> Result<FeedbackEntry, AppError> {
        self.inner.create(record).await
    }

    async fn list(&self, order: ListOrder) -> Result<Vec<FeedbackEntry>, AppError> {
        self.lists.fetch_add(1, Ordering::SeqCst);
        self.list_started.notify_one();
        self.release.notified().await;
        self.inner.list(order).await
    }

    async fn subscribe(&self) -> Result<Subscription, AppError> {
        self.inner.subscribe().await
    }

    fn unsubscribe(&self, handle: SubscriptionId) {
        self.inner.unsubscribe(handle);
    }
}

/// Memory gateway whose reads start failing once `fail_reads` is called.
pub struct FlakyGateway {
    pub inner: MemoryGateway,
    healthy: AtomicBool,
}

impl FlakyGateway {
    pub fn with_entries(entries: Vec<FeedbackEntry>) -> Self {
        Self {
            inner: MemoryGateway::with_entries(entries),
            healthy: AtomicBool::new(true),
        }
    }

    pub fn fail_reads(&self) {
        self.healthy.store(false, Ordering::SeqCst);
    }
}

#[async_trait]
impl FeedbackGateway for FlakyGateway {
    async fn create(&self, record: NewFeedback) -> Result<FeedbackEntry, AppError> {
        self.inner.create(record).await
    }

    async fn list(&self, order: ListOrder) -> Result<Vec<FeedbackEntry>, AppError> {
        if self.healthy.load(Ordering::SeqCst) {
            self.inner.list(order).await
        } else {
            Err(AppError::BackendUnavailable("down".into()))
        }
    }

    async fn subscribe(&self) -> Result<Subscription, AppError> {
        self.inner.subscribe().await
    }

    fn unsubscribe(&self, handle: SubscriptionId) {
        self.inner.unsubscribe(handle);
    }
}
