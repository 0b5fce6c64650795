use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

use serde::Serialize;
use tokio::{sync::watch, task::JoinHandle};

use crate::{
    db::{SharedGateway, Subscription, SubscriptionId},
    errors::AppError,
    guestbook::stats::FeedbackStats,
    models::{FeedbackEntry, ListOrder},
};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "phase", rename_all = "camelCase")]
pub enum SurfacePhase {
    /// The first fetch has not completed yet.
    Loading,
    Empty,
    Ready,
    /// The last fetch failed. Entries from the last good fetch are kept.
    Unavailable { reason: String },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SurfaceView {
    #[serde(flatten)]
    pub phase: SurfacePhase,
    pub entries: Vec<FeedbackEntry>,
    pub stats: FeedbackStats,
    /// Number of fetches applied so far.
    pub revision: u64,
}

impl SurfaceView {
    pub fn loading() -> Self {
        Self {
            phase: SurfacePhase::Loading,
            entries: Vec::new(),
            stats: FeedbackStats::default(),
            revision: 0,
        }
    }

    fn apply(&mut self, fetched: Result<Vec<FeedbackEntry>, AppError>) {
        self.revision += 1;
        match fetched {
            Ok(entries) => {
                self.phase = if entries.is_empty() {
                    SurfacePhase::Empty
                } else {
                    SurfacePhase::Ready
                };
                self.stats = FeedbackStats::compute(&entries);
                self.entries = entries;
            }
            Err(e) => {
                self.phase = SurfacePhase::Unavailable {
                    reason: e.to_string(),
                };
            }
        }
    }
}

/// A mounted view of the whole feedback collection that stays in sync with
/// the backend.
///
/// Every change notification triggers a full re-fetch that replaces the view
/// wholesale. Fetches run one at a time, and notifications that pile up while
/// one is running collapse into a single follow-up fetch, so an older result
/// can never overwrite a newer one.
///
/// Unmounting (or dropping) releases the subscription exactly once and
/// guarantees no fetch result is published afterwards.
pub struct LiveSurface {
    gateway: SharedGateway,
    subscription: Option<SubscriptionId>,
    alive: Arc<AtomicBool>,
    task: Option<JoinHandle<()>>,
    view: watch::Receiver<SurfaceView>,
}

impl LiveSurface {
    pub async fn mount(gateway: SharedGateway, order: ListOrder) -> Result<Self, AppError> {
        // Subscribe first so nothing inserted during the initial fetch is missed.
        let subscription = gateway.subscribe().await?;
        let subscription_id = subscription.id;

        let (tx, view) = watch::channel(SurfaceView::loading());
        let alive = Arc::new(AtomicBool::new(true));

        let task = tokio::spawn(sync_entries(
            gateway.clone(),
            order,
            subscription,
            tx,
            alive.clone(),
        ));

        tracing::debug!("Mounted live surface on subscription {}", subscription_id);

        Ok(Self {
            gateway,
            subscription: Some(subscription_id),
            alive,
            task: Some(task),
            view,
        })
    }

    pub fn view(&self) -> SurfaceView {
        self.view.borrow().clone()
    }

    pub fn watch(&self) -> watch::Receiver<SurfaceView> {
        self.view.clone()
    }

    pub fn is_mounted(&self) -> bool {
        self.alive.load(Ordering::SeqCst)
    }

    pub fn unmount(&mut self) {
        self.alive.store(false, Ordering::SeqCst);
        // Waits out a publish that passed the liveness check before the store.
        drop(self.view.borrow());

        if let Some(task) = self.task.take() {
            task.abort();
        }

        if let Some(id) = self.subscription.take() {
            self.gateway.unsubscribe(id);
            tracing::debug!("Unmounted live surface, released subscription {}", id);
        }
    }
}

impl Drop for LiveSurface {
    fn drop(&mut self) {
        self.unmount();
    }
}

async fn sync_entries(
    gateway: SharedGateway,
    order: ListOrder,
    mut subscription: Subscription,
    tx: watch::Sender<SurfaceView>,
    alive: Arc<AtomicBool>,
) {
    refresh(&gateway, order, &tx, &alive).await;

    while let Some(event) = subscription.next_event().await {
        let coalesced = subscription.drain_pending();
        tracing::debug!(
            "Change {:?} received ({} more coalesced), re-fetching",
            event,
            coalesced
        );
        refresh(&gateway, order, &tx, &alive).await;
    }

    tracing::debug!("Change feed closed for subscription {}", subscription.id);
}

async fn refresh(
    gateway: &SharedGateway,
    order: ListOrder,
    tx: &watch::Sender<SurfaceView>,
    alive: &AtomicBool,
) {
    let fetched = gateway.list(order).await;

    if let Err(e) = &fetched {
        tracing::error!("Error fetching feedbacks: {}", e);
    }

    // Checked under the channel's write lock so it cannot interleave with unmount.
    let applied = tx.send_if_modified(|view| {
        if !alive.load(Ordering::SeqCst) {
            return false;
        }
        view.apply(fetched);
        true
    });

    if !applied {
        tracing::debug!("Discarding fetch that finished after unmount");
    }
}
