use std::{
    sync::{
        Arc, Mutex, MutexGuard, Weak,
        atomic::{AtomicBool, Ordering},
    },
    time::Duration,
};

use serde::Serialize;
use tokio::{
    sync::watch,
    task::JoinHandle,
    time::{Instant, interval_at, sleep},
};

use crate::guestbook::stats::format_position;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Focus {
    pub index: usize,
    pub total: usize,
    pub label: String,
}

/// Index into a list of `len` entries that wraps in both directions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Carousel {
    index: usize,
    len: usize,
}

impl Carousel {
    pub fn new(len: usize) -> Self {
        Self { index: 0, len }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// A shrunk list that no longer holds the focused entry restarts at 0.
    pub fn set_len(&mut self, len: usize) {
        self.len = len;
        if self.index >= len {
            self.index = 0;
        }
    }

    pub fn advance(&mut self) -> Option<usize> {
        if self.is_empty() {
            return None;
        }
        self.index = (self.index + 1) % self.len;
        Some(self.index)
    }

    pub fn previous(&mut self) -> Option<usize> {
        if self.is_empty() {
            return None;
        }
        self.index = (self.index + self.len - 1) % self.len;
        Some(self.index)
    }

    pub fn select(&mut self, index: usize) -> Option<usize> {
        if index >= self.len {
            return None;
        }
        self.index = index;
        Some(index)
    }

    pub fn focus(&self) -> Focus {
        Focus {
            index: self.index,
            total: self.len,
            label: format_position(self.index, self.len),
        }
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

struct Inner {
    period: Duration,
    cooldown: Duration,
    carousel: Mutex<Carousel>,
    ticker: Mutex<Option<JoinHandle<()>>>,
    resume: Mutex<Option<JoinHandle<()>>>,
    /// Set by `stop`. A resume already in flight must not re-arm the ticker.
    halted: AtomicBool,
    focus: watch::Sender<Focus>,
}

impl Inner {
    fn update(&self, change: impl FnOnce(&mut Carousel) -> Option<usize>) -> Option<usize> {
        let (moved, focus) = {
            let mut carousel = lock(&self.carousel);
            (change(&mut carousel), carousel.focus())
        };
        self.focus.send_if_modified(|current| {
            if *current == focus {
                false
            } else {
                *current = focus;
                true
            }
        });
        moved
    }

    fn cancel_ticker(&self) {
        if let Some(handle) = lock(&self.ticker).take() {
            handle.abort();
        }
    }

    fn cancel_resume(&self) {
        if let Some(handle) = lock(&self.resume).take() {
            handle.abort();
        }
    }
}

/// Timer-driven cycling of the focused entry.
///
/// At most one advance timer and one resume timer exist at a time; arming
/// either always cancels the previous one first. Dropping the driver stops
/// both.
pub struct AutoAdvance {
    inner: Arc<Inner>,
}

impl AutoAdvance {
    pub fn new(period: Duration, cooldown: Duration) -> Self {
        let carousel = Carousel::default();
        let (focus, _) = watch::channel(carousel.focus());
        Self {
            inner: Arc::new(Inner {
                period,
                cooldown,
                carousel: Mutex::new(carousel),
                ticker: Mutex::new(None),
                resume: Mutex::new(None),
                halted: AtomicBool::new(false),
                focus,
            }),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<Focus> {
        self.inner.focus.subscribe()
    }

    pub fn focus(&self) -> Focus {
        lock(&self.inner.carousel).focus()
    }

    pub fn set_len(&self, len: usize) {
        self.inner.update(|carousel| {
            carousel.set_len(len);
            Some(carousel.index())
        });
    }

    pub fn is_running(&self) -> bool {
        lock(&self.inner.ticker)
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    pub fn start(&self) {
        self.inner.halted.store(false, Ordering::SeqCst);
        arm(&self.inner);
    }

    /// Cancels the advance timer and any pending resume.
    pub fn stop(&self) {
        self.inner.halted.store(true, Ordering::SeqCst);
        self.inner.cancel_resume();
        self.inner.cancel_ticker();
    }

    /// Hover in.
    pub fn pause(&self) {
        self.stop();
    }

    /// Hover out.
    pub fn resume(&self) {
        self.inner.cancel_resume();
        self.start();
    }

    /// Stops advancing and starts again on its own after the cooldown.
    /// Repeated interactions push the resume further out.
    pub fn pause_for_interaction(&self) {
        self.inner.cancel_ticker();
        self.inner.cancel_resume();
        self.inner.halted.store(false, Ordering::SeqCst);

        let weak = Arc::downgrade(&self.inner);
        let cooldown = self.inner.cooldown;
        let handle = tokio::spawn(async move {
            sleep(cooldown).await;
            if let Some(inner) = weak.upgrade() {
                tracing::debug!("Interaction cooldown over, resuming auto-advance");
                arm(&inner);
            }
        });
        *lock(&self.inner.resume) = Some(handle);
    }

    pub fn next(&self) -> Option<usize> {
        self.inner.update(Carousel::advance)
    }

    pub fn previous(&self) -> Option<usize> {
        self.inner.update(Carousel::previous)
    }

    pub fn select(&self, index: usize) -> Option<usize> {
        self.inner.update(|carousel| carousel.select(index))
    }
}

impl Drop for AutoAdvance {
    fn drop(&mut self) {
        self.stop();
    }
}

// Holds the ticker lock throughout, so it either runs before a concurrent
// `stop` takes the handle or observes `halted`.
fn arm(inner: &Arc<Inner>) {
    let mut ticker_slot = lock(&inner.ticker);
    if inner.halted.load(Ordering::SeqCst) {
        return;
    }
    if let Some(previous) = ticker_slot.take() {
        previous.abort();
    }

    let weak: Weak<Inner> = Arc::downgrade(inner);
    let period = inner.period;
    let handle = tokio::spawn(async move {
        let mut ticker = interval_at(Instant::now() + period, period);
        loop {
            ticker.tick().await;
            let Some(inner) = weak.upgrade() else {
                break;
            };
            inner.update(Carousel::advance);
        }
    });

    *ticker_slot = Some(handle);
}
