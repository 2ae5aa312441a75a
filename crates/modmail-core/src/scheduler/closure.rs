//! Closure Scheduler - closes threads after a delay.
//!
//! A thread has at most one pending close. The pending close leaves the
//! table exactly once: either the timer task takes it and closes the thread,
//! or a cancellation takes it and the timer is stopped. Whoever removes the
//! entry under the table lock wins; the other side sees nothing.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::Mutex;
use tokio::time::sleep;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

use crate::channel::ThreadRegistry;
use crate::error::{ModmailError, Result};
use crate::models::CloseRequest;

/// A pending close of one thread.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClosureSchedule {
    pub schedule_id: u64,
    pub thread_id: u64,
    pub fire_at: DateTime<Utc>,
    pub closer_id: u64,
    pub message: Option<String>,
    pub silent: bool,
}

impl ClosureSchedule {
    fn close_request(&self) -> CloseRequest {
        CloseRequest {
            closer_id: self.closer_id,
            message: self.message.clone(),
            silent: self.silent,
        }
    }
}

/// Notified after the scheduler closed a thread.
#[async_trait]
pub trait CloseListener: Send + Sync {
    async fn thread_closed(&self, thread_id: u64);
}

struct PendingClose {
    schedule: ClosureSchedule,
    cancel: CancellationToken,
}

struct SchedulerInner {
    /// Pending closes per thread
    pending: Mutex<HashMap<u64, PendingClose>>,
    registry: Arc<dyn ThreadRegistry>,
    listener: Option<Arc<dyn CloseListener>>,
    next_id: AtomicU64,
}

impl SchedulerInner {
    /// Timer expiry: close the thread if the schedule is still the pending one.
    async fn fire(&self, thread_id: u64, schedule_id: u64) {
        let taken = {
            let mut pending = self.pending.lock().await;
            match pending.get(&thread_id) {
                Some(entry) if entry.schedule.schedule_id == schedule_id => {
                    pending.remove(&thread_id)
                }
                _ => None,
            }
        };

        let Some(entry) = taken else {
            debug!(
                "Closure {} for thread {} was cancelled before firing",
                schedule_id, thread_id
            );
            return;
        };

        info!(
            thread_id,
            closer_id = entry.schedule.closer_id,
            silent = entry.schedule.silent,
            "Closing thread on schedule"
        );
        match self
            .registry
            .close(thread_id, entry.schedule.close_request())
            .await
        {
            Ok(()) => {
                if let Some(listener) = &self.listener {
                    listener.thread_closed(thread_id).await;
                }
            }
            Err(e) => error!("Scheduled close of thread {} failed: {}", thread_id, e),
        }
    }
}

/// Per-thread delayed close with cancel-on-activity.
#[derive(Clone)]
pub struct ClosureScheduler {
    inner: Arc<SchedulerInner>,
}

impl ClosureScheduler {
    pub fn new(registry: Arc<dyn ThreadRegistry>) -> Self {
        Self::build(registry, None)
    }

    /// Scheduler that tells `listener` about every thread it closed.
    pub fn with_close_listener(
        registry: Arc<dyn ThreadRegistry>,
        listener: Arc<dyn CloseListener>,
    ) -> Self {
        Self::build(registry, Some(listener))
    }

    fn build(
        registry: Arc<dyn ThreadRegistry>,
        listener: Option<Arc<dyn CloseListener>>,
    ) -> Self {
        Self {
            inner: Arc::new(SchedulerInner {
                pending: Mutex::new(HashMap::new()),
                registry,
                listener,
                next_id: AtomicU64::new(1),
            }),
        }
    }

    /// Schedule a close of `thread_id` at `fire_at`.
    ///
    /// Fails with [`ModmailError::AlreadyScheduled`] while another close is
    /// pending; cancel it first to replace it.
    pub async fn schedule(
        &self,
        thread_id: u64,
        fire_at: DateTime<Utc>,
        closer_id: u64,
        message: Option<String>,
        silent: bool,
    ) -> Result<ClosureSchedule> {
        let schedule = {
            let mut pending = self.inner.pending.lock().await;
            if pending.contains_key(&thread_id) {
                return Err(ModmailError::AlreadyScheduled);
            }

            let schedule = ClosureSchedule {
                schedule_id: self.inner.next_id.fetch_add(1, Ordering::SeqCst),
                thread_id,
                fire_at,
                closer_id,
                message,
                silent,
            };
            let cancel = CancellationToken::new();
            pending.insert(
                thread_id,
                PendingClose {
                    schedule: schedule.clone(),
                    cancel: cancel.clone(),
                },
            );

            let delay = (fire_at - Utc::now()).to_std().unwrap_or_default();
            let inner = self.inner.clone();
            let schedule_id = schedule.schedule_id;
            tokio::spawn(async move {
                tokio::select! {
                    _ = cancel.cancelled() => return,
                    _ = sleep(delay) => {}
                }
                inner.fire(thread_id, schedule_id).await;
            });

            schedule
        };

        debug!(
            "Thread {} scheduled to close at {} (schedule {})",
            thread_id, schedule.fire_at, schedule.schedule_id
        );
        Ok(schedule)
    }

    /// Cancel the pending close of `thread_id`.
    ///
    /// Returns whether a close was pending. A close that already fired is
    /// reported as absent.
    pub async fn cancel(&self, thread_id: u64) -> bool {
        let removed = self.inner.pending.lock().await.remove(&thread_id);
        match removed {
            Some(entry) => {
                entry.cancel.cancel();
                debug!(
                    "Cancelled closure {} for thread {}",
                    entry.schedule.schedule_id, thread_id
                );
                true
            }
            None => false,
        }
    }

    /// Drop any pending close because the thread received a message.
    pub async fn cancel_on_activity(&self, thread_id: u64) {
        if self.cancel(thread_id).await {
            info!("Scheduled close of thread {} cancelled by activity", thread_id);
        }
    }

    pub async fn get(&self, thread_id: u64) -> Option<ClosureSchedule> {
        self.inner
            .pending
            .lock()
            .await
            .get(&thread_id)
            .map(|entry| entry.schedule.clone())
    }

    pub async fn is_scheduled(&self, thread_id: u64) -> bool {
        self.inner.pending.lock().await.contains_key(&thread_id)
    }

    pub async fn pending_count(&self) -> usize {
        self.inner.pending.lock().await.len()
    }

    /// Cancel every pending close, e.g. on shutdown.
    pub async fn shutdown(&self) {
        let drained: Vec<PendingClose> = {
            let mut pending = self.inner.pending.lock().await;
            pending.drain().map(|(_, entry)| entry).collect()
        };
        for entry in &drained {
            entry.cancel.cancel();
        }
        debug!("Closure scheduler stopped {} pending closes", drained.len());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testkit::MockThreadRegistry;
    use chrono::Duration as ChronoDuration;
    use tokio::time::Duration;

    fn scheduler() -> (ClosureScheduler, Arc<MockThreadRegistry>) {
        let registry = Arc::new(MockThreadRegistry::new());
        (ClosureScheduler::new(registry.clone()), registry)
    }

    fn in_millis(ms: i64) -> DateTime<Utc> {
        Utc::now() + ChronoDuration::milliseconds(ms)
    }

    #[tokio::test]
    async fn test_fires_once_and_clears_schedule() {
        let (scheduler, registry) = scheduler();

        scheduler
            .schedule(7, in_millis(30), 1, Some("Resolved".to_string()), false)
            .await
            .unwrap();
        assert!(scheduler.is_scheduled(7).await);

        sleep(Duration::from_millis(150)).await;

        assert!(!scheduler.is_scheduled(7).await);
        let closed = registry.closed.lock().await;
        assert_eq!(closed.len(), 1);
        assert_eq!(
            closed[0],
            (
                7,
                CloseRequest {
                    closer_id: 1,
                    message: Some("Resolved".to_string()),
                    silent: false,
                }
            )
        );
    }

    #[derive(Default)]
    struct RecordingListener {
        closed: Mutex<Vec<u64>>,
    }

    #[async_trait]
    impl CloseListener for RecordingListener {
        async fn thread_closed(&self, thread_id: u64) {
            self.closed.lock().await.push(thread_id);
        }
    }

    #[tokio::test]
    async fn test_listener_hears_fired_closes_only() {
        let registry = Arc::new(MockThreadRegistry::new());
        let listener = Arc::new(RecordingListener::default());
        let scheduler = ClosureScheduler::with_close_listener(registry, listener.clone());

        scheduler.schedule(7, in_millis(30), 1, None, false).await.unwrap();
        scheduler.schedule(8, in_millis(30), 1, None, false).await.unwrap();
        assert!(scheduler.cancel(8).await);

        sleep(Duration::from_millis(150)).await;
        assert_eq!(*listener.closed.lock().await, vec![7]);
    }

    #[tokio::test]
    async fn test_second_schedule_rejected() {
        let (scheduler, _registry) = scheduler();

        scheduler
            .schedule(7, in_millis(60_000), 1, None, false)
            .await
            .unwrap();
        let err = scheduler
            .schedule(7, in_millis(1_000), 2, None, true)
            .await
            .unwrap_err();
        assert!(matches!(err, ModmailError::AlreadyScheduled));
        assert_eq!(scheduler.get(7).await.unwrap().closer_id, 1);

        // Other threads are independent
        scheduler
            .schedule(8, in_millis(60_000), 1, None, false)
            .await
            .unwrap();
        assert_eq!(scheduler.pending_count().await, 2);
        scheduler.shutdown().await;
    }

    #[tokio::test]
    async fn test_cancel_is_idempotent() {
        let (scheduler, registry) = scheduler();

        scheduler
            .schedule(7, in_millis(50), 1, None, false)
            .await
            .unwrap();

        assert!(scheduler.cancel(7).await);
        assert!(!scheduler.cancel(7).await);

        sleep(Duration::from_millis(150)).await;
        assert_eq!(registry.close_count(7).await, 0);
    }

    #[tokio::test]
    async fn test_replace_after_cancel() {
        let (scheduler, registry) = scheduler();

        scheduler
            .schedule(7, in_millis(40), 1, None, false)
            .await
            .unwrap();
        assert!(scheduler.cancel(7).await);
        scheduler
            .schedule(7, in_millis(40), 2, None, true)
            .await
            .unwrap();

        sleep(Duration::from_millis(150)).await;
        let closed = registry.closed.lock().await;
        assert_eq!(closed.len(), 1);
        assert_eq!(closed[0].1.closer_id, 2);
        assert!(closed[0].1.silent);
    }

    #[tokio::test]
    async fn test_cancel_on_activity_without_schedule() {
        let (scheduler, _registry) = scheduler();
        scheduler.cancel_on_activity(42).await;
        assert!(!scheduler.is_scheduled(42).await);
    }

    #[tokio::test]
    async fn test_activity_cancels_pending_close() {
        let (scheduler, registry) = scheduler();

        scheduler
            .schedule(7, in_millis(50), 1, None, false)
            .await
            .unwrap();
        scheduler.cancel_on_activity(7).await;

        sleep(Duration::from_millis(150)).await;
        assert_eq!(registry.close_count(7).await, 0);
    }

    #[tokio::test]
    async fn test_cancel_and_fire_are_exclusive() {
        for _ in 0..20 {
            let (scheduler, registry) = scheduler();

            scheduler
                .schedule(7, Utc::now(), 1, None, false)
                .await
                .unwrap();
            tokio::task::yield_now().await;
            let cancelled = scheduler.cancel(7).await;

            sleep(Duration::from_millis(20)).await;
            let fired = registry.close_count(7).await;
            assert_eq!(cancelled as usize + fired, 1);
        }
    }
}
