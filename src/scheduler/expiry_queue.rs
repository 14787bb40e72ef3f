//! Deadline queue closing meetings when their `actual_until` passes.
//!
//! One task owns a `DelayQueue` holding at most one entry per meeting. Scheduling a meeting
//! that is already queued moves its entry to the new deadline instead of adding another.
//! When an entry fires the handler is spawned with the meeting id. It must tolerate meetings
//! that are no longer due, and returns their new deadline to have them queued again.

use std::{collections::HashMap, future::Future, time::Duration};

use chrono::{DateTime, Utc};
use tokio::sync::mpsc;
use tokio_util::time::{delay_queue::Key, DelayQueue};

/// Handle for adding meetings to the deadline queue. Cheap to clone.
#[derive(Clone)]
pub struct ExpiryQueue {
    tx: mpsc::UnboundedSender<(i32, DateTime<Utc>)>,
}

impl ExpiryQueue {
    /// Spawns the queue task.
    ///
    /// # Arguments
    /// - `handler` - Called with the meeting id once its deadline has passed; a returned
    ///   deadline queues the meeting again
    ///
    /// # Returns
    /// - `ExpiryQueue` - Handle used to schedule meetings
    pub fn start<F, Fut>(handler: F) -> Self
    where
        F: Fn(i32) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Option<DateTime<Utc>>> + Send + 'static,
    {
        let (tx, rx) = mpsc::unbounded_channel();
        tokio::spawn(run_queue(tx.downgrade(), rx, handler));

        Self { tx }
    }

    /// Schedules a meeting to be expired at `deadline`.
    ///
    /// Deadlines in the past fire right away.
    pub fn schedule(&self, meeting_id: i32, deadline: DateTime<Utc>) {
        if self.tx.send((meeting_id, deadline)).is_err() {
            tracing::error!(
                "Expiry queue stopped, meeting {} was not scheduled",
                meeting_id
            );
        }
    }
}

async fn run_queue<F, Fut>(
    requeue: mpsc::WeakUnboundedSender<(i32, DateTime<Utc>)>,
    mut rx: mpsc::UnboundedReceiver<(i32, DateTime<Utc>)>,
    handler: F,
) where
    F: Fn(i32) -> Fut,
    Fut: Future<Output = Option<DateTime<Utc>>> + Send + 'static,
{
    let mut queue: DelayQueue<i32> = DelayQueue::new();
    let mut entries: HashMap<i32, (Key, DateTime<Utc>)> = HashMap::new();

    loop {
        tokio::select! {
            request = rx.recv() => {
                let Some((meeting_id, deadline)) = request else {
                    break;
                };
                let delay = (deadline - Utc::now()).to_std().unwrap_or(Duration::ZERO);

                match entries.get_mut(&meeting_id) {
                    Some((_, queued)) if *queued == deadline => {}
                    Some((key, queued)) => {
                        queue.reset(key, delay);
                        *queued = deadline;
                    }
                    None => {
                        let key = queue.insert(meeting_id, delay);
                        entries.insert(meeting_id, (key, deadline));
                    }
                }
            }
            Some(expired) = std::future::poll_fn(|cx| queue.poll_expired(cx)), if !queue.is_empty() => {
                let meeting_id = expired.into_inner();
                entries.remove(&meeting_id);

                tracing::debug!("Deadline of meeting {} reached", meeting_id);
                let fired = handler(meeting_id);
                let requeue = requeue.clone();
                tokio::spawn(async move {
                    let Some(deadline) = fired.await else {
                        return;
                    };
                    // Every handle dropped means the queue is shutting down
                    if let Some(tx) = requeue.upgrade() {
                        let _ = tx.send((meeting_id, deadline));
                    }
                });
            }
        }
    }

    tracing::info!("Expiry queue stopped");
}
