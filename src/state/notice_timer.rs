//! Cancellable one-shot timer used to hide the submission notice.
//!
//! The timer runs on the tokio runtime and reports expiry over an
//! `async-channel`, so the GTK thread can pick it up from a local task.
//! Every `arm` bumps a generation counter; consumers ignore expiries whose
//! generation is not the latest one.

use std::time::Duration;

use {
    async_channel::Sender,
    tokio::{runtime::Handle, task::JoinHandle, time::sleep},
    tracing::{debug, trace},
};

/// One-shot timer tied to the lifetime of its owner.
///
/// Dropping the timer aborts any pending expiry.
#[derive(Debug)]
pub struct NoticeTimer {
    /// Runtime the sleeping task is spawned on.
    runtime: Handle,
    /// Delay between `arm` and expiry.
    duration: Duration,
    /// Channel receiving the generation of each expired timer.
    expired_tx: Sender<u64>,
    /// Pending sleep task, if armed.
    pending: Option<JoinHandle<()>>,
    /// Generation of the most recent `arm` call.
    generation: u64,
}

impl NoticeTimer {
    /// Creates a new, unarmed timer.
    ///
    /// # Arguments
    ///
    /// * `runtime` - Tokio runtime handle used to spawn the delay
    /// * `duration` - Delay before expiry
    /// * `expired_tx` - Channel that receives expired generations
    ///
    /// # Returns
    ///
    /// A new `NoticeTimer` instance.
    pub fn new(runtime: Handle, duration: Duration, expired_tx: Sender<u64>) -> Self {
        Self {
            runtime,
            duration,
            expired_tx,
            pending: None,
            generation: 0,
        }
    }

    /// Starts (or restarts) the timer.
    ///
    /// Any previously pending expiry is cancelled.
    ///
    /// # Returns
    ///
    /// The generation that will be reported on expiry.
    pub fn arm(&mut self) -> u64 {
        self.cancel();
        self.generation += 1;

        let generation = self.generation;
        let duration = self.duration;
        let expired_tx = self.expired_tx.clone();

        self.pending = Some(self.runtime.spawn(async move {
            sleep(duration).await;
            trace!(generation, "NoticeTimer: expired");
            // Receiver gone means the owning view was torn down.
            let _ = expired_tx.try_send(generation);
        }));

        debug!(generation, delay = ?duration, "NoticeTimer: armed");
        generation
    }

    /// Aborts the pending expiry, if any.
    pub fn cancel(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
            trace!(generation = self.generation, "NoticeTimer: cancelled");
        }
    }

    /// Whether an expiry is still outstanding.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.pending
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    /// Delay between `arm` and expiry.
    #[must_use]
    pub fn duration(&self) -> Duration {
        self.duration
    }

    /// Generation of the most recent `arm` call (0 if never armed).
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

impl Drop for NoticeTimer {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use {
        async_channel::unbounded,
        tokio::{runtime::Handle, task::yield_now, time::advance},
    };

    use crate::state::notice_timer::NoticeTimer;

    async fn settle() {
        for _ in 0..4 {
            yield_now().await;
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_timer_fires_after_duration() {
        let (tx, rx) = unbounded();
        let mut timer = NoticeTimer::new(Handle::current(), Duration::from_millis(3000), tx);

        let generation = timer.arm();
        settle().await;
        assert_eq!(generation, 1);
        assert!(timer.is_pending());

        advance(Duration::from_millis(2999)).await;
        settle().await;
        assert!(rx.try_recv().is_err());

        advance(Duration::from_millis(1)).await;
        settle().await;
        assert_eq!(rx.try_recv().unwrap(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_rearm_cancels_previous() {
        let (tx, rx) = unbounded();
        let mut timer = NoticeTimer::new(Handle::current(), Duration::from_millis(100), tx);

        timer.arm();
        settle().await;
        advance(Duration::from_millis(50)).await;
        let second = timer.arm();
        settle().await;

        advance(Duration::from_millis(60)).await;
        settle().await;
        assert!(rx.try_recv().is_err());

        advance(Duration::from_millis(40)).await;
        settle().await;
        assert_eq!(rx.try_recv().unwrap(), second);
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_and_drop_prevent_expiry() {
        let (tx, rx) = unbounded();
        let mut timer = NoticeTimer::new(Handle::current(), Duration::from_millis(100), tx.clone());
        timer.arm();
        timer.cancel();
        assert!(!timer.is_pending());

        let mut dropped = NoticeTimer::new(Handle::current(), Duration::from_millis(100), tx);
        dropped.arm();
        drop(dropped);

        advance(Duration::from_millis(500)).await;
        settle().await;
        assert!(rx.try_recv().is_err());
        assert_eq!(timer.generation(), 1);
    }
}
