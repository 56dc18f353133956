//! Elapsed-time polling while a track plays

use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tracing::trace;

/// Background task invoking a tick callback at a fixed period
///
/// The task ends when the callback returns `false`, when [`stop`](Self::stop)
/// is called, or when the poller is dropped.
pub struct PositionPoller {
    period: Duration,
    handle: Option<JoinHandle<()>>,
}

impl PositionPoller {
    pub fn new(period: Duration) -> Self {
        Self {
            period,
            handle: None,
        }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// Start polling, replacing any running task
    ///
    /// Must be called from within a tokio runtime.
    pub fn start<F>(&mut self, mut on_tick: F)
    where
        F: FnMut() -> bool + Send + 'static,
    {
        self.stop();

        let period = self.period;
        self.handle = Some(tokio::spawn(async move {
            let mut ticker = interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // First tick completes immediately
            ticker.tick().await;

            loop {
                ticker.tick().await;
                trace!("Position tick");
                if !on_tick() {
                    break;
                }
            }
        }));
    }

    pub fn stop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }

    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }
}

impl Drop for PositionPoller {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[tokio::test(start_paused = true)]
    async fn ticks_at_period_until_stopped() {
        let ticks = Arc::new(AtomicUsize::new(0));
        let mut poller = PositionPoller::new(Duration::from_millis(1000));

        let counter = Arc::clone(&ticks);
        poller.start(move || {
            counter.fetch_add(1, Ordering::SeqCst);
            true
        });
        assert!(poller.is_running());

        tokio::time::sleep(Duration::from_millis(3500)).await;
        assert_eq!(ticks.load(Ordering::SeqCst), 3);

        poller.stop();
        assert!(!poller.is_running());

        tokio::time::sleep(Duration::from_millis(5000)).await;
        assert_eq!(ticks.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn callback_can_end_the_task() {
        let ticks = Arc::new(AtomicUsize::new(0));
        let mut poller = PositionPoller::new(Duration::from_millis(100));

        let counter = Arc::clone(&ticks);
        poller.start(move || counter.fetch_add(1, Ordering::SeqCst) < 1);

        tokio::time::sleep(Duration::from_millis(1000)).await;
        assert_eq!(ticks.load(Ordering::SeqCst), 2);
        assert!(!poller.is_running());
    }
}
