//! Fixed-period background refreshes.
use std::{future::Future, time::Duration};

use tokio::{
    task::JoinHandle,
    time::{self, Instant, MissedTickBehavior},
};
use tracing::trace;

/// `tokio::time::interval` panics on a zero period.
const MIN_PERIOD: Duration = Duration::from_millis(1);

/// Owns the poller tasks of a session. Dropping the handle stops them.
#[derive(Debug, Default)]
pub struct PollerHandle {
    tasks: Vec<JoinHandle<()>>,
}

impl PollerHandle {
    /// Run `tick` every `period`, starting one period from now, until the
    /// handle is stopped.
    ///
    /// Ticks are not deduplicated: a slow `tick` simply delays the next one.
    pub fn spawn<F, Fut>(
        &mut self,
        name: &'static str,
        period: Duration,
        tick: F,
    )
    where
        F: Fn() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let period = period.max(MIN_PERIOD);
        let start = Instant::now() + period;
        let task = tokio::spawn(async move {
            let mut interval = time::interval_at(start, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                trace!(poller = name, "tick");
                tick().await;
            }
        });
        self.tasks.push(task);
    }

    /// Number of pollers still running.
    #[must_use]
    pub fn running(&self) -> usize {
        self.tasks.iter().filter(|task| !task.is_finished()).count()
    }

    /// Abort every poller.
    pub fn stop(&mut self) {
        for task in self.tasks.drain(..) {
            task.abort();
        }
    }
}

impl Drop for PollerHandle {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use std::{
        sync::{
            atomic::{AtomicUsize, Ordering},
            Arc,
        },
        time::Duration,
    };

    use super::PollerHandle;

    fn counting(
        handle: &mut PollerHandle,
        period: Duration,
    ) -> Arc<AtomicUsize> {
        let ticks = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&ticks);
        handle.spawn("counter", period, move || {
            let counter = Arc::clone(&counter);
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
            }
        });
        ticks
    }

    async fn settle() {
        for _ in 0..10 {
            tokio::task::yield_now().await;
        }
    }

    #[tokio::test(start_paused = true)]
    async fn first_tick_waits_one_period() {
        let mut handle = PollerHandle::default();
        let ticks = counting(&mut handle, Duration::from_secs(5));

        settle().await;
        assert_eq!(ticks.load(Ordering::SeqCst), 0);

        tokio::time::advance(Duration::from_secs(5)).await;
        settle().await;
        assert_eq!(ticks.load(Ordering::SeqCst), 1);

        tokio::time::advance(Duration::from_secs(10)).await;
        settle().await;
        assert!(ticks.load(Ordering::SeqCst) >= 2);
    }

    #[tokio::test(start_paused = true)]
    async fn period_counts_from_spawn() {
        let mut handle = PollerHandle::default();
        let ticks = counting(&mut handle, Duration::from_secs(5));

        // The task has not been polled yet when the clock moves.
        tokio::time::advance(Duration::from_secs(5)).await;
        settle().await;
        assert_eq!(ticks.load(Ordering::SeqCst), 1);

        tokio::time::advance(Duration::from_secs(5)).await;
        settle().await;
        assert_eq!(ticks.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn stop_cancels_pending_ticks() {
        let mut handle = PollerHandle::default();
        let ticks = counting(&mut handle, Duration::from_secs(5));
        assert_eq!(handle.running(), 1);

        handle.stop();
        assert_eq!(handle.running(), 0);

        tokio::time::advance(Duration::from_secs(30)).await;
        settle().await;
        assert_eq!(ticks.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn drop_cancels_pending_ticks() {
        let mut handle = PollerHandle::default();
        let ticks = counting(&mut handle, Duration::from_secs(5));
        drop(handle);

        tokio::time::advance(Duration::from_secs(30)).await;
        settle().await;
        assert_eq!(ticks.load(Ordering::SeqCst), 0);
    }
}
