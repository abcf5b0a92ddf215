//! Countdown for timed exams.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{Instant, interval_at};

const TICK: Duration = Duration::from_secs(1);

/// Seconds left on an exam countdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct TimeRemaining(u64);

impl TimeRemaining {
    /// At or below this many seconds the countdown is in its low-time state.
    pub const LOW_TIME_SECS: u64 = 300;

    #[must_use]
    pub fn from_secs(secs: u64) -> Self {
        Self(secs)
    }

    #[must_use]
    pub fn secs(self) -> u64 {
        self.0
    }

    #[must_use]
    pub fn is_low(self) -> bool {
        self.0 <= Self::LOW_TIME_SECS
    }

    #[must_use]
    pub fn is_zero(self) -> bool {
        self.0 == 0
    }
}

impl From<Duration> for TimeRemaining {
    fn from(value: Duration) -> Self {
        Self(value.as_secs())
    }
}

/// `m:ss`, minutes unbounded (`180:00` for a full mock exam).
impl fmt::Display for TimeRemaining {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{:02}", self.0 / 60, self.0 % 60)
    }
}

/// One-shot countdown running on the tokio runtime.
///
/// Calls `on_tick` once per elapsed second with the time left, then
/// `on_expire` exactly once when it reaches zero. Dropping the timer cancels
/// it, so it never outlives its owner.
#[derive(Debug)]
pub struct ExamTimer {
    handle: Option<JoinHandle<()>>,
    expired: Arc<AtomicBool>,
}

impl ExamTimer {
    /// Start counting down from `duration`.
    ///
    /// # Panics
    ///
    /// Panics if called outside a tokio runtime.
    pub fn start<T, E>(duration: Duration, mut on_tick: T, on_expire: E) -> Self
    where
        T: FnMut(TimeRemaining) + Send + 'static,
        E: FnOnce() + Send + 'static,
    {
        let expired = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&expired);
        let total = duration.as_secs();

        let handle = tokio::spawn(async move {
            let mut remaining = total;
            let mut ticker = interval_at(Instant::now() + TICK, TICK);
            while remaining > 0 {
                ticker.tick().await;
                remaining -= 1;
                on_tick(TimeRemaining(remaining));
            }
            flag.store(true, Ordering::SeqCst);
            on_expire();
        });

        Self {
            handle: Some(handle),
            expired,
        }
    }

    /// Stop the countdown. Safe to call repeatedly and after expiry.
    pub fn cancel(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }

    #[must_use]
    pub fn is_expired(&self) -> bool {
        self.expired.load(Ordering::SeqCst)
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }
}

impl Drop for ExamTimer {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use std::sync::atomic::AtomicUsize;

    fn recorder() -> (Arc<Mutex<Vec<u64>>>, Arc<AtomicUsize>) {
        (Arc::new(Mutex::new(Vec::new())), Arc::new(AtomicUsize::new(0)))
    }

    #[test]
    fn remaining_formats_and_flags_low_time() {
        assert_eq!(TimeRemaining::from_secs(10_800).to_string(), "180:00");
        assert_eq!(TimeRemaining::from_secs(65).to_string(), "1:05");
        assert!(!TimeRemaining::from_secs(301).is_low());
        assert!(TimeRemaining::from_secs(300).is_low());
        assert!(TimeRemaining::from(Duration::from_secs(0)).is_zero());
    }

    #[tokio::test(start_paused = true)]
    async fn ticks_every_second_then_expires_once() {
        let (ticks, expirations) = recorder();
        let tick_log = Arc::clone(&ticks);
        let expire_count = Arc::clone(&expirations);

        let timer = ExamTimer::start(
            Duration::from_secs(3),
            move |r| tick_log.lock().unwrap().push(r.secs()),
            move || {
                expire_count.fetch_add(1, Ordering::SeqCst);
            },
        );

        tokio::time::sleep(Duration::from_millis(1_500)).await;
        assert_eq!(*ticks.lock().unwrap(), vec![2]);
        assert!(!timer.is_expired());

        tokio::time::sleep(Duration::from_secs(10)).await;
        assert_eq!(*ticks.lock().unwrap(), vec![2, 1, 0]);
        assert_eq!(expirations.load(Ordering::SeqCst), 1);
        assert!(timer.is_expired());
        assert!(!timer.is_running());
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_stops_ticking_and_is_idempotent() {
        let (ticks, expirations) = recorder();
        let tick_log = Arc::clone(&ticks);
        let expire_count = Arc::clone(&expirations);

        let mut timer = ExamTimer::start(
            Duration::from_secs(10),
            move |r| tick_log.lock().unwrap().push(r.secs()),
            move || {
                expire_count.fetch_add(1, Ordering::SeqCst);
            },
        );

        tokio::time::sleep(Duration::from_millis(2_500)).await;
        timer.cancel();
        timer.cancel();
        tokio::time::sleep(Duration::from_secs(30)).await;

        assert_eq!(*ticks.lock().unwrap(), vec![9, 8]);
        assert_eq!(expirations.load(Ordering::SeqCst), 0);
        assert!(!timer.is_expired());
    }

    #[tokio::test(start_paused = true)]
    async fn dropping_the_timer_cancels_it() {
        let (_, expirations) = recorder();
        let expire_count = Arc::clone(&expirations);

        let timer = ExamTimer::start(Duration::from_secs(2), |_| {}, move || {
            expire_count.fetch_add(1, Ordering::SeqCst);
        });
        drop(timer);

        tokio::time::sleep(Duration::from_secs(5)).await;
        assert_eq!(expirations.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn zero_duration_expires_without_ticks() {
        let (ticks, expirations) = recorder();
        let tick_log = Arc::clone(&ticks);
        let expire_count = Arc::clone(&expirations);

        let timer = ExamTimer::start(
            Duration::ZERO,
            move |r| tick_log.lock().unwrap().push(r.secs()),
            move || {
                expire_count.fetch_add(1, Ordering::SeqCst);
            },
        );
        tokio::time::sleep(Duration::from_millis(10)).await;

        assert!(ticks.lock().unwrap().is_empty());
        assert_eq!(expirations.load(Ordering::SeqCst), 1);
        assert!(timer.is_expired());
    }
}
