// src/utils/cancel.rs
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Notify;

use crate::errors::HubFinderError;

#[derive(Debug, Default)]
struct Flag {
    cancelled: AtomicBool,
    notify: Notify,
}

/// Cancellation flag shared between the caller and a running search, with an
/// optional deadline. Clones observe the same flag.
#[derive(Debug, Clone, Default)]
pub struct CancellationSignal {
    flag: Arc<Flag>,
    deadline: Option<Instant>,
}

impl CancellationSignal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Signal that also trips once `timeout` has elapsed from now.
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            flag: Arc::default(),
            deadline: Some(Instant::now() + timeout),
        }
    }

    pub fn cancel(&self) {
        self.flag.cancelled.store(true, Ordering::SeqCst);
        self.flag.notify.notify_waiters();
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.cancelled.load(Ordering::SeqCst)
            || self.deadline.map_or(false, |deadline| Instant::now() >= deadline)
    }

    /// `Err(Cancelled)` once the signal has tripped.
    pub fn check(&self) -> Result<(), HubFinderError> {
        if self.is_cancelled() {
            Err(HubFinderError::Cancelled)
        } else {
            Ok(())
        }
    }

    /// Resolves when `cancel` is called or the deadline passes, whichever
    /// comes first. Meant to be raced against in-flight work with `select!`.
    pub async fn cancelled(&self) {
        let flagged = async {
            loop {
                // registered before the flag is read so a concurrent cancel is not missed
                let notified = self.flag.notify.notified();
                if self.flag.cancelled.load(Ordering::SeqCst) {
                    return;
                }
                notified.await;
            }
        };

        match self.deadline {
            Some(deadline) => {
                tokio::select! {
                    _ = flagged => {}
                    _ = tokio::time::sleep_until(tokio::time::Instant::from_std(deadline)) => {}
                }
            }
            None => flagged.await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::timeout;

    #[test]
    fn test_clones_share_flag() {
        let signal = CancellationSignal::new();
        let handle = signal.clone();
        assert!(signal.check().is_ok());

        handle.cancel();
        assert!(signal.is_cancelled());
        assert!(matches!(signal.check(), Err(HubFinderError::Cancelled)));
    }

    #[test]
    fn test_deadline_trips() {
        let expired = CancellationSignal::with_timeout(Duration::ZERO);
        assert!(expired.is_cancelled());

        let distant = CancellationSignal::with_timeout(Duration::from_secs(3600));
        assert!(!distant.is_cancelled());
    }

    #[tokio::test]
    async fn test_cancelled_wakes_on_cancel() {
        let signal = CancellationSignal::new();
        let handle = signal.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(50)).await;
            handle.cancel();
        });

        assert!(timeout(Duration::from_secs(5), signal.cancelled()).await.is_ok());
        assert!(signal.is_cancelled());
    }

    #[tokio::test]
    async fn test_cancelled_returns_at_once_when_already_cancelled() {
        let signal = CancellationSignal::new();
        signal.cancel();
        assert!(timeout(Duration::from_millis(100), signal.cancelled()).await.is_ok());
    }

    #[tokio::test]
    async fn test_cancelled_wakes_at_deadline() {
        let signal = CancellationSignal::with_timeout(Duration::from_millis(50));
        assert!(timeout(Duration::from_secs(5), signal.cancelled()).await.is_ok());
        assert!(signal.is_cancelled());
    }

    #[tokio::test]
    async fn test_cancelled_pending_without_trigger() {
        let signal = CancellationSignal::new();
        assert!(timeout(Duration::from_millis(50), signal.cancelled()).await.is_err());
    }
}
