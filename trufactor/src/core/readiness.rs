//! One-shot readiness latch
//!
//! A [`Readiness`] fires once, a fixed delay after it is created. Every
//! waiter that arrives before the deadline is released together when it
//! fires; waiters that arrive afterwards return immediately.

use std::time::Duration;
use tokio::sync::watch;
use tokio::time::{Instant, sleep_until};

#[derive(Debug, Clone)]
pub struct Readiness {
    rx: watch::Receiver<bool>,
    deadline: Instant,
}

impl Readiness {
    /// Start a latch that fires after `delay`
    ///
    /// Must be called from within a tokio runtime.
    pub fn after(delay: Duration) -> Self {
        let (tx, rx) = watch::channel(false);
        let deadline = Instant::now() + delay;

        tokio::spawn(async move {
            sleep_until(deadline).await;
            tx.send_replace(true);
            tracing::debug!("readiness signal fired");
        });

        Readiness { rx, deadline }
    }

    pub fn is_ready(&self) -> bool {
        *self.rx.borrow()
    }

    /// Wait until the latch has fired
    pub async fn wait(&self) {
        let mut rx = self.rx.clone();
        if rx.wait_for(|ready| *ready).await.is_err() {
            // Timer task is gone without firing (runtime shutting down)
            sleep_until(self.deadline).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::sleep;

    #[tokio::test(start_paused = true)]
    async fn test_waiters_released_together() {
        let readiness = Readiness::after(Duration::from_millis(1000));
        let start = Instant::now();
        assert!(!readiness.is_ready());

        let first = readiness.clone();
        let second = readiness.clone();
        let (a, b) = tokio::join!(
            async move {
                first.wait().await;
                Instant::now()
            },
            async move {
                second.wait().await;
                Instant::now()
            }
        );

        assert_eq!(a, b);
        assert!(a - start >= Duration::from_millis(1000));
        assert!(readiness.is_ready());
    }

    #[tokio::test(start_paused = true)]
    async fn test_late_waiter_returns_immediately() {
        let readiness = Readiness::after(Duration::from_millis(100));
        sleep(Duration::from_millis(500)).await;
        assert!(readiness.is_ready());

        let before = Instant::now();
        readiness.wait().await;
        assert_eq!(Instant::now(), before);

        // Still satisfied on a second wait
        readiness.wait().await;
        assert!(readiness.is_ready());
    }
}
