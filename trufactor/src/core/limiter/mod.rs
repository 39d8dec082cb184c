//! Trailing-edge call suppression
//!
//! [`CallLimiter`] wraps a function so that a burst of calls collapses into a
//! single delivery once the burst has been quiet for the configured window.
//! The delivery always carries the arguments of the most recent call.
//!
//! The limiter runs as a small actor task: every [`CallLimiterHandle::call`]
//! is a message stamped with the time it was made, and the actor keeps only
//! the newest pending message, delivering it when `stamp + delay` passes
//! without a newer message arriving.

use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::{Instant, sleep_until};

#[cfg(test)]
mod tests;

/// Message types for the limiter actor
enum LimiterMessage<A> {
    Call { args: A, at: Instant },
}

/// Handle used to call a rate-limited function
///
/// Calls are fire-and-forget: the wrapped function's result never flows back
/// to the caller. Handles are cheap to clone; the actor keeps running while at
/// least one handle is alive.
pub struct CallLimiterHandle<A> {
    tx: mpsc::UnboundedSender<LimiterMessage<A>>,
}

impl<A> Clone for CallLimiterHandle<A> {
    fn clone(&self) -> Self {
        CallLimiterHandle {
            tx: self.tx.clone(),
        }
    }
}

impl<A> CallLimiterHandle<A> {
    /// Schedule a call with `args`, replacing any call still waiting in the
    /// current window
    ///
    /// Never runs the wrapped function synchronously, even with a zero delay.
    pub fn call(&self, args: A) {
        // Ignore send errors - the actor only goes away with the runtime
        let _ = self.tx.send(LimiterMessage::Call {
            args,
            at: Instant::now(),
        });
    }

    /// Whether the actor task has stopped
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

/// Trailing-edge rate limiter
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use std::sync::atomic::{AtomicU32, Ordering};
/// use std::time::Duration;
/// use trufactor::CallLimiter;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let last = Arc::new(AtomicU32::new(0));
/// let sink = Arc::clone(&last);
/// let limited = CallLimiter::spawn(Duration::from_millis(20), move |value: u32| {
///     sink.store(value, Ordering::SeqCst);
/// });
///
/// for value in 1..=5 {
///     limited.call(value);
/// }
///
/// tokio::time::sleep(Duration::from_millis(100)).await;
/// assert_eq!(last.load(Ordering::SeqCst), 5);
/// # }
/// ```
pub struct CallLimiter;

impl CallLimiter {
    /// Spawn a limiter actor delivering to `f` at most once per `delay` window
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn<A, F>(delay: Duration, f: F) -> CallLimiterHandle<A>
    where
        A: Send + 'static,
        F: FnMut(A) + Send + 'static,
    {
        let (tx, rx) = mpsc::unbounded_channel();

        tokio::spawn(run_limiter(rx, delay, f));

        CallLimiterHandle { tx }
    }
}

async fn run_limiter<A, F>(
    mut rx: mpsc::UnboundedReceiver<LimiterMessage<A>>,
    delay: Duration,
    mut f: F,
) where
    F: FnMut(A),
{
    let mut pending: Option<(A, Instant)> = None;

    loop {
        let Some((args, deadline)) = pending.take() else {
            match rx.recv().await {
                Some(LimiterMessage::Call { args, at }) => {
                    pending = Some((args, at + delay));
                    continue;
                }
                None => break,
            }
        };

        tokio::select! {
            msg = rx.recv() => match msg {
                Some(LimiterMessage::Call { args: next, at }) => {
                    if at >= deadline {
                        // The window closed before this call was made
                        f(args);
                    } else {
                        tracing::trace!("pending call superseded");
                    }
                    pending = Some((next, at + delay));
                }
                None => {
                    // Every handle is gone; the last call still fires on time
                    sleep_until(deadline).await;
                    f(args);
                    break;
                }
            },
            () = sleep_until(deadline) => {
                tracing::trace!("delivering trailing call");
                f(args);
            }
        }
    }

    tracing::trace!("call limiter shutting down");
}
