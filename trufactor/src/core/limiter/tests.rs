use super::CallLimiter;
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{Instant, sleep};

fn recorder() -> (Arc<Mutex<Vec<(u32, Instant)>>>, impl FnMut(u32) + Send + 'static) {
    let calls = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&calls);
    (calls, move |value| sink.lock().push((value, Instant::now())))
}

#[tokio::test(start_paused = true)]
async fn test_burst_collapses_to_last_call() {
    let (calls, f) = recorder();
    let limited = CallLimiter::spawn(Duration::from_millis(50), f);

    for value in 1..=5 {
        limited.call(value);
        sleep(Duration::from_millis(10)).await;
    }
    let last_call = Instant::now() - Duration::from_millis(10);

    sleep(Duration::from_millis(200)).await;

    let calls = calls.lock();
    assert_eq!(calls.len(), 1, "burst should produce exactly one call");
    assert_eq!(calls[0].0, 5);
    assert!(calls[0].1 >= last_call + Duration::from_millis(50));
}

#[tokio::test(start_paused = true)]
async fn test_separated_calls_both_fire() {
    let (calls, f) = recorder();
    let limited = CallLimiter::spawn(Duration::from_millis(50), f);

    limited.call(1);
    sleep(Duration::from_millis(60)).await;
    limited.call(2);
    sleep(Duration::from_millis(60)).await;

    let values: Vec<u32> = calls.lock().iter().map(|(v, _)| *v).collect();
    assert_eq!(values, vec![1, 2]);
}

#[tokio::test(start_paused = true)]
async fn test_call_exactly_one_window_apart_fires_twice() {
    let (calls, f) = recorder();
    let limited = CallLimiter::spawn(Duration::from_millis(50), f);

    limited.call(1);
    sleep(Duration::from_millis(50)).await;
    limited.call(2);
    sleep(Duration::from_millis(100)).await;

    assert_eq!(calls.lock().len(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_zero_delay_is_deferred() {
    let (calls, f) = recorder();
    let limited = CallLimiter::spawn(Duration::ZERO, f);

    limited.call(7);
    assert!(calls.lock().is_empty(), "zero delay must not run synchronously");

    sleep(Duration::from_millis(1)).await;
    let calls = calls.lock();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].0, 7);
}

#[tokio::test(start_paused = true)]
async fn test_nothing_fires_inside_window() {
    let (calls, f) = recorder();
    let limited = CallLimiter::spawn(Duration::from_millis(50), f);

    limited.call(1);
    sleep(Duration::from_millis(40)).await;
    assert!(calls.lock().is_empty());

    sleep(Duration::from_millis(20)).await;
    assert_eq!(calls.lock().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_pending_call_survives_handle_drop() {
    let (calls, f) = recorder();
    let limited = CallLimiter::spawn(Duration::from_millis(50), f);

    limited.call(3);
    drop(limited);

    sleep(Duration::from_millis(100)).await;
    let calls = calls.lock();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].0, 3);
}

#[tokio::test(start_paused = true)]
async fn test_cloned_handles_share_window() {
    let (calls, f) = recorder();
    let limited = CallLimiter::spawn(Duration::from_millis(50), f);
    let other = limited.clone();

    limited.call(1);
    sleep(Duration::from_millis(10)).await;
    other.call(2);
    sleep(Duration::from_millis(100)).await;

    let values: Vec<u32> = calls.lock().iter().map(|(v, _)| *v).collect();
    assert_eq!(values, vec![2]);
    assert!(!limited.is_closed());
}

#[tokio::test(start_paused = true)]
async fn test_tuple_arguments() {
    let seen = Arc::new(Mutex::new(None));
    let sink = Arc::clone(&seen);
    let limited = CallLimiter::spawn(Duration::from_millis(5), move |(a, b): (u8, &'static str)| {
        *sink.lock() = Some((a, b));
    });

    limited.call((1, "first"));
    limited.call((2, "second"));
    sleep(Duration::from_millis(20)).await;

    assert_eq!(*seen.lock(), Some((2, "second")));
}
