//! Tests for network::reconnect

use std::time::Duration;

use crewline_core::{ReconnectConfig, ReconnectPolicy};

#[test]
fn test_reference_backoff_sequence() {
    let mut policy = ReconnectPolicy::new(ReconnectConfig::default());

    assert_eq!(policy.next_delay(), Some(Duration::from_millis(5_000)));
    assert_eq!(policy.next_delay(), Some(Duration::from_millis(7_500)));
    assert_eq!(policy.next_delay(), Some(Duration::from_millis(11_250)));
    assert_eq!(policy.next_delay(), Some(Duration::from_millis(16_875)));
    // 16875 * 1.5 = 25312.5 ms; the fraction is preserved.
    assert_eq!(policy.next_delay(), Some(Duration::from_micros(25_312_500)));

    // Give-up after the fifth failure.
    assert_eq!(policy.next_delay(), None);
    assert_eq!(policy.next_delay(), None);
    assert!(policy.exhausted());
    assert_eq!(policy.attempts(), 5);
}

#[test]
fn test_reset_restarts_the_sequence() {
    let mut policy = ReconnectPolicy::new(ReconnectConfig::default());
    policy.next_delay();
    policy.next_delay();

    policy.reset();
    assert_eq!(policy.attempts(), 0);
    assert!(!policy.exhausted());
    assert_eq!(policy.next_delay(), Some(Duration::from_millis(5_000)));
}

#[test]
fn test_reset_after_exhaustion_reopens_budget() {
    let mut config = ReconnectConfig::default();
    config.max_attempts = 2;
    let mut policy = ReconnectPolicy::new(config);

    assert!(policy.next_delay().is_some());
    assert!(policy.next_delay().is_some());
    assert_eq!(policy.next_delay(), None);

    policy.reset();
    assert_eq!(policy.next_delay(), Some(Duration::from_millis(5_000)));
}
