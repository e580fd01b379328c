//! Tests for api::client

mod common;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use common::{counts, group_note, note, wait_until};
use crewline_core::{
    ClientConfig, ConnectionState, MockBackend, NewNotification, NotificationClient,
    NotificationKind, NotifyEvent, ReconnectConfig, TransportKind,
};

fn stream_config() -> ClientConfig {
    ClientConfig::new("https://app.crewline.test", "user-1").with_reconnect(ReconnectConfig {
        initial_delay_ms: 100.0,
        backoff_factor: 2.0,
        max_delay_ms: 1_000.0,
        max_attempts: 2,
    })
}

fn poll_config() -> ClientConfig {
    ClientConfig::new("https://app.crewline.test", "user-1").with_transport(TransportKind::LongPoll)
}

#[tokio::test(start_paused = true)]
async fn test_bootstrap_then_stream_delivery_updates_store_and_counts() {
    let backend = MockBackend::new();
    backend.set_notifications(vec![
        group_note("a", "g1", NotificationKind::Message),
        group_note("b", "g1", NotificationKind::Message),
    ]);
    backend.set_counts(counts(&[("g1", NotificationKind::Message, 2)]));

    let mut client = NotificationClient::with_mock(stream_config(), backend.clone());
    client.bootstrap().await.unwrap();

    let ids: Vec<_> = client.notifications().iter().map(|n| n.id.clone()).collect();
    assert_eq!(ids, vec!["a", "b"]);
    assert_eq!(
        client.unread_count_for_group("g1", Some(NotificationKind::Message)),
        2
    );

    // The next counter refetch sees the new notification reflected.
    backend.queue_counts(counts(&[("g1", NotificationKind::Message, 3)]));
    wait_until(|| backend.stream_opens() == 1).await;
    assert!(backend.push_stream_line(concat!(
        r#"{"type":"notification","id":"c","notificationType":"message","#,
        r#""title":"hi","message":"body","groupId":"g1","senderId":"u9","#,
        r#""createdAt":"2026-02-11T09:31:00Z"}"#
    )));

    wait_until(|| client.notifications().len() == 3).await;
    let ids: Vec<_> = client.notifications().iter().map(|n| n.id.clone()).collect();
    assert_eq!(ids, vec!["c", "a", "b"]);

    wait_until(|| backend.counts_fetches() == 2).await;
    assert_eq!(
        client.unread_count_for_group("g1", Some(NotificationKind::Message)),
        3
    );

    client.teardown();
}

#[tokio::test(start_paused = true)]
async fn test_bootstrap_is_idempotent_while_running() {
    let backend = MockBackend::new();
    let mut client = NotificationClient::with_mock(stream_config(), backend.clone());

    client.bootstrap().await.unwrap();
    client.bootstrap().await.unwrap();
    client.bootstrap().await.unwrap();

    // One transport, one initial counter fetch; repeated mounts changed
    // nothing.
    assert_eq!(backend.stream_opens(), 1);
    assert_eq!(backend.counts_fetches(), 1);
    assert!(client.is_started());

    client.teardown();
}

#[tokio::test(start_paused = true)]
async fn test_bootstrap_failure_starts_nothing_and_can_be_retried() {
    let backend = MockBackend::new();
    backend.fail_fetches(true);

    let mut client = NotificationClient::with_mock(stream_config(), backend.clone());
    assert!(client.bootstrap().await.is_err());
    assert!(!client.is_started());
    assert_eq!(backend.stream_opens(), 0);
    assert!(client.last_error().is_some());

    backend.fail_fetches(false);
    client.bootstrap().await.unwrap();
    assert!(client.is_started());
    assert!(client.last_error().is_none());

    client.teardown();
}

#[tokio::test(start_paused = true)]
async fn test_mark_as_read_writes_through_and_refetches_counts() {
    let backend = MockBackend::new();
    backend.set_notifications(vec![group_note("n1", "g1", NotificationKind::Message)]);
    backend.set_counts(counts(&[("g1", NotificationKind::Message, 1)]));

    let mut client = NotificationClient::with_mock(poll_config(), backend.clone());
    client.bootstrap().await.unwrap();

    backend.queue_counts(counts(&[]));
    client.mark_as_read("n1").await.unwrap();

    assert!(client.notifications()[0].read);
    assert_eq!(backend.marked_read(), vec!["n1"]);
    assert_eq!(client.unread_count(), 0);

    client.teardown();
}

#[tokio::test(start_paused = true)]
async fn test_failed_write_keeps_optimistic_state() {
    let backend = MockBackend::new();
    backend.set_notifications(vec![note("n1")]);

    let mut client = NotificationClient::with_mock(poll_config(), backend.clone());
    client.bootstrap().await.unwrap();

    backend.fail_writes(true);
    assert!(client.mark_as_read("n1").await.is_err());

    // Local state stays ahead of the server: flipped, not rolled back.
    assert!(client.notifications()[0].read);
    assert!(backend.marked_read().is_empty());
    assert!(client.last_error().is_some());

    client.teardown();
}

#[tokio::test(start_paused = true)]
async fn test_repeated_mark_as_read_emits_one_event() {
    let backend = MockBackend::new();
    backend.set_notifications(vec![note("n1")]);

    let mut client = NotificationClient::with_mock(poll_config(), backend.clone());
    let flips = Arc::new(AtomicUsize::new(0));
    let flips_clone = flips.clone();
    client.on_event(move |event| {
        if matches!(event, NotifyEvent::MarkedRead { .. }) {
            flips_clone.fetch_add(1, Ordering::SeqCst);
        }
    });
    client.bootstrap().await.unwrap();

    client.mark_as_read("n1").await.unwrap();
    client.mark_as_read("n1").await.unwrap();

    assert_eq!(flips.load(Ordering::SeqCst), 1);
    assert!(client.notifications()[0].read);

    client.teardown();
}

#[tokio::test(start_paused = true)]
async fn test_group_and_all_marks_write_through() {
    let backend = MockBackend::new();
    backend.set_notifications(vec![
        group_note("m1", "g1", NotificationKind::Message),
        group_note("m2", "g2", NotificationKind::Invite),
    ]);

    let mut client = NotificationClient::with_mock(poll_config(), backend.clone());
    client.bootstrap().await.unwrap();

    client
        .mark_group_as_read("g1", Some(NotificationKind::Message))
        .await
        .unwrap();
    assert_eq!(
        backend.marked_groups(),
        vec![("g1".to_string(), Some(NotificationKind::Message))]
    );
    assert!(client.notifications().iter().any(|n| n.id == "m1" && n.read));
    assert!(client.notifications().iter().any(|n| n.id == "m2" && !n.read));

    client.mark_all_as_read().await.unwrap();
    assert_eq!(backend.mark_all_calls(), 1);
    assert!(client.notifications().iter().all(|n| n.read));

    client.teardown();
}

#[tokio::test(start_paused = true)]
async fn test_create_notification_surfaces_only_for_recipient() {
    let backend = MockBackend::new();
    let client = NotificationClient::with_mock(poll_config(), backend.clone());

    // Addressed to someone else: server write only.
    client
        .create_notification(
            NewNotification::new(NotificationKind::Invite, "join", "come along")
                .with_group("g1")
                .with_target("user-2"),
        )
        .await
        .unwrap();
    assert!(client.notifications().is_empty());

    // Addressed to ourselves.
    client
        .create_notification(
            NewNotification::new(NotificationKind::Message, "hi", "there").with_target("user-1"),
        )
        .await
        .unwrap();
    assert_eq!(client.notifications().len(), 1);

    // No explicit target counts as ours.
    client
        .create_notification(NewNotification::new(NotificationKind::Intent, "new", "intent"))
        .await
        .unwrap();
    assert_eq!(client.notifications().len(), 2);

    assert_eq!(backend.created().len(), 3);
}

#[tokio::test(start_paused = true)]
async fn test_teardown_blocks_late_deliveries_and_polls() {
    let backend = MockBackend::new();
    backend.set_notifications(vec![note("n1")]);

    let mut client = NotificationClient::with_mock(poll_config(), backend.clone());
    client.bootstrap().await.unwrap();

    // The first pull is in flight, held server-side.
    wait_until(|| backend.poll_calls().len() == 1).await;
    client.teardown();

    // A response resolving after teardown must not touch the store.
    assert!(!client.shared().deliver(note("late")));
    assert_eq!(client.notifications().len(), 1);

    // And the loop must not reschedule itself.
    tokio::time::sleep(Duration::from_secs(60)).await;
    assert_eq!(backend.poll_calls().len(), 1);
    assert_eq!(client.connection_state(), ConnectionState::Disconnected);
}

#[tokio::test(start_paused = true)]
async fn test_teardown_twice_is_safe() {
    let backend = MockBackend::new();
    let mut client = NotificationClient::with_mock(poll_config(), backend.clone());
    client.bootstrap().await.unwrap();

    client.teardown();
    client.teardown();
    assert!(!client.is_started());
}

#[tokio::test(start_paused = true)]
async fn test_restart_recovers_after_stream_give_up() {
    let backend = MockBackend::new();
    for _ in 0..3 {
        backend.fail_next_stream_open(502);
    }

    let mut client = NotificationClient::with_mock(stream_config(), backend.clone());
    client.bootstrap().await.unwrap();

    // Budget of two: initial attempt + two retries, then terminal give-up.
    wait_until(|| backend.stream_opens() == 3).await;
    tokio::time::sleep(Duration::from_secs(30)).await;
    assert_eq!(backend.stream_opens(), 3);

    // Manual restart is the only way back; this time the connect succeeds.
    client.restart().unwrap();
    wait_until(|| backend.stream_opens() == 4).await;
    assert!(backend.push_stream_line(r#"{"type":"ping"}"#));
    wait_until(|| client.connection_state() == ConnectionState::Connected).await;

    client.teardown();
}

#[tokio::test(start_paused = true)]
async fn test_fetch_notifications_replaces_store() {
    let backend = MockBackend::new();
    backend.set_notifications(vec![note("n1")]);

    let mut client = NotificationClient::with_mock(poll_config(), backend.clone());
    client.bootstrap().await.unwrap();
    assert_eq!(client.notifications().len(), 1);

    backend.set_notifications(vec![note("n1"), note("n2"), note("n3")]);
    let refreshed = client.fetch_notifications().await.unwrap();
    assert_eq!(refreshed.len(), 3);
    assert_eq!(client.notifications().len(), 3);

    client.teardown();
}
