//! Tests for notifications::counters

mod common;

use common::counts;
use crewline_core::{NotificationKind, UnreadCounters};

#[test]
fn test_missing_keys_read_as_zero() {
    let counters = UnreadCounters::new();

    assert_eq!(counters.get("ghost", None), 0);
    assert_eq!(counters.get("ghost", Some(NotificationKind::Message)), 0);
    assert_eq!(counters.total(), 0);
}

#[test]
fn test_groupwide_query_equals_per_kind_sum() {
    let mut counters = UnreadCounters::new();
    counters.replace(counts(&[
        ("g1", NotificationKind::Message, 3),
        ("g1", NotificationKind::Invite, 2),
        ("g1", NotificationKind::Intent, 1),
        ("g2", NotificationKind::Message, 7),
    ]));

    let per_kind_sum = counters.get("g1", Some(NotificationKind::Message))
        + counters.get("g1", Some(NotificationKind::Invite))
        + counters.get("g1", Some(NotificationKind::Intent));

    assert_eq!(counters.get("g1", None), per_kind_sum);
    assert_eq!(counters.get("g1", None), 6);
    assert_eq!(counters.get("g2", None), 7);
}

#[test]
fn test_replace_is_wholesale() {
    let mut counters = UnreadCounters::new();
    counters.replace(counts(&[
        ("g1", NotificationKind::Message, 3),
        ("g2", NotificationKind::Invite, 4),
    ]));

    counters.replace(counts(&[("g1", NotificationKind::Message, 1)]));

    // The old g2 entry is gone, not merged.
    assert_eq!(counters.get("g2", None), 0);
    assert_eq!(counters.total(), 1);
}

#[test]
fn test_total_spans_groups_and_kinds() {
    let mut counters = UnreadCounters::new();
    counters.replace(counts(&[
        ("g1", NotificationKind::Message, 2),
        ("g1", NotificationKind::Intent, 5),
        ("g2", NotificationKind::Invite, 3),
    ]));

    assert_eq!(counters.total(), 10);
}
