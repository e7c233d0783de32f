use chrono::{DateTime, Duration, Utc};
use clockblocks::core::reconcile::{ReconcilePlan, reconcile};
use clockblocks::models::interval::Interval;

mod common;
use common::{closed, hm};

/// Category covering minute `t`, if any.
fn category_at(intervals: &[Interval], t: DateTime<Utc>, now: DateTime<Utc>) -> Option<String> {
    intervals
        .iter()
        .find(|i| i.start <= t && t < i.effective_end(now))
        .map(|i| i.category_id.clone())
}

fn assert_tiled(result: &[Interval], now: DateTime<Utc>) {
    for pair in result.windows(2) {
        assert!(
            pair[0].effective_end(now) <= pair[1].start,
            "overlap between {:?} and {:?}",
            pair[0],
            pair[1]
        );
    }
    for i in result {
        assert!(i.start < i.effective_end(now), "empty interval {i:?}");
        assert_eq!(i.seconds, (i.effective_end(now) - i.start).num_seconds());
    }
}

#[test]
fn scenario_a_window_inside_one_interval() {
    let read = closed("s", "read", hm("08:00"), hm("09:00"));
    let plan = reconcile(
        std::slice::from_ref(&read),
        hm("08:30"),
        hm("08:45"),
        "code",
        "s",
        hm("12:00"),
    )
    .unwrap();

    assert!(plan.to_delete.is_empty());
    assert_eq!(plan.to_update.len(), 1);
    assert_eq!(plan.to_update[0].id, read.id);
    assert_eq!(plan.to_update[0].start, hm("08:00"));
    assert_eq!(plan.to_update[0].end, Some(hm("08:30")));
    assert_eq!(plan.to_update[0].seconds, 1800);

    let inserts: Vec<_> = plan
        .to_insert
        .iter()
        .map(|d| (d.category_id.as_str(), d.start, d.end, d.seconds))
        .collect();
    assert_eq!(inserts.len(), 2);
    assert!(inserts.contains(&("code", hm("08:30"), hm("08:45"), 900)));
    assert!(inserts.contains(&("read", hm("08:45"), hm("09:00"), 900)));
    assert_eq!(plan.dropped, 0);
}

#[test]
fn scenario_b_window_covers_two_intervals() {
    let read = closed("s", "read", hm("08:00"), hm("09:00"));
    let write = closed("s", "write", hm("09:00"), hm("10:00"));
    let plan = reconcile(
        &[read.clone(), write.clone()],
        hm("08:00"),
        hm("10:00"),
        "code",
        "s",
        hm("12:00"),
    )
    .unwrap();

    assert_eq!(plan.to_delete.len(), 2);
    assert!(plan.to_delete.contains(&read.id));
    assert!(plan.to_delete.contains(&write.id));
    assert!(plan.to_update.is_empty());
    assert_eq!(plan.to_insert.len(), 1);
    assert_eq!(plan.to_insert[0].category_id, "code");
    assert_eq!(plan.to_insert[0].start, hm("08:00"));
    assert_eq!(plan.to_insert[0].end, hm("10:00"));
    assert_eq!(plan.to_insert[0].seconds, 7200);
}

#[test]
fn exact_match_with_other_category_is_a_full_replace() {
    let read = closed("s", "read", hm("08:00"), hm("09:00"));
    let plan = reconcile(
        std::slice::from_ref(&read),
        hm("08:00"),
        hm("09:00"),
        "code",
        "s",
        hm("12:00"),
    )
    .unwrap();

    assert_eq!(plan.to_delete.len(), 1);
    assert!(plan.to_delete.contains(&read.id));
    assert!(plan.to_update.is_empty());
    assert_eq!(plan.to_insert.len(), 1);
    assert_eq!(plan.to_insert[0].category_id, "code");
}

#[test]
fn second_identical_edit_changes_nothing() {
    let now = hm("12:00");
    let existing = vec![
        closed("s", "read", hm("08:00"), hm("09:00")),
        closed("s", "write", hm("09:00"), hm("10:00")),
    ];

    let first = reconcile(&existing, hm("08:30"), hm("09:15"), "code", "s", now).unwrap();
    let after = first.apply_to(&existing);

    let second = reconcile(&after, hm("08:30"), hm("09:15"), "code", "s", now).unwrap();
    assert_eq!(second, ReconcilePlan::default());
    assert_eq!(second.apply_to(&after), after);
}

#[test]
fn disjoint_window_only_inserts() {
    let existing = vec![closed("s", "read", hm("08:00"), hm("09:00"))];
    let plan = reconcile(&existing, hm("10:00"), hm("10:30"), "code", "s", hm("12:00")).unwrap();
    assert!(plan.to_delete.is_empty());
    assert!(plan.to_update.is_empty());
    assert_eq!(plan.to_insert.len(), 1);
}

/// Every window on a 15 minute grid over a session with gaps and a running
/// tail: the result must tile and equal the old coverage painted with the
/// new category inside the window.
#[test]
fn every_window_keeps_intervals_tiled_and_union_preserved() {
    let now = hm("11:30");
    let mut running = Interval::start_running("s", "chess", hm("10:30"));
    running.seconds = 3600;
    let existing = vec![
        closed("s", "read", hm("08:00"), hm("09:00")),
        closed("s", "write", hm("09:30"), hm("10:00")),
        closed("s", "calls", hm("10:00"), hm("10:30")),
        running,
    ];

    let grid: Vec<DateTime<Utc>> = (0..=20)
        .map(|q| hm("07:00") + Duration::minutes(15 * q))
        .collect();

    for (i, &ns) in grid.iter().enumerate() {
        for &ne in &grid[i + 1..] {
            let plan = reconcile(&existing, ns, ne, "code", "s", now).unwrap();
            assert_eq!(plan.dropped, 0, "window {ns}..{ne}");

            let result = plan.apply_to(&existing);
            assert_tiled(&result, now);
            assert!(
                result.iter().filter(|i| i.is_running()).count() <= 1,
                "more than one running interval for {ns}..{ne}"
            );

            let mut t = hm("07:00");
            while t < hm("12:30") {
                let expected = if ns <= t && t < ne {
                    Some("code".to_string())
                } else {
                    category_at(&existing, t, now)
                };
                assert_eq!(
                    category_at(&result, t, now),
                    expected,
                    "minute {t} for window {ns}..{ne}"
                );
                t += Duration::minutes(5);
            }
        }
    }
}
